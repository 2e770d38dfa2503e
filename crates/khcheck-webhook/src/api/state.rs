use crate::khcheck::KuberhealthyCheck;
use crate::validation::Validator;

pub(crate) struct ApiServerState {
    pub(crate) validator: Validator<KuberhealthyCheck>,
}
