pub mod admission_review;
mod api_error;
mod handlers;
mod state;

use axum::{
    routing::{any, get},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::khcheck::KuberhealthyCheck;
use crate::validation::Validator;
use handlers::{readiness_handler, validate_handler};
use state::ApiServerState;

pub const VALIDATE_PATH: &str = "/validate";
pub const READINESS_PATH: &str = "/readiness";

/// Build the webhook router.
///
/// The validate route accepts every method: the validator itself answers
/// anything but POST with 405.
pub fn router(validator: Validator<KuberhealthyCheck>) -> Router {
    let state = Arc::new(ApiServerState { validator });

    Router::new()
        .route(VALIDATE_PATH, any(validate_handler))
        .with_state(state)
        .route(READINESS_PATH, get(readiness_handler))
        .layer(TraceLayer::new_for_http())
}
