use axum::{
    extract::{self, Request},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::Span;

use crate::api::state::ApiServerState;

#[tracing::instrument(
    name = "validation",
    fields(
        host=crate::config::HOSTNAME.as_str(),
        request_uid=tracing::field::Empty,
        resource_group=tracing::field::Empty,
        resource_version=tracing::field::Empty,
        resource=tracing::field::Empty,
        allowed=tracing::field::Empty,
        response_code=tracing::field::Empty,
    ),
    skip_all)]
/// Decide whether the KuberhealthyCheck embedded in an AdmissionReview can be admitted.
pub(crate) async fn validate_handler(
    extract::State(state): extract::State<Arc<ApiServerState>>,
    request: Request,
) -> Response {
    let mut body = Vec::new();

    match state.validator.handle(request, &mut body).await {
        Ok(response) => {
            Span::current().record("allowed", response.allowed);
            Span::current().record("response_code", StatusCode::OK.as_u16());

            (
                [(header::CONTENT_TYPE, mime::APPLICATION_JSON.essence_str())],
                body,
            )
                .into_response()
        }
        Err(error) => {
            Span::current().record("response_code", error.status_code().as_u16());
            error.into_response()
        }
    }
}

pub(crate) async fn readiness_handler() -> StatusCode {
    StatusCode::OK
}
