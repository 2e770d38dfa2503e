use axum::response::IntoResponse;

use crate::validation::ValidationError;

// Only the status reaches the caller: the error detail is logged by the
// review observer and never serialized into the body.
impl IntoResponse for ValidationError {
    fn into_response(self) -> axum::response::Response {
        self.status_code().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn rejection_has_status_and_empty_body() {
        let response = ValidationError::MethodNotAllowed(Method::GET).into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }
}
