use axum::http::{Method, StatusCode};
use thiserror::Error;

use crate::api::admission_review::GroupVersionResource;

pub type Result<T> = std::result::Result<T, ValidationError>;

/// Every way the validation pipeline can end without an allowed verdict.
/// Each kind maps to exactly one HTTP status, see [`ValidationError::status_code`].
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid method {0}, only POST requests are allowed")]
    MethodNotAllowed(Method),

    #[error("unsupported content type {0:?}, only application/json is supported")]
    UnsupportedContentType(Option<String>),

    #[error("could not read admission request body: {0}")]
    BodyRead(axum::Error),

    #[error("could not decode admission review: {0}")]
    EnvelopeDecode(serde_json::Error),

    #[error("malformed admission review: request is missing")]
    MissingRequest,

    #[error("expected resource to be {expected}, got {actual}")]
    ResourceKindMismatch {
        expected: GroupVersionResource,
        actual: GroupVersionResource,
    },

    #[error("could not decode resource payload: {0}")]
    PayloadDecode(serde_json::Error),

    #[error("cannot encode admission review response: {0}")]
    ResponseEncode(serde_json::Error),

    #[error("failed to write admission review response: {0}")]
    ResponseWrite(std::io::Error),
}

impl ValidationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ValidationError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ValidationError::UnsupportedContentType(_)
            | ValidationError::BodyRead(_)
            | ValidationError::MissingRequest
            | ValidationError::ResourceKindMismatch { .. }
            | ValidationError::PayloadDecode(_) => StatusCode::BAD_REQUEST,
            ValidationError::EnvelopeDecode(_)
            | ValidationError::ResponseEncode(_)
            | ValidationError::ResponseWrite(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde::de::Error as _;

    fn json_error() -> serde_json::Error {
        serde_json::Error::custom("boom")
    }

    #[rstest]
    #[case::method(ValidationError::MethodNotAllowed(Method::GET), 405)]
    #[case::content_type(ValidationError::UnsupportedContentType(None), 400)]
    #[case::body(ValidationError::BodyRead(axum::Error::new(std::io::Error::other("reset"))), 400)]
    #[case::envelope(ValidationError::EnvelopeDecode(json_error()), 500)]
    #[case::missing_request(ValidationError::MissingRequest, 400)]
    #[case::resource(
        ValidationError::ResourceKindMismatch {
            expected: GroupVersionResource::new("comcast.github.io", "v1", "khchecks"),
            actual: GroupVersionResource::new("", "v1", "pods"),
        },
        400
    )]
    #[case::payload(ValidationError::PayloadDecode(json_error()), 400)]
    #[case::encode(ValidationError::ResponseEncode(json_error()), 500)]
    #[case::write(ValidationError::ResponseWrite(std::io::Error::other("broken pipe")), 500)]
    fn status_codes(#[case] error: ValidationError, #[case] expected: u16) {
        assert_eq!(error.status_code().as_u16(), expected);
    }

    #[test]
    fn resource_mismatch_message() {
        let error = ValidationError::ResourceKindMismatch {
            expected: GroupVersionResource::new("comcast.github.io", "v1", "khchecks"),
            actual: GroupVersionResource::new("apps", "v1", "deployments"),
        };

        assert_eq!(
            error.to_string(),
            "expected resource to be comcast.github.io/v1, Resource=khchecks, got apps/v1, Resource=deployments"
        );
    }
}
