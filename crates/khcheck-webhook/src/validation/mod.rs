//! The admission decision pipeline.
//!
//! A review moves linearly through
//! `Received -> EnvelopeValid -> ResourceKindValid -> PayloadValid -> Allowed -> Encoded`.
//! Any failed check ends the review with a [`ValidationError`], which carries
//! the HTTP status to answer with. There are no retries and no state survives
//! a review.

use axum::body::{self, Body};
use axum::http::{header, HeaderMap, Method, Request};
use serde::de::{DeserializeOwned, Error as _};
use std::io::Write;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, Span};

use crate::api::admission_review::{
    AdmissionRequest, AdmissionResponse, AdmissionReview, GroupVersionResource,
};
use crate::khcheck::{KHCHECK_GROUP, KHCHECK_RESOURCE, KHCHECK_VERSION};

pub mod errors;
pub mod observer;

pub use errors::{Result, ValidationError};
pub use observer::{ReviewObserver, TracingObserver};

/// Same limit the Kubernetes API server applies to request bodies.
pub const DEFAULT_MAX_BODY_SIZE: usize = 3 * 1024 * 1024;

/// Immutable settings shared by every review.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatorSettings {
    /// The only resource this webhook is registered for.
    pub expected_resource: GroupVersionResource,
    pub max_body_size: usize,
}

impl Default for ValidatorSettings {
    fn default() -> Self {
        ValidatorSettings {
            expected_resource: GroupVersionResource::new(
                KHCHECK_GROUP,
                KHCHECK_VERSION,
                KHCHECK_RESOURCE,
            ),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }
}

/// Admits a resource of type `R` when the embedded payload decodes into it.
pub struct Validator<R> {
    settings: Arc<ValidatorSettings>,
    observer: Arc<dyn ReviewObserver>,
    resource: PhantomData<fn() -> R>,
}

impl<R> Clone for Validator<R> {
    fn clone(&self) -> Self {
        Validator {
            settings: self.settings.clone(),
            observer: self.observer.clone(),
            resource: PhantomData,
        }
    }
}

impl<R: DeserializeOwned> Validator<R> {
    pub fn new(settings: ValidatorSettings) -> Self {
        Validator {
            settings: Arc::new(settings),
            observer: Arc::new(TracingObserver),
            resource: PhantomData,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ReviewObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn settings(&self) -> &ValidatorSettings {
        &self.settings
    }

    /// Runs the whole pipeline against `request` and writes the encoded
    /// verdict envelope into `sink`.
    ///
    /// On failure nothing has been written, except for [`ValidationError::ResponseWrite`]
    /// where the sink may hold a partial envelope.
    pub async fn handle<W: Write>(
        &self,
        request: Request<Body>,
        sink: &mut W,
    ) -> Result<AdmissionResponse> {
        self.observer.started();

        let outcome = self.handle_request(request, sink).await;
        match &outcome {
            Ok(response) => self.observer.completed(&response.uid, response.allowed),
            Err(error) => self.observer.rejected(error),
        }

        outcome
    }

    async fn handle_request<W: Write>(
        &self,
        request: Request<Body>,
        sink: &mut W,
    ) -> Result<AdmissionResponse> {
        let (parts, body) = request.into_parts();
        check_method(&parts.method)?;
        check_content_type(&parts.headers)?;

        let body = body::to_bytes(body, self.settings.max_body_size)
            .await
            .map_err(ValidationError::BodyRead)?;

        let response = self.review(&body)?;

        let admission_review = AdmissionReview::new_with_response(response.clone());
        let encoded =
            serde_json::to_vec(&admission_review).map_err(ValidationError::ResponseEncode)?;
        debug!(state = "Encoded", request_uid = response.uid.as_str(), "verdict encoded");

        sink.write_all(&encoded)
            .and_then(|_| sink.flush())
            .map_err(ValidationError::ResponseWrite)?;

        Ok(response)
    }

    /// Decodes an `AdmissionReview` body and builds the verdict for it.
    pub fn review(&self, body: &[u8]) -> Result<AdmissionResponse> {
        let admission_review: AdmissionReview =
            serde_json::from_slice(body).map_err(ValidationError::EnvelopeDecode)?;
        let request = admission_review
            .request
            .ok_or(ValidationError::MissingRequest)?;
        populate_span_with_admission_request_data(&request);
        debug!(
            state = "EnvelopeValid",
            request_uid = request.uid.as_str(),
            "admission review decoded"
        );

        // Guards against being invoked for a resource this webhook was not
        // registered for.
        if request.resource != self.settings.expected_resource {
            return Err(ValidationError::ResourceKindMismatch {
                expected: self.settings.expected_resource.clone(),
                actual: request.resource,
            });
        }
        debug!(
            state = "ResourceKindValid",
            request_uid = request.uid.as_str(),
            resource = %request.resource,
            "resource matches"
        );

        let object = request.object.ok_or_else(|| {
            ValidationError::PayloadDecode(serde_json::Error::custom("object is missing"))
        })?;
        serde_json::from_value::<R>(object.0).map_err(ValidationError::PayloadDecode)?;
        debug!(
            state = "PayloadValid",
            request_uid = request.uid.as_str(),
            "payload decoded"
        );

        Ok(AdmissionResponse::allow(request.uid))
    }
}

// Fills the request fields declared by the enclosing `validation` span.
fn populate_span_with_admission_request_data(request: &AdmissionRequest) {
    Span::current().record("request_uid", request.uid.as_str());
    Span::current().record("resource_group", request.resource.group.as_str());
    Span::current().record("resource_version", request.resource.version.as_str());
    Span::current().record("resource", request.resource.resource.as_str());
}

fn check_method(method: &Method) -> Result<()> {
    if *method == Method::POST {
        Ok(())
    } else {
        Err(ValidationError::MethodNotAllowed(method.clone()))
    }
}

fn check_content_type(headers: &HeaderMap) -> Result<()> {
    // Exact match: parameters such as `charset` are not accepted.
    let content_type = headers.get(header::CONTENT_TYPE);
    if content_type
        .is_some_and(|value| value.as_bytes() == mime::APPLICATION_JSON.essence_str().as_bytes())
    {
        return Ok(());
    }

    Err(ValidationError::UnsupportedContentType(
        content_type.map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned()),
    ))
}
