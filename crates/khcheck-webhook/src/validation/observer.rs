use tracing::{error, info, warn};

use super::errors::ValidationError;

/// Side channel notified at the lifecycle points of a review.
///
/// Implementations must not influence the verdict: return values are not
/// consumed and the pipeline never waits on them.
#[cfg_attr(test, mockall::automock)]
pub trait ReviewObserver: Send + Sync {
    /// A request entered the pipeline.
    fn started(&self);

    /// The verdict for `uid` was encoded and written out.
    fn completed(&self, uid: &str, allowed: bool);

    /// The pipeline ended without a verdict.
    fn rejected(&self, error: &ValidationError);
}

/// Reports the review lifecycle through `tracing` events.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl ReviewObserver for TracingObserver {
    fn started(&self) {
        info!("handling validation webhook request");
    }

    fn completed(&self, uid: &str, allowed: bool) {
        info!(request_uid = uid, allowed, "completed validation");
    }

    fn rejected(&self, err: &ValidationError) {
        let status = err.status_code();
        if status.is_server_error() {
            error!(error = %err, status = status.as_u16(), "admission review failed");
        } else {
            warn!(error = %err, status = status.as_u16(), "admission review rejected");
        }
    }
}
