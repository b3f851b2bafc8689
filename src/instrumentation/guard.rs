use std::time::Instant;

use tracing::{error, info, warn};

use crate::metrics::MetricsRecorder;

/// Status recorded for a request whose future was dropped before a
/// response existed.
pub const UNFINISHED_STATUS: u16 = 500;

/// Accounting for one in-flight request.
///
/// Creating the guard bumps the in-flight gauge. Dropping it, on whatever
/// path, observes latency, logs completion, releases the gauge and counts
/// the request, in that order.
pub struct RequestGuard<M: MetricsRecorder> {
    metrics: M,
    request_id: String,
    method: String,
    endpoint: String,
    start: Instant,
    outcome: Option<Outcome>,
}

struct Outcome {
    status: u16,
    bytes: u64,
}

impl<M: MetricsRecorder> RequestGuard<M> {
    pub fn start(
        metrics: M,
        request_id: impl Into<String>,
        method: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        metrics.adjust_active_requests(1);
        RequestGuard {
            metrics,
            request_id: request_id.into(),
            method: method.into(),
            endpoint: endpoint.into(),
            start: Instant::now(),
            outcome: None,
        }
    }

    /// Records the response that is about to be returned and finalizes.
    pub fn finish(mut self, status: u16, bytes: u64) {
        self.outcome = Some(Outcome { status, bytes });
    }
}

impl<M: MetricsRecorder> Drop for RequestGuard<M> {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        let (status, bytes) = match &self.outcome {
            Some(outcome) => (outcome.status, outcome.bytes),
            None => {
                warn!(
                    request_id = %self.request_id,
                    "request dropped before a response was produced"
                );
                (UNFINISHED_STATUS, 0)
            }
        };

        self.metrics
            .record_request_duration(&self.method, &self.endpoint, duration);

        match status {
            500..=u16::MAX => error!(
                request_id = %self.request_id,
                status,
                duration,
                bytes,
                "request completed"
            ),
            400..=499 => warn!(
                request_id = %self.request_id,
                status,
                duration,
                bytes,
                "request completed"
            ),
            _ => info!(
                request_id = %self.request_id,
                status,
                duration,
                bytes,
                "request completed"
            ),
        }

        self.metrics.adjust_active_requests(-1);
        self.metrics
            .record_request(&self.method, &self.endpoint, status);
    }
}
