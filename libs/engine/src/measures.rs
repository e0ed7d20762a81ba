use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use metrics::Counter;

/// Name of the counter bumped when a selected record fails to decode.
pub const UNMARSHAL_FAILURE_COUNTER: &str = "unmarshal_failure_count";

/// Metric handles used by the resolver.
///
/// Cloning shares the underlying counters; increments are atomic.
#[derive(Clone)]
pub struct Measures {
    unmarshal_failure: Counter,
}

impl Measures {
    /// Register with the process-wide `metrics` recorder.
    pub fn register() -> Self {
        metrics::describe_counter!(
            UNMARSHAL_FAILURE_COUNTER,
            "Number of stored records that failed to decode into an event"
        );
        Self::new(metrics::counter!(UNMARSHAL_FAILURE_COUNTER))
    }

    pub fn new(unmarshal_failure: Counter) -> Self {
        Self { unmarshal_failure }
    }

    /// Measures backed by a plain atomic, bypassing the global recorder.
    /// The returned handle observes the failure count.
    pub fn local() -> (Self, Arc<AtomicU64>) {
        let failures = Arc::new(AtomicU64::new(0));
        (Self::new(Counter::from_arc(failures.clone())), failures)
    }

    pub(crate) fn unmarshal_failure(&self) {
        self.unmarshal_failure.increment(1);
    }
}
