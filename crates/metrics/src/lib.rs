pub mod error;
mod server;
mod traits;

use prometheus::IntCounter;
use snafu::ResultExt;

pub use self::{error::Error, server::start_metrics_server, traits::Metrics};

#[derive(Clone)]
pub struct DefaultMetrics {
    registry: prometheus::Registry,
    notices_sent: IntCounter,
    notices_failed: IntCounter,
}

impl std::fmt::Debug for DefaultMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultMetrics").finish_non_exhaustive()
    }
}

impl DefaultMetrics {
    /// # Errors
    ///
    /// Returns an error if a collector can not be created or registered.
    pub fn new() -> Result<Self, Error> {
        let registry = prometheus::Registry::new();

        let notices_sent = IntCounter::new(
            "classnotify_notices_sent_total",
            "Number of notices accepted by the mail transport",
        )
        .context(error::CreateCollectorSnafu)?;
        registry
            .register(Box::new(notices_sent.clone()))
            .context(error::RegisterCollectorSnafu)?;

        let notices_failed = IntCounter::new(
            "classnotify_notices_failed_total",
            "Number of notices the mail transport failed to deliver",
        )
        .context(error::CreateCollectorSnafu)?;
        registry
            .register(Box::new(notices_failed.clone()))
            .context(error::RegisterCollectorSnafu)?;

        Ok(Self { registry, notices_sent, notices_failed })
    }

    #[inline]
    pub fn record_sent(&self) { self.notices_sent.inc(); }

    #[inline]
    pub fn record_failed(&self) { self.notices_failed.inc(); }
}

impl Metrics for DefaultMetrics {
    fn gather(&self) -> Vec<prometheus::proto::MetricFamily> { self.registry.gather() }
}

#[cfg(test)]
mod tests {
    use crate::DefaultMetrics;

    #[test]
    fn test_new() { drop(DefaultMetrics::new().unwrap()); }

    #[test]
    fn test_dispatch_counters() {
        let metrics = DefaultMetrics::new().unwrap();

        metrics.record_sent();
        metrics.record_sent();
        metrics.record_failed();

        assert_eq!(metrics.notices_sent.get(), 2);
        assert_eq!(metrics.notices_failed.get(), 1);
    }
}
