/// Metric sources that can be exported through the `/metrics` endpoint.
pub trait Metrics: Clone + Send + Sync + 'static {
    fn gather(&self) -> Vec<prometheus::proto::MetricFamily>;
}
