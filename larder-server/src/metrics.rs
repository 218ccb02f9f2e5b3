//! Prometheus metrics for suggestion traffic.

use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::registry::Registry;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct ServerMetrics {
    pub suggestion_requests: Counter,
    pub suggestion_failures: Counter,
    pub subsets_evaluated: Counter,
    pub maximal_sets_returned: Counter,
    pub registry: Arc<Registry>,
}

impl ServerMetrics {
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let suggestion_requests = Counter::default();
        registry.register(
            "larder_suggestion_requests",
            "Recipe suggestion requests received",
            suggestion_requests.clone(),
        );

        let suggestion_failures = Counter::default();
        registry.register(
            "larder_suggestion_failures",
            "Recipe suggestion requests that ended in a server error",
            suggestion_failures.clone(),
        );

        let subsets_evaluated = Counter::default();
        registry.register(
            "larder_subsets_evaluated",
            "Recipe subsets checked for feasibility",
            subsets_evaluated.clone(),
        );

        let maximal_sets_returned = Counter::default();
        registry.register(
            "larder_maximal_sets_returned",
            "Maximal recipe sets returned to clients",
            maximal_sets_returned.clone(),
        );

        Self {
            suggestion_requests,
            suggestion_failures,
            subsets_evaluated,
            maximal_sets_returned,
            registry: Arc::new(registry),
        }
    }

    /// Encode all metrics as Prometheus text format.
    pub fn encode(&self) -> String {
        let mut buf = String::new();
        if let Err(e) = encode(&mut buf, &self.registry) {
            tracing::warn!("Failed to encode metrics: {}", e);
        }
        buf
    }
}

impl Default for ServerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_lists_counters() {
        let metrics = ServerMetrics::new();
        metrics.suggestion_requests.inc();
        metrics.subsets_evaluated.inc_by(7);

        let text = metrics.encode();
        assert!(text.contains("larder_suggestion_requests_total 1"));
        assert!(text.contains("larder_subsets_evaluated_total 7"));
        assert!(text.contains("larder_maximal_sets_returned_total 0"));
    }
}
