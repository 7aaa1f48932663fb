use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use metrics::{Unit, counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const RELEVANCE_DEGRADED_METRIC: &str = "atelier_relevance_degraded_total";
pub const RECENCY_EXHAUSTED_METRIC: &str = "atelier_recency_exhausted_total";
pub const ASSISTED_SOFT_FAILURE_METRIC: &str = "atelier_assisted_soft_failure_total";
pub const SELECTION_METRIC: &str = "atelier_selection_total";
pub const SELECTION_DIVERSITY_SCORE_METRIC: &str = "atelier_selection_diversity_score";
pub const SCOPE_EVICTED_METRIC: &str = "atelier_scope_evicted_total";

const DEFAULT_METRICS_PORT: u16 = 9464;

#[derive(Debug, Clone, Copy)]
pub struct MetricsRuntime {
    pub listen_addr: SocketAddr,
}

impl MetricsRuntime {
    pub fn default_listen_addr() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_METRICS_PORT)
    }
}

pub fn describe_metrics() {
    describe_counter!(
        RELEVANCE_DEGRADED_METRIC,
        Unit::Count,
        "Dimensions that fell back to the unfiltered catalog."
    );
    describe_counter!(
        RECENCY_EXHAUSTED_METRIC,
        Unit::Count,
        "Recency windows cleared early because too few candidates remained."
    );
    describe_counter!(
        ASSISTED_SOFT_FAILURE_METRIC,
        Unit::Count,
        "Assisted selections recovered by the deterministic selector."
    );
    describe_counter!(SELECTION_METRIC, Unit::Count, "Completed selections.");
    describe_gauge!(
        SELECTION_DIVERSITY_SCORE_METRIC,
        "Diversity score of the latest selection against its scope history."
    );
    describe_counter!(
        SCOPE_EVICTED_METRIC,
        Unit::Count,
        "Selection scopes evicted from the recency store."
    );
}

pub fn start_prometheus_exporter(listen_addr: SocketAddr) -> Result<MetricsRuntime, BuildError> {
    describe_metrics();

    PrometheusBuilder::new()
        .with_http_listener(listen_addr)
        .install()?;

    Ok(MetricsRuntime { listen_addr })
}

pub fn record_relevance_degraded(layer: &'static str, dimension: &'static str) {
    counter!(RELEVANCE_DEGRADED_METRIC, "layer" => layer, "dimension" => dimension).increment(1);
}

pub fn record_recency_exhausted(layer: &'static str, dimension: &'static str) {
    counter!(RECENCY_EXHAUSTED_METRIC, "layer" => layer, "dimension" => dimension).increment(1);
}

pub fn record_assisted_soft_failure(layer: &'static str) {
    counter!(ASSISTED_SOFT_FAILURE_METRIC, "layer" => layer).increment(1);
}

pub fn record_selection(layer: &'static str, path: &'static str, diversity_score: f64) {
    counter!(SELECTION_METRIC, "layer" => layer, "path" => path).increment(1);
    gauge!(SELECTION_DIVERSITY_SCORE_METRIC, "layer" => layer).set(diversity_score);
}

pub fn record_scope_evicted(layer: &'static str) {
    counter!(SCOPE_EVICTED_METRIC, "layer" => layer).increment(1);
}
