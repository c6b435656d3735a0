use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::Observability;

/// Install the global tracing subscriber. `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing(cfg: &Observability) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // A subscriber may already be installed (tests); keep the existing one.
    let result = if cfg.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .try_init()
    };
    if result.is_ok() {
        tracing::info!(service = %cfg.service_name, "tracing initialized");
    }
}

/// Install the Prometheus recorder when metrics are enabled.
pub fn install_metrics(cfg: &Observability) -> Result<Option<PrometheusHandle>, BuildError> {
    if !cfg.enable_metrics {
        return Ok(None);
    }
    PrometheusBuilder::new().install_recorder().map(Some)
}
