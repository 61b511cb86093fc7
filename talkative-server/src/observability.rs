use crate::error::{Result, ServerError};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub default_level: tracing::Level,
    pub json_format: bool,
    pub show_thread_ids: bool,
    pub show_targets: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_level: tracing::Level::INFO,
            json_format: false,
            show_thread_ids: false,
            show_targets: true,
        }
    }
}

impl LogConfig {
    /// Development configuration (verbose, human-readable)
    pub fn dev() -> Self {
        Self {
            default_level: tracing::Level::DEBUG,
            show_thread_ids: true,
            ..Default::default()
        }
    }

    /// Switch to structured output for log collectors
    pub fn with_json(mut self, json_format: bool) -> Self {
        self.json_format = json_format;
        self
    }

    /// `RUST_LOG` wins; otherwise both crates log at `default_level`
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "talkative_server={level},talkative_core={level},warn",
                level = self.default_level
            ))
        })
    }

    pub fn init(self) -> Result<()> {
        #[cfg(feature = "telemetry")]
        if telemetry::enabled() {
            return telemetry::init(&self);
        }

        let json_layer = self.json_format.then(|| {
            fmt::layer()
                .json()
                .with_target(self.show_targets)
                .with_thread_ids(self.show_thread_ids)
        });
        let text_layer = (!self.json_format).then(|| {
            fmt::layer()
                .with_target(self.show_targets)
                .with_thread_ids(self.show_thread_ids)
        });

        tracing_subscriber::registry()
            .with(self.env_filter())
            .with(json_layer)
            .with(text_layer)
            .try_init()
            .map_err(|e| ServerError::Logging(e.to_string()))
    }
}

/// Flush pending spans before exit
pub fn shutdown() {
    #[cfg(feature = "telemetry")]
    if telemetry::enabled() {
        opentelemetry::global::shutdown_tracer_provider();
    }
}

#[cfg(feature = "telemetry")]
mod telemetry {
    use super::LogConfig;
    use crate::error::{Result, ServerError};
    use opentelemetry::sdk::propagation::TraceContextPropagator;
    use opentelemetry::sdk::{
        trace::{self, RandomIdGenerator, Sampler},
        Resource,
    };
    use opentelemetry::{global, KeyValue};
    use std::env;
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

    const SERVICE_NAME: &str = "talkative-server";

    pub fn enabled() -> bool {
        env::var("ENABLE_TELEMETRY")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false)
    }

    /// Logs plus a Jaeger exporter, enabled by `ENABLE_TELEMETRY=true`
    pub fn init(config: &LogConfig) -> Result<()> {
        global::set_text_map_propagator(TraceContextPropagator::new());

        let jaeger_endpoint = env::var("JAEGER_ENDPOINT")
            .unwrap_or_else(|_| "http://jaeger:14268/api/traces".to_string());

        let tracer = opentelemetry_jaeger::new_collector_pipeline()
            .with_service_name(SERVICE_NAME)
            .with_endpoint(&jaeger_endpoint)
            .with_isahc()
            .with_trace_config(
                trace::config()
                    .with_sampler(Sampler::AlwaysOn)
                    .with_id_generator(RandomIdGenerator::default())
                    .with_max_events_per_span(64)
                    .with_max_attributes_per_span(16)
                    .with_resource(Resource::new(vec![
                        KeyValue::new("service.name", SERVICE_NAME),
                        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
                    ])),
            )
            .with_timeout(std::time::Duration::from_secs(2))
            .install_batch(opentelemetry::runtime::Tokio)
            .map_err(|e| ServerError::Telemetry(e.to_string()))?;

        tracing_subscriber::registry()
            .with(config.env_filter())
            .with(
                fmt::layer()
                    .json()
                    .with_target(config.show_targets)
                    .with_thread_ids(config.show_thread_ids),
            )
            .with(tracing_opentelemetry::layer().with_tracer(tracer))
            .try_init()
            .map_err(|e| ServerError::Telemetry(e.to_string()))?;

        tracing::info!(%jaeger_endpoint, "Telemetry initialized");
        Ok(())
    }
}
