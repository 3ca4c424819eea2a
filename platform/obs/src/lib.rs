use anyhow::{Result, anyhow};
use once_cell::sync::OnceCell;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, SpanExporter, WithExportConfig};
use opentelemetry_sdk::{self as sdk, Resource};
use tracing_subscriber::{
    EnvFilter, fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt,
};

static INIT: OnceCell<()> = OnceCell::new();

const DEFAULT_FILTER: &str = "info,tower_http=warn,reqwest=warn,hyper_util=warn";

/// Configuration for tracing initialization.
#[derive(Clone, Debug)]
pub struct ObsConfig {
    pub service_name: &'static str,
    pub env_filter: Option<String>,
    pub otlp_endpoint: Option<String>,
    /// Write log lines to stderr so rendered HTML on stdout stays clean.
    pub stderr: bool,
}

impl Default for ObsConfig {
    fn default() -> Self {
        Self {
            service_name: "employee-posts",
            env_filter: None,
            otlp_endpoint: None,
            stderr: true,
        }
    }
}

impl ObsConfig {
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }
}

fn resolve_filter(explicit: Option<String>) -> String {
    explicit
        .or_else(|| std::env::var("RUST_LOG").ok())
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Tracer provider that batch-exports spans over OTLP/HTTP.
fn tracer_provider(service_name: &'static str, endpoint: String) -> Result<sdk::trace::SdkTracerProvider> {
    let exporter = SpanExporter::builder()
        .with_http()
        .with_protocol(Protocol::HttpBinary)
        .with_endpoint(endpoint)
        .build()?;
    let resource = Resource::builder().with_service_name(service_name).build();
    Ok(sdk::trace::SdkTracerProvider::builder()
        .with_resource(resource)
        .with_batch_exporter(exporter)
        .build())
}

/// Installs the fmt subscriber, plus span export when an OTLP endpoint is
/// configured. Later calls are no-ops.
pub fn init_tracing(config: ObsConfig) -> Result<()> {
    if INIT.get().is_some() {
        return Ok(());
    }

    let env_filter = EnvFilter::try_new(resolve_filter(config.env_filter))?;
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(if config.stderr {
            BoxMakeWriter::new(std::io::stderr)
        } else {
            BoxMakeWriter::new(std::io::stdout)
        });
    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer);

    let otlp_endpoint = config
        .otlp_endpoint
        .or_else(|| std::env::var("OTLP_ENDPOINT").ok())
        .filter(|endpoint| !endpoint.trim().is_empty());

    match otlp_endpoint {
        Some(endpoint) => {
            let tracer = tracer_provider(config.service_name, endpoint)?.tracer(config.service_name);
            registry
                .with(tracing_opentelemetry::layer().with_tracer(tracer))
                .try_init()?;
        }
        None => registry.try_init()?,
    }

    INIT.set(())
        .map_err(|_| anyhow!("tracing already initialized"))?;
    tracing::debug!(service = config.service_name, "tracing initialized");
    Ok(())
}
