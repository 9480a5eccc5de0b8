//! OpenTelemetry integration (`telemetry` feature)
//!
//! Enabled by setting `otlp_endpoint` (`PHRESH_OTLP_ENDPOINT`), e.g.
//!
//! ```text
//! PHRESH_OTLP_ENDPOINT=http://localhost:4317 \
//! PHRESH_SERVICE_NAME=phresh-dev \
//!     ./phresh-marketplace
//! ```

use crate::config::Settings;
use anyhow::Result;
use tracing::Subscriber;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

/// Build the OTLP export layer, if an endpoint is configured
pub fn layer<S>(settings: &Settings) -> Result<Option<Box<dyn Layer<S> + Send + Sync>>>
where
    S: Subscriber + for<'span> LookupSpan<'span> + Send + Sync,
{
    let Some(endpoint) = settings.otlp_endpoint.as_deref() else {
        return Ok(None);
    };

    #[cfg(feature = "telemetry")]
    {
        otlp_layer(endpoint, &settings.service_name).map(Some)
    }

    #[cfg(not(feature = "telemetry"))]
    {
        // Subscriber is not installed yet
        eprintln!(
            "OTLP endpoint {} configured but feature 'telemetry' not enabled; \
             rebuild with: cargo build --features telemetry",
            endpoint
        );
        Ok(None)
    }
}

#[cfg(feature = "telemetry")]
fn otlp_layer<S>(endpoint: &str, service_name: &str) -> Result<Box<dyn Layer<S> + Send + Sync>>
where
    S: Subscriber + for<'span> LookupSpan<'span> + Send + Sync,
{
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry::KeyValue;
    use opentelemetry_otlp::{SpanExporter, WithExportConfig};
    use opentelemetry_sdk::trace::TracerProvider;
    use opentelemetry_sdk::{runtime, Resource};

    let exporter = SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    let provider = TracerProvider::builder()
        .with_batch_exporter(exporter, runtime::Tokio)
        .with_resource(Resource::new(vec![KeyValue::new(
            "service.name",
            service_name.to_string(),
        )]))
        .build();

    let tracer = provider.tracer(service_name.to_string());
    opentelemetry::global::set_tracer_provider(provider);

    Ok(tracing_opentelemetry::layer().with_tracer(tracer).boxed())
}

/// Flush pending spans
pub fn shutdown() {
    #[cfg(feature = "telemetry")]
    opentelemetry::global::shutdown_tracer_provider();
}
