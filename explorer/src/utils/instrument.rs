use crate::types::params::OTELConfig;
use crate::{ExplorerError, ExplorerResult};
use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::{runtime, Resource};
use std::time::Duration;
use tracing::warn;
use url::Url;

const METRICS_EXPORT_INTERVAL: Duration = Duration::from_secs(5);

/// Instrumentation for the Explorer
pub struct ExplorerInstrumentation {
    pub otel_config: OTELConfig,
    pub meter_provider: Option<SdkMeterProvider>,
}

impl ExplorerInstrumentation {
    pub fn new(config: &OTELConfig) -> ExplorerResult<Self> {
        match config.endpoint {
            None => {
                warn!("OTEL endpoint is not set. Skipping instrumentation.");
                Ok(Self { otel_config: config.clone(), meter_provider: None })
            }
            Some(ref endpoint) => {
                let meter_provider = Self::instrument_metric_provider(config, endpoint)?;
                Ok(Self { otel_config: config.clone(), meter_provider: Some(meter_provider) })
            }
        }
    }

    fn instrument_metric_provider(config: &OTELConfig, endpoint: &Url) -> ExplorerResult<SdkMeterProvider> {
        let exporter = opentelemetry_otlp::MetricExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint.to_string())
            .build()
            .map_err(|e| ExplorerError::OTLMetricsError(e.to_string()))?;

        let reader = PeriodicReader::builder(exporter, runtime::Tokio).with_interval(METRICS_EXPORT_INTERVAL).build();

        let provider = SdkMeterProvider::builder()
            .with_reader(reader)
            .with_resource(Resource::new(vec![KeyValue::new(
                opentelemetry_semantic_conventions::resource::SERVICE_NAME,
                format!("{}{}", config.service_name, "_meter_service"),
            )]))
            .build();

        global::set_meter_provider(provider.clone());
        Ok(provider)
    }

    pub fn shutdown(&self) -> ExplorerResult<()> {
        match self.meter_provider {
            Some(ref meter_provider) => {
                meter_provider.shutdown().map_err(|e| ExplorerError::OTLMetricsError(e.to_string()))
            }
            None => {
                warn!("OTEL endpoint is not set. Skipping shutdown.");
                Ok(())
            }
        }
    }
}
