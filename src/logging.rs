//! Tracing subscriber setup.

use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter, Layer,
};

use crate::config::{LogFormat, LoggingConfig};

/// Targets that log at the configured service level: the library and the binary
const SERVICE_TARGETS: [&str; 2] = ["competition_booking_service", "competition_booking"];

/// Install the global subscriber
///
/// `RUST_LOG` replaces the configured directives entirely. Fails if a subscriber is already set.
pub fn init_logging(config: &LoggingConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(config)));

    tracing_subscriber::registry()
        .with(format_layer(config.format))
        .with(filter)
        .try_init()
}

/// Everything else stays at `warn`; the service and the request traces get their own levels
fn filter_directives(config: &LoggingConfig) -> String {
    let mut directives = vec!["warn".to_string()];
    directives.extend(
        SERVICE_TARGETS
            .iter()
            .map(|target| format!("{target}={}", config.level)),
    );
    directives.push(format!("tower_http={}", config.http_level));
    directives.join(",")
}

fn format_layer<S>(format: LogFormat) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let layer = fmt::layer().with_target(true);
    match format {
        LogFormat::Json => layer
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Pretty => layer.pretty().with_span_events(FmtSpan::CLOSE).boxed(),
    }
}
