//! ## packetsmith-telemetry::logging
//! Structured logging with `tracing`.
//!
//! Log output goes to stderr so that rendered packets on stdout stay clean.

use opentelemetry::KeyValue;
use tracing::info_span;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global subscriber.
    ///
    /// `RUST_LOG` wins over `default_level`. Returns `false` if a subscriber
    /// was already installed.
    pub fn init(default_level: &str, json: bool) -> bool {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
        let builder = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false);

        if json {
            builder.json().try_init().is_ok()
        } else {
            builder.try_init().is_ok()
        }
    }

    pub fn log_event(event_type: &str, metadata: Vec<KeyValue>) {
        let span = info_span!("packet_event", event_type = event_type, otel.kind = "INTERNAL");
        span.in_scope(|| {
            tracing::info!(
                metadata = ?metadata,
                "Packet event recorded"
            );
        });
    }
}
