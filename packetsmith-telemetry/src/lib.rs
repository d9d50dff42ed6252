//! # Packetsmith Telemetry
//!
//! Crate for logging and build metrics.

pub mod logging;
pub mod metrics;

pub use logging::EventLogger;
pub use metrics::MetricsRecorder;
