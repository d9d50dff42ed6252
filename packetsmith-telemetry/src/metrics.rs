//! ## packetsmith-telemetry::metrics
//! Prometheus counters for packet construction.

use prometheus::{IntCounter, IntCounterVec, Opts, Registry};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    /// Successful builds, labelled by recipe (`custom` for manual builds).
    pub packets_built: IntCounterVec,
    pub build_failures: IntCounter,
}

impl MetricsRecorder {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let packets_built = IntCounterVec::new(
            Opts::new("packetsmith_packets_built_total", "Packets built successfully"),
            &["recipe"],
        )?;
        let build_failures = IntCounter::new(
            "packetsmith_build_failures_total",
            "Packet builds that returned an error",
        )?;

        registry.register(Box::new(packets_built.clone()))?;
        registry.register(Box::new(build_failures.clone()))?;

        Ok(Self {
            registry,
            packets_built,
            build_failures,
        })
    }

    pub fn inc_packets_built(&self, recipe: &str) {
        self.packets_built.with_label_values(&[recipe]).inc();
    }

    pub fn inc_build_failures(&self) {
        self.build_failures.inc();
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
