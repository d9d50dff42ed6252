use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use opentelemetry::KeyValue;
use tracing::{info, warn};

use packetsmith_config::{LogFormat, PacketsmithConfig};
use packetsmith_core::{
    Packet, PacketBuilder, PacketDestination, PacketDirector, PacketSource, PacketType,
    PayloadEncoding, Preset, StandardPacketBuilder,
};
use packetsmith_telemetry::{EventLogger, MetricsRecorder};

#[derive(Parser, Debug)]
#[command(name = "packetsmith", version, about)]
pub struct Cli {
    /// Configuration file; defaults to config/packetsmith.yaml when present
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Yaml,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Text packet from the system to the server
    Status(StatusArgs),
    /// Base64 packet from a sensor to the database
    Sensor(SensorArgs),
    /// Command packet from a user to local storage
    Command(CommandArgs),
    /// Set each field by hand
    Custom(CustomArgs),
    /// Build the sample status and sensor packets
    Demo,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(short, long)]
    pub message: String,
}

#[derive(Args, Debug, Clone)]
pub struct SensorArgs {
    #[arg(short, long)]
    pub data: String,
}

#[derive(Args, Debug, Clone)]
pub struct CommandArgs {
    #[arg(long)]
    pub command: String,
}

#[derive(Args, Debug, Clone)]
pub struct CustomArgs {
    #[arg(short = 't', long = "type")]
    pub packet_type: Option<PacketType>,
    #[arg(short, long)]
    pub source: Option<PacketSource>,
    #[arg(short, long)]
    pub destination: Option<PacketDestination>,
    #[arg(short, long)]
    pub payload: Option<String>,
    /// Overrides `builder.encoding` from the configuration
    #[arg(short, long)]
    pub encoding: Option<PayloadEncoding>,
}

/// Loads configuration, installs logging and runs the selected command.
pub fn run_command(cli: Cli, out: &mut dyn Write) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => PacketsmithConfig::load_from_path(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => PacketsmithConfig::load().context("failed to load configuration")?,
    };

    EventLogger::init(
        &config.telemetry.log_level,
        config.telemetry.log_format == LogFormat::Json,
    );
    let metrics = MetricsRecorder::new().context("failed to register metrics")?;

    let result = execute(&cli.command, cli.format, &config, &metrics, out);

    if config.telemetry.metrics {
        eprint!("{}", metrics.gather_metrics().context("failed to gather metrics")?);
    }
    result
}

/// Runs one command against an already loaded configuration.
pub fn execute(
    command: &Commands,
    format: OutputFormat,
    config: &PacketsmithConfig,
    metrics: &MetricsRecorder,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let packets = match command {
        Commands::Status(args) => vec![run_preset(Preset::Status, &args.message, metrics)?],
        Commands::Sensor(args) => vec![run_preset(Preset::Sensor, &args.data, metrics)?],
        Commands::Command(args) => vec![run_preset(Preset::Command, &args.command, metrics)?],
        Commands::Custom(args) => vec![run_custom(args, config.builder.encoding, metrics)?],
        Commands::Demo => vec![
            run_preset(Preset::Status, "System operational.", metrics)?,
            run_preset(Preset::Sensor, "Temperature=23.5", metrics)?,
        ],
    };

    for (index, packet) in packets.iter().enumerate() {
        render(out, format, packet, index > 0)?;
    }
    Ok(())
}

fn builder_for(preset: Preset) -> StandardPacketBuilder {
    match preset {
        Preset::Sensor => StandardPacketBuilder::binary(),
        Preset::Status | Preset::Command => StandardPacketBuilder::text(),
    }
}

fn run_preset(preset: Preset, input: &str, metrics: &MetricsRecorder) -> anyhow::Result<Packet> {
    let mut director = PacketDirector::with_builder(builder_for(preset));
    let result = director.build(preset, input);
    record(preset.as_str(), result, metrics)
        .with_context(|| format!("failed to build {} packet", preset))
}

fn run_custom(
    args: &CustomArgs,
    default_encoding: PayloadEncoding,
    metrics: &MetricsRecorder,
) -> anyhow::Result<Packet> {
    let mut builder = StandardPacketBuilder::new(args.encoding.unwrap_or(default_encoding));
    if let Some(packet_type) = args.packet_type {
        builder.set_type(packet_type);
    }
    if let Some(source) = args.source {
        builder.set_source(source);
    }
    if let Some(destination) = args.destination {
        builder.set_destination(destination);
    }
    if let Some(payload) = &args.payload {
        builder.set_payload(payload);
    }
    record("custom", builder.build(), metrics).context("failed to build custom packet")
}

fn record(
    recipe: &str,
    result: Result<Packet, packetsmith_core::PacketError>,
    metrics: &MetricsRecorder,
) -> Result<Packet, packetsmith_core::PacketError> {
    match &result {
        Ok(packet) => {
            metrics.inc_packets_built(recipe);
            EventLogger::log_event(
                "packet_built",
                vec![
                    KeyValue::new("recipe", recipe.to_string()),
                    KeyValue::new("type", packet.packet_type().as_str()),
                    KeyValue::new("destination", packet.destination().as_str()),
                ],
            );
        }
        Err(err) => {
            metrics.inc_build_failures();
            warn!(recipe, error = %err, "Packet build failed");
        }
    }
    result
}

fn render(
    out: &mut dyn Write,
    format: OutputFormat,
    packet: &Packet,
    separate: bool,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            if separate {
                writeln!(out)?;
            }
            writeln!(out, "{}", packet)?;
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(packet).context("failed to serialize packet")?;
            write!(out, "---\n{}", yaml)?;
        }
    }
    info!(format = ?format, "Packet rendered");
    Ok(())
}
