//! ## packetsmith-core::director
//! Named recipes: fixed sequences of builder calls for common packets.
//!
//! The recipe functions are generic over any `PacketBuilder`, including
//! `dyn PacketBuilder`. [`PacketDirector`] wraps them around an optional held
//! builder for callers that pick the builder once and reuse it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::builder::PacketBuilder;
use crate::error::PacketError;
use crate::packet::{Packet, PacketDestination, PacketSource, PacketType};

fn run_recipe<B: PacketBuilder + ?Sized>(
    builder: &mut B,
    packet_type: PacketType,
    source: PacketSource,
    destination: PacketDestination,
    payload: &str,
) -> Result<Packet, PacketError> {
    builder.set_type(packet_type);
    builder.set_source(source);
    builder.set_destination(destination);
    builder.set_payload(payload);
    builder.build()
}

/// Text packet from the system to the server.
pub fn build_status_packet<B: PacketBuilder + ?Sized>(
    builder: &mut B,
    message: &str,
) -> Result<Packet, PacketError> {
    run_recipe(
        builder,
        PacketType::Text,
        PacketSource::System,
        PacketDestination::Server,
        message,
    )
}

/// Binary packet from a sensor to the database.
pub fn build_sensor_packet<B: PacketBuilder + ?Sized>(
    builder: &mut B,
    data: &str,
) -> Result<Packet, PacketError> {
    run_recipe(
        builder,
        PacketType::Binary,
        PacketSource::Sensor,
        PacketDestination::Database,
        data,
    )
}

/// Command packet from a user to local storage.
pub fn build_command_packet<B: PacketBuilder + ?Sized>(
    builder: &mut B,
    command: &str,
) -> Result<Packet, PacketError> {
    run_recipe(
        builder,
        PacketType::Command,
        PacketSource::User,
        PacketDestination::LocalStorage,
        command,
    )
}

/// A named recipe, selectable at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Status,
    Sensor,
    Command,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Status => "status",
            Preset::Sensor => "sensor",
            Preset::Command => "command",
        }
    }

    pub fn apply<B: PacketBuilder + ?Sized>(
        &self,
        builder: &mut B,
        input: &str,
    ) -> Result<Packet, PacketError> {
        match self {
            Preset::Status => build_status_packet(builder, input),
            Preset::Sensor => build_sensor_packet(builder, input),
            Preset::Command => build_command_packet(builder, input),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = PacketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "status" => Ok(Preset::Status),
            "sensor" => Ok(Preset::Sensor),
            "command" => Ok(Preset::Command),
            _ => Err(PacketError::unknown("preset", s)),
        }
    }
}

/// Holds at most one builder and runs recipes against it.
///
/// The director keeps no packet state of its own; everything between calls
/// lives in the builder, which `build` clears on success.
#[derive(Default)]
pub struct PacketDirector {
    builder: Option<Box<dyn PacketBuilder + Send>>,
}

impl PacketDirector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builder<B: PacketBuilder + Send + 'static>(builder: B) -> Self {
        Self {
            builder: Some(Box::new(builder)),
        }
    }

    /// Replaces the held builder, returning the previous one.
    pub fn set_builder<B: PacketBuilder + Send + 'static>(
        &mut self,
        builder: B,
    ) -> Option<Box<dyn PacketBuilder + Send>> {
        self.builder.replace(Box::new(builder))
    }

    pub fn take_builder(&mut self) -> Option<Box<dyn PacketBuilder + Send>> {
        self.builder.take()
    }

    pub fn has_builder(&self) -> bool {
        self.builder.is_some()
    }

    /// Runs `preset` against the held builder.
    ///
    /// # Errors
    /// `PacketError::BuilderMissing` when no builder is attached; otherwise
    /// whatever the builder's `build` returns.
    #[instrument(level = "debug", skip(self, preset, input), fields(preset = %preset))]
    pub fn build(&mut self, preset: Preset, input: &str) -> Result<Packet, PacketError> {
        let builder = self.builder.as_deref_mut().ok_or(PacketError::BuilderMissing)?;
        debug!(encoding = %builder.encoding(), "Running recipe");
        preset.apply(builder, input)
    }

    pub fn build_status_packet(&mut self, message: &str) -> Result<Packet, PacketError> {
        self.build(Preset::Status, message)
    }

    pub fn build_sensor_packet(&mut self, data: &str) -> Result<Packet, PacketError> {
        self.build(Preset::Sensor, data)
    }

    pub fn build_command_packet(&mut self, command: &str) -> Result<Packet, PacketError> {
        self.build(Preset::Command, command)
    }
}

impl fmt::Debug for PacketDirector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PacketDirector")
            .field("has_builder", &self.has_builder())
            .finish()
    }
}
