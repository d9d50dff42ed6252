//! ## packetsmith-core::packet
//! The immutable record produced by a builder, plus its three enumerated
//! header fields.
//!
//! A `Packet` has no public constructor and no setters: `PacketBuilder::build`
//! is the only writer.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PacketError;

/// Lowercases and drops `-`/`_` so `local-storage`, `Local_Storage` and
/// `localstorage` all compare equal.
fn normalize(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Kind of content carried in the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PacketType {
    #[default]
    Text,
    Binary,
    Command,
}

/// Originator of a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PacketSource {
    #[default]
    Sensor,
    User,
    System,
}

/// Where a packet is headed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PacketDestination {
    #[default]
    Server,
    Database,
    LocalStorage,
}

impl PacketType {
    pub const ALL: [PacketType; 3] = [
        PacketType::Text,
        PacketType::Binary,
        PacketType::Command,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PacketType::Text => "Text",
            PacketType::Binary => "Binary",
            PacketType::Command => "Command",
        }
    }
}

impl PacketSource {
    pub const ALL: [PacketSource; 3] = [
        PacketSource::Sensor,
        PacketSource::User,
        PacketSource::System,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PacketSource::Sensor => "Sensor",
            PacketSource::User => "User",
            PacketSource::System => "System",
        }
    }
}

impl PacketDestination {
    pub const ALL: [PacketDestination; 3] = [
        PacketDestination::Server,
        PacketDestination::Database,
        PacketDestination::LocalStorage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PacketDestination::Server => "Server",
            PacketDestination::Database => "Database",
            PacketDestination::LocalStorage => "LocalStorage",
        }
    }
}

macro_rules! impl_name_traits {
    ($ty:ty, $kind:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = PacketError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = normalize(s);
                <$ty>::ALL
                    .into_iter()
                    .find(|v| normalize(v.as_str()) == wanted)
                    .ok_or_else(|| PacketError::unknown($kind, s))
            }
        }
    };
}

impl_name_traits!(PacketType, "packet type");
impl_name_traits!(PacketSource, "packet source");
impl_name_traits!(PacketDestination, "packet destination");

/// A fully built packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Packet {
    #[serde(rename = "type")]
    packet_type: PacketType,
    source: PacketSource,
    destination: PacketDestination,
    payload: String,
    created_at: DateTime<Utc>,
}

impl Packet {
    pub(crate) fn new(
        packet_type: PacketType,
        source: PacketSource,
        destination: PacketDestination,
        payload: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            packet_type,
            source,
            destination,
            payload,
            created_at,
        }
    }

    pub fn packet_type(&self) -> PacketType {
        self.packet_type
    }

    pub fn source(&self) -> PacketSource {
        self.source
    }

    pub fn destination(&self) -> PacketDestination {
        self.destination
    }

    /// The stored payload, already passed through the builder's encoding.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Packet:")?;
        writeln!(f, "  Type: {}", self.packet_type)?;
        writeln!(f, "  Source: {}", self.source)?;
        writeln!(f, "  Destination: {}", self.destination)?;
        writeln!(f, "  Payload: {}", self.payload)?;
        write!(
            f,
            "  Created At: {}",
            self.created_at.to_rfc3339_opts(SecondsFormat::Millis, true)
        )
    }
}
