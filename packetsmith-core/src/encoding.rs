//! ## packetsmith-core::encoding
//! Payload encoding policy applied by a builder before a payload is stored.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::PacketError;

/// How raw payload text is turned into the stored payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadEncoding {
    /// Stored as given.
    #[default]
    #[serde(alias = "plain")]
    Identity,
    /// Standard-alphabet, padded Base64 of the UTF-8 bytes.
    #[serde(alias = "binary")]
    Base64,
}

impl PayloadEncoding {
    /// Encodes `input`. Total: every string has an encoding.
    pub fn encode(&self, input: &str) -> String {
        match self {
            PayloadEncoding::Identity => input.to_owned(),
            PayloadEncoding::Base64 => STANDARD.encode(input.as_bytes()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PayloadEncoding::Identity => "identity",
            PayloadEncoding::Base64 => "base64",
        }
    }
}

impl fmt::Display for PayloadEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayloadEncoding {
    type Err = PacketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "identity" | "plain" => Ok(PayloadEncoding::Identity),
            "base64" | "binary" => Ok(PayloadEncoding::Base64),
            _ => Err(PacketError::unknown("payload encoding", s)),
        }
    }
}
