//! Builder defaults used when a caller does not pick an encoding itself.

use packetsmith_core::PayloadEncoding;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Default, Debug, Serialize, Deserialize, Validate, Clone, PartialEq, Eq)]
pub struct BuilderConfig {
    /// Payload encoding for manually assembled packets (identity or base64).
    #[serde(default)]
    pub encoding: PayloadEncoding,
}
