//! # packetsmith-core
//!
//! Construction protocol for immutable [`Packet`] records.
//!
//! ### Key Submodules:
//! - `packet`: the built record and its enumerated fields
//! - `encoding`: payload encoding policy (identity or Base64)
//! - `builder`: the `PacketBuilder` capability set and its standard implementation
//! - `director`: named recipes that drive a builder through a fixed sequence
//!
//! ```
//! use packetsmith_core::prelude::*;
//!
//! let mut builder = StandardPacketBuilder::binary();
//! let packet = build_sensor_packet(&mut builder, "Temperature=23.5").unwrap();
//! assert_eq!(packet.payload(), "VGVtcGVyYXR1cmU9MjMuNQ==");
//! ```

pub mod builder;
pub mod director;
pub mod encoding;
pub mod error;
pub mod packet;

pub mod prelude {
    pub use crate::builder::*;
    pub use crate::director::*;
    pub use crate::encoding::*;
    pub use crate::error::*;
    pub use crate::packet::*;
}

pub use builder::{PacketBuilder, StandardPacketBuilder};
pub use director::{PacketDirector, Preset};
pub use encoding::PayloadEncoding;
pub use error::PacketError;
pub use packet::{Packet, PacketDestination, PacketSource, PacketType};
