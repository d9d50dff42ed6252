//! ## packetsmith-core::builder
//! **Step-wise packet assembly**
//!
//! `PacketBuilder` is the capability set a director drives. Setters only
//! stage values; `build` checks that every field was set, snapshots the
//! staged values into a [`Packet`] and clears the builder, so a builder can
//! be reused without leaking fields from one packet into the next.

use chrono::Utc;
use tracing::{debug, warn};

use crate::encoding::PayloadEncoding;
use crate::error::PacketError;
use crate::packet::{Packet, PacketDestination, PacketSource, PacketType};

pub trait PacketBuilder {
    /// Encoding applied by `set_payload`.
    fn encoding(&self) -> PayloadEncoding;

    fn set_type(&mut self, packet_type: PacketType);

    fn set_source(&mut self, source: PacketSource);

    fn set_destination(&mut self, destination: PacketDestination);

    /// Encodes `text` with the builder's policy and stages the result.
    fn set_payload(&mut self, text: &str);

    /// Discards every staged value.
    fn reset(&mut self);

    /// Builds a packet from the staged values.
    ///
    /// # Errors
    /// `PacketError::MissingField` names the first unset field (type, source,
    /// destination, payload). Staged values are kept on failure.
    fn build(&mut self) -> Result<Packet, PacketError>;
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Staged {
    packet_type: Option<PacketType>,
    source: Option<PacketSource>,
    destination: Option<PacketDestination>,
    payload: Option<String>,
}

impl Staged {
    fn first_missing(&self) -> Option<&'static str> {
        if self.packet_type.is_none() {
            Some("type")
        } else if self.source.is_none() {
            Some("source")
        } else if self.destination.is_none() {
            Some("destination")
        } else if self.payload.is_none() {
            Some("payload")
        } else {
            None
        }
    }
}

/// Builder whose payload policy is fixed at construction.
#[derive(Debug, Default, Clone)]
pub struct StandardPacketBuilder {
    encoding: PayloadEncoding,
    staged: Staged,
}

impl StandardPacketBuilder {
    pub fn new(encoding: PayloadEncoding) -> Self {
        Self {
            encoding,
            staged: Staged::default(),
        }
    }

    /// Plain-text builder: payloads are stored unchanged.
    pub fn text() -> Self {
        Self::new(PayloadEncoding::Identity)
    }

    /// Binary builder: payloads are stored Base64 encoded.
    pub fn binary() -> Self {
        Self::new(PayloadEncoding::Base64)
    }

    /// True when nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.staged == Staged::default()
    }
}

impl PacketBuilder for StandardPacketBuilder {
    fn encoding(&self) -> PayloadEncoding {
        self.encoding
    }

    fn set_type(&mut self, packet_type: PacketType) {
        self.staged.packet_type = Some(packet_type);
    }

    fn set_source(&mut self, source: PacketSource) {
        self.staged.source = Some(source);
    }

    fn set_destination(&mut self, destination: PacketDestination) {
        self.staged.destination = Some(destination);
    }

    fn set_payload(&mut self, text: &str) {
        self.staged.payload = Some(self.encoding.encode(text));
    }

    fn reset(&mut self) {
        self.staged = Staged::default();
    }

    fn build(&mut self) -> Result<Packet, PacketError> {
        let (packet_type, source, destination, payload) = match std::mem::take(&mut self.staged) {
            Staged {
                packet_type: Some(packet_type),
                source: Some(source),
                destination: Some(destination),
                payload: Some(payload),
            } => (packet_type, source, destination, payload),
            incomplete => {
                let field = incomplete.first_missing().unwrap_or("payload");
                self.staged = incomplete;
                warn!(field, encoding = %self.encoding, "Packet build rejected");
                return Err(PacketError::MissingField(field));
            }
        };

        let packet = Packet::new(packet_type, source, destination, payload, Utc::now());
        debug!(
            packet_type = %packet.packet_type(),
            source = %packet.source(),
            destination = %packet.destination(),
            encoding = %self.encoding,
            payload_len = packet.payload().len(),
            "Packet built"
        );
        Ok(packet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use proptest::prelude::*;
    use tracing_test::traced_test;

    fn fill(builder: &mut impl PacketBuilder, payload: &str) {
        builder.set_type(PacketType::Binary);
        builder.set_source(PacketSource::User);
        builder.set_destination(PacketDestination::Database);
        builder.set_payload(payload);
    }

    #[test]
    fn builds_from_staged_values() {
        let before = Utc::now();
        let mut builder = StandardPacketBuilder::text();
        fill(&mut builder, "hello");
        let packet = builder.build().unwrap();

        assert_eq!(packet.packet_type(), PacketType::Binary);
        assert_eq!(packet.source(), PacketSource::User);
        assert_eq!(packet.destination(), PacketDestination::Database);
        assert_eq!(packet.payload(), "hello");
        assert!(packet.created_at() >= before && packet.created_at() <= Utc::now());
    }

    #[test]
    fn last_write_wins() {
        let mut builder = StandardPacketBuilder::text();
        fill(&mut builder, "first");
        builder.set_type(PacketType::Command);
        builder.set_payload("second");
        let packet = builder.build().unwrap();
        assert_eq!(packet.packet_type(), PacketType::Command);
        assert_eq!(packet.payload(), "second");
    }

    #[test]
    fn binary_builder_encodes_payload() {
        let mut builder = StandardPacketBuilder::binary();
        fill(&mut builder, "Temperature=23.5");
        assert_eq!(builder.build().unwrap().payload(), "VGVtcGVyYXR1cmU9MjMuNQ==");
    }

    #[test]
    fn empty_payload_counts_as_set() {
        for mut builder in [StandardPacketBuilder::text(), StandardPacketBuilder::binary()] {
            fill(&mut builder, "");
            assert_eq!(builder.build().unwrap().payload(), "");
        }
    }

    #[test]
    fn reports_first_missing_field() {
        let mut builder = StandardPacketBuilder::text();
        assert_eq!(builder.build(), Err(PacketError::MissingField("type")));

        builder.set_type(PacketType::Text);
        builder.set_destination(PacketDestination::Server);
        assert_eq!(builder.build(), Err(PacketError::MissingField("source")));

        builder.set_source(PacketSource::System);
        assert_eq!(builder.build(), Err(PacketError::MissingField("payload")));
    }

    #[test]
    fn failed_build_keeps_staged_values() {
        let mut builder = StandardPacketBuilder::text();
        builder.set_type(PacketType::Text);
        builder.set_source(PacketSource::System);
        builder.set_destination(PacketDestination::Server);
        assert!(builder.build().is_err());

        builder.set_payload("retry");
        let packet = builder.build().unwrap();
        assert_eq!(packet.payload(), "retry");
    }

    #[test]
    fn successful_build_clears_builder() {
        let mut builder = StandardPacketBuilder::text();
        fill(&mut builder, "once");
        builder.build().unwrap();
        assert!(builder.is_empty());
        assert_eq!(builder.build(), Err(PacketError::MissingField("type")));
    }

    #[test]
    fn reset_discards_staged_values() {
        let mut builder = StandardPacketBuilder::binary();
        fill(&mut builder, "x");
        builder.reset();
        assert!(builder.is_empty());
        assert_eq!(builder.encoding(), PayloadEncoding::Base64);
    }

    #[test]
    fn works_through_trait_object() {
        let mut builder: Box<dyn PacketBuilder> = Box::new(StandardPacketBuilder::binary());
        builder.set_type(PacketType::Text);
        builder.set_source(PacketSource::Sensor);
        builder.set_destination(PacketDestination::Server);
        builder.set_payload("a");
        assert_eq!(builder.build().unwrap().payload(), "YQ==");
    }

    #[traced_test]
    #[test]
    fn logs_rejected_builds() {
        let mut builder = StandardPacketBuilder::text();
        let _ = builder.build();
        assert!(logs_contain("Packet build rejected"));
    }

    fn any_type() -> impl Strategy<Value = PacketType> {
        prop::sample::select(PacketType::ALL.to_vec())
    }

    fn any_source() -> impl Strategy<Value = PacketSource> {
        prop::sample::select(PacketSource::ALL.to_vec())
    }

    fn any_destination() -> impl Strategy<Value = PacketDestination> {
        prop::sample::select(PacketDestination::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn fields_are_independent(
            packet_type in any_type(),
            source in any_source(),
            destination in any_destination(),
            payload in any::<String>(),
        ) {
            let mut builder = StandardPacketBuilder::text();
            builder.set_payload(&payload);
            builder.set_destination(destination);
            builder.set_source(source);
            builder.set_type(packet_type);
            let packet = builder.build().unwrap();

            prop_assert_eq!(packet.packet_type(), packet_type);
            prop_assert_eq!(packet.source(), source);
            prop_assert_eq!(packet.destination(), destination);
            prop_assert_eq!(packet.payload(), payload.as_str());
        }

        #[test]
        fn set_payload_is_idempotent(payload in any::<String>()) {
            let mut once = StandardPacketBuilder::binary();
            fill(&mut once, &payload);

            let mut twice = StandardPacketBuilder::binary();
            fill(&mut twice, &payload);
            twice.set_payload(&payload);

            let (once, twice) = (once.build().unwrap(), twice.build().unwrap());
            prop_assert_eq!(once.payload(), twice.payload());
        }

        #[test]
        fn binary_payload_round_trips(payload in any::<String>()) {
            let mut builder = StandardPacketBuilder::binary();
            fill(&mut builder, &payload);
            let packet = builder.build().unwrap();
            let decoded = STANDARD.decode(packet.payload()).unwrap();
            prop_assert_eq!(String::from_utf8(decoded).unwrap(), payload);
        }
    }
}
