use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PacketError {
    #[error("Required packet field not set: {0}")]
    MissingField(&'static str),

    #[error("Director has no builder attached")]
    BuilderMissing,

    #[error("Unknown {kind} '{value}'")]
    UnknownVariant { kind: &'static str, value: String },
}

impl PacketError {
    pub(crate) fn unknown(kind: &'static str, value: &str) -> Self {
        PacketError::UnknownVariant {
            kind,
            value: value.to_string(),
        }
    }
}
