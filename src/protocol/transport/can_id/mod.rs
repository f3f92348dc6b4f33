//! CAN identifiers as carried by the adapter: four big-endian bytes on the
//! wire, with the standard/extended distinction kept in the flag byte.
use crate::core::ID_LEN;
use crate::error::CodecError;
use embedded_can::{ExtendedId, Id, StandardId};

//==================================================================================CAN_ID
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Range-checked 11-bit or 29-bit identifier.
pub struct CanId(pub Id);

impl CanId {
    /// Standard (11-bit) identifier. Fails when `raw` exceeds `0x7FF`.
    pub fn standard(raw: u16) -> Result<Self, CodecError> {
        StandardId::new(raw)
            .map(|id| CanId(Id::Standard(id)))
            .ok_or(CodecError::InvalidIdentifier { raw: raw as u32 })
    }

    /// Extended (29-bit) identifier. Fails when `raw` exceeds `0x1FFF_FFFF`.
    pub fn extended(raw: u32) -> Result<Self, CodecError> {
        ExtendedId::new(raw)
            .map(|id| CanId(Id::Extended(id)))
            .ok_or(CodecError::InvalidIdentifier { raw })
    }

    /// Rebuild an identifier from its raw value and the flag-byte width bit.
    pub fn from_raw(raw: u32, extended: bool) -> Result<Self, CodecError> {
        if extended {
            Self::extended(raw)
        } else {
            u16::try_from(raw)
                .map_err(|_| CodecError::InvalidIdentifier { raw })
                .and_then(Self::standard)
        }
    }

    /// Parse the four wire bytes (most significant first).
    pub fn from_be_bytes(bytes: [u8; ID_LEN], extended: bool) -> Result<Self, CodecError> {
        Self::from_raw(u32::from_be_bytes(bytes), extended)
    }

    /// Numeric value without the width flag.
    pub fn raw(&self) -> u32 {
        match self.0 {
            Id::Standard(id) => id.as_raw() as u32,
            Id::Extended(id) => id.as_raw(),
        }
    }

    /// `true` for 29-bit identifiers.
    pub fn is_extended(&self) -> bool {
        matches!(self.0, Id::Extended(_))
    }

    /// Four wire bytes, most significant first.
    pub fn to_be_bytes(&self) -> [u8; ID_LEN] {
        self.raw().to_be_bytes()
    }
}

impl From<Id> for CanId {
    fn from(id: Id) -> Self {
        CanId(id)
    }
}

impl From<StandardId> for CanId {
    fn from(id: StandardId) -> Self {
        CanId(Id::Standard(id))
    }
}

impl From<ExtendedId> for CanId {
    fn from(id: ExtendedId) -> Self {
        CanId(Id::Extended(id))
    }
}

impl From<CanId> for Id {
    fn from(id: CanId) -> Self {
        id.0
    }
}
