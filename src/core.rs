//! Wire-level vocabulary shared by the codec and the transport layer:
//! frame markers, command codes, fixed offsets, and the `RawFrame` buffer
//! exchanged with the serial collaborator.
use crate::error::CodecError;

//==================================================================================MARKERS
/// Literal first byte of every frame. Never escaped at position 0.
pub const START: u8 = 0x0F;
/// Literal last byte of every frame. Never escaped at the terminator position.
pub const END: u8 = 0xEF;
/// Escape marker inserted before any payload byte equal to a marker.
pub const ESCAPE: u8 = 0x1F;

//==================================================================================LAYOUT
/// Number of identifier bytes on the wire (big-endian).
pub const ID_LEN: usize = 4;
/// Offset of the command byte inside an unescaped frame.
pub const COMMAND_OFFSET: usize = 2;
/// Offset of the first identifier byte inside an unescaped frame.
pub const ID_OFFSET: usize = 3;
/// Offset of the flag/DLC byte inside an unescaped frame.
pub const FLAGS_OFFSET: usize = 7;
/// Offset of the channel byte inside an unescaped frame.
pub const CHANNEL_OFFSET: usize = 8;
/// Offset of the first data byte inside an unescaped frame.
pub const DATA_OFFSET: usize = 9;
/// Fixed header length of an unescaped data frame (everything before the data).
pub const HEADER_LEN: usize = DATA_OFFSET;

/// Largest data field carried by a classic CAN frame.
pub const CLASSIC_MAX_DATA: usize = 8;
/// Largest data field carried by a CAN-FD frame.
pub const FD_MAX_DATA: usize = 64;

/// Worst-case escaped size of a data frame: `START`, a stuffed length byte,
/// the command, every header field and 64 data bytes escaped, then `END`.
pub const MAX_RAW_FRAME_LEN: usize = 1 + 2 + 1 + 2 * (ID_LEN + 2 + FD_MAX_DATA) + 1;

/// Receive buffer size used by the historical adapter firmware.
///
/// Large enough for any classic frame and for FD frames with moderate
/// escaping, but not for a fully escaped 64-byte FD frame.
pub const LEGACY_MTU: usize = 100;

//==================================================================================FLAGS
/// Flag byte bit 7: extended (29-bit) identifier.
pub const FLAG_EXTENDED: u8 = 0x80;
/// Flag byte bit 6: remote transmission request.
pub const FLAG_REMOTE: u8 = 0x40;
/// Flag byte bit 5: CAN-FD frame.
pub const FLAG_FD: u8 = 0x20;
/// Flag byte bit 4: bit rate switch (FD only).
pub const FLAG_BRS: u8 = 0x10;
/// Flag byte low nibble: DLC code.
pub const FLAG_DLC_MASK: u8 = 0x0F;

/// Channel byte bit 7: error state indicator (FD only).
pub const CHANNEL_ESI: u8 = 0x80;
/// Channel byte bits 0..6: 0-based channel index.
pub const CHANNEL_MASK: u8 = 0x7F;

//==================================================================================COMMANDS
/// Command codes understood by the adapter (byte at [`COMMAND_OFFSET`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Command {
    /// CAN or CAN-FD data frame (both directions).
    TxCan = 0x81,
    /// Data frame carrying a device timestamp (device → host).
    TxCanTimestamped = 0x82,
    Marker = 0x87,
    /// Port bitrate configuration.
    Settings = 0x88,
    /// Raw bit-timing parameters.
    BitTiming = 0x89,
    /// Device status report.
    Status = 0x8A,
    /// Timestamp mode toggle.
    Timestamp = 0x8B,
    /// Firmware version request/response.
    FirmwareVersion = 0x90,
    SpeedDown = 0x91,
    SpeedUp = 0x92,
}

impl Command {
    /// Wire value of the command.
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Command {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x81 => Ok(Command::TxCan),
            0x82 => Ok(Command::TxCanTimestamped),
            0x87 => Ok(Command::Marker),
            0x88 => Ok(Command::Settings),
            0x89 => Ok(Command::BitTiming),
            0x8A => Ok(Command::Status),
            0x8B => Ok(Command::Timestamp),
            0x90 => Ok(Command::FirmwareVersion),
            0x91 => Ok(Command::SpeedDown),
            0x92 => Ok(Command::SpeedUp),
            command => Err(CodecError::UnrecognizedCommand { command }),
        }
    }
}

//==================================================================================RAW_FRAME
/// Bounded byte buffer holding one frame as exchanged with the transport.
///
/// Depending on where it comes from the content is either still escaped
/// (encoder output, assembler output) or already unescaped (see
/// [`RawFrame::unstuffed`]).
#[derive(Debug, Clone, Copy)]
pub struct RawFrame {
    len: usize,
    data: [u8; MAX_RAW_FRAME_LEN],
}

impl Default for RawFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl RawFrame {
    /// Create an empty buffer.
    pub const fn new() -> Self {
        Self {
            len: 0,
            data: [0; MAX_RAW_FRAME_LEN],
        }
    }

    /// Build a frame from a byte slice.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut frame = Self::new();
        frame.extend_from_slice(bytes)?;
        Ok(frame)
    }

    /// Number of valid bytes stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Checks whether the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total capacity in bytes.
    #[inline]
    pub const fn capacity(&self) -> usize {
        MAX_RAW_FRAME_LEN
    }

    /// Reset the buffer.
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Append one byte as-is.
    #[inline]
    pub fn push(&mut self, byte: u8) -> Result<(), CodecError> {
        if self.len >= MAX_RAW_FRAME_LEN {
            return Err(CodecError::BufferTooSmall {
                asked: self.len + 1,
                available: MAX_RAW_FRAME_LEN,
            });
        }
        self.data[self.len] = byte;
        self.len += 1;
        Ok(())
    }

    /// Append a slice as-is.
    pub fn extend_from_slice(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        let end = self.len + bytes.len();
        if end > MAX_RAW_FRAME_LEN {
            return Err(CodecError::BufferTooSmall {
                asked: end,
                available: MAX_RAW_FRAME_LEN,
            });
        }
        self.data[self.len..end].copy_from_slice(bytes);
        self.len = end;
        Ok(())
    }

    /// Immutable view over the populated bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Mutable view over the populated bytes.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data[..self.len]
    }

    /// Return a copy with the byte stuffing removed.
    pub fn unstuffed(&self) -> RawFrame {
        let mut copy = *self;
        copy.len = crate::infra::codec::stuffing::unstuff_in_place(copy.as_mut_slice());
        copy
    }
}

impl PartialEq for RawFrame {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for RawFrame {}

impl AsRef<[u8]> for RawFrame {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}
