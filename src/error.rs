//! Error definitions shared across library modules.
//! `CodecError` covers every local validation failure of the codec and the
//! assembler; the generic wrappers add the transport's own error type.
use thiserror_no_std::Error;

//================================================================================CODEC_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Failures raised while encoding, decoding or reassembling frames.
pub enum CodecError {
    /// Length or DLC code has no mapping in the selected table.
    #[error("Invalid length: {len}")]
    InvalidLength { len: usize },
    /// Channel index exceeds the configured channel count.
    #[error("Channel {channel} out of range (channel count: {channel_count})")]
    ChannelOutOfRange { channel: u8, channel_count: u8 },
    /// Buffer is shorter than the header plus the declared payload.
    #[error("Truncated frame -> expected: {expected}, available: {available}")]
    TruncatedFrame { expected: usize, available: usize },
    /// More bytes arrived than the receive buffer can hold before a terminator.
    #[error("Receive buffer overflow (mtu: {mtu})")]
    Overflow { mtu: usize },
    /// Command byte matches none of the known commands.
    #[error("Unrecognized command: {command:#04X}")]
    UnrecognizedCommand { command: u8 },
    /// Decoded buffer does not begin with the start marker.
    #[error("Missing start marker, found {found:#04X}")]
    MissingStartMarker { found: u8 },
    /// Identifier does not fit in 11 (standard) or 29 (extended) bits.
    #[error("Invalid identifier: {raw:#010X}")]
    InvalidIdentifier { raw: u32 },
    /// Output buffer cannot hold the encoded frame.
    #[error("Buffer too small -> asked: {asked}, available: {available}")]
    BufferTooSmall { asked: usize, available: usize },
}

//==================================================================================SEND_ERROR
#[derive(Debug, Error)]
/// Errors encountered when sending a frame (encode + transmit).
pub enum SendFrameError<E: core::fmt::Debug> {
    /// Frame could not be encoded.
    #[error("Encoding failed: {0}")]
    Codec(CodecError),
    /// Serial link refused or failed to write the frame.
    #[error("Serial link send error: {0:?}")]
    Send(E),
}

impl<E: core::fmt::Debug> From<CodecError> for SendFrameError<E> {
    fn from(err: CodecError) -> Self {
        SendFrameError::Codec(err)
    }
}

//==================================================================================LINK_ERROR
#[derive(Debug, Error)]
/// Errors stopping the link runner.
pub enum LinkRunError<E: core::fmt::Debug> {
    /// Reading from the serial link failed.
    #[error("Serial link receive error: {0:?}")]
    Receive(E),
    /// Writing a queued frame failed.
    #[error("Serial link send error: {0:?}")]
    Send(SendFrameError<E>),
}
