//! Frame encoder: turns a classic or FD frame descriptor into an escaped
//! wire buffer ready for the serial link.
//!
//! Wire layout (escaped fields marked `*`):
//!
//! ```text
//! START | len* | command* | id[0..4]* | flags* | channel* | data[..len]* | END
//! ```
use crate::core::{
    Command, RawFrame, CHANNEL_ESI, CHANNEL_MASK, END, FLAG_BRS, FLAG_EXTENDED, FLAG_FD,
    FLAG_REMOTE, START,
};
use crate::error::CodecError;
use crate::infra::codec::{dlc, stuffing};
use crate::protocol::config::LinkConfig;
use crate::protocol::transport::can_frame::{CanFrame, ClassicFrame, FdFrame};

//==================================================================================FRAME_WRITER
/// Accumulates the stuffed body of a frame (command onwards) and wraps it
/// with the literal markers and the length byte once complete.
#[derive(Debug, Clone)]
pub struct FrameWriter {
    body: RawFrame,
}

impl FrameWriter {
    /// Start a frame with the given command byte.
    pub fn new(command: Command) -> Result<Self, CodecError> {
        let mut writer = Self {
            body: RawFrame::new(),
        };
        writer.push_stuffed(command.code())?;
        Ok(writer)
    }

    /// Append one payload byte, escaping it when needed.
    #[inline]
    pub fn push_stuffed(&mut self, byte: u8) -> Result<(), CodecError> {
        self.body.extend_from_slice(stuffing::stuff(byte).as_slice())
    }

    /// Append payload bytes, escaping each of them when needed.
    pub fn extend_stuffed(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        bytes.iter().try_for_each(|&byte| self.push_stuffed(byte))
    }

    /// Emit `START`, the stuffed total length, the body and `END`.
    ///
    /// The length value counts the length field as one byte. If that value
    /// collides with a marker the field is escaped and the frame grows by one
    /// byte, which is re-checked against the capacity here.
    pub fn finish(self) -> Result<RawFrame, CodecError> {
        let total = 1 + 1 + self.body.len() + 1;
        let length = u8::try_from(total).map_err(|_| CodecError::BufferTooSmall {
            asked: total,
            available: u8::MAX as usize,
        })?;
        let length_field = stuffing::stuff(length);

        let wire_len = total - 1 + length_field.len();
        let mut frame = RawFrame::new();
        if wire_len > frame.capacity() {
            return Err(CodecError::BufferTooSmall {
                asked: wire_len,
                available: frame.capacity(),
            });
        }

        frame.push(START)?;
        frame.extend_from_slice(length_field.as_slice())?;
        frame.extend_from_slice(self.body.as_slice())?;
        frame.push(END)?;
        Ok(frame)
    }
}

//==================================================================================ENCODER
/// Stateless encoder bound to the adapter's channel count.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameEncoder {
    config: LinkConfig,
}

impl FrameEncoder {
    pub const fn new(config: LinkConfig) -> Self {
        Self { config }
    }

    /// Encode either kind of frame.
    pub fn encode(&self, frame: &CanFrame) -> Result<RawFrame, CodecError> {
        match frame {
            CanFrame::Classic(classic) => self.encode_classic(classic),
            CanFrame::Fd(fd) => self.encode_fd(fd),
        }
    }

    /// Encode a classic frame; the DLC code equals the length.
    pub fn encode_classic(&self, frame: &ClassicFrame) -> Result<RawFrame, CodecError> {
        let code = dlc::classic_code_from_length(frame.len)?;
        let channel = self.check_channel(frame.channel)?;

        let mut flags = code;
        if frame.id.is_extended() {
            flags |= FLAG_EXTENDED;
        }
        if frame.remote_request {
            flags |= FLAG_REMOTE;
        }

        write_data_frame(&frame.id.to_be_bytes(), flags, channel, frame.payload())
    }

    /// Encode an FD frame; the DLC code comes from the FD table and the
    /// error state indicator travels in the channel byte.
    pub fn encode_fd(&self, frame: &FdFrame) -> Result<RawFrame, CodecError> {
        let code = dlc::fd_code_from_length(frame.len)?;
        let mut channel = self.check_channel(frame.channel)?;

        let mut flags = code | FLAG_FD;
        if frame.id.is_extended() {
            flags |= FLAG_EXTENDED;
        }
        if frame.remote_request {
            flags |= FLAG_REMOTE;
        }
        if frame.bit_rate_switch {
            flags |= FLAG_BRS;
        }
        if frame.error_state_indicator {
            channel |= CHANNEL_ESI;
        }

        write_data_frame(&frame.id.to_be_bytes(), flags, channel, frame.payload())
    }

    fn check_channel(&self, channel: u8) -> Result<u8, CodecError> {
        if channel >= self.config.channel_count || channel > CHANNEL_MASK {
            return Err(CodecError::ChannelOutOfRange {
                channel,
                channel_count: self.config.channel_count,
            });
        }
        Ok(channel)
    }
}

fn write_data_frame(
    id: &[u8],
    flags: u8,
    channel: u8,
    payload: &[u8],
) -> Result<RawFrame, CodecError> {
    let mut writer = FrameWriter::new(Command::TxCan)?;
    writer.extend_stuffed(id)?;
    writer.push_stuffed(flags)?;
    writer.push_stuffed(channel)?;
    writer.extend_stuffed(payload)?;
    writer.finish()
}
