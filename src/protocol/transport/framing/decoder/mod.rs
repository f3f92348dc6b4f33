//! Frame decoder: parses one complete, unescaped frame into a CAN frame
//! descriptor or a control tag.
use crate::core::{
    Command, RawFrame, CHANNEL_ESI, CHANNEL_MASK, CHANNEL_OFFSET, COMMAND_OFFSET, DATA_OFFSET,
    END, FD_MAX_DATA, FLAGS_OFFSET, FLAG_BRS, FLAG_DLC_MASK, FLAG_EXTENDED, FLAG_FD, FLAG_REMOTE,
    HEADER_LEN, ID_OFFSET, START,
};
use crate::error::CodecError;
use crate::infra::codec::dlc;
use crate::protocol::transport::can_frame::{
    CanFrame, ClassicFrame, ControlTag, Decoded, FdFrame,
};
use crate::protocol::transport::can_id::CanId;

//==================================================================================DECODE
/// Decode an unescaped frame (`START`, length, command, ...).
///
/// `STATUS` and `FW_VERSION` replies stop at the command byte. `TX_CAN` and
/// `TX_CAN_TIMESTAMPED` are parsed as data frames; any other command is
/// reported as [`CodecError::UnrecognizedCommand`].
pub fn decode(unstuffed: &[u8]) -> Result<Decoded, CodecError> {
    if unstuffed.len() <= COMMAND_OFFSET {
        return Err(CodecError::TruncatedFrame {
            expected: COMMAND_OFFSET + 1,
            available: unstuffed.len(),
        });
    }
    if unstuffed[0] != START {
        return Err(CodecError::MissingStartMarker {
            found: unstuffed[0],
        });
    }

    match Command::try_from(unstuffed[COMMAND_OFFSET])? {
        Command::Status => Ok(Decoded::Control(ControlTag::Status)),
        Command::FirmwareVersion => Ok(Decoded::Control(ControlTag::FirmwareVersion)),
        Command::TxCan | Command::TxCanTimestamped => decode_data_frame(unstuffed).map(Decoded::Frame),
        other => {
            #[cfg(feature = "defmt")]
            defmt::debug!("Unexpected command from device: {}", other);
            Err(CodecError::UnrecognizedCommand {
                command: other.code(),
            })
        }
    }
}

/// Unescape `escaped` and decode the result.
pub fn decode_raw(escaped: &[u8]) -> Result<Decoded, CodecError> {
    let raw = RawFrame::from_slice(escaped)?;
    decode(raw.unstuffed().as_slice())
}

/// Body of an unescaped control frame: the bytes after the command byte,
/// without the trailing `END`.
pub fn control_payload(unstuffed: &[u8]) -> &[u8] {
    let body_start = COMMAND_OFFSET + 1;
    if unstuffed.len() <= body_start {
        return &[];
    }
    let body_end = match unstuffed.last() {
        Some(&END) => unstuffed.len() - 1,
        _ => unstuffed.len(),
    };
    &unstuffed[body_start..body_end]
}

//==================================================================================DATA_FRAME
fn decode_data_frame(bytes: &[u8]) -> Result<CanFrame, CodecError> {
    if bytes.len() < HEADER_LEN {
        return Err(CodecError::TruncatedFrame {
            expected: HEADER_LEN,
            available: bytes.len(),
        });
    }

    let flags = bytes[FLAGS_OFFSET];
    let channel_byte = bytes[CHANNEL_OFFSET];
    let extended = flags & FLAG_EXTENDED != 0;
    let remote_request = flags & FLAG_REMOTE != 0;
    let is_fd = flags & FLAG_FD != 0;

    let len = if is_fd {
        dlc::fd_length_from_code(flags & FLAG_DLC_MASK)
    } else {
        dlc::classic_length_from_code(flags & FLAG_DLC_MASK)?
    };
    if bytes.len() < HEADER_LEN + len {
        return Err(CodecError::TruncatedFrame {
            expected: HEADER_LEN + len,
            available: bytes.len(),
        });
    }

    let id = CanId::from_be_bytes(
        [
            bytes[ID_OFFSET],
            bytes[ID_OFFSET + 1],
            bytes[ID_OFFSET + 2],
            bytes[ID_OFFSET + 3],
        ],
        extended,
    )?;
    let channel = channel_byte & CHANNEL_MASK;
    let payload = &bytes[DATA_OFFSET..DATA_OFFSET + len];

    if is_fd {
        let mut data = [0; FD_MAX_DATA];
        data[..len].copy_from_slice(payload);
        Ok(CanFrame::Fd(FdFrame {
            channel,
            id,
            remote_request,
            bit_rate_switch: flags & FLAG_BRS != 0,
            error_state_indicator: channel_byte & CHANNEL_ESI != 0,
            data,
            len,
        }))
    } else {
        let mut frame = if remote_request {
            ClassicFrame::new_remote(id, len)?
        } else {
            ClassicFrame::new(id, payload)?
        };
        frame.data[..len].copy_from_slice(payload);
        Ok(CanFrame::Classic(frame.on_channel(channel)))
    }
}
