//! Host-to-device control messages (settings, timestamps, firmware query).
//!
//! They share the data-frame framing: `START`, stuffed length, stuffed
//! command, stuffed payload, `END`. Payload layouts are fixed by the adapter
//! firmware; multi-byte values are big-endian.
use crate::core::{Command, RawFrame};
use crate::error::CodecError;
use crate::protocol::transport::framing::encoder::FrameWriter;

/// Port index the firmware uses for its CAN-FD channel.
pub const FD_PORT: u8 = 3;

//==================================================================================SPEED
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Classic CAN bit rates understood by `SETTINGS`; the wire value is the
/// rate in kbit/s (rounded down), `User` selects custom bit timing.
pub enum CanSpeed {
    User,
    Kbps10,
    Kbps20,
    Kbps33,
    Kbps50,
    Kbps62,
    Kbps83,
    Kbps100,
    Kbps125,
    Kbps250,
    Kbps500,
    Mbps1,
}

impl CanSpeed {
    /// Wire value of the bit rate.
    pub const fn code(self) -> u16 {
        match self {
            CanSpeed::User => 0,
            CanSpeed::Kbps10 => 10,
            CanSpeed::Kbps20 => 20,
            CanSpeed::Kbps33 => 33,
            CanSpeed::Kbps50 => 50,
            CanSpeed::Kbps62 => 62,
            CanSpeed::Kbps83 => 83,
            CanSpeed::Kbps100 => 100,
            CanSpeed::Kbps125 => 125,
            CanSpeed::Kbps250 => 250,
            CanSpeed::Kbps500 => 500,
            CanSpeed::Mbps1 => 1000,
        }
    }
}

//==================================================================================COMMANDS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Control messages the host can send to the adapter.
pub enum ControlCommand<'a> {
    /// Ask for the firmware version; the reply decodes as
    /// [`ControlTag::FirmwareVersion`](crate::protocol::transport::can_frame::ControlTag).
    FirmwareVersionRequest,
    /// Classic bit rate of one port.
    CanSettings {
        port: u8,
        speed: CanSpeed,
        listen_only: bool,
    },
    /// Nominal/data bit rate pair of the FD port, as the firmware's combined
    /// code (e.g. `5_002_000` for 500 kbit/s nominal, 2 Mbit/s data).
    FdSettings {
        port: u8,
        speed_code: u32,
        listen_only: bool,
        iso_crc: bool,
        esi: bool,
    },
    /// Enable or disable device timestamps on received frames.
    TimestampMode(bool),
    /// Raw bit-timing parameters, passed through unchanged.
    BitTiming { port: u8, params: &'a [u8] },
    SpeedUp,
    SpeedDown,
    Marker,
}

impl ControlCommand<'_> {
    /// Command byte used on the wire.
    pub const fn command(&self) -> Command {
        match self {
            ControlCommand::FirmwareVersionRequest => Command::FirmwareVersion,
            ControlCommand::CanSettings { .. } | ControlCommand::FdSettings { .. } => {
                Command::Settings
            }
            ControlCommand::TimestampMode(_) => Command::Timestamp,
            ControlCommand::BitTiming { .. } => Command::BitTiming,
            ControlCommand::SpeedUp => Command::SpeedUp,
            ControlCommand::SpeedDown => Command::SpeedDown,
            ControlCommand::Marker => Command::Marker,
        }
    }

    /// Build the escaped wire frame.
    pub fn encode(&self) -> Result<RawFrame, CodecError> {
        let mut writer = FrameWriter::new(self.command())?;
        match *self {
            ControlCommand::CanSettings {
                port,
                speed,
                listen_only,
            } => {
                writer.push_stuffed(port)?;
                writer.extend_stuffed(&speed.code().to_be_bytes())?;
                writer.push_stuffed(listen_only as u8)?;
            }
            ControlCommand::FdSettings {
                port,
                speed_code,
                listen_only,
                iso_crc,
                esi,
            } => {
                writer.push_stuffed(port)?;
                writer.extend_stuffed(&speed_code.to_be_bytes())?;
                writer.push_stuffed(listen_only as u8)?;
                writer.push_stuffed(iso_crc as u8)?;
                writer.push_stuffed(esi as u8)?;
            }
            ControlCommand::TimestampMode(enabled) => writer.push_stuffed(enabled as u8)?,
            ControlCommand::BitTiming { port, params } => {
                writer.push_stuffed(port)?;
                writer.extend_stuffed(params)?;
            }
            ControlCommand::FirmwareVersionRequest
            | ControlCommand::SpeedUp
            | ControlCommand::SpeedDown
            | ControlCommand::Marker => {}
        }
        writer.finish()
    }
}

/// Frame an arbitrary command with an unescaped payload.
pub fn encode_command(command: Command, payload: &[u8]) -> Result<RawFrame, CodecError> {
    let mut writer = FrameWriter::new(command)?;
    writer.extend_stuffed(payload)?;
    writer.finish()
}
