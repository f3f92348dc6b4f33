//! In-memory representation of the frames exchanged with the adapter:
//! classic CAN, CAN-FD, and the control replies recognised by the decoder.
use crate::core::{CLASSIC_MAX_DATA, FD_MAX_DATA};
use crate::error::CodecError;
use crate::infra::codec::dlc;
use crate::protocol::transport::can_id::CanId;

//==================================================================================CLASSIC
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Classic CAN 2.0 frame (up to eight data bytes).
pub struct ClassicFrame {
    /// 0-based adapter port.
    pub channel: u8,
    /// Identifier; its width selects the extended flag on the wire.
    pub id: CanId,
    /// Remote transmission request.
    pub remote_request: bool,
    /// Payload buffer; only the first `len` bytes are meaningful.
    pub data: [u8; CLASSIC_MAX_DATA],
    /// Number of valid payload bytes (equal to the DLC code, 0 to 8).
    pub len: usize,
}

impl ClassicFrame {
    /// Data frame on channel 0. Fails when `data` exceeds eight bytes.
    pub fn new(id: impl Into<CanId>, data: &[u8]) -> Result<Self, CodecError> {
        dlc::classic_code_from_length(data.len())?;
        let mut buffer = [0; CLASSIC_MAX_DATA];
        buffer[..data.len()].copy_from_slice(data);
        Ok(Self {
            channel: 0,
            id: id.into(),
            remote_request: false,
            data: buffer,
            len: data.len(),
        })
    }

    /// Remote frame requesting `len` bytes; the data field is zero-filled.
    pub fn new_remote(id: impl Into<CanId>, len: usize) -> Result<Self, CodecError> {
        dlc::classic_code_from_length(len)?;
        Ok(Self {
            channel: 0,
            id: id.into(),
            remote_request: true,
            data: [0; CLASSIC_MAX_DATA],
            len,
        })
    }

    /// Move the frame to another adapter port.
    pub fn on_channel(mut self, channel: u8) -> Self {
        self.channel = channel;
        self
    }

    /// Valid payload bytes.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.len]
    }
}

impl embedded_can::Frame for ClassicFrame {
    fn new(id: impl Into<embedded_can::Id>, data: &[u8]) -> Option<Self> {
        ClassicFrame::new(CanId(id.into()), data).ok()
    }

    fn new_remote(id: impl Into<embedded_can::Id>, dlc: usize) -> Option<Self> {
        ClassicFrame::new_remote(CanId(id.into()), dlc).ok()
    }

    fn is_extended(&self) -> bool {
        self.id.is_extended()
    }

    fn is_remote_frame(&self) -> bool {
        self.remote_request
    }

    fn id(&self) -> embedded_can::Id {
        self.id.0
    }

    fn dlc(&self) -> usize {
        self.len
    }

    fn data(&self) -> &[u8] {
        self.payload()
    }
}

//==================================================================================FD
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// CAN-FD frame (up to 64 data bytes, nonlinear DLC).
pub struct FdFrame {
    /// 0-based adapter port.
    pub channel: u8,
    pub id: CanId,
    pub remote_request: bool,
    /// Data phase uses the faster bit rate.
    pub bit_rate_switch: bool,
    /// Transmitter is error passive.
    pub error_state_indicator: bool,
    /// Payload buffer; only the first `len` bytes are meaningful.
    pub data: [u8; FD_MAX_DATA],
    /// One of 0..=8, 12, 16, 20, 24, 32, 48, 64.
    pub len: usize,
}

impl FdFrame {
    /// FD data frame on channel 0. `data.len()` must be a valid FD length.
    pub fn new(id: impl Into<CanId>, data: &[u8]) -> Result<Self, CodecError> {
        dlc::fd_code_from_length(data.len())?;
        let mut buffer = [0; FD_MAX_DATA];
        buffer[..data.len()].copy_from_slice(data);
        Ok(Self {
            channel: 0,
            id: id.into(),
            remote_request: false,
            bit_rate_switch: false,
            error_state_indicator: false,
            data: buffer,
            len: data.len(),
        })
    }

    /// FD data frame whose length is rounded up to the next table entry,
    /// padding with `padding`.
    pub fn new_padded(id: impl Into<CanId>, data: &[u8], padding: u8) -> Result<Self, CodecError> {
        let len = dlc::fd_padded_length(data.len())
            .ok_or(CodecError::InvalidLength { len: data.len() })?;
        let mut buffer = [padding; FD_MAX_DATA];
        buffer[..data.len()].copy_from_slice(data);
        Self::new(id, &buffer[..len])
    }

    /// Remote FD frame; the data field is zero-filled.
    pub fn new_remote(id: impl Into<CanId>, len: usize) -> Result<Self, CodecError> {
        dlc::fd_code_from_length(len)?;
        Ok(Self {
            channel: 0,
            id: id.into(),
            remote_request: true,
            bit_rate_switch: false,
            error_state_indicator: false,
            data: [0; FD_MAX_DATA],
            len,
        })
    }

    /// Move the frame to another adapter port.
    pub fn on_channel(mut self, channel: u8) -> Self {
        self.channel = channel;
        self
    }

    /// Set the bit rate switch flag.
    pub fn with_bit_rate_switch(mut self, brs: bool) -> Self {
        self.bit_rate_switch = brs;
        self
    }

    /// Set the error state indicator flag.
    pub fn with_error_state_indicator(mut self, esi: bool) -> Self {
        self.error_state_indicator = esi;
        self
    }

    /// Valid payload bytes.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.len]
    }
}

//==================================================================================ENUMS
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Either kind of data frame. The flag byte FD bit selects the variant on the wire.
pub enum CanFrame {
    Classic(ClassicFrame),
    Fd(FdFrame),
}

impl CanFrame {
    pub fn channel(&self) -> u8 {
        match self {
            CanFrame::Classic(frame) => frame.channel,
            CanFrame::Fd(frame) => frame.channel,
        }
    }

    pub fn id(&self) -> CanId {
        match self {
            CanFrame::Classic(frame) => frame.id,
            CanFrame::Fd(frame) => frame.id,
        }
    }

    pub fn payload(&self) -> &[u8] {
        match self {
            CanFrame::Classic(frame) => frame.payload(),
            CanFrame::Fd(frame) => frame.payload(),
        }
    }

    pub fn is_fd(&self) -> bool {
        matches!(self, CanFrame::Fd(_))
    }
}

impl From<ClassicFrame> for CanFrame {
    fn from(frame: ClassicFrame) -> Self {
        CanFrame::Classic(frame)
    }
}

impl From<FdFrame> for CanFrame {
    fn from(frame: FdFrame) -> Self {
        CanFrame::Fd(frame)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Control replies identified by the decoder; their body is left to the caller.
pub enum ControlTag {
    Status,
    FirmwareVersion,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Result of decoding one complete frame.
pub enum Decoded {
    Frame(CanFrame),
    Control(ControlTag),
}
