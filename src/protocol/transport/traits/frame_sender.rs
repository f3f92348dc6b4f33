//! `SerialLink` extension providing a high-level API to send CAN frames and
//! control messages: it encodes the request and writes the escaped frame in
//! a single call.
use crate::{
    error::SendFrameError,
    protocol::transport::can_frame::CanFrame,
    protocol::transport::framing::{commands::ControlCommand, encoder::FrameEncoder},
    protocol::transport::traits::serial_link::SerialLink,
};

/// Trait extending `SerialLink` with frame-level helpers.
pub trait FrameSender: SerialLink {
    /// Encode `frame` with `encoder` and write it to the link.
    ///
    /// # Errors
    ///
    /// - [`SendFrameError::Codec`] when the frame cannot be encoded
    ///   (bad length, channel out of range)
    /// - [`SendFrameError::Send`] when the link write fails
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use triplecan::protocol::transport::traits::frame_sender::FrameSender;
    ///
    /// let frame = ClassicFrame::new(CanId::standard(0x123)?, &[1, 2])?.on_channel(1);
    /// serial.send_frame(&encoder, &frame.into()).await?;
    /// ```
    fn send_frame<'a>(
        &'a mut self,
        encoder: &'a FrameEncoder,
        frame: &'a CanFrame,
    ) -> impl core::future::Future<Output = Result<(), SendFrameError<Self::Error>>> + 'a;

    /// Encode a control message and write it to the link.
    fn send_command<'a>(
        &'a mut self,
        command: &'a ControlCommand<'a>,
    ) -> impl core::future::Future<Output = Result<(), SendFrameError<Self::Error>>> + 'a;
}

impl<S: SerialLink> FrameSender for S {
    fn send_frame<'a>(
        &'a mut self,
        encoder: &'a FrameEncoder,
        frame: &'a CanFrame,
    ) -> impl core::future::Future<Output = Result<(), SendFrameError<Self::Error>>> + 'a {
        async move {
            let raw = encoder.encode(frame)?;
            self.write(raw.as_slice()).await.map_err(SendFrameError::Send)
        }
    }

    fn send_command<'a>(
        &'a mut self,
        command: &'a ControlCommand<'a>,
    ) -> impl core::future::Future<Output = Result<(), SendFrameError<Self::Error>>> + 'a {
        async move {
            let raw = command.encode()?;
            self.write(raw.as_slice()).await.map_err(SendFrameError::Send)
        }
    }
}
