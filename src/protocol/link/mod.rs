//! Link service built on top of [`FrameAssembler`] and [`FrameEncoder`].
//!
//! One runner owns the serial connection and its receive accumulator, which
//! keeps byte delivery single-consumer. It optionally offers:
//!
//! * a transmission handle (`LinkHandle`) to queue frames and control messages;
//! * a receiver (`LinkFrames`) to pull decoded frames and control replies.
//!
//! Firmware decides which features it needs by providing pre-allocated
//! [`embassy_sync::channel::Channel`] instances. No allocation is performed by
//! the library and there is no dependency on a particular BSP.

use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    channel::{Channel, Receiver, Sender},
};
use futures_util::{future::select, future::Either, pin_mut};

use crate::core::RawFrame;
use crate::error::{CodecError, LinkRunError, SendFrameError};
use crate::protocol::config::LinkConfig;
use crate::protocol::transport::can_frame::{CanFrame, Decoded};
use crate::protocol::transport::framing::assembler::{FrameAssembler, ProcessResult};
use crate::protocol::transport::framing::commands::ControlCommand;
use crate::protocol::transport::framing::encoder::FrameEncoder;
use crate::protocol::transport::traits::link_observer::{LinkObserver, NoopObserver};
use crate::protocol::transport::traits::serial_link::SerialLink;

/// Bytes requested from the serial link per read.
pub const RX_CHUNK_LEN: usize = 64;

/// Requests queued by producer tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkCommand {
    /// Escaped frame ready for the wire.
    Transmit(RawFrame),
    /// Drop any partially received frame, e.g. after a bit rate change.
    ResetReceiver,
}

/// Channel type carrying [`LinkCommand`]s to the runner.
pub type CommandChannel<const CAP: usize> = Channel<CriticalSectionRawMutex, LinkCommand, CAP>;
/// Channel type carrying decoded items out of the runner.
pub type FrameChannel<const CAP: usize> = Channel<CriticalSectionRawMutex, Decoded, CAP>;

//==================================================================================SERVICE
/// Service assembling the link components.
pub struct LinkService<'a, S, O, const CMD_CAP: usize, const FRAME_CAP: usize>
where
    S: SerialLink,
    O: LinkObserver,
{
    link: S,
    encoder: FrameEncoder,
    assembler: FrameAssembler<O>,
    command_channel: Option<&'a CommandChannel<CMD_CAP>>,
    frame_channel: Option<&'a FrameChannel<FRAME_CAP>>,
}

impl<'a, S, const CMD_CAP: usize, const FRAME_CAP: usize>
    LinkService<'a, S, NoopObserver, CMD_CAP, FRAME_CAP>
where
    S: SerialLink,
{
    /// Wrap an open serial link.
    pub fn new(
        link: S,
        config: LinkConfig,
        command_channel: Option<&'a CommandChannel<CMD_CAP>>,
        frame_channel: Option<&'a FrameChannel<FRAME_CAP>>,
    ) -> Self {
        Self::with_observer(link, config, NoopObserver, command_channel, frame_channel)
    }
}

impl<'a, S, O, const CMD_CAP: usize, const FRAME_CAP: usize> LinkService<'a, S, O, CMD_CAP, FRAME_CAP>
where
    S: SerialLink,
    O: LinkObserver,
{
    /// Wrap an open serial link and report link events to `observer`.
    pub fn with_observer(
        link: S,
        config: LinkConfig,
        observer: O,
        command_channel: Option<&'a CommandChannel<CMD_CAP>>,
        frame_channel: Option<&'a FrameChannel<FRAME_CAP>>,
    ) -> Self {
        Self {
            link,
            encoder: FrameEncoder::new(config),
            assembler: FrameAssembler::with_observer(observer),
            command_channel,
            frame_channel,
        }
    }

    /// Split into handle/receiver/runner components.
    pub fn into_parts(self) -> LinkServiceParts<'a, S, O, CMD_CAP, FRAME_CAP> {
        let encoder = self.encoder;
        let handle = self.command_channel.map(|channel| LinkHandle {
            encoder,
            sender: channel.sender(),
        });
        let frames = self.frame_channel.map(|channel| LinkFrames {
            receiver: channel.receiver(),
        });
        LinkServiceParts {
            handle,
            frames,
            runner: LinkRunner {
                link: self.link,
                assembler: self.assembler,
                command_channel: self.command_channel,
                frame_channel: self.frame_channel,
            },
        }
    }
}

/// Bundle returned by [`LinkService::into_parts`].
pub struct LinkServiceParts<'a, S, O, const CMD_CAP: usize, const FRAME_CAP: usize>
where
    S: SerialLink,
    O: LinkObserver,
{
    pub handle: Option<LinkHandle<'a, CMD_CAP>>,
    pub frames: Option<LinkFrames<'a, FRAME_CAP>>,
    pub runner: LinkRunner<'a, S, O, CMD_CAP, FRAME_CAP>,
}

//==================================================================================RUNNER
/// Runner that drives the receive loop and writes queued frames.
pub struct LinkRunner<'a, S, O, const CMD_CAP: usize, const FRAME_CAP: usize>
where
    S: SerialLink,
    O: LinkObserver,
{
    link: S,
    assembler: FrameAssembler<O>,
    command_channel: Option<&'a CommandChannel<CMD_CAP>>,
    frame_channel: Option<&'a FrameChannel<FRAME_CAP>>,
}

impl<'a, S, O, const CMD_CAP: usize, const FRAME_CAP: usize> LinkRunner<'a, S, O, CMD_CAP, FRAME_CAP>
where
    S: SerialLink,
    O: LinkObserver,
{
    /// Run until the link closes (`Ok(())`) or fails.
    pub async fn drive(mut self) -> Result<(), LinkRunError<S::Error>> {
        let mut chunk = [0u8; RX_CHUNK_LEN];

        loop {
            match self.command_channel {
                Some(cmd_ch) => {
                    let mut command_to_process = None;
                    let mut read_result = None;

                    {
                        let cmd_future = cmd_ch.receive();
                        let read_future = self.link.read(&mut chunk);
                        pin_mut!(cmd_future);
                        pin_mut!(read_future);

                        match select(read_future, cmd_future).await {
                            Either::Left((result, _)) => read_result = Some(result),
                            Either::Right((command, _)) => command_to_process = Some(command),
                        }
                    }

                    if let Some(result) = read_result {
                        let count = result.map_err(LinkRunError::Receive)?;
                        if count == 0 {
                            #[cfg(feature = "defmt")]
                            defmt::info!("Serial link closed");
                            return Ok(());
                        }
                        self.ingest(&chunk[..count]).await;
                    }

                    if let Some(command) = command_to_process {
                        self.handle_command(command).await?;
                    }
                }
                None => {
                    let count = self
                        .link
                        .read(&mut chunk)
                        .await
                        .map_err(LinkRunError::Receive)?;
                    if count == 0 {
                        #[cfg(feature = "defmt")]
                        defmt::info!("Serial link closed");
                        return Ok(());
                    }
                    self.ingest(&chunk[..count]).await;
                }
            }
        }
    }

    async fn ingest(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            if let ProcessResult::Frame(decoded) = self.assembler.process_byte(byte) {
                if let Some(frame_ch) = self.frame_channel {
                    frame_ch.send(decoded).await;
                }
            }
        }
    }

    async fn handle_command(&mut self, command: LinkCommand) -> Result<(), LinkRunError<S::Error>> {
        match command {
            LinkCommand::Transmit(raw) => {
                self.link
                    .write(raw.as_slice())
                    .await
                    .map_err(|err| LinkRunError::Send(SendFrameError::Send(err)))?;
                self.assembler.observer_mut().frame_sent(&raw);
                Ok(())
            }
            LinkCommand::ResetReceiver => {
                self.assembler.clear();
                Ok(())
            }
        }
    }
}

//==================================================================================HANDLE
/// Transmission handle (optional). Frames are encoded on the caller's side so
/// encoding errors are reported to the caller.
pub struct LinkHandle<'a, const CMD_CAP: usize> {
    encoder: FrameEncoder,
    sender: Sender<'a, CriticalSectionRawMutex, LinkCommand, CMD_CAP>,
}

impl<'a, const CMD_CAP: usize> LinkHandle<'a, CMD_CAP> {
    pub async fn send_frame(&self, frame: &CanFrame) -> Result<(), CodecError> {
        let raw = self.encoder.encode(frame)?;
        self.sender.send(LinkCommand::Transmit(raw)).await;
        Ok(())
    }

    pub async fn send_command(&self, command: &ControlCommand<'_>) -> Result<(), CodecError> {
        let raw = command.encode()?;
        self.sender.send(LinkCommand::Transmit(raw)).await;
        Ok(())
    }

    pub async fn reset_receiver(&self) {
        self.sender.send(LinkCommand::ResetReceiver).await;
    }
}

/// Optional receiver returning decoded frames and control replies.
pub struct LinkFrames<'a, const FRAME_CAP: usize> {
    receiver: Receiver<'a, CriticalSectionRawMutex, Decoded, FRAME_CAP>,
}

impl<'a, const FRAME_CAP: usize> LinkFrames<'a, FRAME_CAP> {
    pub async fn recv(&mut self) -> Decoded {
        self.receiver.receive().await
    }

    /// Non-blocking variant of [`recv`](Self::recv).
    pub fn try_recv(&mut self) -> Option<Decoded> {
        self.receiver.try_receive().ok()
    }
}
