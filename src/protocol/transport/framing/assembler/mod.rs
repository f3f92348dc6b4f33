//! Streaming receive assembler.
//!
//! Consumes the raw (still escaped) byte stream of one serial connection,
//! one byte at a time, and cuts it into frames. A byte terminates the frame
//! when it equals `END` and is not escaped. Escape state is tracked rather
//! than looked up from the previous byte, so an escaped `ESCAPE` data byte
//! right before the terminator does not hide it.
//!
//! When the buffer reaches `MTU` without a terminator the assembler enters
//! an error state: bytes are dropped until the next terminator, then the
//! partial frame is discarded and accumulation restarts empty.
use crate::core::{RawFrame, END, ESCAPE, MAX_RAW_FRAME_LEN};
use crate::error::CodecError;
use crate::protocol::transport::can_frame::Decoded;
use crate::protocol::transport::framing::decoder;
use crate::protocol::transport::traits::link_observer::{LinkObserver, NoopObserver};

//==================================================================================STATS
/// Receive counters maintained by the assembler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RxStats {
    /// Data frames decoded.
    pub rx_frames: u32,
    /// Data bytes carried by decoded frames.
    pub rx_bytes: u32,
    /// Overflow events.
    pub rx_over_errors: u32,
    /// Complete frames that failed to decode.
    pub rx_errors: u32,
    /// Control replies recognised.
    pub rx_control: u32,
    /// Frames dropped while recovering from an overflow.
    pub rx_discarded: u32,
}

//==================================================================================RESULT
/// Outcome of feeding one byte to [`FrameAssembler::process_byte`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessResult {
    /// Byte stored or skipped, no frame boundary yet.
    Pending,
    /// Buffer was full; the current frame is lost.
    Overflow,
    /// Terminator found while recovering; the oversized frame was dropped.
    Discarded,
    /// A complete frame was decoded.
    Frame(Decoded),
    /// A complete frame was delivered but could not be decoded.
    Rejected(CodecError),
}

enum Step {
    Pending,
    Overflow,
    Discarded,
    Complete,
}

//==================================================================================ASSEMBLER
/// Per-connection accumulator. `MTU` bounds the escaped frame size and may
/// not exceed [`MAX_RAW_FRAME_LEN`].
#[derive(Debug)]
pub struct FrameAssembler<O: LinkObserver = NoopObserver, const MTU: usize = MAX_RAW_FRAME_LEN> {
    buffer: RawFrame,
    escaped: bool,
    error: bool,
    stats: RxStats,
    observer: O,
}

impl FrameAssembler {
    /// Assembler with the default MTU and no observer.
    pub fn new() -> Self {
        Self::with_observer(NoopObserver)
    }
}

impl<const MTU: usize> Default for FrameAssembler<NoopObserver, MTU> {
    fn default() -> Self {
        Self::with_observer(NoopObserver)
    }
}

impl<O: LinkObserver, const MTU: usize> FrameAssembler<O, MTU> {
    const CAPACITY_OK: () = assert!(MTU > 0 && MTU <= MAX_RAW_FRAME_LEN);

    /// Assembler reporting its events to `observer`.
    pub fn with_observer(observer: O) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CAPACITY_OK;
        Self {
            buffer: RawFrame::new(),
            escaped: false,
            error: false,
            stats: RxStats::default(),
            observer,
        }
    }

    /// Feed one raw byte; returns the escaped frame (terminator included)
    /// when the byte completes it.
    pub fn deliver(&mut self, byte: u8) -> Option<RawFrame> {
        match self.step(byte) {
            Step::Complete => {
                let frame = self.buffer;
                self.clear();
                Some(frame)
            }
            _ => None,
        }
    }

    /// Feed one raw byte; completed frames are unescaped and decoded.
    ///
    /// Decode failures are reported and counted but leave the assembler
    /// ready for the next frame.
    pub fn process_byte(&mut self, byte: u8) -> ProcessResult {
        match self.step(byte) {
            Step::Pending => ProcessResult::Pending,
            Step::Overflow => ProcessResult::Overflow,
            Step::Discarded => ProcessResult::Discarded,
            Step::Complete => {
                let raw = self.buffer.unstuffed();
                self.clear();
                match decoder::decode(raw.as_slice()) {
                    Ok(decoded) => {
                        self.record(&decoded);
                        self.observer.frame_received(&decoded);
                        ProcessResult::Frame(decoded)
                    }
                    Err(err) => {
                        #[cfg(feature = "defmt")]
                        defmt::warn!("Dropping undecodable frame: {}", err);
                        self.stats.rx_errors = self.stats.rx_errors.wrapping_add(1);
                        self.observer.frame_rejected(&err);
                        ProcessResult::Rejected(err)
                    }
                }
            }
        }
    }

    fn step(&mut self, byte: u8) -> Step {
        let terminator = byte == END && !self.escaped;
        self.escaped = byte == ESCAPE && !self.escaped;

        if self.error {
            if terminator {
                #[cfg(feature = "defmt")]
                defmt::debug!("Resynchronized after overflow");
                self.clear();
                self.stats.rx_discarded = self.stats.rx_discarded.wrapping_add(1);
                self.observer.discarded();
                return Step::Discarded;
            }
            return Step::Pending;
        }

        if self.buffer.len() >= MTU || self.buffer.push(byte).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Receive buffer overflow (mtu {})", MTU);
            self.stats.rx_over_errors = self.stats.rx_over_errors.wrapping_add(1);
            self.observer.overflow(MTU);
            if terminator {
                self.clear();
            } else {
                self.buffer.clear();
                self.error = true;
            }
            return Step::Overflow;
        }

        if terminator {
            #[cfg(feature = "defmt")]
            defmt::trace!("Frame boundary after {} bytes", self.buffer.len());
            return Step::Complete;
        }
        Step::Pending
    }

    fn record(&mut self, decoded: &Decoded) {
        match decoded {
            Decoded::Frame(frame) => {
                self.stats.rx_frames = self.stats.rx_frames.wrapping_add(1);
                self.stats.rx_bytes = self
                    .stats
                    .rx_bytes
                    .wrapping_add(frame.payload().len() as u32);
            }
            Decoded::Control(_) => {
                self.stats.rx_control = self.stats.rx_control.wrapping_add(1);
            }
        }
    }

    /// Drop any partial frame and leave the error state.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.escaped = false;
        self.error = false;
    }

    /// Bytes currently accumulated.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// `true` while recovering from an overflow.
    pub fn in_error(&self) -> bool {
        self.error
    }

    pub const fn mtu(&self) -> usize {
        MTU
    }

    pub fn stats(&self) -> RxStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = RxStats::default();
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }
}
