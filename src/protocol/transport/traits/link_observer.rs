//! Observability hooks for the receive and transmit paths. Implementations
//! can count, log or forward events; every hook defaults to a no-op.
use crate::core::RawFrame;
use crate::error::CodecError;
use crate::protocol::transport::can_frame::Decoded;

/// Receives link events as they happen.
pub trait LinkObserver {
    /// A complete frame was decoded.
    fn frame_received(&mut self, _decoded: &Decoded) {}
    /// A complete frame failed to decode.
    fn frame_rejected(&mut self, _error: &CodecError) {}
    /// The receive buffer filled up before a terminator arrived.
    fn overflow(&mut self, _mtu: usize) {}
    /// A frame was dropped while resynchronizing after an overflow.
    fn discarded(&mut self) {}
    /// An encoded frame was handed to the serial link.
    fn frame_sent(&mut self, _frame: &RawFrame) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoopObserver;

impl LinkObserver for NoopObserver {}

impl<T: LinkObserver + ?Sized> LinkObserver for &mut T {
    fn frame_received(&mut self, decoded: &Decoded) {
        (**self).frame_received(decoded)
    }

    fn frame_rejected(&mut self, error: &CodecError) {
        (**self).frame_rejected(error)
    }

    fn overflow(&mut self, mtu: usize) {
        (**self).overflow(mtu)
    }

    fn discarded(&mut self) {
        (**self).discarded()
    }

    fn frame_sent(&mut self, frame: &RawFrame) {
        (**self).frame_sent(frame)
    }
}
