//! Minimal abstraction for the serial connection to the adapter. Allows the
//! library to plug into UART drivers, USB CDC stacks or host serial ports.
use futures_util::Future;

/// Contract to move raw bytes to and from the adapter asynchronously.
pub trait SerialLink {
    type Error: core::fmt::Debug;

    /// Write every byte of `bytes`.
    fn write<'a>(
        &'a mut self,
        bytes: &'a [u8],
    ) -> impl Future<Output = Result<(), Self::Error>> + 'a;

    /// Read whatever is available into `buffer`, waiting for at least one
    /// byte. Returns `Ok(0)` once the connection is closed.
    ///
    /// Must be cancel-safe: dropping the future before completion loses no bytes.
    fn read<'a>(
        &'a mut self,
        buffer: &'a mut [u8],
    ) -> impl Future<Output = Result<usize, Self::Error>> + 'a;
}
