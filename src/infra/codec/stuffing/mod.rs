//! Byte-stuffing transform applied to every payload byte of a frame.
//!
//! Any byte equal to [`START`], [`END`] or [`ESCAPE`] is preceded by
//! [`ESCAPE`] on the wire. The frame start marker and the terminator are
//! written literally by the encoder and never pass through [`stuff`].
use crate::core::{END, ESCAPE, START};
use crate::error::CodecError;

/// Returns `true` when `byte` collides with a reserved marker.
#[inline]
pub const fn is_reserved(byte: u8) -> bool {
    matches!(byte, START | END | ESCAPE)
}

//==================================================================================STUFFED_BYTE
/// Wire representation of a single stuffed byte (one or two bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StuffedByte {
    bytes: [u8; 2],
    len: usize,
}

impl StuffedByte {
    /// Bytes to put on the wire.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Number of wire bytes (1 or 2).
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`: a stuffed byte has at least one wire byte.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Stuff one byte: `[ESCAPE, byte]` for reserved values, `[byte]` otherwise.
#[inline]
pub const fn stuff(byte: u8) -> StuffedByte {
    if is_reserved(byte) {
        StuffedByte {
            bytes: [ESCAPE, byte],
            len: 2,
        }
    } else {
        StuffedByte {
            bytes: [byte, 0],
            len: 1,
        }
    }
}

/// Stuff every byte of `src` into `dst` and return the number of bytes written.
pub fn stuff_into(src: &[u8], dst: &mut [u8]) -> Result<usize, CodecError> {
    let mut written = 0;
    for &byte in src {
        let stuffed = stuff(byte);
        let end = written + stuffed.len();
        if end > dst.len() {
            return Err(CodecError::BufferTooSmall {
                asked: end,
                available: dst.len(),
            });
        }
        dst[written..end].copy_from_slice(stuffed.as_slice());
        written = end;
    }
    Ok(written)
}

//==================================================================================UNSTUFF
/// Remove the stuffing from `src` into `dst` and return the number of bytes written.
///
/// An `ESCAPE` is dropped and the following byte copied literally. A trailing
/// lone `ESCAPE` produces nothing.
pub fn unstuff(src: &[u8], dst: &mut [u8]) -> Result<usize, CodecError> {
    let mut written = 0;
    let mut escaped = false;
    for &byte in src {
        if byte == ESCAPE && !escaped {
            escaped = true;
            continue;
        }
        escaped = false;
        if written >= dst.len() {
            return Err(CodecError::BufferTooSmall {
                asked: written + 1,
                available: dst.len(),
            });
        }
        dst[written] = byte;
        written += 1;
    }
    Ok(written)
}

/// In-place variant of [`unstuff`]; returns the new logical length.
///
/// The output is never longer than the input, so the write cursor can only
/// trail the read cursor.
pub fn unstuff_in_place(buffer: &mut [u8]) -> usize {
    let mut written = 0;
    let mut escaped = false;
    for read in 0..buffer.len() {
        let byte = buffer[read];
        if byte == ESCAPE && !escaped {
            escaped = true;
            continue;
        }
        escaped = false;
        buffer[written] = byte;
        written += 1;
    }
    written
}
