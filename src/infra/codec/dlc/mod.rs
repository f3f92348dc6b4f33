//! DLC/length lookup tables.
//!
//! Classic CAN maps lengths `0..=8` to the identical 4-bit code. CAN-FD keeps
//! that identity for codes `0x0..=0x8` and maps `0x9..=0xF` to the nonlinear
//! lengths 12, 16, 20, 24, 32, 48 and 64.
use crate::error::CodecError;

/// Data length for every FD DLC code, indexed by code.
const FD_LENGTHS: [u8; 16] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 12, 16, 20, 24, 32, 48, 64];

/// Classic frame: DLC code for a data length.
#[inline]
pub fn classic_code_from_length(len: usize) -> Result<u8, CodecError> {
    if len <= 8 {
        Ok(len as u8)
    } else {
        Err(CodecError::InvalidLength { len })
    }
}

/// Classic frame: data length for a DLC code. Only the low nibble is read.
#[inline]
pub fn classic_length_from_code(code: u8) -> Result<usize, CodecError> {
    let code = code & 0x0F;
    if code <= 8 {
        Ok(code as usize)
    } else {
        Err(CodecError::InvalidLength {
            len: code as usize,
        })
    }
}

/// FD frame: DLC code for a data length. Only the sixteen table lengths are accepted.
pub fn fd_code_from_length(len: usize) -> Result<u8, CodecError> {
    FD_LENGTHS
        .iter()
        .position(|&entry| entry as usize == len)
        .map(|code| code as u8)
        .ok_or(CodecError::InvalidLength { len })
}

/// FD frame: data length for a DLC code. Only the low nibble is read, so
/// every input has an entry.
#[inline]
pub fn fd_length_from_code(code: u8) -> usize {
    FD_LENGTHS[(code & 0x0F) as usize] as usize
}

/// Smallest valid FD length able to hold `len` bytes (padding target).
pub fn fd_padded_length(len: usize) -> Option<usize> {
    FD_LENGTHS
        .iter()
        .map(|&entry| entry as usize)
        .find(|&entry| entry >= len)
}
