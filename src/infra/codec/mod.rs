//! Pure, reentrant codec primitives used by the frame encoder and decoder.
pub mod dlc;
pub mod stuffing;
