//! `triplecan` library: the serial protocol spoken by USB2CAN Triple
//! adapters, usable in a `no_std` environment. The crate exposes the wire
//! vocabulary and byte-stuffing codec, classic and FD frame encoding and
//! decoding, a streaming receive assembler, control messages, and an async
//! link service built on `embassy-sync` channels.
#![no_std]
//==================================================================================
/// Wire constants, command codes, and the raw frame buffer.
pub mod core;
/// Codec and link errors.
pub mod error;
/// Byte stuffing and DLC tables.
pub mod infra;
/// Frame model, configuration, transport and link service.
pub mod protocol;
//==================================================================================
