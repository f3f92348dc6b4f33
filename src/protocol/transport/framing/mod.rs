//! SLIP-style framing of the adapter protocol: encoder, decoder, streaming
//! assembler and control-message builders.
pub mod assembler;
pub mod commands;
pub mod decoder;
pub mod encoder;
