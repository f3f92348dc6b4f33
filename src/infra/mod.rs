//! Low-level building blocks with no protocol state: byte stuffing and
//! DLC/length tables.
pub mod codec;
