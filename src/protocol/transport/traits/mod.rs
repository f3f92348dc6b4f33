//! Abstraction traits used by the transport layer (serial link, frame sender,
//! and link observer).
pub mod frame_sender;
pub mod link_observer;
pub mod serial_link;
