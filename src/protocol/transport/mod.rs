//! Adapter transport layer: CAN frame representations, identifiers, the
//! byte-stuffed wire framing, and the serial link abstraction traits.
pub mod can_frame;
pub mod can_id;
pub mod framing;
pub mod traits;
