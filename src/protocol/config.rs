//! Per-connection configuration supplied by the embedding application.

/// Number of CAN ports on the USB2CAN Triple adapter.
pub const DEFAULT_CHANNEL_COUNT: u8 = 3;

/// Highest channel count representable in the channel byte (bits 0..6).
pub const MAX_CHANNEL_COUNT: u8 = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Settings bounding what the encoder accepts for one adapter.
pub struct LinkConfig {
    /// Valid channel indices are `0..channel_count`.
    pub channel_count: u8,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkConfig {
    /// Configuration for a three-port adapter.
    pub const fn new() -> Self {
        Self {
            channel_count: DEFAULT_CHANNEL_COUNT,
        }
    }

    /// Override the number of ports. Values above [`MAX_CHANNEL_COUNT`] are capped.
    pub const fn with_channel_count(mut self, channel_count: u8) -> Self {
        self.channel_count = if channel_count > MAX_CHANNEL_COUNT {
            MAX_CHANNEL_COUNT
        } else {
            channel_count
        };
        self
    }
}
