//! Configuration consumed from the connection layer.

/// Receive-side limits for the frame codec.
///
/// This is the single knob the codec depends on; everything else about a
/// connection (roles, timeouts, extension negotiation) lives above the
/// framing layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameConfig {
    /// Maximum permitted decoded payload length of a single frame, in bytes.
    ///
    /// A frame declaring a larger payload is flagged
    /// [`FrameTooLarge`](crate::DropReason::FrameTooLarge) before any of its
    /// payload is read into memory.
    ///
    /// Default: 64 KiB (0x10000).
    pub max_received_frame_size: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_received_frame_size: 0x10000,
        }
    }
}

impl FrameConfig {
    /// Create a config with a custom frame size ceiling.
    #[must_use]
    pub const fn new(max_received_frame_size: usize) -> Self {
        Self {
            max_received_frame_size,
        }
    }

    /// Config without a frame size ceiling.
    ///
    /// Warning: use only with trusted peers; a hostile length field can
    /// then force arbitrarily large payload allocations.
    #[must_use]
    pub const fn unrestricted() -> Self {
        Self {
            max_received_frame_size: usize::MAX,
        }
    }
}
