//! Terminal decode conditions.
//!
//! Malformed input never surfaces as `Result` errors from the decoder;
//! per the framing design every violation is recorded as a flag on the
//! frame being decoded, paired with a human-readable reason. `DropReason`
//! is that pairing: the variant is the flag, its `Display` output is the
//! reason string the connection layer can log before dropping the peer.

use thiserror::Error;

/// Why an incoming frame was dropped mid-decode.
///
/// Once set, the frame consumes no further bytes from the stream; the
/// connection layer is expected to call
/// [`Frame::throw_away_payload`](crate::Frame::throw_away_payload) to keep
/// the stream aligned, then decide whether to close the connection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DropReason {
    /// Control frame declared a payload longer than 125 bytes.
    ///
    /// Checked against the literal 7-bit length field, so a control frame
    /// that even *attempts* extended length encoding (126/127) is rejected
    /// here before extended-length parsing.
    #[error("illegal control frame longer than 125 bytes")]
    OversizedControlFrame,

    /// Control frame with FIN cleared (RFC 6455 forbids fragmenting them).
    #[error("control frames must not be fragmented")]
    FragmentedControlFrame,

    /// 64-bit extended length with a non-zero high 32 bits.
    ///
    /// Payloads above `u32::MAX` are rejected outright rather than
    /// supported; see the crate documentation for this deliberate ceiling.
    #[error("unsupported 64-bit length frame received")]
    Unsupported64BitLength,

    /// Declared payload length exceeds the configured receive maximum.
    ///
    /// Raised before any payload byte is copied, so a hostile length field
    /// cannot force a large allocation.
    #[error("frame size of {length} bytes exceeds maximum accepted frame size of {max} bytes")]
    FrameTooLarge {
        /// Declared payload length from the wire.
        length: usize,
        /// Configured `max_received_frame_size`.
        max: usize,
    },
}

impl DropReason {
    /// True for structural protocol violations (fatal to the connection).
    #[inline]
    #[must_use]
    pub const fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            DropReason::OversizedControlFrame
                | DropReason::FragmentedControlFrame
                | DropReason::Unsupported64BitLength
        )
    }

    /// True when the frame was dropped for exceeding the size ceiling.
    #[inline]
    #[must_use]
    pub const fn is_frame_too_large(&self) -> bool {
        matches!(self, DropReason::FrameTooLarge { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_reason_display() {
        assert_eq!(
            DropReason::FragmentedControlFrame.to_string(),
            "control frames must not be fragmented"
        );
        let err = DropReason::FrameTooLarge {
            length: 20_000_000,
            max: 65536,
        };
        assert_eq!(
            err.to_string(),
            "frame size of 20000000 bytes exceeds maximum accepted frame size of 65536 bytes"
        );
    }

    #[test]
    fn test_drop_reason_classification() {
        assert!(DropReason::OversizedControlFrame.is_protocol_error());
        assert!(DropReason::FragmentedControlFrame.is_protocol_error());
        assert!(DropReason::Unsupported64BitLength.is_protocol_error());
        assert!(!DropReason::OversizedControlFrame.is_frame_too_large());

        let too_large = DropReason::FrameTooLarge {
            length: 100,
            max: 10,
        };
        assert!(too_large.is_frame_too_large());
        assert!(!too_large.is_protocol_error());
    }
}
