//! # wsframe - Incremental WebSocket Frame Codec
//!
//! `wsframe` is the wire-format core of a WebSocket endpoint: it turns an
//! arbitrary, chunked byte stream into discrete, validated RFC 6455 frames
//! and serializes logical frames back into wire bytes.
//!
//! ## Features
//!
//! - **Incremental decoding**: a per-frame state machine that makes exactly
//!   as much progress as the buffered bytes allow, never consuming a
//!   multi-byte field partially
//! - **Chunk-aware buffering**: [`ByteQueue`] presents non-aligned
//!   transport reads as one logical byte stream without copying on append
//! - **Flag-based error surface**: malformed frames (oversized or
//!   fragmented control frames, non-canonical 64-bit lengths, truncated
//!   close codes) are reported as flags with typed reasons, never panics
//!   or `Result` plumbing in the hot path
//! - **Memory-exhaustion protection**: a hostile length field is rejected
//!   before any payload byte is copied
//! - **Deterministic masking for tests**: the mask-key source is an
//!   injectable trait with an all-zero implementation
//!
//! ## Quick start
//!
//! ```
//! use wsframe::{ByteQueue, DecodeStatus, Frame, FrameConfig, FrameScratch};
//!
//! // Connection-owned state, created once.
//! let config = FrameConfig::default();
//! let mut queue = ByteQueue::new();
//! let mut scratch = FrameScratch::new();
//!
//! // Bytes arrive off the socket in arbitrary chunks.
//! queue.write(&[0x81u8, 0x05, 0x48, 0x65][..]);
//! queue.write(&[0x6cu8, 0x6c, 0x6f][..]);
//!
//! let mut frame = Frame::incoming(&config);
//! while frame.feed(&mut queue, &mut scratch) == DecodeStatus::NeedMoreData {
//!     // ...read more from the transport...
//! }
//! assert!(frame.is_complete());
//! assert_eq!(frame.payload(), b"Hello");
//!
//! // Outbound: build a logical frame, get wire bytes.
//! let wire = Frame::text("Hello").serialize(false);
//! assert_eq!(wire[0], 0x81);
//! ```
//!
//! Everything above the frame level -- handshake, extension negotiation,
//! ping/pong orchestration, message reassembly, and all I/O -- belongs to
//! the owning connection layer.

pub mod buffer;
pub mod config;
pub mod error;
pub mod protocol;

pub use buffer::ByteQueue;
pub use config::FrameConfig;
pub use error::DropReason;
pub use protocol::{
    DecodeStatus, Frame, FrameScratch, MaskKeySource, NullMaskKey, OpCode, RandomMaskKey,
    apply_mask, apply_mask_offset,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn test_public_types_are_send() {
        assert_send::<ByteQueue>();
        assert_send::<FrameConfig>();
        assert_send::<DropReason>();
        assert_send::<Frame>();
        assert_send::<FrameScratch>();
        assert_send::<DecodeStatus>();
        assert_send::<OpCode>();
    }

    #[test]
    fn test_public_types_are_sync() {
        assert_sync::<ByteQueue>();
        assert_sync::<FrameConfig>();
        assert_sync::<DropReason>();
        assert_sync::<Frame>();
        assert_sync::<FrameScratch>();
        assert_sync::<DecodeStatus>();
        assert_sync::<OpCode>();
    }
}
