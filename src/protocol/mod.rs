//! WebSocket wire-format core (RFC 6455 framing).

pub mod frame;
pub mod mask;
pub mod opcode;

pub use frame::{DecodeStatus, Frame, FrameScratch, MAX_CONTROL_FRAME_PAYLOAD};
pub use mask::{MaskKeySource, NullMaskKey, RandomMaskKey, apply_mask, apply_mask_offset};
pub use opcode::OpCode;
