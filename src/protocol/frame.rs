//! Incremental WebSocket frame decoding and serialization (RFC 6455).
//!
//! A [`Frame`] doubles as the decode state machine for one incoming frame:
//! the connection layer appends received chunks to a [`ByteQueue`] and
//! drives [`Frame::feed`] until it reports [`DecodeStatus::Done`], then
//! replaces the frame instance for the next one, reusing its
//! [`FrameScratch`] buffers. Outbound, a frame built from logical fields is
//! turned into wire bytes with [`Frame::serialize`].

use std::fmt;

use crate::buffer::ByteQueue;
use crate::config::FrameConfig;
use crate::error::DropReason;
use crate::protocol::OpCode;
use crate::protocol::mask::{
    MaskKeySource, NullMaskKey, RandomMaskKey, apply_mask, apply_mask_offset,
};

/// Maximum payload size for control frames (RFC 6455).
pub const MAX_CONTROL_FRAME_PAYLOAD: usize = 125;

/// Decode progress. States advance strictly forward and are never revisited
/// within one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    DecodeHeader,
    Waiting16BitLength,
    Waiting64BitLength,
    WaitingMaskKey,
    WaitingPayload,
    Complete,
}

/// Result of one incremental decode step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStatus {
    /// The queue does not yet hold enough bytes to make further progress;
    /// all state decoded so far is preserved for the next call.
    NeedMoreData,
    /// The frame is complete, or a terminal drop condition is set.
    Done,
}

/// Header and mask-key scratch buffers shared across frame instances.
///
/// Owned by the connection for its whole lifetime and lent to exactly one
/// in-flight frame per [`Frame::feed`] call, so decoding a long stream of
/// frames does not allocate a small header buffer per frame. The mask key
/// of the frame currently being decoded lives here between `feed` calls.
#[derive(Debug, Clone, Default)]
pub struct FrameScratch {
    pub(crate) header: [u8; 10],
    pub(crate) mask_key: [u8; 4],
}

impl FrameScratch {
    /// Create zeroed scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The mask key most recently read off the wire.
    #[must_use]
    pub fn mask_key(&self) -> [u8; 4] {
        self.mask_key
    }
}

/// A WebSocket frame: logical header fields plus an owned payload.
///
/// ## Frame structure
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-------+-+-------------+-------------------------------+
/// |F|R|R|R| opcode|M| Payload len |    Extended payload length    |
/// |I|S|S|S|  (4)  |A|     (7)     |      (16/64 bits if needed)   |
/// |N|V|V|V|       |S|             |   (continued if len==127)     |
/// | |1|2|3|       |K|             |                               |
/// +-+-+-+-+-------+-+-------------+-------------------------------+
/// |               Masking-key (32 bits, if MASK set)              |
/// +---------------------------------------------------------------+
/// |                     Payload data                              |
/// +---------------------------------------------------------------+
/// ```
///
/// The reserved bits and opcode are carried as protocol-neutral fields;
/// extension semantics (rsv usage, compression) belong above this layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Final fragment flag.
    pub fin: bool,
    /// Reserved bit 1. Meaningful only to a negotiated extension.
    pub rsv1: bool,
    /// Reserved bit 2.
    pub rsv2: bool,
    /// Reserved bit 3.
    pub rsv3: bool,
    /// Frame opcode.
    pub opcode: OpCode,
    /// Whether the payload is XOR-masked on the wire.
    pub mask: bool,
    /// Declared payload length (for a decoded close frame this includes the
    /// 2-byte status code).
    length: usize,
    /// Key-cycle position, persisted so segment-wise unmasking would stay
    /// continuous.
    mask_pos: usize,
    payload: Vec<u8>,
    close_status: Option<u16>,
    invalid_close_frame_length: bool,
    drop_reason: Option<DropReason>,
    state: ParseState,
    max_received_frame_size: usize,
}

impl Frame {
    /// Create a frame shell ready to decode one incoming frame.
    #[must_use]
    pub fn incoming(config: &FrameConfig) -> Self {
        Self {
            fin: false,
            rsv1: false,
            rsv2: false,
            rsv3: false,
            opcode: OpCode::Continuation,
            mask: false,
            length: 0,
            mask_pos: 0,
            payload: Vec::new(),
            close_status: None,
            invalid_close_frame_length: false,
            drop_reason: None,
            state: ParseState::DecodeHeader,
            max_received_frame_size: config.max_received_frame_size,
        }
    }

    /// Create an outbound frame from logical fields.
    ///
    /// The frame is unmasked by default; set [`mask`](Frame::mask) before
    /// serializing a client-to-server frame.
    #[must_use]
    pub fn new(fin: bool, opcode: OpCode, payload: Vec<u8>) -> Self {
        Self {
            fin,
            rsv1: false,
            rsv2: false,
            rsv3: false,
            opcode,
            mask: false,
            length: payload.len(),
            mask_pos: 0,
            payload,
            close_status: None,
            invalid_close_frame_length: false,
            drop_reason: None,
            state: ParseState::Complete,
            max_received_frame_size: usize::MAX,
        }
    }

    /// Create a final text frame.
    #[must_use]
    pub fn text(data: impl Into<Vec<u8>>) -> Self {
        Self::new(true, OpCode::Text, data.into())
    }

    /// Create a final binary frame.
    #[must_use]
    pub fn binary(data: impl Into<Vec<u8>>) -> Self {
        Self::new(true, OpCode::Binary, data.into())
    }

    /// Create a close frame with a status code and reason text.
    ///
    /// On the wire the status code is prepended to the reason, so the
    /// serialized payload length is `2 + reason.len()`.
    #[must_use]
    pub fn close(status: u16, reason: &str) -> Self {
        let mut frame = Self::new(true, OpCode::Close, reason.as_bytes().to_vec());
        frame.close_status = Some(status);
        frame.length = 2 + reason.len();
        frame
    }

    /// Create a ping frame.
    #[must_use]
    pub fn ping(data: impl Into<Vec<u8>>) -> Self {
        Self::new(true, OpCode::Ping, data.into())
    }

    /// Create a pong frame.
    #[must_use]
    pub fn pong(data: impl Into<Vec<u8>>) -> Self {
        Self::new(true, OpCode::Pong, data.into())
    }

    /// The payload bytes (unmasked; for a decoded close frame, the reason
    /// text without the status code).
    #[inline]
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Take ownership of the payload.
    #[must_use]
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    /// Declared payload length from the wire.
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Close status code, if this is a close frame carrying one.
    #[inline]
    #[must_use]
    pub fn close_status(&self) -> Option<u16> {
        self.close_status
    }

    /// True once the frame decoded to completion (also set for frames built
    /// for sending).
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == ParseState::Complete
    }

    /// True if a structural protocol violation was detected.
    #[inline]
    #[must_use]
    pub fn protocol_error(&self) -> bool {
        self.drop_reason
            .as_ref()
            .is_some_and(DropReason::is_protocol_error)
    }

    /// True if the declared length exceeded the configured maximum.
    #[inline]
    #[must_use]
    pub fn frame_too_large(&self) -> bool {
        self.drop_reason
            .as_ref()
            .is_some_and(DropReason::is_frame_too_large)
    }

    /// True for a close frame whose payload length was exactly 1.
    ///
    /// Unlike the drop conditions this is recoverable at the frame level:
    /// the payload is cleared and decoding still completes; the layer above
    /// decides whether it degrades to a protocol error.
    #[inline]
    #[must_use]
    pub fn invalid_close_frame_length(&self) -> bool {
        self.invalid_close_frame_length
    }

    /// The terminal drop condition, if one was hit.
    #[inline]
    #[must_use]
    pub fn drop_reason(&self) -> Option<&DropReason> {
        self.drop_reason.as_ref()
    }

    fn is_done(&self) -> bool {
        self.drop_reason.is_some() || self.state == ParseState::Complete
    }

    /// Advance the decode state machine as far as the queued bytes permit.
    ///
    /// Call repeatedly as chunks arrive. Multi-byte fields are only
    /// consumed whole, so a return of [`DecodeStatus::NeedMoreData`] never
    /// leaves the queue mid-field. Returns [`DecodeStatus::Done`] exactly
    /// when the frame is complete or a drop condition is set; after that,
    /// further calls consume nothing.
    pub fn feed(&mut self, queue: &mut ByteQueue, scratch: &mut FrameScratch) -> DecodeStatus {
        if self.is_done() {
            return DecodeStatus::Done;
        }

        if self.state == ParseState::DecodeHeader {
            if queue.len() < 2 {
                return DecodeStatus::NeedMoreData;
            }
            queue.copy_range_into(&mut scratch.header[..2], 0, 2);
            queue.advance(2);
            let first_byte = scratch.header[0];
            let second_byte = scratch.header[1];

            self.fin = first_byte & 0x80 != 0;
            self.rsv1 = first_byte & 0x40 != 0;
            self.rsv2 = first_byte & 0x20 != 0;
            self.rsv3 = first_byte & 0x10 != 0;
            self.mask = second_byte & 0x80 != 0;
            self.opcode = OpCode::from_u8(first_byte & 0x0F);
            self.length = (second_byte & 0x7F) as usize;

            // Control frame sanity checks run on the literal 7-bit length,
            // before any extended-length dispatch: a control frame declaring
            // 126/127 is rejected as oversized, never parsed further.
            if self.opcode.is_control() {
                if self.length > MAX_CONTROL_FRAME_PAYLOAD {
                    self.drop_reason = Some(DropReason::OversizedControlFrame);
                    return DecodeStatus::Done;
                }
                if !self.fin {
                    self.drop_reason = Some(DropReason::FragmentedControlFrame);
                    return DecodeStatus::Done;
                }
            }

            self.state = match self.length {
                126 => ParseState::Waiting16BitLength,
                127 => ParseState::Waiting64BitLength,
                _ => ParseState::WaitingMaskKey,
            };
        }

        match self.state {
            ParseState::Waiting16BitLength => {
                if queue.len() < 2 {
                    return DecodeStatus::NeedMoreData;
                }
                queue.copy_range_into(&mut scratch.header[2..4], 0, 2);
                queue.advance(2);
                self.length = u16::from_be_bytes([scratch.header[2], scratch.header[3]]) as usize;
                self.state = ParseState::WaitingMaskKey;
            }
            ParseState::Waiting64BitLength => {
                if queue.len() < 8 {
                    return DecodeStatus::NeedMoreData;
                }
                queue.copy_range_into(&mut scratch.header[2..10], 0, 8);
                queue.advance(8);
                // The wire allows 2^63-1 but anything above u32::MAX is
                // rejected: a non-zero high half is either hostile or a
                // peer this codec is not prepared to buffer for.
                let high = u32::from_be_bytes([
                    scratch.header[2],
                    scratch.header[3],
                    scratch.header[4],
                    scratch.header[5],
                ]);
                if high != 0 {
                    self.drop_reason = Some(DropReason::Unsupported64BitLength);
                    return DecodeStatus::Done;
                }
                self.length = u32::from_be_bytes([
                    scratch.header[6],
                    scratch.header[7],
                    scratch.header[8],
                    scratch.header[9],
                ]) as usize;
                self.state = ParseState::WaitingMaskKey;
            }
            _ => {}
        }

        if self.state == ParseState::WaitingMaskKey {
            if self.mask {
                if queue.len() < 4 {
                    return DecodeStatus::NeedMoreData;
                }
                queue.copy_range_into(&mut scratch.mask_key, 0, 4);
                queue.advance(4);
                self.mask_pos = 0;
            }
            self.state = ParseState::WaitingPayload;
        }

        if self.state == ParseState::WaitingPayload {
            if self.length > self.max_received_frame_size {
                self.drop_reason = Some(DropReason::FrameTooLarge {
                    length: self.length,
                    max: self.max_received_frame_size,
                });
                return DecodeStatus::Done;
            }

            if self.length == 0 {
                self.payload = Vec::new();
                self.state = ParseState::Complete;
                return DecodeStatus::Done;
            }
            if queue.len() >= self.length {
                let mut payload = vec![0u8; self.length];
                queue.copy_range_into(&mut payload, 0, self.length);
                queue.advance(self.length);

                if self.mask {
                    self.mask_pos = apply_mask_offset(&mut payload, scratch.mask_key, self.mask_pos);
                }

                if self.opcode == OpCode::Close {
                    if self.length == 1 {
                        // A close payload must be empty or at least two
                        // bytes; one lone status byte is invalid.
                        payload.clear();
                        self.invalid_close_frame_length = true;
                    } else {
                        self.close_status = Some(u16::from_be_bytes([payload[0], payload[1]]));
                        payload.drain(..2);
                    }
                }

                self.payload = payload;
                self.state = ParseState::Complete;
                return DecodeStatus::Done;
            }
        }

        DecodeStatus::NeedMoreData
    }

    /// Drain this frame's declared payload from the queue without keeping
    /// it, so the stream stays frame-aligned after a drop condition.
    ///
    /// Returns false when the queue does not yet hold the full declared
    /// length; call again once more data has arrived.
    pub fn throw_away_payload(&mut self, queue: &mut ByteQueue) -> bool {
        if queue.len() >= self.length {
            queue.advance(self.length);
            self.state = ParseState::Complete;
            return true;
        }
        false
    }

    /// Serialize to wire bytes, drawing the mask key (when
    /// [`mask`](Frame::mask) is set) from `keys`.
    ///
    /// Pure with respect to decode state. The output buffer is allocated
    /// once at its exact final size.
    #[must_use]
    pub fn serialize_with(&self, keys: &mut dyn MaskKeySource) -> Vec<u8> {
        let mut first_byte = self.opcode.as_u8() & 0x0F;
        if self.fin {
            first_byte |= 0x80;
        }
        if self.rsv1 {
            first_byte |= 0x40;
        }
        if self.rsv2 {
            first_byte |= 0x20;
        }
        if self.rsv3 {
            first_byte |= 0x10;
        }

        // The close frame is a special case: the status code is prepended
        // to the reason payload on the wire.
        let close_data;
        let data: &[u8] = if self.opcode == OpCode::Close {
            let status = self.close_status.unwrap_or(1000);
            let mut buf = Vec::with_capacity(2 + self.payload.len());
            buf.extend_from_slice(&status.to_be_bytes());
            buf.extend_from_slice(&self.payload);
            close_data = buf;
            &close_data
        } else {
            &self.payload
        };
        let length = data.len();

        let mut second_byte = if self.mask { 0x80u8 } else { 0x00 };
        let extended_len_size = if length <= 125 {
            second_byte |= length as u8;
            0
        } else if length <= 0xFFFF {
            second_byte |= 126;
            2
        } else {
            second_byte |= 127;
            8
        };

        let mask_size = if self.mask { 4 } else { 0 };
        let mut output = Vec::with_capacity(2 + extended_len_size + mask_size + length);
        output.push(first_byte);
        output.push(second_byte);

        match extended_len_size {
            2 => output.extend_from_slice(&(length as u16).to_be_bytes()),
            // High 32 bits are always zero: the encoder never produces
            // lengths beyond the decoder's own ceiling.
            8 => output.extend_from_slice(&(length as u64).to_be_bytes()),
            _ => {}
        }

        if self.mask {
            let key = keys.next_key();
            output.extend_from_slice(&key);
            let payload_start = output.len();
            output.extend_from_slice(data);
            apply_mask(&mut output[payload_start..], key);
        } else {
            output.extend_from_slice(data);
        }

        output
    }

    /// Serialize to wire bytes.
    ///
    /// `null_mask` forces an all-zero mask key for deterministic output;
    /// otherwise masked frames draw keys from a [`RandomMaskKey`].
    #[must_use]
    pub fn serialize(&self, null_mask: bool) -> Vec<u8> {
        if null_mask {
            self.serialize_with(&mut NullMaskKey)
        } else {
            self.serialize_with(&mut RandomMaskKey::new())
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} frame, fin: {}, length: {}, masked: {}",
            self.opcode, self.fin, self.length, self.mask
        )
    }
}
