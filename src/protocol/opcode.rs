//! WebSocket frame opcodes as defined in RFC 6455.

/// WebSocket frame opcode.
///
/// The decoder is deliberately neutral about reserved opcode values: they
/// round-trip through [`Reserved`](OpCode::Reserved) instead of failing,
/// since whether an unknown opcode is acceptable (e.g. negotiated by an
/// extension) is a decision for the layer above the framing core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    /// Continuation frame (0x0), used after the initial fragment.
    Continuation,
    /// Text frame (0x1). Payload is UTF-8 by contract (not validated here).
    Text,
    /// Binary frame (0x2).
    Binary,
    /// Close frame (0x8). May carry a status code and reason.
    Close,
    /// Ping frame (0x9). Receiver must respond with Pong.
    Ping,
    /// Pong frame (0xA). May also be sent unsolicited as a heartbeat.
    Pong,
    /// Reserved value (0x3-0x7 data range, 0xB-0xF control range).
    Reserved(u8),
}

impl OpCode {
    /// Decode the low 4 bits of a header byte. Never fails; unknown values
    /// are preserved as [`Reserved`](OpCode::Reserved).
    #[must_use]
    pub const fn from_u8(byte: u8) -> Self {
        match byte & 0x0F {
            0x0 => OpCode::Continuation,
            0x1 => OpCode::Text,
            0x2 => OpCode::Binary,
            0x8 => OpCode::Close,
            0x9 => OpCode::Ping,
            0xA => OpCode::Pong,
            other => OpCode::Reserved(other),
        }
    }

    /// The raw 4-bit wire value.
    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            OpCode::Continuation => 0x0,
            OpCode::Text => 0x1,
            OpCode::Binary => 0x2,
            OpCode::Close => 0x8,
            OpCode::Ping => 0x9,
            OpCode::Pong => 0xA,
            OpCode::Reserved(value) => value,
        }
    }

    /// Control frames are every opcode >= 0x8 (close, ping, pong and the
    /// reserved control range); they are subject to stricter size and
    /// fragmentation rules.
    #[inline]
    #[must_use]
    pub const fn is_control(self) -> bool {
        self.as_u8() >= 0x8
    }

    /// Data frames: continuation, text, binary and the reserved data range.
    #[inline]
    #[must_use]
    pub const fn is_data(self) -> bool {
        !self.is_control()
    }

    /// Human-readable name for this opcode.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            OpCode::Continuation => "Continuation",
            OpCode::Text => "Text",
            OpCode::Binary => "Binary",
            OpCode::Close => "Close",
            OpCode::Ping => "Ping",
            OpCode::Pong => "Pong",
            OpCode::Reserved(_) => "Reserved",
        }
    }
}

impl std::fmt::Display for OpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
