//! Payload masking (RFC 6455 section 5.3).
//!
//! Masking is a cyclic XOR over a 4-byte per-frame key. It is an
//! obfuscation requirement of the protocol (defeating cache-poisoning
//! through intermediaries), not a security primitive, so the outbound key
//! generator favors speed over cryptographic strength.

/// Apply the cyclic XOR mask to `data`, starting at key position 0.
///
/// XOR is self-inverse, so the same call both masks and unmasks.
#[inline]
pub fn apply_mask(data: &mut [u8], key: [u8; 4]) {
    apply_mask_offset(data, key, 0);
}

/// Apply the cyclic XOR mask starting at position `pos` within the key
/// cycle, returning the position the cycle ends on.
///
/// Threading the returned position into the next call keeps the key stream
/// continuous when one payload is processed in segments:
///
/// ```
/// use wsframe::protocol::mask::{apply_mask, apply_mask_offset};
///
/// let key = [0x37, 0xfa, 0x21, 0x3d];
/// let mut whole = *b"Hello, WebSocket";
/// apply_mask(&mut whole, key);
///
/// let (mut a, mut b) = (*b"Hello, ", *b"WebSocket");
/// let pos = apply_mask_offset(&mut a, key, 0);
/// apply_mask_offset(&mut b, key, pos);
/// assert_eq!(&whole[..7], &a);
/// assert_eq!(&whole[7..], &b);
/// ```
pub fn apply_mask_offset(data: &mut [u8], key: [u8; 4], pos: usize) -> usize {
    // Rotating the key by the starting position lets the body run from a
    // word-aligned cycle regardless of where the previous segment stopped.
    let key = [
        key[pos & 3],
        key[(pos + 1) & 3],
        key[(pos + 2) & 3],
        key[(pos + 3) & 3],
    ];
    let key_word = u32::from_ne_bytes(key);

    let mut chunks = data.chunks_exact_mut(4);
    for chunk in &mut chunks {
        let word = u32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        chunk.copy_from_slice(&(word ^ key_word).to_ne_bytes());
    }
    for (i, byte) in chunks.into_remainder().iter_mut().enumerate() {
        *byte ^= key[i & 3];
    }

    (pos + data.len()) & 3
}

/// Source of outbound 4-byte mask keys.
///
/// Injectable so deterministic wire output (the all-zero key) is a
/// first-class option for tests rather than a side channel.
pub trait MaskKeySource {
    /// Produce the key for the next outbound masked frame.
    fn next_key(&mut self) -> [u8; 4];
}

/// Counter-mixing key generator, seeded once from the OS.
///
/// Each key is derived by advancing a Weyl counter and bit-mixing it;
/// unpredictability across connections comes from the random seed.
#[derive(Debug, Clone)]
pub struct RandomMaskKey {
    counter: u32,
}

impl RandomMaskKey {
    /// Create a generator seeded from `getrandom`, falling back to the
    /// system clock if the OS entropy source is unavailable.
    #[must_use]
    pub fn new() -> Self {
        let mut seed = [0u8; 4];
        let counter = if getrandom::getrandom(&mut seed).is_ok() {
            u32::from_le_bytes(seed)
        } else {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u32)
                .unwrap_or(0x12345678)
        };
        Self { counter }
    }
}

impl Default for RandomMaskKey {
    fn default() -> Self {
        Self::new()
    }
}

impl MaskKeySource for RandomMaskKey {
    fn next_key(&mut self) -> [u8; 4] {
        self.counter = self.counter.wrapping_add(0x9E37_79B9);
        let a = self.counter;
        let b = a.wrapping_mul(0x85EB_CA6B);
        let c = b ^ (b >> 13);
        let d = c.wrapping_mul(0xC2B2_AE35);
        d.to_le_bytes()
    }
}

/// All-zero keys, making masked wire output byte-for-byte deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMaskKey;

impl MaskKeySource for NullMaskKey {
    fn next_key(&mut self) -> [u8; 4] {
        [0; 4]
    }
}
