//! Logically-contiguous view over independently-received byte chunks.
//!
//! Transport reads rarely align with frame boundaries, so the decoder
//! operates on a [`ByteQueue`]: chunks are appended as they arrive off the
//! socket, consumption only moves a head cursor, and multi-byte fields that
//! straddle chunk boundaries are materialized on demand.

use std::collections::VecDeque;

use bytes::Bytes;

/// An append-only queue of immutable byte chunks with a logical head cursor.
///
/// Chunk contents are never mutated; [`advance`](ByteQueue::advance) moves
/// the cursor and retires fully-consumed chunks from the head, so consuming
/// bytes is O(1) amortized regardless of how the transport sliced them.
///
/// One queue is created per connection and lives for its duration.
#[derive(Debug, Default)]
pub struct ByteQueue {
    chunks: VecDeque<Bytes>,
    /// Offset of the first unconsumed byte within the front chunk.
    head_offset: usize,
    /// Total unconsumed bytes across all chunks.
    len: usize,
}

impl ByteQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total unconsumed bytes, maintained incrementally.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no unconsumed bytes remain.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append a received chunk. O(1); the chunk is never copied.
    ///
    /// Empty chunks are dropped on the floor.
    pub fn write(&mut self, chunk: impl Into<Bytes>) {
        let chunk = chunk.into();
        if chunk.is_empty() {
            return;
        }
        self.len += chunk.len();
        self.chunks.push_back(chunk);
    }

    /// Logically consume `n` bytes from the head.
    ///
    /// Fully-consumed chunks are dropped so their memory can be reclaimed.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds the available length. That is a contract
    /// violation of the decode loop (it must check [`len`](ByteQueue::len)
    /// before consuming), not a recoverable protocol condition.
    pub fn advance(&mut self, n: usize) {
        assert!(
            n <= self.len,
            "byte queue advanced past available data ({n} > {})",
            self.len
        );
        self.head_offset += n;
        self.len -= n;
        while let Some(front) = self.chunks.front() {
            if self.head_offset < front.len() {
                break;
            }
            self.head_offset -= front.len();
            self.chunks.pop_front();
        }
    }

    /// Materialize logical offsets `[start, end)` (relative to the current
    /// head) as a freshly-allocated contiguous buffer.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds or inverted.
    #[must_use]
    pub fn copy_range(&self, start: usize, end: usize) -> Vec<u8> {
        let mut out = vec![0u8; end - start];
        self.copy_range_into(&mut out, start, end);
        out
    }

    /// Copy logical offsets `[start, end)` directly into `target`, avoiding
    /// the extra allocation of [`copy_range`](ByteQueue::copy_range).
    ///
    /// The queue is not consumed; pair with
    /// [`advance`](ByteQueue::advance) once the bytes are taken.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds, inverted, or larger than
    /// `target`.
    pub fn copy_range_into(&self, target: &mut [u8], start: usize, end: usize) {
        assert!(start <= end, "inverted range {start}..{end}");
        assert!(
            end <= self.len,
            "range {start}..{end} exceeds queued length {}",
            self.len
        );
        assert!(
            target.len() >= end - start,
            "insufficient space in target buffer"
        );

        // Logical offset of the current chunk's first unconsumed byte.
        let mut ix = 0;
        let mut head = self.head_offset;
        for chunk in &self.chunks {
            let avail = &chunk[head..];
            head = 0;
            let lo = start.max(ix);
            let hi = end.min(ix + avail.len());
            if lo < hi {
                target[lo - start..hi - start].copy_from_slice(&avail[lo - ix..hi - ix]);
            }
            ix += avail.len();
            if ix >= end {
                break;
            }
        }
    }
}
