//! Property-based tests for the frame codec.
//!
//! These fuzz the invariants the codec is built around: chunk boundaries
//! are invisible to decoding, masking is self-inverse, and the byte queue
//! conserves every byte written to it.

use proptest::prelude::*;
use wsframe::{
    ByteQueue, DecodeStatus, Frame, FrameConfig, FrameScratch, OpCode, apply_mask,
    apply_mask_offset,
};

fn data_opcode_strategy() -> impl Strategy<Value = OpCode> {
    prop_oneof![
        Just(OpCode::Text),
        Just(OpCode::Binary),
        Just(OpCode::Continuation),
    ]
}

/// Drive a fresh decoder with one `feed` per chunk, the way a connection
/// loop would, and return the completed frame.
fn decode_chunks(chunks: &[Vec<u8>]) -> Frame {
    let mut queue = ByteQueue::new();
    let mut scratch = FrameScratch::new();
    let mut frame = Frame::incoming(&FrameConfig::unrestricted());
    let mut status = DecodeStatus::NeedMoreData;
    for chunk in chunks {
        assert_eq!(status, DecodeStatus::NeedMoreData, "decoder finished early");
        queue.write(chunk.clone());
        status = frame.feed(&mut queue, &mut scratch);
    }
    assert_eq!(status, DecodeStatus::Done);
    assert!(queue.is_empty(), "decoder left bytes unconsumed");
    frame
}

proptest! {
    // Incremental equivalence: any way of splitting a frame's wire bytes
    // into non-empty chunks decodes field-for-field identically to feeding
    // them as one chunk.
    #[test]
    fn prop_chunk_boundaries_are_invisible(
        fin in any::<bool>(),
        opcode in data_opcode_strategy(),
        masked in any::<bool>(),
        payload in prop::collection::vec(any::<u8>(), 0..600),
        splits in prop::collection::vec(1usize..48, 0..16),
    ) {
        let mut original = Frame::new(fin, opcode, payload.clone());
        original.mask = masked;
        let wire = original.serialize(true);

        let whole = decode_chunks(&[wire.clone()]);

        let mut chunks = Vec::new();
        let mut rest = &wire[..];
        for len in splits {
            if rest.is_empty() {
                break;
            }
            let take = len.min(rest.len());
            chunks.push(rest[..take].to_vec());
            rest = &rest[take..];
        }
        if !rest.is_empty() {
            chunks.push(rest.to_vec());
        }
        let split = decode_chunks(&chunks);

        prop_assert_eq!(&split, &whole);
        prop_assert_eq!(split.fin, fin);
        prop_assert_eq!(split.opcode, opcode);
        prop_assert_eq!(split.mask, masked);
        prop_assert_eq!(split.payload(), &payload[..]);
    }

    // Round-trip through serialize + decode preserves all logical fields.
    #[test]
    fn prop_roundtrip(
        fin in any::<bool>(),
        opcode in data_opcode_strategy(),
        masked in any::<bool>(),
        payload in prop::collection::vec(any::<u8>(), 0..70_000),
    ) {
        let mut original = Frame::new(fin, opcode, payload.clone());
        original.mask = masked;

        let decoded = decode_chunks(&[original.serialize(true)]);
        prop_assert!(decoded.is_complete());
        prop_assert_eq!(decoded.fin, fin);
        prop_assert_eq!(decoded.opcode, opcode);
        prop_assert_eq!(decoded.payload(), &payload[..]);
        prop_assert_eq!(decoded.length(), payload.len());
    }

    // Masking is an involution for any key.
    #[test]
    fn prop_mask_self_inverse(
        data in prop::collection::vec(any::<u8>(), 0..2000),
        key in any::<[u8; 4]>(),
    ) {
        let mut masked = data.clone();
        apply_mask(&mut masked, key);
        apply_mask(&mut masked, key);
        prop_assert_eq!(masked, data);
    }

    // Segment-wise masking with a threaded position equals whole-buffer
    // masking, for any split point.
    #[test]
    fn prop_mask_segmentation(
        data in prop::collection::vec(any::<u8>(), 1..500),
        key in any::<[u8; 4]>(),
        split in any::<prop::sample::Index>(),
    ) {
        let mut whole = data.clone();
        apply_mask(&mut whole, key);

        let mut segmented = data;
        let split = split.index(segmented.len() + 1);
        let (head, tail) = segmented.split_at_mut(split);
        let pos = apply_mask_offset(head, key, 0);
        prop_assert_eq!(pos, split & 3);
        apply_mask_offset(tail, key, pos);
        prop_assert_eq!(segmented, whole);
    }

    // Queue length always equals bytes written minus bytes advanced.
    #[test]
    fn prop_queue_conservation(
        ops in prop::collection::vec(
            (prop::collection::vec(any::<u8>(), 0..64), 0usize..96),
            0..24,
        ),
    ) {
        let mut queue = ByteQueue::new();
        let mut written = 0usize;
        let mut advanced = 0usize;
        for (chunk, wanted) in ops {
            written += chunk.len();
            queue.write(chunk);
            let take = wanted.min(queue.len());
            queue.advance(take);
            advanced += take;
            prop_assert_eq!(queue.len(), written - advanced);
        }
    }

    // Materializing any sub-range matches the same range of the flattened
    // unconsumed stream.
    #[test]
    fn prop_queue_copy_range_matches_flattened(
        chunks in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..32), 1..8),
        consume in any::<prop::sample::Index>(),
        start in any::<prop::sample::Index>(),
        end in any::<prop::sample::Index>(),
    ) {
        let mut queue = ByteQueue::new();
        let mut flat = Vec::new();
        for chunk in chunks {
            flat.extend_from_slice(&chunk);
            queue.write(chunk);
        }
        let consume = consume.index(flat.len() + 1);
        queue.advance(consume);
        let flat = &flat[consume..];

        let mut bounds = [start.index(flat.len() + 1), end.index(flat.len() + 1)];
        bounds.sort_unstable();
        let [start, end] = bounds;
        prop_assert_eq!(queue.copy_range(start, end), &flat[start..end]);
    }
}
