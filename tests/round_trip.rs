//! Property tests for encode/decode over arbitrary trees.
//!
//! - Decoding an encoding reproduces labels, payloads and child order
//! - `encoded_size` matches the bytes actually written
//! - Any truncation of a valid encoding is rejected

use proptest::prelude::*;
use tree_serializer::{CodecError, Node};

fn label_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9_]{0,12}"
}

fn leaf_strategy() -> impl Strategy<Value = Node> {
    (label_strategy(), proptest::option::of(proptest::collection::vec(any::<u8>(), 0..64)))
        .prop_map(|(label, payload)| Node::leaf(label, payload.as_deref()).unwrap())
}

fn tree_strategy() -> impl Strategy<Value = Node> {
    leaf_strategy().prop_recursive(5, 64, 6, |inner| {
        (label_strategy(), proptest::collection::vec(inner, 0..6)).prop_map(|(label, children)| {
            let mut node = Node::internal(label).unwrap();
            for child in children {
                node.append(child);
            }
            node
        })
    })
}

#[test]
fn prop_decode_inverts_encode() {
    proptest!(|(tree in tree_strategy())| {
        let bytes = tree.to_bytes().unwrap();
        let decoded = Node::decode(&bytes).unwrap();
        prop_assert_eq!(decoded, tree);
    });
}

#[test]
fn prop_encoded_size_is_exact() {
    proptest!(|(tree in tree_strategy(), layer in any::<u8>())| {
        let size = tree.encoded_size();
        let mut buf = vec![0u8; size + 16];
        prop_assert_eq!(tree.write(&mut buf, layer).unwrap(), size);
        prop_assert_eq!(tree.to_bytes().unwrap().len(), size);
    });
}

#[test]
fn prop_truncation_is_detected() {
    proptest!(|(tree in tree_strategy(), cut in 1usize..32)| {
        let bytes = tree.to_bytes().unwrap();
        let keep = bytes.len().saturating_sub(cut);
        let result = Node::decode(&bytes[..keep]);
        prop_assert!(matches!(result, Err(CodecError::Truncated { .. })), "got {:?}", result);
    });
}

#[test]
fn prop_short_buffer_is_rejected() {
    proptest!(|(tree in tree_strategy())| {
        let mut buf = vec![0u8; tree.encoded_size() - 1];
        let result = tree.write(&mut buf, 0);
        prop_assert!(matches!(result, Err(CodecError::BufferTooSmall { .. })), "short buffer must fail");
    });
}

#[test]
fn prop_layers_follow_depth() {
    proptest!(|(tree in tree_strategy(), root_layer in 0u8..200)| {
        let mut buf = vec![0u8; tree.encoded_size()];
        tree.write(&mut buf, root_layer).unwrap();

        // Walk the records in the same pre-order the encoder used.
        let mut offset = 0;
        for (depth, node) in tree.walk() {
            prop_assert_eq!(buf[offset] as usize, root_layer as usize + depth);
            offset += 7 + node.label().len();
            if node.is_leaf() {
                offset += node.content_size();
            }
        }
        prop_assert_eq!(offset, buf.len());
    });
}
