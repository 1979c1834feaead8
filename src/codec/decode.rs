// tree-serializer/src/codec/decode.rs

use std::io::Read;

use log::{debug, trace};

use crate::codec::cursor::NodeReader;
use crate::common::CodecConfig;
use crate::error::{CodecError, Result};
use crate::node::{Content, Node};

impl Node {
    /// Decodes one node and its subtree from the front of `bytes`.
    /// Returns the node and the number of bytes it occupied.
    pub fn read(bytes: &[u8]) -> Result<(Node, usize)> {
        Self::read_with(bytes, &CodecConfig::default())
    }

    pub fn read_with(bytes: &[u8], config: &CodecConfig) -> Result<(Node, usize)> {
        config.validate()?;
        let mut reader = NodeReader::new(bytes);
        let node = read_tree(&mut reader, config.max_depth)?;
        Ok((node, reader.position()))
    }

    /// Decodes a buffer holding exactly one encoded tree.
    pub fn decode(bytes: &[u8]) -> Result<Node> {
        Self::decode_with(bytes, &CodecConfig::default())
    }

    /// Like [`Node::decode`], with an explicit nesting limit.
    pub fn decode_with(bytes: &[u8], config: &CodecConfig) -> Result<Node> {
        let (node, consumed) = Self::read_with(bytes, config)?;
        if consumed != bytes.len() {
            return Err(CodecError::LengthMismatch {
                consumed,
                expected: bytes.len(),
            });
        }
        debug!("Decoded node {:?} from {} bytes.", node.label(), consumed);
        Ok(node)
    }

    /// Reads `reader` to the end and decodes the bytes as one tree.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Node> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::decode(&bytes)
    }
}

/// An internal node whose children are still being read from `region`.
struct OpenNode<'a> {
    label: String,
    children: Vec<Node>,
    region: NodeReader<'a>,
}

struct RecordHeader {
    layer: u8,
    label: String,
    content_size: usize,
    has_payload: bool,
}

fn read_header(reader: &mut NodeReader<'_>) -> Result<RecordHeader> {
    // Layer is informational only.
    let layer = reader.read_u8()?;
    let label_len = reader.read_u8()? as usize;
    let label_at = reader.offset();
    let label = std::str::from_utf8(reader.read_bytes(label_len)?)
        .map_err(|_| CodecError::InvalidLabel { offset: label_at })?
        .to_owned();
    let content_size = reader.read_u32()? as usize;
    let flag_at = reader.offset();
    let has_payload = match reader.read_u8()? {
        1 => true,
        0 => false,
        flag => return Err(CodecError::InvalidPayloadFlag { offset: flag_at, flag }),
    };
    Ok(RecordHeader {
        layer,
        label,
        content_size,
        has_payload,
    })
}

/// Decodes one record and its subtree. Open internal nodes live on a heap
/// stack, so nesting depth costs no call stack.
fn read_tree<'a>(reader: &mut NodeReader<'a>, max_depth: usize) -> Result<Node> {
    let mut open: Vec<OpenNode<'a>> = Vec::new();
    loop {
        // The next record sits at depth open.len().
        if open.len() > max_depth {
            return Err(CodecError::DepthExceeded { max_depth });
        }
        let source = match open.last_mut() {
            Some(parent) => &mut parent.region,
            None => &mut *reader,
        };
        let record_at = source.offset();
        let before = source.position();
        let header = read_header(source)?;
        // Headers are at least 7 bytes, so this cannot fire today; it stops the
        // loop from spinning if a record ever made no progress.
        if source.position() == before {
            return Err(CodecError::EmptyChildRecord { offset: record_at });
        }
        trace!(
            "Reading {:?} at offset {}: layer {}, {} content bytes.",
            header.label,
            record_at,
            header.layer,
            header.content_size
        );

        let mut finished = if header.has_payload {
            let payload = source.read_bytes(header.content_size)?.to_vec();
            Some(Node::from_parts(header.label, Content::Payload(payload)))
        } else {
            let region = source.sub_reader(header.content_size)?;
            open.push(OpenNode {
                label: header.label,
                children: Vec::new(),
                region,
            });
            None
        };

        // Hand finished nodes to their parents, closing every parent whose
        // region is used up.
        loop {
            if let Some(node) = finished.take() {
                match open.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => return Ok(node),
                }
            }
            if !open.last().is_some_and(|parent| parent.region.is_empty()) {
                break;
            }
            if let Some(parent) = open.pop() {
                finished = Some(Node::from_parts(parent.label, Content::Children(parent.children)));
            }
        }
    }
}
