// tree-serializer/src/codec/encode.rs

use std::io::Write;

use log::{debug, trace};

use crate::codec::cursor::NodeWriter;
use crate::common::{CodecConfig, MAX_CONTENT_SIZE};
use crate::error::{CodecError, Result};
use crate::node::definition::SizeLimits;
use crate::node::{Content, Node};

impl Node {
    /// Encodes this node and its subtree into `dest`, tagging the root record
    /// with `layer`. Returns the number of bytes written.
    ///
    /// The tree is measured first. Nothing is written if a content size does
    /// not fit its 4-byte field, if the tree nests deeper than the default
    /// [`CodecConfig::max_depth`], or if `dest` is shorter than
    /// [`Node::encoded_size`].
    pub fn write(&self, dest: &mut [u8], layer: u8) -> Result<usize> {
        self.write_limited(dest, layer, SizeLimits::from_config(&CodecConfig::default()))
    }

    /// Encodes into a freshly allocated, exactly sized buffer at layer 0.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.to_bytes_with(&CodecConfig::default())
    }

    /// Trees deeper than `config.max_depth` are refused here, so anything this
    /// returns decodes under the same config.
    pub fn to_bytes_with(&self, config: &CodecConfig) -> Result<Vec<u8>> {
        config.validate()?;
        let size = self.measure(SizeLimits::from_config(config))?;
        let mut buf = vec![0u8; size];
        let written = encode_into(self, &mut buf, config.root_layer)?;
        debug_assert_eq!(written, buf.len());
        debug!("Encoded node {:?}: {} bytes at layer {}.", self.label(), written, config.root_layer);
        Ok(buf)
    }

    /// Encodes at layer 0 and writes the bytes to `writer`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<usize> {
        let bytes = self.to_bytes()?;
        writer.write_all(&bytes)?;
        Ok(bytes.len())
    }

    pub(crate) fn write_limited(&self, dest: &mut [u8], layer: u8, limits: SizeLimits) -> Result<usize> {
        let needed = self.measure(limits)?;
        if dest.len() < needed {
            return Err(CodecError::BufferTooSmall {
                needed,
                available: dest.len(),
            });
        }
        let written = encode_into(self, dest, layer)?;
        debug!("Encoded node {:?}: {} bytes at layer {}.", self.label(), written, layer);
        Ok(written)
    }
}

fn content_size_field(size: usize) -> Result<u32> {
    if size > MAX_CONTENT_SIZE {
        return Err(CodecError::ContentTooLarge(size));
    }
    Ok(size as u32)
}

enum Step<'n> {
    Open(&'n Node, u8),
    /// Patch the content size of an internal node whose children are all down.
    Close { size_at: usize, start: usize },
}

// Callers measure first. `content_size_field` still guards every patch.
fn encode_into(root: &Node, dest: &mut [u8], layer: u8) -> Result<usize> {
    let mut writer = NodeWriter::new(dest);
    let mut steps = vec![Step::Open(root, layer)];
    while let Some(step) = steps.pop() {
        match step {
            Step::Open(node, layer) => {
                trace!("Writing {:?} at layer {}, offset {}.", node.label(), layer, writer.position());
                let label = node.label().as_bytes();
                writer.write_u8(layer)?;
                writer.write_u8(label.len() as u8)?;
                writer.write_bytes(label)?;
                let size_at = writer.position();
                writer.write_u32(0)?;
                match node.content() {
                    Content::Payload(bytes) => {
                        writer.write_u8(1)?;
                        writer.write_bytes(bytes)?;
                        writer.patch_u32(size_at, content_size_field(bytes.len())?)?;
                    }
                    Content::Children(children) => {
                        writer.write_u8(0)?;
                        steps.push(Step::Close { size_at, start: writer.position() });
                        // Reversed so the first child is written next.
                        for child in children.iter().rev() {
                            steps.push(Step::Open(child, layer.wrapping_add(1)));
                        }
                    }
                }
            }
            Step::Close { size_at, start } => {
                let size = content_size_field(writer.position() - start)?;
                writer.patch_u32(size_at, size)?;
            }
        }
    }
    Ok(writer.position())
}
