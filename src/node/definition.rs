// tree-serializer/src/node/definition.rs

use log::warn;

use crate::common::{CodecConfig, HEADER_SIZE, MAX_CONTENT_SIZE, MAX_LABEL_LEN};
use crate::error::{CodecError, Result};

/// What a node holds. The variant is the leaf/internal discriminator on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Leaf: opaque payload bytes, possibly empty.
    Payload(Vec<u8>),
    /// Internal node: ordered children. Order is preserved through encode/decode.
    Children(Vec<Node>),
}

impl Default for Content {
    fn default() -> Self {
        Content::Payload(Vec::new())
    }
}

/// A labeled tree node. Owns its payload or its children exclusively.
///
/// Labels are UTF-8 text. Encoded input whose label bytes are not valid
/// UTF-8 is refused by the decoder with [`CodecError::InvalidLabel`], so
/// records written elsewhere with arbitrary label bytes cannot be read.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Node {
    label: String,
    content: Content,
}

fn check_label(label: &str) -> Result<()> {
    if label.len() > MAX_LABEL_LEN {
        return Err(CodecError::LabelTooLong(label.len()));
    }
    Ok(())
}

impl Node {
    /// An empty leaf with an empty label.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a leaf holding a copy of `payload`. `None` gives an empty leaf.
    pub fn leaf(label: impl Into<String>, payload: Option<&[u8]>) -> Result<Self> {
        let label = label.into();
        check_label(&label)?;
        Ok(Node {
            label,
            content: Content::Payload(payload.map(<[u8]>::to_vec).unwrap_or_default()),
        })
    }

    /// Creates an internal node with no children yet.
    pub fn internal(label: impl Into<String>) -> Result<Self> {
        let label = label.into();
        check_label(&label)?;
        Ok(Node {
            label,
            content: Content::Children(Vec::new()),
        })
    }

    /// Label and content already known to be representable, e.g. freshly decoded.
    pub(crate) fn from_parts(label: String, content: Content) -> Self {
        debug_assert!(label.len() <= MAX_LABEL_LEN);
        Node { label, content }
    }

    /// Moves the label and content out, leaving `self` an empty leaf.
    pub fn take(&mut self) -> Node {
        std::mem::take(self)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.content, Content::Payload(_))
    }

    /// Payload bytes, or `None` for an internal node.
    pub fn payload(&self) -> Option<&[u8]> {
        match &self.content {
            Content::Payload(bytes) => Some(bytes.as_slice()),
            Content::Children(_) => None,
        }
    }

    /// Children in append order. Empty for a leaf.
    pub fn children(&self) -> &[Node] {
        match &self.content {
            Content::Payload(_) => &[],
            Content::Children(children) => children.as_slice(),
        }
    }

    /// Moves `child` to the end of this node's children.
    ///
    /// A leaf becomes an internal node. Its payload, if any, is dropped.
    pub fn append(&mut self, child: Node) {
        match &mut self.content {
            Content::Children(children) => children.push(child),
            Content::Payload(bytes) => {
                if !bytes.is_empty() {
                    warn!(
                        "Appending child {:?} to leaf {:?} discards {} payload bytes.",
                        child.label,
                        self.label,
                        bytes.len()
                    );
                }
                self.content = Content::Children(vec![child]);
            }
        }
    }

    /// First child whose label matches exactly.
    pub fn get_child(&self, label: &str) -> Option<&Node> {
        self.children().iter().find(|child| child.label == label)
    }

    pub fn get_child_mut(&mut self, label: &str) -> Option<&mut Node> {
        match &mut self.content {
            Content::Payload(_) => None,
            Content::Children(children) => children.iter_mut().find(|child| child.label == label),
        }
    }

    /// Copies as much payload as fits into `dest` and returns the count copied.
    pub fn unload(&self, dest: &mut [u8]) -> usize {
        let payload = self.payload().unwrap_or_default();
        let n = dest.len().min(payload.len());
        dest[..n].copy_from_slice(&payload[..n]);
        n
    }

    /// Bytes following this node's header: payload length, or the full
    /// encoded size of every child. Saturates at `usize::MAX`.
    pub fn content_size(&self) -> usize {
        match &self.content {
            Content::Payload(bytes) => bytes.len(),
            Content::Children(children) => children
                .iter()
                .fold(0usize, |acc, child| acc.saturating_add(child.encoded_size())),
        }
    }

    /// Total bytes `write` emits for this node and its subtree. Saturates at
    /// `usize::MAX`.
    pub fn encoded_size(&self) -> usize {
        self.measure(SizeLimits::UNBOUNDED).unwrap_or(usize::MAX)
    }

    /// Encoded size of the subtree, failing if any node nests deeper than
    /// `limits.max_depth` or holds more than `limits.max_content` bytes.
    /// Walks with an explicit stack, so tree depth does not cost call stack.
    pub(crate) fn measure(&self, limits: SizeLimits) -> Result<usize> {
        let mut frames = vec![Frame { node: self, next_child: 0, content: 0 }];
        let mut total = 0;
        while let Some(frame) = frames.last_mut() {
            let node = frame.node;
            if let Content::Children(children) = &node.content {
                if let Some(child) = children.get(frame.next_child) {
                    frame.next_child += 1;
                    // The child sits at depth frames.len().
                    if frames.len() > limits.max_depth {
                        return Err(CodecError::DepthExceeded { max_depth: limits.max_depth });
                    }
                    frames.push(Frame { node: child, next_child: 0, content: 0 });
                    continue;
                }
            }
            let content = match &node.content {
                Content::Payload(bytes) => bytes.len(),
                Content::Children(_) => frame.content,
            };
            if content > limits.max_content {
                return Err(CodecError::ContentTooLarge(content));
            }
            let encoded = (HEADER_SIZE + node.label.len())
                .checked_add(content)
                .ok_or(CodecError::ContentTooLarge(content))?;
            frames.pop();
            match frames.last_mut() {
                Some(parent) => {
                    parent.content = parent
                        .content
                        .checked_add(encoded)
                        .ok_or(CodecError::ContentTooLarge(usize::MAX))?;
                }
                None => total = encoded,
            }
        }
        Ok(total)
    }
}

// Children are flattened onto a heap stack so dropping a deep tree does not
// recurse once per level.
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = match &mut self.content {
            Content::Children(children) if !children.is_empty() => std::mem::take(children),
            _ => return,
        };
        while let Some(mut node) = pending.pop() {
            if let Content::Children(grandchildren) = &mut node.content {
                pending.append(grandchildren);
            }
        }
    }
}

/// Bounds applied by [`Node::measure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SizeLimits {
    pub(crate) max_depth: usize,
    pub(crate) max_content: usize,
}

impl SizeLimits {
    pub(crate) const UNBOUNDED: SizeLimits = SizeLimits {
        max_depth: usize::MAX,
        max_content: usize::MAX,
    };

    pub(crate) fn from_config(config: &CodecConfig) -> Self {
        SizeLimits {
            max_depth: config.max_depth,
            max_content: MAX_CONTENT_SIZE,
        }
    }
}

struct Frame<'n> {
    node: &'n Node,
    next_child: usize,
    content: usize,
}
