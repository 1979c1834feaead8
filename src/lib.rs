// tree-serializer/src/lib.rs

//! Self-describing binary codec for labeled trees.
//!
//! Each [`Node`] carries a short label and either an opaque payload (a leaf)
//! or an ordered list of children. Encoding walks the tree depth-first and
//! emits, per node:
//!
//! | field            | size           |
//! |------------------|----------------|
//! | layer            | 1              |
//! | label length     | 1              |
//! | label            | label length   |
//! | content size     | 4, host order  |
//! | has-payload flag | 1              |
//! | content          | content size   |
//!
//! Decoding is the mirror walk and must consume its input exactly.

pub mod chunk;
pub mod codec;
pub mod common;
pub mod error;
pub mod node;
pub mod store;

pub use crate::common::{CodecConfig, Hash, HEADER_SIZE, MAX_CONTENT_SIZE, MAX_LABEL_LEN};
pub use crate::error::{CodecError, Result};
pub use crate::node::{Content, Node, Walk};
pub use crate::store::{open_tree, save_tree};
