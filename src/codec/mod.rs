// tree-serializer/src/codec/mod.rs

pub mod cursor;
pub mod decode;
pub mod encode;

pub use cursor::{NodeReader, NodeWriter};
