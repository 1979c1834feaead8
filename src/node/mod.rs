// tree-serializer/src/node/mod.rs

pub mod definition;
pub mod walk;

pub use definition::{Content, Node};
pub use walk::Walk;
