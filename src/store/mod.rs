// tree-serializer/src/store/mod.rs

pub mod file_io;

pub use file_io::{open_tree, save_tree};
