// tree-serializer/src/store/file_io.rs
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use log::debug;

use crate::common::CodecConfig;
use crate::error::Result;
use crate::node::Node;

/// Encodes `node` into an exactly sized buffer and writes it as the whole file.
pub fn save_tree(node: &Node, path: impl AsRef<Path>, config: &CodecConfig) -> Result<()> {
    let path = path.as_ref();
    let bytes = node.to_bytes_with(config)?;
    let mut file = File::create(path)?;
    file.write_all(&bytes)?;
    file.flush()?;
    debug!("Saved tree {:?} to {}: {} bytes.", node.label(), path.display(), bytes.len());
    Ok(())
}

/// Reads the whole file and decodes it as exactly one tree.
pub fn open_tree(path: impl AsRef<Path>, config: &CodecConfig) -> Result<Node> {
    let path = path.as_ref();
    let mut file = File::open(path)?;
    let mut bytes = Vec::with_capacity(file.metadata()?.len() as usize);
    file.read_to_end(&mut bytes)?;
    debug!("Opened {}: {} bytes.", path.display(), bytes.len());
    Node::decode_with(&bytes, config)
}

impl Node {
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        save_tree(self, path, &CodecConfig::default())
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Node> {
        open_tree(path, &CodecConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodecError;
    use std::path::PathBuf;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tree-serializer-{}-{}", std::process::id(), name))
    }

    #[test]
    fn save_then_open() {
        let path = scratch_path("save_then_open.bin");
        let mut root = Node::internal("settings").unwrap();
        root.append(Node::leaf("volume", Some(&[11])).unwrap());
        root.save(&path).unwrap();

        assert_eq!(std::fs::metadata(&path).unwrap().len() as usize, root.encoded_size());
        assert_eq!(Node::open(&path).unwrap(), root);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn configured_layer_reaches_the_file() {
        let path = scratch_path("layer.bin");
        let config = CodecConfig { root_layer: 4, ..CodecConfig::default() };
        let node = Node::leaf("k", None).unwrap();
        save_tree(&node, &path, &config).unwrap();

        assert_eq!(std::fs::read(&path).unwrap()[0], 4);
        assert_eq!(open_tree(&path, &config).unwrap(), node);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Node::open(scratch_path("does-not-exist.bin")).unwrap_err();
        assert!(matches!(err, CodecError::IoError { .. }));
    }

    #[test]
    fn unwritable_path_is_io_error() {
        let path = scratch_path("no-such-dir").join("tree.bin");
        let err = Node::new().save(&path).unwrap_err();
        assert!(matches!(err, CodecError::IoError { .. }));
    }

    #[test]
    fn truncated_file_fails_to_open() {
        let path = scratch_path("truncated.bin");
        let node = Node::leaf("k", Some(b"value")).unwrap();
        let bytes = node.to_bytes().unwrap();
        std::fs::write(&path, &bytes[..bytes.len() - 1]).unwrap();

        assert!(matches!(Node::open(&path), Err(CodecError::Truncated { .. })));
        std::fs::remove_file(&path).unwrap();
    }
}
