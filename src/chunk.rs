// tree-serializer/src/chunk.rs

//! Blake3 fingerprints of encoded trees.
use blake3::Hasher;

use crate::common::Hash;
use crate::error::Result;
use crate::node::Node;

pub fn hash_bytes(bytes: &[u8]) -> Hash {
    Hasher::new().update(bytes).finalize().into()
}

impl Node {
    /// Hash of the layer-0 encoding. Equal trees have equal fingerprints.
    pub fn fingerprint(&self) -> Result<Hash> {
        Ok(hash_bytes(&self.to_bytes()?))
    }

    pub fn fingerprint_hex(&self) -> Result<String> {
        Ok(hex::encode(self.fingerprint()?))
    }
}
