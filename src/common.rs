// tree-serializer/src/common.rs

use serde::{Deserialize, Serialize};

use crate::error::{CodecError, Result};

/// A 32-byte hash, from Blake3.
pub type Hash = [u8; 32];

/// Fixed per-node header: layer, label length, content size, has-payload flag.
pub const HEADER_SIZE: usize = 1 + 1 + 4 + 1;

/// Longest label the one-byte length field can describe.
pub const MAX_LABEL_LEN: usize = u8::MAX as usize;

/// Largest content size the four-byte size field can describe.
pub const MAX_CONTENT_SIZE: usize = u32::MAX as usize;

/// Tunables for whole-tree encode and decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Layer byte written for the root record. Children get `layer + 1`.
    pub root_layer: u8,
    /// Deepest nesting accepted while decoding. The root sits at depth 0.
    pub max_depth: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            root_layer: 0,
            max_depth: 1024,
        }
    }
}

impl CodecConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(CodecError::Config("max_depth must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Parses and validates a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: CodecConfig =
            serde_json::from_str(json).map_err(|e| CodecError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| CodecError::Serialization(e.to_string()))
    }
}
