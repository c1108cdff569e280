//! The IR document as seen by the plugin.
//!
//! Only the top-level envelope is modelled. Type, service, and error
//! definitions stay as JSON values; the generator owns their meaning.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::CoreError;

/// IR format version understood by this plugin.
pub const SUPPORTED_IR_VERSION: u64 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConjureDefinition {
    pub version: u64,
    #[serde(default)]
    pub errors: Vec<Value>,
    #[serde(default)]
    pub types: Vec<Value>,
    #[serde(default)]
    pub services: Vec<Value>,
    #[serde(default)]
    pub extensions: Map<String, Value>,
    /// Top-level fields not modelled above, kept so re-serialization is lossless.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl ConjureDefinition {
    /// Parse IR bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidIr`] if the bytes are not an IR document
    /// and [`CoreError::UnsupportedIrVersion`] for unknown IR versions.
    pub fn from_ir_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        let definition: Self = serde_json::from_slice(bytes).map_err(CoreError::InvalidIr)?;
        if definition.version != SUPPORTED_IR_VERSION {
            return Err(CoreError::UnsupportedIrVersion {
                found: definition.version,
                expected: SUPPORTED_IR_VERSION,
            });
        }
        Ok(definition)
    }

    /// Serialize back to pretty-printed IR JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Serialize`] if serialization fails.
    pub fn to_ir_bytes(&self) -> Result<Vec<u8>, CoreError> {
        serde_json::to_vec_pretty(self).map_err(CoreError::Serialize)
    }
}
