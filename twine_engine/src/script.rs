//! Per-actor life script storage.
//!
//! Asset bytes stay immutable and shared; the one-shot and toggle opcodes
//! record their rewrites in a side table keyed by opcode offset instead of
//! mutating the buffer.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{LifeError, LifeResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LifeScriptRepr", into = "LifeScriptRepr")]
pub struct LifeScript {
    bytes: Arc<[u8]>,
    patches: BTreeMap<usize, u8>,
}

/// JSON shape: asset bytes as hex plus any recorded opcode rewrites.
#[derive(Serialize, Deserialize)]
struct LifeScriptRepr {
    bytes: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    patches: BTreeMap<usize, u8>,
}

impl TryFrom<LifeScriptRepr> for LifeScript {
    type Error = String;

    fn try_from(repr: LifeScriptRepr) -> Result<Self, Self::Error> {
        let bytes = twine_formats::decode_hex_script(&repr.bytes)
            .map_err(|err| format!("{err:#}"))?;
        let mut script = LifeScript::new(bytes);
        for (offset, opcode) in repr.patches {
            script
                .patch_opcode(offset, opcode)
                .map_err(|err| err.to_string())?;
        }
        Ok(script)
    }
}

impl From<LifeScript> for LifeScriptRepr {
    fn from(script: LifeScript) -> Self {
        LifeScriptRepr {
            bytes: hex::encode(&script.bytes),
            patches: script.patches,
        }
    }
}

impl Default for LifeScript {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl LifeScript {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
            patches: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The unpatched asset bytes.
    pub fn asset_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Byte at `offset` as the interpreter sees it, rewrites included.
    pub fn byte_at(&self, offset: usize) -> Option<u8> {
        let original = *self.bytes.get(offset)?;
        Some(self.patches.get(&offset).copied().unwrap_or(original))
    }

    pub fn opcode_at(&self, offset: usize) -> Option<u8> {
        self.byte_at(offset)
    }

    pub fn patch_opcode(&mut self, offset: usize, opcode: u8) -> LifeResult<()> {
        let Some(original) = self.bytes.get(offset).copied() else {
            return Err(LifeError::Truncated {
                offset,
                needed: 1,
                len: self.bytes.len(),
            });
        };
        if original == opcode {
            self.patches.remove(&offset);
        } else {
            self.patches.insert(offset, opcode);
        }
        Ok(())
    }

    pub fn patches(&self) -> &BTreeMap<usize, u8> {
        &self.patches
    }

    /// Materialise the script with every rewrite applied.
    pub fn effective_bytes(&self) -> Vec<u8> {
        let mut bytes = self.bytes.to_vec();
        for (&offset, &opcode) in &self.patches {
            bytes[offset] = opcode;
        }
        bytes
    }

    pub fn reset_patches(&mut self) {
        self.patches.clear();
    }

    pub fn shares_asset_with(&self, other: &LifeScript) -> bool {
        Arc::ptr_eq(&self.bytes, &other.bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patches_shadow_the_asset_without_touching_it() {
        let mut script = LifeScript::new(vec![0x0D, 0x10, 0x00, 0x00]);
        let shared = script.clone();
        script.patch_opcode(0, 0x02).expect("patched");

        assert_eq!(script.opcode_at(0), Some(0x02));
        assert_eq!(script.asset_bytes()[0], 0x0D);
        assert_eq!(shared.opcode_at(0), Some(0x0D));
        assert!(script.shares_asset_with(&shared));
        assert_eq!(script.effective_bytes(), vec![0x02, 0x10, 0x00, 0x00]);
    }

    #[test]
    fn patching_back_to_the_asset_byte_drops_the_entry() {
        let mut script = LifeScript::new(vec![0x0D, 0x00]);
        script.patch_opcode(0, 0x02).expect("patched");
        script.patch_opcode(0, 0x0D).expect("restored");
        assert!(script.patches().is_empty());

        script.patch_opcode(0, 0x04).expect("patched");
        script.reset_patches();
        assert_eq!(script.opcode_at(0), Some(0x0D));
        assert!(script.patch_opcode(2, 0x04).is_err());
    }

    #[test]
    fn json_round_trip_keeps_rewrites() {
        let json = r#"{"bytes":"0e10000000","patches":{"0":4}}"#;
        let script: LifeScript = serde_json::from_str(json).expect("parsed");
        assert_eq!(script.opcode_at(0), Some(0x04));
        assert_eq!(serde_json::to_string(&script).expect("serialized"), json);
    }
}
