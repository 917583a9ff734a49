use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::foundation::error::{CmdentError, CmdentResult};

/// Every file produced by one compile pass, keyed by pack-relative path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArtifactSet {
    files: BTreeMap<String, Vec<u8>>,
}

impl ArtifactSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an artifact. Re-adding identical bytes under the same path is a no-op; different bytes
    /// are an error.
    pub fn insert(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> CmdentResult<()> {
        let path = path.into();
        let bytes = bytes.into();
        match self.files.entry(path) {
            Entry::Vacant(slot) => {
                slot.insert(bytes);
                Ok(())
            }
            Entry::Occupied(slot) if *slot.get() == bytes => Ok(()),
            Entry::Occupied(slot) => Err(CmdentError::validation(format!(
                "artifact '{}' produced twice with different content",
                slot.key()
            ))),
        }
    }

    /// Serialize `value` as pretty JSON and add it.
    pub fn insert_json<T: serde::Serialize>(
        &mut self,
        path: impl Into<String>,
        value: &T,
    ) -> CmdentResult<()> {
        let mut bytes = serde_json::to_vec_pretty(value)
            .map_err(|e| CmdentError::serde(format!("serialize artifact: {e}")))?;
        bytes.push(b'\n');
        self.insert(path, bytes)
    }

    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    /// UTF-8 view of a text artifact.
    pub fn text(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|b| std::str::from_utf8(b).ok())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.files.iter().map(|(p, b)| (p.as_str(), b.as_slice()))
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn total_bytes(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }
}
