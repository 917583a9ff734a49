use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::foundation::error::{CmdentError, CmdentResult};
use crate::scene::model::EntityDef;

/// Entity boundary object.
///
/// This is the JSON-facing, human-edited representation of a rig and its animations, together
/// with the directory that relative texture paths resolve against.
#[derive(Debug, Clone)]
pub struct Entity {
    def: EntityDef,
    base_dir: PathBuf,
}

impl Entity {
    /// Parse an entity from a JSON reader; relative texture paths resolve against `base_dir`.
    pub fn from_reader<R: std::io::Read>(r: R, base_dir: impl Into<PathBuf>) -> CmdentResult<Self> {
        let def: EntityDef = serde_json::from_reader(r)
            .map_err(|e| CmdentError::serde(format!("parse entity JSON: {e}")))?;
        Ok(Self {
            def,
            base_dir: base_dir.into(),
        })
    }

    /// Parse an entity from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> CmdentResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            CmdentError::io(format!("open entity JSON '{}': {e}", path.display()))
        })?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::from_reader(BufReader::new(f), base_dir)
    }

    /// Wrap an already-built definition.
    pub fn from_def(def: EntityDef, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            def,
            base_dir: base_dir.into(),
        }
    }

    pub fn validate(&self) -> CmdentResult<()> {
        self.def.validate()
    }

    pub fn def(&self) -> &EntityDef {
        &self.def
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}
