use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use crate::compile::artifacts::ArtifactSet;
use crate::foundation::core::normalize_rel_path;
use crate::foundation::error::{CmdentError, CmdentResult};

/// Sink contract for persisting compiled artifacts.
///
/// `write` is called once per artifact in path order, between `begin` and `end`.
pub trait ArtifactSink {
    /// Called once before any artifact is written.
    fn begin(&mut self, artifact_count: usize) -> CmdentResult<()>;
    /// Persist one artifact at a pack-relative path.
    fn write(&mut self, rel_path: &str, bytes: &[u8]) -> CmdentResult<()>;
    /// Called once after the last artifact.
    fn end(&mut self) -> CmdentResult<()>;
}

/// Push every artifact of `set` through `sink`.
#[tracing::instrument(skip(set, sink), fields(artifacts = set.len()))]
pub fn emit_artifacts(set: &ArtifactSet, sink: &mut dyn ArtifactSink) -> CmdentResult<()> {
    sink.begin(set.len())?;
    for (path, bytes) in set.iter() {
        sink.write(path, bytes)?;
    }
    sink.end()
}

/// Writes artifacts under a root directory; each file is replaced atomically.
#[derive(Debug)]
pub struct DirSink {
    root: PathBuf,
    written: usize,
}

impl DirSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            written: 0,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn written(&self) -> usize {
        self.written
    }
}

impl ArtifactSink for DirSink {
    fn begin(&mut self, _artifact_count: usize) -> CmdentResult<()> {
        self.written = 0;
        fs::create_dir_all(&self.root).map_err(|e| {
            CmdentError::io(format!("create output dir '{}': {e}", self.root.display()))
        })
    }

    fn write(&mut self, rel_path: &str, bytes: &[u8]) -> CmdentResult<()> {
        let rel = normalize_rel_path(rel_path)?;
        let dest = self.root.join(&rel);
        let dir = dest.parent().unwrap_or(&self.root);
        fs::create_dir_all(dir)
            .map_err(|e| CmdentError::io(format!("create dir '{}': {e}", dir.display())))?;

        let file_name = dest
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tmp = dir.join(format!(".{file_name}.tmp"));
        let write_tmp = || -> std::io::Result<()> {
            let mut f = fs::File::create(&tmp)?;
            f.write_all(bytes)?;
            f.sync_all()
        };
        if let Err(e) = write_tmp() {
            let _ = fs::remove_file(&tmp);
            return Err(CmdentError::io(format!("write '{}': {e}", tmp.display())));
        }
        fs::rename(&tmp, &dest).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            CmdentError::io(format!("rename into '{}': {e}", dest.display()))
        })?;

        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> CmdentResult<()> {
        tracing::debug!(root = %self.root.display(), written = self.written, "artifacts written");
        Ok(())
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    expected: Option<usize>,
    finished: bool,
    /// Artifacts in write order.
    pub(crate) files: Vec<(String, Vec<u8>)>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Artifact count announced in `begin`, if any.
    pub fn expected(&self) -> Option<usize> {
        self.expected
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    pub fn files(&self) -> &[(String, Vec<u8>)] {
        &self.files
    }
}

impl ArtifactSink for InMemorySink {
    fn begin(&mut self, artifact_count: usize) -> CmdentResult<()> {
        self.expected = Some(artifact_count);
        self.finished = false;
        self.files.clear();
        Ok(())
    }

    fn write(&mut self, rel_path: &str, bytes: &[u8]) -> CmdentResult<()> {
        self.files.push((rel_path.to_string(), bytes.to_vec()));
        Ok(())
    }

    fn end(&mut self) -> CmdentResult<()> {
        self.finished = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/emit/sink.rs"]
mod tests;
