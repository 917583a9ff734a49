//! Artifact persistence.

pub mod sink;

pub use sink::{ArtifactSink, DirSink, InMemorySink, emit_artifacts};
