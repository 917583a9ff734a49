//! Entity compilation: frame graphs, support programs, and the artifact set.

pub mod artifacts;
pub mod context;
pub mod entity;
pub mod fingerprint;
pub mod frames;

pub use artifacts::ArtifactSet;
pub use context::{CompileContext, CompileOpts};
pub use entity::{CompiledEntity, compile_entity};
pub use fingerprint::{ArtifactFingerprint, fingerprint_artifacts};
pub use frames::{AnimationPlan, CompiledAnimation, CompiledFrame, FrameCompiler, Successor};
