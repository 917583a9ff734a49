//! cmdent compiles keyframed skeletal animations into self-scheduling command programs.
//!
//! A rig of bones and rigid parts is sampled at 20 ticks per second. Every tick becomes a pair
//! of programs for a line-oriented game command interpreter: a dispatcher that finds the
//! instances waiting on that tick, and a frame body that poses their part proxies and schedules
//! the next tick. The public API is pass-oriented:
//!
//! - Load and validate an [`Entity`]
//! - Create a [`CompileContext`] from [`CompileOpts`]
//! - Run [`compile_entity`] and push the resulting [`ArtifactSet`] into an [`ArtifactSink`]
#![forbid(unsafe_code)]

/// Keyframe curves and loop policies.
pub mod animation;
/// Entity compilation and the artifact set.
pub mod compile;
/// Artifact sinks.
pub mod emit;
/// Directive text, part models, and textures.
pub mod export;
mod foundation;
/// Boundary scene model.
pub mod scene;
/// Bone hierarchy and forward kinematics.
pub mod skeleton;

pub use crate::foundation::core::{
    EMIT_DIGITS, ResourcePath, TICKS_PER_SECOND, TickIndex, fmt_num, last_tick_for,
    normalize_rel_path, round_to,
};
pub use crate::foundation::error::{CmdentError, CmdentResult};
pub use crate::foundation::math::{Pose, decompose};

pub use crate::animation::curve::{Curve3, Interpolation};
pub use crate::animation::policy::LoopPolicy;
pub use crate::compile::{
    ArtifactFingerprint, ArtifactSet, CompileContext, CompileOpts, CompiledEntity,
    compile_entity, fingerprint_artifacts,
};
pub use crate::emit::{ArtifactSink, DirSink, InMemorySink, emit_artifacts};
pub use crate::scene::entity::Entity;
pub use crate::scene::model::EntityDef;
pub use crate::skeleton::SkeletonTree;

#[cfg(test)]
#[path = "../tests/unit/fixtures.rs"]
pub(crate) mod test_fixtures;
