//! Keyframe curves and loop policies.

/// Keyframed 3-component curves.
pub mod curve;
/// Final-tick behavior.
pub mod policy;
