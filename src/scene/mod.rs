//! Authoring-side scene model: the bone/part outliner, textures, and animation tracks.

/// Loaded entity with its resolution directory.
pub mod entity;
/// Serde definitions of the authoring JSON.
pub mod model;
