//! Per-part export: directive text, model descriptors, textures, and override tables.

/// Typed target-language directives.
pub mod directive;
/// Spawn/pose directives and static model assets for rigid parts.
pub mod part;
/// Texture loading and canonical PNG encoding.
pub mod textures;

pub use directive::{Directive, render_program};
pub use part::{ModelDescriptor, OverrideEntry, OverrideTable, RigidPartExporter};
pub use textures::{PreparedTexture, TextureStore};
