/// Ticks, resource paths, and emission-boundary number formatting.
pub mod core;
/// Error taxonomy.
pub mod error;
/// Rigid transform construction and decomposition.
pub mod math;
