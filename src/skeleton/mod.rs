//! Bone hierarchy with bound curves and forward-kinematics sampling.

pub mod tree;

pub use tree::{BoneNode, LeafPart, LocalTransform, Node, PartId, SkeletonTree};
