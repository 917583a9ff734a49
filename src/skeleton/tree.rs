use std::collections::BTreeMap;

use glam::{DMat4, DVec3};

use crate::{
    animation::curve::Curve3,
    foundation::error::CmdentResult,
    foundation::math::{pivoted, rigid},
    scene::model::{Channel, FaceDef, FaceName, KeyframeDef, OutlinerNodeDef, PartDef},
};

/// Index of a [`LeafPart`] inside its [`SkeletonTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartId(pub usize);

/// Rigid geometry bound to exactly one bone.
#[derive(Clone, Debug, PartialEq)]
pub struct LeafPart {
    pub name: String,
    pub from: DVec3,
    pub to: DVec3,
    /// Pivot of the part in model space.
    pub origin: DVec3,
    pub rotation_deg: DVec3,
    pub faces: BTreeMap<FaceName, FaceDef>,
    /// Unique numeric id selecting this part's model override.
    pub custom_id: u32,
}

impl LeafPart {
    /// `T(origin) * R(rotation)`; places the part's display center on its pivot.
    pub fn local_matrix(&self) -> DMat4 {
        rigid(self.origin, self.rotation_deg)
    }
}

/// Hierarchy node, traversed by pattern matching.
#[derive(Clone, Debug)]
pub enum Node {
    Bone(BoneNode),
    Part(PartId),
}

#[derive(Clone, Debug)]
pub struct BoneNode {
    pub uuid: String,
    pub name: String,
    pub rest_origin: DVec3,
    pub rest_rotation_deg: DVec3,
    /// Additive position delta.
    pub position: Curve3,
    /// Additive rotation delta in degrees.
    pub rotation: Curve3,
    pub children: Vec<Node>,
}

/// Rest pose offset by the curve deltas at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalTransform {
    pub translation: DVec3,
    pub rotation_deg: DVec3,
    pub pivot: DVec3,
}

impl LocalTransform {
    /// `T(translation) * R(rotation) * T(-pivot)`.
    pub fn matrix(&self) -> DMat4 {
        pivoted(self.translation, self.rotation_deg, self.pivot)
    }
}

impl BoneNode {
    pub fn local_transform(&self, t_seconds: f64) -> LocalTransform {
        LocalTransform {
            translation: self.rest_origin + self.position.eval(t_seconds),
            rotation_deg: self.rest_rotation_deg + self.rotation.eval(t_seconds),
            pivot: self.rest_origin,
        }
    }
}

/// Bone hierarchy with bound curves and the leaf parts it carries.
#[derive(Clone, Debug)]
pub struct SkeletonTree {
    roots: Vec<Node>,
    parts: Vec<LeafPart>,
}

impl SkeletonTree {
    /// Build the hierarchy from authoring nodes, binding each bone to the keyframe track with its
    /// uuid and each part node to the leaf of the same name.
    ///
    /// Bones without a track get no-op curves. Tracks that match no bone, unsupported channels,
    /// and part nodes with no leaf binding are skipped.
    pub fn bind(
        roots: &[OutlinerNodeDef],
        tracks: &BTreeMap<String, Vec<KeyframeDef>>,
        parts: Vec<LeafPart>,
    ) -> Self {
        let by_name: BTreeMap<&str, PartId> = parts
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name.as_str(), PartId(i)))
            .collect();

        let mut matched = 0usize;
        let nodes = roots
            .iter()
            .filter_map(|n| bind_node(n, tracks, &by_name, &mut matched))
            .collect();

        if matched < tracks.len() {
            for uuid in tracks.keys() {
                if !contains_bone(roots, uuid) {
                    tracing::debug!(bone = %uuid, "keyframe track matches no bone; ignored");
                }
            }
        }

        Self {
            roots: nodes,
            parts,
        }
    }

    pub fn roots(&self) -> &[Node] {
        &self.roots
    }

    pub fn parts(&self) -> &[LeafPart] {
        &self.parts
    }

    pub fn part(&self, id: PartId) -> &LeafPart {
        &self.parts[id.0]
    }

    /// World matrix of every bound part at `t_seconds`, in declaration order.
    pub fn world_transforms(&self, t_seconds: f64, parent_world: DMat4) -> Vec<(PartId, DMat4)> {
        let mut out = Vec::with_capacity(self.parts.len());
        for node in &self.roots {
            self.visit(node, t_seconds, parent_world, &mut out);
        }
        out
    }

    fn visit(&self, node: &Node, t: f64, parent_world: DMat4, out: &mut Vec<(PartId, DMat4)>) {
        match node {
            Node::Part(id) => out.push((*id, parent_world * self.part(*id).local_matrix())),
            Node::Bone(bone) => {
                let world = parent_world * bone.local_transform(t).matrix();
                for child in &bone.children {
                    self.visit(child, t, world, out);
                }
            }
        }
    }
}

fn bind_node(
    def: &OutlinerNodeDef,
    tracks: &BTreeMap<String, Vec<KeyframeDef>>,
    parts: &BTreeMap<&str, PartId>,
    matched: &mut usize,
) -> Option<Node> {
    match def {
        OutlinerNodeDef::Part(p) => {
            let id = parts.get(p.name.as_str()).copied();
            if id.is_none() {
                tracing::warn!(part = %p.name, "part node has no leaf binding; skipped");
            }
            id.map(Node::Part)
        }
        OutlinerNodeDef::Bone(b) => {
            let mut position = Curve3::new();
            let mut rotation = Curve3::new();
            if let Some(keys) = tracks.get(&b.uuid) {
                *matched += 1;
                for key in keys {
                    let curve = match key.channel {
                        Channel::Position => &mut position,
                        Channel::Rotation => &mut rotation,
                        Channel::Unsupported => {
                            tracing::debug!(bone = %b.uuid, time = key.time, "unsupported channel; skipped");
                            continue;
                        }
                    };
                    let Some(first) = key.data_points.first() else {
                        continue;
                    };
                    let value = DVec3::from_array(*first);
                    let post = key.data_points.get(1).map(|p| DVec3::from_array(*p));
                    curve.add_keyframe(key.time, value, key.interpolation, post);
                }
            }

            Some(Node::Bone(BoneNode {
                uuid: b.uuid.clone(),
                name: b.name.clone(),
                rest_origin: DVec3::from_array(b.origin),
                rest_rotation_deg: DVec3::from_array(b.rotation),
                position,
                rotation,
                children: b
                    .children
                    .iter()
                    .filter_map(|c| bind_node(c, tracks, parts, matched))
                    .collect(),
            }))
        }
    }
}

/// Collect every part in declaration (depth-first) order, asking `assign_id` for its custom id.
pub fn leaf_parts<F>(roots: &[OutlinerNodeDef], mut assign_id: F) -> CmdentResult<Vec<LeafPart>>
where
    F: FnMut(&PartDef) -> CmdentResult<u32>,
{
    fn walk<F>(nodes: &[OutlinerNodeDef], assign_id: &mut F, out: &mut Vec<LeafPart>) -> CmdentResult<()>
    where
        F: FnMut(&PartDef) -> CmdentResult<u32>,
    {
        for node in nodes {
            match node {
                OutlinerNodeDef::Bone(b) => walk(&b.children, assign_id, out)?,
                OutlinerNodeDef::Part(p) => out.push(LeafPart {
                    name: p.name.clone(),
                    from: DVec3::from_array(p.from),
                    to: DVec3::from_array(p.to),
                    origin: DVec3::from_array(p.origin),
                    rotation_deg: DVec3::from_array(p.rotation),
                    faces: p.faces.clone(),
                    custom_id: assign_id(p)?,
                }),
            }
        }
        Ok(())
    }

    let mut out = Vec::new();
    walk(roots, &mut assign_id, &mut out)?;
    Ok(out)
}

fn contains_bone(nodes: &[OutlinerNodeDef], uuid: &str) -> bool {
    nodes.iter().any(|n| match n {
        OutlinerNodeDef::Bone(b) => b.uuid == uuid || contains_bone(&b.children, uuid),
        OutlinerNodeDef::Part(_) => false,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/skeleton/tree.rs"]
mod tests;
