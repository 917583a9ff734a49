use std::collections::{BTreeMap, BTreeSet};

use crate::{
    animation::curve::Interpolation,
    foundation::core::is_valid_segment,
    foundation::error::{CmdentError, CmdentResult},
};

/// JSON-facing authoring data for one entity rig.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct EntityDef {
    /// Entity name; becomes a path segment and part of every tag.
    pub name: String,
    /// Textures referenced by part faces.
    #[serde(default)]
    pub textures: Vec<TextureDef>,
    /// Root nodes of the bone hierarchy, in declaration order.
    pub outliner: Vec<OutlinerNodeDef>,
    /// Animations compiled for this entity; successor ids are 1-based positions in this list.
    #[serde(default)]
    pub animations: Vec<AnimationDef>,
}

/// One hierarchy node: a bone with children, or a rigid leaf part.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlinerNodeDef {
    Bone(BoneDef),
    Part(PartDef),
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct BoneDef {
    /// Identity used to match keyframe tracks.
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    /// Rest pivot in model units.
    pub origin: [f64; 3],
    /// Rest rotation in degrees.
    #[serde(default)]
    pub rotation: [f64; 3],
    #[serde(default)]
    pub children: Vec<OutlinerNodeDef>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct PartDef {
    /// Part name; unique within the entity.
    pub name: String,
    pub from: [f64; 3],
    pub to: [f64; 3],
    pub origin: [f64; 3],
    #[serde(default)]
    pub rotation: [f64; 3],
    #[serde(default)]
    pub faces: BTreeMap<FaceName, FaceDef>,
    /// Explicit custom id; assigned from the compile context when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_model_data: Option<u32>,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum FaceName {
    North,
    East,
    South,
    West,
    Up,
    Down,
}

impl FaceName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FaceDef {
    /// Texture id; `None` leaves the face out of the exported model.
    #[serde(default)]
    pub texture: Option<String>,
    /// Normalized UV rectangle `[u0, v0, u1, v1]`.
    pub uv: [f64; 4],
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct TextureDef {
    pub id: String,
    /// Entity-relative PNG path or a `data:image/png;base64,` URL.
    pub source: String,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct AnimationDef {
    pub name: String,
    /// Duration in seconds.
    pub length: f64,
    /// Loop policy as authored (`once`, `hold`, `loop`); parsed at compile time.
    #[serde(rename = "loop", default = "default_loop_mode")]
    pub loop_mode: String,
    /// Keyframe tracks keyed by bone uuid.
    #[serde(default)]
    pub animators: BTreeMap<String, Vec<KeyframeDef>>,
}

fn default_loop_mode() -> String {
    "once".to_string()
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct KeyframeDef {
    pub channel: Channel,
    /// Time in seconds.
    pub time: f64,
    #[serde(default)]
    pub interpolation: Interpolation,
    /// One value, or a value followed by the post-keyframe value.
    pub data_points: Vec<[f64; 3]>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Position,
    Rotation,
    /// Channels the rig cannot express (e.g. scale); skipped at bind time.
    #[serde(other)]
    Unsupported,
}

impl EntityDef {
    /// Validate names, references, and keyframe shapes.
    pub fn validate(&self) -> CmdentResult<()> {
        if !is_valid_segment(&self.name) {
            return Err(CmdentError::validation(format!(
                "entity name '{}' must be non-empty and use only [a-z0-9_.-]",
                self.name
            )));
        }

        let mut texture_ids = BTreeSet::new();
        for tex in &self.textures {
            if !is_valid_segment(&tex.id) {
                return Err(CmdentError::validation(format!(
                    "entity '{}': texture id '{}' must use only [a-z0-9_.-]",
                    self.name, tex.id
                )));
            }
            if !texture_ids.insert(tex.id.as_str()) {
                return Err(CmdentError::validation(format!(
                    "entity '{}': duplicate texture id '{}'",
                    self.name, tex.id
                )));
            }
        }

        let mut bone_ids = BTreeSet::new();
        let mut part_names = BTreeSet::new();
        let mut explicit_ids = BTreeMap::new();
        let mut stack: Vec<&OutlinerNodeDef> = self.outliner.iter().collect();
        while let Some(node) = stack.pop() {
            match node {
                OutlinerNodeDef::Bone(bone) => {
                    if !bone_ids.insert(bone.uuid.as_str()) {
                        return Err(CmdentError::validation(format!(
                            "entity '{}': duplicate bone uuid '{}'",
                            self.name, bone.uuid
                        )));
                    }
                    stack.extend(bone.children.iter());
                }
                OutlinerNodeDef::Part(part) => {
                    self.validate_part(part, &texture_ids)?;
                    if !part_names.insert(part.name.as_str()) {
                        return Err(CmdentError::validation(format!(
                            "entity '{}': duplicate part name '{}'",
                            self.name, part.name
                        )));
                    }
                    if let Some(id) = part.custom_model_data
                        && let Some(other) = explicit_ids.insert(id, part.name.as_str())
                    {
                        return Err(CmdentError::validation(format!(
                            "entity '{}': duplicate custom id {id} on parts '{other}' and '{}'",
                            self.name, part.name
                        )));
                    }
                }
            }
        }

        let mut anim_names = BTreeSet::new();
        for anim in &self.animations {
            if !is_valid_segment(&anim.name) {
                return Err(CmdentError::validation(format!(
                    "entity '{}': animation name '{}' must use only [a-z0-9_.-]",
                    self.name, anim.name
                )));
            }
            if !anim_names.insert(anim.name.as_str()) {
                return Err(CmdentError::validation(format!(
                    "entity '{}': duplicate animation name '{}'",
                    self.name, anim.name
                )));
            }
            anim.validate().map_err(|e| {
                CmdentError::validation(format!("entity '{}': {e}", self.name))
            })?;
        }

        Ok(())
    }

    fn validate_part(&self, part: &PartDef, texture_ids: &BTreeSet<&str>) -> CmdentResult<()> {
        if !is_valid_segment(&part.name) {
            return Err(CmdentError::validation(format!(
                "entity '{}': part name '{}' must use only [a-z0-9_.-]",
                self.name, part.name
            )));
        }
        for (face, def) in &part.faces {
            if let Some(tex) = &def.texture
                && !texture_ids.contains(tex.as_str())
            {
                return Err(CmdentError::validation(format!(
                    "entity '{}', part '{}', face '{}': unknown texture '{tex}'",
                    self.name,
                    part.name,
                    face.as_str()
                )));
            }
        }
        Ok(())
    }

    /// Number of animations addressable through the successor register.
    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }
}

impl AnimationDef {
    /// Validate duration and keyframe shapes.
    pub fn validate(&self) -> CmdentResult<()> {
        if !self.length.is_finite() || self.length < 0.0 {
            return Err(CmdentError::validation(format!(
                "animation '{}': length must be finite and >= 0",
                self.name
            )));
        }
        for (bone, keys) in &self.animators {
            for key in keys {
                if !key.time.is_finite() {
                    return Err(CmdentError::validation(format!(
                        "animation '{}', bone '{bone}': keyframe time must be finite",
                        self.name
                    )));
                }
                if key.data_points.is_empty() || key.data_points.len() > 2 {
                    return Err(CmdentError::validation(format!(
                        "animation '{}', bone '{bone}': keyframe at {}s needs one or two data points",
                        self.name, key.time
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
