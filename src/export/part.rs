use std::collections::BTreeMap;

use glam::DMat4;

use crate::{
    export::directive::{Directive, Selector, TAG_ACTIVE, TAG_ALL, TAG_TEMP, Target, part_tag},
    export::textures::{PreparedTexture, TextureStore},
    foundation::core::{EMIT_DIGITS, ResourcePath, round_to},
    foundation::error::{CmdentError, CmdentResult},
    foundation::math::decompose,
    scene::model::FaceName,
    skeleton::LeafPart,
};

/// Model units per block.
const UNITS_PER_BLOCK: f64 = 16.0;
/// Offset that moves a part's origin onto the center of the item display box.
const DISPLAY_CENTER: [f64; 3] = [8.0, 0.0, 8.0];

/// Model descriptor written for one part.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ModelDescriptor {
    pub textures: BTreeMap<String, String>,
    pub elements: Vec<ModelElement>,
    pub display: ModelDisplay,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ModelElement {
    pub from: [f64; 3],
    pub to: [f64; 3],
    pub faces: BTreeMap<FaceName, ModelFace>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ModelFace {
    pub texture: String,
    pub uv: [f64; 4],
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ModelDisplay {
    pub head: DisplayTransform,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct DisplayTransform {
    pub rotation: [f64; 3],
    pub translation: [f64; 3],
    pub scale: [f64; 3],
}

impl Default for ModelDisplay {
    fn default() -> Self {
        Self {
            head: DisplayTransform {
                rotation: [0.0, -180.0, 0.0],
                translation: [0.0, 6.5, 0.0],
                scale: [1.6, 1.6, 1.6],
            },
        }
    }
}

/// One row of the item override table.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct OverrideEntry {
    pub predicate: OverridePredicate,
    pub model: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct OverridePredicate {
    pub custom_model_data: u32,
}

/// Exports static assets and per-tick pose directives for the parts of one entity.
#[derive(Clone, Debug)]
pub struct RigidPartExporter<'a> {
    entity: &'a str,
    namespace: &'a str,
    model_item: &'a str,
}

impl<'a> RigidPartExporter<'a> {
    pub fn new(entity: &'a str, namespace: &'a str, model_item: &'a str) -> Self {
        Self {
            entity,
            namespace,
            model_item,
        }
    }

    pub fn tag(&self, part: &LeafPart) -> String {
        part_tag(self.entity, &part.name)
    }

    /// Summon the part's proxy, tagged temporary so the spawn program can claim it.
    pub fn spawn_directive(&self, part: &LeafPart) -> Directive {
        Directive::Summon {
            tags: vec![TAG_TEMP.to_string(), self.tag(part), TAG_ALL.to_string()],
            item: self.model_item.to_string(),
            custom_id: part.custom_id,
        }
    }

    /// Reposition and head-pose write for the active proxy of `part`, given its world matrix.
    pub fn pose_directives(&self, part: &LeafPart, world: &DMat4) -> [Directive; 2] {
        let pose = decompose(world);
        let t = pose.translation / UNITS_PER_BLOCK;
        let r = pose.rotation_deg;
        let target = Target::Select(
            Selector::stands()
                .tag(TAG_ACTIVE)
                .tag(self.tag(part))
                .single(),
        );
        [
            Directive::Teleport {
                target: target.clone(),
                offset: [t.x, t.y, -t.z],
            },
            Directive::PoseHead {
                target,
                rotation: [-r.x, r.y, -r.z],
            },
        ]
    }

    pub fn model_path(&self, part: &LeafPart) -> ResourcePath {
        ResourcePath::root(self.namespace)
            .child(self.entity)
            .child(part.name.as_str())
    }

    pub fn texture_path(&self, texture_id: &str) -> ResourcePath {
        ResourcePath::root(self.namespace)
            .child(self.entity)
            .child(texture_id)
    }

    /// Cuboid model re-centered on the part origin. Faces without a texture are omitted; faces
    /// naming a texture the store does not hold are an error.
    pub fn model_descriptor(
        &self,
        part: &LeafPart,
        store: &TextureStore,
    ) -> CmdentResult<ModelDescriptor> {
        let mut textures = BTreeMap::new();
        let mut faces = BTreeMap::new();
        for (name, face) in &part.faces {
            let Some(tex_id) = &face.texture else {
                continue;
            };
            let Some(tex) = store.resolve(tex_id) else {
                return Err(CmdentError::validation(format!(
                    "entity '{}', part '{}', face '{}': texture '{tex_id}' is not bound",
                    self.entity,
                    part.name,
                    name.as_str()
                )));
            };
            textures.insert(tex.id.clone(), self.texture_path(&tex.id).to_string());
            faces.insert(
                *name,
                ModelFace {
                    texture: format!("#{}", tex.id),
                    uv: face.uv.map(|x| round_to(x * UNITS_PER_BLOCK, EMIT_DIGITS)),
                },
            );
        }

        let recenter = |v: glam::DVec3| -> [f64; 3] {
            let d = v - part.origin;
            [
                round_to(d.x + DISPLAY_CENTER[0], EMIT_DIGITS),
                round_to(d.y + DISPLAY_CENTER[1], EMIT_DIGITS),
                round_to(d.z + DISPLAY_CENTER[2], EMIT_DIGITS),
            ]
        };

        Ok(ModelDescriptor {
            textures,
            elements: vec![ModelElement {
                from: recenter(part.from),
                to: recenter(part.to),
                faces,
            }],
            display: ModelDisplay::default(),
        })
    }

    /// Exported textures behind the part's faces, in face order without repeats. Ids sharing
    /// content resolve to one texture; unbound ids are skipped.
    pub fn referenced_textures<'s>(
        &self,
        part: &LeafPart,
        store: &'s TextureStore,
    ) -> Vec<&'s PreparedTexture> {
        let mut out: Vec<&PreparedTexture> = Vec::new();
        for face in part.faces.values() {
            if let Some(tex) = face.texture.as_deref().and_then(|id| store.resolve(id))
                && !out.iter().any(|t| t.id == tex.id)
            {
                out.push(tex);
            }
        }
        out
    }

    pub fn override_entry(&self, part: &LeafPart) -> OverrideEntry {
        OverrideEntry {
            predicate: OverridePredicate {
                custom_model_data: part.custom_id,
            },
            model: self.model_path(part).to_string(),
        }
    }
}

/// Item model carrying the override table for every exported part.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct OverrideTable {
    pub parent: String,
    pub textures: BTreeMap<String, String>,
    pub overrides: Vec<OverrideEntry>,
}

impl OverrideTable {
    /// Table for `model_item` (`namespace:name`), entries sorted by custom id.
    pub fn new(model_item: &str, mut overrides: Vec<OverrideEntry>) -> Self {
        overrides.sort_by_key(|e| e.predicate.custom_model_data);
        let (_, name) = split_item(model_item);
        Self {
            parent: "item/generated".to_string(),
            textures: BTreeMap::from([("layer0".to_string(), format!("item/{name}"))]),
            overrides,
        }
    }
}

/// Split `namespace:name`, defaulting the namespace to `minecraft`.
pub fn split_item(item: &str) -> (&str, &str) {
    item.split_once(':').unwrap_or(("minecraft", item))
}

#[cfg(test)]
#[path = "../../tests/unit/export/part.rs"]
mod tests;
