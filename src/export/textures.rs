use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::Path;

use base64::Engine as _;
use xxhash_rust::xxh3::xxh3_64;

use crate::{
    foundation::core::normalize_rel_path,
    foundation::error::{CmdentError, CmdentResult},
    scene::model::TextureDef,
};

const PNG_DATA_URL: &str = "data:image/png;base64,";

/// Texture decoded, validated, and re-encoded as canonical PNG bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedTexture {
    pub id: String,
    pub width: u32,
    pub height: u32,
    /// Canonical PNG encoding of the decoded RGBA8 pixels.
    pub png: Vec<u8>,
    /// Identity of the pixel content.
    pub content_hash: u64,
}

/// Textures of one entity keyed by id.
///
/// Ids whose pixels match an earlier texture resolve to that texture, so each distinct content
/// is exported once.
#[derive(Clone, Debug, Default)]
pub struct TextureStore {
    textures: BTreeMap<String, PreparedTexture>,
    canonical: BTreeMap<String, String>,
}

impl TextureStore {
    /// Load every texture definition; paths resolve against `base_dir`.
    pub fn prepare(defs: &[TextureDef], base_dir: &Path) -> CmdentResult<Self> {
        let mut textures = BTreeMap::<String, PreparedTexture>::new();
        let mut canonical = BTreeMap::new();
        let mut seen_content = BTreeMap::<u64, Vec<String>>::new();
        for def in defs {
            let raw = read_source(&def.source, base_dir)
                .map_err(|e| CmdentError::asset(format!("texture '{}': {e}", def.id)))?;
            let prepared = prepare_png(&def.id, &raw)?;

            let candidates = seen_content.entry(prepared.content_hash).or_default();
            let same = candidates
                .iter()
                .find(|id| textures.get(id.as_str()).is_some_and(|t| t.png == prepared.png))
                .cloned();
            match same {
                Some(first) => {
                    tracing::debug!(texture = %def.id, same_as = %first, "texture content duplicated");
                    canonical.insert(def.id.clone(), first);
                }
                None => {
                    tracing::debug!(
                        texture = %def.id,
                        width = prepared.width,
                        height = prepared.height,
                        "texture prepared"
                    );
                    candidates.push(def.id.clone());
                    canonical.insert(def.id.clone(), def.id.clone());
                }
            }
            textures.insert(def.id.clone(), prepared);
        }
        Ok(Self {
            textures,
            canonical,
        })
    }

    /// The texture defined under `id`, as decoded.
    pub fn get(&self, id: &str) -> Option<&PreparedTexture> {
        self.textures.get(id)
    }

    /// The texture exported for `id`: the first texture with the same content.
    pub fn resolve(&self, id: &str) -> Option<&PreparedTexture> {
        self.canonical
            .get(id)
            .and_then(|first| self.textures.get(first.as_str()))
    }

    /// Number of distinct texture contents.
    pub fn distinct_len(&self) -> usize {
        self.canonical
            .iter()
            .filter(|(id, first)| id == first)
            .count()
    }
}

fn read_source(source: &str, base_dir: &Path) -> CmdentResult<Vec<u8>> {
    if let Some(encoded) = source.strip_prefix(PNG_DATA_URL) {
        return base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| CmdentError::asset(format!("invalid base64 data URL: {e}")));
    }
    if source.starts_with("data:") {
        return Err(CmdentError::asset(
            "only data:image/png;base64 URLs are supported",
        ));
    }

    let rel = normalize_rel_path(source)?;
    let path = base_dir.join(&rel);
    std::fs::read(&path).map_err(|e| CmdentError::asset(format!("read '{}': {e}", path.display())))
}

fn prepare_png(id: &str, raw: &[u8]) -> CmdentResult<PreparedTexture> {
    let img = image::load_from_memory_with_format(raw, image::ImageFormat::Png)
        .map_err(|e| CmdentError::asset(format!("texture '{id}': decode png: {e}")))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    let content_hash = xxh3_64(img.as_raw());

    let mut png = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| CmdentError::asset(format!("texture '{id}': encode png: {e}")))?;

    Ok(PreparedTexture {
        id: id.to_string(),
        width,
        height,
        png,
        content_hash,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/export/textures.rs"]
mod tests;
