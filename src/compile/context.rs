use std::collections::BTreeSet;

use crate::{
    export::part::split_item,
    foundation::core::is_valid_segment,
    foundation::error::{CmdentError, CmdentResult},
    scene::model::{EntityDef, OutlinerNodeDef, PartDef},
};

/// User-facing compile options.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CompileOpts {
    /// Namespace of every emitted program, model, and texture.
    pub namespace: String,
    /// Item worn by part proxies; its item model carries the override table.
    pub model_item: String,
    /// First custom id handed out to parts without an explicit one.
    pub first_custom_id: u32,
}

impl Default for CompileOpts {
    fn default() -> Self {
        Self {
            namespace: "cmdent".to_string(),
            model_item: "minecraft:white_dye".to_string(),
            first_custom_id: 1,
        }
    }
}

impl CompileOpts {
    pub fn validate(&self) -> CmdentResult<()> {
        if !is_valid_segment(&self.namespace) {
            return Err(CmdentError::config(format!(
                "namespace '{}' is not a valid resource segment",
                self.namespace
            )));
        }
        let (item_ns, item_name) = split_item(&self.model_item);
        if !is_valid_segment(item_ns) || !is_valid_segment(item_name) {
            return Err(CmdentError::config(format!(
                "model item '{}' must be 'namespace:name'",
                self.model_item
            )));
        }
        if self.first_custom_id == 0 {
            return Err(CmdentError::config("first custom id must be >= 1"));
        }
        Ok(())
    }
}

/// Counters and options threaded through one compile pass.
#[derive(Debug)]
pub struct CompileContext {
    opts: CompileOpts,
    next_frame: u32,
    next_custom_id: u32,
    used_custom_ids: BTreeSet<u32>,
}

impl CompileContext {
    pub fn new(opts: CompileOpts) -> CmdentResult<Self> {
        opts.validate()?;
        Ok(Self {
            next_custom_id: opts.first_custom_id,
            opts,
            next_frame: 0,
            used_custom_ids: BTreeSet::new(),
        })
    }

    pub fn opts(&self) -> &CompileOpts {
        &self.opts
    }

    /// Reserve `count` consecutive frame ids and return the first.
    pub fn alloc_frames(&mut self, count: u32) -> CmdentResult<u32> {
        let first = self.next_frame;
        self.next_frame = first
            .checked_add(count)
            .filter(|n| *n <= i32::MAX as u32)
            .ok_or_else(|| CmdentError::validation("frame id space exhausted"))?;
        Ok(first)
    }

    /// Claim every explicit custom id of `def` before automatic assignment starts.
    pub fn reserve_explicit_ids(&mut self, def: &EntityDef) -> CmdentResult<()> {
        fn walk(
            ctx: &mut CompileContext,
            entity: &str,
            nodes: &[OutlinerNodeDef],
        ) -> CmdentResult<()> {
            for node in nodes {
                match node {
                    OutlinerNodeDef::Bone(b) => walk(ctx, entity, &b.children)?,
                    OutlinerNodeDef::Part(p) => {
                        if let Some(id) = p.custom_model_data
                            && !ctx.used_custom_ids.insert(id)
                        {
                            return Err(CmdentError::config(format!(
                                "entity '{entity}', part '{}': custom id {id} is already in use",
                                p.name
                            )));
                        }
                    }
                }
            }
            Ok(())
        }
        walk(self, &def.name, &def.outliner)
    }

    /// Custom id for `part`: its explicit id, or the next unused one.
    pub fn custom_id_for(&mut self, part: &PartDef) -> CmdentResult<u32> {
        if let Some(id) = part.custom_model_data {
            return Ok(id);
        }
        while self.used_custom_ids.contains(&self.next_custom_id) {
            self.next_custom_id = self.bump_custom_id()?;
        }
        let id = self.next_custom_id;
        self.used_custom_ids.insert(id);
        self.next_custom_id = self.bump_custom_id()?;
        Ok(id)
    }

    fn bump_custom_id(&self) -> CmdentResult<u32> {
        self.next_custom_id
            .checked_add(1)
            .ok_or_else(|| CmdentError::validation("custom id space exhausted"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/context.rs"]
mod tests;
