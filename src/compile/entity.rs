use crate::{
    animation::policy::LoopPolicy,
    compile::artifacts::ArtifactSet,
    compile::context::CompileContext,
    compile::frames::{
        AnimationPlan, CompiledAnimation, DORMANT_FRAME, EntityFunctions, FrameCompiler,
        isolate_instance, release_instance,
    },
    export::directive::{
        Directive, ExecClause, HOLDER_INSTANCES, OBJ_FRAME, OBJ_ID, OBJ_NEXT, OBJ_PENDING,
        ScoreOp, ScoreRange, Selector, TAG_ACTIVE, TAG_ALL, TAG_GC, TAG_TEMP, Target, entity_tag,
        render_program,
    },
    export::part::{OverrideTable, RigidPartExporter, split_item},
    export::textures::TextureStore,
    foundation::core::{ResourcePath, last_tick_for},
    foundation::error::{CmdentError, CmdentResult},
    scene::entity::Entity,
    skeleton::{LeafPart, SkeletonTree, tree::leaf_parts},
};

/// Result of compiling one entity.
#[derive(Clone, Debug)]
pub struct CompiledEntity {
    pub name: String,
    pub parts: Vec<LeafPart>,
    pub animations: Vec<CompiledAnimation>,
    pub artifacts: ArtifactSet,
}

fn function_file(path: &ResourcePath) -> String {
    path.file_in("data", "functions", "mcfunction")
}

/// Compile every animation, support program, and static asset of `entity`.
#[tracing::instrument(skip(entity, ctx), fields(entity = entity.name()))]
pub fn compile_entity(entity: &Entity, ctx: &mut CompileContext) -> CmdentResult<CompiledEntity> {
    entity.validate()?;
    let def = entity.def();
    let root_tag = entity_tag(&def.name);
    if [TAG_ALL, TAG_ACTIVE, TAG_GC, TAG_TEMP].contains(&root_tag.as_str()) {
        return Err(CmdentError::config(format!(
            "entity name '{}' collides with a reserved tag",
            def.name
        )));
    }
    let opts = ctx.opts().clone();

    ctx.reserve_explicit_ids(def)?;
    let parts = leaf_parts(&def.outliner, |p| ctx.custom_id_for(p))?;
    let textures = TextureStore::prepare(&def.textures, entity.base_dir())?;

    let functions = EntityFunctions::new(&opts.namespace, &def.name);
    let exporter = RigidPartExporter::new(&def.name, &opts.namespace, &opts.model_item);
    let mut artifacts = ArtifactSet::new();

    let mut animations = Vec::with_capacity(def.animations.len());
    for anim in &def.animations {
        let policy = LoopPolicy::parse(&anim.loop_mode, &def.name, &anim.name)?;
        let last_tick = last_tick_for(anim.length)?;
        let first_frame = ctx.alloc_frames(last_tick.0 + 1)?;

        let tree = SkeletonTree::bind(&def.outliner, &anim.animators, parts.clone());
        let compiler = FrameCompiler::new(
            &def.name,
            &functions,
            &tree,
            &exporter,
            def.animation_count(),
        );
        let compiled = compiler.compile(AnimationPlan {
            name: &anim.name,
            policy,
            last_tick,
            first_frame,
        });

        artifacts.insert(
            function_file(&compiled.entry_path),
            render_program(&compiled.entry),
        )?;
        for frame in &compiled.frames {
            artifacts.insert(
                function_file(&functions.dispatcher(&anim.name, frame.tick)),
                render_program(&frame.dispatcher),
            )?;
            artifacts.insert(
                function_file(&functions.body(&anim.name, frame.tick)),
                render_program(&frame.body),
            )?;
        }
        animations.push(compiled);
    }

    let support = [
        ("load", load_program()),
        ("spawn", spawn_program(&def.name, &parts, &exporter)),
        ("remove", remove_program()),
        ("select", select_program(&functions, &animations)),
        ("dormant", dormant_program()),
    ];
    for (name, program) in support {
        artifacts.insert(
            function_file(&functions.root.child(name)),
            render_program(&program),
        )?;
    }

    let mut overrides = Vec::with_capacity(parts.len());
    for part in &parts {
        let model = exporter.model_descriptor(part, &textures)?;
        artifacts.insert_json(
            exporter.model_path(part).file_in("assets", "models", "json"),
            &model,
        )?;
        for tex in exporter.referenced_textures(part, &textures) {
            artifacts.insert(
                exporter
                    .texture_path(&tex.id)
                    .file_in("assets", "textures", "png"),
                tex.png.clone(),
            )?;
        }
        overrides.push(exporter.override_entry(part));
    }

    let (item_ns, item_name) = split_item(&opts.model_item);
    let table = OverrideTable::new(&opts.model_item, overrides);
    artifacts.insert_json(
        ResourcePath::root(item_ns)
            .child("item")
            .child(item_name)
            .file_in("assets", "models", "json"),
        &table,
    )?;

    tracing::info!(
        parts = parts.len(),
        textures = textures.distinct_len(),
        animations = animations.len(),
        artifacts = artifacts.len(),
        "entity compiled"
    );

    Ok(CompiledEntity {
        name: def.name.clone(),
        parts,
        animations,
        artifacts,
    })
}

fn load_program() -> Vec<Directive> {
    let mut out: Vec<Directive> = [OBJ_FRAME, OBJ_ID, OBJ_NEXT, OBJ_PENDING]
        .into_iter()
        .map(|o| Directive::ObjectiveAdd {
            objective: o.to_string(),
        })
        .collect();
    out.push(Directive::ScoreAdd {
        target: Target::Holder(HOLDER_INSTANCES.to_string()),
        objective: OBJ_ID.to_string(),
        value: 0,
    });
    out
}

/// Runs as and at a fresh root armor stand.
fn spawn_program(entity: &str, parts: &[LeafPart], exporter: &RigidPartExporter<'_>) -> Vec<Directive> {
    let temp = || Target::Select(Selector::stands().tag(TAG_TEMP));
    let mut out = vec![
        Directive::ScoreAdd {
            target: Target::Holder(HOLDER_INSTANCES.to_string()),
            objective: OBJ_ID.to_string(),
            value: 1,
        },
        Directive::ScoreOperation {
            target: Target::This,
            objective: OBJ_ID.to_string(),
            op: ScoreOp::Assign,
            source: Target::Holder(HOLDER_INSTANCES.to_string()),
            source_objective: OBJ_ID.to_string(),
        },
        Directive::TagAdd {
            target: Target::This,
            tag: entity_tag(entity),
        },
        Directive::Blank,
    ];
    out.extend(parts.iter().map(|p| exporter.spawn_directive(p)));
    out.extend([
        Directive::Blank,
        Directive::ScoreOperation {
            target: temp(),
            objective: OBJ_ID.to_string(),
            op: ScoreOp::Assign,
            source: Target::This,
            source_objective: OBJ_ID.to_string(),
        },
        Directive::TagAdd {
            target: temp(),
            tag: TAG_GC.to_string(),
        },
        Directive::TagRemove {
            target: temp(),
            tag: TAG_TEMP.to_string(),
        },
        Directive::ScoreSet {
            target: Target::This,
            objective: OBJ_NEXT.to_string(),
            value: 0,
        },
        Directive::ScoreSet {
            target: Target::This,
            objective: OBJ_FRAME.to_string(),
            value: DORMANT_FRAME,
        },
    ]);
    out
}

/// Runs as a root; kills its proxies, then the root.
fn remove_program() -> Vec<Directive> {
    let mut out = isolate_instance();
    out.push(Directive::Kill(Target::Select(
        Selector::stands()
            .tag(TAG_ALL)
            .score(OBJ_ID, ScoreRange::Exact(0)),
    )));
    out.extend(release_instance());
    out.push(Directive::Kill(Target::This));
    out
}

fn select_program(functions: &EntityFunctions, animations: &[CompiledAnimation]) -> Vec<Directive> {
    animations
        .iter()
        .enumerate()
        .map(|(i, anim)| {
            Directive::Function(functions.entry(&anim.name)).when(vec![ExecClause::IfScore {
                objective: OBJ_PENDING.to_string(),
                range: ScoreRange::Exact(i as i64 + 1),
            }])
        })
        .collect()
}

fn dormant_program() -> Vec<Directive> {
    vec![Directive::Comment(
        "instance finished; nothing left to schedule".to_string(),
    )]
}

#[cfg(test)]
#[path = "../../tests/unit/compile/entity.rs"]
mod tests;
