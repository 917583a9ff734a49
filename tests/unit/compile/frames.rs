use super::*;
use crate::export::directive::render_program;
use crate::foundation::math::{decompose, max_abs_diff};
use crate::skeleton::tree::leaf_parts;
use crate::test_fixtures::rig;

struct Rig {
    tree: SkeletonTree,
    functions: EntityFunctions,
}

fn build(loop_mode: &str) -> Rig {
    let def = rig(loop_mode);
    let mut next = 0u32;
    let parts = leaf_parts(&def.outliner, |_| {
        next += 1;
        Ok(next)
    })
    .unwrap();
    Rig {
        tree: SkeletonTree::bind(&def.outliner, &def.animations[0].animators, parts),
        functions: EntityFunctions::new("cmdent", "golem"),
    }
}

fn compile(rig: &Rig, policy: LoopPolicy) -> CompiledAnimation {
    let exporter = RigidPartExporter::new("golem", "cmdent", "minecraft:white_dye");
    let fc = FrameCompiler::new("golem", &rig.functions, &rig.tree, &exporter, 2);
    fc.compile(AnimationPlan {
        name: "walk",
        policy,
        last_tick: TickIndex(20),
        first_frame: 0,
    })
}

fn lines(directives: &[Directive]) -> Vec<String> {
    directives.iter().map(|d| d.to_string()).collect()
}

#[test]
fn one_frame_per_tick_inclusive() {
    let rig = build("loop");
    let anim = compile(&rig, LoopPolicy::Loop);
    assert_eq!(anim.frames.len(), 21);
    for (i, frame) in anim.frames.iter().enumerate() {
        assert_eq!(frame.tick, TickIndex(i as u32));
        assert_eq!(frame.frame_id, i as i64);
        assert_eq!(frame.poses.len(), 2);
    }
}

#[test]
fn dispatcher_selects_roots_by_frame_id() {
    let rig = build("loop");
    let anim = compile(&rig, LoopPolicy::Loop);
    assert_eq!(
        lines(&anim.frames[3].dispatcher),
        ["execute as @e[type=armor_stand,tag=cmdent.golem,scores={cmdent.frame=3}] at @s run function cmdent:golem/animations/walk/frames/3"]
    );
}

#[test]
fn body_isolates_poses_then_releases() {
    let rig = build("loop");
    let anim = compile(&rig, LoopPolicy::Loop);
    let text = lines(&anim.frames[5].body);
    assert_eq!(text[0], "scoreboard players operation _ cmdent.id = @s cmdent.id");
    assert_eq!(
        text[1],
        "scoreboard players operation @e[type=armor_stand,tag=cmdent.part] cmdent.id -= _ cmdent.id"
    );
    assert_eq!(
        text[2],
        "tag @e[type=armor_stand,tag=cmdent.part,scores={cmdent.id=0}] add cmdent.active"
    );
    assert_eq!(
        text[3],
        "tag @e[type=armor_stand,tag=cmdent.active] remove cmdent.gc"
    );
    // two parts, two directives each, between blank separators
    assert_eq!(text[4], "");
    assert!(text[5].starts_with("tp @e[type=armor_stand,tag=cmdent.active,tag=cmdent.golem.torso,limit=1]"));
    assert!(text[7].starts_with("tp @e[type=armor_stand,tag=cmdent.active,tag=cmdent.golem.hand,limit=1]"));
    assert_eq!(text[9], "");
    assert_eq!(
        text[10],
        "tag @e[type=armor_stand,tag=cmdent.active] remove cmdent.active"
    );
    assert_eq!(
        text[11],
        "scoreboard players operation @e[type=armor_stand,tag=cmdent.part] cmdent.id += _ cmdent.id"
    );
}

#[test]
fn non_final_ticks_advance_and_schedule_next() {
    let rig = build("loop");
    let anim = compile(&rig, LoopPolicy::Loop);

    let first = lines(&anim.frames[0].body);
    assert_eq!(
        first[first.len() - 2..],
        [
            "scoreboard players set @s cmdent.frame 1",
            "schedule function cmdent:golem/animations/walk/frames/1_ 2t replace",
        ]
    );
    let later = lines(&anim.frames[7].body);
    assert_eq!(
        later[later.len() - 2..],
        [
            "scoreboard players set @s cmdent.frame 8",
            "schedule function cmdent:golem/animations/walk/frames/8_ 1t replace",
        ]
    );
    assert_eq!(anim.frames[7].successor, Successor::Next(TickIndex(8)));
}

#[test]
fn loop_final_body_resets_counter_and_reschedules_tick_zero() {
    let rig = build("loop");
    let anim = compile(&rig, LoopPolicy::Loop);
    let last = anim.frames.last().unwrap();
    assert_eq!(last.successor, Successor::LoopTo(TickIndex(0)));
    let text = lines(&last.body);
    assert_eq!(
        text[text.len() - 5..],
        [
            "scoreboard players operation @s cmdent.pending = @s cmdent.next",
            "scoreboard players set @s cmdent.next 0",
            "function cmdent:golem/select",
            "execute unless score @s cmdent.pending matches 1..2 run scoreboard players set @s cmdent.frame 0",
            "execute unless score @s cmdent.pending matches 1..2 run schedule function cmdent:golem/animations/walk/frames/0_ 1t replace",
        ]
    );
}

#[test]
fn once_final_body_calls_hook_once_and_goes_dormant() {
    let rig = build("once");
    let anim = compile(&rig, LoopPolicy::Once);
    let last = anim.frames.last().unwrap();
    assert_eq!(last.successor, Successor::Terminal);
    let text = render_program(&last.body);
    assert_eq!(text.matches("function cmdent:golem/select").count(), 1);
    assert_eq!(text.matches("schedule function").count(), 1);
    assert!(text.ends_with(
        "execute unless score @s cmdent.pending matches 1..2 run schedule function cmdent:golem/dormant 1t replace\n"
    ));
    assert!(text.contains("run scoreboard players set @s cmdent.frame -1"));
}

#[test]
fn hold_final_body_reschedules_itself() {
    let rig = build("hold");
    let anim = compile(&rig, LoopPolicy::Hold);
    let last = anim.frames.last().unwrap();
    assert_eq!(last.successor, Successor::Hold(TickIndex(20)));
    assert_eq!(
        last.body.last().unwrap().to_string(),
        "execute unless score @s cmdent.pending matches 1..2 run schedule function cmdent:golem/animations/walk/frames/20_ 1t replace"
    );
    assert!(!render_program(&last.body).contains("cmdent.frame 0"));
}

#[test]
fn entry_sets_counter_and_schedules_twice() {
    let rig = build("loop");
    let anim = compile(&rig, LoopPolicy::Loop);
    assert_eq!(anim.entry_path.to_string(), "cmdent:golem/animations/walk/start");
    assert_eq!(
        lines(&anim.entry),
        [
            "scoreboard players set @s cmdent.frame 0",
            "schedule function cmdent:golem/animations/walk/frames/0_ 1t replace",
            "schedule function cmdent:golem/animations/walk/frames/0_ 1t replace",
        ]
    );
}

#[test]
fn frame_ids_follow_the_allocated_range() {
    let rig = build("loop");
    let exporter = RigidPartExporter::new("golem", "cmdent", "minecraft:white_dye");
    let fc = FrameCompiler::new("golem", &rig.functions, &rig.tree, &exporter, 2);
    let anim = fc.compile(AnimationPlan {
        name: "idle",
        policy: LoopPolicy::Loop,
        last_tick: TickIndex(10),
        first_frame: 21,
    });
    assert_eq!(anim.frames[0].frame_id, 21);
    assert_eq!(anim.frames[10].frame_id, 31);
    let text = render_program(&anim.frames[10].body);
    assert!(text.contains("run scoreboard players set @s cmdent.frame 21\n"));
}

#[test]
fn zero_length_animation_has_a_single_final_frame() {
    let rig = build("once");
    let exporter = RigidPartExporter::new("golem", "cmdent", "minecraft:white_dye");
    let fc = FrameCompiler::new("golem", &rig.functions, &rig.tree, &exporter, 1);
    let anim = fc.compile(AnimationPlan {
        name: "pose",
        policy: LoopPolicy::Once,
        last_tick: TickIndex(0),
        first_frame: 0,
    });
    assert_eq!(anim.frames.len(), 1);
    assert_eq!(anim.frames[0].successor, Successor::Terminal);
}

#[test]
fn sampled_poses_survive_decomposition() {
    let rig = build("loop");
    let anim = compile(&rig, LoopPolicy::Loop);
    for frame in &anim.frames {
        for (_, world) in &frame.poses {
            let back = decompose(world).to_matrix();
            assert!(max_abs_diff(world, &back) < 1e-5, "tick {:?}", frame.tick);
        }
    }
}

#[test]
fn compilation_is_deterministic() {
    let rig = build("loop");
    let a = compile(&rig, LoopPolicy::Loop);
    let b = compile(&rig, LoopPolicy::Loop);
    for (fa, fb) in a.frames.iter().zip(&b.frames) {
        assert_eq!(fa.body, fb.body);
        assert_eq!(fa.dispatcher, fb.dispatcher);
    }
}
