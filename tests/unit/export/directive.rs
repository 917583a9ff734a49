use super::*;

#[test]
fn selector_renders_tags_scores_and_limit() {
    let sel = Selector::stands()
        .tag(TAG_ACTIVE)
        .tag("cmdent.golem.torso")
        .score(OBJ_FRAME, ScoreRange::Exact(3))
        .single();
    assert_eq!(
        sel.to_string(),
        "@e[type=armor_stand,tag=cmdent.active,tag=cmdent.golem.torso,scores={cmdent.frame=3},limit=1]"
    );
    assert_eq!(Selector::stands().to_string(), "@e[type=armor_stand]");
}

#[test]
fn score_directives_render() {
    let copy = Directive::ScoreOperation {
        target: Target::Holder(HOLDER_COMPARE.to_string()),
        objective: OBJ_ID.to_string(),
        op: ScoreOp::Assign,
        source: Target::This,
        source_objective: OBJ_ID.to_string(),
    };
    assert_eq!(
        copy.to_string(),
        "scoreboard players operation _ cmdent.id = @s cmdent.id"
    );

    let set = Directive::ScoreSet {
        target: Target::This,
        objective: OBJ_FRAME.to_string(),
        value: 0,
    };
    assert_eq!(set.to_string(), "scoreboard players set @s cmdent.frame 0");
}

#[test]
fn pose_numbers_are_rounded_at_render_time() {
    let tp = Directive::Teleport {
        target: Target::This,
        offset: [0.123456789, -1.0, 0.0],
    };
    assert_eq!(tp.to_string(), "tp @s ~0.12346 ~-1 ~0 ~ ~");

    let pose = Directive::PoseHead {
        target: Target::This,
        rotation: [-0.0, 89.999999, 12.5],
    };
    assert_eq!(
        pose.to_string(),
        "data modify entity @s Pose.Head set value [0f,90f,12.5f]"
    );
}

#[test]
fn execute_wraps_and_innermost_unwraps() {
    let path = ResourcePath::root("cmdent").child("golem").child("dormant");
    let d = Directive::Schedule {
        function: path.clone(),
        ticks: 1,
        mode: ScheduleMode::Replace,
    }
    .when(vec![ExecClause::UnlessScore {
        objective: OBJ_PENDING.to_string(),
        range: ScoreRange::Between(1, 2),
    }]);
    assert_eq!(
        d.to_string(),
        "execute unless score @s cmdent.pending matches 1..2 run schedule function cmdent:golem/dormant 1t replace"
    );
    assert!(matches!(d.innermost(), Directive::Schedule { function, .. } if *function == path));
}

#[test]
fn summon_carries_tags_and_custom_id() {
    let d = Directive::Summon {
        tags: vec![TAG_TEMP.to_string(), part_tag("golem", "torso"), TAG_ALL.to_string()],
        item: "minecraft:white_dye".to_string(),
        custom_id: 42,
    };
    assert_eq!(
        d.to_string(),
        "summon armor_stand ~ ~ ~ {Tags:[cmdent.temp,cmdent.golem.torso,cmdent.part],Marker:1b,Invisible:1b,NoBasePlate:1b,ArmorItems:[{},{},{},{id:\"minecraft:white_dye\",Count:1b,tag:{CustomModelData:42}}]}"
    );
}

#[test]
fn program_is_newline_terminated() {
    let text = render_program(&[Directive::Comment("x".to_string()), Directive::Blank]);
    assert_eq!(text, "# x\n\n");
}
