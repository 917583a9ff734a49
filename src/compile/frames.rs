use glam::DMat4;
use rayon::prelude::*;

use crate::{
    animation::policy::LoopPolicy,
    export::directive::{
        Directive, ExecClause, HOLDER_COMPARE, OBJ_FRAME, OBJ_ID, OBJ_NEXT, OBJ_PENDING,
        ScheduleMode, ScoreOp, ScoreRange, Selector, TAG_ACTIVE, TAG_ALL, TAG_GC, Target,
        entity_tag,
    },
    export::part::RigidPartExporter,
    foundation::core::{ResourcePath, TickIndex},
    skeleton::{PartId, SkeletonTree},
};

/// Frame-counter value of an instance that is not playing anything.
pub const DORMANT_FRAME: i64 = -1;

/// Delay between tick 0 and tick 1; absorbs dispatch latency of the entry schedule.
const FIRST_TICK_DELAY: u32 = 2;
const TICK_DELAY: u32 = 1;
const ENTRY_DELAY: u32 = 1;

/// What the scheduler runs after a frame body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Successor {
    /// Dispatcher of the next tick.
    Next(TickIndex),
    /// Tick 0 again, unless a successor animation was requested.
    LoopTo(TickIndex),
    /// The same final tick again, unless a successor animation was requested.
    Hold(TickIndex),
    /// Dormancy, unless a successor animation was requested.
    Terminal,
}

/// One sampled tick with its two programs.
#[derive(Clone, Debug)]
pub struct CompiledFrame {
    pub tick: TickIndex,
    /// Value of the frame-counter register while this tick is pending.
    pub frame_id: i64,
    /// World matrix of every part at this tick, in emission order.
    pub poses: Vec<(PartId, DMat4)>,
    /// Finds the instances waiting on `frame_id` and runs the body as each of them.
    pub dispatcher: Vec<Directive>,
    pub body: Vec<Directive>,
    pub successor: Successor,
}

/// Programs for one animation.
#[derive(Clone, Debug)]
pub struct CompiledAnimation {
    pub name: String,
    pub policy: LoopPolicy,
    pub last_tick: TickIndex,
    pub first_frame: i64,
    pub entry_path: ResourcePath,
    pub entry: Vec<Directive>,
    pub frames: Vec<CompiledFrame>,
}

/// Function paths shared by every animation of one entity.
#[derive(Clone, Debug)]
pub struct EntityFunctions {
    pub root: ResourcePath,
    pub select: ResourcePath,
    pub dormant: ResourcePath,
}

impl EntityFunctions {
    pub fn new(namespace: &str, entity: &str) -> Self {
        let root = ResourcePath::root(namespace).child(entity);
        Self {
            select: root.child("select"),
            dormant: root.child("dormant"),
            root,
        }
    }

    pub fn animation_dir(&self, animation: &str) -> ResourcePath {
        self.root.child("animations").child(animation)
    }

    pub fn entry(&self, animation: &str) -> ResourcePath {
        self.animation_dir(animation).child("start")
    }

    pub fn dispatcher(&self, animation: &str, tick: TickIndex) -> ResourcePath {
        self.animation_dir(animation)
            .child("frames")
            .child(format!("{}_", tick.0))
    }

    pub fn body(&self, animation: &str, tick: TickIndex) -> ResourcePath {
        self.animation_dir(animation)
            .child("frames")
            .child(tick.0.to_string())
    }
}

/// Animation to compile, with its frame ids already allocated.
#[derive(Clone, Copy, Debug)]
pub struct AnimationPlan<'a> {
    pub name: &'a str,
    pub policy: LoopPolicy,
    pub last_tick: TickIndex,
    pub first_frame: u32,
}

/// Discretizes animations of one entity into dispatcher/body programs.
pub struct FrameCompiler<'a> {
    entity: &'a str,
    functions: &'a EntityFunctions,
    tree: &'a SkeletonTree,
    exporter: &'a RigidPartExporter<'a>,
    animation_count: usize,
}

impl<'a> FrameCompiler<'a> {
    pub fn new(
        entity: &'a str,
        functions: &'a EntityFunctions,
        tree: &'a SkeletonTree,
        exporter: &'a RigidPartExporter<'a>,
        animation_count: usize,
    ) -> Self {
        Self {
            entity,
            functions,
            tree,
            exporter,
            animation_count,
        }
    }

    /// Sample every tick of `plan` and build its program graph.
    #[tracing::instrument(skip(self, plan), fields(entity = self.entity, animation = plan.name))]
    pub fn compile(&self, plan: AnimationPlan<'_>) -> CompiledAnimation {
        let frames: Vec<CompiledFrame> = (0..plan.last_tick.0 + 1)
            .into_par_iter()
            .map(|i| self.compile_tick(&plan, TickIndex(i)))
            .collect();

        tracing::debug!(
            ticks = frames.len(),
            policy = %plan.policy,
            first_frame = plan.first_frame,
            "animation sampled"
        );

        let entry_path = self.functions.entry(plan.name);
        CompiledAnimation {
            name: plan.name.to_string(),
            policy: plan.policy,
            last_tick: plan.last_tick,
            first_frame: i64::from(plan.first_frame),
            entry: self.entry_program(&plan),
            entry_path,
            frames,
        }
    }

    /// Set the frame counter to tick 0 and schedule its dispatcher.
    ///
    /// The schedule is issued twice.
    fn entry_program(&self, plan: &AnimationPlan<'_>) -> Vec<Directive> {
        let schedule = Directive::Schedule {
            function: self.functions.dispatcher(plan.name, TickIndex(0)),
            ticks: ENTRY_DELAY,
            mode: ScheduleMode::Replace,
        };
        vec![
            Directive::ScoreSet {
                target: Target::This,
                objective: OBJ_FRAME.to_string(),
                value: i64::from(plan.first_frame),
            },
            schedule.clone(),
            schedule,
        ]
    }

    fn compile_tick(&self, plan: &AnimationPlan<'_>, tick: TickIndex) -> CompiledFrame {
        let frame_id = i64::from(plan.first_frame) + i64::from(tick.0);
        let poses = self.tree.world_transforms(tick.seconds(), DMat4::IDENTITY);

        let successor = if tick < plan.last_tick {
            Successor::Next(TickIndex(tick.0 + 1))
        } else {
            match plan.policy {
                LoopPolicy::Once => Successor::Terminal,
                LoopPolicy::Hold => Successor::Hold(tick),
                LoopPolicy::Loop => Successor::LoopTo(TickIndex(0)),
            }
        };

        let dispatcher = vec![Directive::Function(self.functions.body(plan.name, tick)).when(vec![
            ExecClause::As(Target::Select(
                Selector::stands()
                    .tag(entity_tag(self.entity))
                    .score(OBJ_FRAME, ScoreRange::Exact(frame_id)),
            )),
            ExecClause::AtSelf,
        ])];

        let mut body = isolate_instance();
        body.push(Directive::Blank);
        for (id, world) in &poses {
            body.extend(self.exporter.pose_directives(self.tree.part(*id), world));
        }
        body.push(Directive::Blank);
        body.extend(release_instance());
        body.extend(self.transition(plan, tick, frame_id, successor));

        CompiledFrame {
            tick,
            frame_id,
            poses,
            dispatcher,
            body,
            successor,
        }
    }

    /// Bookkeeping after the poses; the scheduling call is always last.
    fn transition(
        &self,
        plan: &AnimationPlan<'_>,
        tick: TickIndex,
        frame_id: i64,
        successor: Successor,
    ) -> Vec<Directive> {
        let schedule = |function: ResourcePath, ticks: u32| Directive::Schedule {
            function,
            ticks,
            mode: ScheduleMode::Replace,
        };

        if let Successor::Next(next) = successor {
            let delay = if tick.0 == 0 {
                FIRST_TICK_DELAY
            } else {
                TICK_DELAY
            };
            return vec![
                Directive::ScoreSet {
                    target: Target::This,
                    objective: OBJ_FRAME.to_string(),
                    value: frame_id + 1,
                },
                schedule(self.functions.dispatcher(plan.name, next), delay),
            ];
        }

        let no_successor = || {
            vec![ExecClause::UnlessScore {
                objective: OBJ_PENDING.to_string(),
                range: ScoreRange::Between(1, self.animation_count as i64),
            }]
        };

        let mut out = vec![
            Directive::ScoreOperation {
                target: Target::This,
                objective: OBJ_PENDING.to_string(),
                op: ScoreOp::Assign,
                source: Target::This,
                source_objective: OBJ_NEXT.to_string(),
            },
            Directive::ScoreSet {
                target: Target::This,
                objective: OBJ_NEXT.to_string(),
                value: 0,
            },
            Directive::Function(self.functions.select.clone()),
        ];

        match successor {
            Successor::Terminal => {
                out.push(
                    Directive::ScoreSet {
                        target: Target::This,
                        objective: OBJ_FRAME.to_string(),
                        value: DORMANT_FRAME,
                    }
                    .when(no_successor()),
                );
                out.push(schedule(self.functions.dormant.clone(), TICK_DELAY).when(no_successor()));
            }
            Successor::Hold(at) => {
                out.push(
                    schedule(self.functions.dispatcher(plan.name, at), TICK_DELAY)
                        .when(no_successor()),
                );
            }
            Successor::LoopTo(to) => {
                out.push(
                    Directive::ScoreSet {
                        target: Target::This,
                        objective: OBJ_FRAME.to_string(),
                        value: i64::from(plan.first_frame) + i64::from(to.0),
                    }
                    .when(no_successor()),
                );
                out.push(
                    schedule(self.functions.dispatcher(plan.name, to), TICK_DELAY)
                        .when(no_successor()),
                );
            }
            Successor::Next(_) => {}
        }
        out
    }
}

/// Select the proxies of the executing instance: subtract its id from every proxy and mark the
/// ones left at zero as active.
pub fn isolate_instance() -> Vec<Directive> {
    let all = Target::Select(Selector::stands().tag(TAG_ALL));
    let active = Target::Select(Selector::stands().tag(TAG_ACTIVE));
    vec![
        Directive::ScoreOperation {
            target: Target::Holder(HOLDER_COMPARE.to_string()),
            objective: OBJ_ID.to_string(),
            op: ScoreOp::Assign,
            source: Target::This,
            source_objective: OBJ_ID.to_string(),
        },
        Directive::ScoreOperation {
            target: all,
            objective: OBJ_ID.to_string(),
            op: ScoreOp::Sub,
            source: Target::Holder(HOLDER_COMPARE.to_string()),
            source_objective: OBJ_ID.to_string(),
        },
        Directive::TagAdd {
            target: Target::Select(
                Selector::stands()
                    .tag(TAG_ALL)
                    .score(OBJ_ID, ScoreRange::Exact(0)),
            ),
            tag: TAG_ACTIVE.to_string(),
        },
        Directive::TagRemove {
            target: active,
            tag: TAG_GC.to_string(),
        },
    ]
}

/// Undo [`isolate_instance`]: demote the active proxies and restore every id.
pub fn release_instance() -> Vec<Directive> {
    vec![
        Directive::TagRemove {
            target: Target::Select(Selector::stands().tag(TAG_ACTIVE)),
            tag: TAG_ACTIVE.to_string(),
        },
        Directive::ScoreOperation {
            target: Target::Select(Selector::stands().tag(TAG_ALL)),
            objective: OBJ_ID.to_string(),
            op: ScoreOp::Add,
            source: Target::Holder(HOLDER_COMPARE.to_string()),
            source_objective: OBJ_ID.to_string(),
        },
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/compile/frames.rs"]
mod tests;
