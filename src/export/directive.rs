//! Typed directives of the target command language and their exact text rendering.

use std::fmt;

use crate::foundation::core::{ResourcePath, fmt_num};

/// Per-instance frame counter.
pub const OBJ_FRAME: &str = "cmdent.frame";
/// Persistent instance id, shared by the root and all of its part proxies.
pub const OBJ_ID: &str = "cmdent.id";
/// Successor request set by callers (1-based animation index).
pub const OBJ_NEXT: &str = "cmdent.next";
/// Snapshot of the successor request taken by a final frame body.
pub const OBJ_PENDING: &str = "cmdent.pending";

/// Carried by every part proxy of every entity.
pub const TAG_ALL: &str = "cmdent.part";
/// Marks the proxies of the instance currently being posed.
pub const TAG_ACTIVE: &str = "cmdent.active";
/// Marks proxies owned by a live instance; cleared once an instance has posed them.
pub const TAG_GC: &str = "cmdent.gc";
/// Marks proxies summoned by the running spawn program.
pub const TAG_TEMP: &str = "cmdent.temp";

/// Fake score holder used as the transient comparison register.
pub const HOLDER_COMPARE: &str = "_";
/// Fake score holder counting spawned instances.
pub const HOLDER_INSTANCES: &str = "#instances";

/// Tag carried by an entity's instance roots.
pub fn entity_tag(entity: &str) -> String {
    format!("cmdent.{entity}")
}

/// Tag unique to one part's proxies.
pub fn part_tag(entity: &str, part: &str) -> String {
    format!("cmdent.{entity}.{part}")
}

/// `@e[type=armor_stand,...]` filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    tags: Vec<String>,
    scores: Vec<(String, ScoreRange)>,
    single: bool,
}

impl Selector {
    pub fn stands() -> Self {
        Self {
            tags: Vec::new(),
            scores: Vec::new(),
            single: false,
        }
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn score(mut self, objective: impl Into<String>, range: ScoreRange) -> Self {
        self.scores.push((objective.into(), range));
        self
    }

    pub fn single(mut self) -> Self {
        self.single = true;
        self
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("@e[type=armor_stand")?;
        for tag in &self.tags {
            write!(f, ",tag={tag}")?;
        }
        if !self.scores.is_empty() {
            f.write_str(",scores={")?;
            for (i, (obj, range)) in self.scores.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{obj}={range}")?;
            }
            f.write_str("}")?;
        }
        if self.single {
            f.write_str(",limit=1")?;
        }
        f.write_str("]")
    }
}

/// Inclusive integer range as written in score predicates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreRange {
    Exact(i64),
    Between(i64, i64),
}

impl fmt::Display for ScoreRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(v) => write!(f, "{v}"),
            Self::Between(lo, hi) => write!(f, "{lo}..{hi}"),
        }
    }
}

/// Score holder or entity set a directive applies to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// `@s`
    This,
    /// Fake player name.
    Holder(String),
    Select(Selector),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::This => f.write_str("@s"),
            Self::Holder(name) => f.write_str(name),
            Self::Select(sel) => write!(f, "{sel}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreOp {
    Assign,
    Sub,
    Add,
}

impl ScoreOp {
    fn as_str(self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::Sub => "-=",
            Self::Add => "+=",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScheduleMode {
    Replace,
    Append,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExecClause {
    As(Target),
    AtSelf,
    IfScore { objective: String, range: ScoreRange },
    UnlessScore { objective: String, range: ScoreRange },
}

impl fmt::Display for ExecClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::As(target) => write!(f, "as {target}"),
            Self::AtSelf => f.write_str("at @s"),
            Self::IfScore { objective, range } => {
                write!(f, "if score @s {objective} matches {range}")
            }
            Self::UnlessScore { objective, range } => {
                write!(f, "unless score @s {objective} matches {range}")
            }
        }
    }
}

/// One line of a program file.
#[derive(Clone, Debug, PartialEq)]
pub enum Directive {
    Blank,
    Comment(String),
    ObjectiveAdd {
        objective: String,
    },
    ScoreSet {
        target: Target,
        objective: String,
        value: i64,
    },
    ScoreAdd {
        target: Target,
        objective: String,
        value: i64,
    },
    ScoreOperation {
        target: Target,
        objective: String,
        op: ScoreOp,
        source: Target,
        source_objective: String,
    },
    TagAdd {
        target: Target,
        tag: String,
    },
    TagRemove {
        target: Target,
        tag: String,
    },
    /// Marker armor stand wearing `item` with `CustomModelData` set to `custom_id`.
    Summon {
        tags: Vec<String>,
        item: String,
        custom_id: u32,
    },
    /// Relative reposition; offsets in blocks at full precision.
    Teleport {
        target: Target,
        offset: [f64; 3],
    },
    /// Head pose write; angles in degrees at full precision.
    PoseHead {
        target: Target,
        rotation: [f64; 3],
    },
    Function(ResourcePath),
    Schedule {
        function: ResourcePath,
        ticks: u32,
        mode: ScheduleMode,
    },
    Kill(Target),
    Execute {
        clauses: Vec<ExecClause>,
        run: Box<Directive>,
    },
}

impl Directive {
    /// Wrap `self` in `execute <clauses> run`.
    pub fn when(self, clauses: Vec<ExecClause>) -> Self {
        Self::Execute {
            clauses,
            run: Box::new(self),
        }
    }

    /// Innermost directive, looking through `execute` wrappers.
    pub fn innermost(&self) -> &Directive {
        match self {
            Self::Execute { run, .. } => run.innermost(),
            other => other,
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank => Ok(()),
            Self::Comment(text) => write!(f, "# {text}"),
            Self::ObjectiveAdd { objective } => {
                write!(f, "scoreboard objectives add {objective} dummy")
            }
            Self::ScoreSet {
                target,
                objective,
                value,
            } => write!(f, "scoreboard players set {target} {objective} {value}"),
            Self::ScoreAdd {
                target,
                objective,
                value,
            } => write!(f, "scoreboard players add {target} {objective} {value}"),
            Self::ScoreOperation {
                target,
                objective,
                op,
                source,
                source_objective,
            } => write!(
                f,
                "scoreboard players operation {target} {objective} {} {source} {source_objective}",
                op.as_str()
            ),
            Self::TagAdd { target, tag } => write!(f, "tag {target} add {tag}"),
            Self::TagRemove { target, tag } => write!(f, "tag {target} remove {tag}"),
            Self::Summon {
                tags,
                item,
                custom_id,
            } => write!(
                f,
                "summon armor_stand ~ ~ ~ {{Tags:[{}],Marker:1b,Invisible:1b,NoBasePlate:1b,ArmorItems:[{{}},{{}},{{}},{{id:\"{item}\",Count:1b,tag:{{CustomModelData:{custom_id}}}}}]}}",
                tags.join(",")
            ),
            Self::Teleport { target, offset } => write!(
                f,
                "tp {target} ~{} ~{} ~{} ~ ~",
                fmt_num(offset[0]),
                fmt_num(offset[1]),
                fmt_num(offset[2])
            ),
            Self::PoseHead { target, rotation } => write!(
                f,
                "data modify entity {target} Pose.Head set value [{}f,{}f,{}f]",
                fmt_num(rotation[0]),
                fmt_num(rotation[1]),
                fmt_num(rotation[2])
            ),
            Self::Function(path) => write!(f, "function {path}"),
            Self::Schedule {
                function,
                ticks,
                mode,
            } => write!(
                f,
                "schedule function {function} {ticks}t {}",
                match mode {
                    ScheduleMode::Replace => "replace",
                    ScheduleMode::Append => "append",
                }
            ),
            Self::Kill(target) => write!(f, "kill {target}"),
            Self::Execute { clauses, run } => {
                f.write_str("execute")?;
                for clause in clauses {
                    write!(f, " {clause}")?;
                }
                write!(f, " run {run}")
            }
        }
    }
}

/// Render a program: one directive per line, trailing newline.
pub fn render_program(directives: &[Directive]) -> String {
    let mut out = String::new();
    for d in directives {
        out.push_str(&d.to_string());
        out.push('\n');
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/export/directive.rs"]
mod tests;
