use std::fmt;

use crate::foundation::error::{CmdentError, CmdentResult};

/// Behavior at the final tick when no successor animation is requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoopPolicy {
    /// Run the completion hook, then go dormant.
    Once,
    /// Keep re-running the final frame.
    Hold,
    /// Restart from tick 0.
    Loop,
}

impl LoopPolicy {
    /// Parse the authored policy string of animation `animation`.
    pub fn parse(raw: &str, entity: &str, animation: &str) -> CmdentResult<Self> {
        match raw {
            "once" => Ok(Self::Once),
            "hold" => Ok(Self::Hold),
            "loop" => Ok(Self::Loop),
            other => Err(CmdentError::config(format!(
                "entity '{entity}', animation '{animation}': unrecognized loop policy '{other}' (expected once, hold, or loop)"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Once => "once",
            Self::Hold => "hold",
            Self::Loop => "loop",
        }
    }
}

impl fmt::Display for LoopPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
