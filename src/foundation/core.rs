use std::fmt;

use crate::foundation::error::{CmdentError, CmdentResult};

/// Sampling rate of the target interpreter's scheduler.
pub const TICKS_PER_SECOND: u32 = 20;

/// Decimal digits kept when numbers cross the emission boundary.
pub const EMIT_DIGITS: i32 = 5;

/// 0-based tick index inside one animation.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TickIndex(pub u32);

impl TickIndex {
    /// Sampling time of this tick in seconds.
    pub fn seconds(self) -> f64 {
        f64::from(self.0) / f64::from(TICKS_PER_SECOND)
    }
}

/// Index of the last tick for an animation lasting `duration_s` seconds.
///
/// The tick range is inclusive, so an animation always has `last_tick + 1` frames.
pub fn last_tick_for(duration_s: f64) -> CmdentResult<TickIndex> {
    if !duration_s.is_finite() || duration_s < 0.0 {
        return Err(CmdentError::validation(format!(
            "animation duration must be finite and >= 0, got {duration_s}"
        )));
    }
    let ticks = (duration_s * f64::from(TICKS_PER_SECOND)).round();
    if ticks > f64::from(u32::MAX - 1) {
        return Err(CmdentError::validation(format!(
            "animation duration {duration_s}s exceeds the tick range"
        )));
    }
    Ok(TickIndex(ticks as u32))
}

/// Round `v` to `digits` decimal digits.
pub fn round_to(v: f64, digits: i32) -> f64 {
    let p = 10f64.powi(digits);
    (v * p).round() / p
}

/// Format a number for directive text: rounded to [`EMIT_DIGITS`], shortest representation,
/// no negative zero.
pub fn fmt_num(v: f64) -> String {
    let r = round_to(v, EMIT_DIGITS);
    if r == 0.0 {
        return "0".to_string();
    }
    format!("{r}")
}

/// Return `true` when `s` is usable as one segment of a resource path.
pub fn is_valid_segment(s: &str) -> bool {
    !s.is_empty()
        && s
            .bytes()
            .all(|b| matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'_' | b'-' | b'.'))
        && s != "."
        && s != ".."
}

/// Namespaced resource path rendered as `namespace:a/b/c`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourcePath {
    namespace: String,
    segments: Vec<String>,
}

impl ResourcePath {
    /// Root path inside `namespace`.
    pub fn root(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            segments: Vec::new(),
        }
    }

    /// Path one level below `self`.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self {
            namespace: self.namespace.clone(),
            segments,
        }
    }

    /// Namespace part.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// `/`-joined path part.
    pub fn path(&self) -> String {
        self.segments.join("/")
    }

    /// File location of this resource inside a pack, e.g.
    /// `data/<ns>/functions/<path>.mcfunction`.
    pub fn file_in(&self, pack_root: &str, kind: &str, ext: &str) -> String {
        format!(
            "{pack_root}/{}/{kind}/{}.{ext}",
            self.namespace,
            self.path()
        )
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path())
    }
}

/// Normalize and validate entity-relative asset paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> CmdentResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(CmdentError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(CmdentError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(CmdentError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(CmdentError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
