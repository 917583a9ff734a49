use glam::DVec3;

/// Interpolation applied from a keyframe toward the next one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Straight-line interpolation.
    #[default]
    Linear,
    /// Uniform Catmull-Rom through neighbouring keys.
    #[serde(alias = "smooth")]
    Catmullrom,
    /// Hold the key value until the next key.
    Step,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct CurveKey {
    time: f64,
    value: DVec3,
    post: Option<DVec3>,
    interpolation: Interpolation,
}

impl CurveKey {
    /// Value the curve leaves this key with.
    fn outgoing(&self) -> DVec3 {
        self.post.unwrap_or(self.value)
    }
}

/// Keyframed 3-component curve evaluated in seconds.
///
/// Values are deltas applied on top of a rest pose, so an empty curve means "no motion" and
/// evaluates to zero everywhere.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Curve3 {
    keys: Vec<CurveKey>, // sorted by time, insertion-stable
}

impl Curve3 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Insert a key; `post` is the value the curve continues with after `time` when the key is
    /// discontinuous.
    pub fn add_keyframe(
        &mut self,
        time: f64,
        value: DVec3,
        interpolation: Interpolation,
        post: Option<DVec3>,
    ) {
        let idx = self.keys.partition_point(|k| k.time <= time);
        self.keys.insert(
            idx,
            CurveKey {
                time,
                value,
                post,
                interpolation,
            },
        );
    }

    /// Sample the curve at `t` seconds, clamping outside the keyed range.
    pub fn eval(&self, t: f64) -> DVec3 {
        let Some(first) = self.keys.first() else {
            return DVec3::ZERO;
        };

        let idx = self.keys.partition_point(|k| k.time <= t);
        if idx == 0 {
            return first.value;
        }
        if idx >= self.keys.len() {
            return self.keys[self.keys.len() - 1].outgoing();
        }

        let a = &self.keys[idx - 1];
        let b = &self.keys[idx];
        let denom = b.time - a.time;
        if denom <= 0.0 {
            return a.outgoing();
        }
        let u = (t - a.time) / denom;

        if a.interpolation == Interpolation::Catmullrom || b.interpolation == Interpolation::Catmullrom
        {
            let p0 = if idx >= 2 {
                self.keys[idx - 2].outgoing()
            } else {
                a.outgoing()
            };
            let p3 = self.keys.get(idx + 1).map_or(b.value, |k| k.value);
            return catmull_rom(p0, a.outgoing(), b.value, p3, u);
        }

        match a.interpolation {
            Interpolation::Step => a.outgoing(),
            _ => a.outgoing().lerp(b.value, u),
        }
    }
}

fn catmull_rom(p0: DVec3, p1: DVec3, p2: DVec3, p3: DVec3, u: f64) -> DVec3 {
    let u2 = u * u;
    let u3 = u2 * u;
    0.5 * ((2.0 * p1)
        + (p2 - p0) * u
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * u2
        + (3.0 * p1 - p0 - 3.0 * p2 + p3) * u3)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/curve.rs"]
mod tests;
