use glam::{DMat4, DQuat, DVec3, EulerRot};

/// Euler order used by the authoring data: `R = Rz * Ry * Rx`, angles in degrees.
const EULER_ORDER: EulerRot = EulerRot::ZYX;

/// Rigid transform split into translation and Euler rotation (degrees).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    /// Translation in model units (1/16 block).
    pub translation: DVec3,
    /// Euler angles in degrees, `x`/`y`/`z` components.
    pub rotation_deg: DVec3,
}

impl Pose {
    /// Rebuild the rigid matrix this pose describes.
    pub fn to_matrix(self) -> DMat4 {
        rigid(self.translation, self.rotation_deg)
    }
}

pub fn quat_from_euler_deg(r: DVec3) -> DQuat {
    DQuat::from_euler(
        EULER_ORDER,
        r.z.to_radians(),
        r.y.to_radians(),
        r.x.to_radians(),
    )
}

pub fn euler_deg_from_quat(q: DQuat) -> DVec3 {
    let (z, y, x) = q.to_euler(EULER_ORDER);
    DVec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees())
}

/// `T(translation) * R(rotation)`.
pub fn rigid(translation: DVec3, rotation_deg: DVec3) -> DMat4 {
    DMat4::from_rotation_translation(quat_from_euler_deg(rotation_deg), translation)
}

/// `T(translation) * R(rotation) * T(-pivot)`: rotation about `pivot`, then moved so the
/// pivot lands on `translation`.
pub fn pivoted(translation: DVec3, rotation_deg: DVec3, pivot: DVec3) -> DMat4 {
    rigid(translation, rotation_deg) * DMat4::from_translation(-pivot)
}

/// Split a rigid matrix into translation and Euler rotation.
///
/// Scale is discarded; bone transforms never carry any.
pub fn decompose(m: &DMat4) -> Pose {
    let (_scale, rotation, translation) = m.to_scale_rotation_translation();
    Pose {
        translation,
        rotation_deg: euler_deg_from_quat(rotation),
    }
}

/// Largest absolute element-wise difference between two matrices.
pub fn max_abs_diff(a: &DMat4, b: &DMat4) -> f64 {
    a.to_cols_array()
        .iter()
        .zip(b.to_cols_array().iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
