use nalgebra::{Vector2, Vector3};

/// Common math aliases for clarity and consistency.
pub type Vec3 = Vector3<f32>;
pub type Vec2 = Vector2<f32>;

/// Practical small distance for comparisons (meters).
pub const DIST_EPS: f32 = 1.0e-6;

/// Planar (XZ) component of `v` with the vertical component zeroed.
#[inline]
pub fn planar(v: &Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Replace the planar (XZ) part of `v`, keeping its vertical component.
#[inline]
pub fn with_planar(v: &Vec3, planar: &Vec3) -> Vec3 {
    Vec3::new(planar.x, v.y, planar.z)
}

/// Remove the component of `v` along the plane normal `n`.
///
/// `n` does not need to be unit length; a degenerate normal returns `v` unchanged.
pub fn project_on_plane(v: &Vec3, n: &Vec3) -> Vec3 {
    let n_len_sq = n.norm_squared();
    if n_len_sq <= 1.0e-12 {
        return *v;
    }
    v - n * (v.dot(n) / n_len_sq)
}

/// Angle in degrees between world up and `normal`.
///
/// Returns `0.0` for a degenerate normal; callers validate normals before asking.
pub fn angle_from_up_deg(normal: &Vec3) -> f32 {
    let len = normal.norm();
    if len <= DIST_EPS {
        return 0.0;
    }
    let cos = (normal.y / len).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Scale `v` down so its magnitude does not exceed `max`. Shorter vectors pass through.
pub fn clamp_magnitude(v: &Vec3, max: f32) -> Vec3 {
    let max = max.max(0.0);
    let len = v.norm();
    if len > max && len > DIST_EPS {
        v * (max / len)
    } else {
        *v
    }
}

/// Linear interpolation between `a` and `b`, `t` clamped to [0, 1].
#[inline]
pub fn lerp(a: &Vec3, b: &Vec3, t: f32) -> Vec3 {
    let t = t.clamp(0.0, 1.0);
    a + (b - a) * t
}

/// Normalize `v`, or return zero when it is too short to have a direction.
#[inline]
pub fn normalize_or_zero(v: &Vec3) -> Vec3 {
    v.try_normalize(DIST_EPS).unwrap_or_else(Vec3::zeros)
}

/// True when every component is finite.
#[inline]
pub fn is_finite(v: &Vec3) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_on_plane_removes_normal_component() {
        let n = Vec3::new(0.0, 1.0, 1.0).normalize();
        let v = Vec3::new(0.0, 0.0, 1.0);
        let p = project_on_plane(&v, &n);
        assert!(p.dot(&n).abs() < 1.0e-6);
    }

    #[test]
    fn angle_from_up_matches_known_normals() {
        assert!(angle_from_up_deg(&Vec3::y()).abs() < 1.0e-4);
        let n45 = Vec3::new(0.0, 1.0, 1.0);
        assert!((angle_from_up_deg(&n45) - 45.0).abs() < 1.0e-3);
        assert!((angle_from_up_deg(&Vec3::x()) - 90.0).abs() < 1.0e-3);
    }

    #[test]
    fn clamp_magnitude_only_shrinks() {
        let v = Vec3::new(3.0, 0.0, 4.0);
        assert!((clamp_magnitude(&v, 2.5).norm() - 2.5).abs() < 1.0e-5);
        assert_eq!(clamp_magnitude(&v, 10.0), v);
    }

    #[test]
    fn lerp_clamps_t() {
        let a = Vec3::zeros();
        let b = Vec3::new(2.0, 2.0, 2.0);
        assert_eq!(lerp(&a, &b, 2.0), b);
        assert_eq!(lerp(&a, &b, -1.0), a);
        assert_eq!(lerp(&a, &b, 0.5), Vec3::new(1.0, 1.0, 1.0));
    }
}
