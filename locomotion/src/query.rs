use crate::{
    layers::LayerMask,
    math::{Vec3, is_finite},
};

/// A single surface hit returned by a ray query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// World-space contact point.
    pub point: Vec3,
    /// World-space surface normal at the contact.
    pub normal: Vec3,
    /// Distance from the ray origin to `point` (meters).
    pub distance: f32,
}

impl RayHit {
    /// Rejects hits an engine should never produce: NaNs, negative distance, zero normal.
    pub fn is_well_formed(&self) -> bool {
        is_finite(&self.point)
            && is_finite(&self.normal)
            && self.distance.is_finite()
            && self.distance >= 0.0
            && self.normal.norm_squared() > 1.0e-12
    }
}

/// Scene ray queries, provided by the physics engine.
///
/// Implementations return the nearest hit within `max_distance` on any collider whose
/// layers intersect `filter`, or `None`. An unavailable provider also returns `None`.
pub trait GeometryQuery {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: LayerMask,
    ) -> Option<RayHit>;
}

impl<Q: GeometryQuery + ?Sized> GeometryQuery for &Q {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: LayerMask,
    ) -> Option<RayHit> {
        (**self).raycast(origin, direction, max_distance, filter)
    }
}

/// Cast through `query` and drop anything malformed.
pub(crate) fn checked_raycast<Q: GeometryQuery + ?Sized>(
    query: &Q,
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
    filter: LayerMask,
) -> Option<RayHit> {
    if !is_finite(&origin) || !is_finite(&direction) || !(max_distance > 0.0) {
        return None;
    }

    let hit = query.raycast(origin, direction, max_distance, filter)?;
    if hit.is_well_formed() {
        Some(hit)
    } else {
        log::warn!("Discarding malformed ray hit {:?}", hit);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Option<RayHit>);

    impl GeometryQuery for Fixed {
        fn raycast(&self, _: Vec3, _: Vec3, _: f32, _: LayerMask) -> Option<RayHit> {
            self.0
        }
    }

    #[test]
    fn malformed_hits_degrade_to_none() {
        let nan = Fixed(Some(RayHit {
            point: Vec3::new(f32::NAN, 0.0, 0.0),
            normal: Vec3::y(),
            distance: 1.0,
        }));
        assert!(checked_raycast(&nan, Vec3::zeros(), -Vec3::y(), 2.0, LayerMask::ALL).is_none());

        let zero_normal = Fixed(Some(RayHit {
            point: Vec3::zeros(),
            normal: Vec3::zeros(),
            distance: 1.0,
        }));
        assert!(
            checked_raycast(&zero_normal, Vec3::zeros(), -Vec3::y(), 2.0, LayerMask::ALL)
                .is_none()
        );
    }

    #[test]
    fn non_positive_range_never_queries() {
        let hit = Fixed(Some(RayHit {
            point: Vec3::zeros(),
            normal: Vec3::y(),
            distance: 0.0,
        }));
        assert!(checked_raycast(&hit, Vec3::zeros(), -Vec3::y(), 0.0, LayerMask::ALL).is_none());
        assert!(checked_raycast(&hit, Vec3::zeros(), -Vec3::y(), 1.0, LayerMask::ALL).is_some());
    }
}
