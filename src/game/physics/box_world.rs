//! Analytic axis-aligned box world used by unit tests in place of avian3d.

use bevy::prelude::*;

use super::{PhysicsProbe, ProbeHit};

#[derive(Debug, Clone, Copy)]
struct Block {
    min: Vec3,
    max: Vec3,
}

impl Block {
    fn inflated(&self, by: f32) -> Self {
        Self {
            min: self.min - Vec3::splat(by),
            max: self.max + Vec3::splat(by),
        }
    }

    fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    fn ray(&self, origin: Vec3, direction: Vec3) -> Option<(f32, Vec3)> {
        if self.contains(origin) {
            return Some((0.0, -direction));
        }
        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;
        let mut normal = Vec3::ZERO;
        for axis in 0..3 {
            if direction[axis].abs() < 1e-8 {
                if origin[axis] < self.min[axis] || origin[axis] > self.max[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / direction[axis];
            let mut t1 = (self.min[axis] - origin[axis]) * inv;
            let mut t2 = (self.max[axis] - origin[axis]) * inv;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            if t1 > t_near {
                t_near = t1;
                let mut n = Vec3::ZERO;
                n[axis] = -direction[axis].signum();
                normal = n;
            }
            t_far = t_far.min(t2);
            if t_near > t_far {
                return None;
            }
        }
        (t_far >= 0.0 && t_near >= 0.0).then_some((t_near, normal))
    }
}

/// A static set of boxes answering [`PhysicsProbe`] queries exactly.
#[derive(Debug, Clone, Default)]
pub struct BoxWorld {
    blocks: Vec<Block>,
}

impl BoxWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a box from its center and half extents.
    pub fn with_box(mut self, center: Vec3, half_extents: Vec3) -> Self {
        self.blocks.push(Block {
            min: center - half_extents,
            max: center + half_extents,
        });
        self
    }

    /// A 100m floor whose top surface sits at `y`.
    pub fn with_floor(self, y: f32) -> Self {
        self.with_box(Vec3::new(0.0, y - 0.5, 0.0), Vec3::new(50.0, 0.5, 50.0))
    }

    fn nearest(
        &self,
        origin: Vec3,
        direction: Dir3,
        max_distance: f32,
        inflate: f32,
    ) -> Option<(f32, Vec3)> {
        self.blocks
            .iter()
            .filter_map(|block| block.inflated(inflate).ray(origin, *direction))
            .filter(|(t, _)| *t <= max_distance)
            .min_by(|a, b| a.0.total_cmp(&b.0))
    }
}

impl PhysicsProbe for BoxWorld {
    fn is_grounded(&self, feet: Vec3, radius: f32) -> bool {
        self.blocks.iter().any(|block| {
            let closest = feet.clamp(block.min, block.max);
            closest.distance_squared(feet) <= radius * radius
        })
    }

    fn raycast(&self, origin: Vec3, direction: Dir3, max_distance: f32) -> Option<ProbeHit> {
        self.nearest(origin, direction, max_distance, 0.0)
            .map(|(distance, normal)| ProbeHit {
                point: origin + *direction * distance,
                normal,
                distance,
            })
    }

    fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Dir3,
        max_distance: f32,
    ) -> Option<ProbeHit> {
        self.nearest(origin, direction, max_distance, radius)
            .map(|(distance, normal)| ProbeHit {
                point: origin + *direction * distance - normal * radius,
                normal,
                distance,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_hits_front_face() {
        let world = BoxWorld::new().with_box(Vec3::new(0.0, 0.0, -5.0), Vec3::ONE);
        let hit = world.raycast(Vec3::ZERO, Dir3::NEG_Z, 10.0).unwrap();
        assert!((hit.distance - 4.0).abs() < 1e-5);
        assert_eq!(hit.normal, Vec3::Z);
    }

    #[test]
    fn test_ray_misses_beyond_range() {
        let world = BoxWorld::new().with_box(Vec3::new(0.0, 0.0, -5.0), Vec3::ONE);
        assert!(world.raycast(Vec3::ZERO, Dir3::NEG_Z, 3.0).is_none());
        assert!(world.raycast(Vec3::ZERO, Dir3::Z, 10.0).is_none());
    }

    #[test]
    fn test_grounded_overlap() {
        let world = BoxWorld::new().with_floor(0.0);
        assert!(world.is_grounded(Vec3::new(0.0, 0.1, 0.0), 0.2));
        assert!(!world.is_grounded(Vec3::new(0.0, 0.5, 0.0), 0.2));
    }
}
