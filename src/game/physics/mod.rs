//! The slice of the physics engine the gameplay core is allowed to see.
//!
//! Controllers never talk to avian3d directly. They receive something implementing
//! [`PhysicsProbe`], which answers grounded checks, ray casts and sphere sweeps against
//! level geometry only. The ECS layer wraps [`SpatialQuery`] in an [`AvianProbe`]; tests use
//! an analytic box world.

#[cfg(test)]
pub mod box_world;

use avian3d::prelude::*;
use bevy::prelude::*;

/// Collision layers used by everything in the game.
///
/// Body and Soul never list each other in their filters, so the two avatars can overlap
/// freely. Trigger volumes only report the Body.
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    World,
    Body,
    Soul,
    Trigger,
}

impl GameLayer {
    /// Layers for static level geometry.
    pub fn world() -> CollisionLayers {
        CollisionLayers::new(GameLayer::World, [GameLayer::World, GameLayer::Body, GameLayer::Soul])
    }

    pub fn body() -> CollisionLayers {
        CollisionLayers::new(GameLayer::Body, [GameLayer::World])
    }

    pub fn soul() -> CollisionLayers {
        CollisionLayers::new(GameLayer::Soul, [GameLayer::World])
    }

    /// Layers for hazard and checkpoint sensors.
    pub fn trigger() -> CollisionLayers {
        CollisionLayers::new(GameLayer::Trigger, [GameLayer::Body])
    }
}

/// A single probe result in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit {
    pub point: Vec3,
    pub normal: Vec3,
    pub distance: f32,
}

/// Queries the gameplay core needs from the physics engine.
pub trait PhysicsProbe {
    /// Sphere overlap at the feet.
    fn is_grounded(&self, feet: Vec3, radius: f32) -> bool;

    /// Solid ray cast. A ray starting inside geometry reports a hit at distance zero.
    fn raycast(&self, origin: Vec3, direction: Dir3, max_distance: f32) -> Option<ProbeHit>;

    /// Sweeps a sphere of `radius` from `origin` along `direction`.
    fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Dir3,
        max_distance: f32,
    ) -> Option<ProbeHit>;
}

/// [`PhysicsProbe`] backed by avian3d's spatial query pipeline, restricted to level geometry.
pub struct AvianProbe<'a, 'w, 's> {
    spatial_query: &'a SpatialQuery<'w, 's>,
    filter: SpatialQueryFilter,
}

impl<'a, 'w, 's> AvianProbe<'a, 'w, 's> {
    pub fn new(spatial_query: &'a SpatialQuery<'w, 's>) -> Self {
        Self {
            spatial_query,
            filter: SpatialQueryFilter::from_mask(GameLayer::World),
        }
    }
}

impl PhysicsProbe for AvianProbe<'_, '_, '_> {
    fn is_grounded(&self, feet: Vec3, radius: f32) -> bool {
        !self
            .spatial_query
            .shape_intersections(&Collider::sphere(radius), feet, Quat::IDENTITY, &self.filter)
            .is_empty()
    }

    fn raycast(&self, origin: Vec3, direction: Dir3, max_distance: f32) -> Option<ProbeHit> {
        self.spatial_query
            .cast_ray(origin, direction, max_distance, true, &self.filter)
            .map(|hit| ProbeHit {
                point: origin + *direction * hit.distance,
                normal: hit.normal,
                distance: hit.distance,
            })
    }

    fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Dir3,
        max_distance: f32,
    ) -> Option<ProbeHit> {
        self.spatial_query
            .cast_shape(
                &Collider::sphere(radius),
                origin,
                Quat::IDENTITY,
                direction,
                &ShapeCastConfig::from_max_distance(max_distance),
                &self.filter,
            )
            .map(|hit| ProbeHit {
                point: hit.point1,
                normal: hit.normal1,
                distance: hit.distance,
            })
    }
}

/// Flattens a vector onto the ground plane.
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}
