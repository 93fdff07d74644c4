use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::game::{
    avatar::{Driver, MotionState, PhysicsMode},
    player::camera_relative,
};

#[derive(Reflect, Clone, Debug, Serialize, Deserialize)]
pub struct SoulSettings {
    pub move_speed: f32,
    pub jump_speed: f32,
    /// Gravity relative to the Body's, before time-scale compensation.
    pub gravity_scale: f32,
    pub turn_speed: f32,
    pub feet_offset: f32,
    pub ground_probe_radius: f32,
}

impl Default for SoulSettings {
    fn default() -> Self {
        Self {
            move_speed: 5.5,
            jump_speed: 7.0,
            gravity_scale: 0.45,
            turn_speed: 10.0,
            feet_offset: 0.55,
            ground_probe_radius: 0.2,
        }
    }
}

/// Smallest time scale the compensation term is computed against.
const MIN_TIME_SCALE: f32 = 0.05;

/// `1 / time_scale`, so slowed-world velocities still cover real-world distances.
pub fn time_scale_factor(time_scale: f32) -> f32 {
    1.0 / time_scale.max(MIN_TIME_SCALE)
}

/// Locomotion of the projected avatar. Only moves while active and input-driven.
#[derive(Component, Debug, Clone, Default)]
pub struct SoulController {
    pub settings: SoulSettings,
    active: bool,
}

impl SoulController {
    pub fn new(settings: SoulSettings) -> Self {
        Self {
            settings,
            active: false,
        }
    }

    /// Physics mode of a free-moving Soul at normal time scale.
    pub fn default_physics(&self) -> PhysicsMode {
        PhysicsMode::dynamic(self.settings.gravity_scale)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Places the Soul on top of the Body and brings it into play, still frozen.
    pub fn activate(&mut self, motion: &mut MotionState, position: Vec3, rotation: Quat) {
        motion.freeze();
        motion.force_position(Driver::Ability, position);
        motion.force_rotation(Driver::Ability, rotation);
        motion.grounded = false;
        self.active = true;
    }

    /// Parks the Soul: frozen in place and out of play.
    pub fn deactivate(&mut self, motion: &mut MotionState) {
        // Drop any time-slow compensation before the mode is saved for next time.
        motion.set_gravity_scale(Driver::Input, self.settings.gravity_scale);
        motion.freeze();
        self.active = false;
    }

    pub fn feet(&self, motion: &MotionState) -> Vec3 {
        motion.position - Vec3::Y * self.settings.feet_offset
    }

    /// One scaled-time step. `time_scale` is the current world slow-down.
    pub fn tick(
        &mut self,
        motion: &mut MotionState,
        move_axis: Vec2,
        jump_pressed: bool,
        camera_yaw: f32,
        grounded: bool,
        time_scale: f32,
        dt: f32,
    ) {
        motion.grounded = grounded;
        if !self.active || !motion.enabled() {
            return;
        }
        let factor = time_scale_factor(time_scale);
        let direction = camera_relative(move_axis, camera_yaw);

        let mut velocity = direction * self.settings.move_speed * factor;
        velocity.y = motion.velocity.y;
        if jump_pressed && grounded {
            velocity.y = self.settings.jump_speed * factor;
        }
        motion.set_velocity(Driver::Input, velocity);
        motion.set_gravity_scale(Driver::Input, self.settings.gravity_scale * factor * factor);

        if let Ok(facing) = Dir3::new(direction) {
            let target = Transform::IDENTITY.looking_to(facing, Vec3::Y).rotation;
            let rotation = motion
                .rotation
                .slerp(target, (self.settings.turn_speed * dt * factor).min(1.0));
            motion.force_rotation(Driver::Input, rotation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_soul() -> (SoulController, MotionState) {
        let mut soul = SoulController::new(SoulSettings::default());
        let mut motion = MotionState::new(Vec3::ZERO, soul.default_physics());
        soul.activate(&mut motion, Vec3::new(1.0, 2.0, 3.0), Quat::IDENTITY);
        motion.unfreeze();
        (soul, motion)
    }

    #[test]
    fn test_activate_places_soul_frozen() {
        let mut soul = SoulController::new(SoulSettings::default());
        let mut motion = MotionState::new(Vec3::ZERO, soul.default_physics());
        soul.activate(&mut motion, Vec3::new(1.0, 2.0, 3.0), Quat::IDENTITY);
        assert!(soul.is_active());
        assert!(motion.is_frozen());
        assert_eq!(motion.position, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_velocity_compensates_time_slow() {
        let (mut soul, mut motion) = active_soul();
        soul.tick(&mut motion, Vec2::Y, false, 0.0, true, 0.25, 0.01);
        let expected = soul.settings.move_speed * 4.0;
        assert!((motion.velocity.length() - expected).abs() < 1e-3);
        assert!((motion.physics().gravity_scale - soul.settings.gravity_scale * 16.0).abs() < 1e-3);
    }

    #[test]
    fn test_jump_requires_ground() {
        let (mut soul, mut motion) = active_soul();
        soul.tick(&mut motion, Vec2::ZERO, true, 0.0, false, 1.0, 0.01);
        assert_eq!(motion.velocity.y, 0.0);
        soul.tick(&mut motion, Vec2::ZERO, true, 0.0, true, 1.0, 0.01);
        assert_eq!(motion.velocity.y, soul.settings.jump_speed);
    }

    #[test]
    fn test_inactive_soul_ignores_input() {
        let mut soul = SoulController::new(SoulSettings::default());
        let mut motion = MotionState::new(Vec3::ZERO, soul.default_physics());
        soul.tick(&mut motion, Vec2::Y, true, 0.0, true, 1.0, 0.01);
        assert_eq!(motion.velocity, Vec3::ZERO);
    }
}
