use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::game::{avatar::Avatar, physics::PhysicsProbe};

#[derive(Reflect, Clone, Debug, Serialize, Deserialize)]
pub struct CameraSettings {
    /// Radians per pixel of horizontal mouse motion.
    pub yaw_sensitivity: f32,
    pub pitch_sensitivity: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,
    pub distance: f32,
    pub min_distance: f32,
    /// Exponential follow rate on the unscaled clock.
    pub follow_sharpness: f32,
    pub focus_height: f32,
    pub collision_radius: f32,
    pub occlusion_padding: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            yaw_sensitivity: 0.003,
            pitch_sensitivity: 0.0025,
            min_pitch: -1.2,
            max_pitch: 0.9,
            distance: 5.5,
            min_distance: 0.8,
            follow_sharpness: 12.0,
            focus_height: 0.8,
            collision_radius: 0.25,
            occlusion_padding: 0.1,
        }
    }
}

/// Orbit camera following whichever avatar is live.
#[derive(Component, Debug, Clone)]
pub struct CameraRig {
    pub settings: CameraSettings,
    target: Avatar,
    yaw: f32,
    pitch: f32,
    focus: Option<Vec3>,
    pub cursor_locked: bool,
}

impl CameraRig {
    pub fn new(settings: CameraSettings) -> Self {
        Self {
            settings,
            target: Avatar::Body,
            yaw: 0.0,
            pitch: -0.3,
            focus: None,
            cursor_locked: true,
        }
    }

    pub fn set_target(&mut self, target: Avatar) {
        if self.target != target {
            debug!("Camera target {:?} -> {:?}", self.target, target);
            self.target = target;
        }
    }

    pub fn target(&self) -> Avatar {
        self.target
    }

    /// Heading used to align locomotion with the view.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    /// Applies a look delta in pixels. Ignored while the cursor is free.
    pub fn orbit(&mut self, look_delta: Vec2) {
        if !self.cursor_locked {
            return;
        }
        self.yaw -= look_delta.x * self.settings.yaw_sensitivity;
        self.pitch = (self.pitch - look_delta.y * self.settings.pitch_sensitivity)
            .clamp(self.settings.min_pitch, self.settings.max_pitch);
    }

    /// Moves the focus toward `target_position` and returns the camera transform,
    /// pulled in front of any geometry between the focus and the desired position.
    pub fn follow(&mut self, target_position: Vec3, dt: f32, probe: &impl PhysicsProbe) -> Transform {
        let goal = target_position + Vec3::Y * self.settings.focus_height;
        let focus = match self.focus {
            Some(focus) => focus.lerp(goal, 1.0 - (-self.settings.follow_sharpness * dt).exp()),
            None => goal,
        };
        self.focus = Some(focus);

        let rotation = self.rotation();
        let back = rotation * Vec3::Z;
        let mut distance = self.settings.distance;
        if let Ok(direction) = Dir3::new(back) {
            if let Some(hit) = probe.sphere_cast(focus, self.settings.collision_radius, direction, distance) {
                distance = (hit.distance - self.settings.occlusion_padding).max(self.settings.min_distance);
            }
        }
        Transform::from_translation(focus + back * distance).with_rotation(rotation)
    }
}
