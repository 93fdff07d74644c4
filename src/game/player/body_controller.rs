use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::game::{
    animations::{
        AnimationCallbacks,
        models::{AnimatorParams, JUMP_LAUNCH, JUMP_TRIGGER, LAND_TRIGGER, LANDING_IMPACT},
    },
    avatar::{Driver, MotionState},
    physics::horizontal,
};

#[derive(Reflect, Clone, Debug, Serialize, Deserialize)]
pub struct BodySettings {
    pub run_speed: f32,
    pub jump_height: f32,
    /// Grace period after leaving ground during which a jump is still accepted.
    pub coyote_time: f32,
    /// Longest wait for the jump clip's launch frame before the jump is dropped.
    pub max_windup: f32,
    /// How long horizontal speed stays damped after a landing impact.
    pub landing_recovery: f32,
    pub landing_speed_factor: f32,
    pub float_height: f32,
    pub turning_angvel: f32,
    /// Distance from the body origin down to the grounded probe.
    pub feet_offset: f32,
    pub ground_probe_radius: f32,
}

impl Default for BodySettings {
    fn default() -> Self {
        Self {
            run_speed: 7.0,
            jump_height: 2.2,
            coyote_time: 0.12,
            max_windup: 0.4,
            landing_recovery: 0.15,
            landing_speed_factor: 0.5,
            float_height: 1.0,
            turning_angvel: 12.0,
            feet_offset: 0.95,
            ground_probe_radius: 0.25,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum JumpPhase {
    #[default]
    Ready,
    /// Jump requested, waiting for the clip's launch frame.
    WindingUp { elapsed: f32 },
    /// Launched; the jump action is held until the apex.
    Ascending { elapsed: f32 },
}

/// What the Body wants from the floating-character backend this tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LocomotionIntent {
    pub desired_velocity: Vec3,
    pub desired_forward: Option<Dir3>,
    pub jump: bool,
}

const MIN_ASCENT: f32 = 0.1;

/// Camera-relative movement direction on the ground plane, at most unit length.
pub fn camera_relative(move_axis: Vec2, camera_yaw: f32) -> Vec3 {
    let local = Vec3::new(move_axis.x, 0.0, -move_axis.y).clamp_length_max(1.0);
    Quat::from_rotation_y(camera_yaw) * local
}

/// Locomotion of the physical avatar.
#[derive(Component, Debug, Clone, Default)]
pub struct BodyController {
    pub settings: BodySettings,
    jump: JumpPhase,
    airborne_time: f32,
    recovery: f32,
    was_grounded: bool,
}

impl BodyController {
    pub fn new(settings: BodySettings) -> Self {
        Self {
            settings,
            ..default()
        }
    }

    /// Handlers for the clip events the Body reacts to.
    pub fn callbacks() -> AnimationCallbacks<BodyController> {
        let mut callbacks = AnimationCallbacks::default();
        callbacks
            .register(JUMP_LAUNCH, |body: &mut BodyController| {
                body.launch_jump();
            })
            .register(LANDING_IMPACT, |body: &mut BodyController| body.land());
        callbacks
    }

    pub fn jump_phase(&self) -> JumpPhase {
        self.jump
    }

    pub fn feet(&self, motion: &MotionState) -> Vec3 {
        motion.position - Vec3::Y * self.settings.feet_offset
    }

    /// One scaled-time step of player-driven locomotion.
    pub fn tick(
        &mut self,
        motion: &mut MotionState,
        animator: &mut AnimatorParams,
        move_axis: Vec2,
        jump_pressed: bool,
        camera_yaw: f32,
        grounded: bool,
        dt: f32,
    ) -> LocomotionIntent {
        motion.grounded = grounded;
        if !motion.enabled() {
            self.jump = JumpPhase::Ready;
            self.was_grounded = grounded;
            return LocomotionIntent::default();
        }

        if grounded {
            self.airborne_time = 0.0;
            if !self.was_grounded {
                animator.set_trigger(LAND_TRIGGER);
                if matches!(self.jump, JumpPhase::Ascending { .. }) {
                    self.jump = JumpPhase::Ready;
                }
            }
        } else {
            self.airborne_time += dt;
        }
        self.was_grounded = grounded;
        self.recovery = (self.recovery - dt).max(0.0);

        let direction = camera_relative(move_axis, camera_yaw);
        let speed = if self.recovery > 0.0 {
            self.settings.run_speed * self.settings.landing_speed_factor
        } else {
            self.settings.run_speed
        };

        let can_jump = grounded || self.airborne_time <= self.settings.coyote_time;
        if jump_pressed && self.jump == JumpPhase::Ready && can_jump {
            self.jump = JumpPhase::WindingUp { elapsed: 0.0 };
            animator.set_trigger(JUMP_TRIGGER);
        }

        let mut jump = false;
        match &mut self.jump {
            JumpPhase::Ready => {}
            JumpPhase::WindingUp { elapsed } => {
                *elapsed += dt;
                if *elapsed > self.settings.max_windup {
                    debug!("Jump launch frame never arrived, dropping jump");
                    self.jump = JumpPhase::Ready;
                }
            }
            JumpPhase::Ascending { elapsed } => {
                *elapsed += dt;
                if *elapsed < MIN_ASCENT || motion.velocity.y > 0.0 {
                    jump = true;
                } else {
                    self.jump = JumpPhase::Ready;
                }
            }
        }

        animator.grounded = grounded;
        animator.forward_blend = horizontal(motion.velocity).length() / self.settings.run_speed;
        animator.vertical_speed = motion.velocity.y;

        LocomotionIntent {
            desired_velocity: direction * speed,
            desired_forward: Dir3::new(direction).ok(),
            jump,
        }
    }

    /// "jump-launch": the clip reached the frame where the feet leave the ground.
    pub fn launch_jump(&mut self) -> bool {
        if let JumpPhase::WindingUp { .. } = self.jump {
            self.jump = JumpPhase::Ascending { elapsed: 0.0 };
            return true;
        }
        false
    }

    /// "landing-impact": damp horizontal speed for a moment.
    pub fn land(&mut self) {
        self.recovery = self.settings.landing_recovery;
    }

    /// Applied by the ability manager when a traversal ends on solid ground.
    pub fn force_grounded(&mut self, motion: &mut MotionState) {
        motion.grounded = true;
        self.was_grounded = true;
        self.airborne_time = 0.0;
        self.jump = JumpPhase::Ready;
        motion.set_velocity(Driver::Input, Vec3::ZERO);
    }
}
