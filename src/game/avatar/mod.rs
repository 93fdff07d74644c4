//! Motion state shared by the two avatars, and the hand-off rules for who may move them.
//!
//! Every avatar carries exactly one [`MotionState`]. Its `driver` names the single party
//! allowed to write position or velocity this tick: ordinary input-driven locomotion, the
//! parkour layer, or the ability manager. Writes from anyone else are refused, so two drivers
//! can never fight over the same transform.

mod sync;

use bevy::prelude::*;

use self::sync::{read_avatar_motion, write_avatar_motion};
use crate::game::GameplaySystems;

pub(super) fn plugin(app: &mut App) {
    // Both clocks read before and flush after their own simulation step.
    app.add_systems(
        FixedUpdate,
        (
            read_avatar_motion.in_set(GameplaySystems::ReadMotion),
            write_avatar_motion.in_set(GameplaySystems::WriteMotion),
        ),
    );
    app.add_systems(
        Update,
        (
            read_avatar_motion.in_set(GameplaySystems::ReadMotion),
            write_avatar_motion.in_set(GameplaySystems::WriteMotion),
        ),
    );
}

/// Marker for the player's physical avatar.
#[derive(Component, Debug, Default)]
pub struct Body;

/// Marker for the projected avatar.
#[derive(Component, Debug, Default)]
pub struct Soul;

/// Names one of the two simulated avatars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum Avatar {
    #[default]
    Body,
    Soul,
}

/// Who currently owns an avatar's transform and velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum Driver {
    /// Player input through the avatar's own controller.
    #[default]
    Input,
    /// A parkour maneuver.
    Parkour,
    /// The ability manager (freeze, teleport, traversal).
    Ability,
}

/// Physics mode requested for an avatar's rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct PhysicsMode {
    pub kinematic: bool,
    /// Every translational and rotational degree of freedom locked.
    pub locked: bool,
    pub gravity_scale: f32,
}

impl Default for PhysicsMode {
    fn default() -> Self {
        Self::dynamic(1.0)
    }
}

impl PhysicsMode {
    pub const FROZEN: Self = Self {
        kinematic: true,
        locked: true,
        gravity_scale: 0.0,
    };

    pub const KINEMATIC: Self = Self {
        kinematic: true,
        locked: false,
        gravity_scale: 0.0,
    };

    pub const fn dynamic(gravity_scale: f32) -> Self {
        Self {
            kinematic: false,
            locked: false,
            gravity_scale,
        }
    }
}

/// Writes the ECS layer still has to flush to the physics engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingWrites {
    pub transform: bool,
    pub velocity: bool,
    pub physics: bool,
}

/// Position, rotation, velocity and ground state of one avatar.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct MotionState {
    pub position: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
    pub grounded: bool,
    driver: Driver,
    physics: PhysicsMode,
    /// Mode to restore once whoever took control gives it back.
    saved_physics: Option<PhysicsMode>,
    pending: PendingWrites,
}

impl MotionState {
    pub fn new(position: Vec3, physics: PhysicsMode) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            grounded: false,
            driver: Driver::Input,
            physics,
            saved_physics: None,
            pending: PendingWrites {
                physics: true,
                ..default()
            },
        }
    }

    pub fn driver(&self) -> Driver {
        self.driver
    }

    /// Whether player input drives this avatar.
    pub fn enabled(&self) -> bool {
        self.driver == Driver::Input
    }

    pub fn physics(&self) -> PhysicsMode {
        self.physics
    }

    /// Whether a controller currently overrides the avatar's default physics mode.
    pub fn is_overridden(&self) -> bool {
        self.saved_physics.is_some()
    }

    pub fn is_frozen(&self) -> bool {
        self.physics == PhysicsMode::FROZEN
    }

    pub fn set_velocity(&mut self, by: Driver, velocity: Vec3) -> bool {
        if by != self.driver {
            debug!("{by:?} tried to set velocity while {:?} drives", self.driver);
            return false;
        }
        self.velocity = velocity;
        self.pending.velocity = true;
        true
    }

    pub fn force_position(&mut self, by: Driver, position: Vec3) -> bool {
        if by != self.driver {
            debug!("{by:?} tried to move avatar while {:?} drives", self.driver);
            return false;
        }
        self.position = position;
        self.pending.transform = true;
        true
    }

    pub fn force_rotation(&mut self, by: Driver, rotation: Quat) -> bool {
        if by != self.driver {
            return false;
        }
        self.rotation = rotation;
        self.pending.transform = true;
        true
    }

    /// Turns the avatar to look along `direction` on the ground plane.
    pub fn face(&mut self, by: Driver, direction: Vec3) -> bool {
        let flat = Vec3::new(direction.x, 0.0, direction.z);
        let Ok(dir) = Dir3::new(flat) else {
            return false;
        };
        self.force_rotation(by, Transform::IDENTITY.looking_to(dir, Vec3::Y).rotation)
    }

    /// Changes the gravity scale without touching the saved mode.
    pub fn set_gravity_scale(&mut self, by: Driver, gravity_scale: f32) -> bool {
        if by != self.driver {
            return false;
        }
        if self.physics.gravity_scale != gravity_scale {
            self.physics.gravity_scale = gravity_scale;
            self.pending.physics = true;
        }
        true
    }

    /// Hands the avatar to `driver` in `mode`, remembering the mode it had before.
    ///
    /// Taking control of an avatar that is already overridden keeps the first saved mode.
    pub fn take_control(&mut self, driver: Driver, mode: PhysicsMode) {
        if self.saved_physics.is_none() {
            self.saved_physics = Some(self.physics);
        }
        self.driver = driver;
        self.apply_physics(mode);
    }

    /// Stops all motion and locks every degree of freedom under the ability manager.
    pub fn freeze(&mut self) {
        self.take_control(Driver::Ability, PhysicsMode::FROZEN);
        self.velocity = Vec3::ZERO;
        self.pending.velocity = true;
    }

    /// Restores the saved mode and gives the avatar back to player input.
    pub fn unfreeze(&mut self) {
        self.release_control();
    }

    /// Restores the saved physics mode without changing the driver.
    pub fn restore_physics(&mut self) -> bool {
        let Some(saved) = self.saved_physics.take() else {
            return false;
        };
        self.apply_physics(saved);
        true
    }

    /// Restores the saved physics mode and gives the avatar back to player input.
    pub fn release_control(&mut self) {
        self.restore_physics();
        self.driver = Driver::Input;
    }

    /// Copies the physics engine's view of the avatar, unless a forced write is still queued.
    pub fn sync_from_physics(&mut self, position: Vec3, rotation: Quat, velocity: Vec3) {
        if !self.pending.transform {
            self.position = position;
            self.rotation = rotation;
        }
        if !self.pending.velocity {
            self.velocity = velocity;
        }
    }

    pub fn take_pending(&mut self) -> PendingWrites {
        std::mem::take(&mut self.pending)
    }

    fn apply_physics(&mut self, mode: PhysicsMode) {
        if self.physics != mode {
            self.physics = mode;
            self.pending.physics = true;
        }
    }
}
