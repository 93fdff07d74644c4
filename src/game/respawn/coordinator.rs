use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::game::{
    abilities::{AbilityContext, AbilityManager, AbilityState},
    avatar::Driver,
};

#[derive(Reflect, Clone, Debug, Serialize, Deserialize)]
pub struct RespawnSettings {
    /// Seconds after a respawn during which further requests are ignored.
    pub cooldown: f32,
    /// Falling below this height counts as death even without a kill zone.
    pub kill_plane: f32,
}

impl Default for RespawnSettings {
    fn default() -> Self {
        Self {
            cooldown: 1.0,
            kill_plane: -25.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RespawnOutcome {
    Respawned(Vec3),
    /// An anchored player was pulled back along the path instead.
    Rescued,
    RejectedTraversing,
    RejectedCooldown,
}

/// Remembers the last checkpoint and puts the player back there on death.
#[derive(Resource, Debug, Clone)]
pub struct RespawnCoordinator {
    pub settings: RespawnSettings,
    checkpoint: Vec3,
    cooldown: f32,
}

impl RespawnCoordinator {
    pub fn new(settings: RespawnSettings, spawn_point: Vec3) -> Self {
        Self {
            settings,
            checkpoint: spawn_point,
            cooldown: 0.0,
        }
    }

    pub fn checkpoint(&self) -> Vec3 {
        self.checkpoint
    }

    /// Returns whether the checkpoint moved.
    pub fn set_checkpoint(&mut self, position: Vec3) -> bool {
        if self.checkpoint.distance_squared(position) < 1e-6 {
            return false;
        }
        info!("Checkpoint set at {position}");
        self.checkpoint = position;
        true
    }

    pub fn tick(&mut self, real_dt: f32) {
        self.cooldown = (self.cooldown - real_dt).max(0.0);
    }

    pub fn is_below_kill_plane(&self, position: Vec3) -> bool {
        position.y < self.settings.kill_plane
    }

    /// Resets abilities and moves the Body to the checkpoint.
    pub fn request_respawn(&mut self, manager: &mut AbilityManager, ctx: &mut AbilityContext) -> RespawnOutcome {
        if manager.state() == AbilityState::Traversing {
            debug!("Respawn ignored during traversal");
            return RespawnOutcome::RejectedTraversing;
        }
        if self.cooldown > 0.0 {
            debug!("Respawn ignored, cooling down for {:.2}s", self.cooldown);
            return RespawnOutcome::RejectedCooldown;
        }

        manager.force_reset(ctx);
        ctx.body.force_position(Driver::Input, self.checkpoint);
        ctx.body.set_velocity(Driver::Input, Vec3::ZERO);
        self.cooldown = self.settings.cooldown;
        info!("Respawned at {}", self.checkpoint);
        RespawnOutcome::Respawned(self.checkpoint)
    }

    /// A kill zone touched the Body.
    pub fn hazard(
        &mut self,
        manager: &mut AbilityManager,
        ctx: &mut AbilityContext,
        rescue_when_anchored: bool,
    ) -> RespawnOutcome {
        if rescue_when_anchored && manager.trigger_anchor_return(ctx) {
            return RespawnOutcome::Rescued;
        }
        self.request_respawn(manager, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{
        abilities::{AbilityCommand, AbilitySettings},
        avatar::{MotionState, PhysicsMode},
        parkour::ParkourMachine,
        path_recorder::{PathRecorder, PathSettings},
        player::{BodyController, BodySettings},
        soul::{SoulController, SoulSettings},
    };

    struct World {
        manager: AbilityManager,
        coordinator: RespawnCoordinator,
        body: MotionState,
        body_controller: BodyController,
        soul: MotionState,
        soul_controller: SoulController,
        parkour: ParkourMachine,
        recorder: PathRecorder,
    }

    impl World {
        fn new() -> Self {
            let mut soul_controller = SoulController::new(SoulSettings::default());
            let mut soul = MotionState::new(Vec3::ZERO, soul_controller.default_physics());
            soul_controller.deactivate(&mut soul);
            let mut body = MotionState::new(Vec3::new(5.0, 1.0, 5.0), PhysicsMode::default());
            body.grounded = true;
            Self {
                manager: AbilityManager::new(AbilitySettings::default()),
                coordinator: RespawnCoordinator::new(RespawnSettings::default(), Vec3::Y),
                body,
                body_controller: BodyController::new(BodySettings::default()),
                soul,
                soul_controller,
                parkour: ParkourMachine::default(),
                recorder: PathRecorder::new(PathSettings::default()),
            }
        }

        fn run<R>(&mut self, f: impl FnOnce(&mut RespawnCoordinator, &mut AbilityManager, &mut AbilityContext) -> R) -> R {
            let mut ctx = AbilityContext {
                body: &mut self.body,
                body_controller: &mut self.body_controller,
                soul: &mut self.soul,
                soul_controller: &mut self.soul_controller,
                parkour: &mut self.parkour,
                recorder: &mut self.recorder,
                camera: None,
                animator: None,
            };
            f(&mut self.coordinator, &mut self.manager, &mut ctx)
        }
    }

    #[test]
    fn test_respawn_resets_and_repositions() {
        let mut world = World::new();
        world.run(|_, m, ctx| m.handle(AbilityCommand::SoulWalk, ctx));

        let outcome = world.run(|c, m, ctx| c.request_respawn(m, ctx));
        assert_eq!(outcome, RespawnOutcome::Respawned(Vec3::Y));
        assert_eq!(world.manager.state(), AbilityState::Unified);
        assert_eq!(world.body.position, Vec3::Y);
        assert!(world.body.enabled());
    }

    #[test]
    fn test_cooldown_blocks_double_respawn() {
        let mut world = World::new();
        world.run(|c, m, ctx| c.request_respawn(m, ctx));
        let second = world.run(|c, m, ctx| c.request_respawn(m, ctx));
        assert_eq!(second, RespawnOutcome::RejectedCooldown);

        world.coordinator.tick(2.0);
        let third = world.run(|c, m, ctx| c.request_respawn(m, ctx));
        assert!(matches!(third, RespawnOutcome::Respawned(_)));
    }

    #[test]
    fn test_no_respawn_while_traversing() {
        let mut world = World::new();
        world.run(|_, m, ctx| m.handle(AbilityCommand::SoulWalk, ctx));
        world.soul.position = Vec3::new(5.0, 1.0, 0.0);
        world.run(|_, m, ctx| m.handle(AbilityCommand::SoulWalk, ctx));
        assert_eq!(world.manager.state(), AbilityState::Traversing);

        let outcome = world.run(|c, m, ctx| c.request_respawn(m, ctx));
        assert_eq!(outcome, RespawnOutcome::RejectedTraversing);
        assert_eq!(world.manager.state(), AbilityState::Traversing);
    }

    #[test]
    fn test_anchored_hazard_rescues() {
        let mut world = World::new();
        world.run(|_, m, ctx| m.handle(AbilityCommand::SoulAnchor, ctx));
        world.body.position = Vec3::new(5.0, 1.0, 9.0);

        let outcome = world.run(|c, m, ctx| c.hazard(m, ctx, true));
        assert_eq!(outcome, RespawnOutcome::Rescued);
        assert_eq!(world.manager.state(), AbilityState::Traversing);

        let mut world = World::new();
        world.run(|_, m, ctx| m.handle(AbilityCommand::SoulAnchor, ctx));
        let outcome = world.run(|c, m, ctx| c.hazard(m, ctx, false));
        assert_eq!(outcome, RespawnOutcome::Respawned(Vec3::Y));
    }

    #[test]
    fn test_checkpoint_updates() {
        let mut coordinator = RespawnCoordinator::new(RespawnSettings::default(), Vec3::ZERO);
        assert!(coordinator.set_checkpoint(Vec3::X));
        assert!(!coordinator.set_checkpoint(Vec3::X));
        assert_eq!(coordinator.checkpoint(), Vec3::X);
        assert!(coordinator.is_below_kill_plane(Vec3::new(0.0, -30.0, 0.0)));
    }
}
