//! The Soul-Split state machine.
//!
//! [`AbilityManager`] is the only writer of [`AbilityState`] and the only party that hands the
//! Body and Soul between drivers. It never touches the ECS: everything it mutates arrives in an
//! [`AbilityContext`], and its timers and the traversal run on the unscaled clock passed to
//! [`AbilityManager::tick`].

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::traversal::Traversal;
use crate::game::{
    animations::models::{AnimatorParams, TRAVERSAL_RUN_BLEND},
    avatar::{Avatar, Driver, MotionState, PhysicsMode},
    camera_controller::CameraRig,
    parkour::ParkourMachine,
    path_recorder::PathRecorder,
    player::BodyController,
    soul::SoulController,
};

#[derive(Reflect, Clone, Debug, Serialize, Deserialize)]
pub struct AbilitySettings {
    /// Real-time seconds the Soul may walk before the Body follows.
    pub soul_walk_duration: f32,
    pub soul_anchor_duration: f32,
    /// World time scale while soul walking.
    pub time_slow_scale: f32,
    /// Meters per real-time second along the recorded path.
    pub traversal_speed: f32,
}

impl Default for AbilitySettings {
    fn default() -> Self {
        Self {
            soul_walk_duration: 4.0,
            soul_anchor_duration: 6.0,
            time_slow_scale: 0.3,
            traversal_speed: 9.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum AbilityState {
    #[default]
    Unified,
    SoulWalking,
    SoulAnchored,
    Traversing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum AbilityKind {
    SoulWalk,
    SoulAnchor,
}

/// Discrete player requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityCommand {
    SoulWalk,
    SoulAnchor,
    Cancel,
}

/// Published for HUD and effects consumers.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum AbilityEvent {
    Activated(AbilityKind),
    TraversalStarted { kind: AbilityKind, waypoints: usize },
    Returned(AbilityKind),
    Cancelled(AbilityKind),
    Reset,
}

/// Everything the manager may touch during one call.
pub struct AbilityContext<'a> {
    pub body: &'a mut MotionState,
    pub body_controller: &'a mut BodyController,
    pub soul: &'a mut MotionState,
    pub soul_controller: &'a mut SoulController,
    pub parkour: &'a mut ParkourMachine,
    pub recorder: &'a mut PathRecorder,
    pub camera: Option<&'a mut CameraRig>,
    pub animator: Option<&'a mut AnimatorParams>,
}

impl AbilityContext<'_> {
    fn retarget_camera(&mut self, target: Avatar) {
        if let Some(camera) = self.camera.as_deref_mut() {
            camera.set_target(target);
        }
    }
}

#[derive(Resource, Debug, Clone)]
pub struct AbilityManager {
    pub settings: AbilitySettings,
    state: AbilityState,
    /// Ability that started the current episode, kept through its traversal.
    kind: Option<AbilityKind>,
    timer: f32,
    time_scale: f32,
    traversal: Option<Traversal>,
    ground_on_arrival: bool,
    events: Vec<AbilityEvent>,
}

impl Default for AbilityManager {
    fn default() -> Self {
        Self::new(AbilitySettings::default())
    }
}

impl AbilityManager {
    pub fn new(settings: AbilitySettings) -> Self {
        Self {
            settings,
            state: AbilityState::Unified,
            kind: None,
            timer: 0.0,
            time_scale: 1.0,
            traversal: None,
            ground_on_arrival: false,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> AbilityState {
        self.state
    }

    pub fn kind(&self) -> Option<AbilityKind> {
        self.kind
    }

    /// World time scale the manager wants applied.
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Real-time seconds left on the running ability's timer.
    pub fn remaining_time(&self) -> Option<f32> {
        matches!(self.state, AbilityState::SoulWalking | AbilityState::SoulAnchored)
            .then_some(self.timer.max(0.0))
    }

    /// Waypoint index and position of an in-progress traversal.
    pub fn traversal_cursor(&self) -> Option<(usize, Vec3)> {
        self.traversal.as_ref().map(|t| (t.index(), t.position()))
    }

    /// Parkour detection is only allowed outside abilities.
    pub fn allows_parkour(&self) -> bool {
        self.state == AbilityState::Unified
    }

    pub fn drain_events(&mut self) -> Vec<AbilityEvent> {
        std::mem::take(&mut self.events)
    }

    /// Applies a player request. Returns whether anything changed.
    pub fn handle(&mut self, command: AbilityCommand, ctx: &mut AbilityContext) -> bool {
        use AbilityCommand as C;
        use AbilityState as S;
        match (self.state, command) {
            (S::Unified, C::SoulWalk) => {
                self.start_soul_walk(ctx);
                true
            }
            (S::Unified, C::SoulAnchor) => {
                if !ctx.body.grounded {
                    debug!("Soul anchor needs the Body on the ground");
                    return false;
                }
                self.start_soul_anchor(ctx);
                true
            }
            (S::SoulWalking, C::SoulWalk) | (S::SoulAnchored, C::SoulAnchor) => {
                self.begin_traversal(ctx);
                true
            }
            (S::SoulWalking | S::SoulAnchored | S::Traversing, C::Cancel) => self.cancel_active_ability(ctx),
            (state, command) => {
                debug!("Ignoring {command:?} while {state:?}");
                false
            }
        }
    }

    /// Advances timers, recording and traversal by `real_dt` unscaled seconds.
    pub fn tick(&mut self, ctx: &mut AbilityContext, real_dt: f32) {
        match self.state {
            AbilityState::Unified => {}
            AbilityState::SoulWalking => {
                self.timer -= real_dt;
                ctx.recorder.record(ctx.soul.position);
                if self.timer <= 0.0 && ctx.soul.grounded {
                    self.begin_traversal(ctx);
                }
            }
            AbilityState::SoulAnchored => {
                self.timer -= real_dt;
                ctx.recorder.record(ctx.body.position);
                if self.timer <= 0.0 {
                    self.begin_traversal(ctx);
                }
            }
            AbilityState::Traversing => self.advance_traversal(ctx, real_dt),
        }
    }

    /// Ends any ability immediately, without a traversal.
    pub fn cancel_active_ability(&mut self, ctx: &mut AbilityContext) -> bool {
        let Some(kind) = self.kind.filter(|_| self.state != AbilityState::Unified) else {
            return false;
        };
        info!("{kind:?} cancelled from {:?}", self.state);
        self.teardown(ctx);
        self.events.push(AbilityEvent::Cancelled(kind));
        true
    }

    /// Unconditional return to `Unified`, used by respawns.
    pub fn force_reset(&mut self, ctx: &mut AbilityContext) {
        if self.state != AbilityState::Unified {
            info!("Ability state reset from {:?}", self.state);
        }
        ctx.parkour.force_exit(ctx.body);
        // Body must be non-kinematic again before the caller teleports it.
        ctx.body.restore_physics();
        self.teardown(ctx);
        self.events.push(AbilityEvent::Reset);
    }

    /// Hazard rescue: an anchored player is pulled back along the path instead of dying.
    pub fn trigger_anchor_return(&mut self, ctx: &mut AbilityContext) -> bool {
        if self.state != AbilityState::SoulAnchored {
            return false;
        }
        info!("Anchor return triggered");
        self.begin_traversal(ctx);
        true
    }

    fn start_soul_walk(&mut self, ctx: &mut AbilityContext) {
        ctx.parkour.force_exit(ctx.body);
        let (position, rotation) = (ctx.body.position, ctx.body.rotation);
        ctx.soul_controller.activate(ctx.soul, position, rotation);
        ctx.soul.unfreeze();
        ctx.body.freeze();

        self.time_scale = self.settings.time_slow_scale;
        ctx.retarget_camera(Avatar::Soul);
        ctx.recorder.activate(Avatar::Body, position, Avatar::Soul, ctx.soul.position);
        self.enter(AbilityKind::SoulWalk, AbilityState::SoulWalking, self.settings.soul_walk_duration);
    }

    fn start_soul_anchor(&mut self, ctx: &mut AbilityContext) {
        ctx.parkour.force_exit(ctx.body);
        if ctx.body.driver() == Driver::Parkour {
            ctx.body.release_control();
        }
        let (position, rotation) = (ctx.body.position, ctx.body.rotation);
        ctx.soul_controller.activate(ctx.soul, position, rotation);

        ctx.recorder.activate(Avatar::Soul, ctx.soul.position, Avatar::Body, position);
        self.enter(AbilityKind::SoulAnchor, AbilityState::SoulAnchored, self.settings.soul_anchor_duration);
    }

    fn enter(&mut self, kind: AbilityKind, state: AbilityState, duration: f32) {
        info!("{kind:?} activated for {duration:.1}s");
        self.kind = Some(kind);
        self.state = state;
        self.timer = duration;
        self.events.push(AbilityEvent::Activated(kind));
    }

    fn begin_traversal(&mut self, ctx: &mut AbilityContext) {
        let Some(kind) = self.kind else {
            return;
        };
        let reverse = kind == AbilityKind::SoulAnchor;
        let mover = if reverse { ctx.body.position } else { ctx.soul.position };
        ctx.recorder.record(mover);
        ctx.recorder.deactivate();
        ctx.recorder.begin_traversal(reverse);

        let Some(traversal) = Traversal::new(ctx.recorder.points().to_vec()) else {
            warn!("{kind:?} finished without a path, returning in place");
            self.teardown(ctx);
            self.events.push(AbilityEvent::Returned(kind));
            return;
        };

        ctx.soul.freeze();
        ctx.parkour.force_exit(ctx.body);
        ctx.body.take_control(Driver::Ability, PhysicsMode::KINEMATIC);
        ctx.body.set_velocity(Driver::Ability, Vec3::ZERO);
        ctx.body.force_position(Driver::Ability, traversal.position());

        let waypoints = traversal.path().len();
        info!("{kind:?} traversal over {waypoints} waypoints");
        self.events.push(AbilityEvent::TraversalStarted { kind, waypoints });
        self.ground_on_arrival = reverse;
        self.traversal = Some(traversal);
        self.state = AbilityState::Traversing;
        self.timer = 0.0;
    }

    fn advance_traversal(&mut self, ctx: &mut AbilityContext, real_dt: f32) {
        let Some(traversal) = self.traversal.as_mut() else {
            self.teardown(ctx);
            return;
        };
        let position = traversal.advance(self.settings.traversal_speed * real_dt);
        ctx.body.force_position(Driver::Ability, position);
        if let Some(facing) = traversal.facing() {
            ctx.body.face(Driver::Ability, facing);
        }
        ctx.recorder.update_traversal(traversal.index(), position);
        if let Some(animator) = ctx.animator.as_deref_mut() {
            animator.forward_blend = TRAVERSAL_RUN_BLEND;
            animator.vertical_speed = 0.0;
        }

        if traversal.is_finished() {
            self.finish_traversal(ctx);
        }
    }

    fn finish_traversal(&mut self, ctx: &mut AbilityContext) {
        let kind = self.kind;
        ctx.body.release_control();
        if self.ground_on_arrival {
            ctx.body_controller.force_grounded(ctx.body);
            if let Some(animator) = ctx.animator.as_deref_mut() {
                animator.grounded = true;
            }
        }
        self.teardown(ctx);
        if let Some(kind) = kind {
            info!("{kind:?} traversal complete");
            self.events.push(AbilityEvent::Returned(kind));
        }
    }

    /// Shared exit path into `Unified`.
    fn teardown(&mut self, ctx: &mut AbilityContext) {
        ctx.body.release_control();
        ctx.soul.unfreeze();
        ctx.soul_controller.deactivate(ctx.soul);
        ctx.recorder.clear();
        ctx.retarget_camera(Avatar::Body);

        self.state = AbilityState::Unified;
        self.kind = None;
        self.timer = 0.0;
        self.time_scale = 1.0;
        self.traversal = None;
        self.ground_on_arrival = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{
        camera_controller::CameraSettings,
        path_recorder::{PathSettings, RecorderMode},
        player::BodySettings,
        soul::SoulSettings,
    };

    const DT: f32 = 0.125;

    struct Rig {
        manager: AbilityManager,
        body: MotionState,
        body_controller: BodyController,
        soul: MotionState,
        soul_controller: SoulController,
        parkour: ParkourMachine,
        recorder: PathRecorder,
        camera: CameraRig,
        animator: AnimatorParams,
    }

    impl Rig {
        fn new() -> Self {
            let mut soul_controller = SoulController::new(SoulSettings::default());
            let mut soul = MotionState::new(Vec3::ZERO, soul_controller.default_physics());
            soul_controller.deactivate(&mut soul);
            let mut body = MotionState::new(Vec3::new(1.0, 1.0, 1.0), PhysicsMode::default());
            body.grounded = true;
            Self {
                manager: AbilityManager::new(AbilitySettings {
                    soul_walk_duration: 2.0,
                    soul_anchor_duration: 1.0,
                    time_slow_scale: 0.25,
                    traversal_speed: 4.0,
                }),
                body,
                body_controller: BodyController::new(BodySettings::default()),
                soul,
                soul_controller,
                parkour: ParkourMachine::default(),
                recorder: PathRecorder::new(PathSettings { sample_distance: 0.5 }),
                camera: CameraRig::new(CameraSettings::default()),
                animator: AnimatorParams::default(),
            }
        }

        fn split(&mut self) -> (&mut AbilityManager, AbilityContext<'_>) {
            (
                &mut self.manager,
                AbilityContext {
                    body: &mut self.body,
                    body_controller: &mut self.body_controller,
                    soul: &mut self.soul,
                    soul_controller: &mut self.soul_controller,
                    parkour: &mut self.parkour,
                    recorder: &mut self.recorder,
                    camera: Some(&mut self.camera),
                    animator: Some(&mut self.animator),
                },
            )
        }

        fn press(&mut self, command: AbilityCommand) -> bool {
            let (manager, mut ctx) = self.split();
            manager.handle(command, &mut ctx)
        }

        fn tick(&mut self, dt: f32) {
            let (manager, mut ctx) = self.split();
            manager.tick(&mut ctx, dt);
        }

        fn force_reset(&mut self) {
            let (manager, mut ctx) = self.split();
            manager.force_reset(&mut ctx);
        }

        fn state(&self) -> AbilityState {
            self.manager.state()
        }

        /// Moves the Soul (as its input driver would) and feeds one tick.
        fn walk_soul(&mut self, to: Vec3) {
            self.soul.position = to;
            self.tick(DT);
        }

        fn reach(state: AbilityState) -> Self {
            let mut rig = Self::new();
            match state {
                AbilityState::Unified => {}
                AbilityState::SoulWalking => {
                    rig.press(AbilityCommand::SoulWalk);
                }
                AbilityState::SoulAnchored => {
                    rig.press(AbilityCommand::SoulAnchor);
                }
                AbilityState::Traversing => {
                    rig.press(AbilityCommand::SoulWalk);
                    rig.walk_soul(Vec3::new(1.0, 1.0, -5.0));
                    rig.press(AbilityCommand::SoulWalk);
                }
            }
            assert_eq!(rig.state(), state);
            rig
        }

        fn assert_unified_and_clean(&self) {
            assert_eq!(self.state(), AbilityState::Unified);
            assert!(self.body.enabled());
            assert_eq!(self.body.physics(), PhysicsMode::default());
            assert!(!self.soul_controller.is_active());
            assert!(self.soul.is_frozen());
            assert_eq!(self.manager.time_scale(), 1.0);
            assert_eq!(self.manager.traversal_cursor(), None);
            assert_eq!(self.manager.remaining_time(), None);
            assert_eq!(self.camera.target(), Avatar::Body);
            assert_eq!(self.recorder.mode(), RecorderMode::Idle);
        }
    }

    #[test]
    fn test_every_command_lands_in_a_defined_state() {
        use AbilityCommand as C;
        use AbilityState as S;
        let table = [
            (S::Unified, C::SoulWalk, S::SoulWalking),
            (S::Unified, C::SoulAnchor, S::SoulAnchored),
            (S::Unified, C::Cancel, S::Unified),
            (S::SoulWalking, C::SoulWalk, S::Traversing),
            (S::SoulWalking, C::SoulAnchor, S::SoulWalking),
            (S::SoulWalking, C::Cancel, S::Unified),
            (S::SoulAnchored, C::SoulWalk, S::SoulAnchored),
            (S::SoulAnchored, C::SoulAnchor, S::Traversing),
            (S::SoulAnchored, C::Cancel, S::Unified),
            (S::Traversing, C::SoulWalk, S::Traversing),
            (S::Traversing, C::SoulAnchor, S::Traversing),
            (S::Traversing, C::Cancel, S::Unified),
        ];
        for (from, command, to) in table {
            let mut rig = Rig::reach(from);
            rig.press(command);
            assert_eq!(rig.state(), to, "{from:?} + {command:?}");
        }
    }

    #[test]
    fn test_soul_walk_setup() {
        let mut rig = Rig::new();
        assert!(rig.press(AbilityCommand::SoulWalk));

        assert_eq!(rig.soul.position, rig.body.position);
        assert!(rig.soul_controller.is_active());
        assert!(rig.soul.enabled());
        assert!(rig.body.is_frozen());
        assert!(!rig.body.enabled());
        assert_eq!(rig.manager.time_scale(), 0.25);
        assert_eq!(rig.camera.target(), Avatar::Soul);
        assert_eq!(rig.manager.remaining_time(), Some(2.0));
        assert_eq!(rig.recorder.anchor(), Some(Avatar::Body));
        assert_eq!(rig.recorder.mover(), Some(Avatar::Soul));
        assert_eq!(rig.recorder.len(), 2);
        assert_eq!(rig.manager.drain_events(), vec![AbilityEvent::Activated(AbilityKind::SoulWalk)]);
    }

    #[test]
    fn test_double_press_goes_straight_to_traversal() {
        let mut rig = Rig::new();
        let start = rig.body.position;
        rig.press(AbilityCommand::SoulWalk);
        rig.soul.position = Vec3::new(1.0, 1.0, 0.8);
        rig.press(AbilityCommand::SoulWalk);

        assert_eq!(rig.state(), AbilityState::Traversing);
        assert_eq!(rig.recorder.points(), &[start, Vec3::new(1.0, 1.0, 0.8)]);
        assert_eq!(rig.manager.traversal_cursor(), Some((1, start)));
        assert_eq!(rig.body.driver(), Driver::Ability);
        assert_eq!(rig.body.physics(), PhysicsMode::KINEMATIC);
        assert!(rig.soul.is_frozen());
    }

    #[test]
    fn test_soul_walk_waits_for_grounded_soul() {
        let mut rig = Rig::new();
        rig.press(AbilityCommand::SoulWalk);
        rig.soul.grounded = false;
        for _ in 0..20 {
            rig.tick(DT);
        }
        assert_eq!(rig.state(), AbilityState::SoulWalking);
        assert_eq!(rig.manager.remaining_time(), Some(0.0));

        rig.soul.grounded = true;
        rig.tick(DT);
        assert_eq!(rig.state(), AbilityState::Traversing);
    }

    #[test]
    fn test_recording_grows_monotonically_then_freezes() {
        let mut rig = Rig::new();
        rig.press(AbilityCommand::SoulWalk);
        let mut last = rig.recorder.len();
        for step in 1..=10 {
            rig.walk_soul(Vec3::new(1.0, 1.0, 1.0 - step as f32 * 0.3));
            assert!(rig.recorder.len() >= last);
            last = rig.recorder.len();
        }
        rig.press(AbilityCommand::SoulWalk);
        let frozen = rig.recorder.len();
        rig.soul.position = Vec3::splat(50.0);
        rig.tick(DT);
        assert_eq!(rig.recorder.len(), frozen);
    }

    #[test]
    fn test_soul_walk_traversal_ends_at_soul() {
        let mut rig = Rig::new();
        rig.press(AbilityCommand::SoulWalk);
        rig.walk_soul(Vec3::new(1.0, 1.0, -1.0));
        rig.walk_soul(Vec3::new(3.0, 1.0, -1.0));
        rig.press(AbilityCommand::SoulWalk);
        let end = *rig.recorder.points().last().unwrap();

        let mut ticks = 0;
        while rig.state() == AbilityState::Traversing {
            rig.tick(DT);
            ticks += 1;
            assert!(ticks < 50);
        }
        assert_eq!(rig.body.position, end);
        rig.assert_unified_and_clean();
        assert!(
            rig.manager
                .drain_events()
                .contains(&AbilityEvent::Returned(AbilityKind::SoulWalk))
        );
    }

    #[test]
    fn test_anchor_requires_grounded_body() {
        let mut rig = Rig::new();
        rig.body.grounded = false;
        assert!(!rig.press(AbilityCommand::SoulAnchor));
        assert_eq!(rig.state(), AbilityState::Unified);
        assert!(!rig.soul_controller.is_active());
    }

    #[test]
    fn test_anchor_keeps_body_playable_and_soul_frozen() {
        let mut rig = Rig::new();
        rig.press(AbilityCommand::SoulAnchor);
        assert!(rig.body.enabled());
        assert!(rig.soul.is_frozen());
        assert!(rig.soul_controller.is_active());
        assert_eq!(rig.manager.time_scale(), 1.0);
        assert_eq!(rig.camera.target(), Avatar::Body);
        assert_eq!(rig.recorder.anchor(), Some(Avatar::Soul));
    }

    #[test]
    fn test_anchor_expiry_reverses_path() {
        let mut rig = Rig::new();
        let anchor = rig.body.position;
        rig.press(AbilityCommand::SoulAnchor);

        rig.body.position = Vec3::new(1.0, 1.0, -1.0);
        rig.tick(0.5);
        rig.body.position = Vec3::new(1.0, 1.0, -3.0);
        rig.tick(0.5);

        // Timer hit exactly zero on that tick.
        assert_eq!(rig.state(), AbilityState::Traversing);
        let points = rig.recorder.points().to_vec();
        assert_eq!(points.first(), Some(&Vec3::new(1.0, 1.0, -3.0)));
        assert_eq!(points.last(), Some(&anchor));
        assert_eq!(rig.manager.traversal_cursor().map(|c| c.0), Some(1));
        assert_eq!(points[1], Vec3::new(1.0, 1.0, -1.0));

        while rig.state() == AbilityState::Traversing {
            rig.tick(DT);
        }
        assert_eq!(rig.body.position, anchor);
        assert!(rig.body.grounded);
        rig.assert_unified_and_clean();
    }

    #[test]
    fn test_anchor_return_only_when_anchored() {
        let mut rig = Rig::reach(AbilityState::SoulWalking);
        let (manager, mut ctx) = rig.split();
        assert!(!manager.trigger_anchor_return(&mut ctx));

        let mut rig = Rig::reach(AbilityState::SoulAnchored);
        rig.body.position = Vec3::new(4.0, 1.0, 1.0);
        let (manager, mut ctx) = rig.split();
        assert!(manager.trigger_anchor_return(&mut ctx));
        assert_eq!(rig.state(), AbilityState::Traversing);
        assert_eq!(rig.recorder.points().first(), Some(&Vec3::new(4.0, 1.0, 1.0)));
    }

    #[test]
    fn test_cancel_restores_everything() {
        for from in [AbilityState::SoulWalking, AbilityState::SoulAnchored, AbilityState::Traversing] {
            let mut rig = Rig::reach(from);
            assert!(rig.press(AbilityCommand::Cancel));
            rig.assert_unified_and_clean();
        }
    }

    #[test]
    fn test_force_reset_from_every_state() {
        for from in [
            AbilityState::Unified,
            AbilityState::SoulWalking,
            AbilityState::SoulAnchored,
            AbilityState::Traversing,
        ] {
            let mut rig = Rig::reach(from);
            rig.force_reset();
            rig.assert_unified_and_clean();
            assert_eq!(rig.manager.drain_events().last(), Some(&AbilityEvent::Reset));
        }
    }

    #[test]
    fn test_repeated_episodes_keep_body_physics() {
        let mut rig = Rig::new();
        for _ in 0..3 {
            rig.press(AbilityCommand::SoulWalk);
            rig.press(AbilityCommand::SoulWalk);
            while rig.state() == AbilityState::Traversing {
                rig.tick(DT);
            }
            rig.body.grounded = true;
            rig.press(AbilityCommand::SoulAnchor);
            rig.press(AbilityCommand::Cancel);
        }
        rig.assert_unified_and_clean();
    }

    #[test]
    fn test_traversal_drives_run_blend() {
        let mut rig = Rig::reach(AbilityState::Traversing);
        rig.animator.forward_blend = 0.0;
        rig.tick(DT);
        assert_eq!(rig.animator.forward_blend, TRAVERSAL_RUN_BLEND);
    }
}
