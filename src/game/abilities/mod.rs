mod hud;
mod manager;
mod traversal;

use bevy::{ecs::system::SystemParam, prelude::*};

pub use manager::{
    AbilityCommand, AbilityContext, AbilityEvent, AbilityKind, AbilityManager, AbilitySettings,
    AbilityState,
};

use crate::{
    game::{
        GameplaySystems,
        animations::models::AnimatorParams,
        avatar::{Body, MotionState, Soul},
        camera_controller::CameraRig,
        configs::GameplayConfig,
        input::InputFrame,
        parkour::ParkourMachine,
        path_recorder::PathRecorder,
        player::BodyController,
        soul::SoulController,
    },
    screens::Screen,
};

pub(super) fn plugin(app: &mut App) {
    app.add_message::<AbilityEvent>();
    app.init_resource::<AbilityManager>();

    app.add_systems(OnEnter(Screen::Gameplay), reset_ability_manager);
    app.add_systems(OnExit(Screen::Gameplay), restore_time_scale);
    app.add_systems(
        Update,
        (drive_abilities, apply_time_scale, log_ability_events)
            .chain()
            .in_set(GameplaySystems::Simulate),
    );

    app.add_plugins(hud::plugin);
}

/// Every component an ability may touch, borrowed as one [`AbilityContext`].
#[derive(SystemParam)]
pub struct AvatarRig<'w, 's> {
    recorder: ResMut<'w, PathRecorder>,
    bodies: Query<
        'w,
        's,
        (
            &'static mut MotionState,
            &'static mut BodyController,
            &'static mut ParkourMachine,
            &'static mut AnimatorParams,
        ),
        (With<Body>, Without<Soul>),
    >,
    souls: Query<
        'w,
        's,
        (&'static mut MotionState, &'static mut SoulController),
        (With<Soul>, Without<Body>),
    >,
    cameras: Query<'w, 's, &'static mut CameraRig>,
}

impl AvatarRig<'_, '_> {
    /// Runs `f` against both avatars. `None` while either avatar is missing.
    pub fn with_context<R>(&mut self, f: impl FnOnce(&mut AbilityContext) -> R) -> Option<R> {
        let Ok((mut body, mut body_controller, mut parkour, mut animator)) = self.bodies.single_mut()
        else {
            return None;
        };
        let Ok((mut soul, mut soul_controller)) = self.souls.single_mut() else {
            return None;
        };
        let mut camera = self.cameras.single_mut().ok();

        let mut ctx = AbilityContext {
            body: &mut body,
            body_controller: &mut body_controller,
            soul: &mut soul,
            soul_controller: &mut soul_controller,
            parkour: &mut parkour,
            recorder: &mut self.recorder,
            camera: camera.as_deref_mut(),
            animator: Some(&mut *animator),
        };
        Some(f(&mut ctx))
    }
}

fn reset_ability_manager(mut commands: Commands, config: Res<GameplayConfig>) {
    commands.insert_resource(AbilityManager::new(config.ability.clone()));
}

/// Player requests, timers and traversal, all on the unscaled clock.
pub fn drive_abilities(
    time: Res<Time<Real>>,
    mut input: ResMut<InputFrame>,
    mut manager: ResMut<AbilityManager>,
    mut rig: AvatarRig,
    mut events: MessageWriter<AbilityEvent>,
) {
    let requests = [
        (input.soul_walk, AbilityCommand::SoulWalk),
        (input.soul_anchor, AbilityCommand::SoulAnchor),
        (input.cancel, AbilityCommand::Cancel),
    ];
    input.consume_ability_presses();
    let real_dt = time.delta_secs();

    rig.with_context(|ctx| {
        for (pressed, command) in requests {
            if pressed {
                manager.handle(command, ctx);
            }
        }
        manager.tick(ctx, real_dt);
    });
    events.write_batch(manager.drain_events());
}

fn apply_time_scale(manager: Res<AbilityManager>, mut time: ResMut<Time<Virtual>>) {
    let scale = manager.time_scale();
    if (time.relative_speed() - scale).abs() > f32::EPSILON {
        debug!("World time scale {scale}");
        time.set_relative_speed(scale);
    }
}

fn restore_time_scale(mut time: ResMut<Time<Virtual>>) {
    time.set_relative_speed(1.0);
}

fn log_ability_events(mut events: MessageReader<AbilityEvent>) {
    for event in events.read() {
        match event {
            AbilityEvent::TraversalStarted { kind, waypoints } => {
                info!("{kind:?} traversal over {waypoints} waypoints");
            }
            other => debug!("Ability event {other:?}"),
        }
    }
}
