mod soul_controller;

use avian3d::prelude::*;
use bevy::prelude::*;

pub use soul_controller::{SoulController, SoulSettings};

use crate::{
    game::{
        GameplaySystems,
        abilities::AbilityManager,
        avatar::{MotionState, Soul},
        camera_controller::CameraRig,
        configs::GameplayConfig,
        input::InputFrame,
        physics::{AvianProbe, GameLayer, PhysicsProbe},
    },
    screens::Screen,
};

const SOUL_RADIUS: f32 = 0.3;
const SOUL_LENGTH: f32 = 0.5;

pub struct SpawnSoul {
    pub position: Vec3,
}

impl Command for SpawnSoul {
    fn apply(self, world: &mut World) {
        let _ = world.run_system_cached_with(spawn_soul, self);
    }
}

fn spawn_soul(
    In(spawn_config): In<SpawnSoul>,
    mut commands: Commands,
    config: Res<GameplayConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mut controller = SoulController::new(config.soul.clone());
    let mut motion = MotionState::new(spawn_config.position, controller.default_physics());
    // Parked until an ability projects it.
    controller.deactivate(&mut motion);

    commands.spawn((
        Name::new("Soul"),
        Soul,
        controller,
        motion,
        DespawnOnExit(Screen::Gameplay),
        Transform::from_translation(spawn_config.position),
        Visibility::Hidden,
        Mesh3d(meshes.add(Capsule3d::new(SOUL_RADIUS, SOUL_LENGTH))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgba(0.5, 0.8, 1.0, 0.45),
            emissive: LinearRgba::rgb(0.2, 0.5, 0.9),
            alpha_mode: AlphaMode::Blend,
            ..default()
        })),
        RigidBody::Kinematic,
        Collider::capsule(SOUL_RADIUS, SOUL_LENGTH),
        GameLayer::soul(),
        GravityScale(config.soul.gravity_scale),
        LockedAxes::ALL_LOCKED,
    ));
}

pub(super) fn plugin(app: &mut App) {
    app.add_systems(FixedUpdate, drive_soul.in_set(GameplaySystems::Simulate));
    app.add_systems(Update, sync_soul_visibility.in_set(GameplaySystems::Present));
}

/// Soul locomotion on the scaled clock, compensated back to real-time speeds.
fn drive_soul(
    time: Res<Time>,
    input: Res<InputFrame>,
    manager: Res<AbilityManager>,
    spatial_query: SpatialQuery,
    cameras: Query<&CameraRig>,
    mut souls: Query<(&mut SoulController, &mut MotionState), With<Soul>>,
) {
    let Ok((mut soul, mut motion)) = souls.single_mut() else {
        return;
    };
    let yaw = cameras.single().map(|rig| rig.yaw()).unwrap_or_default();
    let probe = AvianProbe::new(&spatial_query);
    let grounded =
        soul.is_active() && probe.is_grounded(soul.feet(&motion), soul.settings.ground_probe_radius);

    soul.tick(
        &mut motion,
        input.move_axis,
        input.jump,
        yaw,
        grounded,
        manager.time_scale(),
        time.delta_secs(),
    );
}

fn sync_soul_visibility(
    mut souls: Query<(&SoulController, &mut Visibility), (With<Soul>, Changed<SoulController>)>,
) {
    for (soul, mut visibility) in souls.iter_mut() {
        visibility.set_if_neq(if soul.is_active() {
            Visibility::Visible
        } else {
            Visibility::Hidden
        });
    }
}
