mod body_controller;

use avian3d::prelude::*;
use bevy::prelude::*;
use bevy_hotpatching_experiments::hot;
use bevy_tnua::{TnuaToggle, prelude::*};
use bevy_tnua_avian3d::*;

pub use body_controller::{BodyController, BodySettings, camera_relative};

use crate::{
    game::{
        GameplaySystems,
        abilities::AbilityManager,
        animations::{CueTimeline, models::AnimatorParams, play_animation_cues},
        avatar::{Body, MotionState, PhysicsMode},
        camera_controller::CameraRig,
        configs::GameplayConfig,
        input::InputFrame,
        parkour::{ParkourInput, ParkourMachine},
        physics::{AvianProbe, GameLayer, PhysicsProbe},
    },
    screens::Screen,
};

// Constants
pub const BODY_RADIUS: f32 = 0.35;
/// Length of the capsule's cylindrical section.
pub const BODY_LENGTH: f32 = 1.0;

pub struct SpawnBody {
    pub position: Vec3,
}

impl Command for SpawnBody {
    fn apply(self, world: &mut World) {
        let _ = world.run_system_cached_with(spawn_body, self);
    }
}

fn spawn_body(
    In(spawn_config): In<SpawnBody>,
    mut commands: Commands,
    config: Res<GameplayConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    info!("Spawning Body at {}", spawn_config.position);
    commands
        .spawn((
            Name::new("Body"),
            Body,
            BodyController::new(config.body.clone()),
            ParkourMachine::new(config.parkour.clone()),
            MotionState::new(spawn_config.position, PhysicsMode::default()),
            AnimatorParams::default(),
            CueTimeline::default(),
            DespawnOnExit(Screen::Gameplay),
            Transform::from_translation(spawn_config.position),
            Visibility::Visible,
            Mesh3d(meshes.add(Capsule3d::new(BODY_RADIUS, BODY_LENGTH))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.85, 0.75, 0.6),
                ..default()
            })),
        ))
        .insert((
            // Avian3D physics components
            RigidBody::Dynamic,
            Collider::capsule(BODY_RADIUS, BODY_LENGTH),
            GameLayer::body(),
            GravityScale(1.0),
            LockedAxes::ROTATION_LOCKED.unlock_rotation_y(), // Prevent the body from tipping over
            TnuaController::default(),
            TnuaToggle::Enabled,
            TnuaAvian3dSensorShape(Collider::cylinder(BODY_RADIUS - 0.05, 0.0)),
        ));
}

pub(super) fn plugin(app: &mut App) {
    // Tnua controller plugins
    app.add_plugins((
        TnuaControllerPlugin::new(FixedUpdate),
        TnuaAvian3dPlugin::new(FixedUpdate),
    ));

    // Parkour before the base controller; clip events after both.
    app.add_systems(
        FixedUpdate,
        (drive_body, play_animation_cues)
            .chain()
            .in_set(GameplaySystems::Simulate),
    );
}

#[hot]
pub fn drive_body(
    time: Res<Time>,
    input: Res<InputFrame>,
    manager: Res<AbilityManager>,
    spatial_query: SpatialQuery,
    cameras: Query<&CameraRig>,
    mut bodies: Query<
        (
            &mut BodyController,
            &mut ParkourMachine,
            &mut MotionState,
            &mut AnimatorParams,
            &mut TnuaController,
            &mut TnuaToggle,
        ),
        With<Body>,
    >,
) {
    let Ok((mut body, mut parkour, mut motion, mut animator, mut controller, mut toggle)) =
        bodies.single_mut()
    else {
        return;
    };
    let yaw = cameras.single().map(|rig| rig.yaw()).unwrap_or_default();
    let probe = AvianProbe::new(&spatial_query);
    let dt = time.delta_secs();

    let grounded = probe.is_grounded(body.feet(&motion), body.settings.ground_probe_radius);
    motion.grounded = grounded;

    let mut jump = input.jump;
    if manager.allows_parkour() {
        let step = parkour.update(
            &mut motion,
            &probe,
            &ParkourInput {
                move_axis: input.move_axis,
                jump,
            },
            dt,
            true,
        );
        jump &= !step.consumed_jump;
    }

    let intent = body.tick(&mut motion, &mut animator, input.move_axis, jump, yaw, grounded, dt);

    // Tnua only drives the Body while player input owns it.
    if !motion.enabled() {
        *toggle = TnuaToggle::Disabled;
        return;
    }
    *toggle = TnuaToggle::Enabled;

    // Feed the basis every tick, even with zero velocity, or the collider just falls.
    controller.basis(TnuaBuiltinWalk {
        desired_velocity: intent.desired_velocity,
        desired_forward: intent.desired_forward,
        float_height: body.settings.float_height,
        turning_angvel: body.settings.turning_angvel,
        ..Default::default()
    });

    if intent.jump {
        controller.action(TnuaBuiltinJump {
            height: body.settings.jump_height,
            ..Default::default()
        });
    }
}
