use avian3d::prelude::*;
use bevy::prelude::*;

use crate::{
    game::{
        physics::GameLayer,
        respawn::{Checkpoint, KillZone, ResetOnRespawn},
    },
    screens::Screen,
};

/// Marker component for level geometry.
#[derive(Component)]
pub struct LevelGeometry;

const FLOOR_THICKNESS: f32 = 0.5;
const WALL_THICKNESS: f32 = 0.6;

/// Obstacle course: ledges, wall-run walls, a pit and checkpoint pads.
pub fn spawn_test_level(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    info!("Spawning test level...");

    let floor_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.3, 0.5, 0.3),
        perceptual_roughness: 0.9,
        ..default()
    });
    let ledge_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.7, 0.3, 0.3),
        ..default()
    });
    let wall_run_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.3, 0.3, 0.7),
        ..default()
    });
    let checkpoint_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.9, 0.8, 0.3),
        emissive: LinearRgba::rgb(0.4, 0.3, 0.05),
        ..default()
    });
    let prop_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.6, 0.45, 0.3),
        ..default()
    });

    // ===== GROUND =====
    // Near side, top face at y = 0.
    spawn_obstacle(
        &mut commands,
        &mut meshes,
        floor_material.clone(),
        Vec3::new(0.0, -FLOOR_THICKNESS / 2.0, 0.0),
        Vec3::new(30.0, FLOOR_THICKNESS, 30.0),
        "Ground Floor",
    );
    // Far side of the pit.
    spawn_obstacle(
        &mut commands,
        &mut meshes,
        floor_material.clone(),
        Vec3::new(0.0, -FLOOR_THICKNESS / 2.0, -26.0),
        Vec3::new(14.0, FLOOR_THICKNESS, 10.0),
        "Far Shore",
    );

    // ===== LEDGES =====
    // Grab and climb: the top edge meets the hands near the jump apex.
    spawn_obstacle(
        &mut commands,
        &mut meshes,
        ledge_material.clone(),
        Vec3::new(-8.0, 2.25, 0.0),
        Vec3::new(6.0, 4.5, WALL_THICKNESS),
        "Ledge Wall (4.5m)",
    );
    // Wider wall for shimmying along the edge.
    spawn_obstacle(
        &mut commands,
        &mut meshes,
        ledge_material.clone(),
        Vec3::new(-8.0, 2.3, 6.0),
        Vec3::new(12.0, 4.6, WALL_THICKNESS),
        "Shimmy Wall (4.6m)",
    );

    // ===== WALL RUN =====
    spawn_obstacle(
        &mut commands,
        &mut meshes,
        wall_run_material.clone(),
        Vec3::new(7.0, 2.5, -4.0),
        Vec3::new(WALL_THICKNESS, 5.0, 12.0),
        "Wall Run Right",
    );
    spawn_obstacle(
        &mut commands,
        &mut meshes,
        wall_run_material,
        Vec3::new(12.0, 2.5, -4.0),
        Vec3::new(WALL_THICKNESS, 5.0, 12.0),
        "Wall Run Left",
    );

    // ===== PIT =====
    // Catches anything that falls between the two floors.
    commands.spawn((
        Name::new("Pit Kill Zone"),
        LevelGeometry,
        DespawnOnExit(Screen::Gameplay),
        KillZone {
            rescue_when_anchored: true,
        },
        Transform::from_xyz(0.0, -8.0, -18.0),
        RigidBody::Static,
        Sensor,
        Collider::cuboid(40.0, 2.0, 8.0),
        GameLayer::trigger(),
    ));

    // ===== CHECKPOINTS =====
    spawn_checkpoint(
        &mut commands,
        &mut meshes,
        checkpoint_material.clone(),
        Vec3::new(0.0, 0.0, 8.0),
        "Start Checkpoint",
    );
    spawn_checkpoint(
        &mut commands,
        &mut meshes,
        checkpoint_material,
        Vec3::new(0.0, 0.0, -26.0),
        "Far Shore Checkpoint",
    );

    // ===== PROPS =====
    for (index, position) in [Vec3::new(3.0, 0.5, 3.0), Vec3::new(4.5, 0.5, 2.0)]
        .into_iter()
        .enumerate()
    {
        let home = Transform::from_translation(position);
        commands.spawn((
            Name::new(format!("Crate {index}")),
            LevelGeometry,
            DespawnOnExit(Screen::Gameplay),
            ResetOnRespawn { home },
            Mesh3d(meshes.add(Cuboid::new(1.0, 1.0, 1.0))),
            MeshMaterial3d(prop_material.clone()),
            home,
            RigidBody::Dynamic,
            Collider::cuboid(1.0, 1.0, 1.0),
            GameLayer::world(),
        ));
    }

    // ===== LIGHTING =====
    commands.spawn((
        LevelGeometry,
        DespawnOnExit(Screen::Gameplay),
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -1.0, -0.5, 0.0)),
    ));
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 200.0,
        affects_lightmapped_meshes: false,
    });

    info!("Test level spawned");
}

/// Static box with physics on the world layer.
fn spawn_obstacle(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    material: Handle<StandardMaterial>,
    position: Vec3,
    size: Vec3,
    label: &str,
) {
    commands.spawn((
        DespawnOnExit(Screen::Gameplay),
        LevelGeometry,
        Mesh3d(meshes.add(Cuboid::new(size.x, size.y, size.z))),
        MeshMaterial3d(material),
        Transform::from_translation(position),
        RigidBody::Static,
        Collider::cuboid(size.x, size.y, size.z),
        GameLayer::world(),
        Name::new(label.to_string()),
    ));
    debug!("Spawned obstacle: {} at {}", label, position);
}

/// Flat pad that moves the respawn point when the Body stands on it.
fn spawn_checkpoint(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    material: Handle<StandardMaterial>,
    floor_position: Vec3,
    label: &str,
) {
    let pad = Vec3::new(3.0, 0.1, 3.0);
    commands.spawn((
        DespawnOnExit(Screen::Gameplay),
        LevelGeometry,
        Checkpoint {
            respawn_at: floor_position + Vec3::Y * 1.5,
        },
        Mesh3d(meshes.add(Cuboid::new(pad.x, pad.y, pad.z))),
        MeshMaterial3d(material),
        Transform::from_translation(floor_position + Vec3::Y * pad.y / 2.0),
        RigidBody::Static,
        Sensor,
        // Tall enough to reach a Body floating above the pad.
        Collider::cuboid(pad.x, 2.0, pad.z),
        GameLayer::trigger(),
        Name::new(label.to_string()),
    ));
}
