mod rig;

use avian3d::prelude::*;
use bevy::{
    prelude::*,
    window::{CursorGrabMode, CursorOptions, PrimaryWindow},
};

pub use rig::{CameraRig, CameraSettings};

use crate::{
    game::{
        GameplaySystems,
        avatar::{Avatar, Body, Soul},
        configs::GameplayConfig,
        input::InputFrame,
        physics::AvianProbe,
    },
    screens::Screen,
};

const CAMERA_FOV_DEGREES: f32 = 60.0;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Screen::Gameplay), attach_camera_rig);
    app.add_systems(
        Update,
        (
            orbit_camera.in_set(GameplaySystems::Simulate),
            follow_target.in_set(GameplaySystems::Present),
        ),
    );

    // Cursor lock management based on screen state
    app.add_systems(OnEnter(Screen::Gameplay), enable_cursor_lock.after(attach_camera_rig));
    app.add_systems(OnExit(Screen::Gameplay), disable_cursor_lock);
}

/// Attach the orbit rig to the main camera.
fn attach_camera_rig(
    mut commands: Commands,
    config: Res<GameplayConfig>,
    cameras: Query<Entity, With<Camera3d>>,
) {
    let Ok(camera) = cameras.single() else {
        warn!("No 3D camera to attach the rig to");
        return;
    };
    commands.entity(camera).insert((
        CameraRig::new(config.camera.clone()),
        Projection::from(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            ..default()
        }),
    ));
}

fn apply_cursor_lock(window: &mut CursorOptions, locked: bool) {
    if locked {
        window.grab_mode = CursorGrabMode::Locked;
        window.visible = false;
    } else {
        window.grab_mode = CursorGrabMode::None;
        window.visible = true;
    }
}

fn orbit_camera(
    mut input: ResMut<InputFrame>,
    mut cameras: Query<&mut CameraRig>,
    mut cursors: Query<&mut CursorOptions, With<PrimaryWindow>>,
) {
    let Ok(mut rig) = cameras.single_mut() else {
        return;
    };
    if std::mem::take(&mut input.toggle_cursor) {
        rig.cursor_locked = !rig.cursor_locked;
        if let Ok(mut cursor) = cursors.single_mut() {
            apply_cursor_lock(&mut cursor, rig.cursor_locked);
        }
        info!("Cursor lock {}", if rig.cursor_locked { "on" } else { "off" });
    }
    rig.orbit(input.look_delta);
}

/// Follows whichever avatar the rig targets, on the unscaled clock.
fn follow_target(
    time: Res<Time<Real>>,
    spatial_query: SpatialQuery,
    bodies: Query<&Transform, (With<Body>, Without<CameraRig>)>,
    souls: Query<&Transform, (With<Soul>, Without<CameraRig>)>,
    mut cameras: Query<(&mut CameraRig, &mut Transform)>,
) {
    let Ok((mut rig, mut transform)) = cameras.single_mut() else {
        return;
    };
    let target = match rig.target() {
        Avatar::Body => bodies.single(),
        Avatar::Soul => souls.single(),
    };
    let Ok(target) = target else {
        return;
    };
    let probe = AvianProbe::new(&spatial_query);
    *transform = rig.follow(target.translation, time.delta_secs(), &probe);
}

/// Enable cursor lock when entering gameplay
fn enable_cursor_lock(
    mut cameras: Query<&mut CameraRig>,
    mut cursors: Query<&mut CursorOptions, With<PrimaryWindow>>,
) {
    for mut rig in cameras.iter_mut() {
        rig.cursor_locked = true;
    }
    if let Ok(mut cursor) = cursors.single_mut() {
        apply_cursor_lock(&mut cursor, true);
        info!("Cursor lock enabled for gameplay");
    }
}

/// Disable cursor lock when exiting gameplay
fn disable_cursor_lock(
    mut cameras: Query<&mut CameraRig>,
    mut cursors: Query<&mut CursorOptions, With<PrimaryWindow>>,
) {
    for mut rig in cameras.iter_mut() {
        rig.cursor_locked = false;
    }
    if let Ok(mut cursor) = cursors.single_mut() {
        apply_cursor_lock(&mut cursor, false);
        info!("Cursor lock disabled outside gameplay");
    }
}
