//! Development tools for the game. This plugin is only enabled in dev builds.

use avian3d::prelude::{PhysicsDebugPlugin, PhysicsGizmos};
use bevy::{dev_tools::states::log_transitions, input::common_conditions::input_just_pressed, prelude::*};

use crate::screens::Screen;

const PHYSICS_DEBUG_KEY: KeyCode = KeyCode::F3;

pub(super) fn plugin(app: &mut App) {
    // Log `Screen` state transitions.
    app.add_systems(Update, log_transitions::<Screen>);
    app.add_plugins(PhysicsDebugPlugin::default());
    app.add_systems(Startup, hide_physics_debug);
    app.add_systems(
        Update,
        toggle_physics_debug.run_if(input_just_pressed(PHYSICS_DEBUG_KEY)),
    );
}

fn hide_physics_debug(mut store: ResMut<GizmoConfigStore>) {
    store.config_mut::<PhysicsGizmos>().0.enabled = false;
}

fn toggle_physics_debug(mut store: ResMut<GizmoConfigStore>) {
    let (config, _) = store.config_mut::<PhysicsGizmos>();
    config.enabled = !config.enabled;
    info!("Physics debug rendering: {}", if config.enabled { "ON" } else { "OFF" });
}
