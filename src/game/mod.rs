//! Gameplay: the two avatars, their abilities and the level they play in.

mod abilities;
mod animations;
mod avatar;
mod camera_controller;
mod configs;
mod input;
mod parkour;
mod path_recorder;
mod physics;
mod player;
mod respawn;
mod scene;
mod soul;

use bevy::prelude::*;

use crate::screens::Screen;

/// Per-tick ordering shared by the fixed-step and frame schedules.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameplaySystems {
    /// Physics engine state copied into each avatar's motion state.
    ReadMotion,
    Simulate,
    /// Requested writes flushed back to the physics engine.
    WriteMotion,
    /// Camera and debug drawing, after everything moved.
    Present,
}

pub(super) fn plugin(app: &mut App) {
    app.configure_sets(
        FixedUpdate,
        (
            GameplaySystems::ReadMotion,
            GameplaySystems::Simulate,
            GameplaySystems::WriteMotion,
        )
            .chain()
            .run_if(in_state(Screen::Gameplay)),
    );
    app.configure_sets(
        Update,
        (
            GameplaySystems::ReadMotion,
            GameplaySystems::Simulate,
            GameplaySystems::WriteMotion,
            GameplaySystems::Present,
        )
            .chain()
            .run_if(in_state(Screen::Gameplay)),
    );

    app.add_plugins((
        configs::plugin,
        input::plugin,
        avatar::plugin,
        animations::plugin,
        player::plugin,
        soul::plugin,
        path_recorder::plugin,
        abilities::plugin,
        camera_controller::plugin,
        respawn::plugin,
        scene::plugin,
    ));
}
