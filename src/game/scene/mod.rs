mod level;

use bevy::prelude::*;

use crate::{
    game::{
        configs::GameplayConfig,
        player::SpawnBody,
        respawn::RespawnCoordinator,
        scene::level::spawn_test_level,
        soul::SpawnSoul,
    },
    screens::Screen,
};

/// Where the Body starts and first respawns.
const BODY_SPAWN: Vec3 = Vec3::new(0.0, 1.5, 8.0);

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        OnEnter(Screen::Gameplay),
        (spawn_test_level, spawn_level).chain(),
    );
}

pub fn spawn_level(world: &mut World) {
    let respawn = world
        .get_resource::<GameplayConfig>()
        .map(|config| config.respawn.clone())
        .unwrap_or_default();
    world.insert_resource(RespawnCoordinator::new(respawn, BODY_SPAWN));

    SpawnBody {
        position: BODY_SPAWN,
    }
    .apply(world);
    SpawnSoul {
        position: BODY_SPAWN,
    }
    .apply(world);
}
