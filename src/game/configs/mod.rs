pub mod assets;

use bevy::prelude::*;

use crate::asset_tracking::LoadResource;

pub use assets::{GameplayConfig, GameplayConfigAssets, GameplayConfigLoader};

pub(super) fn plugin(app: &mut App) {
    // Register the asset loader for RON config files
    app.init_asset::<GameplayConfig>();
    app.init_asset_loader::<GameplayConfigLoader>();

    // Defaults until the file is in; gameplay waits for the load either way.
    app.init_resource::<GameplayConfig>();
    app.load_resource::<GameplayConfigAssets>();
    app.add_systems(
        Update,
        apply_loaded_config.run_if(resource_added::<GameplayConfigAssets>),
    );
}

fn apply_loaded_config(
    handles: Res<GameplayConfigAssets>,
    configs: Res<Assets<GameplayConfig>>,
    mut config: ResMut<GameplayConfig>,
) {
    match configs.get(&handles.config) {
        Some(loaded) => {
            info!("Loaded {}", GameplayConfig::PATH);
            *config = loaded.clone();
        }
        None => warn!("{} missing, using defaults", GameplayConfig::PATH),
    }
}
