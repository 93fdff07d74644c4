use bevy::{
    asset::{AssetLoader, LoadContext, io::Reader},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::game::{
    abilities::AbilitySettings, camera_controller::CameraSettings, parkour::ParkourSettings,
    path_recorder::PathSettings, player::BodySettings, respawn::RespawnSettings,
    soul::SoulSettings,
};

/// Every gameplay tunable, loaded from RON.
#[derive(Asset, Resource, Reflect, Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    pub ability: AbilitySettings,
    pub path: PathSettings,
    pub body: BodySettings,
    pub soul: SoulSettings,
    pub parkour: ParkourSettings,
    pub camera: CameraSettings,
    pub respawn: RespawnSettings,
}

impl GameplayConfig {
    pub const PATH: &'static str = "config/gameplay.ron";
}

/// Loading handle for [`GameplayConfig`], tracked until the file is in.
#[derive(Asset, Resource, Reflect, Clone)]
pub struct GameplayConfigAssets {
    #[dependency]
    pub config: Handle<GameplayConfig>,
}

impl FromWorld for GameplayConfigAssets {
    fn from_world(world: &mut World) -> Self {
        let assets = world.resource::<AssetServer>();
        Self {
            config: assets.load(GameplayConfig::PATH),
        }
    }
}

#[derive(Default)]
pub struct GameplayConfigLoader;

impl AssetLoader for GameplayConfigLoader {
    type Asset = GameplayConfig;
    type Settings = ();
    type Error = anyhow::Error;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        _load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        let config: GameplayConfig = ron::de::from_bytes(&bytes)?;
        Ok(config)
    }

    fn extensions(&self) -> &[&str] {
        &["ron"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipped_config_parses() {
        let text = include_str!("../../../assets/config/gameplay.ron");
        let config: GameplayConfig = ron::de::from_str(text).expect("gameplay.ron should parse");
        assert_eq!(config.parkour.wall_run_max_duration, 1.2);
        assert!(config.ability.time_slow_scale > 0.0 && config.ability.time_slow_scale < 1.0);
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let config: GameplayConfig = ron::de::from_str("(ability: (soul_walk_duration: 2.5, soul_anchor_duration: 6.0, time_slow_scale: 0.3, traversal_speed: 9.0))")
            .expect("partial config should parse");
        assert_eq!(config.ability.soul_walk_duration, 2.5);
        assert_eq!(config.path.sample_distance, PathSettings::default().sample_distance);
    }
}
