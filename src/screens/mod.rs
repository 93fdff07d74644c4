//! The game's screens and transitions between them.

use bevy::prelude::*;

use crate::asset_tracking::ResourceHandles;

pub(super) fn plugin(app: &mut App) {
    app.init_state::<Screen>();
    app.add_systems(
        Update,
        enter_gameplay.run_if(in_state(Screen::Loading).and(all_assets_loaded)),
    );
}

/// The game's main screen states.
#[derive(States, Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Screen {
    #[default]
    Loading,
    Gameplay,
}

fn all_assets_loaded(resource_handles: Res<ResourceHandles>) -> bool {
    resource_handles.is_all_done()
}

fn enter_gameplay(mut next_screen: ResMut<NextState<Screen>>) {
    info!("Assets loaded, entering gameplay");
    next_screen.set(Screen::Gameplay);
}
