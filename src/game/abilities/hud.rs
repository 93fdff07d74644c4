use bevy::prelude::*;

use super::{AbilityKind, AbilityManager, AbilityState};
use crate::{game::GameplaySystems, screens::Screen};

const HUD_TEXT: Color = Color::srgb(0.85, 0.92, 1.0);

/// Marker for the ability timer readout.
#[derive(Component)]
struct AbilityTimerText;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Screen::Gameplay), spawn_ability_hud);
    app.add_systems(
        Update,
        update_ability_hud
            .run_if(resource_changed::<AbilityManager>)
            .in_set(GameplaySystems::Present),
    );
}

fn spawn_ability_hud(mut commands: Commands) {
    commands.spawn((
        Name::new("Ability HUD"),
        DespawnOnExit(Screen::Gameplay),
        Node {
            position_type: PositionType::Absolute,
            top: px(16),
            left: px(16),
            ..default()
        },
        children![(
            AbilityTimerText,
            Text::new(""),
            TextFont::from_font_size(22.0),
            TextColor(HUD_TEXT),
        )],
    ));
}

fn update_ability_hud(
    manager: Res<AbilityManager>,
    mut texts: Query<&mut Text, With<AbilityTimerText>>,
) {
    let label = match (manager.state(), manager.kind()) {
        (AbilityState::Unified, _) | (_, None) => String::new(),
        (AbilityState::Traversing, Some(kind)) => format!("{} returning", kind_name(kind)),
        (_, Some(kind)) => match manager.remaining_time() {
            Some(remaining) => format!("{} {:.1}s", kind_name(kind), remaining.max(0.0)),
            None => kind_name(kind).to_string(),
        },
    };
    for mut text in texts.iter_mut() {
        if text.0 != label {
            text.0.clone_from(&label);
        }
    }
}

fn kind_name(kind: AbilityKind) -> &'static str {
    match kind {
        AbilityKind::SoulWalk => "Soul Walk",
        AbilityKind::SoulAnchor => "Soul Anchor",
    }
}
