mod recorder;

use bevy::prelude::*;

pub use recorder::{PathRecorder, PathSettings, RecorderMode};

use crate::{
    game::{GameplaySystems, configs::GameplayConfig},
    screens::Screen,
};

const TETHER_COLOR: Color = Color::srgb(0.45, 0.8, 1.0);
const TRAVERSAL_COLOR: Color = Color::srgb(1.0, 0.85, 0.4);

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<PathRecorder>();
    app.add_systems(OnEnter(Screen::Gameplay), reset_recorder);
    app.add_systems(Update, draw_tether.in_set(GameplaySystems::Present));
}

fn reset_recorder(mut commands: Commands, config: Res<GameplayConfig>) {
    commands.insert_resource(PathRecorder::new(config.path.clone()));
}

/// Tether between the anchored avatar and the mover, or what is left of it during traversal.
fn draw_tether(recorder: Res<PathRecorder>, mut gizmos: Gizmos) {
    let color = match recorder.mode() {
        RecorderMode::Idle => return,
        RecorderMode::Recording => TETHER_COLOR,
        RecorderMode::Traversal { .. } => TRAVERSAL_COLOR,
    };
    let segment = recorder.rendered_segment();
    if segment.len() < 2 {
        return;
    }
    gizmos.linestrip(segment.iter().copied(), color);
    for point in &segment {
        gizmos.sphere(Isometry3d::from_translation(*point), 0.05, color);
    }
}
