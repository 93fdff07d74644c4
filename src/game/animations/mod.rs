mod callbacks;
pub mod models;

use bevy::prelude::*;

use crate::game::{avatar::Body, player::BodyController};

pub use callbacks::{AnimationCallbacks, CueTimeline};
use models::{AnimatorParams, JUMP_LAUNCH, JUMP_TRIGGER, LAND_TRIGGER, LANDING_IMPACT};

/// Time from the jump trigger to the launch frame of the stand-in jump clip.
const LAUNCH_CUE_DELAY: f32 = 0.12;

/// Clip event handlers for the Body.
#[derive(Resource, Deref)]
pub struct BodyAnimationCallbacks(AnimationCallbacks<BodyController>);

impl Default for BodyAnimationCallbacks {
    fn default() -> Self {
        Self(BodyController::callbacks())
    }
}

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<BodyAnimationCallbacks>();
}

/// Stands in for clip playback: turns animator triggers into timed clip events and feeds them
/// back through the callback table. Runs on the scaled clock.
pub fn play_animation_cues(
    time: Res<Time>,
    callbacks: Res<BodyAnimationCallbacks>,
    mut bodies: Query<(&mut AnimatorParams, &mut CueTimeline, &mut BodyController), With<Body>>,
) {
    for (mut animator, mut cues, mut body) in bodies.iter_mut() {
        for trigger in animator.take_triggers() {
            match trigger {
                JUMP_TRIGGER => cues.schedule(LAUNCH_CUE_DELAY, JUMP_LAUNCH),
                LAND_TRIGGER => cues.schedule(0.0, LANDING_IMPACT),
                other => debug!("No clip for trigger {other}"),
            }
        }
        for event in cues.advance(time.delta_secs()) {
            callbacks.dispatch(event, &mut body);
        }
    }
}
