//! Keyboard and mouse state collected once per frame for the gameplay systems.

use bevy::{
    input::{InputSystems, mouse::AccumulatedMouseMotion},
    prelude::*,
};

use crate::screens::Screen;

/// Continuous axes plus latched presses. A press stays set until the schedule that owns it
/// consumes it, so a fixed step that runs zero times in a frame does not lose a jump.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct InputFrame {
    pub move_axis: Vec2,
    pub look_delta: Vec2,
    pub jump: bool,
    pub soul_walk: bool,
    pub soul_anchor: bool,
    pub cancel: bool,
    pub toggle_cursor: bool,
}

impl InputFrame {
    /// Clears the presses owned by the unscaled-clock systems.
    pub fn consume_ability_presses(&mut self) {
        self.soul_walk = false;
        self.soul_anchor = false;
        self.cancel = false;
    }
}

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<InputFrame>();
    app.add_systems(
        PreUpdate,
        gather_input
            .after(InputSystems)
            .run_if(in_state(Screen::Gameplay)),
    );
    app.add_systems(FixedLast, consume_jump);
}

fn axis(keyboard: &ButtonInput<KeyCode>, negative: [KeyCode; 2], positive: [KeyCode; 2]) -> f32 {
    let mut value = 0.0;
    if keyboard.any_pressed(negative) {
        value -= 1.0;
    }
    if keyboard.any_pressed(positive) {
        value += 1.0;
    }
    value
}

fn gather_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mut input: ResMut<InputFrame>,
) {
    input.move_axis = Vec2::new(
        axis(&keyboard, [KeyCode::KeyA, KeyCode::ArrowLeft], [KeyCode::KeyD, KeyCode::ArrowRight]),
        axis(&keyboard, [KeyCode::KeyS, KeyCode::ArrowDown], [KeyCode::KeyW, KeyCode::ArrowUp]),
    )
    .clamp_length_max(1.0);
    input.look_delta = mouse_motion.delta;

    input.jump |= keyboard.just_pressed(KeyCode::Space);
    input.soul_walk |= keyboard.just_pressed(KeyCode::KeyQ);
    input.soul_anchor |= keyboard.just_pressed(KeyCode::KeyE);
    input.cancel |= keyboard.just_pressed(KeyCode::KeyC);
    input.toggle_cursor |= keyboard.just_pressed(KeyCode::KeyL);
}

/// The jump press belongs to the fixed-step locomotion.
fn consume_jump(mut input: ResMut<InputFrame>) {
    input.jump = false;
}
