use bevy::prelude::*;

/// Fired by the jump clip on the frame the feet leave the ground.
pub const JUMP_LAUNCH: &str = "jump-launch";
/// Fired by the landing clip on the frame the feet hit the ground.
pub const LANDING_IMPACT: &str = "landing-impact";

/// Trigger asking the animator to start the jump clip.
pub const JUMP_TRIGGER: &str = "Jump";
/// Trigger asking the animator to start the landing clip.
pub const LAND_TRIGGER: &str = "Land";

/// Run blend used while the Body is carried along a recorded path.
pub const TRAVERSAL_RUN_BLEND: f32 = 1.0;

/// Named parameters the gameplay core hands to the animation layer.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct AnimatorParams {
    pub grounded: bool,
    /// 0.0 = idle, 1.0 = full run.
    pub forward_blend: f32,
    pub vertical_speed: f32,
    triggers: Vec<&'static str>,
}

impl AnimatorParams {
    pub fn set_trigger(&mut self, trigger: &'static str) {
        if !self.triggers.contains(&trigger) {
            self.triggers.push(trigger);
        }
    }

    pub fn has_trigger(&self, trigger: &str) -> bool {
        self.triggers.iter().any(|t| *t == trigger)
    }

    pub fn take_triggers(&mut self) -> Vec<&'static str> {
        std::mem::take(&mut self.triggers)
    }
}
