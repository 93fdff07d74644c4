//! Callback table the animation layer uses to reach back into gameplay.

use std::collections::HashMap;

use bevy::prelude::*;

/// Handler invoked when a named clip event fires.
pub type AnimationHandler<T> = fn(&mut T);

/// Maps named clip events ("jump-launch", "landing-impact") to handlers on `T`.
pub struct AnimationCallbacks<T> {
    handlers: HashMap<&'static str, AnimationHandler<T>>,
}

impl<T> Default for AnimationCallbacks<T> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }
}

impl<T> AnimationCallbacks<T> {
    pub fn register(&mut self, event: &'static str, handler: AnimationHandler<T>) -> &mut Self {
        self.handlers.insert(event, handler);
        self
    }

    /// Runs the handler for `event`. Unknown events are ignored.
    pub fn dispatch(&self, event: &str, target: &mut T) -> bool {
        match self.handlers.get(event) {
            Some(handler) => {
                handler(target);
                true
            }
            None => {
                debug!("No handler registered for animation event {event}");
                false
            }
        }
    }
}

/// Stand-in for clip playback: schedules named events a fixed time after a trigger.
#[derive(Component, Debug, Clone, Default)]
pub struct CueTimeline {
    pending: Vec<(f32, &'static str)>,
}

impl CueTimeline {
    pub fn schedule(&mut self, delay: f32, event: &'static str) {
        self.pending.push((delay, event));
    }

    /// Advances by `dt` (scaled seconds) and returns the events that fired, oldest first.
    pub fn advance(&mut self, dt: f32) -> Vec<&'static str> {
        let mut fired = Vec::new();
        self.pending.retain_mut(|(remaining, event)| {
            *remaining -= dt;
            if *remaining <= 0.0 {
                fired.push(*event);
                false
            } else {
                true
            }
        });
        fired
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        launches: u32,
    }

    #[test]
    fn test_dispatch_runs_registered_handler() {
        let mut callbacks = AnimationCallbacks::<Counter>::default();
        callbacks.register("jump-launch", |c| c.launches += 1);

        let mut counter = Counter::default();
        assert!(callbacks.dispatch("jump-launch", &mut counter));
        assert!(!callbacks.dispatch("unknown", &mut counter));
        assert_eq!(counter.launches, 1);
    }

    #[test]
    fn test_cues_fire_after_delay() {
        let mut cues = CueTimeline::default();
        cues.schedule(0.1, "jump-launch");
        cues.schedule(0.0, "landing-impact");

        assert_eq!(cues.advance(0.05), vec!["landing-impact"]);
        assert_eq!(cues.advance(0.05), vec!["jump-launch"]);
        assert!(cues.is_empty());
    }
}
