use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::game::avatar::Avatar;

#[derive(Reflect, Clone, Debug, Serialize, Deserialize)]
pub struct PathSettings {
    /// Minimum spacing between committed waypoints (meters).
    pub sample_distance: f32,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            sample_distance: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RecorderMode {
    #[default]
    Idle,
    Recording,
    /// Path frozen; only the part ahead of the traveller is shown.
    Traversal { index: usize, current: Vec3 },
}

/// Samples the trajectory of a moving avatar away from a stationary anchor.
///
/// While recording the path always holds at least two points: the anchor and the mover's
/// live position.
#[derive(Resource, Debug, Clone, Default)]
pub struct PathRecorder {
    settings: PathSettings,
    points: Vec<Vec3>,
    mode: RecorderMode,
    anchor: Option<Avatar>,
    mover: Option<Avatar>,
}

impl PathRecorder {
    pub fn new(settings: PathSettings) -> Self {
        Self {
            settings,
            ..default()
        }
    }

    /// Starts a fresh recording seeded with the anchor and mover positions.
    pub fn activate(&mut self, anchor: Avatar, anchor_position: Vec3, mover: Avatar, mover_position: Vec3) {
        self.points.clear();
        self.points.push(anchor_position);
        self.points.push(mover_position);
        self.anchor = Some(anchor);
        self.mover = Some(mover);
        self.mode = RecorderMode::Recording;
    }

    /// Stops recording and keeps the sampled points.
    pub fn deactivate(&mut self) {
        self.mode = RecorderMode::Idle;
    }

    /// Drops the path and both roles.
    pub fn clear(&mut self) {
        self.points.clear();
        self.anchor = None;
        self.mover = None;
        self.mode = RecorderMode::Idle;
    }

    /// Feeds the mover's current position.
    pub fn record(&mut self, mover_position: Vec3) {
        if self.mode != RecorderMode::Recording || self.points.len() < 2 {
            return;
        }
        let len = self.points.len();
        if self.points[len - 1] == mover_position {
            return;
        }
        let committed = self.points[len - 2];
        if committed.distance(mover_position) > self.settings.sample_distance {
            self.points.push(mover_position);
        } else {
            self.points[len - 1] = mover_position;
        }
    }

    /// Freezes the path, optionally reversed, and switches to traversal rendering.
    pub fn begin_traversal(&mut self, reverse: bool) {
        if reverse {
            self.points.reverse();
        }
        let current = self.points.first().copied().unwrap_or_default();
        self.mode = RecorderMode::Traversal { index: 1, current };
    }

    /// Progress report from whoever is travelling the path.
    pub fn update_traversal(&mut self, index: usize, current: Vec3) {
        if let RecorderMode::Traversal { .. } = self.mode {
            self.mode = RecorderMode::Traversal { index, current };
        }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn mode(&self) -> RecorderMode {
        self.mode
    }

    pub fn is_recording(&self) -> bool {
        self.mode == RecorderMode::Recording
    }

    pub fn anchor(&self) -> Option<Avatar> {
        self.anchor
    }

    pub fn mover(&self) -> Option<Avatar> {
        self.mover
    }

    /// Polyline to draw this frame.
    pub fn rendered_segment(&self) -> Vec<Vec3> {
        match self.mode {
            RecorderMode::Idle => Vec::new(),
            RecorderMode::Recording => self.points.clone(),
            RecorderMode::Traversal { index, current } => std::iter::once(current)
                .chain(self.points.iter().skip(index).copied())
                .collect(),
        }
    }
}
