use bevy::prelude::*;

use crate::game::physics::horizontal;

/// Cursor walking a frozen copy of a recorded path at a fixed speed.
#[derive(Debug, Clone, PartialEq)]
pub struct Traversal {
    path: Vec<Vec3>,
    /// Waypoint currently being approached.
    index: usize,
    position: Vec3,
}

impl Traversal {
    /// Starts at the first waypoint heading for the second. Returns `None` for an empty path.
    pub fn new(path: Vec<Vec3>) -> Option<Self> {
        let position = *path.first()?;
        Some(Self {
            path,
            index: 1,
            position,
        })
    }

    /// Consumes `distance` along the path, snapping through every waypoint it reaches.
    pub fn advance(&mut self, distance: f32) -> Vec3 {
        let mut remaining = distance.max(0.0);
        while let Some(&target) = self.path.get(self.index) {
            let gap = self.position.distance(target);
            if remaining >= gap {
                self.position = target;
                remaining -= gap;
                self.index += 1;
            } else {
                self.position += (target - self.position) * (remaining / gap);
                break;
            }
        }
        self.position
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.path.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn path(&self) -> &[Vec3] {
        &self.path
    }

    /// Flat direction toward the next waypoint, if one remains and it is not straight up.
    pub fn facing(&self) -> Option<Vec3> {
        let target = self.path.get(self.index)?;
        horizontal(*target - self.position).try_normalize()
    }
}
