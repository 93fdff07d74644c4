use avian3d::prelude::*;
use bevy::prelude::*;

use super::MotionState;

/// Mirrors the physics engine into each avatar's [`MotionState`].
pub fn read_avatar_motion(mut avatars: Query<(&Transform, &LinearVelocity, &mut MotionState)>) {
    for (transform, velocity, mut motion) in avatars.iter_mut() {
        motion.sync_from_physics(transform.translation, transform.rotation, velocity.0);
    }
}

/// Flushes queued teleports, velocity overrides and physics mode changes.
pub fn write_avatar_motion(
    mut commands: Commands,
    mut avatars: Query<(
        Entity,
        &mut MotionState,
        &mut Transform,
        &mut LinearVelocity,
        &mut GravityScale,
    )>,
) {
    for (entity, mut motion, mut transform, mut velocity, mut gravity_scale) in avatars.iter_mut() {
        let pending = motion.take_pending();
        if pending.transform {
            transform.translation = motion.position;
            transform.rotation = motion.rotation;
        }
        if pending.velocity {
            velocity.0 = motion.velocity;
        }
        if pending.physics {
            let mode = motion.physics();
            let rigid_body = if mode.kinematic {
                RigidBody::Kinematic
            } else {
                RigidBody::Dynamic
            };
            let locked_axes = if mode.locked {
                LockedAxes::ALL_LOCKED
            } else {
                LockedAxes::ROTATION_LOCKED.unlock_rotation_y()
            };
            gravity_scale.0 = mode.gravity_scale;
            commands.entity(entity).insert((rigid_body, locked_axes));
        }
    }
}
