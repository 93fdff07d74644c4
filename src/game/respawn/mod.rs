mod coordinator;

use avian3d::prelude::*;
use bevy::prelude::*;

pub use coordinator::{RespawnCoordinator, RespawnOutcome, RespawnSettings};

use crate::game::{
    GameplaySystems,
    abilities::{AbilityEvent, AbilityManager, AbilityState, AvatarRig, drive_abilities},
    avatar::Body,
    physics::GameLayer,
};

/// Touching this kills the Body. Anchored players may be pulled back instead.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct KillZone {
    pub rescue_when_anchored: bool,
}

/// Touching this moves the respawn point.
#[derive(Component, Debug, Clone, Copy)]
pub struct Checkpoint {
    pub respawn_at: Vec3,
}

/// Dynamic level props that go back where they started when the player respawns.
#[derive(Component, Debug, Clone, Copy)]
pub struct ResetOnRespawn {
    pub home: Transform,
}

/// Sent after the Body was put back at a checkpoint.
#[derive(Message, Debug, Clone, Copy)]
pub struct WorldReset {
    pub checkpoint: Vec3,
}

pub(super) fn plugin(app: &mut App) {
    app.add_message::<WorldReset>();
    app.add_systems(
        Update,
        (check_hazards, reset_world_objects)
            .chain()
            .in_set(GameplaySystems::Simulate)
            .after(drive_abilities)
            .run_if(resource_exists::<RespawnCoordinator>),
    );
}

fn check_hazards(
    time: Res<Time<Real>>,
    spatial_query: SpatialQuery,
    mut coordinator: ResMut<RespawnCoordinator>,
    mut manager: ResMut<AbilityManager>,
    mut rig: AvatarRig,
    bodies: Query<(&Transform, &Collider), With<Body>>,
    kill_zones: Query<&KillZone>,
    checkpoints: Query<&Checkpoint>,
    mut resets: MessageWriter<WorldReset>,
    mut events: MessageWriter<AbilityEvent>,
) {
    coordinator.tick(time.delta_secs());
    let Ok((transform, collider)) = bodies.single() else {
        return;
    };

    let filter = SpatialQueryFilter::from_mask(GameLayer::Trigger);
    let touching = spatial_query.shape_intersections(
        collider,
        transform.translation,
        transform.rotation,
        &filter,
    );

    // Rescue only when every zone touched allows it.
    let mut hazard: Option<bool> = None;
    for entity in touching {
        if let Ok(checkpoint) = checkpoints.get(entity) {
            coordinator.set_checkpoint(checkpoint.respawn_at);
        }
        if let Ok(zone) = kill_zones.get(entity) {
            hazard = Some(hazard.unwrap_or(true) && zone.rescue_when_anchored);
        }
    }
    if coordinator.is_below_kill_plane(transform.translation) {
        hazard = Some(hazard.unwrap_or(true));
    }

    let outcome = rig.with_context(|ctx| {
        // A Soul lost out of the world can never land; end the walk early.
        if manager.state() == AbilityState::SoulWalking
            && coordinator.is_below_kill_plane(ctx.soul.position)
        {
            warn!("Soul fell out of the world");
            manager.cancel_active_ability(ctx);
        }
        hazard.map(|rescue| coordinator.hazard(&mut manager, ctx, rescue))
    });

    if let Some(Some(RespawnOutcome::Respawned(checkpoint))) = outcome {
        resets.write(WorldReset { checkpoint });
    }
    events.write_batch(manager.drain_events());
}

fn reset_world_objects(
    mut resets: MessageReader<WorldReset>,
    mut props: Query<(
        &ResetOnRespawn,
        &mut Transform,
        Option<&mut LinearVelocity>,
        Option<&mut AngularVelocity>,
    )>,
) {
    if resets.read().last().is_none() {
        return;
    }
    for (reset, mut transform, linear, angular) in props.iter_mut() {
        *transform = reset.home;
        if let Some(mut linear) = linear {
            linear.0 = Vec3::ZERO;
        }
        if let Some(mut angular) = angular {
            angular.0 = Vec3::ZERO;
        }
    }
}
