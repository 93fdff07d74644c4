//! Loads asset-backed resources and reports when all of them are in.

use std::collections::VecDeque;

use bevy::prelude::*;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<ResourceHandles>();
    app.add_systems(PreUpdate, load_resource_assets);
}

pub trait LoadResource {
    /// Adds `T` as an asset and inserts it as a resource once it and its dependencies loaded.
    fn load_resource<T: Resource + Asset + Clone + FromWorld>(&mut self) -> &mut Self;
}

impl LoadResource for App {
    fn load_resource<T: Resource + Asset + Clone + FromWorld>(&mut self) -> &mut Self {
        self.init_asset::<T>();
        let world = self.world_mut();
        let value = T::from_world(world);
        let handle = world.resource::<AssetServer>().add(value);
        world
            .resource_mut::<ResourceHandles>()
            .waiting
            .push_back((handle.untyped(), insert_loaded::<T>));
        self
    }
}

/// Copies a finished asset into the world as a resource.
type InsertLoadedResource = fn(&mut World, &UntypedHandle);

fn insert_loaded<T: Resource + Asset + Clone>(world: &mut World, handle: &UntypedHandle) {
    let value = world.resource::<Assets<T>>().get(handle.id().typed::<T>()).cloned();
    match value {
        Some(value) => {
            world.insert_resource(value);
        }
        None => warn!("Loaded resource asset vanished before insertion"),
    }
}

#[derive(Resource, Default)]
pub struct ResourceHandles {
    waiting: VecDeque<(UntypedHandle, InsertLoadedResource)>,
    finished: Vec<UntypedHandle>,
}

impl ResourceHandles {
    pub fn is_all_done(&self) -> bool {
        self.waiting.is_empty()
    }
}

fn load_resource_assets(world: &mut World) {
    world.resource_scope(|world, mut handles: Mut<ResourceHandles>| {
        let pending = std::mem::take(&mut handles.waiting);
        for (handle, insert) in pending {
            let loaded = world
                .resource::<AssetServer>()
                .is_loaded_with_dependencies(&handle);
            if loaded {
                insert(world, &handle);
                handles.finished.push(handle);
            } else {
                handles.waiting.push_back((handle, insert));
            }
        }
    });
}
