use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info};
use uuid::Uuid;

use crate::dispatch::Position;

/// A private copy of a template world
pub struct Instance {
    /// World name players apparate into
    pub id: String,
    pub template: String,
    pub owner: String,
    /// Players currently inside, with where they stand
    players: DashMap<String, Position>,
}

impl Instance {
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn has_player(&self, player_name: &str) -> bool {
        self.players.contains_key(player_name)
    }

    pub fn position_of(&self, player_name: &str) -> Option<Position> {
        self.players.get(player_name).map(|entry| *entry.value())
    }

    fn add_player(&self, player_name: &str, position: Position) {
        self.players.insert(player_name.to_string(), position);
    }

    fn remove_player(&self, player_name: &str) -> usize {
        self.players.remove(player_name);
        self.players.len()
    }
}

/// Manages all live instances, keyed by instance world name
#[derive(Default)]
pub struct InstanceManager {
    instances: DashMap<String, Arc<Instance>>,
}

impl InstanceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy `template` for `owner` and place the owner inside. Returns the
    /// new instance, or `None` for an empty template name.
    pub fn create(&self, template: &str, owner: &str, position: Position) -> Option<Arc<Instance>> {
        if template.trim().is_empty() {
            return None;
        }

        let id = format!("{}_{}", template, Uuid::new_v4().simple());
        let instance = Arc::new(Instance {
            id: id.clone(),
            template: template.to_string(),
            owner: owner.to_string(),
            players: DashMap::new(),
        });

        self.instances.insert(id.clone(), instance.clone());
        info!("Created instance {} of '{}' for owner {}", id, template, owner);
        self.enter(&instance, owner, position);
        Some(instance)
    }

    /// Move `player_name` into the existing instance `world`. False if no
    /// such instance exists.
    pub fn apparate(&self, world: &str, player_name: &str, position: Position) -> bool {
        let Some(instance) = self.get(world) else {
            debug!("No instance named '{}'", world);
            return false;
        };
        self.enter(&instance, player_name, position);
        true
    }

    /// Take `player_name` out of whatever instance holds them. Instances
    /// left empty are dropped.
    pub fn leave(&self, player_name: &str) {
        let Some(instance) = self.find_player_instance(player_name) else {
            return;
        };
        if instance.remove_player(player_name) == 0 {
            self.instances.remove(&instance.id);
            info!("Removed empty instance {}", instance.id);
        }
    }

    pub fn get(&self, world: &str) -> Option<Arc<Instance>> {
        self.instances.get(world).map(|entry| entry.value().clone())
    }

    pub fn find_player_instance(&self, player_name: &str) -> Option<Arc<Instance>> {
        self.instances
            .iter()
            .find(|entry| entry.value().has_player(player_name))
            .map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    fn enter(&self, instance: &Arc<Instance>, player_name: &str, position: Position) {
        if let Some(current) = self.find_player_instance(player_name) {
            if current.id != instance.id {
                self.leave(player_name);
            }
        }
        instance.add_player(player_name, position);
    }
}
