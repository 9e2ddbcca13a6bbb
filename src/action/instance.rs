use std::sync::Arc;

use tracing::{info, warn};

use crate::dispatch::Position;
use crate::services::InstanceService;

/// Instanced-world actions. The instance service may not be installed, in
/// which case every call degrades to "nothing happened".
pub struct InstanceAction {
    service: Option<Arc<dyn InstanceService>>,
}

impl InstanceAction {
    pub fn new(service: Option<Arc<dyn InstanceService>>) -> Self {
        Self { service }
    }

    /// Create an instance from a world and teleport a player into that instance.
    /// Returns the new world name.
    pub fn create_instance(&self, player_name: &str, world_to_copy: &str, position: Position) -> Option<String> {
        let Some(service) = &self.service else {
            warn!("No instance service installed, cannot copy '{}' for {}", world_to_copy, player_name);
            return None;
        };

        let instance = service.create_instance(world_to_copy, player_name, position);
        match &instance {
            Some(world) => info!("Created instance {} of '{}' for {}", world, world_to_copy, player_name),
            None => warn!("Instance service refused to copy '{}' for {}", world_to_copy, player_name),
        }
        instance
    }

    /// Try to transfer a player to a given world. True if the player moved.
    pub fn apparate_player(&self, player_name: &str, world_name: &str, position: Position) -> bool {
        match &self.service {
            Some(service) => service.apparate(world_name, player_name, position),
            None => {
                warn!("No instance service installed, cannot move {} to '{}'", player_name, world_name);
                false
            }
        }
    }
}
