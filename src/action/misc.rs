//! Commands, teleports and item transfers.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::ServiceError;
use crate::player::Player;
use crate::services::{CommandExecutor, InventoryService, Teleporter};

pub struct MiscellaneousAction {
    commands: Arc<dyn CommandExecutor>,
    teleporter: Option<Arc<dyn Teleporter>>,
    inventory: Arc<dyn InventoryService>,
}

impl MiscellaneousAction {
    pub fn new(
        commands: Arc<dyn CommandExecutor>,
        teleporter: Option<Arc<dyn Teleporter>>,
        inventory: Arc<dyn InventoryService>,
    ) -> Self {
        Self {
            commands,
            teleporter,
            inventory,
        }
    }

    pub fn execute_command(&self, player: &Player, command: &str) -> Result<(), ServiceError> {
        debug!("Executing command '{}' for {}", command, player);
        self.commands.execute(player, command)
    }

    /// Without a teleporter installed this is a no-op.
    pub fn teleport(&self, player: &Player, target: &str) -> Result<(), ServiceError> {
        let Some(teleporter) = &self.teleporter else {
            warn!("No teleporter installed, {} stays put instead of going to '{}'", player, target);
            return Ok(());
        };
        debug!("Teleporting {} to '{}'", player, target);
        teleporter.teleport(player, target)
    }

    pub fn give_item(&self, player: &Player, item: &str) -> Result<(), ServiceError> {
        debug!("Giving '{}' to {}", item, player);
        self.inventory.give_item(player, item)
    }

    pub fn remove_item(&self, player: &Player, item: &str) -> Result<(), ServiceError> {
        debug!("Removing '{}' from {}", item, player);
        self.inventory.remove_item(player, item)
    }
}
