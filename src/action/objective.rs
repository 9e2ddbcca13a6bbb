use std::sync::Arc;

use tracing::debug;

use crate::error::ServiceError;
use crate::player::Player;
use crate::services::ObjectiveService;

pub struct ObjectiveAction {
    service: Arc<dyn ObjectiveService>,
}

impl ObjectiveAction {
    pub fn new(service: Arc<dyn ObjectiveService>) -> Self {
        Self { service }
    }

    /// Replace the player's current objective
    pub fn set_objective(&self, player: &Player, objective: &str) -> Result<(), ServiceError> {
        debug!("Setting objective '{}' for {}", objective, player);
        self.service.set_objective(player, objective)
    }
}
