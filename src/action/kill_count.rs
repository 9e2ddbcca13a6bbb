use std::sync::Arc;

use tracing::debug;

use crate::error::ServiceError;
use crate::player::Player;
use crate::services::KillCountService;

/// Starts and stops kill counters.
///
/// `label` names the counter's owner (the NPCs of the conversation that
/// started it) so two quest givers can count the same monster separately.
pub struct KillCountAction {
    service: Arc<dyn KillCountService>,
}

impl KillCountAction {
    pub fn new(service: Arc<dyn KillCountService>) -> Self {
        Self { service }
    }

    pub fn start_kill_count(&self, player: &Player, label: &str, target: &str) -> Result<(), ServiceError> {
        debug!("Starting kill count '{}' ({}) for {}", target, label, player);
        self.service.start_kill_count(player, label, target)
    }

    pub fn stop_kill_count(&self, player: &Player, label: &str, target: &str) -> Result<(), ServiceError> {
        debug!("Stopping kill count '{}' ({}) for {}", target, label, player);
        self.service.stop_kill_count(player, label, target)
    }
}
