//! Action handlers.
//!
//! Each handler wraps one family of collaborator calls. The dispatcher
//! decides *which* handler runs; handlers decide nothing beyond logging and
//! presence checks.

pub mod dialog;
pub mod instance;
pub mod kill_count;
pub mod misc;
pub mod objective;

pub use dialog::DialogAction;
pub use instance::InstanceAction;
pub use kill_count::KillCountAction;
pub use misc::MiscellaneousAction;
pub use objective::ObjectiveAction;

use crate::services::Collaborators;

/// All handlers the dispatcher routes to
pub struct ActionHandlers {
    pub dialog: DialogAction,
    pub objective: ObjectiveAction,
    pub kill_count: KillCountAction,
    pub misc: MiscellaneousAction,
    pub instance: InstanceAction,
}

impl ActionHandlers {
    pub fn new(collaborators: &Collaborators) -> Self {
        Self {
            dialog: DialogAction::new(collaborators.dialogs.clone()),
            objective: ObjectiveAction::new(collaborators.objectives.clone()),
            kill_count: KillCountAction::new(collaborators.kill_counts.clone()),
            misc: MiscellaneousAction::new(
                collaborators.commands.clone(),
                collaborators.teleporter.clone(),
                collaborators.inventory.clone(),
            ),
            instance: InstanceAction::new(collaborators.instances.clone()),
        }
    }
}
