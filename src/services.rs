//! Collaborator ports.
//!
//! The engine never touches the game world directly. Everything it does to
//! a player goes through one of these traits; the host supplies the
//! implementations once at startup (see [`Collaborators`]).

use std::sync::Arc;

use crate::dialog::{Dialog, DialogId};
use crate::dispatch::Position;
use crate::error::ServiceError;
use crate::player::Player;
use crate::text::{BookView, StyledText};

/// Lookup of stored dialogs. Absence is `None`, never an error.
#[cfg_attr(test, mockall::automock)]
pub trait DialogLookup: Send + Sync {
    fn by_id(&self, id: &DialogId) -> Option<Arc<Dialog>>;
    fn by_trigger(&self, name: &str, player: &Player) -> Option<Arc<Dialog>>;
}

/// Presents a rendered book to one player.
#[cfg_attr(test, mockall::automock)]
pub trait BookDisplay: Send + Sync {
    fn show(&self, player: &Player, book: BookView);
}

/// Sends a chat-style message to one player.
#[cfg_attr(test, mockall::automock)]
pub trait Messenger: Send + Sync {
    fn notify(&self, player: &Player, message: StyledText);
}

#[cfg_attr(test, mockall::automock)]
pub trait CommandExecutor: Send + Sync {
    /// Run `command` on behalf of `player`; the string is not interpreted here.
    fn execute(&self, player: &Player, command: &str) -> Result<(), ServiceError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait Teleporter: Send + Sync {
    fn teleport(&self, player: &Player, target: &str) -> Result<(), ServiceError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait InventoryService: Send + Sync {
    fn give_item(&self, player: &Player, item: &str) -> Result<(), ServiceError>;
    fn remove_item(&self, player: &Player, item: &str) -> Result<(), ServiceError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait ObjectiveService: Send + Sync {
    fn set_objective(&self, player: &Player, objective: &str) -> Result<(), ServiceError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait KillCountService: Send + Sync {
    fn start_kill_count(&self, player: &Player, label: &str, target: &str) -> Result<(), ServiceError>;
    fn stop_kill_count(&self, player: &Player, label: &str, target: &str) -> Result<(), ServiceError>;
}

/// Instanced worlds. The service is optional at runtime, so its results
/// only report presence or success.
#[cfg_attr(test, mockall::automock)]
pub trait InstanceService: Send + Sync {
    /// Copy `template_world` into a new instance owned by `owner` and move
    /// the owner there. Returns the new instance's world name.
    fn create_instance(&self, template_world: &str, owner: &str, position: Position) -> Option<String>;
    /// Move `player_name` into the existing instance `world`.
    fn apparate(&self, world: &str, player_name: &str, position: Position) -> bool;
}

/// Every collaborator handle the engine needs, supplied once at startup.
#[derive(Clone)]
pub struct Collaborators {
    pub dialogs: Arc<dyn DialogLookup>,
    pub display: Arc<dyn BookDisplay>,
    pub messenger: Arc<dyn Messenger>,
    pub commands: Arc<dyn CommandExecutor>,
    /// `None` when teleports are not supported by the host
    pub teleporter: Option<Arc<dyn Teleporter>>,
    pub inventory: Arc<dyn InventoryService>,
    pub objectives: Arc<dyn ObjectiveService>,
    pub kill_counts: Arc<dyn KillCountService>,
    /// `None` when no instance service is installed
    pub instances: Option<Arc<dyn InstanceService>>,
}

/// Mock collaborators with no expectations set; any unexpected call panics.
#[cfg(test)]
pub(crate) struct MockCollaborators {
    pub dialogs: Arc<dyn DialogLookup>,
    pub display: MockBookDisplay,
    pub messenger: MockMessenger,
    pub commands: MockCommandExecutor,
    pub teleporter: Option<MockTeleporter>,
    pub inventory: MockInventoryService,
    pub objectives: MockObjectiveService,
    pub kill_counts: MockKillCountService,
    pub instances: Option<MockInstanceService>,
}

#[cfg(test)]
impl MockCollaborators {
    pub fn new(dialogs: Arc<dyn DialogLookup>) -> Self {
        Self {
            dialogs,
            display: MockBookDisplay::new(),
            messenger: MockMessenger::new(),
            commands: MockCommandExecutor::new(),
            teleporter: Some(MockTeleporter::new()),
            inventory: MockInventoryService::new(),
            objectives: MockObjectiveService::new(),
            kill_counts: MockKillCountService::new(),
            instances: None,
        }
    }

    pub fn build(self) -> Collaborators {
        Collaborators {
            dialogs: self.dialogs,
            display: Arc::new(self.display),
            messenger: Arc::new(self.messenger),
            commands: Arc::new(self.commands),
            teleporter: self
                .teleporter
                .map(|service| Arc::new(service) as Arc<dyn Teleporter>),
            inventory: Arc::new(self.inventory),
            objectives: Arc::new(self.objectives),
            kill_counts: Arc::new(self.kill_counts),
            instances: self
                .instances
                .map(|service| Arc::new(service) as Arc<dyn InstanceService>),
        }
    }
}
