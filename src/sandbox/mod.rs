//! Sandbox Host
//!
//! In-memory implementations of every collaborator port plus a terminal
//! session, so dialogs can be played through without a game server.

pub mod console;
pub mod display;
pub mod instance;
pub mod world;

pub use console::{ConsoleSession, Reply};
pub use display::{Delivery, SandboxDisplay};
pub use instance::{Instance, InstanceManager};
pub use world::{Location, PlayerState, SandboxWorld};

use std::sync::Arc;

use crate::services::{Collaborators, DialogLookup};

/// Wire the sandbox world and display into a full collaborator set
pub fn sandbox_collaborators(
    dialogs: Arc<dyn DialogLookup>,
    world: Arc<SandboxWorld>,
    display: Arc<SandboxDisplay>,
) -> Collaborators {
    Collaborators {
        dialogs,
        display: display.clone(),
        messenger: display,
        commands: world.clone(),
        teleporter: Some(world.clone()),
        inventory: world.clone(),
        objectives: world.clone(),
        kill_counts: world.clone(),
        instances: Some(world),
    }
}
