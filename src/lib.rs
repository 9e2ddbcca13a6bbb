//! Storyteller: data-driven NPC dialogs.
//!
//! Dialogs are loaded from TOML/JSON files into a [`DialogRegistry`],
//! rendered into clickable books by [`BookGenerator`], and their buttons
//! run through [`ActionDispatcher`] against host-supplied
//! [`Collaborators`].

pub mod action;
pub mod config;
pub mod context;
pub mod dialog;
pub mod dispatch;
pub mod error;
pub mod player;
pub mod render;
pub mod sandbox;
pub mod services;
pub mod text;

pub use config::StorytellerConfig;
pub use context::ConversationContext;
pub use dialog::{Action, ActionKind, Button, Dialog, DialogId, DialogRegistry, HotReloadEvent, Page};
pub use dispatch::{parse_position, ActionDispatcher, Position};
pub use error::{ServiceError, StorytellerError, StorytellerResult};
pub use player::Player;
pub use render::BookGenerator;
pub use services::Collaborators;
pub use text::{BookView, StyledText, TextColor};
