//! Action dispatch.
//!
//! A clicked button hands its action list to [`ActionDispatcher::dispatch`],
//! which routes each action, in order, to the matching handler.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::action::ActionHandlers;
use crate::context::ConversationContext;
use crate::dialog::{Action, ActionKind};
use crate::error::{ServiceError, StorytellerResult};
use crate::player::Player;
use crate::render::BookGenerator;
use crate::services::{BookDisplay, Collaborators, Messenger};
use crate::text::{StyledText, TextColor};

/// A point in a world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.z)
    }
}

/// Parse exactly three numeric tokens into a position.
pub fn parse_position<S: AsRef<str>>(values: &[S]) -> Option<Position> {
    let parsed: Option<Vec<f64>> = match values {
        [_, _, _] => values
            .iter()
            .map(|value| value.as_ref().parse::<f64>().ok().filter(|n| n.is_finite()))
            .collect(),
        _ => None,
    };

    match parsed.as_deref() {
        Some(&[x, y, z]) => Some(Position::new(x, y, z)),
        _ => {
            let raw: Vec<&str> = values.iter().map(|value| value.as_ref()).collect();
            warn!("Invalid parameters provided for position: {:?}", raw);
            None
        }
    }
}

/// Split a `<world> <x> <y> <z>` argument. Tokens past the fourth are ignored.
fn parse_world_target(kind: &ActionKind, arg: &str) -> Option<(String, Position)> {
    let tokens: Vec<&str> = arg.split_whitespace().collect();
    if tokens.len() < 4 {
        warn!(
            "{} expects '<world> <x> <y> <z>', got '{}'",
            kind.name(),
            arg
        );
        return None;
    }
    parse_position(&tokens[1..4]).map(|position| (tokens[0].to_string(), position))
}

struct DispatcherInner {
    handlers: ActionHandlers,
    display: Arc<dyn BookDisplay>,
    messenger: Arc<dyn Messenger>,
}

/// Routes button actions to their handlers.
///
/// Cheap to clone; rendered buttons keep a clone inside their callbacks.
#[derive(Clone)]
pub struct ActionDispatcher {
    inner: Arc<DispatcherInner>,
}

impl ActionDispatcher {
    pub fn new(collaborators: Collaborators) -> Self {
        Self {
            inner: Arc::new(DispatcherInner {
                handlers: ActionHandlers::new(&collaborators),
                display: collaborators.display,
                messenger: collaborators.messenger,
            }),
        }
    }

    pub fn handlers(&self) -> &ActionHandlers {
        &self.inner.handlers
    }

    pub(crate) fn display(&self) -> &dyn BookDisplay {
        self.inner.display.as_ref()
    }

    /// Run `actions` in order for `player`.
    ///
    /// Unknown kinds, malformed arguments and unavailable services are
    /// skipped. A rejection stops the remaining actions and is returned.
    pub fn dispatch(
        &self,
        player: &Player,
        actions: &[Action],
        context: &ConversationContext,
    ) -> StorytellerResult<()> {
        let handlers = self.handlers();

        for action in actions {
            let arg = action.arg.as_str();
            let result = match &action.kind {
                ActionKind::OpenDialog => {
                    self.change_dialog(player, arg);
                    Ok(())
                }
                ActionKind::ExecuteCommand => handlers.misc.execute_command(player, arg),
                ActionKind::Teleport => handlers.misc.teleport(player, arg),
                ActionKind::GiveItem => handlers.misc.give_item(player, arg),
                ActionKind::RemoveItem => handlers.misc.remove_item(player, arg),
                ActionKind::SetObjective => handlers.objective.set_objective(player, arg),
                ActionKind::StartKillCount => {
                    handlers
                        .kill_count
                        .start_kill_count(player, &context.kill_count_label(), arg)
                }
                ActionKind::StopKillCount => {
                    handlers
                        .kill_count
                        .stop_kill_count(player, &context.kill_count_label(), arg)
                }
                ActionKind::CreateInstance => {
                    if let Some((world, position)) = parse_world_target(&action.kind, arg) {
                        handlers.instance.create_instance(&player.name, &world, position);
                    }
                    Ok(())
                }
                ActionKind::Apparate => {
                    if let Some((world, position)) = parse_world_target(&action.kind, arg) {
                        handlers.instance.apparate_player(&player.name, &world, position);
                    }
                    Ok(())
                }
                ActionKind::Unknown(name) => {
                    debug!("Skipping unknown action '{}' for {}", name, player);
                    Ok(())
                }
            };

            match result {
                Ok(()) => {}
                Err(e @ (ServiceError::InvalidArgument(_) | ServiceError::Unavailable(_))) => {
                    warn!("Skipping {} '{}' for {}: {}", action.kind.name(), arg, player, e);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(())
    }

    /// Show the dialog stored under `dialog_index`, or tell the player it
    /// could not be loaded. True if a book was shown.
    pub fn change_dialog(&self, player: &Player, dialog_index: &str) -> bool {
        match self.handlers().dialog.get_dialog(dialog_index) {
            Some(dialog) => {
                let book = BookGenerator::new(self.clone()).generate_dialog(&dialog);
                self.display().show(player, book);
                true
            }
            None => {
                warn!("Dialog '{}' requested by {} does not exist", dialog_index, player);
                let message = StyledText::builder()
                    .content(format!(
                        "The dialog at the index : {} cannot be loaded.",
                        dialog_index
                    ))
                    .color(TextColor::Red)
                    .build();
                self.inner.messenger.notify(player, message);
                false
            }
        }
    }
}
