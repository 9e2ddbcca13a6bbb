//! Dialog Definition Structures
//!
//! Raw structures are deserialized from TOML/JSON dialog files and resolved
//! into the immutable `Dialog` tree the renderer and dispatcher work on.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::error::{StorytellerError, StorytellerResult};

/// A dialog file as it appears on disk
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDialogFile {
    #[serde(default, alias = "dialog")]
    pub dialogs: Vec<RawDialog>,
}

/// Dialog identifiers may be authored as integers or strings
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawDialogId {
    Number(i64),
    Text(String),
}

/// Raw dialog data as it appears in a dialog file
#[derive(Debug, Clone, Deserialize)]
pub struct RawDialog {
    pub id: RawDialogId,
    /// NPC or event names that open this dialog
    #[serde(default, alias = "trigger")]
    pub triggers: Vec<String>,
    #[serde(default)]
    pub pages: Vec<RawPage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPage {
    #[serde(default)]
    pub message: String,
    #[serde(default, alias = "button_bean_list")]
    pub buttons: Vec<RawButton>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawButton {
    #[serde(default)]
    pub text: String,
    pub color: Option<String>,
    #[serde(default)]
    pub actions: Vec<RawAction>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAction {
    pub name: String,
    #[serde(default)]
    pub arg: String,
}

// ============================================================================
// Resolved Dialog Structures
// ============================================================================

/// Identifier of a dialog inside the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DialogId(String);

impl DialogId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for DialogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DialogId {
    fn from(value: &str) -> Self {
        DialogId::new(value)
    }
}

impl From<i64> for DialogId {
    fn from(value: i64) -> Self {
        DialogId(value.to_string())
    }
}

impl From<&RawDialogId> for DialogId {
    fn from(raw: &RawDialogId) -> Self {
        match raw {
            RawDialogId::Number(n) => DialogId::from(*n),
            RawDialogId::Text(s) => DialogId::new(s),
        }
    }
}

/// Action vocabulary a button can carry.
///
/// Names outside the vocabulary are kept as `Unknown` so newer dialog files
/// still load; the dispatcher skips them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionKind {
    OpenDialog,
    ExecuteCommand,
    Teleport,
    GiveItem,
    RemoveItem,
    SetObjective,
    StartKillCount,
    StopKillCount,
    CreateInstance,
    Apparate,
    Unknown(String),
}

impl ActionKind {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_uppercase().as_str() {
            "OPEN_DIALOG" => ActionKind::OpenDialog,
            "EXECUTE_COMMAND" => ActionKind::ExecuteCommand,
            "TELEPORT" => ActionKind::Teleport,
            "GIVE_ITEM" => ActionKind::GiveItem,
            "REMOVE_ITEM" => ActionKind::RemoveItem,
            "SET_OBJECTIVE" => ActionKind::SetObjective,
            "START_KILL_COUNT" => ActionKind::StartKillCount,
            "STOP_KILL_COUNT" => ActionKind::StopKillCount,
            "CREATE_INSTANCE" => ActionKind::CreateInstance,
            "APPARATE" => ActionKind::Apparate,
            _ => ActionKind::Unknown(name.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ActionKind::OpenDialog => "OPEN_DIALOG",
            ActionKind::ExecuteCommand => "EXECUTE_COMMAND",
            ActionKind::Teleport => "TELEPORT",
            ActionKind::GiveItem => "GIVE_ITEM",
            ActionKind::RemoveItem => "REMOVE_ITEM",
            ActionKind::SetObjective => "SET_OBJECTIVE",
            ActionKind::StartKillCount => "START_KILL_COUNT",
            ActionKind::StopKillCount => "STOP_KILL_COUNT",
            ActionKind::CreateInstance => "CREATE_INSTANCE",
            ActionKind::Apparate => "APPARATE",
            ActionKind::Unknown(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ActionKind::Unknown(_))
    }
}

/// One named action plus its raw argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub kind: ActionKind,
    /// Interpretation depends on `kind`
    pub arg: String,
}

impl Action {
    pub fn new(kind: ActionKind, arg: impl Into<String>) -> Self {
        Self {
            kind,
            arg: arg.into(),
        }
    }

    pub fn from_raw(raw: &RawAction) -> Self {
        Self::new(ActionKind::from_name(&raw.name), raw.arg.clone())
    }
}

#[derive(Debug, Clone)]
pub struct Button {
    /// Label, may contain formatting codes
    pub text: String,
    /// Palette color name; applied only if it resolves
    pub color: Option<String>,
    /// Shared so rendered callbacks can hold the list without copying it
    pub actions: Arc<[Action]>,
}

impl Button {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
            actions: Arc::from(Vec::new()),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        let mut actions = self.actions.to_vec();
        actions.push(action);
        self.actions = actions.into();
        self
    }

    pub fn from_raw(raw: &RawButton) -> Self {
        Self {
            text: raw.text.clone(),
            color: raw.color.clone(),
            actions: raw.actions.iter().map(Action::from_raw).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Page {
    /// Body text, may contain formatting codes
    pub message: String,
    pub buttons: Vec<Button>,
}

impl Page {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            buttons: Vec::new(),
        }
    }

    pub fn with_button(mut self, button: Button) -> Self {
        self.buttons.push(button);
        self
    }

    pub fn from_raw(raw: &RawPage) -> Self {
        Self {
            message: raw.message.clone(),
            buttons: raw.buttons.iter().map(Button::from_raw).collect(),
        }
    }
}

/// A fully resolved dialog
#[derive(Debug, Clone)]
pub struct Dialog {
    pub id: DialogId,
    pub triggers: Vec<String>,
    pub pages: Vec<Page>,
}

impl Dialog {
    pub fn new(id: impl Into<DialogId>) -> Self {
        Self {
            id: id.into(),
            triggers: Vec::new(),
            pages: Vec::new(),
        }
    }

    pub fn with_trigger(mut self, trigger: impl Into<String>) -> Self {
        self.triggers.push(trigger.into());
        self
    }

    pub fn with_page(mut self, page: Page) -> Self {
        self.pages.push(page);
        self
    }

    /// Create a Dialog from raw file data
    pub fn from_raw(raw: &RawDialog) -> StorytellerResult<Self> {
        let id = DialogId::from(&raw.id);
        if id.is_empty() {
            return Err(StorytellerError::InvalidDialog(
                "dialog id must not be empty".to_string(),
            ));
        }

        Ok(Self {
            id,
            triggers: raw.triggers.iter().map(|t| t.trim().to_string()).collect(),
            pages: raw.pages.iter().map(Page::from_raw).collect(),
        })
    }

    pub fn has_trigger(&self, name: &str) -> bool {
        self.triggers.iter().any(|t| t == name)
    }

    /// Dialog ids this dialog can jump to through OPEN_DIALOG buttons
    pub fn linked_dialogs(&self) -> impl Iterator<Item = DialogId> + '_ {
        self.pages
            .iter()
            .flat_map(|page| page.buttons.iter())
            .flat_map(|button| button.actions.iter())
            .filter(|action| action.kind == ActionKind::OpenDialog)
            .map(|action| DialogId::new(&action.arg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[[dialogs]]
id = 7
triggers = ["Elder Maren"]

[[dialogs.pages]]
message = "&6Welcome."

[[dialogs.pages.buttons]]
text = "Go on"
color = "green"
actions = [
  { name = "SET_objective", arg = "a" },
  { name = "SET_OBJECTIVE", arg = "b" },
  { name = "DANCE", arg = "wildly" },
]

[[dialogs]]
id = "farewell"
trigger = ["Elder Maren", "Guard"]
"#;

    #[test]
    fn test_action_kind_parsing() {
        assert_eq!(ActionKind::from_name("OPEN_DIALOG"), ActionKind::OpenDialog);
        assert_eq!(ActionKind::from_name("apparate"), ActionKind::Apparate);
        assert_eq!(
            ActionKind::from_name("FLY_AWAY"),
            ActionKind::Unknown("FLY_AWAY".to_string())
        );
        assert!(!ActionKind::from_name("FLY_AWAY").is_known());
    }

    #[test]
    fn test_parse_dialog_file() {
        let raw: RawDialogFile = toml::from_str(SAMPLE).unwrap();
        let dialogs: Vec<Dialog> = raw.dialogs.iter().map(|d| Dialog::from_raw(d).unwrap()).collect();

        assert_eq!(dialogs.len(), 2);
        assert_eq!(dialogs[0].id, DialogId::new("7"));
        assert_eq!(dialogs[1].id.as_str(), "farewell");
        assert!(dialogs[1].has_trigger("Guard"));
        assert!(dialogs[1].pages.is_empty());

        let button = &dialogs[0].pages[0].buttons[0];
        assert_eq!(button.color.as_deref(), Some("green"));
        let kinds: Vec<_> = button.actions.iter().map(|a| a.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                ActionKind::SetObjective,
                ActionKind::SetObjective,
                ActionKind::Unknown("DANCE".to_string()),
            ]
        );
        let args: Vec<_> = button.actions.iter().map(|a| a.arg.as_str()).collect();
        assert_eq!(args, vec!["a", "b", "wildly"]);
    }

    #[test]
    fn test_empty_id_is_rejected() {
        let raw = RawDialog {
            id: RawDialogId::Text("  ".to_string()),
            triggers: Vec::new(),
            pages: Vec::new(),
        };
        assert!(matches!(
            Dialog::from_raw(&raw),
            Err(StorytellerError::InvalidDialog(_))
        ));
    }

    #[test]
    fn test_linked_dialogs() {
        let dialog = Dialog::new("start").with_page(
            Page::new("Hi")
                .with_button(Button::new("A").with_action(Action::new(ActionKind::OpenDialog, " 2 ")))
                .with_button(Button::new("B").with_action(Action::new(ActionKind::Teleport, "0 64 0"))),
        );

        let links: Vec<_> = dialog.linked_dialogs().collect();
        assert_eq!(links, vec![DialogId::new("2")]);
    }
}
