use std::sync::Arc;

use crate::dialog::{Dialog, DialogId};
use crate::player::Player;
use crate::services::DialogLookup;

/// Resolves dialogs for the renderer and for OPEN_DIALOG buttons
pub struct DialogAction {
    lookup: Arc<dyn DialogLookup>,
}

impl DialogAction {
    pub fn new(lookup: Arc<dyn DialogLookup>) -> Self {
        Self { lookup }
    }

    /// Dialog stored under `identifier`
    pub fn get_dialog(&self, identifier: &str) -> Option<Arc<Dialog>> {
        self.lookup.by_id(&DialogId::new(identifier))
    }

    /// Dialog an NPC or event called `trigger` opens for `player`
    pub fn get_dialog_by_trigger(&self, trigger: &str, player: &Player) -> Option<Arc<Dialog>> {
        self.lookup.by_trigger(trigger, player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::DialogRegistry;

    #[test]
    fn test_identifier_is_trimmed_before_lookup() {
        let registry = DialogRegistry::with_dialogs([Dialog::new("intro").with_trigger("Maren")]);
        let action = DialogAction::new(Arc::new(registry));

        assert!(action.get_dialog(" intro ").is_some());
        assert!(action.get_dialog("outro").is_none());
        assert!(action.get_dialog_by_trigger("Maren", &Player::new("Aria")).is_some());
    }
}
