use std::sync::Arc;

use crate::dialog::Dialog;

/// Ambient data a rendered button carries into its click callback.
///
/// Rebuilt on every render from the dialog being shown; never stored
/// server-side and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationContext {
    npc_names: Arc<[String]>,
}

impl ConversationContext {
    pub fn new(npc_names: impl IntoIterator<Item = String>) -> Self {
        Self {
            npc_names: npc_names.into_iter().collect(),
        }
    }

    /// Context for a dialog: the NPCs involved are its trigger names
    pub fn from_dialog(dialog: &Dialog) -> Self {
        Self::new(dialog.triggers.iter().cloned())
    }

    pub fn npc_names(&self) -> &[String] {
        &self.npc_names
    }

    /// Label under which kill counters started from this conversation are
    /// kept: all NPC names concatenated.
    pub fn kill_count_label(&self) -> String {
        self.npc_names.concat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_concatenates_names() {
        let dialog = Dialog::new("hunt").with_trigger("Maren").with_trigger("Guard");
        let context = ConversationContext::from_dialog(&dialog);

        assert_eq!(context.npc_names(), ["Maren".to_string(), "Guard".to_string()]);
        assert_eq!(context.kill_count_label(), "MarenGuard");
        assert_eq!(ConversationContext::default().kill_count_label(), "");
    }
}
