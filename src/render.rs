//! Book rendering.
//!
//! Turns a [`Dialog`] into a [`BookView`]: one book page per dialog page,
//! the page message first, then one clickable line per button.

use std::sync::Arc;

use tracing::{debug, error};

use crate::context::ConversationContext;
use crate::dialog::{Button, Dialog, Page};
use crate::dispatch::ActionDispatcher;
use crate::error::{StorytellerError, StorytellerResult};
use crate::player::Player;
use crate::services::Collaborators;
use crate::text::{BookView, ClickAction, FormattingCodes, StyledText, TextColor};

const BOOK_TITLE: &str = "Dialog";
const BOOK_AUTHOR: &str = "Storyteller";

/// Renders dialogs and binds their buttons to the dispatcher.
#[derive(Clone)]
pub struct BookGenerator {
    dispatcher: ActionDispatcher,
}

impl BookGenerator {
    pub fn new(dispatcher: ActionDispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn from_collaborators(collaborators: Collaborators) -> Self {
        Self::new(ActionDispatcher::new(collaborators))
    }

    pub fn dispatcher(&self) -> &ActionDispatcher {
        &self.dispatcher
    }

    /// Show `player` the dialog triggered by `entity_name`. False if no
    /// dialog matches; nothing is shown in that case.
    pub fn display_book(&self, player: &Player, entity_name: &str) -> bool {
        let Some(dialog) = self
            .dispatcher
            .handlers()
            .dialog
            .get_dialog_by_trigger(entity_name, player)
        else {
            debug!("No dialog for '{}' (talking: {})", entity_name, player);
            return false;
        };

        let book = self.generate_dialog(&dialog);
        self.dispatcher.display().show(player, book);
        true
    }

    pub fn generate_dialog(&self, dialog: &Dialog) -> BookView {
        let context = ConversationContext::from_dialog(dialog);
        dialog
            .pages
            .iter()
            .fold(
                BookView::builder().title(BOOK_TITLE).author(BOOK_AUTHOR),
                |book, page| book.add_page(self.generate_page(page, &context)),
            )
            .build()
    }

    /// Render the dialog stored under `identifier`
    pub fn generate_dialog_by_id(&self, identifier: &str) -> StorytellerResult<BookView> {
        self.dispatcher
            .handlers()
            .dialog
            .get_dialog(identifier)
            .map(|dialog| self.generate_dialog(&dialog))
            .ok_or_else(|| StorytellerError::DialogNotFound(identifier.trim().to_string()))
    }

    pub fn generate_page(&self, page: &Page, context: &ConversationContext) -> StyledText {
        page.buttons
            .iter()
            .fold(
                StyledText::builder()
                    .append(FormattingCodes::deserialize(&page.message))
                    .append("\n"),
                |text, button| text.append(self.generate_button(button, context)),
            )
            .build()
    }

    /// One line for `button`. Clicking it dispatches the button's actions;
    /// rendering itself never touches a collaborator.
    pub fn generate_button(&self, button: &Button, context: &ConversationContext) -> StyledText {
        let mut text = StyledText::builder()
            .content("\n")
            .append(FormattingCodes::deserialize(&button.text));

        if let Some(name) = &button.color {
            match TextColor::from_name(name) {
                Some(color) => text = text.color(color),
                None => debug!("Ignoring unknown button color '{}'", name),
            }
        }

        let dispatcher = self.dispatcher.clone();
        let actions = Arc::clone(&button.actions);
        let context = context.clone();
        text.on_click(ClickAction::execute_callback(move |player| {
            if let Err(e) = dispatcher.dispatch(player, &actions, &context) {
                error!("Button actions failed for {}: {}", player, e);
            }
        }))
        .build()
    }

    /// Fallback book for an NPC without a dialog
    pub fn default_book(player: &Player) -> BookView {
        let page = StyledText::of(format!("Salutations, {}.", player.name));
        BookView::builder()
            .title(BOOK_TITLE)
            .author(BOOK_AUTHOR)
            .add_page(page)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::dialog::{Action, ActionKind, DialogRegistry};
    use crate::services::MockCollaborators;

    fn sample_dialog() -> Dialog {
        Dialog::new("intro")
            .with_trigger("Elder Maren")
            .with_page(
                Page::new("&6Welcome, traveler.")
                    .with_button(
                        Button::new("Accept")
                            .with_color("green")
                            .with_action(Action::new(ActionKind::SetObjective, "a"))
                            .with_action(Action::new(ActionKind::SetObjective, "b")),
                    )
                    .with_button(Button::new("Leave").with_color("not-a-color")),
            )
            .with_page(Page::new("Second"))
    }

    fn generator(mocks: MockCollaborators) -> BookGenerator {
        BookGenerator::from_collaborators(mocks.build())
    }

    fn registry_mocks() -> MockCollaborators {
        MockCollaborators::new(Arc::new(DialogRegistry::with_dialogs([sample_dialog()])))
    }

    #[test]
    fn test_pages_follow_dialog_order() {
        // Rendering alone must not reach any collaborator; bare mocks panic if it does.
        let book = generator(registry_mocks()).generate_dialog(&sample_dialog());

        assert_eq!(book.page_count(), 2);
        assert_eq!(
            book.plain_pages(),
            vec!["Welcome, traveler.\n\nAccept\nLeave".to_string(), "Second\n".to_string()]
        );
    }

    #[test]
    fn test_buttons_follow_message() {
        let book = generator(registry_mocks()).generate_dialog(&sample_dialog());
        let page = book.page(0).unwrap();

        let children = page.children();
        assert_eq!(children.len(), 4);
        assert_eq!(children[0].to_plain(), "Welcome, traveler.");
        assert_eq!(children[1].to_plain(), "\n");
        assert_eq!(children[2].to_plain(), "\nAccept");
        assert_eq!(children[3].to_plain(), "\nLeave");
        assert_eq!(page.clickables().len(), 2);
    }

    #[test]
    fn test_button_color() {
        let book = generator(registry_mocks()).generate_dialog(&sample_dialog());
        let children = book.page(0).unwrap().children();

        assert_eq!(children[2].color(), Some(TextColor::Green));
        assert_eq!(children[3].color(), None);
    }

    #[test]
    fn test_click_dispatches_button_actions() {
        let mut mocks = registry_mocks();
        let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        mocks
            .objectives
            .expect_set_objective()
            .times(2)
            .returning(move |_, objective| {
                sink.lock().unwrap().push(objective.to_string());
                Ok(())
            });

        let book = generator(mocks).generate_dialog(&sample_dialog());
        let page = book.page(0).unwrap();
        assert!(seen.lock().unwrap().is_empty());

        page.clickables()[0].click(&Player::new("Aria"));
        assert_eq!(*seen.lock().unwrap(), vec!["a".to_string(), "b".to_string()]);

        // No actions on the second button
        page.clickables()[1].click(&Player::new("Aria"));
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_display_book_by_trigger() {
        let mut mocks = registry_mocks();
        mocks
            .display
            .expect_show()
            .withf(|player, book| player.name == "Aria" && book.page_count() == 2)
            .times(1)
            .return_const(());

        let generator = generator(mocks);
        let player = Player::new("Aria");
        assert!(generator.display_book(&player, "Elder Maren"));
        assert!(!generator.display_book(&player, "Stranger"));
    }

    #[test]
    fn test_generate_dialog_by_id() {
        let generator = generator(registry_mocks());

        assert_eq!(generator.generate_dialog_by_id("intro").unwrap().page_count(), 2);
        assert!(matches!(
            generator.generate_dialog_by_id("missing"),
            Err(StorytellerError::DialogNotFound(id)) if id == "missing"
        ));
    }

    #[test]
    fn test_default_book() {
        let book = BookGenerator::default_book(&Player::new("Aria"));

        assert_eq!(book.plain_pages(), vec!["Salutations, Aria.".to_string()]);
        assert!(book.page(0).unwrap().clickables().is_empty());
    }
}
