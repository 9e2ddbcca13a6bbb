//! Terminal front-end for talking to NPCs in the sandbox.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use colored::{Color, ColoredString, Colorize};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use super::display::Delivery;
use super::world::SandboxWorld;
use crate::dialog::HotReloadEvent;
use crate::error::{StorytellerError, StorytellerResult};
use crate::player::Player;
use crate::render::BookGenerator;
use crate::text::{BookView, StyledText, TextColor, TextSpan};

const HELP: &str = "\
  <n>             click button n on the current page
  next / prev     turn the page
  talk <name>     talk to an NPC
  open <id>       open a dialog by id
  kill <target>   count a kill
  state           show inventory, objective, kill counts and location
  quit";

/// What the session wants printed after one input line
#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
    Output(String),
    Quit,
}

pub struct ConsoleSession {
    player: Player,
    generator: BookGenerator,
    world: Arc<SandboxWorld>,
    deliveries: mpsc::UnboundedReceiver<Delivery>,
    default_greeting: bool,
    book: Option<BookView>,
    page: usize,
}

impl ConsoleSession {
    pub fn new(
        player: Player,
        generator: BookGenerator,
        world: Arc<SandboxWorld>,
        deliveries: mpsc::UnboundedReceiver<Delivery>,
        default_greeting: bool,
    ) -> Self {
        Self {
            player,
            generator,
            world,
            deliveries,
            default_greeting,
            book: None,
            page: 0,
        }
    }

    pub fn book(&self) -> Option<&BookView> {
        self.book.as_ref()
    }

    pub fn page_index(&self) -> usize {
        self.page
    }

    /// Read commands from stdin until `quit` or EOF, printing hot-reload
    /// events as they arrive. `opening` is talked to before the first prompt.
    pub async fn run(
        mut self,
        opening: Option<&str>,
        mut reloads: Option<mpsc::Receiver<HotReloadEvent>>,
    ) -> StorytellerResult<()> {
        println!("  {} as {}", "Storyteller".bold(), self.player.name.cyan());
        println!("  Type 'help' for commands, 'quit' to exit.\n");
        if let Some(name) = opening {
            println!("{}\n", self.talk(name));
        }

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("> ");
            std::io::stdout().flush().map_err(terminal_error)?;

            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.map_err(terminal_error)? else {
                        break;
                    };
                    match self.process(&line) {
                        Reply::Quit => break,
                        Reply::Output(output) if output.is_empty() => {}
                        Reply::Output(output) => println!("{output}\n"),
                    }
                }
                Some(event) = next_reload(&mut reloads) => {
                    println!("\n{}", describe_reload(&event));
                }
            }
        }

        Ok(())
    }

    /// Handle one input line
    pub fn process(&mut self, input: &str) -> Reply {
        let input = input.trim();
        let (command, rest) = input
            .split_once(char::is_whitespace)
            .map(|(command, rest)| (command, rest.trim()))
            .unwrap_or((input, ""));

        let output = match command.to_lowercase().as_str() {
            "" => String::new(),
            "quit" | "q" => return Reply::Quit,
            "help" => HELP.to_string(),
            "next" => self.turn(1),
            "prev" => self.turn(-1),
            "talk" if !rest.is_empty() => self.talk(rest),
            "open" if !rest.is_empty() => {
                self.generator.dispatcher().change_dialog(&self.player, rest);
                self.drain()
            }
            "kill" if !rest.is_empty() => {
                let counted = self.world.record_kill(&self.player, rest);
                format!("{} counted by {} kill count(s)", rest, counted)
            }
            "state" => self.describe_state(),
            other => match other.parse::<usize>() {
                Ok(number) => self.click(number),
                Err(_) => format!("Unknown command '{}'", input).yellow().to_string(),
            },
        };

        Reply::Output(output)
    }

    pub fn talk(&mut self, name: &str) -> String {
        if self.generator.display_book(&self.player, name) {
            return self.drain();
        }
        if !self.default_greeting {
            return format!("{} has nothing to say.", name);
        }
        self.open_book(BookGenerator::default_book(&self.player));
        self.render_current()
    }

    fn click(&mut self, number: usize) -> String {
        let action = self
            .book
            .as_ref()
            .and_then(|book| book.page(self.page))
            .and_then(|page| number.checked_sub(1).and_then(|i| page.clickables().get(i).copied().cloned()));

        match action {
            Some(action) => {
                action.click(&self.player);
                self.drain()
            }
            None => format!("No button {} on this page", number).yellow().to_string(),
        }
    }

    fn turn(&mut self, delta: isize) -> String {
        let Some(book) = &self.book else {
            return "No book open.".to_string();
        };
        match self.page.checked_add_signed(delta) {
            Some(page) if page < book.page_count() => {
                self.page = page;
                self.render_current()
            }
            _ => "No more pages that way.".to_string(),
        }
    }

    fn open_book(&mut self, book: BookView) {
        self.book = Some(book);
        self.page = 0;
    }

    /// Apply everything the engine delivered since the last call and
    /// describe it.
    fn drain(&mut self) -> String {
        let mut out = Vec::new();
        let mut opened = false;
        while let Ok(delivery) = self.deliveries.try_recv() {
            match delivery {
                Delivery::Book { player, book } if player.id == self.player.id => {
                    self.open_book(book);
                    opened = true;
                }
                Delivery::Message { player, message } if player.id == self.player.id => {
                    out.push(render_text(&message));
                }
                _ => {}
            }
        }
        if opened {
            out.push(self.render_current());
        }
        out.join("\n")
    }

    fn render_current(&self) -> String {
        match self.book.as_ref().and_then(|book| book.page(self.page).map(|page| (book, page))) {
            Some((book, page)) => format!(
                "{}\n{}",
                format!("--- page {}/{} ---", self.page + 1, book.page_count()).dimmed(),
                render_page(page)
            ),
            None => "This book is empty.".to_string(),
        }
    }

    fn describe_state(&self) -> String {
        let state = self.world.state(&self.player);
        let mut lines = vec![format!(
            "{} {} ({})",
            "Location:".bold(),
            state.location.world,
            state.location.position
        )];

        lines.push(format!(
            "{} {}",
            "Objective:".bold(),
            state.objective.as_deref().unwrap_or("none")
        ));

        let inventory = if state.inventory.is_empty() {
            "empty".to_string()
        } else {
            state
                .inventory
                .iter()
                .map(|(item, count)| format!("{} x{}", item, count))
                .collect::<Vec<_>>()
                .join(", ")
        };
        lines.push(format!("{} {}", "Inventory:".bold(), inventory));

        for counter in &state.kill_counts {
            lines.push(format!(
                "{} {} for {}: {} since {}",
                "Kill count".bold(),
                counter.target,
                counter.label,
                counter.kills,
                counter.started_at.format("%H:%M:%S")
            ));
        }
        lines.join("\n")
    }
}

fn terminal_error(source: std::io::Error) -> StorytellerError {
    StorytellerError::Io {
        path: PathBuf::from("<terminal>"),
        source,
    }
}

async fn next_reload(reloads: &mut Option<mpsc::Receiver<HotReloadEvent>>) -> Option<HotReloadEvent> {
    match reloads {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

fn describe_reload(event: &HotReloadEvent) -> String {
    match event {
        HotReloadEvent::Reloaded { path, dialogs } => {
            format!("Reloaded {} dialog(s) after change to {:?}", dialogs, path)
                .green()
                .to_string()
        }
        HotReloadEvent::Error(message) => format!("Reload failed: {}", message).red().to_string(),
    }
}

/// Render a page, numbering each button from 1
fn render_page(page: &StyledText) -> String {
    let mut out = String::new();
    let mut current_link = None;
    for span in page.spans() {
        let mut text = span.text;
        if span.link.is_some() && span.link != current_link {
            current_link = span.link;
            let trimmed = text.trim_start_matches('\n');
            out.push_str(&text[..text.len() - trimmed.len()]);
            if let Some(index) = span.link {
                out.push_str(&format!("[{}] ", index + 1).bold().to_string());
            }
            text = trimmed;
        }
        out.push_str(&paint(text, &span).to_string());
    }
    out
}

fn render_text(text: &StyledText) -> String {
    text.spans()
        .iter()
        .map(|span| paint(span.text, span).to_string())
        .collect()
}

fn paint(text: &str, span: &TextSpan<'_>) -> ColoredString {
    let mut painted = text.normal();
    if let Some(color) = span.color.filter(|color| *color != TextColor::Reset) {
        let (r, g, b) = color.rgb();
        painted = painted.color(Color::TrueColor { r, g, b });
    }
    let style = span.style;
    if style.bold {
        painted = painted.bold();
    }
    if style.italic {
        painted = painted.italic();
    }
    if style.underline {
        painted = painted.underline();
    }
    if style.strikethrough {
        painted = painted.strikethrough();
    }
    if style.obfuscated {
        painted = painted.dimmed();
    }
    painted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::{Action, ActionKind, Button, Dialog, DialogRegistry, Page};
    use crate::sandbox::{sandbox_collaborators, SandboxDisplay};

    fn session(dialogs: Vec<Dialog>, default_greeting: bool) -> (ConsoleSession, Arc<SandboxWorld>) {
        colored::control::set_override(false);
        let registry = Arc::new(DialogRegistry::with_dialogs(dialogs));
        let world = Arc::new(SandboxWorld::new());
        let (display, deliveries) = SandboxDisplay::channel();
        let generator = BookGenerator::from_collaborators(sandbox_collaborators(
            registry,
            world.clone(),
            Arc::new(display),
        ));
        let session = ConsoleSession::new(
            Player::new("Aria"),
            generator,
            world.clone(),
            deliveries,
            default_greeting,
        );
        (session, world)
    }

    fn elder() -> Vec<Dialog> {
        vec![
            Dialog::new("1")
                .with_trigger("Maren")
                .with_page(
                    Page::new("&6Welcome.").with_button(
                        Button::new("Take the bread")
                            .with_action(Action::new(ActionKind::GiveItem, "bread 2"))
                            .with_action(Action::new(ActionKind::OpenDialog, "2")),
                    ),
                )
                .with_page(Page::new("Page two")),
            Dialog::new("2").with_page(Page::new("Safe travels.")),
        ]
    }

    #[test]
    fn test_talk_and_click() {
        let (mut session, world) = session(elder(), true);

        let Reply::Output(output) = session.process("talk Maren") else {
            panic!("unexpected quit");
        };
        assert!(output.contains("Welcome."));
        assert!(output.contains("[1] Take the bread"));

        session.process("1");
        assert_eq!(world.item_count("Aria", "bread"), 2);
        assert_eq!(
            session.book().unwrap().plain_pages(),
            vec!["Safe travels.\n".to_string()]
        );
    }

    #[test]
    fn test_paging() {
        let (mut session, _) = session(elder(), true);

        assert_eq!(session.process("next"), Reply::Output("No book open.".to_string()));
        session.process("talk Maren");
        session.process("next");
        assert_eq!(session.page_index(), 1);
        session.process("next");
        assert_eq!(session.page_index(), 1);
        session.process("prev");
        assert_eq!(session.page_index(), 0);
    }

    #[test]
    fn test_unknown_npc() {
        let (mut greeted, _) = session(elder(), true);
        greeted.process("talk Stranger");
        assert_eq!(
            greeted.book().unwrap().plain_pages(),
            vec!["Salutations, Aria.".to_string()]
        );

        let (mut silent, _) = session(elder(), false);
        assert_eq!(
            silent.process("talk Stranger"),
            Reply::Output("Stranger has nothing to say.".to_string())
        );
        assert!(silent.book().is_none());
    }

    #[test]
    fn test_open_missing_dialog_reports_error() {
        let (mut session, _) = session(elder(), true);

        assert_eq!(
            session.process("open 99"),
            Reply::Output("The dialog at the index : 99 cannot be loaded.".to_string())
        );
        assert_eq!(session.process("QUIT"), Reply::Quit);
    }
}
