use tokio::sync::mpsc;
use tracing::warn;

use crate::player::Player;
use crate::services::{BookDisplay, Messenger};
use crate::text::{BookView, StyledText};

/// Something the engine wants a player to see
#[derive(Debug)]
pub enum Delivery {
    Book { player: Player, book: BookView },
    Message { player: Player, message: StyledText },
}

/// Forwards books and messages to whoever holds the receiving end.
pub struct SandboxDisplay {
    tx: mpsc::UnboundedSender<Delivery>,
}

impl SandboxDisplay {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Delivery>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn deliver(&self, delivery: Delivery) {
        if self.tx.send(delivery).is_err() {
            warn!("Nobody is listening for deliveries, dropping one");
        }
    }
}

impl BookDisplay for SandboxDisplay {
    fn show(&self, player: &Player, book: BookView) {
        self.deliver(Delivery::Book {
            player: player.clone(),
            book,
        });
    }
}

impl Messenger for SandboxDisplay {
    fn notify(&self, player: &Player, message: StyledText) {
        self.deliver(Delivery::Message {
            player: player.clone(),
            message,
        });
    }
}
