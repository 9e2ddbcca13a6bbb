use std::fmt;

use uuid::Uuid;

/// The player acting in a conversation.
///
/// Only identity is carried; inventories, positions and the rest live in
/// the world services.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Player {
    pub id: Uuid,
    pub name: String,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }

    pub fn with_id(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
