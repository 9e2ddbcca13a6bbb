//! In-memory game world backing every collaborator port.
//!
//! State is keyed by player name, the only player handle the instance
//! port carries.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::{debug, info};

use super::instance::InstanceManager;
use crate::dispatch::{parse_position, Position};
use crate::error::ServiceError;
use crate::player::Player;
use crate::services::{
    CommandExecutor, InstanceService, InventoryService, KillCountService, ObjectiveService,
    Teleporter,
};

pub const DEFAULT_WORLD: &str = "world";

/// Where a player stands
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub world: String,
    pub position: Position,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            world: DEFAULT_WORLD.to_string(),
            position: Position::new(0.0, 0.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct KillCountKey {
    player: String,
    label: String,
    target: String,
}

#[derive(Debug, Clone)]
pub struct KillCounter {
    pub label: String,
    pub target: String,
    pub kills: u32,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CommandRecord {
    pub player: String,
    pub command: String,
    pub at: DateTime<Utc>,
}

/// Everything the sandbox knows about one player
#[derive(Debug, Clone, Default)]
pub struct PlayerState {
    /// Sorted by item name
    pub inventory: Vec<(String, u32)>,
    pub objective: Option<String>,
    pub kill_counts: Vec<KillCounter>,
    pub location: Location,
    pub commands: Vec<String>,
}

#[derive(Default)]
pub struct SandboxWorld {
    inventories: DashMap<String, HashMap<String, u32>>,
    objectives: DashMap<String, String>,
    kill_counts: DashMap<KillCountKey, KillCounter>,
    locations: DashMap<String, Location>,
    commands: Mutex<Vec<CommandRecord>>,
    instances: InstanceManager,
}

/// Split `"<item> [count]"`; the count defaults to 1.
fn parse_item(arg: &str) -> Result<(String, u32), ServiceError> {
    let tokens: Vec<&str> = arg.split_whitespace().collect();
    let (name, count) = match tokens.split_last() {
        None => return Err(ServiceError::InvalidArgument("empty item".to_string())),
        Some((last, rest)) if !rest.is_empty() => match last.parse::<u32>() {
            Ok(count) => (rest.join(" "), count),
            Err(_) => (tokens.join(" "), 1),
        },
        Some((last, _)) => (last.to_string(), 1),
    };

    if count == 0 {
        return Err(ServiceError::InvalidArgument(format!("zero count in '{}'", arg)));
    }
    Ok((name, count))
}

/// `"x y z"` keeps the current world, `"world x y z"` switches to it.
fn parse_teleport(arg: &str, current_world: &str) -> Result<Location, ServiceError> {
    let tokens: Vec<&str> = arg.split_whitespace().collect();
    let (world, coordinates) = match tokens.len() {
        3 => (current_world, &tokens[..]),
        4 => (tokens[0], &tokens[1..]),
        _ => return Err(ServiceError::InvalidArgument(format!("bad teleport target '{}'", arg))),
    };

    parse_position(coordinates)
        .map(|position| Location {
            world: world.to_string(),
            position,
        })
        .ok_or_else(|| ServiceError::InvalidArgument(format!("bad coordinates in '{}'", arg)))
}

impl SandboxWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instances(&self) -> &InstanceManager {
        &self.instances
    }

    pub fn location(&self, player_name: &str) -> Location {
        self.locations
            .get(player_name)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    pub fn item_count(&self, player_name: &str, item: &str) -> u32 {
        self.inventories
            .get(player_name)
            .and_then(|inventory| inventory.get(item).copied())
            .unwrap_or(0)
    }

    pub fn objective(&self, player_name: &str) -> Option<String> {
        self.objectives.get(player_name).map(|entry| entry.value().clone())
    }

    /// Count a kill towards every running counter of `player` for `target`
    pub fn record_kill(&self, player: &Player, target: &str) -> usize {
        let mut counted = 0;
        for mut entry in self.kill_counts.iter_mut() {
            if entry.key().player == player.name && entry.key().target == target {
                entry.value_mut().kills += 1;
                counted += 1;
            }
        }
        counted
    }

    pub fn command_log(&self) -> Vec<CommandRecord> {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn state(&self, player: &Player) -> PlayerState {
        let mut inventory: Vec<(String, u32)> = self
            .inventories
            .get(&player.name)
            .map(|items| items.iter().map(|(name, count)| (name.clone(), *count)).collect())
            .unwrap_or_default();
        inventory.sort();

        let mut kill_counts: Vec<KillCounter> = self
            .kill_counts
            .iter()
            .filter(|entry| entry.key().player == player.name)
            .map(|entry| entry.value().clone())
            .collect();
        kill_counts.sort_by(|a, b| a.started_at.cmp(&b.started_at));

        PlayerState {
            inventory,
            objective: self.objective(&player.name),
            kill_counts,
            location: self.location(&player.name),
            commands: self
                .command_log()
                .into_iter()
                .filter(|record| record.player == player.name)
                .map(|record| record.command)
                .collect(),
        }
    }

    fn move_player(&self, player_name: &str, location: Location) {
        debug!("{} now at {} ({})", player_name, location.world, location.position);
        self.locations.insert(player_name.to_string(), location);
    }
}

impl CommandExecutor for SandboxWorld {
    fn execute(&self, player: &Player, command: &str) -> Result<(), ServiceError> {
        let command = command.trim();
        if command.is_empty() {
            return Err(ServiceError::InvalidArgument("empty command".to_string()));
        }

        info!("[{}] /{}", player, command);
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(CommandRecord {
                player: player.name.clone(),
                command: command.to_string(),
                at: Utc::now(),
            });
        Ok(())
    }
}

impl Teleporter for SandboxWorld {
    fn teleport(&self, player: &Player, target: &str) -> Result<(), ServiceError> {
        let current = self.location(&player.name);
        let location = parse_teleport(target, &current.world)?;
        if location.world != current.world {
            self.instances.leave(&player.name);
        }
        self.move_player(&player.name, location);
        Ok(())
    }
}

impl InventoryService for SandboxWorld {
    fn give_item(&self, player: &Player, item: &str) -> Result<(), ServiceError> {
        let (name, count) = parse_item(item)?;
        *self
            .inventories
            .entry(player.name.clone())
            .or_default()
            .entry(name)
            .or_insert(0) += count;
        Ok(())
    }

    fn remove_item(&self, player: &Player, item: &str) -> Result<(), ServiceError> {
        let (name, count) = parse_item(item)?;
        let mut inventory = self.inventories.entry(player.name.clone()).or_default();

        let held = inventory.get(&name).copied().unwrap_or(0);
        if held < count {
            return Err(ServiceError::Rejected(format!(
                "{} holds {} {}, needs {}",
                player, held, name, count
            )));
        }

        if held == count {
            inventory.remove(&name);
        } else {
            inventory.insert(name, held - count);
        }
        Ok(())
    }
}

impl ObjectiveService for SandboxWorld {
    fn set_objective(&self, player: &Player, objective: &str) -> Result<(), ServiceError> {
        info!("{} objective: {}", player, objective);
        self.objectives.insert(player.name.clone(), objective.to_string());
        Ok(())
    }
}

impl KillCountService for SandboxWorld {
    /// Starting a running counter restarts it from zero.
    fn start_kill_count(&self, player: &Player, label: &str, target: &str) -> Result<(), ServiceError> {
        let key = KillCountKey {
            player: player.name.clone(),
            label: label.to_string(),
            target: target.to_string(),
        };
        self.kill_counts.insert(
            key,
            KillCounter {
                label: label.to_string(),
                target: target.to_string(),
                kills: 0,
                started_at: Utc::now(),
            },
        );
        Ok(())
    }

    fn stop_kill_count(&self, player: &Player, label: &str, target: &str) -> Result<(), ServiceError> {
        let key = KillCountKey {
            player: player.name.clone(),
            label: label.to_string(),
            target: target.to_string(),
        };
        match self.kill_counts.remove(&key) {
            Some((_, counter)) => info!("{} stopped counting {} at {} kills", player, target, counter.kills),
            None => debug!("{} had no '{}' kill count for {}", player, target, label),
        }
        Ok(())
    }
}

impl InstanceService for SandboxWorld {
    fn create_instance(&self, template_world: &str, owner: &str, position: Position) -> Option<String> {
        let instance = self.instances.create(template_world, owner, position)?;
        self.move_player(
            owner,
            Location {
                world: instance.id.clone(),
                position,
            },
        );
        Some(instance.id.clone())
    }

    fn apparate(&self, world: &str, player_name: &str, position: Position) -> bool {
        if !self.instances.apparate(world, player_name, position) {
            return false;
        }
        self.move_player(
            player_name,
            Location {
                world: world.to_string(),
                position,
            },
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item() {
        assert_eq!(parse_item("bread"), Ok(("bread".to_string(), 1)));
        assert_eq!(parse_item("  bread 3 "), Ok(("bread".to_string(), 3)));
        assert_eq!(parse_item("iron sword"), Ok(("iron sword".to_string(), 1)));
        assert_eq!(parse_item("iron sword 2"), Ok(("iron sword".to_string(), 2)));
        assert!(matches!(parse_item(""), Err(ServiceError::InvalidArgument(_))));
        assert!(matches!(parse_item("bread 0"), Err(ServiceError::InvalidArgument(_))));
    }

    #[test]
    fn test_inventory() {
        let world = SandboxWorld::new();
        let aria = Player::new("Aria");

        world.give_item(&aria, "gold 10").unwrap();
        world.give_item(&aria, "gold").unwrap();
        assert_eq!(world.item_count("Aria", "gold"), 11);

        world.remove_item(&aria, "gold 11").unwrap();
        assert_eq!(world.item_count("Aria", "gold"), 0);
        assert!(matches!(
            world.remove_item(&aria, "gold"),
            Err(ServiceError::Rejected(_))
        ));
        assert!(world.state(&aria).inventory.is_empty());
    }

    #[test]
    fn test_objective_last_write_wins() {
        let world = SandboxWorld::new();
        let aria = Player::new("Aria");

        world.set_objective(&aria, "a").unwrap();
        world.set_objective(&aria, "b").unwrap();
        assert_eq!(world.objective("Aria").as_deref(), Some("b"));
        assert_eq!(world.objective("Bram"), None);
    }

    #[test]
    fn test_kill_counts_are_per_label() {
        let world = SandboxWorld::new();
        let aria = Player::new("Aria");

        world.start_kill_count(&aria, "Maren", "wolf").unwrap();
        world.start_kill_count(&aria, "Guard", "wolf").unwrap();
        assert_eq!(world.record_kill(&aria, "wolf"), 2);
        assert_eq!(world.record_kill(&aria, "bear"), 0);

        world.stop_kill_count(&aria, "Guard", "wolf").unwrap();
        world.stop_kill_count(&aria, "Guard", "wolf").unwrap();

        let state = world.state(&aria);
        assert_eq!(state.kill_counts.len(), 1);
        assert_eq!(state.kill_counts[0].label, "Maren");
        assert_eq!(state.kill_counts[0].kills, 1);
    }

    #[test]
    fn test_teleport() {
        let world = SandboxWorld::new();
        let aria = Player::new("Aria");

        world.teleport(&aria, "10 64 -4").unwrap();
        assert_eq!(
            world.location("Aria"),
            Location {
                world: DEFAULT_WORLD.to_string(),
                position: Position::new(10.0, 64.0, -4.0),
            }
        );

        world.teleport(&aria, "nether 1 2 3").unwrap();
        assert_eq!(world.location("Aria").world, "nether");

        assert!(matches!(
            world.teleport(&aria, "somewhere"),
            Err(ServiceError::InvalidArgument(_))
        ));
        assert!(matches!(
            world.teleport(&aria, "1 up 3"),
            Err(ServiceError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_commands_are_logged() {
        let world = SandboxWorld::new();
        let aria = Player::new("Aria");

        world.execute(&aria, " weather clear ").unwrap();
        assert!(world.execute(&aria, "  ").is_err());
        assert_eq!(world.state(&aria).commands, vec!["weather clear".to_string()]);
    }

    #[test]
    fn test_instances_move_the_player() {
        let world = SandboxWorld::new();
        let position = Position::new(3.0, 70.0, 3.0);

        let id = world.create_instance("crypt", "Aria", position).unwrap();
        assert_eq!(world.location("Aria").world, id);

        assert!(world.apparate(&id, "Bram", position));
        assert_eq!(world.location("Bram").world, id);
        assert!(!world.apparate("missing", "Bram", position));
        assert_eq!(world.instances().get(&id).unwrap().player_count(), 2);
    }
}
