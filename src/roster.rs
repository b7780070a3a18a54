//! Online players: the lookup behind the `%player%` keyword

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

/// A player currently online
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    pub joined_at: DateTime<Utc>,
}

/// Lookup of currently online players
///
/// Implementations must be safe to read from many dispatches at once.
pub trait Roster: Send + Sync {
    /// Find an online player by name
    fn find(&self, name: &str) -> Option<Player>;

    /// Names of every online player, in a stable order
    fn online(&self) -> Vec<String>;
}

/// Concurrent in-memory roster keyed by lower-cased name
#[derive(Debug, Default)]
pub struct OnlineRoster {
    players: DashMap<String, Player>,
}

impl OnlineRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a player online; returns the existing entry if already joined
    pub fn join(&self, name: &str) -> Player {
        self.players
            .entry(name.to_lowercase())
            .or_insert_with(|| Player {
                id: Uuid::new_v4(),
                name: name.to_string(),
                joined_at: Utc::now(),
            })
            .value()
            .clone()
    }

    /// Mark a player offline
    pub fn leave(&self, name: &str) -> Option<Player> {
        self.players.remove(&name.to_lowercase()).map(|(_, p)| p)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

impl Roster for OnlineRoster {
    fn find(&self, name: &str) -> Option<Player> {
        self.players.get(&name.to_lowercase()).map(|p| p.value().clone())
    }

    fn online(&self) -> Vec<String> {
        let mut names: Vec<String> = self.players.iter().map(|p| p.value().name.clone()).collect();
        names.sort_by_key(|n| n.to_lowercase());
        names
    }
}

/// A roster with nobody online
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyRoster;

impl Roster for EmptyRoster {
    fn find(&self, _name: &str) -> Option<Player> {
        None
    }

    fn online(&self) -> Vec<String> {
        Vec::new()
    }
}
