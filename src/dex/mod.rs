//! Entity lookup tables.
//!
//! The bot never owns game data; it asks a [`Dex`] for a record by kind and
//! normalised key. [`MemoryDex`] is the in-process table, filled either from
//! the upstream JSON files ([`MemoryDex::load_dir`]) or by hand in tests.

mod json;
mod records;

pub use json::DexError;
pub use records::{
    Ability, AbilitySlots, Accuracy, BaseStats, DexRecord, Item, Move, MoveCategory, Species,
};

use crate::error::LookupError;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// The four record kinds a data request can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    Pokemon,
    Item,
    Ability,
    Move,
}

impl DataKind {
    /// All kinds, in the order the `data` command tries them.
    pub const ALL: [DataKind; 4] = [Self::Pokemon, Self::Item, Self::Ability, Self::Move];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pokemon => "pokemon",
            Self::Item => "item",
            Self::Ability => "ability",
            Self::Move => "move",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataKind {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pokemon" => Ok(Self::Pokemon),
            "item" => Ok(Self::Item),
            "ability" => Ok(Self::Ability),
            "move" => Ok(Self::Move),
            other => Err(LookupError::UnknownDataKind(other.to_string())),
        }
    }
}

/// Normalise a name into a table key: lowercase ASCII alphanumerics only.
pub fn to_id(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Read-only keyed lookup over the game data tables.
pub trait Dex: Send + Sync {
    /// Fetch the record of `kind` stored under the normalised `key`.
    fn get(&self, kind: DataKind, key: &str) -> Option<DexRecord>;
}

/// In-memory tables keyed by normalised id.
#[derive(Debug, Default, Clone)]
pub struct MemoryDex {
    species: HashMap<String, Species>,
    items: HashMap<String, Item>,
    abilities: HashMap<String, Ability>,
    moves: HashMap<String, Move>,
}

impl MemoryDex {
    pub fn insert_species(&mut self, key: &str, species: Species) {
        self.species.insert(to_id(key), species);
    }

    pub fn insert_item(&mut self, key: &str, item: Item) {
        self.items.insert(to_id(key), item);
    }

    pub fn insert_ability(&mut self, key: &str, ability: Ability) {
        self.abilities.insert(to_id(key), ability);
    }

    pub fn insert_move(&mut self, key: &str, mv: Move) {
        self.moves.insert(to_id(key), mv);
    }

    /// Record counts per kind, for startup logging.
    pub fn counts(&self) -> [(DataKind, usize); 4] {
        [
            (DataKind::Pokemon, self.species.len()),
            (DataKind::Item, self.items.len()),
            (DataKind::Ability, self.abilities.len()),
            (DataKind::Move, self.moves.len()),
        ]
    }
}

impl Dex for MemoryDex {
    fn get(&self, kind: DataKind, key: &str) -> Option<DexRecord> {
        match kind {
            DataKind::Pokemon => self.species.get(key).cloned().map(DexRecord::Species),
            DataKind::Item => self.items.get(key).cloned().map(DexRecord::Item),
            DataKind::Ability => self.abilities.get(key).cloned().map(DexRecord::Ability),
            DataKind::Move => self.moves.get(key).cloned().map(DexRecord::Move),
        }
    }
}
