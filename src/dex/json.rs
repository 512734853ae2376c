//! Loading the upstream JSON data files.

use super::{Ability, Item, MemoryDex, Move, Species};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const POKEDEX_FILE: &str = "pokedex.json";
pub const ITEMS_FILE: &str = "items.json";
pub const ABILITIES_FILE: &str = "abilities.json";
pub const MOVES_FILE: &str = "moves.json";

/// Data file errors.
#[derive(Debug, Error)]
pub enum DexError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

fn load_table<T: DeserializeOwned>(path: &Path) -> Result<HashMap<String, T>, DexError> {
    let content = std::fs::read_to_string(path).map_err(|source| DexError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| DexError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl MemoryDex {
    /// Load all four tables from a directory of JSON objects keyed by id.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, DexError> {
        let dir = dir.as_ref();
        let mut dex = MemoryDex::default();

        for (key, species) in load_table::<Species>(&dir.join(POKEDEX_FILE))? {
            dex.insert_species(&key, species);
        }
        for (key, item) in load_table::<Item>(&dir.join(ITEMS_FILE))? {
            dex.insert_item(&key, item);
        }
        for (key, ability) in load_table::<Ability>(&dir.join(ABILITIES_FILE))? {
            dex.insert_ability(&key, ability);
        }
        for (key, mv) in load_table::<Move>(&dir.join(MOVES_FILE))? {
            dex.insert_move(&key, mv);
        }

        let [pokemon, items, abilities, moves] = dex.counts().map(|(_, n)| n);
        info!(
            path = %dir.display(),
            pokemon, items, abilities, moves,
            "Loaded data tables"
        );
        Ok(dex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dex::{DataKind, Dex, DexRecord};

    fn write(dir: &Path, name: &str, body: &str) {
        std::fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn test_load_dir() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            POKEDEX_FILE,
            r#"{"bulbasaur": {"species": "Bulbasaur", "types": ["Grass", "Poison"],
                "baseStats": {"hp": 45, "atk": 49, "def": 49, "spa": 65, "spd": 65, "spe": 45},
                "abilities": {"0": "Overgrow", "H": "Chlorophyll"}}}"#,
        );
        write(dir.path(), ITEMS_FILE, r#"{"leftovers": {"name": "Leftovers", "desc": "Heals."}}"#);
        write(dir.path(), ABILITIES_FILE, "{}");
        write(dir.path(), MOVES_FILE, "{}");

        let dex = MemoryDex::load_dir(dir.path()).unwrap();
        match dex.get(DataKind::Pokemon, "bulbasaur") {
            Some(DexRecord::Species(s)) => assert_eq!(s.types, vec!["Grass", "Poison"]),
            other => panic!("unexpected {other:?}"),
        }
        assert!(dex.get(DataKind::Item, "leftovers").is_some());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = MemoryDex::load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, DexError::Io { .. }));
        assert!(err.to_string().contains(POKEDEX_FILE));
    }
}
