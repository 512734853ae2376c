//! Record shapes returned by the entity lookup tables.
//!
//! Field names on the wire follow the upstream data files (`baseStats`,
//! `shortDesc`, ability slots `0`/`1`/`H`).

use serde::Deserialize;
use std::fmt;

/// Species record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Species {
    #[serde(alias = "name")]
    pub species: String,
    pub types: Vec<String>,
    #[serde(rename = "baseStats")]
    pub base_stats: BaseStats,
    #[serde(default)]
    pub abilities: AbilitySlots,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct BaseStats {
    pub hp: u32,
    pub atk: u32,
    pub def: u32,
    pub spa: u32,
    pub spd: u32,
    pub spe: u32,
}

impl BaseStats {
    /// Stats in display order, labelled.
    pub fn labelled(&self) -> [(&'static str, u32); 6] {
        [
            ("HP", self.hp),
            ("Atk", self.atk),
            ("Def", self.def),
            ("SpA", self.spa),
            ("SpD", self.spd),
            ("Spe", self.spe),
        ]
    }

    /// Base stat total.
    pub fn total(&self) -> u32 {
        self.labelled().iter().map(|(_, v)| v).sum()
    }
}

/// Abilities by slot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct AbilitySlots {
    #[serde(rename = "0")]
    pub slot0: Option<String>,
    #[serde(rename = "1")]
    pub slot1: Option<String>,
    #[serde(rename = "H")]
    pub hidden: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Item {
    pub name: String,
    #[serde(default)]
    pub desc: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Ability {
    pub name: String,
    #[serde(rename = "shortDesc")]
    pub short_desc: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

impl fmt::Display for MoveCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Physical => "Physical",
            Self::Special => "Special",
            Self::Status => "Status",
        })
    }
}

/// Move accuracy: a percentage, or a move that never misses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "RawAccuracy")]
pub enum Accuracy {
    Percent(u32),
    AlwaysHits,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAccuracy {
    Percent(u32),
    Flag(bool),
}

impl From<RawAccuracy> for Accuracy {
    fn from(raw: RawAccuracy) -> Self {
        match raw {
            RawAccuracy::Percent(p) => Self::Percent(p),
            RawAccuracy::Flag(_) => Self::AlwaysHits,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Move {
    pub name: String,
    pub category: MoveCategory,
    #[serde(rename = "type")]
    pub move_type: String,
    #[serde(rename = "basePower", default)]
    pub base_power: u32,
    pub accuracy: Accuracy,
    pub pp: u32,
    #[serde(rename = "shortDesc")]
    pub short_desc: String,
}

/// One record of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum DexRecord {
    Species(Species),
    Item(Item),
    Ability(Ability),
    Move(Move),
}
