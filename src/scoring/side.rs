//! Match participants as the scoring hooks see them.

use std::collections::HashSet;
use std::fmt;

/// Volatile status that forces the holder out before the next action.
pub const FORCED_SWITCH_VOLATILE: &str = "imprison";

/// One of the two side slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SideId {
    P1,
    P2,
}

impl SideId {
    pub const BOTH: [SideId; 2] = [Self::P1, Self::P2];

    pub fn token(&self) -> &'static str {
        match self {
            Self::P1 => "p1",
            Self::P2 => "p2",
        }
    }

    /// Parse a literal slot token (`p1` / `p2`).
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "p1" => Some(Self::P1),
            "p2" => Some(Self::P2),
            _ => None,
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Self::P1 => 0,
            Self::P2 => 1,
        }
    }
}

impl fmt::Display for SideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A combatant currently on the field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Combatant {
    pub name: String,
    pub fainted: bool,
    pub volatiles: HashSet<String>,
    /// Set when the combatant must be replaced before the next action.
    pub switch_flag: bool,
}

impl Combatant {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_volatile(mut self, volatile: &str) -> Self {
        self.volatiles.insert(volatile.to_string());
        self
    }

    pub fn fainted(mut self) -> Self {
        self.fainted = true;
        self
    }

    /// Whether the pre-turn check must force a switch.
    pub fn must_switch(&self) -> bool {
        self.fainted || self.volatiles.contains(FORCED_SWITCH_VOLATILE)
    }
}

/// One side of a match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Side {
    pub name: String,
    /// Accumulated points; `None` until the first award.
    pub points: Option<f64>,
    /// Party members not yet fainted.
    pub pokemon_left: usize,
    /// Active slots; empty slots are `None`.
    pub active: Vec<Option<Combatant>>,
}

impl Side {
    pub fn new(name: &str, pokemon_left: usize) -> Self {
        Self {
            name: name.to_string(),
            pokemon_left,
            ..Self::default()
        }
    }

    pub fn with_active(mut self, combatant: Option<Combatant>) -> Self {
        self.active.push(combatant);
        self
    }

    pub fn total(&self) -> f64 {
        self.points.unwrap_or(0.0)
    }
}
