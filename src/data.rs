//! Data requests: `|/data-<kind> <name>` lines and their one-line summaries.
//!
//! A summary is a list of fields joined by `" | "`. Labelled fields use
//! [`crate::format::label`]. Nothing escapes the separator inside a field.

use crate::dex::{Accuracy, DataKind, Dex, DexRecord, Move, MoveCategory, Species, to_id};
use crate::error::LookupError;
use crate::format::{italic, label};
use crate::markup::DATA_SENTINEL;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::warn;

/// Field separator in summaries.
pub const FIELD_SEPARATOR: &str = " | ";

/// Shown in place of a missing power or accuracy value.
pub const EM_DASH: &str = "\u{2014}";

static DATA_REQUEST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/data-(\w+) (.*)").unwrap_or_else(|e| panic!("bad data request pattern: {e}"))
});

/// A parsed data request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRequest {
    pub kind: DataKind,
    /// Normalised key (see [`to_id`]).
    pub key: String,
}

/// Whether a line is a data request: the `|` sentinel followed by a
/// `/data-<kind> <key>` payload. Other `|` lines are ordinary markup.
pub fn is_data_request(line: &str) -> bool {
    line.starts_with(DATA_SENTINEL) && DATA_REQUEST.is_match(line)
}

impl DataRequest {
    pub fn new(kind: DataKind, name: &str) -> Self {
        Self {
            kind,
            key: to_id(name),
        }
    }

    /// Parse the payload of a data request line.
    pub fn parse(line: &str) -> Result<Self, LookupError> {
        let caps = DATA_REQUEST
            .captures(line)
            .ok_or_else(|| LookupError::MalformedRequest(line.to_string()))?;
        let kind: DataKind = caps[1].parse()?;
        Ok(Self::new(kind, &caps[2]))
    }

    /// The line a command replies with to trigger this request.
    pub fn to_line(&self) -> String {
        format!("|/data-{} {}", self.kind, self.key)
    }
}

/// Resolves data requests against a [`Dex`] and formats the summary.
#[derive(Clone)]
pub struct DataLookupDispatcher {
    dex: Arc<dyn Dex>,
}

impl DataLookupDispatcher {
    pub fn new(dex: Arc<dyn Dex>) -> Self {
        Self { dex }
    }

    /// Look up one record and format its summary.
    pub fn lookup(&self, kind: DataKind, key: &str) -> Result<String, LookupError> {
        let record = self
            .dex
            .get(kind, key)
            .ok_or_else(|| LookupError::UnknownEntity {
                kind: kind.as_str(),
                key: key.to_string(),
            })?;

        Ok(match record {
            DexRecord::Species(species) => format_species(&species),
            DexRecord::Item(item) => [item.name, item.desc].join(FIELD_SEPARATOR),
            DexRecord::Ability(ability) => [ability.name, ability.short_desc].join(FIELD_SEPARATOR),
            DexRecord::Move(mv) => format_move(&mv),
        })
    }

    /// First kind whose table holds `key`, in [`DataKind::ALL`] order.
    pub fn find_kind(&self, key: &str) -> Option<DataKind> {
        DataKind::ALL
            .into_iter()
            .find(|&kind| self.dex.get(kind, key).is_some())
    }

    /// Turn a data request line into its summary, or a visible placeholder.
    ///
    /// Never fails; lookup errors are logged.
    pub fn render_line(&self, line: &str) -> String {
        match DataRequest::parse(line).and_then(|req| self.lookup(req.kind, &req.key)) {
            Ok(summary) => summary,
            Err(e) => {
                warn!(line = %line, error = %e, code = e.error_code(), "Data request failed");
                placeholder(&e)
            }
        }
    }
}

/// Text shown when a data request cannot be answered.
pub fn placeholder(err: &LookupError) -> String {
    format!("{}unavailable ({err})", label("Data"))
}

fn format_species(species: &Species) -> String {
    let mut fields = vec![
        species.species.clone(),
        format!("{}-type", species.types.join("/")),
    ];

    let mut stats: Vec<String> = species
        .base_stats
        .labelled()
        .iter()
        .map(|(name, value)| format!("{}{value}", label(name)))
        .collect();
    stats.push(format!("{}{}", label("BST"), species.base_stats.total()));
    fields.push(stats.join(", "));

    let slots = &species.abilities;
    let abilities: Vec<String> = [
        slots.slot0.clone(),
        slots.slot1.clone(),
        slots.hidden.as_deref().map(italic),
    ]
    .into_iter()
    .flatten()
    .collect();
    fields.push(format!("{}{}", label("Abilities"), abilities.join(", ")));

    fields.join(FIELD_SEPARATOR)
}

/// PP after all PP Ups: `pp * 8 / 5`, shown as an exact decimal.
pub fn max_pp(base_pp: u32) -> f64 {
    f64::from(base_pp) * 8.0 / 5.0
}

fn format_move(mv: &Move) -> String {
    let mut fields = vec![
        mv.name.clone(),
        mv.category.to_string(),
        format!("{}-type", mv.move_type),
    ];

    if mv.category != MoveCategory::Status {
        let power = match mv.base_power {
            0 => EM_DASH.to_string(),
            bp => bp.to_string(),
        };
        fields.push(format!("{}{power}", label("Power")));
    }

    let accuracy = match mv.accuracy {
        Accuracy::Percent(p) => format!("{p}%"),
        Accuracy::AlwaysHits => EM_DASH.to_string(),
    };
    fields.push(format!("{}{accuracy}", label("Accuracy")));
    fields.push(format!("{}{}", label("PP"), max_pp(mv.pp)));
    fields.push(mv.short_desc.clone());

    fields.join(FIELD_SEPARATOR)
}
