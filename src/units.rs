//! Unit tables shared by fact extraction and query compilation.
//!
//! Every unit carries the textual aliases that denote it and its ratio to a
//! base unit: one foot for lengths, one second for times. Extraction and the
//! command compiler read the same tables, so `range:mile` and a record whose
//! range text says "1 mile" land on the same canonical number.

#[derive(Debug)]
pub struct Unit {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub ratio: f64,
}

impl Unit {
    pub fn denotes(&self, token: &str) -> bool {
        self.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(token))
    }
}

// ------------- Length -------------
pub const LENGTH_UNITS: &[Unit] = &[
    Unit { name: "foot", aliases: &["foot", "feet", "ft", "ft."], ratio: 1.0 },
    Unit { name: "mile", aliases: &["mile", "miles", "mi", "mi."], ratio: 5280.0 },
];

// Areas are standardized on diameter.
pub const AREA_MODIFIERS: &[Unit] = &[
    Unit { name: "radius", aliases: &["radius"], ratio: 2.0 },
    Unit { name: "diameter", aliases: &["diameter"], ratio: 1.0 },
];

// Lengths that never come with a numeral in the source text.
pub const TEXTUAL_LENGTHS: &[Unit] = &[
    Unit { name: "self", aliases: &["self"], ratio: 1.0 },
    Unit { name: "touch", aliases: &["touch"], ratio: 5.0 },
];

// ------------- Time -------------
pub const TIME_UNITS: &[Unit] = &[
    Unit { name: "second", aliases: &["second", "seconds"], ratio: 1.0 },
    Unit { name: "round", aliases: &["round", "rounds"], ratio: 6.0 },
    Unit { name: "minute", aliases: &["minute", "minutes"], ratio: 60.0 },
    Unit { name: "hour", aliases: &["hour", "hours"], ratio: 3600.0 },
    Unit { name: "day", aliases: &["day", "days"], ratio: 86400.0 },
    Unit { name: "year", aliases: &["year", "years", "yr", "yrs"], ratio: 31536000.0 },
    // one turn of the action economy lasts a round
    Unit {
        name: "action",
        aliases: &["action", "actions", "bonus action", "bonus actions", "reaction", "reactions"],
        ratio: 6.0,
    },
];

pub const TEXTUAL_TIMES: &[Unit] = &[
    Unit { name: "instantaneous", aliases: &["instantaneous", "instant"], ratio: 0.0 },
];

// ------------- Dice -------------
pub const DICE_FACES: &[u32] = &[4, 6, 8, 10, 12, 20];

/// Mean roll of a single die, or `None` for a die the tables do not know.
pub fn die_mean(faces: u32) -> Option<f64> {
    DICE_FACES
        .contains(&faces)
        .then(|| (f64::from(faces) + 1.0) / 2.0)
}

/// The physical quantity a numeric field measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Length,
    Time,
}

fn find(tables: &[&[Unit]], token: &str) -> Option<f64> {
    tables
        .iter()
        .flat_map(|table| table.iter())
        .find(|unit| unit.denotes(token))
        .map(|unit| unit.ratio)
}

pub fn length_ratio(token: &str) -> Option<f64> {
    find(&[LENGTH_UNITS], token)
}

pub fn area_ratio(token: &str) -> Option<f64> {
    find(&[AREA_MODIFIERS], token)
}

pub fn time_ratio(token: &str) -> Option<f64> {
    find(&[TIME_UNITS], token)
}

/// Resolves a bare unit token as a magnitude of one such unit in the base unit
/// of the dimension, e.g. `mile` is 5280 and `touch` is 5 for lengths.
pub fn resolve(dimension: Dimension, token: &str) -> Option<f64> {
    match dimension {
        Dimension::Length => find(&[TEXTUAL_LENGTHS, LENGTH_UNITS], token),
        Dimension::Time => find(&[TEXTUAL_TIMES, TIME_UNITS], token),
    }
}

/// Builds a regex alternation of every alias in the given tables. Longer
/// aliases come first so that `bonus action` wins over `action` and `ft.` over `ft`.
pub fn alternation(tables: &[&[Unit]]) -> String {
    let mut aliases: Vec<&str> = tables
        .iter()
        .flat_map(|table| table.iter())
        .flat_map(|unit| unit.aliases.iter().copied())
        .collect();
    aliases.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    aliases.dedup();
    aliases
        .iter()
        .map(|alias| regex::escape(alias).replace(' ', r"\s+"))
        .collect::<Vec<_>>()
        .join("|")
}
