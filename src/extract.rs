//! Fact extraction: turning a record's prose into canonical tag values.
//!
//! Extraction is a pure function of a record and a field descriptor. A miss,
//! be it a missing source attribute, an unknown die or an unreadable numeral,
//! yields no tag rather than an error, since spell text is irregular and one
//! odd record must not stop the rest of the corpus from being indexed.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use tracing::trace;

use crate::field::{Extraction, FieldDescriptor, FieldKind, FieldRegistry, Transform};
use crate::record::Record;
use crate::units::{self, Dimension};
use crate::value::TagValue;

lazy_static! {
    static ref DICE: Regex =
        Regex::new(r"(?i)^\s*([0-9]+)\s*d\s*([0-9]+)\s*(?:\+\s*([0-9]+))?\s*$")
            .expect("dice pattern is valid");
}

// ------------- DiceRoll -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceRoll {
    count: u32,
    faces: u32,
    modifier: u32,
}

impl DiceRoll {
    pub fn new(count: u32, faces: u32, modifier: u32) -> Self {
        Self { count, faces, modifier }
    }
    /// Parses `<count>d<faces>(+<modifier>)?`, e.g. `8d6` or `2d4 + 3`. Damage
    /// extraction locates the dice expression in prose and reads it with this.
    pub fn parse(text: &str) -> Option<Self> {
        let captures = DICE.captures(text)?;
        let count = captures.get(1)?.as_str().parse().ok()?;
        let faces = captures.get(2)?.as_str().parse().ok()?;
        let modifier = match captures.get(3) {
            Some(modifier) => modifier.as_str().parse().ok()?,
            None => 0,
        };
        Some(Self::new(count, faces, modifier))
    }
    pub fn count(&self) -> u32 {
        self.count
    }
    pub fn faces(&self) -> u32 {
        self.faces
    }
    pub fn modifier(&self) -> u32 {
        self.modifier
    }
    pub fn average(&self) -> Option<f64> {
        let mean = units::die_mean(self.faces)?;
        Some(f64::from(self.count) * mean + f64::from(self.modifier))
    }
    pub fn maximum(&self) -> Option<f64> {
        units::die_mean(self.faces)?;
        Some(f64::from(self.count) * f64::from(self.faces) + f64::from(self.modifier))
    }
}

// ------------- AreaOfEffect -------------
#[derive(Debug, Clone, PartialEq)]
pub struct AreaOfEffect {
    size: f64,
    shape: String,
}

impl AreaOfEffect {
    fn from_captures(captures: &Captures) -> Option<Self> {
        let number = number(captures.name("number")?.as_str())?;
        let unit = units::length_ratio(&normalize(captures.name("unit")?.as_str()))?;
        let modifier = match captures.name("modifier") {
            Some(modifier) => units::area_ratio(&normalize(modifier.as_str()))?,
            None => 1.0,
        };
        let shape = captures.name("shape")?.as_str().to_lowercase();
        Some(Self {
            size: number * unit * modifier,
            shape: if shape == "wall" { String::from("line") } else { shape },
        })
    }
    /// Size in feet, standardized on diameter.
    pub fn size(&self) -> f64 {
        self.size
    }
    pub fn shape(&self) -> &str {
        &self.shape
    }
}

// ------------- Extraction -------------
fn normalize(token: &str) -> String {
    token.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn number(text: &str) -> Option<f64> {
    let parsed = text.replace(',', "").parse::<f64>().ok();
    if parsed.is_none() {
        trace!(text, "unreadable numeral");
    }
    parsed
}

fn measure(dimension: Dimension, captures: &Captures) -> Option<f64> {
    if let Some(textual) = captures.name("textual") {
        return units::resolve(dimension, &normalize(textual.as_str()));
    }
    let number = number(captures.name("number")?.as_str())?;
    let unit = normalize(captures.name("unit")?.as_str());
    let ratio = match dimension {
        Dimension::Length => units::length_ratio(&unit),
        Dimension::Time => units::time_ratio(&unit),
    };
    if ratio.is_none() {
        trace!(unit = %unit, "unknown unit");
    }
    Some(number * ratio?)
}

fn apply(transform: Transform, captures: &Captures) -> Option<TagValue> {
    match transform {
        Transform::DiceAverage | Transform::DiceMaximum => {
            let roll = DiceRoll::parse(captures.name("dice")?.as_str())?;
            let amount = if transform == Transform::DiceAverage {
                roll.average()
            } else {
                roll.maximum()
            };
            if amount.is_none() {
                trace!(faces = roll.faces(), "unknown die");
            }
            TagValue::number(amount?)
        }
        Transform::Length => TagValue::number(measure(Dimension::Length, captures)?),
        Transform::Time => TagValue::number(measure(Dimension::Time, captures)?),
        Transform::AreaSize => TagValue::number(AreaOfEffect::from_captures(captures)?.size()),
        Transform::AreaShape => Some(TagValue::text(AreaOfEffect::from_captures(captures)?.shape())),
        Transform::GoldCost => TagValue::number(number(captures.name("amount")?.as_str())?),
    }
}

/// The canonical values `field` takes for `record`, without duplicates.
pub fn extract(record: &Record, field: &FieldDescriptor) -> Vec<TagValue> {
    match field.kind() {
        FieldKind::Literal(attribute) => record.literal(*attribute),
        FieldKind::Derived { source, extraction } => {
            let Some(text) = record.text(*source) else {
                return Vec::new();
            };
            match extraction {
                Extraction::SetMembership { candidates } => candidates
                    .iter()
                    .filter(|(_, templates)| templates.iter().any(|t| t.is_match(&text)))
                    .map(|(candidate, _)| TagValue::text(candidate))
                    .collect(),
                // only the first matching pattern counts, even if its transform fails
                Extraction::SingleShot { patterns, transform } => patterns
                    .iter()
                    .find_map(|pattern| pattern.captures(&text))
                    .and_then(|captures| apply(*transform, &captures))
                    .into_iter()
                    .collect(),
            }
        }
    }
}

/// The derived tag map of a record. Fields where extraction found nothing get no entry.
pub fn tag(record: &Record, registry: &FieldRegistry) -> BTreeMap<String, Vec<TagValue>> {
    let mut tags = BTreeMap::new();
    for field in registry.iter().filter(|field| field.is_derived()) {
        let values = extract(record, field);
        if !values.is_empty() {
            tags.insert(field.name().to_string(), values);
        }
    }
    tags
}

