//! The search executor.
//!
//! Every command is answered by one of three strategies picked from its
//! operator. Values inside one command are OR'ed, commands of one query are
//! AND'ed by intersecting their result sets.

use roaring::RoaringBitmap;
use tracing::{debug, warn};

use crate::compile::{Command, compile};
use crate::error::{Result, SpellfallError};
use crate::field::{FieldRegistry, Matching, Operator};
use crate::index::{FieldIndex, Indices};
use crate::query::parse;
use crate::value::TagValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Direct,
    Exclusion,
    Range,
}

impl Strategy {
    pub fn for_operator(operator: Operator) -> Self {
        match operator {
            Operator::Eq => Self::Direct,
            Operator::NotEq => Self::Exclusion,
            Operator::Gt | Operator::GtEq | Operator::Lt | Operator::LtEq => Self::Range,
        }
    }
}

// ------------- Strategies -------------
/// Union of the buckets of every value. Missing buckets contribute nothing.
pub fn direct(command: &Command, index: &FieldIndex, universe: &RoaringBitmap) -> RoaringBitmap {
    let mut result = RoaringBitmap::new();
    for value in command.values() {
        match (value, command.field().matching()) {
            // only the true bucket is materialized
            (TagValue::Flag(false), _) => match index.bucket(&TagValue::Flag(true)) {
                Some(truth) => result |= universe - truth,
                None => result |= universe,
            },
            (TagValue::Text(needle), Matching::Contains) => {
                for (key, bucket) in index.buckets() {
                    if key.as_text().is_some_and(|key| key.contains(needle.as_str())) {
                        result |= bucket;
                    }
                }
            }
            _ => {
                if let Some(bucket) = index.bucket(value) {
                    result |= bucket;
                }
            }
        }
    }
    result
}

/// Everything that a direct lookup of the same values would not return.
pub fn exclusion(command: &Command, index: &FieldIndex, universe: &RoaringBitmap) -> RoaringBitmap {
    universe - &direct(command, index, universe)
}

fn satisfies(operator: Operator, key: f64, threshold: f64) -> bool {
    match operator {
        Operator::Gt => key > threshold,
        Operator::GtEq => key >= threshold,
        Operator::Lt => key < threshold,
        Operator::LtEq => key <= threshold,
        Operator::Eq | Operator::NotEq => false,
    }
}

/// Union of the buckets whose key, read as a number, satisfies the comparison
/// with the first value. Keys that are not numbers are skipped.
pub fn range(command: &Command, index: &FieldIndex) -> RoaringBitmap {
    let mut result = RoaringBitmap::new();
    let Some(threshold) = command.values().first().and_then(TagValue::as_number) else {
        return result;
    };
    if command.values().len() > 1 {
        warn!(
            field = command.field().name(),
            ignored = command.values().len() - 1,
            "range clause with several bounds, only the first is used"
        );
    }
    for (key, bucket) in index.buckets() {
        if key
            .as_number()
            .is_some_and(|key| satisfies(command.operator(), key, threshold))
        {
            result |= bucket;
        }
    }
    result
}

pub fn execute(command: &Command, indices: &Indices, universe: &RoaringBitmap) -> RoaringBitmap {
    let strategy = Strategy::for_operator(command.operator());
    let result = match indices.field(command.field().name()) {
        Some(index) => match strategy {
            Strategy::Direct => direct(command, index, universe),
            Strategy::Exclusion => exclusion(command, index, universe),
            Strategy::Range => range(command, index),
        },
        // a field without an index has no buckets at all
        None => match strategy {
            Strategy::Exclusion => universe.clone(),
            _ => RoaringBitmap::new(),
        },
    };
    debug!(command = %command, ?strategy, hits = result.len(), "executed");
    result
}

// ------------- Orchestration -------------
/// Parses, compiles and executes a whole query. Every clause is compiled before
/// anything is executed, so one bad clause fails the query with no partial result.
pub fn evaluate(
    query: &str,
    registry: &FieldRegistry,
    indices: &Indices,
    universe: &RoaringBitmap,
) -> Result<RoaringBitmap> {
    let clauses = parse(query)?;
    if clauses.is_empty() {
        return Err(SpellfallError::Parse {
            clause: query.to_string(),
            message: String::from("empty query"),
        });
    }
    let commands = clauses
        .iter()
        .map(|clause| compile(clause, registry))
        .collect::<Result<Vec<_>>>()?;
    let mut result = universe.clone();
    for command in &commands {
        result &= execute(command, indices, universe);
    }
    Ok(result)
}
