//! Spellfall – a scryfall-style query engine over a corpus of spells.
//!
//! Spell records expose only a handful of literal attributes (name, level,
//! school, flags). Most of what a player wants to search by, like damage type,
//! saving throw, area of effect or a range in feet, only exists as prose. At
//! load time every record is therefore *tagged*: facts are mined from its text
//! and normalized into canonical values, and reverse indices are built over
//! both the literal attributes and the tags.
//!
//! Queries are written as whitespace-separated clauses of the form
//! `<field><operator><value>`, e.g. `level>=3 dt:(fire lightning) conc:false`.
//! Values in parentheses are alternatives (OR), separate clauses must all hold
//! (AND).
//!
//! ## Modules
//! * [`units`] – Length, time and dice tables shared by extraction and compilation.
//! * [`value`] – [`value::TagValue`], the canonical value kept in tags and index keys.
//! * [`field`] – The [`field::FieldRegistry`] of typed field descriptors.
//! * [`record`] – Raw record ingestion and the [`record::RecordKeeper`].
//! * [`extract`] – Fact extraction from free text.
//! * [`index`] – Reverse indices, one per field.
//! * [`query`] – The clause parser (grammar in `query.pest`).
//! * [`compile`] – Alias resolution, operator checks and value coercion.
//! * [`execute`] – Direct, exclusion and range lookups and their composition.
//! * [`snapshot`] – [`snapshot::CorpusSnapshot`], the immutable result of a load.
//! * [`interface`] – A swappable snapshot reference for concurrent serving.
//! * [`server`] – HTTP JSON endpoints.
//!
//! ## Quick Start
//! ```
//! use serde_json::json;
//! use spellfall::snapshot::CorpusSnapshot;
//! let raw = vec![json!({
//!     "name": "Fireball", "level": 3, "concentration": false, "ritual": false,
//!     "school": "Evocation", "range": "150 feet", "duration": "Instantaneous",
//!     "casting_time": "1 action", "classes": ["Sorcerer", "Wizard"],
//!     "desc": ["Each creature in a 20-foot-radius sphere must make a Dexterity saving throw. A target takes 8d6 fire damage on a failed save."]
//! })];
//! let snapshot = CorpusSnapshot::load(&raw).unwrap();
//! let names = snapshot.search("l:3 dt:fire aoe_sz>=40").unwrap();
//! assert!(names.contains("Fireball"));
//! ```

pub mod error;
pub mod units;
pub mod value;
pub mod field;
pub mod record;
pub mod extract;
pub mod index;
pub mod query;
pub mod compile;
pub mod execute;
pub mod snapshot;
pub mod interface;
pub mod settings;
pub mod server;
