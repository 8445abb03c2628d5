use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

// extraction is a pure function per record, so tagging can run in parallel
use rayon::prelude::*;
use roaring::RoaringBitmap;
use serde_json::Value;
use tracing::info;

// our own stuff that we need
use crate::error::{Result, SpellfallError};
use crate::execute::evaluate;
use crate::extract::tag;
use crate::field::FieldRegistry;
use crate::index::Indices;
use crate::record::{Record, RecordId, RecordKeeper};

// ------------- CorpusSnapshot -------------
/// Records, their registry and the indices built over them. Nothing in a
/// snapshot changes after [`CorpusSnapshot::load`]; a reload builds a new one.
#[derive(Debug)]
pub struct CorpusSnapshot {
    registry: FieldRegistry,
    records: RecordKeeper,
    indices: Indices,
    universe: RoaringBitmap,
}

impl CorpusSnapshot {
    /// Loads raw records against the standard field registry.
    pub fn load(raw: &[Value]) -> Result<Self> {
        Self::load_with(raw, FieldRegistry::standard()?)
    }
    pub fn load_with(raw: &[Value], registry: FieldRegistry) -> Result<Self> {
        let started = Instant::now();
        // collected in input order, so ids do not depend on scheduling
        let tagged = raw
            .par_iter()
            .enumerate()
            .map(|(position, value)| -> Result<Record> {
                let record = Record::from_value(value, position)?;
                let tags = tag(&record, &registry);
                Ok(record.with_tags(tags))
            })
            .collect::<Result<Vec<Record>>>()?;
        let mut records = RecordKeeper::new();
        for record in tagged {
            records.keep(record)?;
        }
        let indices = Indices::build(&records, &registry);
        let universe: RoaringBitmap = records.iter().map(|(id, _)| id).collect();
        info!(
            records = records.len(),
            fields = registry.len(),
            ms = started.elapsed().as_secs_f64() * 1000.0,
            "corpus loaded"
        );
        Ok(Self {
            registry,
            records,
            indices,
            universe,
        })
    }
    /// Loads a JSON array of raw records.
    pub fn from_json(text: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(text)? {
            Value::Array(raw) => Self::load(&raw),
            _ => Err(SpellfallError::DataContract {
                record: String::from("<corpus>"),
                message: String::from("expected a JSON array of records"),
            }),
        }
    }
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| SpellfallError::Io(format!("{}: {e}", path.display())))?;
        Self::from_json(&text)
    }
    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }
    pub fn records(&self) -> &RecordKeeper {
        &self.records
    }
    pub fn indices(&self) -> &Indices {
        &self.indices
    }
    pub fn universe(&self) -> &RoaringBitmap {
        &self.universe
    }
    pub fn record(&self, name: &str) -> Option<&Arc<Record>> {
        self.records.by_name(name)
    }
    pub fn search_ids(&self, query: &str) -> Result<RoaringBitmap> {
        evaluate(query, &self.registry, &self.indices, &self.universe)
    }
    /// Names of the records matching the query.
    pub fn search(&self, query: &str) -> Result<BTreeSet<String>> {
        Ok(self
            .search_ids(query)?
            .iter()
            .filter_map(|id: RecordId| self.records.name(id).map(String::from))
            .collect())
    }
}
