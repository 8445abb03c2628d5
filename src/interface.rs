//! Shared access to the current corpus snapshot.
//!
//! Queries never lock while they run: they clone the `Arc` of whatever snapshot
//! is current and search it. A reload builds a complete new snapshot first and
//! only then swaps the reference, so an in-flight query keeps seeing the one
//! snapshot it started with.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{info, warn};

use crate::error::{Result, SpellfallError};
use crate::snapshot::CorpusSnapshot;

/// Opaque query identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryId(u64);
impl QueryId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a served query produced.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub id: QueryId,
    pub names: BTreeSet<String>,
    /// Reference links of the matching records that have one, by name.
    pub urls: BTreeMap<String, String>,
    pub elapsed: Duration,
}

/// A query that was given an id but did not produce results.
#[derive(Error, Debug)]
#[error("query {id} failed: {error}")]
pub struct SearchFailure {
    pub id: QueryId,
    #[source]
    pub error: SpellfallError,
}
impl From<SearchFailure> for SpellfallError {
    fn from(failure: SearchFailure) -> Self {
        failure.error
    }
}

pub struct QueryInterface {
    snapshot: RwLock<Arc<CorpusSnapshot>>,
    source: Option<PathBuf>, // where reloads read the corpus from
    next_id: AtomicU64,
}

impl QueryInterface {
    pub fn new(snapshot: CorpusSnapshot) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(snapshot)),
            source: None,
            next_id: AtomicU64::new(0),
        }
    }
    /// Loads the corpus at `path` and remembers the path for later reloads.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let snapshot = CorpusSnapshot::from_path(&path)?;
        Ok(Self {
            source: Some(path),
            ..Self::new(snapshot)
        })
    }
    fn allocate_id(&self) -> QueryId {
        QueryId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1)
    }
    pub fn snapshot(&self) -> Result<Arc<CorpusSnapshot>> {
        self.snapshot
            .read()
            .map(|current| Arc::clone(&current))
            .map_err(|e| SpellfallError::Lock(e.to_string()))
    }
    /// Makes `snapshot` current and hands back the one it replaced.
    pub fn replace(&self, snapshot: CorpusSnapshot) -> Result<Arc<CorpusSnapshot>> {
        let mut current = self
            .snapshot
            .write()
            .map_err(|e| SpellfallError::Lock(e.to_string()))?;
        let previous = std::mem::replace(&mut *current, Arc::new(snapshot));
        info!(records = current.records().len(), "snapshot swapped");
        Ok(previous)
    }
    /// Rebuilds the snapshot from the corpus file this interface was opened with.
    /// On failure the current snapshot stays in place.
    pub fn reload(&self) -> Result<usize> {
        let path = self
            .source
            .as_ref()
            .ok_or_else(|| SpellfallError::Config(String::from("no corpus path to reload from")))?;
        let snapshot = CorpusSnapshot::from_path(path)?;
        let records = snapshot.records().len();
        self.replace(snapshot)?;
        Ok(records)
    }
    /// Runs `query` against the current snapshot. The id is handed out before
    /// anything else happens, so failures carry one too.
    pub fn search(&self, query: &str) -> std::result::Result<SearchOutcome, SearchFailure> {
        let id = self.allocate_id();
        let started = Instant::now();
        let searched = self.snapshot().and_then(|snapshot| {
            let names = snapshot.search(query)?;
            let urls: BTreeMap<String, String> = names
                .iter()
                .filter_map(|name| {
                    let url = snapshot.record(name)?.url()?;
                    Some((name.clone(), url.to_string()))
                })
                .collect();
            Ok((names, urls))
        });
        let elapsed = started.elapsed();
        match searched {
            Ok((names, urls)) => {
                info!(id = id.value(), hits = names.len(), ms = elapsed.as_secs_f64() * 1000.0, "query served");
                Ok(SearchOutcome { id, names, urls, elapsed })
            }
            Err(error) => {
                warn!(id = id.value(), error = %error, "query failed");
                Err(SearchFailure { id, error })
            }
        }
    }
}
