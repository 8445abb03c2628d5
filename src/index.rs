use std::collections::{BTreeMap, HashMap};

// result sets are bitmaps of record ids
use roaring::RoaringBitmap;
use tracing::debug;

// our own stuff that we need
use crate::extract::extract;
use crate::field::FieldRegistry;
use crate::record::{OtherHasher, RecordId, RecordKeeper};
use crate::value::TagValue;

// ------------- FieldIndex -------------
/// Reverse lookup for one field: canonical value -> ids of the records having it.
/// Keys are totally ordered, so range scans walk them in ascending order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FieldIndex {
    buckets: BTreeMap<TagValue, RoaringBitmap>,
}

impl FieldIndex {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn insert(&mut self, value: TagValue, id: RecordId) {
        self.buckets.entry(value).or_default().insert(id);
    }
    pub fn bucket(&self, value: &TagValue) -> Option<&RoaringBitmap> {
        self.buckets.get(value)
    }
    pub fn keys(&self) -> impl Iterator<Item = &TagValue> {
        self.buckets.keys()
    }
    pub fn buckets(&self) -> impl Iterator<Item = (&TagValue, &RoaringBitmap)> {
        self.buckets.iter()
    }
    pub fn len(&self) -> usize {
        self.buckets.len()
    }
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

// ------------- Indices -------------
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Indices {
    fields: HashMap<String, FieldIndex, OtherHasher>,
}

impl Indices {
    /// One index per registered field. Derived fields read the tag map computed
    /// at load time; literal fields read their attribute. Boolean fields only
    /// materialize their `true` bucket.
    pub fn build(records: &RecordKeeper, registry: &FieldRegistry) -> Self {
        let mut fields = HashMap::<String, FieldIndex, OtherHasher>::default();
        for field in registry.iter() {
            let mut index = FieldIndex::new();
            for (id, record) in records.iter() {
                let values = if field.is_derived() {
                    record.tag(field.name()).map(<[TagValue]>::to_vec).unwrap_or_default()
                } else {
                    extract(record, field)
                };
                for value in values {
                    if value != TagValue::Flag(false) {
                        index.insert(value, id);
                    }
                }
            }
            debug!(field = field.name(), keys = index.len(), "indexed");
            fields.insert(field.name().to_string(), index);
        }
        Self { fields }
    }
    pub fn field(&self, name: &str) -> Option<&FieldIndex> {
        self.fields.get(name)
    }
    pub fn len(&self) -> usize {
        self.fields.len()
    }
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
