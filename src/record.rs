use std::sync::Arc;

// used to keep the one-to-one mapping between record names and their assigned ids
use bimap::BiMap;

// keepers and indexes use HashMap with a faster hasher
use core::hash::BuildHasherDefault;
use seahash::SeaHasher;

// derived tags are kept in a sorted map so a record prints the same every time
use std::borrow::Cow;
use std::collections::BTreeMap;

// used to read raw records handed to us by the ingestion step
use serde::Deserialize;
use serde_json::Value;

// our own stuff that we need
use crate::error::{Result, SpellfallError};
use crate::field::Attribute;
use crate::value::{Magnitude, TagValue};

// ------------- RecordId -------------
pub type RecordId = u32;

pub type OtherHasher = BuildHasherDefault<SeaHasher>;

const API_ORIGIN: &str = "https://www.dnd5eapi.co";
const MAX_LEVEL: u8 = 9;

// ------------- Raw records -------------
#[derive(Deserialize)]
#[serde(untagged)]
enum Named {
    Plain(String),
    Object { name: String },
}
impl Named {
    fn into_name(self) -> String {
        match self {
            Self::Plain(name) | Self::Object { name } => name,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Paragraphs {
    One(String),
    Many(Vec<String>),
}
impl Paragraphs {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(paragraph) => vec![paragraph],
            Self::Many(paragraphs) => paragraphs,
        }
    }
}

#[derive(Deserialize)]
struct RawRecord {
    name: String,
    level: u8,
    concentration: bool,
    ritual: bool,
    school: Named,
    range: String,
    #[serde(default)]
    components: Vec<String>,
    #[serde(default)]
    material: Option<String>,
    duration: String,
    casting_time: String,
    classes: Vec<Named>,
    #[serde(alias = "description")]
    desc: Paragraphs,
    #[serde(default)]
    higher_level: Option<Paragraphs>,
    #[serde(default)]
    url: Option<String>,
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ------------- Record -------------
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    name: String,
    level: u8,
    concentration: bool,
    ritual: bool,
    school: String,
    range: String,
    components: Vec<String>,
    material: Option<String>,
    duration: String,
    casting_time: String,
    classes: Vec<String>,
    higher_level: Option<String>,
    description: String,
    url: Option<String>,
    tags: BTreeMap<String, Vec<TagValue>>,
}

impl Record {
    /// Reads one raw record. Anything missing or ill-typed is a data contract
    /// violation named after the record, or after its position when even the
    /// name is unreadable.
    pub fn from_value(raw: &Value, position: usize) -> Result<Self> {
        let label = raw
            .get("name")
            .and_then(Value::as_str)
            .map(String::from)
            .unwrap_or_else(|| format!("<record #{position}>"));
        let raw = RawRecord::deserialize(raw).map_err(|e| SpellfallError::DataContract {
            record: label.clone(),
            message: e.to_string(),
        })?;
        if raw.name.trim().is_empty() {
            return Err(SpellfallError::DataContract {
                record: label,
                message: String::from("name must not be empty"),
            });
        }
        if raw.level > MAX_LEVEL {
            return Err(SpellfallError::DataContract {
                record: label,
                message: format!("level {} is outside 0 to {MAX_LEVEL}", raw.level),
            });
        }
        let higher_level = raw
            .higher_level
            .map(|paragraphs| collapse(&paragraphs.into_vec().join(" ")))
            .filter(|text| !text.is_empty());
        let mut description = raw.desc.into_vec().join(" ");
        if let Some(higher) = &higher_level {
            description.push_str(" At Higher Levels: ");
            description.push_str(higher);
        }
        Ok(Self {
            name: raw.name,
            level: raw.level,
            concentration: raw.concentration,
            ritual: raw.ritual,
            school: raw.school.into_name(),
            range: raw.range,
            components: raw.components,
            material: raw.material.filter(|text| !text.trim().is_empty()),
            duration: raw.duration,
            casting_time: raw.casting_time,
            classes: raw.classes.into_iter().map(Named::into_name).collect(),
            higher_level,
            description: collapse(&description),
            url: raw.url.map(|url| {
                if url.starts_with('/') {
                    format!("{API_ORIGIN}{url}")
                } else {
                    url
                }
            }),
            tags: BTreeMap::new(),
        })
    }
    pub fn with_tags(mut self, tags: BTreeMap<String, Vec<TagValue>>) -> Self {
        self.tags = tags;
        self
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn level(&self) -> u8 {
        self.level
    }
    pub fn concentration(&self) -> bool {
        self.concentration
    }
    pub fn ritual(&self) -> bool {
        self.ritual
    }
    pub fn school(&self) -> &str {
        &self.school
    }
    pub fn range(&self) -> &str {
        &self.range
    }
    pub fn components(&self) -> &[String] {
        &self.components
    }
    pub fn material(&self) -> Option<&str> {
        self.material.as_deref()
    }
    pub fn duration(&self) -> &str {
        &self.duration
    }
    pub fn casting_time(&self) -> &str {
        &self.casting_time
    }
    pub fn classes(&self) -> &[String] {
        &self.classes
    }
    pub fn higher_level(&self) -> Option<&str> {
        self.higher_level.as_deref()
    }
    pub fn description(&self) -> &str {
        &self.description
    }
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
    pub fn tags(&self) -> &BTreeMap<String, Vec<TagValue>> {
        &self.tags
    }
    pub fn tag(&self, field: &str) -> Option<&[TagValue]> {
        self.tags.get(field).map(Vec::as_slice)
    }
    /// The attribute as text to scan, or `None` when it is absent or not text-like.
    pub fn text(&self, attribute: Attribute) -> Option<Cow<'_, str>> {
        match attribute {
            Attribute::Name => Some(Cow::Borrowed(self.name.as_str())),
            Attribute::School => Some(Cow::Borrowed(self.school.as_str())),
            Attribute::Range => Some(Cow::Borrowed(self.range.as_str())),
            Attribute::Duration => Some(Cow::Borrowed(self.duration.as_str())),
            Attribute::CastingTime => Some(Cow::Borrowed(self.casting_time.as_str())),
            Attribute::Description => Some(Cow::Borrowed(self.description.as_str())),
            Attribute::Material => self.material.as_deref().map(Cow::Borrowed),
            Attribute::HigherLevel => self.higher_level.as_deref().map(Cow::Borrowed),
            Attribute::Classes => Some(Cow::Owned(self.classes.join(", "))),
            Attribute::Components => Some(Cow::Owned(self.components.join(", "))),
            Attribute::Level | Attribute::Concentration | Attribute::Ritual => None,
        }
    }
    /// The canonical values a literal field reads off this record.
    pub fn literal(&self, attribute: Attribute) -> Vec<TagValue> {
        match attribute {
            Attribute::Level => vec![TagValue::Number(Magnitude::from(self.level))],
            Attribute::Concentration => vec![TagValue::Flag(self.concentration)],
            Attribute::Ritual => vec![TagValue::Flag(self.ritual)],
            Attribute::HigherLevel => vec![TagValue::Flag(self.higher_level.is_some())],
            Attribute::Components => {
                let mut values: Vec<TagValue> =
                    self.components.iter().map(|c| TagValue::text(c.trim())).collect();
                values.sort();
                values.dedup();
                values
            }
            Attribute::Classes => {
                let mut values: Vec<TagValue> =
                    self.classes.iter().map(|c| TagValue::text(c.trim())).collect();
                values.sort();
                values.dedup();
                values
            }
            _ => self
                .text(attribute)
                .map(|text| vec![TagValue::text(&text)])
                .unwrap_or_default(),
        }
    }
}

// ------------- RecordKeeper -------------
#[derive(Debug, Default)]
pub struct RecordKeeper {
    kept: Vec<Arc<Record>>,
    lookup: BiMap<String, RecordId>,
}
impl RecordKeeper {
    pub fn new() -> Self {
        Self::default()
    }
    /// Ids are handed out densely in keeping order, starting at zero.
    pub fn keep(&mut self, record: Record) -> Result<RecordId> {
        if self.lookup.contains_left(record.name()) {
            return Err(SpellfallError::DataContract {
                record: record.name().to_string(),
                message: String::from("record name is not unique"),
            });
        }
        let id = RecordId::try_from(self.kept.len()).map_err(|_| SpellfallError::DataContract {
            record: record.name().to_string(),
            message: String::from("corpus too large"),
        })?;
        self.lookup.insert(record.name().to_string(), id);
        self.kept.push(Arc::new(record));
        Ok(id)
    }
    pub fn get(&self, id: RecordId) -> Option<&Arc<Record>> {
        self.kept.get(id as usize)
    }
    pub fn id(&self, name: &str) -> Option<RecordId> {
        self.lookup.get_by_left(name).copied()
    }
    pub fn name(&self, id: RecordId) -> Option<&str> {
        self.lookup.get_by_right(&id).map(String::as_str)
    }
    pub fn by_name(&self, name: &str) -> Option<&Arc<Record>> {
        self.id(name).and_then(|id| self.get(id))
    }
    pub fn iter(&self) -> impl Iterator<Item = (RecordId, &Arc<Record>)> {
        self.kept.iter().enumerate().map(|(id, record)| (id as RecordId, record))
    }
    pub fn len(&self) -> usize {
        self.kept.len()
    }
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }
}
