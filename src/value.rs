// used to print out readable forms of a value
use std::fmt;
// index keys need to be hashable and totally ordered
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};

// ------------- Magnitude -------------
/// A finite number usable as an index key. Equality, hashing and ordering are
/// total, which plain `f64` does not give us.
#[derive(Clone, Copy, Debug)]
pub struct Magnitude(f64);

impl Magnitude {
    pub fn new(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        // fold -0.0 into 0.0 so both hash alike
        Some(Self(if value == 0.0 { 0.0 } else { value }))
    }
    pub fn value(&self) -> f64 {
        self.0
    }
}
impl From<u8> for Magnitude {
    fn from(value: u8) -> Self {
        Self(f64::from(value))
    }
}
impl PartialEq for Magnitude {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}
impl Eq for Magnitude {}
impl Hash for Magnitude {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}
impl Ord for Magnitude {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}
impl PartialOrd for Magnitude {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl fmt::Display for Magnitude {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.fract() == 0.0 && self.0.abs() < 1e15 {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}
impl Serialize for Magnitude {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0)
    }
}

// ------------- TagValue -------------
/// A canonical value as stored in a record's tag map and used as a reverse index key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum TagValue {
    Flag(bool),
    Number(Magnitude),
    Text(String),
}

impl TagValue {
    pub fn number(value: f64) -> Option<Self> {
        Magnitude::new(value).map(Self::Number)
    }
    pub fn text(value: &str) -> Self {
        Self::Text(value.to_lowercase())
    }
    /// The value read as a number, if it can be. Text keys that spell a number
    /// count; flags never do.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(magnitude) => Some(magnitude.value()),
            Self::Text(text) => text.parse::<f64>().ok().filter(|n| n.is_finite()),
            Self::Flag(_) => None,
        }
    }
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}
impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Flag(flag) => write!(f, "{flag}"),
            Self::Number(magnitude) => write!(f, "{magnitude}"),
            Self::Text(text) => write!(f, "{text}"),
        }
    }
}
