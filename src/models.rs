use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl AttributeValue {
    /// Numeric reading of the value. Flags count as 0/1 and numeric-looking
    /// text is parsed; anything else has no numeric reading.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(value) => Some(*value).filter(|v| v.is_finite()),
            AttributeValue::Flag(flag) => Some(if *flag { 1.0 } else { 0.0 }),
            AttributeValue::Text(text) => text.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }

    pub fn category_key(&self) -> String {
        self.to_string()
    }

    pub fn parse_cell(cell: &str) -> Option<Self> {
        let cell = cell.trim();
        if cell.is_empty() {
            return None;
        }
        match cell {
            "True" | "true" => return Some(AttributeValue::Flag(true)),
            "False" | "false" => return Some(AttributeValue::Flag(false)),
            _ => {}
        }
        match cell.parse::<f64>() {
            Ok(value) if value.is_finite() => Some(AttributeValue::Number(value)),
            Ok(_) => None,
            Err(_) => Some(AttributeValue::Text(cell.to_string())),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Flag(true) => write!(f, "True"),
            AttributeValue::Flag(false) => write!(f, "False"),
            AttributeValue::Number(value) if is_whole(*value) => write!(f, "{}", *value as i64),
            AttributeValue::Number(value) => write!(f, "{value}"),
            AttributeValue::Text(text) => write!(f, "{text}"),
        }
    }
}

pub(crate) fn is_whole(value: f64) -> bool {
    value.fract() == 0.0 && value.abs() < 1e15
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Number(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Number(value as f64)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Flag(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

pub type ImputeNulls = BTreeMap<String, AttributeValue>;

/// One team's measured features. A null attribute is kept as `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeRecord {
    values: BTreeMap<String, Option<AttributeValue>>,
}

impl AttributeRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.values.insert(name.into(), Some(value.into()));
        self
    }

    pub fn with_null(mut self, name: impl Into<String>) -> Self {
        self.values.insert(name.into(), None);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Option<AttributeValue>) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.values.get(name).and_then(Option::as_ref)
    }

    /// Copy of the record with every attribute that is present but null
    /// replaced by its substitute. Absent attributes stay absent.
    pub fn imputed(&self, impute: &ImputeNulls) -> Self {
        let mut record = self.clone();
        for (name, slot) in record.values.iter_mut() {
            if slot.is_none() {
                if let Some(substitute) = impute.get(name) {
                    *slot = Some(substitute.clone());
                }
            }
        }
        record
    }
}

/// Medal tier. Declaration order is the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
    #[serde(rename = "No Medal")]
    NoMedal,
}

impl Medal {
    pub fn is_awarded(self) -> bool {
        self != Medal::NoMedal
    }
}

impl fmt::Display for Medal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Medal::Gold => "Gold",
            Medal::Silver => "Silver",
            Medal::Bronze => "Bronze",
            Medal::NoMedal => "No Medal",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedalAward {
    pub medal_name: String,
    pub medal: Medal,
    pub overview: String,
    pub image_path: String,
    pub medal_background: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueEntry {
    pub manager: String,
    pub team: String,
    pub attributes: AttributeRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueMedalRow {
    pub manager: String,
    pub team: String,
    pub medal_name: String,
    pub medal: Medal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagerTally {
    pub manager: String,
    pub team: String,
    pub gold: usize,
    pub silver: usize,
    pub bronze: usize,
}

impl ManagerTally {
    pub fn total(&self) -> usize {
        self.gold + self.silver + self.bronze
    }
}
