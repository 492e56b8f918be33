//! Person records as produced by the spreadsheet/CSV export.
//!
//! The export is loosely typed: identifiers show up as numbers, strings, or whole floats (`12.0`),
//! empty cells become `""`, and list-valued columns are comma-joined. Everything is normalised
//! here so downstream code only sees `PersonId`s and `Option`s.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(String);

impl PersonId {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Orders identifiers numerically when both are integers, lexically otherwise.
    ///
    /// Partner pairs are anchored on the smaller identifier, so `"9" < "10"` must hold.
    pub fn numeric_cmp(&self, other: &Self) -> Ordering {
        match (self.0.parse::<i64>(), other.0.parse::<i64>()) {
            (Ok(a), Ok(b)) => a.cmp(&b),
            _ => self.0.cmp(&other.0),
        }
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PersonId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Gender {
    pub fn from_tag(tag: &str) -> Self {
        let t = tag.trim().to_lowercase();
        match t.as_str() {
            "m" | "male" | "man" | "м" => Gender::Male,
            "f" | "female" | "woman" | "ж" => Gender::Female,
            _ if t.starts_with("муж") => Gender::Male,
            _ if t.starts_with("жен") => Gender::Female,
            _ => Gender::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Person {
    #[serde(rename = "PersonID", deserialize_with = "de_id")]
    pub id: PersonId,
    #[serde(rename = "Generation", default, deserialize_with = "de_generation")]
    pub generation: Option<i64>,
    #[serde(rename = "Name", default, deserialize_with = "de_opt_string")]
    pub name: Option<String>,
    #[serde(rename = "Name-ru", default, deserialize_with = "de_opt_string")]
    pub localized_name: Option<String>,
    #[serde(rename = "Surname", default, deserialize_with = "de_opt_string")]
    pub surname: Option<String>,
    #[serde(rename = "Photo", default, deserialize_with = "de_opt_string")]
    pub photo: Option<String>,
    #[serde(rename = "PartnerID", default, deserialize_with = "de_id_list")]
    pub partners: Vec<PersonId>,
    #[serde(rename = "FatherID", default, deserialize_with = "de_opt_id")]
    pub father: Option<PersonId>,
    #[serde(rename = "MotherID", default, deserialize_with = "de_opt_id")]
    pub mother: Option<PersonId>,
    #[serde(rename = "SiblingIDs", default, deserialize_with = "de_id_list")]
    pub siblings: Vec<PersonId>,
    #[serde(rename = "Gender", default, deserialize_with = "de_gender")]
    pub gender: Gender,
    #[serde(rename = "BirthDate", default, deserialize_with = "de_opt_string")]
    pub birth_date: Option<String>,
    #[serde(rename = "DeathDate", default, deserialize_with = "de_opt_string")]
    pub death_date: Option<String>,
}

impl Person {
    /// A bare record; convenient for tests and programmatic datasets.
    pub fn new(id: impl AsRef<str>, generation: i64) -> Self {
        Self {
            id: PersonId::new(id),
            generation: Some(generation),
            name: None,
            localized_name: None,
            surname: None,
            photo: None,
            partners: Vec::new(),
            father: None,
            mother: None,
            siblings: Vec::new(),
            gender: Gender::Unknown,
            birth_date: None,
            death_date: None,
        }
    }

    /// The label drawn under the node: localized name, then name, then the identifier.
    pub fn display_name(&self) -> &str {
        self.localized_name
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or(self.id.as_str())
    }

    /// The (father, mother) key children are grouped under; absent parents are `""`.
    pub fn parent_key(&self) -> (String, String) {
        (
            self.father
                .as_ref()
                .map(|p| p.as_str().to_string())
                .unwrap_or_default(),
            self.mother
                .as_ref()
                .map(|p| p.as_str().to_string())
                .unwrap_or_default(),
        )
    }

    pub fn photo(&self) -> Option<&str> {
        self.photo.as_deref().filter(|p| !p.trim().is_empty())
    }
}

/// Identifier lookup over a dataset slice.
#[derive(Debug, Clone, Default)]
pub struct PersonIndex {
    by_id: FxHashMap<String, usize>,
}

impl PersonIndex {
    pub fn new(persons: &[Person]) -> Self {
        let mut by_id = FxHashMap::default();
        for (idx, p) in persons.iter().enumerate() {
            // First record wins on duplicate ids.
            by_id.entry(p.id.as_str().to_string()).or_insert(idx);
        }
        Self { by_id }
    }

    pub fn get(&self, id: &str) -> Option<usize> {
        self.by_id.get(id.trim()).copied()
    }
}

/// Parses the dataset resource (a JSON array of person records).
pub fn parse_dataset(text: &str) -> serde_json::Result<Vec<Person>> {
    serde_json::from_str(text)
}

pub(crate) fn loose_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => {
            let t = s.trim();
            (!t.is_empty()).then(|| t.to_string())
        }
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(i.to_string());
            }
            if let Some(u) = n.as_u64() {
                return Some(u.to_string());
            }
            let f = n.as_f64()?;
            if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 {
                Some(format!("{}", f as i64))
            } else {
                Some(n.to_string())
            }
        }
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn de_id<'de, D: Deserializer<'de>>(d: D) -> Result<PersonId, D::Error> {
    let v = Value::deserialize(d)?;
    loose_string(&v)
        .map(PersonId)
        .ok_or_else(|| serde::de::Error::custom("PersonID must be a non-empty string or number"))
}

fn de_opt_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<PersonId>, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(loose_string(&v).map(PersonId))
}

fn de_id_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<PersonId>, D::Error> {
    let v = Value::deserialize(d)?;
    let items: Vec<String> = match &v {
        Value::Array(arr) => arr.iter().filter_map(loose_string).collect(),
        other => loose_string(other).into_iter().collect(),
    };
    Ok(items
        .iter()
        .flat_map(|s| s.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PersonId::new)
        .collect())
}

fn de_opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(loose_string(&v))
}

fn de_generation<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    let v = Value::deserialize(d)?;
    let Some(s) = loose_string(&v) else {
        return Ok(None);
    };
    s.parse::<i64>()
        .map(Some)
        .map_err(|_| serde::de::Error::custom(format!("Generation must be an integer, got {s:?}")))
}

fn de_gender<'de, D: Deserializer<'de>>(d: D) -> Result<Gender, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(loose_string(&v)
        .map(|s| Gender::from_tag(&s))
        .unwrap_or_default())
}
