use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CatalogError;

/// Fields of a catalog entry the resolver can match against.
pub trait CatalogEntry {
    fn id(&self) -> &str;
    fn code(&self) -> &str;
    fn label(&self) -> &str;

    /// Every field compared during normalized matching, in precedence order.
    fn match_fields(&self) -> Vec<&str>;
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct QuestionTypeDescriptor {
    #[serde(deserialize_with = "de::lenient_string")]
    pub id: String,

    #[serde(default, deserialize_with = "de::lenient_string")]
    pub label: String,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub type_name: String,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub code: String,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub category_id: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

impl CatalogEntry for QuestionTypeDescriptor {
    fn id(&self) -> &str {
        &self.id
    }

    fn code(&self) -> &str {
        &self.code
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn match_fields(&self) -> Vec<&str> {
        vec![
            self.id.as_str(),
            self.label.as_str(),
            self.name.as_str(),
            self.type_name.as_str(),
            self.code.as_str(),
        ]
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct CategoryDescriptor {
    #[serde(deserialize_with = "de::lenient_string")]
    pub id: String,

    #[serde(default, deserialize_with = "de::lenient_string")]
    pub label: String,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub code: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

impl CatalogEntry for CategoryDescriptor {
    fn id(&self) -> &str {
        &self.id
    }

    fn code(&self) -> &str {
        &self.code
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn match_fields(&self) -> Vec<&str> {
        vec![
            self.id.as_str(),
            self.label.as_str(),
            self.name.as_str(),
            self.code.as_str(),
        ]
    }
}

fn enabled_by_default() -> bool {
    true
}

/// The question types and categories rows are validated against.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    #[serde(default)]
    pub question_types: Vec<QuestionTypeDescriptor>,
    #[serde(default)]
    pub categories: Vec<CategoryDescriptor>,
}

impl Catalog {
    pub fn new(
        question_types: Vec<QuestionTypeDescriptor>,
        categories: Vec<CategoryDescriptor>,
    ) -> Self {
        Self {
            question_types,
            categories,
        }
    }

    /// Reads a catalog JSON file of the form
    /// `{"question_types": [...], "categories": [...]}`.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw_data = fs::read(path)?;

        Ok(serde_json::from_slice(&raw_data)?)
    }

    pub fn question_type(&self, id: &str) -> Option<&QuestionTypeDescriptor> {
        self.question_types.iter().find(|entry| entry.id == id)
    }

    pub fn category(&self, id: &str) -> Option<&CategoryDescriptor> {
        self.categories.iter().find(|entry| entry.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.question_types.is_empty()
    }
}

/// Pulls a list of entries out of a listing response.
///
/// Accepts a bare array or the array nested under `data`, `items`,
/// `results`, `data.items` or `data.results`.
pub fn normalize_listing<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, CatalogError> {
    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(mut object) => {
            let nested = ["data", "items", "results"]
                .into_iter()
                .find_map(|key| object.remove(key))
                .ok_or(CatalogError::UnexpectedShape)?;

            return normalize_listing(nested);
        }
        _ => return Err(CatalogError::UnexpectedShape),
    };

    entries
        .into_iter()
        .map(|entry| serde_json::from_value(entry).map_err(Into::into))
        .collect()
}

pub mod de {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// "qt_1" → "qt_1", 7 → "7", null → ""
    pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(text) => Ok(text),
            Value::Number(number) => Ok(number.to_string()),
            Value::Bool(value) => Ok(value.to_string()),
            Value::Null => Ok(String::new()),
            other => Err(serde::de::Error::custom(format!(
                "expected a string or number, found {other}"
            ))),
        }
    }
}
