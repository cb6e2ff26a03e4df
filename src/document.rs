//! The document metadata entity and its mapping to stored items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{AttributeValue, Item, StoreError};
use crate::timestamp;

/// Stored attribute names.
pub mod attr {
    pub const ID: &str = "id";
    pub const OWNER_ID: &str = "ownerId";
    pub const CATEGORY: &str = "category";
    pub const SUB_CATEGORY: &str = "subCategory";
    pub const CREATED_AT: &str = "createdAt";
    pub const UPDATED_AT: &str = "updatedAt";
    pub const CREATED_BY: &str = "createdBy";
    pub const UPDATED_BY: &str = "updatedBy";
    pub const NOTES: &str = "notes";
    pub const VERSION: &str = "version";
}

/// Metadata describing one stored document.
///
/// `version` is the optimistic concurrency token: `None` until the first
/// successful save, then 1, 2, 3, ... with every save against the current
/// version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub owner_id: i64,
    pub category: i64,
    pub sub_category: i64,
    #[serde(default, with = "timestamp::iso8601")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp::iso8601")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub updated_by: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub version: Option<u64>,
}

impl Document {
    /// A new, never-saved document.
    pub fn new(id: impl Into<String>, owner_id: i64, category: i64, sub_category: i64) -> Self {
        Self {
            id: id.into(),
            owner_id,
            category,
            sub_category,
            created_at: None,
            updated_at: None,
            created_by: None,
            updated_by: None,
            notes: None,
            version: None,
        }
    }

    pub fn created(mut self, at: DateTime<Utc>, by: impl Into<String>) -> Self {
        self.created_at = Some(at);
        self.created_by = Some(by.into());
        self
    }

    pub fn updated(mut self, at: DateTime<Utc>, by: impl Into<String>) -> Self {
        self.updated_at = Some(at);
        self.updated_by = Some(by.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_version(mut self, version: u64) -> Self {
        self.version = Some(version);
        self
    }

    /// Map to a stored item. Timestamps are always present (possibly `NULL`);
    /// absent strings and an unset version are left out.
    pub fn to_item(&self) -> Item {
        let mut item = Item::new();
        item.insert(attr::ID.into(), AttributeValue::string(&self.id));
        item.insert(attr::OWNER_ID.into(), AttributeValue::number(self.owner_id));
        item.insert(attr::CATEGORY.into(), AttributeValue::number(self.category));
        item.insert(
            attr::SUB_CATEGORY.into(),
            AttributeValue::number(self.sub_category),
        );
        item.insert(
            attr::CREATED_AT.into(),
            timestamp::encode(self.created_at.as_ref()),
        );
        item.insert(
            attr::UPDATED_AT.into(),
            timestamp::encode(self.updated_at.as_ref()),
        );
        let strings = [
            (attr::CREATED_BY, &self.created_by),
            (attr::UPDATED_BY, &self.updated_by),
            (attr::NOTES, &self.notes),
        ];
        for (name, value) in strings {
            if let Some(value) = value {
                item.insert(name.into(), AttributeValue::string(value));
            }
        }
        if let Some(version) = self.version {
            item.insert(attr::VERSION.into(), AttributeValue::from(version));
        }
        item
    }

    /// Rebuild a document from a stored item.
    pub fn from_item(item: &Item) -> Result<Self, StoreError> {
        let id = item
            .get(attr::ID)
            .and_then(AttributeValue::as_str)
            .ok_or_else(|| StoreError::Mapping(format!("item has no string {}", attr::ID)))?
            .to_string();

        Ok(Self {
            owner_id: required_number(item, attr::OWNER_ID, &id)?,
            category: required_number(item, attr::CATEGORY, &id)?,
            sub_category: required_number(item, attr::SUB_CATEGORY, &id)?,
            created_at: optional_timestamp(item, attr::CREATED_AT)?,
            updated_at: optional_timestamp(item, attr::UPDATED_AT)?,
            created_by: optional_string(item, attr::CREATED_BY),
            updated_by: optional_string(item, attr::UPDATED_BY),
            notes: optional_string(item, attr::NOTES),
            version: optional_version(item, &id)?,
            id,
        })
    }
}

fn required_number(item: &Item, name: &str, id: &str) -> Result<i64, StoreError> {
    item.get(name)
        .and_then(AttributeValue::as_i64)
        .ok_or_else(|| StoreError::Mapping(format!("document {} has no numeric {}", id, name)))
}

fn optional_timestamp(item: &Item, name: &str) -> Result<Option<DateTime<Utc>>, StoreError> {
    match item.get(name) {
        Some(value) => timestamp::decode(value),
        None => Ok(None),
    }
}

fn optional_string(item: &Item, name: &str) -> Option<String> {
    item.get(name)
        .and_then(AttributeValue::as_str)
        .map(str::to_string)
}

fn optional_version(item: &Item, id: &str) -> Result<Option<u64>, StoreError> {
    match item.get(attr::VERSION) {
        None | Some(AttributeValue::Null) => Ok(None),
        Some(AttributeValue::N(raw)) => raw.parse().map(Some).map_err(|_| {
            StoreError::Mapping(format!("document {} has invalid version {}", id, raw))
        }),
        Some(other) => Err(StoreError::Mapping(format!(
            "document {} has non-numeric version {:?}",
            id, other
        ))),
    }
}
