//! Request and response shapes for index queries and conditional writes.

use serde::{Deserialize, Serialize};

use super::attribute::{AttributeValue, Item};
use super::filter::{Filter, SortCondition};
use crate::document::{attr, Document};

/// Secondary indexes on the document table. All are partitioned by owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexName {
    OwnerCreatedAt,
    OwnerCategory,
    OwnerSubCategory,
}

impl IndexName {
    pub const ALL: [IndexName; 3] = [
        IndexName::OwnerCreatedAt,
        IndexName::OwnerCategory,
        IndexName::OwnerSubCategory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IndexName::OwnerCreatedAt => "ownerId-createdAt-index",
            IndexName::OwnerCategory => "ownerId-category-index",
            IndexName::OwnerSubCategory => "ownerId-subCategory-index",
        }
    }

    pub fn partition_attribute(&self) -> &'static str {
        attr::OWNER_ID
    }

    pub fn sort_attribute(&self) -> &'static str {
        match self {
            IndexName::OwnerCreatedAt => attr::CREATED_AT,
            IndexName::OwnerCategory => attr::CATEGORY,
            IndexName::OwnerSubCategory => attr::SUB_CATEGORY,
        }
    }
}

/// A key-condition query against the table or one of its indexes.
///
/// With `index = None` the partition value is matched against the primary
/// key `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub index: Option<IndexName>,
    pub partition_value: AttributeValue,
    pub sort_condition: Option<SortCondition>,
    pub filter: Option<Filter>,
    /// Maximum number of items evaluated (before the filter runs).
    pub limit: Option<usize>,
    pub consistent_read: bool,
    pub exclusive_start_key: Option<Item>,
}

impl QueryRequest {
    pub fn index(index: IndexName, partition_value: impl Into<AttributeValue>) -> Self {
        Self {
            index: Some(index),
            partition_value: partition_value.into(),
            sort_condition: None,
            filter: None,
            limit: None,
            consistent_read: false,
            exclusive_start_key: None,
        }
    }

    pub fn primary(id: &str) -> Self {
        Self {
            index: None,
            partition_value: AttributeValue::string(id),
            sort_condition: None,
            filter: None,
            limit: None,
            consistent_read: false,
            exclusive_start_key: None,
        }
    }

    pub fn sort(mut self, condition: SortCondition) -> Self {
        self.sort_condition = Some(condition);
        self
    }

    pub fn filter(mut self, filter: Option<Filter>) -> Self {
        self.filter = filter;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn consistent_read(mut self, consistent: bool) -> Self {
        self.consistent_read = consistent;
        self
    }

    pub fn start_from(mut self, key: Option<Item>) -> Self {
        self.exclusive_start_key = key;
        self
    }

    pub fn partition_attribute(&self) -> &'static str {
        self.index
            .map(|index| index.partition_attribute())
            .unwrap_or(attr::ID)
    }

    pub fn target(&self) -> &'static str {
        self.index.map(|index| index.as_str()).unwrap_or("primary")
    }
}

/// One page of query results.
#[derive(Debug, Clone, Default)]
pub struct QueryPage {
    pub items: Vec<Document>,
    /// Present iff more items remain after this page.
    pub last_evaluated_key: Option<Item>,
}

/// Result of a version-checked put.
#[derive(Debug, Clone, PartialEq)]
pub enum PutOutcome {
    /// The item was written; carries the document with its new version.
    Written(Document),
    /// The stored version did not match the version the caller wrote with.
    VersionConflict {
        id: String,
        /// Version the caller attempted to write against (`None` for a create).
        expected: Option<u64>,
        /// Version currently stored (`None` when no item exists).
        actual: Option<u64>,
    },
}
