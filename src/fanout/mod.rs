//! Fan-out - `axis IN {v1..vn}` as concurrent equality queries.
//!
//! The engine has no multi-value condition on a sort key, so an IN query is
//! split into one equality query per distinct value. Sub-queries run on a
//! dedicated, bounded thread pool and are joined before returning:
//!
//! - an empty value set returns immediately and issues no query;
//! - the first failing sub-query fails the whole operation and partial
//!   results are dropped;
//! - results are concatenated with no global ordering.
//!
//! Each document has one value per axis, so sub-queries over distinct
//! values never return the same document twice.

use std::collections::HashSet;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::document::Document;
use crate::error::DocumentError;
use crate::store::{
    AttributeValue, DocumentStore, Filter, IndexName, QueryRequest, SortCondition, StoreError,
};

/// One logical `owner = X AND axis IN {..}` query.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisQuery {
    pub owner_id: i64,
    /// Index whose sort key is the axis.
    pub index: IndexName,
    pub values: Vec<AttributeValue>,
    /// Extra filter applied identically to every sub-query.
    pub filter: Option<Filter>,
}

impl AxisQuery {
    pub fn new<I, V>(owner_id: i64, index: IndexName, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<AttributeValue>,
    {
        Self {
            owner_id,
            index,
            values: values.into_iter().map(Into::into).collect(),
            filter: None,
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Values in first-seen order with duplicates removed.
    pub fn distinct_values(&self) -> Vec<AttributeValue> {
        let mut seen = HashSet::new();
        self.values
            .iter()
            .filter(|value| seen.insert(*value))
            .cloned()
            .collect()
    }

    fn sub_query(&self, value: &AttributeValue) -> QueryRequest {
        QueryRequest::index(self.index, self.owner_id)
            .sort(SortCondition::Eq(value.clone()))
            .filter(self.filter.clone())
    }
}

/// Runs [`AxisQuery`]s with at most `parallelism` sub-queries in flight.
pub struct FanOutExecutor {
    pool: ThreadPool,
    parallelism: usize,
}

impl FanOutExecutor {
    pub fn new(parallelism: usize) -> Result<Self, DocumentError> {
        if parallelism == 0 {
            return Err(DocumentError::Config(
                "fan-out parallelism must be at least 1".into(),
            ));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(parallelism)
            .thread_name(|i| format!("docmeta-fanout-{}", i))
            .build()
            .map_err(|e| DocumentError::Config(format!("fan-out pool: {}", e)))?;
        Ok(Self { pool, parallelism })
    }

    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    /// Run every sub-query of `query` and concatenate the results.
    pub fn execute<S: DocumentStore>(
        &self,
        store: &S,
        query: &AxisQuery,
    ) -> Result<Vec<Document>, StoreError> {
        let values = query.distinct_values();
        if values.is_empty() {
            debug!(
                owner_id = query.owner_id,
                index = query.index.as_str(),
                "empty value set, no sub-queries issued"
            );
            return Ok(Vec::new());
        }

        debug!(
            owner_id = query.owner_id,
            index = query.index.as_str(),
            sub_queries = values.len(),
            parallelism = self.parallelism,
            "fanning out"
        );

        let per_value: Vec<Vec<Document>> = self.pool.install(|| {
            values
                .par_iter()
                .map(|value| store.query_all(&query.sub_query(value)))
                .collect::<Result<Vec<_>, StoreError>>()
        })?;

        Ok(per_value.into_iter().flatten().collect())
    }
}
