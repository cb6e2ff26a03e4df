//! Listing and search operations.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::document_service::{require_range, require_text, DocumentService};
use crate::document::{attr, Document};
use crate::error::DocumentError;
use crate::fanout::AxisQuery;
use crate::pagination::{slice_in_memory, CursorPager, Page, PageRequest, Slice};
use crate::store::{
    AttributeValue, DocumentStore, Filter, IndexName, PageCursor, QueryRequest, SortCondition,
};
use crate::timestamp;

impl<S: DocumentStore> DocumentService<S> {
    /// One page of an owner's documents, in `createdAt` order.
    ///
    /// Pages through the owner/createdAt index with the engine's cursor, so
    /// documents without a `createdAt` are not listed.
    pub fn list_by_owner(
        &self,
        owner_id: i64,
        request: PageRequest,
    ) -> Result<Slice<Document>, DocumentError> {
        info!(
            owner_id,
            page = request.page(),
            size = request.size(),
            "list_by_owner"
        );

        let base = QueryRequest::index(IndexName::OwnerCreatedAt, owner_id);
        let slice = CursorPager::new(&self.store).fetch(&base, request)?;

        info!(
            owner_id,
            count = slice.len(),
            has_next = slice.has_next,
            "list_by_owner done"
        );
        Ok(slice)
    }

    /// Continue [`list_by_owner`](Self::list_by_owner) from a cursor token
    /// without re-walking earlier pages.
    pub fn list_by_owner_after(
        &self,
        owner_id: i64,
        cursor_token: &str,
        request: PageRequest,
    ) -> Result<Slice<Document>, DocumentError> {
        require_text("cursor", cursor_token)?;
        let cursor = PageCursor::decode(cursor_token)?;
        if cursor.key().get(attr::OWNER_ID) != Some(&AttributeValue::number(owner_id)) {
            return Err(DocumentError::Validation(format!(
                "cursor does not belong to owner {}",
                owner_id
            )));
        }
        info!(owner_id, page = request.page(), size = request.size(), "list_by_owner_after");

        let base = QueryRequest::index(IndexName::OwnerCreatedAt, owner_id);
        let slice = CursorPager::new(&self.store).fetch_after(&base, cursor, request)?;

        info!(owner_id, count = slice.len(), has_next = slice.has_next, "list_by_owner_after done");
        Ok(slice)
    }

    /// Documents whose `createdAt` lies in `[start, end]`, both ends inclusive.
    pub fn list_by_owner_and_date_range(
        &self,
        owner_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Document>, DocumentError> {
        require_range(&start, &end)?;
        info!(owner_id, %start, %end, "list_by_owner_and_date_range");

        let request = QueryRequest::index(IndexName::OwnerCreatedAt, owner_id)
            .sort(created_between(&start, &end));
        let documents = self.store.query_all(&request)?;

        info!(owner_id, count = documents.len(), "list_by_owner_and_date_range done");
        Ok(documents)
    }

    /// Documents in any of `categories`; one parallel query per category.
    pub fn list_by_owner_and_categories_in(
        &self,
        owner_id: i64,
        categories: &[i64],
    ) -> Result<Vec<Document>, DocumentError> {
        info!(owner_id, ?categories, "list_by_owner_and_categories_in");

        let query = AxisQuery::new(owner_id, IndexName::OwnerCategory, categories.iter().copied());
        let documents = self.fan_out.execute(&self.store, &query)?;

        info!(owner_id, count = documents.len(), "list_by_owner_and_categories_in done");
        Ok(documents)
    }

    /// Documents in any of `sub_categories`; one parallel query per value.
    pub fn list_by_owner_and_sub_categories_in(
        &self,
        owner_id: i64,
        sub_categories: &[i64],
    ) -> Result<Vec<Document>, DocumentError> {
        info!(owner_id, ?sub_categories, "list_by_owner_and_sub_categories_in");

        let query = AxisQuery::new(
            owner_id,
            IndexName::OwnerSubCategory,
            sub_categories.iter().copied(),
        );
        let documents = self.fan_out.execute(&self.store, &query)?;

        info!(owner_id, count = documents.len(), "list_by_owner_and_sub_categories_in done");
        Ok(documents)
    }

    /// Like [`list_by_owner_and_sub_categories_in`](Self::list_by_owner_and_sub_categories_in),
    /// keeping only documents updated strictly after `min_updated_at`.
    pub fn list_by_owner_and_sub_categories_in_updated_after(
        &self,
        owner_id: i64,
        sub_categories: &[i64],
        min_updated_at: DateTime<Utc>,
    ) -> Result<Vec<Document>, DocumentError> {
        info!(
            owner_id,
            ?sub_categories,
            %min_updated_at,
            "list_by_owner_and_sub_categories_in_updated_after"
        );

        let query = AxisQuery::new(
            owner_id,
            IndexName::OwnerSubCategory,
            sub_categories.iter().copied(),
        )
        .filter(Filter::gt(attr::UPDATED_AT, min_updated_at));
        let documents = self.fan_out.execute(&self.store, &query)?;

        info!(
            owner_id,
            count = documents.len(),
            "list_by_owner_and_sub_categories_in_updated_after done"
        );
        Ok(documents)
    }

    /// Equality on the category index, sub-category as a post-filter.
    pub fn list_by_owner_and_category_and_sub_category(
        &self,
        owner_id: i64,
        category: i64,
        sub_category: i64,
    ) -> Result<Vec<Document>, DocumentError> {
        info!(
            owner_id,
            category, sub_category, "list_by_owner_and_category_and_sub_category"
        );

        let request = QueryRequest::index(IndexName::OwnerCategory, owner_id)
            .sort(SortCondition::Eq(AttributeValue::number(category)))
            .filter(Some(Filter::eq(attr::SUB_CATEGORY, sub_category)));
        let documents = self.store.query_all(&request)?;

        info!(
            owner_id,
            count = documents.len(),
            "list_by_owner_and_category_and_sub_category done"
        );
        Ok(documents)
    }

    /// Documents created by `created_by`.
    ///
    /// Reads the owner's whole partition: `createdBy` is not a key.
    pub fn list_by_owner_and_created_by(
        &self,
        owner_id: i64,
        created_by: &str,
    ) -> Result<Vec<Document>, DocumentError> {
        require_text("created_by", created_by)?;
        info!(owner_id, created_by, "list_by_owner_and_created_by");

        let request = QueryRequest::index(IndexName::OwnerCreatedAt, owner_id)
            .filter(Some(Filter::eq(attr::CREATED_BY, created_by)));
        let documents = self.store.query_all(&request)?;

        info!(owner_id, count = documents.len(), "list_by_owner_and_created_by done");
        Ok(documents)
    }

    /// Documents created by `created_by` and updated strictly after
    /// `min_updated_at`.
    ///
    /// Dispatched as an index query but costs as much as scanning the
    /// owner's partition, since neither attribute is a key.
    pub fn list_by_owner_and_created_by_with_min_updated_at(
        &self,
        owner_id: i64,
        created_by: &str,
        min_updated_at: DateTime<Utc>,
    ) -> Result<Vec<Document>, DocumentError> {
        require_text("created_by", created_by)?;
        info!(
            owner_id,
            created_by,
            %min_updated_at,
            "list_by_owner_and_created_by_with_min_updated_at"
        );

        let filter = Filter::eq(attr::CREATED_BY, created_by)
            .and(Filter::gt(attr::UPDATED_AT, min_updated_at));
        let request =
            QueryRequest::index(IndexName::OwnerCreatedAt, owner_id).filter(Some(filter));
        let documents = self.store.query_all(&request)?;

        info!(
            owner_id,
            count = documents.len(),
            "list_by_owner_and_created_by_with_min_updated_at done"
        );
        Ok(documents)
    }

    /// Documents created in `[start, end]` whose notes contain `keyword`
    /// (case-sensitive).
    pub fn list_by_owner_and_date_range_and_notes_containing(
        &self,
        owner_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        keyword: &str,
    ) -> Result<Vec<Document>, DocumentError> {
        require_range(&start, &end)?;
        require_text("keyword", keyword)?;
        info!(
            owner_id,
            %start,
            %end,
            keyword,
            "list_by_owner_and_date_range_and_notes_containing"
        );

        let request = QueryRequest::index(IndexName::OwnerCreatedAt, owner_id)
            .sort(created_between(&start, &end))
            .filter(Some(Filter::contains(attr::NOTES, keyword)));
        let documents = self.store.query_all(&request)?;

        info!(
            owner_id,
            count = documents.len(),
            "list_by_owner_and_date_range_and_notes_containing done"
        );
        Ok(documents)
    }

    /// A numbered page of the documents last updated by `updated_by`.
    ///
    /// The engine cannot paginate under a non-key filter, so this pulls
    /// every match in the owner's partition and slices in memory.
    pub fn list_by_owner_and_updated_by(
        &self,
        owner_id: i64,
        updated_by: &str,
        request: PageRequest,
    ) -> Result<Page<Document>, DocumentError> {
        require_text("updated_by", updated_by)?;
        info!(
            owner_id,
            updated_by,
            page = request.page(),
            size = request.size(),
            "list_by_owner_and_updated_by"
        );

        let query = QueryRequest::index(IndexName::OwnerCreatedAt, owner_id)
            .filter(Some(Filter::eq(attr::UPDATED_BY, updated_by)));
        let page = slice_in_memory(self.store.query_all(&query)?, request);

        info!(
            owner_id,
            count = page.content.len(),
            total = page.total_elements,
            has_next = page.has_next(),
            "list_by_owner_and_updated_by done"
        );
        Ok(page)
    }

    /// **Full table scan**: every document in `category` whose notes contain
    /// `keyword` (case-sensitive), across all owners.
    ///
    /// Refused when the configuration disables full scans.
    pub fn scan_by_category_and_notes_containing(
        &self,
        category: i64,
        keyword: &str,
    ) -> Result<Vec<Document>, DocumentError> {
        require_text("keyword", keyword)?;
        if !self.config.allow_full_scan {
            return Err(DocumentError::Validation(
                "full table scans are disabled".into(),
            ));
        }
        warn!(
            table = self.store.table_name(),
            category,
            keyword,
            "running full table scan"
        );

        let filter =
            Filter::eq(attr::CATEGORY, category).and(Filter::contains(attr::NOTES, keyword));
        let documents = self.store.scan(Some(&filter))?;

        info!(category, count = documents.len(), "scan_by_category_and_notes_containing done");
        Ok(documents)
    }
}

fn created_between(start: &DateTime<Utc>, end: &DateTime<Utc>) -> SortCondition {
    SortCondition::Between(
        timestamp::encode(Some(start)),
        timestamp::encode(Some(end)),
    )
}
