//! Repository traits for data access
//!
//! These traits define the interface for data access operations.
//! Implementations are in infra/storage/repositories.rs

use crate::contract::{
    CompanyPage, CompanyPageFilter, SeoKey, SeoPageType, SeoRecord, TabDocument, TabKind,
};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Storage failures the domain reacts to; everything else is opaque
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A unique key (e.g., the page slug) is already taken
    #[error("duplicate key: {0}")]
    DuplicateKey(String),
}

impl StorageError {
    /// Whether an opaque repository error is a unique-key violation
    pub fn is_duplicate_key(error: &anyhow::Error) -> bool {
        matches!(
            error.downcast_ref::<StorageError>(),
            Some(StorageError::DuplicateKey(_))
        )
    }
}

/// Repository for company pages
#[async_trait]
pub trait CompanyPageRepository: Send + Sync {
    /// Insert a new company page
    async fn insert(&self, page: &CompanyPage) -> Result<CompanyPage>;

    /// Insert a tab document and a page linking it in one transaction
    async fn insert_with_tab(
        &self,
        page: &CompanyPage,
        tab: &TabDocument,
    ) -> Result<(CompanyPage, TabDocument)>;

    /// Insert a tab document and link it to the page in one transaction.
    ///
    /// `page` carries the updated links and its bumped version; returns `None`
    /// when the stored version no longer matches `page.version - 1`.
    async fn attach_new_tab(
        &self,
        page: &CompanyPage,
        tab: &TabDocument,
    ) -> Result<Option<(CompanyPage, TabDocument)>>;

    /// Find a company page by slug
    async fn find_by_slug(&self, slug: &str) -> Result<Option<CompanyPage>>;

    /// Check whether a slug is taken
    async fn slug_exists(&self, slug: &str) -> Result<bool>;

    /// List pages matching the filter, newest first
    async fn list(
        &self,
        filter: &CompanyPageFilter,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<CompanyPage>>;

    /// Highest rated pages matching the filter, at most `limit`
    async fn top_rated(&self, filter: &CompanyPageFilter, limit: u64) -> Result<Vec<CompanyPage>>;

    /// Count pages matching the filter
    async fn count(&self, filter: &CompanyPageFilter) -> Result<u64>;

    /// ASCII case-insensitive substring search over name, description and slug,
    /// ordered by rating (highest first)
    async fn search(&self, query: &str, limit: u64) -> Result<Vec<CompanyPage>>;

    /// Replace a page by id if the stored version equals `page.version - 1`.
    ///
    /// Returns `None` when the page is gone or was written concurrently.
    async fn replace(&self, page: &CompanyPage) -> Result<Option<CompanyPage>>;

    /// Delete a page by slug; tab documents are left untouched
    async fn delete(&self, slug: &str) -> Result<bool>;
}

/// Repository for tab documents
#[async_trait]
pub trait TabRepository: Send + Sync {
    /// Create a tab document
    async fn create(&self, tab: &TabDocument) -> Result<TabDocument>;

    /// Find a tab document of the given kind by id
    async fn find(&self, kind: TabKind, id: Uuid) -> Result<Option<TabDocument>>;

    /// Replace the content of an existing tab document
    async fn update(&self, tab: &TabDocument) -> Result<Option<TabDocument>>;

    /// Delete a tab document; parent pages are not updated
    async fn delete(&self, kind: TabKind, id: Uuid) -> Result<bool>;
}

/// Repository for SEO records
#[async_trait]
pub trait SeoRepository: Send + Sync {
    /// Create or replace the record stored under `record.key`
    async fn upsert(&self, record: &SeoRecord) -> Result<SeoRecord>;

    /// Find a record by exact key
    async fn find_by_key(&self, key: &SeoKey) -> Result<Option<SeoRecord>>;

    /// List records, optionally restricted to one page type
    async fn list(&self, page_type: Option<SeoPageType>) -> Result<Vec<SeoRecord>>;

    /// Delete a record by exact key
    async fn delete(&self, key: &SeoKey) -> Result<bool>;
}
