//! Domain service - company pages and their linked tab documents

use super::events::{DirectoryEvent, EventPublisher};
use super::repository::{CompanyPageRepository, StorageError, TabRepository};
use super::validation;
use crate::config::Config;
use crate::contract::{
    CompanyPage, CompanyPageDraft, CompanyPageFilter, CompanyPageSummary, CompanyTabView,
    DirectoryError, PageLayout, Paginated, PopulatedCompanyPage, PopulatedTabs, TabDocument,
    TabKind, TabLinks,
};
use std::sync::Arc;
use uuid::Uuid;

/// Domain service for company pages and tab documents
pub struct Service {
    pages: Arc<dyn CompanyPageRepository>,
    tabs: Arc<dyn TabRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    config: Config,
}

impl Service {
    /// Create a new service instance with default configuration
    pub fn new(
        pages: Arc<dyn CompanyPageRepository>,
        tabs: Arc<dyn TabRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self::with_config(pages, tabs, event_publisher, Config::default())
    }

    pub fn with_config(
        pages: Arc<dyn CompanyPageRepository>,
        tabs: Arc<dyn TabRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        config: Config,
    ) -> Self {
        Self {
            pages,
            tabs,
            event_publisher,
            config,
        }
    }

    // ===== Company Page Operations =====

    /// Create a company page; linked tabs must already exist
    pub async fn create_company_page(
        &self,
        draft: CompanyPageDraft,
    ) -> Result<PopulatedCompanyPage, DirectoryError> {
        let page = CompanyPage::from_draft(draft);
        self.validate_page(&page)?;
        self.ensure_slug_free(&page.slug).await?;
        self.ensure_tabs_exist(&page.tabs, None).await?;

        let created = self
            .pages
            .insert(&page)
            .await
            .map_err(|e| storage_error(e, "create company page"))?;

        tracing::info!(slug = %created.slug, id = %created.id, "company page created");
        self.publish(DirectoryEvent::page_created(
            created.id,
            &created.slug,
            created.version,
        ))
        .await;

        self.populate(created).await
    }

    /// Create a contact numbers tab and a page linking it, atomically
    pub async fn create_with_contact_numbers(
        &self,
        draft: CompanyPageDraft,
        contact_numbers: serde_json::Value,
    ) -> Result<PopulatedCompanyPage, DirectoryError> {
        self.validate_content(TabKind::Numbers, &contact_numbers)?;

        let mut page = CompanyPage::from_draft(draft);
        let tab = TabDocument::new(TabKind::Numbers, contact_numbers);
        page.tabs.set(TabKind::Numbers, Some(tab.id));

        self.validate_page(&page)?;
        self.ensure_slug_free(&page.slug).await?;
        self.ensure_tabs_exist(&page.tabs, Some(TabKind::Numbers))
            .await?;

        let (created, tab) = self
            .pages
            .insert_with_tab(&page, &tab)
            .await
            .map_err(|e| storage_error(e, "create company page with contact numbers"))?;

        tracing::info!(
            slug = %created.slug,
            tab_id = %tab.id,
            "company page created with contact numbers"
        );
        self.publish(DirectoryEvent::page_created(
            created.id,
            &created.slug,
            created.version,
        ))
        .await;
        self.publish(DirectoryEvent::tab_linked(
            &created.slug,
            TabKind::Numbers,
            Some(tab.id),
        ))
        .await;

        self.populate(created).await
    }

    /// Create or replace the contact numbers of a page.
    ///
    /// Keyed by (page, numbers): a live linked tab is updated in place,
    /// otherwise a new tab is created and linked in one transaction.
    pub async fn add_contact_numbers(
        &self,
        slug: &str,
        contact_numbers: serde_json::Value,
    ) -> Result<PopulatedCompanyPage, DirectoryError> {
        self.validate_content(TabKind::Numbers, &contact_numbers)?;
        let page = self.require_page(slug).await?;

        if let Some(tab_id) = page.tabs.get(TabKind::Numbers) {
            if let Some(mut existing) = self.find_tab(TabKind::Numbers, tab_id).await? {
                existing.content = contact_numbers.clone();
                existing.updated_at = chrono::Utc::now();
                let replaced = self
                    .tabs
                    .update(&existing)
                    .await
                    .map_err(|e| storage_error(e, "update contact numbers"))?;
                if replaced.is_some() {
                    tracing::info!(%slug, %tab_id, "contact numbers replaced in place");
                    return self.populate(page).await;
                }
            }
            tracing::warn!(%slug, %tab_id, "numbers tab link is dangling, relinking");
        }

        let tab = TabDocument::new(TabKind::Numbers, contact_numbers);
        let mut next = page.next_version();
        next.tabs.set(TabKind::Numbers, Some(tab.id));

        let (updated, tab) = self
            .pages
            .attach_new_tab(&next, &tab)
            .await
            .map_err(|e| storage_error(e, "attach contact numbers"))?
            .ok_or_else(|| concurrent_write(slug))?;

        tracing::info!(%slug, tab_id = %tab.id, "contact numbers linked");
        self.publish(DirectoryEvent::tab_linked(slug, TabKind::Numbers, Some(tab.id)))
            .await;

        self.populate(updated).await
    }

    /// List company pages, newest first
    pub async fn list_company_pages(
        &self,
        filter: CompanyPageFilter,
        page: Option<u64>,
        limit: Option<u64>,
    ) -> Result<Paginated<CompanyPage>, DirectoryError> {
        let page = page.unwrap_or(1).max(1);
        let limit = limit
            .unwrap_or(self.config.default_page_size)
            .clamp(1, self.config.max_page_size);
        let offset = (page - 1).saturating_mul(limit);

        let total = self
            .pages
            .count(&filter)
            .await
            .map_err(|e| storage_error(e, "count company pages"))?;
        let items = self
            .pages
            .list(&filter, limit, offset)
            .await
            .map_err(|e| storage_error(e, "list company pages"))?;

        Ok(Paginated {
            items,
            page,
            limit,
            total,
        })
    }

    /// Get a company page with every tab populated
    pub async fn get_company_page(
        &self,
        slug: &str,
    ) -> Result<PopulatedCompanyPage, DirectoryError> {
        let page = self.require_page(slug).await?;
        self.populate(page).await
    }

    /// Projection-only listing of a category, highest rated first
    pub async fn get_by_category(
        &self,
        category_id: &str,
        sub_category_id: Option<&str>,
    ) -> Result<Vec<CompanyPageSummary>, DirectoryError> {
        if category_id.trim().is_empty() {
            return Err(DirectoryError::validation("categoryId cannot be empty"));
        }

        let filter = CompanyPageFilter {
            category_id: Some(category_id.to_string()),
            sub_category_id: sub_category_id.map(str::to_string),
        };

        let pages = self
            .pages
            .top_rated(&filter, self.config.max_category_results)
            .await
            .map_err(|e| storage_error(e, "list category pages"))?;

        Ok(pages.iter().map(CompanyPageSummary::from).collect())
    }

    /// Replace a company page; `expected_version` guards against lost updates
    pub async fn update_company_page(
        &self,
        slug: &str,
        draft: CompanyPageDraft,
        expected_version: Option<i64>,
    ) -> Result<PopulatedCompanyPage, DirectoryError> {
        let existing = self.require_page(slug).await?;
        check_version(&existing, expected_version)?;

        let next = existing.replaced_by(draft);
        self.validate_page(&next)?;
        if next.slug != existing.slug {
            self.ensure_slug_free(&next.slug).await?;
        }
        // Stored dangling links are kept as-is; only new links are checked
        self.ensure_tabs_exist(&changed_links(&next.tabs, &existing.tabs), None)
            .await?;

        let updated = self.write_page(slug, &next).await?;

        tracing::info!(%slug, new_slug = %updated.slug, version = updated.version, "company page replaced");
        self.publish(DirectoryEvent::page_updated(
            updated.id,
            &updated.slug,
            updated.version,
        ))
        .await;

        self.populate(updated).await
    }

    /// Delete a company page; linked tab documents are kept
    pub async fn delete_company_page(&self, slug: &str) -> Result<CompanyPage, DirectoryError> {
        let page = self.require_page(slug).await?;

        let deleted = self
            .pages
            .delete(slug)
            .await
            .map_err(|e| storage_error(e, "delete company page"))?;
        if !deleted {
            return Err(DirectoryError::not_found("company_page", slug));
        }

        tracing::info!(
            %slug,
            dangling_tabs = page.tabs.linked().count(),
            "company page deleted"
        );
        self.publish(DirectoryEvent::page_deleted(page.id, &page.slug, page.version))
            .await;

        Ok(page)
    }

    /// Search pages by name, description or slug
    pub async fn search_company_pages(
        &self,
        query: &str,
        limit: Option<u64>,
    ) -> Result<Vec<CompanyPage>, DirectoryError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DirectoryError::validation("search query cannot be empty"));
        }

        let limit = limit
            .unwrap_or(self.config.search_limit)
            .clamp(1, self.config.max_page_size);

        self.pages
            .search(query, limit)
            .await
            .map_err(|e| storage_error(e, "search company pages"))
    }

    /// Get one tab of a page together with the company projection
    pub async fn get_company_tab(
        &self,
        slug: &str,
        tab_name: &str,
    ) -> Result<CompanyTabView, DirectoryError> {
        let kind = resolve_tab(tab_name)?;
        let page = self.require_page(slug).await?;

        let tab_id = page
            .tabs
            .get(kind)
            .ok_or_else(|| DirectoryError::not_found("tab", format!("{}/{}", slug, kind)))?;

        let tab = self.find_tab(kind, tab_id).await?.ok_or_else(|| {
            tracing::warn!(%slug, tab = %kind, %tab_id, "dangling tab reference");
            DirectoryError::not_found("tab", format!("{}/{}", slug, kind))
        })?;

        Ok(CompanyTabView {
            company: CompanyPageSummary::from(&page),
            tab,
        })
    }

    /// Update the linked contact numbers tab in place
    pub async fn update_contact_numbers_tab(
        &self,
        slug: &str,
        contact_numbers: serde_json::Value,
    ) -> Result<TabDocument, DirectoryError> {
        self.validate_content(TabKind::Numbers, &contact_numbers)?;
        let page = self.require_page(slug).await?;

        let tab_id = page.tabs.get(TabKind::Numbers).ok_or_else(|| {
            DirectoryError::not_found("tab", format!("{}/{}", slug, TabKind::Numbers))
        })?;

        let mut tab = self
            .find_tab(TabKind::Numbers, tab_id)
            .await?
            .ok_or_else(|| DirectoryError::not_found("tab", tab_id.to_string()))?;
        tab.content = contact_numbers;
        tab.updated_at = chrono::Utc::now();

        self.tabs
            .update(&tab)
            .await
            .map_err(|e| storage_error(e, "update contact numbers"))?
            .ok_or_else(|| DirectoryError::not_found("tab", tab_id.to_string()))
    }

    /// Overwrite the dynamic components of a page
    pub async fn save_dynamic_components(
        &self,
        slug: &str,
        components: Vec<serde_json::Value>,
    ) -> Result<CompanyPage, DirectoryError> {
        self.update_layout(
            slug,
            PageLayout {
                selected_tabs: None,
                dynamic_components: Some(components),
            },
            None,
        )
        .await
    }

    /// Replace the admin-managed layout (selected tabs, dynamic components)
    pub async fn update_layout(
        &self,
        slug: &str,
        layout: PageLayout,
        expected_version: Option<i64>,
    ) -> Result<CompanyPage, DirectoryError> {
        if let Some(tabs) = &layout.selected_tabs {
            validation::validate_selected_tabs(tabs)?;
        }
        if let Some(components) = &layout.dynamic_components {
            validation::validate_dynamic_components(
                components,
                self.config.max_dynamic_components,
            )?;
        }

        let page = self.require_page(slug).await?;
        check_version(&page, expected_version)?;

        let mut next = page.next_version();
        if let Some(tabs) = layout.selected_tabs {
            next.selected_tabs = tabs;
        }
        if let Some(components) = layout.dynamic_components {
            next.dynamic_components = components;
        }

        let updated = self.write_page(slug, &next).await?;

        tracing::debug!(
            %slug,
            components = updated.dynamic_components.len(),
            selected_tabs = updated.selected_tabs.len(),
            "layout saved"
        );
        self.publish(DirectoryEvent::page_updated(
            updated.id,
            &updated.slug,
            updated.version,
        ))
        .await;

        Ok(updated)
    }

    /// Link an existing tab document to a page
    pub async fn link_tab(
        &self,
        slug: &str,
        tab_name: &str,
        tab_id: Uuid,
    ) -> Result<PopulatedCompanyPage, DirectoryError> {
        let kind = resolve_tab(tab_name)?;
        if self.find_tab(kind, tab_id).await?.is_none() {
            return Err(DirectoryError::not_found("tab", tab_id.to_string()));
        }

        self.set_link(slug, kind, Some(tab_id)).await
    }

    /// Clear a tab reference; the tab document is kept
    pub async fn unlink_tab(
        &self,
        slug: &str,
        tab_name: &str,
    ) -> Result<PopulatedCompanyPage, DirectoryError> {
        let kind = resolve_tab(tab_name)?;
        self.set_link(slug, kind, None).await
    }

    // ===== Tab Document Operations =====

    /// Create a standalone tab document
    pub async fn create_tab(
        &self,
        tab_name: &str,
        content: serde_json::Value,
    ) -> Result<TabDocument, DirectoryError> {
        let kind = resolve_tab(tab_name)?;
        self.validate_content(kind, &content)?;

        let tab = self
            .tabs
            .create(&TabDocument::new(kind, content))
            .await
            .map_err(|e| storage_error(e, "create tab"))?;

        tracing::info!(tab = %kind, id = %tab.id, "tab document created");
        Ok(tab)
    }

    /// Create a standalone contact numbers tab
    pub async fn create_contact_numbers_tab(
        &self,
        content: serde_json::Value,
    ) -> Result<TabDocument, DirectoryError> {
        self.create_tab(TabKind::Numbers.as_str(), content).await
    }

    /// Get a tab document by kind and id
    pub async fn get_tab(&self, tab_name: &str, id: Uuid) -> Result<TabDocument, DirectoryError> {
        let kind = resolve_tab(tab_name)?;
        self.find_tab(kind, id)
            .await?
            .ok_or_else(|| DirectoryError::not_found("tab", id.to_string()))
    }

    /// Replace the content of a tab document
    pub async fn update_tab(
        &self,
        tab_name: &str,
        id: Uuid,
        content: serde_json::Value,
    ) -> Result<TabDocument, DirectoryError> {
        let kind = resolve_tab(tab_name)?;
        self.validate_content(kind, &content)?;

        let mut tab = self
            .find_tab(kind, id)
            .await?
            .ok_or_else(|| DirectoryError::not_found("tab", id.to_string()))?;
        tab.content = content;
        tab.updated_at = chrono::Utc::now();

        self.tabs
            .update(&tab)
            .await
            .map_err(|e| storage_error(e, "update tab"))?
            .ok_or_else(|| DirectoryError::not_found("tab", id.to_string()))
    }

    /// Delete a tab document; pages referencing it keep a dangling link
    pub async fn delete_tab(&self, tab_name: &str, id: Uuid) -> Result<(), DirectoryError> {
        let kind = resolve_tab(tab_name)?;
        let deleted = self
            .tabs
            .delete(kind, id)
            .await
            .map_err(|e| storage_error(e, "delete tab"))?;

        if !deleted {
            return Err(DirectoryError::not_found("tab", id.to_string()));
        }
        tracing::info!(tab = %kind, %id, "tab document deleted");
        Ok(())
    }

    // ===== Helper Methods =====

    async fn set_link(
        &self,
        slug: &str,
        kind: TabKind,
        tab_id: Option<Uuid>,
    ) -> Result<PopulatedCompanyPage, DirectoryError> {
        let page = self.require_page(slug).await?;
        if page.tabs.get(kind) == tab_id {
            return self.populate(page).await;
        }

        let mut next = page.next_version();
        next.tabs.set(kind, tab_id);
        let updated = self.write_page(slug, &next).await?;

        tracing::info!(%slug, tab = %kind, ?tab_id, "tab link changed");
        self.publish(DirectoryEvent::tab_linked(slug, kind, tab_id))
            .await;

        self.populate(updated).await
    }

    /// Resolve every tab reference; dangling links populate as empty
    async fn populate(&self, page: CompanyPage) -> Result<PopulatedCompanyPage, DirectoryError> {
        let mut tabs = PopulatedTabs::default();

        for (kind, id) in page.tabs.linked() {
            match self.find_tab(kind, id).await? {
                Some(tab) => tabs.insert(tab),
                None => {
                    tracing::warn!(slug = %page.slug, tab = %kind, %id, "dangling tab reference")
                }
            }
        }

        Ok(PopulatedCompanyPage { page, tabs })
    }

    async fn find_tab(
        &self,
        kind: TabKind,
        id: Uuid,
    ) -> Result<Option<TabDocument>, DirectoryError> {
        self.tabs
            .find(kind, id)
            .await
            .map_err(|e| storage_error(e, "find tab"))
    }

    async fn require_page(&self, slug: &str) -> Result<CompanyPage, DirectoryError> {
        self.pages
            .find_by_slug(slug)
            .await
            .map_err(|e| storage_error(e, "find company page"))?
            .ok_or_else(|| DirectoryError::not_found("company_page", slug))
    }

    /// Conditional write of `next` (version already bumped)
    async fn write_page(
        &self,
        slug: &str,
        next: &CompanyPage,
    ) -> Result<CompanyPage, DirectoryError> {
        match self
            .pages
            .replace(next)
            .await
            .map_err(|e| storage_error(e, "replace company page"))?
        {
            Some(page) => Ok(page),
            None => match self.pages.find_by_slug(slug).await {
                Ok(None) => Err(DirectoryError::not_found("company_page", slug)),
                Ok(Some(_)) => Err(concurrent_write(slug)),
                Err(e) => Err(storage_error(e, "reload company page")),
            },
        }
    }

    async fn ensure_slug_free(&self, slug: &str) -> Result<(), DirectoryError> {
        if self
            .pages
            .slug_exists(slug)
            .await
            .map_err(|e| storage_error(e, "check slug"))?
        {
            return Err(DirectoryError::conflict(format!(
                "company page with slug '{}' already exists",
                slug
            )));
        }
        Ok(())
    }

    /// Every linked tab must exist with the matching kind
    async fn ensure_tabs_exist(
        &self,
        links: &TabLinks,
        skip: Option<TabKind>,
    ) -> Result<(), DirectoryError> {
        for (kind, id) in links.linked() {
            if Some(kind) == skip {
                continue;
            }
            if self.find_tab(kind, id).await?.is_none() {
                return Err(DirectoryError::validation(format!(
                    "tabs.{} references missing tab document {}",
                    kind, id
                )));
            }
        }
        Ok(())
    }

    fn validate_page(&self, page: &CompanyPage) -> Result<(), DirectoryError> {
        validation::validate_company_page(page)?;
        validation::validate_dynamic_components(
            &page.dynamic_components,
            self.config.max_dynamic_components,
        )
    }

    fn validate_content(
        &self,
        kind: TabKind,
        content: &serde_json::Value,
    ) -> Result<(), DirectoryError> {
        if !content.is_object() {
            return Err(DirectoryError::validation(format!(
                "{} tab content must be a JSON object",
                kind
            )));
        }
        if self.config.strict_tab_validation {
            validation::validate_tab_content(kind, content)?;
        }
        Ok(())
    }

    async fn publish(&self, event: DirectoryEvent) {
        if let Err(e) = self.event_publisher.publish(event).await {
            tracing::warn!("Failed to publish directory event: {}", e);
        }
    }
}

/// Check a tab name against the allow-list
pub fn resolve_tab(tab_name: &str) -> Result<TabKind, DirectoryError> {
    TabKind::from_name(tab_name).ok_or_else(|| DirectoryError::UnknownTab {
        name: tab_name.to_string(),
    })
}

/// Links in `next` that differ from `previous`
fn changed_links(next: &TabLinks, previous: &TabLinks) -> TabLinks {
    let mut changed = TabLinks::default();
    for (kind, id) in next.linked() {
        if previous.get(kind) != Some(id) {
            changed.set(kind, Some(id));
        }
    }
    changed
}

fn check_version(page: &CompanyPage, expected: Option<i64>) -> Result<(), DirectoryError> {
    match expected {
        Some(version) if version != page.version => Err(DirectoryError::conflict(format!(
            "company page '{}' is at version {}, expected {}",
            page.slug, page.version, version
        ))),
        _ => Ok(()),
    }
}

fn concurrent_write(slug: &str) -> DirectoryError {
    DirectoryError::conflict(format!(
        "company page '{}' was modified concurrently",
        slug
    ))
}

fn storage_error(error: anyhow::Error, operation: &str) -> DirectoryError {
    if StorageError::is_duplicate_key(&error) {
        return DirectoryError::conflict(error.to_string());
    }
    tracing::error!("Storage error during {}: {:?}", operation, error);
    DirectoryError::Internal
}
