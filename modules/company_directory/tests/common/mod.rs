//! Common test utilities: in-memory repositories and fixtures
#![allow(dead_code)]

use async_trait::async_trait;
use company_directory::contract::*;
use company_directory::domain::repository::{
    CompanyPageRepository, SeoRepository, StorageError, TabRepository,
};
use company_directory::domain::{BroadcastEventPublisher, SeoService, Service};
use parking_lot::RwLock;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

pub fn print_test_header(test_name: &str, purpose: &[&str]) {
    println!("\n🧪 TEST: {}", test_name);
    if let Some(first) = purpose.first() {
        println!("📋 PURPOSE: {}", first);
    }
    for line in purpose.iter().skip(1) {
        println!("   {}", line);
    }
}

pub fn print_json(label: &str, value: &Value) {
    println!(
        "   {}: {}",
        label,
        serde_json::to_string_pretty(value).unwrap_or_default()
    );
}

/// In-memory stand-in for all three repositories.
///
/// Pages, tabs and SEO records share one store so the two-step writes can be
/// applied all-or-nothing, like the database transaction does.
#[derive(Default)]
pub struct MockDb {
    pages: RwLock<HashMap<Uuid, CompanyPage>>,
    tabs: RwLock<HashMap<Uuid, TabDocument>>,
    seo: RwLock<HashMap<SeoKey, SeoRecord>>,
    /// Tab updates find their target already deleted
    tabs_vanish_on_update: AtomicBool,
    /// Page replaces lose the race and later page reads fail
    page_reads_fail_after_replace: AtomicBool,
    page_reads_failing: AtomicBool,
}

impl MockDb {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn page_count(&self) -> usize {
        self.pages.read().len()
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.read().len()
    }

    pub fn tab_count_of(&self, kind: TabKind) -> usize {
        self.tabs.read().values().filter(|t| t.kind == kind).count()
    }

    /// Remove a tab behind the service's back to create a dangling link
    pub fn remove_tab(&self, id: Uuid) {
        self.tabs.write().remove(&id);
    }

    /// Bump the stored version of a page as if another writer got there first
    pub fn bump_version(&self, slug: &str) {
        let mut pages = self.pages.write();
        if let Some(page) = pages.values_mut().find(|p| p.slug == slug) {
            page.version += 1;
        }
    }

    /// Delete each tab just before an update reaches it
    pub fn vanish_tabs_on_update(&self) {
        self.tabs_vanish_on_update.store(true, Ordering::SeqCst);
    }

    /// Make the next replace report a lost race, then fail page reads
    pub fn fail_reads_after_replace(&self) {
        self.page_reads_fail_after_replace.store(true, Ordering::SeqCst);
    }

    pub fn print_state(&self, context: &str) {
        println!("\n========== MockDb State: {} ==========", context);
        for page in self.pages.read().values() {
            println!(
                "  page {} v{} tabs={:?}",
                page.slug,
                page.version,
                page.tabs.linked().collect::<Vec<_>>()
            );
        }
        for tab in self.tabs.read().values() {
            println!("  tab {} {}", tab.kind, tab.id);
        }
        println!("  seo records: {}", self.seo.read().len());
        println!("==========================================\n");
    }

    fn slug_taken(pages: &HashMap<Uuid, CompanyPage>, slug: &str, except: Option<Uuid>) -> bool {
        pages
            .values()
            .any(|p| p.slug == slug && Some(p.id) != except)
    }

    fn matches(page: &CompanyPage, filter: &CompanyPageFilter) -> bool {
        filter
            .category_id
            .as_ref()
            .map_or(true, |c| &page.category_id == c)
            && filter
                .sub_category_id
                .as_ref()
                .map_or(true, |s| page.sub_category_id.as_ref() == Some(s))
    }

    fn duplicate(slug: &str) -> anyhow::Error {
        StorageError::DuplicateKey(format!("company_pages.slug = {}", slug)).into()
    }
}

#[async_trait]
impl CompanyPageRepository for MockDb {
    async fn insert(&self, page: &CompanyPage) -> anyhow::Result<CompanyPage> {
        let mut pages = self.pages.write();
        if Self::slug_taken(&pages, &page.slug, None) {
            return Err(Self::duplicate(&page.slug));
        }
        pages.insert(page.id, page.clone());
        Ok(page.clone())
    }

    async fn insert_with_tab(
        &self,
        page: &CompanyPage,
        tab: &TabDocument,
    ) -> anyhow::Result<(CompanyPage, TabDocument)> {
        let mut pages = self.pages.write();
        let mut tabs = self.tabs.write();
        if Self::slug_taken(&pages, &page.slug, None) {
            return Err(Self::duplicate(&page.slug));
        }
        tabs.insert(tab.id, tab.clone());
        pages.insert(page.id, page.clone());
        Ok((page.clone(), tab.clone()))
    }

    async fn attach_new_tab(
        &self,
        page: &CompanyPage,
        tab: &TabDocument,
    ) -> anyhow::Result<Option<(CompanyPage, TabDocument)>> {
        let mut pages = self.pages.write();
        let mut tabs = self.tabs.write();
        match pages.get(&page.id) {
            Some(stored) if stored.version == page.version - 1 => {}
            _ => return Ok(None),
        }
        tabs.insert(tab.id, tab.clone());
        pages.insert(page.id, page.clone());
        Ok(Some((page.clone(), tab.clone())))
    }

    async fn find_by_slug(&self, slug: &str) -> anyhow::Result<Option<CompanyPage>> {
        if self.page_reads_failing.load(Ordering::SeqCst) {
            anyhow::bail!("connection reset while reading company_pages");
        }
        Ok(self
            .pages
            .read()
            .values()
            .find(|p| p.slug == slug)
            .cloned())
    }

    async fn slug_exists(&self, slug: &str) -> anyhow::Result<bool> {
        Ok(Self::slug_taken(&self.pages.read(), slug, None))
    }

    async fn list(
        &self,
        filter: &CompanyPageFilter,
        limit: u64,
        offset: u64,
    ) -> anyhow::Result<Vec<CompanyPage>> {
        let mut pages: Vec<CompanyPage> = self
            .pages
            .read()
            .values()
            .filter(|p| Self::matches(p, filter))
            .cloned()
            .collect();
        pages.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.slug.cmp(&b.slug))
        });
        Ok(pages
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn top_rated(
        &self,
        filter: &CompanyPageFilter,
        limit: u64,
    ) -> anyhow::Result<Vec<CompanyPage>> {
        let mut pages: Vec<CompanyPage> = self
            .pages
            .read()
            .values()
            .filter(|p| Self::matches(p, filter))
            .cloned()
            .collect();
        pages.sort_by(|a, b| b.rating.total_cmp(&a.rating).then_with(|| a.slug.cmp(&b.slug)));
        pages.truncate(limit as usize);
        Ok(pages)
    }

    async fn count(&self, filter: &CompanyPageFilter) -> anyhow::Result<u64> {
        Ok(self
            .pages
            .read()
            .values()
            .filter(|p| Self::matches(p, filter))
            .count() as u64)
    }

    async fn search(&self, query: &str, limit: u64) -> anyhow::Result<Vec<CompanyPage>> {
        let needle = query.to_ascii_lowercase();
        let contains = |field: Option<&str>| {
            field.is_some_and(|f| f.to_ascii_lowercase().contains(&needle))
        };
        let mut pages: Vec<CompanyPage> = self
            .pages
            .read()
            .values()
            .filter(|p| {
                contains(Some(p.name.as_str()))
                    || contains(p.description.as_deref())
                    || contains(Some(p.slug.as_str()))
            })
            .cloned()
            .collect();
        pages.sort_by(|a, b| b.rating.total_cmp(&a.rating).then_with(|| a.name.cmp(&b.name)));
        pages.truncate(limit as usize);
        Ok(pages)
    }

    async fn replace(&self, page: &CompanyPage) -> anyhow::Result<Option<CompanyPage>> {
        if self.page_reads_fail_after_replace.swap(false, Ordering::SeqCst) {
            self.page_reads_failing.store(true, Ordering::SeqCst);
            return Ok(None);
        }
        let mut pages = self.pages.write();
        match pages.get(&page.id) {
            Some(stored) if stored.version == page.version - 1 => {}
            _ => return Ok(None),
        }
        if Self::slug_taken(&pages, &page.slug, Some(page.id)) {
            return Err(Self::duplicate(&page.slug));
        }
        pages.insert(page.id, page.clone());
        Ok(Some(page.clone()))
    }

    async fn delete(&self, slug: &str) -> anyhow::Result<bool> {
        let mut pages = self.pages.write();
        let id = pages.values().find(|p| p.slug == slug).map(|p| p.id);
        Ok(id.and_then(|id| pages.remove(&id)).is_some())
    }
}

#[async_trait]
impl TabRepository for MockDb {
    async fn create(&self, tab: &TabDocument) -> anyhow::Result<TabDocument> {
        self.tabs.write().insert(tab.id, tab.clone());
        Ok(tab.clone())
    }

    async fn find(&self, kind: TabKind, id: Uuid) -> anyhow::Result<Option<TabDocument>> {
        Ok(self
            .tabs
            .read()
            .get(&id)
            .filter(|t| t.kind == kind)
            .cloned())
    }

    async fn update(&self, tab: &TabDocument) -> anyhow::Result<Option<TabDocument>> {
        let mut tabs = self.tabs.write();
        if self.tabs_vanish_on_update.load(Ordering::SeqCst) {
            tabs.remove(&tab.id);
        }
        match tabs.get_mut(&tab.id) {
            Some(stored) if stored.kind == tab.kind => {
                stored.content = tab.content.clone();
                stored.updated_at = tab.updated_at;
                Ok(Some(stored.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete(&self, kind: TabKind, id: Uuid) -> anyhow::Result<bool> {
        let mut tabs = self.tabs.write();
        if tabs.get(&id).is_some_and(|t| t.kind == kind) {
            tabs.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }
}

#[async_trait]
impl SeoRepository for MockDb {
    async fn upsert(&self, record: &SeoRecord) -> anyhow::Result<SeoRecord> {
        let mut seo = self.seo.write();
        let mut record = record.clone();
        if let Some(existing) = seo.get(&record.key) {
            record.id = existing.id;
            record.created_at = existing.created_at;
        }
        seo.insert(record.key.clone(), record.clone());
        Ok(record)
    }

    async fn find_by_key(&self, key: &SeoKey) -> anyhow::Result<Option<SeoRecord>> {
        Ok(self.seo.read().get(key).cloned())
    }

    async fn list(&self, page_type: Option<SeoPageType>) -> anyhow::Result<Vec<SeoRecord>> {
        let mut records: Vec<SeoRecord> = self
            .seo
            .read()
            .values()
            .filter(|r| page_type.map_or(true, |t| r.key.page_type == t))
            .cloned()
            .collect();
        records.sort_by(|a, b| a.key.to_string().cmp(&b.key.to_string()));
        Ok(records)
    }

    async fn delete(&self, key: &SeoKey) -> anyhow::Result<bool> {
        Ok(self.seo.write().remove(key).is_some())
    }
}

/// Services wired over one [`MockDb`] with a subscribable event bus
pub struct TestContext {
    pub db: Arc<MockDb>,
    pub events: Arc<BroadcastEventPublisher>,
    pub service: Arc<Service>,
    pub seo: Arc<SeoService>,
}

impl TestContext {
    pub fn new() -> Self {
        let db = MockDb::new();
        let events = Arc::new(BroadcastEventPublisher::new(64));
        let service = Arc::new(Service::new(db.clone(), db.clone(), events.clone()));
        let seo = Arc::new(SeoService::new(db.clone(), events.clone()));
        Self {
            db,
            events,
            service,
            seo,
        }
    }
}

// ===== Fixtures =====

pub fn page_draft(slug: &str, category_id: &str, name: &str, rating: f64) -> CompanyPageDraft {
    CompanyPageDraft {
        slug: slug.to_string(),
        category_id: category_id.to_string(),
        name: name.to_string(),
        description: Some(format!("{} customer care", name)),
        rating,
        total_reviews: 10,
        ..Default::default()
    }
}

pub fn contact_numbers(phone: &str) -> Value {
    json!({
        "heading": {"title": "Customer Care", "subtitle": "24x7"},
        "cards": [{"label": "Toll free", "number": phone}],
        "table": {"columns": ["Service", "Number"], "rows": [["Cards", phone]]}
    })
}
