//! Contract models for the company directory
//!
//! These models are transport-agnostic and shared by the domain, storage and
//! REST layers. NO serde derives - wire shapes live in `api::rest::dto`.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Kind of a tab document linked from a company page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TabKind {
    /// Contact numbers (heading, cards, table)
    Numbers,
    /// Complaint escalation content
    Complaints,
    /// Quick help content
    QuickHelp,
    /// Video guide content
    Video,
    /// Company overview content
    Overview,
}

/// Legacy tab-type strings still sent by older admin screens
const TAB_ALIASES: &[(&str, TabKind)] = &[
    ("contactNumbers", TabKind::Numbers),
    ("contact-numbers", TabKind::Numbers),
    ("contact_numbers", TabKind::Numbers),
    ("quickHelp", TabKind::QuickHelp),
    ("quick-help", TabKind::QuickHelp),
    ("quick_help", TabKind::QuickHelp),
    ("videoGuide", TabKind::Video),
    ("video-guide", TabKind::Video),
    ("video_guide", TabKind::Video),
];

impl TabKind {
    /// Every tab kind in display order
    pub const ALL: [TabKind; 5] = [
        TabKind::Numbers,
        TabKind::Complaints,
        TabKind::QuickHelp,
        TabKind::Video,
        TabKind::Overview,
    ];

    /// Canonical tab name used in URLs, JSON and storage
    pub fn as_str(&self) -> &'static str {
        match self {
            TabKind::Numbers => "numbers",
            TabKind::Complaints => "complaints",
            TabKind::QuickHelp => "quickhelp",
            TabKind::Video => "video",
            TabKind::Overview => "overview",
        }
    }

    /// Resolve a tab name against the allow-list (canonical names and legacy aliases)
    pub fn from_name(name: &str) -> Option<TabKind> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .or_else(|| {
                TAB_ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == name)
                    .map(|(_, kind)| *kind)
            })
    }
}

impl std::fmt::Display for TabKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed-shape mapping from tab kind to an optional tab document id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabLinks {
    pub numbers: Option<Uuid>,
    pub complaints: Option<Uuid>,
    pub quickhelp: Option<Uuid>,
    pub video: Option<Uuid>,
    pub overview: Option<Uuid>,
}

impl TabLinks {
    pub fn get(&self, kind: TabKind) -> Option<Uuid> {
        match kind {
            TabKind::Numbers => self.numbers,
            TabKind::Complaints => self.complaints,
            TabKind::QuickHelp => self.quickhelp,
            TabKind::Video => self.video,
            TabKind::Overview => self.overview,
        }
    }

    pub fn set(&mut self, kind: TabKind, id: Option<Uuid>) {
        let slot = match kind {
            TabKind::Numbers => &mut self.numbers,
            TabKind::Complaints => &mut self.complaints,
            TabKind::QuickHelp => &mut self.quickhelp,
            TabKind::Video => &mut self.video,
            TabKind::Overview => &mut self.overview,
        };
        *slot = id;
    }

    /// Linked `(kind, id)` pairs in display order
    pub fn linked(&self) -> impl Iterator<Item = (TabKind, Uuid)> + '_ {
        TabKind::ALL
            .into_iter()
            .filter_map(move |kind| self.get(kind).map(|id| (kind, id)))
    }
}

/// Directory entry for one business
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyPage {
    pub id: Uuid,
    /// Unique URL slug (e.g., "hdfc-bank")
    pub slug: String,
    pub category_id: String,
    pub sub_category_id: Option<String>,
    pub name: String,
    pub logo: Option<String>,
    pub description: Option<String>,
    /// Average rating in 0.0..=5.0
    pub rating: f64,
    pub total_reviews: i64,
    pub founded: Option<String>,
    pub headquarters: Option<String>,
    pub website: Option<String>,
    pub parent_company: Option<String>,
    /// References into the tab store
    pub tabs: TabLinks,
    /// Tabs shown on the page, in order
    pub selected_tabs: Vec<TabKind>,
    /// Admin-authored card/table blocks, persisted as opaque JSON
    pub dynamic_components: Vec<serde_json::Value>,
    /// Incremented on every write; used for optimistic concurrency
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields of a company page for create and replace.
///
/// `None` for `tabs`, `selected_tabs` or `dynamic_components` means "empty" on
/// create and "keep the stored value" on replace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyPageDraft {
    pub slug: String,
    pub category_id: String,
    pub sub_category_id: Option<String>,
    pub name: String,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub rating: f64,
    pub total_reviews: i64,
    pub founded: Option<String>,
    pub headquarters: Option<String>,
    pub website: Option<String>,
    pub parent_company: Option<String>,
    pub tabs: Option<TabLinks>,
    pub selected_tabs: Option<Vec<TabKind>>,
    pub dynamic_components: Option<Vec<serde_json::Value>>,
}

impl CompanyPage {
    /// Build a new page (version 1) from a draft
    pub fn from_draft(draft: CompanyPageDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            slug: draft.slug,
            category_id: draft.category_id,
            sub_category_id: draft.sub_category_id,
            name: draft.name,
            logo: draft.logo,
            description: draft.description,
            rating: draft.rating,
            total_reviews: draft.total_reviews,
            founded: draft.founded,
            headquarters: draft.headquarters,
            website: draft.website,
            parent_company: draft.parent_company,
            tabs: draft.tabs.unwrap_or_default(),
            selected_tabs: draft.selected_tabs.unwrap_or_default(),
            dynamic_components: draft.dynamic_components.unwrap_or_default(),
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace every caller-owned field with the draft, keeping identity and
    /// bumping the version
    pub fn replaced_by(&self, draft: CompanyPageDraft) -> Self {
        Self {
            id: self.id,
            slug: draft.slug,
            category_id: draft.category_id,
            sub_category_id: draft.sub_category_id,
            name: draft.name,
            logo: draft.logo,
            description: draft.description,
            rating: draft.rating,
            total_reviews: draft.total_reviews,
            founded: draft.founded,
            headquarters: draft.headquarters,
            website: draft.website,
            parent_company: draft.parent_company,
            tabs: draft.tabs.unwrap_or_else(|| self.tabs.clone()),
            selected_tabs: draft
                .selected_tabs
                .unwrap_or_else(|| self.selected_tabs.clone()),
            dynamic_components: draft
                .dynamic_components
                .unwrap_or_else(|| self.dynamic_components.clone()),
            version: self.version + 1,
            created_at: self.created_at,
            updated_at: Utc::now(),
        }
    }

    /// Copy of this page prepared for a conditional write
    pub fn next_version(&self) -> Self {
        let mut next = self.clone();
        next.version = self.version + 1;
        next.updated_at = Utc::now();
        next
    }
}

/// Projection of a company page used by category listings and tab views
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyPageSummary {
    pub slug: String,
    pub name: String,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub rating: f64,
    pub total_reviews: i64,
    pub category_id: String,
    pub sub_category_id: Option<String>,
}

impl From<&CompanyPage> for CompanyPageSummary {
    fn from(page: &CompanyPage) -> Self {
        Self {
            slug: page.slug.clone(),
            name: page.name.clone(),
            logo: page.logo.clone(),
            description: page.description.clone(),
            rating: page.rating,
            total_reviews: page.total_reviews,
            category_id: page.category_id.clone(),
            sub_category_id: page.sub_category_id.clone(),
        }
    }
}

/// Tab document stored independently of any company page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabDocument {
    pub id: Uuid,
    pub kind: TabKind,
    /// Tab content as a JSON object
    pub content: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TabDocument {
    /// Build a fresh tab document with a new id
    pub fn new(kind: TabKind, content: serde_json::Value) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            kind,
            content,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Tab references resolved to their documents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopulatedTabs {
    pub numbers: Option<TabDocument>,
    pub complaints: Option<TabDocument>,
    pub quickhelp: Option<TabDocument>,
    pub video: Option<TabDocument>,
    pub overview: Option<TabDocument>,
}

impl PopulatedTabs {
    pub fn get(&self, kind: TabKind) -> Option<&TabDocument> {
        match kind {
            TabKind::Numbers => self.numbers.as_ref(),
            TabKind::Complaints => self.complaints.as_ref(),
            TabKind::QuickHelp => self.quickhelp.as_ref(),
            TabKind::Video => self.video.as_ref(),
            TabKind::Overview => self.overview.as_ref(),
        }
    }

    pub fn insert(&mut self, document: TabDocument) {
        let slot = match document.kind {
            TabKind::Numbers => &mut self.numbers,
            TabKind::Complaints => &mut self.complaints,
            TabKind::QuickHelp => &mut self.quickhelp,
            TabKind::Video => &mut self.video,
            TabKind::Overview => &mut self.overview,
        };
        *slot = Some(document);
    }
}

/// Company page with every tab reference populated
#[derive(Debug, Clone, PartialEq)]
pub struct PopulatedCompanyPage {
    pub page: CompanyPage,
    pub tabs: PopulatedTabs,
}

/// A single tab of a company page together with the company projection
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyTabView {
    pub company: CompanyPageSummary,
    pub tab: TabDocument,
}

/// Filters for listing company pages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyPageFilter {
    pub category_id: Option<String>,
    pub sub_category_id: Option<String>,
}

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    /// 1-based page number
    pub page: u64,
    pub limit: u64,
    pub total: u64,
}

impl<T> Paginated<T> {
    /// Number of pages needed for `total` items
    pub fn pages(&self) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(self.limit)
    }
}

/// Replacement values for a company page's admin-managed layout
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub selected_tabs: Option<Vec<TabKind>>,
    pub dynamic_components: Option<Vec<serde_json::Value>>,
}

/// Kind of page an SEO record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeoPageType {
    Route,
    Category,
    Company,
}

impl SeoPageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeoPageType::Route => "route",
            SeoPageType::Category => "category",
            SeoPageType::Company => "company",
        }
    }

    pub fn from_name(name: &str) -> Option<SeoPageType> {
        match name.trim().to_ascii_lowercase().as_str() {
            "route" => Some(SeoPageType::Route),
            "category" => Some(SeoPageType::Category),
            "company" => Some(SeoPageType::Company),
            _ => None,
        }
    }
}

impl std::fmt::Display for SeoPageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key of an SEO record: `(type, identifier, tab?)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeoKey {
    pub page_type: SeoPageType,
    /// Slug, category id, or normalised route path
    pub identifier: String,
    pub tab: Option<TabKind>,
}

impl SeoKey {
    pub fn new(page_type: SeoPageType, identifier: impl Into<String>, tab: Option<TabKind>) -> Self {
        Self {
            page_type,
            identifier: identifier.into(),
            tab,
        }
    }

    /// Same key without the tab component
    pub fn without_tab(&self) -> Self {
        Self {
            page_type: self.page_type,
            identifier: self.identifier.clone(),
            tab: None,
        }
    }
}

impl std::fmt::Display for SeoKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.tab {
            Some(tab) => write!(f, "{}:{}#{}", self.page_type, self.identifier, tab),
            None => write!(f, "{}:{}", self.page_type, self.identifier),
        }
    }
}

/// Head metadata for a route, category or company page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeoRecord {
    pub id: Uuid,
    pub key: SeoKey,
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub canonical: Option<String>,
    pub robots: Option<String>,
    pub open_graph: Option<serde_json::Value>,
    pub structured_data: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query used to resolve an SEO record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeoLookup {
    pub page_type: Option<String>,
    pub identifier: Option<String>,
    pub path: Option<String>,
    pub tab: Option<String>,
}
