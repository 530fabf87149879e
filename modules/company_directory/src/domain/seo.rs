//! SEO metadata resolution and upserts

use super::events::{DirectoryEvent, EventPublisher};
use super::repository::SeoRepository;
use crate::contract::{DirectoryError, SeoKey, SeoLookup, SeoPageType, SeoRecord, TabKind};
use std::sync::Arc;

const MAX_TITLE_LEN: usize = 300;

/// Fields of an SEO record supplied by an editor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeoDraft {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub canonical: Option<String>,
    pub robots: Option<String>,
    pub open_graph: Option<serde_json::Value>,
    pub structured_data: Option<serde_json::Value>,
}

/// Service for per-route, per-category and per-company head metadata
pub struct SeoService {
    repo: Arc<dyn SeoRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl SeoService {
    pub fn new(repo: Arc<dyn SeoRepository>, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            repo,
            event_publisher,
        }
    }

    /// Resolve the most specific record for a lookup.
    ///
    /// Tries `(type, identifier, tab)` first, then `(type, identifier)`.
    pub async fn resolve(&self, lookup: &SeoLookup) -> Result<SeoRecord, DirectoryError> {
        let key = lookup_key(lookup)?;

        if let Some(record) = self.find(&key).await? {
            return Ok(record);
        }

        if key.tab.is_some() {
            if let Some(record) = self.find(&key.without_tab()).await? {
                tracing::debug!(%key, "seo record resolved without tab");
                return Ok(record);
            }
        }

        Err(DirectoryError::not_found("seo_record", key.to_string()))
    }

    /// Create or replace a record (last write wins) and announce the change
    pub async fn upsert(
        &self,
        page_type: &str,
        identifier: &str,
        tab: Option<&str>,
        draft: SeoDraft,
    ) -> Result<SeoRecord, DirectoryError> {
        let key = explicit_key(page_type, identifier, tab)?;
        validate_draft(&draft)?;

        let now = chrono::Utc::now();
        let created_at = self.find(&key).await?.map(|r| r.created_at).unwrap_or(now);
        let record = SeoRecord {
            id: uuid::Uuid::new_v4(),
            key,
            title: draft.title.trim().to_string(),
            description: draft.description,
            keywords: normalize_keywords(draft.keywords),
            canonical: draft.canonical.filter(|c| !c.trim().is_empty()),
            robots: draft.robots.filter(|r| !r.trim().is_empty()),
            open_graph: draft.open_graph,
            structured_data: draft.structured_data,
            created_at,
            updated_at: now,
        };

        let saved = self.repo.upsert(&record).await.map_err(|e| {
            tracing::error!("Storage error during seo upsert: {:?}", e);
            DirectoryError::Internal
        })?;

        tracing::info!(key = %saved.key, "seo record saved");
        if let Err(e) = self
            .event_publisher
            .publish(DirectoryEvent::seo_updated(&saved.key, &saved.title))
            .await
        {
            tracing::warn!("Failed to publish seo event: {}", e);
        }

        Ok(saved)
    }

    /// List records, optionally restricted to one page type
    pub async fn list(&self, page_type: Option<&str>) -> Result<Vec<SeoRecord>, DirectoryError> {
        let page_type = page_type.map(parse_page_type).transpose()?;
        self.repo.list(page_type).await.map_err(|e| {
            tracing::error!("Storage error during seo list: {:?}", e);
            DirectoryError::Internal
        })
    }

    /// Delete one record by exact key
    pub async fn delete(
        &self,
        page_type: &str,
        identifier: &str,
        tab: Option<&str>,
    ) -> Result<(), DirectoryError> {
        let key = explicit_key(page_type, identifier, tab)?;
        let deleted = self.repo.delete(&key).await.map_err(|e| {
            tracing::error!("Storage error during seo delete: {:?}", e);
            DirectoryError::Internal
        })?;

        if !deleted {
            return Err(DirectoryError::not_found("seo_record", key.to_string()));
        }
        Ok(())
    }

    async fn find(&self, key: &SeoKey) -> Result<Option<SeoRecord>, DirectoryError> {
        self.repo.find_by_key(key).await.map_err(|e| {
            tracing::error!("Storage error during seo lookup: {:?}", e);
            DirectoryError::Internal
        })
    }
}

/// Build the lookup key; without a type the key is inferred from `path`
fn lookup_key(lookup: &SeoLookup) -> Result<SeoKey, DirectoryError> {
    let tab = non_blank(lookup.tab.as_deref());

    let Some(page_type) = non_blank(lookup.page_type.as_deref()) else {
        let path = non_blank(lookup.path.as_deref())
            .or_else(|| non_blank(lookup.identifier.as_deref()))
            .ok_or_else(|| DirectoryError::validation("either type or path is required"))?;
        let mut key = infer_key_from_path(path);
        if let Some(tab) = tab {
            key.tab = Some(parse_tab(tab)?);
        }
        return Ok(key);
    };

    let identifier = non_blank(lookup.identifier.as_deref())
        .or_else(|| non_blank(lookup.path.as_deref()))
        .ok_or_else(|| DirectoryError::validation("identifier or path is required"))?;

    explicit_key(page_type, identifier, tab)
}

fn explicit_key(
    page_type: &str,
    identifier: &str,
    tab: Option<&str>,
) -> Result<SeoKey, DirectoryError> {
    let page_type = parse_page_type(page_type)?;
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err(DirectoryError::validation("identifier cannot be empty"));
    }

    let identifier = match page_type {
        SeoPageType::Route => normalize_path(identifier),
        _ => identifier.to_string(),
    };
    let tab = non_blank(tab).map(parse_tab).transpose()?;

    Ok(SeoKey::new(page_type, identifier, tab))
}

fn parse_page_type(name: &str) -> Result<SeoPageType, DirectoryError> {
    SeoPageType::from_name(name).ok_or_else(|| {
        DirectoryError::validation(format!(
            "unknown seo type '{}', expected route, category or company",
            name
        ))
    })
}

fn parse_tab(name: &str) -> Result<TabKind, DirectoryError> {
    TabKind::from_name(name).ok_or_else(|| DirectoryError::UnknownTab {
        name: name.to_string(),
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Normalise a route path: leading '/', no trailing '/', no query or fragment
pub fn normalize_path(path: &str) -> String {
    let path = path
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim();

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return "/".to_string();
    }
    format!("/{}", segments.join("/"))
}

/// Infer the SEO key of a frontend URL path
///
/// - `/company/{slug}[/{tab}]` and `/companies/{slug}[/{tab}]` → company
/// - `/category/{id}[/{sub}]` → category (`id` or `id/sub`)
/// - anything else → route with the normalised path
pub fn infer_key_from_path(path: &str) -> SeoKey {
    let normalized = normalize_path(path);
    let segments: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();

    match segments.as_slice() {
        ["company" | "companies", slug] => SeoKey::new(SeoPageType::Company, *slug, None),
        ["company" | "companies", slug, tab] => {
            SeoKey::new(SeoPageType::Company, *slug, TabKind::from_name(tab))
        }
        ["category", id] => SeoKey::new(SeoPageType::Category, *id, None),
        ["category", id, sub] => {
            SeoKey::new(SeoPageType::Category, format!("{}/{}", id, sub), None)
        }
        _ => SeoKey::new(SeoPageType::Route, normalized, None),
    }
}

fn validate_draft(draft: &SeoDraft) -> Result<(), DirectoryError> {
    let title = draft.title.trim();
    if title.is_empty() {
        return Err(DirectoryError::validation("title cannot be empty"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(DirectoryError::validation(format!(
            "title is longer than {} characters",
            MAX_TITLE_LEN
        )));
    }
    if let Some(open_graph) = &draft.open_graph {
        if !open_graph.is_object() {
            return Err(DirectoryError::validation("openGraph must be a JSON object"));
        }
    }
    Ok(())
}

fn normalize_keywords(keywords: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(keywords.len());
    for keyword in keywords {
        let keyword = keyword.trim();
        if !keyword.is_empty() && !out.iter().any(|k| k == keyword) {
            out.push(keyword.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("about/"), "/about");
        assert_eq!(normalize_path("/about//team/"), "/about/team");
        assert_eq!(normalize_path("/search?q=bank#top"), "/search");
    }

    #[test]
    fn test_infer_company_paths() {
        let key = infer_key_from_path("/company/hdfc-bank");
        assert_eq!(key, SeoKey::new(SeoPageType::Company, "hdfc-bank", None));

        let key = infer_key_from_path("/companies/hdfc-bank/numbers/");
        assert_eq!(
            key,
            SeoKey::new(SeoPageType::Company, "hdfc-bank", Some(TabKind::Numbers))
        );

        let key = infer_key_from_path("/company/hdfc-bank/reviews");
        assert_eq!(key, SeoKey::new(SeoPageType::Company, "hdfc-bank", None));
    }

    #[test]
    fn test_infer_category_paths() {
        assert_eq!(
            infer_key_from_path("/category/banks"),
            SeoKey::new(SeoPageType::Category, "banks", None)
        );
        assert_eq!(
            infer_key_from_path("/category/banks/private"),
            SeoKey::new(SeoPageType::Category, "banks/private", None)
        );
    }

    #[test]
    fn test_infer_route_paths() {
        assert_eq!(
            infer_key_from_path("/"),
            SeoKey::new(SeoPageType::Route, "/", None)
        );
        assert_eq!(
            infer_key_from_path("/about-us/"),
            SeoKey::new(SeoPageType::Route, "/about-us", None)
        );
        assert_eq!(
            infer_key_from_path("/company"),
            SeoKey::new(SeoPageType::Route, "/company", None)
        );
    }

    #[test]
    fn test_lookup_key_explicit_route_is_normalised() {
        let lookup = SeoLookup {
            page_type: Some("route".into()),
            identifier: Some("contact/".into()),
            ..Default::default()
        };
        assert_eq!(
            lookup_key(&lookup).unwrap(),
            SeoKey::new(SeoPageType::Route, "/contact", None)
        );
    }

    #[test]
    fn test_lookup_key_requires_type_or_path() {
        assert!(lookup_key(&SeoLookup::default()).is_err());
    }

    #[test]
    fn test_lookup_key_rejects_unknown_tab() {
        let lookup = SeoLookup {
            page_type: Some("company".into()),
            identifier: Some("hdfc-bank".into()),
            tab: Some("reviews".into()),
            ..Default::default()
        };
        assert!(matches!(
            lookup_key(&lookup),
            Err(DirectoryError::UnknownTab { .. })
        ));
    }

    #[test]
    fn test_normalize_keywords() {
        let keywords = vec![
            " bank ".to_string(),
            "".to_string(),
            "bank".to_string(),
            "hdfc".to_string(),
        ];
        assert_eq!(normalize_keywords(keywords), vec!["bank", "hdfc"]);
    }

    #[test]
    fn test_validate_draft() {
        assert!(validate_draft(&SeoDraft::default()).is_err());
        let draft = SeoDraft {
            title: "HDFC Bank".into(),
            open_graph: Some(serde_json::json!(["x"])),
            ..Default::default()
        };
        assert!(validate_draft(&draft).is_err());
    }
}
