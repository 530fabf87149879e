//! Entity to model mappers
//!
//! Conversions between SeaORM entities and contract models

use super::entity::{company_page, seo_record, tab_document};
use crate::contract::{
    CompanyPage, SeoKey, SeoPageType, SeoRecord, TabDocument, TabKind, TabLinks,
};
use anyhow::anyhow;
use serde_json::Value;

// ===== Company Page Conversions =====

impl TryFrom<company_page::Model> for CompanyPage {
    type Error = anyhow::Error;

    fn try_from(entity: company_page::Model) -> Result<Self, Self::Error> {
        let selected_tabs = parse_tab_names(&entity.selected_tabs)?;
        let dynamic_components = match entity.dynamic_components {
            Value::Array(items) => items,
            Value::Null => Vec::new(),
            other => return Err(anyhow!("dynamic_components is not an array: {}", other)),
        };

        Ok(Self {
            id: entity.id,
            slug: entity.slug,
            category_id: entity.category_id,
            sub_category_id: entity.sub_category_id,
            name: entity.name,
            logo: entity.logo,
            description: entity.description,
            rating: entity.rating,
            total_reviews: entity.total_reviews,
            founded: entity.founded,
            headquarters: entity.headquarters,
            website: entity.website,
            parent_company: entity.parent_company,
            tabs: TabLinks {
                numbers: entity.tab_numbers,
                complaints: entity.tab_complaints,
                quickhelp: entity.tab_quickhelp,
                video: entity.tab_video,
                overview: entity.tab_overview,
            },
            selected_tabs,
            dynamic_components,
            version: entity.version,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

impl From<&CompanyPage> for company_page::ActiveModel {
    fn from(model: &CompanyPage) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            id: Set(model.id),
            slug: Set(model.slug.clone()),
            category_id: Set(model.category_id.clone()),
            sub_category_id: Set(model.sub_category_id.clone()),
            name: Set(model.name.clone()),
            logo: Set(model.logo.clone()),
            description: Set(model.description.clone()),
            rating: Set(model.rating),
            total_reviews: Set(model.total_reviews),
            founded: Set(model.founded.clone()),
            headquarters: Set(model.headquarters.clone()),
            website: Set(model.website.clone()),
            parent_company: Set(model.parent_company.clone()),
            tab_numbers: Set(model.tabs.numbers),
            tab_complaints: Set(model.tabs.complaints),
            tab_quickhelp: Set(model.tabs.quickhelp),
            tab_video: Set(model.tabs.video),
            tab_overview: Set(model.tabs.overview),
            selected_tabs: Set(tab_names_json(&model.selected_tabs)),
            dynamic_components: Set(Value::Array(model.dynamic_components.clone())),
            version: Set(model.version),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
        }
    }
}

// ===== Tab Document Conversions =====

impl TryFrom<tab_document::Model> for TabDocument {
    type Error = anyhow::Error;

    fn try_from(entity: tab_document::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: entity.id,
            kind: parse_tab_kind(&entity.kind)?,
            content: entity.content,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

impl From<&TabDocument> for tab_document::ActiveModel {
    fn from(model: &TabDocument) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            id: Set(model.id),
            kind: Set(model.kind.as_str().to_string()),
            content: Set(model.content.clone()),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
        }
    }
}

// ===== SEO Record Conversions =====

impl TryFrom<seo_record::Model> for SeoRecord {
    type Error = anyhow::Error;

    fn try_from(entity: seo_record::Model) -> Result<Self, Self::Error> {
        let page_type = SeoPageType::from_name(&entity.page_type)
            .ok_or_else(|| anyhow!("unknown seo page type '{}'", entity.page_type))?;
        let tab = match entity.tab.as_str() {
            "" => None,
            name => Some(parse_tab_kind(name)?),
        };
        let keywords = match entity.keywords {
            Value::Null => Vec::new(),
            value => serde_json::from_value(value)?,
        };

        Ok(Self {
            id: entity.id,
            key: SeoKey::new(page_type, entity.identifier, tab),
            title: entity.title,
            description: entity.description,
            keywords,
            canonical: entity.canonical,
            robots: entity.robots,
            open_graph: entity.open_graph,
            structured_data: entity.structured_data,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

impl From<&SeoRecord> for seo_record::ActiveModel {
    fn from(model: &SeoRecord) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            id: Set(model.id),
            page_type: Set(model.key.page_type.as_str().to_string()),
            identifier: Set(model.key.identifier.clone()),
            tab: Set(tab_column(model.key.tab)),
            title: Set(model.title.clone()),
            description: Set(model.description.clone()),
            keywords: Set(Value::Array(
                model.keywords.iter().cloned().map(Value::String).collect(),
            )),
            canonical: Set(model.canonical.clone()),
            robots: Set(model.robots.clone()),
            open_graph: Set(model.open_graph.clone()),
            structured_data: Set(model.structured_data.clone()),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
        }
    }
}

// ===== Helpers =====

/// Value of the `tab` column for an optional tab
pub(crate) fn tab_column(tab: Option<TabKind>) -> String {
    tab.map(|t| t.as_str().to_string()).unwrap_or_default()
}

fn parse_tab_kind(name: &str) -> anyhow::Result<TabKind> {
    TabKind::from_name(name).ok_or_else(|| anyhow!("unknown tab kind '{}' in storage", name))
}

fn tab_names_json(tabs: &[TabKind]) -> Value {
    Value::Array(
        tabs.iter()
            .map(|t| Value::String(t.as_str().to_string()))
            .collect(),
    )
}

fn parse_tab_names(value: &Value) -> anyhow::Result<Vec<TabKind>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .ok_or_else(|| anyhow!("selected tab is not a string: {}", item))
                    .and_then(parse_tab_kind)
            })
            .collect(),
        other => Err(anyhow!("selected_tabs is not an array: {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_selected_tabs_round_trip() {
        let tabs = vec![TabKind::Overview, TabKind::Numbers];
        let stored = tab_names_json(&tabs);
        assert_eq!(stored, json!(["overview", "numbers"]));
        assert_eq!(parse_tab_names(&stored).unwrap(), tabs);
    }

    #[test]
    fn test_parse_tab_names_rejects_garbage() {
        assert!(parse_tab_names(&json!(["reviews"])).is_err());
        assert!(parse_tab_names(&json!("numbers")).is_err());
        assert!(parse_tab_names(&Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_tab_column() {
        assert_eq!(tab_column(None), "");
        assert_eq!(tab_column(Some(TabKind::QuickHelp)), "quickhelp");
    }
}
