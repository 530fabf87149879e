//! Conversions between contract models and REST DTOs

use super::dto::*;
use crate::contract::{
    CompanyPage, CompanyPageDraft, CompanyPageSummary, CompanyTabView, DirectoryError,
    PageLayout, Paginated, PopulatedCompanyPage, PopulatedTabs, SeoRecord, TabDocument,
    TabKind, TabLinks,
};

// ===== Responses =====

impl From<TabDocument> for TabDocumentDto {
    fn from(tab: TabDocument) -> Self {
        Self {
            id: tab.id,
            kind: tab.kind.as_str().to_string(),
            content: tab.content,
            created_at: tab.created_at,
            updated_at: tab.updated_at,
        }
    }
}

impl From<TabLinks> for TabLinksDto {
    fn from(links: TabLinks) -> Self {
        Self {
            numbers: links.numbers,
            complaints: links.complaints,
            quickhelp: links.quickhelp,
            video: links.video,
            overview: links.overview,
        }
    }
}

impl From<TabLinksDto> for TabLinks {
    fn from(dto: TabLinksDto) -> Self {
        Self {
            numbers: dto.numbers,
            complaints: dto.complaints,
            quickhelp: dto.quickhelp,
            video: dto.video,
            overview: dto.overview,
        }
    }
}

impl From<PopulatedTabs> for PopulatedTabsDto {
    fn from(tabs: PopulatedTabs) -> Self {
        Self {
            numbers: tabs.numbers.map(Into::into),
            complaints: tabs.complaints.map(Into::into),
            quickhelp: tabs.quickhelp.map(Into::into),
            video: tabs.video.map(Into::into),
            overview: tabs.overview.map(Into::into),
        }
    }
}

/// Split a page into its shared fields and its tab references
fn page_fields(page: CompanyPage) -> (CompanyPageFieldsDto, TabLinks) {
    let fields = CompanyPageFieldsDto {
        id: page.id,
        slug: page.slug,
        category_id: page.category_id,
        sub_category_id: page.sub_category_id,
        name: page.name,
        logo: page.logo,
        description: page.description,
        rating: page.rating,
        total_reviews: page.total_reviews,
        founded: page.founded,
        headquarters: page.headquarters,
        website: page.website,
        parent_company: page.parent_company,
        selected_tabs: page
            .selected_tabs
            .iter()
            .map(|t| t.as_str().to_string())
            .collect(),
        dynamic_components: page.dynamic_components,
        version: page.version,
        created_at: page.created_at,
        updated_at: page.updated_at,
    };
    (fields, page.tabs)
}

impl From<CompanyPage> for CompanyPageDto {
    fn from(page: CompanyPage) -> Self {
        let (page, tabs) = page_fields(page);
        Self {
            page,
            tabs: tabs.into(),
        }
    }
}

impl From<PopulatedCompanyPage> for PopulatedCompanyPageDto {
    fn from(populated: PopulatedCompanyPage) -> Self {
        let (page, _) = page_fields(populated.page);
        Self {
            page,
            tabs: populated.tabs.into(),
        }
    }
}

impl From<CompanyPageSummary> for CompanyPageSummaryDto {
    fn from(summary: CompanyPageSummary) -> Self {
        Self {
            slug: summary.slug,
            name: summary.name,
            logo: summary.logo,
            description: summary.description,
            rating: summary.rating,
            total_reviews: summary.total_reviews,
            category_id: summary.category_id,
            sub_category_id: summary.sub_category_id,
        }
    }
}

impl From<CompanyTabView> for CompanyTabDto {
    fn from(view: CompanyTabView) -> Self {
        Self {
            company_info: view.company.into(),
            tab_data: view.tab.into(),
        }
    }
}

impl From<Paginated<CompanyPage>> for CompanyPageListDto {
    fn from(listing: Paginated<CompanyPage>) -> Self {
        let pagination = PaginationDto {
            page: listing.page,
            limit: listing.limit,
            total: listing.total,
            pages: listing.pages(),
        };
        Self {
            items: listing.items.into_iter().map(Into::into).collect(),
            pagination,
        }
    }
}

impl From<SeoRecord> for SeoRecordDto {
    fn from(record: SeoRecord) -> Self {
        Self {
            id: record.id,
            page_type: record.key.page_type.as_str().to_string(),
            identifier: record.key.identifier,
            tab: record.key.tab.map(|t| t.as_str().to_string()),
            title: record.title,
            description: record.description,
            keywords: record.keywords,
            canonical: record.canonical,
            robots: record.robots,
            open_graph: record.open_graph,
            structured_data: record.structured_data,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

// ===== Requests =====

/// Parse tab names from a request body; unknown names are a validation error
fn parse_selected_tabs(names: Vec<String>) -> Result<Vec<TabKind>, DirectoryError> {
    names
        .iter()
        .map(|name| {
            TabKind::from_name(name).ok_or_else(|| {
                DirectoryError::validation(format!("selectedTabs contains unknown tab '{}'", name))
            })
        })
        .collect()
}

impl TryFrom<CompanyPageRequest> for CompanyPageDraft {
    type Error = DirectoryError;

    fn try_from(req: CompanyPageRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            slug: req.slug.trim().to_string(),
            category_id: req.category_id,
            sub_category_id: req.sub_category_id,
            name: req.name,
            logo: req.logo,
            description: req.description,
            rating: req.rating.unwrap_or(0.0),
            total_reviews: req.total_reviews.unwrap_or(0),
            founded: req.founded,
            headquarters: req.headquarters,
            website: req.website,
            parent_company: req.parent_company,
            tabs: req.tabs.map(Into::into),
            selected_tabs: req.selected_tabs.map(parse_selected_tabs).transpose()?,
            dynamic_components: req.dynamic_components,
        })
    }
}

impl TryFrom<UpdateLayoutRequest> for PageLayout {
    type Error = DirectoryError;

    fn try_from(req: UpdateLayoutRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            selected_tabs: req.selected_tabs.map(parse_selected_tabs).transpose()?,
            dynamic_components: req.dynamic_components,
        })
    }
}
