//! REST DTOs with serde derives for HTTP API
//!
//! All wire names are camelCase. Every response is wrapped in [`ApiResponse`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

// ===== Envelope =====

/// Response envelope shared by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::ok(data)
        }
    }
}

impl ApiResponse<()> {
    /// Success without a payload
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            error: None,
        }
    }
}

// ===== Company Page DTOs =====

/// Tab references by kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TabLinksDto {
    #[serde(default)]
    pub numbers: Option<Uuid>,
    #[serde(default)]
    pub complaints: Option<Uuid>,
    #[serde(default)]
    pub quickhelp: Option<Uuid>,
    #[serde(default)]
    pub video: Option<Uuid>,
    #[serde(default)]
    pub overview: Option<Uuid>,
}

/// Tab document response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TabDocumentDto {
    pub id: Uuid,
    /// Canonical tab name
    #[schema(example = "numbers")]
    pub kind: String,
    /// Tab content
    pub content: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Tab references resolved to documents; `null` when unlinked or dangling
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedTabsDto {
    pub numbers: Option<TabDocumentDto>,
    pub complaints: Option<TabDocumentDto>,
    pub quickhelp: Option<TabDocumentDto>,
    pub video: Option<TabDocumentDto>,
    pub overview: Option<TabDocumentDto>,
}

/// Fields shared by every company page representation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPageFieldsDto {
    pub id: Uuid,
    #[schema(example = "hdfc-bank")]
    pub slug: String,
    #[schema(example = "banks")]
    pub category_id: String,
    pub sub_category_id: Option<String>,
    #[schema(example = "HDFC Bank")]
    pub name: String,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub rating: f64,
    pub total_reviews: i64,
    pub founded: Option<String>,
    pub headquarters: Option<String>,
    pub website: Option<String>,
    pub parent_company: Option<String>,
    pub selected_tabs: Vec<String>,
    pub dynamic_components: Vec<Value>,
    /// Current version; send it back as `expectedVersion` to guard writes
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Company page with tab references as ids
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPageDto {
    #[serde(flatten)]
    pub page: CompanyPageFieldsDto,
    pub tabs: TabLinksDto,
}

/// Company page with every tab reference populated
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedCompanyPageDto {
    #[serde(flatten)]
    pub page: CompanyPageFieldsDto,
    pub tabs: PopulatedTabsDto,
}

/// Projection used by category listings and tab views
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPageSummaryDto {
    pub slug: String,
    pub name: String,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub rating: f64,
    pub total_reviews: i64,
    pub category_id: String,
    pub sub_category_id: Option<String>,
}

/// One tab of a company page
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyTabDto {
    pub company_info: CompanyPageSummaryDto,
    pub tab_data: TabDocumentDto,
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationDto {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
}

/// Paginated company page listing
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPageListDto {
    pub items: Vec<CompanyPageDto>,
    pub pagination: PaginationDto,
}

/// Company page create request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPageRequest {
    #[schema(example = "hdfc-bank")]
    pub slug: String,
    pub category_id: String,
    #[serde(default)]
    pub sub_category_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Defaults to 0
    #[serde(default)]
    pub rating: Option<f64>,
    /// Defaults to 0
    #[serde(default)]
    pub total_reviews: Option<i64>,
    #[serde(default)]
    pub founded: Option<String>,
    #[serde(default)]
    pub headquarters: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub parent_company: Option<String>,
    /// Links to existing tab documents
    #[serde(default)]
    pub tabs: Option<TabLinksDto>,
    #[serde(default)]
    pub selected_tabs: Option<Vec<String>>,
    #[serde(default)]
    pub dynamic_components: Option<Vec<Value>>,
}

/// Company page replace request
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompanyPageRequest {
    #[serde(flatten)]
    pub page: CompanyPageRequest,
    /// Reject the write with 409 unless the stored version matches
    #[serde(default)]
    pub expected_version: Option<i64>,
}

/// Create a page together with its contact numbers tab
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWithContactNumbersRequest {
    pub company_data: CompanyPageRequest,
    /// Contact numbers tab content (heading, cards, table)
    pub contact_numbers_data: Value,
}

/// Overwrite the dynamic components of a page
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveComponentsRequest {
    pub slug: String,
    pub components: Vec<Value>,
}

/// Link an existing tab document to a page
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkTabRequest {
    pub tab_id: Uuid,
}

/// Replace parts of the admin-managed layout
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLayoutRequest {
    #[serde(default)]
    pub selected_tabs: Option<Vec<String>>,
    #[serde(default)]
    pub dynamic_components: Option<Vec<Value>>,
    #[serde(default)]
    pub expected_version: Option<i64>,
}

/// Query parameters for listing pages
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCompanyPagesQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub category_id: Option<String>,
    pub sub_category_id: Option<String>,
}

/// Query parameters for searching pages
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub limit: Option<u64>,
}

// ===== SEO DTOs =====

/// SEO record response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeoRecordDto {
    pub id: Uuid,
    /// route, category or company
    #[serde(rename = "type")]
    #[schema(example = "company")]
    pub page_type: String,
    pub identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab: Option<String>,
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub canonical: Option<String>,
    pub robots: Option<String>,
    pub open_graph: Option<Value>,
    pub structured_data: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// SEO record upsert request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertSeoRequest {
    #[serde(rename = "type")]
    pub page_type: String,
    /// Slug, category id or route path; `path` is used when absent
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub tab: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub canonical: Option<String>,
    #[serde(default)]
    pub robots: Option<String>,
    #[serde(default)]
    pub open_graph: Option<Value>,
    #[serde(default)]
    pub structured_data: Option<Value>,
}

/// Query parameters for resolving and deleting SEO records
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeoQuery {
    #[serde(rename = "type")]
    pub page_type: Option<String>,
    pub identifier: Option<String>,
    pub path: Option<String>,
    pub tab: Option<String>,
}

/// Query parameters for listing SEO records
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeoListQuery {
    #[serde(rename = "type")]
    pub page_type: Option<String>,
}

/// Liveness response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthDto {
    #[schema(example = "ok")]
    pub status: String,
    pub version: String,
}
