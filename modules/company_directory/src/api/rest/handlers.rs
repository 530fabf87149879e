//! HTTP request handlers - thin layer that delegates to domain services

use super::{dto::*, error::ApiError};
use crate::contract::{CompanyPageDraft, CompanyPageFilter, PageLayout, SeoLookup};
use crate::domain::{SeoDraft, SeoService, Service};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query,
    },
    http::StatusCode,
    Extension, Json,
};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;
type CreatedResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

fn created<T>(data: T, message: &str) -> CreatedResult<T> {
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(data, message)),
    ))
}

// ===== Company Page Handlers =====

/// Create a company page
pub async fn create_company_page(
    Extension(service): Extension<Arc<Service>>,
    payload: Result<Json<CompanyPageRequest>, JsonRejection>,
) -> CreatedResult<PopulatedCompanyPageDto> {
    let Json(req) = payload?;
    let draft = CompanyPageDraft::try_from(req)?;
    let page = service.create_company_page(draft).await?;

    created(page.into(), "Company page created")
}

/// Create a company page and its contact numbers tab together
pub async fn create_with_contact_numbers(
    Extension(service): Extension<Arc<Service>>,
    payload: Result<Json<CreateWithContactNumbersRequest>, JsonRejection>,
) -> CreatedResult<PopulatedCompanyPageDto> {
    let Json(req) = payload?;
    let draft = CompanyPageDraft::try_from(req.company_data)?;
    let page = service
        .create_with_contact_numbers(draft, req.contact_numbers_data)
        .await?;

    created(page.into(), "Company page created with contact numbers")
}

/// Create a standalone contact numbers tab
pub async fn create_contact_numbers(
    Extension(service): Extension<Arc<Service>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> CreatedResult<TabDocumentDto> {
    let Json(content) = payload?;
    let tab = service.create_contact_numbers_tab(content).await?;

    created(tab.into(), "Contact numbers created")
}

/// Create or replace the contact numbers tab of a page
pub async fn add_contact_numbers(
    Extension(service): Extension<Arc<Service>>,
    Path(slug): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<PopulatedCompanyPageDto> {
    let Json(content) = payload?;
    let page = service.add_contact_numbers(&slug, content).await?;

    Ok(Json(ApiResponse::ok_with_message(
        page.into(),
        "Contact numbers saved",
    )))
}

/// List company pages, newest first
pub async fn list_company_pages(
    Extension(service): Extension<Arc<Service>>,
    query: Result<Query<ListCompanyPagesQuery>, QueryRejection>,
) -> ApiResult<CompanyPageListDto> {
    let Query(query) = query?;
    let filter = CompanyPageFilter {
        category_id: query.category_id.filter(|c| !c.trim().is_empty()),
        sub_category_id: query.sub_category_id.filter(|c| !c.trim().is_empty()),
    };
    let listing = service
        .list_company_pages(filter, query.page, query.limit)
        .await?;

    Ok(Json(ApiResponse::ok(listing.into())))
}

/// Search company pages by name, description or slug
pub async fn search_company_pages(
    Extension(service): Extension<Arc<Service>>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<Vec<CompanyPageDto>> {
    let Query(query) = query?;
    let pages = service.search_company_pages(&query.q, query.limit).await?;

    Ok(Json(ApiResponse::ok(
        pages.into_iter().map(Into::into).collect(),
    )))
}

/// Get a company page with populated tabs
pub async fn get_company_page(
    Extension(service): Extension<Arc<Service>>,
    Path(slug): Path<String>,
) -> ApiResult<PopulatedCompanyPageDto> {
    let page = service.get_company_page(&slug).await?;
    Ok(Json(ApiResponse::ok(page.into())))
}

/// List a category
pub async fn get_by_category(
    Extension(service): Extension<Arc<Service>>,
    Path(category_id): Path<String>,
) -> ApiResult<Vec<CompanyPageSummaryDto>> {
    let pages = service.get_by_category(&category_id, None).await?;
    Ok(Json(ApiResponse::ok(
        pages.into_iter().map(Into::into).collect(),
    )))
}

/// List a sub-category
pub async fn get_by_sub_category(
    Extension(service): Extension<Arc<Service>>,
    Path((category_id, sub_category_id)): Path<(String, String)>,
) -> ApiResult<Vec<CompanyPageSummaryDto>> {
    let pages = service
        .get_by_category(&category_id, Some(&sub_category_id))
        .await?;
    Ok(Json(ApiResponse::ok(
        pages.into_iter().map(Into::into).collect(),
    )))
}

/// Replace a company page
pub async fn update_company_page(
    Extension(service): Extension<Arc<Service>>,
    Path(slug): Path<String>,
    payload: Result<Json<UpdateCompanyPageRequest>, JsonRejection>,
) -> ApiResult<PopulatedCompanyPageDto> {
    let Json(req) = payload?;
    let draft = CompanyPageDraft::try_from(req.page)?;
    let page = service
        .update_company_page(&slug, draft, req.expected_version)
        .await?;

    Ok(Json(ApiResponse::ok_with_message(
        page.into(),
        "Company page updated",
    )))
}

/// Delete a company page; its tab documents are kept
pub async fn delete_company_page(
    Extension(service): Extension<Arc<Service>>,
    Path(slug): Path<String>,
) -> ApiResult<()> {
    service.delete_company_page(&slug).await?;
    Ok(Json(ApiResponse::message("Company page deleted")))
}

/// Get one tab of a company page
pub async fn get_company_tab(
    Extension(service): Extension<Arc<Service>>,
    Path((slug, tab_name)): Path<(String, String)>,
) -> ApiResult<CompanyTabDto> {
    let view = service.get_company_tab(&slug, &tab_name).await?;
    Ok(Json(ApiResponse::ok(view.into())))
}

/// Update the linked contact numbers tab in place
pub async fn update_contact_numbers(
    Extension(service): Extension<Arc<Service>>,
    Path(slug): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<TabDocumentDto> {
    let Json(content) = payload?;
    let tab = service.update_contact_numbers_tab(&slug, content).await?;

    Ok(Json(ApiResponse::ok_with_message(
        tab.into(),
        "Contact numbers updated",
    )))
}

/// Overwrite the dynamic components of a page
pub async fn save_components(
    Extension(service): Extension<Arc<Service>>,
    payload: Result<Json<SaveComponentsRequest>, JsonRejection>,
) -> ApiResult<CompanyPageDto> {
    let Json(req) = payload?;
    let page = service
        .save_dynamic_components(&req.slug, req.components)
        .await?;

    Ok(Json(ApiResponse::ok_with_message(
        page.into(),
        "Components saved",
    )))
}

/// Replace selected tabs and/or dynamic components
pub async fn update_layout(
    Extension(service): Extension<Arc<Service>>,
    Path(slug): Path<String>,
    payload: Result<Json<UpdateLayoutRequest>, JsonRejection>,
) -> ApiResult<CompanyPageDto> {
    let Json(req) = payload?;
    let expected_version = req.expected_version;
    let layout = PageLayout::try_from(req)?;
    let page = service
        .update_layout(&slug, layout, expected_version)
        .await?;

    Ok(Json(ApiResponse::ok(page.into())))
}

/// Link an existing tab document
pub async fn link_tab(
    Extension(service): Extension<Arc<Service>>,
    Path((slug, tab_name)): Path<(String, String)>,
    payload: Result<Json<LinkTabRequest>, JsonRejection>,
) -> ApiResult<PopulatedCompanyPageDto> {
    let Json(req) = payload?;
    let page = service.link_tab(&slug, &tab_name, req.tab_id).await?;

    Ok(Json(ApiResponse::ok(page.into())))
}

/// Clear a tab reference
pub async fn unlink_tab(
    Extension(service): Extension<Arc<Service>>,
    Path((slug, tab_name)): Path<(String, String)>,
) -> ApiResult<PopulatedCompanyPageDto> {
    let page = service.unlink_tab(&slug, &tab_name).await?;
    Ok(Json(ApiResponse::ok(page.into())))
}

// ===== Tab Document Handlers =====

pub async fn create_tab(
    Extension(service): Extension<Arc<Service>>,
    Path(tab_name): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> CreatedResult<TabDocumentDto> {
    let Json(content) = payload?;
    let tab = service.create_tab(&tab_name, content).await?;

    created(tab.into(), "Tab created")
}

pub async fn get_tab(
    Extension(service): Extension<Arc<Service>>,
    path: Result<Path<(String, Uuid)>, PathRejection>,
) -> ApiResult<TabDocumentDto> {
    let Path((tab_name, id)) = path?;
    let tab = service.get_tab(&tab_name, id).await?;

    Ok(Json(ApiResponse::ok(tab.into())))
}

pub async fn update_tab(
    Extension(service): Extension<Arc<Service>>,
    path: Result<Path<(String, Uuid)>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<TabDocumentDto> {
    let Path((tab_name, id)) = path?;
    let Json(content) = payload?;
    let tab = service.update_tab(&tab_name, id, content).await?;

    Ok(Json(ApiResponse::ok_with_message(tab.into(), "Tab updated")))
}

pub async fn delete_tab(
    Extension(service): Extension<Arc<Service>>,
    path: Result<Path<(String, Uuid)>, PathRejection>,
) -> ApiResult<()> {
    let Path((tab_name, id)) = path?;
    service.delete_tab(&tab_name, id).await?;

    Ok(Json(ApiResponse::message("Tab deleted")))
}

// ===== SEO Handlers =====

/// Resolve the most specific SEO record
pub async fn get_seo(
    Extension(seo): Extension<Arc<SeoService>>,
    query: Result<Query<SeoQuery>, QueryRejection>,
) -> ApiResult<SeoRecordDto> {
    let Query(query) = query?;
    let lookup = SeoLookup {
        page_type: query.page_type,
        identifier: query.identifier,
        path: query.path,
        tab: query.tab,
    };
    let record = seo.resolve(&lookup).await?;

    Ok(Json(ApiResponse::ok(record.into())))
}

/// Create or replace an SEO record
pub async fn upsert_seo(
    Extension(seo): Extension<Arc<SeoService>>,
    payload: Result<Json<UpsertSeoRequest>, JsonRejection>,
) -> ApiResult<SeoRecordDto> {
    let Json(req) = payload?;
    let identifier = req
        .identifier
        .or(req.path)
        .ok_or_else(|| ApiError::bad_request("identifier or path is required"))?;
    let draft = SeoDraft {
        title: req.title,
        description: req.description,
        keywords: req.keywords,
        canonical: req.canonical,
        robots: req.robots,
        open_graph: req.open_graph,
        structured_data: req.structured_data,
    };
    let record = seo
        .upsert(&req.page_type, &identifier, req.tab.as_deref(), draft)
        .await?;

    Ok(Json(ApiResponse::ok_with_message(
        record.into(),
        "SEO metadata saved",
    )))
}

/// List SEO records
pub async fn list_seo(
    Extension(seo): Extension<Arc<SeoService>>,
    query: Result<Query<SeoListQuery>, QueryRejection>,
) -> ApiResult<Vec<SeoRecordDto>> {
    let Query(query) = query?;
    let page_type = query.page_type.as_deref().filter(|t| !t.trim().is_empty());
    let records = seo.list(page_type).await?;

    Ok(Json(ApiResponse::ok(
        records.into_iter().map(Into::into).collect(),
    )))
}

/// Delete one SEO record by exact key
pub async fn delete_seo(
    Extension(seo): Extension<Arc<SeoService>>,
    query: Result<Query<SeoQuery>, QueryRejection>,
) -> ApiResult<()> {
    let Query(query) = query?;
    let page_type = query
        .page_type
        .ok_or_else(|| ApiError::bad_request("type is required"))?;
    let identifier = query
        .identifier
        .or(query.path)
        .ok_or_else(|| ApiError::bad_request("identifier or path is required"))?;
    seo.delete(&page_type, &identifier, query.tab.as_deref())
        .await?;

    Ok(Json(ApiResponse::message("SEO metadata deleted")))
}

// ===== Health =====

pub async fn health() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
