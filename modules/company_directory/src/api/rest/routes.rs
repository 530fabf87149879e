//! Route registration, HTTP middleware and the OpenAPI document

use super::{dto::*, handlers};
use crate::config::ServerConfig;
use crate::domain::{SeoService, Service};
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post, put},
    Extension, Json, Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

/// Schemas of every request and response body
#[derive(OpenApi)]
#[openapi(
    info(title = "Company Directory API"),
    components(schemas(
        TabLinksDto,
        TabDocumentDto,
        PopulatedTabsDto,
        CompanyPageFieldsDto,
        CompanyPageDto,
        PopulatedCompanyPageDto,
        CompanyPageSummaryDto,
        CompanyTabDto,
        PaginationDto,
        CompanyPageListDto,
        CompanyPageRequest,
        UpdateCompanyPageRequest,
        CreateWithContactNumbersRequest,
        SaveComponentsRequest,
        LinkTabRequest,
        UpdateLayoutRequest,
        SeoRecordDto,
        UpsertSeoRequest,
        HealthDto,
    )),
    tags(
        (name = "company-pages", description = "Company pages and their tabs"),
        (name = "tabs", description = "Standalone tab documents"),
        (name = "seo", description = "Head metadata for routes, categories and companies"),
    )
)]
pub struct ApiDoc;

/// Register all REST routes
pub fn register_routes(router: Router, service: Arc<Service>, seo: Arc<SeoService>) -> Router {
    router
        // Company page endpoints
        .route("/api/company-pages", get(handlers::list_company_pages))
        .route("/api/company-pages/create", post(handlers::create_company_page))
        .route(
            "/api/company-pages/create-with-contact-numbers",
            post(handlers::create_with_contact_numbers),
        )
        .route(
            "/api/company-pages/create-contact-numbers",
            post(handlers::create_contact_numbers),
        )
        .route(
            "/api/company-pages/save-component",
            post(handlers::save_components),
        )
        .route("/api/company-pages/search", get(handlers::search_company_pages))
        .route(
            "/api/company-pages/category/{category_id}",
            get(handlers::get_by_category),
        )
        .route(
            "/api/company-pages/category/{category_id}/{sub_category_id}",
            get(handlers::get_by_sub_category),
        )
        .route(
            "/api/company-pages/{slug}",
            get(handlers::get_company_page)
                .put(handlers::update_company_page)
                .delete(handlers::delete_company_page),
        )
        .route(
            "/api/company-pages/{slug}/add-contact-numbers",
            post(handlers::add_contact_numbers),
        )
        .route(
            "/api/company-pages/{slug}/contact-numbers",
            put(handlers::update_contact_numbers),
        )
        .route(
            "/api/company-pages/{slug}/tab/{tab_name}",
            get(handlers::get_company_tab),
        )
        .route(
            "/api/company-pages/{slug}/tabs/{tab_name}",
            put(handlers::link_tab).delete(handlers::unlink_tab),
        )
        .route("/api/company-pages/{slug}/layout", put(handlers::update_layout))
        // Tab document endpoints
        .route("/api/tabs/{tab_name}", post(handlers::create_tab))
        .route(
            "/api/tabs/{tab_name}/{id}",
            get(handlers::get_tab)
                .put(handlers::update_tab)
                .delete(handlers::delete_tab),
        )
        // SEO endpoints
        .route(
            "/api/seo",
            get(handlers::get_seo)
                .post(handlers::upsert_seo)
                .delete(handlers::delete_seo),
        )
        .route("/api/seo/records", get(handlers::list_seo))
        // Operational endpoints
        .route("/health", get(handlers::health))
        .route("/api/openapi.json", get(openapi_json))
        .layer(Extension(service))
        .layer(Extension(seo))
}

/// Full application router with CORS, body limit and request tracing
pub fn build_router(service: Arc<Service>, seo: Arc<SeoService>, server: &ServerConfig) -> Router {
    register_routes(Router::new(), service, seo)
        .layer(DefaultBodyLimit::max(server.max_body_bytes))
        .layer(RequestBodyLimitLayer::new(server.max_body_bytes))
        .layer(cors_layer(server.frontend_origin.as_deref()))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(frontend_origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    match frontend_origin.map(HeaderValue::from_str) {
        Some(Ok(origin)) => layer.allow_origin(origin),
        Some(Err(e)) => {
            tracing::warn!("Invalid frontend origin, allowing any origin: {}", e);
            layer.allow_origin(Any)
        }
        None => layer.allow_origin(Any),
    }
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
