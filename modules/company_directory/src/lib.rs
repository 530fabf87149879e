//! Company Directory Module
//!
//! Company pages with five linked tab documents (numbers, complaints, quick
//! help, video, overview), admin-managed layout and per-route SEO metadata,
//! served over a JSON REST API backed by sea-orm.

// Public exports
pub mod contract;
pub use contract::{
    CompanyPage, CompanyPageDraft, DirectoryError, SeoKey, SeoPageType, SeoRecord, TabDocument,
    TabKind, TabLinks,
};

pub mod config;
pub use config::{AppConfig, ConfigError};

pub mod module;
pub use module::DirectoryModule;

pub mod telemetry;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
