//! Contract layer - transport-agnostic models and errors
//!
//! NO serde derives on models - these are pure domain types.

pub mod error;
pub mod model;

pub use error::DirectoryError;
pub use model::{
    CompanyPage, CompanyPageDraft, CompanyPageFilter, CompanyPageSummary, CompanyTabView,
    PageLayout, Paginated, PopulatedCompanyPage, PopulatedTabs, SeoKey, SeoLookup, SeoPageType,
    SeoRecord, TabDocument, TabKind, TabLinks,
};
