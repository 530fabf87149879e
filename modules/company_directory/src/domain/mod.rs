//! Domain layer - business logic and services

pub mod events;
pub mod repository;
pub mod seo;
pub mod service;
pub mod validation;

pub use events::{BroadcastEventPublisher, DirectoryEvent, EventPublisher, NoOpEventPublisher};
pub use repository::{CompanyPageRepository, SeoRepository, StorageError, TabRepository};
pub use seo::{SeoDraft, SeoService};
pub use service::Service;
