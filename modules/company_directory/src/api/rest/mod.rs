//! REST API layer

pub mod dto;
pub mod error;
pub mod handlers;
pub mod mapper;
pub mod routes;

pub use routes::{build_router, register_routes, ApiDoc};
