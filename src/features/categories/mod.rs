//! Category hierarchy behind service discovery.
//!
//! Categories own their subcategories (cascade delete); services reference
//! categories weakly and survive category removal.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::CategoryService;
