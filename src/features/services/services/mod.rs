mod filter;
mod recommendation_service;
mod search_history_service;
mod service_catalog_service;
mod similarity_service;

pub use filter::{ServiceFilter, ServiceOrdering};
pub use recommendation_service::RecommendationService;
pub use search_history_service::SearchHistoryService;
pub use service_catalog_service::ServiceCatalogService;
pub use similarity_service::SimilarityService;

pub(crate) use service_catalog_service::summaries_for;
