mod search_history;
mod service;

pub use search_history::SearchHistory;
pub use service::{
    Currency, ExperienceLevel, ServicePhoto, ServiceSubCategoryRow, ServiceWithExecutor,
    SERVICE_WITH_EXECUTOR_COLUMNS,
};
