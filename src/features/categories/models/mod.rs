mod category;
mod subcategory;

pub use category::Category;
pub use subcategory::SubCategory;
