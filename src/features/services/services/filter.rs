use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::services::models::ExperienceLevel;
use crate::shared::validation::escape_like;

/// Catalog filter criteria. All present criteria are combined with AND;
/// absent criteria do not constrain the result.
#[derive(Debug, Clone, Default)]
pub struct ServiceFilter {
    /// Exact category match
    pub category_id: Option<Uuid>,
    /// Service must carry this subcategory
    pub subcategory_id: Option<Uuid>,
    /// Exact experience bracket match
    pub experience: Option<ExperienceLevel>,
    /// Inclusive lower price bound; unpriced services never match
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound; unpriced services never match
    pub max_price: Option<Decimal>,
    /// Case-insensitive substring match against title or description
    pub search: Option<String>,
}

impl ServiceFilter {
    /// Append the WHERE clause for this filter to a query over the
    /// services table aliased `s`.
    pub fn push_predicates(&self, builder: &mut QueryBuilder<Postgres>) {
        builder.push(" WHERE 1=1");

        if let Some(category_id) = self.category_id {
            builder.push(" AND s.category_id = ");
            builder.push_bind(category_id);
        }

        if let Some(subcategory_id) = self.subcategory_id {
            builder.push(
                " AND EXISTS (SELECT 1 FROM service_subcategories ssc \
                 WHERE ssc.service_id = s.id AND ssc.subcategory_id = ",
            );
            builder.push_bind(subcategory_id);
            builder.push(")");
        }

        if let Some(experience) = self.experience {
            builder.push(" AND s.experience = ");
            builder.push_bind(experience);
        }

        // NULL price fails both comparisons, so unpriced rows drop out
        if let Some(min_price) = self.min_price {
            builder.push(" AND s.price >= ");
            builder.push_bind(min_price);
        }

        if let Some(max_price) = self.max_price {
            builder.push(" AND s.price <= ");
            builder.push_bind(max_price);
        }

        if let Some(search) = self.search.as_deref() {
            let pattern = format!("%{}%", escape_like(search));
            builder.push(" AND (s.title ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR s.description ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }
    }

    /// The search term, if it carries any non-whitespace content
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

/// Sort order for catalog listings. A leading `-` requests descending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ServiceOrdering {
    Price,
    #[serde(rename = "-price")]
    PriceDesc,
    Popularity,
    #[default]
    #[serde(rename = "-popularity")]
    PopularityDesc,
    CreatedAt,
    #[serde(rename = "-created_at")]
    CreatedAtDesc,
}

impl ServiceOrdering {
    /// ORDER BY clause for this ordering. Values are a fixed whitelist,
    /// never interpolated from user input.
    pub fn sql(self) -> &'static str {
        match self {
            ServiceOrdering::Price => " ORDER BY s.price ASC NULLS LAST, s.created_at DESC",
            ServiceOrdering::PriceDesc => " ORDER BY s.price DESC NULLS LAST, s.created_at DESC",
            ServiceOrdering::Popularity => " ORDER BY s.popularity ASC, s.created_at DESC",
            ServiceOrdering::PopularityDesc => " ORDER BY s.popularity DESC, s.created_at DESC",
            ServiceOrdering::CreatedAt => " ORDER BY s.created_at ASC",
            ServiceOrdering::CreatedAtDesc => " ORDER BY s.created_at DESC",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(filter: &ServiceFilter) -> String {
        let mut builder = QueryBuilder::new("SELECT s.id FROM services s");
        filter.push_predicates(&mut builder);
        builder.sql().to_string()
    }

    #[test]
    fn test_empty_filter_constrains_nothing() {
        let sql = rendered(&ServiceFilter::default());
        assert_eq!(sql, "SELECT s.id FROM services s WHERE 1=1");
    }

    #[test]
    fn test_all_criteria_are_anded() {
        let filter = ServiceFilter {
            category_id: Some(Uuid::now_v7()),
            subcategory_id: Some(Uuid::now_v7()),
            experience: Some(ExperienceLevel::ThreeToFiveYears),
            min_price: Some(Decimal::new(100, 0)),
            max_price: Some(Decimal::new(500, 0)),
            search: Some("plumb".to_string()),
        };
        let sql = rendered(&filter);

        assert!(sql.contains("s.category_id = $1"));
        assert!(sql.contains("ssc.subcategory_id = $2"));
        assert!(sql.contains("s.experience = $3"));
        assert!(sql.contains("s.price >= $4"));
        assert!(sql.contains("s.price <= $5"));
        assert!(sql.contains("s.title ILIKE $6 OR s.description ILIKE $7"));
    }

    #[test]
    fn test_subcategory_uses_membership_subquery() {
        let filter = ServiceFilter {
            subcategory_id: Some(Uuid::now_v7()),
            ..Default::default()
        };
        let sql = rendered(&filter);
        assert!(sql.contains("EXISTS (SELECT 1 FROM service_subcategories"));
    }

    #[test]
    fn test_search_term_trims_and_drops_blank() {
        let filter = ServiceFilter {
            search: Some("  welding  ".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.search_term(), Some("welding"));

        let blank = ServiceFilter {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(blank.search_term(), None);
    }

    #[test]
    fn test_default_ordering_is_popularity_desc() {
        assert_eq!(
            ServiceOrdering::default().sql(),
            " ORDER BY s.popularity DESC, s.created_at DESC"
        );
    }

    #[test]
    fn test_ordering_parses_signed_names() {
        #[derive(Deserialize)]
        struct Params {
            ordering: ServiceOrdering,
        }

        let p: Params = serde_json::from_str(r#"{"ordering":"-price"}"#).unwrap();
        assert_eq!(p.ordering, ServiceOrdering::PriceDesc);

        let p: Params = serde_json::from_str(r#"{"ordering":"created_at"}"#).unwrap();
        assert_eq!(p.ordering, ServiceOrdering::CreatedAt);
    }
}
