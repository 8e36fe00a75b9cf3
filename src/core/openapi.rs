use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::favorites::{dtos as favorites_dtos, handlers as favorites_handlers};
use crate::features::services::{
    dtos as services_dtos, handlers as services_handlers, models as services_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Categories (public)
        categories_handlers::list_categories,
        categories_handlers::get_category,
        categories_handlers::list_subcategories,
        categories_handlers::get_subcategory,
        // Services
        services_handlers::list_services,
        services_handlers::get_service,
        services_handlers::recommended_services,
        services_handlers::similar_services,
        services_handlers::my_services,
        services_handlers::create_service,
        services_handlers::update_service,
        services_handlers::delete_service,
        // Favorites
        favorites_handlers::list_favorites,
        favorites_handlers::add_favorite,
        favorites_handlers::remove_favorite,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth::model::UserRole,
            auth::model::AuthenticatedUser,
            // Categories
            categories_dtos::CategoryResponseDto,
            categories_dtos::SubCategoryResponseDto,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            ApiResponse<Vec<categories_dtos::SubCategoryResponseDto>>,
            ApiResponse<categories_dtos::SubCategoryResponseDto>,
            // Services
            services_models::Currency,
            services_models::ExperienceLevel,
            services_dtos::ExecutorSummaryDto,
            services_dtos::ServicePhotoDto,
            services_dtos::ServiceSummaryDto,
            services_dtos::ServiceDetailDto,
            services_dtos::CreateServiceDto,
            services_dtos::UpdateServiceDto,
            ApiResponse<Vec<services_dtos::ServiceSummaryDto>>,
            ApiResponse<services_dtos::ServiceDetailDto>,
            // Favorites
            favorites_dtos::CreateFavoriteDto,
            favorites_dtos::FavoriteResponseDto,
            ApiResponse<Vec<favorites_dtos::FavoriteResponseDto>>,
            ApiResponse<favorites_dtos::FavoriteResponseDto>,
        )
    ),
    tags(
        (name = "categories", description = "Service categories and subcategories (public)"),
        (name = "services", description = "Service catalog, discovery and executor CRUD"),
        (name = "favorites", description = "Bookmarked services"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Usta API",
        version = "0.1.0",
        description = "API documentation for the Usta marketplace",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
