pub mod by_slug;
pub mod get;

use axum::routing::get;
use axum::Router;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::models::{Language, RecipeDoc};
use crate::AppState;

/// Returns the router for single-recipe endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/recipe-by-slug", get(by_slug::recipe_by_slug))
        .route(
            "/recipes/{category}/{subcategory}/{recipe}",
            get(get::get_recipe),
        )
}

/// Public recipe shape, localized at construction time
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeView {
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_path: Option<String>,
    pub cuisine: Vec<String>,
    pub dietary: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_time_minutes: Option<i64>,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecipeView {
    pub fn from_doc(recipe: &RecipeDoc, language: Language) -> Self {
        Self {
            slug: recipe.slug.clone(),
            title: recipe.localized_title(language).to_string(),
            description: recipe.localized_description(language).map(str::to_string),
            category_path: recipe.category_path.clone(),
            cuisine: recipe.cuisine.clone(),
            dietary: recipe.dietary.clone(),
            meal_type: recipe.meal_type.clone(),
            effort: recipe.effort.clone(),
            total_time_minutes: recipe.total_time_minutes,
            images: recipe.images.clone(),
            created_at: recipe.created_at.to_chrono(),
            updated_at: recipe.updated_at.to_chrono(),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(by_slug::recipe_by_slug, get::get_recipe),
    components(schemas(
        RecipeView,
        by_slug::BySlugResponse,
        by_slug::RelatedRecipe,
        get::RecipePageResponse,
    ))
)]
pub struct ApiDoc;
