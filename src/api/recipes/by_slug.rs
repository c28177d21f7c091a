use axum::extract::{Query, State};
use axum::Json;
use bson::doc;
use futures_util::TryStreamExt;
use mongodb::Collection;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::RecipeView;
use crate::api::{ApiError, ErrorResponse};
use crate::models::{Language, RecipeDoc};
use crate::AppState;

const RELATED_LIMIT: i64 = 6;

#[derive(Debug, Deserialize, IntoParams)]
pub struct BySlugParams {
    /// Recipe slug to look up
    pub slug: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BySlugResponse {
    pub recipe: RecipeView,
    pub related_recipes: Vec<RelatedRecipe>,
}

/// Compact card for the related-recipes strip
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelatedRecipe {
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_time_minutes: Option<i64>,
}

impl RelatedRecipe {
    fn from_doc(recipe: RecipeDoc) -> Self {
        Self {
            slug: recipe.slug,
            title: recipe.title,
            category_path: recipe.category_path,
            image: recipe.images.into_iter().next(),
            total_time_minutes: recipe.total_time_minutes,
        }
    }
}

#[utoipa::path(
    get,
    path = "/recipe-by-slug",
    tag = "recipes",
    params(BySlugParams),
    responses(
        (status = 200, description = "Recipe with related recipes", body = BySlugResponse),
        (status = 400, description = "Missing slug parameter", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn recipe_by_slug(
    State(app): State<AppState>,
    Query(params): Query<BySlugParams>,
) -> Result<Json<BySlugResponse>, ApiError> {
    let slug = params
        .slug
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing slug parameter".to_string()))?;

    let recipes = app.db.recipes();

    let recipe = recipes
        .find_one(doc! { "slug": &slug, "status": "published" })
        .await?
        .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))?;

    // Related recipes are enrichment only: a failed query degrades to an
    // empty list instead of failing the whole request
    let related_recipes = match related_recipes(&recipes, &recipe).await {
        Ok(related) => related,
        Err(e) => {
            tracing::warn!("related recipes query failed for '{}': {}", slug, e);
            Vec::new()
        }
    };

    Ok(Json(BySlugResponse {
        recipe: RecipeView::from_doc(&recipe, Language::Lt),
        related_recipes,
    }))
}

/// Up to six related recipes: same primary category path first, then
/// shared cuisine.
async fn related_recipes(
    recipes: &Collection<RecipeDoc>,
    recipe: &RecipeDoc,
) -> Result<Vec<RelatedRecipe>, mongodb::error::Error> {
    let mut related: Vec<RecipeDoc> = Vec::new();

    if let Some(path) = recipe.category_path.as_deref() {
        related = recipes
            .find(doc! {
                "slug": { "$ne": &recipe.slug },
                "status": "published",
                "category_path": path,
            })
            .limit(RELATED_LIMIT)
            .await?
            .try_collect()
            .await?;
    }

    let remaining = RELATED_LIMIT - related.len() as i64;
    if remaining > 0 && !recipe.cuisine.is_empty() {
        let filter = {
            let mut excluded: Vec<&str> = vec![&recipe.slug];
            excluded.extend(related.iter().map(|r| r.slug.as_str()));
            doc! {
                "slug": { "$nin": excluded },
                "status": "published",
                "cuisine": { "$in": &recipe.cuisine },
            }
        };

        let by_cuisine: Vec<RecipeDoc> = recipes
            .find(filter)
            .limit(remaining)
            .await?
            .try_collect()
            .await?;
        related.extend(by_cuisine);
    }

    Ok(related.into_iter().map(RelatedRecipe::from_doc).collect())
}
