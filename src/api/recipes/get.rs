use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::RecipeView;
use crate::api::ApiError;
use crate::models::Language;
use crate::resolve::{lookup_recipe, RecipeLookup};
use crate::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct RecipePageParams {
    /// Response language (default: lt)
    pub language: Option<Language>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecipePageResponse {
    pub success: bool,
    pub data: RecipeView,
}

#[utoipa::path(
    get,
    path = "/recipes/{category}/{subcategory}/{recipe}",
    tag = "recipes",
    params(
        ("category" = String, Path, description = "Category slug"),
        ("subcategory" = String, Path, description = "Subcategory slug"),
        ("recipe" = String, Path, description = "Recipe slug"),
        RecipePageParams
    ),
    responses(
        (status = 200, description = "Recipe found under this path", body = RecipePageResponse),
        (status = 301, description = "Recipe lives under a different canonical path"),
        (status = 404, description = "Recipe not found")
    )
)]
pub async fn get_recipe(
    State(app): State<AppState>,
    Path((category, subcategory, recipe)): Path<(String, String, String)>,
    Query(params): Query<RecipePageParams>,
) -> Result<Response, ApiError> {
    let language = params.language.unwrap_or_default();

    match lookup_recipe(&app.db.recipes(), &category, &subcategory, &recipe).await? {
        RecipeLookup::Found { recipe, .. } => Ok(Json(RecipePageResponse {
            success: true,
            data: RecipeView::from_doc(&recipe, language),
        })
        .into_response()),
        RecipeLookup::Redirect { to } => Err(ApiError::Moved(to)),
        RecipeLookup::NotFound => Ok((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "success": false, "error": "Recipe not found" })),
        )
            .into_response()),
    }
}
