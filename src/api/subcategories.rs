//! Subcategory listing: filtered, paginated recipes plus the facet
//! options for the filter UI.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use bson::doc;
use futures_util::TryStreamExt;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::api::recipes::RecipeView;
use crate::api::{ApiError, ErrorResponse};
use crate::facets::{self, Facet, FilterOption};
use crate::models::{Language, RecipeDoc};
use crate::pagination::{PageParams, Pagination};
use crate::query::{recipe_predicate, resolve_scope, scope_predicate, FilterSelection};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/subcategories/{category}/{subcategory}",
        get(get_subcategory),
    )
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SubcategoryParams {
    /// 1-based page number (default: 1)
    pub page: Option<i64>,
    /// Items per page (default: 12)
    pub limit: Option<i64>,
    /// Encoded filter string, e.g. "timeRequired:30min,cuisine:Lietuviška"
    pub filters: Option<String>,
    /// Response language (default: lt)
    pub language: Option<Language>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRef {
    pub slug: String,
    pub title: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryData {
    pub category: CategoryRef,
    pub subcategory: CategoryRef,
    pub recipes: Vec<RecipeView>,
    pub pagination: Pagination,
    pub available_filters: Vec<Facet>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubcategoryResponse {
    pub success: bool,
    pub data: SubcategoryData,
}

#[utoipa::path(
    get,
    path = "/subcategories/{category}/{subcategory}",
    tag = "subcategories",
    params(
        ("category" = String, Path, description = "Category slug"),
        ("subcategory" = String, Path, description = "Subcategory slug"),
        SubcategoryParams
    ),
    responses(
        (status = 200, description = "Recipes in the subcategory with pagination and filters", body = SubcategoryResponse),
        (status = 404, description = "Category or subcategory not found", body = ErrorResponse)
    )
)]
pub async fn get_subcategory(
    State(app): State<AppState>,
    Path((category, subcategory)): Path<(String, String)>,
    Query(params): Query<SubcategoryParams>,
) -> Result<Json<SubcategoryResponse>, ApiError> {
    let language = params.language.unwrap_or_default();

    let (category_doc, subcategory_doc) = resolve_scope(&app.db, &category, &subcategory).await?;

    let filters = FilterSelection::parse(params.filters.as_deref().unwrap_or(""));
    let predicate = recipe_predicate(&category, Some(&subcategory), &filters);

    let recipes = app.db.recipes();

    let total_count = recipes.count_documents(predicate.clone()).await? as i64;
    let pagination = Pagination::compute(
        PageParams {
            page: params.page,
            limit: params.limit,
        },
        total_count,
    );

    let page: Vec<RecipeDoc> = recipes
        .find(predicate)
        .sort(doc! { "created_at": -1 })
        .skip(pagination.skip())
        .limit(pagination.limit)
        .await?
        .try_collect()
        .await?;

    // Facets are computed over the category scope, before the request's
    // own facet filters narrow it
    let scope = scope_predicate(&category, Some(&subcategory));
    let available_filters = facets::available_filters(&recipes, &scope).await?;

    Ok(Json(SubcategoryResponse {
        success: true,
        data: SubcategoryData {
            category: CategoryRef {
                slug: category_doc.slug,
                title: category_doc.title,
            },
            subcategory: CategoryRef {
                slug: subcategory_doc.slug,
                title: subcategory_doc.title,
            },
            recipes: page
                .iter()
                .map(|r| RecipeView::from_doc(r, language))
                .collect(),
            pagination,
            available_filters,
        },
    }))
}

#[derive(OpenApi)]
#[openapi(
    paths(get_subcategory),
    components(schemas(
        SubcategoryResponse,
        SubcategoryData,
        CategoryRef,
        Facet,
        FilterOption,
        Pagination,
    ))
)]
pub struct ApiDoc;
