//! Tag pages: tag metadata plus the most-used related tags.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use bson::doc;
use futures_util::TryStreamExt;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::api::{ApiError, ErrorResponse};
use crate::models::TagDoc;
use crate::AppState;

const RELATED_TAG_LIMIT: i64 = 8;

pub fn router() -> Router<AppState> {
    Router::new().route("/tags/{tag}", get(get_tag))
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagView {
    pub slug: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub recipe_count: i64,
}

impl TagView {
    fn from_doc(tag: TagDoc) -> Self {
        Self {
            slug: tag.slug,
            name: tag.name,
            description: tag.description,
            recipe_count: tag.recipe_count,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagResponse {
    pub tag: TagView,
    pub related_tags: Vec<TagView>,
}

#[utoipa::path(
    get,
    path = "/tags/{tag}",
    tag = "tags",
    params(
        ("tag" = String, Path, description = "Tag slug")
    ),
    responses(
        (status = 200, description = "Tag metadata with related tags", body = TagResponse),
        (status = 404, description = "Tag not found", body = ErrorResponse)
    )
)]
pub async fn get_tag(
    State(app): State<AppState>,
    Path(tag): Path<String>,
) -> Result<Json<TagResponse>, ApiError> {
    let tags = app.db.tags();

    let tag_doc = match tags.find_one(doc! { "slug": &tag }).await? {
        Some(doc) => doc,
        // No stored record: synthesize one when published recipes carry
        // the slug as a facet value
        None => {
            let matching = app
                .db
                .recipes()
                .count_documents(doc! {
                    "status": "published",
                    "$or": [ { "dietary": &tag }, { "cuisine": &tag } ],
                })
                .await?;

            if matching == 0 {
                return Err(ApiError::NotFound("Tag not found".to_string()));
            }
            TagDoc::synthesized(&tag, matching as i64)
        }
    };

    let related: Vec<TagDoc> = tags
        .find(doc! { "slug": { "$ne": &tag } })
        .sort(doc! { "recipe_count": -1 })
        .limit(RELATED_TAG_LIMIT)
        .await?
        .try_collect()
        .await?;

    Ok(Json(TagResponse {
        tag: TagView::from_doc(tag_doc),
        related_tags: related.into_iter().map(TagView::from_doc).collect(),
    }))
}

#[derive(OpenApi)]
#[openapi(paths(get_tag), components(schemas(TagResponse, TagView)))]
pub struct ApiDoc;
