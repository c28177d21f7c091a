//! Sitemap documents derived from the active catalog.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use bson::doc;
use futures_util::TryStreamExt;
use utoipa::OpenApi;

use crate::api::ApiError;
use crate::models::{CategoryDoc, RecipeDoc};
use crate::resolve::recipe_url;
use crate::AppState;

const CACHE_CONTROL: &str = "public, s-maxage=86400, stale-while-revalidate";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sitemap/index.xml", get(index_xml))
        .route("/sitemap/images.xml", get(images_xml))
}

fn xml_response(body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/xml"),
            (header::CACHE_CONTROL, CACHE_CONTROL),
        ],
        body,
    )
        .into_response()
}

#[utoipa::path(
    get,
    path = "/sitemap/index.xml",
    tag = "sitemap",
    responses(
        (status = 200, description = "Sitemap of category and recipe pages", content_type = "application/xml", body = String)
    )
)]
pub async fn index_xml(State(app): State<AppState>) -> Result<Response, ApiError> {
    let categories: Vec<CategoryDoc> = app
        .db
        .categories()
        .find(doc! { "status": "active" })
        .await?
        .try_collect()
        .await?;

    let recipes: Vec<RecipeDoc> = app
        .db
        .recipes()
        .find(doc! { "status": "published" })
        .await?
        .try_collect()
        .await?;

    let mut entries = vec![SitemapEntry {
        loc: app.base_url.clone(),
        lastmod: None,
    }];

    for category in &categories {
        for subcategory in &category.subcategories {
            entries.push(SitemapEntry {
                loc: format!(
                    "{}/subcategories/{}/{}",
                    app.base_url, category.slug, subcategory.slug
                ),
                lastmod: None,
            });
        }
    }

    for recipe in &recipes {
        if let Some(path) = recipe.category_path.as_deref() {
            entries.push(SitemapEntry {
                loc: format!("{}{}", app.base_url, recipe_url(path, &recipe.slug)),
                lastmod: Some(recipe.updated_at.to_chrono().format("%Y-%m-%d").to_string()),
            });
        }
    }

    Ok(xml_response(render_urlset(&entries)))
}

#[utoipa::path(
    get,
    path = "/sitemap/images.xml",
    tag = "sitemap",
    responses(
        (status = 200, description = "Image sitemap for recipe photos", content_type = "application/xml", body = String)
    )
)]
pub async fn images_xml(State(app): State<AppState>) -> Result<Response, ApiError> {
    let recipes: Vec<RecipeDoc> = app
        .db
        .recipes()
        .find(doc! { "status": "published", "images.0": { "$exists": true } })
        .await?
        .try_collect()
        .await?;

    let pages: Vec<(String, Vec<String>)> = recipes
        .iter()
        .filter_map(|recipe| {
            recipe.category_path.as_deref().map(|path| {
                (
                    format!("{}{}", app.base_url, recipe_url(path, &recipe.slug)),
                    recipe.images.clone(),
                )
            })
        })
        .collect();

    Ok(xml_response(render_image_urlset(&pages)))
}

struct SitemapEntry {
    loc: String,
    lastmod: Option<String>,
}

fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn render_urlset(entries: &[SitemapEntry]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for entry in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", xml_escape(&entry.loc)));
        if let Some(lastmod) = &entry.lastmod {
            xml.push_str(&format!("    <lastmod>{}</lastmod>\n", lastmod));
        }
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

fn render_image_urlset(pages: &[(String, Vec<String>)]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\" \
         xmlns:image=\"http://www.google.com/schemas/sitemap-image/1.1\">\n",
    );
    for (loc, images) in pages {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", xml_escape(loc)));
        for image in images {
            xml.push_str("    <image:image>\n");
            xml.push_str(&format!(
                "      <image:loc>{}</image:loc>\n",
                xml_escape(image)
            ));
            xml.push_str("    </image:image>\n");
        }
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

#[derive(OpenApi)]
#[openapi(paths(index_xml, images_xml))]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_xml_metacharacters() {
        assert_eq!(
            xml_escape("a&b <c> \"d\" 'e'"),
            "a&amp;b &lt;c&gt; &quot;d&quot; &apos;e&apos;"
        );
    }

    #[test]
    fn urlset_contains_loc_and_lastmod() {
        let entries = vec![
            SitemapEntry {
                loc: "https://receptai.lt".to_string(),
                lastmod: None,
            },
            SitemapEntry {
                loc: "https://receptai.lt/recipes/mesa/vistiena/kepta-vistiena".to_string(),
                lastmod: Some("2025-06-01".to_string()),
            },
        ];

        let xml = render_urlset(&entries);
        assert!(xml.starts_with("<?xml version=\"1.0\""));
        assert!(xml.contains("<loc>https://receptai.lt</loc>"));
        assert!(xml.contains("<lastmod>2025-06-01</lastmod>"));
        assert_eq!(xml.matches("<url>").count(), 2);
    }

    #[test]
    fn image_urlset_nests_images_under_pages() {
        let pages = vec![(
            "https://receptai.lt/recipes/mesa/vistiena/kepta-vistiena".to_string(),
            vec!["https://cdn.receptai.lt/kepta-vistiena.jpg".to_string()],
        )];

        let xml = render_image_urlset(&pages);
        assert!(xml.contains("xmlns:image"));
        assert!(xml.contains("<image:loc>https://cdn.receptai.lt/kepta-vistiena.jpg</image:loc>"));
    }
}
