//! Single-recipe resolution with slug-only fallback.
//!
//! Category taxonomy gets reorganized after recipe URLs have been indexed
//! by search engines; a stale inbound link should redirect to the
//! canonical path instead of breaking. Worst case this costs one extra
//! query per miss.

use bson::doc;
use mongodb::Collection;

use crate::api::ApiError;
use crate::models::RecipeDoc;

/// Outcome of a single-recipe lookup
#[derive(Debug, Clone)]
pub enum RecipeLookup {
    Found {
        recipe: Box<RecipeDoc>,
        /// False when the recipe has no stored category path and was
        /// served through the slug-only fallback
        canonical: bool,
    },
    /// Recipe lives under a different category path; redirect to it
    Redirect { to: String },
    NotFound,
}

/// Look a recipe up by `(slug, category_path)`, falling back to slug-only
/// when the exact path misses.
pub async fn lookup_recipe(
    recipes: &Collection<RecipeDoc>,
    category: &str,
    subcategory: &str,
    slug: &str,
) -> Result<RecipeLookup, ApiError> {
    let requested_path = format!("{}/{}", category, subcategory);

    let exact = recipes
        .find_one(doc! {
            "slug": slug,
            "category_path": &requested_path,
            "status": "published",
        })
        .await?;

    if exact.is_some() {
        return Ok(decide(&requested_path, exact, None));
    }

    let by_slug = recipes
        .find_one(doc! { "slug": slug, "status": "published" })
        .await?;

    Ok(decide(&requested_path, None, by_slug))
}

/// Canonical page URL for a recipe path + slug
pub fn recipe_url(category_path: &str, slug: &str) -> String {
    format!("/recipes/{}/{}", category_path, slug)
}

/// Pure decision over the two query outcomes.
fn decide(
    requested_path: &str,
    exact: Option<RecipeDoc>,
    by_slug: Option<RecipeDoc>,
) -> RecipeLookup {
    if let Some(recipe) = exact {
        return RecipeLookup::Found {
            recipe: Box::new(recipe),
            canonical: true,
        };
    }

    match by_slug {
        None => RecipeLookup::NotFound,
        Some(recipe) => match recipe.category_path.as_deref() {
            Some(path) if path != requested_path => RecipeLookup::Redirect {
                to: recipe_url(path, &recipe.slug),
            },
            Some(_) => RecipeLookup::Found {
                recipe: Box::new(recipe),
                canonical: true,
            },
            // No stored path: servable, but not canonical
            None => RecipeLookup::Found {
                recipe: Box::new(recipe),
                canonical: false,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(slug: &str, category_path: Option<&str>) -> RecipeDoc {
        RecipeDoc {
            slug: slug.to_string(),
            category_path: category_path.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn exact_match_is_canonical() {
        let outcome = decide(
            "mesa/vistiena",
            Some(recipe("kepta-vistiena", Some("mesa/vistiena"))),
            None,
        );
        assert!(matches!(
            outcome,
            RecipeLookup::Found { canonical: true, .. }
        ));
    }

    #[test]
    fn moved_recipe_redirects_to_canonical_path() {
        let outcome = decide(
            "mesa/vistiena",
            None,
            Some(recipe("kepta-vistiena", Some("orkaiteje/vistiena"))),
        );
        match outcome {
            RecipeLookup::Redirect { to } => {
                assert_eq!(to, "/recipes/orkaiteje/vistiena/kepta-vistiena")
            }
            other => panic!("expected redirect, got {:?}", other),
        }
    }

    #[test]
    fn missing_everywhere_is_not_found() {
        let outcome = decide("mesa/vistiena", None, None);
        assert!(matches!(outcome, RecipeLookup::NotFound));
    }

    #[test]
    fn pathless_recipe_is_served_non_canonically() {
        let outcome = decide("mesa/vistiena", None, Some(recipe("kepta-vistiena", None)));
        assert!(matches!(
            outcome,
            RecipeLookup::Found {
                canonical: false,
                ..
            }
        ));
    }
}
