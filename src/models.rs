//! Document schemas for the recipe store.
//!
//! The source data carries optional and legacy duplicate fields; they are
//! normalized into explicit `Option`s here, once, so the rest of the
//! pipeline never deals with ambiguous shapes.

use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::IntoIndexes;

pub const RECIPE_COLLECTION: &str = "recipes";
pub const CATEGORY_COLLECTION: &str = "categories";
pub const TAG_COLLECTION: &str = "tags";
pub const USER_COLLECTION: &str = "users";

/// Publication status of a recipe
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecipeStatus {
    Published,
    #[default]
    Draft,
    Archived,
}

/// Response language requested by the caller
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Lt,
    En,
}

/// English translation block. Lithuanian is the storage default; a recipe
/// may or may not carry a translation.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct EnTranslation {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Recipe document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RecipeDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Unique URL slug
    pub slug: String,

    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Primary taxonomy placement as a "category/subcategory" string.
    /// Absent on recipes that predate the taxonomy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_path: Option<String>,

    /// Additional category paths the recipe is listed under
    #[serde(default)]
    pub secondary_paths: Vec<String>,

    #[serde(default)]
    pub cuisine: Vec<String>,

    #[serde(default)]
    pub dietary: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub effort: Option<String>,

    /// Total time to cook, in minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_time_minutes: Option<i64>,

    #[serde(default)]
    pub status: RecipeStatus,

    /// Image URLs, first one is the lead photo
    #[serde(default)]
    pub images: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub translations: Option<EnTranslation>,

    #[serde(default = "DateTime::now")]
    pub created_at: DateTime,

    #[serde(default = "DateTime::now")]
    pub updated_at: DateTime,
}

impl Default for RecipeDoc {
    fn default() -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            slug: String::new(),
            title: String::new(),
            description: None,
            category_path: None,
            secondary_paths: Vec::new(),
            cuisine: Vec::new(),
            dietary: Vec::new(),
            meal_type: None,
            effort: None,
            total_time_minutes: None,
            status: RecipeStatus::default(),
            images: Vec::new(),
            translations: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl RecipeDoc {
    /// Title in the requested language, falling back to Lithuanian
    pub fn localized_title(&self, language: Language) -> &str {
        if language == Language::En {
            if let Some(title) = self.translations.as_ref().and_then(|t| t.title.as_deref()) {
                return title;
            }
        }
        &self.title
    }

    /// Description in the requested language, falling back to Lithuanian
    pub fn localized_description(&self, language: Language) -> Option<&str> {
        if language == Language::En {
            if let Some(desc) = self
                .translations
                .as_ref()
                .and_then(|t| t.description.as_deref())
            {
                return Some(desc);
            }
        }
        self.description.as_deref()
    }
}

impl IntoIndexes for RecipeDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            (
                doc! { "slug": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("slug_unique".to_string())
                        .build(),
                ),
            ),
            // Exact-path lookup used by the resolution fallback
            (
                doc! { "slug": 1, "category_path": 1 },
                Some(
                    IndexOptions::builder()
                        .name("slug_category_path".to_string())
                        .build(),
                ),
            ),
            // Listing queries filter on status + path
            (doc! { "status": 1, "category_path": 1 }, None),
            (doc! { "cuisine": 1 }, None),
            (doc! { "dietary": 1 }, None),
        ]
    }
}

/// Category status
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CategoryStatus {
    Active,
    #[default]
    Inactive,
}

/// Subcategory entry embedded in a category. Slugs are unique within the
/// parent category.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Subcategory {
    pub slug: String,
    pub title: String,
}

/// Category document with its ordered subcategory list
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct CategoryDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub slug: String,

    pub title: String,

    #[serde(default)]
    pub status: CategoryStatus,

    #[serde(default)]
    pub subcategories: Vec<Subcategory>,
}

impl CategoryDoc {
    pub fn subcategory(&self, slug: &str) -> Option<&Subcategory> {
        self.subcategories.iter().find(|s| s.slug == slug)
    }
}

impl IntoIndexes for CategoryDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "slug": 1 },
            Some(
                IndexOptions::builder()
                    .unique(true)
                    .name("slug_unique".to_string())
                    .build(),
            ),
        )]
    }
}

/// Tag document
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct TagDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub slug: String,

    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Number of recipes carrying this tag, maintained by the authoring
    /// process
    #[serde(default)]
    pub recipe_count: i64,
}

impl TagDoc {
    /// Minimal record for a tag that has matching recipes but no entry in
    /// the tag collection
    pub fn synthesized(slug: &str, recipe_count: i64) -> Self {
        Self {
            id: None,
            slug: slug.to_string(),
            name: slug.replace('-', " "),
            description: None,
            recipe_count,
        }
    }
}

impl IntoIndexes for TagDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            (
                doc! { "slug": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("slug_unique".to_string())
                        .build(),
                ),
            ),
            // Related-tag queries sort on recipe_count
            (doc! { "recipe_count": -1 }, None),
        ]
    }
}

/// Authoring account. The store owns the collection; the read API never
/// exposes it.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct UserDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub email: String,

    pub name: String,

    #[serde(default)]
    pub is_active: bool,
}

impl IntoIndexes for UserDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "email": 1 },
            Some(
                IndexOptions::builder()
                    .unique(true)
                    .name("email_unique".to_string())
                    .build(),
            ),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe_with_translation() -> RecipeDoc {
        RecipeDoc {
            title: "Cepelinai".to_string(),
            description: Some("Bulviniai didžkukuliai".to_string()),
            translations: Some(EnTranslation {
                title: Some("Zeppelins".to_string()),
                description: None,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn localized_title_prefers_translation() {
        let recipe = recipe_with_translation();
        assert_eq!(recipe.localized_title(Language::En), "Zeppelins");
        assert_eq!(recipe.localized_title(Language::Lt), "Cepelinai");
    }

    #[test]
    fn localized_description_falls_back_to_lithuanian() {
        let recipe = recipe_with_translation();
        assert_eq!(
            recipe.localized_description(Language::En),
            Some("Bulviniai didžkukuliai")
        );
    }

    #[test]
    fn subcategory_lookup_by_slug() {
        let category = CategoryDoc {
            slug: "mesa".to_string(),
            title: "Mėsa".to_string(),
            status: CategoryStatus::Active,
            subcategories: vec![
                Subcategory {
                    slug: "vistiena".to_string(),
                    title: "Vištiena".to_string(),
                },
                Subcategory {
                    slug: "jautiena".to_string(),
                    title: "Jautiena".to_string(),
                },
            ],
            ..Default::default()
        };

        assert_eq!(category.subcategory("vistiena").unwrap().title, "Vištiena");
        assert!(category.subcategory("zuvis").is_none());
    }

    #[test]
    fn synthesized_tag_humanizes_slug() {
        let tag = TagDoc::synthesized("be-gliuteno", 4);
        assert_eq!(tag.name, "be gliuteno");
        assert_eq!(tag.recipe_count, 4);
    }

    #[test]
    fn status_serializes_lowercase() {
        let value = bson::to_bson(&RecipeStatus::Published).unwrap();
        assert_eq!(value, bson::Bson::String("published".to_string()));
    }
}
