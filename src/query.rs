//! Query construction: decodes the request's filter string and builds the
//! recipe predicate for a category scope.

use bson::{doc, Document};

use crate::api::ApiError;
use crate::db::Db;
use crate::models::{CategoryDoc, Subcategory};

/// Total-time buckets accepted in `timeRequired` filters.
///
/// The buckets are mutually exclusive: when a request carries several
/// tokens, the first bucket in this fixed order that is present wins and
/// the rest are silently ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBucket {
    Max15,
    Max30,
    Max60,
    Max120,
    Over120,
}

impl TimeBucket {
    /// Fixed evaluation order
    pub const ORDER: [TimeBucket; 5] = [
        TimeBucket::Max15,
        TimeBucket::Max30,
        TimeBucket::Max60,
        TimeBucket::Max120,
        TimeBucket::Over120,
    ];

    /// Token used in filter strings and facet keys
    pub fn key(&self) -> &'static str {
        match self {
            TimeBucket::Max15 => "15min",
            TimeBucket::Max30 => "30min",
            TimeBucket::Max60 => "1h",
            TimeBucket::Max120 => "2h",
            TimeBucket::Over120 => "2h+",
        }
    }

    /// Display label for the filter UI
    pub fn label(&self) -> &'static str {
        match self {
            TimeBucket::Max15 => "Iki 15 min.",
            TimeBucket::Max30 => "Iki 30 min.",
            TimeBucket::Max60 => "Iki 1 val.",
            TimeBucket::Max120 => "Iki 2 val.",
            TimeBucket::Over120 => "Virš 2 val.",
        }
    }

    /// Constraint on `total_time_minutes`
    pub fn constraint(&self) -> Document {
        match self {
            TimeBucket::Max15 => doc! { "$lte": 15_i64 },
            TimeBucket::Max30 => doc! { "$lte": 30_i64 },
            TimeBucket::Max60 => doc! { "$lte": 60_i64 },
            TimeBucket::Max120 => doc! { "$lte": 120_i64 },
            TimeBucket::Over120 => doc! { "$gt": 120_i64 },
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        Self::ORDER.iter().copied().find(|b| b.key() == token)
    }
}

/// Decoded filter string.
///
/// The wire format is comma-separated `type:value` segments; a segment
/// without a colon is a further value for the preceding type, so
/// `cuisine:Italų,Prancūzų` selects two cuisines.
#[derive(Debug, Default, PartialEq)]
pub struct FilterSelection {
    pub time: Option<TimeBucket>,
    pub cuisine: Vec<String>,
    pub dietary: Vec<String>,
    /// Accepted but not applied to queries (deferred)
    pub main_ingredient: Vec<String>,
}

#[derive(Clone, Copy)]
enum FilterKey {
    Time,
    Cuisine,
    Dietary,
    MainIngredient,
    Unknown,
}

impl FilterSelection {
    /// Decode a filter string. Unrecognized filter types are ignored
    /// without error.
    pub fn parse(raw: &str) -> Self {
        let mut time_tokens: Vec<String> = Vec::new();
        let mut selection = Self::default();
        let mut current = FilterKey::Unknown;

        for segment in raw.split(',') {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }

            let value = match segment.split_once(':') {
                Some((key, value)) => {
                    current = match key {
                        "timeRequired" => FilterKey::Time,
                        "cuisine" => FilterKey::Cuisine,
                        "dietary" => FilterKey::Dietary,
                        "mainIngredient" => FilterKey::MainIngredient,
                        _ => FilterKey::Unknown,
                    };
                    value
                }
                None => segment,
            };

            if value.is_empty() {
                continue;
            }

            match current {
                FilterKey::Time => time_tokens.push(value.to_string()),
                FilterKey::Cuisine => selection.cuisine.push(value.to_string()),
                FilterKey::Dietary => selection.dietary.push(value.to_string()),
                FilterKey::MainIngredient => selection.main_ingredient.push(value.to_string()),
                FilterKey::Unknown => {}
            }
        }

        // First bucket in the fixed order that was requested wins
        selection.time = TimeBucket::ORDER
            .iter()
            .copied()
            .find(|b| time_tokens.iter().any(|t| TimeBucket::from_token(t) == Some(*b)));

        selection
    }
}

/// Predicate matching published recipes within a category scope, without
/// any facet filters applied
pub fn scope_predicate(category: &str, subcategory: Option<&str>) -> Document {
    let mut predicate = doc! { "status": "published" };

    match subcategory {
        Some(subcategory) => {
            predicate.insert("category_path", format!("{}/{}", category, subcategory));
        }
        None => {
            // First path segment only; slugs come from the category
            // collection so they carry no regex metacharacters
            predicate.insert(
                "category_path",
                doc! { "$regex": format!("^{}(/|$)", category) },
            );
        }
    }

    predicate
}

/// Full recipe predicate: category scope plus decoded facet filters
pub fn recipe_predicate(
    category: &str,
    subcategory: Option<&str>,
    filters: &FilterSelection,
) -> Document {
    let mut predicate = scope_predicate(category, subcategory);

    if let Some(bucket) = filters.time {
        predicate.insert("total_time_minutes", bucket.constraint());
    }
    if !filters.cuisine.is_empty() {
        predicate.insert("cuisine", doc! { "$in": &filters.cuisine });
    }
    if !filters.dietary.is_empty() {
        predicate.insert("dietary", doc! { "$in": &filters.dietary });
    }
    // mainIngredient is accepted but deliberately not applied

    predicate
}

/// Resolve a category slug to an active category document.
pub async fn resolve_category(db: &Db, category: &str) -> Result<CategoryDoc, ApiError> {
    db.categories()
        .find_one(doc! { "slug": category, "status": "active" })
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))
}

/// Resolve a category/subcategory slug pair. The two misses are distinct
/// failures even though both surface as 404.
pub async fn resolve_scope(
    db: &Db,
    category: &str,
    subcategory: &str,
) -> Result<(CategoryDoc, Subcategory), ApiError> {
    let category_doc = resolve_category(db, category).await?;
    let subcategory_doc = require_subcategory(&category_doc, subcategory)?;
    Ok((category_doc, subcategory_doc))
}

fn require_subcategory(category: &CategoryDoc, slug: &str) -> Result<Subcategory, ApiError> {
    category
        .subcategory(slug)
        .cloned()
        .ok_or_else(|| ApiError::NotFound("Subcategory not found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::Bson;

    #[test]
    fn parse_empty_string() {
        let filters = FilterSelection::parse("");
        assert_eq!(filters, FilterSelection::default());
    }

    #[test]
    fn parse_time_and_cuisine() {
        let filters = FilterSelection::parse("timeRequired:15min,cuisine:Lietuviška");
        assert_eq!(filters.time, Some(TimeBucket::Max15));
        assert_eq!(filters.cuisine, vec!["Lietuviška"]);
        assert!(filters.dietary.is_empty());
    }

    #[test]
    fn parse_multi_value_segments() {
        let filters = FilterSelection::parse("cuisine:Italų,Prancūzų,dietary:vegetariška");
        assert_eq!(filters.cuisine, vec!["Italų", "Prancūzų"]);
        assert_eq!(filters.dietary, vec!["vegetariška"]);
    }

    #[test]
    fn first_time_bucket_in_fixed_order_wins() {
        // 30min appears first in the request, but 15min comes first in
        // the bucket evaluation order
        let filters = FilterSelection::parse("timeRequired:30min,15min");
        assert_eq!(filters.time, Some(TimeBucket::Max15));

        let filters = FilterSelection::parse("timeRequired:2h+,1h");
        assert_eq!(filters.time, Some(TimeBucket::Max60));
    }

    #[test]
    fn unknown_filter_types_are_ignored() {
        let filters = FilterSelection::parse("season:summer,cuisine:Italų,difficulty:easy");
        assert_eq!(filters.cuisine, vec!["Italų"]);
        assert!(filters.time.is_none());
        assert!(filters.dietary.is_empty());
    }

    #[test]
    fn main_ingredient_is_parsed_but_not_applied() {
        let filters = FilterSelection::parse("mainIngredient:vistiena");
        assert_eq!(filters.main_ingredient, vec!["vistiena"]);

        let predicate = recipe_predicate("mesa", Some("vistiena"), &filters);
        assert!(!predicate.contains_key("main_ingredient"));
    }

    #[test]
    fn scope_with_subcategory_uses_exact_path() {
        let predicate = scope_predicate("mesa", Some("vistiena"));
        assert_eq!(predicate.get_str("status").unwrap(), "published");
        assert_eq!(predicate.get_str("category_path").unwrap(), "mesa/vistiena");
    }

    #[test]
    fn scope_without_subcategory_matches_first_segment() {
        let predicate = scope_predicate("mesa", None);
        let path = predicate.get_document("category_path").unwrap();
        assert_eq!(path.get_str("$regex").unwrap(), "^mesa(/|$)");
    }

    #[test]
    fn predicate_applies_time_and_membership_filters() {
        let filters = FilterSelection::parse("timeRequired:15min,cuisine:Lietuviška");
        let predicate = recipe_predicate("mesa", Some("vistiena"), &filters);

        let time = predicate.get_document("total_time_minutes").unwrap();
        assert_eq!(time.get_i64("$lte").unwrap(), 15);

        let cuisine = predicate.get_document("cuisine").unwrap();
        assert_eq!(
            cuisine.get_array("$in").unwrap(),
            &vec![Bson::String("Lietuviška".to_string())]
        );
    }

    #[test]
    fn missing_subcategory_is_its_own_not_found() {
        let category = CategoryDoc {
            slug: "mesa".to_string(),
            title: "Mėsa".to_string(),
            subcategories: vec![Subcategory {
                slug: "vistiena".to_string(),
                title: "Vištiena".to_string(),
            }],
            ..Default::default()
        };

        let found = require_subcategory(&category, "vistiena").unwrap();
        assert_eq!(found.title, "Vištiena");

        match require_subcategory(&category, "zuvis") {
            Err(ApiError::NotFound(message)) => assert_eq!(message, "Subcategory not found"),
            other => panic!("expected not-found, got {:?}", other.map(|s| s.slug)),
        }
    }

    #[test]
    fn over_two_hours_is_a_lower_bound() {
        let filters = FilterSelection::parse("timeRequired:2h+");
        let predicate = recipe_predicate("mesa", None, &filters);

        let time = predicate.get_document("total_time_minutes").unwrap();
        assert_eq!(time.get_i64("$gt").unwrap(), 120);
    }
}
