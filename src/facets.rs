//! Facet aggregation: distinct filter options and their true counts
//! within a query scope.

use bson::{Bson, Document};
use mongodb::Collection;
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::ApiError;
use crate::models::RecipeDoc;
use crate::query::TimeBucket;

/// One selectable value within a facet
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FilterOption {
    pub key: String,
    pub label: String,
    /// Recipes matching this option within the current scope
    pub count: u64,
}

/// A filterable dimension with its options. Derived per query, never
/// stored.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Facet {
    pub key: &'static str,
    pub order: u32,
    pub options: Vec<FilterOption>,
}

/// Compute the three facets for a scope predicate (status + category
/// path, before any facet narrowing).
///
/// Callers always receive all three facet keys in fixed order, with
/// empty option lists when the scope matches nothing.
pub async fn available_filters(
    recipes: &Collection<RecipeDoc>,
    scope: &Document,
) -> Result<Vec<Facet>, ApiError> {
    let mut time_options = Vec::new();
    for bucket in TimeBucket::ORDER {
        let mut narrowed = scope.clone();
        narrowed.insert("total_time_minutes", bucket.constraint());
        let count = recipes.count_documents(narrowed).await?;
        if count > 0 {
            time_options.push(FilterOption {
                key: bucket.key().to_string(),
                label: bucket.label().to_string(),
                count,
            });
        }
    }

    let cuisine_options = value_options(recipes, scope, "cuisine").await?;
    let dietary_options = value_options(recipes, scope, "dietary").await?;

    Ok(assemble(time_options, cuisine_options, dietary_options))
}

/// Options for a multi-valued string field: distinct values in scope,
/// each counted by re-running the scope narrowed to that value.
async fn value_options(
    recipes: &Collection<RecipeDoc>,
    scope: &Document,
    field: &str,
) -> Result<Vec<FilterOption>, ApiError> {
    let mut values: Vec<String> = recipes
        .distinct(field, scope.clone())
        .await?
        .into_iter()
        .filter_map(|value| match value {
            Bson::String(s) if !s.is_empty() => Some(s),
            _ => None,
        })
        .collect();
    values.sort();

    let mut options = Vec::with_capacity(values.len());
    for value in values {
        let mut narrowed = scope.clone();
        narrowed.insert(field, value.as_str());
        let count = recipes.count_documents(narrowed).await?;
        options.push(FilterOption {
            key: value.clone(),
            label: value,
            count,
        });
    }

    Ok(options)
}

/// Fixed facet ordering: timeRequired, cuisine, dietary
fn assemble(
    time: Vec<FilterOption>,
    cuisine: Vec<FilterOption>,
    dietary: Vec<FilterOption>,
) -> Vec<Facet> {
    vec![
        Facet {
            key: "timeRequired",
            order: 1,
            options: time,
        },
        Facet {
            key: "cuisine",
            order: 2,
            options: cuisine,
        },
        Facet {
            key: "dietary",
            order: 3,
            options: dietary,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(key: &str, count: u64) -> FilterOption {
        FilterOption {
            key: key.to_string(),
            label: key.to_string(),
            count,
        }
    }

    #[test]
    fn facets_keep_fixed_keys_and_order() {
        let facets = assemble(
            vec![option("15min", 3)],
            vec![option("Lietuviška", 5)],
            vec![option("vegetariška", 2)],
        );

        let keys: Vec<&str> = facets.iter().map(|f| f.key).collect();
        assert_eq!(keys, vec!["timeRequired", "cuisine", "dietary"]);

        let orders: Vec<u32> = facets.iter().map(|f| f.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
    }

    #[test]
    fn empty_scope_still_yields_all_three_facets() {
        let facets = assemble(Vec::new(), Vec::new(), Vec::new());
        assert_eq!(facets.len(), 3);
        assert!(facets.iter().all(|f| f.options.is_empty()));
    }
}
