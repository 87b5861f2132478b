//! Tag collection for the note frontmatter.

use crate::recipe::{FieldValue, RecipeSource, SafeRecipe};

/// Gather tags from cooking method, category, cuisine and keywords.
///
/// Keywords published as one string are split on commas first. Every tag is
/// normalized with [`normalize_tag`]; the result is sorted and deduplicated.
pub fn collect_tags<S: RecipeSource>(recipe: &SafeRecipe<S>) -> Vec<String> {
    let mut raw: Vec<String> = Vec::new();

    for value in [recipe.cooking_method(), recipe.category(), recipe.cuisine()]
        .into_iter()
        .flatten()
    {
        raw.extend(value.into_items());
    }

    if let Some(keywords) = recipe.keywords() {
        let keywords = match keywords {
            FieldValue::Text(s) => FieldValue::List(s.split(',').map(str::to_string).collect()),
            list => list,
        };
        raw.extend(keywords.into_items());
    }

    let mut tags: Vec<String> = raw
        .iter()
        .map(|t| normalize_tag(t))
        .filter(|t| !t.is_empty())
        .collect();
    tags.sort();
    tags.dedup();
    tags
}

/// "Slow Cooker" -> "slow-cooker"
pub fn normalize_tag(tag: &str) -> String {
    tag.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}
