//! Obsidian note rendering.

use crate::duration::format_minutes;
use crate::recipe::{RecipeSource, SafeRecipe};
use crate::tags::collect_tags;

/// Heading and default file name when a page publishes no recipe name.
pub const UNTITLED: &str = "Untitled recipe";

/// Render a recipe as an Obsidian note.
///
/// The layout is fixed: frontmatter, title, description, timing and servings,
/// a notes placeholder, an ingredient checklist and numbered directions.
/// Optional lines are left out entirely when their field is absent.
pub fn render_markdown<S: RecipeSource>(recipe: &SafeRecipe<S>) -> String {
    let mut lines: Vec<Option<String>> = Vec::new();
    let blank = || Some(String::new());

    // Frontmatter
    lines.push(Some("---".to_string()));
    lines.push(Some("aliases:".to_string()));
    lines.push(Some(
        match recipe.url().filter(|u| !u.trim().is_empty()) {
            Some(url) => format!("source: {}", url.trim()),
            None => "source:".to_string(),
        },
    ));
    let tags = collect_tags(recipe);
    if !tags.is_empty() {
        lines.push(Some("tags:".to_string()));
        lines.extend(tags.iter().map(|t| Some(format!("  - {}", t))));
    }
    lines.push(
        recipe
            .ratings()
            .filter(|r| r.is_finite() && *r != 0.0)
            .map(|r| format!("rating: {}", r)),
    );
    lines.push(Some("---".to_string()));

    // Heading and description
    lines.push(Some(format!("# {}", display_title(recipe))));
    lines.push(blank());
    lines.push(non_empty(recipe.description()));

    // Info
    lines.push(blank());
    lines.push(blank());
    lines.push(
        recipe
            .prep_time()
            .filter(|m| *m > 0)
            .map(|m| format!("Prep Time: {}", format_minutes(m))),
    );
    lines.push(
        recipe
            .total_time()
            .filter(|m| *m > 0)
            .map(|m| format!("Total Time: {}", format_minutes(m))),
    );
    lines.push(non_empty(recipe.yields()).map(|y| format!("Servings: {}", y)));

    lines.push(blank());
    lines.push(Some("> Notes: ".to_string()));
    lines.push(blank());

    lines.push(Some("## Ingredients".to_string()));
    lines.push(Some("#ingredients".to_string()));
    lines.extend(
        recipe
            .ingredients()
            .unwrap_or_default()
            .into_iter()
            .map(|ingredient| Some(format!("- [ ] {}", ingredient))),
    );
    lines.push(blank());
    lines.push(blank());

    lines.push(Some("## Directions".to_string()));
    lines.push(blank());
    lines.extend(
        recipe
            .instructions_list()
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(idx, step)| Some(format!("{}. {}", idx + 1, step))),
    );

    lines.into_iter().flatten().collect::<Vec<_>>().join("\n")
}

/// The recipe title, or [`UNTITLED`] when the page has none.
pub fn display_title<S: RecipeSource>(recipe: &SafeRecipe<S>) -> String {
    non_empty(recipe.title()).unwrap_or_else(|| UNTITLED.to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
