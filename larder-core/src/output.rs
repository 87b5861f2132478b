//! Writing rendered notes to disk.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::WriteError;
use crate::markdown::{display_title, render_markdown};
use crate::recipe::{RecipeSource, SafeRecipe};

/// Longest file stem we generate, in characters.
const MAX_STEM_LEN: usize = 200;

/// Render the recipe and write it to `output_path`, or to `<title>.md` in
/// the working directory. Returns the path written.
pub fn write_recipe<S: RecipeSource>(
    recipe: &SafeRecipe<S>,
    output_path: Option<&Path>,
) -> Result<PathBuf, WriteError> {
    let path = match output_path {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(note_file_name(&display_title(recipe))),
    };

    let markdown = render_markdown(recipe);
    fs::write(&path, markdown).map_err(|source| WriteError::Io {
        path: path.clone(),
        source,
    })?;

    tracing::info!(path = %path.display(), "wrote recipe note");
    Ok(path)
}

/// File name for a note titled `title`.
///
/// Characters that are invalid in file names on common filesystems are
/// replaced with `_`; leading/trailing whitespace and trailing dots are
/// dropped. Falls back to `recipe.md` when nothing usable is left.
pub fn note_file_name(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .take(MAX_STEM_LEN)
        .collect();

    let stem = cleaned.trim().trim_end_matches('.').trim_end();
    if stem.is_empty() || stem.chars().all(|c| c == '_' || c == '.') {
        "recipe.md".to_string()
    } else {
        format!("{}.md", stem)
    }
}
