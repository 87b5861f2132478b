//! Rendering properties checked through the public API with a hand-written source.

use larder_core::{
    render_markdown, write_recipe, FieldError, FieldValue, RecipeSource, SafeRecipe,
};

/// A source where every optional read fails, as a sparse page would.
struct Sparse {
    ingredients: Vec<&'static str>,
    steps: Vec<&'static str>,
}

impl RecipeSource for Sparse {
    fn title(&self) -> Result<String, FieldError> {
        Ok("Sparse Soup".to_string())
    }
    fn url(&self) -> Result<String, FieldError> {
        Ok("https://example.com/soup".to_string())
    }
    fn description(&self) -> Result<String, FieldError> {
        Err(FieldError::Missing("description"))
    }
    fn prep_time(&self) -> Result<u32, FieldError> {
        Err(FieldError::Unparseable {
            field: "prep_time",
            value: "soon".to_string(),
        })
    }
    fn total_time(&self) -> Result<u32, FieldError> {
        Err(FieldError::Missing("total_time"))
    }
    fn yields(&self) -> Result<String, FieldError> {
        Err(FieldError::Missing("yields"))
    }
    fn ratings(&self) -> Result<f64, FieldError> {
        Err(FieldError::WrongShape {
            field: "ratings",
            found: "object".to_string(),
        })
    }
    fn ingredients(&self) -> Result<Vec<String>, FieldError> {
        Ok(self.ingredients.iter().map(|s| s.to_string()).collect())
    }
    fn instructions_list(&self) -> Result<Vec<String>, FieldError> {
        Ok(self.steps.iter().map(|s| s.to_string()).collect())
    }
    fn keywords(&self) -> Result<FieldValue, FieldError> {
        Ok(FieldValue::Text("Soup, Easy, soup".to_string()))
    }
}

fn sparse() -> SafeRecipe<Sparse> {
    SafeRecipe::new(Sparse {
        ingredients: vec!["1 l stock", "2 carrots", "1 leek", "salt"],
        steps: vec!["Chop.", "Simmer.", "Season."],
    })
}

#[test]
fn failing_optional_reads_are_omitted() {
    let note = render_markdown(&sparse());
    for needle in ["rating:", "Prep Time:", "Total Time:", "Servings:"] {
        assert!(!note.contains(needle), "found {:?}", needle);
    }
    assert!(note.contains("# Sparse Soup\n"));
}

#[test]
fn checklist_and_directions_keep_source_order() {
    let note = render_markdown(&sparse());
    let lines: Vec<&str> = note.lines().collect();

    let checklist: Vec<&str> = lines
        .iter()
        .copied()
        .filter(|l| l.starts_with("- [ ] "))
        .collect();
    assert_eq!(
        checklist,
        vec!["- [ ] 1 l stock", "- [ ] 2 carrots", "- [ ] 1 leek", "- [ ] salt"]
    );

    let numbered: Vec<&str> = lines
        .iter()
        .copied()
        .skip_while(|l| *l != "## Directions")
        .filter(|l| l.chars().next().is_some_and(|c| c.is_ascii_digit()))
        .collect();
    assert_eq!(numbered, vec!["1. Chop.", "2. Simmer.", "3. Season."]);
}

#[test]
fn keyword_tags_are_deduplicated() {
    let note = render_markdown(&sparse());
    assert!(note.contains("tags:\n  - easy\n  - soup\n---\n"));
}

#[test]
fn written_file_matches_rendered_note() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("soup.md");
    let recipe = sparse();

    write_recipe(&recipe, Some(&path)).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), render_markdown(&recipe));
}
