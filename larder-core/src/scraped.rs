//! [`RecipeSource`] over a schema.org Recipe node.
//!
//! Every read mirrors what recipe sites actually publish: strings where a list
//! was expected, numbers as strings, instructions nested in sections. Reads
//! fail with a [`FieldError`] instead of guessing when the data is unusable.

use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;
use serde_json::Value;

use crate::duration::parse_minutes;
use crate::error::FieldError;
use crate::extract::collapse_whitespace;
use crate::recipe::{FieldValue, RecipeSource};

/// Closing paragraphs and line breaks in markup-bearing strings.
static BLOCK_BREAK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</p\s*>|<br\s*/?>").expect("Invalid block break regex")
});

static BLANK_LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("Invalid blank line regex"));

/// Identifies which extraction method found the recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMethod {
    JsonLd,
    Microdata,
}

/// A recipe as found on the page, before any field has been read.
#[derive(Debug, Clone)]
pub struct ScrapedRecipe {
    node: Value,
    page_url: String,
    method: ExtractionMethod,
}

impl ScrapedRecipe {
    pub fn new(node: Value, page_url: impl Into<String>, method: ExtractionMethod) -> Self {
        Self {
            node,
            page_url: page_url.into(),
            method,
        }
    }

    pub fn method(&self) -> ExtractionMethod {
        self.method
    }

    fn get(&self, field: &'static str, key: &str) -> Result<&Value, FieldError> {
        match self.node.get(key) {
            None | Some(Value::Null) => Err(FieldError::Missing(field)),
            Some(v) => Ok(v),
        }
    }

    fn text(&self, field: &'static str, key: &str) -> Result<String, FieldError> {
        let text = match self.get(field, key)? {
            Value::String(s) => clean_text(s),
            Value::Number(n) => n.to_string(),
            Value::Array(items) => items
                .iter()
                .filter_map(scalar_text)
                .find(|s| !s.is_empty())
                .unwrap_or_default(),
            other => return Err(wrong_shape(field, other)),
        };

        if text.is_empty() {
            Err(FieldError::Missing(field))
        } else {
            Ok(text)
        }
    }

    fn minutes(&self, field: &'static str, key: &str) -> Result<u32, FieldError> {
        let raw = self.text(field, key)?;
        parse_minutes(&raw).ok_or(FieldError::Unparseable { field, value: raw })
    }

    fn loose(&self, field: &'static str, key: &str) -> Result<FieldValue, FieldError> {
        let value = self.get(field, key)?;
        match value {
            Value::String(s) => Ok(FieldValue::Text(clean_text(s))),
            Value::Number(n) => Ok(FieldValue::Text(n.to_string())),
            Value::Array(items) => Ok(FieldValue::List(
                items.iter().filter_map(scalar_text).collect(),
            )),
            Value::Object(obj) => match obj.get("name").and_then(Value::as_str) {
                Some(name) => Ok(FieldValue::Text(clean_text(name))),
                None => Err(wrong_shape(field, value)),
            },
            _ => Err(wrong_shape(field, value)),
        }
    }
}

impl RecipeSource for ScrapedRecipe {
    fn title(&self) -> Result<String, FieldError> {
        self.text("title", "name")
    }

    fn url(&self) -> Result<String, FieldError> {
        Ok(self.page_url.clone())
    }

    /// Paragraph breaks survive; whitespace inside a paragraph is collapsed.
    fn description(&self) -> Result<String, FieldError> {
        match self.get("description", "description")? {
            Value::String(s) => {
                let text = clean_paragraphs(s);
                if text.is_empty() {
                    Err(FieldError::Missing("description"))
                } else {
                    Ok(text)
                }
            }
            _ => self.text("description", "description"),
        }
    }

    fn prep_time(&self) -> Result<u32, FieldError> {
        self.minutes("prep_time", "prepTime")
    }

    /// Falls back to prep + cook time when the page has no total.
    fn total_time(&self) -> Result<u32, FieldError> {
        match self.minutes("total_time", "totalTime") {
            Err(FieldError::Missing(_)) => {
                let prep = self.minutes("prep_time", "prepTime").ok();
                let cook = self.minutes("cook_time", "cookTime").ok();
                match (prep, cook) {
                    (None, None) => Err(FieldError::Missing("total_time")),
                    (p, c) => p
                        .unwrap_or(0)
                        .checked_add(c.unwrap_or(0))
                        .ok_or_else(|| FieldError::Unparseable {
                            field: "total_time",
                            value: "prepTime + cookTime".to_string(),
                        }),
                }
            }
            other => other,
        }
    }

    fn yields(&self) -> Result<String, FieldError> {
        let raw = self.text("yields", "recipeYield")?;
        Ok(normalize_yield(&raw))
    }

    fn ratings(&self) -> Result<f64, FieldError> {
        let rating = match self.get("ratings", "aggregateRating")? {
            Value::Object(obj) => obj.get("ratingValue").ok_or(FieldError::Missing("ratings"))?,
            other => other,
        };

        let value = match rating {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
            _ => None,
        };

        match value {
            Some(v) if v.is_finite() => Ok((v * 100.0).round() / 100.0),
            _ => Err(FieldError::Unparseable {
                field: "ratings",
                value: rating.to_string(),
            }),
        }
    }

    fn ingredients(&self) -> Result<Vec<String>, FieldError> {
        let raw = self
            .get("ingredients", "recipeIngredient")
            .or_else(|_| self.get("ingredients", "ingredients"))?;

        let items: Vec<String> = match raw {
            Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
            Value::String(s) => s.lines().map(clean_text).collect(),
            other => return Err(wrong_shape("ingredients", other)),
        };

        let items: Vec<String> = items.into_iter().filter(|s| !s.is_empty()).collect();
        if items.is_empty() {
            return Err(FieldError::Missing("ingredients"));
        }
        Ok(items)
    }

    fn instructions_list(&self) -> Result<Vec<String>, FieldError> {
        let raw = self.get("instructions_list", "recipeInstructions")?;
        let mut steps = Vec::new();
        collect_steps(raw, &mut steps);
        if steps.is_empty() {
            return Err(FieldError::Missing("instructions_list"));
        }
        Ok(steps)
    }

    fn cooking_method(&self) -> Result<FieldValue, FieldError> {
        self.loose("cooking_method", "cookingMethod")
    }

    fn category(&self) -> Result<FieldValue, FieldError> {
        self.loose("category", "recipeCategory")
    }

    fn cuisine(&self) -> Result<FieldValue, FieldError> {
        self.loose("cuisine", "recipeCuisine")
    }

    fn keywords(&self) -> Result<FieldValue, FieldError> {
        self.loose("keywords", "keywords")
    }
}

/// Flatten `recipeInstructions`: plain strings (one step per line),
/// HowToStep objects, and HowToSection objects with nested `itemListElement`.
fn collect_steps(value: &Value, steps: &mut Vec<String>) {
    match value {
        Value::String(s) => steps.extend(
            s.lines()
                .map(clean_text)
                .filter(|line| !line.is_empty()),
        ),
        Value::Array(items) => {
            for item in items {
                collect_steps(item, steps);
            }
        }
        Value::Object(obj) => {
            if let Some(nested) = obj.get("itemListElement") {
                collect_steps(nested, steps);
            } else if let Some(text) = obj
                .get("text")
                .or_else(|| obj.get("name"))
                .and_then(Value::as_str)
            {
                let text = clean_text(text);
                if !text.is_empty() {
                    steps.push(text);
                }
            }
        }
        _ => {}
    }
}

/// A bare number of servings becomes "4 servings"; anything else is kept.
fn normalize_yield(raw: &str) -> String {
    match raw.trim().parse::<u32>() {
        Ok(1) => "1 serving".to_string(),
        Ok(n) => format!("{} servings", n),
        Err(_) => raw.trim().to_string(),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(clean_text(s)),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(obj) => obj.get("name").and_then(Value::as_str).map(clean_text),
        _ => None,
    }
}

/// Strip markup and decode entities some sites leave in JSON-LD strings,
/// then collapse whitespace.
fn clean_text(s: &str) -> String {
    if s.contains('<') || s.contains('&') {
        let fragment = Html::parse_fragment(s);
        collapse_whitespace(&fragment.root_element().text().collect::<String>())
    } else {
        collapse_whitespace(s)
    }
}

/// Like [`clean_text`], but keeps paragraphs apart as blank-line separated blocks.
fn clean_paragraphs(s: &str) -> String {
    let with_breaks = BLOCK_BREAK_REGEX.replace_all(s, "\n\n");
    BLANK_LINE_REGEX
        .split(&with_breaks)
        .map(clean_text)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn wrong_shape(field: &'static str, value: &Value) -> FieldError {
    let found = match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    FieldError::WrongShape {
        field,
        found: found.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn recipe(node: Value) -> ScrapedRecipe {
        ScrapedRecipe::new(node, "https://example.com/r", ExtractionMethod::JsonLd)
    }

    #[test]
    fn missing_fields_fail_with_missing() {
        let r = recipe(json!({"@type": "Recipe"}));
        assert_eq!(r.title(), Err(FieldError::Missing("title")));
        assert_eq!(r.ratings(), Err(FieldError::Missing("ratings")));
        assert_eq!(r.keywords(), Err(FieldError::Missing("keywords")));
        assert_eq!(r.url().unwrap(), "https://example.com/r");
    }

    #[test]
    fn text_is_cleaned_of_markup_and_entities() {
        let r = recipe(json!({
            "name": "Mac &amp; Cheese",
            "description": "<b>Creamy</b>,   cheesy\n&quot;classic&quot;"
        }));
        assert_eq!(r.title().unwrap(), "Mac & Cheese");
        assert_eq!(r.description().unwrap(), "Creamy, cheesy \"classic\"");
    }

    #[test]
    fn description_keeps_paragraph_breaks() {
        let r = recipe(json!({
            "description": "First   paragraph\nwraps here.\n\n  \nSecond one."
        }));
        assert_eq!(
            r.description().unwrap(),
            "First paragraph wraps here.\n\nSecond one."
        );

        let r = recipe(json!({
            "description": "<p>Creamy &amp; <b>rich</b>.</p><p>Serves a crowd.</p>"
        }));
        assert_eq!(r.description().unwrap(), "Creamy & rich.\n\nServes a crowd.");

        let r = recipe(json!({"description": "<p> </p>\n\n"}));
        assert_eq!(r.description(), Err(FieldError::Missing("description")));
    }

    #[test]
    fn blank_title_is_missing() {
        let r = recipe(json!({"name": "   "}));
        assert_eq!(r.title(), Err(FieldError::Missing("title")));
    }

    #[test]
    fn object_where_text_expected_is_wrong_shape() {
        let r = recipe(json!({"description": {"@type": "Text"}}));
        assert!(matches!(
            r.description(),
            Err(FieldError::WrongShape { field: "description", .. })
        ));
    }

    #[test]
    fn times_parse_and_total_falls_back_to_sum() {
        let r = recipe(json!({"prepTime": "PT15M", "cookTime": "PT1H"}));
        assert_eq!(r.prep_time().unwrap(), 15);
        assert_eq!(r.total_time().unwrap(), 75);

        let r = recipe(json!({"totalTime": "PT2H", "prepTime": "PT15M"}));
        assert_eq!(r.total_time().unwrap(), 120);

        let r = recipe(json!({"prepTime": "sometime"}));
        assert!(matches!(
            r.prep_time(),
            Err(FieldError::Unparseable { field: "prep_time", .. })
        ));
        assert_eq!(r.total_time(), Err(FieldError::Missing("total_time")));
    }

    #[test]
    fn summed_total_time_overflow_is_an_error() {
        let r = recipe(json!({"prepTime": "PT70000000H", "cookTime": "PT70000000H"}));
        assert_eq!(r.prep_time().unwrap(), 4_200_000_000);
        assert!(matches!(
            r.total_time(),
            Err(FieldError::Unparseable { field: "total_time", .. })
        ));
    }

    #[test]
    fn yields_accepts_numbers_strings_and_lists() {
        assert_eq!(recipe(json!({"recipeYield": 4})).yields().unwrap(), "4 servings");
        assert_eq!(recipe(json!({"recipeYield": "1"})).yields().unwrap(), "1 serving");
        assert_eq!(
            recipe(json!({"recipeYield": ["8", "8 slices"]})).yields().unwrap(),
            "8 servings"
        );
        assert_eq!(
            recipe(json!({"recipeYield": "12 cookies"})).yields().unwrap(),
            "12 cookies"
        );
    }

    #[test]
    fn ratings_from_numbers_and_strings() {
        let r = recipe(json!({"aggregateRating": {"ratingValue": 4.666}}));
        assert_eq!(r.ratings().unwrap(), 4.67);

        let r = recipe(json!({"aggregateRating": {"ratingValue": "4,5", "ratingCount": "12"}}));
        assert_eq!(r.ratings().unwrap(), 4.5);

        let r = recipe(json!({"aggregateRating": {"ratingValue": "n/a"}}));
        assert!(matches!(r.ratings(), Err(FieldError::Unparseable { .. })));

        let r = recipe(json!({"aggregateRating": {"ratingCount": 3}}));
        assert_eq!(r.ratings(), Err(FieldError::Missing("ratings")));
    }

    #[test]
    fn ingredients_from_list_or_legacy_field() {
        let r = recipe(json!({"recipeIngredient": [" 1 cup flour ", "", "2 eggs"]}));
        assert_eq!(r.ingredients().unwrap(), vec!["1 cup flour", "2 eggs"]);

        let r = recipe(json!({"ingredients": "salt\npepper"}));
        assert_eq!(r.ingredients().unwrap(), vec!["salt", "pepper"]);

        let r = recipe(json!({"recipeIngredient": []}));
        assert_eq!(r.ingredients(), Err(FieldError::Missing("ingredients")));
    }

    #[test]
    fn instructions_flatten_steps_and_sections() {
        let r = recipe(json!({
            "recipeInstructions": [
                {"@type": "HowToSection", "name": "Dough", "itemListElement": [
                    {"@type": "HowToStep", "text": "Mix flour and water."},
                    {"@type": "HowToStep", "text": "Knead."}
                ]},
                {"@type": "HowToStep", "text": "Bake at <strong>220&deg;C</strong>."},
                "Cool."
            ]
        }));
        assert_eq!(
            r.instructions_list().unwrap(),
            vec!["Mix flour and water.", "Knead.", "Bake at 220°C.", "Cool."]
        );
    }

    #[test]
    fn instructions_string_splits_on_lines() {
        let r = recipe(json!({"recipeInstructions": "Boil water.\n\nAdd pasta.\r\nDrain."}));
        assert_eq!(
            r.instructions_list().unwrap(),
            vec!["Boil water.", "Add pasta.", "Drain."]
        );
    }

    #[test]
    fn loose_fields_keep_their_shape() {
        let r = recipe(json!({
            "recipeCategory": "Dinner",
            "recipeCuisine": ["Thai", "Fusion"],
            "keywords": "easy, weeknight",
            "cookingMethod": {"@type": "Thing", "name": "Roasting"}
        }));
        assert_eq!(r.category().unwrap(), FieldValue::Text("Dinner".to_string()));
        assert_eq!(
            r.cuisine().unwrap(),
            FieldValue::List(vec!["Thai".to_string(), "Fusion".to_string()])
        );
        assert_eq!(
            r.keywords().unwrap(),
            FieldValue::Text("easy, weeknight".to_string())
        );
        assert_eq!(
            r.cooking_method().unwrap(),
            FieldValue::Text("Roasting".to_string())
        );
    }

    #[test]
    fn boolean_loose_field_is_wrong_shape() {
        let r = recipe(json!({"keywords": true}));
        assert!(matches!(
            r.keywords(),
            Err(FieldError::WrongShape { field: "keywords", .. })
        ));
    }
}
