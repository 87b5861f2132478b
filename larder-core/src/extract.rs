use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::{json, Map, Value};

use crate::error::ExtractError;
use crate::scraped::{ExtractionMethod, ScrapedRecipe};

/// Regex to find JSON-LD script tags (case-insensitive, quoted or bare type attribute)
static JSONLD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<script[^>]*\btype\s*=\s*["']?application/ld\+json["']?[^>]*>(.*?)</script>"#,
    )
    .expect("Invalid JSON-LD regex")
});

/// Regex to find the canonical link (rel before href)
static CANONICAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<link[^>]*\brel\s*=\s*["']canonical["'][^>]*\bhref\s*=\s*["']([^"']+)["']"#)
        .expect("Invalid canonical regex")
});

/// Alternative canonical regex (href before rel)
static CANONICAL_REGEX_ALT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<link[^>]*\bhref\s*=\s*["']([^"']+)["'][^>]*\brel\s*=\s*["']canonical["']"#)
        .expect("Invalid canonical alt regex")
});

static RECIPE_SCOPE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(
        r#"[itemtype="http://schema.org/Recipe"], [itemtype="https://schema.org/Recipe"]"#,
    )
    .expect("Invalid selector")
});

static SCRIPT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script[type]").expect("Invalid selector"));

static STEP_TEXT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"[itemprop="text"]"#).expect("Invalid selector"));

static LIST_ITEM_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li").expect("Invalid selector"));

/// Find the schema.org Recipe on a page.
///
/// Uses a regex pass over JSON-LD script blocks first, which avoids building
/// a DOM for the common case, then falls back to microdata.
pub fn parse_recipe(html: &str, source_url: &str) -> Result<ScrapedRecipe, ExtractError> {
    let page_url = canonical_url(html, source_url);

    let mut json_error = None;
    for cap in JSONLD_REGEX.captures_iter(html) {
        let Some(m) = cap.get(1) else { continue };
        if let Some(recipe) = recipe_from_jsonld_block(m.as_str(), &mut json_error) {
            tracing::debug!(url = %page_url, "recipe found in JSON-LD");
            return Ok(ScrapedRecipe::new(recipe, page_url, ExtractionMethod::JsonLd));
        }
    }

    let document = Html::parse_document(html);

    // Script blocks the regex can't see, e.g. with a type attribute spelled
    // in a way it doesn't expect.
    for script in document.select(&SCRIPT_SELECTOR) {
        let is_jsonld = script
            .value()
            .attr("type")
            .is_some_and(|t| t.trim().to_ascii_lowercase().starts_with("application/ld+json"));
        if !is_jsonld {
            continue;
        }
        let text: String = script.text().collect();
        if let Some(recipe) = recipe_from_jsonld_block(&text, &mut json_error) {
            tracing::debug!(url = %page_url, "recipe found in JSON-LD after DOM parse");
            return Ok(ScrapedRecipe::new(recipe, page_url, ExtractionMethod::JsonLd));
        }
    }

    if let Some(recipe) = extract_microdata(&document) {
        tracing::debug!(url = %page_url, "recipe found in microdata");
        return Ok(ScrapedRecipe::new(
            recipe,
            page_url,
            ExtractionMethod::Microdata,
        ));
    }

    match json_error {
        Some(e) => Err(ExtractError::InvalidJson(e)),
        None => Err(ExtractError::NoRecipe),
    }
}

/// Parse one JSON-LD block and return its Recipe node, if any.
/// Parse failures are remembered in `json_error` for the final error.
fn recipe_from_jsonld_block(text: &str, json_error: &mut Option<String>) -> Option<Value> {
    let json: Value = match serde_json::from_str(&sanitize_json(text)) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!(error = %e, "skipping unparseable JSON-LD block");
            *json_error = Some(e.to_string());
            return None;
        }
    };
    find_recipe_in_json(&json).cloned()
}

/// The page's canonical URL when it declares an absolute (or resolvable) one,
/// otherwise the URL it was fetched from.
fn canonical_url(html: &str, source_url: &str) -> String {
    let href = CANONICAL_REGEX
        .captures(html)
        .or_else(|| CANONICAL_REGEX_ALT.captures(html))
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim());

    let resolved = href.and_then(|href| match url::Url::parse(href) {
        Ok(u) => Some(u),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            url::Url::parse(source_url).ok()?.join(href).ok()
        }
        Err(_) => None,
    });

    match resolved {
        Some(u) if matches!(u.scheme(), "http" | "https") => u.to_string(),
        _ => source_url.to_string(),
    }
}

/// Escape raw control characters inside JSON strings.
/// Some sites emit literal newlines/tabs in JSON-LD string values.
fn sanitize_json(json: &str) -> String {
    let mut result = String::with_capacity(json.len());
    let mut in_string = false;
    let mut escaped = false;

    for c in json.chars() {
        if !in_string {
            if c == '"' {
                in_string = true;
            }
            result.push(c);
            continue;
        }

        if escaped {
            escaped = false;
            result.push(c);
            continue;
        }

        match c {
            '\\' => {
                escaped = true;
                result.push(c);
            }
            '"' => {
                in_string = false;
                result.push(c);
            }
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c.is_control() => {}
            c => result.push(c),
        }
    }

    result
}

/// Recursively search for a Recipe object in JSON-LD.
/// Handles @graph arrays, `@type` arrays and prefixed types like `schema:Recipe`.
fn find_recipe_in_json(json: &Value) -> Option<&Value> {
    match json {
        Value::Object(obj) => {
            if obj.get("@type").is_some_and(is_recipe_type) {
                return Some(json);
            }

            if let Some(recipe) = obj.get("@graph").and_then(find_recipe_in_json) {
                return Some(recipe);
            }

            obj.iter()
                .filter(|(key, _)| key.as_str() != "@graph")
                .find_map(|(_, value)| find_recipe_in_json(value))
        }
        Value::Array(arr) => arr.iter().find_map(find_recipe_in_json),
        _ => None,
    }
}

fn is_recipe_type(type_val: &Value) -> bool {
    let matches = |s: &str| s.rsplit(['/', ':']).next() == Some("Recipe");
    match type_val {
        Value::String(s) => matches(s),
        Value::Array(arr) => arr.iter().filter_map(Value::as_str).any(matches),
        _ => false,
    }
}

/// Build a JSON-LD shaped object from schema.org microdata so both sources
/// share the same field readers.
fn extract_microdata(document: &Html) -> Option<Value> {
    let scope = document.select(&RECIPE_SCOPE_SELECTOR).next()?;
    let mut node = Map::new();
    node.insert("@type".to_string(), json!("Recipe"));

    for prop in [
        "name",
        "description",
        "recipeYield",
        "prepTime",
        "cookTime",
        "totalTime",
        "keywords",
        "cookingMethod",
    ] {
        if let Some(value) = first_itemprop(&scope, prop) {
            node.insert(prop.to_string(), Value::String(value));
        }
    }

    for prop in ["recipeCategory", "recipeCuisine"] {
        let values = all_itemprops(&scope, prop);
        if !values.is_empty() {
            node.insert(prop.to_string(), json!(values));
        }
    }

    let mut ingredients = all_itemprops(&scope, "recipeIngredient");
    if ingredients.is_empty() {
        ingredients = all_itemprops(&scope, "ingredients");
    }
    if !ingredients.is_empty() {
        node.insert("recipeIngredient".to_string(), json!(ingredients));
    }

    let steps = microdata_instructions(&scope);
    if !steps.is_empty() {
        node.insert("recipeInstructions".to_string(), json!(steps));
    }

    let rating = scoped_props(&scope, "aggregateRating")
        .iter()
        .find_map(|agg| first_itemprop(agg, "ratingValue"))
        .or_else(|| first_itemprop(&scope, "ratingValue"));
    if let Some(rating) = rating {
        node.insert(
            "aggregateRating".to_string(),
            json!({ "@type": "AggregateRating", "ratingValue": rating }),
        );
    }

    Some(Value::Object(node))
}

fn itemprop_selector(prop: &str) -> Option<Selector> {
    Selector::parse(&format!(r#"[itemprop="{}"]"#, prop)).ok()
}

/// Value of an itemprop element: `content`, then `datetime`, then its text.
fn itemprop_value(el: &ElementRef) -> String {
    let attrs = el.value();
    attrs
        .attr("content")
        .or_else(|| attrs.attr("datetime"))
        .map(collapse_whitespace)
        .unwrap_or_else(|| element_text(el))
}

/// Elements carrying `prop` that belong to `scope` itself, not to an item
/// nested inside it (an author, a review, a nutrition block).
fn scoped_props<'a>(scope: &ElementRef<'a>, prop: &str) -> Vec<ElementRef<'a>> {
    let Some(selector) = itemprop_selector(prop) else {
        return Vec::new();
    };
    scope
        .select(&selector)
        .filter(|el| owning_scope_is(el, scope))
        .collect()
}

fn owning_scope_is(el: &ElementRef, scope: &ElementRef) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.id() == scope.id() || a.value().attr("itemscope").is_some())
        .is_some_and(|owner| owner.id() == scope.id())
}

fn first_itemprop(scope: &ElementRef, prop: &str) -> Option<String> {
    scoped_props(scope, prop)
        .iter()
        .map(itemprop_value)
        .find(|s| !s.is_empty())
}

fn all_itemprops(scope: &ElementRef, prop: &str) -> Vec<String> {
    scoped_props(scope, prop)
        .iter()
        .map(itemprop_value)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Instruction steps from microdata: HowToStep `text` props, list items,
/// or the element's own text, in document order.
fn microdata_instructions(scope: &ElementRef) -> Vec<String> {
    let mut steps = all_step_elements(scope, "recipeInstructions");
    if steps.is_empty() {
        steps = all_step_elements(scope, "instructions");
    }
    steps
}

fn all_step_elements(scope: &ElementRef, prop: &str) -> Vec<String> {
    let mut steps = Vec::new();
    for el in scoped_props(scope, prop) {
        let texts: Vec<String> = el.select(&STEP_TEXT_SELECTOR).map(|t| element_text(&t)).collect();
        if !texts.is_empty() {
            steps.extend(texts);
            continue;
        }
        let items: Vec<String> = el.select(&LIST_ITEM_SELECTOR).map(|li| element_text(&li)).collect();
        if !items.is_empty() {
            steps.extend(items);
            continue;
        }
        steps.push(element_text(&el));
    }
    steps.retain(|s| !s.is_empty());
    steps
}

fn element_text(el: &ElementRef) -> String {
    collapse_whitespace(&el.text().collect::<String>())
}

pub(crate) fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
