//! Field access for scraped recipes.
//!
//! Recipe pages publish wildly different subsets of schema.org fields, so
//! every read on a [`RecipeSource`] is fallible. [`SafeRecipe`] is the facade
//! the renderer works against: it turns each failed read into `None`.

use crate::error::FieldError;

/// A loosely-typed field: sites publish these as either one string or a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Flatten into individual elements. A single text value is one element.
    pub fn into_items(self) -> Vec<String> {
        match self {
            FieldValue::Text(s) => vec![s],
            FieldValue::List(items) => items,
        }
    }
}

/// Fallible reads over one scraped recipe.
///
/// Times are whole minutes. The four tag-like fields are optional in the
/// upstream data model and default to [`FieldError::Missing`].
pub trait RecipeSource {
    fn title(&self) -> Result<String, FieldError>;
    fn url(&self) -> Result<String, FieldError>;
    fn description(&self) -> Result<String, FieldError>;
    fn prep_time(&self) -> Result<u32, FieldError>;
    fn total_time(&self) -> Result<u32, FieldError>;
    fn yields(&self) -> Result<String, FieldError>;
    fn ratings(&self) -> Result<f64, FieldError>;
    fn ingredients(&self) -> Result<Vec<String>, FieldError>;
    fn instructions_list(&self) -> Result<Vec<String>, FieldError>;

    fn cooking_method(&self) -> Result<FieldValue, FieldError> {
        Err(FieldError::Missing("cooking_method"))
    }

    fn category(&self) -> Result<FieldValue, FieldError> {
        Err(FieldError::Missing("category"))
    }

    fn cuisine(&self) -> Result<FieldValue, FieldError> {
        Err(FieldError::Missing("cuisine"))
    }

    fn keywords(&self) -> Result<FieldValue, FieldError> {
        Err(FieldError::Missing("keywords"))
    }
}

/// Wraps a [`RecipeSource`] so that every read yields `Option` instead of an error.
///
/// Failed reads are logged at debug level and otherwise forgotten; the wrapper
/// keeps no state besides the source itself.
#[derive(Debug, Clone)]
pub struct SafeRecipe<S> {
    inner: S,
}

impl<S: RecipeSource> SafeRecipe<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn title(&self) -> Option<String> {
        absorb("title", self.inner.title())
    }

    pub fn url(&self) -> Option<String> {
        absorb("url", self.inner.url())
    }

    pub fn description(&self) -> Option<String> {
        absorb("description", self.inner.description())
    }

    pub fn prep_time(&self) -> Option<u32> {
        absorb("prep_time", self.inner.prep_time())
    }

    pub fn total_time(&self) -> Option<u32> {
        absorb("total_time", self.inner.total_time())
    }

    pub fn yields(&self) -> Option<String> {
        absorb("yields", self.inner.yields())
    }

    pub fn ratings(&self) -> Option<f64> {
        absorb("ratings", self.inner.ratings())
    }

    pub fn ingredients(&self) -> Option<Vec<String>> {
        absorb("ingredients", self.inner.ingredients())
    }

    pub fn instructions_list(&self) -> Option<Vec<String>> {
        absorb("instructions_list", self.inner.instructions_list())
    }

    pub fn cooking_method(&self) -> Option<FieldValue> {
        absorb("cooking_method", self.inner.cooking_method())
    }

    pub fn category(&self) -> Option<FieldValue> {
        absorb("category", self.inner.category())
    }

    pub fn cuisine(&self) -> Option<FieldValue> {
        absorb("cuisine", self.inner.cuisine())
    }

    pub fn keywords(&self) -> Option<FieldValue> {
        absorb("keywords", self.inner.keywords())
    }
}

fn absorb<T>(field: &'static str, result: Result<T, FieldError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(field, error = %e, "recipe field unavailable");
            None
        }
    }
}
