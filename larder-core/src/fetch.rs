//! Entry points that turn a URL (or saved HTML) into a [`SafeRecipe`].

use crate::error::Error;
use crate::extract::parse_recipe;
use crate::http::{HttpClient, ReqwestClient};
use crate::recipe::SafeRecipe;
use crate::scraped::ScrapedRecipe;

/// Fetch a recipe page with the default client and extract the recipe.
///
/// Network and extraction failures are returned as errors; missing fields
/// are not, they surface later as `None` reads on the returned recipe.
pub async fn fetch_recipe(url: &str) -> Result<SafeRecipe<ScrapedRecipe>, Error> {
    let client = ReqwestClient::new()?;
    fetch_recipe_with(&client, url).await
}

/// Same as [`fetch_recipe`], with an injected HTTP client.
pub async fn fetch_recipe_with<C: HttpClient + ?Sized>(
    client: &C,
    url: &str,
) -> Result<SafeRecipe<ScrapedRecipe>, Error> {
    let html = client.fetch_html(url).await?;
    parse_recipe_html(&html, url)
}

/// Extract a recipe from HTML that was obtained some other way.
pub fn parse_recipe_html(html: &str, source_url: &str) -> Result<SafeRecipe<ScrapedRecipe>, Error> {
    let recipe = parse_recipe(html, source_url)?;
    tracing::debug!(url = source_url, method = ?recipe.method(), "extracted recipe");
    Ok(SafeRecipe::new(recipe))
}
