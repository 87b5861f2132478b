pub mod duration;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod http;
pub mod markdown;
pub mod output;
pub mod recipe;
pub mod scraped;
pub mod tags;

pub use error::{Error, ExtractError, FetchError, FieldError, WriteError};
pub use extract::parse_recipe;
pub use fetch::{fetch_recipe, fetch_recipe_with, parse_recipe_html};
pub use http::{ClientBuilder, HttpClient, MockClient, MockResponse, ReqwestClient};
pub use markdown::{render_markdown, UNTITLED};
pub use output::{note_file_name, write_recipe};
pub use recipe::{FieldValue, RecipeSource, SafeRecipe};
pub use scraped::{ExtractionMethod, ScrapedRecipe};
pub use tags::{collect_tags, normalize_tag};
