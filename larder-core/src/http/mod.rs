//! HTTP access for recipe pages.
//!
//! Everything that touches the network goes through [`HttpClient`], so the
//! fetch path can be exercised in tests with [`MockClient`].

pub(crate) mod charset;
mod client;

pub use client::{ClientBuilder, HttpClient, MockClient, MockResponse, ReqwestClient};
