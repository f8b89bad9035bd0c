//! Stylesheet acquisition: fetchers and the `@import` resolver.

pub mod fetch;
pub mod resolver;

pub use fetch::{FetchError, FetchResult, Fetcher, FileFetcher, HttpFetcher, SchemeFetcher};
pub use resolver::StylesheetResolver;
