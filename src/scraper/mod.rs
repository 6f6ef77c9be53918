pub mod fetcher;
pub mod html_extractor;

pub use fetcher::{FetchedDocument, Fetcher, HttpFetcher};
