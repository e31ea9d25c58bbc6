mod fetcher;
pub mod web;

pub use fetcher::Fetcher;
pub use web::WebFetcher;
