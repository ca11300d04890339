pub mod fetch;
pub mod page;
pub mod types;

pub use fetch::{FetchedPage, fetch_page};
pub use page::extract;
pub use types::{ExtractOptions, ExtractedContent, Link, TRUNCATION_MARKER};
