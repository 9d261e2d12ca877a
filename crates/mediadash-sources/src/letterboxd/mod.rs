pub mod parser;

pub use parser::{enrich_images, parse_feed, parse_letterboxd_rss};
