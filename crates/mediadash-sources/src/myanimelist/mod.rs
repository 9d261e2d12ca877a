pub mod parser;

pub use parser::{enrich_entries, parse_feed, parse_mal_rss};
