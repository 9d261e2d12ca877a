pub mod details;
pub mod parser;

pub use details::{parse_book_page, BookDetails, BookDetailsCache, GoodreadsClient};
pub use parser::{enrich_books, parse_feed, parse_goodreads_rss};
