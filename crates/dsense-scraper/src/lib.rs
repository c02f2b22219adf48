pub mod client;
pub mod error;
pub mod extract;
pub mod numeric;
pub mod rate_limit;

pub use client::PageClient;
pub use error::ScraperError;
pub use numeric::{parse_count, parse_price};
