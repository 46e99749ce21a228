pub mod canlii;
pub mod scrape;
