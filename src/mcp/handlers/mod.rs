pub mod case_law;
pub mod common;
pub mod legislation;
pub mod scrape_website;
