pub mod app;
pub mod badges;
pub mod browser;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod json;
pub mod logging;
pub mod scraper;
pub mod utils;
