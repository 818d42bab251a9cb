pub mod config;
pub mod logging;

pub mod downloader;
pub mod extract;
pub mod fetch;
pub mod repo_ref;
pub mod resolver;
pub mod spinner;
pub mod url_model;
