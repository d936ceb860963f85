pub mod app;
pub mod config;
pub mod embedded_assets;
pub mod error;
pub mod image_io;
pub mod llm;
pub mod locale;
pub mod logging;
pub mod models;
pub mod prompt;
pub mod recipe_service;
pub mod routes;
pub mod session;
pub mod views;

pub use app::build_app;
