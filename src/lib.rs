pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod oauth;
pub mod repositories;

pub use api::{create_router, AppState};
pub use config::Config;
pub use error::AppError;
