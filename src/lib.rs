pub mod agent;
pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod service;
pub mod types;

pub use error::SearchError;
