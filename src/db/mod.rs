//! Database module: connection provider and the SQL surface the agent's tools run on.
//!
//! Layout:
//! - `connection.rs`: credentials, dialect detection and pool construction
//! - `database.rs`: table discovery, table info and query execution
//! - `render.rs`: text rendering of result rows

pub mod connection;
pub mod database;
pub mod render;

pub use connection::{Credentials, Dialect, connect};
pub use database::SqlDatabase;
