//! # huddle-database
//!
//! Store traits for all Huddle entities, PostgreSQL connection
//! management, concrete sqlx repositories, and in-memory store
//! implementations used by unit tests and single-node demos.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod stores;

pub use connection::DatabasePool;
