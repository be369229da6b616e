//! Database layer for data persistence and access.
//!
//! This module implements the data access layer using SQLx with SQLite.
//! It follows the Repository pattern to provide clean abstractions over
//! database operations: handlers open a transaction, construct a repository
//! from it, perform operations, and commit.
//!
//! # Modules
//!
//! - [`handlers`]: Repository implementations for CRUD and search queries
//! - [`models`]: Database record structures matching the table schema
//! - [`errors`]: Database-specific error types
//!
//! # Migrations
//!
//! Database migrations are managed by SQLx and located in the `migrations/`
//! directory; [`crate::migrator`] provides the embedded migrator.

pub mod errors;
pub mod handlers;
pub mod models;
