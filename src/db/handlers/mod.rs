//! Repository implementations for database access.
//!
//! Each repository wraps a SQLx connection borrowed from a transaction the
//! caller starts, provides strongly-typed CRUD operations, and returns
//! domain models from [`crate::db::models`].

pub mod doctors;
pub mod repository;

pub use doctors::Doctors;
pub use repository::Repository;
