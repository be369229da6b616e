//! Database record models matching the table schema.
//!
//! Database models are distinct from API models so the storage and API
//! representations can evolve independently; repositories return these and
//! the API layer converts them with `From` impls.

pub mod doctors;
