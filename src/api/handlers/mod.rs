//! Route handlers, grouped by resource.

pub mod doctors;
pub mod health;
