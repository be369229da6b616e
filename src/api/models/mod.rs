//! Wire-format types for the HTTP API.

pub mod doctors;
