//! Common type definitions.
//!
//! Doctor identifiers are plain `i64` rowids assigned by SQLite. The alias
//! exists so call sites say what the integer means.

/// Doctor record identifier. System-assigned, immutable, never reused.
pub type DoctorId = i64;
