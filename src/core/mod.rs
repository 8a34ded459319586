//! Core business logic - framework-agnostic plant, reminder and health operations.
//!
//! Every function takes the requesting user's id and returns `None`/`false` for
//! rows that are missing or not theirs, never an error.

/// Ownership checks shared by every per-plant operation
pub mod access;
/// Shared cultivar + species catalog
pub mod catalog;
/// Health remarks per plant
pub mod health;
/// Per-user plant registry
pub mod plant;
/// Care reminder scheduling
pub mod reminder;
