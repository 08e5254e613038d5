//! Domain model for the campus registry.
//!
//! # Responsibility
//! - Define the entity records persisted by the repository layer.
//! - Keep relationship links explicit (foreign-key fields, no cycles).
//!
//! # Invariants
//! - Entity identity is assigned by the store on first insert and is
//!   never changed afterwards.
//! - Non-owning sides carry a key field, never the owning record.

pub mod college;
pub mod person;
