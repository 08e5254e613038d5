//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define facade-level data access contracts per entity family.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Person writes enforce `Person::validate()` before persistence.
//! - Not-found is reported as `Option`/`bool`, never as an error.
//! - Each mutation is one transaction: committed, or never attempted.

pub mod college_repo;
pub mod person_repo;
