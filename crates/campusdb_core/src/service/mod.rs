//! Use-case services over the repository layer.
//!
//! # Responsibility
//! - Orchestrate repository calls into field-level entry points.
//! - Keep callers decoupled from storage details.

pub mod college_service;
pub mod person_service;
