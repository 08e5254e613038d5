//! College and student records for the one-to-many family.
//!
//! # Invariants
//! - A student's `college_id` matches the college whose roster holds
//!   it whenever both sides are populated.
//! - Roster order on reads is ascending student id.

use crate::model::person::PersonId;
use serde::{Deserialize, Serialize};

/// Store-assigned identifier for colleges.
pub type CollegeId = i64;

/// Store-assigned identifier for students.
pub type StudentId = PersonId;

/// Student record, the non-owning side of the one-to-many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// `None` until persisted.
    pub id: Option<StudentId>,
    pub name: String,
    pub address: String,
    /// Back-reference to the enrolling college, as a plain key.
    pub college_id: Option<CollegeId>,
}

impl Student {
    /// Creates an unpersisted, unenrolled student.
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            address: address.into(),
            college_id: None,
        }
    }
}

/// College record, the owning (collection) side of the one-to-many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct College {
    /// `None` until persisted.
    pub id: Option<CollegeId>,
    pub name: String,
    pub location: String,
    /// Enrolled students, populated on reads in id order.
    pub students: Vec<Student>,
}

impl College {
    /// Creates an unpersisted college with an empty roster.
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            location: location.into(),
            students: Vec::new(),
        }
    }
}
