//! Person and pan card records for the one-to-one family.
//!
//! # Responsibility
//! - Define the owning (`Person`) and non-owning (`PanCard`) sides of
//!   the person/pan-card association.
//! - Provide the single required-field validation used by write paths.
//!
//! # Invariants
//! - `id` is `None` until the store assigns it on first insert.
//! - `age` must be present for any persisted person.
//! - The card link lives on the person; a card never points back.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned identifier for persons.
pub type PersonId = i64;

/// Store-assigned identifier for pan cards.
pub type PanCardId = i64;

/// Validation failure raised before a person write reaches the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonValidationError {
    /// `age` is required on every persisted person.
    MissingAge,
}

impl Display for PersonValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingAge => write!(f, "person age is required"),
        }
    }
}

impl Error for PersonValidationError {}

/// Identity card record, the non-owning side of the one-to-one.
///
/// The owning person row carries the foreign key, so this record has
/// no back-reference and its `Debug` output is cycle-free.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanCard {
    /// `None` until persisted.
    pub id: Option<PanCardId>,
    /// Card number as issued; not validated beyond presence.
    pub number: String,
}

impl PanCard {
    /// Creates an unpersisted card with the given number.
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            id: None,
            number: number.into(),
        }
    }
}

/// Person record, the owning side of the one-to-one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// `None` until persisted.
    pub id: Option<PersonId>,
    /// Display name.
    pub name: String,
    /// Required at persistence time; kept optional in memory so the
    /// missing-field failure path stays constructible.
    pub age: Option<i64>,
    /// Associated card, populated on reads when a link exists.
    pub pan_card: Option<PanCard>,
}

impl Person {
    /// Creates an unpersisted person with age present.
    pub fn new(name: impl Into<String>, age: i64) -> Self {
        Self {
            id: None,
            name: name.into(),
            age: Some(age),
            pan_card: None,
        }
    }

    /// Checks the required-field constraint enforced on every write.
    ///
    /// # Errors
    /// Returns `PersonValidationError::MissingAge` when `age` is absent.
    pub fn validate(&self) -> Result<(), PersonValidationError> {
        if self.age.is_none() {
            return Err(PersonValidationError::MissingAge);
        }
        Ok(())
    }
}
