//! Person/pan-card use-case service.
//!
//! # Responsibility
//! - Provide the field-level CRUD entry points the demo harness calls.
//! - Delegate persistence to the repository contract unchanged.
//!
//! # Invariants
//! - No local recovery or retries; repository errors pass through.

use crate::model::person::{PanCard, PanCardId, Person, PersonId};
use crate::repo::person_repo::{PersonRepository, RepoResult};

/// Use-case facade for the person/pan-card family.
pub struct PersonService<R: PersonRepository> {
    repo: R,
}

impl<R: PersonRepository> PersonService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates and persists one person from its fields.
    pub fn create_person(&mut self, name: impl Into<String>, age: i64) -> RepoResult<Person> {
        self.repo.create_person(&Person::new(name, age))
    }

    /// Creates and persists one standalone pan card.
    pub fn create_pan_card(&mut self, number: impl Into<String>) -> RepoResult<PanCard> {
        self.repo.create_pan_card(&PanCard::new(number))
    }

    /// Associates the given card with the given person and persists
    /// both in one commit.
    pub fn create_person_with_pan_card(
        &mut self,
        person: &Person,
        card: &PanCard,
    ) -> RepoResult<Person> {
        self.repo.create_person_with_pan_card(person, card)
    }

    /// Finds one person by id; `None` when no row matches.
    pub fn find_person_by_id(&self, id: PersonId) -> RepoResult<Option<Person>> {
        self.repo.get_person(id)
    }

    /// Finds one pan card by id.
    pub fn find_pan_card_by_id(&self, id: PanCardId) -> RepoResult<Option<PanCard>> {
        self.repo.get_pan_card(id)
    }

    /// Updates name and age of the person with the given id.
    ///
    /// Returns `None` without writing when the id is unknown.
    pub fn update_person_by_id(
        &mut self,
        id: PersonId,
        name: &str,
        age: i64,
    ) -> RepoResult<Option<Person>> {
        self.repo.update_person(id, name, Some(age))
    }

    /// Updates the number of the pan card with the given id.
    pub fn update_pan_card_by_id(
        &mut self,
        id: PanCardId,
        number: &str,
    ) -> RepoResult<Option<PanCard>> {
        self.repo.update_pan_card(id, number)
    }

    /// Deletes the person with the given id, cascading to its card.
    pub fn delete_person_by_id(&mut self, id: PersonId) -> RepoResult<bool> {
        self.repo.delete_person(id)
    }

    /// Deletes the pan card with the given id, detaching its owner.
    pub fn delete_pan_card_by_id(&mut self, id: PanCardId) -> RepoResult<bool> {
        self.repo.delete_pan_card(id)
    }

    /// Returns every person row.
    pub fn list_persons(&self) -> RepoResult<Vec<Person>> {
        self.repo.list_persons()
    }

    /// Returns every pan card row.
    pub fn list_pan_cards(&self) -> RepoResult<Vec<PanCard>> {
        self.repo.list_pan_cards()
    }
}
