//! Person/pan-card repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs for the one-to-one person/pan-card family.
//! - Keep SQL details and cascade sequencing inside the persistence
//!   boundary.
//!
//! # Invariants
//! - Person writes call `Person::validate()` before any SQL mutation.
//! - Every mutation runs inside one immediate transaction; a lookup
//!   miss opens no transaction at all.
//! - Deleting a person also deletes its linked card in the same
//!   transaction.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::person::{PanCard, PanCardId, Person, PersonId, PersonValidationError};
use rusqlite::{params, Connection, Row, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PERSON_SELECT_SQL: &str = "SELECT
    p.id,
    p.name,
    p.age,
    p.pan_card_id,
    c.number
FROM persons p
LEFT JOIN pan_cards c ON c.id = p.pan_card_id";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by both entity families.
#[derive(Debug)]
pub enum RepoError {
    /// Entity-level constraint failed before the write was attempted.
    Validation(PersonValidationError),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<PersonValidationError> for RepoError {
    fn from(value: PersonValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for the person/pan-card family.
///
/// Not-found is a normal outcome: lookups and updates return `Option`,
/// deletes return `bool`. Store failures propagate unchanged.
pub trait PersonRepository {
    /// Persists one person; an embedded unpersisted card is inserted
    /// in the same transaction (insert cascade).
    fn create_person(&mut self, person: &Person) -> RepoResult<Person>;
    /// Persists one standalone card.
    fn create_pan_card(&mut self, card: &PanCard) -> RepoResult<PanCard>;
    /// Wires both sides of the association and persists owner + card
    /// in one transaction.
    fn create_person_with_pan_card(
        &mut self,
        person: &Person,
        card: &PanCard,
    ) -> RepoResult<Person>;
    /// Looks one person up by id, card populated when linked.
    fn get_person(&self, id: PersonId) -> RepoResult<Option<Person>>;
    /// Looks one card up by id.
    fn get_pan_card(&self, id: PanCardId) -> RepoResult<Option<PanCard>>;
    /// Rewrites name and age of an existing person; `None` when the
    /// id is unknown, in which case nothing is written.
    fn update_person(
        &mut self,
        id: PersonId,
        name: &str,
        age: Option<i64>,
    ) -> RepoResult<Option<Person>>;
    /// Rewrites the number of an existing card.
    fn update_pan_card(&mut self, id: PanCardId, number: &str) -> RepoResult<Option<PanCard>>;
    /// Deletes one person and its linked card; `false` when unknown.
    fn delete_person(&mut self, id: PersonId) -> RepoResult<bool>;
    /// Deletes one card, detaching its owner; `false` when unknown.
    fn delete_pan_card(&mut self, id: PanCardId) -> RepoResult<bool>;
    /// Returns every person row in id order.
    fn list_persons(&self) -> RepoResult<Vec<Person>>;
    /// Returns every card row in id order.
    fn list_pan_cards(&self) -> RepoResult<Vec<PanCard>>;
}

/// SQLite-backed person/pan-card repository.
pub struct SqlitePersonRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqlitePersonRepository<'conn> {
    /// Constructs a repository from a migrated, ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_schema_current(conn)?;
        ensure_person_tables_ready(conn)?;
        Ok(Self { conn })
    }
}

impl PersonRepository for SqlitePersonRepository<'_> {
    fn create_person(&mut self, person: &Person) -> RepoResult<Person> {
        person.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut created = person.clone();
        if let Some(card) = created.pan_card.as_mut() {
            if card.id.is_none() {
                tx.execute(
                    "INSERT INTO pan_cards (number) VALUES (?1);",
                    [card.number.as_str()],
                )?;
                card.id = Some(tx.last_insert_rowid());
            }
        }

        tx.execute(
            "INSERT INTO persons (name, age, pan_card_id) VALUES (?1, ?2, ?3);",
            params![
                created.name.as_str(),
                created.age,
                created.pan_card.as_ref().and_then(|card| card.id),
            ],
        )?;
        created.id = Some(tx.last_insert_rowid());

        tx.commit()?;
        Ok(created)
    }

    fn create_pan_card(&mut self, card: &PanCard) -> RepoResult<PanCard> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute(
            "INSERT INTO pan_cards (number) VALUES (?1);",
            [card.number.as_str()],
        )?;
        let mut created = card.clone();
        created.id = Some(tx.last_insert_rowid());

        tx.commit()?;
        Ok(created)
    }

    fn create_person_with_pan_card(
        &mut self,
        person: &Person,
        card: &PanCard,
    ) -> RepoResult<Person> {
        let mut owner = person.clone();
        owner.pan_card = Some(card.clone());
        self.create_person(&owner)
    }

    fn get_person(&self, id: PersonId) -> RepoResult<Option<Person>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PERSON_SELECT_SQL} WHERE p.id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_person_row(row)?));
        }

        Ok(None)
    }

    fn get_pan_card(&self, id: PanCardId) -> RepoResult<Option<PanCard>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, number FROM pan_cards WHERE id = ?1;")?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_pan_card_row(row)?));
        }

        Ok(None)
    }

    fn update_person(
        &mut self,
        id: PersonId,
        name: &str,
        age: Option<i64>,
    ) -> RepoResult<Option<Person>> {
        let Some(mut person) = self.get_person(id)? else {
            return Ok(None);
        };

        person.name = name.to_string();
        person.age = age;
        person.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "UPDATE persons SET name = ?1, age = ?2 WHERE id = ?3;",
            params![person.name.as_str(), person.age, id],
        )?;
        tx.commit()?;

        Ok(Some(person))
    }

    fn update_pan_card(&mut self, id: PanCardId, number: &str) -> RepoResult<Option<PanCard>> {
        let Some(mut card) = self.get_pan_card(id)? else {
            return Ok(None);
        };

        card.number = number.to_string();

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "UPDATE pan_cards SET number = ?1 WHERE id = ?2;",
            params![card.number.as_str(), id],
        )?;
        tx.commit()?;

        Ok(Some(card))
    }

    fn delete_person(&mut self, id: PersonId) -> RepoResult<bool> {
        let Some(person) = self.get_person(id)? else {
            return Ok(false);
        };

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM persons WHERE id = ?1;", [id])?;
        // Delete cascade runs here: the owner holds the key, so the
        // foreign key cannot do it for us.
        if let Some(card_id) = person.pan_card.as_ref().and_then(|card| card.id) {
            tx.execute("DELETE FROM pan_cards WHERE id = ?1;", [card_id])?;
        }
        tx.commit()?;

        Ok(true)
    }

    fn delete_pan_card(&mut self, id: PanCardId) -> RepoResult<bool> {
        if self.get_pan_card(id)?.is_none() {
            return Ok(false);
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        // ON DELETE SET NULL detaches the owning person, if any.
        tx.execute("DELETE FROM pan_cards WHERE id = ?1;", [id])?;
        tx.commit()?;

        Ok(true)
    }

    fn list_persons(&self) -> RepoResult<Vec<Person>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PERSON_SELECT_SQL} ORDER BY p.id ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut persons = Vec::new();
        while let Some(row) = rows.next()? {
            persons.push(parse_person_row(row)?);
        }

        Ok(persons)
    }

    fn list_pan_cards(&self) -> RepoResult<Vec<PanCard>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, number FROM pan_cards ORDER BY id ASC;")?;

        let mut rows = stmt.query([])?;
        let mut cards = Vec::new();
        while let Some(row) = rows.next()? {
            cards.push(parse_pan_card_row(row)?);
        }

        Ok(cards)
    }
}

fn parse_person_row(row: &Row<'_>) -> RepoResult<Person> {
    let pan_card = match row.get::<_, Option<PanCardId>>("pan_card_id")? {
        Some(card_id) => {
            let number: Option<String> = row.get("number")?;
            let number = number.ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "person references missing pan card {card_id}"
                ))
            })?;
            Some(PanCard {
                id: Some(card_id),
                number,
            })
        }
        None => None,
    };

    Ok(Person {
        id: Some(row.get("id")?),
        name: row.get("name")?,
        age: Some(row.get("age")?),
        pan_card,
    })
}

fn parse_pan_card_row(row: &Row<'_>) -> RepoResult<PanCard> {
    Ok(PanCard {
        id: Some(row.get("id")?),
        number: row.get("number")?,
    })
}

/// Rejects connections whose schema version does not match this binary.
pub(crate) fn ensure_schema_current(conn: &Connection) -> RepoResult<()> {
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}

fn ensure_person_tables_ready(conn: &Connection) -> RepoResult<()> {
    for table in ["persons", "pan_cards"] {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    for column in ["id", "name", "age", "pan_card_id"] {
        if !table_has_column(conn, "persons", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "persons",
                column,
            });
        }
    }

    for column in ["id", "number"] {
        if !table_has_column(conn, "pan_cards", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "pan_cards",
                column,
            });
        }
    }

    Ok(())
}

pub(crate) fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

pub(crate) fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
