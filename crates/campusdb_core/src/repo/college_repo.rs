//! College/student repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs for the one-to-many college/student family.
//! - Keep roster loading and insert-cascade sequencing inside the
//!   persistence boundary.
//!
//! # Invariants
//! - Roster order is deterministic: `id ASC`.
//! - College delete removes the roster through the schema-level
//!   `ON DELETE CASCADE` foreign key.
//! - Every mutation runs inside one immediate transaction.

use crate::model::college::{College, CollegeId, Student, StudentId};
use crate::repo::person_repo::{
    ensure_schema_current, table_exists, table_has_column, RepoError, RepoResult,
};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const STUDENT_SELECT_SQL: &str = "SELECT id, name, address, college_id FROM students";

/// Repository interface for the college/student family.
///
/// Same contract shape as the person family: lookups and updates
/// return `Option`, deletes return `bool`.
pub trait CollegeRepository {
    /// Persists one college; unpersisted roster entries are inserted
    /// in the same transaction with their back-reference set.
    fn create_college(&mut self, college: &College) -> RepoResult<College>;
    /// Persists one student, enrolled or not.
    fn create_student(&mut self, student: &Student) -> RepoResult<Student>;
    /// Wires the roster on both sides and persists college + students
    /// in one transaction.
    fn create_college_with_students(
        &mut self,
        college: &College,
        students: &[Student],
    ) -> RepoResult<College>;
    /// Looks one college up by id, roster populated.
    fn get_college(&self, id: CollegeId) -> RepoResult<Option<College>>;
    /// Looks one student up by id.
    fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>>;
    /// Rewrites name and location of an existing college.
    fn update_college(
        &mut self,
        id: CollegeId,
        name: &str,
        location: &str,
    ) -> RepoResult<Option<College>>;
    /// Rewrites name and address of an existing student; enrollment is
    /// left untouched.
    fn update_student(
        &mut self,
        id: StudentId,
        name: &str,
        address: &str,
    ) -> RepoResult<Option<Student>>;
    /// Deletes one college and, via cascade, its roster.
    fn delete_college(&mut self, id: CollegeId) -> RepoResult<bool>;
    /// Deletes one student.
    fn delete_student(&mut self, id: StudentId) -> RepoResult<bool>;
    /// Returns every college in id order, rosters populated.
    fn list_colleges(&self) -> RepoResult<Vec<College>>;
    /// Returns every student in id order.
    fn list_students(&self) -> RepoResult<Vec<Student>>;
}

/// SQLite-backed college/student repository.
pub struct SqliteCollegeRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteCollegeRepository<'conn> {
    /// Constructs a repository from a migrated, ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_schema_current(conn)?;
        ensure_college_tables_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CollegeRepository for SqliteCollegeRepository<'_> {
    fn create_college(&mut self, college: &College) -> RepoResult<College> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let created = insert_college_in_tx(&tx, college)?;

        tx.commit()?;
        Ok(created)
    }

    fn create_student(&mut self, student: &Student) -> RepoResult<Student> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let created = insert_student_in_tx(&tx, student)?;

        tx.commit()?;
        Ok(created)
    }

    fn create_college_with_students(
        &mut self,
        college: &College,
        students: &[Student],
    ) -> RepoResult<College> {
        let mut owner = college.clone();
        owner.students = students.to_vec();
        self.create_college(&owner)
    }

    fn get_college(&self, id: CollegeId) -> RepoResult<Option<College>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, location FROM colleges WHERE id = ?1;")?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            let mut college = parse_college_row(row)?;
            college.students = load_roster(self.conn, id)?;
            return Ok(Some(college));
        }

        Ok(None)
    }

    fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STUDENT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_student_row(row)?));
        }

        Ok(None)
    }

    fn update_college(
        &mut self,
        id: CollegeId,
        name: &str,
        location: &str,
    ) -> RepoResult<Option<College>> {
        let Some(mut college) = self.get_college(id)? else {
            return Ok(None);
        };

        college.name = name.to_string();
        college.location = location.to_string();

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "UPDATE colleges SET name = ?1, location = ?2 WHERE id = ?3;",
            params![college.name.as_str(), college.location.as_str(), id],
        )?;
        tx.commit()?;

        Ok(Some(college))
    }

    fn update_student(
        &mut self,
        id: StudentId,
        name: &str,
        address: &str,
    ) -> RepoResult<Option<Student>> {
        let Some(mut student) = self.get_student(id)? else {
            return Ok(None);
        };

        student.name = name.to_string();
        student.address = address.to_string();

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "UPDATE students SET name = ?1, address = ?2 WHERE id = ?3;",
            params![student.name.as_str(), student.address.as_str(), id],
        )?;
        tx.commit()?;

        Ok(Some(student))
    }

    fn delete_college(&mut self, id: CollegeId) -> RepoResult<bool> {
        if self.get_college(id)?.is_none() {
            return Ok(false);
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        // ON DELETE CASCADE removes the roster rows.
        tx.execute("DELETE FROM colleges WHERE id = ?1;", [id])?;
        tx.commit()?;

        Ok(true)
    }

    fn delete_student(&mut self, id: StudentId) -> RepoResult<bool> {
        if self.get_student(id)?.is_none() {
            return Ok(false);
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM students WHERE id = ?1;", [id])?;
        tx.commit()?;

        Ok(true)
    }

    fn list_colleges(&self) -> RepoResult<Vec<College>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, location FROM colleges ORDER BY id ASC;")?;

        let mut rows = stmt.query([])?;
        let mut colleges = Vec::new();
        while let Some(row) = rows.next()? {
            colleges.push(parse_college_row(row)?);
        }

        for college in &mut colleges {
            if let Some(id) = college.id {
                college.students = load_roster(self.conn, id)?;
            }
        }

        Ok(colleges)
    }

    fn list_students(&self) -> RepoResult<Vec<Student>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STUDENT_SELECT_SQL} ORDER BY id ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut students = Vec::new();
        while let Some(row) = rows.next()? {
            students.push(parse_student_row(row)?);
        }

        Ok(students)
    }
}

fn insert_college_in_tx(tx: &Transaction<'_>, college: &College) -> RepoResult<College> {
    tx.execute(
        "INSERT INTO colleges (name, location) VALUES (?1, ?2);",
        params![college.name.as_str(), college.location.as_str()],
    )?;
    let college_id = tx.last_insert_rowid();

    let mut created = college.clone();
    created.id = Some(college_id);
    // Insert cascade: fresh roster entries are persisted with their
    // back-reference pointing at the new college row.
    for student in &mut created.students {
        student.college_id = Some(college_id);
        match student.id {
            None => {
                let inserted = insert_student_in_tx(tx, student)?;
                student.id = inserted.id;
            }
            // An already-persisted entry is re-enrolled instead.
            Some(student_id) => {
                tx.execute(
                    "UPDATE students SET college_id = ?1 WHERE id = ?2;",
                    params![college_id, student_id],
                )?;
            }
        }
    }

    Ok(created)
}

fn insert_student_in_tx(tx: &Transaction<'_>, student: &Student) -> RepoResult<Student> {
    tx.execute(
        "INSERT INTO students (name, address, college_id) VALUES (?1, ?2, ?3);",
        params![
            student.name.as_str(),
            student.address.as_str(),
            student.college_id,
        ],
    )?;

    let mut created = student.clone();
    created.id = Some(tx.last_insert_rowid());
    Ok(created)
}

fn load_roster(conn: &Connection, college_id: CollegeId) -> RepoResult<Vec<Student>> {
    let mut stmt = conn.prepare(&format!(
        "{STUDENT_SELECT_SQL} WHERE college_id = ?1 ORDER BY id ASC;"
    ))?;

    let mut rows = stmt.query([college_id])?;
    let mut students = Vec::new();
    while let Some(row) = rows.next()? {
        students.push(parse_student_row(row)?);
    }

    Ok(students)
}

fn parse_college_row(row: &Row<'_>) -> RepoResult<College> {
    Ok(College {
        id: Some(row.get("id")?),
        name: row.get("name")?,
        location: row.get("location")?,
        students: Vec::new(),
    })
}

fn parse_student_row(row: &Row<'_>) -> RepoResult<Student> {
    Ok(Student {
        id: Some(row.get("id")?),
        name: row.get("name")?,
        address: row.get("address")?,
        college_id: row.get("college_id")?,
    })
}

fn ensure_college_tables_ready(conn: &Connection) -> RepoResult<()> {
    for table in ["colleges", "students"] {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    for column in ["id", "name", "location"] {
        if !table_has_column(conn, "colleges", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "colleges",
                column,
            });
        }
    }

    for column in ["id", "name", "address", "college_id"] {
        if !table_has_column(conn, "students", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "students",
                column,
            });
        }
    }

    Ok(())
}
