//! Demonstration entry point for the campus registry.
//!
//! # Responsibility
//! - Open a session, run the fixed operation sequence for both entity
//!   families, print each outcome, and end the session.
//!
//! # Invariants
//! - A session start failure is fatal to the process.
//! - Output order is deterministic for quick local sanity checks.

use campusdb_core::db::{open_db, open_db_in_memory};
use campusdb_core::{
    College, CollegeService, PanCard, Person, PersonService, SqliteCollegeRepository,
    SqlitePersonRepository, Student,
};
use rusqlite::Connection;
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut conn = match open_session() {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("campusdb: cannot open database: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = run_identity_demo(&mut conn).and_then(|()| run_enrollment_demo(&mut conn)) {
        eprintln!("campusdb: demo failed: {err}");
        return ExitCode::FAILURE;
    }

    // Dropping the connection ends the session.
    ExitCode::SUCCESS
}

fn open_session() -> Result<Connection, Box<dyn Error>> {
    match std::env::args().nth(1) {
        Some(path) => Ok(open_db(path)?),
        None => Ok(open_db_in_memory()?),
    }
}

fn run_identity_demo(conn: &mut Connection) -> Result<(), Box<dyn Error>> {
    let mut persons = PersonService::new(SqlitePersonRepository::try_new(conn)?);

    let created = persons.create_person("appaji", 25)?;
    println!("create person: {created:?}");
    let person_id = created.id.ok_or("created person has no id")?;

    let card = persons.create_pan_card("abc")?;
    println!("create pan card: {card:?}");
    let card_id = card.id.ok_or("created pan card has no id")?;

    let paired =
        persons.create_person_with_pan_card(&Person::new("sharan", 24), &PanCard::new("xyz"))?;
    println!("create person and pan card together: {paired:?}");

    println!("find person by id: {:?}", persons.find_person_by_id(person_id)?);
    println!("find pan card by id: {:?}", persons.find_pan_card_by_id(card_id)?);

    println!(
        "update person by id: {:?}",
        persons.update_person_by_id(person_id, "appu", 40)?
    );
    println!(
        "update pan card by id: {:?}",
        persons.update_pan_card_by_id(card_id, "cba")?
    );

    println!("delete person by id: {}", persons.delete_person_by_id(person_id)?);
    println!("delete pan card by id: {}", persons.delete_pan_card_by_id(card_id)?);

    println!("all persons: {:?}", persons.list_persons()?);
    Ok(())
}

fn run_enrollment_demo(conn: &mut Connection) -> Result<(), Box<dyn Error>> {
    let mut colleges = CollegeService::new(SqliteCollegeRepository::try_new(conn)?);

    let roster = [Student::new("anu", "hyderabad"), Student::new("ravi", "guntur")];
    let college =
        colleges.create_college_with_students(&College::new("nit", "warangal"), &roster)?;
    println!("create college and students together: {college:?}");
    let college_id = college.id.ok_or("created college has no id")?;

    println!(
        "find college by id: {:?}",
        colleges.find_college_by_id(college_id)?
    );

    println!("delete college by id: {}", colleges.delete_college_by_id(college_id)?);
    println!("all students: {:?}", colleges.list_students()?);
    Ok(())
}
