use campusdb_core::db::open_db_in_memory;
use campusdb_core::{
    College, CollegeRepository, CollegeService, RepoError, SqliteCollegeRepository, Student,
};

#[test]
fn associated_create_persists_college_and_roster_together() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteCollegeRepository::try_new(&mut conn).unwrap();

    let roster = [
        Student::new("anu", "hyderabad"),
        Student::new("ravi", "guntur"),
    ];
    let college = repo
        .create_college_with_students(&College::new("nit", "warangal"), &roster)
        .unwrap();
    let college_id = college.id.unwrap();

    assert_eq!(college.students.len(), 2);
    for student in &college.students {
        assert!(student.id.is_some());
        assert_eq!(student.college_id, Some(college_id));
    }

    let loaded = repo.get_college(college_id).unwrap().unwrap();
    assert_eq!(loaded, college);
}

#[test]
fn roster_reads_back_in_id_order() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteCollegeRepository::try_new(&mut conn).unwrap();

    let roster = [
        Student::new("c", "third"),
        Student::new("a", "first"),
        Student::new("b", "second"),
    ];
    let college = repo
        .create_college_with_students(&College::new("iit", "madras"), &roster)
        .unwrap();

    let loaded = repo.get_college(college.id.unwrap()).unwrap().unwrap();
    let ids: Vec<_> = loaded.students.iter().map(|student| student.id).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
    assert_eq!(loaded.students.len(), 3);
}

#[test]
fn deleting_college_cascades_to_roster() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteCollegeRepository::try_new(&mut conn).unwrap();

    let roster = [Student::new("anu", "hyderabad")];
    let college = repo
        .create_college_with_students(&College::new("nit", "warangal"), &roster)
        .unwrap();
    let college_id = college.id.unwrap();
    let student_id = college.students[0].id.unwrap();

    assert!(repo.delete_college(college_id).unwrap());
    assert!(!repo.delete_college(college_id).unwrap());

    assert!(repo.get_college(college_id).unwrap().is_none());
    assert!(repo.get_student(student_id).unwrap().is_none());
    assert!(repo.list_students().unwrap().is_empty());
}

#[test]
fn standalone_student_can_be_created_updated_and_deleted() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteCollegeRepository::try_new(&mut conn).unwrap();

    let student = repo.create_student(&Student::new("ravi", "guntur")).unwrap();
    let id = student.id.unwrap();
    assert!(student.college_id.is_none());

    let updated = repo.update_student(id, "ravi", "vijayawada").unwrap().unwrap();
    assert_eq!(updated.address, "vijayawada");
    assert!(updated.college_id.is_none());

    assert!(repo.delete_student(id).unwrap());
    assert!(!repo.delete_student(id).unwrap());
    assert!(repo.get_student(id).unwrap().is_none());
}

#[test]
fn enrolling_existing_student_updates_its_back_reference() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteCollegeRepository::try_new(&mut conn).unwrap();

    let loose = repo.create_student(&Student::new("ravi", "guntur")).unwrap();

    let college = repo
        .create_college_with_students(&College::new("nit", "warangal"), &[loose.clone()])
        .unwrap();
    let college_id = college.id.unwrap();

    let enrolled = repo.get_student(loose.id.unwrap()).unwrap().unwrap();
    assert_eq!(enrolled.college_id, Some(college_id));

    let loaded = repo.get_college(college_id).unwrap().unwrap();
    assert_eq!(loaded.students.len(), 1);
    assert_eq!(loaded.students[0].id, loose.id);
}

#[test]
fn creating_student_with_unknown_college_surfaces_store_error() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteCollegeRepository::try_new(&mut conn).unwrap();

    let mut student = Student::new("ghost", "nowhere");
    student.college_id = Some(4242);

    let err = repo.create_student(&student).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
    assert!(repo.list_students().unwrap().is_empty());
}

#[test]
fn update_unknown_college_returns_none() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteCollegeRepository::try_new(&mut conn).unwrap();

    assert!(repo.update_college(4242, "x", "y").unwrap().is_none());
    assert!(repo.list_colleges().unwrap().is_empty());
}

#[test]
fn service_wraps_college_crud() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = CollegeService::new(SqliteCollegeRepository::try_new(&mut conn).unwrap());

    let college = service.create_college("nit", "warangal").unwrap();
    let college_id = college.id.unwrap();

    let updated = service
        .update_college_by_id(college_id, "nitw", "warangal")
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "nitw");

    let all = service.list_colleges().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "nitw");

    assert!(service.delete_college_by_id(college_id).unwrap());
    assert!(service.find_college_by_id(college_id).unwrap().is_none());
}

#[test]
fn list_colleges_populates_each_roster() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteCollegeRepository::try_new(&mut conn).unwrap();

    repo.create_college_with_students(
        &College::new("nit", "warangal"),
        &[Student::new("anu", "hyderabad")],
    )
    .unwrap();
    repo.create_college(&College::new("iit", "madras")).unwrap();

    let all = repo.list_colleges().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].students.len(), 1);
    assert!(all[1].students.is_empty());
}
