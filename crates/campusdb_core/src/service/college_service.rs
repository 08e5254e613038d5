//! College/student use-case service.

use crate::model::college::{College, CollegeId, Student, StudentId};
use crate::repo::college_repo::CollegeRepository;
use crate::repo::person_repo::RepoResult;

/// Use-case facade for the college/student family.
pub struct CollegeService<R: CollegeRepository> {
    repo: R,
}

impl<R: CollegeRepository> CollegeService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates and persists one college with an empty roster.
    pub fn create_college(
        &mut self,
        name: impl Into<String>,
        location: impl Into<String>,
    ) -> RepoResult<College> {
        self.repo.create_college(&College::new(name, location))
    }

    /// Creates and persists one unenrolled student.
    pub fn create_student(
        &mut self,
        name: impl Into<String>,
        address: impl Into<String>,
    ) -> RepoResult<Student> {
        self.repo.create_student(&Student::new(name, address))
    }

    /// Enrolls the given students into the given college and persists
    /// the whole graph in one commit.
    pub fn create_college_with_students(
        &mut self,
        college: &College,
        students: &[Student],
    ) -> RepoResult<College> {
        self.repo.create_college_with_students(college, students)
    }

    /// Finds one college by id, roster populated.
    pub fn find_college_by_id(&self, id: CollegeId) -> RepoResult<Option<College>> {
        self.repo.get_college(id)
    }

    /// Finds one student by id.
    pub fn find_student_by_id(&self, id: StudentId) -> RepoResult<Option<Student>> {
        self.repo.get_student(id)
    }

    /// Updates name and location of the college with the given id.
    pub fn update_college_by_id(
        &mut self,
        id: CollegeId,
        name: &str,
        location: &str,
    ) -> RepoResult<Option<College>> {
        self.repo.update_college(id, name, location)
    }

    /// Updates name and address of the student with the given id.
    pub fn update_student_by_id(
        &mut self,
        id: StudentId,
        name: &str,
        address: &str,
    ) -> RepoResult<Option<Student>> {
        self.repo.update_student(id, name, address)
    }

    /// Deletes the college with the given id, cascading to its roster.
    pub fn delete_college_by_id(&mut self, id: CollegeId) -> RepoResult<bool> {
        self.repo.delete_college(id)
    }

    /// Deletes the student with the given id.
    pub fn delete_student_by_id(&mut self, id: StudentId) -> RepoResult<bool> {
        self.repo.delete_student(id)
    }

    /// Returns every college, rosters populated.
    pub fn list_colleges(&self) -> RepoResult<Vec<College>> {
        self.repo.list_colleges()
    }

    /// Returns every student row.
    pub fn list_students(&self) -> RepoResult<Vec<Student>> {
        self.repo.list_students()
    }
}
