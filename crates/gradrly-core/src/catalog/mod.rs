//! Course, assignment, and grading-history catalog.
//!
//! Plain records with JSON-file persistence, standing in for the database a
//! real deployment would have. Relationships are maintained by id references
//! and ad hoc filtering only.

use crate::errors::GradingError;
use crate::grading::{Criterion, GradingResult, Provenance};
use crate::store::JsonStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const COURSES_FILE: &str = "courses.json";
const ASSIGNMENTS_FILE: &str = "assignments.json";
const HISTORY_FILE: &str = "history.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Course {
    pub id: String,
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub max_points: u32,
    #[serde(default)]
    pub criteria: Vec<Criterion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One grading outcome, appended to the history after every grade run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment_id: Option<String>,
    pub assignment_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student: Option<String>,
    pub result: GradingResult,
    pub provenance: Provenance,
    pub graded_at: DateTime<Utc>,
}

pub struct Catalog {
    store: JsonStore,
    courses: Vec<Course>,
    assignments: Vec<Assignment>,
    history: Vec<GradeRecord>,
}

impl Catalog {
    pub fn open(store: JsonStore) -> Self {
        let courses = store.load(COURSES_FILE).unwrap_or_default();
        let assignments = store.load(ASSIGNMENTS_FILE).unwrap_or_default();
        let history = store.load(HISTORY_FILE).unwrap_or_default();

        Self {
            store,
            courses,
            assignments,
            history,
        }
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn history(&self) -> &[GradeRecord] {
        &self.history
    }

    pub fn add_course(&mut self, name: &str, code: &str) -> Result<Course, GradingError> {
        let course = Course {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            code: code.to_string(),
        };
        self.courses.push(course.clone());
        self.store.save(COURSES_FILE, &self.courses)?;
        Ok(course)
    }

    pub fn add_assignment(
        &mut self,
        course_id: Option<String>,
        title: &str,
        description: &str,
        max_points: u32,
        criteria: Vec<Criterion>,
        due_date: Option<String>,
    ) -> Result<Assignment, GradingError> {
        let assignment = Assignment {
            id: uuid::Uuid::new_v4().to_string(),
            course_id,
            title: title.to_string(),
            description: description.to_string(),
            max_points,
            criteria,
            due_date,
            created_at: Utc::now(),
        };
        self.assignments.push(assignment.clone());
        self.store.save(ASSIGNMENTS_FILE, &self.assignments)?;
        Ok(assignment)
    }

    pub fn find_assignment(&self, id_or_title: &str) -> Option<&Assignment> {
        self.assignments
            .iter()
            .find(|a| a.id == id_or_title || a.title == id_or_title)
    }

    pub fn record_grade(&mut self, record: GradeRecord) -> Result<(), GradingError> {
        self.history.push(record);
        self.store.save(HISTORY_FILE, &self.history)
    }
}
