//! The simulated account and institution directory.
//!
//! There is no real backend: sessions, universities, and professors are
//! local state persisted as JSON files, seeded with a small demo dataset.
//! Login is a mock that infers the role from the email address; registration
//! maintains the university and professor lists the same way the original
//! product did in browser storage.

use crate::errors::GradingError;
use crate::store::JsonStore;
use serde::{Deserialize, Serialize};

const USER_FILE: &str = "user.json";
const UNIVERSITIES_FILE: &str = "universities.json";
const PROFESSORS_FILE: &str = "professors.json";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Professor,
    Student,
    Grader,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub institution: String,
    /// For graders, links to their professor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professor_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct University {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Professor {
    pub id: String,
    pub name: String,
    pub email: String,
    pub institution: String,
}

#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub institution: String,
    /// For graders: the professor they grade for.
    pub professor_email: Option<String>,
}

pub struct Directory {
    store: JsonStore,
    session: Option<User>,
    universities: Vec<University>,
    professors: Vec<Professor>,
}

impl Directory {
    /// Opens the directory, loading persisted state or seeding the demo
    /// dataset.
    pub fn open(store: JsonStore) -> Result<Self, GradingError> {
        let session = store.load(USER_FILE);
        let universities = match store.load(UNIVERSITIES_FILE) {
            Some(universities) => universities,
            None => {
                let seeded = seed_universities();
                store.save(UNIVERSITIES_FILE, &seeded)?;
                seeded
            }
        };
        let professors = match store.load(PROFESSORS_FILE) {
            Some(professors) => professors,
            None => {
                let seeded = seed_professors();
                store.save(PROFESSORS_FILE, &seeded)?;
                seeded
            }
        };

        Ok(Self {
            store,
            session,
            universities,
            professors,
        })
    }

    pub fn session(&self) -> Option<&User> {
        self.session.as_ref()
    }

    pub fn universities(&self) -> &[University] {
        &self.universities
    }

    pub fn professors(&self) -> &[Professor] {
        &self.professors
    }

    /// Mock login: the password is accepted unchecked, the role is inferred
    /// from the email address, and the display name comes from a matching
    /// professor entry or from the email local part.
    pub fn login(&mut self, email: &str, _password: &str) -> Result<User, GradingError> {
        let existing_professor = self.professors.iter().find(|p| p.email == email);

        let role = if email.contains("student") {
            UserRole::Student
        } else if email.contains("grader") {
            UserRole::Grader
        } else {
            UserRole::Professor
        };

        let name = existing_professor
            .map(|p| p.name.clone())
            .unwrap_or_else(|| display_name_from_email(email));

        let institution = existing_professor
            .map(|p| p.institution.clone())
            .or_else(|| email.split('@').nth(1).map(|domain| domain.to_string()))
            .unwrap_or_else(|| "University".to_string());

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
            name,
            role,
            institution,
            professor_id: None,
        };

        self.store.save(USER_FILE, &user)?;
        self.session = Some(user.clone());
        Ok(user)
    }

    pub fn register(&mut self, request: RegisterRequest) -> Result<User, GradingError> {
        let mut institution_id = request.institution.clone();
        let mut professor_id = None;

        match request.role {
            UserRole::Professor => {
                let existing = self
                    .universities
                    .iter()
                    .find(|u| u.name.to_lowercase() == request.institution.to_lowercase());

                institution_id = match existing {
                    Some(university) => university.id.clone(),
                    None => self.add_university(&request.institution)?,
                };

                let professor = Professor {
                    id: uuid::Uuid::new_v4().to_string(),
                    name: request.name.clone(),
                    email: request.email.clone(),
                    institution: institution_id.clone(),
                };
                self.professors.push(professor);
                self.store.save(PROFESSORS_FILE, &self.professors)?;
            }
            UserRole::Grader => {
                if let Some(professor_email) = &request.professor_email {
                    if let Some(professor) =
                        self.professors.iter().find(|p| &p.email == professor_email)
                    {
                        institution_id = professor.institution.clone();
                        professor_id = Some(professor.id.clone());
                    } else {
                        log::warn!(
                            "No professor found for {}; grader keeps the supplied institution",
                            professor_email
                        );
                    }
                }
            }
            UserRole::Student => {}
        }

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            email: request.email,
            name: request.name,
            role: request.role,
            institution: institution_id,
            professor_id,
        };

        self.store.save(USER_FILE, &user)?;
        self.session = Some(user.clone());
        Ok(user)
    }

    pub fn logout(&mut self) {
        self.session = None;
        self.store.remove(USER_FILE);
    }

    /// Adds a university with a slug id derived from its name.
    pub fn add_university(&mut self, name: &str) -> Result<String, GradingError> {
        let id = slugify(name);
        self.universities.push(University {
            id: id.clone(),
            name: name.trim().to_string(),
        });
        self.store.save(UNIVERSITIES_FILE, &self.universities)?;
        Ok(id)
    }
}

fn slugify(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}

fn display_name_from_email(email: &str) -> String {
    let local = email.split('@').next().unwrap_or(email);
    local
        .chars()
        .map(|c| if c.is_ascii_alphabetic() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn seed_universities() -> Vec<University> {
    [
        ("stanford", "Stanford University"),
        ("mit", "Massachusetts Institute of Technology"),
        ("harvard", "Harvard University"),
        ("berkeley", "UC Berkeley"),
        ("caltech", "California Institute of Technology"),
    ]
    .into_iter()
    .map(|(id, name)| University {
        id: id.to_string(),
        name: name.to_string(),
    })
    .collect()
}

fn seed_professors() -> Vec<Professor> {
    [
        ("prof1", "Dr. Sarah Johnson", "sarah.johnson@stanford.edu", "stanford"),
        ("prof2", "Dr. Michael Chen", "michael.chen@mit.edu", "mit"),
        ("prof3", "Dr. Emily Rodriguez", "emily.rodriguez@harvard.edu", "harvard"),
    ]
    .into_iter()
    .map(|(id, name, email, institution)| Professor {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        institution: institution.to_string(),
    })
    .collect()
}
