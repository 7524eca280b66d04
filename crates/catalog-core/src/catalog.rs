//! In-memory course catalog: the loaded schedule plus derived indexes

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, warn};

use crate::{AliasRegistry, Course, Error, Result};

/// The loaded class schedule with its unique instructors and departments
#[derive(Debug, Clone, Default)]
pub struct CourseCatalog {
    courses: Vec<Course>,
    instructors: Vec<String>,
    departments: Vec<String>,
    header: String,
}

impl CourseCatalog {
    /// Load a delimited schedule export whose first line is the header
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("error opening {}: {}", path.display(), e),
            ))
        })?;
        Self::parse(&content)
    }

    /// Parse schedule text whose first line is the header
    pub fn parse(content: &str) -> Result<Self> {
        let header = content
            .lines()
            .next()
            .map(|line| line.trim_end_matches('\r').to_string())
            .filter(|line| !line.trim().is_empty())
            .ok_or_else(|| Error::Csv("error reading header row: input is empty".to_string()))?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let mut courses = Vec::new();
        for (row, record) in reader.deserialize::<Course>().enumerate() {
            match record {
                Ok(course) => courses.push(course),
                // Row numbers are 1-based and the header is row 1.
                Err(e) => warn!(row = row + 2, error = %e, "skipping unreadable course row"),
            }
        }

        debug!(courses = courses.len(), "parsed class schedule");
        Ok(Self::from_courses(header, courses))
    }

    /// Build the catalog from an already-parsed course list
    pub fn from_courses(header: impl Into<String>, courses: Vec<Course>) -> Self {
        let instructors = unique_instructors(&courses, AliasRegistry::builtin());
        let departments = unique_subjects(&courses);

        Self {
            courses,
            instructors,
            departments,
            header: header.into(),
        }
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Canonical instructor names, in order of first appearance
    pub fn instructors(&self) -> &[String] {
        &self.instructors
    }

    /// Subject codes, in order of first appearance
    pub fn departments(&self) -> &[String] {
        &self.departments
    }

    /// Raw header line of the source file
    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Courses whose instructor, once canonicalized, is `name` (ignoring case)
    pub fn courses_taught_by(&self, name: &str) -> Vec<&Course> {
        let registry = AliasRegistry::builtin();
        let wanted = registry.canonicalize(name).to_lowercase();
        if wanted.is_empty() {
            return Vec::new();
        }
        self.courses
            .iter()
            .filter(|course| {
                registry.canonicalize(&course.instructor_full_name()).to_lowercase() == wanted
            })
            .collect()
    }
}

fn unique_instructors(courses: &[Course], registry: &AliasRegistry) -> Vec<String> {
    let mut seen = HashSet::new();
    courses
        .iter()
        .map(|course| registry.canonicalize(&course.instructor_full_name()))
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

fn unique_subjects(courses: &[Course]) -> Vec<String> {
    let mut seen = HashSet::new();
    courses
        .iter()
        .map(|course| course.subject.clone())
        .filter(|subject| !subject.is_empty())
        .filter(|subject| seen.insert(subject.clone()))
        .collect()
}
