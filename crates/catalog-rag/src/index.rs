//! Course index: the bridge between the catalog and the vector stores

use serde_json::json;
use std::collections::HashMap;
use tracing::{debug, info};

use catalog_core::{
    AliasRegistry, Course, Error, Result, SearchConfig, VectorDocument, VectorStore,
};

/// Which collection a similarity query runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    /// One document per course section
    Courses,
    /// One document per instructor, listing what they teach
    Instructors,
}

/// Outcome of indexing the catalog into both collections
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct IndexingResult {
    pub courses_indexed: usize,
    pub instructors_indexed: usize,
    /// Collections left untouched because they already held documents
    pub skipped: Vec<String>,
}

/// Indexes courses and answers similarity queries over them
pub struct CourseIndex<V: VectorStore> {
    courses: V,
    instructors: V,
    registry: &'static AliasRegistry,
}

impl<V: VectorStore> CourseIndex<V> {
    /// Create an index over a course store and an instructor store
    pub fn new(courses: V, instructors: V) -> Self {
        Self {
            courses,
            instructors,
            registry: AliasRegistry::builtin(),
        }
    }

    /// Connect both stores
    pub async fn connect(&mut self) -> Result<()> {
        self.courses.connect().await?;
        self.instructors.connect().await?;
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.courses.is_connected() && self.instructors.is_connected()
    }

    fn store(&self, collection: Collection) -> &V {
        match collection {
            Collection::Courses => &self.courses,
            Collection::Instructors => &self.instructors,
        }
    }

    /// Add courses to the index unless it is already populated.
    ///
    /// Each collection is probed first; a collection that already holds
    /// documents is skipped, so repeated startups index nothing twice.
    pub async fn add_courses(&self, courses: &[Course]) -> Result<IndexingResult> {
        let mut result = IndexingResult::default();

        if self.courses.count().await? > 0 {
            info!("Courses already loaded in the vector store, skipping addition");
            result.skipped.push("courses".to_string());
        } else {
            let documents = self.course_documents(courses);
            let stored = self.courses.store_batch(documents).await?;
            for id in &stored {
                let title = id
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| courses.get(i))
                    .map(|course| course.title.as_str())
                    .unwrap_or_default();
                debug!(%id, %title, "added course");
            }
            result.courses_indexed = stored.len();
            info!(count = result.courses_indexed, "added courses to the vector store");
        }

        if self.instructors.count().await? > 0 {
            info!("Instructors already loaded in the vector store, skipping addition");
            result.skipped.push("instructors".to_string());
        } else {
            let documents = self.instructor_documents(courses);
            let stored = self.instructors.store_batch(documents).await?;
            for id in &stored {
                debug!(%id, "added instructor");
            }
            result.instructors_indexed = stored.len();
            info!(count = result.instructors_indexed, "added instructors to the vector store");
        }

        Ok(result)
    }

    /// Nearest documents to `text`, each as its list of text fields
    pub async fn query_similar(
        &self,
        text: &str,
        top_k: usize,
        collection: Collection,
    ) -> Result<Vec<Vec<String>>> {
        debug!(term = %text, ?collection, top_k, "querying vector store");

        let config = SearchConfig {
            top_k,
            score_threshold: None,
        };
        let result = self
            .store(collection)
            .search(text, &config)
            .await
            .map_err(|e| Error::VectorStore(format!("similarity query failed: {}", e)))?;

        Ok(result
            .documents
            .into_iter()
            .map(|doc| vec![doc.content])
            .collect())
    }

    fn course_documents(&self, courses: &[Course]) -> Vec<VectorDocument> {
        courses
            .iter()
            .enumerate()
            .map(|(i, course)| {
                let canonical = self.registry.canonicalize(&course.instructor_full_name());
                debug!(title = %course.title, instructor = %canonical, "indexing course");
                VectorDocument::new(
                    i.to_string(),
                    course.to_document(),
                    json!({
                        "instructor_canonical_name": canonical,
                        "subject": course.subject,
                        "crn": course.crn,
                    }),
                )
            })
            .collect()
    }

    fn instructor_documents(&self, courses: &[Course]) -> Vec<VectorDocument> {
        let mut order: Vec<String> = Vec::new();
        let mut taught: HashMap<String, (String, Vec<String>)> = HashMap::new();

        for course in courses {
            let name = self.registry.canonicalize(&course.instructor_full_name());
            if name.is_empty() {
                continue;
            }
            let entry = taught.entry(name.clone()).or_insert_with(|| {
                order.push(name.clone());
                (course.instructor_email.clone(), Vec::new())
            });
            entry.1.push(format!(
                "{} {}-{} {} (CRN {})",
                course.subject, course.course_number, course.section, course.title, course.crn
            ));
        }

        order
            .into_iter()
            .enumerate()
            .filter_map(|(i, name)| {
                let (email, listing) = taught.remove(&name)?;
                let content = format!(
                    "Instructor: {}. Email: {}. Courses: {}.",
                    name,
                    email,
                    listing.join("; ")
                );
                Some(VectorDocument::new(
                    i.to_string(),
                    content,
                    json!({ "instructor_canonical_name": name }),
                ))
            })
            .collect()
    }
}
