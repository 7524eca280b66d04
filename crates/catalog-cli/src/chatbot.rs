//! Question router: direct catalog lookup, vector search or plain chat

use regex::RegexBuilder;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

use catalog_core::{AliasRegistry, CourseCatalog, Error, LLMProvider, Result, VectorStore};
use catalog_rag::{Collection, CourseIndex};

use crate::formatter::{format_compact_list, format_full_list, pretty_print_documents};
use crate::intent::Intent;

const MATCHES_PREAMBLE: &str = "Based on the available information, here are the relevant matches:\n\n";
const MATCHES_EPILOGUE: &str = "\nPlease use this information to answer the user's question.";

/// How a question is turned into an answer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RoutingPolicy {
    /// Scan the catalog when an instructor is named, otherwise search the
    /// vector store and let the model answer from the hits
    #[default]
    DirectLookup,
    /// Classify the question and let the model answer under the matching
    /// canned prompt
    Classifier,
}

impl FromStr for RoutingPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "direct" | "direct-lookup" => Ok(RoutingPolicy::DirectLookup),
            "classifier" => Ok(RoutingPolicy::Classifier),
            other => Err(Error::Configuration(format!(
                "unknown routing policy '{}', expected 'direct' or 'classifier'",
                other
            ))),
        }
    }
}

impl fmt::Display for RoutingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutingPolicy::DirectLookup => write!(f, "direct"),
            RoutingPolicy::Classifier => write!(f, "classifier"),
        }
    }
}

/// Answers questions about the course catalog
pub struct ChatBot<L: LLMProvider, V: VectorStore> {
    llm: L,
    catalog: CourseCatalog,
    index: CourseIndex<V>,
    registry: &'static AliasRegistry,
    policy: RoutingPolicy,
    top_k: usize,
}

impl<L: LLMProvider, V: VectorStore> ChatBot<L, V> {
    pub fn new(llm: L, catalog: CourseCatalog, index: CourseIndex<V>) -> Self {
        Self {
            llm,
            catalog,
            index,
            registry: AliasRegistry::builtin(),
            policy: RoutingPolicy::default(),
            top_k: 5,
        }
    }

    pub fn with_policy(mut self, policy: RoutingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Number of vector-store hits handed to the model
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn policy(&self) -> RoutingPolicy {
        self.policy
    }

    pub fn catalog(&self) -> &CourseCatalog {
        &self.catalog
    }

    /// Answer one question
    pub async fn answer_question(&self, question: &str) -> Result<String> {
        info!(%question, policy = %self.policy, "processing question");
        let question = self.registry.substitute_aliases(question);
        debug!(%question, "substituted instructor aliases");

        match self.policy {
            RoutingPolicy::DirectLookup => self.answer_direct(&question).await,
            RoutingPolicy::Classifier => {
                let system_message = self.generate_system_message(&question);
                self.complete(&question, system_message).await
            }
        }
    }

    /// Canned system prompt for the question's intent
    pub fn generate_system_message(&self, question: &str) -> &'static str {
        let intent = Intent::classify(question, &self.catalog);
        debug!(?intent, "classified question");
        intent.system_message()
    }

    async fn answer_direct(&self, question: &str) -> Result<String> {
        if let Some(name) = self.mentioned_instructor(question) {
            return self.lookup_instructor(&name);
        }

        let collection = if question.to_lowercase().contains("instructor") {
            Collection::Instructors
        } else {
            Collection::Courses
        };

        debug!(?collection, "no instructor named, searching the vector store");
        let documents = self
            .index
            .query_similar(question, self.top_k, collection)
            .await?;

        if documents.is_empty() {
            debug!("no vector store matches, using the general prompt");
            return self
                .complete(question, Intent::General.system_message())
                .await;
        }

        debug!("vector store matches:\n{}", pretty_print_documents(&documents));

        let mut system_message = String::from(MATCHES_PREAMBLE);
        for document in &documents {
            system_message.push_str(&format!("- {}\n", document.join(" ")));
        }
        system_message.push_str(MATCHES_EPILOGUE);

        self.complete(question, &system_message).await
    }

    /// Canonical name of the instructor a question is about.
    ///
    /// Registry aliases win; otherwise any multi-word instructor name from
    /// the catalog mentioned as whole words.
    fn mentioned_instructor(&self, question: &str) -> Option<String> {
        if let Some(instructor) = self.registry.find_mentioned(question) {
            return Some(instructor.canonical_name.clone());
        }

        self.catalog
            .instructors()
            .iter()
            .filter(|name| name.split_whitespace().count() >= 2)
            .find(|name| {
                RegexBuilder::new(&format!(r"\b{}\b", regex::escape(name)))
                    .case_insensitive(true)
                    .build()
                    .map(|re| re.is_match(question))
                    .unwrap_or(false)
            })
            .cloned()
    }

    fn lookup_instructor(&self, name: &str) -> Result<String> {
        if self.catalog.is_empty() {
            return Err(Error::NoCourseData(format!(
                "cannot look up courses taught by {}",
                name
            )));
        }

        let courses = self.catalog.courses_taught_by(name);
        info!(instructor = %name, matches = courses.len(), "direct catalog lookup");

        if courses.is_empty() {
            return Ok(format!("No courses found for {}.", name));
        }

        Ok(format!(
            "Here are the courses taught by {}:\n{}\n\n{}",
            name,
            format_compact_list(&courses),
            format_full_list(&courses)
        ))
    }

    async fn complete(&self, question: &str, system_message: &str) -> Result<String> {
        self.llm
            .chat_completion(question, system_message)
            .await
            .map_err(|e| Error::LLMProvider(format!("chat completion failed: {}", e)))
    }
}
