//! Instructor alias registry and name canonicalization

use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::error;

use crate::{Error, Result};

/// An instructor and every spelling that refers to them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instructor {
    pub canonical_name: String,
    pub aliases: Vec<String>,
}

impl Instructor {
    pub fn new(canonical_name: &str, aliases: &[&str]) -> Self {
        Self {
            canonical_name: canonical_name.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Instructors known to the registrar under more than one name.
///
/// Every canonical name is also listed as its own alias so that a question
/// already using the canonical spelling is recognized.
fn builtin_instructors() -> Vec<Instructor> {
    vec![
        Instructor::new(
            "Philip Peterson",
            &["Philip Peterson", "Phil Peterson", "Philip J. Peterson", "Dr. Peterson"],
        ),
        Instructor::new(
            "Philip Choong",
            &["Philip Choong", "Phil Choong", "Dr. Choong"],
        ),
        Instructor::new("Sheryl Davis", &["Sheryl Davis", "Sheryl E. Davis", "Dr. Davis"]),
        Instructor::new("Bruce Wayne", &["Bruce Wayne", "B. Wayne"]),
    ]
}

static BUILTIN: LazyLock<AliasRegistry> = LazyLock::new(|| {
    AliasRegistry::new(builtin_instructors()).unwrap_or_else(|e| {
        error!(error = %e, "builtin alias registry is invalid, alias matching is disabled");
        AliasRegistry::default()
    })
});

/// Static mapping from alias to canonical instructor name
#[derive(Debug, Clone, Default)]
pub struct AliasRegistry {
    instructors: Vec<Instructor>,
    /// One word-bounded, case-insensitive pattern per instructor
    matchers: Vec<Regex>,
    /// All aliases of all instructors, longest first
    any_alias: Option<Regex>,
    /// Lowercased alias -> index into `instructors`
    by_alias: HashMap<String, usize>,
}

impl AliasRegistry {
    /// Build a registry, rejecting aliases claimed by two instructors
    pub fn new(instructors: Vec<Instructor>) -> Result<Self> {
        let mut by_alias: HashMap<String, usize> = HashMap::new();
        let mut matchers = Vec::with_capacity(instructors.len());

        for (idx, instructor) in instructors.iter().enumerate() {
            for alias in &instructor.aliases {
                let key = alias.trim().to_lowercase();
                if key.is_empty() {
                    return Err(Error::InvalidInput(format!(
                        "empty alias for '{}'",
                        instructor.canonical_name
                    )));
                }
                if let Some(&owner) = by_alias.get(&key) {
                    if owner != idx {
                        return Err(Error::InvalidInput(format!(
                            "alias '{}' belongs to both '{}' and '{}'",
                            alias, instructors[owner].canonical_name, instructor.canonical_name
                        )));
                    }
                }
                by_alias.insert(key, idx);
            }

            let aliases: Vec<&str> = instructor.aliases.iter().map(|a| a.trim()).collect();
            matchers.push(alias_pattern(&aliases)?);
        }

        let any_alias = if by_alias.is_empty() {
            None
        } else {
            let mut all: Vec<&str> = by_alias.keys().map(String::as_str).collect();
            all.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
            Some(alias_pattern(&all)?)
        };

        Ok(Self {
            instructors,
            matchers,
            any_alias,
            by_alias,
        })
    }

    /// The registry shipped with the assistant
    pub fn builtin() -> &'static AliasRegistry {
        &BUILTIN
    }

    pub fn instructors(&self) -> &[Instructor] {
        &self.instructors
    }

    /// Map a whole name to its canonical spelling.
    ///
    /// The input is trimmed. An unrecognized name is returned as given
    /// (trimmed, original casing).
    pub fn canonicalize(&self, name: &str) -> String {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return trimmed.to_string();
        }

        let key = trimmed.to_lowercase();
        self.instructors
            .iter()
            .find(|instructor| {
                instructor
                    .aliases
                    .iter()
                    .any(|alias| alias.trim().to_lowercase() == key)
            })
            .map(|instructor| instructor.canonical_name.clone())
            .unwrap_or_else(|| trimmed.to_string())
    }

    /// Replace every alias occurring in free text with its canonical name.
    ///
    /// Matching is case-insensitive on word boundaries, longest alias
    /// first, in a single left-to-right pass.
    pub fn substitute_aliases(&self, text: &str) -> String {
        let Some(pattern) = &self.any_alias else {
            return text.to_string();
        };

        pattern
            .replace_all(text, |caps: &regex::Captures| {
                let found = &caps[0];
                match self.by_alias.get(&found.to_lowercase()) {
                    Some(&idx) => self.instructors[idx].canonical_name.clone(),
                    None => found.to_string(),
                }
            })
            .into_owned()
    }

    /// First instructor, in registry order, with an alias mentioned in `text`
    pub fn find_mentioned(&self, text: &str) -> Option<&Instructor> {
        self.instructors
            .iter()
            .zip(&self.matchers)
            .find(|(_, matcher)| matcher.is_match(text))
            .map(|(instructor, _)| instructor)
    }
}

fn alias_pattern(aliases: &[&str]) -> Result<Regex> {
    let alternation = aliases
        .iter()
        .map(|alias| regex::escape(alias))
        .collect::<Vec<_>>()
        .join("|");

    RegexBuilder::new(&format!(r"\b(?:{})\b", alternation))
        .case_insensitive(true)
        .build()
        .map_err(|e| Error::InvalidInput(format!("bad alias pattern: {}", e)))
}

/// Canonicalize a whole name against the builtin registry
pub fn canonicalize(name: &str) -> String {
    AliasRegistry::builtin().canonicalize(name)
}

/// Substitute aliases in free text against the builtin registry
pub fn substitute_aliases(text: &str) -> String {
    AliasRegistry::builtin().substitute_aliases(text)
}
