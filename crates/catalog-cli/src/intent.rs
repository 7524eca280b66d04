//! Question classification for the classifier routing policy

use regex::RegexBuilder;

use catalog_core::CourseCatalog;

/// Keywords that mark a question about where or when a class meets
const LOCATION_KEYWORDS: [&str; 3] = ["location", "where", "meeting"];

/// What a question is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Mentions an instructor from the catalog
    InstructorLookup,
    /// Mentions a department (subject) code
    DepartmentLookup,
    /// Asks about a meeting place or time
    LocationLookup,
    General,
}

impl Intent {
    /// Classify a question against the instructors and departments in `catalog`.
    ///
    /// Checks run in order: instructor names, department codes (whole word),
    /// then location keywords.
    pub fn classify(question: &str, catalog: &CourseCatalog) -> Self {
        let lowered = question.to_lowercase();

        if catalog
            .instructors()
            .iter()
            .any(|name| lowered.contains(&name.to_lowercase()))
        {
            return Intent::InstructorLookup;
        }

        if catalog
            .departments()
            .iter()
            .any(|code| mentions_word(&lowered, code))
        {
            return Intent::DepartmentLookup;
        }

        if LOCATION_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
            return Intent::LocationLookup;
        }

        Intent::General
    }

    /// System prompt sent to the chat model for this intent
    pub fn system_message(self) -> &'static str {
        match self {
            Intent::InstructorLookup => {
                "You are a university course assistant. The user is asking about an instructor. \
                 Answer with the courses they teach, including titles, sections and CRNs where known."
            }
            Intent::DepartmentLookup => {
                "You are a university course assistant. The user is asking about a department. \
                 Answer with the courses that department offers this term."
            }
            Intent::LocationLookup => {
                "You are a university course assistant. The user is asking where or when a class meets. \
                 Answer with the building, room, meeting days and times."
            }
            Intent::General => {
                "Provide accurate information based on the context of university courses and instructors."
            }
        }
    }
}

fn mentions_word(lowered: &str, word: &str) -> bool {
    let word = word.trim();
    if word.is_empty() {
        return false;
    }
    RegexBuilder::new(&format!(r"\b{}\b", regex::escape(word)))
        .case_insensitive(true)
        .build()
        .map(|re| re.is_match(lowered))
        .unwrap_or(false)
}
