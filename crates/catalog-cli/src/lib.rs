//! Question routing and terminal interface for the course catalog assistant

mod chatbot;
mod formatter;
mod intent;
mod ui;

#[cfg(test)]
mod tests;

pub use chatbot::{ChatBot, RoutingPolicy};
pub use formatter::{
    format_compact, format_compact_list, format_full, format_full_list, pretty_print_documents,
};
pub use intent::Intent;
pub use ui::{PROMPT, UserInput, display_banner, handle_input_with_history, print_help};

// Re-export core types
pub use catalog_core::{Error, Result};
