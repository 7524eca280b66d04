//! UI utilities for the CLI

use catalog_core::Result;
use colored::*;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, size},
};
use std::io::{self, BufRead, IsTerminal, Write};

/// Prompt shown before each question
pub const PROMPT: &str = "Catalog search>";

/// What the user typed on one prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInput {
    Question(String),
    Empty,
    Help,
    Exit,
}

impl UserInput {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        match line.to_lowercase().as_str() {
            "" => UserInput::Empty,
            "help" => UserInput::Help,
            "exit" | "quit" => UserInput::Exit,
            _ => UserInput::Question(line.to_string()),
        }
    }
}

/// Display startup banner
pub fn display_banner(courses: usize, instructors: usize) {
    let terminal_width = size().map(|(w, _)| w as usize).unwrap_or(80);
    let banner_width = std::cmp::max(40, std::cmp::min(67, terminal_width.saturating_sub(4)));

    let top_border = format!("┌{}┐", "─".repeat(banner_width - 2));
    let bottom_border = format!("└{}┘", "─".repeat(banner_width - 2));
    let empty_line = format!("│{}│", " ".repeat(banner_width - 2));

    let loaded = format!("{} courses, {} instructors loaded", courses, instructors);
    let lines = [
        "Ask about courses, instructors and rooms",
        "",
        "• Instructor nicknames are recognized",
        "• ↑/↓ browse history, Esc clears the line",
        "",
        loaded.as_str(),
    ];

    println!();
    println!("{}", top_border.blue());
    println!("{}", empty_line.blue());

    let title = "Course Catalog Assistant";
    println!(
        "│  {}{}│",
        title.blue().bold(),
        " ".repeat(banner_width.saturating_sub(title.chars().count() + 4))
    );
    println!("{}", empty_line.blue());

    for line in lines {
        if line.is_empty() {
            println!("{}", empty_line.blue());
            continue;
        }
        let padding = " ".repeat(banner_width.saturating_sub(line.chars().count() + 4));
        println!("{}", format!("│  {}{}│", line, padding).blue());
    }

    println!("{}", empty_line.blue());
    println!("{}", bottom_border.blue());
    println!();
    println!("{}", "Tip: type a question, or 'help' for commands".dimmed());
}

/// Read one line, with history navigation on an interactive terminal.
///
/// Returns `None` at end of input.
pub fn handle_input_with_history(history: &mut Vec<String>) -> Result<Option<String>> {
    print!("\n{} ", PROMPT.green().bold());
    io::stdout().flush()?;

    if !io::stdin().is_terminal() {
        let mut input = String::new();
        if io::stdin().lock().read_line(&mut input)? == 0 {
            return Ok(None);
        }
        let input = input.trim().to_string();
        if !input.is_empty() {
            history.push(input.clone());
        }
        return Ok(Some(input));
    }

    enable_raw_mode()?;
    let result = read_raw_line(history);
    disable_raw_mode()?;
    println!();
    result
}

fn redraw(input: &str) -> Result<()> {
    print!("\r{} {}", PROMPT.green().bold(), " ".repeat(input.chars().count() + 50));
    print!("\r{} {}", PROMPT.green().bold(), input);
    io::stdout().flush()?;
    Ok(())
}

fn read_raw_line(history: &mut Vec<String>) -> Result<Option<String>> {
    let mut input = String::new();
    let mut history_index: Option<usize> = None;

    loop {
        let Event::Key(key_event) = event::read()? else {
            continue;
        };
        if key_event.kind != KeyEventKind::Press {
            continue;
        }

        match key_event.code {
            KeyCode::Enter => {
                let line = input.trim().to_string();
                if !line.is_empty() {
                    history.push(line.clone());
                }
                return Ok(Some(line));
            }
            KeyCode::Char('d')
                if key_event.modifiers.contains(event::KeyModifiers::CONTROL) && input.is_empty() =>
            {
                return Ok(None);
            }
            KeyCode::Char('c') if key_event.modifiers.contains(event::KeyModifiers::CONTROL) => {
                return Ok(None);
            }
            KeyCode::Char(c) => {
                input.push(c);
                redraw(&input)?;
            }
            KeyCode::Backspace => {
                if input.pop().is_some() {
                    redraw(&input)?;
                }
            }
            KeyCode::Up => {
                if !history.is_empty() {
                    let new_index = match history_index {
                        None => history.len() - 1,
                        Some(idx) if idx > 0 => idx - 1,
                        Some(idx) => idx,
                    };
                    history_index = Some(new_index);
                    input = history[new_index].clone();
                    redraw(&input)?;
                }
            }
            KeyCode::Down => {
                if let Some(idx) = history_index {
                    if idx + 1 < history.len() {
                        history_index = Some(idx + 1);
                        input = history[idx + 1].clone();
                    } else {
                        history_index = None;
                        input.clear();
                    }
                    redraw(&input)?;
                }
            }
            KeyCode::Esc => {
                history_index = None;
                input.clear();
                redraw(&input)?;
            }
            _ => {}
        }
    }
}

/// Display help message
pub fn print_help() {
    println!("{}", "Available commands:".bold());
    println!("  {} - Ask anything about the course schedule", "question".green());
    println!("  {} - Show this help message", "help".green());
    println!("  {} - Exit the application", "exit/quit".green());
    println!();
    println!("{}", "Examples:".bold());
    println!("  What courses is Phil Peterson teaching?");
    println!("  Where does Bioinformatics meet?");
    println!("  Can I learn guitar this semester?");
}
