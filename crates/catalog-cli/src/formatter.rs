//! Rendering of course records and raw search hits

use catalog_core::Course;

/// Width of the label column in full listings
pub const LABEL_WIDTH: usize = 25;
/// Width of the dash line closing each full listing
pub const SEPARATOR_WIDTH: usize = 50;

fn separator() -> String {
    "-".repeat(SEPARATOR_WIDTH)
}

fn labelled_line(label: &str, value: &str) -> String {
    format!("{:<width$}{}\n", format!("{}:", label), value, width = LABEL_WIDTH)
}

/// `"<Title>, Section: <Section>, CRN: <CRN> in <Building>, Room <Room>"`
pub fn format_compact(course: &Course) -> String {
    format!(
        "{}, Section: {}, CRN: {} in {}, Room {}",
        course.title, course.section, course.crn, course.building, course.room
    )
}

/// One compact line per course
pub fn format_compact_list(courses: &[&Course]) -> String {
    courses
        .iter()
        .map(|course| format_compact(course))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Every field on its own line, closed by a dash separator
pub fn format_full(course: &Course) -> String {
    let mut out = String::new();
    for (label, value) in course.fields() {
        out.push_str(&labelled_line(label, value));
    }
    out.push_str(&separator());
    out.push('\n');
    out
}

/// Full listings back to back; each block carries its own separator
pub fn format_full_list(courses: &[&Course]) -> String {
    courses.iter().map(|course| format_full(course)).collect()
}

/// Operator view of raw search hits.
///
/// Each hit's fields are joined with spaces and split back into
/// `Label: value` pairs on ". ".
pub fn pretty_print_documents(documents: &[Vec<String>]) -> String {
    let mut out = String::new();

    for (i, document) in documents.iter().enumerate() {
        out.push_str(&format!("Match {}:\n", i + 1));

        let joined = document.join(" ");
        for part in joined.split(". ") {
            let part = part.trim().trim_end_matches('.');
            if part.is_empty() {
                continue;
            }
            let pair = part
                .split_once(": ")
                .or_else(|| part.strip_suffix(':').map(|label| (label, "")));
            match pair {
                Some((label, value)) => out.push_str(&labelled_line(label.trim(), value.trim())),
                None => {
                    out.push_str(part);
                    out.push('\n');
                }
            }
        }

        out.push_str(&separator());
        out.push('\n');
    }

    out
}
