//! Course record as published in the registrar's class schedule

use serde::{Deserialize, Serialize};

/// Number of fields in a course record
pub const FIELD_COUNT: usize = 21;

/// One row of the class schedule
///
/// Field names follow the schedule export. Both the short labels and the
/// registrar's long column names are accepted when reading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Course {
    #[serde(rename = "Subject")]
    pub subject: String,
    #[serde(rename = "Course Number")]
    pub course_number: String,
    #[serde(rename = "Section", alias = "Section Number")]
    pub section: String,
    #[serde(rename = "CRN")]
    pub crn: String,
    #[serde(rename = "Schedule Type Code")]
    pub schedule_type_code: String,
    #[serde(rename = "Campus Code")]
    pub campus_code: String,
    #[serde(rename = "Title Short Desc", alias = "Title")]
    pub title: String,
    #[serde(rename = "Instruction Mode Desc")]
    pub instruction_mode_desc: String,
    #[serde(rename = "Meeting Type Codes")]
    pub meeting_type_codes: String,
    #[serde(rename = "Meet Days")]
    pub meet_days: String,
    #[serde(rename = "Begin Time")]
    pub begin_time: String,
    #[serde(rename = "End Time")]
    pub end_time: String,
    #[serde(rename = "Meet Start")]
    pub meet_start: String,
    #[serde(rename = "Meet End")]
    pub meet_end: String,
    #[serde(rename = "Building")]
    pub building: String,
    #[serde(rename = "Room")]
    pub room: String,
    #[serde(rename = "Actual Enrollment")]
    pub actual_enrollment: String,
    #[serde(
        rename = "Instructor First Name",
        alias = "Primary Instructor First Name"
    )]
    pub instructor_first_name: String,
    #[serde(
        rename = "Instructor Last Name",
        alias = "Primary Instructor Last Name"
    )]
    pub instructor_last_name: String,
    #[serde(rename = "Instructor Email", alias = "Primary Instructor Email")]
    pub instructor_email: String,
    #[serde(rename = "College")]
    pub college: String,
}

impl Course {
    /// All fields as `(label, value)` pairs, in schedule column order
    pub fn fields(&self) -> [(&'static str, &str); FIELD_COUNT] {
        [
            ("Subject", self.subject.as_str()),
            ("Course Number", self.course_number.as_str()),
            ("Section", self.section.as_str()),
            ("CRN", self.crn.as_str()),
            ("Schedule Type Code", self.schedule_type_code.as_str()),
            ("Campus Code", self.campus_code.as_str()),
            ("Title Short Desc", self.title.as_str()),
            ("Instruction Mode Desc", self.instruction_mode_desc.as_str()),
            ("Meeting Type Codes", self.meeting_type_codes.as_str()),
            ("Meet Days", self.meet_days.as_str()),
            ("Begin Time", self.begin_time.as_str()),
            ("End Time", self.end_time.as_str()),
            ("Meet Start", self.meet_start.as_str()),
            ("Meet End", self.meet_end.as_str()),
            ("Building", self.building.as_str()),
            ("Room", self.room.as_str()),
            ("Actual Enrollment", self.actual_enrollment.as_str()),
            ("Instructor First Name", self.instructor_first_name.as_str()),
            ("Instructor Last Name", self.instructor_last_name.as_str()),
            ("Instructor Email", self.instructor_email.as_str()),
            ("College", self.college.as_str()),
        ]
    }

    /// `"First Last"`, trimmed; empty when the section has no instructor
    pub fn instructor_full_name(&self) -> String {
        format!("{} {}", self.instructor_first_name, self.instructor_last_name)
            .trim()
            .to_string()
    }

    /// Text indexed for similarity search: `"Label: value. Label: value."`
    pub fn to_document(&self) -> String {
        self.fields()
            .iter()
            .map(|(label, value)| format!("{}: {}.", label, value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
