use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid time format: {0}")]
    Format(String),

    #[error("Section {candidate} conflicts with selected sections {conflicting:?}")]
    Conflict {
        candidate: u32,
        conflicting: Vec<u32>,
    },

    #[error("Please enter a valid timetable name")]
    InvalidName,

    #[error("A timetable named \"{0}\" already exists")]
    DuplicateName(String),

    #[error("Timetable not found: {0}")]
    TimetableNotFound(String),

    #[error("Nothing to export: the calendar has no events")]
    EmptyExport,

    #[error("Unknown section CRN: {0}")]
    UnknownSection(u32),

    #[error("Unknown course: {0}")]
    UnknownCourse(String),

    #[error("Course {0} has no sections in the active term")]
    NoSections(String),

    #[error("Section {crn} is a {actual}, not a {expected}")]
    TypeMismatch {
        crn: u32,
        expected: String,
        actual: String,
    },

    #[error("Event {0} is generated from a course section and cannot be edited")]
    NotEditable(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, Error>;
