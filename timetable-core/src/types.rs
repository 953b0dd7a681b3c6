use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Color used for events whose section has no palette color.
pub const FALLBACK_COLOR: &str = "#3c4043";

/// Default eight-entry palette, handed out in order.
pub const DEFAULT_PALETTE: [&str; 8] = [
    "#039be5", "#33b679", "#8e24aa", "#e67c73", "#f6bf26", "#f4511e", "#7986cb", "#0b8043",
];

/// Category of a section meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ScheduleType {
    Lecture,
    Lab,
    Tutorial,
    Seminar,
    Other,
}

impl ScheduleType {
    /// Display order used when auto-selecting a course.
    pub const ALL: [Self; 5] = [
        Self::Lecture,
        Self::Lab,
        Self::Tutorial,
        Self::Seminar,
        Self::Other,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lecture => "Lecture",
            Self::Lab => "Lab",
            Self::Tutorial => "Tutorial",
            Self::Seminar => "Seminar",
            Self::Other => "Other",
        }
    }
}

impl From<String> for ScheduleType {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "lecture" => Self::Lecture,
            "lab" | "laboratory" => Self::Lab,
            "tutorial" => Self::Tutorial,
            "seminar" => Self::Seminar,
            _ => Self::Other,
        }
    }
}

impl From<ScheduleType> for String {
    fn from(value: ScheduleType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ScheduleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scheduled meeting of a course, as delivered by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Term code, e.g. `202409`
    pub term: u32,
    pub subject: String,
    pub course_number: u32,
    pub course_name: String,
    /// Course Registration Number, unique within a term
    pub crn: u32,
    /// Section label such as `A01` or `B02`
    #[serde(rename = "section")]
    pub section_label: String,
    pub schedule_type: ScheduleType,
    /// Day codes drawn from `UMTWRFS`
    #[serde(default)]
    pub days: String,
    /// `start-end` in 12-hour clock; absent for asynchronous sections
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub instructor: String,
    #[serde(default)]
    pub units: f32,
}

impl Section {
    pub fn course_key(&self) -> CourseKey {
        CourseKey::new(&self.subject, self.course_number)
    }

    /// Title shown on calendar events.
    pub fn event_title(&self) -> String {
        format!(
            "{} {} - {}",
            self.subject, self.course_number, self.schedule_type
        )
    }
}

/// Course identity, rendered as `SUBJECT-NUMBER`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseKey(String);

impl CourseKey {
    pub fn new(subject: &str, course_number: u32) -> Self {
        Self(format!("{subject}-{course_number}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// All sections sharing a subject and course number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub subject: String,
    pub course_number: u32,
    pub course_name: String,
    pub sections: Vec<Section>,
}

impl Course {
    pub fn key(&self) -> CourseKey {
        CourseKey::new(&self.subject, self.course_number)
    }

    /// Sections of one schedule type, ordered by section label.
    pub fn sections_of_type(&self, schedule_type: ScheduleType) -> Vec<&Section> {
        let mut sections: Vec<&Section> = self
            .sections
            .iter()
            .filter(|s| s.schedule_type == schedule_type)
            .collect();
        sections.sort_by(|a, b| a.section_label.cmp(&b.section_label));
        sections
    }

    /// Schedule types offered by this course, in display order.
    pub fn schedule_types(&self) -> Vec<ScheduleType> {
        ScheduleType::ALL
            .into_iter()
            .filter(|t| self.sections.iter().any(|s| s.schedule_type == *t))
            .collect()
    }
}

/// Hex color string such as `#039be5`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One weekly meeting interval: day index (0 = Sunday) and minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSpan {
    pub day: u8,
    pub start: u16,
    pub end: u16,
}

impl TimeSpan {
    /// Half-open overlap on the same day; touching boundaries do not overlap.
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.day == other.day && self.start < other.end && self.end > other.start
    }
}

/// Renderable calendar entry. `crn` is `None` for user-created events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub color: Color,
    pub crn: Option<u32>,
}

impl CalendarEvent {
    /// Only ad hoc events may be dragged or resized.
    pub const fn is_editable(&self) -> bool {
        self.crn.is_none()
    }

    pub fn duration_display(&self) -> String {
        format!("{} - {}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

/// Persisted timetable, stored under the `timetables` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimetableRecord {
    pub name: String,
    pub crns: Vec<u32>,
    #[serde(default)]
    pub colors: BTreeMap<u32, Color>,
    pub timestamp: DateTime<Utc>,
}

/// Single-slot record from before named timetables existed (`savedTimetable`).
/// Colors are keyed by course rather than by CRN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyTimetable {
    pub crns: Vec<u32>,
    #[serde(default)]
    pub colors: BTreeMap<String, Color>,
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Colors handed out to courses, first free wins
    pub palette: Vec<Color>,
    /// Color for sections left uncolored
    pub fallback_color: Color,
    /// Restrict auto-selection to sections of this term
    pub term: Option<u32>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            palette: DEFAULT_PALETTE.iter().map(|c| Color::new(*c)).collect(),
            fallback_color: Color::new(FALLBACK_COLOR),
            term: None,
        }
    }
}

/// ICS export options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IcsOptions {
    pub prod_id: String,
    /// Written as `X-WR-CALNAME` when present
    pub calendar_name: Option<String>,
    /// Domain part of generated UIDs
    pub uid_domain: String,
}

impl Default for IcsOptions {
    fn default() -> Self {
        Self {
            prod_id: "-//Timetable//Course Planner//EN".to_string(),
            calendar_name: None,
            uid_domain: "timetable.local".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_type_parses_catalog_strings() {
        let parsed: Vec<ScheduleType> =
            serde_json::from_str(r#"["Lecture", "lab", "Tutorial", "Seminar", "Lecture Topic"]"#)
                .unwrap();
        assert_eq!(
            parsed,
            vec![
                ScheduleType::Lecture,
                ScheduleType::Lab,
                ScheduleType::Tutorial,
                ScheduleType::Seminar,
                ScheduleType::Other,
            ]
        );
        assert_eq!(serde_json::to_string(&ScheduleType::Lab).unwrap(), "\"Lab\"");
    }

    #[test]
    fn section_deserializes_catalog_record() {
        let json = r#"{
            "term": 202409,
            "subject": "CSC",
            "course_number": 225,
            "course_name": "Algorithms and Data Structures I",
            "crn": 10423,
            "section": "A01",
            "schedule_type": "Lecture",
            "days": "MR",
            "time": "10:00 am - 11:20 am",
            "instructor": "TBA",
            "units": 1.5,
            "location": "ECS 125"
        }"#;
        let section: Section = serde_json::from_str(json).unwrap();
        assert_eq!(section.crn, 10423);
        assert_eq!(section.section_label, "A01");
        assert_eq!(section.course_key().as_str(), "CSC-225");
        assert_eq!(section.event_title(), "CSC 225 - Lecture");
    }

    #[test]
    fn asynchronous_section_has_no_time() {
        let json = r#"{
            "term": 202409, "subject": "ART", "course_number": 100,
            "course_name": "Art", "crn": 1, "section": "A01",
            "schedule_type": "Lecture"
        }"#;
        let section: Section = serde_json::from_str(json).unwrap();
        assert!(section.time.is_none());
        assert!(section.days.is_empty());
    }

    #[test]
    fn touching_spans_do_not_overlap() {
        let a = TimeSpan { day: 2, start: 780, end: 860 };
        let b = TimeSpan { day: 2, start: 860, end: 940 };
        let c = TimeSpan { day: 2, start: 850, end: 900 };
        let d = TimeSpan { day: 4, start: 780, end: 860 };
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));
        assert!(!a.overlaps(&d));
    }

    #[test]
    fn timetable_record_uses_string_crn_keys() {
        let mut colors = BTreeMap::new();
        colors.insert(111, Color::new("#039be5"));
        let record = TimetableRecord {
            name: "Fall Plan".to_string(),
            crns: vec![111, 222],
            colors,
            timestamp: "2024-09-01T12:00:00.000Z".parse().unwrap(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["colors"]["111"], "#039be5");
        assert_eq!(json["crns"][1], 222);

        let back: TimetableRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
