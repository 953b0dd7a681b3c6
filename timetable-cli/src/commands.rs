use std::{fs, path::PathBuf, str::FromStr};

use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveDateTime};
use timetable_core::{
    engine::{LoadReport, Notice, TimetableEngine, TypeSlot},
    ics::ICS_MIME_TYPE,
    prelude::*,
    term::{Season, Term},
};

use crate::storage::FileStorage;

const APP_NAME: &str = "timetable";
const EVENT_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

type Engine = TimetableEngine<FileStorage>;

/// Parses `--term`: a code such as `202409`, or `current`.
pub fn parse_term(value: &str) -> std::result::Result<u32, String> {
    if value.eq_ignore_ascii_case("current") {
        return Ok(Term::current().0);
    }
    let code: u32 = value
        .parse()
        .map_err(|_| format!("expected a term code like 202409, got {value:?}"))?;
    if Term(code).season() == Season::Unknown {
        tracing::warn!("Term {} has an unrecognized season", code);
    }
    Ok(code)
}

/// Options shared by every subcommand
pub struct GlobalOptions {
    pub catalog: PathBuf,
    pub data_dir: Option<PathBuf>,
    pub term: Option<u32>,
}

/// Ad hoc event given on the command line as `TITLE;START;END`.
#[derive(Debug, Clone)]
pub struct CustomEventArg {
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl FromStr for CustomEventArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ';');
        let (Some(title), Some(start), Some(end)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(format!("expected TITLE;START;END, got {s:?}"));
        };
        let parse = |value: &str| {
            NaiveDateTime::parse_from_str(value.trim(), EVENT_TIME_FORMAT)
                .map_err(|e| format!("invalid date-time {value:?}: {e}"))
        };
        Ok(Self {
            title: title.trim().to_string(),
            start: parse(start)?,
            end: parse(end)?,
        })
    }
}

/// Export command parameters
pub struct ExportParams {
    pub output: Option<PathBuf>,
    pub calendar_name: Option<String>,
    pub date: Option<NaiveDate>,
    pub events: Vec<CustomEventArg>,
}

/// Loads the catalog and reopens the most recently saved timetable.
pub fn open_engine(options: &GlobalOptions) -> Result<Engine> {
    let content = fs::read_to_string(&options.catalog).map_err(|e| {
        anyhow::anyhow!("Failed to read catalog {}: {}", options.catalog.display(), e)
    })?;
    let sections: Vec<Section> = serde_json::from_str(&content)?;
    tracing::debug!(
        "Loaded {} sections from {}",
        sections.len(),
        options.catalog.display()
    );

    let storage = match &options.data_dir {
        Some(dir) => FileStorage::new(dir.clone())?,
        None => FileStorage::with_default_dir(APP_NAME)?,
    };
    tracing::debug!("Using data directory {}", storage.data_dir().display());

    let engine_options = EngineOptions {
        term: options.term,
        ..EngineOptions::default()
    };
    let (engine, report) = TimetableEngine::open(&sections, storage, engine_options)?;
    if let Some(report) = report {
        tracing::debug!(
            "Restored \"{}\" with {} sections",
            report.name,
            report.restored.len()
        );
    }
    Ok(engine)
}

/// Writes the open timetable back under its current name. CRNs that could
/// not be restored from storage stay in the record.
fn persist(engine: &mut Engine) -> Result<()> {
    engine.autosave()?;
    Ok(())
}

fn print_notices(engine: &Engine, notices: &[Notice]) {
    for notice in notices {
        match notice {
            Notice::CourseSelected { course, crns } => {
                println!("✓ Selected {} ({} sections)", course, crns.len());
                for crn in crns {
                    print_section_line(engine, *crn);
                }
            }
            Notice::SectionSelected { crn, .. } => {
                println!("✓ Selected section");
                print_section_line(engine, *crn);
            }
            Notice::PaletteExhausted { course } => {
                println!(
                    "! No free color left for {}; it will be drawn in {}",
                    course,
                    engine.options().fallback_color
                );
            }
        }
    }
}

fn print_section_line(engine: &Engine, crn: u32) {
    let Some(section) = engine.find_section(crn) else {
        return;
    };
    let color = engine
        .color_of(crn)
        .map_or("-", |c| c.as_str())
        .to_string();
    println!(
        "  {:>6}  {:<4} {:<9} {:<6} {:<16} {:<8} {}",
        section.crn,
        section.section_label,
        section.schedule_type,
        section.days,
        section.time.as_deref().unwrap_or("async"),
        color,
        section.instructor
    );
}

fn print_load_report(report: &LoadReport) {
    println!(
        "✓ Opened \"{}\" ({} sections)",
        report.name,
        report.restored.len()
    );
    if !report.dropped_crns.is_empty() {
        println!(
            "! No longer in the catalog, dropped: {:?}",
            report.dropped_crns
        );
    }
    if !report.rejected_crns.is_empty() {
        println!(
            "! Overlapping or duplicate, skipped: {:?}",
            report.rejected_crns
        );
    }
}

pub fn courses_command(engine: &Engine, subject: Option<&str>) -> Result<()> {
    let courses: Vec<_> = engine
        .courses()
        .iter()
        .filter(|c| subject.is_none_or(|s| c.subject.eq_ignore_ascii_case(s)))
        .collect();

    if courses.is_empty() {
        println!("No courses found");
        return Ok(());
    }

    for course in courses {
        let types: Vec<String> = course
            .schedule_types()
            .iter()
            .map(|t| format!("{} x{}", t, course.sections_of_type(*t).len()))
            .collect();
        let marker = if course.sections.iter().any(|s| engine.is_selected(s.crn)) {
            "*"
        } else {
            " "
        };
        println!(
            "{} {:<5} {:<4} {:<40} {}",
            marker,
            course.subject,
            course.course_number,
            course.course_name,
            types.join(", ")
        );
    }

    Ok(())
}

pub fn find_command(engine: &Engine, crn: u32) -> Result<()> {
    let section = engine
        .find_section(crn)
        .ok_or_else(|| anyhow::anyhow!("Unknown section CRN: {}", crn))?;

    println!("{} {} - {}", section.subject, section.course_number, section.course_name);
    println!("  Term:       {}", Term(section.term));
    println!("  Section:    {} ({})", section.section_label, section.schedule_type);
    println!("  Days:       {}", section.days);
    println!("  Time:       {}", section.time.as_deref().unwrap_or("async"));
    println!("  Instructor: {}", section.instructor);
    println!("  Units:      {}", section.units);
    if engine.is_selected(crn) {
        println!("  (selected)");
    }

    Ok(())
}

pub fn show_command(engine: &Engine) -> Result<()> {
    println!("Timetable: {}", engine.current_name());

    if engine.selection().is_empty() {
        println!("  No sections selected");
        return Ok(());
    }
    for crn in engine.selection().keys() {
        print_section_line(engine, *crn);
    }

    let units: f32 = engine.selected_sections().map(|s| s.units).sum();
    println!("Units: {}", units);

    if let Some(course) = engine.focused_course() {
        println!("Editing {}:", course);
        for schedule_type in ScheduleType::ALL {
            match engine.slot(schedule_type) {
                TypeSlot::Selected(crn) => println!("  {}: {}", schedule_type, crn),
                TypeSlot::Cleared => println!("  {}: (cleared)", schedule_type),
                TypeSlot::Empty => {}
            }
        }
    }

    Ok(())
}

pub fn select_command(engine: &mut Engine, subject: &str, number: u32) -> Result<()> {
    let key = CourseKey::new(&subject.to_ascii_uppercase(), number);
    let notices = engine.select_course(&key)?;
    print_notices(engine, &notices);
    persist(engine)
}

pub fn pick_command(engine: &mut Engine, schedule_type: &str, crn: u32) -> Result<()> {
    let schedule_type = ScheduleType::from(schedule_type.to_string());
    let notices = engine.select_section_for_type(schedule_type, crn)?;
    print_notices(engine, &notices);
    persist(engine)
}

pub fn remove_command(engine: &mut Engine, crn: u32) -> Result<()> {
    if !engine.remove_section(crn) {
        return Err(anyhow::anyhow!("Section {} is not selected", crn));
    }
    println!("✓ Removed {}", crn);
    persist(engine)
}

pub fn drop_command(engine: &mut Engine, subject: &str, number: u32) -> Result<()> {
    let key = CourseKey::new(&subject.to_ascii_uppercase(), number);
    let removed = engine.delete_course(&key);
    if removed == 0 {
        return Err(anyhow::anyhow!("{} has no selected sections", key));
    }
    println!("✓ Removed {} sections of {}", removed, key);
    persist(engine)
}

pub fn color_command(engine: &mut Engine, crn: u32, release: bool) -> Result<()> {
    if release {
        match engine.release_color(crn) {
            Some(color) => println!("✓ Released {} from {}", color, crn),
            None => println!("Section {} has no color", crn),
        }
    } else {
        match engine.assign_color(crn)? {
            Some(color) => println!("✓ {} is drawn in {}", crn, color),
            None => println!(
                "! No free color left; {} is drawn in {}",
                crn,
                engine.options().fallback_color
            ),
        }
    }
    persist(engine)
}

fn add_custom_events(engine: &mut Engine, events: Vec<CustomEventArg>) -> Result<()> {
    for event in events {
        let id = engine.add_custom_event(event.title, event.start, event.end)?;
        tracing::debug!("Added custom event {}", id);
    }
    Ok(())
}

pub fn events_command(
    engine: &mut Engine,
    date: Option<NaiveDate>,
    events: Vec<CustomEventArg>,
) -> Result<()> {
    add_custom_events(engine, events)?;
    let mut projection = match date {
        Some(date) => engine.calendar_events(date),
        None => engine.current_week_events(),
    };
    projection.events.sort_by_key(|e| e.start);

    if projection.events.is_empty() {
        println!("No events this week");
    }
    for event in &projection.events {
        println!(
            "{}  {}-{}  {:<8} {:<30} {}",
            event.start.format("%a %Y-%m-%d"),
            event.start.format("%H:%M"),
            event.end.format("%H:%M"),
            event.duration_display(),
            event.title,
            event.color
        );
    }

    if !projection.skipped_sections.is_empty() {
        println!(
            "! Sections with unreadable times were left out: {:?}",
            projection.skipped_sections
        );
    }
    if projection.unknown_days > 0 {
        println!("! {} unrecognized day code(s) ignored", projection.unknown_days);
    }

    Ok(())
}

pub fn export_command(engine: &mut Engine, params: ExportParams) -> Result<()> {
    add_custom_events(engine, params.events)?;
    let today = params.date.unwrap_or_else(|| Local::now().date_naive());

    let options = IcsOptions {
        calendar_name: params
            .calendar_name
            .or_else(|| Some(engine.current_name().to_string())),
        ..IcsOptions::default()
    };
    let ics_content = engine.export_ics(today, options)?;

    let output_file = params.output.unwrap_or_else(|| {
        let stem: String = engine
            .current_name()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
            .collect();
        PathBuf::from(format!("{}.ics", stem))
    });

    fs::write(&output_file, ics_content)?;
    println!(
        "✓ Calendar ({}) saved to: {}",
        ICS_MIME_TYPE,
        output_file.display()
    );

    Ok(())
}

pub fn list_command(engine: &Engine) -> Result<()> {
    let records = engine.timetables()?;
    if records.is_empty() {
        println!("No saved timetables");
        return Ok(());
    }

    for record in records {
        let marker = if record.name == engine.current_name() {
            "*"
        } else {
            " "
        };
        println!(
            "{} {:<24} {:>3} sections  saved {}",
            marker,
            record.name,
            record.crns.len(),
            record.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        );
    }

    Ok(())
}

pub fn save_command(engine: &mut Engine, name: &str) -> Result<()> {
    let unresolved = engine.unresolved_crns();
    if !unresolved.is_empty() {
        println!(
            "! Could not be restored, left out of the saved record: {:?}",
            unresolved
        );
    }
    engine.save_timetable(name)?;
    println!("✓ Saved \"{}\"", engine.current_name());
    Ok(())
}

pub fn load_command(engine: &mut Engine, name: &str) -> Result<()> {
    let report = engine.load_timetable(name)?;
    print_load_report(&report);
    // reopened next time, stored sections untouched
    engine.mark_recent()?;
    Ok(())
}

pub fn new_command(engine: &mut Engine) -> Result<()> {
    let name = engine.create_new_timetable()?;
    println!("✓ Started \"{}\"", name);
    persist(engine)
}

pub fn delete_command(engine: &mut Engine, name: &str) -> Result<()> {
    let was_open = engine.current_name() == name;
    engine.delete_timetable(name)?;
    println!("✓ Deleted \"{}\"", name);

    if was_open {
        println!("Now editing \"{}\"", engine.current_name());
        persist(engine)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_event_argument_parses() {
        let arg: CustomEventArg = "Gym; 2024-09-12T18:00 ;2024-09-12T19:30".parse().unwrap();
        assert_eq!(arg.title, "Gym");
        assert_eq!(arg.start.to_string(), "2024-09-12 18:00:00");
        assert_eq!((arg.end - arg.start).num_minutes(), 90);
    }

    #[test]
    fn term_argument_parses() {
        assert_eq!(parse_term("202409"), Ok(202409));
        assert_eq!(parse_term("CURRENT"), Ok(Term::current().0));
        assert!(parse_term("fall").is_err());
    }

    #[test]
    fn custom_event_argument_rejects_garbage() {
        assert!("Gym".parse::<CustomEventArg>().is_err());
        assert!("Gym;tomorrow;later".parse::<CustomEventArg>().is_err());
    }
}
