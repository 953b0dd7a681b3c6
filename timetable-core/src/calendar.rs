use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};

use crate::{
    CalendarEvent, Color, Error, Result, Section,
    time::{parse_days, parse_time_range, resolve_weekday_date},
};

/// Events generated for a selection, plus what had to be left out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventProjection {
    pub events: Vec<CalendarEvent>,
    /// CRNs whose time could not be parsed
    pub skipped_sections: Vec<u32>,
    /// Day codes that matched no weekday, across all sections
    pub unknown_days: usize,
}

/// Events for one section in the week containing `today`.
///
/// Asynchronous sections (no time) yield no events; a malformed time is an error.
pub fn section_events(
    section: &Section,
    color: &Color,
    today: NaiveDate,
) -> Result<(Vec<CalendarEvent>, usize)> {
    let Some(time) = section.time.as_deref().filter(|t| !t.trim().is_empty()) else {
        return Ok((Vec::new(), 0));
    };
    let (start, end) = parse_time_range(time)?;
    let start = start
        .to_naive_time()
        .ok_or_else(|| Error::Format(time.to_string()))?;
    let end = end
        .to_naive_time()
        .ok_or_else(|| Error::Format(time.to_string()))?;

    let parsed = parse_days(&section.days);
    let events = parsed
        .days
        .iter()
        .map(|&day| {
            let date = resolve_weekday_date(day, today);
            CalendarEvent {
                id: format!("{}-{}", section.crn, day),
                title: section.event_title(),
                start: NaiveDateTime::new(date, start),
                end: NaiveDateTime::new(date, end),
                color: color.clone(),
                crn: Some(section.crn),
            }
        })
        .collect();

    Ok((events, parsed.unknown))
}

/// Projects selected sections onto the week containing `today`.
///
/// A section that fails to parse is skipped with a warning; the rest still render.
pub fn generate_events<'a, I>(
    sections: I,
    colors: &BTreeMap<u32, Color>,
    fallback: &Color,
    today: NaiveDate,
) -> EventProjection
where
    I: IntoIterator<Item = &'a Section>,
{
    let mut projection = EventProjection::default();

    for section in sections {
        let color = colors.get(&section.crn).unwrap_or(fallback);
        match section_events(section, color, today) {
            Ok((events, unknown)) => {
                if unknown > 0 {
                    tracing::warn!(
                        "Section CRN {} has {} unrecognized day code(s) in {:?}",
                        section.crn,
                        unknown,
                        section.days
                    );
                }
                projection.unknown_days += unknown;
                projection.events.extend(events);
            }
            Err(e) => {
                tracing::warn!("Skipping section CRN {}: {}", section.crn, e);
                projection.skipped_sections.push(section.crn);
            }
        }
    }

    projection
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Weekday};

    use super::*;
    use crate::ScheduleType;

    fn section(crn: u32, days: &str, time: Option<&str>) -> Section {
        Section {
            term: 202409,
            subject: "CSC".to_string(),
            course_number: 225,
            course_name: "Algorithms I".to_string(),
            crn,
            section_label: "A01".to_string(),
            schedule_type: ScheduleType::Lecture,
            days: days.to_string(),
            time: time.map(str::to_string),
            instructor: String::new(),
            units: 1.5,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 11).unwrap()
    }

    #[test]
    fn one_event_per_meeting_day() {
        let sections = [section(10, "MWF", Some("9:30 am - 10:20 am"))];
        let mut colors = BTreeMap::new();
        colors.insert(10, Color::new("#039be5"));

        let projection = generate_events(&sections, &colors, &Color::new("#3c4043"), today());
        assert_eq!(projection.events.len(), 3);
        assert!(projection.skipped_sections.is_empty());

        let weekdays: Vec<Weekday> = projection
            .events
            .iter()
            .map(|e| e.start.weekday())
            .collect();
        assert_eq!(weekdays, vec![Weekday::Mon, Weekday::Wed, Weekday::Fri]);

        let monday = &projection.events[0];
        assert_eq!(monday.title, "CSC 225 - Lecture");
        assert_eq!(monday.color.as_str(), "#039be5");
        assert_eq!(monday.crn, Some(10));
        assert_eq!(monday.start.to_string(), "2024-09-09 09:30:00");
        assert_eq!((monday.end - monday.start).num_minutes(), 50);
        assert!(!monday.is_editable());
    }

    #[test]
    fn malformed_sections_are_skipped_not_fatal() {
        let sections = [
            section(1, "MWF", Some("9:30am-10:20am")),
            section(2, "TR", Some("9:30 until 10:20")),
            section(3, "TR", Some("25:00pm-26:00pm")),
            section(4, "", None),
        ];
        let projection =
            generate_events(&sections, &BTreeMap::new(), &Color::new("#3c4043"), today());
        assert_eq!(projection.events.len(), 3);
        assert_eq!(projection.skipped_sections, vec![2, 3]);
        assert!(projection.events.iter().all(|e| e.color.as_str() == "#3c4043"));
    }

    #[test]
    fn unknown_days_are_counted() {
        let sections = [section(1, "MXZ", Some("9:30am-10:20am"))];
        let projection =
            generate_events(&sections, &BTreeMap::new(), &Color::new("#3c4043"), today());
        assert_eq!(projection.events.len(), 1);
        assert_eq!(projection.unknown_days, 2);
    }

    #[test]
    fn en_dash_separator_accepted() {
        let (events, _) = section_events(
            &section(1, "U", Some("1:00 pm\u{2013}3:50 pm")),
            &Color::new("#fff"),
            today(),
        )
        .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].start.to_string(), "2024-09-08 13:00:00");
        assert_eq!(events[0].end.to_string(), "2024-09-08 15:50:00");
    }
}
