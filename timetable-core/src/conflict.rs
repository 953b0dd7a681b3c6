//! Time conflict detection between sections.
//!
//! Sections without parsable days and time expand to no spans and therefore
//! never conflict. Parse failures are swallowed here; the calendar projection
//! reports them.

use crate::{
    Section, TimeSpan,
    time::{parse_days, parse_time_range},
};

/// Expands a section into one span per recognized meeting day.
pub fn time_spans(section: &Section) -> Vec<TimeSpan> {
    let Some(time) = section.time.as_deref() else {
        return Vec::new();
    };
    if section.days.trim().is_empty() {
        return Vec::new();
    }
    let Ok((start, end)) = parse_time_range(time) else {
        return Vec::new();
    };

    let start = start.minutes_since_midnight();
    let end = end.minutes_since_midnight();
    parse_days(&section.days)
        .days
        .into_iter()
        .map(|day| TimeSpan { day, start, end })
        .collect()
}

fn spans_overlap(a: &[TimeSpan], b: &[TimeSpan]) -> bool {
    a.iter().any(|x| b.iter().any(|y| x.overlaps(y)))
}

/// Whether two distinct sections meet at the same time on some day.
pub fn sections_overlap(a: &Section, b: &Section) -> bool {
    a.crn != b.crn && spans_overlap(&time_spans(a), &time_spans(b))
}

/// CRNs in `against` that overlap `candidate`. A section never conflicts with itself.
pub fn conflicting_crns<'a, I>(candidate: &Section, against: I) -> Vec<u32>
where
    I: IntoIterator<Item = &'a Section>,
{
    let candidate_spans = time_spans(candidate);
    if candidate_spans.is_empty() {
        return Vec::new();
    }

    against
        .into_iter()
        .filter(|other| other.crn != candidate.crn)
        .filter(|other| spans_overlap(&candidate_spans, &time_spans(other)))
        .map(|other| other.crn)
        .collect()
}

pub fn has_time_conflict<'a, I>(candidate: &Section, against: I) -> bool
where
    I: IntoIterator<Item = &'a Section>,
{
    !conflicting_crns(candidate, against).is_empty()
}

/// Whether any two members of a candidate batch overlap each other.
pub fn has_internal_conflict(sections: &[Section]) -> bool {
    let spans: Vec<Vec<TimeSpan>> = sections.iter().map(time_spans).collect();
    (0..sections.len()).any(|i| {
        (i + 1..sections.len())
            .any(|j| sections[i].crn != sections[j].crn && spans_overlap(&spans[i], &spans[j]))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScheduleType;

    fn section(crn: u32, days: &str, time: Option<&str>) -> Section {
        Section {
            term: 202409,
            subject: "CSC".to_string(),
            course_number: crn,
            course_name: "Course".to_string(),
            crn,
            section_label: "A01".to_string(),
            schedule_type: ScheduleType::Lecture,
            days: days.to_string(),
            time: time.map(str::to_string),
            instructor: String::new(),
            units: 1.5,
        }
    }

    #[test]
    fn overlapping_days_conflict() {
        let a = section(1, "MWF", Some("9:30am-10:20am"));
        let b = section(2, "MW", Some("10:00am-10:50am"));
        assert!(has_time_conflict(&b, [&a]));
        assert_eq!(conflicting_crns(&b, [&a]), vec![1]);
    }

    #[test]
    fn touching_boundaries_do_not_conflict() {
        let a = section(1, "TR", Some("1:00pm-2:20pm"));
        let b = section(2, "TR", Some("2:20pm-3:40pm"));
        assert!(!has_time_conflict(&b, [&a]));
        assert!(!has_time_conflict(&a, [&b]));
    }

    #[test]
    fn different_days_do_not_conflict() {
        let a = section(1, "MWF", Some("9:30am-10:20am"));
        let b = section(2, "TR", Some("9:30am-10:20am"));
        assert!(!has_time_conflict(&b, [&a]));
    }

    #[test]
    fn same_crn_is_skipped() {
        let a = section(1, "MWF", Some("9:30am-10:20am"));
        assert!(!has_time_conflict(&a, [&a]));
    }

    #[test]
    fn asynchronous_and_malformed_sections_never_conflict() {
        let a = section(1, "MWF", Some("9:30am-10:20am"));
        let async_section = section(2, "", None);
        let tba = section(3, "MWF", Some("TBA"));
        let no_days = section(4, "", Some("9:30am-10:20am"));
        for other in [&async_section, &tba, &no_days] {
            assert!(!has_time_conflict(other, [&a]));
            assert!(!has_time_conflict(&a, [other]));
        }
        assert!(time_spans(&tba).is_empty());
    }

    #[test]
    fn unknown_day_codes_are_dropped() {
        let a = section(1, "MXW", Some("9:30am-10:20am"));
        let spans = time_spans(&a);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0], TimeSpan { day: 1, start: 570, end: 620 });
    }

    #[test]
    fn internal_conflict_in_batch() {
        let lecture = section(1, "MWF", Some("9:30am-10:20am"));
        let lab = section(2, "W", Some("10:00am-12:50pm"));
        let tutorial = section(3, "R", Some("10:00am-10:50am"));
        assert!(has_internal_conflict(&[lecture.clone(), lab]));
        assert!(!has_internal_conflict(&[lecture, tutorial]));
        assert!(!has_internal_conflict(&[]));
    }

    #[test]
    fn pairwise_overlap_is_symmetric() {
        let sections = [
            section(1, "MWF", Some("9:30am-10:20am")),
            section(2, "MW", Some("10:00am-10:50am")),
            section(3, "TR", Some("1:00pm-2:20pm")),
            section(4, "T", Some("2:00pm-2:50pm")),
            section(5, "", None),
        ];
        for a in &sections {
            for b in &sections {
                assert_eq!(sections_overlap(a, b), sections_overlap(b, a));
            }
        }
    }
}
