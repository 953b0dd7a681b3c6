use std::collections::HashMap;

use crate::{Course, CourseKey, Section};

/// Groups a flat section list into courses keyed by subject and course number.
///
/// Output order is unspecified; use [`sort_courses`] for display. A course keeps
/// the name of the first section seen for its key.
pub fn group_sections(sections: &[Section]) -> Vec<Course> {
    let mut courses: HashMap<CourseKey, Course> = HashMap::new();

    for section in sections {
        courses
            .entry(section.course_key())
            .or_insert_with(|| Course {
                subject: section.subject.clone(),
                course_number: section.course_number,
                course_name: section.course_name.clone(),
                sections: Vec::new(),
            })
            .sections
            .push(section.clone());
    }

    courses.into_values().collect()
}

/// Display order: subject, then course number.
pub fn sort_courses(courses: &mut [Course]) {
    courses.sort_by(|a, b| {
        a.subject
            .cmp(&b.subject)
            .then(a.course_number.cmp(&b.course_number))
    });
}

/// Courses whose sections disagree on the course name, with the names seen.
pub fn name_disagreements(courses: &[Course]) -> Vec<(CourseKey, Vec<String>)> {
    courses
        .iter()
        .filter_map(|course| {
            let mut names: Vec<String> = course
                .sections
                .iter()
                .map(|s| s.course_name.clone())
                .collect();
            names.sort();
            names.dedup();
            (names.len() > 1).then(|| (course.key(), names))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use super::*;
    use crate::ScheduleType;

    fn section(subject: &str, number: u32, name: &str, crn: u32) -> Section {
        Section {
            term: 202409,
            subject: subject.to_string(),
            course_number: number,
            course_name: name.to_string(),
            crn,
            section_label: "A01".to_string(),
            schedule_type: ScheduleType::Lecture,
            days: "MWF".to_string(),
            time: Some("9:30am-10:20am".to_string()),
            instructor: "TBA".to_string(),
            units: 1.5,
        }
    }

    fn catalog() -> Vec<Section> {
        vec![
            section("CSC", 225, "Algorithms I", 1),
            section("MATH", 100, "Calculus I", 2),
            section("CSC", 225, "Algorithms I", 3),
            section("CSC", 110, "Programming I", 4),
            section("MATH", 100, "Calculus I", 5),
        ]
    }

    fn shape(courses: &[Course]) -> BTreeMap<CourseKey, BTreeSet<u32>> {
        courses
            .iter()
            .map(|c| (c.key(), c.sections.iter().map(|s| s.crn).collect()))
            .collect()
    }

    #[test]
    fn groups_by_subject_and_number() {
        let mut courses = group_sections(&catalog());
        sort_courses(&mut courses);

        let keys: Vec<String> = courses.iter().map(|c| c.key().to_string()).collect();
        assert_eq!(keys, vec!["CSC-110", "CSC-225", "MATH-100"]);
        assert_eq!(courses[1].sections.len(), 2);
        assert!(courses.iter().all(|c| {
            c.sections
                .iter()
                .all(|s| s.subject == c.subject && s.course_number == c.course_number)
        }));
    }

    #[test]
    fn grouping_is_idempotent() {
        let first = group_sections(&catalog());
        let flattened: Vec<Section> = first.iter().flat_map(|c| c.sections.clone()).collect();
        let second = group_sections(&flattened);
        assert_eq!(shape(&first), shape(&second));
    }

    #[test]
    fn first_seen_name_wins() {
        let sections = vec![
            section("CSC", 225, "Algorithms I", 1),
            section("CSC", 225, "Algorithms and Data Structures I", 2),
        ];
        let courses = group_sections(&sections);
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].course_name, "Algorithms I");

        let disagreements = name_disagreements(&courses);
        assert_eq!(disagreements.len(), 1);
        assert_eq!(disagreements[0].0.as_str(), "CSC-225");
        assert_eq!(disagreements[0].1.len(), 2);
    }

    #[test]
    fn consistent_catalog_has_no_name_disagreements() {
        assert!(name_disagreements(&group_sections(&catalog())).is_empty());
    }

    #[test]
    fn empty_catalog_yields_no_courses() {
        assert!(group_sections(&[]).is_empty());
    }
}
