//! Timetable engine: the only mutation surface for selection, colors and
//! named timetables.
//!
//! Every operation either commits fully or leaves the state untouched.

use std::collections::{BTreeMap, HashMap};

use chrono::{Local, NaiveDate, NaiveDateTime, Utc};
use uuid::Uuid;

use crate::{
    CalendarEvent, Color, Course, CourseKey, EngineOptions, Error, IcsOptions, Result,
    ScheduleType, Section, TimetableRecord,
    calendar::{EventProjection, generate_events},
    color::ColorAllocator,
    conflict::{conflicting_crns, has_internal_conflict, has_time_conflict},
    grouping::{group_sections, name_disagreements, sort_courses},
    ics::IcsExporter,
    persistence::TimetableStore,
    storage::StorageBackend,
};

/// Name of the timetable in use before anything is saved.
pub const DEFAULT_TIMETABLE_NAME: &str = "My Timetable";

/// A selected section and the color it is drawn with.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionEntry {
    /// The selected catalog section
    pub section: Section,
    /// `None` when the palette was exhausted
    pub color: Option<Color>,
    serial: u64,
}

/// Per-type choice for the focused course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeSlot {
    /// Nothing chosen yet
    #[default]
    Empty,
    /// CRN of the chosen section
    Selected(u32),
    /// A choice existed and was removed
    Cleared,
}

/// Reverts one [`TimetableEngine::select_section_for_type`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoToken {
    crn: u32,
    serial: u64,
}

impl UndoToken {
    /// CRN the undone call added.
    pub const fn crn(self) -> u32 {
        self.crn
    }
}

/// User-facing outcome of a successful operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A whole course went in with these sections
    CourseSelected { course: CourseKey, crns: Vec<u32> },
    /// One section went in; `undo` takes it back out
    SectionSelected { crn: u32, undo: UndoToken },
    /// Selection went through without a distinguishing color
    PaletteExhausted { course: CourseKey },
}

/// What a load restored and what it had to leave out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Name of the timetable now open
    pub name: String,
    /// CRNs put back on the timetable, in stored order
    pub restored: Vec<u32>,
    /// CRNs no longer present in the catalog
    pub dropped_crns: Vec<u32>,
    /// CRNs that would overlap or duplicate an already restored section
    pub rejected_crns: Vec<u32>,
}

/// Selection state over one catalog, backed by a timetable store.
pub struct TimetableEngine<S: StorageBackend> {
    options: EngineOptions,
    courses: Vec<Course>,
    crn_index: HashMap<u32, (usize, usize)>,
    selection: BTreeMap<u32, SelectionEntry>,
    slots: BTreeMap<ScheduleType, TypeSlot>,
    focused: Option<CourseKey>,
    colors: ColorAllocator,
    custom_events: Vec<CalendarEvent>,
    store: TimetableStore<S>,
    current_name: String,
    /// Stored CRNs the last load could not put back, with their saved colors
    unresolved: BTreeMap<u32, Option<Color>>,
    next_serial: u64,
}

impl<S: StorageBackend> TimetableEngine<S> {
    /// Builds an engine with an empty selection. Nothing is read from storage.
    pub fn new(sections: &[Section], storage: S, options: EngineOptions) -> Self {
        let colors = ColorAllocator::new(options.palette.clone());
        let mut engine = Self {
            options,
            courses: Vec::new(),
            crn_index: HashMap::new(),
            selection: BTreeMap::new(),
            slots: BTreeMap::new(),
            focused: None,
            colors,
            custom_events: Vec::new(),
            store: TimetableStore::new(storage),
            current_name: DEFAULT_TIMETABLE_NAME.to_string(),
            unresolved: BTreeMap::new(),
            next_serial: 0,
        };
        engine.set_catalog(sections);
        engine
    }

    /// Builds an engine and restores the most recent stored timetable.
    pub fn open(
        sections: &[Section],
        storage: S,
        options: EngineOptions,
    ) -> Result<(Self, Option<LoadReport>)> {
        let mut engine = Self::new(sections, storage, options);
        let report = engine.restore_latest()?;
        Ok((engine, report))
    }

    /// Regroups the catalog. Selected sections are kept as they are.
    pub fn set_catalog(&mut self, sections: &[Section]) {
        let mut courses = group_sections(sections);
        sort_courses(&mut courses);

        for (key, names) in name_disagreements(&courses) {
            tracing::warn!("Course {} has conflicting names {:?}", key, names);
        }

        self.crn_index = courses
            .iter()
            .enumerate()
            .flat_map(|(ci, course)| {
                course
                    .sections
                    .iter()
                    .enumerate()
                    .map(move |(si, section)| (section.crn, (ci, si)))
            })
            .collect();
        self.courses = courses;
        tracing::debug!(
            "Catalog loaded: {} courses, {} sections",
            self.courses.len(),
            self.crn_index.len()
        );
    }

    /// Catalog courses sorted by subject and number.
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Looks up a course by key.
    pub fn course(&self, key: &CourseKey) -> Option<&Course> {
        self.courses.iter().find(|c| &c.key() == key)
    }

    /// Looks up a catalog section by CRN.
    pub fn find_section(&self, crn: u32) -> Option<&Section> {
        let &(ci, si) = self.crn_index.get(&crn)?;
        self.courses.get(ci)?.sections.get(si)
    }

    /// Options the engine was built with.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    // ---- selection state ----

    /// Selected sections keyed by CRN.
    pub fn selection(&self) -> &BTreeMap<u32, SelectionEntry> {
        &self.selection
    }

    /// Selected sections in CRN order.
    pub fn selected_sections(&self) -> impl Iterator<Item = &Section> {
        self.selection.values().map(|e| &e.section)
    }

    /// Whether a CRN is on the timetable.
    pub fn is_selected(&self, crn: u32) -> bool {
        self.selection.contains_key(&crn)
    }

    /// Choice for one schedule type of the focused course.
    pub fn slot(&self, schedule_type: ScheduleType) -> TypeSlot {
        self.slots.get(&schedule_type).copied().unwrap_or_default()
    }

    /// Course whose type slots are being edited.
    pub fn focused_course(&self) -> Option<&CourseKey> {
        self.focused.as_ref()
    }

    /// CRN to color, for every colored selected section.
    pub fn color_assignments(&self) -> BTreeMap<u32, Color> {
        self.selection
            .iter()
            .filter_map(|(crn, e)| e.color.clone().map(|c| (*crn, c)))
            .collect()
    }

    /// Palette ownership, read-only.
    pub fn color_allocator(&self) -> &ColorAllocator {
        &self.colors
    }

    /// Color of a selected section.
    pub fn color_of(&self, crn: u32) -> Option<&Color> {
        self.selection.get(&crn)?.color.as_ref()
    }

    /// Selects a course with the first-labelled section of each schedule type.
    ///
    /// Prior selections of the same course are replaced. If the batch overlaps
    /// itself or the rest of the selection nothing changes.
    pub fn select_course(&mut self, key: &CourseKey) -> Result<Vec<Notice>> {
        let course = self
            .course(key)
            .ok_or_else(|| Error::UnknownCourse(key.to_string()))?;

        let batch: Vec<Section> = course
            .schedule_types()
            .into_iter()
            .filter_map(|ty| {
                course
                    .sections_of_type(ty)
                    .into_iter()
                    .find(|s| self.options.term.is_none_or(|term| s.term == term))
                    .cloned()
            })
            .collect();

        if batch.is_empty() {
            tracing::warn!("Course {} has no sections to select", key);
            return Err(Error::NoSections(key.to_string()));
        }

        if has_internal_conflict(&batch) {
            let (candidate, conflicting) = batch
                .iter()
                .enumerate()
                .find_map(|(i, s)| {
                    let hits = conflicting_crns(s, &batch[i + 1..]);
                    (!hits.is_empty()).then_some((s.crn, hits))
                })
                .unwrap_or_default();
            tracing::warn!("Course {} conflicts with itself", key);
            return Err(Error::Conflict {
                candidate,
                conflicting,
            });
        }

        let others: Vec<&Section> = self
            .selected_sections()
            .filter(|s| &s.course_key() != key)
            .collect();
        for candidate in &batch {
            let conflicting = conflicting_crns(candidate, others.iter().copied());
            if !conflicting.is_empty() {
                tracing::warn!(
                    "Course {} rejected: CRN {} conflicts with {:?}",
                    key,
                    candidate.crn,
                    conflicting
                );
                return Err(Error::Conflict {
                    candidate: candidate.crn,
                    conflicting,
                });
            }
        }

        let prior_color = self.colors.color_of(key).cloned();
        let prior: Vec<u32> = self.crns_of_course(key);
        for crn in prior {
            self.detach(crn);
        }

        let mut notices = Vec::new();
        let mut exhausted = false;
        self.focused = Some(key.clone());
        self.slots.clear();
        let crns: Vec<u32> = batch.iter().map(|s| s.crn).collect();
        for section in batch {
            let crn = section.crn;
            self.slots.insert(section.schedule_type, TypeSlot::Selected(crn));
            self.attach(section);
            exhausted |= self.assign_color_preferring(crn, prior_color.as_ref()).is_none();
        }

        tracing::debug!("Selected course {} with sections {:?}", key, crns);
        notices.push(Notice::CourseSelected {
            course: key.clone(),
            crns,
        });
        if exhausted {
            notices.push(Notice::PaletteExhausted {
                course: key.clone(),
            });
        }
        Ok(notices)
    }

    /// Chooses one section of a type, replacing the course's previous choice of that type.
    pub fn select_section_for_type(
        &mut self,
        schedule_type: ScheduleType,
        crn: u32,
    ) -> Result<Vec<Notice>> {
        let section = self
            .find_section(crn)
            .cloned()
            .ok_or(Error::UnknownSection(crn))?;
        if section.schedule_type != schedule_type {
            return Err(Error::TypeMismatch {
                crn,
                expected: schedule_type.to_string(),
                actual: section.schedule_type.to_string(),
            });
        }
        let key = section.course_key();

        if self.is_selected(crn) {
            self.focus(&key);
            self.slots.insert(schedule_type, TypeSlot::Selected(crn));
            return Ok(Vec::new());
        }

        let prior = self.selection.values().find_map(|e| {
            (e.section.course_key() == key && e.section.schedule_type == schedule_type)
                .then_some(e.section.crn)
        });

        let conflicting = conflicting_crns(
            &section,
            self.selected_sections().filter(|s| Some(s.crn) != prior),
        );
        if !conflicting.is_empty() {
            tracing::warn!("CRN {} rejected: conflicts with {:?}", crn, conflicting);
            return Err(Error::Conflict {
                candidate: crn,
                conflicting,
            });
        }

        let mut preferred = self.colors.color_of(&key).cloned();
        if let Some(prior) = prior {
            if let Some(entry) = self.detach(prior) {
                preferred = entry.color.or(preferred);
            }
        }

        self.focus(&key);
        self.slots.insert(schedule_type, TypeSlot::Selected(crn));
        let serial = self.attach(section);
        let mut notices = vec![Notice::SectionSelected {
            crn,
            undo: UndoToken { crn, serial },
        }];
        if self.assign_color_preferring(crn, preferred.as_ref()).is_none() {
            notices.push(Notice::PaletteExhausted { course: key });
        }
        tracing::debug!("Selected {} CRN {}", schedule_type, crn);
        Ok(notices)
    }

    /// Removes the section added by the call that produced `token`, if it is still there.
    pub fn undo(&mut self, token: UndoToken) -> bool {
        let current = self
            .selection
            .get(&token.crn)
            .is_some_and(|e| e.serial == token.serial);
        current && self.remove_section(token.crn)
    }

    /// Removes one selected section and clears its type slot. Returns `false` if it was not selected.
    pub fn remove_section(&mut self, crn: u32) -> bool {
        if self.detach(crn).is_none() {
            return false;
        }
        for slot in self.slots.values_mut() {
            if *slot == TypeSlot::Selected(crn) {
                *slot = TypeSlot::Cleared;
            }
        }
        tracing::debug!("Removed CRN {}", crn);
        true
    }

    /// Removes every selected section of a course. Returns how many were removed.
    pub fn delete_course(&mut self, key: &CourseKey) -> usize {
        let crns = self.crns_of_course(key);
        for &crn in &crns {
            self.remove_section(crn);
        }
        if self.focused.as_ref() == Some(key) {
            self.focused = None;
            self.slots.clear();
        }
        tracing::debug!("Deleted course {} ({} sections)", key, crns.len());
        crns.len()
    }

    /// Gives a selected section its course's color, or the first free one.
    /// `Ok(None)` means the palette is exhausted.
    pub fn assign_color(&mut self, crn: u32) -> Result<Option<Color>> {
        if !self.is_selected(crn) {
            return Err(Error::UnknownSection(crn));
        }
        Ok(self.assign_color_preferring(crn, None))
    }

    /// Drops a section's color and frees it once no section of the course uses it.
    pub fn release_color(&mut self, crn: u32) -> Option<Color> {
        let entry = self.selection.get_mut(&crn)?;
        let color = entry.color.take()?;
        let key = entry.section.course_key();

        let still_used = self.selection.values().any(|e| {
            e.section.crn != crn
                && e.color.as_ref() == Some(&color)
                && e.section.course_key() == key
        });
        if !still_used {
            self.colors.release(&color, &key);
        }
        Some(color)
    }

    fn assign_color_preferring(&mut self, crn: u32, preferred: Option<&Color>) -> Option<Color> {
        let entry = self.selection.get(&crn)?;
        if let Some(color) = &entry.color {
            return Some(color.clone());
        }
        let key = entry.section.course_key();
        let sibling = self
            .selection
            .values()
            .find(|e| e.section.crn != crn && e.section.course_key() == key)
            .and_then(|e| e.color.clone());

        let color = self.colors.claim(&key, sibling.as_ref().or(preferred));
        if color.is_none() {
            tracing::warn!("Color palette exhausted, {} left uncolored", key);
        }
        if let Some(entry) = self.selection.get_mut(&crn) {
            entry.color.clone_from(&color);
        }
        color
    }

    fn attach(&mut self, section: Section) -> u64 {
        self.next_serial += 1;
        let serial = self.next_serial;
        self.selection.insert(
            section.crn,
            SelectionEntry {
                section,
                color: None,
                serial,
            },
        );
        serial
    }

    /// Removes a section and releases its color. The only removal path.
    fn detach(&mut self, crn: u32) -> Option<SelectionEntry> {
        let color = self.release_color(crn);
        let mut entry = self.selection.remove(&crn)?;
        entry.color = color;
        Some(entry)
    }

    fn crns_of_course(&self, key: &CourseKey) -> Vec<u32> {
        self.selection
            .values()
            .filter(|e| &e.section.course_key() == key)
            .map(|e| e.section.crn)
            .collect()
    }

    /// Moving focus rebuilds the slots from the course's selected sections.
    fn focus(&mut self, key: &CourseKey) {
        if self.focused.as_ref() == Some(key) {
            return;
        }
        self.focused = Some(key.clone());
        self.slots = self
            .selection
            .values()
            .filter(|e| &e.section.course_key() == key)
            .map(|e| (e.section.schedule_type, TypeSlot::Selected(e.section.crn)))
            .collect();
    }

    fn reset_selection(&mut self) {
        self.selection.clear();
        self.unresolved.clear();
        self.slots.clear();
        self.focused = None;
        self.colors.clear();
    }

    // ---- calendar ----

    /// Calendar events for the week containing `today`, custom events included.
    pub fn calendar_events(&self, today: NaiveDate) -> EventProjection {
        let mut projection = generate_events(
            self.selected_sections(),
            &self.color_assignments(),
            &self.options.fallback_color,
            today,
        );
        projection
            .events
            .extend(self.custom_events.iter().cloned());
        projection
    }

    /// [`Self::calendar_events`] for the local current week.
    pub fn current_week_events(&self) -> EventProjection {
        self.calendar_events(Local::now().date_naive())
    }

    /// Renders this week's events as an ICS document.
    pub fn export_ics(&self, today: NaiveDate, options: IcsOptions) -> Result<String> {
        let projection = self.calendar_events(today);
        IcsExporter::new(options).export(&projection.events)
    }

    /// Ad hoc events added in this session.
    pub fn custom_events(&self) -> &[CalendarEvent] {
        &self.custom_events
    }

    /// Adds an ad hoc event and returns its id.
    pub fn add_custom_event(
        &mut self,
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<String> {
        if end <= start {
            return Err(Error::Format(format!("{start} - {end}")));
        }
        let id = Uuid::new_v4().to_string();
        self.custom_events.push(CalendarEvent {
            id: id.clone(),
            title: title.into(),
            start,
            end,
            color: self.options.fallback_color.clone(),
            crn: None,
        });
        Ok(id)
    }

    /// Drag or resize. Events generated from sections are refused.
    pub fn move_event(
        &mut self,
        event: &CalendarEvent,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<()> {
        if !event.is_editable() {
            return Err(Error::NotEditable(event.id.clone()));
        }
        if end <= start {
            return Err(Error::Format(format!("{start} - {end}")));
        }
        let custom = self
            .custom_events
            .iter_mut()
            .find(|e| e.id == event.id)
            .ok_or_else(|| Error::EventNotFound(event.id.clone()))?;
        custom.start = start;
        custom.end = end;
        Ok(())
    }

    /// Deletes an ad hoc event. Returns `false` for unknown ids.
    pub fn remove_custom_event(&mut self, id: &str) -> bool {
        let before = self.custom_events.len();
        self.custom_events.retain(|e| e.id != id);
        self.custom_events.len() != before
    }

    // ---- persistence ----

    /// Name the open timetable is saved under.
    pub fn current_name(&self) -> &str {
        &self.current_name
    }

    /// Every stored timetable, oldest first.
    pub fn timetables(&self) -> Result<Vec<TimetableRecord>> {
        self.store.records()
    }

    /// Underlying timetable store.
    pub fn store(&self) -> &TimetableStore<S> {
        &self.store
    }

    /// Gives the storage backend back.
    pub fn into_storage(self) -> S {
        self.store.into_inner()
    }

    /// Saves the selection under `name`. Overwriting is only allowed for the
    /// timetable currently open.
    ///
    /// The record holds exactly the current selection, so CRNs the last load
    /// could not restore are gone from it afterwards.
    pub fn save_timetable(&mut self, name: &str) -> Result<()> {
        let name = normalize_name(name)?;
        if name != self.current_name && self.store.find(name)?.is_some() {
            return Err(Error::DuplicateName(name.to_string()));
        }

        let record = self.snapshot(name, false);
        self.store.upsert(record)?;
        self.current_name = name.to_string();
        self.unresolved.clear();
        Ok(())
    }

    /// Writes the open timetable back under its current name, keeping the
    /// stored CRNs the last load could not restore.
    pub fn autosave(&mut self) -> Result<()> {
        if !self.unresolved.is_empty() {
            tracing::warn!(
                "Keeping {} unrestored CRN(s) in \"{}\": {:?}",
                self.unresolved.len(),
                self.current_name,
                self.unresolved.keys().collect::<Vec<_>>()
            );
        }
        let record = self.snapshot(&self.current_name, true);
        self.store.upsert(record)?;
        Ok(())
    }

    /// Moves the open timetable to the end of the stored list without
    /// rewriting its sections, so it is the one restored next time.
    pub fn mark_recent(&mut self) -> Result<()> {
        self.store.touch(&self.current_name)
    }

    /// Stored CRNs the last load left out, either missing from the catalog or
    /// overlapping the restored sections.
    pub fn unresolved_crns(&self) -> Vec<u32> {
        self.unresolved.keys().copied().collect()
    }

    fn snapshot(&self, name: &str, keep_unresolved: bool) -> TimetableRecord {
        let mut crns: Vec<u32> = self.selection.keys().copied().collect();
        let mut colors = self.color_assignments();
        if keep_unresolved {
            for (&crn, color) in &self.unresolved {
                if self.is_selected(crn) {
                    continue;
                }
                crns.push(crn);
                if let Some(color) = color {
                    colors.insert(crn, color.clone());
                }
            }
        }
        TimetableRecord {
            name: name.to_string(),
            crns,
            colors,
            timestamp: Utc::now(),
        }
    }

    /// Replaces the selection with a stored timetable. CRNs missing from the
    /// catalog are dropped and reported, not treated as errors.
    pub fn load_timetable(&mut self, name: &str) -> Result<LoadReport> {
        let name = normalize_name(name)?;
        let record = self
            .store
            .find(name)?
            .ok_or_else(|| Error::TimetableNotFound(name.to_string()))?;

        let mut report = self.restore(&record.crns, |crn, _| record.colors.get(&crn).cloned());
        for (crn, color) in &mut self.unresolved {
            *color = record.colors.get(crn).cloned();
        }
        self.current_name = record.name.clone();
        report.name = record.name;
        tracing::info!(
            "Loaded timetable \"{}\": {} restored, {} dropped",
            report.name,
            report.restored.len(),
            report.dropped_crns.len()
        );
        Ok(report)
    }

    /// Loads the single-slot record written before named timetables existed.
    pub fn load_legacy_timetable(&mut self) -> Result<Option<LoadReport>> {
        let Some(legacy) = self.store.legacy()? else {
            return Ok(None);
        };
        let mut report = self.restore(&legacy.crns, |_, key| {
            legacy.colors.get(key.as_str()).cloned()
        });
        report.name.clone_from(&self.current_name);
        tracing::info!(
            "Loaded legacy timetable: {} restored, {} dropped",
            report.restored.len(),
            report.dropped_crns.len()
        );
        Ok(Some(report))
    }

    /// Opens the most recently saved timetable, falling back to the legacy record.
    pub fn restore_latest(&mut self) -> Result<Option<LoadReport>> {
        if let Some(latest) = self.store.latest()? {
            return self.load_timetable(&latest.name).map(Some);
        }
        if self.store.has_records()? {
            return Ok(None);
        }
        self.load_legacy_timetable()
    }

    /// Clears the selection and names it `Timetable N`.
    pub fn create_new_timetable(&mut self) -> Result<String> {
        let records = self.store.records()?;
        let mut n = records.len() + 1;
        let name = loop {
            let candidate = format!("Timetable {n}");
            if !records.iter().any(|r| r.name == candidate) {
                break candidate;
            }
            n += 1;
        };

        self.reset_selection();
        self.current_name.clone_from(&name);
        tracing::info!("Created timetable \"{}\"", name);
        Ok(name)
    }

    /// Deletes a stored timetable. Deleting the open one switches to the first
    /// remaining timetable, or a fresh one if none are left.
    pub fn delete_timetable(&mut self, name: &str) -> Result<()> {
        let name = normalize_name(name)?;
        let remaining = self.store.remove(name)?;
        if name == self.current_name {
            match remaining.first() {
                Some(first) => {
                    self.load_timetable(&first.name)?;
                }
                None => {
                    self.create_new_timetable()?;
                }
            }
        }
        Ok(())
    }

    fn restore<F>(&mut self, crns: &[u32], saved_color: F) -> LoadReport
    where
        F: Fn(u32, &CourseKey) -> Option<Color>,
    {
        self.reset_selection();
        let mut report = LoadReport::default();

        for &crn in crns {
            let Some(section) = self.find_section(crn).cloned() else {
                report.dropped_crns.push(crn);
                continue;
            };
            let key = section.course_key();
            let duplicate_type = self.selected_sections().any(|s| {
                s.crn == crn
                    || (s.course_key() == key && s.schedule_type == section.schedule_type)
            });
            if duplicate_type || has_time_conflict(&section, self.selected_sections()) {
                report.rejected_crns.push(crn);
                continue;
            }

            self.attach(section);
            let saved = saved_color(crn, &key).filter(|c| self.colors.adopt(&key, c));
            match saved {
                Some(color) => {
                    if let Some(entry) = self.selection.get_mut(&crn) {
                        entry.color = Some(color);
                    }
                }
                None => {
                    self.assign_color_preferring(crn, None);
                }
            }
            report.restored.push(crn);
        }

        for &crn in report.dropped_crns.iter().chain(&report.rejected_crns) {
            self.unresolved.insert(crn, None);
        }

        if !report.dropped_crns.is_empty() {
            tracing::warn!(
                "Dropped {} CRN(s) no longer in the catalog: {:?}",
                report.dropped_crns.len(),
                report.dropped_crns
            );
        }
        if !report.rejected_crns.is_empty() {
            tracing::warn!(
                "Skipped {} CRN(s) that overlap the restored selection: {:?}",
                report.rejected_crns.len(),
                report.rejected_crns
            );
        }
        report
    }
}

/// Trimmed timetable name; blank names are refused.
fn normalize_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidName);
    }
    Ok(name)
}
