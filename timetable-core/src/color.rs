use std::collections::BTreeMap;

use crate::{Color, CourseKey};

/// Hands out palette colors to courses. A color is owned by at most one course.
#[derive(Debug, Clone)]
pub struct ColorAllocator {
    palette: Vec<Color>,
    owners: BTreeMap<Color, CourseKey>,
}

impl ColorAllocator {
    pub fn new(palette: Vec<Color>) -> Self {
        Self {
            palette,
            owners: BTreeMap::new(),
        }
    }

    /// Claims a color for `course`.
    ///
    /// `preferred` wins when it is free or already owned by `course`; otherwise the
    /// first free palette entry is taken. `None` means the palette is exhausted.
    pub fn claim(&mut self, course: &CourseKey, preferred: Option<&Color>) -> Option<Color> {
        if let Some(color) = preferred {
            if self.adopt(course, color) {
                return Some(color.clone());
            }
        }

        let color = self
            .palette
            .iter()
            .find(|c| !self.owners.contains_key(*c))?
            .clone();
        self.owners.insert(color.clone(), course.clone());
        Some(color)
    }

    /// Records `course` as owner of `color` unless another course holds it.
    /// Colors outside the palette are accepted, so restored timetables keep their look.
    pub fn adopt(&mut self, course: &CourseKey, color: &Color) -> bool {
        match self.owners.get(color) {
            Some(owner) => owner == course,
            None => {
                self.owners.insert(color.clone(), course.clone());
                true
            }
        }
    }

    /// Returns `color` to the free pool if `course` owns it.
    pub fn release(&mut self, color: &Color, course: &CourseKey) -> bool {
        if self.owners.get(color) == Some(course) {
            self.owners.remove(color);
            tracing::debug!("Released color {} from {}", color, course);
            true
        } else {
            false
        }
    }

    pub fn owner(&self, color: &Color) -> Option<&CourseKey> {
        self.owners.get(color)
    }

    pub fn color_of(&self, course: &CourseKey) -> Option<&Color> {
        self.owners
            .iter()
            .find_map(|(color, owner)| (owner == course).then_some(color))
    }

    pub fn owners(&self) -> &BTreeMap<Color, CourseKey> {
        &self.owners
    }

    pub fn free_colors(&self) -> impl Iterator<Item = &Color> {
        self.palette
            .iter()
            .filter(|c| !self.owners.contains_key(*c))
    }

    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    pub fn clear(&mut self) {
        self.owners.clear();
    }
}

impl Default for ColorAllocator {
    fn default() -> Self {
        Self::new(crate::EngineOptions::default().palette)
    }
}
