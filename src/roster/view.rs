use crate::models::{Assignment, ClassTag, SlotKey, TimeOfDay, TimeSlot, Weekday};

use super::DaySchedule;

/// Per-class assignment totals, in class-list order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassCounts {
    entries: Vec<(String, usize)>,
}

impl ClassCounts {
    pub(crate) fn zeroed(classes: &[ClassTag]) -> Self {
        Self {
            entries: classes.iter().map(|c| (c.name.clone(), 0)).collect(),
        }
    }

    /// Count one assignment. Unknown class names are ignored.
    pub(crate) fn increment(&mut self, class_name: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| n == class_name) {
            entry.1 += 1;
        }
    }

    pub fn get(&self, class_name: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(n, _)| n == class_name)
            .map(|(_, c)| *c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(n, c)| (n.as_str(), *c))
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read-only snapshot handed to renderers and exporters. Holds everything
/// needed to lay out a grid without going back to the roster.
#[derive(Debug, Clone)]
pub struct ExportView<'a> {
    pub time_slots: &'a [TimeSlot],
    pub people: &'a [String],
    pub classes: &'a [ClassTag],
    pub days: Vec<(Weekday, &'a DaySchedule)>,
}

impl<'a> ExportView<'a> {
    pub fn schedule(&self, day: Weekday) -> Option<&'a DaySchedule> {
        self.days.iter().find(|(d, _)| *d == day).map(|(_, s)| *s)
    }

    pub fn assignment(&self, day: Weekday, start: TimeOfDay, person: &str) -> Option<&'a Assignment> {
        self.schedule(day)?.get(&SlotKey::new(start, person))
    }

    pub fn class(&self, name: &str) -> Option<&'a ClassTag> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn has_assignments(&self) -> bool {
        self.days.iter().any(|(_, s)| !s.is_empty())
    }
}
