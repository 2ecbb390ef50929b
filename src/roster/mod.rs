//! The roster aggregate: people, classes, time slots and the five-day
//! assignment grid.
//!
//! Deleting a person, class or slot removes every assignment that refers to
//! it, so the grid never points at something that no longer exists.

use std::collections::BTreeMap;

use crate::error::{Result, RosterError};
use crate::models::*;

mod document;
mod names;
mod view;

pub use document::{RosterDocument, DOCUMENT_VERSION};
pub use names::{parse_names, BulkAdd};
pub use view::{ClassCounts, ExportView};

/// Assignments for one day
pub type DaySchedule = BTreeMap<SlotKey, Assignment>;

/// Start time used when the first slot is added
pub const FIRST_SLOT_START: (u32, u32) = (8, 0);

/// Result of removing an entity and its dependent assignments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Removed {
    pub found: bool,
    pub assignments: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Roster {
    people: Vec<String>,
    classes: Vec<ClassTag>,
    time_slots: Vec<TimeSlot>,
    week: [DaySchedule; 5],
    /// Next palette position. Only grows, removals do not rewind it.
    color_index: usize,
}

// The colour counter is session state, not roster content.
impl PartialEq for Roster {
    fn eq(&self, other: &Self) -> bool {
        self.people == other.people
            && self.classes == other.classes
            && self.time_slots == other.time_slots
            && self.week == other.week
    }
}

impl Eq for Roster {}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== READ ====================

    pub fn people(&self) -> &[String] {
        &self.people
    }

    pub fn has_person(&self, name: &str) -> bool {
        self.people.iter().any(|p| p == name)
    }

    pub fn classes(&self) -> &[ClassTag] {
        &self.classes
    }

    pub fn class(&self, name: &str) -> Option<&ClassTag> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn class_color(&self, name: &str) -> Option<&str> {
        self.class(name).map(|c| c.color.as_str())
    }

    pub fn time_slots(&self) -> &[TimeSlot] {
        &self.time_slots
    }

    pub fn slot_index(&self, start: TimeOfDay) -> Option<usize> {
        self.time_slots.iter().position(|s| s.start == start)
    }

    pub fn day(&self, day: Weekday) -> &DaySchedule {
        &self.week[day.index()]
    }

    pub fn assignment(&self, day: Weekday, start: TimeOfDay, person: &str) -> Option<&Assignment> {
        self.day(day).get(&SlotKey::new(start, person))
    }

    /// True if any day holds at least one assignment
    pub fn has_assignments(&self) -> bool {
        self.week.iter().any(|d| !d.is_empty())
    }

    pub fn assignment_count(&self) -> usize {
        self.week.iter().map(|d| d.len()).sum()
    }

    // ==================== PEOPLE ====================

    /// Add people from comma/newline separated text. Names already present,
    /// or repeated in the input, are skipped.
    pub fn add_people(&mut self, raw: &str) -> BulkAdd {
        let mut result = BulkAdd::default();
        for name in parse_names(raw) {
            if self.has_person(&name) {
                result.skipped += 1;
            } else {
                self.people.push(name);
                result.added += 1;
            }
        }
        result
    }

    /// Remove a person and all their assignments. Absent names are a no-op.
    pub fn remove_person(&mut self, name: &str) -> Removed {
        let before = self.people.len();
        self.people.retain(|p| p != name);
        let assignments = self.cascade(|key, _| key.person == name);
        Removed {
            found: self.people.len() != before,
            assignments,
        }
    }

    // ==================== CLASSES ====================

    /// Add classes from comma/newline separated text. Each new class takes
    /// the next palette colour.
    pub fn add_classes(&mut self, raw: &str) -> BulkAdd {
        let mut result = BulkAdd::default();
        for name in parse_names(raw) {
            if self.class(&name).is_some() {
                result.skipped += 1;
                continue;
            }
            let color = palette_color(self.color_index).to_string();
            self.color_index += 1;
            self.classes.push(ClassTag::new(name, color));
            result.added += 1;
        }
        result
    }

    /// Remove a class, its colour, and every assignment using it
    pub fn remove_class(&mut self, name: &str) -> Removed {
        let before = self.classes.len();
        self.classes.retain(|c| c.name != name);
        let assignments = self.cascade(|_, a| a.class_name == name);
        Removed {
            found: self.classes.len() != before,
            assignments,
        }
    }

    /// Set a class colour. The value is stored as given. Returns false for
    /// an unknown class.
    pub fn set_class_color(&mut self, name: &str, color: &str) -> bool {
        match self.classes.iter_mut().find(|c| c.name == name) {
            Some(class) => {
                class.color = color.to_string();
                true
            }
            None => false,
        }
    }

    // ==================== TIME SLOTS ====================

    /// Append a slot. Without an explicit start it begins where the last
    /// slot ends, or at 08:00 for the first one, and lasts an hour.
    pub fn add_time_slot(&mut self, start: Option<TimeOfDay>) -> Result<TimeSlot> {
        let start = match (start, self.time_slots.last()) {
            (Some(start), _) => start,
            (None, Some(last)) => last.end,
            (None, None) => TimeOfDay::new(FIRST_SLOT_START.0, FIRST_SLOT_START.1)
                .unwrap_or_default(),
        };
        if self.slot_index(start).is_some() {
            return Err(RosterError::validation(format!(
                "A time slot already starts at {}",
                start
            )));
        }
        let slot = TimeSlot::starting_at(start);
        self.time_slots.push(slot);
        Ok(slot)
    }

    /// Edit one field of one slot in place. Order is left alone until
    /// [`commit_time_slots`](Self::commit_time_slots). Moving a start time
    /// carries that slot's assignments along with it.
    pub fn update_time_slot(&mut self, index: usize, field: SlotField, value: TimeOfDay) -> Result<()> {
        let current = *self
            .time_slots
            .get(index)
            .ok_or_else(|| RosterError::validation(format!("No time slot at position {}", index + 1)))?;

        match field {
            SlotField::End => {
                self.time_slots[index].end = value;
            }
            SlotField::Start => {
                if value == current.start {
                    return Ok(());
                }
                if self.slot_index(value).is_some() {
                    return Err(RosterError::validation(format!(
                        "A time slot already starts at {}",
                        value
                    )));
                }
                self.time_slots[index].start = value;
                self.rekey_start(current.start, value);
            }
        }
        Ok(())
    }

    /// Remove the slot at `index` and every assignment at its start time.
    /// Returns None if the index is out of range.
    pub fn remove_time_slot(&mut self, index: usize) -> Option<(TimeSlot, usize)> {
        if index >= self.time_slots.len() {
            return None;
        }
        let slot = self.time_slots.remove(index);
        let removed = self.cascade(|key, _| key.start == slot.start);
        Some((slot, removed))
    }

    /// Replace every slot with a template's slots. Existing slots are removed
    /// one by one so their assignments cascade. Returns how many assignments
    /// were dropped.
    pub fn apply_slot_template(&mut self, template: SlotTemplate) -> usize {
        let mut removed = 0;
        for index in (0..self.time_slots.len()).rev() {
            if let Some((_, n)) = self.remove_time_slot(index) {
                removed += n;
            }
        }
        self.time_slots = template.slots();
        self.commit_time_slots();
        removed
    }

    /// Close an edit session: order slots by start time. Stable.
    pub fn commit_time_slots(&mut self) {
        self.time_slots.sort_by_key(|s| s.start);
    }

    // ==================== ASSIGNMENTS ====================

    /// Insert or replace the assignment for one cell. The class is not
    /// checked against the class list.
    pub fn set_assignment(
        &mut self,
        day: Weekday,
        start: TimeOfDay,
        person: &str,
        assignment: Assignment,
    ) -> Option<Assignment> {
        self.week[day.index()].insert(SlotKey::new(start, person), assignment)
    }

    pub fn remove_assignment(&mut self, day: Weekday, start: TimeOfDay, person: &str) -> Option<Assignment> {
        self.week[day.index()].remove(&SlotKey::new(start, person))
    }

    // ==================== COUNTS ====================

    /// Assignments per class for a day or the whole week. Every known class
    /// is listed, in class order; assignments naming an unknown class are
    /// not counted.
    pub fn count_by_class(&self, scope: DayScope) -> ClassCounts {
        let mut counts = ClassCounts::zeroed(&self.classes);
        for day in scope.days() {
            for assignment in self.day(day).values() {
                counts.increment(&assignment.class_name);
            }
        }
        counts
    }

    pub fn export_view(&self, scope: DayScope) -> ExportView<'_> {
        ExportView {
            time_slots: &self.time_slots,
            people: &self.people,
            classes: &self.classes,
            days: scope.days().into_iter().map(|d| (d, self.day(d))).collect(),
        }
    }

    // ==================== INTERNAL ====================

    /// Drop matching assignments on every day, returning how many went
    fn cascade<F>(&mut self, matches: F) -> usize
    where
        F: Fn(&SlotKey, &Assignment) -> bool,
    {
        let mut removed = 0;
        for day in self.week.iter_mut() {
            let before = day.len();
            day.retain(|key, a| !matches(key, a));
            removed += before - day.len();
        }
        removed
    }

    fn rekey_start(&mut self, from: TimeOfDay, to: TimeOfDay) {
        for day in self.week.iter_mut() {
            let moved: Vec<SlotKey> = day.keys().filter(|k| k.start == from).cloned().collect();
            for key in moved {
                if let Some(assignment) = day.remove(&key) {
                    day.insert(SlotKey::new(to, key.person), assignment);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        TimeOfDay::parse(s).unwrap()
    }

    /// Three people, two classes, three slots, a few assignments per day
    fn sample() -> Roster {
        let mut r = Roster::new();
        r.add_people("Alice, Bob, Carol");
        r.add_classes("Maths\nArt");
        for _ in 0..3 {
            r.add_time_slot(None).unwrap();
        }
        r.set_assignment(Weekday::Monday, t("08:00"), "Alice", Assignment::new("Maths"));
        r.set_assignment(Weekday::Monday, t("09:00"), "Bob", Assignment::new("Art"));
        r.set_assignment(Weekday::Tuesday, t("08:00"), "Bob", Assignment::new("Maths"));
        r.set_assignment(Weekday::Friday, t("10:00"), "Alice", Assignment::new("Art"));
        r.set_assignment(Weekday::Friday, t("10:00"), "Carol", Assignment::new("Maths"));
        r
    }

    fn all_keys(r: &Roster) -> Vec<(Weekday, SlotKey, Assignment)> {
        Weekday::ALL
            .iter()
            .flat_map(|d| r.day(*d).iter().map(move |(k, a)| (*d, k.clone(), a.clone())))
            .collect()
    }

    #[test]
    fn test_add_people_skips_duplicates() {
        let mut r = Roster::new();
        let result = r.add_people("Alice, Bob\nAlice");
        assert_eq!(result, BulkAdd { added: 2, skipped: 1 });
        assert_eq!(r.people(), &["Alice".to_string(), "Bob".to_string()]);
    }

    #[test]
    fn test_add_people_case_sensitive() {
        let mut r = Roster::new();
        let result = r.add_people("alice\nAlice");
        assert_eq!(result.added, 2);
    }

    #[test]
    fn test_add_people_empty_input() {
        let mut r = Roster::new();
        let result = r.add_people(" , \n");
        assert!(result.is_empty_input());
        assert!(r.people().is_empty());
    }

    #[test]
    fn test_remove_person_cascades() {
        let mut r = sample();
        let removed = r.remove_person("Alice");
        assert_eq!(removed, Removed { found: true, assignments: 2 });
        assert!(!r.has_person("Alice"));
        assert!(all_keys(&r).iter().all(|(_, k, _)| k.person != "Alice"));
        assert_eq!(r.assignment_count(), 3);
    }

    #[test]
    fn test_remove_person_does_not_touch_suffix_names() {
        let mut r = Roster::new();
        r.add_people("Bob, Ann-Bob");
        r.add_classes("Maths");
        r.add_time_slot(None).unwrap();
        r.set_assignment(Weekday::Monday, t("08:00"), "Bob", Assignment::new("Maths"));
        r.set_assignment(Weekday::Monday, t("08:00"), "Ann-Bob", Assignment::new("Maths"));

        r.remove_person("Bob");
        assert!(r.assignment(Weekday::Monday, t("08:00"), "Ann-Bob").is_some());
        assert_eq!(r.assignment_count(), 1);
    }

    #[test]
    fn test_remove_person_idempotent() {
        let mut r = sample();
        r.remove_person("Bob");
        let snapshot = r.clone();
        let again = r.remove_person("Bob");
        assert_eq!(again, Removed { found: false, assignments: 0 });
        assert_eq!(r, snapshot);
    }

    #[test]
    fn test_add_classes_assigns_palette_colors() {
        let mut r = Roster::new();
        r.add_classes("Maths, Art");
        assert_eq!(r.class_color("Maths"), Some(PALETTE[0]));
        assert_eq!(r.class_color("Art"), Some(PALETTE[1]));
    }

    #[test]
    fn test_color_index_survives_removal() {
        let mut r = Roster::new();
        r.add_classes("Maths, Art");
        r.remove_class("Art");
        r.add_classes("Music");
        assert_eq!(r.class_color("Music"), Some(PALETTE[2]));
    }

    #[test]
    fn test_color_index_wraps() {
        let mut r = Roster::new();
        let names: Vec<String> = (0..11).map(|i| format!("C{}", i)).collect();
        r.add_classes(&names.join(","));
        assert_eq!(r.class_color("C10"), Some(PALETTE[0]));
    }

    #[test]
    fn test_remove_class_cascades() {
        let mut r = sample();
        let removed = r.remove_class("Maths");
        assert_eq!(removed, Removed { found: true, assignments: 3 });
        assert!(r.class("Maths").is_none());
        assert!(all_keys(&r).iter().all(|(_, _, a)| a.class_name != "Maths"));
    }

    #[test]
    fn test_set_class_color() {
        let mut r = sample();
        assert!(r.set_class_color("Art", "not-a-colour"));
        assert_eq!(r.class_color("Art"), Some("not-a-colour"));
        assert!(!r.set_class_color("Drama", "#000000"));
    }

    #[test]
    fn test_add_time_slot_defaults() {
        let mut r = Roster::new();
        let first = r.add_time_slot(None).unwrap();
        assert_eq!(first, TimeSlot::new(t("08:00"), t("09:00")));
        let second = r.add_time_slot(None).unwrap();
        assert_eq!(second.start, t("09:00"));
        assert_eq!(second.end, t("10:00"));
    }

    #[test]
    fn test_add_time_slot_override_and_wrap() {
        let mut r = Roster::new();
        let slot = r.add_time_slot(Some(t("23:30"))).unwrap();
        assert_eq!(slot.end, t("00:30"));
        let next = r.add_time_slot(None).unwrap();
        assert_eq!(next.start, t("00:30"));
        assert_eq!(next.end, t("01:30"));
    }

    #[test]
    fn test_add_time_slot_rejects_duplicate_start() {
        let mut r = Roster::new();
        r.add_time_slot(Some(t("08:00"))).unwrap();
        let err = r.add_time_slot(Some(t("08:00"))).unwrap_err();
        assert!(matches!(err, RosterError::Validation(_)));
        assert_eq!(r.time_slots().len(), 1);
    }

    #[test]
    fn test_update_time_slot_end_in_place() {
        let mut r = sample();
        r.update_time_slot(0, SlotField::End, t("08:45")).unwrap();
        assert_eq!(r.time_slots()[0].end, t("08:45"));
    }

    #[test]
    fn test_update_time_slot_start_does_not_resort() {
        let mut r = sample();
        r.update_time_slot(0, SlotField::Start, t("12:00")).unwrap();
        assert_eq!(r.time_slots()[0].start, t("12:00"));
        r.commit_time_slots();
        assert_eq!(r.time_slots()[2].start, t("12:00"));
    }

    #[test]
    fn test_update_time_slot_start_rekeys_assignments() {
        let mut r = sample();
        r.update_time_slot(0, SlotField::Start, t("07:30")).unwrap();
        assert!(r.assignment(Weekday::Monday, t("08:00"), "Alice").is_none());
        assert_eq!(
            r.assignment(Weekday::Monday, t("07:30"), "Alice").map(|a| a.class_name.as_str()),
            Some("Maths")
        );
        assert!(r.assignment(Weekday::Tuesday, t("07:30"), "Bob").is_some());
    }

    #[test]
    fn test_update_time_slot_rejects_collision_and_bad_index() {
        let mut r = sample();
        assert!(r.update_time_slot(0, SlotField::Start, t("09:00")).is_err());
        assert_eq!(r.time_slots()[0].start, t("08:00"));
        assert!(r.update_time_slot(7, SlotField::End, t("09:00")).is_err());
    }

    #[test]
    fn test_remove_time_slot_cascades() {
        let mut r = sample();
        let (slot, removed) = r.remove_time_slot(0).unwrap();
        assert_eq!(slot.start, t("08:00"));
        assert_eq!(removed, 2);
        assert!(all_keys(&r).iter().all(|(_, k, _)| k.start != t("08:00")));
        assert!(r.remove_time_slot(10).is_none());
    }

    #[test]
    fn test_commit_time_slots_idempotent() {
        let mut r = Roster::new();
        r.add_time_slot(Some(t("10:00"))).unwrap();
        r.add_time_slot(Some(t("08:00"))).unwrap();
        r.add_time_slot(Some(t("09:00"))).unwrap();
        r.commit_time_slots();
        let once = r.time_slots().to_vec();
        r.commit_time_slots();
        assert_eq!(r.time_slots(), once.as_slice());
        let starts: Vec<String> = once.iter().map(|s| s.start.to_string()).collect();
        assert_eq!(starts, vec!["08:00", "09:00", "10:00"]);
    }

    #[test]
    fn test_set_and_remove_assignment() {
        let mut r = sample();
        let previous = r.set_assignment(
            Weekday::Monday,
            t("08:00"),
            "Alice",
            Assignment::new("Art").with_duration(30),
        );
        assert_eq!(previous.map(|a| a.class_name), Some("Maths".to_string()));
        assert_eq!(r.assignment(Weekday::Monday, t("08:00"), "Alice").unwrap().duration, 30);

        assert!(r.remove_assignment(Weekday::Monday, t("08:00"), "Alice").is_some());
        assert!(r.remove_assignment(Weekday::Monday, t("08:00"), "Alice").is_none());
    }

    #[test]
    fn test_set_assignment_accepts_unknown_class() {
        let mut r = sample();
        r.set_assignment(Weekday::Monday, t("10:00"), "Bob", Assignment::new("Drama"));
        assert!(r.assignment(Weekday::Monday, t("10:00"), "Bob").is_some());
    }

    #[test]
    fn test_count_by_class_day() {
        let r = sample();
        let counts = r.count_by_class(DayScope::Day(Weekday::Monday));
        assert_eq!(counts.get("Maths"), Some(1));
        assert_eq!(counts.get("Art"), Some(1));

        let wednesday = r.count_by_class(DayScope::Day(Weekday::Wednesday));
        assert_eq!(wednesday.get("Maths"), Some(0));
        assert_eq!(wednesday.len(), 2);
    }

    #[test]
    fn test_count_by_class_week_is_sum_of_days() {
        let r = sample();
        let week = r.count_by_class(DayScope::Week);
        for class in r.classes() {
            let sum: usize = Weekday::ALL
                .iter()
                .map(|d| r.count_by_class(DayScope::Day(*d)).get(&class.name).unwrap_or(0))
                .sum();
            assert_eq!(week.get(&class.name), Some(sum));
        }
        assert_eq!(week.get("Maths"), Some(3));
        assert_eq!(week.total(), 5);
    }

    #[test]
    fn test_count_by_class_ignores_unknown_class() {
        let mut r = sample();
        r.set_assignment(Weekday::Monday, t("10:00"), "Bob", Assignment::new("Drama"));
        let week = r.count_by_class(DayScope::Week);
        assert_eq!(week.get("Drama"), None);
        assert_eq!(week.total(), 5);
    }

    #[test]
    fn test_apply_slot_template_cascades() {
        let mut r = sample();
        let removed = r.apply_slot_template(SlotTemplate::HalfDay);

        assert_eq!(removed, 5);
        assert!(!r.has_assignments());
        assert_eq!(r.time_slots(), SlotTemplate::HalfDay.slots().as_slice());
        assert_eq!(r.people().len(), 3);
        assert_eq!(r.classes().len(), 2);
    }

    #[test]
    fn test_apply_slot_template_on_empty_roster() {
        let mut r = Roster::new();
        assert_eq!(r.apply_slot_template(SlotTemplate::School), 0);
        assert_eq!(r.time_slots().len(), 7);
        assert_eq!(r.time_slots()[0].start, t("08:00"));

        // Appending continues after the template
        let next = r.add_time_slot(None).unwrap();
        assert_eq!(next.start, t("15:00"));
    }

    #[test]
    fn test_count_order_follows_class_list() {
        let r = sample();
        let counts = r.count_by_class(DayScope::Week);
        let names: Vec<&str> = counts.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Maths", "Art"]);
    }

    #[test]
    fn test_mixed_sequence_leaves_no_dangling_references() {
        let mut r = sample();
        r.add_people("Dan");
        r.set_assignment(Weekday::Thursday, t("09:00"), "Dan", Assignment::new("Art"));
        r.remove_class("Art");
        r.remove_time_slot(2);
        r.remove_person("Carol");

        for (_, key, a) in all_keys(&r) {
            assert!(r.has_person(&key.person));
            assert!(r.slot_index(key.start).is_some());
            assert!(r.class(&a.class_name).is_some());
        }
    }
}
