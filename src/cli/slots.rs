use anyhow::{anyhow, Result};

use crate::cli::ui::{self, confirm, report_save};
use crate::cli::{parse_time, SlotsCommand};
use crate::models::{SlotField, SlotTemplate};
use crate::session::Session;

pub fn run_slots(session: &mut Session<'_>, command: SlotsCommand) -> Result<()> {
    match command {
        SlotsCommand::Add { start } => add_slot(session, start.as_deref()),
        SlotsCommand::Set { position, field, time } => set_slot(session, position, &field, &time),
        SlotsCommand::Remove { position, force } => remove_slot(session, position, force),
        SlotsCommand::Template { name, force } => apply_template(session, &name, force),
        SlotsCommand::List => {
            list_slots(session);
            Ok(())
        }
    }
}

/// Positions on the command line are 1-based
fn to_index(session: &Session<'_>, position: usize) -> Result<usize> {
    let count = session.roster().time_slots().len();
    if position == 0 || position > count {
        return Err(anyhow!(
            "No time slot at position {} ({} slot(s) defined).",
            position,
            count
        ));
    }
    Ok(position - 1)
}

fn add_slot(session: &mut Session<'_>, start: Option<&str>) -> Result<()> {
    let start = start.map(parse_time).transpose()?;
    let (slot, report) = session.try_mutate("add time slots", |roster| {
        let slot = roster.add_time_slot(start)?;
        roster.commit_time_slots();
        Ok(slot)
    })?;
    ui::status(&format!("Added {}", slot.label()));
    report_save(&report);
    Ok(())
}

fn set_slot(session: &mut Session<'_>, position: usize, field: &str, time: &str) -> Result<()> {
    let index = to_index(session, position)?;
    let field = field.parse::<SlotField>().map_err(|e| anyhow!(e))?;
    let time = parse_time(time)?;

    let (slot, report) = session.try_mutate("edit time slots", |roster| {
        roster.update_time_slot(index, field, time)?;
        let slot = roster.time_slots()[index];
        roster.commit_time_slots();
        Ok(slot)
    })?;
    ui::status(&format!("Slot is now {}", slot.label()));
    report_save(&report);
    Ok(())
}

fn remove_slot(session: &mut Session<'_>, position: usize, force: bool) -> Result<()> {
    let index = to_index(session, position)?;
    session.identity().require_admin("remove time slots")?;

    let label = session.roster().time_slots()[index].label();
    if !confirm(&format!("Remove {} and its assignments?", label), force) {
        ui::status("Cancelled.");
        return Ok(());
    }

    let (removed, report) = session.mutate("remove time slots", |roster| {
        let removed = roster.remove_time_slot(index);
        roster.commit_time_slots();
        removed
    })?;
    let assignments = removed.map(|(_, n)| n).unwrap_or(0);
    ui::status(&format!("Removed {} ({} assignments)", label, assignments));
    report_save(&report);
    Ok(())
}

fn apply_template(session: &mut Session<'_>, name: &str, force: bool) -> Result<()> {
    let template = name.parse::<SlotTemplate>().map_err(|e| anyhow!(e))?;
    session.identity().require_admin("replace time slots")?;

    let existing = session.roster().time_slots().len();
    if existing > 0 {
        let assignments = session.roster().assignment_count();
        let prompt = format!(
            "Replace {} slot(s) and {} assignment(s) with the {} template?",
            existing,
            assignments,
            template.as_str()
        );
        if !confirm(&prompt, force) {
            ui::status("Cancelled.");
            return Ok(());
        }
    }

    let (removed, report) = session.mutate("replace time slots", |roster| {
        roster.apply_slot_template(template)
    })?;
    ui::status(&format!(
        "Applied {} template ({} slots, {} assignments removed)",
        template.as_str(),
        session.roster().time_slots().len(),
        removed
    ));
    report_save(&report);
    Ok(())
}

fn list_slots(session: &Session<'_>) {
    let slots = session.roster().time_slots();
    if slots.is_empty() {
        ui::status("No time slots yet. Add one with `slots add`.");
        return;
    }
    for (i, slot) in slots.iter().enumerate() {
        println!("{:>3}. {}", i + 1, slot.label());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::identity::{Role, StaticIdentity};
    use crate::models::TimeOfDay;

    fn admin_session(db: &Database) -> Session<'_> {
        Session::open(Box::new(StaticIdentity::new(Role::Admin, "t-1")), None, db)
    }

    fn starts(session: &Session<'_>) -> Vec<String> {
        session
            .roster()
            .time_slots()
            .iter()
            .map(|s| s.start.to_string())
            .collect()
    }

    #[test]
    fn test_add_sequential_slots() {
        let db = Database::open_memory().unwrap();
        let mut session = admin_session(&db);
        add_slot(&mut session, None).unwrap();
        add_slot(&mut session, None).unwrap();
        assert_eq!(starts(&session), ["08:00", "09:00"]);
    }

    #[test]
    fn test_add_explicit_start_sorts() {
        let db = Database::open_memory().unwrap();
        let mut session = admin_session(&db);
        add_slot(&mut session, Some("10:00")).unwrap();
        add_slot(&mut session, Some("07:30")).unwrap();
        assert_eq!(starts(&session), ["07:30", "10:00"]);
    }

    #[test]
    fn test_set_start_reorders() {
        let db = Database::open_memory().unwrap();
        let mut session = admin_session(&db);
        add_slot(&mut session, None).unwrap();
        add_slot(&mut session, None).unwrap();
        set_slot(&mut session, 2, "start", "07:00").unwrap();
        assert_eq!(starts(&session), ["07:00", "08:00"]);
        assert_eq!(session.roster().time_slots()[0].end, TimeOfDay::new(10, 0).unwrap());
    }

    #[test]
    fn test_positions_are_one_based() {
        let db = Database::open_memory().unwrap();
        let mut session = admin_session(&db);
        add_slot(&mut session, None).unwrap();
        assert!(set_slot(&mut session, 0, "end", "09:30").is_err());
        assert!(remove_slot(&mut session, 2, true).is_err());
        remove_slot(&mut session, 1, true).unwrap();
        assert!(session.roster().time_slots().is_empty());
    }

    #[test]
    fn test_template_replaces_slots_and_assignments() {
        let db = Database::open_memory().unwrap();
        let mut session = admin_session(&db);
        session
            .try_mutate("seed", |r| {
                r.add_people("Alice");
                r.add_classes("Maths");
                r.add_time_slot(None)?;
                r.set_assignment(
                    crate::models::Weekday::Monday,
                    TimeOfDay::new(8, 0).unwrap(),
                    "Alice",
                    crate::models::Assignment::new("Maths"),
                );
                Ok(())
            })
            .unwrap();

        apply_template(&mut session, "school", true).unwrap();
        assert_eq!(session.roster().time_slots().len(), 7);
        assert!(!session.roster().has_assignments());

        let cached = db.load_cached_roster("t-1").unwrap().unwrap();
        assert_eq!(cached.document.time_slots.len(), 7);
    }

    #[test]
    fn test_template_unknown_name() {
        let db = Database::open_memory().unwrap();
        let mut session = admin_session(&db);
        assert!(apply_template(&mut session, "evening", true).is_err());
        assert!(session.roster().time_slots().is_empty());
    }

    #[test]
    fn test_bad_field_rejected() {
        let db = Database::open_memory().unwrap();
        let mut session = admin_session(&db);
        add_slot(&mut session, None).unwrap();
        assert!(set_slot(&mut session, 1, "middle", "08:30").is_err());
    }
}
