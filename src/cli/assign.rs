use anyhow::{anyhow, Result};

use crate::cli::ui::{self, report_save};
use crate::cli::{parse_day, parse_time, AssignCommand, AssignSetArgs};
use crate::models::{Assignment, TimeOfDay};
use crate::session::Session;

pub fn run_assign(session: &mut Session<'_>, command: AssignCommand) -> Result<()> {
    match command {
        AssignCommand::Set(args) => set_assignment(session, args),
        AssignCommand::Remove { day, start, person } => {
            remove_assignment(session, &day, &start, &person)
        }
    }
}

/// The grid only offers cells for known people and slots, and a picker of
/// known classes. The command line gets the same checks.
fn check_cell(session: &Session<'_>, start: TimeOfDay, person: &str) -> Result<()> {
    let roster = session.roster();
    if !roster.has_person(person) {
        return Err(anyhow!("No person named \"{}\".", person));
    }
    if roster.slot_index(start).is_none() {
        return Err(anyhow!("No time slot starts at {}.", start));
    }
    Ok(())
}

fn set_assignment(session: &mut Session<'_>, args: AssignSetArgs) -> Result<()> {
    let day = parse_day(&args.day)?;
    let start = parse_time(&args.start)?;
    let person = args.person.trim();
    let class = args.class.trim();

    check_cell(session, start, person)?;
    if session.roster().class(class).is_none() {
        return Err(anyhow!("No class named \"{}\".", class));
    }
    if args.duration == 0 {
        return Err(anyhow!("Duration must be at least one minute."));
    }

    let mut assignment = Assignment::new(class).with_duration(args.duration);
    if let Some(notes) = args.notes.as_deref().map(str::trim) {
        assignment = assignment.with_notes(notes);
    }

    let (previous, report) = session.mutate("edit assignments", |roster| {
        roster.set_assignment(day, start, person, assignment)
    })?;
    let verb = if previous.is_some() { "Updated" } else { "Assigned" };
    ui::status(&format!("{} {} to {} on {} at {}", verb, class, person, day.label(), start.format_12h()));
    report_save(&report);
    Ok(())
}

fn remove_assignment(session: &mut Session<'_>, day: &str, start: &str, person: &str) -> Result<()> {
    let day = parse_day(day)?;
    let start = parse_time(start)?;
    let person = person.trim();

    if session.roster().assignment(day, start, person).is_none() {
        ui::status("Nothing assigned there.");
        return Ok(());
    }
    let (removed, report) = session.mutate("edit assignments", |roster| {
        roster.remove_assignment(day, start, person)
    })?;
    if let Some(a) = removed {
        ui::status(&format!("Cleared {} for {} on {}", a.class_name, person, day.label()));
    }
    report_save(&report);
    Ok(())
}
