use anyhow::{anyhow, Result};
use crossterm::style::{Color, Stylize};

use crate::cli::ui::{self, confirm, report_save};
use crate::cli::{join_names, ClassesCommand};
use crate::models::{ClassTag, DayScope};
use crate::roster::parse_names;
use crate::session::Session;

pub fn run_classes(session: &mut Session<'_>, command: ClassesCommand) -> Result<()> {
    match command {
        ClassesCommand::Add { names } => add_classes(session, &join_names(&names)),
        ClassesCommand::Remove { name, force } => remove_class(session, &name, force),
        ClassesCommand::Color { name, color } => set_color(session, &name, &color),
        ClassesCommand::List => {
            list_classes(session);
            Ok(())
        }
    }
}

fn add_classes(session: &mut Session<'_>, raw: &str) -> Result<()> {
    if parse_names(raw).is_empty() {
        return Err(anyhow!("No class names given."));
    }
    let (added, report) = session.mutate("add classes", |roster| roster.add_classes(raw))?;
    ui::status(&added.summary("class", "classes"));
    report_save(&report);
    Ok(())
}

fn remove_class(session: &mut Session<'_>, name: &str, force: bool) -> Result<()> {
    let name = name.trim();
    if session.roster().class(name).is_none() {
        return Err(anyhow!("No class named \"{}\".", name));
    }
    session.identity().require_admin("remove classes")?;

    let affected = session
        .roster()
        .count_by_class(DayScope::Week)
        .get(name)
        .unwrap_or(0);
    let prompt = if affected > 0 {
        format!("Remove {} and {} assignment(s) using it?", name, affected)
    } else {
        format!("Remove {}?", name)
    };
    if !confirm(&prompt, force) {
        ui::status("Cancelled.");
        return Ok(());
    }

    let (removed, report) = session.mutate("remove classes", |roster| roster.remove_class(name))?;
    ui::status(&format!("Removed {} ({} assignments)", name, removed.assignments));
    report_save(&report);
    Ok(())
}

fn set_color(session: &mut Session<'_>, name: &str, color: &str) -> Result<()> {
    let name = name.trim();
    let color = color.trim();
    if color.is_empty() {
        return Err(anyhow!("Colour cannot be empty."));
    }
    if session.roster().class(name).is_none() {
        return Err(anyhow!("No class named \"{}\".", name));
    }
    let (_, report) = session.mutate("change class colours", |roster| {
        roster.set_class_color(name, color)
    })?;
    ui::status(&format!("{} is now {}", name, color));
    report_save(&report);
    Ok(())
}

fn list_classes(session: &Session<'_>) {
    let classes = session.roster().classes();
    if classes.is_empty() {
        ui::status("No classes yet. Add some with `classes add`.");
        return;
    }
    for class in classes {
        println!("  {} {}", swatch(class), class.name);
    }
}

/// A coloured block for the class, or its raw colour value when it is not hex
pub(crate) fn swatch(class: &ClassTag) -> String {
    match class.rgb() {
        Some((r, g, b)) => format!("{} {}", "■".with(Color::Rgb { r, g, b }), class.color),
        None => format!("  {}", class.color),
    }
}
