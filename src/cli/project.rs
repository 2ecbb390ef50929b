use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;
use std::path::Path;

use crate::cli::ui::{self, confirm, report_save};
use crate::cli::ProjectCommand;
use crate::roster::{Roster, RosterDocument};
use crate::session::Session;

pub fn run_project(session: &mut Session<'_>, command: ProjectCommand) -> Result<()> {
    match command {
        ProjectCommand::Save { path } => save_project(session.roster(), Path::new(&path)),
        ProjectCommand::Load { path, force } => load_project(session, Path::new(&path), force),
    }
}

fn save_project(roster: &Roster, path: &Path) -> Result<()> {
    let mut doc = roster.to_document();
    doc.saved_date = Some(Utc::now().to_rfc3339());
    let json = doc.to_pretty_json()?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    ui::status(&format!("Project saved to {}", path.display()));
    Ok(())
}

fn read_project(path: &Path) -> Result<Roster> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let doc = RosterDocument::parse_project(&text)?;
    Ok(Roster::from_document(doc))
}

fn load_project(session: &mut Session<'_>, path: &Path, force: bool) -> Result<()> {
    session.identity().require_admin("load projects")?;
    let roster = read_project(path)?;

    if !confirm("Replace the current roster with this project?", force) {
        ui::status("Cancelled.");
        return Ok(());
    }
    let summary = format!(
        "Loaded {} people, {} classes, {} assignments",
        roster.people().len(),
        roster.classes().len(),
        roster.assignment_count()
    );
    let report = session.replace(roster)?;
    ui::status(&summary);
    report_save(&report);
    Ok(())
}
