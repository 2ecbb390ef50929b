use anyhow::{anyhow, Result};
use chrono::Local;
use crossterm::style::{Color, Stylize};
use std::io::{self, IsTerminal};

use crate::cli::ui::{self, fit};
use crate::cli::{CountArgs, ShowArgs};
use crate::models::{Assignment, DayScope, Weekday};
use crate::roster::{ExportView, Roster};
use crate::session::{LoadSource, Session};

const TIME_WIDTH: usize = 19;
const MIN_CELL_WIDTH: usize = 8;
const MAX_CELL_WIDTH: usize = 16;

pub fn run_show(session: &Session<'_>, args: ShowArgs) -> Result<()> {
    let scope = match args.day.as_deref() {
        Some(day) => day.parse::<DayScope>().map_err(|e| anyhow!(e))?,
        None => DayScope::Week,
    };
    let roster = session.roster();
    if roster.people().is_empty() || roster.time_slots().is_empty() {
        ui::status("Nothing to show yet. Add people and time slots first.");
        return Ok(());
    }

    let color = !args.no_color && io::stdout().is_terminal();
    let view = roster.export_view(scope);
    for (i, day) in scope.days().into_iter().enumerate() {
        if i > 0 {
            println!();
        }
        print!("{}", render_day(&view, day, color));
    }

    if let Some(note) = offline_note(session.source()) {
        ui::status(&format!("\n{}", note));
    }
    Ok(())
}

/// Footer for a roster read from the local cache
fn offline_note(source: &LoadSource) -> Option<String> {
    let LoadSource::Cache { saved_at, saved_by } = source else {
        return None;
    };
    let when = saved_at.with_timezone(&Local).format("%Y-%m-%d %H:%M");
    Some(match saved_by {
        Some(user) => format!("(offline copy, saved {} by {})", when, user),
        None => format!("(offline copy, saved {})", when),
    })
}

fn cell_width(view: &ExportView<'_>) -> usize {
    view.people
        .iter()
        .map(|p| p.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(MIN_CELL_WIDTH, MAX_CELL_WIDTH)
}

fn cell_label(assignment: &Assignment) -> String {
    if assignment.duration == Assignment::DEFAULT_DURATION {
        assignment.class_name.clone()
    } else {
        format!("{} {}m", assignment.class_name, assignment.duration)
    }
}

/// One day as a text grid: slots down, people across
pub(crate) fn render_day(view: &ExportView<'_>, day: Weekday, color: bool) -> String {
    let width = cell_width(view);
    let mut out = String::new();

    out.push_str(day.label());
    out.push('\n');
    out.push_str(&fit("", TIME_WIDTH));
    for person in view.people {
        out.push_str("  ");
        out.push_str(&fit(person, width));
    }
    out.push('\n');

    for slot in view.time_slots {
        out.push_str(&fit(&slot.label(), TIME_WIDTH));
        for person in view.people {
            out.push_str("  ");
            let Some(assignment) = view.assignment(day, slot.start, person) else {
                out.push_str(&fit("·", width));
                continue;
            };
            let text = fit(&cell_label(assignment), width);
            let rgb = view.class(&assignment.class_name).and_then(|c| c.rgb());
            match rgb {
                Some((r, g, b)) if color => {
                    out.push_str(&text.with(Color::Rgb { r, g, b }).to_string());
                }
                _ => out.push_str(&text),
            }
        }
        out.push('\n');
    }
    out
}

pub fn run_count(session: &Session<'_>, args: CountArgs) -> Result<()> {
    let scope = args.scope.parse::<DayScope>().map_err(|e| anyhow!(e))?;
    print!("{}", render_counts(session.roster(), scope));
    Ok(())
}

pub(crate) fn render_counts(roster: &Roster, scope: DayScope) -> String {
    let counts = roster.count_by_class(scope);
    if counts.is_empty() {
        return "No classes yet.\n".to_string();
    }
    let title = match scope {
        DayScope::Day(day) => day.label().to_string(),
        DayScope::Week => "Week".to_string(),
    };
    let name_width = counts.iter().map(|(c, _)| c.chars().count()).max().unwrap_or(0);

    let mut out = format!("{}\n", title);
    for (class, count) in counts.iter() {
        out.push_str(&format!("  {:<w$}  {}\n", class, count, w = name_width));
    }
    out.push_str(&format!("  {:<w$}  {}\n", "Total", counts.total(), w = name_width));
    out
}
