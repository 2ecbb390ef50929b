//! Spreadsheet export: one CSV sheet per weekday plus a class summary.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::{Result, RosterError};
use crate::models::{DayScope, Weekday};
use crate::roster::{ExportView, Roster};

/// Write the grid for one day: a `Time` column, then one column per person.
pub fn write_day_sheet<W: Write>(view: &ExportView<'_>, day: Weekday, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    let mut header = vec!["Time".to_string()];
    header.extend(view.people.iter().cloned());
    writer.write_record(&header)?;

    for slot in view.time_slots {
        let mut row = vec![slot.label()];
        for person in view.people {
            let cell = view
                .assignment(day, slot.start, person)
                .map(|a| a.cell_text())
                .unwrap_or_default();
            row.push(cell);
        }
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

/// Week totals per class, followed by people and class counts
pub fn write_summary_sheet<W: Write>(roster: &Roster, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["Class Summary", "Count"])?;

    for (class, count) in roster.count_by_class(DayScope::Week).iter() {
        writer.write_record([class.to_string(), count.to_string()])?;
    }

    writer.write_record(["", ""])?;
    writer.write_record(["Total People".to_string(), roster.people().len().to_string()])?;
    writer.write_record(["Total Classes".to_string(), roster.classes().len().to_string()])?;

    writer.flush()?;
    Ok(())
}

/// Export every day and the summary into `dir`, named with `date`.
/// Returns the paths written.
pub fn export_csv(roster: &Roster, dir: &Path, date: NaiveDate) -> Result<Vec<PathBuf>> {
    if !roster.has_assignments() {
        return Err(RosterError::validation("No assignments to export"));
    }
    std::fs::create_dir_all(dir)?;

    let stamp = date.format("%Y-%m-%d").to_string();
    let view = roster.export_view(DayScope::Week);
    let mut written = Vec::new();

    for day in Weekday::ALL {
        let path = dir.join(format!("Timetable_{}_{}.csv", day.label(), stamp));
        let file = std::fs::File::create(&path)?;
        write_day_sheet(&view, day, file)?;
        written.push(path);
    }

    let path = dir.join(format!("Timetable_Summary_{}.csv", stamp));
    write_summary_sheet(roster, std::fs::File::create(&path)?)?;
    written.push(path);

    Ok(written)
}
