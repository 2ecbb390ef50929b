use anyhow::Result;
use chrono::Local;
use std::path::Path;

use crate::cli::ui;
use crate::cli::ExportCommand;
use crate::export::export_csv;
use crate::session::Session;

pub fn run_export(session: &Session<'_>, command: ExportCommand) -> Result<()> {
    match command {
        ExportCommand::Csv { dir } => {
            let today = Local::now().date_naive();
            let paths = export_csv(session.roster(), Path::new(&dir), today)?;
            ui::status(&format!("Exported {} files:", paths.len()));
            for path in paths {
                println!("  {}", path.display());
            }
            Ok(())
        }
    }
}
