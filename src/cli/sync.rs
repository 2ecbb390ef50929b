use anyhow::{anyhow, Result};

use crate::cli::ui::{self, confirm};
use crate::cli::PullArgs;
use crate::session::{RemoteSave, Session};

fn require_remote(session: &Session<'_>) -> Result<()> {
    if session.has_remote() {
        Ok(())
    } else {
        Err(anyhow!(
            "No remote store configured. Set one with `rostercmd config set api_url <url>`."
        ))
    }
}

/// Push the whole roster, overwriting the remote copy
pub fn run_push(session: &mut Session<'_>) -> Result<()> {
    require_remote(session)?;
    let report = session.save()?;
    if let Some(msg) = report.cache_error.as_deref() {
        ui::warning(&format!("Could not update local cache: {}", msg));
    }
    match report.remote {
        RemoteSave::Failed(e) => Err(e.into()),
        _ => {
            ui::status(&format!("Roster saved for {}", session.identity().tenant_id()));
            Ok(())
        }
    }
}

/// Discard local state in favour of the remote copy
pub fn run_pull(session: &mut Session<'_>, args: PullArgs) -> Result<()> {
    require_remote(session)?;
    if !confirm("Replace the local roster with the remote copy?", args.force) {
        ui::status("Cancelled.");
        return Ok(());
    }
    session.reload()?;
    let roster = session.roster();
    ui::status(&format!(
        "Loaded {} people, {} classes, {} slots, {} assignments",
        roster.people().len(),
        roster.classes().len(),
        roster.time_slots().len(),
        roster.assignment_count()
    ));
    Ok(())
}
