use anyhow::{anyhow, Result};

use crate::cli::ui::{self, confirm, report_save};
use crate::cli::{join_names, PeopleCommand};
use crate::models::Weekday;
use crate::roster::parse_names;
use crate::session::Session;

pub fn run_people(session: &mut Session<'_>, command: PeopleCommand) -> Result<()> {
    match command {
        PeopleCommand::Add { names } => add_people(session, &join_names(&names)),
        PeopleCommand::Remove { name, force } => remove_person(session, &name, force),
        PeopleCommand::List => {
            list_people(session);
            Ok(())
        }
    }
}

fn add_people(session: &mut Session<'_>, raw: &str) -> Result<()> {
    if parse_names(raw).is_empty() {
        return Err(anyhow!("No names given."));
    }
    let (added, report) = session.mutate("add people", |roster| roster.add_people(raw))?;
    ui::status(&added.summary("person", "people"));
    report_save(&report);
    Ok(())
}

fn remove_person(session: &mut Session<'_>, name: &str, force: bool) -> Result<()> {
    let name = name.trim();
    if !session.roster().has_person(name) {
        return Err(anyhow!("No person named \"{}\".", name));
    }
    session.identity().require_admin("remove people")?;

    let affected: usize = Weekday::ALL
        .iter()
        .map(|day| session.roster().day(*day).keys().filter(|k| k.person == name).count())
        .sum();
    let prompt = if affected > 0 {
        format!("Remove {} and their {} assignment(s)?", name, affected)
    } else {
        format!("Remove {}?", name)
    };
    if !confirm(&prompt, force) {
        ui::status("Cancelled.");
        return Ok(());
    }

    let (removed, report) = session.mutate("remove people", |roster| roster.remove_person(name))?;
    ui::status(&format!("Removed {} ({} assignments)", name, removed.assignments));
    report_save(&report);
    Ok(())
}

fn list_people(session: &Session<'_>) {
    let people = session.roster().people();
    if people.is_empty() {
        ui::status("No people yet. Add some with `people add`.");
        return;
    }
    for (i, name) in people.iter().enumerate() {
        println!("{:>3}. {}", i + 1, name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::identity::{Role, StaticIdentity};

    fn admin_session(db: &Database) -> Session<'_> {
        Session::open(Box::new(StaticIdentity::new(Role::Admin, "t-1")), None, db)
    }

    #[test]
    fn test_add_people_persists() {
        let db = Database::open_memory().unwrap();
        let mut session = admin_session(&db);
        add_people(&mut session, "Alice, Bob").unwrap();
        assert_eq!(session.roster().people(), ["Alice", "Bob"]);
        assert!(db.load_cached_roster("t-1").unwrap().is_some());
    }

    #[test]
    fn test_add_people_rejects_blank_input() {
        let db = Database::open_memory().unwrap();
        let mut session = admin_session(&db);
        assert!(add_people(&mut session, " , \n").is_err());
        assert!(db.load_cached_roster("t-1").unwrap().is_none());
    }

    #[test]
    fn test_remove_person_forced() {
        let db = Database::open_memory().unwrap();
        let mut session = admin_session(&db);
        add_people(&mut session, "Alice, Bob").unwrap();
        remove_person(&mut session, "Alice", true).unwrap();
        assert_eq!(session.roster().people(), ["Bob"]);
    }

    #[test]
    fn test_remove_unknown_person() {
        let db = Database::open_memory().unwrap();
        let mut session = admin_session(&db);
        assert!(remove_person(&mut session, "Zed", true).is_err());
    }

    #[test]
    fn test_viewer_cannot_add() {
        let db = Database::open_memory().unwrap();
        let mut session = Session::open(Box::new(StaticIdentity::new(Role::Viewer, "t-1")), None, &db);
        assert!(add_people(&mut session, "Alice").is_err());
        assert!(session.roster().people().is_empty());
    }
}
