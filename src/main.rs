use clap::Parser;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rostercmd::cli::{
    run_assign, run_classes, run_config, run_count, run_export, run_people, run_project, run_pull,
    run_push, run_show, run_slots, ui, Cli, Commands,
};
use rostercmd::config::Config;
use rostercmd::db::Database;
use rostercmd::persistence::{HttpStore, RemoteStore};
use rostercmd::session::Session;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn main() {
    init_tracing();
    if let Err(e) = run(Cli::parse()) {
        ui::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let db = Database::open()?;

    // Settings never need the roster
    let command = match cli.command {
        Commands::Config(command) => return run_config(&db, command),
        other => other,
    };

    let config = Config::load(&db)?;
    let remote: Option<Box<dyn RemoteStore>> = match config.api_url.as_deref() {
        Some(url) => Some(Box::new(HttpStore::new(url, config.api_token.clone())?)),
        None => None,
    };

    let mut session = Session::open(Box::new(config.identity()), remote, &db);
    if let Some(e) = session.load_error() {
        warn!(error = %e, "using local copy");
        ui::warning(&format!("Could not reach the server ({}). Showing the local copy.", e));
    }

    match command {
        Commands::People(cmd) => run_people(&mut session, cmd)?,
        Commands::Classes(cmd) => run_classes(&mut session, cmd)?,
        Commands::Slots(cmd) => run_slots(&mut session, cmd)?,
        Commands::Assign(cmd) => run_assign(&mut session, cmd)?,
        Commands::Show(args) => run_show(&session, args)?,
        Commands::Count(args) => run_count(&session, args)?,
        Commands::Push => run_push(&mut session)?,
        Commands::Pull(args) => run_pull(&mut session, args)?,
        Commands::Project(cmd) => run_project(&mut session, cmd)?,
        Commands::Export(cmd) => run_export(&session, cmd)?,
        Commands::Config(_) => {}
    }

    Ok(())
}
