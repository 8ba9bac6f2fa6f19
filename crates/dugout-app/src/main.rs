// Dugout entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Parse arguments and load config
// 3. Open database
// 4. Dispatch the subcommand

mod cli;
mod export;
mod render;
mod trivia;

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use dugout_baseball::compare::CompareError;
use dugout_core::config;
use dugout_core::db::Database;
use dugout_core::import;
use dugout_core::season::{Catalog, LookupError};
use tracing::{error, info};

use crate::cli::{Cli, Command};

fn main() {
    if let Err(e) = run() {
        // Lookup and compare rejections are plain messages, not failures.
        if e.downcast_ref::<LookupError>().is_some() || e.downcast_ref::<CompareError>().is_some() {
            println!("{e}");
            return;
        }
        error!("{e:#}");
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    init_tracing()?;
    info!("dugout starting up");

    let cli = Cli::parse();
    let config = config::load_config().context("failed to load configuration")?;

    let db_path = cli.db.as_deref().unwrap_or(&config.database.path);
    let db = Database::open(db_path).context("failed to open database")?;
    info!("Database opened at {db_path}");

    let catalog = Catalog::new(&db, config.seasons);

    match cli.command {
        Command::Import { dir } => {
            let summary = import::import_lahman_dir(&db, &dir)?;
            println!(
                "Imported {} people, {} teams, {} batting lines, {} Hall of Fame votes, {} All-Star appearances.",
                summary.people, summary.teams, summary.batting, summary.hall_of_fame, summary.all_stars
            );
        }
        Command::Teams { year } => {
            print!("{}", render::render_teams(year, &catalog.teams(year)?));
        }
        Command::Team { team, year } => {
            print!("{}", render::render_team_page(&catalog.team_page(&team, year)?));
        }
        Command::Export { team, year, out } => {
            let page = catalog.team_page(&team, year)?;
            let dir = out.unwrap_or_else(|| PathBuf::from(&config.export.directory));
            let path = export::export_team(&page, &dir)?;
            println!("Wrote {}", path.display());
        }
        Command::ComparePlayers {
            team,
            year,
            left: Some(left),
            right: Some(right),
        } => {
            let comparison = catalog.compare_players(&team, year, &left, &right)?;
            print!("{}", render::render_comparison(&comparison));
        }
        Command::ComparePlayers { team, year, .. } => {
            let page = catalog.team_page(&team, year)?;
            print!("{}", render::render_candidates(&page));
            println!("Pick two player ids to compare.");
        }
        Command::CompareTeams { year, left, right } => {
            let comparison = catalog.compare_teams(year, &left, &right)?;
            print!("{}", render::render_comparison(&comparison));
        }
        Command::Trivia { session } => {
            let session_id = session.unwrap_or_else(Database::generate_session_id);
            println!("Trivia session {session_id} (resume with --session {session_id})");
            let source = db.trivia_source(config.trivia_years());
            let mut rng = rand::thread_rng();
            trivia::play(
                &db,
                &source,
                &session_id,
                &mut rng,
                io::stdin().lock(),
                io::stdout().lock(),
            )?;
        }
    }

    info!("dugout shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file so command output stays clean.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("dugout.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("dugout=info,dugout_core=info,dugout_baseball=info,warn")
        }))
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
