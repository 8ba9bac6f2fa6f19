use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Historical batting statistics and trivia from the Lahman database
#[derive(Parser, Debug)]
#[command(name = "dugout", version, about)]
pub struct Cli {
    /// SQLite database path (overrides config/dugout.toml)
    #[arg(long, env = "DUGOUT_DB")]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load Lahman CSV files (People, Teams, Batting, HallOfFame, AllstarFull)
    Import {
        /// Directory containing the CSV files
        dir: PathBuf,
    },

    /// List the teams that played in a season
    Teams { year: i32 },

    /// Show a team's batting page
    Team { team: String, year: i32 },

    /// Download a team's batting page as CSV
    Export {
        team: String,
        year: i32,

        /// Output directory (defaults to export.directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Compare two players from one team-season. Lists the roster when ids
    /// are omitted.
    ComparePlayers {
        team: String,
        year: i32,
        left: Option<String>,
        right: Option<String>,
    },

    /// Compare two teams from one season
    CompareTeams {
        year: i32,
        left: String,
        right: String,
    },

    /// Play batting trivia
    Trivia {
        /// Resume an existing session
        #[arg(long)]
        session: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_compare_players_without_ids() {
        let cli = Cli::try_parse_from(["dugout", "compare-players", "nyy", "1927"]).unwrap();
        match cli.command {
            Command::ComparePlayers {
                team,
                year,
                left,
                right,
            } => {
                assert_eq!(team, "nyy");
                assert_eq!(year, 1927);
                assert!(left.is_none() && right.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_export_out_dir() {
        let cli =
            Cli::try_parse_from(["dugout", "export", "SEA", "2001", "--out", "/tmp/x"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Export { out: Some(ref p), .. } if p == &PathBuf::from("/tmp/x")
        ));
    }

    #[test]
    fn rejects_non_numeric_year() {
        assert!(Cli::try_parse_from(["dugout", "teams", "ninety"]).is_err());
    }
}
