// SQLite persistence layer: Lahman batting tables and trivia sessions.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use dugout_baseball::source::{SessionStore, StatsSource, TeamRef, TriviaSource};
use dugout_baseball::stats::{CountingStats, Honors, RosterRow};
use dugout_baseball::trivia::{TriviaRecord, TriviaSessionState};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::YearRange;
use crate::import::LahmanTables;

/// Franchise and record details for one team-season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub team_id: String,
    pub name: String,
    pub franchise_id: Option<String>,
    pub league_id: Option<String>,
    pub wins: Option<u32>,
    pub losses: Option<u32>,
}

impl TeamInfo {
    /// "W-L", or `None` when either side is unknown.
    pub fn record(&self) -> Option<String> {
        Some(format!("{}-{}", self.wins?, self.losses?))
    }
}

/// Row counts written by [`Database::import_lahman`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub people: usize,
    pub teams: usize,
    pub batting: usize,
    pub hall_of_fame: usize,
    pub all_stars: usize,
}

/// SQLite-backed storage for the Lahman subset this tool reads, plus
/// per-session trivia state.
pub struct Database {
    conn: Mutex<Connection>,
}

/// Summed counting-stat columns shared by the roster and league queries.
const COUNTING_SUMS: &str = "
    COALESCE(SUM(b.g), 0),
    COALESCE(SUM(b.ab), 0),
    COALESCE(SUM(b.h), 0),
    COALESCE(SUM(b.doubles), 0),
    COALESCE(SUM(b.triples), 0),
    COALESCE(SUM(b.hr), 0),
    COALESCE(SUM(b.rbi), 0),
    COALESCE(SUM(b.bb), 0),
    COALESCE(SUM(b.so), 0),
    COALESCE(SUM(b.sb), 0),
    COALESCE(SUM(b.cs), 0),
    COALESCE(SUM(b.hbp), 0),
    COALESCE(SUM(b.sf), 0),
    COALESCE(SUM(b.sh), 0)";

/// Read the fourteen [`COUNTING_SUMS`] columns starting at `start`.
fn counting_from_row(row: &Row<'_>, start: usize) -> rusqlite::Result<CountingStats> {
    Ok(CountingStats {
        games: row.get(start)?,
        at_bats: row.get(start + 1)?,
        hits: row.get(start + 2)?,
        doubles: row.get(start + 3)?,
        triples: row.get(start + 4)?,
        home_runs: row.get(start + 5)?,
        runs_batted_in: row.get(start + 6)?,
        walks: row.get(start + 7)?,
        strikeouts: row.get(start + 8)?,
        stolen_bases: row.get(start + 9)?,
        caught_stealing: row.get(start + 10)?,
        hit_by_pitch: row.get(start + 11)?,
        sacrifice_flies: row.get(start + 12)?,
        sacrifice_hits: row.get(start + 13)?,
        birth_year: None,
    })
}

/// "First Last" with empty parts dropped; falls back to the player id.
pub fn display_name(first: Option<&str>, last: Option<&str>, player_id: &str) -> String {
    let name = [first, last]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if name.is_empty() {
        player_id.to_string()
    } else {
        name
    }
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure all tables
    /// exist. Pass `":memory:"` for an ephemeral in-memory database.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS people (
                player_id  TEXT PRIMARY KEY,
                name_first TEXT,
                name_last  TEXT,
                birth_year INTEGER
            );

            CREATE TABLE IF NOT EXISTS teams (
                year_id      INTEGER NOT NULL,
                team_id      TEXT NOT NULL,
                league_id    TEXT,
                franchise_id TEXT,
                name         TEXT NOT NULL,
                wins         INTEGER,
                losses       INTEGER,
                PRIMARY KEY (year_id, team_id)
            );

            CREATE TABLE IF NOT EXISTS batting (
                player_id TEXT NOT NULL,
                year_id   INTEGER NOT NULL,
                stint     INTEGER NOT NULL,
                team_id   TEXT NOT NULL,
                league_id TEXT,
                g         INTEGER NOT NULL DEFAULT 0,
                ab        INTEGER NOT NULL DEFAULT 0,
                h         INTEGER NOT NULL DEFAULT 0,
                doubles   INTEGER NOT NULL DEFAULT 0,
                triples   INTEGER NOT NULL DEFAULT 0,
                hr        INTEGER NOT NULL DEFAULT 0,
                rbi       INTEGER NOT NULL DEFAULT 0,
                bb        INTEGER NOT NULL DEFAULT 0,
                so        INTEGER NOT NULL DEFAULT 0,
                sb        INTEGER NOT NULL DEFAULT 0,
                cs        INTEGER NOT NULL DEFAULT 0,
                hbp       INTEGER NOT NULL DEFAULT 0,
                sf        INTEGER NOT NULL DEFAULT 0,
                sh        INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (player_id, year_id, stint)
            );

            CREATE TABLE IF NOT EXISTS halloffame (
                player_id TEXT NOT NULL,
                year_id   INTEGER NOT NULL,
                voted_by  TEXT NOT NULL DEFAULT '',
                inducted  TEXT NOT NULL,
                PRIMARY KEY (player_id, year_id, voted_by)
            );

            CREATE TABLE IF NOT EXISTS allstarfull (
                player_id TEXT NOT NULL,
                year_id   INTEGER NOT NULL,
                game_num  INTEGER NOT NULL DEFAULT 0,
                team_id   TEXT,
                PRIMARY KEY (player_id, year_id, game_num)
            );

            CREATE TABLE IF NOT EXISTS trivia_sessions (
                session_id TEXT PRIMARY KEY,
                state      TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_batting_year_team ON batting(year_id, team_id);
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock).
    pub(crate) fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    // ------------------------------------------------------------------
    // Season / team catalog
    // ------------------------------------------------------------------

    /// Every team that played in `year`, ordered by team id.
    pub fn teams_for_year(&self, year: i32) -> Result<Vec<TeamRef>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT team_id, name FROM teams WHERE year_id = ?1 ORDER BY team_id")
            .context("failed to prepare teams_for_year query")?;
        let teams = stmt
            .query_map(params![year], |row| {
                Ok(TeamRef {
                    team_id: row.get(0)?,
                    name: row.get(1)?,
                })
            })
            .context("failed to query teams")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("failed to read team row")?;
        Ok(teams)
    }

    pub fn team_info(&self, team_id: &str, year: i32) -> Result<Option<TeamInfo>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT team_id, name, franchise_id, league_id, wins, losses
             FROM teams WHERE year_id = ?1 AND team_id = ?2",
            params![year, team_id],
            |row| {
                Ok(TeamInfo {
                    team_id: row.get(0)?,
                    name: row.get(1)?,
                    franchise_id: row.get(2)?,
                    league_id: row.get(3)?,
                    wins: row.get(4)?,
                    losses: row.get(5)?,
                })
            },
        )
        .optional()
        .context("failed to query team info")
    }

    // ------------------------------------------------------------------
    // Import
    // ------------------------------------------------------------------

    /// Write all parsed Lahman rows in a single transaction. Existing rows
    /// with the same key are replaced.
    pub fn import_lahman(&self, tables: &LahmanTables) -> Result<ImportSummary> {
        let mut conn = self.conn();
        let tx = conn.transaction().context("failed to begin import transaction")?;

        for person in &tables.people {
            tx.execute(
                "INSERT OR REPLACE INTO people (player_id, name_first, name_last, birth_year)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    person.player_id,
                    person.name_first,
                    person.name_last,
                    person.birth_year
                ],
            )
            .context("failed to insert person")?;
        }

        for team in &tables.teams {
            tx.execute(
                "INSERT OR REPLACE INTO teams
                    (year_id, team_id, league_id, franchise_id, name, wins, losses)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    team.year,
                    team.team_id,
                    team.league_id,
                    team.franchise_id,
                    team.name,
                    team.wins,
                    team.losses
                ],
            )
            .context("failed to insert team")?;
        }

        for line in &tables.batting {
            let s = &line.stats;
            tx.execute(
                "INSERT OR REPLACE INTO batting
                    (player_id, year_id, stint, team_id, league_id,
                     g, ab, h, doubles, triples, hr, rbi, bb, so, sb, cs, hbp, sf, sh)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                         ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
                params![
                    line.player_id,
                    line.year,
                    line.stint,
                    line.team_id,
                    line.league_id,
                    s.games,
                    s.at_bats,
                    s.hits,
                    s.doubles,
                    s.triples,
                    s.home_runs,
                    s.runs_batted_in,
                    s.walks,
                    s.strikeouts,
                    s.stolen_bases,
                    s.caught_stealing,
                    s.hit_by_pitch,
                    s.sacrifice_flies,
                    s.sacrifice_hits
                ],
            )
            .context("failed to insert batting line")?;
        }

        for vote in &tables.hall_of_fame {
            tx.execute(
                "INSERT OR REPLACE INTO halloffame (player_id, year_id, voted_by, inducted)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    vote.player_id,
                    vote.year,
                    vote.voted_by,
                    if vote.inducted { "Y" } else { "N" }
                ],
            )
            .context("failed to insert hall of fame row")?;
        }

        for appearance in &tables.all_stars {
            tx.execute(
                "INSERT OR REPLACE INTO allstarfull (player_id, year_id, game_num, team_id)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    appearance.player_id,
                    appearance.year,
                    appearance.game_num,
                    appearance.team_id
                ],
            )
            .context("failed to insert all-star row")?;
        }

        tx.commit().context("failed to commit import")?;

        let summary = ImportSummary {
            people: tables.people.len(),
            teams: tables.teams.len(),
            batting: tables.batting.len(),
            hall_of_fame: tables.hall_of_fame.len(),
            all_stars: tables.all_stars.len(),
        };
        info!("imported {summary:?}");
        Ok(summary)
    }

    // ------------------------------------------------------------------
    // Trivia
    // ------------------------------------------------------------------

    /// A [`TriviaSource`] that samples only seasons inside `years`.
    pub fn trivia_source(&self, years: YearRange) -> SeasonSampler<'_> {
        SeasonSampler { db: self, years }
    }

    /// Generate a session id from the current UTC time.
    ///
    /// Format: `trivia_YYYYMMDD_HHMMSS_SSS`.
    pub fn generate_session_id() -> String {
        chrono::Utc::now().format("trivia_%Y%m%d_%H%M%S_%3f").to_string()
    }
}

// ---------------------------------------------------------------------------
// StatsSource
// ---------------------------------------------------------------------------

impl StatsSource for Database {
    /// One row per player with stints summed, ordered by HR, then H
    /// (both descending), then player id.
    fn team_roster(&self, team_id: &str, year: i32) -> Result<Vec<RosterRow>> {
        let conn = self.conn();
        let sql = format!(
            "SELECT b.player_id, p.name_first, p.name_last, p.birth_year,
                    EXISTS(SELECT 1 FROM halloffame h
                           WHERE h.player_id = b.player_id AND h.inducted = 'Y'),
                    EXISTS(SELECT 1 FROM allstarfull a
                           WHERE a.player_id = b.player_id AND a.year_id = b.year_id),
                    {COUNTING_SUMS}
             FROM batting AS b
             LEFT JOIN people AS p ON p.player_id = b.player_id
             WHERE b.year_id = ?1 AND b.team_id = ?2
             GROUP BY b.player_id
             ORDER BY SUM(b.hr) DESC, SUM(b.h) DESC, b.player_id"
        );
        let mut stmt = conn
            .prepare(&sql)
            .context("failed to prepare team_roster query")?;

        let rows = stmt
            .query_map(params![year, team_id], |row| {
                let player_id: String = row.get(0)?;
                let first: Option<String> = row.get(1)?;
                let last: Option<String> = row.get(2)?;
                let birth_year: Option<i32> = row.get(3)?;

                let mut stats = counting_from_row(row, 6)?;
                stats.birth_year = birth_year.filter(|y| *y > 0);

                Ok(RosterRow {
                    player_name: display_name(first.as_deref(), last.as_deref(), &player_id),
                    player_id,
                    stats,
                    honors: Honors {
                        hall_of_fame: row.get(4)?,
                        all_star: row.get(5)?,
                    },
                })
            })
            .context("failed to query team roster")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("failed to read roster row")?;

        debug!("{} roster rows for {team_id} in {year}", rows.len());
        Ok(rows)
    }

    fn league_totals(&self, year: i32) -> Result<Option<CountingStats>> {
        let conn = self.conn();
        let sql = format!("SELECT COUNT(*), {COUNTING_SUMS} FROM batting AS b WHERE b.year_id = ?1");
        let (count, totals): (i64, CountingStats) = conn
            .query_row(&sql, params![year], |row| {
                Ok((row.get(0)?, counting_from_row(row, 1)?))
            })
            .context("failed to query league totals")?;

        Ok((count > 0).then_some(totals))
    }
}

// ---------------------------------------------------------------------------
// TriviaSource
// ---------------------------------------------------------------------------

/// Uniform sampler over (player, team, season) records with at least one
/// at-bat. Stints with the same team in a season are summed into one record.
pub struct SeasonSampler<'a> {
    db: &'a Database,
    years: YearRange,
}

const ELIGIBLE_RECORDS: &str = "SELECT b.player_id, b.year_id, b.team_id,
            SUM(b.h) AS h, SUM(b.hr) AS hr, SUM(b.rbi) AS rbi
     FROM batting AS b
     JOIN teams AS t ON t.year_id = b.year_id AND t.team_id = b.team_id
     WHERE b.year_id BETWEEN ?1 AND ?2
     GROUP BY b.player_id, b.year_id, b.team_id
     HAVING SUM(b.ab) > 0";

impl SeasonSampler<'_> {
    fn eligible_count(&self) -> Result<i64> {
        self.db
            .conn()
            .query_row(
                &format!("SELECT COUNT(*) FROM ({ELIGIBLE_RECORDS})"),
                params![self.years.min_year, self.years.max_year],
                |row| row.get(0),
            )
            .context("failed to count trivia records")
    }
}

impl TriviaSource for SeasonSampler<'_> {
    fn sample_record(&self, rng: &mut dyn RngCore) -> Result<Option<TriviaRecord>> {
        let count = self.eligible_count()?;
        if count == 0 {
            return Ok(None);
        }

        let offset = rng.gen_range(0..count);
        let conn = self.db.conn();
        let record = conn
            .query_row(
                &format!(
                    "SELECT e.player_id, p.name_first, p.name_last, e.year_id, e.team_id, t.name,
                            e.h, e.hr, e.rbi
                     FROM ({ELIGIBLE_RECORDS}) AS e
                     JOIN teams AS t ON t.year_id = e.year_id AND t.team_id = e.team_id
                     LEFT JOIN people AS p ON p.player_id = e.player_id
                     ORDER BY e.player_id, e.year_id, e.team_id
                     LIMIT 1 OFFSET ?3"
                ),
                params![self.years.min_year, self.years.max_year, offset],
                |row| {
                    let player_id: String = row.get(0)?;
                    let first: Option<String> = row.get(1)?;
                    let last: Option<String> = row.get(2)?;
                    Ok(TriviaRecord {
                        player_name: display_name(first.as_deref(), last.as_deref(), &player_id),
                        player_id,
                        year: row.get(3)?,
                        team_id: row.get(4)?,
                        team_name: row.get(5)?,
                        hits: row.get(6)?,
                        home_runs: row.get(7)?,
                        runs_batted_in: row.get(8)?,
                    })
                },
            )
            .optional()
            .context("failed to sample trivia record")?;

        Ok(record)
    }

    fn other_teams(
        &self,
        record: &TriviaRecord,
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<TeamRef>> {
        // Any team the player batted for that season would be a second right answer.
        let played_for: Vec<String> = {
            let conn = self.db.conn();
            let mut stmt = conn
                .prepare("SELECT DISTINCT team_id FROM batting WHERE player_id = ?1 AND year_id = ?2")
                .context("failed to prepare season teams query")?;
            let ids = stmt
                .query_map(params![record.player_id, record.year], |row| row.get(0))
                .context("failed to query season teams")?
                .collect::<rusqlite::Result<Vec<_>>>()
                .context("failed to read season team")?;
            ids
        };

        let mut teams = self.db.teams_for_year(record.year)?;
        teams.retain(|t| t.team_id != record.team_id && !played_for.contains(&t.team_id));
        teams.shuffle(rng);
        teams.truncate(count);
        Ok(teams)
    }
}

// ---------------------------------------------------------------------------
// SessionStore
// ---------------------------------------------------------------------------

impl SessionStore for Database {
    fn load_session(&self, session_id: &str) -> Result<Option<TriviaSessionState>> {
        let conn = self.conn();
        let json_str: Option<String> = conn
            .query_row(
                "SELECT state FROM trivia_sessions WHERE session_id = ?1",
                params![session_id],
                |row| row.get(0),
            )
            .optional()
            .context("failed to query trivia session")?;

        json_str
            .map(|s| serde_json::from_str(&s).context("failed to deserialize trivia session"))
            .transpose()
    }

    fn save_session(&self, session_id: &str, state: &TriviaSessionState) -> Result<()> {
        let conn = self.conn();
        let json_str =
            serde_json::to_string(state).context("failed to serialize trivia session")?;
        conn.execute(
            "INSERT INTO trivia_sessions (session_id, state, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(session_id) DO UPDATE SET
                state      = excluded.state,
                updated_at = excluded.updated_at",
            params![session_id, json_str, chrono::Utc::now().to_rfc3339()],
        )
        .context("failed to save trivia session")?;
        Ok(())
    }
}
