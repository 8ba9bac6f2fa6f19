// Lahman database CSV loading.
//
// Reads People.csv, Teams.csv, Batting.csv, HallOfFame.csv and
// AllstarFull.csv from one directory. Blank numeric cells read as zero for
// counting stats and as unknown elsewhere; malformed rows are skipped with a
// warning.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use dugout_baseball::stats::CountingStats;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{info, warn};

use crate::db::{Database, ImportSummary};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonRow {
    pub player_id: String,
    pub name_first: Option<String>,
    pub name_last: Option<String>,
    pub birth_year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRow {
    pub year: i32,
    pub team_id: String,
    pub league_id: Option<String>,
    pub franchise_id: Option<String>,
    pub name: String,
    pub wins: Option<u32>,
    pub losses: Option<u32>,
}

/// One stint: a player's line for one team within a season.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattingRow {
    pub player_id: String,
    pub year: i32,
    pub stint: u32,
    pub team_id: String,
    pub league_id: Option<String>,
    pub stats: CountingStats,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HallOfFameRow {
    pub player_id: String,
    pub year: i32,
    pub voted_by: String,
    pub inducted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllStarRow {
    pub player_id: String,
    pub year: i32,
    pub game_num: u32,
    pub team_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LahmanTables {
    pub people: Vec<PersonRow>,
    pub teams: Vec<TeamRow>,
    pub batting: Vec<BattingRow>,
    pub hall_of_fame: Vec<HallOfFameRow>,
    pub all_stars: Vec<AllStarRow>,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private), Lahman column names
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawPerson {
    playerID: String,
    #[serde(default)]
    birthYear: Option<i32>,
    #[serde(default)]
    nameFirst: Option<String>,
    #[serde(default)]
    nameLast: Option<String>,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawTeam {
    yearID: i32,
    #[serde(default)]
    lgID: Option<String>,
    teamID: String,
    #[serde(default)]
    franchID: Option<String>,
    #[serde(default)]
    W: Option<u32>,
    #[serde(default)]
    L: Option<u32>,
    name: String,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawBatting {
    playerID: String,
    yearID: i32,
    #[serde(default)]
    stint: Option<u32>,
    teamID: String,
    #[serde(default)]
    lgID: Option<String>,
    #[serde(default)]
    G: Option<u32>,
    #[serde(default)]
    AB: Option<u32>,
    #[serde(default)]
    H: Option<u32>,
    #[serde(default, rename = "2B")]
    doubles: Option<u32>,
    #[serde(default, rename = "3B")]
    triples: Option<u32>,
    #[serde(default)]
    HR: Option<u32>,
    #[serde(default)]
    RBI: Option<u32>,
    #[serde(default)]
    SB: Option<u32>,
    #[serde(default)]
    CS: Option<u32>,
    #[serde(default)]
    BB: Option<u32>,
    #[serde(default)]
    SO: Option<u32>,
    #[serde(default)]
    HBP: Option<u32>,
    #[serde(default)]
    SH: Option<u32>,
    #[serde(default)]
    SF: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawHallOfFame {
    playerID: String,
    #[serde(alias = "yearID")]
    yearid: i32,
    #[serde(default)]
    votedBy: Option<String>,
    inducted: String,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawAllStar {
    playerID: String,
    yearID: i32,
    #[serde(default)]
    gameNum: Option<u32>,
    #[serde(default)]
    teamID: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Deserialize every row of `rdr` as `Raw`, converting with `convert`.
/// Rows that fail to parse or that `convert` rejects are logged and skipped.
fn read_rows<R, Raw, Row>(
    rdr: R,
    label: &str,
    convert: impl Fn(Raw) -> Option<Row>,
) -> Result<Vec<Row>, csv::Error>
where
    R: Read,
    Raw: DeserializeOwned,
{
    let mut reader = csv::Reader::from_reader(rdr);
    let mut rows = Vec::new();
    for result in reader.deserialize::<Raw>() {
        match result {
            Ok(raw) => match convert(raw) {
                Some(row) => rows.push(row),
                None => warn!("skipping {label} row with an empty key"),
            },
            Err(e) => warn!("skipping malformed {label} row: {}", e),
        }
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Reader-based loaders (private, enable testing without temp files)
// ---------------------------------------------------------------------------

fn load_people_from_reader<R: Read>(rdr: R) -> Result<Vec<PersonRow>, csv::Error> {
    read_rows(rdr, "People", |raw: RawPerson| {
        let player_id = raw.playerID.trim().to_string();
        (!player_id.is_empty()).then(|| PersonRow {
            player_id,
            name_first: non_empty(raw.nameFirst),
            name_last: non_empty(raw.nameLast),
            birth_year: raw.birthYear.filter(|y| *y > 0),
        })
    })
}

fn load_teams_from_reader<R: Read>(rdr: R) -> Result<Vec<TeamRow>, csv::Error> {
    read_rows(rdr, "Teams", |raw: RawTeam| {
        let team_id = raw.teamID.trim().to_string();
        (!team_id.is_empty()).then(|| TeamRow {
            year: raw.yearID,
            team_id,
            league_id: non_empty(raw.lgID),
            franchise_id: non_empty(raw.franchID),
            name: raw.name.trim().to_string(),
            wins: raw.W,
            losses: raw.L,
        })
    })
}

fn load_batting_from_reader<R: Read>(rdr: R) -> Result<Vec<BattingRow>, csv::Error> {
    read_rows(rdr, "Batting", |raw: RawBatting| {
        let player_id = raw.playerID.trim().to_string();
        let team_id = raw.teamID.trim().to_string();
        if player_id.is_empty() || team_id.is_empty() {
            return None;
        }
        Some(BattingRow {
            player_id,
            year: raw.yearID,
            stint: raw.stint.unwrap_or(1),
            team_id,
            league_id: non_empty(raw.lgID),
            stats: CountingStats {
                games: raw.G.unwrap_or(0),
                at_bats: raw.AB.unwrap_or(0),
                hits: raw.H.unwrap_or(0),
                doubles: raw.doubles.unwrap_or(0),
                triples: raw.triples.unwrap_or(0),
                home_runs: raw.HR.unwrap_or(0),
                runs_batted_in: raw.RBI.unwrap_or(0),
                walks: raw.BB.unwrap_or(0),
                strikeouts: raw.SO.unwrap_or(0),
                stolen_bases: raw.SB.unwrap_or(0),
                caught_stealing: raw.CS.unwrap_or(0),
                hit_by_pitch: raw.HBP.unwrap_or(0),
                sacrifice_flies: raw.SF.unwrap_or(0),
                sacrifice_hits: raw.SH.unwrap_or(0),
                birth_year: None,
            },
        })
    })
}

fn load_hall_of_fame_from_reader<R: Read>(rdr: R) -> Result<Vec<HallOfFameRow>, csv::Error> {
    read_rows(rdr, "HallOfFame", |raw: RawHallOfFame| {
        let player_id = raw.playerID.trim().to_string();
        (!player_id.is_empty()).then(|| HallOfFameRow {
            player_id,
            year: raw.yearid,
            voted_by: non_empty(raw.votedBy).unwrap_or_default(),
            inducted: raw.inducted.trim().eq_ignore_ascii_case("Y"),
        })
    })
}

fn load_all_stars_from_reader<R: Read>(rdr: R) -> Result<Vec<AllStarRow>, csv::Error> {
    read_rows(rdr, "AllstarFull", |raw: RawAllStar| {
        let player_id = raw.playerID.trim().to_string();
        (!player_id.is_empty()).then(|| AllStarRow {
            player_id,
            year: raw.yearID,
            game_num: raw.gameNum.unwrap_or(0),
            team_id: non_empty(raw.teamID),
        })
    })
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

fn load_file<T>(
    path: &Path,
    loader: impl FnOnce(std::fs::File) -> Result<Vec<T>, csv::Error>,
) -> Result<Vec<T>, ImportError> {
    let file = std::fs::File::open(path).map_err(|e| ImportError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    loader(file).map_err(|e| ImportError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Like [`load_file`] but a missing file yields no rows and a warning.
fn load_optional_file<T>(
    path: &Path,
    loader: impl FnOnce(std::fs::File) -> Result<Vec<T>, csv::Error>,
) -> Result<Vec<T>, ImportError> {
    if !path.exists() {
        warn!("{} not found, skipping", path.display());
        return Ok(Vec::new());
    }
    load_file(path, loader)
}

/// Parse the Lahman CSV files in `dir`. People, Teams and Batting are
/// required; HallOfFame and AllstarFull are optional.
pub fn load_lahman_dir(dir: &Path) -> Result<LahmanTables, ImportError> {
    Ok(LahmanTables {
        people: load_file(&dir.join("People.csv"), load_people_from_reader)?,
        teams: load_file(&dir.join("Teams.csv"), load_teams_from_reader)?,
        batting: load_file(&dir.join("Batting.csv"), load_batting_from_reader)?,
        hall_of_fame: load_optional_file(&dir.join("HallOfFame.csv"), load_hall_of_fame_from_reader)?,
        all_stars: load_optional_file(&dir.join("AllstarFull.csv"), load_all_stars_from_reader)?,
    })
}

/// Parse `dir` and write everything to `db` in one transaction.
pub fn import_lahman_dir(db: &Database, dir: &Path) -> Result<ImportSummary> {
    info!("importing Lahman CSVs from {}", dir.display());
    let tables = load_lahman_dir(dir)
        .with_context(|| format!("failed to load Lahman data from {}", dir.display()))?;
    db.import_lahman(&tables)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
