// Season-scoped lookups behind the team, compare, and export commands.

use anyhow::Result;
use dugout_baseball::compare::{compare_entities, Comparison, TeamSide, PLAYER_STATS, TEAM_STATS};
use dugout_baseball::source::{load_team_season, TeamRef, TeamSeason};
use dugout_baseball::stats::PlayerLine;
use thiserror::Error;
use tracing::debug;

use crate::config::YearRange;
use crate::db::{Database, TeamInfo};

/// User-facing rejections. Always recoverable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Season {0} is outside the supported range.")]
    OutOfRange(i32),

    #[error("No records for team {team} in {year}.")]
    UnknownTeam { team: String, year: i32 },

    #[error("No batting stats available for team {team} in {year}.")]
    NoStats { team: String, year: i32 },
}

/// One team-season with everything the team page shows.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamPage {
    pub info: TeamInfo,
    pub season: TeamSeason,
}

impl TeamPage {
    pub fn side(&self) -> TeamSide {
        TeamSide {
            team_id: self.info.team_id.clone(),
            name: self.info.name.clone(),
            wins: self.info.wins,
            losses: self.info.losses,
            summary: self.season.summary.clone(),
        }
    }

    /// Roster sorted by player name for the compare pickers.
    pub fn candidates(&self) -> Vec<&PlayerLine> {
        let mut players: Vec<&PlayerLine> = self.season.players.iter().collect();
        players.sort_by(|a, b| a.player_name().cmp(b.player_name()));
        players
    }
}

/// Lahman team ids are stored upper-case.
pub fn normalize_team_id(team: &str) -> String {
    team.trim().to_ascii_uppercase()
}

pub struct Catalog<'a> {
    db: &'a Database,
    seasons: YearRange,
}

impl<'a> Catalog<'a> {
    pub fn new(db: &'a Database, seasons: YearRange) -> Self {
        Catalog { db, seasons }
    }

    fn check_year(&self, year: i32) -> Result<(), LookupError> {
        if self.seasons.contains(year) {
            Ok(())
        } else {
            Err(LookupError::OutOfRange(year))
        }
    }

    pub fn teams(&self, year: i32) -> Result<Vec<TeamRef>> {
        self.check_year(year)?;
        self.db.teams_for_year(year)
    }

    pub fn team_page(&self, team: &str, year: i32) -> Result<TeamPage> {
        self.check_year(year)?;
        let team = normalize_team_id(team);

        let Some(info) = self.db.team_info(&team, year)? else {
            return Err(LookupError::UnknownTeam { team, year }.into());
        };
        let Some(season) = load_team_season(self.db, &team, year)? else {
            return Err(LookupError::NoStats { team, year }.into());
        };
        debug!("{} players on {team} {year}", season.players.len());

        Ok(TeamPage { info, season })
    }

    /// Compare two players from the same team-season.
    pub fn compare_players(
        &self,
        team: &str,
        year: i32,
        left_id: &str,
        right_id: &str,
    ) -> Result<Comparison> {
        let page = self.team_page(team, year)?;
        Ok(compare_entities(&page.season.players, left_id, right_id, PLAYER_STATS)?)
    }

    /// Compare two teams from the same season.
    pub fn compare_teams(&self, year: i32, left: &str, right: &str) -> Result<Comparison> {
        let (left, right) = (normalize_team_id(left), normalize_team_id(right));
        let sides = if left == right {
            Vec::new()
        } else {
            vec![
                self.team_page(&left, year)?.side(),
                self.team_page(&right, year)?.side(),
            ]
        };
        Ok(compare_entities(&sides, &left, &right, TEAM_STATS)?)
    }
}
