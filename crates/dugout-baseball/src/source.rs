// Collaborator seams: where rows come from and where trivia sessions live.
//
// The engine never executes queries or owns storage; it is handed an
// implementation of these traits by the caller.

use anyhow::Result;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::stats::counting::{CountingStats, RosterRow};
use crate::stats::league::{compute_league_baseline, LeagueBaseline};
use crate::stats::team::{aggregate_team, derive_roster, PlayerLine, TeamSummary};
use crate::trivia::question::TriviaRecord;
use crate::trivia::session::TriviaSessionState;

/// A team identity within one season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRef {
    pub team_id: String,
    pub name: String,
}

/// Row-fetch capability for team and league batting lines.
pub trait StatsSource {
    /// One row per player for the team-season, in display order.
    fn team_roster(&self, team_id: &str, year: i32) -> Result<Vec<RosterRow>>;

    /// League-wide summed counting stats, `None` if the season has no rows.
    fn league_totals(&self, year: i32) -> Result<Option<CountingStats>>;
}

/// Random-sample capability for the trivia game.
pub trait TriviaSource {
    /// One eligible player-season-team record, chosen uniformly with `rng`.
    fn sample_record(&self, rng: &mut dyn RngCore) -> Result<Option<TriviaRecord>>;

    /// Up to `count` distinct teams from the record's season that the player
    /// never batted for that year.
    fn other_teams(
        &self,
        record: &TriviaRecord,
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<TeamRef>>;
}

/// Per-caller trivia session storage. Unknown sessions load as `None`.
pub trait SessionStore {
    fn load_session(&self, session_id: &str) -> Result<Option<TriviaSessionState>>;
    fn save_session(&self, session_id: &str, state: &TriviaSessionState) -> Result<()>;
}

/// Everything the team pages need for one team-season.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamSeason {
    pub year: i32,
    pub baseline: LeagueBaseline,
    pub players: Vec<PlayerLine>,
    pub summary: TeamSummary,
}

/// Fetch the roster and league totals, derive every line, and aggregate.
///
/// `Ok(None)` means the team-season has no batting rows.
pub fn load_team_season(
    source: &dyn StatsSource,
    team_id: &str,
    year: i32,
) -> Result<Option<TeamSeason>> {
    let rows = source.team_roster(team_id, year)?;
    if rows.is_empty() {
        debug!("no batting rows for {team_id} in {year}");
        return Ok(None);
    }

    let league_totals = source.league_totals(year)?;
    let baseline = compute_league_baseline(league_totals.as_ref());
    let players = derive_roster(rows, &baseline, year);

    Ok(aggregate_team(&players, &baseline).map(|summary| TeamSeason {
        year,
        baseline,
        players,
        summary,
    }))
}
