// Raw per-season counting stats as fetched from the data source.

use std::iter::Sum;
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

/// Season counting stats for one player on one team (or a sum of such lines).
///
/// Missing values from the data source are treated as zero, except the birth
/// year which stays `None` so that age can be reported as undefined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountingStats {
    pub games: u32,
    pub at_bats: u32,
    pub hits: u32,
    pub doubles: u32,
    pub triples: u32,
    pub home_runs: u32,
    pub runs_batted_in: u32,
    pub walks: u32,
    pub strikeouts: u32,
    pub stolen_bases: u32,
    pub caught_stealing: u32,
    pub hit_by_pitch: u32,
    pub sacrifice_flies: u32,
    pub sacrifice_hits: u32,
    pub birth_year: Option<i32>,
}

impl CountingStats {
    /// Hits that were not extra-base hits, floored at zero for rows whose
    /// extra-base breakdown exceeds total hits.
    pub fn singles(&self) -> u32 {
        let extra_base = self.doubles as i64 + self.triples as i64 + self.home_runs as i64;
        (self.hits as i64 - extra_base).max(0) as u32
    }

    pub fn total_bases(&self) -> u32 {
        self.singles() + 2 * self.doubles + 3 * self.triples + 4 * self.home_runs
    }

    /// AB + BB + HBP + SF + SH.
    pub fn plate_appearances(&self) -> u32 {
        self.at_bats + self.walks + self.hit_by_pitch + self.sacrifice_flies + self.sacrifice_hits
    }

    pub fn stolen_base_attempts(&self) -> u32 {
        self.stolen_bases + self.caught_stealing
    }

    /// Balls in play that count toward BABIP: AB - SO - HR + SF.
    ///
    /// Signed because data with more strikeouts than at-bats can drive it
    /// negative; callers treat anything `<= 0` as an empty denominator.
    pub fn balls_in_play(&self) -> i64 {
        self.at_bats as i64 - self.strikeouts as i64 - self.home_runs as i64
            + self.sacrifice_flies as i64
    }

    /// Age during `year`, if a positive birth year is known.
    pub fn age_in(&self, year: i32) -> Option<i32> {
        self.birth_year.filter(|&b| b > 0).map(|b| year - b)
    }
}

/// Summing lines drops the birth year: an aggregate has no single age.
impl AddAssign<&CountingStats> for CountingStats {
    fn add_assign(&mut self, rhs: &CountingStats) {
        self.games += rhs.games;
        self.at_bats += rhs.at_bats;
        self.hits += rhs.hits;
        self.doubles += rhs.doubles;
        self.triples += rhs.triples;
        self.home_runs += rhs.home_runs;
        self.runs_batted_in += rhs.runs_batted_in;
        self.walks += rhs.walks;
        self.strikeouts += rhs.strikeouts;
        self.stolen_bases += rhs.stolen_bases;
        self.caught_stealing += rhs.caught_stealing;
        self.hit_by_pitch += rhs.hit_by_pitch;
        self.sacrifice_flies += rhs.sacrifice_flies;
        self.sacrifice_hits += rhs.sacrifice_hits;
        self.birth_year = None;
    }
}

impl<'a> Sum<&'a CountingStats> for CountingStats {
    fn sum<I: Iterator<Item = &'a CountingStats>>(iter: I) -> Self {
        iter.fold(CountingStats::default(), |mut acc, line| {
            acc += line;
            acc
        })
    }
}

/// Hall of Fame / All-Star flags attached to a player-season line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Honors {
    pub hall_of_fame: bool,
    pub all_star: bool,
}

/// One roster line as returned by the data source for a team-season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterRow {
    pub player_id: String,
    pub player_name: String,
    pub stats: CountingStats,
    pub honors: Honors,
}
