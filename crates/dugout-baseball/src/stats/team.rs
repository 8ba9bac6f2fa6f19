// Team totals, team rates from summed counts, and category leaders.

use serde::{Deserialize, Serialize};

use super::counting::{CountingStats, RosterRow};
use super::league::LeagueBaseline;
use super::metrics::{compute_derived_metrics, DerivedMetrics, RateLine};

/// A roster line paired with its derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerLine {
    pub row: RosterRow,
    pub metrics: DerivedMetrics,
}

impl PlayerLine {
    pub fn new(row: RosterRow, baseline: &LeagueBaseline, year: i32) -> Self {
        let metrics = compute_derived_metrics(&row.stats, row.honors, baseline, year);
        PlayerLine { row, metrics }
    }

    pub fn player_id(&self) -> &str {
        &self.row.player_id
    }

    pub fn player_name(&self) -> &str {
        &self.row.player_name
    }
}

/// Derive metrics for every roster row, preserving input order.
pub fn derive_roster(rows: Vec<RosterRow>, baseline: &LeagueBaseline, year: i32) -> Vec<PlayerLine> {
    rows.into_iter()
        .map(|row| PlayerLine::new(row, baseline, year))
        .collect()
}

// ---------------------------------------------------------------------------
// Leaders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaderCategory {
    HomeRuns,
    Avg,
    Ops,
    Woba,
    StolenBases,
}

impl LeaderCategory {
    pub const ALL: [LeaderCategory; 5] = [
        LeaderCategory::HomeRuns,
        LeaderCategory::Avg,
        LeaderCategory::Ops,
        LeaderCategory::Woba,
        LeaderCategory::StolenBases,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LeaderCategory::HomeRuns => "Home Runs",
            LeaderCategory::Avg => "AVG",
            LeaderCategory::Ops => "OPS",
            LeaderCategory::Woba => "wOBA",
            LeaderCategory::StolenBases => "Stolen Bases",
        }
    }

    fn value_of(&self, line: &PlayerLine) -> Option<f64> {
        let value = match self {
            LeaderCategory::HomeRuns => line.row.stats.home_runs as f64,
            LeaderCategory::Avg => line.metrics.rates.avg,
            LeaderCategory::Ops => line.metrics.rates.ops,
            LeaderCategory::Woba => line.metrics.rates.woba,
            LeaderCategory::StolenBases => line.row.stats.stolen_bases as f64,
        };
        Some(value).filter(|v| v.is_finite())
    }
}

/// The roster leader in one category. `player_name` is `None` when no
/// player had a defined value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamLeader {
    pub category: LeaderCategory,
    pub player_id: Option<String>,
    pub player_name: Option<String>,
    pub value: Option<f64>,
}

impl TeamLeader {
    pub fn display_name(&self) -> &str {
        self.player_name.as_deref().unwrap_or("N/A")
    }
}

/// Maximum defined value; ties keep the earliest roster entry.
fn leader_for(category: LeaderCategory, roster: &[PlayerLine]) -> TeamLeader {
    let mut best: Option<(&PlayerLine, f64)> = None;
    for line in roster {
        let Some(value) = category.value_of(line) else {
            continue;
        };
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((line, value)),
        }
    }

    TeamLeader {
        category,
        player_id: best.map(|(line, _)| line.player_id().to_string()),
        player_name: best.map(|(line, _)| line.player_name().to_string()),
        value: best.map(|(_, value)| value),
    }
}

// ---------------------------------------------------------------------------
// Team summary
// ---------------------------------------------------------------------------

/// Roster totals for one team-season with rates recomputed from the sums.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub player_count: usize,
    pub totals: CountingStats,
    pub singles: u32,
    pub total_bases: u32,
    pub plate_appearances: u32,
    pub rates: RateLine,
    pub leaders: Vec<TeamLeader>,
    pub hall_of_famers: usize,
    pub all_stars: usize,
    pub baseline: LeagueBaseline,
}

impl TeamSummary {
    pub fn leader(&self, category: LeaderCategory) -> Option<&TeamLeader> {
        self.leaders.iter().find(|l| l.category == category)
    }
}

/// Fold a team-season roster into a [`TeamSummary`].
///
/// Returns `None` for an empty roster: the caller reports "no data for that
/// team/season" rather than treating it as a failure.
pub fn aggregate_team(roster: &[PlayerLine], baseline: &LeagueBaseline) -> Option<TeamSummary> {
    if roster.is_empty() {
        return None;
    }

    let totals: CountingStats = roster.iter().map(|line| &line.row.stats).sum();

    Some(TeamSummary {
        player_count: roster.len(),
        totals,
        singles: totals.singles(),
        total_bases: totals.total_bases(),
        plate_appearances: totals.plate_appearances(),
        rates: RateLine::from_counts(&totals, baseline),
        leaders: LeaderCategory::ALL
            .iter()
            .map(|&category| leader_for(category, roster))
            .collect(),
        hall_of_famers: roster.iter().filter(|l| l.row.honors.hall_of_fame).count(),
        all_stars: roster.iter().filter(|l| l.row.honors.all_star).count(),
        baseline: *baseline,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::counting::Honors;
    use crate::stats::league::compute_league_baseline;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn row(id: &str, ab: u32, h: u32, hr: u32, sb: u32, cs: u32) -> RosterRow {
        RosterRow {
            player_id: id.to_string(),
            player_name: format!("Player {id}"),
            stats: CountingStats {
                games: 100,
                at_bats: ab,
                hits: h,
                home_runs: hr,
                walks: ab / 10,
                strikeouts: ab / 5,
                stolen_bases: sb,
                caught_stealing: cs,
                birth_year: Some(1980),
                ..Default::default()
            },
            honors: Honors::default(),
        }
    }

    fn baseline() -> LeagueBaseline {
        compute_league_baseline(Some(&CountingStats {
            at_bats: 10_000,
            hits: 2_600,
            home_runs: 300,
            walks: 900,
            ..Default::default()
        }))
    }

    fn roster(rows: Vec<RosterRow>) -> Vec<PlayerLine> {
        derive_roster(rows, &baseline(), 2001)
    }

    #[test]
    fn empty_roster_has_no_summary() {
        assert!(aggregate_team(&[], &baseline()).is_none());
    }

    #[test]
    fn team_avg_comes_from_summed_counts() {
        // Player rates .400 and .200 average to .300, but summed counts give
        // 28 / 120.
        let lines = roster(vec![row("a", 20, 8, 0, 0, 0), row("b", 100, 20, 0, 0, 0)]);
        let summary = aggregate_team(&lines, &baseline()).unwrap();
        assert!(approx_eq(summary.rates.avg, 28.0 / 120.0, 1e-12));

        let summed: CountingStats = lines.iter().map(|l| &l.row.stats).sum();
        let direct = RateLine::from_counts(&summed, &baseline());
        assert_eq!(summary.rates, direct);
    }

    #[test]
    fn totals_and_counters() {
        let mut hof = row("a", 500, 150, 30, 5, 1);
        hof.honors.hall_of_fame = true;
        hof.honors.all_star = true;
        let mut star = row("b", 400, 100, 10, 20, 4);
        star.honors.all_star = true;
        let lines = roster(vec![hof, star, row("c", 50, 10, 0, 0, 0)]);

        let summary = aggregate_team(&lines, &baseline()).unwrap();
        assert_eq!(summary.player_count, 3);
        assert_eq!(summary.totals.at_bats, 950);
        assert_eq!(summary.totals.home_runs, 40);
        assert_eq!(summary.totals.stolen_bases, 25);
        assert_eq!(summary.hall_of_famers, 1);
        assert_eq!(summary.all_stars, 2);
        assert!(approx_eq(summary.rates.sb_pct.unwrap(), 25.0 / 30.0, 1e-12));
        assert!(summary.rates.ops_plus.is_some());
    }

    #[test]
    fn team_sb_pct_undefined_without_attempts() {
        let lines = roster(vec![row("a", 100, 30, 1, 0, 0), row("b", 100, 25, 2, 0, 0)]);
        let summary = aggregate_team(&lines, &baseline()).unwrap();
        assert_eq!(summary.rates.sb_pct, None);
    }

    #[test]
    fn team_ops_plus_undefined_without_baseline() {
        let lines = derive_roster(vec![row("a", 100, 30, 1, 0, 0)], &LeagueBaseline::default(), 2001);
        let summary = aggregate_team(&lines, &LeagueBaseline::default()).unwrap();
        assert_eq!(summary.rates.ops_plus, None);
    }

    #[test]
    fn leaders_pick_maximum() {
        let lines = roster(vec![
            row("a", 500, 150, 12, 30, 2),
            row("b", 500, 140, 35, 3, 1),
            row("c", 100, 40, 2, 1, 0),
        ]);
        let summary = aggregate_team(&lines, &baseline()).unwrap();
        assert_eq!(summary.leader(LeaderCategory::HomeRuns).unwrap().display_name(), "Player b");
        assert_eq!(summary.leader(LeaderCategory::Avg).unwrap().display_name(), "Player c");
        assert_eq!(summary.leader(LeaderCategory::StolenBases).unwrap().display_name(), "Player a");
        assert_eq!(summary.leader(LeaderCategory::HomeRuns).unwrap().value, Some(35.0));
    }

    #[test]
    fn leader_ties_keep_first_in_roster_order() {
        let lines = roster(vec![
            row("first", 100, 30, 10, 0, 0),
            row("second", 100, 30, 10, 0, 0),
        ]);
        let summary = aggregate_team(&lines, &baseline()).unwrap();
        for category in LeaderCategory::ALL {
            assert_eq!(
                summary.leader(category).unwrap().player_id.as_deref(),
                Some("first"),
                "{category:?}"
            );
        }
    }

    #[test]
    fn leader_without_defined_values_is_na() {
        let lead = leader_for(LeaderCategory::Avg, &[]);
        assert_eq!(lead.display_name(), "N/A");
        assert_eq!(lead.value, None);
    }
}
