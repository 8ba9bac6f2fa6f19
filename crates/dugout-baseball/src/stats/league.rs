// League-wide baseline used to normalize OPS into OPS+.

use serde::{Deserialize, Serialize};

use super::counting::CountingStats;
use super::metrics::guarded_ratio;

/// Season-wide AVG/OBP/SLG/OPS computed from summed league counting stats.
///
/// The all-zero default stands in for a season with no rows; with it every
/// OPS+ for that season is undefined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LeagueBaseline {
    pub totals: CountingStats,
    pub avg: f64,
    pub obp: f64,
    pub slg: f64,
    pub ops: f64,
}

impl LeagueBaseline {
    /// Whether OPS+ can be computed against this baseline.
    pub fn is_usable(&self) -> bool {
        self.ops > 0.0
    }

    /// `OPS / league OPS * 100`, undefined unless both are positive.
    pub fn ops_plus(&self, ops: f64) -> Option<f64> {
        if !self.is_usable() || ops <= 0.0 {
            return None;
        }
        Some(ops / self.ops * 100.0)
    }
}

/// Build the baseline from the league's summed counting stats for a season.
/// Pass `None` when the data source has no rows for the season.
pub fn compute_league_baseline(totals: Option<&CountingStats>) -> LeagueBaseline {
    let Some(totals) = totals else {
        return LeagueBaseline::default();
    };

    let at_bats = totals.at_bats as f64;
    let avg = guarded_ratio(totals.hits as f64, at_bats).unwrap_or(0.0);
    let obp = guarded_ratio(
        (totals.hits + totals.walks + totals.hit_by_pitch) as f64,
        totals.plate_appearances() as f64,
    )
    .unwrap_or(0.0);
    let slg = guarded_ratio(totals.total_bases() as f64, at_bats).unwrap_or(0.0);

    LeagueBaseline {
        totals: CountingStats {
            birth_year: None,
            ..*totals
        },
        avg,
        obp,
        slg,
        ops: obp + slg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn league_totals() -> CountingStats {
        CountingStats {
            at_bats: 5000,
            hits: 1300,
            doubles: 250,
            triples: 30,
            home_runs: 150,
            walks: 500,
            hit_by_pitch: 50,
            sacrifice_flies: 40,
            sacrifice_hits: 10,
            ..Default::default()
        }
    }

    #[test]
    fn baseline_rates_from_totals() {
        let b = compute_league_baseline(Some(&league_totals()));
        assert!(approx_eq(b.avg, 0.26, 1e-12));
        // (1300 + 500 + 50) / (5000 + 500 + 50 + 40 + 10)
        assert!(approx_eq(b.obp, 1850.0 / 5600.0, 1e-12));
        // singles = 870, TB = 870 + 500 + 90 + 600
        assert!(approx_eq(b.slg, 2060.0 / 5000.0, 1e-12));
        assert!(approx_eq(b.ops, b.obp + b.slg, 1e-12));
        assert!(b.is_usable());
    }

    #[test]
    fn missing_season_is_all_zero() {
        let b = compute_league_baseline(None);
        assert_eq!(b, LeagueBaseline::default());
        assert!(!b.is_usable());
        assert_eq!(b.ops_plus(0.900), None);
    }

    #[test]
    fn zero_totals_are_guarded() {
        let b = compute_league_baseline(Some(&CountingStats::default()));
        assert_eq!(b.avg, 0.0);
        assert_eq!(b.obp, 0.0);
        assert_eq!(b.slg, 0.0);
        assert_eq!(b.ops, 0.0);
    }

    #[test]
    fn ops_plus_of_league_average_is_100() {
        let b = compute_league_baseline(Some(&league_totals()));
        assert!(approx_eq(b.ops_plus(b.ops).unwrap(), 100.0, 1e-9));
        assert_eq!(b.ops_plus(0.0), None);
    }
}
