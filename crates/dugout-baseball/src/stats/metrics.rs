// Per-line rate stats: AVG/OBP/SLG/OPS/ISO/BABIP/SB%/wOBA/OPS+ plus badges.

use serde::{Deserialize, Serialize};

use super::counting::{CountingStats, Honors};
use super::league::LeagueBaseline;

// ---------------------------------------------------------------------------
// wOBA linear weights (fixed, not configurable)
// ---------------------------------------------------------------------------

pub const WOBA_WALK: f64 = 0.69;
pub const WOBA_HIT_BY_PITCH: f64 = 0.72;
pub const WOBA_SINGLE: f64 = 0.89;
pub const WOBA_DOUBLE: f64 = 1.27;
pub const WOBA_TRIPLE: f64 = 1.62;
pub const WOBA_HOME_RUN: f64 = 2.10;

/// `numerator / denominator`, or `None` when the denominator is not positive.
///
/// Every rate in this crate goes through here; the caller decides whether an
/// empty denominator means zero or undefined.
pub(crate) fn guarded_ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator > 0.0 {
        Some(numerator / denominator)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Rate line
// ---------------------------------------------------------------------------

/// The rate stats shared by player lines and team totals.
///
/// `sb_pct` and `ops_plus` are `None` when undefined (no steal attempts, no
/// usable league baseline, or a non-positive OPS). Every other rate falls
/// back to `0.0` on an empty denominator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RateLine {
    pub avg: f64,
    pub obp: f64,
    pub slg: f64,
    pub ops: f64,
    pub iso: f64,
    pub babip: f64,
    pub sb_pct: Option<f64>,
    pub woba: f64,
    pub ops_plus: Option<f64>,
}

impl RateLine {
    /// Compute every rate from raw counts. Team totals call this with summed
    /// counts, never with averaged player rates.
    pub fn from_counts(stats: &CountingStats, baseline: &LeagueBaseline) -> Self {
        let at_bats = stats.at_bats as f64;
        let plate_appearances = stats.plate_appearances() as f64;

        let avg = guarded_ratio(stats.hits as f64, at_bats).unwrap_or(0.0);
        let on_base = (stats.hits + stats.walks + stats.hit_by_pitch) as f64;
        let obp = guarded_ratio(on_base, plate_appearances).unwrap_or(0.0);
        let slg = guarded_ratio(stats.total_bases() as f64, at_bats).unwrap_or(0.0);
        let ops = obp + slg;

        let babip = guarded_ratio(
            stats.hits as f64 - stats.home_runs as f64,
            stats.balls_in_play() as f64,
        )
        .unwrap_or(0.0);

        let sb_pct = guarded_ratio(
            stats.stolen_bases as f64,
            stats.stolen_base_attempts() as f64,
        );

        let woba = guarded_ratio(woba_numerator(stats), plate_appearances).unwrap_or(0.0);

        RateLine {
            avg,
            obp,
            slg,
            ops,
            iso: slg - avg,
            babip,
            sb_pct,
            woba,
            ops_plus: baseline.ops_plus(ops),
        }
    }
}

fn woba_numerator(stats: &CountingStats) -> f64 {
    WOBA_WALK * stats.walks as f64
        + WOBA_HIT_BY_PITCH * stats.hit_by_pitch as f64
        + WOBA_SINGLE * stats.singles() as f64
        + WOBA_DOUBLE * stats.doubles as f64
        + WOBA_TRIPLE * stats.triples as f64
        + WOBA_HOME_RUN * stats.home_runs as f64
}

// ---------------------------------------------------------------------------
// Badges
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BadgeKind {
    HallOfFame,
    AllStar,
}

impl BadgeKind {
    /// Stable identifier a renderer can key styling on.
    pub fn tag(&self) -> &'static str {
        match self {
            BadgeKind::HallOfFame => "hof",
            BadgeKind::AllStar => "allstar",
        }
    }
}

/// A semantic badge; markup is left to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub kind: BadgeKind,
    pub label: String,
}

fn badges_for(honors: Honors, year: i32) -> Vec<Badge> {
    let mut badges = Vec::new();
    if honors.hall_of_fame {
        badges.push(Badge {
            kind: BadgeKind::HallOfFame,
            label: "Hall of Fame".to_string(),
        });
    }
    if honors.all_star {
        badges.push(Badge {
            kind: BadgeKind::AllStar,
            label: format!("All-Star {year}"),
        });
    }
    badges
}

// ---------------------------------------------------------------------------
// Derived metrics
// ---------------------------------------------------------------------------

/// Everything derived from one player-season-team line. Recomputed per
/// request, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub age: Option<i32>,
    pub singles: u32,
    pub total_bases: u32,
    pub plate_appearances: u32,
    pub rates: RateLine,
    pub honors: Honors,
    pub badges: Vec<Badge>,
}

impl DerivedMetrics {
    /// Comma-separated badge labels, empty when the player has none.
    pub fn badge_text(&self) -> String {
        self.badges
            .iter()
            .map(|b| b.label.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Derive the full metric set for one counting-stats line in `year`.
pub fn compute_derived_metrics(
    stats: &CountingStats,
    honors: Honors,
    baseline: &LeagueBaseline,
    year: i32,
) -> DerivedMetrics {
    DerivedMetrics {
        age: stats.age_in(year),
        singles: stats.singles(),
        total_bases: stats.total_bases(),
        plate_appearances: stats.plate_appearances(),
        rates: RateLine::from_counts(stats, baseline),
        honors,
        badges: badges_for(honors, year),
    }
}
