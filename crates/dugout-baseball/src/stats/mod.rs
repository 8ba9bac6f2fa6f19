// Rate stats derived from raw season counting stats.

pub mod counting;
pub mod format;
pub mod league;
pub mod metrics;
pub mod team;

pub use counting::{CountingStats, Honors, RosterRow};
pub use league::{compute_league_baseline, LeagueBaseline};
pub use metrics::{compute_derived_metrics, Badge, BadgeKind, DerivedMetrics, RateLine};
pub use team::{aggregate_team, derive_roster, LeaderCategory, PlayerLine, TeamLeader, TeamSummary};
