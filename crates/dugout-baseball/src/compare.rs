// Side-by-side comparison of two players or two teams against a fixed stat table.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::stats::counting::CountingStats;
use crate::stats::format::{format_percent, format_rate, DiffClass, StatKind};
use crate::stats::metrics::{Badge, RateLine};
use crate::stats::team::{PlayerLine, TeamSummary};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompareError {
    #[error("choose a different entity for comparison (both sides are `{0}`)")]
    SameEntity(String),

    #[error("selected entity `{0}` could not be found")]
    UnknownEntity(String),
}

// ---------------------------------------------------------------------------
// Stat configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatKey {
    Age,
    Games,
    PlateAppearances,
    AtBats,
    Hits,
    Doubles,
    Triples,
    HomeRuns,
    RunsBattedIn,
    Walks,
    Strikeouts,
    StolenBases,
    CaughtStealing,
    SbPct,
    Avg,
    Obp,
    Slg,
    Ops,
    Iso,
    Babip,
    Woba,
    OpsPlus,
}

/// One row of a comparison table: which stat, its label, and how to format it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatSpec {
    pub key: StatKey,
    pub label: &'static str,
    pub kind: StatKind,
}

const fn spec(key: StatKey, label: &'static str, kind: StatKind) -> StatSpec {
    StatSpec { key, label, kind }
}

pub const PLAYER_STATS: &[StatSpec] = &[
    spec(StatKey::Age, "Age", StatKind::Integer),
    spec(StatKey::Games, "Games", StatKind::Integer),
    spec(StatKey::AtBats, "At Bats", StatKind::Integer),
    spec(StatKey::Hits, "Hits", StatKind::Integer),
    spec(StatKey::Doubles, "Doubles", StatKind::Integer),
    spec(StatKey::Triples, "Triples", StatKind::Integer),
    spec(StatKey::HomeRuns, "Home Runs", StatKind::Integer),
    spec(StatKey::RunsBattedIn, "RBIs", StatKind::Integer),
    spec(StatKey::Walks, "Walks", StatKind::Integer),
    spec(StatKey::Strikeouts, "Strikeouts", StatKind::Integer),
    spec(StatKey::StolenBases, "Stolen Bases", StatKind::Integer),
    spec(StatKey::CaughtStealing, "Caught Stealing", StatKind::Integer),
    spec(StatKey::SbPct, "SB%", StatKind::Percent),
    spec(StatKey::Avg, "AVG", StatKind::Rate),
    spec(StatKey::Obp, "OBP", StatKind::Rate),
    spec(StatKey::Slg, "SLG", StatKind::Rate),
    spec(StatKey::Ops, "OPS", StatKind::Rate),
    spec(StatKey::Iso, "ISO", StatKind::Rate),
    spec(StatKey::Babip, "BABIP", StatKind::Rate),
    spec(StatKey::Woba, "wOBA", StatKind::Rate),
    spec(StatKey::OpsPlus, "OPS+", StatKind::OpsPlus),
];

/// Team totals have no age and roster games are not team games.
pub const TEAM_STATS: &[StatSpec] = &[
    spec(StatKey::PlateAppearances, "Plate Appearances", StatKind::Integer),
    spec(StatKey::AtBats, "At Bats", StatKind::Integer),
    spec(StatKey::Hits, "Hits", StatKind::Integer),
    spec(StatKey::Doubles, "Doubles", StatKind::Integer),
    spec(StatKey::Triples, "Triples", StatKind::Integer),
    spec(StatKey::HomeRuns, "Home Runs", StatKind::Integer),
    spec(StatKey::RunsBattedIn, "RBIs", StatKind::Integer),
    spec(StatKey::Walks, "Walks", StatKind::Integer),
    spec(StatKey::Strikeouts, "Strikeouts", StatKind::Integer),
    spec(StatKey::StolenBases, "Stolen Bases", StatKind::Integer),
    spec(StatKey::CaughtStealing, "Caught Stealing", StatKind::Integer),
    spec(StatKey::SbPct, "SB%", StatKind::Percent),
    spec(StatKey::Avg, "AVG", StatKind::Rate),
    spec(StatKey::Obp, "OBP", StatKind::Rate),
    spec(StatKey::Slg, "SLG", StatKind::Rate),
    spec(StatKey::Ops, "OPS", StatKind::Rate),
    spec(StatKey::Iso, "ISO", StatKind::Rate),
    spec(StatKey::Babip, "BABIP", StatKind::Rate),
    spec(StatKey::Woba, "wOBA", StatKind::Rate),
    spec(StatKey::OpsPlus, "OPS+", StatKind::OpsPlus),
];

fn stat_value(
    key: StatKey,
    stats: &CountingStats,
    rates: &RateLine,
    age: Option<i32>,
) -> Option<f64> {
    let count = |n: u32| Some(n as f64);
    match key {
        StatKey::Age => age.map(f64::from),
        StatKey::Games => count(stats.games),
        StatKey::PlateAppearances => count(stats.plate_appearances()),
        StatKey::AtBats => count(stats.at_bats),
        StatKey::Hits => count(stats.hits),
        StatKey::Doubles => count(stats.doubles),
        StatKey::Triples => count(stats.triples),
        StatKey::HomeRuns => count(stats.home_runs),
        StatKey::RunsBattedIn => count(stats.runs_batted_in),
        StatKey::Walks => count(stats.walks),
        StatKey::Strikeouts => count(stats.strikeouts),
        StatKey::StolenBases => count(stats.stolen_bases),
        StatKey::CaughtStealing => count(stats.caught_stealing),
        StatKey::SbPct => rates.sb_pct,
        StatKey::Avg => Some(rates.avg),
        StatKey::Obp => Some(rates.obp),
        StatKey::Slg => Some(rates.slg),
        StatKey::Ops => Some(rates.ops),
        StatKey::Iso => Some(rates.iso),
        StatKey::Babip => Some(rates.babip),
        StatKey::Woba => Some(rates.woba),
        StatKey::OpsPlus => rates.ops_plus,
    }
}

// ---------------------------------------------------------------------------
// Comparable entities
// ---------------------------------------------------------------------------

/// Headline card shown above the comparison table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryCard {
    pub id: String,
    pub name: String,
    /// Team record ("95-67"); `None` for players.
    pub record: Option<String>,
    pub badges: Vec<Badge>,
    pub slash_line: String,
    pub ops: String,
    pub ops_plus: String,
    pub sb_pct: String,
}

fn card_from(
    id: &str,
    name: &str,
    record: Option<String>,
    badges: Vec<Badge>,
    rates: &RateLine,
) -> SummaryCard {
    SummaryCard {
        id: id.to_string(),
        name: name.to_string(),
        record,
        badges,
        slash_line: format!(
            "{}/{}/{}",
            format_rate(rates.avg),
            format_rate(rates.obp),
            format_rate(rates.slg)
        ),
        ops: format_rate(rates.ops),
        ops_plus: StatKind::OpsPlus.format(rates.ops_plus),
        sb_pct: format_percent(rates.sb_pct),
    }
}

/// Anything that can appear on one side of a comparison.
pub trait Comparable {
    fn entity_id(&self) -> &str;
    fn stat(&self, key: StatKey) -> Option<f64>;
    fn card(&self) -> SummaryCard;
}

impl Comparable for PlayerLine {
    fn entity_id(&self) -> &str {
        self.player_id()
    }

    fn stat(&self, key: StatKey) -> Option<f64> {
        stat_value(key, &self.row.stats, &self.metrics.rates, self.metrics.age)
    }

    fn card(&self) -> SummaryCard {
        card_from(
            self.player_id(),
            self.player_name(),
            None,
            self.metrics.badges.clone(),
            &self.metrics.rates,
        )
    }
}

/// A team-season summary with the identity the comparison needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSide {
    pub team_id: String,
    pub name: String,
    pub wins: Option<u32>,
    pub losses: Option<u32>,
    pub summary: TeamSummary,
}

impl Comparable for TeamSide {
    fn entity_id(&self) -> &str {
        &self.team_id
    }

    fn stat(&self, key: StatKey) -> Option<f64> {
        stat_value(key, &self.summary.totals, &self.summary.rates, None)
    }

    fn card(&self) -> SummaryCard {
        let record = match (self.wins, self.losses) {
            (Some(w), Some(l)) => Some(format!("{w}-{l}")),
            _ => None,
        };
        card_from(&self.team_id, &self.name, record, Vec::new(), &self.summary.rates)
    }
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub label: String,
    pub left: String,
    pub right: String,
    pub difference: String,
    pub class: DiffClass,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub left: SummaryCard,
    pub right: SummaryCard,
    pub rows: Vec<ComparisonRow>,
}

/// Build the comparison table for two resolved entities. Differences are
/// `left - right`.
pub fn compare_pair<T: Comparable>(left: &T, right: &T, config: &[StatSpec]) -> Comparison {
    let rows = config
        .iter()
        .map(|spec| {
            let left_value = left.stat(spec.key);
            let right_value = right.stat(spec.key);
            let (difference, class) = spec.kind.format_difference(left_value, right_value);
            ComparisonRow {
                label: spec.label.to_string(),
                left: spec.kind.format(left_value),
                right: spec.kind.format(right_value),
                difference,
                class,
            }
        })
        .collect();

    Comparison {
        left: left.card(),
        right: right.card(),
        rows,
    }
}

/// Look up both ids among `candidates` and compare them.
///
/// Rejects identical ids before looking anything up, then rejects ids that
/// are not among the candidates.
pub fn compare_entities<T: Comparable>(
    candidates: &[T],
    left_id: &str,
    right_id: &str,
    config: &[StatSpec],
) -> Result<Comparison, CompareError> {
    if left_id == right_id {
        return Err(CompareError::SameEntity(left_id.to_string()));
    }
    let find = |id: &str| {
        candidates
            .iter()
            .find(|c| c.entity_id() == id)
            .ok_or_else(|| CompareError::UnknownEntity(id.to_string()))
    };
    let left = find(left_id)?;
    let right = find(right_id)?;
    Ok(compare_pair(left, right, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::counting::{Honors, RosterRow};
    use crate::stats::league::{compute_league_baseline, LeagueBaseline};
    use crate::stats::team::{aggregate_team, derive_roster};

    fn baseline() -> LeagueBaseline {
        compute_league_baseline(Some(&CountingStats {
            at_bats: 5500,
            hits: 1430,
            doubles: 280,
            triples: 30,
            home_runs: 160,
            walks: 520,
            hit_by_pitch: 55,
            sacrifice_flies: 45,
            ..Default::default()
        }))
    }

    fn player(id: &str, ab: u32, h: u32, hr: u32, sb: u32, cs: u32, birth: Option<i32>) -> RosterRow {
        RosterRow {
            player_id: id.to_string(),
            player_name: format!("Name {id}"),
            stats: CountingStats {
                games: 120,
                at_bats: ab,
                hits: h,
                doubles: h / 5,
                home_runs: hr,
                runs_batted_in: hr * 3,
                walks: ab / 10,
                strikeouts: ab / 5,
                stolen_bases: sb,
                caught_stealing: cs,
                birth_year: birth,
                ..Default::default()
            },
            honors: Honors::default(),
        }
    }

    fn roster() -> Vec<PlayerLine> {
        derive_roster(
            vec![
                player("p1", 500, 150, 30, 10, 5, Some(1970)),
                player("p2", 450, 120, 12, 0, 0, None),
                player("p3", 450, 120, 12, 0, 0, Some(1972)),
            ],
            &baseline(),
            1999,
        )
    }

    #[test]
    fn same_entity_is_rejected() {
        let err = compare_entities(&roster(), "p1", "p1", PLAYER_STATS).unwrap_err();
        assert_eq!(err, CompareError::SameEntity("p1".into()));
    }

    #[test]
    fn same_unknown_entity_is_still_same_entity() {
        let err = compare_entities(&roster(), "zz", "zz", PLAYER_STATS).unwrap_err();
        assert_eq!(err, CompareError::SameEntity("zz".into()));
    }

    #[test]
    fn unknown_entity_is_rejected() {
        let err = compare_entities(&roster(), "p1", "ghost", PLAYER_STATS).unwrap_err();
        assert_eq!(err, CompareError::UnknownEntity("ghost".into()));
        let err = compare_entities(&roster(), "ghost", "p1", PLAYER_STATS).unwrap_err();
        assert_eq!(err, CompareError::UnknownEntity("ghost".into()));
    }

    #[test]
    fn rows_follow_config_order() {
        let cmp = compare_entities(&roster(), "p1", "p3", PLAYER_STATS).unwrap();
        let labels: Vec<&str> = cmp.rows.iter().map(|r| r.label.as_str()).collect();
        let expected: Vec<&str> = PLAYER_STATS.iter().map(|s| s.label).collect();
        assert_eq!(labels, expected);
        assert_eq!(cmp.left.name, "Name p1");
        assert_eq!(cmp.right.name, "Name p3");
    }

    #[test]
    fn differences_and_classes() {
        let cmp = compare_entities(&roster(), "p1", "p3", PLAYER_STATS).unwrap();
        let row = |label: &str| cmp.rows.iter().find(|r| r.label == label).unwrap().clone();

        let hr = row("Home Runs");
        assert_eq!((hr.left.as_str(), hr.right.as_str()), ("30", "12"));
        assert_eq!(hr.difference, "+18");
        assert_eq!(hr.class, DiffClass::Positive);

        let age = row("Age");
        assert_eq!(age.difference, "+2");

        let avg = row("AVG");
        assert_eq!((avg.left.as_str(), avg.right.as_str()), ("0.300", "0.267"));
        assert_eq!(avg.difference, "+0.033");
    }

    #[test]
    fn undefined_values_render_placeholder_and_even() {
        let cmp = compare_entities(&roster(), "p1", "p2", PLAYER_STATS).unwrap();
        let row = |label: &str| cmp.rows.iter().find(|r| r.label == label).unwrap().clone();

        let sb = row("SB%");
        assert_eq!(sb.left, "66.7%");
        assert_eq!(sb.right, "—");
        assert_eq!(sb.difference, "—");
        assert_eq!(sb.class, DiffClass::Even);

        let age = row("Age");
        assert_eq!(age.right, "—");
        assert_eq!(age.class, DiffClass::Even);
    }

    #[test]
    fn identical_lines_are_even_everywhere_defined() {
        let cmp = compare_entities(&roster(), "p2", "p3", PLAYER_STATS).unwrap();
        assert!(cmp.rows.iter().all(|r| r.class == DiffClass::Even));
    }

    #[test]
    fn player_card_has_slash_line() {
        let cmp = compare_entities(&roster(), "p1", "p2", PLAYER_STATS).unwrap();
        assert!(cmp.left.slash_line.starts_with("0.300/"));
        assert_eq!(cmp.left.record, None);
        assert_eq!(cmp.right.sb_pct, "—");
    }

    #[test]
    fn team_comparison() {
        let lines = roster();
        let base = baseline();
        let summary = aggregate_team(&lines, &base).unwrap();
        let weaker = aggregate_team(&lines[1..], &base).unwrap();
        let teams = vec![
            TeamSide {
                team_id: "NYA".into(),
                name: "New York Yankees".into(),
                wins: Some(98),
                losses: Some(64),
                summary,
            },
            TeamSide {
                team_id: "BOS".into(),
                name: "Boston Red Sox".into(),
                wins: Some(94),
                losses: Some(68),
                summary: weaker,
            },
        ];

        let cmp = compare_entities(&teams, "NYA", "BOS", TEAM_STATS).unwrap();
        assert_eq!(cmp.left.record.as_deref(), Some("98-64"));
        assert_eq!(cmp.rows.len(), TEAM_STATS.len());
        let hr = cmp.rows.iter().find(|r| r.label == "Home Runs").unwrap();
        assert_eq!(hr.difference, "+30");
        assert!(compare_entities(&teams, "BOS", "BOS", TEAM_STATS).is_err());
    }
}
