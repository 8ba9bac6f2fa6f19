// Plain-text rendering of team pages, comparisons, and pickers.

use std::fmt::Write as _;

use dugout_baseball::compare::{Comparison, SummaryCard};
use dugout_baseball::source::TeamRef;
use dugout_baseball::stats::format::{format_age, format_ops_plus, format_percent, format_rate};
use dugout_baseball::stats::{LeaderCategory, PlayerLine, TeamLeader};
use dugout_core::season::TeamPage;
use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

// ---------------------------------------------------------------------------
// Table layout
// ---------------------------------------------------------------------------

/// psql-style table; columns from `first_numeric` on are right-aligned.
fn build_table(headers: Vec<String>, rows: Vec<Vec<String>>, first_numeric: usize) -> String {
    let mut builder = Builder::default();
    builder.push_record(headers);
    for row in rows {
        builder.push_record(row);
    }
    let mut table = builder.build();
    table
        .with(Style::psql())
        .modify(Columns::new(first_numeric..), Alignment::right());
    table.to_string()
}

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|h| h.to_string()).collect()
}

#[derive(Tabled)]
struct TeamListRow {
    #[tabled(rename = "Team")]
    team_id: String,
    #[tabled(rename = "Name")]
    name: String,
}

#[derive(Tabled)]
struct CandidateRow {
    #[tabled(rename = "Player ID")]
    player_id: String,
    #[tabled(rename = "Player")]
    name: String,
}

// ---------------------------------------------------------------------------
// Team page
// ---------------------------------------------------------------------------

const TEAM_HEADERS: &[&str] = &[
    "Player", "Badges", "Age", "G", "AB", "H", "2B", "3B", "HR", "RBI", "BB", "SO", "SB", "CS",
    "SB%", "AVG", "OBP", "SLG", "OPS", "ISO", "BABIP", "wOBA", "OPS+",
];

fn player_row(line: &PlayerLine) -> Vec<String> {
    let s = &line.row.stats;
    let r = &line.metrics.rates;
    vec![
        line.player_name().to_string(),
        line.metrics.badge_text(),
        format_age(line.metrics.age),
        s.games.to_string(),
        s.at_bats.to_string(),
        s.hits.to_string(),
        s.doubles.to_string(),
        s.triples.to_string(),
        s.home_runs.to_string(),
        s.runs_batted_in.to_string(),
        s.walks.to_string(),
        s.strikeouts.to_string(),
        s.stolen_bases.to_string(),
        s.caught_stealing.to_string(),
        format_percent(r.sb_pct),
        format_rate(r.avg),
        format_rate(r.obp),
        format_rate(r.slg),
        format_rate(r.ops),
        format_rate(r.iso),
        format_rate(r.babip),
        format_rate(r.woba),
        format_ops_plus(r.ops_plus),
    ]
}

fn totals_row(page: &TeamPage) -> Vec<String> {
    let summary = &page.season.summary;
    let s = &summary.totals;
    let r = &summary.rates;
    vec![
        "Team Totals".to_string(),
        String::new(),
        String::new(),
        s.games.to_string(),
        s.at_bats.to_string(),
        s.hits.to_string(),
        s.doubles.to_string(),
        s.triples.to_string(),
        s.home_runs.to_string(),
        s.runs_batted_in.to_string(),
        s.walks.to_string(),
        s.strikeouts.to_string(),
        s.stolen_bases.to_string(),
        s.caught_stealing.to_string(),
        format_percent(r.sb_pct),
        format_rate(r.avg),
        format_rate(r.obp),
        format_rate(r.slg),
        format_rate(r.ops),
        format_rate(r.iso),
        format_rate(r.babip),
        format_rate(r.woba),
        format_ops_plus(r.ops_plus),
    ]
}

fn leader_value(leader: &TeamLeader) -> String {
    let Some(value) = leader.value else {
        return String::new();
    };
    match leader.category {
        LeaderCategory::HomeRuns | LeaderCategory::StolenBases => format!(" ({})", value as u64),
        _ => format!(" ({})", format_rate(value)),
    }
}

pub fn render_team_page(page: &TeamPage) -> String {
    let info = &page.info;
    let summary = &page.season.summary;
    let rates = &summary.rates;
    let baseline = &summary.baseline;

    let mut out = String::new();
    let _ = write!(out, "{} {} ({})", page.season.year, info.name, info.team_id);
    if let Some(record) = info.record() {
        let _ = write!(out, "  {record}");
    }
    if let Some(league) = &info.league_id {
        let _ = write!(out, "  {league}");
    }
    out.push_str("\n\n");

    let mut rows: Vec<Vec<String>> = page.season.players.iter().map(player_row).collect();
    rows.push(totals_row(page));
    out.push_str(&build_table(headers(TEAM_HEADERS), rows, 2));
    out.push_str("\n\n");

    let _ = writeln!(
        out,
        "Team      {}/{}/{}  OPS {}  ISO {}  BABIP {}  wOBA {}  SB% {}  OPS+ {}",
        format_rate(rates.avg),
        format_rate(rates.obp),
        format_rate(rates.slg),
        format_rate(rates.ops),
        format_rate(rates.iso),
        format_rate(rates.babip),
        format_rate(rates.woba),
        format_percent(rates.sb_pct),
        format_ops_plus(rates.ops_plus),
    );
    let _ = writeln!(
        out,
        "League    {}/{}/{}  OPS {}",
        format_rate(baseline.avg),
        format_rate(baseline.obp),
        format_rate(baseline.slg),
        format_rate(baseline.ops),
    );
    let _ = writeln!(
        out,
        "Totals    {} HR  {} SB  {} Hall of Famers  {} All-Stars",
        summary.totals.home_runs, summary.totals.stolen_bases, summary.hall_of_famers, summary.all_stars,
    );
    out.push_str("Leaders\n");
    for leader in &summary.leaders {
        let _ = writeln!(
            out,
            "  {:<13} {}{}",
            leader.category.label(),
            leader.display_name(),
            leader_value(leader)
        );
    }
    out
}

// ---------------------------------------------------------------------------
// Pickers
// ---------------------------------------------------------------------------

pub fn render_teams(year: i32, teams: &[TeamRef]) -> String {
    if teams.is_empty() {
        return format!("No teams found for {year}.\n");
    }
    let rows = teams.iter().map(|team| TeamListRow {
        team_id: team.team_id.clone(),
        name: team.name.clone(),
    });
    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("Teams in {year}\n{table}\n")
}

pub fn render_candidates(page: &TeamPage) -> String {
    let rows = page.candidates().into_iter().map(|player| CandidateRow {
        player_id: player.player_id().to_string(),
        name: player.player_name().to_string(),
    });
    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!(
        "Players on the {} {} ({})\n{table}\n",
        page.season.year, page.info.name, page.info.team_id
    )
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

fn card_lines(card: &SummaryCard) -> Vec<String> {
    let mut title = card.name.clone();
    if let Some(record) = &card.record {
        let _ = write!(title, " ({record})");
    }
    let badges = card
        .badges
        .iter()
        .map(|b| format!("[{}]", b.label))
        .collect::<Vec<_>>()
        .join(" ");
    vec![
        title,
        badges,
        card.slash_line.clone(),
        format!("OPS {}  OPS+ {}", card.ops, card.ops_plus),
        format!("SB% {}", card.sb_pct),
    ]
}

pub fn render_comparison(comparison: &Comparison) -> String {
    let left = card_lines(&comparison.left);
    let right = card_lines(&comparison.right);
    let width = left.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    for (l, r) in left.iter().zip(&right) {
        if l.is_empty() && r.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{l:<width$}    {r}");
    }
    out.push('\n');

    let rows = comparison
        .rows
        .iter()
        .map(|row| {
            vec![
                row.label.clone(),
                row.left.clone(),
                row.right.clone(),
                row.difference.clone(),
                row.class.as_str().to_string(),
            ]
        })
        .collect();
    let headers = vec![
        "Stat".to_string(),
        comparison.left.name.clone(),
        comparison.right.name.clone(),
        "Diff".to_string(),
        String::new(),
    ];
    out.push_str(&build_table(headers, rows, 1));
    out.push('\n');
    out
}
