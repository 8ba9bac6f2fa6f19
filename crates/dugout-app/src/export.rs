// Team batting CSV download.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dugout_baseball::stats::format::{format_ops_plus, format_percent, format_rate};
use dugout_baseball::stats::PlayerLine;
use dugout_core::season::TeamPage;
use tracing::info;

const HEADERS: &[&str] = &[
    "Player ID",
    "Player",
    "Age",
    "Games",
    "At Bats",
    "Hits",
    "Doubles",
    "Triples",
    "Home Runs",
    "RBIs",
    "Walks",
    "Strikeouts",
    "Stolen Bases",
    "Caught Stealing",
    "SB%",
    "AVG",
    "OBP",
    "SLG",
    "OPS",
    "ISO",
    "BABIP",
    "wOBA",
    "OPS+",
    "Hall of Fame",
    "All-Star",
    "Badges",
];

pub fn export_file_name(team_id: &str, year: i32) -> String {
    format!("{team_id}_{year}_batting.csv")
}

fn yes_no(flag: bool) -> String {
    if flag { "Yes" } else { "No" }.to_string()
}

fn player_record(line: &PlayerLine) -> Vec<String> {
    let s = &line.row.stats;
    let r = &line.metrics.rates;
    vec![
        line.player_id().to_string(),
        line.player_name().to_string(),
        // Undefined age is a blank cell here, not the placeholder.
        line.metrics.age.map(|a| a.to_string()).unwrap_or_default(),
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
        yes_no(line.metrics.honors.hall_of_fame),
        yes_no(line.metrics.honors.all_star),
        line.metrics.badge_text(),
    ]
}

fn totals_record(page: &TeamPage) -> Vec<String> {
    let s = &page.season.summary.totals;
    let r = &page.season.summary.rates;
    vec![
        String::new(),
        "Team Totals".to_string(),
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
        String::new(),
        String::new(),
        String::new(),
    ]
}

/// Write one row per player plus a Team Totals row.
pub fn write_team_csv<W: Write>(page: &TeamPage, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(HEADERS).context("failed to write CSV header")?;
    for line in &page.season.players {
        csv.write_record(player_record(line))
            .with_context(|| format!("failed to write CSV row for {}", line.player_id()))?;
    }
    csv.write_record(totals_record(page))
        .context("failed to write CSV totals row")?;
    csv.flush().context("failed to flush CSV")?;
    Ok(())
}

/// Write `{team}_{year}_batting.csv` under `dir`, creating it if needed.
pub fn export_team(page: &TeamPage, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create export directory {}", dir.display()))?;
    let path = dir.join(export_file_name(&page.info.team_id, page.season.year));
    let file = std::fs::File::create(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    write_team_csv(page, file)?;
    info!("exported {} players to {}", page.season.players.len(), path.display());
    Ok(path)
}
