use crate::components::squad::PositionGroup;
use crate::draw;
use crossterm::style::Stylize;
use football_api::{LineupPlayer, TeamLineup};
use std::collections::BTreeMap;
use tabled::Tabled;

const PITCH_WIDTH: usize = 60;

#[derive(Tabled)]
struct StarterRow {
    #[tabled(rename = "#")]
    number: String,
    #[tabled(rename = "Player")]
    name: String,
    #[tabled(rename = "Position")]
    position: String,
    #[tabled(rename = "Grid")]
    grid: String,
}

#[derive(Tabled)]
struct SubstituteRow {
    #[tabled(rename = "#")]
    number: String,
    #[tabled(rename = "Player")]
    name: String,
    #[tabled(rename = "Position")]
    position: String,
}

fn number(player: &LineupPlayer) -> String {
    player.number.map_or_else(|| "-".into(), |n| n.to_string())
}

/// Starting eleven split into pitch rows, goalkeeper first.
///
/// Grid rows are used when every starter has one; otherwise the starters
/// are cut into goalkeeper plus the formation lines in listed order. A
/// formation that doesn't add up to eleven puts every outfield player on
/// one line.
pub fn pitch_rows(lineup: &TeamLineup) -> Vec<Vec<&LineupPlayer>> {
    let cells: Option<Vec<_>> = lineup.starters.iter().map(|p| p.grid_cell().map(|c| (c, p))).collect();
    if let Some(cells) = cells
        && !cells.is_empty()
    {
        let mut rows: BTreeMap<u32, Vec<((u32, u32), &LineupPlayer)>> = BTreeMap::new();
        for (cell, player) in cells {
            rows.entry(cell.0).or_default().push((cell, player));
        }
        return rows
            .into_values()
            .map(|mut row| {
                row.sort_by_key(|(cell, _)| cell.1);
                row.into_iter().map(|(_, p)| p).collect()
            })
            .collect();
    }

    let mut sizes = vec![1];
    if lineup.is_complete_formation() {
        sizes.extend(lineup.formation_lines().into_iter().map(|n| n as usize));
    } else {
        sizes.push(lineup.starters.len().saturating_sub(1));
    }
    let mut rest = lineup.starters.iter();
    sizes
        .into_iter()
        .map(|n| rest.by_ref().take(n).collect::<Vec<_>>())
        .filter(|row| !row.is_empty())
        .collect()
}

fn centered(text: &str, width: usize) -> String {
    let len = text.chars().count();
    let pad = width.saturating_sub(len) / 2;
    format!("{}{text}", " ".repeat(pad))
}

/// Text pitch, one line per row. Names are colored by their position.
pub fn render_pitch(lineup: &TeamLineup) -> String {
    let rows = pitch_rows(lineup);
    let mut lines = Vec::new();
    for row in rows {
        let slot = PITCH_WIDTH / row.len().max(1);
        let mut line = String::new();
        for player in row {
            let label = match player.number {
                Some(n) => format!("{} ({n})", draw::truncate(&player.name, 15)),
                None => draw::truncate(&player.name, 15),
            };
            let padded = format!("{:<slot$}", centered(&label, slot));
            let color = PositionGroup::classify(player.position.as_deref()).color();
            line.push_str(&padded.with(color).to_string());
        }
        lines.push(line.trim_end().to_owned());
        lines.push(String::new());
    }
    lines.join("\n")
}

pub fn render(lineup: &TeamLineup, visual: bool) -> String {
    let mut out = vec![format!("\n{}", lineup.team_name.as_str().magenta().bold())];
    out.push(format!(
        "Formation: {}",
        lineup.formation.as_deref().unwrap_or("N/A").yellow()
    ));
    out.push(format!("Coach: {}", lineup.coach.as_deref().unwrap_or("N/A")));

    if visual && lineup.formation.is_some() && !lineup.starters.is_empty() {
        out.push(draw::section("Pitch"));
        out.push(render_pitch(lineup));
    }

    out.push(draw::section("Starting XI"));
    let mut starters: Vec<&LineupPlayer> = lineup.starters.iter().collect();
    starters.sort_by_key(|p| (p.grid_cell().unwrap_or((u32::MAX, u32::MAX)), p.name.clone()));
    out.push(draw::simple(starters.into_iter().map(|p| StarterRow {
        number: number(p),
        name: p.name.clone(),
        position: p.position.clone().unwrap_or_else(|| "-".into()),
        grid: p.grid.clone().unwrap_or_else(|| "-".into()),
    })));

    out.push(draw::section("Substitutes"));
    if lineup.substitutes.is_empty() {
        out.push("None listed.".into());
    } else {
        out.push(draw::simple(lineup.substitutes.iter().map(|p| SubstituteRow {
            number: number(p),
            name: p.name.clone(),
            position: p.position.clone().unwrap_or_else(|| "-".into()),
        })));
    }
    out.join("\n")
}
