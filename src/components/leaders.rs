use crate::cli::TopCategory;
use crate::draw;
use crossterm::style::Stylize;
use football_api::leaders::CardKind;
use football_api::PlayerSeasonStats;

pub fn title(category: TopCategory, cards: CardKind) -> &'static str {
    match (category, cards) {
        (TopCategory::Goals, _) => "Top Scorers",
        (TopCategory::Assists, _) => "Top Assists",
        (TopCategory::Cards, CardKind::Yellow) => "Players with Most Yellow Cards",
        (TopCategory::Cards, CardKind::Red) => "Players with Most Red Cards",
        (TopCategory::Cards, CardKind::Both) => "Players with Most Cards (Yellow & Red)",
        (TopCategory::Appearances, _) => "Most Appearances",
        (TopCategory::Passes, _) => "Most Passes",
    }
}

fn metric_headers(category: TopCategory, cards: CardKind) -> Vec<&'static str> {
    match (category, cards) {
        (TopCategory::Goals, _) => vec!["Goals"],
        (TopCategory::Assists, _) => vec!["Assists"],
        (TopCategory::Cards, CardKind::Yellow) => vec!["Yellow Cards"],
        (TopCategory::Cards, CardKind::Red) => vec!["Red Cards"],
        (TopCategory::Cards, CardKind::Both) => vec!["Yellow", "Red", "Total"],
        (TopCategory::Appearances, _) => vec!["Minutes"],
        (TopCategory::Passes, _) => vec!["Passes", "Key Passes", "Accuracy"],
    }
}

fn metric_cells(row: &PlayerSeasonStats, category: TopCategory, cards: CardKind) -> Vec<String> {
    match (category, cards) {
        (TopCategory::Goals, _) => vec![row.goals.to_string().green().bold().to_string()],
        (TopCategory::Assists, _) => vec![row.assists.to_string().green().bold().to_string()],
        (TopCategory::Cards, CardKind::Yellow) => vec![row.yellow.to_string().yellow().to_string()],
        (TopCategory::Cards, CardKind::Red) => vec![row.red.to_string().red().to_string()],
        (TopCategory::Cards, CardKind::Both) => vec![
            row.yellow.to_string().yellow().to_string(),
            row.red.to_string().red().to_string(),
            (row.yellow + row.red).to_string().white().bold().to_string(),
        ],
        (TopCategory::Appearances, _) => vec![row.minutes.to_string()],
        (TopCategory::Passes, _) => vec![
            row.passes.to_string().green().bold().to_string(),
            row.key_passes.to_string(),
            row.pass_accuracy
                .map_or_else(|| "N/A".into(), |a| format!("{a:.0}%")),
        ],
    }
}

/// Leaderboard rows in the order given, ranked from 1.
pub fn render(rows: &[PlayerSeasonStats], category: TopCategory, cards: CardKind, detailed: bool) -> String {
    let mut headers = vec!["Rank", "Player"];
    if detailed {
        headers.extend(["Age", "Nationality", "Position"]);
    }
    headers.extend(["Team", "Games"]);
    headers.extend(metric_headers(category, cards));
    if detailed {
        headers.push("Rating");
    }

    let body = rows.iter().enumerate().map(|(i, row)| {
        let mut cells = vec![(i + 1).to_string(), row.player.name.as_str().cyan().bold().to_string()];
        if detailed {
            cells.push(draw::or_na(row.player.age));
            cells.push(draw::or_na(row.player.nationality.as_deref()));
            cells.push(draw::or_na(row.position.as_deref()));
        }
        cells.push(row.team_name.clone());
        cells.push(row.appearances.to_string());
        cells.extend(metric_cells(row, category, cards));
        if detailed {
            cells.push(row.rating.map_or_else(|| "N/A".into(), |r| format!("{r:.2}")));
        }
        cells
    });

    let mut out = draw::dynamic(&headers, body);
    if !detailed {
        out.push_str(&format!("\n{}", "Tip: add --detailed for age, position and rating".dark_grey()));
    }
    out
}
