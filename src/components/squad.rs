use crate::draw;
use crossterm::style::{Color, Stylize};
use football_api::{Player, Team};
use tabled::Tabled;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PositionGroup {
    Goalkeepers,
    Defenders,
    Midfielders,
    Forwards,
    Others,
}

impl PositionGroup {
    const ORDER: [PositionGroup; 5] = [
        PositionGroup::Goalkeepers,
        PositionGroup::Defenders,
        PositionGroup::Midfielders,
        PositionGroup::Forwards,
        PositionGroup::Others,
    ];

    /// Accepts the long upstream names as well as the usual abbreviations.
    pub fn classify(position: Option<&str>) -> Self {
        let Some(position) = position else {
            return PositionGroup::Others;
        };
        let p = position.to_lowercase();
        if p == "goalkeeper" || p == "gk" || p == "g" {
            PositionGroup::Goalkeepers
        } else if p.contains("defender") || matches!(p.as_str(), "d" | "cb" | "lb" | "rb" | "rwb" | "lwb") {
            PositionGroup::Defenders
        } else if p.contains("midfielder") || matches!(p.as_str(), "m" | "cm" | "cdm" | "cam" | "rm" | "lm" | "dm" | "am") {
            PositionGroup::Midfielders
        } else if p.contains("attacker")
            || p.contains("forward")
            || p.contains("striker")
            || matches!(p.as_str(), "f" | "cf" | "st" | "rw" | "lw")
        {
            PositionGroup::Forwards
        } else {
            PositionGroup::Others
        }
    }

    pub fn color(self) -> Color {
        match self {
            PositionGroup::Goalkeepers => Color::Yellow,
            PositionGroup::Defenders => Color::Blue,
            PositionGroup::Midfielders => Color::Green,
            PositionGroup::Forwards => Color::Red,
            PositionGroup::Others => Color::White,
        }
    }

    fn label(self) -> &'static str {
        match self {
            PositionGroup::Goalkeepers => "Goalkeepers",
            PositionGroup::Defenders => "Defenders",
            PositionGroup::Midfielders => "Midfielders",
            PositionGroup::Forwards => "Forwards",
            PositionGroup::Others => "Others",
        }
    }
}

#[derive(Tabled)]
struct PlayerRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Age")]
    age: String,
    #[tabled(rename = "Position")]
    position: String,
    #[tabled(rename = "Nationality")]
    nationality: String,
}

pub fn render_team(team: &Team, season: i32) -> String {
    let mut lines = vec![draw::heading(&team.name)];
    if !team.country.is_empty() {
        lines.push(format!("Country: {}", team.country));
    }
    if let Some(founded) = team.founded {
        lines.push(format!("Founded: {founded}"));
    }
    if let Some(venue) = &team.venue_name {
        lines.push(format!("Venue: {venue}"));
    }
    lines.push(format!("Season: {season}"));
    lines.join("\n")
}

/// Players grouped by position, each group sorted by name.
pub fn render(players: &[Player]) -> String {
    let mut out = Vec::new();
    for group in PositionGroup::ORDER {
        let mut members: Vec<&Player> = players
            .iter()
            .filter(|p| PositionGroup::classify(p.position.as_deref()) == group)
            .collect();
        if members.is_empty() {
            continue;
        }
        members.sort_by(|a, b| a.name.cmp(&b.name));

        let color = group.color();
        out.push(format!("\n{}", format!("{}:", group.label()).with(color).bold()));
        out.push(draw::simple(members.into_iter().map(|p| PlayerRow {
            id: p.id,
            name: p.name.as_str().with(color).to_string(),
            age: p.age.map_or_else(|| "-".into(), |a| a.to_string()),
            position: p.position.clone().unwrap_or_else(|| "-".into()),
            nationality: p.nationality.clone().unwrap_or_else(|| "-".into()),
        })));
    }
    let total = format!("Total: {} players", players.len());
    out.push(format!("\n{}", total.cyan().bold()));
    out.join("\n")
}
