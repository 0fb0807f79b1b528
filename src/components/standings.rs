use crate::draw;
use crossterm::style::Stylize;
use football_api::standings::{SortDirection, StandingsView, Split};
use football_api::{League, TeamStanding};
use tabled::Tabled;

#[derive(Tabled)]
struct StandingRow {
    #[tabled(rename = "Pos")]
    pos: String,
    #[tabled(rename = "Team")]
    team: String,
    #[tabled(rename = "P")]
    played: u32,
    #[tabled(rename = "W")]
    win: u32,
    #[tabled(rename = "D")]
    draw: u32,
    #[tabled(rename = "L")]
    lose: u32,
    #[tabled(rename = "GF")]
    goals_for: u32,
    #[tabled(rename = "GA")]
    goals_against: u32,
    #[tabled(rename = "GD")]
    goal_difference: String,
    #[tabled(rename = "Pts")]
    points: String,
    #[tabled(rename = "Form")]
    form: String,
}

pub fn render(table: &[TeamStanding], view: StandingsView) -> String {
    let size = table.len();
    let rows = table.iter().map(|s| StandingRow {
        pos: draw::position(s.rank, size),
        team: s.team.name.clone(),
        played: s.played,
        win: s.win,
        draw: s.draw,
        lose: s.lose,
        goals_for: s.goals_for,
        goals_against: s.goals_against,
        goal_difference: draw::signed(s.goal_difference()),
        points: s.points.to_string().cyan().bold().to_string(),
        form: s.form.clone().unwrap_or_default(),
    });

    let mut out = String::new();
    if !view.is_upstream() {
        let split = match view.split {
            Split::All => "Overall",
            Split::Home => "Home",
            Split::Away => "Away",
        };
        let order = match view.direction {
            SortDirection::Desc => "descending",
            SortDirection::Asc => "ascending",
        };
        out.push_str(&format!("{split} table, sorted by {} ({order})\n", view.sort));
    }
    out.push_str(&draw::boxed(rows));
    out
}

#[derive(Tabled)]
struct LeagueRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "League")]
    name: String,
    #[tabled(rename = "Country")]
    country: String,
    #[tabled(rename = "Type")]
    kind: String,
}

pub fn render_leagues(leagues: &[League]) -> String {
    let rows = leagues.iter().map(|l| LeagueRow {
        id: l.id,
        name: l.name.clone(),
        country: l.country.clone(),
        kind: draw::or_na(l.kind.as_deref()),
    });
    format!("{}\n\nTotal: {} leagues found", draw::boxed(rows), leagues.len())
}

/// Numbered list shown when a name search matches several leagues.
pub fn render_choices(leagues: &[League]) -> String {
    leagues
        .iter()
        .enumerate()
        .map(|(i, l)| format!("{}. {} ({}) [ID: {}]", i + 1, l.name, l.country, l.id))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use football_api::standings::SortCriterion;
    use football_api::Team;

    fn standing(rank: u32, name: &str, points: i32, gf: u32, ga: u32) -> TeamStanding {
        TeamStanding {
            rank,
            team: Team { name: name.into(), ..Default::default() },
            points,
            played: 10,
            goals_for: gf,
            goals_against: ga,
            ..Default::default()
        }
    }

    #[test]
    fn upstream_view_has_no_caption() {
        let out = render(&[standing(1, "Arsenal", 25, 20, 8)], StandingsView::default());
        assert!(out.contains("Arsenal"));
        assert!(out.contains("+12"));
        assert!(!out.contains("sorted by"));
    }

    #[test]
    fn custom_view_is_captioned() {
        let view = StandingsView {
            split: Split::Away,
            sort: SortCriterion::GoalsFor,
            direction: SortDirection::Asc,
        };
        let out = render(&[standing(1, "Everton", 9, 4, 10)], view);
        assert!(out.starts_with("Away table, sorted by goals_for (ascending)"));
        assert!(out.contains("-6"));
    }

    #[test]
    fn league_listing_counts_and_marks_missing_type() {
        let leagues = vec![
            League { id: 39, name: "Premier League".into(), country: "England".into(), kind: Some("League".into()), ..Default::default() },
            League { id: 45, name: "FA Cup".into(), country: "England".into(), ..Default::default() },
        ];
        let out = render_leagues(&leagues);
        assert!(out.contains("N/A"));
        assert!(out.contains("Total: 2 leagues found"));
        assert_eq!(render_choices(&leagues).lines().nth(1), Some("2. FA Cup (England) [ID: 45]"));
    }
}
