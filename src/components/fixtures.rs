use crate::cli::OutputFormat;
use crate::draw;
use crossterm::style::Stylize;
use football_api::{Fixture, FixtureTeam, LeagueFixtures, ScorePair, TeamRecord};
use tabled::Tabled;

#[derive(Tabled)]
struct FixtureRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Home Team")]
    home: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Away Team")]
    away: String,
}

impl From<&Fixture> for FixtureRow {
    fn from(fixture: &Fixture) -> Self {
        Self {
            time: fixture
                .date
                .map_or_else(|| "--:--".into(), |d| d.format("%H:%M").to_string()),
            status: draw::status_color(fixture.status.phase(), &draw::status_label(fixture)),
            home: team_name(&fixture.home),
            score: fixture.score_display(),
            away: team_name(&fixture.away),
        }
    }
}

fn team_name(team: &FixtureTeam) -> String {
    if team.winner == Some(true) {
        team.name.as_str().green().to_string()
    } else {
        team.name.clone()
    }
}

pub fn render(fixtures: &[Fixture], format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => draw::simple(fixtures.iter().map(FixtureRow::from)),
        OutputFormat::Detailed => fixtures.iter().map(detailed).collect::<Vec<_>>().join("\n"),
    }
}

fn detailed(fixture: &Fixture) -> String {
    let when = fixture
        .date
        .map_or_else(|| "date unknown".into(), |d| d.format("%Y-%m-%d %H:%M").to_string());
    let venue = fixture.venue.as_deref().map(|v| format!(" at {v}")).unwrap_or_default();
    let referee = fixture
        .referee
        .as_deref()
        .map(|r| format!(" (Referee: {r})"))
        .unwrap_or_default();
    let status = format!("{} ({})", fixture.status.long, draw::status_label(fixture));

    let mut lines = vec![
        format!("\n{}", when.yellow().bold()),
        format!("{} vs {}{venue}{referee}", fixture.home.name, fixture.away.name),
        format!("Status: {}", draw::status_color(fixture.status.phase(), &status)),
        format!("\nScore: {}", fixture.score_display().bold()),
    ];
    if let Some(score) = &fixture.score {
        let periods = [
            ("Halftime", &score.halftime),
            ("Fulltime", &score.fulltime),
            ("Extra Time", &score.extratime),
            ("Penalties", &score.penalty),
        ];
        lines.extend(
            periods
                .into_iter()
                .filter_map(|(label, pair)| score_line(pair).map(|s| format!("{label}: {s}"))),
        );
    }
    lines.push("-".repeat(50));
    lines.join("\n")
}

fn score_line(pair: &ScorePair) -> Option<String> {
    let home = pair.home?;
    Some(format!("{home}-{}", pair.away.unwrap_or(0)))
}

/// One block per league, then a total.
pub fn render_by_league(groups: &[LeagueFixtures], format: OutputFormat) -> String {
    let mut out = Vec::new();
    for group in groups {
        let title = format!("▶ {} ({})", group.league.name, group.league.country);
        out.push(format!("\n{}", title.green().bold()));
        out.push(render(&group.fixtures, format));
    }
    let total: usize = groups.iter().map(|g| g.fixtures.len()).sum();
    let summary = format!("Total: {total} matches in {} leagues", groups.len());
    out.push(format!("\n{}", summary.blue().bold()));
    out.join("\n")
}

/// Win/draw/loss summary for the history view.
pub fn render_record(record: &TeamRecord) -> String {
    let rows = [
        ("Matches Played", record.played.to_string()),
        ("Wins", record.wins.to_string().green().to_string()),
        ("Draws", record.draws.to_string().yellow().to_string()),
        ("Losses", record.losses.to_string().red().to_string()),
        ("Goals For", record.goals_for.to_string()),
        ("Goals Against", record.goals_against.to_string()),
        ("Goal Difference", draw::signed(record.goal_difference())),
    ];
    format!(
        "{}\n{}",
        draw::section("Summary Stats"),
        draw::key_values(rows.into_iter().map(|(k, v)| vec![k.to_string(), v]))
    )
}
