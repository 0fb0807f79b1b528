use crate::components::lineup;
use crate::draw;
use crossterm::style::Stylize;
use football_api::{EventCategory, Fixture, FixtureEvent, FixtureStatistics, MatchStatistics};

/// Date, league and scoreline above the detail sections.
pub fn render_header(fixture: &Fixture) -> String {
    let when = fixture
        .date
        .map_or_else(|| "date unknown".into(), |d| d.format("%Y-%m-%d %H:%M").to_string());
    format!(
        "\n{}\n{}\nStatus: {}\n",
        format!("{when} - {}", fixture.league.name).yellow().bold(),
        format!("{} {} {}", fixture.home.name, fixture.score_display(), fixture.away.name).green(),
        fixture.status.long
    )
}

fn by_minute<'a>(events: &'a [FixtureEvent], category: EventCategory) -> Vec<&'a FixtureEvent> {
    let mut picked: Vec<_> = events.iter().filter(|e| e.category() == category).collect();
    picked.sort_by_key(|e| (e.elapsed.unwrap_or(0), e.extra.unwrap_or(0)));
    picked
}

pub fn render_events(events: &[FixtureEvent]) -> String {
    let mut out = vec![draw::section("Match Events")];
    if events.is_empty() {
        out.push("No events recorded for this match.".into());
        return out.join("\n");
    }

    let goals = by_minute(events, EventCategory::Goal);
    if !goals.is_empty() {
        out.push(format!("\n{}", "Goals:".green()));
        out.push(draw::dynamic(
            &["Time", "Team", "Scorer", "Type"],
            goals.into_iter().map(|e| {
                let assist = e
                    .assist_name
                    .as_deref()
                    .map(|a| format!(" (Assist: {a})"))
                    .unwrap_or_default();
                vec![e.minute_label(), e.team_name.clone(), format!("{}{assist}", e.player_name), e.detail.clone()]
            }),
        ));
    }

    let cards = by_minute(events, EventCategory::Card);
    if !cards.is_empty() {
        out.push(format!("\n{}", "Cards:".yellow()));
        out.push(draw::dynamic(
            &["Time", "Team", "Player", "Card"],
            cards.into_iter().map(|e| {
                let card = if e.detail.to_lowercase().contains("yellow") {
                    e.detail.as_str().yellow()
                } else {
                    e.detail.as_str().red()
                };
                vec![e.minute_label(), e.team_name.clone(), e.player_name.clone(), card.to_string()]
            }),
        ));
    }

    // For substitutions the other player rides in `assist`.
    let subs = by_minute(events, EventCategory::Substitution);
    if !subs.is_empty() {
        out.push(format!("\n{}", "Substitutions:".blue()));
        out.push(draw::dynamic(
            &["Time", "Team", "In", "Out"],
            subs.into_iter().map(|e| {
                let outgoing = e.assist_name.as_deref().or(e.comments.as_deref()).unwrap_or("Unknown");
                vec![
                    e.minute_label(),
                    e.team_name.clone(),
                    format!("IN: {}", e.player_name).green().to_string(),
                    format!("OUT: {outgoing}").red().to_string(),
                ]
            }),
        ));
    }
    out.join("\n")
}

/// Side by side when there are exactly two teams, one table each otherwise.
pub fn render_team_statistics(teams: &[FixtureStatistics]) -> String {
    let mut out = vec![draw::section("Team Statistics")];
    match teams {
        [] => out.push("No team statistics available for this match.".into()),
        [home, away] => {
            let mut kinds: Vec<&str> = home.statistics.iter().map(|s| s.kind.as_str()).collect();
            for s in &away.statistics {
                if !kinds.contains(&s.kind.as_str()) {
                    kinds.push(s.kind.as_str());
                }
            }
            let cell = |team: &FixtureStatistics, kind: &str| {
                team.get(kind).map_or_else(|| "N/A".into(), |v| v.to_string())
            };
            out.push(draw::dynamic(
                &["Statistic", home.team_name.as_str(), away.team_name.as_str()],
                kinds.into_iter().map(|k| vec![k.to_owned(), cell(home, k), cell(away, k)]),
            ));
        }
        _ => {
            for team in teams {
                out.push(format!("\n{}", format!("{}:", team.team_name).green()));
                out.push(draw::dynamic(
                    &["Statistic", "Value"],
                    team.statistics.iter().map(|s| vec![s.kind.clone(), s.value.to_string()]),
                ));
            }
        }
    }
    out.join("\n")
}

pub fn render(stats: &MatchStatistics) -> String {
    let mut out = vec![render_events(&stats.events), render_team_statistics(&stats.team_statistics)];
    out.push(draw::section("Team Lineups"));
    if stats.lineups.is_empty() {
        out.push("No lineup information available for this match.".into());
    }
    out.extend(stats.lineups.iter().map(|l| lineup::render(l, false)));
    out.join("\n")
}
