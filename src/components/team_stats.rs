use crate::draw;
use crossterm::style::Stylize;
use football_api::{MinuteBucket, TeamStatistics};

fn rate(part: u32, whole: u32) -> String {
    if whole == 0 {
        return "N/A".into();
    }
    format!("{:.1}%", f64::from(part) / f64::from(whole) * 100.0)
}

fn kv(label: &str, value: impl ToString) -> Vec<String> {
    vec![label.to_owned(), value.to_string()]
}

pub fn render(stats: &TeamStatistics, season: i32) -> String {
    let league = if stats.league.name.is_empty() { "All Competitions" } else { stats.league.name.as_str() };
    let f = &stats.fixtures;
    let scored = &stats.goals.scored;
    let conceded = &stats.goals.conceded;

    let mut out = vec![
        draw::heading(&format!("Season Statistics for {}", stats.team.name)),
        format!("Season: {season}"),
        format!("League: {league}"),
    ];
    if let Some(form) = stats.form.as_deref().filter(|f| !f.is_empty()) {
        out.push(format!("Form: {}", draw::truncate(form, 10)));
    }

    out.push(draw::section("Overall Performance"));
    out.push(draw::key_values([
        kv("Matches Played", f.played.total),
        kv("Wins", f.wins.total.to_string().green()),
        kv("Draws", f.draws.total.to_string().yellow()),
        kv("Losses", f.losses.total.to_string().red()),
        kv("Win Rate", rate(f.wins.total, f.played.total)),
    ]));

    out.push(draw::section("Goals"));
    out.push(draw::key_values([
        kv("Goals Scored", scored.total),
        kv("Goals Conceded", conceded.total),
        kv("Goal Difference", draw::signed(i64::from(scored.total) - i64::from(conceded.total))),
        kv("Clean Sheets", stats.clean_sheet.total),
        kv("Failed to Score", stats.failed_to_score.total),
        kv("Avg Goals Scored", format!("{:.2} per match", scored.average)),
        kv("Avg Goals Conceded", format!("{:.2} per match", conceded.average)),
    ]));

    let timing: Vec<&MinuteBucket> = scored.minute.iter().filter(|b| b.total > 0).collect();
    if !timing.is_empty() {
        out.push(draw::section("Goal Timing"));
        out.push(draw::dynamic(
            &["Minute", "Goals", "Percentage", "Distribution"],
            timing.into_iter().map(|b| {
                vec![
                    b.range.clone(),
                    b.total.to_string(),
                    b.percentage.clone().unwrap_or_else(|| "-".into()),
                    "█".repeat(b.total.min(20) as usize).green().to_string(),
                ]
            }),
        ));
    }

    out.push(draw::section("Home vs Away Performance"));
    out.push(draw::dynamic(
        &["", "Home", "Away", "Total"],
        [
            ("Played", f.played),
            ("Wins", f.wins),
            ("Draws", f.draws),
            ("Losses", f.losses),
        ]
        .into_iter()
        .map(|(label, ha)| (label, ha.home, ha.away, ha.total))
        .chain([
            ("Goals For", scored.home, scored.away, scored.total),
            ("Goals Against", conceded.home, conceded.away, conceded.total),
        ])
        .map(|(label, home, away, total)| {
            vec![label.to_owned(), home.to_string(), away.to_string(), total.to_string()]
        }),
    ));

    if !stats.lineups.is_empty() {
        let mut formations: Vec<_> = stats.lineups.iter().collect();
        formations.sort_by(|a, b| b.played.cmp(&a.played));
        out.push(draw::section("Most Used Formations"));
        out.push(draw::dynamic(
            &["Formation", "Played", "Percentage"],
            formations.into_iter().map(|l| {
                vec![l.formation.clone(), l.played.to_string(), rate(l.played, f.played.total)]
            }),
        ));
    }

    out.push(draw::section("Discipline"));
    out.push(draw::key_values([
        vec!["Yellow Cards".to_string(), "■".yellow().to_string(), stats.cards.yellow.total.to_string()],
        vec!["Red Cards".to_string(), "■".red().to_string(), stats.cards.red.total.to_string()],
    ]));

    out.push(draw::section("Biggest Results"));
    let b = &stats.biggest;
    let venue = |score: &Option<String>, side: &str| {
        score.as_deref().map_or_else(|| "None".into(), |s| format!("{s} ({side})"))
    };
    out.push(draw::key_values([
        vec!["Biggest Win:".to_string(), venue(&b.wins.home, "Home"), venue(&b.wins.away, "Away")],
        vec!["Biggest Loss:".to_string(), venue(&b.losses.home, "Home"), venue(&b.losses.away, "Away")],
        vec!["Longest Win Streak:".to_string(), b.streak.wins.to_string(), String::new()],
        vec!["Longest Draw Streak:".to_string(), b.streak.draws.to_string(), String::new()],
        vec!["Longest Loss Streak:".to_string(), b.streak.losses.to_string(), String::new()],
    ]));

    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use football_api::{FixtureCounts, FormationUsage, GoalStats, HomeAway, Team, TeamGoals};

    fn stats() -> TeamStatistics {
        TeamStatistics {
            team: Team { id: 33, name: "Manchester United".into(), ..Default::default() },
            fixtures: FixtureCounts {
                played: HomeAway { home: 19, away: 19, total: 38 },
                wins: HomeAway { home: 10, away: 8, total: 18 },
                draws: HomeAway { home: 3, away: 3, total: 6 },
                losses: HomeAway { home: 6, away: 8, total: 14 },
            },
            goals: TeamGoals {
                scored: GoalStats {
                    home: 31,
                    away: 27,
                    total: 58,
                    average: 1.53,
                    minute: vec![
                        MinuteBucket { range: "0-15".into(), total: 7, percentage: Some("12.07%".into()) },
                        MinuteBucket { range: "91-105".into(), total: 0, percentage: None },
                    ],
                },
                conceded: GoalStats { total: 43, average: 1.13, ..Default::default() },
            },
            lineups: vec![
                FormationUsage { formation: "4-3-3".into(), played: 4 },
                FormationUsage { formation: "4-2-3-1".into(), played: 30 },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn summary_sections_and_win_rate() {
        let out = render(&stats(), 2023);
        assert!(out.contains("Season Statistics for Manchester United"));
        assert!(out.contains("League: All Competitions"));
        assert!(out.contains("47.4%"));
        assert!(out.contains("+15"));
        assert!(out.contains("1.53 per match"));
    }

    #[test]
    fn empty_minute_buckets_are_left_out_of_timing() {
        let out = render(&stats(), 2023);
        assert!(out.contains("0-15"));
        assert!(!out.contains("91-105"));
    }

    #[test]
    fn formations_most_used_first() {
        let out = render(&stats(), 2023);
        let common = out.find("4-2-3-1").unwrap();
        let rare = out.find("4-3-3").unwrap();
        assert!(common < rare);
    }

    #[test]
    fn no_matches_played_means_no_rate() {
        let out = render(&TeamStatistics::default(), 2023);
        assert!(out.contains("N/A"));
        assert!(out.contains("None"));
    }
}
