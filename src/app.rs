use crate::cli::{Commands, ConfigCommands, OutputFormat, TopCategory};
use crate::components::{fixtures, leaders, lineup, match_stats, squad, standings, team_stats};
use crate::config::{ConfigStore, mask_key};
use crate::draw;
use crate::state::app_settings::AppSettings;
use anyhow::{Context, bail};
use chrono::{Local, NaiveDate, TimeDelta};
use crossterm::style::Stylize;
use football_api::leaders::{CardKind, LeaderMetric, rank_by};
use football_api::standings::StandingsView;
use football_api::{
    Fixture, FixtureFilter, FootballApi, FootballService, League, LeagueFixtures, LogContext, TeamLineup,
    TeamRecord,
};
use std::io::{self, BufRead, Write};

pub struct App {
    pub settings: AppSettings,
    store: ConfigStore,
}

impl App {
    pub fn new(settings: AppSettings, store: ConfigStore) -> Self {
        Self { settings, store }
    }

    fn service(&self) -> anyhow::Result<FootballService<FootballApi>> {
        let Some(key) = self.settings.api_key.as_deref() else {
            bail!("No API key configured. Use 'sporty config set-api-key API_KEY' to set one.");
        };
        let api = FootballApi::new(key)
            .with_base_url(self.settings.base_url.clone())
            .with_log_context(LogContext::new("sporty::api"));
        Ok(FootballService::new(api, LogContext::new("sporty::service")))
    }

    pub async fn run(&self, command: Commands) -> anyhow::Result<()> {
        match command {
            Commands::Config { action } => self.config(action),
            command => self.query(command).await,
        }
    }

    // -----------------------------------------------------------------------
    // Local configuration
    // -----------------------------------------------------------------------

    fn config(&self, action: ConfigCommands) -> anyhow::Result<()> {
        match action {
            ConfigCommands::SetApiKey { api_key } => {
                self.store.set_api_key(&api_key)?;
                println!("API key has been set successfully.");
            }
            ConfigCommands::GetApiKey => match self.store.api_key()? {
                Some(key) => println!("Current API key: {}", mask_key(&key)),
                None => println!("No API key configured. Use 'sporty config set-api-key API_KEY' to set one."),
            },
            ConfigCommands::Show => {
                let config = self.store.load()?;
                println!("config file: {}", self.store.path().display());
                if let Some(key) = &config.api_key {
                    println!("api_key: {}", mask_key(key));
                }
                println!("base_url: {}", self.store.base_url()?);
                for (key, value) in &config.extra {
                    println!("{key}: {value}");
                }
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // API commands
    // -----------------------------------------------------------------------

    async fn query(&self, command: Commands) -> anyhow::Result<()> {
        let service = self.service()?;
        match command {
            Commands::Leagues { country, season } => {
                let season = season.unwrap_or_else(|| service.get_current_season());
                let scope = country.as_deref().map(|c| format!(" for {c}")).unwrap_or_default();
                println!("Fetching available leagues{scope} in season {season}...\n");
                let leagues = service.get_leagues(country.as_deref(), Some(season)).await?;
                if leagues.is_empty() {
                    println!("No leagues found with the specified criteria.");
                } else {
                    println!("{}", standings::render_leagues(&leagues));
                }
            }
            Commands::Standings { league, name, country, season, split, sort, order } => {
                let season = season.unwrap_or_else(|| service.get_current_season());
                let league_id = match (league, name) {
                    (Some(id), _) => id,
                    (None, Some(name)) => {
                        println!("Searching for league '{name}'...");
                        let found = service.find_leagues(&name, country.as_deref(), Some(season)).await?;
                        let stdin = io::stdin();
                        match choose_league(&found, &name, &mut stdin.lock())? {
                            Some(league) => league.id,
                            None => return Ok(()),
                        }
                    }
                    (None, None) => bail!("Please specify a league ID (--league) or name (--name)."),
                };

                println!("Fetching standings for league ID {league_id} in season {season}...\n");
                let view = StandingsView { split, sort, direction: order };
                let table = service.get_standings_view(league_id, season, view).await?;
                if table.is_empty() {
                    println!("No standings found for the specified league and season.");
                    return Ok(());
                }
                println!("{}", standings::render(&table, view));
                let now = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
                println!("\n{}", format!("Standings as of: {now}").blue());
            }
            Commands::Matches { league, team, country, date, from_date, to_date, season, live, timezone, format } => {
                let shown_season = season.unwrap_or_else(|| service.get_current_season());
                println!("{}", matches_header(live, season, shown_season, date, from_date.zip(to_date), country.as_deref(), league, team));

                let filter = FixtureFilter {
                    league,
                    team,
                    season: Some(shown_season),
                    date: date.map(ymd),
                    from: from_date.map(ymd),
                    to: to_date.map(ymd),
                    timezone: Some(timezone),
                    ..Default::default()
                };
                if league.is_some() || team.is_some() {
                    let found = service.get_matches(&filter, live).await?;
                    print_fixtures(&found, format);
                } else {
                    let groups = service.get_matches_by_league(country.as_deref(), &filter, live).await?;
                    print_groups(&groups, format);
                }
            }
            Commands::Live { league, country, timezone, format } => {
                println!("Fetching live matches...");
                match (league, country) {
                    (Some(id), _) => {
                        let found = service.get_live_scores(Some(id), Some(&timezone)).await?;
                        print_fixtures(&found, format);
                    }
                    (None, Some(country)) => {
                        let groups = service.get_live_matches_by_league(Some(&country), None, Some(&timezone)).await?;
                        print_groups(&groups, format);
                    }
                    (None, None) => {
                        let found = service.get_live_scores(None, Some(&timezone)).await?;
                        print_groups(&group_by_league(found), format);
                    }
                }
            }
            Commands::Top { category, league, season, limit, detailed, card_type } => {
                let season = season.unwrap_or_else(|| service.get_current_season());
                let title = leaders::title(category, card_type);
                println!("\n{} for {}\n", title.yellow().bold(), format!("league {league} ({season}/{})", season + 1).green());

                let mut rows = match category {
                    TopCategory::Goals => service.get_top_scorers(league, season).await?,
                    TopCategory::Assists => service.get_top_assists(league, season).await?,
                    TopCategory::Appearances => service.get_top_appearances(league, season).await?,
                    TopCategory::Passes => service.get_top_passes(league, season).await?,
                    TopCategory::Cards => match card_type {
                        CardKind::Yellow => service.get_top_yellow_cards(league, season).await?,
                        CardKind::Red => service.get_top_red_cards(league, season).await?,
                        CardKind::Both => {
                            let mut merged = service.get_top_cards(league, season).await?;
                            rank_by(&mut merged, LeaderMetric::Cards);
                            merged
                        }
                    },
                };
                if rows.is_empty() {
                    println!("{}", "No data available for this league and season.".yellow());
                    return Ok(());
                }
                rows.truncate(limit);
                println!("{}", leaders::render(&rows, category, card_type, detailed));
            }
            Commands::Squad { team_id, season } => {
                let season = match season {
                    Some(season) => season,
                    None => {
                        let season = service.get_current_season();
                        println!("No season specified, using current season ({season})...");
                        season
                    }
                };
                let Some(team) = service.get_team(team_id).await? else {
                    println!("Team with ID {team_id} not found.");
                    return Ok(());
                };
                println!("{}", squad::render_team(&team, season));
                let players = service.get_players(team_id, season).await?;
                if players.is_empty() {
                    println!("\nNo player data available for this team and season.");
                } else {
                    println!("{}", squad::render(&players));
                }
            }
            Commands::TeamStats { team_id, season, league } => {
                let season = season.unwrap_or_else(|| service.get_current_season());
                let Some(team) = service.get_team(team_id).await? else {
                    println!("Team with ID {team_id} not found.");
                    return Ok(());
                };
                match service.get_team_statistics(team_id, season, league).await? {
                    Some(stats) => println!("{}", team_stats::render(&stats, season)),
                    None => {
                        let scope = league.map(|l| format!(" for league {l}")).unwrap_or_default();
                        println!("No statistics found for {} in season {season}{scope}.", team.name);
                    }
                }
            }
            Commands::History { team_id, days, from_date, to_date, season, format, timezone, limit } => {
                let Some(team) = service.get_team(team_id).await? else {
                    println!("Team with ID {team_id} not found.");
                    return Ok(());
                };
                println!("{}", draw::heading(&format!("Match History for {}", team.name)));

                let mut found = match season {
                    Some(season) => {
                        println!("Season: {season}");
                        service.get_team_season_matches(team_id, season, Some(&timezone)).await?
                    }
                    None => {
                        let (from, to) = history_range(from_date, to_date, days, Local::now().date_naive())?;
                        println!("Period: {} to {}", ymd(from), ymd(to));
                        service.get_team_matches_by_date_range(team_id, from, to, Some(&timezone)).await?
                    }
                };
                if found.is_empty() {
                    println!("No matches found for the specified criteria.");
                    return Ok(());
                }

                sort_most_recent_first(&mut found);
                if let Some(limit) = limit.filter(|&l| l > 0 && l < found.len()) {
                    println!("Showing {limit} of {} matches.", found.len());
                    found.truncate(limit);
                }
                println!("\nMatch Results:");
                println!("{}", fixtures::render(&found, format));
                println!("{}", fixtures::render_record(&TeamRecord::from_fixtures(team_id, &found)));
            }
            Commands::Lineup { fixture_id, no_visual } => {
                let mut lineups = service.get_fixture_lineups(fixture_id).await?;
                if lineups.is_empty() {
                    println!("No lineup information available for this fixture.");
                    return Ok(());
                }
                let fixture = optional_fixture(&service, fixture_id).await;
                if let Some(fixture) = &fixture {
                    println!("{}", match_stats::render_header(fixture));
                    home_first(&mut lineups, fixture);
                }
                for team in &lineups {
                    println!("{}", lineup::render(team, !no_visual));
                }
            }
            Commands::Stats { fixture_id } => {
                match optional_fixture(&service, fixture_id).await {
                    Some(fixture) => println!("{}", match_stats::render_header(&fixture)),
                    None => println!("Fetching fixture {fixture_id}..."),
                }
                let stats = service.get_match_statistics(fixture_id).await?;
                println!("{}", match_stats::render(&stats));
            }
            Commands::Config { action } => self.config(action)?,
        }
        Ok(())
    }
}

/// The fixture header is decoration; its failure only costs the header.
async fn optional_fixture(service: &FootballService<FootballApi>, fixture_id: u64) -> Option<Fixture> {
    match service.get_fixture(fixture_id).await {
        Ok(fixture) => fixture,
        Err(e) => {
            log::warn!(target: "sporty", "could not load fixture {fixture_id}: {e}");
            None
        }
    }
}

fn ymd(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn print_fixtures(found: &[Fixture], format: OutputFormat) {
    if found.is_empty() {
        println!("No matches found for the specified filters.");
    } else {
        println!("{}", fixtures::render(found, format));
    }
}

fn print_groups(groups: &[LeagueFixtures], format: OutputFormat) {
    if groups.is_empty() {
        println!("No matches found for the specified filters.");
    } else {
        println!("{}", fixtures::render_by_league(groups, format));
    }
}

#[allow(clippy::too_many_arguments)]
fn matches_header(
    live: bool,
    season: Option<i32>,
    shown_season: i32,
    date: Option<NaiveDate>,
    range: Option<(NaiveDate, NaiveDate)>,
    country: Option<&str>,
    league: Option<u64>,
    team: Option<u64>,
) -> String {
    let mut parts = Vec::new();
    if live {
        parts.push("live".to_string());
    }
    parts.push(match season {
        Some(season) => format!("season {season}"),
        None => format!("current season ({shown_season})"),
    });
    if let Some(date) = date {
        parts.push(format!("on {}", ymd(date)));
    } else if let Some((from, to)) = range {
        parts.push(format!("from {} to {}", ymd(from), ymd(to)));
    }
    if let Some(country) = country {
        parts.push(format!("in {country}"));
    }
    if let Some(league) = league {
        parts.push(format!("in league {league}"));
    }
    if let Some(team) = team {
        parts.push(format!("for team {team}"));
    }
    format!("Fetching {} matches...", parts.join(" "))
}

/// `[from, to]` for the history view. `to` defaults to today and `from` to
/// `days` before `to`.
fn history_range(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    days: i64,
    today: NaiveDate,
) -> anyhow::Result<(NaiveDate, NaiveDate)> {
    let to = to.unwrap_or(today);
    let from = match from {
        Some(from) => from,
        None => TimeDelta::try_days(days)
            .and_then(|span| to.checked_sub_signed(span))
            .context("--days is out of range")?,
    };
    if from > to {
        bail!("--from-date {} is after --to-date {}", ymd(from), ymd(to));
    }
    Ok((from, to))
}

/// Undated fixtures go last.
fn sort_most_recent_first(found: &mut [Fixture]) {
    found.sort_by(|a, b| b.date.cmp(&a.date));
}

/// Live fixtures from every league, bucketed by league in first-seen order.
fn group_by_league(found: Vec<Fixture>) -> Vec<LeagueFixtures> {
    let mut groups: Vec<LeagueFixtures> = Vec::new();
    for fixture in found {
        match groups.iter_mut().find(|g| g.league.id == fixture.league.id) {
            Some(group) => group.fixtures.push(fixture),
            None => groups.push(LeagueFixtures { league: fixture.league.clone(), fixtures: vec![fixture] }),
        }
    }
    groups
}

fn home_first(lineups: &mut [TeamLineup], fixture: &Fixture) {
    lineups.sort_by_key(|l| l.team_id != fixture.home.id);
}

/// Resolves a name search to one league, asking on `input` when several
/// match. An empty answer picks the first.
fn choose_league<'a>(found: &'a [League], name: &str, input: &mut impl BufRead) -> anyhow::Result<Option<&'a League>> {
    match found {
        [] => {
            println!("No leagues found matching '{name}'. Please try a different name or use league ID.");
            Ok(None)
        }
        [only] => {
            println!("Found: {} (ID: {})", only.name, only.id);
            Ok(Some(only))
        }
        _ => {
            println!("\nMultiple leagues match '{name}':");
            println!("{}", standings::render_choices(found));
            print!("Enter the number of the league to view [1]: ");
            io::stdout().flush()?;

            let mut answer = String::new();
            input.read_line(&mut answer)?;
            let answer = answer.trim();
            let index = if answer.is_empty() { 1 } else { answer.parse::<usize>().unwrap_or(0) };
            match index.checked_sub(1).and_then(|i| found.get(i)) {
                Some(league) => {
                    println!("Selected: {} (ID: {})", league.name, league.id);
                    Ok(Some(league))
                }
                None => {
                    println!("Invalid selection. Please try again.");
                    Ok(None)
                }
            }
        }
    }
}
