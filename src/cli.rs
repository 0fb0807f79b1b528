use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use football_api::leaders::CardKind;
use football_api::standings::{SortCriterion, SortDirection, Split};
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(name = "sporty")]
#[command(version, about = "Football fixtures, live scores, standings and player leaderboards in the terminal", long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List available leagues and their IDs
    Leagues {
        /// Filter leagues by country name
        #[arg(short, long)]
        country: Option<String>,
        /// Season year (2023 for 2023/2024), defaults to the current season
        #[arg(short, long)]
        season: Option<i32>,
    },
    /// League table, optionally the home or away split re-sorted
    Standings {
        /// League ID
        #[arg(short, long, conflicts_with = "name")]
        league: Option<u64>,
        /// League name to search for ("Premier League", "La Liga")
        #[arg(short, long)]
        name: Option<String>,
        /// Country to narrow the name search
        #[arg(short, long, requires = "name")]
        country: Option<String>,
        #[arg(short, long)]
        season: Option<i32>,
        /// Which numbers to rank by: all, home or away
        #[arg(long, default_value = "all")]
        split: Split,
        /// points, goals_for, goals_against, goal_diff, played, wins, draws or losses
        #[arg(long, default_value = "points")]
        sort: SortCriterion,
        /// desc or asc
        #[arg(long, default_value = "desc")]
        order: SortDirection,
    },
    /// Match scores filtered by league, team, country or date
    Matches {
        #[arg(short, long)]
        league: Option<u64>,
        #[arg(short, long)]
        team: Option<u64>,
        /// Country to pick leagues from when no league is given
        #[arg(short, long)]
        country: Option<String>,
        /// Match day (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        from_date: Option<NaiveDate>,
        #[arg(long)]
        to_date: Option<NaiveDate>,
        #[arg(short, long)]
        season: Option<i32>,
        /// Only matches currently in progress
        #[arg(long)]
        live: bool,
        /// Timezone for kick-off times ("Europe/London")
        #[arg(long, default_value = "UTC")]
        timezone: String,
        /// table or detailed
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },
    /// Matches in progress right now
    Live {
        #[arg(short, long)]
        league: Option<u64>,
        #[arg(short, long)]
        country: Option<String>,
        #[arg(long, default_value = "UTC")]
        timezone: String,
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },
    /// Player leaderboards for a league season
    Top {
        /// goals, assists, cards, appearances or passes
        category: TopCategory,
        #[arg(short, long)]
        league: u64,
        #[arg(short, long)]
        season: Option<i32>,
        /// How many players to show
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
        /// Extra columns: age, position, minutes
        #[arg(long)]
        detailed: bool,
        /// yellow, red or both (cards only)
        #[arg(long, default_value = "both")]
        card_type: CardKind,
    },
    /// Squad of a team, grouped by position
    Squad {
        team_id: u64,
        #[arg(short, long)]
        season: Option<i32>,
    },
    /// Season statistics of a team
    TeamStats {
        team_id: u64,
        #[arg(short, long)]
        season: Option<i32>,
        /// Restrict to one competition
        #[arg(short, long)]
        league: Option<u64>,
    },
    /// Past results of a team with a win/draw/loss summary
    History {
        team_id: u64,
        /// Look back this many days from --to-date (or today)
        #[arg(long, default_value_t = 30)]
        days: i64,
        #[arg(long)]
        from_date: Option<NaiveDate>,
        #[arg(long)]
        to_date: Option<NaiveDate>,
        /// Whole season instead of a date range
        #[arg(short, long)]
        season: Option<i32>,
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
        #[arg(long, default_value = "UTC")]
        timezone: String,
        /// Show at most this many matches
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Lineups of a fixture
    Lineup {
        fixture_id: u64,
        /// Skip the text pitch
        #[arg(long)]
        no_visual: bool,
    },
    /// Events, team statistics and lineups of a fixture
    Stats { fixture_id: u64 },
    /// Manage the local configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Store the API-Football key
    SetApiKey { api_key: String },
    /// Show the configured key, masked
    GetApiKey,
    /// Show every configured value
    Show,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Detailed,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "detailed" => Ok(OutputFormat::Detailed),
            _ => Err(format!("Unknown format: {s}. Use table or detailed.")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TopCategory {
    Goals,
    Assists,
    Cards,
    Appearances,
    Passes,
}

impl FromStr for TopCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "goals" | "scorers" => Ok(TopCategory::Goals),
            "assists" => Ok(TopCategory::Assists),
            "cards" => Ok(TopCategory::Cards),
            "appearances" | "apps" => Ok(TopCategory::Appearances),
            "passes" => Ok(TopCategory::Passes),
            _ => Err(format!(
                "Unknown category: {s}. Use goals, assists, cards, appearances or passes."
            )),
        }
    }
}
