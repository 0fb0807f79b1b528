use crossterm::style::Stylize;
use football_api::{Fixture, FixturePhase};
use std::fmt::Display;
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Bordered table for ranked lists.
pub fn boxed<T: Tabled>(rows: impl IntoIterator<Item = T>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::modern());
    table.to_string()
}

/// Header-underlined table, no outer border.
pub fn simple<T: Tabled>(rows: impl IntoIterator<Item = T>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::psql());
    table.to_string()
}

/// Headerless two-or-more column listing (label, value, ...).
pub fn key_values<R, C>(rows: R) -> String
where
    R: IntoIterator<Item = C>,
    C: IntoIterator<Item = String>,
{
    let mut builder = Builder::default();
    for row in rows {
        builder.push_record(row);
    }
    let mut table = builder.build();
    table.with(Style::blank());
    table.to_string()
}

/// Headed table built from loose rows, for column sets that vary at runtime.
pub fn dynamic<R, C>(headers: &[&str], rows: R) -> String
where
    R: IntoIterator<Item = C>,
    C: IntoIterator<Item = String>,
{
    let mut builder = Builder::default();
    builder.push_record(headers.iter().map(|h| h.to_string()));
    for row in rows {
        builder.push_record(row);
    }
    let mut table = builder.build();
    table.with(Style::psql());
    table.to_string()
}

pub fn heading(text: &str) -> String {
    format!("\n{}", text.green().bold())
}

pub fn section(text: &str) -> String {
    format!("\n{}", format!("{text}:").cyan().bold())
}

pub fn status_color(phase: FixturePhase, text: &str) -> String {
    let styled = match phase {
        FixturePhase::Live => text.green(),
        FixturePhase::Break => text.yellow(),
        FixturePhase::Finished => text.blue(),
        FixturePhase::Disrupted => text.red(),
        FixturePhase::NotStarted => text.cyan(),
        FixturePhase::Other => text.white(),
    };
    styled.to_string()
}

/// "2H 67'" while running, the bare short code otherwise.
pub fn status_label(fixture: &Fixture) -> String {
    let short = fixture.status.short.as_str();
    match (fixture.status.phase(), fixture.status.elapsed) {
        (FixturePhase::Live | FixturePhase::Break | FixturePhase::Other, Some(min)) if !short.is_empty() => {
            format!("{short} {min}'")
        }
        _ => short.to_owned(),
    }
}

/// Table position colored by zone: top four, next two, bottom three.
pub fn position(rank: u32, table_size: usize) -> String {
    let relegation_from = (table_size as u32).saturating_sub(2).max(7);
    if rank <= 4 {
        rank.to_string().green().bold().to_string()
    } else if rank <= 6 {
        rank.to_string().blue().bold().to_string()
    } else if table_size >= 10 && rank >= relegation_from {
        rank.to_string().red().bold().to_string()
    } else {
        rank.to_string()
    }
}

pub fn signed(n: i64) -> String {
    if n == 0 { "0".into() } else { format!("{n:+}") }
}

pub fn or_na<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "N/A".into(), |v| v.to_string())
}

/// Cut to `max` characters, marking the cut with "..".
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_owned();
    }
    let kept: String = text.chars().take(max.saturating_sub(2)).collect();
    format!("{kept}..")
}
