//! Football data operations on top of a [`Transport`].
//!
//! Every request is awaited before the next one is sent. Aggregations that
//! need several calls (multi-league dashboards, paged leaderboards, the card
//! merge, match statistics) fail as a whole only when their first call
//! fails; later failures are logged and that league/page/part is skipped.
//! A malformed envelope ([`ApiError::Contract`]) is never skipped.

use crate::client::{LogContext, Method, Params, Transport};
use crate::envelope::{self, Paging};
use crate::error::{ApiError, ApiResult};
use crate::leaders::{merge_card_lists, rank_by, LeaderMetric, MAX_PAGES};
use crate::mapping::{
    has_appearances, has_passes, map_event, map_fixture, map_fixture_statistics, map_league,
    map_lineup, map_player, map_player_season_stats, map_standing, map_standing_split,
    map_team, map_team_statistics,
};
use crate::raw::Raw;
use crate::standings::{select_group, sort_and_rerank, StandingsView};
use crate::{
    Fixture, FixtureEvent, FixtureStatistics, League, LeagueFixtures, MatchStatistics, Player,
    PlayerSeasonStats, Team, TeamLineup, TeamStanding, TeamStatistics,
};
use chrono::{Datelike, Local, NaiveDate};
use serde_json::Value;

/// Seasons are named after the year they start in; European seasons start
/// in July or August.
pub fn season_for(date: NaiveDate) -> i32 {
    if date.month() >= 7 { date.year() } else { date.year() - 1 }
}

/// Filters accepted by the `fixtures` endpoint. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixtureFilter {
    pub id: Option<u64>,
    pub league: Option<u64>,
    pub team: Option<u64>,
    pub season: Option<i32>,
    pub date: Option<String>, // YYYY-MM-DD
    pub from: Option<String>,
    pub to: Option<String>,
    pub status: Option<String>, // "FT", "NS-PST"
    pub timezone: Option<String>,
}

impl FixtureFilter {
    fn params(&self) -> Params {
        Params::new()
            .with_opt("id", self.id)
            .with_opt("league", self.league)
            .with_opt("team", self.team)
            .with_opt("season", self.season)
            .with_opt("date", self.date.as_deref())
            .with_opt("from", self.from.as_deref())
            .with_opt("to", self.to.as_deref())
            .with_opt("status", self.status.as_deref())
            .with_opt("timezone", self.timezone.as_deref())
    }
}

pub struct FootballService<T: Transport> {
    transport: T,
    log: LogContext,
}

impl<T: Transport> FootballService<T> {
    pub fn new(transport: T, log: LogContext) -> Self {
        Self { transport, log }
    }

    async fn fetch_page(&self, endpoint: &str, params: &Params) -> ApiResult<(Vec<Value>, Paging)> {
        let body = self.transport.request(Method::Get, endpoint, params).await;
        let records = envelope::unwrap(&body)?;
        Ok((records, envelope::paging(&body)))
    }

    async fn fetch(&self, endpoint: &str, params: Params) -> ApiResult<Vec<Value>> {
        self.fetch_page(endpoint, &params).await.map(|(records, _)| records)
    }

    /// Walk `endpoint` page by page until a page comes back empty, the
    /// reported last page is reached, or [`MAX_PAGES`] pages were requested.
    async fn fetch_pages(&self, endpoint: &str, params: Params) -> ApiResult<Vec<Value>> {
        let mut records = Vec::new();
        let mut last_page = MAX_PAGES;
        let mut page = 1;

        while page <= last_page {
            match self.fetch_page(endpoint, &params.clone().with("page", page)).await {
                Ok((items, _)) if items.is_empty() => break,
                Ok((items, paging)) => {
                    log::debug!(
                        target: self.log.target(),
                        "{endpoint} page {page}/{}: {} records",
                        paging.total,
                        items.len()
                    );
                    records.extend(items);
                    last_page = paging.total.min(MAX_PAGES);
                }
                Err(e) if page == 1 || e.is_fatal() => return Err(e),
                Err(e) => log::warn!(target: self.log.target(), "skipping {endpoint} page {page}: {e}"),
            }
            page += 1;
        }
        Ok(records)
    }

    /// Map fixture records, warning about any whose kickoff is unknown.
    fn fixtures(&self, records: &[Value]) -> Vec<Fixture> {
        records
            .iter()
            .map(|record| {
                let fixture = map_fixture(record);
                if fixture.date.is_none() {
                    match Raw::new(record).path("fixture.date").str() {
                        Some(text) => log::warn!(
                            target: self.log.target(),
                            "fixture {} has unparseable date {text:?}",
                            fixture.id
                        ),
                        None => log::warn!(target: self.log.target(), "fixture {} has no date", fixture.id),
                    }
                }
                fixture
            })
            .collect()
    }

    /// Log and drop a failure inside an aggregation, unless it is a
    /// contract violation.
    fn skip(&self, what: &str, err: ApiError) -> ApiResult<()> {
        if err.is_fatal() {
            return Err(err);
        }
        log::warn!(target: self.log.target(), "skipping {what}: {err}");
        Ok(())
    }

    pub fn get_current_season(&self) -> i32 {
        season_for(Local::now().date_naive())
    }

    // -----------------------------------------------------------------------
    // Leagues, teams, players
    // -----------------------------------------------------------------------

    pub async fn get_leagues(&self, country: Option<&str>, season: Option<i32>) -> ApiResult<Vec<League>> {
        let params = Params::new().with_opt("country", country).with_opt("season", season);
        let records = self.fetch("leagues", params).await?;
        log::info!(target: self.log.target(), "found {} leagues", records.len());
        Ok(records.iter().map(map_league).collect())
    }

    /// Leagues whose name contains `name`, ignoring case.
    pub async fn find_leagues(
        &self,
        name: &str,
        country: Option<&str>,
        season: Option<i32>,
    ) -> ApiResult<Vec<League>> {
        let needle = name.to_lowercase();
        let leagues = self.get_leagues(country, season).await?;
        Ok(leagues
            .into_iter()
            .filter(|league| league.name.to_lowercase().contains(&needle))
            .collect())
    }

    pub async fn get_teams(&self, league_id: u64, season: i32) -> ApiResult<Vec<Team>> {
        let params = Params::new().with("league", league_id).with("season", season);
        let records = self.fetch("teams", params).await?;
        Ok(records.iter().map(map_team).collect())
    }

    pub async fn get_team(&self, team_id: u64) -> ApiResult<Option<Team>> {
        let records = self.fetch("teams", Params::new().with("id", team_id)).await?;
        Ok(records.first().map(map_team))
    }

    /// A team's squad for one season, paged like every `players` query.
    pub async fn get_players(&self, team_id: u64, season: i32) -> ApiResult<Vec<Player>> {
        let params = Params::new().with("team", team_id).with("season", season);
        let records = self.fetch_pages("players", params).await?;
        Ok(records.iter().map(map_player).collect())
    }

    // -----------------------------------------------------------------------
    // Fixtures
    // -----------------------------------------------------------------------

    pub async fn get_fixtures(&self, filter: &FixtureFilter) -> ApiResult<Vec<Fixture>> {
        let records = self.fetch("fixtures", filter.params()).await?;
        Ok(self.fixtures(&records))
    }

    pub async fn get_fixture(&self, fixture_id: u64) -> ApiResult<Option<Fixture>> {
        let filter = FixtureFilter { id: Some(fixture_id), ..Default::default() };
        Ok(self.get_fixtures(&filter).await?.into_iter().next())
    }

    pub async fn get_live_scores(&self, league_id: Option<u64>, timezone: Option<&str>) -> ApiResult<Vec<Fixture>> {
        let params = Params::new()
            .with("live", "all")
            .with_opt("league", league_id)
            .with_opt("timezone", timezone);
        let records = self.fetch("fixtures", params).await?;
        let fixtures = self.fixtures(&records);
        match league_id {
            Some(id) => log::info!(target: self.log.target(), "found {} live matches in league {id}", fixtures.len()),
            None => log::info!(target: self.log.target(), "found {} live matches", fixtures.len()),
        }
        Ok(fixtures)
    }

    /// Fixtures matching `filter`, defaulting to the current season. With
    /// `live` set only in-play fixtures are returned and the date filters
    /// are ignored.
    pub async fn get_matches(&self, filter: &FixtureFilter, live: bool) -> ApiResult<Vec<Fixture>> {
        if live {
            return self.get_live_scores(filter.league, filter.timezone.as_deref()).await;
        }
        let filter = FixtureFilter {
            season: filter.season.or_else(|| Some(self.get_current_season())),
            ..filter.clone()
        };
        let fixtures = self.get_fixtures(&filter).await?;
        log::info!(
            target: self.log.target(),
            "found {} matches (league {:?}, season {:?})",
            fixtures.len(),
            filter.league,
            filter.season
        );
        Ok(fixtures)
    }

    /// One entry per league of `country` that has fixtures, in the order
    /// upstream lists the leagues. `filter` supplies the season, dates and
    /// timezone; its league is replaced by each league in turn.
    pub async fn get_matches_by_league(
        &self,
        country: Option<&str>,
        filter: &FixtureFilter,
        live: bool,
    ) -> ApiResult<Vec<LeagueFixtures>> {
        let season = filter.season.unwrap_or_else(|| self.get_current_season());
        if live {
            return self
                .get_live_matches_by_league(country, Some(season), filter.timezone.as_deref())
                .await;
        }

        let leagues = self.get_leagues(country, Some(season)).await?;
        let mut result = Vec::new();
        for league in leagues {
            let filter = FixtureFilter {
                league: Some(league.id),
                season: Some(season),
                ..filter.clone()
            };
            match self.get_matches(&filter, false).await {
                Ok(fixtures) if fixtures.is_empty() => {}
                Ok(fixtures) => result.push(LeagueFixtures { league, fixtures }),
                Err(e) => self.skip(&format!("matches for league {}", league.id), e)?,
            }
        }
        Ok(result)
    }

    pub async fn get_live_matches_by_league(
        &self,
        country: Option<&str>,
        season: Option<i32>,
        timezone: Option<&str>,
    ) -> ApiResult<Vec<LeagueFixtures>> {
        let leagues = self.get_leagues(country, season).await?;
        let mut result = Vec::new();
        for league in leagues {
            match self.get_live_scores(Some(league.id), timezone).await {
                Ok(fixtures) if fixtures.is_empty() => {}
                Ok(fixtures) => result.push(LeagueFixtures { league, fixtures }),
                Err(e) => self.skip(&format!("live matches for league {}", league.id), e)?,
            }
        }
        Ok(result)
    }

    pub async fn get_team_season_matches(
        &self,
        team_id: u64,
        season: i32,
        timezone: Option<&str>,
    ) -> ApiResult<Vec<Fixture>> {
        let filter = FixtureFilter {
            team: Some(team_id),
            season: Some(season),
            timezone: timezone.map(str::to_owned),
            ..Default::default()
        };
        self.get_fixtures(&filter).await
    }

    /// Dates are `YYYY-MM-DD`, both ends inclusive. The season is derived
    /// from the start date since upstream requires one with a range.
    pub async fn get_team_matches_by_date_range(
        &self,
        team_id: u64,
        from: NaiveDate,
        to: NaiveDate,
        timezone: Option<&str>,
    ) -> ApiResult<Vec<Fixture>> {
        let filter = FixtureFilter {
            team: Some(team_id),
            season: Some(season_for(from)),
            from: Some(from.format("%Y-%m-%d").to_string()),
            to: Some(to.format("%Y-%m-%d").to_string()),
            timezone: timezone.map(str::to_owned),
            ..Default::default()
        };
        self.get_fixtures(&filter).await
    }

    // -----------------------------------------------------------------------
    // Standings
    // -----------------------------------------------------------------------

    async fn fetch_standings(&self, league_id: u64, season: i32) -> ApiResult<Vec<Value>> {
        let params = Params::new().with("league", league_id).with("season", season);
        let records = self.fetch("standings", params).await?;
        Ok(select_group(&records).to_vec())
    }

    /// The league table as upstream ranks it (first group only).
    pub async fn get_standings(&self, league_id: u64, season: i32) -> ApiResult<Vec<TeamStanding>> {
        let rows = self.fetch_standings(league_id, season).await?;
        Ok(rows.iter().map(map_standing).collect())
    }

    /// The table rebuilt from one split and re-sorted. Anything other than
    /// the upstream view gets fresh ranks `1..=N`.
    pub async fn get_standings_view(
        &self,
        league_id: u64,
        season: i32,
        view: StandingsView,
    ) -> ApiResult<Vec<TeamStanding>> {
        if view.is_upstream() {
            return self.get_standings(league_id, season).await;
        }
        let rows = self.fetch_standings(league_id, season).await?;
        let mut table: Vec<TeamStanding> = rows
            .iter()
            .map(|row| map_standing_split(row, view.split))
            .collect();
        sort_and_rerank(&mut table, view.sort, view.direction);
        Ok(table)
    }

    // -----------------------------------------------------------------------
    // Single fixture details
    // -----------------------------------------------------------------------

    pub async fn get_fixture_events(&self, fixture_id: u64) -> ApiResult<Vec<FixtureEvent>> {
        let records = self.fetch("fixtures/events", Params::new().with("fixture", fixture_id)).await?;
        Ok(records.iter().map(map_event).collect())
    }

    /// One entry per team, in upstream order.
    pub async fn get_fixture_statistics(&self, fixture_id: u64) -> ApiResult<Vec<FixtureStatistics>> {
        let records = self
            .fetch("fixtures/statistics", Params::new().with("fixture", fixture_id))
            .await?;
        Ok(latest_per_team(records.iter().map(map_fixture_statistics), |s| s.team_id))
    }

    pub async fn get_fixture_lineups(&self, fixture_id: u64) -> ApiResult<Vec<TeamLineup>> {
        let records = self
            .fetch("fixtures/lineups", Params::new().with("fixture", fixture_id))
            .await?;
        Ok(latest_per_team(records.iter().map(map_lineup), |l| l.team_id))
    }

    /// Events, then per-team statistics, then lineups. Only an events
    /// failure fails the whole call.
    pub async fn get_match_statistics(&self, fixture_id: u64) -> ApiResult<MatchStatistics> {
        let events = self.get_fixture_events(fixture_id).await?;

        let team_statistics = match self.get_fixture_statistics(fixture_id).await {
            Ok(stats) => stats,
            Err(e) => {
                self.skip("fixture statistics", e)?;
                Vec::new()
            }
        };
        let lineups = match self.get_fixture_lineups(fixture_id).await {
            Ok(lineups) => lineups,
            Err(e) => {
                self.skip("fixture lineups", e)?;
                Vec::new()
            }
        };

        Ok(MatchStatistics { events, team_statistics, lineups })
    }

    pub async fn get_team_statistics(
        &self,
        team_id: u64,
        season: i32,
        league_id: Option<u64>,
    ) -> ApiResult<Option<TeamStatistics>> {
        let params = Params::new()
            .with("team", team_id)
            .with("season", season)
            .with_opt("league", league_id);
        let records = self.fetch("teams/statistics", params).await?;
        Ok(records.first().map(map_team_statistics))
    }

    // -----------------------------------------------------------------------
    // Leaderboards
    // -----------------------------------------------------------------------

    async fn fetch_leaders(&self, endpoint: &str, league_id: u64, season: i32) -> ApiResult<Vec<Value>> {
        let params = Params::new().with("league", league_id).with("season", season);
        self.fetch(endpoint, params).await
    }

    async fn leaderboard(
        &self,
        endpoint: &str,
        league_id: u64,
        season: i32,
        metric: LeaderMetric,
    ) -> ApiResult<Vec<PlayerSeasonStats>> {
        let records = self.fetch_leaders(endpoint, league_id, season).await?;
        let mut rows: Vec<PlayerSeasonStats> = records.iter().map(map_player_season_stats).collect();
        rank_by(&mut rows, metric);
        Ok(rows)
    }

    pub async fn get_top_scorers(&self, league_id: u64, season: i32) -> ApiResult<Vec<PlayerSeasonStats>> {
        self.leaderboard("players/topscorers", league_id, season, LeaderMetric::Goals).await
    }

    pub async fn get_top_assists(&self, league_id: u64, season: i32) -> ApiResult<Vec<PlayerSeasonStats>> {
        self.leaderboard("players/topassists", league_id, season, LeaderMetric::Assists).await
    }

    pub async fn get_top_yellow_cards(&self, league_id: u64, season: i32) -> ApiResult<Vec<PlayerSeasonStats>> {
        self.leaderboard("players/topyellowcards", league_id, season, LeaderMetric::Yellow).await
    }

    pub async fn get_top_red_cards(&self, league_id: u64, season: i32) -> ApiResult<Vec<PlayerSeasonStats>> {
        self.leaderboard("players/topredcards", league_id, season, LeaderMetric::Red).await
    }

    /// Yellow and red leaderboards merged per player, in yellow-list order
    /// followed by red-only players. Callers re-rank for the card type they
    /// show.
    pub async fn get_top_cards(&self, league_id: u64, season: i32) -> ApiResult<Vec<PlayerSeasonStats>> {
        let yellow = self.fetch_leaders("players/topyellowcards", league_id, season).await?;
        let red = match self.fetch_leaders("players/topredcards", league_id, season).await {
            Ok(records) => records,
            Err(e) => {
                self.skip("red card leaderboard", e)?;
                Vec::new()
            }
        };
        let merged = merge_card_lists(yellow, red);
        log::info!(target: self.log.target(), "merged card leaderboard has {} players", merged.len());
        Ok(merged.iter().map(map_player_season_stats).collect())
    }

    async fn paged_leaderboard(
        &self,
        league_id: u64,
        season: i32,
        has_metric: fn(&Value) -> bool,
        metric: LeaderMetric,
    ) -> ApiResult<Vec<PlayerSeasonStats>> {
        let params = Params::new().with("league", league_id).with("season", season);
        let records = self.fetch_pages("players", params).await?;
        let mut rows: Vec<PlayerSeasonStats> = records
            .iter()
            .filter(|record| has_metric(record))
            .map(map_player_season_stats)
            .collect();
        rank_by(&mut rows, metric);
        Ok(rows)
    }

    /// Upstream has no appearances leaderboard, so this walks the first
    /// [`MAX_PAGES`] pages of `players`.
    pub async fn get_top_appearances(&self, league_id: u64, season: i32) -> ApiResult<Vec<PlayerSeasonStats>> {
        self.paged_leaderboard(league_id, season, has_appearances, LeaderMetric::Appearances)
            .await
    }

    pub async fn get_top_passes(&self, league_id: u64, season: i32) -> ApiResult<Vec<PlayerSeasonStats>> {
        self.paged_leaderboard(league_id, season, has_passes, LeaderMetric::Passes)
            .await
    }
}

/// Keep one entry per team: a later record for the same team replaces the
/// earlier one in place.
fn latest_per_team<I, E>(items: I, team_id: impl Fn(&E) -> u64) -> Vec<E>
where
    I: IntoIterator<Item = E>,
{
    let mut out: Vec<E> = Vec::new();
    for item in items {
        let id = team_id(&item);
        match out.iter_mut().find(|existing| team_id(existing) == id) {
            Some(existing) => *existing = item,
            None => out.push(item),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::failure_envelope;
    use crate::standings::{Split, SortCriterion, SortDirection};
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Replays canned envelopes in order and records what was asked for.
    #[derive(Default)]
    struct Scripted {
        replies: RefCell<VecDeque<Value>>,
        calls: RefCell<Vec<(String, Params)>>,
    }

    impl Scripted {
        fn new(replies: Vec<Value>) -> Self {
            Self { replies: RefCell::new(replies.into()), ..Default::default() }
        }
    }

    impl Transport for &Scripted {
        async fn request(&self, _method: Method, endpoint: &str, params: &Params) -> Value {
            self.calls.borrow_mut().push((endpoint.to_owned(), params.clone()));
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| json!({"results": 0, "errors": [], "response": []}))
        }
    }

    fn service(script: &Scripted) -> FootballService<&Scripted> {
        FootballService::new(script, LogContext::new("test"))
    }

    fn ok(response: Value) -> Value {
        let results = response.as_array().map_or(1, Vec::len);
        json!({"results": results, "errors": [], "response": response})
    }

    fn page(response: Value, current: u32, total: u32) -> Value {
        let mut body = ok(response);
        body["paging"] = json!({"current": current, "total": total});
        body
    }

    fn league(id: u64, name: &str) -> Value {
        json!({"league": {"id": id, "name": name, "type": "League"}, "country": {"name": "England"}})
    }

    fn fixture(id: u64, short: &str) -> Value {
        json!({
            "fixture": {"id": id, "date": "2024-03-02T15:00:00+00:00", "status": {"long": "", "short": short, "elapsed": 30}},
            "league": {"id": 39, "name": "Premier League"},
            "teams": {"home": {"id": 1, "name": "A"}, "away": {"id": 2, "name": "B"}},
            "goals": {"home": 1, "away": 0}
        })
    }

    fn standing(rank: u32, team: u64, points: i32, win: u32, draw: u32, gf: u32, ga: u32) -> Value {
        json!({
            "rank": rank, "points": points, "team": {"id": team, "name": format!("Team {team}")},
            "all": {"played": 38, "win": win, "draw": draw, "lose": 38 - win - draw, "goals": {"for": gf, "against": ga}},
            "home": {"played": 19, "win": win / 2, "draw": draw / 2, "lose": 19 - win / 2 - draw / 2, "goals": {"for": gf / 2, "against": ga / 2}},
            "away": {"played": 19, "win": win - win / 2, "draw": draw - draw / 2, "lose": 19 - (win - win / 2) - (draw - draw / 2), "goals": {"for": gf - gf / 2, "against": ga - ga / 2}}
        })
    }

    fn player(id: u64, appearances: Option<u32>, passes: Option<u32>) -> Value {
        json!({
            "player": {"id": id, "name": format!("Player {id}")},
            "statistics": [{"games": {"appearences": appearances}, "passes": {"total": passes, "accuracy": 85}}]
        })
    }

    #[test]
    fn season_rolls_over_in_july() {
        let date = |m| NaiveDate::from_ymd_opt(2024, m, 1).unwrap();
        assert_eq!(season_for(date(6)), 2023);
        assert_eq!(season_for(date(7)), 2024);
        assert_eq!(season_for(date(12)), 2024);
    }

    #[tokio::test]
    async fn flat_table_of_twenty_teams() {
        let table: Vec<Value> = (1..=20)
            .map(|rank| standing(rank, 100 + u64::from(rank), 90 - rank as i32 * 3, 20, 10, 60, 30 + rank))
            .collect();
        let script = Scripted::new(vec![ok(json!([{"league": {"id": 39, "standings": table}}]))]);

        let rows = service(&script).get_standings(39, 2023).await.unwrap();

        assert_eq!(rows.len(), 20);
        assert_eq!(rows.iter().map(|r| r.rank).collect::<Vec<_>>(), (1..=20).collect::<Vec<_>>());
        for row in &rows {
            assert_eq!(row.goal_difference(), i64::from(row.goals_for) - i64::from(row.goals_against));
        }
        let calls = script.calls.borrow();
        let (endpoint, params) = &calls[0];
        assert_eq!(endpoint, "standings");
        assert_eq!(params.get("league"), Some("39"));
        assert_eq!(params.get("season"), Some("2023"));
    }

    #[tokio::test]
    async fn grouped_table_surfaces_first_group_only() {
        let groups = json!([
            [standing(1, 1, 9, 3, 0, 5, 1), standing(2, 2, 6, 2, 0, 4, 2)],
            [standing(1, 3, 9, 3, 0, 5, 1), standing(2, 4, 6, 2, 0, 4, 2), standing(3, 5, 3, 1, 0, 1, 4)]
        ]);
        let script = Scripted::new(vec![ok(json!([{"league": {"standings": groups}}]))]);
        let rows = service(&script).get_standings(2, 2023).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].team.id, 1);
    }

    #[tokio::test]
    async fn away_view_is_rebuilt_and_reranked() {
        let table = json!([
            standing(1, 10, 80, 25, 5, 70, 30),
            standing(2, 20, 70, 21, 7, 60, 35),
            standing(3, 30, 60, 17, 9, 50, 40)
        ]);
        let script = Scripted::new(vec![ok(json!([{"league": {"standings": [table]}}]))]);
        let view = StandingsView {
            split: Split::Away,
            sort: SortCriterion::GoalsAgainst,
            direction: SortDirection::Asc,
        };

        let rows = service(&script).get_standings_view(39, 2023, view).await.unwrap();

        assert_eq!(rows.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(rows.iter().map(|r| r.team.id).collect::<Vec<_>>(), vec![10, 20, 30]);
        for row in &rows {
            assert_eq!(row.played, 19);
            assert_eq!(row.points, (row.win * 3 + row.draw) as i32);
        }
        assert_eq!(rows[0].goals_against, 15);
    }

    #[tokio::test]
    async fn two_live_fixtures_are_both_live() {
        let script = Scripted::new(vec![ok(json!([fixture(1, "1H"), fixture(2, "2H")]))]);
        let fixtures = service(&script).get_live_scores(None, None).await.unwrap();
        assert_eq!(fixtures.len(), 2);
        assert!(fixtures.iter().all(Fixture::is_live));
        assert_eq!(script.calls.borrow()[0].1.get("live"), Some("all"));
    }

    #[tokio::test]
    async fn fixtures_with_bad_or_missing_dates_are_kept_undated() {
        let mut garbled = fixture(2, "NS");
        garbled["fixture"]["date"] = json!("tomorrow-ish");
        let mut undated = fixture(3, "TBD");
        undated["fixture"].as_object_mut().unwrap().remove("date");
        let script = Scripted::new(vec![ok(json!([fixture(1, "FT"), garbled, undated]))]);

        let fixtures = service(&script).get_fixtures(&FixtureFilter::default()).await.unwrap();

        assert_eq!(fixtures.iter().map(|f| f.id).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(fixtures[0].date.is_some());
        assert_eq!(fixtures[1].date, None);
        assert_eq!(fixtures[2].date, None);
    }

    #[tokio::test]
    async fn transport_failure_surfaces_as_api_error() {
        let script = Scripted::new(vec![failure_envelope("operation timed out")]);
        let err = service(&script).get_leagues(None, None).await.unwrap_err();
        assert!(matches!(err, ApiError::Api { .. }));
        assert!(err.to_string().contains("API request failed"));
    }

    #[tokio::test]
    async fn empty_result_is_an_empty_list() {
        let script = Scripted::new(vec![json!({"results": 0, "errors": [], "response": []})]);
        assert!(service(&script).get_fixtures(&FixtureFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_matches_defaults_season() {
        let script = Scripted::new(vec![ok(json!([fixture(1, "NS")]))]);
        let svc = service(&script);
        let filter = FixtureFilter { league: Some(39), ..Default::default() };
        svc.get_matches(&filter, false).await.unwrap();
        let season = svc.get_current_season().to_string();
        assert_eq!(script.calls.borrow()[0].1.get("season"), Some(season.as_str()));
    }

    #[tokio::test]
    async fn paging_stops_at_cap_despite_larger_total() {
        let pages: Vec<Value> = (1..=8)
            .map(|n| page(json!([player(n, Some(n as u32), None)]), n as u32, 40))
            .collect();
        let script = Scripted::new(pages);

        let rows = service(&script).get_top_appearances(39, 2023).await.unwrap();

        assert_eq!(script.calls.borrow().len(), MAX_PAGES as usize);
        assert_eq!(rows.len(), MAX_PAGES as usize);
        assert_eq!(rows[0].appearances, 5);
        let pages: Vec<_> = script.calls.borrow().iter().map(|(_, p)| p.get("page").map(str::to_owned)).collect();
        assert_eq!(pages.last().cloned().flatten().as_deref(), Some("5"));
    }

    #[tokio::test]
    async fn paging_stops_at_reported_total_and_on_empty_page() {
        let script = Scripted::new(vec![
            page(json!([player(1, Some(3), Some(100))]), 1, 2),
            page(json!([player(2, Some(9), None)]), 2, 2),
        ]);
        let rows = service(&script).get_top_passes(39, 2023).await.unwrap();
        assert_eq!(script.calls.borrow().len(), 2);
        assert_eq!(rows.len(), 1, "records without passes are dropped");

        let script = Scripted::new(vec![
            page(json!([player(1, Some(3), None)]), 1, 4),
            json!({"results": 0, "errors": [], "response": [], "paging": {"current": 2, "total": 4}}),
        ]);
        service(&script).get_top_appearances(39, 2023).await.unwrap();
        assert_eq!(script.calls.borrow().len(), 2);
    }

    #[tokio::test]
    async fn failed_later_page_is_skipped() {
        let script = Scripted::new(vec![
            page(json!([player(1, Some(3), None)]), 1, 3),
            failure_envelope("connection reset"),
            page(json!([player(3, Some(7), None)]), 3, 3),
        ]);
        let rows = service(&script).get_top_appearances(39, 2023).await.unwrap();
        assert_eq!(rows.iter().map(|r| r.player.id).collect::<Vec<_>>(), vec![3, 1]);
    }

    #[tokio::test]
    async fn failed_first_page_propagates() {
        let script = Scripted::new(vec![failure_envelope("connection refused")]);
        assert!(service(&script).get_top_passes(39, 2023).await.is_err());
    }

    #[tokio::test]
    async fn contract_violation_on_later_page_is_not_swallowed() {
        let script = Scripted::new(vec![
            page(json!([player(1, Some(3), None)]), 1, 3),
            json!({"results": 5, "errors": []}),
        ]);
        let err = service(&script).get_top_appearances(39, 2023).await.unwrap_err();
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn combined_cards_merge_players_from_both_lists() {
        let carded = |id: u64, yellow: Option<u32>, red: Option<u32>| {
            json!({"player": {"id": id, "name": format!("P{id}")}, "statistics": [{"cards": {"yellow": yellow, "red": red}}]})
        };
        let script = Scripted::new(vec![
            ok(json!([carded(1, Some(10), None), carded(2, Some(8), Some(0))])),
            ok(json!([carded(1, Some(10), Some(2)), carded(3, Some(1), Some(2))])),
        ]);

        let rows = service(&script).get_top_cards(39, 2023).await.unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!((rows[0].player.id, rows[0].yellow, rows[0].red), (1, 10, 2));
        assert_eq!(rows[2].player.id, 3);
        let endpoints: Vec<_> = script.calls.borrow().iter().map(|(e, _)| e.clone()).collect();
        assert_eq!(endpoints, vec!["players/topyellowcards", "players/topredcards"]);
    }

    #[tokio::test]
    async fn combined_cards_survive_red_list_failure() {
        let script = Scripted::new(vec![
            ok(json!([{"player": {"id": 1}, "statistics": [{"cards": {"yellow": 4, "red": 1}}]}])),
            failure_envelope("timed out"),
        ]);
        let rows = service(&script).get_top_cards(39, 2023).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn matches_by_league_skips_failing_leagues() {
        let script = Scripted::new(vec![
            ok(json!([league(39, "Premier League"), league(40, "Championship"), league(41, "League One")])),
            ok(json!([fixture(1, "FT")])),
            failure_envelope("timed out"),
            json!({"results": 0, "errors": [], "response": []}),
        ]);

        let filter = FixtureFilter {
            season: Some(2023),
            date: Some("2024-03-02".into()),
            ..Default::default()
        };
        let result = service(&script)
            .get_matches_by_league(Some("England"), &filter, false)
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].league.id, 39);
        assert_eq!(result[0].fixtures.len(), 1);
        assert_eq!(script.calls.borrow()[1].1.get("date"), Some("2024-03-02"));
    }

    #[tokio::test]
    async fn matches_by_league_passes_date_range_to_every_league() {
        let script = Scripted::new(vec![
            ok(json!([league(39, "Premier League"), league(40, "Championship")])),
            ok(json!([fixture(1, "FT")])),
            ok(json!([fixture(2, "FT")])),
        ]);
        let filter = FixtureFilter {
            season: Some(2023),
            from: Some("2024-03-01".into()),
            to: Some("2024-03-07".into()),
            timezone: Some("UTC".into()),
            ..Default::default()
        };

        let result = service(&script)
            .get_matches_by_league(Some("England"), &filter, false)
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
        let calls = script.calls.borrow();
        for (league_id, (endpoint, params)) in [("39", &calls[1]), ("40", &calls[2])] {
            assert_eq!(endpoint, "fixtures");
            assert_eq!(params.get("league"), Some(league_id));
            assert_eq!(params.get("from"), Some("2024-03-01"));
            assert_eq!(params.get("to"), Some("2024-03-07"));
            assert_eq!(params.get("season"), Some("2023"));
        }
    }

    #[tokio::test]
    async fn matches_by_league_propagates_league_lookup_failure() {
        let script = Scripted::new(vec![json!({"results": 0, "errors": {"token": "invalid api key"}, "response": []})]);
        let err = service(&script)
            .get_live_matches_by_league(None, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Authentication { .. }));
    }

    #[tokio::test]
    async fn match_statistics_tolerates_missing_parts() {
        let script = Scripted::new(vec![
            ok(json!([{"time": {"elapsed": 12}, "team": {"id": 1}, "player": {"name": "Haaland"}, "type": "Goal", "detail": "Normal Goal"}])),
            failure_envelope("timed out"),
            ok(json!([
                {"team": {"id": 1, "name": "A"}, "formation": "4-3-3", "startXI": [], "substitutes": []},
                {"team": {"id": 2, "name": "B"}, "formation": "4-4-2", "startXI": [], "substitutes": []},
                {"team": {"id": 1, "name": "A"}, "formation": "3-5-2", "startXI": [], "substitutes": []}
            ])),
        ]);

        let stats = service(&script).get_match_statistics(1035037).await.unwrap();

        assert_eq!(stats.events.len(), 1);
        assert!(stats.team_statistics.is_empty());
        assert_eq!(stats.lineups.len(), 2);
        assert_eq!(stats.lineups[0].formation.as_deref(), Some("3-5-2"));
    }

    #[tokio::test]
    async fn team_statistics_object_response() {
        let script = Scripted::new(vec![json!({
            "results": 11, "errors": [],
            "response": {"team": {"id": 33, "name": "Manchester United"}, "form": "WDLWW",
                         "fixtures": {"played": {"home": 19, "away": 19, "total": 38}}}
        })]);
        let stats = service(&script).get_team_statistics(33, 2023, Some(39)).await.unwrap().unwrap();
        assert_eq!(stats.team.name, "Manchester United");
        assert_eq!(stats.fixtures.played.total, 38);
        assert_eq!(script.calls.borrow()[0].1.get("league"), Some("39"));
    }

    #[tokio::test]
    async fn find_leagues_matches_name_case_insensitively() {
        let script = Scripted::new(vec![ok(json!([
            league(39, "Premier League"),
            league(40, "Championship"),
            league(141, "Premier League Cup")
        ]))]);
        let found = service(&script).find_leagues("premier", None, None).await.unwrap();
        assert_eq!(found.iter().map(|l| l.id).collect::<Vec<_>>(), vec![39, 141]);
    }

    #[tokio::test]
    async fn squad_is_paged() {
        let script = Scripted::new(vec![
            page(json!([{"player": {"id": 1, "name": "Onana"}, "statistics": [{"games": {"position": "Goalkeeper"}}]}]), 1, 2),
            page(json!([{"player": {"id": 2, "name": "Shaw"}, "statistics": [{"games": {"position": "Defender"}}]}]), 2, 2),
        ]);
        let players = service(&script).get_players(33, 2023).await.unwrap();
        assert_eq!(players.len(), 2);
        assert_eq!(players[0].position.as_deref(), Some("Goalkeeper"));
    }

    #[tokio::test]
    async fn date_range_derives_season_from_start() {
        let script = Scripted::new(vec![ok(json!([fixture(1, "FT")]))]);
        let from = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        service(&script).get_team_matches_by_date_range(33, from, to, None).await.unwrap();
        let calls = script.calls.borrow();
        let params = &calls[0].1;
        assert_eq!(params.get("season"), Some("2023"));
        assert_eq!(params.get("from"), Some("2024-02-01"));
        assert_eq!(params.get("to"), Some("2024-03-01"));
    }
}
