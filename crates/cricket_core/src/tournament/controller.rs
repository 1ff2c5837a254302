//! Tournament controller.
//!
//! Owns the teams and venues for the duration of a competition, schedules
//! fixtures per stage, runs each fixture through a fresh [`MatchEngine`]
//! seeded from the tournament seed and the fixture id, and moves from
//! league or group play into a seeded knockout bracket.

use std::collections::HashSet;

use chrono::Days;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::config::{TournamentConfig, TournamentFormat};
use super::fixtures::{self, BracketSlot, Fixture, Pairing, Stage};
use super::standings::{self, Standing};
use crate::engine::{MatchEngine, MatchEvent, MatchResult};
use crate::error::{ConfigError, TournamentError};
use crate::events::EventQueue;
use crate::models::{Team, Venue};
use crate::rng::derive_seed;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TournamentStatus {
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TournamentEvent {
    /// Forwarded from the engine while a stage is being played.
    Match { fixture: usize, event: MatchEvent },
    MatchCompleted {
        fixture: usize,
        team1: String,
        team2: String,
        winner: Option<String>,
    },
    StageAdvanced(Stage),
    TournamentEnded { winner: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentState {
    pub config: TournamentConfig,
    pub seed: u64,
    pub teams: Vec<Team>,
    pub venues: Vec<Venue>,
    pub fixtures: Vec<Fixture>,
    pub stage: Stage,
    pub status: TournamentStatus,
    pub paused: bool,
    /// League (one group) or group-stage membership.
    pub groups: Vec<Vec<String>>,
    /// One table per group, kept sorted.
    pub standings: Vec<Vec<Standing>>,
    /// Slots of the current knockout round, in bracket order.
    pub bracket: Vec<BracketSlot>,
    pub knockout_round: u32,
    pub champion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentSnapshot {
    pub state: TournamentState,
}

pub struct Tournament {
    state: TournamentState,
    events: EventQueue<TournamentEvent>,
}

impl Tournament {
    /// Validate the field and schedule the first stage.
    pub fn new(
        config: TournamentConfig,
        mut teams: Vec<Team>,
        venues: Vec<Venue>,
        seed: u64,
    ) -> Result<Self, TournamentError> {
        config.validate(teams.len())?;
        if venues.is_empty() {
            return Err(ConfigError::new("a tournament needs at least one venue").into());
        }
        for venue in &venues {
            venue.validate()?;
        }
        let mut seen = HashSet::new();
        for team in &mut teams {
            if !seen.insert(team.name.clone()) {
                return Err(ConfigError::new(format!("team {} entered twice", team.name)).into());
            }
            if config.enforce_squad_size {
                team.validate_squad()?;
            }
            team.ensure_lineup()?;
        }

        let names: Vec<String> = teams.iter().map(|t| t.name.clone()).collect();
        let format = config.format;
        let mut tournament = Self {
            state: TournamentState {
                config,
                seed,
                teams,
                venues,
                fixtures: Vec::new(),
                stage: Stage::League,
                status: TournamentStatus::InProgress,
                paused: false,
                groups: Vec::new(),
                standings: Vec::new(),
                bracket: Vec::new(),
                knockout_round: 0,
                champion: None,
            },
            events: EventQueue::new(),
        };

        match format {
            TournamentFormat::RoundRobin | TournamentFormat::Hybrid => {
                let double = tournament.state.config.double_round_robin;
                tournament.schedule_league(Stage::League, 0, &names, double);
                tournament.state.groups = vec![names];
            }
            TournamentFormat::GroupStage => {
                let groups = fixtures::distribute_groups(&names, tournament.state.config.groups);
                tournament.state.stage = Stage::Groups;
                for (g, members) in groups.iter().enumerate() {
                    tournament.schedule_league(Stage::Groups, g, members, false);
                }
                tournament.state.groups = groups;
            }
            TournamentFormat::Knockout => tournament.start_knockout(names),
        }
        tournament.state.standings = tournament
            .state
            .groups
            .iter()
            .map(|g| g.iter().map(Standing::new).collect())
            .collect();

        info!(
            name = %tournament.state.config.name,
            format = %format,
            teams = tournament.state.teams.len(),
            fixtures = tournament.state.fixtures.len(),
            "tournament created"
        );
        Ok(tournament)
    }

    pub fn snapshot(&self) -> TournamentSnapshot {
        TournamentSnapshot {
            state: self.state.clone(),
        }
    }

    pub fn restore(snapshot: TournamentSnapshot) -> Self {
        Self {
            state: snapshot.state,
            events: EventQueue::new(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &TournamentConfig {
        &self.state.config
    }

    pub fn status(&self) -> TournamentStatus {
        self.state.status
    }

    pub fn stage(&self) -> Stage {
        self.state.stage
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    pub fn fixtures(&self) -> &[Fixture] {
        &self.state.fixtures
    }

    pub fn fixture(&self, id: usize) -> Option<&Fixture> {
        self.state.fixtures.get(id)
    }

    /// Fixtures of the stage in play.
    pub fn stage_fixtures(&self) -> impl Iterator<Item = &Fixture> {
        let stage = self.state.stage;
        self.state.fixtures.iter().filter(move |f| f.stage == stage)
    }

    pub fn is_stage_complete(&self) -> bool {
        self.stage_fixtures().all(Fixture::is_completed)
    }

    pub fn groups(&self) -> &[Vec<String>] {
        &self.state.groups
    }

    /// Sorted tables, one per group. Empty for a pure knockout.
    pub fn standings(&self) -> &[Vec<Standing>] {
        &self.state.standings
    }

    pub fn teams(&self) -> &[Team] {
        &self.state.teams
    }

    pub fn team(&self, name: &str) -> Option<&Team> {
        self.state.teams.iter().find(|t| t.name == name)
    }

    pub fn venues(&self) -> &[Venue] {
        &self.state.venues
    }

    pub fn bracket(&self) -> &[BracketSlot] {
        &self.state.bracket
    }

    pub fn champion(&self) -> Option<&str> {
        self.state.champion.as_deref()
    }

    pub fn drain_events(&mut self) -> Vec<TournamentEvent> {
        self.events.drain()
    }

    // ========================================================================
    // Control
    // ========================================================================

    pub fn pause(&mut self) -> Result<(), TournamentError> {
        if self.state.status == TournamentStatus::Cancelled {
            return Err(TournamentError::Cancelled);
        }
        if self.state.status == TournamentStatus::InProgress {
            self.state.paused = true;
        }
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), TournamentError> {
        if self.state.status == TournamentStatus::Cancelled {
            return Err(TournamentError::Cancelled);
        }
        self.state.paused = false;
        Ok(())
    }

    /// Abandon the competition. No champion is recorded.
    pub fn cancel(&mut self) -> Result<(), TournamentError> {
        if self.state.status == TournamentStatus::Cancelled {
            return Err(TournamentError::Cancelled);
        }
        self.state.status = TournamentStatus::Cancelled;
        self.state.paused = false;
        self.state.champion = None;
        info!(name = %self.state.config.name, "tournament cancelled");
        Ok(())
    }

    // ========================================================================
    // Fixtures
    // ========================================================================

    pub fn play_match(&mut self, fixture: usize) -> Result<MatchResult, TournamentError> {
        self.play_match_with(fixture, |_| {})
    }

    /// Simulate one fixture of the current stage, handing every match event
    /// to `hook` as it is produced.
    pub fn play_match_with<F>(&mut self, id: usize, hook: F) -> Result<MatchResult, TournamentError>
    where
        F: FnMut(&MatchEvent),
    {
        self.ensure_running()?;
        let fixture = self.scheduled_fixture(id)?.clone();

        let mut match_config = self.state.config.match_config.clone();
        if fixture.stage.is_knockout() {
            match_config.super_over = true;
        }
        for name in [&fixture.team1, &fixture.team2] {
            let team = self
                .state
                .teams
                .iter_mut()
                .find(|t| t.name == *name)
                .ok_or_else(|| ConfigError::new(format!("unknown team {name}")))?;
            team.ensure_lineup()?;
        }

        let team1 = self.team(&fixture.team1);
        let team2 = self.team(&fixture.team2);
        let venue = self.state.venues.iter().find(|v| v.name == fixture.venue);
        let (Some(team1), Some(team2), Some(venue)) = (team1, team2, venue) else {
            return Err(ConfigError::new(format!("fixture {id} refers to unknown entries")).into());
        };

        let seed = derive_seed(self.state.seed, id as u64);
        debug!(fixture = id, stage = %fixture.stage, seed, "playing fixture");
        let mut engine = MatchEngine::initialise_with_seed(team1, team2, venue, match_config, seed)?;
        let result = engine.simulate_match_with(hook)?;
        self.apply_result(id, &result);
        Ok(result)
    }

    /// Record a result produced outside the controller.
    pub fn record_result(&mut self, id: usize, result: &MatchResult) -> Result<(), TournamentError> {
        self.ensure_running()?;
        let fixture = self.scheduled_fixture(id)?;
        let consistent = result
            .innings
            .iter()
            .all(|i| fixture.involves(&i.batting_team) && fixture.involves(&i.bowling_team))
            && result.winner.as_deref().map_or(true, |w| fixture.involves(w));
        if !consistent {
            return Err(ConfigError::new(format!(
                "result does not match fixture {id} ({} v {})",
                fixture.team1, fixture.team2
            ))
            .into());
        }
        if fixture.stage.is_knockout() && result.winner.is_none() {
            return Err(ConfigError::new(format!("knockout fixture {id} needs a winner")).into());
        }
        self.apply_result(id, result);
        Ok(())
    }

    /// Move to the next stage once every fixture of the current one is done.
    ///
    /// Returns false, changing nothing, while the stage is still in play or
    /// after the tournament has finished.
    pub fn advance(&mut self) -> Result<bool, TournamentError> {
        match self.state.status {
            TournamentStatus::Cancelled => return Err(TournamentError::Cancelled),
            TournamentStatus::Completed => return Ok(false),
            TournamentStatus::InProgress => {}
        }
        if self.state.paused {
            return Err(TournamentError::Paused);
        }
        if !self.is_stage_complete() {
            debug!(stage = %self.state.stage, "stage still in play");
            return Ok(false);
        }

        match self.state.stage {
            Stage::League if self.state.config.format == TournamentFormat::Hybrid => {
                let playoffs = self.state.config.playoff_teams;
                let entrants = self.state.standings[0]
                    .iter()
                    .take(playoffs)
                    .map(|s| s.team.clone())
                    .collect();
                self.start_knockout(entrants);
            }
            Stage::League => {
                let champion = self
                    .state
                    .standings
                    .first()
                    .and_then(|rows| rows.first())
                    .map(|s| s.team.clone())
                    .ok_or_else(|| ConfigError::new("league table is empty"))?;
                self.finish(champion);
                return Ok(true);
            }
            Stage::Groups => {
                let per_group = self.state.config.qualifiers_per_group;
                let qualifiers: Vec<Vec<String>> = self
                    .state
                    .standings
                    .iter()
                    .map(|rows| rows.iter().take(per_group).map(|s| s.team.clone()).collect())
                    .collect();
                self.start_knockout(fixtures::cross_seed(&qualifiers));
            }
            Stage::Knockout { .. } | Stage::Final => {
                let entrants: Vec<String> = self
                    .state
                    .bracket
                    .iter()
                    .map(|slot| self.slot_winner(slot))
                    .collect();
                if let [champion] = entrants.as_slice() {
                    let champion = champion.clone();
                    self.finish(champion);
                    return Ok(true);
                }
                self.start_knockout(entrants);
            }
        }

        info!(stage = %self.state.stage, "stage advanced");
        self.events.push(TournamentEvent::StageAdvanced(self.state.stage));
        Ok(true)
    }

    pub fn play_stage(&mut self) -> Result<(), TournamentError> {
        self.play_stage_with(|_| {})
    }

    /// Play every outstanding fixture of the current stage in schedule
    /// order, then advance.
    pub fn play_stage_with<F>(&mut self, mut hook: F) -> Result<(), TournamentError>
    where
        F: FnMut(&TournamentEvent),
    {
        self.ensure_running()?;
        let stage = self.state.stage;
        let pending: Vec<usize> = self
            .state
            .fixtures
            .iter()
            .filter(|f| f.stage == stage && !f.is_completed())
            .map(|f| f.id)
            .collect();

        for id in pending {
            self.play_match_with(id, |event| {
                hook(&TournamentEvent::Match {
                    fixture: id,
                    event: event.clone(),
                })
            })?;
            for event in self.events.drain() {
                hook(&event);
            }
        }
        self.advance()?;
        for event in self.events.drain() {
            hook(&event);
        }
        Ok(())
    }

    /// Play stages until a champion is crowned.
    pub fn run_to_completion(&mut self) -> Result<String, TournamentError> {
        self.run_to_completion_with(|_| {})
    }

    pub fn run_to_completion_with<F>(&mut self, mut hook: F) -> Result<String, TournamentError>
    where
        F: FnMut(&TournamentEvent),
    {
        while self.state.status == TournamentStatus::InProgress {
            self.play_stage_with(&mut hook)?;
        }
        self.state.champion.clone().ok_or(TournamentError::Cancelled)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn ensure_running(&self) -> Result<(), TournamentError> {
        if self.state.status == TournamentStatus::Cancelled {
            return Err(TournamentError::Cancelled);
        }
        if self.state.paused {
            return Err(TournamentError::Paused);
        }
        Ok(())
    }

    /// The fixture, provided it can still be played now.
    fn scheduled_fixture(&self, id: usize) -> Result<&Fixture, TournamentError> {
        let fixture = self
            .state
            .fixtures
            .get(id)
            .ok_or(TournamentError::UnknownFixture(id))?;
        if fixture.is_completed() {
            warn!(fixture = id, "fixture already played");
            return Err(TournamentError::FixtureFinalized(id));
        }
        if fixture.stage != self.state.stage {
            return Err(TournamentError::FixtureNotScheduled(id));
        }
        Ok(fixture)
    }

    fn schedule_league(&mut self, stage: Stage, group: usize, members: &[String], double: bool) {
        for (home, away) in fixtures::round_robin(members, double) {
            self.push_fixture(stage, Some(group), home, away);
        }
    }

    fn push_fixture(&mut self, stage: Stage, group: Option<usize>, team1: String, team2: String) -> usize {
        let id = self.state.fixtures.len();
        let venue = self.state.venues[id % self.state.venues.len()].name.clone();
        let gap = u64::from(self.state.config.days_between_matches) * id as u64;
        let date = self
            .state
            .config
            .start_date
            .and_then(|d| d.checked_add_days(Days::new(gap)));
        self.state.fixtures.push(Fixture {
            id,
            stage,
            group,
            team1,
            team2,
            venue,
            date,
            format: self.state.config.match_config.format,
            outcome: None,
        });
        id
    }

    fn start_knockout(&mut self, entrants: Vec<String>) {
        self.state.knockout_round += 1;
        let stage = if entrants.len() == 2 {
            Stage::Final
        } else {
            Stage::Knockout {
                round: self.state.knockout_round,
            }
        };
        self.state.stage = stage;

        let mut bracket = Vec::new();
        for pairing in fixtures::knockout_pairings(&entrants) {
            bracket.push(match pairing {
                Pairing::Bye(team) => BracketSlot::Bye(team),
                Pairing::Tie(high, low) => BracketSlot::Match(self.push_fixture(stage, None, high, low)),
            });
        }
        self.state.bracket = bracket;
    }

    /// Who leaves a bracket slot. A knockout tie that survives every super
    /// over goes to the higher seed.
    fn slot_winner(&self, slot: &BracketSlot) -> String {
        match slot {
            BracketSlot::Bye(team) => team.clone(),
            BracketSlot::Match(id) => {
                let fixture = &self.state.fixtures[*id];
                fixture.winner().unwrap_or(&fixture.team1).to_string()
            }
        }
    }

    fn apply_result(&mut self, id: usize, result: &MatchResult) {
        let fixture = &self.state.fixtures[id];
        let outcome = fixture.outcome_from(result);
        let (team1, team2, venue) = (
            fixture.team1.clone(),
            fixture.team2.clone(),
            fixture.venue.clone(),
        );

        if let Some(rows) = fixture.group.and_then(|g| self.state.standings.get_mut(g)) {
            standings::record_outcome(rows, &team1, &team2, &outcome);
            standings::sort_standings(rows, &self.state.config.tie_breakers);
        }

        if let Some(v) = self.state.venues.iter_mut().find(|v| v.name == venue) {
            v.record_match();
        }
        for team in &mut self.state.teams {
            team.advance_injuries();
        }

        info!(
            fixture = id,
            home = %team1,
            away = %team2,
            winner = outcome.winner.as_deref().unwrap_or("tie"),
            "fixture complete"
        );
        let winner = outcome.winner.clone();
        self.state.fixtures[id].outcome = Some(outcome);
        self.events.push(TournamentEvent::MatchCompleted {
            fixture: id,
            team1,
            team2,
            winner,
        });
    }

    fn finish(&mut self, champion: String) {
        info!(name = %self.state.config.name, champion = %champion, "tournament complete");
        self.state.status = TournamentStatus::Completed;
        self.state.champion = Some(champion.clone());
        self.state.bracket.clear();
        self.events.push(TournamentEvent::TournamentEnded { winner: champion });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{MatchConfig, ResultMargin};
    use crate::models::{MatchFormat, Nationality, Player, Role};
    use chrono::NaiveDate;

    fn team(name: &str, strength: u8) -> Team {
        let mut team = Team::new(name, 100.0);
        for i in 0..18u8 {
            let role = match i {
                0 => Role::WicketKeeper,
                1..=6 => Role::Bowler,
                7..=8 => Role::AllRounder,
                _ => Role::Batsman,
            };
            let (bat, bowl) = if (1..=6).contains(&i) {
                (30, strength)
            } else {
                (strength, 30)
            };
            team.squad
                .push(Player::new(format!("{name} {i}"), role, Nationality::Local).with_skills(bat, bowl, 50));
        }
        team
    }

    fn field(n: usize) -> Vec<Team> {
        (0..n).map(|i| team(&format!("Team {i}"), 50 + i as u8 * 3)).collect()
    }

    fn short(format: TournamentFormat) -> TournamentConfig {
        TournamentConfig {
            match_config: MatchConfig::new(MatchFormat::Custom { overs: 2 }),
            ..TournamentConfig::new(format)
        }
    }

    fn venues() -> Vec<Venue> {
        vec![Venue::new("Eden Gardens", 66_000), Venue::new("Wankhede", 33_000)]
    }

    #[test]
    fn round_robin_schedules_every_pair_and_cycles_venues() {
        let config = TournamentConfig {
            start_date: NaiveDate::from_ymd_opt(2025, 3, 22),
            days_between_matches: 2,
            ..short(TournamentFormat::RoundRobin)
        };
        let t = Tournament::new(config, field(5), venues(), 1).unwrap();
        assert_eq!(t.fixtures().len(), 10);
        assert_eq!(t.fixtures()[0].venue, "Eden Gardens");
        assert_eq!(t.fixtures()[1].venue, "Wankhede");
        assert_eq!(t.fixtures()[3].date, NaiveDate::from_ymd_opt(2025, 3, 28));
    }

    #[test]
    fn league_runs_to_a_champion() {
        let mut t = Tournament::new(short(TournamentFormat::RoundRobin), field(4), venues(), 9).unwrap();
        let mut events = Vec::new();
        let champion = t
            .run_to_completion_with(|e| {
                if !matches!(e, TournamentEvent::Match { .. }) {
                    events.push(e.clone());
                }
            })
            .unwrap();

        assert_eq!(t.status(), TournamentStatus::Completed);
        assert_eq!(t.standings()[0][0].team, champion);
        let played: u32 = t.standings()[0].iter().map(|s| s.played).sum();
        assert_eq!(played, 12);
        assert_eq!(events.len(), 7);
        assert_eq!(
            events.last(),
            Some(&TournamentEvent::TournamentEnded { winner: champion })
        );
        assert!(t.drain_events().is_empty());
    }

    #[test]
    fn advance_is_a_no_op_mid_stage_and_results_are_final() {
        let mut t = Tournament::new(short(TournamentFormat::RoundRobin), field(4), venues(), 3).unwrap();
        t.play_match(0).unwrap();
        assert!(!t.advance().unwrap());
        assert_eq!(t.stage(), Stage::League);
        assert_eq!(t.play_match(0), Err(TournamentError::FixtureFinalized(0)));
        assert_eq!(t.play_match(99), Err(TournamentError::UnknownFixture(99)));
    }

    #[test]
    fn knockout_with_byes_needs_n_minus_one_matches() {
        let mut t = Tournament::new(short(TournamentFormat::Knockout), field(5), venues(), 5).unwrap();
        assert_eq!(t.stage(), Stage::Knockout { round: 1 });
        assert_eq!(t.fixtures().len(), 1);
        assert!(t.standings().is_empty());

        let champion = t.run_to_completion().unwrap();
        assert_eq!(t.fixtures().len(), 4);
        let last = t.fixtures().last().unwrap();
        assert_eq!(last.stage, Stage::Final);
        assert_eq!(last.winner(), Some(champion.as_str()));
    }

    #[test]
    fn group_stage_feeds_cross_seeded_semis() {
        let mut t = Tournament::new(short(TournamentFormat::GroupStage), field(8), venues(), 11).unwrap();
        assert_eq!(t.groups().len(), 2);
        assert_eq!(t.fixtures().len(), 12);

        t.play_stage().unwrap();
        assert_eq!(t.stage(), Stage::Knockout { round: 1 });
        let winners: Vec<_> = t.standings().iter().map(|g| g[0].team.clone()).collect();
        let runners_up: Vec<_> = t.standings().iter().map(|g| g[1].team.clone()).collect();
        let semis: Vec<_> = t.stage_fixtures().cloned().collect();
        assert_eq!(semis.len(), 2);
        assert_eq!((semis[0].team1.clone(), semis[0].team2.clone()), (winners[0].clone(), runners_up[1].clone()));
        assert_eq!((semis[1].team1.clone(), semis[1].team2.clone()), (winners[1].clone(), runners_up[0].clone()));

        t.run_to_completion().unwrap();
        assert_eq!(t.fixtures().len(), 15);
    }

    #[test]
    fn hybrid_playoffs_take_the_top_of_the_table() {
        let mut t = Tournament::new(short(TournamentFormat::Hybrid), field(5), venues(), 2).unwrap();
        t.play_stage().unwrap();
        let top: HashSet<String> = t.standings()[0].iter().take(4).map(|s| s.team.clone()).collect();
        let playoff_teams: HashSet<String> = t
            .stage_fixtures()
            .flat_map(|f| [f.team1.clone(), f.team2.clone()])
            .collect();
        assert_eq!(playoff_teams, top);
        t.run_to_completion().unwrap();
        assert_eq!(t.fixtures().len(), 10 + 3);
    }

    #[test]
    fn external_results_must_match_the_fixture() {
        let mut t = Tournament::new(short(TournamentFormat::RoundRobin), field(3), venues(), 4).unwrap();
        let bogus = MatchResult {
            winner: Some("Nobody".into()),
            margin: ResultMargin::Runs(5),
            innings: Vec::new(),
            super_overs: Vec::new(),
            tied_in_regulation: false,
        };
        assert!(matches!(t.record_result(0, &bogus), Err(TournamentError::Config(_))));

        let winner = t.fixtures()[0].team1.clone();
        let result = MatchResult {
            winner: Some(winner.clone()),
            ..bogus
        };
        t.record_result(0, &result).unwrap();
        assert_eq!(t.fixtures()[0].winner(), Some(winner.as_str()));
        assert_eq!(t.standings()[0][0].team, winner);
    }

    #[test]
    fn pause_and_cancel() {
        let mut t = Tournament::new(short(TournamentFormat::RoundRobin), field(3), venues(), 4).unwrap();
        t.pause().unwrap();
        assert_eq!(t.play_match(0), Err(TournamentError::Paused));
        t.resume().unwrap();
        t.cancel().unwrap();
        assert_eq!(t.play_stage(), Err(TournamentError::Cancelled));
        assert_eq!(t.champion(), None);
    }

    #[test]
    fn snapshot_restores_identical_standings() {
        let mut a = Tournament::new(short(TournamentFormat::Hybrid), field(4), venues(), 21).unwrap();
        a.play_match(0).unwrap();
        let json = serde_json::to_string(&a.snapshot()).unwrap();
        let mut b = Tournament::restore(serde_json::from_str(&json).unwrap());

        assert_eq!(a.run_to_completion().unwrap(), b.run_to_completion().unwrap());
        assert_eq!(a.standings(), b.standings());
    }
}
