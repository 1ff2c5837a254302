//! Ball-by-ball match driver.
//!
//! The engine owns a [`MatchState`] built from borrowed teams and a venue,
//! plus the generator it was handed. Every public step runs to completion
//! on the calling thread and appends [`MatchEvent`]s to an internal queue.

use rand::Rng;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use super::ball::{BallEvent, BallResult, Dismissal, WicketKind};
use super::innings::{Innings, InningsSetup, InningsSummary, OverSummary, SUPER_OVER_BATTERS};
use super::match_state::{
    Conditions, Lineup, MatchConfig, MatchEvent, MatchPhase, MatchResult, MatchSnapshot,
    MatchState, ResultMargin, SuperOverRound,
};
use super::probability::{self, DeliveryContext};
use crate::error::{BowlingChangeRejection, MatchError};
use crate::events::EventQueue;
use crate::models::{Team, Venue};
use crate::rng::{rng_from_seed, SimRng};

pub struct MatchEngine {
    state: MatchState,
    rng: SimRng,
    events: EventQueue<MatchEvent>,
}

impl MatchEngine {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Validate both lineups and open the first innings. `team1` bats first.
    ///
    /// The striker, non-striker and opening bowler are the heads of the
    /// respective orders. Rain is rolled here, once.
    pub fn initialise(
        team1: &Team,
        team2: &Team,
        venue: &Venue,
        config: MatchConfig,
        mut rng: SimRng,
    ) -> Result<Self, MatchError> {
        config.validate()?;
        venue.validate()?;
        if team1.name == team2.name {
            return Err(MatchError::InvalidLineup(format!(
                "{} cannot play itself",
                team1.name
            )));
        }
        team1.validate_lineup().map_err(MatchError::InvalidLineup)?;
        team2.validate_lineup().map_err(MatchError::InvalidLineup)?;

        let lineups = [Lineup::from_team(team1), Lineup::from_team(team2)];
        if let Some(p) = lineups[0]
            .players
            .iter()
            .find(|p| lineups[1].contains(&p.name))
        {
            return Err(MatchError::InvalidLineup(format!(
                "{} is listed by both sides",
                p.name
            )));
        }

        let raining = rng.gen::<f64>() < venue.weather.rain_probability;
        let conditions = Conditions {
            pitch: venue.pitch,
            weather: venue.weather,
            raining,
        };

        let first = Innings::new(InningsSetup {
            number: 1,
            batting_side: 0,
            batting_team: lineups[0].team.clone(),
            bowling_team: lineups[1].team.clone(),
            batting_order: lineups[0].batting_order.clone(),
            opening_bowler: lineups[1].bowling_order.first().cloned(),
            max_overs: config.format.overs_per_innings(),
            bowler_cap: config.bowler_cap(),
            target: None,
            super_over: false,
        });

        info!(
            home = %team1.name,
            away = %team2.name,
            venue = %venue.name,
            format = %config.format,
            raining,
            "match initialised"
        );

        Ok(Self {
            state: MatchState {
                config,
                venue: venue.name.clone(),
                conditions,
                lineups,
                phase: MatchPhase::NotStarted,
                paused: false,
                innings: vec![first],
                ball_history: Vec::new(),
                result: None,
                free_hit_pending: false,
            },
            rng,
            events: EventQueue::new(),
        })
    }

    pub fn initialise_with_seed(
        team1: &Team,
        team2: &Team,
        venue: &Venue,
        config: MatchConfig,
        seed: u64,
    ) -> Result<Self, MatchError> {
        Self::initialise(team1, team2, venue, config, rng_from_seed(seed))
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            state: self.state.clone(),
            rng: self.rng.clone(),
        }
    }

    /// Rebuild an engine from a snapshot. The event queue starts empty.
    pub fn restore(snapshot: MatchSnapshot) -> Self {
        Self {
            state: snapshot.state,
            rng: snapshot.rng,
            events: EventQueue::new(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn phase(&self) -> MatchPhase {
        self.state.phase
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    pub fn is_complete(&self) -> bool {
        self.state.phase == MatchPhase::Complete
    }

    pub fn config(&self) -> &MatchConfig {
        &self.state.config
    }

    pub fn ball_history(&self) -> &[BallEvent] {
        &self.state.ball_history
    }

    pub fn innings(&self) -> &[Innings] {
        &self.state.innings
    }

    pub fn current_innings(&self) -> Option<&Innings> {
        self.state.current_innings()
    }

    pub fn striker(&self) -> Option<&str> {
        self.current_innings().map(|i| i.striker.as_str())
    }

    pub fn non_striker(&self) -> Option<&str> {
        self.current_innings().map(|i| i.non_striker.as_str())
    }

    /// Bowler of the over in progress, if one has been chosen.
    pub fn bowler(&self) -> Option<&str> {
        self.current_innings().and_then(|i| i.bowler.as_deref())
    }

    /// Runs and wickets of the current innings.
    pub fn score(&self) -> (u32, u32) {
        self.current_innings()
            .map(|i| (i.runs, i.wickets))
            .unwrap_or((0, 0))
    }

    pub fn result(&self) -> Option<&MatchResult> {
        self.state.result.as_ref()
    }

    pub fn drain_events(&mut self) -> Vec<MatchEvent> {
        self.events.drain()
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// SHA-256 over the JSON-serialised ball history, hex encoded.
    pub fn history_digest(&self) -> String {
        let mut hasher = Sha256::new();
        for event in &self.state.ball_history {
            // Plain data with string keys; serialisation cannot fail.
            if let Ok(bytes) = serde_json::to_vec(event) {
                hasher.update(&bytes);
            }
            hasher.update(b"\n");
        }
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }

    // ========================================================================
    // Control
    // ========================================================================

    pub fn pause(&mut self) -> Result<(), MatchError> {
        self.ensure_not_terminal()?;
        self.state.paused = true;
        debug!(phase = %self.state.phase, "match paused");
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), MatchError> {
        self.ensure_not_terminal()?;
        self.state.paused = false;
        debug!(phase = %self.state.phase, "match resumed");
        Ok(())
    }

    /// Abandon the match. No result is recorded.
    pub fn cancel(&mut self) -> Result<(), MatchError> {
        self.ensure_not_terminal()?;
        self.state.phase = MatchPhase::Cancelled;
        self.state.paused = false;
        self.state.result = None;
        info!(venue = %self.state.venue, "match cancelled");
        Ok(())
    }

    /// Choose the bowler for the next over. Only accepted between overs.
    pub fn set_bowler(&mut self, name: &str) -> Result<(), MatchError> {
        self.ensure_playable()?;
        let inn = self.current_innings().ok_or(MatchError::MatchComplete)?;
        let fielding = &self.state.lineups[1 - inn.batting_side];

        let rejection = if !inn.is_over_start() {
            Some(BowlingChangeRejection::MidOver)
        } else if !fielding.contains(name) {
            Some(BowlingChangeRejection::NotInPlayingXi)
        } else if inn.overs_bowled_by(name) >= inn.bowler_cap {
            Some(BowlingChangeRejection::OverCapReached)
        } else if inn.previous_bowler.as_deref() == Some(name) {
            Some(BowlingChangeRejection::ConsecutiveOvers)
        } else {
            None
        };
        if let Some(reason) = rejection {
            warn!(bowler = name, %reason, "bowling change rejected");
            return Err(MatchError::InvalidBowlingChange {
                bowler: name.to_string(),
                reason,
            });
        }

        if let Some(inn) = self.state.current_innings_mut() {
            inn.bowler = Some(name.to_string());
        }
        debug!(bowler = name, "bowling change");
        Ok(())
    }

    /// Replace a side's batting order. Locked once that side has faced a ball.
    pub fn set_batting_order(&mut self, team: &str, order: Vec<String>) -> Result<(), MatchError> {
        self.ensure_playable()?;
        let (side, lineup) = self
            .state
            .lineup_of(team)
            .ok_or_else(|| MatchError::InvalidLineup(format!("{team} is not playing")))?;

        let mut sorted_new = order.clone();
        sorted_new.sort();
        sorted_new.dedup();
        let mut sorted_xi: Vec<String> = lineup.players.iter().map(|p| p.name.clone()).collect();
        sorted_xi.sort();
        if order.len() != sorted_xi.len() || sorted_new != sorted_xi {
            return Err(MatchError::InvalidLineup(format!(
                "{team} batting order is not a permutation of the XI"
            )));
        }

        let locked = self
            .state
            .innings
            .iter()
            .any(|i| i.batting_side == side && (i.has_started() || i.complete));
        if locked {
            warn!(team, "batting order change after the side started batting");
            return Err(MatchError::OrderLocked);
        }

        self.state.lineups[side].batting_order = order.clone();
        if let Some(inn) = self.state.current_innings_mut() {
            if inn.batting_side == side && !inn.super_over {
                inn.reset_order(order);
            }
        }
        Ok(())
    }

    // ========================================================================
    // Simulation
    // ========================================================================

    /// Bowl one delivery, legal or not, and apply every resulting transition.
    pub fn simulate_ball(&mut self) -> Result<BallEvent, MatchError> {
        self.ensure_playable()?;
        if self.state.phase == MatchPhase::NotStarted {
            self.state.phase = MatchPhase::FirstInnings;
        }

        let bowler = self.bowler_for_delivery()?;
        let event = self.deliver(&bowler)?;

        if event.result == BallResult::NoBall && self.state.config.free_hit {
            self.state.free_hit_pending = true;
        } else if event.is_legal() {
            self.state.free_hit_pending = false;
        }

        let inn = self
            .state
            .current_innings_mut()
            .ok_or(MatchError::MatchComplete)?;
        inn.record(&event);
        let over_summary = if inn.over_complete() {
            inn.close_over()
        } else {
            None
        };
        let close = inn.should_close();

        self.state.ball_history.push(event.clone());
        self.events.push(MatchEvent::Ball(event.clone()));
        if let Some(summary) = over_summary {
            debug!(
                innings = summary.innings,
                over = summary.over + 1,
                bowler = %summary.bowler,
                runs = summary.runs,
                score = summary.score,
                wickets = summary.total_wickets,
                "over complete"
            );
            self.events.push(MatchEvent::Over(summary));
        }
        if close {
            self.finish_innings();
        }
        Ok(event)
    }

    /// Bowl until the current over ends, the innings closes, or the match ends.
    pub fn simulate_over(&mut self) -> Result<Option<OverSummary>, MatchError> {
        self.ensure_playable()?;
        let innings_idx = self.state.innings.len() - 1;
        let over = self.state.innings[innings_idx].over;
        loop {
            self.simulate_ball()?;
            let moved_on = self.state.innings.len() - 1 != innings_idx
                || self.state.innings[innings_idx].over != over
                || self.state.phase.is_terminal();
            if moved_on {
                break;
            }
        }
        Ok(self.state.innings[innings_idx].overs.last().cloned())
    }

    pub fn simulate_innings(&mut self) -> Result<InningsSummary, MatchError> {
        self.ensure_playable()?;
        let innings_idx = self.state.innings.len() - 1;
        while !self.state.innings[innings_idx].complete {
            self.simulate_ball()?;
        }
        Ok(self.state.innings[innings_idx].summary())
    }

    pub fn simulate_match(&mut self) -> Result<MatchResult, MatchError> {
        self.simulate_match_with(|_| {})
    }

    /// Run to completion, handing every event to `hook` as it is produced.
    /// Events passed to the hook are removed from the queue.
    pub fn simulate_match_with<F>(&mut self, mut hook: F) -> Result<MatchResult, MatchError>
    where
        F: FnMut(&MatchEvent),
    {
        self.ensure_playable()?;
        while !self.state.phase.is_terminal() {
            self.simulate_ball()?;
            for event in self.events.drain() {
                hook(&event);
            }
        }
        self.state.result.clone().ok_or(MatchError::Cancelled)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn ensure_not_terminal(&self) -> Result<(), MatchError> {
        match self.state.phase {
            MatchPhase::Cancelled => Err(MatchError::Cancelled),
            MatchPhase::Complete => Err(MatchError::MatchComplete),
            _ => Ok(()),
        }
    }

    fn ensure_playable(&self) -> Result<(), MatchError> {
        self.ensure_not_terminal()?;
        if self.state.paused {
            return Err(MatchError::Paused);
        }
        Ok(())
    }

    fn bowler_for_delivery(&mut self) -> Result<String, MatchError> {
        let inn = self.current_innings().ok_or(MatchError::MatchComplete)?;
        if let Some(b) = &inn.bowler {
            return Ok(b.clone());
        }
        let next = self.next_bowler().ok_or_else(|| {
            MatchError::Config(crate::error::ConfigError::new(
                "no bowler is eligible for the next over",
            ))
        })?;
        if let Some(inn) = self.state.current_innings_mut() {
            inn.bowler = Some(next.clone());
        }
        Ok(next)
    }

    /// Cycle through the bowling order from the last bowler, skipping anyone
    /// at the cap or who bowled the previous over. Fall back to the rest of
    /// the XI by rating.
    fn next_bowler(&self) -> Option<String> {
        let inn = self.current_innings()?;
        let lineup = &self.state.lineups[1 - inn.batting_side];
        let eligible = |name: &str| {
            inn.overs_bowled_by(name) < inn.bowler_cap
                && inn.previous_bowler.as_deref() != Some(name)
        };

        let order = &lineup.bowling_order;
        let start = inn
            .previous_bowler
            .as_ref()
            .and_then(|prev| order.iter().position(|n| n == prev))
            .map(|i| i + 1)
            .unwrap_or(0);
        (0..order.len())
            .map(|k| &order[(start + k) % order.len()])
            .find(|n| eligible(n))
            .cloned()
            .or_else(|| {
                lineup
                    .bowlers_by_rating()
                    .into_iter()
                    .map(|p| &p.name)
                    .find(|n| eligible(n))
                    .cloned()
            })
    }

    /// Resolve one delivery. Draw order: outcome, then for wickets the
    /// dismissal kind, fielder and dropped-catch roll.
    fn deliver(&mut self, bowler: &str) -> Result<BallEvent, MatchError> {
        let state = &self.state;
        let inn = state.current_innings().ok_or(MatchError::MatchComplete)?;
        let batting = &state.lineups[inn.batting_side];
        let fielding = &state.lineups[1 - inn.batting_side];
        let striker = batting
            .player(&inn.striker)
            .ok_or_else(|| MatchError::InvalidLineup(format!("{} is not batting", inn.striker)))?;
        let bowler_player = fielding
            .player(bowler)
            .ok_or_else(|| MatchError::InvalidLineup(format!("{bowler} is not fielding")))?;

        let ctx = DeliveryContext {
            format: state.config.format,
            batting: striker.effective_batting(),
            approach: striker.batting_approach,
            bowling: bowler_player.effective_bowling(),
            bowling_style: bowler_player.bowling_style,
            pitch: state.conditions.pitch,
            weather: state.conditions.weather,
            raining: state.conditions.raining,
        };
        let dist = probability::outcome_distribution(&ctx);
        let free_hit = state.free_hit_pending;

        let sampled = dist.sample(self.rng.gen());
        let mut result = probability::adjust_runs(
            sampled,
            probability::run_adjustment(ctx.batting, ctx.bowling),
        );

        let mut wicket = None;
        if result == BallResult::Wicket {
            if free_hit {
                result = BallResult::Dot;
            } else {
                let kind = probability::sample_wicket_kind(ctx.bowling_style, self.rng.gen());
                let fielder = match kind {
                    WicketKind::Stumped => fielding.keeper().map(|p| p.name.clone()),
                    WicketKind::Caught | WicketKind::RunOut if !fielding.players.is_empty() => {
                        let idx = self.rng.gen_range(0..fielding.players.len());
                        Some(fielding.players[idx].name.clone())
                    }
                    _ => None,
                };
                let dropped = kind == WicketKind::Caught && {
                    let skill = fielder
                        .as_deref()
                        .and_then(|n| fielding.player(n))
                        .map(|p| p.skills.fielding as f64)
                        .unwrap_or(50.0);
                    self.rng.gen::<f64>() < probability::dropped_catch_probability(skill)
                };
                if dropped {
                    debug!(batter = %inn.striker, fielder = ?fielder, "catch dropped");
                    result = BallResult::Dot;
                } else {
                    wicket = Some(Dismissal {
                        kind,
                        batter: inn.striker.clone(),
                        bowler: bowler.to_string(),
                        fielder,
                    });
                }
            }
        }

        Ok(BallEvent {
            innings: inn.number,
            over: inn.over,
            ball: inn.over_deliveries + 1,
            legal_ball: inn.over_legal_balls + u32::from(result.is_legal()),
            striker: inn.striker.clone(),
            non_striker: inn.non_striker.clone(),
            bowler: bowler.to_string(),
            result,
            runs: result.bat_runs(),
            extras: result.extra_runs(),
            wicket,
            free_hit,
        })
    }

    /// Close the current innings and move the state machine on.
    fn finish_innings(&mut self) {
        let Some(inn) = self.state.current_innings_mut() else {
            return;
        };
        let partial = inn.close_over();
        inn.complete = true;
        let summary = inn.summary();

        if let Some(over) = partial {
            self.events.push(MatchEvent::Over(over));
        }
        info!(
            innings = summary.number,
            team = %summary.batting_team,
            runs = summary.runs,
            wickets = summary.wickets,
            overs = %summary.overs_display(),
            "innings closed"
        );
        self.events.push(MatchEvent::InningsEnd(summary));

        match self.state.phase {
            MatchPhase::NotStarted | MatchPhase::FirstInnings => self.start_second_innings(),
            MatchPhase::SecondInnings => self.decide_regulation(),
            MatchPhase::SuperOver { round } => {
                let super_innings = self.state.innings.iter().filter(|i| i.super_over).count();
                if super_innings % 2 == 1 {
                    self.start_super_over_chase();
                } else {
                    self.decide_super_over(round);
                }
            }
            MatchPhase::Complete | MatchPhase::Cancelled => {}
        }
    }

    fn start_second_innings(&mut self) {
        let target = self.state.innings[0].runs + 1;
        let lineups = &self.state.lineups;
        let second = Innings::new(InningsSetup {
            number: 2,
            batting_side: 1,
            batting_team: lineups[1].team.clone(),
            bowling_team: lineups[0].team.clone(),
            batting_order: lineups[1].batting_order.clone(),
            opening_bowler: lineups[0].bowling_order.first().cloned(),
            max_overs: self.state.config.format.overs_per_innings(),
            bowler_cap: self.state.config.bowler_cap(),
            target: Some(target),
            super_over: false,
        });
        self.state.innings.push(second);
        self.state.phase = MatchPhase::SecondInnings;
        self.state.free_hit_pending = false;
    }

    fn decide_regulation(&mut self) {
        let first = self.state.innings[0].summary();
        let second = self.state.innings[1].summary();

        if second.runs > first.runs {
            let margin = self.state.innings[1].max_wickets - second.wickets;
            self.complete(Some(second.batting_team.clone()), ResultMargin::Wickets(margin), false);
        } else if first.runs > second.runs {
            let margin = first.runs - second.runs;
            self.complete(Some(first.batting_team.clone()), ResultMargin::Runs(margin), false);
        } else if self.state.config.super_over {
            info!(runs = first.runs, "scores level, going to a super over");
            self.start_super_over(1);
        } else {
            self.complete(None, ResultMargin::Tie, true);
        }
    }

    /// The side that batted second in the previous pairing bats first.
    fn start_super_over(&mut self, round: u32) {
        let batting_side = self
            .state
            .innings
            .last()
            .map(|i| i.batting_side)
            .unwrap_or(1);
        self.state.phase = MatchPhase::SuperOver { round };
        self.push_super_over_innings(batting_side, None);
    }

    fn start_super_over_chase(&mut self) {
        let Some(first) = self.state.innings.last() else {
            return;
        };
        let batting_side = 1 - first.batting_side;
        let target = first.runs + 1;
        self.push_super_over_innings(batting_side, Some(target));
    }

    fn push_super_over_innings(&mut self, batting_side: usize, target: Option<u32>) {
        let fielding_side = 1 - batting_side;
        let lineups = &self.state.lineups;
        let batting_order: Vec<String> = lineups[batting_side]
            .batting_order
            .iter()
            .take(SUPER_OVER_BATTERS)
            .cloned()
            .collect();

        // Whoever bowled this side's previous super over sits this one out.
        let previous: Vec<String> = self
            .state
            .innings
            .iter()
            .rev()
            .find(|i| i.super_over && i.batting_side == batting_side)
            .map(|i| i.bowling_card.iter().map(|c| c.name.clone()).collect())
            .unwrap_or_default();
        let ranked = lineups[fielding_side].bowlers_by_rating();
        let bowler = ranked
            .iter()
            .find(|p| p.can_bowl() && !previous.contains(&p.name))
            .or_else(|| ranked.iter().find(|p| !previous.contains(&p.name)))
            .map(|p| p.name.clone());

        let innings = Innings::new(InningsSetup {
            number: self.state.innings.len() as u32 + 1,
            batting_side,
            batting_team: lineups[batting_side].team.clone(),
            bowling_team: lineups[fielding_side].team.clone(),
            batting_order,
            opening_bowler: bowler,
            max_overs: 1,
            bowler_cap: 1,
            target,
            super_over: true,
        });
        self.state.innings.push(innings);
        self.state.free_hit_pending = false;
    }

    fn decide_super_over(&mut self, round: u32) {
        let n = self.state.innings.len();
        let first = self.state.innings[n - 2].summary();
        let second = self.state.innings[n - 1].summary();

        if first.runs != second.runs {
            let winner = if second.runs > first.runs {
                second.batting_team
            } else {
                first.batting_team
            };
            self.complete(Some(winner), ResultMargin::SuperOver, true);
        } else if round < self.state.config.max_super_overs {
            info!(round, "super over tied, playing another");
            self.start_super_over(round + 1);
        } else {
            warn!(round, "super over limit reached, match tied");
            self.complete(None, ResultMargin::Tie, true);
        }
    }

    fn complete(&mut self, winner: Option<String>, margin: ResultMargin, tied_in_regulation: bool) {
        let innings = self
            .state
            .regulation_innings()
            .map(Innings::summary)
            .collect();
        let super_innings: Vec<&Innings> =
            self.state.innings.iter().filter(|i| i.super_over).collect();
        let super_overs = super_innings
            .chunks(2)
            .enumerate()
            .filter_map(|(i, pair)| match pair {
                [first, second] => Some(SuperOverRound {
                    round: i as u32 + 1,
                    first: first.summary(),
                    second: second.summary(),
                }),
                _ => None,
            })
            .collect();

        let result = MatchResult {
            winner,
            margin,
            innings,
            super_overs,
            tied_in_regulation,
        };
        info!(venue = %self.state.venue, result = %result, "match complete");
        self.state.phase = MatchPhase::Complete;
        self.state.result = Some(result.clone());
        self.events.push(MatchEvent::MatchEnd(result));
    }
}
