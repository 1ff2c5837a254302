//! Match state machine.
//!
//! `NotStarted -> FirstInnings -> SecondInnings -> [SuperOver]* -> Complete`,
//! with `Cancelled` reachable from any non-terminal phase. Pausing is an
//! orthogonal flag: the phase is kept and every transition is refused until
//! the match resumes.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ball::BallEvent;
use super::innings::{Innings, InningsSummary, OverSummary};
use crate::error::ConfigError;
use crate::models::{MatchFormat, Pitch, Player, Role, Team, Weather};
use crate::rng::SimRng;

// ============================================================================
// Configuration
// ============================================================================

fn default_max_super_overs() -> u32 {
    10
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub format: MatchFormat,
    /// Break regulation ties with super overs.
    pub super_over: bool,
    /// Per-bowler quota override. Defaults to a fifth of the innings.
    pub bowler_over_cap: Option<u32>,
    /// Upper bound on repeated super overs; exhausting it records a tie.
    #[serde(default = "default_max_super_overs")]
    pub max_super_overs: u32,
    /// A no-ball makes the next legal delivery a free hit.
    pub free_hit: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            format: MatchFormat::T20,
            super_over: true,
            bowler_over_cap: None,
            max_super_overs: default_max_super_overs(),
            free_hit: true,
        }
    }
}

impl MatchConfig {
    pub fn new(format: MatchFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    pub fn bowler_cap(&self) -> u32 {
        self.bowler_over_cap
            .unwrap_or_else(|| self.format.bowler_over_cap())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.format.validate()?;
        let cap = self.bowler_cap();
        if cap == 0 {
            return Err(ConfigError::new("bowler over cap must be at least one"));
        }
        // Ten bowlers at the cap plus one more over is the most a rotation
        // without consecutive overs can always fill.
        let overs = self.format.overs_per_innings();
        if cap * 10 + 1 < overs {
            return Err(ConfigError::new(format!(
                "bowler cap {cap} cannot cover {overs} overs"
            )));
        }
        if self.super_over && self.max_super_overs == 0 {
            return Err(ConfigError::new("max_super_overs must be at least one"));
        }
        Ok(())
    }
}

// ============================================================================
// Phases
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum MatchPhase {
    NotStarted,
    FirstInnings,
    SecondInnings,
    SuperOver { round: u32 },
    Complete,
    Cancelled,
}

impl MatchPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, MatchPhase::Complete | MatchPhase::Cancelled)
    }

    pub fn is_super_over(self) -> bool {
        matches!(self, MatchPhase::SuperOver { .. })
    }
}

impl fmt::Display for MatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchPhase::NotStarted => write!(f, "not started"),
            MatchPhase::FirstInnings => write!(f, "first innings"),
            MatchPhase::SecondInnings => write!(f, "second innings"),
            MatchPhase::SuperOver { round } => write!(f, "super over {round}"),
            MatchPhase::Complete => write!(f, "complete"),
            MatchPhase::Cancelled => write!(f, "cancelled"),
        }
    }
}

// ============================================================================
// Participants and conditions
// ============================================================================

/// Match-day copy of a side: the XI and its orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lineup {
    pub team: String,
    pub players: Vec<Player>,
    pub batting_order: Vec<String>,
    pub bowling_order: Vec<String>,
    pub captain: Option<String>,
}

impl Lineup {
    pub fn from_team(team: &Team) -> Self {
        let players = team
            .playing_xi
            .iter()
            .filter_map(|name| team.player(name).cloned())
            .collect();
        Self {
            team: team.name.clone(),
            players,
            batting_order: team.batting_order.clone(),
            bowling_order: team.bowling_order.clone(),
            captain: team.captain.clone(),
        }
    }

    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.player(name).is_some()
    }

    /// Designated keeper, or the best fielder when the XI has none.
    pub fn keeper(&self) -> Option<&Player> {
        self.players
            .iter()
            .find(|p| p.role == Role::WicketKeeper)
            .or_else(|| self.players.iter().max_by_key(|p| p.skills.fielding))
    }

    /// XI sorted by bowling rating, strongest first. Name breaks ties.
    pub fn bowlers_by_rating(&self) -> Vec<&Player> {
        let mut all: Vec<&Player> = self.players.iter().collect();
        all.sort_by(|a, b| {
            b.effective_bowling()
                .total_cmp(&a.effective_bowling())
                .then_with(|| a.name.cmp(&b.name))
        });
        all
    }
}

/// Conditions fixed at initialisation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Conditions {
    pub pitch: Pitch,
    pub weather: Weather,
    /// Rolled once against `weather.rain_probability`.
    pub raining: bool,
}

// ============================================================================
// Result
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ResultMargin {
    Runs(u32),
    Wickets(u32),
    SuperOver,
    Tie,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuperOverRound {
    pub round: u32,
    pub first: InningsSummary,
    pub second: InningsSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub winner: Option<String>,
    pub margin: ResultMargin,
    /// Regulation innings, in batting order.
    pub innings: Vec<InningsSummary>,
    pub super_overs: Vec<SuperOverRound>,
    pub tied_in_regulation: bool,
}

impl MatchResult {
    pub fn is_tie(&self) -> bool {
        self.winner.is_none()
    }

    pub fn decided_by_super_over(&self) -> bool {
        self.margin == ResultMargin::SuperOver
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.winner, self.margin) {
            (Some(w), ResultMargin::Runs(r)) => write!(f, "{w} won by {r} runs"),
            (Some(w), ResultMargin::Wickets(n)) => write!(f, "{w} won by {n} wickets"),
            (Some(w), _) => write!(f, "{w} won the super over"),
            (None, _) => write!(f, "match tied"),
        }
    }
}

// ============================================================================
// Events
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchEvent {
    Ball(BallEvent),
    Over(OverSummary),
    InningsEnd(InningsSummary),
    MatchEnd(MatchResult),
}

// ============================================================================
// State
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub config: MatchConfig,
    pub venue: String,
    pub conditions: Conditions,
    /// Side 0 bats first.
    pub lineups: [Lineup; 2],
    pub phase: MatchPhase,
    pub paused: bool,
    /// Every innings so far, super overs included. The last one is current.
    pub innings: Vec<Innings>,
    pub ball_history: Vec<BallEvent>,
    pub result: Option<MatchResult>,
    pub free_hit_pending: bool,
}

impl MatchState {
    pub fn current_innings(&self) -> Option<&Innings> {
        self.innings.last()
    }

    pub fn current_innings_mut(&mut self) -> Option<&mut Innings> {
        self.innings.last_mut()
    }

    pub fn lineup_of(&self, team: &str) -> Option<(usize, &Lineup)> {
        self.lineups
            .iter()
            .enumerate()
            .find(|(_, l)| l.team == team)
    }

    pub fn regulation_innings(&self) -> impl Iterator<Item = &Innings> {
        self.innings.iter().filter(|i| !i.super_over)
    }
}

/// Serialisable engine state, generator included. Undrained events are not
/// part of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub state: MatchState,
    pub rng: SimRng,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid_t20() {
        let cfg = MatchConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.bowler_cap(), 4);
    }

    #[test]
    fn cap_that_cannot_cover_the_innings_is_rejected() {
        let cfg = MatchConfig {
            format: MatchFormat::Odi,
            bowler_over_cap: Some(4),
            ..MatchConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = MatchConfig {
            bowler_over_cap: Some(0),
            ..MatchConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn config_loads_from_partial_json() {
        let cfg: MatchConfig = serde_json::from_str(r#"{"format":"Odi"}"#).unwrap();
        assert_eq!(cfg.format, MatchFormat::Odi);
        assert!(cfg.super_over);
        assert_eq!(cfg.max_super_overs, 10);
    }

    #[test]
    fn terminal_phases() {
        assert!(MatchPhase::Complete.is_terminal());
        assert!(MatchPhase::Cancelled.is_terminal());
        assert!(!MatchPhase::SuperOver { round: 1 }.is_terminal());
        assert_eq!(MatchPhase::SuperOver { round: 2 }.to_string(), "super over 2");
    }
}
