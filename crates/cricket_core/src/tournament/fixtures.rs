//! Fixture generation: circle-method round robins, groups and seeded
//! single-elimination brackets.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::engine::{MatchResult, ResultMargin};
use crate::models::MatchFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum Stage {
    League,
    Groups,
    Knockout { round: u32 },
    Final,
}

impl Stage {
    pub fn is_knockout(self) -> bool {
        matches!(self, Stage::Knockout { .. } | Stage::Final)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::League => write!(f, "league"),
            Stage::Groups => write!(f, "group stage"),
            Stage::Knockout { round } => write!(f, "knockout round {round}"),
            Stage::Final => write!(f, "final"),
        }
    }
}

/// One side's regulation batting in a fixture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamScore {
    pub runs: u32,
    pub wickets: u32,
    pub legal_balls: u32,
    pub all_out: bool,
}

impl TeamScore {
    /// Balls charged for net run rate. A side bowled out is charged its
    /// full quota.
    pub fn balls_for_rate(&self, quota: u32) -> u32 {
        if self.all_out {
            quota
        } else {
            self.legal_balls
        }
    }
}

impl fmt::Display for TeamScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.all_out {
            write!(f, "{}", self.runs)
        } else {
            write!(f, "{}/{}", self.runs, self.wickets)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureOutcome {
    pub team1: TeamScore,
    pub team2: TeamScore,
    /// Legal balls in one innings of the fixture's format.
    pub quota: u32,
    pub winner: Option<String>,
    pub margin: ResultMargin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: usize,
    pub stage: Stage,
    /// Group index for league and group fixtures.
    pub group: Option<usize>,
    pub team1: String,
    pub team2: String,
    pub venue: String,
    pub date: Option<NaiveDate>,
    pub format: MatchFormat,
    pub outcome: Option<FixtureOutcome>,
}

impl Fixture {
    pub fn is_completed(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn involves(&self, team: &str) -> bool {
        self.team1 == team || self.team2 == team
    }

    pub fn winner(&self) -> Option<&str> {
        self.outcome.as_ref().and_then(|o| o.winner.as_deref())
    }

    /// Fold a match result into per-side regulation scores.
    /// Super overs decide the winner but never count towards the scores.
    pub fn outcome_from(&self, result: &MatchResult) -> FixtureOutcome {
        let mut team1 = TeamScore::default();
        let mut team2 = TeamScore::default();
        for innings in &result.innings {
            let score = if innings.batting_team == self.team1 {
                &mut team1
            } else {
                &mut team2
            };
            score.runs += innings.runs;
            score.wickets += innings.wickets;
            score.legal_balls += innings.legal_balls;
            score.all_out |= innings.all_out;
        }
        FixtureOutcome {
            team1,
            team2,
            quota: self.format.legal_balls_per_innings(),
            winner: result.winner.clone(),
            margin: result.margin,
        }
    }
}

/// Rounds of a single round robin as index pairs (home, away).
///
/// Circle method: index 0 stays fixed while the rest rotate one place per
/// round. An odd field gets a phantom entrant whose opponent sits out.
pub fn round_robin_rounds(team_count: usize) -> Vec<Vec<(usize, usize)>> {
    if team_count < 2 {
        return Vec::new();
    }
    let slots = team_count + team_count % 2;
    let mut ring: Vec<usize> = (0..slots).collect();
    let mut rounds = Vec::with_capacity(slots - 1);

    for round in 0..slots - 1 {
        let mut pairs = Vec::with_capacity(slots / 2);
        for i in 0..slots / 2 {
            let (a, b) = (ring[i], ring[slots - 1 - i]);
            if a >= team_count || b >= team_count {
                continue;
            }
            // Alternate the fixed slot's home games.
            if i == 0 && round % 2 == 1 {
                pairs.push((b, a));
            } else {
                pairs.push((a, b));
            }
        }
        rounds.push(pairs);
        ring[1..].rotate_right(1);
    }
    rounds
}

/// All league pairings in play order. The second leg of a double round
/// robin repeats the first with home and away reversed.
pub fn round_robin(teams: &[String], double: bool) -> Vec<(String, String)> {
    let rounds = round_robin_rounds(teams.len());
    let mut pairs: Vec<(String, String)> = rounds
        .iter()
        .flatten()
        .map(|&(a, b)| (teams[a].clone(), teams[b].clone()))
        .collect();
    if double {
        let reverse: Vec<_> = pairs.iter().map(|(a, b)| (b.clone(), a.clone())).collect();
        pairs.extend(reverse);
    }
    pairs
}

/// Deal teams into groups in insertion order: team `i` joins group `i % groups`.
pub fn distribute_groups(teams: &[String], groups: usize) -> Vec<Vec<String>> {
    let mut out = vec![Vec::new(); groups.max(1)];
    let count = out.len();
    for (i, team) in teams.iter().enumerate() {
        out[i % count].push(team.clone());
    }
    out
}

/// Seed order for qualifiers: every group winner, then every runner-up, and
/// so on. `qualifiers[g]` is group `g`'s qualifiers in finishing order.
pub fn cross_seed(qualifiers: &[Vec<String>]) -> Vec<String> {
    let depth = qualifiers.iter().map(Vec::len).max().unwrap_or(0);
    let mut seeds = Vec::new();
    for rank in 0..depth {
        for group in qualifiers {
            if let Some(team) = group.get(rank) {
                seeds.push(team.clone());
            }
        }
    }
    seeds
}

/// A position in a knockout round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum BracketSlot {
    /// Advances without playing.
    Bye(String),
    /// Decided by the fixture with this id.
    Match(usize),
}

/// One slot of a freshly drawn knockout round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pairing {
    Bye(String),
    Tie(String, String),
}

/// Pair entrants (best seed first) for one knockout round.
///
/// The bracket is padded to the next power of two; seed `i` meets seed
/// `size - 1 - i` and the missing opponents become byes for the top seeds.
/// Returns one entry per slot, in bracket order.
pub fn knockout_pairings(entrants: &[String]) -> Vec<Pairing> {
    let size = entrants.len().next_power_of_two();
    (0..size / 2)
        .filter_map(|i| {
            let high = entrants.get(i)?.clone();
            Some(match entrants.get(size - 1 - i) {
                Some(low) => Pairing::Tie(high, low.clone()),
                None => Pairing::Bye(high),
            })
        })
        .collect()
}
