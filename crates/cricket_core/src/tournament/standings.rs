//! Points table and net run rate.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::config::TieBreaker;
use super::fixtures::{FixtureOutcome, TeamScore};

pub const POINTS_FOR_WIN: u32 = 2;
pub const POINTS_FOR_TIE: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub team: String,
    pub played: u32,
    pub won: u32,
    pub lost: u32,
    pub tied: u32,
    pub points: u32,
    pub runs_for: u32,
    pub balls_faced: u32,
    pub runs_against: u32,
    pub balls_bowled: u32,
    /// Wins over each opponent, for head-to-head.
    pub wins_against: BTreeMap<String, u32>,
}

fn runs_per_over(runs: u32, balls: u32) -> f64 {
    if balls == 0 {
        0.0
    } else {
        runs as f64 / (balls as f64 / 6.0)
    }
}

impl Standing {
    pub fn new(team: impl Into<String>) -> Self {
        Self {
            team: team.into(),
            played: 0,
            won: 0,
            lost: 0,
            tied: 0,
            points: 0,
            runs_for: 0,
            balls_faced: 0,
            runs_against: 0,
            balls_bowled: 0,
            wins_against: BTreeMap::new(),
        }
    }

    /// Runs per over scored minus runs per over conceded.
    pub fn net_run_rate(&self) -> f64 {
        runs_per_over(self.runs_for, self.balls_faced)
            - runs_per_over(self.runs_against, self.balls_bowled)
    }

    /// Fold one completed match into the row.
    pub fn record(
        &mut self,
        batted: &TeamScore,
        bowled: &TeamScore,
        quota: u32,
        opponent: &str,
        winner: Option<&str>,
    ) {
        self.played += 1;
        self.runs_for += batted.runs;
        self.balls_faced += batted.balls_for_rate(quota);
        self.runs_against += bowled.runs;
        self.balls_bowled += bowled.balls_for_rate(quota);

        match winner {
            None => {
                self.tied += 1;
                self.points += POINTS_FOR_TIE;
            }
            Some(w) if w == self.team => {
                self.won += 1;
                self.points += POINTS_FOR_WIN;
                *self.wins_against.entry(opponent.to_string()).or_insert(0) += 1;
            }
            Some(_) => self.lost += 1,
        }
    }
}

/// Apply a fixture outcome to both participants' rows, if present.
pub fn record_outcome(rows: &mut [Standing], team1: &str, team2: &str, outcome: &FixtureOutcome) {
    let winner = outcome.winner.as_deref();
    for row in rows.iter_mut() {
        if row.team == team1 {
            row.record(&outcome.team1, &outcome.team2, outcome.quota, team2, winner);
        } else if row.team == team2 {
            row.record(&outcome.team2, &outcome.team1, outcome.quota, team1, winner);
        }
    }
}

/// Order rows by points, then net run rate, then each tie-breaker in turn.
/// The sort is stable, so rows still level keep their current order.
pub fn sort_standings(rows: &mut [Standing], tie_breakers: &[TieBreaker]) {
    // Head-to-head only counts wins over sides level on points and NRR,
    // which keeps the comparison a total order.
    let level_wins: HashMap<String, u32> = rows
        .iter()
        .map(|row| {
            let wins = rows
                .iter()
                .filter(|other| other.team != row.team && primary(row, other) == Ordering::Equal)
                .map(|other| row.wins_against.get(&other.team).copied().unwrap_or(0))
                .sum();
            (row.team.clone(), wins)
        })
        .collect();

    rows.sort_by(|a, b| {
        tie_breakers
            .iter()
            .fold(primary(a, b), |ord, breaker| {
                ord.then_with(|| match breaker {
                    TieBreaker::Wins => b.won.cmp(&a.won),
                    TieBreaker::HeadToHead => level_wins[&b.team].cmp(&level_wins[&a.team]),
                    TieBreaker::RunsFor => b.runs_for.cmp(&a.runs_for),
                })
            })
    });
}

fn primary(a: &Standing, b: &Standing) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.net_run_rate().total_cmp(&a.net_run_rate()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ResultMargin;

    fn score(runs: u32, balls: u32, all_out: bool) -> TeamScore {
        TeamScore {
            runs,
            wickets: if all_out { 10 } else { 3 },
            legal_balls: balls,
            all_out,
        }
    }

    fn outcome(t1: TeamScore, t2: TeamScore, winner: Option<&str>) -> FixtureOutcome {
        FixtureOutcome {
            team1: t1,
            team2: t2,
            quota: 120,
            winner: winner.map(str::to_string),
            margin: ResultMargin::Tie,
        }
    }

    #[test]
    fn net_run_rate_uses_whole_overs() {
        let mut rows = vec![Standing::new("A"), Standing::new("B")];
        record_outcome(
            &mut rows,
            "A",
            "B",
            &outcome(score(180, 120, false), score(160, 120, false), Some("A")),
        );
        assert_eq!(rows[0].points, 2);
        assert_eq!(rows[1].points, 0);
        assert!((rows[0].net_run_rate() - 1.0).abs() < 1e-12);
        assert!((rows[1].net_run_rate() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn bowled_out_side_is_charged_the_full_quota() {
        let mut rows = vec![Standing::new("A"), Standing::new("B")];
        record_outcome(
            &mut rows,
            "A",
            "B",
            &outcome(score(100, 90, true), score(101, 60, false), Some("B")),
        );
        assert_eq!(rows[0].balls_faced, 120);
        assert_eq!(rows[1].balls_bowled, 120);
        assert_eq!(rows[1].balls_faced, 60);
        assert!((rows[0].net_run_rate() - (5.0 - 10.1)).abs() < 1e-12);
    }

    #[test]
    fn ties_share_points() {
        let mut rows = vec![Standing::new("A"), Standing::new("B")];
        record_outcome(
            &mut rows,
            "A",
            "B",
            &outcome(score(150, 120, false), score(150, 120, false), None),
        );
        assert!(rows.iter().all(|r| r.points == 1 && r.tied == 1));
    }

    #[test]
    fn ordering_points_then_nrr_then_tie_breakers() {
        let mut a = Standing::new("A");
        a.points = 4;
        a.runs_for = 100;
        a.balls_faced = 60;
        let mut b = Standing::new("B");
        b.points = 4;
        b.runs_for = 120;
        b.balls_faced = 60;
        let mut c = Standing::new("C");
        c.points = 6;
        let mut d = Standing::new("D");
        d.points = 4;
        d.runs_for = 100;
        d.balls_faced = 60;
        d.wins_against.insert("A".into(), 1);

        let mut rows = vec![a, b, c, d];
        sort_standings(&mut rows, &[TieBreaker::HeadToHead]);
        let order: Vec<_> = rows.iter().map(|r| r.team.as_str()).collect();
        assert_eq!(order, vec!["C", "B", "D", "A"]);

        let mut rows_no_breakers = rows.clone();
        rows_no_breakers.swap(2, 3);
        sort_standings(&mut rows_no_breakers, &[]);
        let order: Vec<_> = rows_no_breakers.iter().map(|r| r.team.as_str()).collect();
        assert_eq!(order, vec!["C", "B", "A", "D"]);
    }
}
