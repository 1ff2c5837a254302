//! Innings aggregate: score, crease positions, scorecards and over log.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ball::{BallEvent, BallResult, Dismissal};

pub const BALLS_PER_OVER: u32 = 6;
pub const MAX_WICKETS: u32 = 10;
pub const SUPER_OVER_WICKETS: u32 = 2;
pub const SUPER_OVER_BATTERS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatterCard {
    pub name: String,
    pub runs: u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    pub dismissal: Option<Dismissal>,
}

impl BatterCard {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            runs: 0,
            balls: 0,
            fours: 0,
            sixes: 0,
            dismissal: None,
        }
    }

    pub fn strike_rate(&self) -> f64 {
        if self.balls == 0 {
            return 0.0;
        }
        self.runs as f64 * 100.0 / self.balls as f64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BowlerCard {
    pub name: String,
    /// Legal deliveries.
    pub balls: u32,
    pub runs: u32,
    pub wickets: u32,
    pub maidens: u32,
}

impl BowlerCard {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            balls: 0,
            runs: 0,
            wickets: 0,
            maidens: 0,
        }
    }

    pub fn economy(&self) -> f64 {
        if self.balls == 0 {
            return 0.0;
        }
        self.runs as f64 * BALLS_PER_OVER as f64 / self.balls as f64
    }
}

/// Emitted at every over boundary, and for the partial over that closes an innings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverSummary {
    pub innings: u32,
    pub over: u32,
    pub bowler: String,
    pub runs: u32,
    pub wickets: u32,
    pub legal_balls: u32,
    pub maiden: bool,
    /// Innings score after the over.
    pub score: u32,
    pub total_wickets: u32,
}

/// Aggregate handed to standings and result reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InningsSummary {
    pub number: u32,
    pub batting_team: String,
    pub bowling_team: String,
    pub runs: u32,
    pub wickets: u32,
    pub legal_balls: u32,
    pub extras: u32,
    pub max_overs: u32,
    pub all_out: bool,
    pub target: Option<u32>,
    pub super_over: bool,
}

impl InningsSummary {
    pub fn overs_display(&self) -> String {
        format_overs(self.legal_balls)
    }
}

impl std::fmt::Display for InningsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}/{} ({} ov)",
            self.batting_team,
            self.runs,
            self.wickets,
            self.overs_display()
        )
    }
}

/// Cricket notation: completed overs, then balls of the current over.
pub fn format_overs(legal_balls: u32) -> String {
    format!("{}.{}", legal_balls / BALLS_PER_OVER, legal_balls % BALLS_PER_OVER)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Innings {
    pub number: u32,
    /// Index of the batting side in the match lineups.
    pub batting_side: usize,
    pub batting_team: String,
    pub bowling_team: String,
    pub max_overs: u32,
    pub max_wickets: u32,
    pub bowler_cap: u32,
    pub target: Option<u32>,
    pub super_over: bool,

    pub runs: u32,
    pub wickets: u32,
    pub extras: u32,
    pub legal_balls: u32,

    pub batting_order: Vec<String>,
    pub striker: String,
    pub non_striker: String,
    /// Index into `batting_order` of the next batter in.
    pub next_batter: usize,

    /// Bowler of the current over; `None` between overs.
    pub bowler: Option<String>,
    pub previous_bowler: Option<String>,
    pub overs_by_bowler: BTreeMap<String, u32>,

    pub over: u32,
    pub over_deliveries: u32,
    pub over_legal_balls: u32,
    pub over_runs: u32,
    pub over_wickets: u32,
    pub over_bowler_runs: u32,

    pub batting_card: Vec<BatterCard>,
    pub bowling_card: Vec<BowlerCard>,
    pub overs: Vec<OverSummary>,
    pub complete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InningsSetup {
    pub number: u32,
    pub batting_side: usize,
    pub batting_team: String,
    pub bowling_team: String,
    pub batting_order: Vec<String>,
    pub opening_bowler: Option<String>,
    pub max_overs: u32,
    pub bowler_cap: u32,
    pub target: Option<u32>,
    pub super_over: bool,
}

impl Innings {
    /// Open an innings. The order must hold at least two batters.
    pub fn new(setup: InningsSetup) -> Self {
        let order = setup.batting_order;
        let striker = order.first().cloned().unwrap_or_default();
        let non_striker = order.get(1).cloned().unwrap_or_default();
        let cap = if setup.super_over { SUPER_OVER_WICKETS } else { MAX_WICKETS };
        let max_wickets = cap.min(order.len().saturating_sub(1) as u32);
        let batting_card = order.iter().take(2).map(|n| BatterCard::new(n)).collect();

        Self {
            number: setup.number,
            batting_side: setup.batting_side,
            batting_team: setup.batting_team,
            bowling_team: setup.bowling_team,
            max_overs: setup.max_overs,
            max_wickets,
            bowler_cap: setup.bowler_cap,
            target: setup.target,
            super_over: setup.super_over,
            runs: 0,
            wickets: 0,
            extras: 0,
            legal_balls: 0,
            next_batter: 2.min(order.len()),
            batting_order: order,
            striker,
            non_striker,
            bowler: setup.opening_bowler,
            previous_bowler: None,
            overs_by_bowler: BTreeMap::new(),
            over: 0,
            over_deliveries: 0,
            over_legal_balls: 0,
            over_runs: 0,
            over_wickets: 0,
            over_bowler_runs: 0,
            batting_card,
            bowling_card: Vec::new(),
            overs: Vec::new(),
            complete: false,
        }
    }

    pub fn has_started(&self) -> bool {
        self.legal_balls > 0 || self.over_deliveries > 0 || !self.overs.is_empty()
    }

    pub fn is_over_start(&self) -> bool {
        self.over_deliveries == 0
    }

    pub fn overs_bowled_by(&self, bowler: &str) -> u32 {
        self.overs_by_bowler.get(bowler).copied().unwrap_or(0)
    }

    /// Replace the batting order before the first delivery.
    pub fn reset_order(&mut self, order: Vec<String>) {
        self.striker = order.first().cloned().unwrap_or_default();
        self.non_striker = order.get(1).cloned().unwrap_or_default();
        self.batting_card = order.iter().take(2).map(|n| BatterCard::new(n)).collect();
        self.next_batter = 2.min(order.len());
        self.batting_order = order;
    }

    pub fn target_reached(&self) -> bool {
        self.target.is_some_and(|t| self.runs >= t)
    }

    pub fn all_out(&self) -> bool {
        self.wickets >= self.max_wickets
    }

    pub fn quota_used(&self) -> bool {
        self.legal_balls >= self.max_overs * BALLS_PER_OVER
    }

    /// Any terminating condition holds.
    pub fn should_close(&self) -> bool {
        self.all_out() || self.quota_used() || self.target_reached()
    }

    /// Fold one delivery into the aggregate and move the batters.
    pub fn record(&mut self, event: &BallEvent) {
        let total = event.total_runs();
        self.runs += total;
        self.extras += event.extras;
        self.over_runs += total;
        self.over_deliveries += 1;
        if event.result.charged_to_bowler() || event.result.is_scoring() {
            self.over_bowler_runs += total;
        }

        let legal = event.is_legal();
        if legal {
            self.legal_balls += 1;
            self.over_legal_balls += 1;
        }

        if let Some(card) = self.batter_card_mut(&event.striker) {
            if legal {
                card.balls += 1;
            }
            card.runs += event.runs;
            match event.runs {
                4 => card.fours += 1,
                6 => card.sixes += 1,
                _ => {}
            }
        }

        let bowler_card = self.bowler_card_mut(&event.bowler);
        if legal {
            bowler_card.balls += 1;
        }
        if event.result.charged_to_bowler() || event.result.is_scoring() {
            bowler_card.runs += total;
        }
        if let Some(d) = &event.wicket {
            if d.kind.credited_to_bowler() {
                bowler_card.wickets += 1;
            }
        }

        if let Some(dismissal) = &event.wicket {
            self.wickets += 1;
            self.over_wickets += 1;
            if let Some(card) = self.batter_card_mut(&dismissal.batter) {
                card.dismissal = Some(dismissal.clone());
            }
            if !self.all_out() {
                if let Some(next) = self.batting_order.get(self.next_batter).cloned() {
                    self.next_batter += 1;
                    self.batting_card.push(BatterCard::new(&next));
                    if dismissal.batter == self.non_striker {
                        self.non_striker = next;
                    } else {
                        self.striker = next;
                    }
                }
            }
        } else if odd_run_swap(event) {
            std::mem::swap(&mut self.striker, &mut self.non_striker);
        }
    }

    /// True once the over has six legal balls.
    pub fn over_complete(&self) -> bool {
        self.over_legal_balls >= BALLS_PER_OVER
    }

    /// Close the current over (complete or partial) and return its summary.
    /// Batters change ends after a full over unless the innings is over.
    pub fn close_over(&mut self) -> Option<OverSummary> {
        if self.over_deliveries == 0 {
            return None;
        }
        let bowler = self.bowler.take().unwrap_or_default();
        let full = self.over_complete();
        let maiden = full && self.over_bowler_runs == 0;
        if maiden {
            self.bowler_card_mut(&bowler).maidens += 1;
        }
        *self.overs_by_bowler.entry(bowler.clone()).or_insert(0) += 1;

        let summary = OverSummary {
            innings: self.number,
            over: self.over,
            bowler: bowler.clone(),
            runs: self.over_runs,
            wickets: self.over_wickets,
            legal_balls: self.over_legal_balls,
            maiden,
            score: self.runs,
            total_wickets: self.wickets,
        };
        self.overs.push(summary.clone());

        if full && !self.should_close() {
            std::mem::swap(&mut self.striker, &mut self.non_striker);
        }
        self.previous_bowler = Some(bowler);
        self.over += 1;
        self.over_deliveries = 0;
        self.over_legal_balls = 0;
        self.over_runs = 0;
        self.over_wickets = 0;
        self.over_bowler_runs = 0;
        Some(summary)
    }

    pub fn summary(&self) -> InningsSummary {
        InningsSummary {
            number: self.number,
            batting_team: self.batting_team.clone(),
            bowling_team: self.bowling_team.clone(),
            runs: self.runs,
            wickets: self.wickets,
            legal_balls: self.legal_balls,
            extras: self.extras,
            max_overs: self.max_overs,
            all_out: self.all_out(),
            target: self.target,
            super_over: self.super_over,
        }
    }

    fn batter_card_mut(&mut self, name: &str) -> Option<&mut BatterCard> {
        self.batting_card.iter_mut().find(|c| c.name == name)
    }

    fn bowler_card_mut(&mut self, name: &str) -> &mut BowlerCard {
        let idx = match self.bowling_card.iter().position(|c| c.name == name) {
            Some(idx) => idx,
            None => {
                self.bowling_card.push(BowlerCard::new(name));
                self.bowling_card.len() - 1
            }
        };
        &mut self.bowling_card[idx]
    }
}

/// Batters cross on an odd number of runs, whether off the bat or run as byes.
/// One-run wides and no-balls are awarded without running.
fn odd_run_swap(event: &BallEvent) -> bool {
    let ran = match event.result {
        BallResult::Bye | BallResult::LegBye => event.extras,
        _ => event.runs,
    };
    ran % 2 == 1
}
