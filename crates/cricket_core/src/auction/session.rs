//! Auction session: lot lifecycle, bidding protocol and settlement.
//!
//! Lots are auctioned in pool order. The countdown is driven by the caller
//! through [`AuctionSession::tick`]; AI teams act when the driver calls
//! [`AuctionSession::ai_bidding_round`], and humans interleave with
//! [`AuctionSession::place_bid`].

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::budget::{BidStrategy, TeamBudget, EPSILON};
use super::lot::{AuctionLot, LotState};
use super::rules::AuctionRules;
use super::strategy::{self, BidDecision, WILDCARD_RANGE};
use crate::error::{AuctionError, BidRejection, ConfigError};
use crate::events::EventQueue;
use crate::models::{Player, Team};
use crate::rng::{rng_from_seed, SimRng};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    NotStarted,
    Active,
    Paused,
    Completed,
    Cancelled,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            SessionPhase::NotStarted => "not started",
            SessionPhase::Active => "active",
            SessionPhase::Paused => "paused",
            SessionPhase::Completed => "completed",
            SessionPhase::Cancelled => "cancelled",
        };
        write!(f, "{repr}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub player: String,
    pub team: String,
    pub price: f64,
}

/// Aggregates reported when the session ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuctionSummary {
    /// Total spend per team, in participant order.
    pub spend_by_team: Vec<(String, f64)>,
    pub highest_sale: Option<Sale>,
    pub sold: usize,
    /// Players who never found a buyer.
    pub unsold: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AuctionEvent {
    LotStart {
        lot: usize,
        player: String,
        base_price: f64,
    },
    Bid {
        lot: usize,
        team: String,
        amount: f64,
    },
    LotSold {
        lot: usize,
        player: String,
        team: String,
        price: f64,
    },
    LotUnsold {
        lot: usize,
        player: String,
    },
    SessionEnd(AuctionSummary),
}

/// Everything needed to resume a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuctionState {
    pub rules: AuctionRules,
    pub lots: Vec<AuctionLot>,
    pub budgets: Vec<TeamBudget>,
    /// Index of the open lot.
    pub current: Option<usize>,
    pub phase: SessionPhase,
    /// AI teams still interested in the open lot.
    pub active_bidders: Vec<String>,
    /// Per-lot multiplier drawn for each wildcard team.
    pub wildcard_draws: BTreeMap<String, f64>,
    /// Team that opens the next AI bidding round.
    pub cursor: usize,
    pub reauction_done: bool,
    pub settled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuctionSnapshot {
    pub state: AuctionState,
    pub rng: SimRng,
}

pub struct AuctionSession {
    state: AuctionState,
    rng: SimRng,
    events: EventQueue<AuctionEvent>,
}

impl AuctionSession {
    /// Build a session over a player pool. `strategies[i]` belongs to `teams[i]`.
    pub fn new(
        players: Vec<Player>,
        teams: &[Team],
        strategies: &[BidStrategy],
        rules: AuctionRules,
        rng: SimRng,
    ) -> Result<Self, AuctionError> {
        rules.validate()?;
        if teams.is_empty() {
            return Err(ConfigError::new("an auction needs at least one team").into());
        }
        if strategies.len() != teams.len() {
            return Err(ConfigError::new(format!(
                "{} strategies for {} teams",
                strategies.len(),
                teams.len()
            ))
            .into());
        }

        let mut team_names = HashSet::new();
        let mut owned = HashSet::new();
        for team in teams {
            if !team_names.insert(team.name.as_str()) {
                return Err(ConfigError::new(format!("team {} listed twice", team.name)).into());
            }
            owned.extend(team.squad.iter().map(|p| p.name.as_str()));
        }

        let mut pool = HashSet::new();
        for player in &players {
            player.validate()?;
            if !pool.insert(player.name.as_str()) {
                return Err(ConfigError::new(format!("{} is in the pool twice", player.name)).into());
            }
            if owned.contains(player.name.as_str()) {
                return Err(ConfigError::new(format!(
                    "{} already belongs to a squad",
                    player.name
                ))
                .into());
            }
        }

        let budgets = teams
            .iter()
            .zip(strategies)
            .map(|(team, strategy)| TeamBudget::from_team(team, *strategy, &rules))
            .collect();
        let lots = players
            .into_iter()
            .enumerate()
            .map(|(id, player)| {
                let base = rules.base_price_for(&player);
                AuctionLot::new(id, player, base, 1)
            })
            .collect();

        Ok(Self {
            state: AuctionState {
                rules,
                lots,
                budgets,
                current: None,
                phase: SessionPhase::NotStarted,
                active_bidders: Vec::new(),
                wildcard_draws: BTreeMap::new(),
                cursor: 0,
                reauction_done: false,
                settled: false,
            },
            rng,
            events: EventQueue::new(),
        })
    }

    pub fn with_seed(
        players: Vec<Player>,
        teams: &[Team],
        strategies: &[BidStrategy],
        rules: AuctionRules,
        seed: u64,
    ) -> Result<Self, AuctionError> {
        Self::new(players, teams, strategies, rules, rng_from_seed(seed))
    }

    pub fn snapshot(&self) -> AuctionSnapshot {
        AuctionSnapshot {
            state: self.state.clone(),
            rng: self.rng.clone(),
        }
    }

    pub fn restore(snapshot: AuctionSnapshot) -> Self {
        Self {
            state: snapshot.state,
            rng: snapshot.rng,
            events: EventQueue::new(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    pub fn rules(&self) -> &AuctionRules {
        &self.state.rules
    }

    pub fn lots(&self) -> &[AuctionLot] {
        &self.state.lots
    }

    pub fn current_lot(&self) -> Option<&AuctionLot> {
        self.state.current.and_then(|i| self.state.lots.get(i))
    }

    pub fn budgets(&self) -> &[TeamBudget] {
        &self.state.budgets
    }

    pub fn budget(&self, team: &str) -> Option<&TeamBudget> {
        self.state.budgets.iter().find(|b| b.team == team)
    }

    pub fn active_bidders(&self) -> &[String] {
        &self.state.active_bidders
    }

    pub fn drain_events(&mut self) -> Vec<AuctionEvent> {
        self.events.drain()
    }

    pub fn summary(&self) -> AuctionSummary {
        let spend_by_team = self
            .state
            .budgets
            .iter()
            .map(|b| (b.team.clone(), b.spent))
            .collect();

        let mut highest_sale: Option<Sale> = None;
        let mut sold_players = HashSet::new();
        for lot in self.state.lots.iter().filter(|l| l.state == LotState::Sold) {
            sold_players.insert(lot.player.name.as_str());
            let (Some(team), Some(price)) = (&lot.current_bidder, lot.current_bid) else {
                continue;
            };
            if highest_sale.as_ref().map_or(true, |s| price > s.price) {
                highest_sale = Some(Sale {
                    player: lot.player.name.clone(),
                    team: team.clone(),
                    price,
                });
            }
        }
        let all_players: HashSet<&str> = self
            .state
            .lots
            .iter()
            .map(|l| l.player.name.as_str())
            .collect();

        AuctionSummary {
            spend_by_team,
            highest_sale,
            sold: sold_players.len(),
            unsold: all_players.len() - sold_players.len(),
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Open the first lot.
    pub fn start(&mut self) -> Result<(), AuctionError> {
        match self.state.phase {
            SessionPhase::NotStarted => {}
            SessionPhase::Cancelled => return Err(AuctionError::Cancelled),
            _ => return Err(AuctionError::SessionInactive),
        }
        self.state.phase = SessionPhase::Active;
        info!(
            lots = self.state.lots.len(),
            teams = self.state.budgets.len(),
            "auction started"
        );
        self.open_next_lot();
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), AuctionError> {
        self.ensure_active()?;
        self.state.phase = SessionPhase::Paused;
        debug!("auction paused");
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), AuctionError> {
        match self.state.phase {
            SessionPhase::Paused => {
                self.state.phase = SessionPhase::Active;
                debug!("auction resumed");
                Ok(())
            }
            SessionPhase::Cancelled => Err(AuctionError::Cancelled),
            _ => Err(AuctionError::SessionInactive),
        }
    }

    /// Stop the session. Open lots stay unresolved and nothing is settled.
    pub fn cancel(&mut self) -> Result<(), AuctionError> {
        match self.state.phase {
            SessionPhase::Cancelled => return Err(AuctionError::Cancelled),
            SessionPhase::Completed => return Err(AuctionError::SessionInactive),
            _ => {}
        }
        self.state.phase = SessionPhase::Cancelled;
        self.state.active_bidders.clear();
        info!("auction cancelled");
        Ok(())
    }

    // ========================================================================
    // Bidding
    // ========================================================================

    /// Bid on the open lot.
    pub fn place_bid(&mut self, team: &str, amount: f64) -> Result<(), AuctionError> {
        self.ensure_active()?;
        let idx = self.state.current.ok_or_else(|| AuctionError::IneligibleBid {
            team: team.to_string(),
            reason: BidRejection::NoActiveLot,
        })?;
        self.accept_bid(idx, team, amount)
    }

    /// Bid on a specific lot. Resolved lots are final.
    pub fn place_bid_for(&mut self, lot: usize, team: &str, amount: f64) -> Result<(), AuctionError> {
        if self.state.phase == SessionPhase::Cancelled {
            return Err(AuctionError::Cancelled);
        }
        let not_open = || AuctionError::IneligibleBid {
            team: team.to_string(),
            reason: BidRejection::NoActiveLot,
        };
        let target = self.state.lots.get(lot).ok_or_else(not_open)?;
        if target.is_resolved() {
            return Err(AuctionError::LotFinalized(lot));
        }
        self.ensure_active()?;
        if self.state.current != Some(lot) {
            return Err(not_open());
        }
        self.accept_bid(lot, team, amount)
    }

    /// Advance the countdown of the open lot by `delta_secs`.
    ///
    /// When it expires the lot is sold to the leader (or left unsold) and
    /// the next lot opens. A paused session ignores the clock.
    pub fn tick(&mut self, delta_secs: f64) -> Result<(), AuctionError> {
        match self.state.phase {
            SessionPhase::Active => {}
            SessionPhase::Paused => return Ok(()),
            SessionPhase::Cancelled => return Err(AuctionError::Cancelled),
            _ => return Err(AuctionError::SessionInactive),
        }
        let Some(idx) = self.state.current else {
            return Ok(());
        };
        if self.state.lots[idx].tick(delta_secs) {
            self.hammer_current();
        }
        Ok(())
    }

    /// Give every interested AI team one chance to act on the open lot,
    /// round-robin. Returns the number of bids placed.
    pub fn ai_bidding_round(&mut self) -> Result<usize, AuctionError> {
        self.ensure_active()?;
        let Some(idx) = self.state.current else {
            return Ok(0);
        };
        if !self.state.rules.auto_bidding {
            return Ok(0);
        }

        let n = self.state.budgets.len();
        let order: Vec<String> = (0..n)
            .map(|k| self.state.budgets[(self.state.cursor + k) % n].team.clone())
            .filter(|t| self.state.active_bidders.contains(t))
            .collect();
        self.state.cursor = (self.state.cursor + 1) % n;

        let mut placed = 0;
        for team in order {
            let lot = &self.state.lots[idx];
            if lot.current_bidder.as_deref() == Some(team.as_str()) {
                continue;
            }
            let Some(budget) = self.state.budgets.iter().find(|b| b.team == team) else {
                continue;
            };
            let rules = &self.state.rules;
            let minimum = lot.minimum_bid(rules.min_increment, rules.max_bid);
            let draw = self.state.wildcard_draws.get(&team).copied().unwrap_or(1.0);
            let willing =
                strategy::willingness(&lot.player, budget.strategy, rules.valuation_scale, draw);

            let amount = match strategy::decide(budget.strategy, willing, minimum, rules.max_bid) {
                BidDecision::Bid(amount) => [amount, minimum]
                    .into_iter()
                    .find(|a| budget.can_afford(&lot.player, *a).is_ok()),
                BidDecision::Withdraw => None,
            };

            match amount {
                Some(amount) => {
                    self.accept_bid(idx, &team, amount)?;
                    placed += 1;
                }
                None => {
                    debug!(team = %team, lot = idx, "withdrew from lot");
                    self.state.active_bidders.retain(|t| *t != team);
                }
            }
        }
        Ok(placed)
    }

    /// Drive the whole session with AI bidding and the clock.
    pub fn run_to_completion(&mut self) -> Result<AuctionSummary, AuctionError> {
        self.run_to_completion_with(|_| {})
    }

    /// As [`run_to_completion`](Self::run_to_completion), handing every
    /// event to `hook` as it is produced.
    pub fn run_to_completion_with<F>(&mut self, mut hook: F) -> Result<AuctionSummary, AuctionError>
    where
        F: FnMut(&AuctionEvent),
    {
        if self.state.phase == SessionPhase::NotStarted {
            self.start()?;
        }
        loop {
            for event in self.events.drain() {
                hook(&event);
            }
            match self.state.phase {
                SessionPhase::Completed => break,
                SessionPhase::Active => {}
                SessionPhase::Cancelled => return Err(AuctionError::Cancelled),
                _ => return Err(AuctionError::SessionInactive),
            }
            if self.ai_bidding_round()? == 0 {
                let remaining = self.current_lot().map_or(0.0, |l| l.countdown);
                self.tick(remaining)?;
            }
        }
        Ok(self.summary())
    }

    /// Move bought players into their squads and write back purses.
    /// Returns the number of players transferred.
    pub fn settle(&mut self, teams: &mut [Team]) -> Result<usize, AuctionError> {
        match self.state.phase {
            SessionPhase::Completed => {}
            SessionPhase::Cancelled => return Err(AuctionError::Cancelled),
            _ => return Err(AuctionError::SessionInactive),
        }
        if self.state.settled {
            return Ok(0);
        }
        for budget in &self.state.budgets {
            if !teams.iter().any(|t| t.name == budget.team) {
                return Err(AuctionError::UnknownTeam(budget.team.clone()));
            }
        }

        let mut moved = 0;
        for lot in self.state.lots.iter().filter(|l| l.state == LotState::Sold) {
            let Some(buyer) = lot.current_bidder.as_deref() else {
                continue;
            };
            let team = teams
                .iter_mut()
                .find(|t| t.name == buyer)
                .ok_or_else(|| AuctionError::UnknownTeam(buyer.to_string()))?;
            team.add_player(lot.player.clone())?;
            moved += 1;
        }
        for budget in &self.state.budgets {
            if let Some(team) = teams.iter_mut().find(|t| t.name == budget.team) {
                team.budget = budget.remaining;
            }
        }
        self.state.settled = true;
        info!(players = moved, "auction settled");
        Ok(moved)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn ensure_active(&self) -> Result<(), AuctionError> {
        match self.state.phase {
            SessionPhase::Active => Ok(()),
            SessionPhase::Cancelled => Err(AuctionError::Cancelled),
            _ => Err(AuctionError::SessionInactive),
        }
    }

    fn accept_bid(&mut self, idx: usize, team: &str, amount: f64) -> Result<(), AuctionError> {
        let budget = self
            .state
            .budgets
            .iter()
            .find(|b| b.team == team)
            .ok_or_else(|| AuctionError::UnknownTeam(team.to_string()))?;
        let lot = &self.state.lots[idx];
        let rules = &self.state.rules;
        let minimum = lot.minimum_bid(rules.min_increment, rules.max_bid);

        let rejection = if lot.current_bidder.as_deref() == Some(team) {
            Some(BidRejection::AlreadyLeading)
        } else if amount + EPSILON < minimum {
            Some(BidRejection::BelowMinimum { minimum })
        } else if amount > rules.max_bid + EPSILON {
            Some(BidRejection::AboveCap { cap: rules.max_bid })
        } else {
            budget.can_afford(&lot.player, amount).err()
        };
        if let Some(reason) = rejection {
            warn!(team, lot = idx, amount, %reason, "bid rejected");
            return Err(AuctionError::IneligibleBid {
                team: team.to_string(),
                reason,
            });
        }

        let bid_time = rules.bid_time_secs;
        self.state.lots[idx].record_bid(team, amount, bid_time);
        debug!(team, lot = idx, amount, "bid accepted");
        self.events.push(AuctionEvent::Bid {
            lot: idx,
            team: team.to_string(),
            amount,
        });
        Ok(())
    }

    fn open_next_lot(&mut self) {
        if self.state.budgets.iter().all(TeamBudget::is_full) {
            // Nobody can buy: whatever is left goes unsold without bidding.
            for lot in self.state.lots.iter_mut().filter(|l| !l.is_resolved()) {
                lot.state = LotState::Unsold;
            }
            self.finish();
            return;
        }

        if let Some(idx) = self
            .state
            .lots
            .iter()
            .position(|l| l.state == LotState::Pending)
        {
            self.open_lot(idx);
            return;
        }

        if self.state.rules.reauction_unsold && !self.state.reauction_done {
            self.state.reauction_done = true;
            let discount = self.state.rules.reauction_discount;
            let unsold: Vec<(Player, f64)> = self
                .state
                .lots
                .iter()
                .filter(|l| l.state == LotState::Unsold)
                .map(|l| (l.player.clone(), l.base_price * discount))
                .collect();
            if !unsold.is_empty() {
                info!(players = unsold.len(), "re-auctioning unsold players");
                let first = self.state.lots.len();
                for (offset, (player, base)) in unsold.into_iter().enumerate() {
                    self.state
                        .lots
                        .push(AuctionLot::new(first + offset, player, base, 2));
                }
                self.open_lot(first);
                return;
            }
        }

        self.finish();
    }

    fn open_lot(&mut self, idx: usize) {
        let bid_time = self.state.rules.bid_time_secs;
        let auto = self.state.rules.auto_bidding;
        self.state.lots[idx].open(bid_time);
        self.state.current = Some(idx);

        self.state.active_bidders = self
            .state
            .budgets
            .iter()
            .filter(|b| auto && b.strategy.is_ai() && !b.is_full())
            .map(|b| b.team.clone())
            .collect();
        self.state.wildcard_draws.clear();
        for budget in &self.state.budgets {
            if budget.strategy == BidStrategy::Wildcard {
                let draw = self.rng.gen_range(WILDCARD_RANGE.0..=WILDCARD_RANGE.1);
                self.state.wildcard_draws.insert(budget.team.clone(), draw);
            }
        }

        let lot = &self.state.lots[idx];
        debug!(lot = idx, player = %lot.player.name, base = lot.base_price, "lot opened");
        self.events.push(AuctionEvent::LotStart {
            lot: idx,
            player: lot.player.name.clone(),
            base_price: lot.base_price,
        });
    }

    fn hammer_current(&mut self) {
        let Some(idx) = self.state.current.take() else {
            return;
        };
        let player = self.state.lots[idx].player.clone();
        match self.state.lots[idx].hammer() {
            Some((team, price)) => {
                if let Some(budget) = self.state.budgets.iter_mut().find(|b| b.team == team) {
                    budget.debit(&player, price);
                }
                info!(player = %player.name, team = %team, price, "lot sold");
                self.events.push(AuctionEvent::LotSold {
                    lot: idx,
                    player: player.name,
                    team,
                    price,
                });
            }
            None => {
                debug!(player = %player.name, "lot unsold");
                self.events.push(AuctionEvent::LotUnsold {
                    lot: idx,
                    player: player.name,
                });
            }
        }
        self.state.active_bidders.clear();
        self.open_next_lot();
    }

    fn finish(&mut self) {
        self.state.current = None;
        self.state.phase = SessionPhase::Completed;
        self.state.active_bidders.clear();
        let summary = self.summary();
        info!(
            sold = summary.sold,
            unsold = summary.unsold,
            top_price = summary.highest_sale.as_ref().map_or(0.0, |s| s.price),
            "auction complete"
        );
        self.events.push(AuctionEvent::SessionEnd(summary));
    }
}
