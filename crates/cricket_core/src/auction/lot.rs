use serde::{Deserialize, Serialize};

use crate::models::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LotState {
    Pending,
    Active,
    Sold,
    Unsold,
}

impl LotState {
    pub fn is_resolved(self) -> bool {
        matches!(self, LotState::Sold | LotState::Unsold)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    pub team: String,
    pub amount: f64,
}

/// A player under the hammer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuctionLot {
    pub id: usize,
    pub player: Player,
    pub base_price: f64,
    pub current_bid: Option<f64>,
    pub current_bidder: Option<String>,
    /// Accepted bids, oldest first.
    pub bid_history: Vec<Bid>,
    pub state: LotState,
    /// Seconds left before the hammer falls.
    pub countdown: f64,
    /// 1 for the main round, 2 for a re-auction.
    pub round: u32,
}

impl AuctionLot {
    pub fn new(id: usize, player: Player, base_price: f64, round: u32) -> Self {
        Self {
            id,
            player,
            base_price,
            current_bid: None,
            current_bidder: None,
            bid_history: Vec::new(),
            state: LotState::Pending,
            countdown: 0.0,
            round,
        }
    }

    pub fn open(&mut self, bid_time: f64) {
        self.state = LotState::Active;
        self.countdown = bid_time;
    }

    /// Smallest acceptable next bid. The opening bid is the base price,
    /// capped at `max_bid`.
    pub fn minimum_bid(&self, increment: f64, max_bid: f64) -> f64 {
        match self.current_bid {
            None => self.base_price.min(max_bid),
            Some(current) => current + increment,
        }
    }

    pub fn record_bid(&mut self, team: &str, amount: f64, bid_time: f64) {
        self.current_bid = Some(amount);
        self.current_bidder = Some(team.to_string());
        self.bid_history.push(Bid {
            team: team.to_string(),
            amount,
        });
        self.countdown = bid_time;
    }

    /// Run the clock down. Returns true once it has expired.
    pub fn tick(&mut self, delta_secs: f64) -> bool {
        self.countdown = (self.countdown - delta_secs).max(0.0);
        self.countdown <= 0.0
    }

    /// Resolve the lot: sold to the leader if there is one.
    pub fn hammer(&mut self) -> Option<(String, f64)> {
        match (self.current_bidder.clone(), self.current_bid) {
            (Some(team), Some(price)) => {
                self.state = LotState::Sold;
                Some((team, price))
            }
            _ => {
                self.state = LotState::Unsold;
                None
            }
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.state.is_resolved()
    }
}
