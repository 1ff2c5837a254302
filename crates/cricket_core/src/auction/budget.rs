use std::fmt;

use serde::{Deserialize, Serialize};

use super::rules::AuctionRules;
use crate::error::BidRejection;
use crate::models::{Player, Team};

/// Tolerance for comparing bid amounts.
pub(crate) const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BidStrategy {
    Aggressive,
    #[default]
    Balanced,
    Conservative,
    Wildcard,
    /// Bids only through explicit `place_bid` calls.
    Human,
}

impl BidStrategy {
    pub fn is_ai(self) -> bool {
        self != BidStrategy::Human
    }
}

impl fmt::Display for BidStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            BidStrategy::Aggressive => "aggressive",
            BidStrategy::Balanced => "balanced",
            BidStrategy::Conservative => "conservative",
            BidStrategy::Wildcard => "wildcard",
            BidStrategy::Human => "human",
        };
        write!(f, "{repr}")
    }
}

/// Purse and roster bookkeeping for one team during a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamBudget {
    pub team: String,
    pub initial: f64,
    pub spent: f64,
    pub remaining: f64,
    /// Players bought in this session, in purchase order.
    pub players_bought: Vec<String>,
    /// Squad size including players held before the session.
    pub squad_size: usize,
    pub max_squad_size: usize,
    pub overseas_count: usize,
    pub max_overseas: usize,
    pub strategy: BidStrategy,
}

impl TeamBudget {
    pub fn from_team(team: &Team, strategy: BidStrategy, rules: &AuctionRules) -> Self {
        Self {
            team: team.name.clone(),
            initial: team.budget,
            spent: 0.0,
            remaining: team.budget,
            players_bought: Vec::new(),
            squad_size: team.squad.len(),
            max_squad_size: rules.max_squad_size,
            overseas_count: team.overseas_count(),
            max_overseas: rules.max_overseas,
            strategy,
        }
    }

    pub fn is_full(&self) -> bool {
        self.squad_size >= self.max_squad_size
    }

    /// Budget, roster and overseas checks for buying `player` at `amount`.
    pub fn can_afford(&self, player: &Player, amount: f64) -> Result<(), BidRejection> {
        if amount > self.remaining + EPSILON {
            return Err(BidRejection::InsufficientBudget {
                remaining: self.remaining,
            });
        }
        if self.is_full() {
            return Err(BidRejection::SquadFull);
        }
        if player.is_overseas() && self.overseas_count + 1 > self.max_overseas {
            return Err(BidRejection::OverseasCapReached);
        }
        Ok(())
    }

    pub fn debit(&mut self, player: &Player, amount: f64) {
        self.spent += amount;
        self.remaining -= amount;
        self.squad_size += 1;
        if player.is_overseas() {
            self.overseas_count += 1;
        }
        self.players_bought.push(player.name.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Nationality, Role};

    #[test]
    fn purchase_keeps_the_books_balanced() {
        let team = Team::new("Hyderabad", 40.0);
        let mut budget = TeamBudget::from_team(&team, BidStrategy::Balanced, &AuctionRules::default());
        let p = Player::new("Rashid", Role::Bowler, Nationality::Overseas);

        assert!(budget.can_afford(&p, 12.5).is_ok());
        budget.debit(&p, 12.5);
        assert_eq!(budget.spent + budget.remaining, budget.initial);
        assert_eq!(budget.overseas_count, 1);
        assert_eq!(budget.players_bought, vec!["Rashid".to_string()]);

        assert_eq!(
            budget.can_afford(&p, 30.0),
            Err(BidRejection::InsufficientBudget { remaining: 27.5 })
        );
    }

    #[test]
    fn overseas_and_squad_caps() {
        let rules = AuctionRules {
            max_squad_size: 2,
            max_overseas: 1,
            ..AuctionRules::default()
        };
        let mut budget = TeamBudget::from_team(&Team::new("T", 100.0), BidStrategy::Human, &rules);
        let overseas = Player::new("O", Role::Batsman, Nationality::Overseas);
        let local = Player::new("L", Role::Batsman, Nationality::Local);

        budget.debit(&overseas, 1.0);
        assert_eq!(budget.can_afford(&overseas, 1.0), Err(BidRejection::OverseasCapReached));
        budget.debit(&local, 1.0);
        assert_eq!(budget.can_afford(&local, 1.0), Err(BidRejection::SquadFull));
    }
}
