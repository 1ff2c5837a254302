//! AI bidder valuation and bid decisions.
//!
//! Pure functions: the session supplies the lot state and any random draw.

use super::budget::{BidStrategy, EPSILON};
use crate::models::Player;

pub const AGGRESSIVE_MULTIPLIER: f64 = 1.5;
pub const BALANCED_MULTIPLIER: f64 = 1.2;
pub const CONSERVATIVE_MULTIPLIER: f64 = 1.0;
pub const WILDCARD_RANGE: (f64, f64) = (1.0, 1.5);

/// Mean skill rating converted to bid units.
pub fn valuation(player: &Player, scale: f64) -> f64 {
    player.skills.mean() * scale
}

/// Strategy multiplier. Wildcards use the per-lot draw; humans never bid.
pub fn multiplier(strategy: BidStrategy, wildcard_draw: f64) -> f64 {
    match strategy {
        BidStrategy::Aggressive => AGGRESSIVE_MULTIPLIER,
        BidStrategy::Balanced => BALANCED_MULTIPLIER,
        BidStrategy::Conservative => CONSERVATIVE_MULTIPLIER,
        BidStrategy::Wildcard => wildcard_draw.clamp(WILDCARD_RANGE.0, WILDCARD_RANGE.1),
        BidStrategy::Human => 0.0,
    }
}

/// Most a team is willing to pay before the cap applies.
pub fn willingness(player: &Player, strategy: BidStrategy, scale: f64, wildcard_draw: f64) -> f64 {
    valuation(player, scale) * multiplier(strategy, wildcard_draw)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BidDecision {
    Bid(f64),
    Withdraw,
}

/// Decide the next move for one AI team.
///
/// Every AI strategy bids the minimum acceptable amount while it stays
/// within `min(willingness, max_bid)`, and withdraws once it would not.
pub fn decide(strategy: BidStrategy, willingness: f64, minimum: f64, max_bid: f64) -> BidDecision {
    if !strategy.is_ai() {
        return BidDecision::Withdraw;
    }
    let limit = willingness.min(max_bid);
    if minimum > limit + EPSILON {
        return BidDecision::Withdraw;
    }
    BidDecision::Bid(minimum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Nationality, Role};

    fn star() -> Player {
        Player::new("Star", Role::AllRounder, Nationality::Local).with_skills(100, 100, 100)
    }

    #[test]
    fn valuation_scales_mean_skill() {
        assert_eq!(valuation(&star(), 0.25), 25.0);
        assert_eq!(willingness(&star(), BidStrategy::Aggressive, 0.25, 0.0), 37.5);
        assert_eq!(willingness(&star(), BidStrategy::Conservative, 0.25, 0.0), 25.0);
        assert_eq!(multiplier(BidStrategy::Wildcard, 2.0), 1.5);
    }

    #[test]
    fn aggressive_steps_like_everyone_else_up_to_the_cap() {
        assert_eq!(decide(BidStrategy::Aggressive, 37.5, 2.0, 30.0), BidDecision::Bid(2.0));
        assert_eq!(decide(BidStrategy::Aggressive, 37.5, 27.5, 30.0), BidDecision::Bid(27.5));
        assert_eq!(decide(BidStrategy::Aggressive, 37.5, 30.0, 30.0), BidDecision::Bid(30.0));
        assert_eq!(decide(BidStrategy::Aggressive, 37.5, 30.5, 30.0), BidDecision::Withdraw);
    }

    #[test]
    fn others_step_by_the_increment_until_their_limit() {
        assert_eq!(decide(BidStrategy::Balanced, 12.0, 11.5, 30.0), BidDecision::Bid(11.5));
        assert_eq!(decide(BidStrategy::Balanced, 12.0, 12.5, 30.0), BidDecision::Withdraw);
        assert_eq!(decide(BidStrategy::Conservative, 25.0, 30.0, 30.0), BidDecision::Withdraw);
        assert_eq!(decide(BidStrategy::Human, 100.0, 1.0, 30.0), BidDecision::Withdraw);
    }
}
