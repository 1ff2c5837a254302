//! Error types for the simulation core.
//!
//! One enum per subsystem. Every variant corresponds to a failure the caller
//! can act on; nothing in the core retries.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected rule set. Raised only by constructors and `validate()`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("configuration error: {0}")]
pub struct ConfigError(pub String);

impl ConfigError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Why a bowling change was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BowlingChangeRejection {
    /// Bowler is not in the fielding side's playing XI.
    NotInPlayingXi,
    /// Bowler already bowled the per-bowler over quota.
    OverCapReached,
    /// Bowler bowled the previous over.
    ConsecutiveOvers,
    /// Changes are only accepted before the first delivery of an over.
    MidOver,
}

impl fmt::Display for BowlingChangeRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::NotInPlayingXi => "not in the playing XI",
            Self::OverCapReached => "over quota reached",
            Self::ConsecutiveOvers => "bowled the previous over",
            Self::MidOver => "over already in progress",
        };
        write!(f, "{repr}")
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    #[error("invalid lineup: {0}")]
    InvalidLineup(String),

    #[error("invalid bowling change to {bowler}: {reason}")]
    InvalidBowlingChange {
        bowler: String,
        reason: BowlingChangeRejection,
    },

    #[error("batting order is locked once the side has started batting")]
    OrderLocked,

    #[error("match is complete")]
    MatchComplete,

    #[error("match was cancelled")]
    Cancelled,

    #[error("match is paused")]
    Paused,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Why a bid was refused.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BidRejection {
    /// Below the opening price or the current bid plus the increment.
    BelowMinimum { minimum: f64 },
    /// Above the per-player bid cap.
    AboveCap { cap: f64 },
    /// Not enough budget left.
    InsufficientBudget { remaining: f64 },
    /// Squad already at the maximum size.
    SquadFull,
    /// Overseas quota already used.
    OverseasCapReached,
    /// The team already holds the top bid.
    AlreadyLeading,
    /// No lot is currently open for bidding.
    NoActiveLot,
}

impl fmt::Display for BidRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BelowMinimum { minimum } => write!(f, "bid must be at least {minimum:.2}"),
            Self::AboveCap { cap } => write!(f, "bid exceeds the cap of {cap:.2}"),
            Self::InsufficientBudget { remaining } => {
                write!(f, "only {remaining:.2} left in the purse")
            }
            Self::SquadFull => write!(f, "squad is full"),
            Self::OverseasCapReached => write!(f, "overseas quota is full"),
            Self::AlreadyLeading => write!(f, "already the highest bidder"),
            Self::NoActiveLot => write!(f, "no lot is open"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuctionError {
    #[error("bid from {team} rejected: {reason}")]
    IneligibleBid { team: String, reason: BidRejection },

    #[error("auction session is not active")]
    SessionInactive,

    #[error("lot {0} is already finalized")]
    LotFinalized(usize),

    #[error("auction session was cancelled")]
    Cancelled,

    #[error("unknown team: {0}")]
    UnknownTeam(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TournamentError {
    #[error("fixture {0} is already finalized")]
    FixtureFinalized(usize),

    #[error("unknown fixture: {0}")]
    UnknownFixture(usize),

    #[error("fixture {0} is not part of the current stage")]
    FixtureNotScheduled(usize),

    #[error("tournament was cancelled")]
    Cancelled,

    #[error("tournament is paused")]
    Paused,

    #[error("match failed: {0}")]
    Match(#[from] MatchError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_into_every_subsystem_error() {
        let err: MatchError = ConfigError::new("bad overs").into();
        assert_eq!(err.to_string(), "configuration error: bad overs");

        let err: AuctionError = ConfigError::new("bad cap").into();
        assert!(matches!(err, AuctionError::Config(_)));

        let err: TournamentError = MatchError::MatchComplete.into();
        assert_eq!(err.to_string(), "match failed: match is complete");
    }

    #[test]
    fn bid_rejection_messages_carry_amounts() {
        let err = AuctionError::IneligibleBid {
            team: "Chennai".to_string(),
            reason: BidRejection::AboveCap { cap: 30.0 },
        };
        assert_eq!(err.to_string(), "bid from Chennai rejected: bid exceeds the cap of 30.00");
    }
}
