//! Player auction: lots, team purses and AI bidders.

pub mod budget;
pub mod lot;
pub mod rules;
pub mod session;
pub mod strategy;

pub use budget::{BidStrategy, TeamBudget};
pub use lot::{AuctionLot, Bid, LotState};
pub use rules::{AuctionRules, BasePriceRule};
pub use session::{
    AuctionEvent, AuctionSession, AuctionSnapshot, AuctionState, AuctionSummary, Sale, SessionPhase,
};
pub use strategy::BidDecision;
