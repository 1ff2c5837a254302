//! # cricket_core - Deterministic Cricket Management Simulation
//!
//! The simulation core of a cricket management game: a ball-by-ball match
//! engine, a timed player auction with AI bidders, and a tournament
//! controller that turns fixtures into standings and knockout brackets.
//!
//! ## Features
//! - Seeded and reproducible (same inputs and seed = same ball history)
//! - T20, ODI, Test and custom-length formats, super overs included
//! - Auction purses, squad and overseas caps, four AI bidding styles
//! - Round robin, group stage, knockout and hybrid tournaments with NRR
//! - Serialisable snapshots of every engine, RNG state included
//!
//! Engines never call out to the host. They queue typed events that the
//! driver drains between steps.

// Multi-argument constructors mirror the domain entities they build.
#![allow(clippy::too_many_arguments)]

pub mod auction;
pub mod engine;
pub mod error;
pub mod events;
pub mod models;
pub mod rng;
pub mod tournament;

pub use auction::{AuctionEvent, AuctionRules, AuctionSession, BidStrategy};
pub use engine::{BallEvent, BallResult, MatchConfig, MatchEngine, MatchEvent, MatchResult};
pub use error::{AuctionError, ConfigError, MatchError, TournamentError};
pub use events::EventQueue;
pub use models::{MatchFormat, Player, Team, Venue};
pub use rng::{derive_seed, rng_from_seed, SimRng};
pub use tournament::{Tournament, TournamentConfig, TournamentEvent, TournamentFormat};
