//! Tournament Controller: fixtures, standings and stage progression.

pub mod config;
pub mod controller;
pub mod fixtures;
pub mod standings;

pub use config::{TieBreaker, TournamentConfig, TournamentFormat};
pub use controller::{
    Tournament, TournamentEvent, TournamentSnapshot, TournamentState, TournamentStatus,
};
pub use fixtures::{BracketSlot, Fixture, FixtureOutcome, Stage, TeamScore};
pub use standings::Standing;
