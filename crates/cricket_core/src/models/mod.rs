//! Value entities: players, teams, venues and match formats.

pub mod format;
pub mod player;
pub mod team;
pub mod venue;

pub use format::MatchFormat;
pub use player::{
    BattingApproach, BowlingStyle, Injury, InjurySeverity, Nationality, Player, Role, Skills,
};
pub use team::{
    Team, MAX_OVERSEAS_IN_SQUAD, MAX_OVERSEAS_IN_XI, MAX_SQUAD_SIZE, MIN_SQUAD_SIZE,
    PLAYING_XI_SIZE,
};
pub use venue::{Pitch, Venue, Weather};
