//! Match Engine: probability model, innings bookkeeping and the
//! ball-by-ball state machine.

pub mod ball;
pub mod innings;
pub mod match_engine;
pub mod match_state;
pub mod probability;

pub use ball::{BallEvent, BallResult, Dismissal, WicketKind};
pub use innings::{BatterCard, BowlerCard, Innings, InningsSummary, OverSummary};
pub use match_engine::MatchEngine;
pub use match_state::{
    Conditions, Lineup, MatchConfig, MatchEvent, MatchPhase, MatchResult, MatchSnapshot,
    MatchState, ResultMargin, SuperOverRound,
};
