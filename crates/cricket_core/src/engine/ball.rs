//! Delivery outcomes and the append-only ball record.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BallResult {
    Dot,
    One,
    Two,
    Three,
    Four,
    Six,
    Wicket,
    Wide,
    NoBall,
    Bye,
    LegBye,
}

impl BallResult {
    /// Sampling order used by the outcome distribution.
    pub const ALL: [BallResult; 11] = [
        BallResult::Dot,
        BallResult::One,
        BallResult::Two,
        BallResult::Three,
        BallResult::Four,
        BallResult::Six,
        BallResult::Wicket,
        BallResult::Wide,
        BallResult::NoBall,
        BallResult::Bye,
        BallResult::LegBye,
    ];

    pub fn index(self) -> usize {
        match self {
            BallResult::Dot => 0,
            BallResult::One => 1,
            BallResult::Two => 2,
            BallResult::Three => 3,
            BallResult::Four => 4,
            BallResult::Six => 5,
            BallResult::Wicket => 6,
            BallResult::Wide => 7,
            BallResult::NoBall => 8,
            BallResult::Bye => 9,
            BallResult::LegBye => 10,
        }
    }

    /// Wides and no-balls do not count toward the six.
    pub fn is_legal(self) -> bool {
        !matches!(self, BallResult::Wide | BallResult::NoBall)
    }

    /// Runs off the bat.
    pub fn bat_runs(self) -> u32 {
        match self {
            BallResult::One => 1,
            BallResult::Two => 2,
            BallResult::Three => 3,
            BallResult::Four => 4,
            BallResult::Six => 6,
            _ => 0,
        }
    }

    /// Extras credited to the batting side.
    pub fn extra_runs(self) -> u32 {
        match self {
            BallResult::Wide | BallResult::NoBall | BallResult::Bye | BallResult::LegBye => 1,
            _ => 0,
        }
    }

    /// Outcomes that put runs off the bat on the board.
    pub fn is_scoring(self) -> bool {
        self.bat_runs() > 0
    }

    /// Extras charged to the bowler's analysis. Byes and leg-byes are not.
    pub fn charged_to_bowler(self) -> bool {
        matches!(self, BallResult::Wide | BallResult::NoBall)
    }

    pub fn from_runs(runs: u32) -> BallResult {
        match runs {
            0 => BallResult::Dot,
            1 => BallResult::One,
            2 => BallResult::Two,
            3 => BallResult::Three,
            4 => BallResult::Four,
            _ => BallResult::Six,
        }
    }
}

impl fmt::Display for BallResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            BallResult::Dot => ".",
            BallResult::One => "1",
            BallResult::Two => "2",
            BallResult::Three => "3",
            BallResult::Four => "4",
            BallResult::Six => "6",
            BallResult::Wicket => "W",
            BallResult::Wide => "wd",
            BallResult::NoBall => "nb",
            BallResult::Bye => "b",
            BallResult::LegBye => "lb",
        };
        write!(f, "{repr}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WicketKind {
    Bowled,
    Caught,
    Lbw,
    RunOut,
    Stumped,
}

impl WicketKind {
    /// Whether the dismissal names a fielder.
    pub fn involves_fielder(self) -> bool {
        matches!(self, WicketKind::Caught | WicketKind::RunOut | WicketKind::Stumped)
    }

    /// Run-outs are not credited to the bowler.
    pub fn credited_to_bowler(self) -> bool {
        self != WicketKind::RunOut
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dismissal {
    pub kind: WicketKind,
    pub batter: String,
    pub bowler: String,
    pub fielder: Option<String>,
}

impl fmt::Display for Dismissal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fielder = self.fielder.as_deref().unwrap_or("sub");
        match self.kind {
            WicketKind::Bowled => write!(f, "b {}", self.bowler),
            WicketKind::Lbw => write!(f, "lbw b {}", self.bowler),
            WicketKind::Caught if fielder == self.bowler => write!(f, "c & b {}", self.bowler),
            WicketKind::Caught => write!(f, "c {fielder} b {}", self.bowler),
            WicketKind::Stumped => write!(f, "st {fielder} b {}", self.bowler),
            WicketKind::RunOut => write!(f, "run out ({fielder})"),
        }
    }
}

/// One delivery, legal or not.
///
/// `over` is zero-based. `ball` counts every delivery of the over from one,
/// so `(innings, over, ball)` is strictly increasing through a match;
/// `legal_ball` is the legal-delivery count of the over after this ball and
/// does not move on wides and no-balls. Super over innings continue the
/// numbering after the regulation innings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallEvent {
    pub innings: u32,
    pub over: u32,
    pub ball: u32,
    pub legal_ball: u32,
    pub striker: String,
    pub non_striker: String,
    pub bowler: String,
    pub result: BallResult,
    /// Runs off the bat.
    pub runs: u32,
    pub extras: u32,
    pub wicket: Option<Dismissal>,
    #[serde(default)]
    pub free_hit: bool,
}

impl BallEvent {
    pub fn total_runs(&self) -> u32 {
        self.runs + self.extras
    }

    pub fn is_legal(&self) -> bool {
        self.result.is_legal()
    }

    pub fn position(&self) -> (u32, u32, u32) {
        (self.innings, self.over, self.ball)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extras_and_legality() {
        assert!(!BallResult::Wide.is_legal());
        assert!(!BallResult::NoBall.is_legal());
        assert!(BallResult::Bye.is_legal());
        assert_eq!(BallResult::LegBye.extra_runs(), 1);
        assert_eq!(BallResult::Six.bat_runs(), 6);
        assert!(!BallResult::Bye.charged_to_bowler());
    }

    #[test]
    fn index_matches_sampling_order() {
        for (i, r) in BallResult::ALL.iter().enumerate() {
            assert_eq!(r.index(), i);
        }
    }

    #[test]
    fn dismissal_notation() {
        let d = Dismissal {
            kind: WicketKind::Caught,
            batter: "Rohit".into(),
            bowler: "Bumrah".into(),
            fielder: Some("Bumrah".into()),
        };
        assert_eq!(d.to_string(), "c & b Bumrah");

        let d = Dismissal {
            kind: WicketKind::Stumped,
            fielder: Some("Dhoni".into()),
            ..d
        };
        assert_eq!(d.to_string(), "st Dhoni b Bumrah");
    }
}
