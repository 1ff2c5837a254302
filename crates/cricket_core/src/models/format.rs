use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const T20_OVERS: u32 = 20;
pub const ODI_OVERS: u32 = 50;
/// One day's play.
pub const TEST_DAY_OVERS: u32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MatchFormat {
    #[default]
    T20,
    Odi,
    Test,
    /// Short or experimental formats (T10, two-over matches).
    Custom { overs: u32 },
}

impl MatchFormat {
    /// Overs available to each side per innings.
    pub fn overs_per_innings(self) -> u32 {
        match self {
            MatchFormat::T20 => T20_OVERS,
            MatchFormat::Odi => ODI_OVERS,
            MatchFormat::Test => TEST_DAY_OVERS,
            MatchFormat::Custom { overs } => overs,
        }
    }

    pub fn legal_balls_per_innings(self) -> u32 {
        self.overs_per_innings() * 6
    }

    /// Default per-bowler quota: a fifth of the innings, never below one.
    pub fn bowler_over_cap(self) -> u32 {
        (self.overs_per_innings() / 5).max(1)
    }

    pub fn validate(self) -> Result<(), ConfigError> {
        if self.overs_per_innings() == 0 {
            return Err(ConfigError::new("a format needs at least one over per innings"));
        }
        Ok(())
    }
}

impl fmt::Display for MatchFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchFormat::T20 => write!(f, "T20"),
            MatchFormat::Odi => write!(f, "ODI"),
            MatchFormat::Test => write!(f, "Test"),
            MatchFormat::Custom { overs } => write!(f, "{overs}-over"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bowler_caps_follow_innings_length() {
        assert_eq!(MatchFormat::T20.bowler_over_cap(), 4);
        assert_eq!(MatchFormat::Odi.bowler_over_cap(), 10);
        assert_eq!(MatchFormat::Test.bowler_over_cap(), 18);
        assert_eq!(MatchFormat::Custom { overs: 2 }.bowler_over_cap(), 1);
    }

    #[test]
    fn zero_over_format_is_rejected() {
        assert!(MatchFormat::Custom { overs: 0 }.validate().is_err());
        assert!(MatchFormat::Custom { overs: 10 }.validate().is_ok());
        assert_eq!(MatchFormat::Custom { overs: 10 }.to_string(), "10-over");
    }
}
