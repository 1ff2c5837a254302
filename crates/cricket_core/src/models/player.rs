use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 100;
const NEUTRAL_RATING: u8 = 50;

fn neutral_rating() -> u8 {
    NEUTRAL_RATING
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Batsman,
    Bowler,
    AllRounder,
    WicketKeeper,
    Captain,
}

impl Role {
    /// Roles that may appear in a bowling order.
    pub fn can_bowl(self) -> bool {
        matches!(self, Role::Bowler | Role::AllRounder)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Nationality {
    Local,
    Overseas,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BattingApproach {
    Aggressive,
    Attacking,
    #[default]
    Balanced,
    Defensive,
}

/// Delivery type, used for pitch-dependent wicket bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BowlingStyle {
    #[default]
    Pace,
    Spin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skills {
    pub batting: u8,
    pub bowling: u8,
    pub fielding: u8,
}

impl Default for Skills {
    fn default() -> Self {
        Self {
            batting: NEUTRAL_RATING,
            bowling: NEUTRAL_RATING,
            fielding: NEUTRAL_RATING,
        }
    }
}

impl Skills {
    pub fn new(batting: u8, bowling: u8, fielding: u8) -> Self {
        Self {
            batting,
            bowling,
            fielding,
        }
    }

    /// Mean of the three ratings. Drives auction valuations.
    pub fn mean(&self) -> f64 {
        (self.batting as f64 + self.bowling as f64 + self.fielding as f64) / 3.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InjurySeverity {
    Minor,
    Moderate,
    Severe,
}

impl InjurySeverity {
    /// Matches missed when the injury is first recorded.
    pub fn default_matches_out(self) -> u32 {
        match self {
            InjurySeverity::Minor => 1,
            InjurySeverity::Moderate => 3,
            InjurySeverity::Severe => 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Injury {
    pub description: String,
    pub severity: InjurySeverity,
    /// Matches still to be missed. Zero means healed.
    pub matches_remaining: u32,
}

impl Injury {
    pub fn new(description: impl Into<String>, severity: InjurySeverity) -> Self {
        Self {
            description: description.into(),
            severity,
            matches_remaining: severity.default_matches_out(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub age: u8,
    pub role: Role,
    pub nationality: Nationality,
    #[serde(default)]
    pub batting_approach: BattingApproach,
    #[serde(default)]
    pub bowling_style: BowlingStyle,
    #[serde(default)]
    pub skills: Skills,
    #[serde(default = "neutral_rating")]
    pub form: u8,
    #[serde(default = "neutral_rating")]
    pub morale: u8,
    #[serde(default)]
    pub injuries: Vec<Injury>,
}

impl Player {
    pub fn new(name: impl Into<String>, role: Role, nationality: Nationality) -> Self {
        Self {
            name: name.into(),
            age: 25,
            role,
            nationality,
            batting_approach: BattingApproach::default(),
            bowling_style: BowlingStyle::default(),
            skills: Skills::default(),
            form: NEUTRAL_RATING,
            morale: NEUTRAL_RATING,
            injuries: Vec::new(),
        }
    }

    pub fn with_skills(mut self, batting: u8, bowling: u8, fielding: u8) -> Self {
        self.skills = Skills::new(batting, bowling, fielding);
        self
    }

    pub fn with_approach(mut self, approach: BattingApproach) -> Self {
        self.batting_approach = approach;
        self
    }

    pub fn with_bowling_style(mut self, style: BowlingStyle) -> Self {
        self.bowling_style = style;
        self
    }

    pub fn with_age(mut self, age: u8) -> Self {
        self.age = age;
        self
    }

    pub fn is_overseas(&self) -> bool {
        self.nationality == Nationality::Overseas
    }

    pub fn can_bowl(&self) -> bool {
        self.role.can_bowl()
    }

    /// Injured players are not selectable for a playing XI.
    pub fn is_injured(&self) -> bool {
        self.injuries.iter().any(|i| i.matches_remaining > 0)
    }

    pub fn add_injury(&mut self, injury: Injury) {
        self.injuries.push(injury);
    }

    /// Tick every recovery counter by one match and drop healed entries.
    pub fn recover_one_match(&mut self) {
        for injury in &mut self.injuries {
            injury.matches_remaining = injury.matches_remaining.saturating_sub(1);
        }
        self.injuries.retain(|i| i.matches_remaining > 0);
    }

    /// Batting rating adjusted for form and morale (neutral at 50).
    pub fn effective_batting(&self) -> f64 {
        self.adjusted(self.skills.batting)
    }

    /// Bowling rating adjusted for form and morale (neutral at 50).
    pub fn effective_bowling(&self) -> f64 {
        self.adjusted(self.skills.bowling)
    }

    fn adjusted(&self, base: u8) -> f64 {
        let form = (self.form as f64 - NEUTRAL_RATING as f64) / 10.0;
        let morale = (self.morale as f64 - NEUTRAL_RATING as f64) / 20.0;
        (base as f64 + form + morale).clamp(MIN_RATING as f64, MAX_RATING as f64)
    }

    /// Selection value: the better of the two primary disciplines.
    pub fn overall(&self) -> u8 {
        self.skills.batting.max(self.skills.bowling)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::new("player name cannot be empty"));
        }
        let ratings = [
            ("batting", self.skills.batting),
            ("bowling", self.skills.bowling),
            ("fielding", self.skills.fielding),
            ("form", self.form),
            ("morale", self.morale),
        ];
        for (label, value) in ratings {
            if !(MIN_RATING..=MAX_RATING).contains(&value) {
                return Err(ConfigError::new(format!(
                    "{}: {label} rating {value} outside {MIN_RATING}..={MAX_RATING}",
                    self.name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_ratings_are_neutral_at_default_form() {
        let p = Player::new("A", Role::Batsman, Nationality::Local).with_skills(70, 30, 50);
        assert_eq!(p.effective_batting(), 70.0);
        assert_eq!(p.effective_bowling(), 30.0);
    }

    #[test]
    fn effective_ratings_follow_form_and_clamp() {
        let mut p = Player::new("A", Role::Batsman, Nationality::Local).with_skills(100, 1, 50);
        p.form = 100;
        p.morale = 100;
        assert_eq!(p.effective_batting(), 100.0);

        p.form = 1;
        p.morale = 1;
        assert_eq!(p.effective_bowling(), 1.0);
    }

    #[test]
    fn injuries_heal_match_by_match() {
        let mut p = Player::new("A", Role::Bowler, Nationality::Local);
        p.add_injury(Injury::new("hamstring", InjurySeverity::Moderate));
        assert!(p.is_injured());

        p.recover_one_match();
        p.recover_one_match();
        assert!(p.is_injured());
        p.recover_one_match();
        assert!(!p.is_injured());
        assert!(p.injuries.is_empty());
    }

    #[test]
    fn validate_rejects_out_of_range_ratings() {
        let p = Player::new("A", Role::Bowler, Nationality::Local).with_skills(0, 50, 50);
        assert!(p.validate().is_err());

        let p = Player::new("  ", Role::Bowler, Nationality::Local);
        assert!(p.validate().is_err());

        let p = Player::new("B", Role::Bowler, Nationality::Local).with_skills(1, 100, 50);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn only_bowlers_and_all_rounders_bowl() {
        assert!(Role::Bowler.can_bowl());
        assert!(Role::AllRounder.can_bowl());
        assert!(!Role::Batsman.can_bowl());
        assert!(!Role::WicketKeeper.can_bowl());
        assert!(!Role::Captain.can_bowl());
    }
}
