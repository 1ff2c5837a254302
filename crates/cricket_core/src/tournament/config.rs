use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::engine::MatchConfig;
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentFormat {
    /// Every pair meets once (or twice), table decides the champion.
    #[default]
    RoundRobin,
    /// Round-robin groups feeding a knockout bracket.
    GroupStage,
    Knockout,
    /// League followed by playoffs for the top of the table.
    Hybrid,
}

impl fmt::Display for TournamentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            TournamentFormat::RoundRobin => "round robin",
            TournamentFormat::GroupStage => "group stage",
            TournamentFormat::Knockout => "knockout",
            TournamentFormat::Hybrid => "hybrid",
        };
        write!(f, "{repr}")
    }
}

/// Ordering criteria applied after points and net run rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreaker {
    Wins,
    /// Wins against the other teams level on points and NRR.
    HeadToHead,
    RunsFor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    pub name: String,
    pub format: TournamentFormat,
    pub match_config: MatchConfig,
    pub groups: usize,
    pub qualifiers_per_group: usize,
    /// League stage plays every pair home and away.
    pub double_round_robin: bool,
    /// Teams entering the playoffs of a hybrid tournament.
    pub playoff_teams: usize,
    pub tie_breakers: Vec<TieBreaker>,
    /// Date of fixture 0. Fixtures are undated when absent.
    pub start_date: Option<NaiveDate>,
    pub days_between_matches: u32,
    /// Require every squad to satisfy the registration size limits.
    pub enforce_squad_size: bool,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            name: "Premier League".to_string(),
            format: TournamentFormat::default(),
            match_config: MatchConfig::default(),
            groups: 2,
            qualifiers_per_group: 2,
            double_round_robin: false,
            playoff_teams: 4,
            tie_breakers: vec![TieBreaker::Wins, TieBreaker::HeadToHead],
            start_date: None,
            days_between_matches: 1,
            enforce_squad_size: false,
        }
    }
}

impl TournamentConfig {
    pub fn new(format: TournamentFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    /// Check the configuration against the number of entrants.
    pub fn validate(&self, team_count: usize) -> Result<(), ConfigError> {
        self.match_config.validate()?;
        if team_count < 2 {
            return Err(ConfigError::new("a tournament needs at least two teams"));
        }
        match self.format {
            TournamentFormat::GroupStage => {
                if self.groups == 0 {
                    return Err(ConfigError::new("group stage needs at least one group"));
                }
                let smallest = team_count / self.groups;
                if smallest < 2 {
                    return Err(ConfigError::new(format!(
                        "{team_count} teams cannot fill {} groups",
                        self.groups
                    )));
                }
                if self.qualifiers_per_group == 0 || self.qualifiers_per_group > smallest {
                    return Err(ConfigError::new(format!(
                        "qualifiers per group must be in 1..={smallest}"
                    )));
                }
                if self.groups * self.qualifiers_per_group < 2 {
                    return Err(ConfigError::new("knockout stage needs at least two qualifiers"));
                }
            }
            TournamentFormat::Hybrid => {
                if !(2..=team_count).contains(&self.playoff_teams) {
                    return Err(ConfigError::new(format!(
                        "playoff teams must be in 2..={team_count}"
                    )));
                }
            }
            TournamentFormat::RoundRobin | TournamentFormat::Knockout => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_sizes_are_checked() {
        let config = TournamentConfig {
            groups: 3,
            ..TournamentConfig::new(TournamentFormat::GroupStage)
        };
        assert!(config.validate(6).is_ok());
        assert!(config.validate(5).is_err());

        let config = TournamentConfig {
            qualifiers_per_group: 3,
            ..TournamentConfig::new(TournamentFormat::GroupStage)
        };
        assert!(config.validate(8).is_ok());
        assert!(config.validate(5).is_err());
    }

    #[test]
    fn playoffs_cannot_exceed_the_field() {
        let config = TournamentConfig::new(TournamentFormat::Hybrid);
        assert!(config.validate(4).is_ok());
        assert!(config.validate(3).is_err());
        assert!(TournamentConfig::default().validate(1).is_err());
    }

    #[test]
    fn config_loads_from_json() {
        let config: TournamentConfig = serde_json::from_str(
            r#"{"format": "knockout", "start_date": "2025-03-22", "tie_breakers": ["runs_for"]}"#,
        )
        .unwrap();
        assert_eq!(config.format, TournamentFormat::Knockout);
        assert_eq!(config.start_date, NaiveDate::from_ymd_opt(2025, 3, 22));
        assert_eq!(config.tie_breakers, vec![TieBreaker::RunsFor]);
        assert_eq!(config.playoff_teams, 4);
    }
}
