//! League files: teams, venues, the auction pool and the three rule sets.

use std::path::Path;

use anyhow::{Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

use cricket_core::auction::{AuctionRules, BidStrategy};
use cricket_core::engine::MatchConfig;
use cricket_core::models::{
    BattingApproach, BowlingStyle, Nationality, Pitch, Player, Role, Team, Venue, Weather,
};
use cricket_core::rng::rng_from_seed;
use cricket_core::tournament::TournamentConfig;

const CITIES: [&str; 8] = [
    "Chennai", "Mumbai", "Kolkata", "Delhi", "Bangalore", "Hyderabad", "Jaipur", "Mohali",
];
const SQUAD_SIZE: usize = 18;
const OVERSEAS_PER_SQUAD: usize = 3;
const POOL_SIZE: usize = 30;
const DEFAULT_PURSE: f64 = 90.0;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct League {
    pub teams: Vec<Team>,
    pub venues: Vec<Venue>,
    /// Players up for auction.
    pub pool: Vec<Player>,
    /// Bidding style per team, in team order. Missing entries are filled in.
    pub strategies: Vec<BidStrategy>,
    pub match_config: MatchConfig,
    pub auction: AuctionRules,
    pub tournament: TournamentConfig,
}

impl League {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read league file {}", path.display()))?;
        let league: League = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse league file {}", path.display()))?;
        if league.teams.len() < 2 {
            anyhow::bail!("league file {} needs at least two teams", path.display());
        }
        if league.venues.is_empty() {
            anyhow::bail!("league file {} lists no venues", path.display());
        }
        Ok(league)
    }

    /// A deterministic eight-team league built from `seed`.
    pub fn demo(seed: u64) -> Self {
        let mut rng = rng_from_seed(seed);

        let teams = CITIES
            .iter()
            .map(|city| {
                let mut team = Team::new(*city, DEFAULT_PURSE);
                for i in 0..SQUAD_SIZE {
                    let nationality = if i < OVERSEAS_PER_SQUAD {
                        Nationality::Overseas
                    } else {
                        Nationality::Local
                    };
                    team.squad
                        .push(random_player(&mut rng, format!("{city} #{}", i + 1), role_for(i), nationality));
                }
                team
            })
            .collect();

        let pool = (0..POOL_SIZE)
            .map(|i| {
                let nationality = if i % 3 == 0 {
                    Nationality::Overseas
                } else {
                    Nationality::Local
                };
                random_player(&mut rng, format!("Prospect #{}", i + 1), role_for(i % SQUAD_SIZE), nationality)
            })
            .collect();

        let venues = vec![
            Venue::new("Chepauk", 38_000).with_pitch(Pitch::new(4, 3, 2, 4)),
            Venue::new("Wankhede", 33_000).with_pitch(Pitch::new(7, 4, 6, 1)),
            Venue::new("Eden Gardens", 66_000).with_weather(Weather {
                humidity: 85.0,
                rain_probability: 0.1,
                ..Weather::default()
            }),
        ];

        Self {
            teams,
            venues,
            pool,
            strategies: Vec::new(),
            match_config: MatchConfig::default(),
            auction: AuctionRules::default(),
            tournament: TournamentConfig::default(),
        }
    }

    /// One strategy per team. Gaps cycle through the AI styles.
    pub fn strategies(&self) -> Vec<BidStrategy> {
        const CYCLE: [BidStrategy; 4] = [
            BidStrategy::Aggressive,
            BidStrategy::Balanced,
            BidStrategy::Conservative,
            BidStrategy::Wildcard,
        ];
        (0..self.teams.len())
            .map(|i| {
                self.strategies
                    .get(i)
                    .copied()
                    .unwrap_or(CYCLE[i % CYCLE.len()])
            })
            .collect()
    }
}

fn role_for(slot: usize) -> Role {
    match slot {
        0 => Role::WicketKeeper,
        1 => Role::Captain,
        2..=7 => Role::Bowler,
        8..=10 => Role::AllRounder,
        _ => Role::Batsman,
    }
}

fn random_player<R: Rng>(rng: &mut R, name: String, role: Role, nationality: Nationality) -> Player {
    let (batting, bowling) = match role {
        Role::Bowler => (rng.gen_range(15..=45), rng.gen_range(55..=92)),
        Role::AllRounder => (rng.gen_range(50..=80), rng.gen_range(50..=80)),
        _ => (rng.gen_range(55..=92), rng.gen_range(10..=35)),
    };
    let approach = match rng.gen_range(0..4) {
        0 => BattingApproach::Aggressive,
        1 => BattingApproach::Attacking,
        2 => BattingApproach::Defensive,
        _ => BattingApproach::Balanced,
    };
    let style = if rng.gen_bool(0.4) {
        BowlingStyle::Spin
    } else {
        BowlingStyle::Pace
    };
    Player::new(name, role, nationality)
        .with_skills(batting, bowling, rng.gen_range(40..=90))
        .with_approach(approach)
        .with_bowling_style(style)
        .with_age(rng.gen_range(19..=36))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn demo_league_is_deterministic_and_playable() {
        let a = League::demo(7);
        let b = League::demo(7);
        assert_eq!(a.teams, b.teams);
        assert_eq!(a.pool, b.pool);
        assert_ne!(League::demo(8).teams, a.teams);

        for team in &a.teams {
            assert!(team.validate_squad().is_ok());
            let mut team = team.clone();
            assert!(team.ensure_lineup().is_ok());
        }
        assert!(a.pool.iter().all(|p| p.validate().is_ok()));
    }

    #[test]
    fn missing_strategies_are_cycled() {
        let mut league = League::demo(1);
        league.strategies = vec![BidStrategy::Human];
        let s = league.strategies();
        assert_eq!(s.len(), 8);
        assert_eq!(s[0], BidStrategy::Human);
        assert_eq!(s[1], BidStrategy::Balanced);
        assert_eq!(s[2], BidStrategy::Conservative);
        assert_eq!(s[3], BidStrategy::Wildcard);
        assert_eq!(s[4], BidStrategy::Aggressive);
    }

    #[test]
    fn league_file_round_trips() {
        let league = League::demo(3);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&league).unwrap().as_bytes())
            .unwrap();

        let loaded = League::load(file.path()).unwrap();
        assert_eq!(loaded.teams, league.teams);
        assert_eq!(loaded.venues, league.venues);
    }

    #[test]
    fn league_file_without_teams_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"venues": []}"#).unwrap();
        assert!(League::load(file.path()).is_err());
    }
}
