//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::collections::BTreeMap;

use cricket_core::engine::{BallEvent, MatchConfig, MatchEngine};
use cricket_core::models::{
    BattingApproach, MatchFormat, Nationality, Player, Role, Team, Venue,
};

pub fn role_for(slot: usize) -> Role {
    match slot {
        0 => Role::WicketKeeper,
        1..=5 => Role::Bowler,
        6..=7 => Role::AllRounder,
        _ => Role::Batsman,
    }
}

/// Eighteen-man squad with every rating at `skill`, XI already picked.
pub fn uniform_team(name: &str, skill: u8) -> Team {
    team_with(name, |_, p| p.with_skills(skill, skill, skill))
}

/// Squad whose players are shaped by `shape(slot, player)`.
pub fn team_with<F>(name: &str, shape: F) -> Team
where
    F: Fn(usize, Player) -> Player,
{
    let mut team = Team::new(name, 100.0);
    for i in 0..18 {
        let player = Player::new(format!("{name} {i}"), role_for(i), Nationality::Local);
        team.squad.push(shape(i, player));
    }
    team.select_playing_xi().expect("fixture squad has a valid XI");
    team
}

/// Batters rated 1 and swinging at everything.
pub fn hopeless_batting(name: &str) -> Team {
    team_with(name, |_, p| {
        p.with_skills(1, 50, 50)
            .with_approach(BattingApproach::Aggressive)
    })
}

/// Every bowler rated 100.
pub fn elite_bowling(name: &str) -> Team {
    team_with(name, |_, p| p.with_skills(50, 100, 100))
}

pub fn venue() -> Venue {
    Venue::new("Feroz Shah Kotla", 41_000)
}

pub fn config(format: MatchFormat) -> MatchConfig {
    MatchConfig::new(format)
}

pub fn play(team1: &Team, team2: &Team, config: MatchConfig, seed: u64) -> MatchEngine {
    let mut engine = MatchEngine::initialise_with_seed(team1, team2, &venue(), config, seed)
        .expect("fixture teams are valid");
    engine.simulate_match().expect("match runs to completion");
    engine
}

/// Bowler of every over, keyed by (innings, over).
pub fn over_bowlers(history: &[BallEvent]) -> BTreeMap<(u32, u32), String> {
    history
        .iter()
        .map(|b| ((b.innings, b.over), b.bowler.clone()))
        .collect()
}

pub fn overseas_player(name: &str) -> Player {
    Player::new(name, Role::Batsman, Nationality::Overseas)
}
