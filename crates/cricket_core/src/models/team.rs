use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{Player, Role};
use crate::error::ConfigError;

pub const PLAYING_XI_SIZE: usize = 11;
pub const MIN_SQUAD_SIZE: usize = 18;
pub const MAX_SQUAD_SIZE: usize = 25;
pub const MAX_OVERSEAS_IN_SQUAD: usize = 8;
pub const MAX_OVERSEAS_IN_XI: usize = 4;
/// Specialist bowlers picked first by automatic selection.
const SELECTED_BOWLERS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub squad: Vec<Player>,
    #[serde(default)]
    pub playing_xi: Vec<String>,
    #[serde(default)]
    pub batting_order: Vec<String>,
    #[serde(default)]
    pub bowling_order: Vec<String>,
    #[serde(default)]
    pub captain: Option<String>,
    #[serde(default)]
    pub vice_captain: Option<String>,
    /// Purse balance in auction units.
    #[serde(default)]
    pub budget: f64,
}

impl Team {
    pub fn new(name: impl Into<String>, budget: f64) -> Self {
        Self {
            name: name.into(),
            squad: Vec::new(),
            playing_xi: Vec::new(),
            batting_order: Vec::new(),
            bowling_order: Vec::new(),
            captain: None,
            vice_captain: None,
            budget,
        }
    }

    pub fn player(&self, name: &str) -> Option<&Player> {
        self.squad.iter().find(|p| p.name == name)
    }

    pub fn player_mut(&mut self, name: &str) -> Option<&mut Player> {
        self.squad.iter_mut().find(|p| p.name == name)
    }

    pub fn overseas_count(&self) -> usize {
        self.squad.iter().filter(|p| p.is_overseas()).count()
    }

    pub fn add_player(&mut self, player: Player) -> Result<(), ConfigError> {
        if self.player(&player.name).is_some() {
            return Err(ConfigError::new(format!(
                "{} already in {}",
                player.name, self.name
            )));
        }
        if self.squad.len() >= MAX_SQUAD_SIZE {
            return Err(ConfigError::new(format!("{} squad is full", self.name)));
        }
        if player.is_overseas() && self.overseas_count() >= MAX_OVERSEAS_IN_SQUAD {
            return Err(ConfigError::new(format!(
                "{} already holds {MAX_OVERSEAS_IN_SQUAD} overseas players",
                self.name
            )));
        }
        self.squad.push(player);
        Ok(())
    }

    /// Remove a player from the squad and from every lineup slot.
    pub fn remove_player(&mut self, name: &str) -> Option<Player> {
        let idx = self.squad.iter().position(|p| p.name == name)?;
        self.playing_xi.retain(|n| n != name);
        self.batting_order.retain(|n| n != name);
        self.bowling_order.retain(|n| n != name);
        if self.captain.as_deref() == Some(name) {
            self.captain = None;
        }
        if self.vice_captain.as_deref() == Some(name) {
            self.vice_captain = None;
        }
        Some(self.squad.remove(idx))
    }

    pub fn validate_squad(&self) -> Result<(), ConfigError> {
        if !(MIN_SQUAD_SIZE..=MAX_SQUAD_SIZE).contains(&self.squad.len()) {
            return Err(ConfigError::new(format!(
                "{} squad has {} players, expected {MIN_SQUAD_SIZE}..={MAX_SQUAD_SIZE}",
                self.name,
                self.squad.len()
            )));
        }
        if self.overseas_count() > MAX_OVERSEAS_IN_SQUAD {
            return Err(ConfigError::new(format!(
                "{} squad has {} overseas players, max {MAX_OVERSEAS_IN_SQUAD}",
                self.name,
                self.overseas_count()
            )));
        }
        let mut seen = HashSet::new();
        for player in &self.squad {
            player.validate()?;
            if !seen.insert(player.name.as_str()) {
                return Err(ConfigError::new(format!(
                    "{} listed twice in {}",
                    player.name, self.name
                )));
            }
        }
        Ok(())
    }

    /// Check the match-day lineup. Returns a human readable reason on failure.
    pub fn validate_lineup(&self) -> Result<(), String> {
        if self.playing_xi.len() != PLAYING_XI_SIZE {
            return Err(format!(
                "{} playing XI has {} players",
                self.name,
                self.playing_xi.len()
            ));
        }

        let xi: HashSet<&str> = self.playing_xi.iter().map(String::as_str).collect();
        if xi.len() != PLAYING_XI_SIZE {
            return Err(format!("{} playing XI repeats a player", self.name));
        }

        let mut overseas = 0;
        for name in &self.playing_xi {
            let player = self
                .player(name)
                .ok_or_else(|| format!("{name} is not in the {} squad", self.name))?;
            if player.is_injured() {
                return Err(format!("{name} is injured"));
            }
            if player.is_overseas() {
                overseas += 1;
            }
        }
        if overseas > MAX_OVERSEAS_IN_XI {
            return Err(format!(
                "{} fields {overseas} overseas players, max {MAX_OVERSEAS_IN_XI}",
                self.name
            ));
        }

        match self.captain.as_deref() {
            Some(c) if xi.contains(c) => {}
            Some(c) => return Err(format!("captain {c} is not in the playing XI")),
            None => return Err(format!("{} has no captain", self.name)),
        }
        if let Some(vc) = self.vice_captain.as_deref() {
            if !xi.contains(vc) {
                return Err(format!("vice-captain {vc} is not in the playing XI"));
            }
            if self.captain.as_deref() == Some(vc) {
                return Err("captain and vice-captain must differ".to_string());
            }
        }

        let order: HashSet<&str> = self.batting_order.iter().map(String::as_str).collect();
        if self.batting_order.len() != PLAYING_XI_SIZE || order != xi {
            return Err(format!(
                "{} batting order is not a permutation of the XI",
                self.name
            ));
        }

        if self.bowling_order.is_empty() {
            return Err(format!("{} has no bowlers", self.name));
        }
        for name in &self.bowling_order {
            if !xi.contains(name.as_str()) {
                return Err(format!("bowler {name} is not in the playing XI"));
            }
            if !self.player(name).map(Player::can_bowl).unwrap_or(false) {
                return Err(format!("{name} is not a bowler"));
            }
        }

        Ok(())
    }

    /// Pick the strongest eligible XI and derive orders and leadership.
    ///
    /// Keeper first, then the specialist bowlers, then the best remaining
    /// players, always within the overseas limit. The current captain is
    /// kept when selected.
    pub fn select_playing_xi(&mut self) -> Result<(), ConfigError> {
        let mut available: Vec<&Player> = self.squad.iter().filter(|p| !p.is_injured()).collect();
        if available.len() < PLAYING_XI_SIZE {
            return Err(ConfigError::new(format!(
                "{} has only {} fit players",
                self.name,
                available.len()
            )));
        }
        available.sort_by(|a, b| b.overall().cmp(&a.overall()));

        let mut picked: Vec<&Player> = Vec::with_capacity(PLAYING_XI_SIZE);

        let keeper = available
            .iter()
            .filter(|p| p.role == Role::WicketKeeper)
            .max_by_key(|p| p.skills.batting as u16 + p.skills.fielding as u16)
            .copied();
        if let Some(k) = keeper {
            if admissible(k, &picked) {
                picked.push(k);
            }
        }

        let mut bowlers: Vec<&Player> = available.iter().filter(|p| p.can_bowl()).copied().collect();
        bowlers.sort_by(|a, b| b.skills.bowling.cmp(&a.skills.bowling));
        let mut taken = 0;
        for b in bowlers {
            if taken >= SELECTED_BOWLERS {
                break;
            }
            if admissible(b, &picked) {
                picked.push(b);
                taken += 1;
            }
        }

        for &p in &available {
            if admissible(p, &picked) {
                picked.push(p);
            }
        }

        if picked.len() < PLAYING_XI_SIZE {
            return Err(ConfigError::new(format!(
                "{} cannot field {PLAYING_XI_SIZE} players within the overseas limit",
                self.name
            )));
        }

        let mut batting: Vec<&Player> = picked.clone();
        batting.sort_by(|a, b| b.skills.batting.cmp(&a.skills.batting));
        let mut bowling: Vec<&Player> = picked.iter().filter(|p| p.can_bowl()).copied().collect();
        bowling.sort_by(|a, b| b.skills.bowling.cmp(&a.skills.bowling));

        let xi: Vec<String> = picked.iter().map(|p| p.name.clone()).collect();
        let batting_order: Vec<String> = batting.iter().map(|p| p.name.clone()).collect();
        let bowling_order: Vec<String> = bowling.iter().map(|p| p.name.clone()).collect();
        if bowling_order.is_empty() {
            return Err(ConfigError::new(format!("{} has no fit bowlers", self.name)));
        }

        let captain = self
            .captain
            .clone()
            .filter(|c| xi.contains(c))
            .or_else(|| picked.iter().find(|p| p.role == Role::Captain).map(|p| p.name.clone()))
            .or_else(|| batting_order.first().cloned());
        let vice_captain = self
            .vice_captain
            .clone()
            .filter(|vc| xi.contains(vc) && Some(vc) != captain.as_ref())
            .or_else(|| batting_order.iter().find(|n| Some(*n) != captain.as_ref()).cloned());

        self.playing_xi = xi;
        self.batting_order = batting_order;
        self.bowling_order = bowling_order;
        self.captain = captain;
        self.vice_captain = vice_captain;
        Ok(())
    }

    /// Advance every injury recovery counter by one match.
    pub fn advance_injuries(&mut self) {
        for player in &mut self.squad {
            player.recover_one_match();
        }
    }

    /// Keep the current lineup if it is still valid, otherwise reselect.
    pub fn ensure_lineup(&mut self) -> Result<(), ConfigError> {
        if self.validate_lineup().is_ok() {
            return Ok(());
        }
        self.select_playing_xi()
    }
}

/// Whether `p` can join a partially picked XI.
fn admissible(p: &Player, picked: &[&Player]) -> bool {
    if picked.len() >= PLAYING_XI_SIZE || picked.iter().any(|q| q.name == p.name) {
        return false;
    }
    let overseas = picked.iter().filter(|q| q.is_overseas()).count();
    !(p.is_overseas() && overseas >= MAX_OVERSEAS_IN_XI)
}
