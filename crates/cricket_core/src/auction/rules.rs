use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::{Player, MAX_OVERSEAS_IN_SQUAD, MAX_SQUAD_SIZE};

/// How a lot's opening price is set.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum BasePriceRule {
    /// Same price for every player.
    Fixed(f64),
    /// Tiered on the player's best discipline.
    #[default]
    ByRating,
}

impl BasePriceRule {
    pub fn price_for(&self, player: &Player) -> f64 {
        match *self {
            BasePriceRule::Fixed(price) => price,
            BasePriceRule::ByRating => match player.overall() {
                85..=u8::MAX => 2.0,
                70..=84 => 1.0,
                50..=69 => 0.5,
                _ => 0.2,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuctionRules {
    pub base_price: BasePriceRule,
    pub min_increment: f64,
    /// Countdown per lot, reset by every valid bid.
    pub bid_time_secs: f64,
    /// Per-player bid cap. A base price above it opens at the cap.
    pub max_bid: f64,
    pub max_squad_size: usize,
    pub max_overseas: usize,
    /// AI teams bid on their own when set.
    pub auto_bidding: bool,
    /// Bid units per rating point of a player's mean skill.
    pub valuation_scale: f64,
    /// Put unsold players up once more at a discount.
    pub reauction_unsold: bool,
    /// Base price multiplier for the re-auction round.
    pub reauction_discount: f64,
}

impl Default for AuctionRules {
    fn default() -> Self {
        Self {
            base_price: BasePriceRule::default(),
            min_increment: 0.5,
            bid_time_secs: 30.0,
            max_bid: 30.0,
            max_squad_size: MAX_SQUAD_SIZE,
            max_overseas: MAX_OVERSEAS_IN_SQUAD,
            auto_bidding: true,
            valuation_scale: 0.25,
            reauction_unsold: false,
            reauction_discount: 0.5,
        }
    }
}

impl AuctionRules {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_increment <= 0.0 {
            return Err(ConfigError::new("minimum increment must be positive"));
        }
        if self.bid_time_secs <= 0.0 {
            return Err(ConfigError::new("bid time must be positive"));
        }
        if self.max_bid <= 0.0 {
            return Err(ConfigError::new("maximum bid must be positive"));
        }
        if !(1..=MAX_SQUAD_SIZE).contains(&self.max_squad_size) {
            return Err(ConfigError::new(format!(
                "maximum squad size must be in 1..={MAX_SQUAD_SIZE}"
            )));
        }
        if self.max_overseas > MAX_OVERSEAS_IN_SQUAD {
            return Err(ConfigError::new(format!(
                "overseas cap cannot exceed {MAX_OVERSEAS_IN_SQUAD}"
            )));
        }
        if self.max_overseas > self.max_squad_size {
            return Err(ConfigError::new(format!(
                "overseas cap {} exceeds squad cap {}",
                self.max_overseas, self.max_squad_size
            )));
        }
        if self.valuation_scale <= 0.0 {
            return Err(ConfigError::new("valuation scale must be positive"));
        }
        if !(self.reauction_discount > 0.0 && self.reauction_discount <= 1.0) {
            return Err(ConfigError::new("re-auction discount must be in (0, 1]"));
        }
        if let BasePriceRule::Fixed(price) = self.base_price {
            if price < 0.0 {
                return Err(ConfigError::new("base price cannot be negative"));
            }
        }
        Ok(())
    }

    /// Opening price for a player, before any discount.
    pub fn base_price_for(&self, player: &Player) -> f64 {
        self.base_price.price_for(player)
    }
}
