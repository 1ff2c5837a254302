//! Outcome probabilities for a single delivery.
//!
//! Every function here is pure: ratings and conditions in, weights out.
//! Layers are applied multiplicatively and the result is normalised once
//! before sampling, so the match engine only has to supply a uniform roll.

use super::ball::{BallResult, WicketKind};
use crate::models::{BattingApproach, BowlingStyle, MatchFormat, Pitch, Weather};

// ============================================================================
// Constants
// ============================================================================

const OUTCOMES: usize = BallResult::ALL.len();

/// Outcomes that carry runs off the bat; condition modifiers scale these.
const SCORING: [BallResult; 5] = [
    BallResult::One,
    BallResult::Two,
    BallResult::Three,
    BallResult::Four,
    BallResult::Six,
];

pub mod thresholds {
    pub const ELITE_BATTER: f64 = 80.0;
    pub const WEAK_BATTER: f64 = 60.0;
    pub const ELITE_BOWLER: f64 = 90.0;
    pub const STRONG_BOWLER: f64 = 80.0;
    pub const WEAK_BOWLER: f64 = 60.0;
    pub const STRONG_WIND_KMH: f64 = 15.0;
    pub const HIGH_HUMIDITY: f64 = 80.0;
    pub const POOR_VISIBILITY_KM: f64 = 1.0;
}

pub mod factors {
    pub const RAIN: f64 = 0.7;
    pub const WIND: f64 = 0.9;
    pub const EXTREME_TEMPERATURE: f64 = 0.8;
    pub const FAVOURABLE_PITCH_WICKET: f64 = 1.25;
    pub const BOUNCE_WICKET: f64 = 1.1;
    pub const SWING_WICKET: f64 = 1.1;
    pub const POOR_LIGHT_WICKET: f64 = 1.1;
    pub const SKILL_GAP_MIN: f64 = 0.25;
    pub const SKILL_GAP_MAX: f64 = 3.0;
}

// ============================================================================
// Distribution
// ============================================================================

/// Unnormalised weights over [`BallResult::ALL`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distribution {
    weights: [f64; OUTCOMES],
}

impl Distribution {
    pub fn from_weights(weights: [f64; OUTCOMES]) -> Self {
        Self { weights }
    }

    /// Format baseline. Custom formats borrow the nearest standard shape.
    pub fn baseline(format: MatchFormat) -> Self {
        // Dot, 1, 2, 3, 4, 6, W, Wd, Nb, B, Lb
        let weights = match format {
            MatchFormat::T20 => T20_BASELINE,
            MatchFormat::Odi => ODI_BASELINE,
            MatchFormat::Test => TEST_BASELINE,
            MatchFormat::Custom { overs } if overs <= 20 => T20_BASELINE,
            MatchFormat::Custom { overs } if overs <= 50 => ODI_BASELINE,
            MatchFormat::Custom { .. } => TEST_BASELINE,
        };
        Self { weights }
    }

    pub fn weight(&self, result: BallResult) -> f64 {
        self.weights[result.index()]
    }

    pub fn scale(&mut self, result: BallResult, factor: f64) {
        self.weights[result.index()] *= factor;
    }

    pub fn scale_scoring(&mut self, factor: f64) {
        for r in SCORING {
            self.scale(r, factor);
        }
    }

    pub fn total(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Rescale so the weights sum to one. A degenerate distribution
    /// collapses to a dot ball.
    pub fn normalised(mut self) -> Self {
        let total = self.total();
        if total <= 0.0 || !total.is_finite() {
            let mut weights = [0.0; OUTCOMES];
            weights[BallResult::Dot.index()] = 1.0;
            return Self { weights };
        }
        for w in &mut self.weights {
            *w /= total;
        }
        self
    }

    pub fn probability(&self, result: BallResult) -> f64 {
        let total = self.total();
        if total <= 0.0 {
            return 0.0;
        }
        self.weight(result) / total
    }

    /// Inverse-CDF sample for `roll` in `[0, 1)`.
    pub fn sample(&self, roll: f64) -> BallResult {
        let total = self.total();
        let mut target = roll.clamp(0.0, 1.0) * total;
        for r in BallResult::ALL {
            let w = self.weight(r);
            if target < w {
                return r;
            }
            target -= w;
        }
        // Rounding at the top edge: return the last outcome with mass.
        BallResult::ALL
            .iter()
            .rev()
            .copied()
            .find(|r| self.weight(*r) > 0.0)
            .unwrap_or(BallResult::Dot)
    }
}

const T20_BASELINE: [f64; OUTCOMES] = [
    0.320, 0.340, 0.080, 0.010, 0.110, 0.050, 0.045, 0.030, 0.005, 0.010, 0.010,
];
const ODI_BASELINE: [f64; OUTCOMES] = [
    0.450, 0.300, 0.070, 0.010, 0.080, 0.020, 0.030, 0.025, 0.004, 0.008, 0.008,
];
const TEST_BASELINE: [f64; OUTCOMES] = [
    0.640, 0.180, 0.050, 0.010, 0.070, 0.005, 0.020, 0.010, 0.004, 0.006, 0.006,
];

// ============================================================================
// Layers
// ============================================================================

/// Inputs for one delivery, already resolved to effective ratings.
#[derive(Debug, Clone, Copy)]
pub struct DeliveryContext {
    pub format: MatchFormat,
    pub batting: f64,
    pub approach: BattingApproach,
    pub bowling: f64,
    pub bowling_style: BowlingStyle,
    pub pitch: Pitch,
    pub weather: Weather,
    pub raining: bool,
}

pub fn apply_batter_approach(dist: &mut Distribution, approach: BattingApproach) {
    match approach {
        BattingApproach::Aggressive => {
            dist.scale(BallResult::Four, 1.3);
            dist.scale(BallResult::Six, 1.5);
            dist.scale(BallResult::Wicket, 1.4);
            dist.scale(BallResult::One, 0.8);
            dist.scale(BallResult::Two, 0.8);
        }
        BattingApproach::Attacking => {
            dist.scale(BallResult::Dot, 0.8);
            dist.scale(BallResult::One, 1.1);
            dist.scale(BallResult::Four, 1.2);
            dist.scale(BallResult::Six, 1.2);
        }
        BattingApproach::Balanced => {}
        BattingApproach::Defensive => {
            dist.scale(BallResult::Four, 0.7);
            dist.scale(BallResult::Six, 0.5);
            dist.scale(BallResult::Dot, 1.2);
            dist.scale(BallResult::One, 1.1);
            dist.scale(BallResult::Wicket, 0.7);
        }
    }
}

/// Strong bowlers take more wickets.
pub fn apply_bowler_quality(dist: &mut Distribution, bowling: f64) {
    if bowling > thresholds::ELITE_BOWLER {
        dist.scale(BallResult::Wicket, 1.5);
    } else if bowling > thresholds::STRONG_BOWLER {
        dist.scale(BallResult::Wicket, 1.3);
    }
}

/// Wicket mass follows the gap between bowler and batter.
pub fn skill_gap_factor(batting: f64, bowling: f64) -> f64 {
    (1.0 + (bowling - batting) / 100.0).clamp(factors::SKILL_GAP_MIN, factors::SKILL_GAP_MAX)
}

pub fn apply_skill_gap(dist: &mut Distribution, batting: f64, bowling: f64) {
    dist.scale(BallResult::Wicket, skill_gap_factor(batting, bowling));
}

pub fn apply_conditions(dist: &mut Distribution, ctx: &DeliveryContext) {
    if ctx.raining {
        dist.scale_scoring(factors::RAIN);
    }
    if ctx.weather.wind > thresholds::STRONG_WIND_KMH {
        dist.scale_scoring(factors::WIND);
    }
    if ctx.weather.is_extreme_temperature() {
        dist.scale_scoring(factors::EXTREME_TEMPERATURE);
    }

    match ctx.bowling_style {
        BowlingStyle::Spin => {
            if ctx.pitch.is_spinning() {
                dist.scale(BallResult::Wicket, factors::FAVOURABLE_PITCH_WICKET);
            }
        }
        BowlingStyle::Pace => {
            if ctx.pitch.is_seaming() {
                dist.scale(BallResult::Wicket, factors::FAVOURABLE_PITCH_WICKET);
            }
            if ctx.pitch.is_bouncy() {
                dist.scale(BallResult::Wicket, factors::BOUNCE_WICKET);
            }
            if ctx.weather.humidity > thresholds::HIGH_HUMIDITY {
                dist.scale(BallResult::Wicket, factors::SWING_WICKET);
            }
        }
    }

    if ctx.weather.visibility < thresholds::POOR_VISIBILITY_KM {
        dist.scale(BallResult::Wicket, factors::POOR_LIGHT_WICKET);
    }
}

/// Compose every layer and normalise.
pub fn outcome_distribution(ctx: &DeliveryContext) -> Distribution {
    let mut dist = Distribution::baseline(ctx.format);
    apply_batter_approach(&mut dist, ctx.approach);
    apply_bowler_quality(&mut dist, ctx.bowling);
    apply_skill_gap(&mut dist, ctx.batting, ctx.bowling);
    apply_conditions(&mut dist, ctx);
    dist.normalised()
}

// ============================================================================
// Post-sample adjustments
// ============================================================================

/// Net run shift on run-scoring balls from batter and bowler ratings.
pub fn run_adjustment(batting: f64, bowling: f64) -> i32 {
    let mut adj = 0;
    if batting > thresholds::ELITE_BATTER {
        adj += 1;
    } else if batting < thresholds::WEAK_BATTER {
        adj -= 1;
    }
    if bowling > thresholds::ELITE_BOWLER {
        adj -= 2;
    } else if bowling > thresholds::STRONG_BOWLER {
        adj -= 1;
    } else if bowling < thresholds::WEAK_BOWLER {
        adj += 1;
    }
    adj
}

/// Apply the run shift to running outcomes (1, 2, 3). Boundaries stay put.
pub fn adjust_runs(result: BallResult, adjustment: i32) -> BallResult {
    match result {
        BallResult::One | BallResult::Two | BallResult::Three => {
            let runs = (result.bat_runs() as i32 + adjustment).clamp(0, 3);
            BallResult::from_runs(runs as u32)
        }
        other => other,
    }
}

/// Chance that a catch goes down.
pub fn dropped_catch_probability(fielding: f64) -> f64 {
    ((100.0 - fielding) / 400.0).clamp(0.0, 0.25)
}

/// Dismissal mix. Stumpings only happen off spin.
pub fn wicket_kind_weights(style: BowlingStyle) -> [(WicketKind, f64); 5] {
    let stumped = match style {
        BowlingStyle::Spin => 0.05,
        BowlingStyle::Pace => 0.0,
    };
    [
        (WicketKind::Bowled, 0.20),
        (WicketKind::Caught, 0.55),
        (WicketKind::Lbw, 0.15),
        (WicketKind::RunOut, 0.05),
        (WicketKind::Stumped, stumped),
    ]
}

pub fn sample_wicket_kind(style: BowlingStyle, roll: f64) -> WicketKind {
    let weights = wicket_kind_weights(style);
    let total: f64 = weights.iter().map(|(_, w)| w).sum();
    let mut target = roll.clamp(0.0, 1.0) * total;
    for (kind, w) in weights {
        if target < w {
            return kind;
        }
        target -= w;
    }
    WicketKind::Caught
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neutral_ctx() -> DeliveryContext {
        DeliveryContext {
            format: MatchFormat::T20,
            batting: 50.0,
            approach: BattingApproach::Balanced,
            bowling: 50.0,
            bowling_style: BowlingStyle::Pace,
            pitch: Pitch::default(),
            weather: Weather::default(),
            raining: false,
        }
    }

    #[test]
    fn baselines_are_close_to_one() {
        for format in [MatchFormat::T20, MatchFormat::Odi, MatchFormat::Test] {
            let total = Distribution::baseline(format).total();
            assert!((total - 1.0).abs() < 0.02, "{format}: {total}");
        }
    }

    #[test]
    fn neutral_context_is_the_normalised_baseline() {
        let dist = outcome_distribution(&neutral_ctx());
        let base = Distribution::baseline(MatchFormat::T20).normalised();
        for r in BallResult::ALL {
            assert!((dist.weight(r) - base.weight(r)).abs() < 1e-12);
        }
        assert!((dist.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn aggressive_batters_hit_and_get_out_more() {
        let mut ctx = neutral_ctx();
        let balanced = outcome_distribution(&ctx);
        ctx.approach = BattingApproach::Aggressive;
        let aggressive = outcome_distribution(&ctx);

        assert!(aggressive.weight(BallResult::Six) > balanced.weight(BallResult::Six));
        assert!(aggressive.weight(BallResult::Wicket) > balanced.weight(BallResult::Wicket));
        assert!(aggressive.weight(BallResult::One) < balanced.weight(BallResult::One));
    }

    #[test]
    fn defensive_batters_protect_their_wicket() {
        let mut ctx = neutral_ctx();
        ctx.approach = BattingApproach::Defensive;
        let defensive = outcome_distribution(&ctx);
        let balanced = outcome_distribution(&neutral_ctx());
        assert!(defensive.weight(BallResult::Wicket) < balanced.weight(BallResult::Wicket));
        assert!(defensive.weight(BallResult::Dot) > balanced.weight(BallResult::Dot));
    }

    #[test]
    fn rain_suppresses_scoring() {
        let mut ctx = neutral_ctx();
        ctx.raining = true;
        let wet = outcome_distribution(&ctx);
        let dry = outcome_distribution(&neutral_ctx());
        assert!(wet.weight(BallResult::Four) < dry.weight(BallResult::Four));
        assert!(wet.weight(BallResult::Dot) > dry.weight(BallResult::Dot));
    }

    #[test]
    fn spinning_pitch_favours_spinners_only() {
        let mut ctx = neutral_ctx();
        ctx.pitch = Pitch::new(5, 2, 2, 8);
        let pace = outcome_distribution(&ctx);
        ctx.bowling_style = BowlingStyle::Spin;
        let spin = outcome_distribution(&ctx);
        assert!(spin.weight(BallResult::Wicket) > pace.weight(BallResult::Wicket));
    }

    #[test]
    fn skill_gap_is_clamped() {
        assert_eq!(skill_gap_factor(50.0, 50.0), 1.0);
        assert!(skill_gap_factor(1.0, 100.0) > 1.9);
        assert_eq!(skill_gap_factor(100.0, 1.0), factors::SKILL_GAP_MIN);
    }

    #[test]
    fn run_adjustment_combines_both_sides() {
        assert_eq!(run_adjustment(50.0, 50.0), 0);
        assert_eq!(run_adjustment(85.0, 50.0), 2);
        assert_eq!(run_adjustment(1.0, 100.0), -3);
        assert_eq!(adjust_runs(BallResult::Two, -3), BallResult::Dot);
        assert_eq!(adjust_runs(BallResult::Three, 2), BallResult::Three);
        assert_eq!(adjust_runs(BallResult::One, 1), BallResult::Two);
        assert_eq!(adjust_runs(BallResult::Six, -3), BallResult::Six);
    }

    #[test]
    fn sampling_covers_the_unit_interval() {
        let dist = Distribution::from_weights([0.5, 0.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(dist.sample(0.0), BallResult::Dot);
        assert_eq!(dist.sample(0.49), BallResult::Dot);
        assert_eq!(dist.sample(0.51), BallResult::One);
        assert_eq!(dist.sample(1.0), BallResult::One);
    }

    #[test]
    fn degenerate_distribution_collapses_to_dot() {
        let dist = Distribution::from_weights([0.0; 11]).normalised();
        assert_eq!(dist.weight(BallResult::Dot), 1.0);
    }

    #[test]
    fn pace_never_produces_stumpings() {
        for i in 0..100 {
            let roll = i as f64 / 100.0;
            assert_ne!(sample_wicket_kind(BowlingStyle::Pace, roll), WicketKind::Stumped);
        }
        assert_eq!(sample_wicket_kind(BowlingStyle::Spin, 0.999), WicketKind::Stumped);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn composed_distribution_is_normalised(
                batting in 1.0f64..=100.0,
                bowling in 1.0f64..=100.0,
                raining in any::<bool>(),
                wind in 0.0f64..40.0,
            ) {
                let mut ctx = neutral_ctx();
                ctx.batting = batting;
                ctx.bowling = bowling;
                ctx.raining = raining;
                ctx.weather.wind = wind;
                let dist = outcome_distribution(&ctx);
                prop_assert!((dist.total() - 1.0).abs() < 1e-9);
                for r in BallResult::ALL {
                    prop_assert!(dist.weight(r) >= 0.0);
                }
            }
        }
    }
}
