use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const PITCH_MIN: u8 = 1;
const PITCH_MAX: u8 = 10;
const EXTREME_COLD_C: f64 = 10.0;
const EXTREME_HEAT_C: f64 = 38.0;

/// Surface descriptor, every dimension on a 1-10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pitch {
    pub hardness: u8,
    pub moisture: u8,
    pub grass: u8,
    pub wear: u8,
}

impl Default for Pitch {
    fn default() -> Self {
        Self {
            hardness: 5,
            moisture: 5,
            grass: 5,
            wear: 1,
        }
    }
}

impl Pitch {
    pub fn new(hardness: u8, moisture: u8, grass: u8, wear: u8) -> Self {
        Self {
            hardness,
            moisture,
            grass,
            wear,
        }
    }

    /// Worn or dry, bare surfaces turn.
    pub fn is_spinning(&self) -> bool {
        self.wear >= 6 || (self.moisture <= 3 && self.grass <= 3)
    }

    /// Grass or moisture helps the seamers.
    pub fn is_seaming(&self) -> bool {
        self.grass >= 6 || self.moisture >= 7
    }

    pub fn is_bouncy(&self) -> bool {
        self.hardness >= 7
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (label, value) in [
            ("hardness", self.hardness),
            ("moisture", self.moisture),
            ("grass", self.grass),
            ("wear", self.wear),
        ] {
            if !(PITCH_MIN..=PITCH_MAX).contains(&value) {
                return Err(ConfigError::new(format!(
                    "pitch {label} {value} outside {PITCH_MIN}..={PITCH_MAX}"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    /// Celsius.
    pub temperature: f64,
    /// Relative humidity, percent.
    pub humidity: f64,
    /// km/h.
    pub wind: f64,
    /// 0.0-1.0.
    pub rain_probability: f64,
    /// Kilometres.
    pub visibility: f64,
}

impl Default for Weather {
    fn default() -> Self {
        Self {
            temperature: 26.0,
            humidity: 55.0,
            wind: 8.0,
            rain_probability: 0.0,
            visibility: 10.0,
        }
    }
}

impl Weather {
    pub fn is_extreme_temperature(&self) -> bool {
        self.temperature < EXTREME_COLD_C || self.temperature > EXTREME_HEAT_C
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.rain_probability) {
            return Err(ConfigError::new(format!(
                "rain probability {} outside 0..=1",
                self.rain_probability
            )));
        }
        if !(0.0..=100.0).contains(&self.humidity) {
            return Err(ConfigError::new(format!("humidity {} outside 0..=100", self.humidity)));
        }
        if self.wind < 0.0 || self.visibility < 0.0 {
            return Err(ConfigError::new("wind and visibility must be non-negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub name: String,
    pub capacity: u32,
    #[serde(default)]
    pub pitch: Pitch,
    #[serde(default)]
    pub weather: Weather,
}

impl Venue {
    pub fn new(name: impl Into<String>, capacity: u32) -> Self {
        Self {
            name: name.into(),
            capacity,
            pitch: Pitch::default(),
            weather: Weather::default(),
        }
    }

    pub fn with_pitch(mut self, pitch: Pitch) -> Self {
        self.pitch = pitch;
        self
    }

    pub fn with_weather(mut self, weather: Weather) -> Self {
        self.weather = weather;
        self
    }

    /// Age the surface after a match: wear only ever grows, moisture dries out.
    pub fn record_match(&mut self) {
        self.pitch.wear = (self.pitch.wear + 1).min(PITCH_MAX);
        self.pitch.moisture = self.pitch.moisture.saturating_sub(1).max(PITCH_MIN);
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::new("venue name cannot be empty"));
        }
        self.pitch.validate()?;
        self.weather.validate()
    }
}
