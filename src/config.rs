//! Coefficients for every valuation family.
//!
//! Loaded from `valuation_config.json` (embedded) or from a host-supplied file.
//! Vassal transitions and kingdom acquisition each read their own
//! relation/culture family; the two must never be interchanged.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const BUILTIN_VALUATION_CONFIG: &str = include_str!("data/valuation_config.json");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read valuation config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse valuation config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid valuation config: {0}")]
    Invalid(String),
}

/// Root configuration for the valuation engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationConfig {
    pub relation: RelationFamilies,
    pub culture: CultureFamilies,
    pub settlement: SettlementConfig,
    pub strength: StrengthConfig,
    pub join: JoinConfig,
    pub leave: LeaveConfig,
    pub acquire: AcquireConfig,
    pub barter: BarterConfig,
    pub war_outlook: WarOutlookConfig,
}

impl ValuationConfig {
    pub fn builtin() -> Self {
        serde_json::from_str(BUILTIN_VALUATION_CONFIG)
            .expect("builtin valuation config should parse")
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ValuationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ValuationConfig::from_json_str(&contents)
    }

    /// Reject configurations that would break the bounded-multiplier invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, rel) in [
            ("relation.vassal", &self.relation.vassal),
            ("relation.kingdom", &self.relation.kingdom),
        ] {
            if !(rel.min > 0.0 && rel.min <= rel.max) {
                return Err(ConfigError::Invalid(format!(
                    "{name}: bounds [{}, {}] must be positive and ordered",
                    rel.min, rel.max
                )));
            }
        }
        for (name, pair) in [
            ("culture.vassal", &self.culture.vassal),
            ("culture.kingdom", &self.culture.kingdom),
        ] {
            if pair.matched <= pair.mismatched {
                return Err(ConfigError::Invalid(format!(
                    "{name}: matched multiplier {} must exceed mismatched {}",
                    pair.matched, pair.mismatched
                )));
            }
        }
        let s = &self.settlement;
        if s.neighbor_count == 0 {
            return Err(ConfigError::Invalid(
                "settlement.neighbor_count must be at least 1".to_string(),
            ));
        }
        if !(s.min_proximity > 0.0 && s.min_proximity <= s.max_proximity) {
            return Err(ConfigError::Invalid(format!(
                "settlement: proximity bounds [{}, {}] must be positive and ordered",
                s.min_proximity, s.max_proximity
            )));
        }
        let a = &self.acquire;
        if !(a.min_power_factor > 0.0 && a.min_power_factor <= a.max_power_factor) {
            return Err(ConfigError::Invalid(format!(
                "acquire: power factor bounds [{}, {}] must be positive and ordered",
                a.min_power_factor, a.max_power_factor
            )));
        }
        if self.leave.cooldown_days <= 0.0 {
            return Err(ConfigError::Invalid(
                "leave.cooldown_days must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Shape of the relation-to-multiplier curve before clamping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "curve", rename_all = "snake_case")]
pub enum RelationCurve {
    /// `1 + sqrt(|r|) * (hostile if r < 0 else friendly)`
    SignedSqrt {
        hostile_coefficient: f64,
        friendly_coefficient: f64,
    },
    /// `1 + r * coefficient`
    Linear { coefficient: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelationMultiplierConfig {
    #[serde(flatten)]
    pub curve: RelationCurve,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationFamilies {
    pub vassal: RelationMultiplierConfig,
    pub kingdom: RelationMultiplierConfig,
}

impl Default for RelationFamilies {
    fn default() -> Self {
        Self {
            vassal: RelationMultiplierConfig {
                curve: RelationCurve::SignedSqrt {
                    hostile_coefficient: -0.06,
                    friendly_coefficient: 0.04,
                },
                min: 0.5,
                max: 2.0,
            },
            kingdom: RelationMultiplierConfig {
                curve: RelationCurve::Linear { coefficient: 0.02 },
                min: 0.33,
                max: 2.0,
            },
        }
    }
}

/// Multiplier selected by whether two cultures are equal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CulturePair {
    pub matched: f64,
    pub mismatched: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CultureFamilies {
    pub vassal: CulturePair,
    pub kingdom: CulturePair,
}

impl Default for CultureFamilies {
    fn default() -> Self {
        Self {
            vassal: CulturePair {
                matched: 1.15,
                mismatched: 0.85,
            },
            kingdom: CulturePair {
                matched: 2.0,
                mismatched: 1.0,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementConfig {
    /// How many same-faction neighbors enter the mean distance.
    pub neighbor_count: usize,
    /// Proximity factor floor; also used for settlements with no same-faction neighbor.
    pub min_proximity: f64,
    pub max_proximity: f64,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            neighbor_count: 6,
            min_proximity: 0.25,
            max_proximity: 4.0,
        }
    }
}

/// Clan strength as used by every valuator: `(total + per_hero * heroes) * scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrengthConfig {
    pub per_hero: f64,
    pub scale: f64,
}

impl Default for StrengthConfig {
    fn default() -> Self {
        Self {
            per_hero: 150.0,
            scale: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinConfig {
    pub fortification_share: f64,
    pub crowding_penalty_per_hero_squared: f64,
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            fortification_share: 0.3,
            crowding_penalty_per_hero_squared: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaveConfig {
    pub town_penalty_base: f64,
    pub town_penalty_per_town: f64,
    pub cooldown_scale: f64,
    /// Days after a faction change at which the cooldown penalty reaches zero.
    pub cooldown_days: f64,
}

impl Default for LeaveConfig {
    fn default() -> Self {
        Self {
            town_penalty_base: 40_000.0,
            town_penalty_per_town: 20_000.0,
            cooldown_scale: 2000.0,
            cooldown_days: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquireConfig {
    pub settlement_share: f64,
    /// Clamp applied to `sqrt(power ratio)` before inverting it.
    pub min_power_factor: f64,
    pub max_power_factor: f64,
}

impl Default for AcquireConfig {
    fn default() -> Self {
        Self {
            settlement_share: 0.1,
            min_power_factor: 0.4,
            max_power_factor: 2.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarterConfig {
    /// Value reported to parties for whom an offer cannot apply.
    pub unavailable_value: f64,
    pub bystander_reward: f64,
    pub ally_penalty: f64,
    pub enemy_reward: f64,
}

impl Default for BarterConfig {
    fn default() -> Self {
        Self {
            unavailable_value: -1_000_000.0,
            bystander_reward: 0.01,
            ally_penalty: -0.5,
            enemy_reward: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarOutlookConfig {
    pub enabled: bool,
    pub renown_weight: f64,
    pub raid_weight: f64,
    pub siege_weight: f64,
    pub casualty_weight: f64,
    pub max_multiplier: f64,
}

impl Default for WarOutlookConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            renown_weight: 1.0,
            raid_weight: 50.0,
            siege_weight: 300.0,
            casualty_weight: 1.0,
            max_multiplier: 1.5,
        }
    }
}
