use crate::config::{CulturePair, RelationCurve, RelationMultiplierConfig, ValuationConfig};
use crate::id::CultureId;

/// Which relation/culture constants a valuator reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiplierFamily {
    /// Clans weighing a join or a departure.
    Vassal,
    /// A kingdom weighing a new clan.
    Kingdom,
}

impl MultiplierFamily {
    pub fn relation(self, config: &ValuationConfig) -> &RelationMultiplierConfig {
        match self {
            MultiplierFamily::Vassal => &config.relation.vassal,
            MultiplierFamily::Kingdom => &config.relation.kingdom,
        }
    }

    pub fn culture(self, config: &ValuationConfig) -> &CulturePair {
        match self {
            MultiplierFamily::Vassal => &config.culture.vassal,
            MultiplierFamily::Kingdom => &config.culture.kingdom,
        }
    }
}

/// Convert a relation score into a bounded multiplier.
pub fn relation_multiplier(relation: f64, family: &RelationMultiplierConfig) -> f64 {
    let raw = match family.curve {
        RelationCurve::SignedSqrt {
            hostile_coefficient,
            friendly_coefficient,
        } => {
            let coefficient = if relation < 0.0 {
                hostile_coefficient
            } else {
                friendly_coefficient
            };
            1.0 + relation.abs().sqrt() * coefficient
        }
        RelationCurve::Linear { coefficient } => 1.0 + relation * coefficient,
    };
    // Not f64::clamp: an unvalidated config may carry min > max.
    raw.max(family.min).min(family.max)
}

pub fn culture_multiplier(a: CultureId, b: CultureId, pair: &CulturePair) -> f64 {
    if a == b { pair.matched } else { pair.mismatched }
}
