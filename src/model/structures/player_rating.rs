use serde::Serialize;

use crate::model::{
    constants::{
        DEVIATION_CEILING, DEVIATION_FLOOR, RATING_CEILING, RATING_FLOOR, VOLATILITY_CEILING, VOLATILITY_FLOOR
    },
    structures::model_config::ModelConfig
};

/// Mutable rating state of a single player, addressed by the player's dense index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerRating {
    pub rating: f64,
    pub deviation: f64,
    pub volatility: f64,
    /// Whether the player has appeared in any processed match
    pub active: bool
}

impl PlayerRating {
    pub fn initial(config: &ModelConfig) -> PlayerRating {
        PlayerRating {
            rating: config.rating,
            deviation: config.deviation,
            volatility: config.volatility,
            active: false
        }
    }

    /// Bounds the triple to the committed range:
    /// rating in [0, 3000], deviation in [0, 400], volatility in (0, 0.1]
    pub fn clamped(self) -> PlayerRating {
        PlayerRating {
            rating: self.rating.clamp(RATING_FLOOR, RATING_CEILING),
            deviation: self.deviation.clamp(DEVIATION_FLOOR, DEVIATION_CEILING),
            volatility: self.volatility.clamp(VOLATILITY_FLOOR, VOLATILITY_CEILING),
            active: self.active
        }
    }
}
