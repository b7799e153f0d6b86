use crate::{
    error::{ProcessorError, Result},
    model::constants::{DEFAULT_DEVIATION, DEFAULT_RATING, DEFAULT_TAU, DEFAULT_VOLATILITY}
};

/// Model constants: the starting triple handed to new players and
/// the system constant τ constraining volatility change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelConfig {
    pub rating: f64,
    pub deviation: f64,
    pub volatility: f64,
    pub tau: f64
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig::new(DEFAULT_RATING, DEFAULT_DEVIATION, DEFAULT_VOLATILITY, DEFAULT_TAU)
    }
}

impl ModelConfig {
    pub fn new(rating: f64, deviation: f64, volatility: f64, tau: f64) -> ModelConfig {
        ModelConfig {
            rating,
            deviation,
            volatility,
            tau
        }
    }

    pub fn validate(&self) -> Result<()> {
        let values = [
            ("rating", self.rating),
            ("deviation", self.deviation),
            ("volatility", self.volatility),
            ("tau", self.tau)
        ];

        if let Some((name, value)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ProcessorError::Configuration(format!(
                "{} must be a finite number, got {}",
                name, value
            )));
        }

        if self.deviation < 0.0 {
            return Err(ProcessorError::Configuration(format!(
                "deviation must not be negative, got {}",
                self.deviation
            )));
        }

        if self.volatility <= 0.0 {
            return Err(ProcessorError::Configuration(format!(
                "volatility must be positive, got {}",
                self.volatility
            )));
        }

        if self.tau <= 0.0 {
            return Err(ProcessorError::Configuration(format!(
                "tau must be positive, got {}",
                self.tau
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{error::ProcessorError, model::structures::model_config::ModelConfig};

    #[test]
    fn test_default_is_valid() {
        let config = ModelConfig::default();

        assert_eq!(config, ModelConfig::new(1200.0, 285.0, 0.06, 0.59));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_finite() {
        let config = ModelConfig::new(f64::NAN, 285.0, 0.06, 0.59);

        assert!(matches!(config.validate(), Err(ProcessorError::Configuration(_))));
    }

    #[test]
    fn test_rejects_non_positive_volatility_and_tau() {
        assert!(ModelConfig::new(1500.0, 350.0, 0.0, 0.5).validate().is_err());
        assert!(ModelConfig::new(1500.0, 350.0, 0.06, 0.0).validate().is_err());
        assert!(ModelConfig::new(1500.0, -1.0, 0.06, 0.5).validate().is_err());
    }
}
