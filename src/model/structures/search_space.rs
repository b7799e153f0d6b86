use clap::ValueEnum;
use strum_macros::{Display, EnumIter};

use crate::{
    error::{ProcessorError, Result},
    model::structures::model_config::ModelConfig
};

/// A model constant the optimizer is allowed to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Hyperparameter {
    InitialRating,
    InitialDeviation,
    InitialVolatility,
    Tau
}

impl Hyperparameter {
    /// Valid domain used to project candidate points.
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            Hyperparameter::InitialRating => (1200.0, 2500.0),
            Hyperparameter::InitialDeviation => (50.0, 450.0),
            Hyperparameter::InitialVolatility => (0.04, 0.1),
            Hyperparameter::Tau => (0.1, 1.5)
        }
    }

    pub fn project(&self, value: f64) -> f64 {
        let (low, high) = self.bounds();
        value.clamp(low, high)
    }

    fn apply(&self, config: &mut ModelConfig, value: f64) {
        match self {
            Hyperparameter::InitialRating => config.rating = value,
            Hyperparameter::InitialDeviation => config.deviation = value,
            Hyperparameter::InitialVolatility => config.volatility = value,
            Hyperparameter::Tau => config.tau = value
        }
    }
}

/// Which hyperparameters a search varies. Everything else is taken from the base config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SearchSpace {
    /// Vector `[deviation, tau]`
    #[default]
    DeviationTau,
    /// Vector `[rating, deviation, volatility, tau]`
    Full
}

impl SearchSpace {
    pub fn dimensions(&self) -> &'static [Hyperparameter] {
        match self {
            SearchSpace::DeviationTau => &[Hyperparameter::InitialDeviation, Hyperparameter::Tau],
            SearchSpace::Full => &[
                Hyperparameter::InitialRating,
                Hyperparameter::InitialDeviation,
                Hyperparameter::InitialVolatility,
                Hyperparameter::Tau
            ]
        }
    }

    /// The simplex the search starts from, one more vertex than dimensions.
    pub fn start_simplex(&self) -> Vec<Vec<f64>> {
        match self {
            SearchSpace::DeviationTau => vec![vec![350.0, 0.5], vec![150.0, 0.8], vec![400.0, 0.1]],
            SearchSpace::Full => vec![
                vec![1500.0, 350.0, 0.06, 0.5],
                vec![1200.0, 150.0, 0.06, 0.8],
                vec![1800.0, 400.0, 0.05, 0.1],
                vec![2000.0, 250.0, 0.09, 0.6],
                vec![1400.0, 300.0, 0.04, 1.0]
            ]
        }
    }

    /// Clamps every coordinate of `point` into its hyperparameter's domain.
    pub fn project(&self, point: &mut [f64]) {
        for (value, parameter) in point.iter_mut().zip(self.dimensions()) {
            *value = parameter.project(*value);
        }
    }

    /// Rebinds the hyperparameters under test onto a copy of `base`.
    pub fn config_from(&self, base: &ModelConfig, point: &[f64]) -> Result<ModelConfig> {
        let dimensions = self.dimensions();
        if point.len() != dimensions.len() {
            return Err(ProcessorError::Configuration(format!(
                "expected a {}-dimensional hyperparameter vector, got {} values",
                dimensions.len(),
                point.len()
            )));
        }

        let mut config = *base;
        for (parameter, value) in dimensions.iter().zip(point) {
            parameter.apply(&mut config, *value);
        }

        config.validate()?;
        Ok(config)
    }
}
