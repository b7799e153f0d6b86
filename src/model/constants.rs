// Glicko-2 scale constants
pub const RATING_CENTER: f64 = 1500.0;
/// 400 / ln(10), roughly 173.7178
pub const SCALE: f64 = 400.0 / std::f64::consts::LN_10;

// Post-update bounds applied to every committed triple
pub const RATING_FLOOR: f64 = 0.0;
pub const RATING_CEILING: f64 = 3000.0;
pub const DEVIATION_FLOOR: f64 = 0.0;
pub const DEVIATION_CEILING: f64 = 400.0;
pub const VOLATILITY_FLOOR: f64 = 1e-6;
pub const VOLATILITY_CEILING: f64 = 0.1;

// Volatility root-find
pub const CONVERGENCE_TOLERANCE: f64 = 1e-6;
pub const MAX_SOLVER_ITERATIONS: usize = 100;

// Engine
pub const DEFAULT_SHARD_SIZE: usize = 5000;

// Default model configuration
pub const DEFAULT_RATING: f64 = 1200.0;
pub const DEFAULT_DEVIATION: f64 = 285.0;
pub const DEFAULT_VOLATILITY: f64 = 0.06;
pub const DEFAULT_TAU: f64 = 0.59;

// Prediction windows
pub const DEFAULT_PREDICTION_COUNT: usize = 3;
pub const DEFAULT_ACTIVE_COUNT: usize = 3;
/// Predicted probabilities are kept inside [PREDICTION_FLOOR, 1 - PREDICTION_FLOOR]
pub const PREDICTION_FLOOR: f64 = 0.01;

// Optimizer
pub const DEFAULT_MAX_ITERATIONS: usize = 200;
pub const OPTIMIZER_TOLERANCE: f64 = 1e-6;
pub const REFLECTION: f64 = 1.0;
pub const EXPANSION: f64 = 2.0;
pub const CONTRACTION: f64 = 0.5;
pub const SHRINK: f64 = 0.5;
