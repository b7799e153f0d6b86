pub mod constants;
pub mod glicko;
pub mod loader;
pub mod match_table;
pub mod optimizer;
pub mod prediction;
pub mod rating_engine;
pub mod structures;
