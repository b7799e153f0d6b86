pub mod duel;
pub mod model_config;
pub mod player_rating;
pub mod search_space;
