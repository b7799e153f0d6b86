pub mod args;
pub mod database;
pub mod error;
pub mod export;
pub mod model;
pub mod utils;
