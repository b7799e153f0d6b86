use thiserror::Error;

use crate::model::glicko::ConvergenceError;

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Volatility did not converge for player {player} in round {round}: {source}")]
    Convergence {
        player: usize,
        round: usize,
        #[source]
        source: ConvergenceError
    },

    #[error("Match in round {round} references unknown player {id}")]
    UnknownPlayer { id: String, round: i32 },

    #[error("Round {id} is outside the loaded range of {rounds} rounds")]
    RoundOutOfRange { id: i32, rounds: usize },

    #[error("No matches qualified for prediction scoring")]
    NoPredictions,

    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("Failed to write export row: {0}")]
    Export(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error)
}

pub type Result<T> = std::result::Result<T, ProcessorError>;
