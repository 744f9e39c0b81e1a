use alloc::string::String;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board size must be positive")]
    EmptyBoard,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Mines were already placed on this board")]
    MinesAlreadyPlaced,
    #[error("Invalid rules: {0}")]
    InvalidRules(String),
    #[error("Invalid best-time records: {0}")]
    InvalidScores(String),
}

pub type Result<T> = core::result::Result<T, GameError>;
