use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("This game can only be played in a group chat")]
    NotInGroup,
    #[error("A game is already running in this group")]
    AlreadyRunning,
    #[error("No game is running in this group")]
    NoGame,
    #[error("Bullet count must be between 1 and {max}, got {got}")]
    InvalidBulletCount { got: usize, max: usize },
    #[error("Moderation error: {0}")]
    Moderation(String),
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
