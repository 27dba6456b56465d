use thiserror::Error;

pub type Result<T> = std::result::Result<T, DiceError>;

#[derive(Error, Debug)]
pub enum DiceError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Invalid protocol state: {0}")]
    InvalidState(String),

    #[error("Cryptographic error: {0}")]
    Crypto(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DiceError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn invalid_selection(msg: impl Into<String>) -> Self {
        Self::InvalidSelection(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn crypto(msg: impl Into<String>) -> Self {
        Self::Crypto(msg.into())
    }

    /// Errors the player can recover from by answering the prompt again
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InvalidSelection(_))
    }
}

impl From<hmac::digest::InvalidLength> for DiceError {
    fn from(err: hmac::digest::InvalidLength) -> Self {
        DiceError::Crypto(err.to_string())
    }
}

impl From<hex::FromHexError> for DiceError {
    fn from(err: hex::FromHexError) -> Self {
        DiceError::Crypto(format!("bad hex encoding: {}", err))
    }
}
