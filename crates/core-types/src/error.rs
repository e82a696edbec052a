use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Unknown {0} code: '{1}'")]
    UnknownCode(&'static str, String),

    #[error("Arithmetic overflow computing {0}")]
    Overflow(String),
}
