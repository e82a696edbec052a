use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Invalid report parameter: {0}")]
    InvalidParameter(String),

    #[error("Mistake catalog contains id {0} more than once")]
    DuplicateMistake(i64),

    #[error("Trade {id} cannot be analyzed: {source}")]
    InvalidTrade { id: i64, source: CoreError },

    #[error(transparent)]
    Record(#[from] CoreError),

    #[error("Arithmetic overflow computing {0}")]
    Overflow(String),
}
