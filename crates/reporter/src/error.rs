use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReporterError {
    #[error("User \"{0}\" not found")]
    UserNotFound(String),

    #[error("Failed to read the journal: {0}")]
    Database(#[from] database::DbError),

    #[error("Failed to compute the report: {0}")]
    Analytics(#[from] analytics::AnalyticsError),
}
