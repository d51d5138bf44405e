pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("content JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid date for {id}: {value:?} (expected YYYY-MM-DD or YYYY-MM)")]
    InvalidDate { id: String, value: String },

    #[error("invalid date range for {id}: start {start} is after end {end}")]
    InvalidDateRange {
        id: String,
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("invalid base URL {value:?}: {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
}
