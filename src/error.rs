use thiserror::Error;

/// Failures while fetching or interpreting Census data for a single ZIP code.
///
/// The `Display` text is what ends up in the `error` field of a failed record.
#[derive(Error, Debug)]
pub enum CensusError {
    #[error("Invalid ZIP code: {0}")]
    InvalidZip(String),

    #[error("Census API request failed: {0}")]
    Request(reqwest::Error),

    #[error("Census API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed Census API response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("No data found")]
    NoData,

    #[error("Column {0} missing from Census API response")]
    MissingColumn(String),

    #[error("No value reported for {0}")]
    MissingValue(String),

    #[error("Invalid value {value} for {variable}")]
    InvalidValue { variable: String, value: String },
}

// Request URLs carry the API key
impl From<reqwest::Error> for CensusError {
    fn from(e: reqwest::Error) -> Self {
        Self::Request(e.without_url())
    }
}

pub type Result<T> = std::result::Result<T, CensusError>;
