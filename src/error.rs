use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReviewError>;

/// Terminal outcomes of one review query that are not a result set.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("empty query")]
    EmptyQuery,

    #[error("no roster entry matches \"{query}\"")]
    NameNotFound { query: String },

    #[error("no reviews found for {name}")]
    NoReviewsFound { name: String },

    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Failures of the external collaborators (message log, author directory).
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed message log: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown author id {0}")]
    UnknownAuthor(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] io::Error),

    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("roster is empty")]
    EmptyRoster,

    #[error("duplicate roster entry: {0}")]
    DuplicateRosterEntry(String),

    #[error("period {number} is invalid: {reason}")]
    InvalidPeriod { number: u32, reason: String },

    #[error("UTC offset of {0} minutes is out of range")]
    InvalidOffset(i32),

    #[error("periods {first} and {second} overlap")]
    OverlappingPeriods { first: u32, second: u32 },
}
