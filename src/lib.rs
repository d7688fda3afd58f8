//! Find what reviewers wrote about one person in a channel's message log.
//!
//! A free-text query is resolved against a fixed roster, each message is
//! cut down to the span about that person, and the spans are grouped by
//! configured reporting period.

pub mod aggregate;
pub mod command;
pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod period;
pub mod render;
pub mod resolver;
pub mod roster;
pub mod transport;

pub use aggregate::{Aggregator, UNKNOWN_AUTHOR};
pub use command::ReviewCommand;
pub use config::AppConfig;
pub use error::{ConfigError, ReviewError, TransportError};
pub use extract::SpanExtractor;
pub use period::{Period, PeriodTable};
pub use resolver::{MatchTier, NameResolver, Resolution};
pub use roster::{Roster, RosterEntry};
pub use review_types as types;
