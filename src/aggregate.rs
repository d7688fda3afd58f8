//! Resolve → extract → classify → group.

use futures::future::join_all;
use review_types::{ExtractedSpan, Message, ResultSet};
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::error::{ConfigError, Result};
use crate::extract::SpanExtractor;
use crate::period::PeriodTable;
use crate::resolver::NameResolver;
use crate::roster::{Roster, RosterEntry};
use crate::transport::AuthorDirectory;

/// Placeholder for authors that are missing or cannot be looked up.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// A message span that landed in a period, before its author is known.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit<'m> {
    pub text: &'m str,
    pub ts: f64,
    pub period: u32,
    pub user: Option<&'m str>,
}

/// Immutable roster + period configuration and the extractor compiled from it.
pub struct Aggregator {
    roster: Roster,
    periods: PeriodTable,
    extractor: SpanExtractor,
}

impl Aggregator {
    pub fn new(roster: Roster, periods: PeriodTable) -> Self {
        let extractor = SpanExtractor::new(&roster);
        Aggregator {
            roster,
            periods,
            extractor,
        }
    }

    pub fn from_config(config: &AppConfig) -> std::result::Result<Self, ConfigError> {
        Ok(Self::new(config.roster()?, config.period_table()?))
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn periods(&self) -> &PeriodTable {
        &self.periods
    }

    pub fn resolver(&self) -> NameResolver<'_> {
        NameResolver::new(&self.roster)
    }

    pub fn extractor(&self) -> &SpanExtractor {
        &self.extractor
    }

    /// Spans for `name` that fall inside a configured period, in scan order.
    /// Messages without a mention, or outside every period, are skipped.
    pub fn collect_hits<'m>(&self, name: &RosterEntry, messages: &'m [Message]) -> Vec<Hit<'m>> {
        messages
            .iter()
            .filter_map(|m| {
                let text = self.extractor.extract(name, &m.text)?;
                let Some(period) = self.periods.classify(m.ts) else {
                    debug!(ts = m.ts, "mention outside every period, dropped");
                    return None;
                };
                Some(Hit {
                    text,
                    ts: m.ts,
                    period,
                    user: m.user.as_deref(),
                })
            })
            .collect()
    }

    /// Group `name`'s spans by period. Author names are looked up
    /// concurrently; a failed lookup becomes [`UNKNOWN_AUTHOR`].
    pub async fn aggregate(
        &self,
        name: &RosterEntry,
        messages: &[Message],
        authors: &dyn AuthorDirectory,
    ) -> ResultSet {
        let hits = self.collect_hits(name, messages);
        let names = join_all(hits.iter().map(|h| author_name(authors, h.user))).await;

        let mut result = ResultSet::new(name.full_name());
        for (hit, author) in hits.into_iter().zip(names) {
            result.push(ExtractedSpan {
                name: name.full_name().to_string(),
                author,
                text: hit.text.to_string(),
                ts: hit.ts,
                period: hit.period,
            });
        }
        debug!(
            name = name.full_name(),
            scanned = messages.len(),
            spans = result.span_count(),
            "aggregated spans"
        );
        result
    }

    /// Resolve `query`, then aggregate. An empty result set is returned
    /// as-is; deciding how to report it is the caller's job.
    pub async fn build_result_set(
        &self,
        query: &str,
        messages: &[Message],
        authors: &dyn AuthorDirectory,
    ) -> Result<ResultSet> {
        let resolution = self.resolver().resolve_or_err(query)?;
        Ok(self.aggregate(resolution.entry, messages, authors).await)
    }
}

async fn author_name(authors: &dyn AuthorDirectory, user: Option<&str>) -> String {
    let Some(id) = user else {
        return UNKNOWN_AUTHOR.to_string();
    };
    match authors.resolve_author_display_name(id).await {
        Ok(name) => name,
        Err(err) => {
            warn!(author_id = id, error = %err, "author lookup failed");
            UNKNOWN_AUTHOR.to_string()
        }
    }
}
