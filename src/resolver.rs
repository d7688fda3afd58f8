//! Free-text query → roster entry.
//!
//! Tiers are tried in order of precision: exact full name, unique
//! first-name prefix, first-name prefix narrowed by a trailing last-name
//! hint, and finally a substring anywhere in the full name.

use tracing::debug;

use crate::error::{Result, ReviewError};
use crate::roster::{Roster, RosterEntry};

/// Which tier produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    /// Query equals the full name.
    Exact,
    /// Exactly one first name starts with the query.
    FirstName,
    /// Several first names matched and the query's last token picked one by
    /// last-name prefix.
    LastNameHint,
    /// Several first names matched and nothing narrowed them; first in roster order.
    /// Deterministic, but may be the wrong person.
    FirstInRoster,
    /// No first name matched; the query occurs somewhere in the full name.
    /// First in roster order, same caveat as `FirstInRoster`.
    Substring,
}

impl MatchTier {
    /// Whether the tier may have silently picked among several plausible entries.
    pub fn is_ambiguous(self) -> bool {
        matches!(self, MatchTier::FirstInRoster | MatchTier::Substring)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'r> {
    pub entry: &'r RosterEntry,
    pub tier: MatchTier,
}

pub struct NameResolver<'r> {
    roster: &'r Roster,
}

impl<'r> NameResolver<'r> {
    pub fn new(roster: &'r Roster) -> Self {
        NameResolver { roster }
    }

    /// Resolve `query` to a single roster entry, or `None` when every tier misses.
    pub fn resolve(&self, query: &str) -> Option<Resolution<'r>> {
        let search = query.trim().to_lowercase();
        let tokens: Vec<&str> = search.split_whitespace().collect();
        let Some(&last_token) = tokens.last() else {
            return None;
        };
        let entries = self.roster.all_entries();

        if let Some(entry) = entries
            .iter()
            .find(|e| e.full_name().to_lowercase() == search)
        {
            return Some(self.hit(query, entry, MatchTier::Exact));
        }

        let candidates: Vec<&RosterEntry> = entries
            .iter()
            .filter(|e| e.first_name().to_lowercase().starts_with(&search))
            .collect();

        match candidates.as_slice() {
            [] => {}
            [only] => return Some(self.hit(query, *only, MatchTier::FirstName)),
            [first, ..] => {
                if tokens.len() > 1 {
                    let hinted = candidates
                        .iter()
                        .copied()
                        .find(|e| e.last_name().to_lowercase().starts_with(last_token));
                    if let Some(entry) = hinted {
                        return Some(self.hit(query, entry, MatchTier::LastNameHint));
                    }
                }
                return Some(self.hit(query, *first, MatchTier::FirstInRoster));
            }
        }

        let found = entries
            .iter()
            .find(|e| e.full_name().to_lowercase().contains(&search))
            .map(|entry| self.hit(query, entry, MatchTier::Substring));
        if found.is_none() {
            debug!(query, "no roster entry matched");
        }
        found
    }

    /// Like [`resolve`](Self::resolve), failing with `NameNotFound` that carries the raw query.
    pub fn resolve_or_err(&self, query: &str) -> Result<Resolution<'r>> {
        self.resolve(query).ok_or_else(|| ReviewError::NameNotFound {
            query: query.to_string(),
        })
    }

    fn hit(&self, query: &str, entry: &'r RosterEntry, tier: MatchTier) -> Resolution<'r> {
        debug!(query, name = entry.full_name(), ?tier, "resolved roster entry");
        Resolution { entry, tier }
    }
}
