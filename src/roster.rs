//! The fixed list of people a query can resolve to.

use std::fmt;

use crate::error::ConfigError;

/// One full name on the roster, e.g. "Hannah Just Milender".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RosterEntry(String);

impl RosterEntry {
    pub fn full_name(&self) -> &str {
        &self.0
    }

    /// First whitespace-delimited token.
    pub fn first_name(&self) -> &str {
        self.0.split_whitespace().next().unwrap_or("")
    }

    /// Remaining tokens joined by single spaces; empty for one-word names.
    pub fn last_name(&self) -> String {
        self.0.split_whitespace().skip(1).collect::<Vec<_>>().join(" ")
    }

    pub fn last_initial(&self) -> Option<char> {
        self.0.split_whitespace().nth(1).and_then(|t| t.chars().next())
    }
}

impl fmt::Display for RosterEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered, non-empty, duplicate-free list of roster entries.
#[derive(Debug, Clone)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    pub fn new<I, S>(names: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries: Vec<RosterEntry> = Vec::new();
        for name in names {
            let name = name.as_ref().split_whitespace().collect::<Vec<_>>().join(" ");
            if name.is_empty() {
                continue;
            }
            let folded = name.to_lowercase();
            if entries.iter().any(|e| e.0.to_lowercase() == folded) {
                return Err(ConfigError::DuplicateRosterEntry(name));
            }
            entries.push(RosterEntry(name));
        }
        if entries.is_empty() {
            return Err(ConfigError::EmptyRoster);
        }
        Ok(Roster { entries })
    }

    pub fn all_entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose first name equals `first`, ignoring case. Roster order.
    pub fn entries_with_first_name(&self, first: &str) -> Vec<&RosterEntry> {
        let first = first.to_lowercase();
        self.entries
            .iter()
            .filter(|e| e.first_name().to_lowercase() == first)
            .collect()
    }

    /// True when another entry shares `entry`'s first name, making a bare
    /// first name ambiguous.
    pub fn has_duplicate_first_name(&self, entry: &RosterEntry) -> bool {
        self.entries_with_first_name(entry.first_name()).len() > 1
    }

    pub fn find(&self, full_name: &str) -> Option<&RosterEntry> {
        let wanted = full_name.trim().to_lowercase();
        self.entries.iter().find(|e| e.0.to_lowercase() == wanted)
    }
}
