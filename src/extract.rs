//! Isolate one person's portion of a message that may discuss several people.
//!
//! There are no explicit delimiters in the source text. A person's span
//! starts one line above the line their name appears on (reviewers put a
//! date or heading there) and runs up to the line on which the next other
//! roster name appears.

use std::ops::Range;

use regex::Regex;

use crate::roster::{Roster, RosterEntry};

// ── Name matching ────────────────────────────────────────────────────

/// Compiled, case-insensitive patterns for the ways one entry is written.
#[derive(Debug)]
struct NameMatcher {
    /// "Jack Martin"
    full: Regex,
    /// "Jack M"; absent for one-word names
    first_initial: Option<Regex>,
    /// "Jack" as a whole word; absent when the first name is shared
    first_word: Option<Regex>,
}

impl NameMatcher {
    fn new(entry: &RosterEntry, shared_first_name: bool) -> Self {
        let ci = |pattern: String| {
            Regex::new(&format!("(?i){pattern}")).expect("escaped name pattern")
        };
        let first = regex::escape(entry.first_name());

        NameMatcher {
            full: ci(regex::escape(entry.full_name())),
            first_initial: entry
                .last_initial()
                .map(|c| ci(format!("{first} {}", regex::escape(&c.to_string())))),
            first_word: (!shared_first_name).then(|| ci(format!(r"\b{first}\b"))),
        }
    }

    fn tiers(&self) -> impl Iterator<Item = &Regex> {
        std::iter::once(&self.full)
            .chain(self.first_initial.as_ref())
            .chain(self.first_word.as_ref())
    }

    /// Position of the first tier that matches anywhere, tried in precision order.
    fn locate(&self, text: &str) -> Option<usize> {
        self.tiers().find_map(|re| re.find(text)).map(|m| m.start())
    }

    /// Earliest match of any tier at or after byte offset `from`.
    fn earliest_from(&self, text: &str, from: usize) -> Option<usize> {
        self.tiers()
            .filter_map(|re| re.find_at(text, from))
            .map(|m| m.start())
            .min()
    }
}

// ── Line arithmetic ──────────────────────────────────────────────────

/// Byte offset of the start of the line containing `pos`.
fn line_start(text: &str, pos: usize) -> usize {
    text[..pos].rfind('\n').map_or(0, |i| i + 1)
}

/// Start of the line above the one containing `pos`, or the line itself
/// when it is already the first line.
fn heading_start(text: &str, pos: usize) -> usize {
    match line_start(text, pos) {
        0 => 0,
        ls => line_start(text, ls - 1),
    }
}

/// Byte range of a span given where the name was found and where other
/// names appear after it.
///
/// The span begins one line above `name_at`. It ends at the start of the
/// line holding the nearest boundary, but never before the span's own
/// start; with no boundary it runs to the end of the text.
pub fn span_bounds(text: &str, name_at: usize, boundaries: &[usize]) -> Range<usize> {
    let start = heading_start(text, name_at);
    let end = boundaries
        .iter()
        .copied()
        .filter(|&b| b > name_at)
        .min()
        .map_or(text.len(), |b| line_start(text, b).max(start));
    start..end
}

// ── Extractor ────────────────────────────────────────────────────────

/// Span extraction over a fixed roster. Patterns are compiled once.
pub struct SpanExtractor {
    matchers: Vec<(RosterEntry, NameMatcher)>,
}

impl SpanExtractor {
    pub fn new(roster: &Roster) -> Self {
        let matchers = roster
            .all_entries()
            .iter()
            .map(|e| {
                let shared = roster.has_duplicate_first_name(e);
                (e.clone(), NameMatcher::new(e, shared))
            })
            .collect();
        SpanExtractor { matchers }
    }

    /// Byte offset where `name` is first mentioned in `text`.
    ///
    /// Tries the full name, then first name plus last initial, then the bare
    /// first name (only when no other entry shares it).
    pub fn locate(&self, name: &RosterEntry, text: &str) -> Option<usize> {
        match self.matchers.iter().find(|(e, _)| e == name) {
            Some((_, m)) => m.locate(text),
            None => self.adhoc_matcher(name).locate(text),
        }
    }

    /// Positions, after `name_at`, where some other roster entry is mentioned.
    /// One position per other entry (its earliest mention), unordered.
    pub fn boundary_candidates(
        &self,
        name: &RosterEntry,
        text: &str,
        name_at: usize,
    ) -> Vec<usize> {
        let from = name_at + text[name_at..].chars().next().map_or(1, char::len_utf8);
        if from >= text.len() {
            return Vec::new();
        }
        self.matchers
            .iter()
            .filter(|(e, _)| e != name)
            .filter_map(|(_, m)| m.earliest_from(text, from))
            .collect()
    }

    /// The trimmed portion of `text` attributable to `name`, or `None`
    /// when the message does not mention them.
    pub fn extract<'t>(&self, name: &RosterEntry, text: &'t str) -> Option<&'t str> {
        let name_at = self.locate(name, text)?;
        let boundaries = self.boundary_candidates(name, text, name_at);
        let range = span_bounds(text, name_at, &boundaries);
        Some(text[range].trim())
    }

    fn adhoc_matcher(&self, name: &RosterEntry) -> NameMatcher {
        let first = name.first_name().to_lowercase();
        let shared = self
            .matchers
            .iter()
            .any(|(e, _)| e != name && e.first_name().to_lowercase() == first);
        NameMatcher::new(name, shared)
    }
}
