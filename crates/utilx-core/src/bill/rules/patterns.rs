//! Bounded-time regex matching and the patterns shared across providers.
//!
//! Bill text comes from outside the process, so every pattern in the engine
//! goes through [`TimedRegex`]. The underlying `regex` engine runs in time
//! linear in the haystack; on top of that each match attempt carries a wall
//! clock budget and a haystack size cap, and anything over either limit is
//! reported as "no match" for that one field.

use std::borrow::Cow;
use std::time::{Duration, Instant};

use lazy_static::lazy_static;
use regex::{Captures, Match, Regex};
use tracing::warn;

/// Per-match budget applied to every pattern.
pub const DEFAULT_MATCH_BUDGET: Duration = Duration::from_secs(1);

/// Haystacks larger than this are never searched.
pub const MAX_HAYSTACK_BYTES: usize = 4 * 1024 * 1024;

/// A compiled regex whose matches are discarded when they overrun a time
/// budget or the haystack is too large.
#[derive(Debug, Clone)]
pub struct TimedRegex {
    regex: Regex,
    budget: Duration,
}

impl TimedRegex {
    /// Compile a pattern with the default budget.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            budget: DEFAULT_MATCH_BUDGET,
        })
    }

    /// Replace the per-match budget.
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = budget;
        self
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn captures<'h>(&self, haystack: &'h str) -> Option<Captures<'h>> {
        self.bounded(haystack, |re, h| re.captures(h))
    }

    pub fn find<'h>(&self, haystack: &'h str) -> Option<Match<'h>> {
        self.bounded(haystack, |re, h| re.find(h))
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        self.bounded(haystack, |re, h| re.is_match(h).then_some(()))
            .is_some()
    }

    /// First capture group of the first match, trimmed.
    pub fn capture_str<'h>(&self, haystack: &'h str) -> Option<&'h str> {
        self.captures(haystack)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
    }

    /// All non-overlapping matches, or none at all if the budget runs out
    /// part-way through.
    pub fn captures_all<'h>(&self, haystack: &'h str) -> Vec<Captures<'h>> {
        if !self.admits(haystack) {
            return Vec::new();
        }

        let deadline = Instant::now() + self.budget;
        let mut all = Vec::new();
        for caps in self.regex.captures_iter(haystack) {
            all.push(caps);
            if Instant::now() >= deadline {
                self.timed_out(haystack);
                return Vec::new();
            }
        }
        if Instant::now() >= deadline {
            self.timed_out(haystack);
            return Vec::new();
        }
        all
    }

    /// Replace every match; the haystack is returned unchanged on overrun.
    pub fn replace_all<'h>(&self, haystack: &'h str, replacement: &str) -> Cow<'h, str> {
        if !self.admits(haystack) {
            return Cow::Borrowed(haystack);
        }

        let started = Instant::now();
        let replaced = self.regex.replace_all(haystack, replacement);
        if started.elapsed() >= self.budget {
            self.timed_out(haystack);
            return Cow::Borrowed(haystack);
        }
        replaced
    }

    fn bounded<'h, T>(
        &self,
        haystack: &'h str,
        search: impl FnOnce(&Regex, &'h str) -> Option<T>,
    ) -> Option<T> {
        if !self.admits(haystack) {
            return None;
        }

        let started = Instant::now();
        let found = search(&self.regex, haystack);
        if started.elapsed() >= self.budget {
            self.timed_out(haystack);
            return None;
        }
        found
    }

    fn admits(&self, haystack: &str) -> bool {
        if haystack.len() > MAX_HAYSTACK_BYTES {
            warn!(
                pattern = self.regex.as_str(),
                bytes = haystack.len(),
                "Haystack exceeds match size limit, treating as no match"
            );
            return false;
        }
        true
    }

    fn timed_out(&self, haystack: &str) {
        warn!(
            pattern = self.regex.as_str(),
            bytes = haystack.len(),
            budget_ms = self.budget.as_millis() as u64,
            "Pattern match exceeded its time budget, treating as no match"
        );
    }
}

lazy_static! {
    // "Apr 6, 2025" / "April 6, 2025" / "Jun 02,2025"
    pub static ref DATE_MONTH_DAY_YEAR: TimedRegex = TimedRegex::new(
        r"([A-Za-z]{3,9})\.?\s+(\d{1,2}),?\s*(\d{4})"
    ).unwrap();

    // "5/31/2021"
    pub static ref DATE_NUMERIC_MDY: TimedRegex = TimedRegex::new(
        r"^\s*(\d{1,2})/(\d{1,2})/(\d{4})\s*$"
    ).unwrap();

    // "Apr 06/25"
    pub static ref DATE_MONTH_DAY_SHORT_YEAR: TimedRegex = TimedRegex::new(
        r"^\s*([A-Za-z]{3})\s+(\d{1,2})/(\d{2})\s*$"
    ).unwrap();

    // "05-Apr-25"
    pub static ref DATE_DAY_MONTH_SHORT_YEAR: TimedRegex = TimedRegex::new(
        r"^\s*(\d{1,2})-([A-Za-z]{3})-(\d{2})\s*$"
    ).unwrap();

    // "2025 April 12"
    pub static ref DATE_YEAR_MONTH_DAY: TimedRegex = TimedRegex::new(
        r"^\s*(\d{4})\s+([A-Za-z]{3,9})\.?\s+(\d{1,2})\s*$"
    ).unwrap();

    // "March 2025"
    pub static ref DATE_MONTH_YEAR: TimedRegex = TimedRegex::new(
        r"^\s*([A-Za-z]{3,9})\.?\s+(\d{4})\s*$"
    ).unwrap();

    // "May 02" / "Mar6"
    pub static ref DATE_MONTH_DAY: TimedRegex = TimedRegex::new(
        r"^\s*([A-Za-z]{3,9})\.?\s*(\d{1,2})\s*$"
    ).unwrap();

    // Trailing money column: "... 161.33"
    pub static ref TRAILING_AMOUNT: TimedRegex = TimedRegex::new(
        r"(-?\$?\s*[\d,]+\.\d{2})\s*$"
    ).unwrap();

    // A meter line ending in cubic metres: "... 188 CM"
    pub static ref TRAILING_CM: TimedRegex = TimedRegex::new(
        r"(?i)(\d[\d,]*)\s*CM\s*$"
    ).unwrap();
}
