//! Least-loaded veterinarian selection.
//!
//! Tie-break rule: among candidates sharing the minimum count, the one that
//! appears first in candidate order wins.

use std::collections::HashMap;

/// Appointment counts per candidate veterinarian, in candidate order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadTally {
    entries: Vec<(String, u64)>,
}

impl LoadTally {
    /// Build a tally over `candidates`, taking counts from `counts`.
    ///
    /// Candidates missing from `counts` start at zero. Repeated candidates
    /// keep their first position.
    pub fn new<I, S>(candidates: I, counts: &HashMap<String, u64>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entries: Vec<(String, u64)> = Vec::new();
        for candidate in candidates {
            let candidate = candidate.into();
            if entries.iter().any(|(id, _)| *id == candidate) {
                continue;
            }
            let count = counts.get(&candidate).copied().unwrap_or(0);
            entries.push((candidate, count));
        }
        Self { entries }
    }

    /// Candidate that should receive the next appointment.
    pub fn least_loaded(&self) -> Option<&str> {
        let mut best: Option<&(String, u64)> = None;
        for entry in &self.entries {
            match best {
                Some((_, min)) if entry.1 >= *min => {}
                _ => best = Some(entry),
            }
        }
        best.map(|(id, _)| id.as_str())
    }

    /// Count one more appointment against `veterinarian_id`.
    ///
    /// Returns false if the veterinarian is not a candidate.
    pub fn record_assignment(&mut self, veterinarian_id: &str) -> bool {
        match self.entries.iter_mut().find(|(id, _)| id == veterinarian_id) {
            Some((_, count)) => {
                *count += 1;
                true
            }
            None => false,
        }
    }

    /// Current count for a candidate.
    pub fn count(&self, veterinarian_id: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(id, _)| id == veterinarian_id)
            .map(|(_, count)| *count)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(veterinarian_id, count)` pairs in candidate order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(id, count)| (id.as_str(), *count))
    }
}

/// Pick the least-loaded candidate; `None` only when `candidates` is empty.
pub fn select_least_loaded<'a>(
    candidates: &'a [String],
    counts: &HashMap<String, u64>,
) -> Option<&'a str> {
    let mut best: Option<(&'a str, u64)> = None;
    for candidate in candidates {
        let count = counts.get(candidate).copied().unwrap_or(0);
        match best {
            Some((_, min)) if count >= min => {}
            _ => best = Some((candidate.as_str(), count)),
        }
    }
    best.map(|(id, _)| id)
}
