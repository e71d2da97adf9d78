//! Word → relative viseme timeline.

use serde::{Deserialize, Serialize};

use super::rules::RuleSet;
use crate::viseme::VisemeCode;

/// Weight applied to a viseme's base duration when it repeats back to back
/// and is merged into the previous entry.
///
/// Tuned value with no documented derivation; kept as a named constant so it
/// can be revisited.
pub const MERGE_DURATION_WEIGHT: f64 = 0.7;

/// Relative pause for characters that carry no rules (spaces, punctuation).
fn pause_duration(c: char) -> f64 {
    match c {
        ' ' => 1.0,
        ',' => 3.0,
        '-' => 0.5,
        '\'' => 0.5,
        _ => 0.0,
    }
}

/// Relative viseme timeline for one word.
///
/// `visemes`, `times` and `durations` always have equal length. Times are
/// non-decreasing and durations strictly positive, both in relative units
/// (1.0 ≈ one average viseme).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordVisemeResult {
    /// Upper-cased word the timeline was computed from.
    pub normalized_word: String,
    pub visemes: Vec<VisemeCode>,
    pub times: Vec<f64>,
    pub durations: Vec<f64>,
}

impl WordVisemeResult {
    /// Number of viseme entries.
    pub fn len(&self) -> usize {
        self.visemes.len()
    }

    /// Whether no viseme was emitted.
    pub fn is_empty(&self) -> bool {
        self.visemes.is_empty()
    }

    /// End of the last entry (`times[last] + durations[last]`), or 0 when empty.
    pub fn total_duration(&self) -> f64 {
        match (self.times.last(), self.durations.last()) {
            (Some(t), Some(d)) => t + d,
            _ => 0.0,
        }
    }

    /// Iterate `(viseme, time, duration)` triples.
    pub fn iter(&self) -> impl Iterator<Item = (VisemeCode, f64, f64)> + '_ {
        self.visemes
            .iter()
            .zip(&self.times)
            .zip(&self.durations)
            .map(|((v, t), d)| (*v, *t, *d))
    }

    fn push(&mut self, viseme: VisemeCode, t: f64) -> f64 {
        if self.visemes.last() == Some(&viseme) {
            let extra = MERGE_DURATION_WEIGHT * viseme.base_duration();
            if let Some(d) = self.durations.last_mut() {
                *d += extra;
            }
            extra
        } else {
            let d = viseme.base_duration();
            self.visemes.push(viseme);
            self.times.push(t);
            self.durations.push(d);
            d
        }
    }
}

/// Run the rule engine over `word`, producing a relative viseme timeline.
///
/// The word is upper-cased first. At each cursor position the first matching
/// rule emits its visemes and the cursor advances by the rule's length;
/// positions with no matching rule are skipped silently (spaces and commas
/// still advance time by a short pause). A viseme equal to the previous one
/// extends that entry instead of starting a new one.
///
/// Returns `None` for empty input or when no viseme could be resolved.
pub fn word_to_visemes(rules: &RuleSet, word: &str) -> Option<WordVisemeResult> {
    let normalized_word = word.to_uppercase();
    let chars: Vec<char> = normalized_word.chars().collect();
    if chars.is_empty() {
        return None;
    }

    let mut result = WordVisemeResult {
        normalized_word,
        visemes: Vec::new(),
        times: Vec::new(),
        durations: Vec::new(),
    };
    let mut t = 0.0;
    let mut pos = 0;

    while pos < chars.len() {
        match rules.match_rule(&chars, pos) {
            Some(rule) => {
                for viseme in &rule.visemes {
                    t += result.push(*viseme, t);
                }
                pos += rule.move_len();
            }
            None => {
                t += pause_duration(chars[pos]);
                pos += 1;
            }
        }
    }

    if result.is_empty() {
        return None;
    }
    Some(result)
}
