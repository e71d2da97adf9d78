//! Context-sensitive letter-to-sound rules.
//!
//! A rule is written in the classic NRL notation `LEFT[LETTERS]RIGHT=VISEMES`,
//! e.g. `" :[ANY]=E nn I"`. The notation is parsed once when a [`RuleSet`] is
//! built; matching works on the compiled [`ContextToken`] lists and never
//! touches the source string again.
//!
//! Context operators:
//!
//! | Op | Matches |
//! |----|---------|
//! | `#` | one or more vowels (`AEIOUY`) |
//! | `.` | one voiced consonant (`BDVGJLMNRWZ`) |
//! | `%` | one of the suffixes `ER`, `E`, `ES`, `ED`, `ING`, `ELY` |
//! | `&` | one sibilant: `S C G Z X J CH SH` |
//! | `@` | one apical consonant: `T S R D L Z N J TH CH SH` |
//! | `^` | one consonant |
//! | `+` | one front vowel (`E I Y`) |
//! | `:` | zero or more consonants |
//! | ` ` | word boundary |

use std::collections::HashMap;

use crate::error::{LipsyncError, Result};
use crate::viseme::VisemeCode;

const VOWELS: &str = "AEIOUY";
const CONSONANTS: &str = "BCDFGHJKLMNPQRSTVWXZ";
const VOICED: &str = "BDVGJLMNRWZ";
const FRONT_VOWELS: &str = "EIY";
const SUFFIXES: [&str; 6] = ["ER", "E", "ES", "ED", "ING", "ELY"];
const SIBILANTS: [&str; 8] = ["S", "C", "G", "Z", "X", "J", "CH", "SH"];
const APICALS: [&str; 11] = ["T", "S", "R", "D", "L", "Z", "N", "J", "TH", "CH", "SH"];

/// One element of a left or right context pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextToken {
    /// A specific character.
    Literal(char),
    /// `#`
    Vowels,
    /// `.`
    VoicedConsonant,
    /// `%`
    Suffix,
    /// `&`
    Sibilant,
    /// `@`
    Apical,
    /// `^`
    Consonant,
    /// `+`
    FrontVowel,
    /// `:`
    Consonants,
    /// ` `
    Boundary,
}

impl ContextToken {
    fn from_char(c: char) -> Self {
        match c {
            '#' => Self::Vowels,
            '.' => Self::VoicedConsonant,
            '%' => Self::Suffix,
            '&' => Self::Sibilant,
            '@' => Self::Apical,
            '^' => Self::Consonant,
            '+' => Self::FrontVowel,
            ':' => Self::Consonants,
            ' ' => Self::Boundary,
            other => Self::Literal(other),
        }
    }

    /// Every position at which a match of this token starting at `at` can end.
    fn ends_from(self, word: &[char], at: usize) -> Vec<usize> {
        match self {
            Self::Literal(c) => single(word.get(at).is_some_and(|w| *w == c), at + 1),
            Self::VoicedConsonant => single(in_class(word.get(at), VOICED), at + 1),
            Self::Consonant => single(in_class(word.get(at), CONSONANTS), at + 1),
            Self::FrontVowel => single(in_class(word.get(at), FRONT_VOWELS), at + 1),
            Self::Vowels => run_ends(word, at, VOWELS, 1),
            Self::Consonants => run_ends(word, at, CONSONANTS, 0),
            Self::Suffix => alternatives_forward(word, at, &SUFFIXES),
            Self::Sibilant => alternatives_forward(word, at, &SIBILANTS),
            Self::Apical => alternatives_forward(word, at, &APICALS),
            Self::Boundary => single(is_boundary(word, at), at),
        }
    }

    /// Every position at which a match of this token ending at `end` can start.
    fn starts_before(self, word: &[char], end: usize) -> Vec<usize> {
        let prev = end.checked_sub(1).and_then(|i| word.get(i));
        match self {
            Self::Literal(c) => single(prev.is_some_and(|w| *w == c), end.wrapping_sub(1)),
            Self::VoicedConsonant => single(in_class(prev, VOICED), end.wrapping_sub(1)),
            Self::Consonant => single(in_class(prev, CONSONANTS), end.wrapping_sub(1)),
            Self::FrontVowel => single(in_class(prev, FRONT_VOWELS), end.wrapping_sub(1)),
            Self::Vowels => run_starts(word, end, VOWELS, 1),
            Self::Consonants => run_starts(word, end, CONSONANTS, 0),
            Self::Suffix => alternatives_backward(word, end, &SUFFIXES),
            Self::Sibilant => alternatives_backward(word, end, &SIBILANTS),
            Self::Apical => alternatives_backward(word, end, &APICALS),
            Self::Boundary => single(is_boundary(word, end), end),
        }
    }
}

fn single(matched: bool, pos: usize) -> Vec<usize> {
    if matched { vec![pos] } else { Vec::new() }
}

fn in_class(c: Option<&char>, class: &str) -> bool {
    c.is_some_and(|c| class.contains(*c))
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Word boundary between `word[at - 1]` and `word[at]`.
fn is_boundary(word: &[char], at: usize) -> bool {
    let before = at
        .checked_sub(1)
        .and_then(|i| word.get(i))
        .is_some_and(|c| is_word_char(*c));
    let after = word.get(at).is_some_and(|c| is_word_char(*c));
    before != after
}

fn run_ends(word: &[char], at: usize, class: &str, min: usize) -> Vec<usize> {
    let mut len = 0;
    while word.get(at + len).is_some_and(|c| class.contains(*c)) {
        len += 1;
    }
    (min..=len).map(|n| at + n).collect()
}

fn run_starts(word: &[char], end: usize, class: &str, min: usize) -> Vec<usize> {
    let mut len = 0;
    while len < end && word.get(end - len - 1).is_some_and(|c| class.contains(*c)) {
        len += 1;
    }
    (min..=len).map(|n| end - n).collect()
}

fn alternatives_forward(word: &[char], at: usize, options: &[&str]) -> Vec<usize> {
    options
        .iter()
        .filter(|opt| {
            let n = opt.chars().count();
            word.get(at..at + n)
                .is_some_and(|slice| slice.iter().copied().eq(opt.chars()))
        })
        .map(|opt| at + opt.chars().count())
        .collect()
}

fn alternatives_backward(word: &[char], end: usize, options: &[&str]) -> Vec<usize> {
    options
        .iter()
        .filter_map(|opt| {
            let n = opt.chars().count();
            let start = end.checked_sub(n)?;
            word.get(start..end)
                .is_some_and(|slice| slice.iter().copied().eq(opt.chars()))
                .then_some(start)
        })
        .collect()
}

/// Does `tokens` match some stretch of `word` starting at `at`?
fn match_forward(tokens: &[ContextToken], word: &[char], at: usize) -> bool {
    match tokens.split_first() {
        None => true,
        Some((first, rest)) => first
            .ends_from(word, at)
            .into_iter()
            .any(|end| match_forward(rest, word, end)),
    }
}

/// Does `tokens` match some stretch of `word` ending at `end`?
fn match_backward(tokens: &[ContextToken], word: &[char], end: usize) -> bool {
    match tokens.split_last() {
        None => true,
        Some((last, rest)) => last
            .starts_before(word, end)
            .into_iter()
            .any(|start| match_backward(rest, word, start)),
    }
}

/// A compiled letter-to-sound rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// Context that must immediately precede the letters.
    pub left: Vec<ContextToken>,
    /// Letters consumed by the rule; the first one is the rule-set key.
    pub letters: Vec<char>,
    /// Context that must immediately follow the letters.
    pub right: Vec<ContextToken>,
    /// Visemes emitted, in order. Empty for silent letters.
    pub visemes: Vec<VisemeCode>,
}

impl Rule {
    /// Compile a rule from `LEFT[LETTERS]RIGHT=VISEMES` notation.
    ///
    /// # Errors
    ///
    /// Returns [`LipsyncError::Config`] if the brackets or `=` are missing,
    /// the letter group is empty, or a viseme code is unknown.
    pub fn parse(source: &str) -> Result<Self> {
        let malformed = |why: &str| LipsyncError::Config(format!("rule {source:?}: {why}"));

        let (pattern, visemes) = source
            .split_once('=')
            .ok_or_else(|| malformed("missing '='"))?;
        let open = pattern.find('[').ok_or_else(|| malformed("missing '['"))?;
        let close = pattern.find(']').ok_or_else(|| malformed("missing ']'"))?;
        if close < open {
            return Err(malformed("']' before '['"));
        }

        let letters: Vec<char> = pattern[open + 1..close].chars().collect();
        if letters.is_empty() {
            return Err(malformed("empty letter group"));
        }
        let visemes = visemes
            .split_whitespace()
            .map(|code| {
                VisemeCode::parse(code).ok_or_else(|| malformed(&format!("unknown viseme {code}")))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            left: pattern[..open].chars().map(ContextToken::from_char).collect(),
            letters,
            right: pattern[close + 1..]
                .chars()
                .map(ContextToken::from_char)
                .collect(),
            visemes,
        })
    }

    /// How many source characters a match consumes.
    pub fn move_len(&self) -> usize {
        self.letters.len()
    }

    /// Whether this rule matches `word` with the cursor at `pos`.
    pub fn matches(&self, word: &[char], pos: usize) -> bool {
        let end = pos + self.letters.len();
        word.get(pos..end)
            .is_some_and(|slice| slice == self.letters.as_slice())
            && match_backward(&self.left, word, pos)
            && match_forward(&self.right, word, end)
    }
}

/// Ordered rule lists keyed by leading letter.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: HashMap<char, Vec<Rule>>,
}

impl RuleSet {
    /// Compile a rule table given as `(letter, rules)` pairs.
    ///
    /// Rules keep their declared order; the first match wins.
    ///
    /// # Errors
    ///
    /// Returns an error if any rule fails to parse or is filed under the wrong letter.
    pub fn compile(table: &[(char, &[&str])]) -> Result<Self> {
        let mut rules = HashMap::with_capacity(table.len());
        for &(letter, sources) in table {
            let compiled = sources
                .iter()
                .map(|src| {
                    let rule = Rule::parse(src)?;
                    if rule.letters.first() != Some(&letter) {
                        return Err(LipsyncError::Config(format!(
                            "rule {src:?} filed under '{letter}'"
                        )));
                    }
                    Ok(rule)
                })
                .collect::<Result<Vec<_>>>()?;
            rules.insert(letter, compiled);
        }
        Ok(Self { rules })
    }

    /// Rules for a leading letter, in evaluation order.
    pub fn rules_for(&self, letter: char) -> &[Rule] {
        self.rules.get(&letter).map(Vec::as_slice).unwrap_or_default()
    }

    /// Total number of compiled rules.
    pub fn len(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    /// Whether the set holds no rules.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First rule matching `word` at cursor `pos`, or `None`.
    ///
    /// `None` covers both "no rules for this character" and "no rule's context
    /// fits"; the caller skips one character either way.
    pub fn match_rule(&self, word: &[char], pos: usize) -> Option<&Rule> {
        let letter = word.get(pos)?;
        let matched = self
            .rules_for(*letter)
            .iter()
            .find(|rule| rule.matches(word, pos));
        if matched.is_none() {
            tracing::trace!(letter = %letter, pos, "no letter-to-sound rule matched");
        }
        matched
    }
}
