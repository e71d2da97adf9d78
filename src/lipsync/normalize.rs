//! Text normalization ahead of letter-to-sound conversion.
//!
//! Normalization never changes how many input words there are: callers that
//! hold a per-word timing array normalize word by word with
//! [`normalize_words`] and get back exactly one (possibly empty, possibly
//! multi-token) string per input word.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use super::numbers;

/// Symbols spoken as words.
const SYMBOLS: &[(char, &str)] = &[
    ('%', "percent"),
    ('€', "euros"),
    ('&', "and"),
    ('+', "plus"),
    ('$', "dollars"),
];

/// Normalize raw text for phonetic analysis.
///
/// Applies the following transformations in order:
/// 1. Symbols → spoken words (`50%` → `50 percent `)
/// 2. Digit runs → number words, when `expand_numbers` is set
/// 3. Upper-case
/// 4. Strip diacritics (`É` → `E`)
/// 5. Strip punctuation (apostrophes vanish, everything else becomes a space), then NFC
/// 6. Squeeze runs of 3+ identical letters down to 2
/// 7. Collapse whitespace and trim
///
/// The result is a fixed point: normalizing it again returns it unchanged.
pub fn normalize(raw: &str, expand_numbers: bool) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let text = expand_symbols(raw);
    let text = if expand_numbers {
        expand_digits(&text)
    } else {
        text
    };
    let text = strip_diacritics(&text.to_uppercase());
    // Dropped apostrophes can leave composable neighbours behind.
    let text: String = strip_punctuation(&text).nfc().collect();
    let text = squeeze_repeats(&text);
    collapse_whitespace(&text)
}

/// Normalize each word independently, keeping the output index-aligned with the input.
pub fn normalize_words<S: AsRef<str>>(words: &[S], expand_numbers: bool) -> Vec<String> {
    words
        .iter()
        .map(|w| normalize(w.as_ref(), expand_numbers))
        .collect()
}

fn expand_symbols(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match SYMBOLS.iter().find(|(symbol, _)| *symbol == ch) {
            Some((_, word)) => {
                result.push(' ');
                result.push_str(word);
                result.push(' ');
            }
            None => result.push(ch),
        }
    }
    result
}

/// Expand ASCII digit runs into words.
///
/// - `555-1234`: hyphen-joined digit groups are read digit by digit
/// - `1,000`: a comma followed by exactly three digits is a thousands separator
/// - `3.5` / `3,5`: any other separator between digits reads as "point"
/// - `21st`: an ordinal suffix turns the reading into an ordinal
fn expand_digits(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let mut result = String::with_capacity(text.len() * 2);
    let mut i = 0;

    while i < len {
        if !chars[i].is_ascii_digit() {
            result.push(chars[i]);
            i += 1;
            continue;
        }

        let mut groups: Vec<String> = Vec::new();
        let mut grouped = false;
        let mut j = i;
        loop {
            let mut group = String::new();
            while j < len {
                if chars[j].is_ascii_digit() {
                    group.push(chars[j]);
                    j += 1;
                } else if is_thousands_separator(&chars, j) {
                    grouped = true;
                    j += 1;
                } else {
                    break;
                }
            }
            groups.push(group);
            if j + 1 < len && chars[j] == '-' && chars[j + 1].is_ascii_digit() {
                j += 1;
                continue;
            }
            break;
        }

        let words = if groups.len() > 1 {
            groups
                .iter()
                .map(|g| numbers::digit_by_digit(g))
                .collect::<Vec<_>>()
                .join(" ")
        } else if grouped {
            groups[0]
                .parse::<u64>()
                .map(numbers::cardinal)
                .unwrap_or_else(|_| numbers::digit_by_digit(&groups[0]))
        } else if j + 1 < len && matches!(chars[j], '.' | ',') && chars[j + 1].is_ascii_digit() {
            let start = j + 1;
            let mut end = start;
            while end < len && chars[end].is_ascii_digit() {
                end += 1;
            }
            let fraction: String = chars[start..end].iter().collect();
            let whole = numbers::number_to_words(&groups[0]);
            j = end;
            format!("{whole} point {}", numbers::digit_by_digit(&fraction))
        } else if let Some(suffix_len) = ordinal_suffix(&chars, j) {
            j += suffix_len;
            numbers::ordinal(&numbers::number_to_words(&groups[0]))
        } else {
            numbers::number_to_words(&groups[0])
        };

        result.push(' ');
        result.push_str(&words);
        result.push(' ');
        i = j;
    }

    result
}

fn is_thousands_separator(chars: &[char], at: usize) -> bool {
    chars[at] == ','
        && at > 0
        && chars[at - 1].is_ascii_digit()
        && at + 3 < chars.len()
        && chars[at + 1..=at + 3].iter().all(|c| c.is_ascii_digit())
        && chars.get(at + 4).is_none_or(|c| !c.is_ascii_digit())
}

/// Length of an ordinal suffix (`st`, `nd`, `rd`, `th`) at `at` that ends the word.
fn ordinal_suffix(chars: &[char], at: usize) -> Option<usize> {
    let suffix: String = chars.get(at..at + 2)?.iter().collect();
    let is_ordinal = matches!(
        suffix.to_ascii_lowercase().as_str(),
        "st" | "nd" | "rd" | "th"
    );
    let ends_word = chars.get(at + 2).is_none_or(|c| !c.is_alphanumeric());
    (is_ordinal && ends_word).then_some(2)
}

fn strip_diacritics(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).nfc().collect()
}

/// Drop apostrophes (so contractions stay one token) and turn any other
/// non-alphanumeric character into a space.
fn strip_punctuation(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '\'' | '\u{2019}' | '\u{2018}'))
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect()
}

fn squeeze_repeats(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut prev: Option<char> = None;
    let mut run = 0;
    for ch in text.chars() {
        if Some(ch) == prev {
            run += 1;
        } else {
            prev = Some(ch);
            run = 1;
        }
        if run <= 2 || ch.is_ascii_digit() {
            result.push(ch);
        }
    }
    result
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn empty_input_is_empty() {
        assert_eq!(normalize("", true), "");
        assert_eq!(normalize("   ", true), "");
        assert_eq!(normalize("?!", false), "");
    }

    #[test]
    fn upper_cases_and_strips_punctuation() {
        assert_eq!(normalize("Hello, world!", false), "HELLO WORLD");
        assert_eq!(normalize("don't", false), "DONT");
        assert_eq!(normalize("\"quoted\";", false), "QUOTED");
    }

    #[test]
    fn symbols_become_words() {
        assert_eq!(normalize("rock&roll", false), "ROCK AND ROLL");
        assert_eq!(normalize("2+2", true), "TWO PLUS TWO");
        assert_eq!(normalize("50%", true), "FIFTY PERCENT");
        assert_eq!(normalize("$", false), "DOLLARS");
        assert_eq!(normalize("€", false), "EUROS");
    }

    #[test]
    fn digits_expand_only_when_requested() {
        assert_eq!(normalize("42", true), "FORTY TWO");
        assert_eq!(normalize("42", false), "42");
    }

    #[test]
    fn phone_numbers_read_digit_by_digit() {
        assert_eq!(
            normalize("555-0199", true),
            "FIVE FIVE FIVE OH ONE NINE NINE"
        );
    }

    #[test]
    fn decimals_and_thousands() {
        assert_eq!(normalize("3.5", true), "THREE POINT FIVE");
        assert_eq!(normalize("3,25", true), "THREE POINT TWO FIVE");
        assert_eq!(normalize("1,000", true), "ONE THOUSAND");
        assert_eq!(normalize("1,000,000", true), "ONE MILLION");
    }

    #[test]
    fn ordinals_expand() {
        assert_eq!(normalize("21st", true), "TWENTY FIRST");
        assert_eq!(normalize("3rd", true), "THIRD");
        assert_eq!(normalize("1strange", true), "ONE STRANGE");
    }

    #[test]
    fn years_expand_as_pairs() {
        assert_eq!(normalize("1999", true), "NINETEEN NINETY NINE");
        assert_eq!(normalize("2024", true), "TWENTY TWENTY FOUR");
    }

    #[test]
    fn diacritics_are_stripped() {
        assert_eq!(normalize("café", false), "CAFE");
        assert_eq!(normalize("naïve Zoë", false), "NAIVE ZOE");
    }

    #[test]
    fn repeated_letters_are_squeezed() {
        assert_eq!(normalize("soooo", false), "SOO");
        assert_eq!(normalize("sSs", false), "SS");
        assert_eq!(normalize("1000", false), "1000");
    }

    #[test]
    fn whitespace_collapses() {
        assert_eq!(normalize("  a \t b\n\nc  ", false), "A B C");
    }

    #[test]
    fn normalize_is_idempotent() {
        let samples = [
            "Hello, World!",
            "It's 2024 & prices rose 15% to $3.50",
            "Call 555-1234 or 911",
            "Zoë's café — naïve?",
            "sooooo gooood!!!",
            "ǰ ß ﬁ Ǆ",
            "The 21st of 1,000,000 items",
            "   ",
            "x-y/z_w",
            "\u{1100}'\u{1161}",
        ];
        for s in samples {
            for expand in [true, false] {
                let once = normalize(s, expand);
                assert_eq!(normalize(&once, expand), once, "not idempotent for {s:?}");
            }
        }
    }

    #[test]
    fn jamo_split_by_apostrophe_compose_once() {
        assert_eq!(normalize("\u{1100}'\u{1161}", false), "\u{AC00}");
    }

    #[test]
    fn normalize_words_keeps_alignment() {
        let words = ["Hello,", "--", "2024", "world"];
        let normalized = normalize_words(&words, true);
        assert_eq!(normalized.len(), words.len());
        assert_eq!(normalized[0], "HELLO");
        assert_eq!(normalized[1], "");
        assert_eq!(normalized[2], "TWENTY TWENTY FOUR");
        assert_eq!(normalized[3], "WORLD");
    }
}
