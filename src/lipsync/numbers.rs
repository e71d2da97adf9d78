//! English number-to-words expansion.
//!
//! Produces lower-case words; the normalizer upper-cases afterwards.

const DIGITS: [&str; 10] = [
    "oh", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
];
const ONES: [&str; 10] = [
    "", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
];
const TEENS: [&str; 10] = [
    "ten",
    "eleven",
    "twelve",
    "thirteen",
    "fourteen",
    "fifteen",
    "sixteen",
    "seventeen",
    "eighteen",
    "nineteen",
];
const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

/// Three-digit service codes that are always read digit by digit.
const SPOKEN_CODES: [&str; 8] = ["211", "311", "411", "511", "611", "711", "811", "911"];

/// Scale words for cardinal expansion, largest first.
const SCALES: [(u64, &str); 4] = [
    (1_000_000_000_000, "trillion"),
    (1_000_000_000, "billion"),
    (1_000_000, "million"),
    (1_000, "thousand"),
];

/// Read a digit string one digit at a time (`"0451"` → `"oh four five one"`).
pub fn digit_by_digit(digits: &str) -> String {
    digits
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(|d| DIGITS[d as usize])
        .collect::<Vec<_>>()
        .join(" ")
}

/// Expand a run of ASCII digits into words.
///
/// Special cases, in order:
/// - `"0"` → `"zero"`
/// - leading zero, 5-digit (ZIP-like) and 7/10-digit (phone-like) groups,
///   known service codes such as `911`, and anything too large for a cardinal
///   are read digit by digit
/// - 1900–1999 and 2000–2099 are read as paired-digit years
/// - everything else is a cardinal number
pub fn number_to_words(digits: &str) -> String {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return digits.to_owned();
    }
    if digits == "0" {
        return "zero".to_owned();
    }
    if digits.starts_with('0')
        || matches!(digits.len(), 5 | 7 | 10)
        || SPOKEN_CODES.contains(&digits)
    {
        return digit_by_digit(digits);
    }
    let Ok(n) = digits.parse::<u64>() else {
        return digit_by_digit(digits);
    };
    if n >= 1_000_000_000_000_000 {
        return digit_by_digit(digits);
    }
    if (1900..=2099).contains(&n) {
        return year(n);
    }
    cardinal(n)
}

/// Paired-digit year reading (`1984` → `"nineteen eighty four"`).
fn year(n: u64) -> String {
    let (high, low) = (n / 100, n % 100);
    match (high, low) {
        (20, 0) => "two thousand".to_owned(),
        (_, 0) => format!("{} hundred", tens(high)),
        (_, 1..=9) => format!("{} oh {}", tens(high), ONES[low as usize]),
        _ => format!("{} {}", tens(high), tens(low)),
    }
}

/// Cardinal reading of `n` (`1234` → `"one thousand two hundred thirty four"`).
pub fn cardinal(n: u64) -> String {
    if n == 0 {
        return "zero".to_owned();
    }
    let mut words: Vec<String> = Vec::new();
    let mut rest = n;
    for (scale, name) in SCALES {
        if rest >= scale {
            words.push(hundreds(rest / scale));
            words.push(name.to_owned());
            rest %= scale;
        }
    }
    if rest > 0 {
        words.push(hundreds(rest));
    }
    words.join(" ")
}

fn hundreds(n: u64) -> String {
    let n = n % 1000;
    if n > 99 {
        let rest = n % 100;
        if rest == 0 {
            format!("{} hundred", ONES[(n / 100) as usize])
        } else {
            format!("{} hundred {}", ONES[(n / 100) as usize], tens(rest))
        }
    } else {
        tens(n)
    }
}

fn tens(n: u64) -> String {
    let n = n % 100;
    match n {
        0..=9 => ONES[n as usize].to_owned(),
        10..=19 => TEENS[(n - 10) as usize].to_owned(),
        _ if n % 10 == 0 => TENS[(n / 10) as usize].to_owned(),
        _ => format!("{} {}", TENS[(n / 10) as usize], ONES[(n % 10) as usize]),
    }
}

/// Turn a cardinal reading into an ordinal one by rewriting its last word
/// (`"twenty two"` → `"twenty second"`).
pub fn ordinal(cardinal_words: &str) -> String {
    let (head, last) = match cardinal_words.rsplit_once(' ') {
        Some((head, last)) => (Some(head), last),
        None => (None, cardinal_words),
    };
    let last = match last {
        "one" => "first".to_owned(),
        "two" => "second".to_owned(),
        "three" => "third".to_owned(),
        "five" => "fifth".to_owned(),
        "eight" => "eighth".to_owned(),
        "nine" => "ninth".to_owned(),
        "twelve" => "twelfth".to_owned(),
        w if w.ends_with('y') => format!("{}ieth", &w[..w.len() - 1]),
        w => format!("{w}th"),
    };
    match head {
        Some(head) => format!("{head} {last}"),
        None => last,
    }
}
