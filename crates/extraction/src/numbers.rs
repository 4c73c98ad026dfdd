//! Written-number parsing and the vague-quantity lexicon
//!
//! Spoken narratives carry amounts as words more often than digits:
//! "eighteen hundred dollars", "twenty-eight hundred", "two thousand five
//! hundred". This module resolves compound constructions through a
//! number-word table, and maps the fixed vague-quantity lexicon ("a couple
//! thousand") onto concrete values.

/// Alternation of every token the written-number parser understands,
/// for embedding into amount patterns.
pub const NUMBER_WORDS_ALT: &str = "zero|one|two|three|four|five|six|seven|eight|nine|ten|\
eleven|twelve|thirteen|fourteen|fifteen|sixteen|seventeen|eighteen|nineteen|\
twenty|thirty|forty|fifty|sixty|seventy|eighty|ninety|hundred|thousand|million|and";

/// Fixed vague-quantity lexicon, longest phrases first so that scanning
/// never matches a prefix of a longer entry.
pub const VAGUE_QUANTITIES: &[(&str, f64)] = &[
    ("a couple of thousand", 2500.0),
    ("a couple thousand", 2500.0),
    ("a few thousand", 3500.0),
    ("several thousand", 5000.0),
    ("a couple of hundred", 250.0),
    ("a couple hundred", 250.0),
    ("a few hundred", 350.0),
    ("several hundred", 500.0),
];

/// Phrases that signal the speaker does not know the amount. Their presence
/// suppresses the vague-quantity lexicon entirely.
const AMOUNT_UNCERTAINTY: &[&str] = &[
    "not sure how much",
    "don't know how much",
    "do not know how much",
    "no idea how much",
    "hard to say how much",
    "not sure what it will cost",
];

fn unit_value(word: &str) -> Option<f64> {
    let v = match word {
        "zero" => 0.0,
        "one" => 1.0,
        "two" => 2.0,
        "three" => 3.0,
        "four" => 4.0,
        "five" => 5.0,
        "six" => 6.0,
        "seven" => 7.0,
        "eight" => 8.0,
        "nine" => 9.0,
        "ten" => 10.0,
        "eleven" => 11.0,
        "twelve" => 12.0,
        "thirteen" => 13.0,
        "fourteen" => 14.0,
        "fifteen" => 15.0,
        "sixteen" => 16.0,
        "seventeen" => 17.0,
        "eighteen" => 18.0,
        "nineteen" => 19.0,
        "twenty" => 20.0,
        "thirty" => 30.0,
        "forty" => 40.0,
        "fifty" => 50.0,
        "sixty" => 60.0,
        "seventy" => 70.0,
        "eighty" => 80.0,
        "ninety" => 90.0,
        _ => return None,
    };
    Some(v)
}

/// Parse a written-out number phrase to its numeric value.
///
/// Handles compound hundred/thousand constructions the way they are
/// actually spoken: "eighteen hundred" is 1800, "twenty-eight hundred" is
/// 2800, "two thousand five hundred" is 2500. Returns None when any token
/// is not a number word.
pub fn parse_written_number(phrase: &str) -> Option<f64> {
    let mut total = 0.0;
    let mut current = 0.0;
    let mut saw_number = false;

    for token in phrase
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|t| !t.is_empty())
    {
        let token = token.to_lowercase();
        if let Some(v) = unit_value(&token) {
            current += v;
            saw_number = true;
        } else {
            match token.as_str() {
                "hundred" => {
                    if current == 0.0 {
                        current = 1.0;
                    }
                    current *= 100.0;
                    saw_number = true;
                }
                "thousand" => {
                    if current == 0.0 {
                        current = 1.0;
                    }
                    total += current * 1_000.0;
                    current = 0.0;
                    saw_number = true;
                }
                "million" => {
                    if current == 0.0 {
                        current = 1.0;
                    }
                    total += current * 1_000_000.0;
                    current = 0.0;
                    saw_number = true;
                }
                "and" => continue,
                _ => return None,
            }
        }
    }

    if saw_number {
        Some(total + current)
    } else {
        None
    }
}

/// True when the transcript contains explicit amount-uncertainty language.
pub fn has_amount_uncertainty(text_lower: &str) -> bool {
    AMOUNT_UNCERTAINTY.iter().any(|p| text_lower.contains(p))
}

/// All vague-quantity phrase occurrences with their byte spans.
pub fn vague_quantity_matches(text_lower: &str) -> Vec<(f64, (usize, usize))> {
    let mut matches: Vec<(f64, (usize, usize))> = Vec::new();
    for (phrase, value) in VAGUE_QUANTITIES {
        for (start, _) in text_lower.match_indices(phrase) {
            let span = (start, start + phrase.len());
            // Longer entries come first; skip spans already claimed
            if !matches.iter().any(|(_, s)| s.0 < span.1 && span.0 < s.1) {
                matches.push((*value, span));
            }
        }
    }
    matches.sort_by_key(|(_, span)| span.0);
    matches
}
