//! Requester name resolution
//!
//! Tiered extraction of the speaker's name from a first-person narrative.
//! Tiers run highest-confidence first: an explicit self-introduction beats
//! an honorific-prefixed mention, which beats third-person references,
//! speaker-identification suffixes, possessive forms, fragments
//! reconstructed from hesitant speech, and finally a bare
//! capitalized-token heuristic.
//!
//! Every candidate goes through the same cleanup chain and validation;
//! the first candidate (in tier order) that survives wins. A transcript
//! that declines to give a name always resolves to None.

use campaign_intake_core::{NameAttempt, NameTrace};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::matcher::{PatternTier, TieredMatcher};

/// One word of a name: capitalized, letters/apostrophes/hyphens only
const NAME_WORD: &str = "[A-Z][A-Za-z'-]+";

/// Tokens a resolved name may never equal (fillers, urgency words, titles)
const BLACKLIST: &[&str] = &[
    "um", "uh", "er", "well", "okay", "yeah", "yes", "no", "hello", "hi", "hey",
    "thanks", "thank", "please", "sorry", "urgent", "urgently", "emergency",
    "help", "asap", "sir", "madam", "mister", "doctor", "miss", "anonymous",
    "someone", "somebody", "nobody", "name", "not sure", "no name", "none",
    "speaking", "calling", "here", "today", "again",
];

/// Leading tokens stripped from candidates before validation
const LEAD_NOISE: &[&str] = &[
    "um", "uh", "er", "well", "so", "yeah", "okay", "like", "actually", "again",
    "its", "it's", "is",
];

const HONORIFICS: &[&str] = &[
    "mr", "mr.", "mrs", "mrs.", "ms", "ms.", "dr", "dr.", "miss", "mx", "mx.",
    "mister", "doctor", "madam", "sir",
];

const GENERATIONAL_SUFFIXES: &[&str] = &[
    "jr", "jr.", "sr", "sr.", "ii", "iii", "iv", "2nd", "3rd", "4th",
];

/// Common nickname forms expanded to canonical full names
const NICKNAMES: &[(&str, &str)] = &[
    ("abby", "Abigail"),
    ("alex", "Alexander"),
    ("andy", "Andrew"),
    ("becky", "Rebecca"),
    ("beth", "Elizabeth"),
    ("bill", "William"),
    ("billy", "William"),
    ("bob", "Robert"),
    ("bobby", "Robert"),
    ("cathy", "Catherine"),
    ("chris", "Christopher"),
    ("dan", "Daniel"),
    ("danny", "Daniel"),
    ("dave", "David"),
    ("deb", "Deborah"),
    ("debbie", "Deborah"),
    ("drew", "Andrew"),
    ("ed", "Edward"),
    ("eddie", "Edward"),
    ("jack", "John"),
    ("jen", "Jennifer"),
    ("jenny", "Jennifer"),
    ("jim", "James"),
    ("jimmy", "James"),
    ("joe", "Joseph"),
    ("joey", "Joseph"),
    ("johnny", "John"),
    ("kate", "Katherine"),
    ("kathy", "Katherine"),
    ("katie", "Katherine"),
    ("liz", "Elizabeth"),
    ("maggie", "Margaret"),
    ("mike", "Michael"),
    ("nick", "Nicholas"),
    ("pat", "Patricia"),
    ("patty", "Patricia"),
    ("peggy", "Margaret"),
    ("rick", "Richard"),
    ("rob", "Robert"),
    ("sam", "Samuel"),
    ("steve", "Steven"),
    ("sue", "Susan"),
    ("ted", "Theodore"),
    ("tom", "Thomas"),
    ("tommy", "Thomas"),
    ("tony", "Anthony"),
];

static DECLINE_SIGNAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:\b(?:prefers?|rather|don'?t want|do not want|won'?t)\b[^.]{0,30}\b(?:give|share|say|state)\b[^.]{0,30}\bname\b|\bremain anonymous\b|\bstay anonymous\b|\bkeep my name private\b|\bwithout giving (?:my|a) name\b)",
    )
    .unwrap()
});

static REPEATED_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.,!?;:]{1,}").unwrap());

/// Result of one name resolution
#[derive(Debug, Clone)]
pub struct ResolvedName {
    pub name: Option<String>,
    pub confidence: f32,
    pub trace: NameTrace,
}

/// Tiered name resolver
pub struct NameResolver {
    matcher: TieredMatcher,
}

impl Default for NameResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl NameResolver {
    pub fn new() -> Self {
        Self {
            matcher: TieredMatcher::new(build_tiers()),
        }
    }

    /// Resolve the requester name from a transcript.
    pub fn resolve(&self, text: &str) -> ResolvedName {
        let mut trace = NameTrace::default();

        // An explicit "prefers not to give a name" signal forces None no
        // matter what the tiers would find.
        if DECLINE_SIGNAL.is_match(text) {
            trace.declined = true;
            tracing::debug!("Name declined by speaker");
            return ResolvedName {
                name: None,
                confidence: 0.0,
                trace,
            };
        }

        let (hit, rejected) = self.matcher.first_accepted(text, |candidate| {
            let cleaned = clean_candidate(&candidate.text);
            let normalized = strip_affixes(&cleaned);
            validate_name(&normalized).map(|_| normalized)
        });

        for r in rejected {
            trace.attempts.push(NameAttempt {
                tier: r.candidate.tier.to_string(),
                candidate: r.candidate.text,
                outcome: r.reason,
            });
        }

        match hit {
            Some((candidate, name)) => {
                trace.attempts.push(NameAttempt {
                    tier: candidate.tier.to_string(),
                    candidate: candidate.text.clone(),
                    outcome: "accepted".to_string(),
                });
                ResolvedName {
                    name: Some(name),
                    confidence: candidate.confidence,
                    trace,
                }
            }
            None => ResolvedName {
                name: None,
                confidence: 0.0,
                trace,
            },
        }
    }
}

fn build_tiers() -> Vec<PatternTier> {
    let one_to_four = format!(r"{w}(?:\s+{w}){{0,3}}", w = NAME_WORD);
    let one_to_three = format!(r"{w}(?:\s+{w}){{0,2}}", w = NAME_WORD);
    let one_to_two = format!(r"{w}(?:\s+{w})?", w = NAME_WORD);

    vec![
        PatternTier::new(
            "self_introduction",
            0.95,
            vec![
                Regex::new(&format!(
                    r"(?:my|My|MY) name(?:'s| is| being)?[\s.,:]+({})",
                    one_to_four
                ))
                .unwrap(),
                Regex::new(&format!(r"\b(?:I am|I'm)\s+({})", one_to_four)).unwrap(),
                Regex::new(&format!(r"\b(?:this is|This is)\s+({})", one_to_four)).unwrap(),
            ],
        ),
        PatternTier::new(
            "honorific",
            0.9,
            vec![Regex::new(&format!(
                r"\b(?:Mr|Mrs|Ms|Dr|Miss|Mx|Mister|Doctor)\.?\s+({})",
                one_to_three
            ))
            .unwrap()],
        ),
        PatternTier::new(
            "third_person",
            0.8,
            vec![
                Regex::new(&format!(
                    r"\b(?:called|known as|goes by|call me)\s+({})",
                    one_to_three
                ))
                .unwrap(),
                Regex::new(&format!(r"\bname's\s+({})", one_to_three)).unwrap(),
            ],
        ),
        PatternTier::new(
            "speaker_suffix",
            0.75,
            vec![
                Regex::new(&format!(r"\b({})\s+speaking\b", one_to_three)).unwrap(),
                Regex::new(&format!(r"\b({})\s+here[,.]", one_to_three)).unwrap(),
            ],
        ),
        PatternTier::new(
            "possessive",
            0.6,
            vec![Regex::new(&format!(
                r"\b({})'s\s+(?:situation|story|family|request|case|behalf)",
                one_to_two
            ))
            .unwrap()],
        ),
        PatternTier::new(
            "reconstructed",
            0.5,
            vec![Regex::new(&format!(
                r"(?:my|My) name(?: is)?[\s.,]*(?:(?:uh|um|er)[\s.,]+)*({w})[\s.,]+(?:(?:uh|um|er)[\s.,]+)+({w})",
                w = NAME_WORD
            ))
            .unwrap()],
        ),
        PatternTier::new(
            "capitalized_pair",
            0.3,
            vec![Regex::new(&format!(r"\b({w}\s+{w})\b", w = NAME_WORD)).unwrap()],
        ),
    ]
}

/// Cleanup chain applied to every raw candidate: leading noise, repeated
/// punctuation, embedded currency/number tokens, nickname expansion.
fn clean_candidate(raw: &str) -> String {
    let collapsed = REPEATED_PUNCT.replace_all(raw, " ");

    let mut words: Vec<&str> = collapsed.split_whitespace().collect();

    while let Some(first) = words.first() {
        let lower = first.to_lowercase();
        if LEAD_NOISE.contains(&lower.as_str()) || HONORIFICS.contains(&lower.as_str()) {
            words.remove(0);
        } else {
            break;
        }
    }

    // Currency and number tokens never belong in a name
    words.retain(|w| !w.chars().any(|c| c.is_ascii_digit() || c == '$'));

    let mut owned: Vec<String> = words.iter().map(|w| w.to_string()).collect();
    if let Some(first) = owned.first_mut() {
        let lower = first.to_lowercase();
        if let Some((_, canonical)) = NICKNAMES.iter().find(|(nick, _)| *nick == lower) {
            *first = (*canonical).to_string();
        }
    }

    owned.join(" ")
}

/// Strip leading honorifics and trailing generational suffixes. Applied to
/// tier results and equally to names arriving from an external strategy.
pub fn strip_affixes(name: &str) -> String {
    let mut words: Vec<&str> = name.split_whitespace().collect();

    while let Some(first) = words.first() {
        if HONORIFICS.contains(&first.to_lowercase().as_str()) {
            words.remove(0);
        } else {
            break;
        }
    }

    while let Some(last) = words.last() {
        if GENERATIONAL_SUFFIXES.contains(&last.to_lowercase().as_str()) {
            words.pop();
        } else {
            break;
        }
    }

    words.join(" ")
}

/// Validate a cleaned candidate
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.len() < 2 || name.len() > 50 {
        return Err("length out of range".to_string());
    }
    if !name
        .chars()
        .all(|c| c.is_alphabetic() || c == ' ' || c == '\'' || c == '-')
    {
        return Err("contains non-name characters".to_string());
    }
    let words: Vec<&str> = name.split_whitespace().collect();
    if words.is_empty() || words.len() > 4 {
        return Err("word count out of range".to_string());
    }
    match name.chars().next() {
        Some(c) if c.is_uppercase() => {}
        _ => return Err("not capitalized".to_string()),
    }
    let alpha: Vec<char> = name.chars().filter(|c| c.is_alphabetic()).collect();
    if alpha.len() > 2 && alpha.iter().all(|c| c.is_uppercase()) {
        return Err("all caps".to_string());
    }
    let lower = name.to_lowercase();
    if BLACKLIST.contains(&lower.as_str())
        || words
            .iter()
            .all(|w| BLACKLIST.contains(&w.to_lowercase().as_str()))
    {
        return Err("blacklisted token".to_string());
    }
    if !words.iter().any(|w| w.chars().count() >= 3) {
        return Err("no plausible name word".to_string());
    }
    Ok(())
}

/// Full normalization for externally supplied names: cleanup, affix strip,
/// validation. Returns None when the input does not survive validation.
pub fn normalize_name(raw: &str) -> Option<String> {
    let cleaned = clean_candidate(raw);
    let normalized = strip_affixes(&cleaned);
    validate_name(&normalized).ok().map(|_| normalized)
}
