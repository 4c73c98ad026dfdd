//! Goal amount resolution
//!
//! Candidates come from two merged sources: the fixed vague-quantity
//! lexicon ("a couple thousand"), and tiered patterns covering currency
//! figures, "between X and Y" ranges (resolved to their midpoint), written
//! numbers, and bare numerals. Overlapping spans are deduplicated in favor
//! of the longer match, non-monetary numbers (ages, phone numbers, postal
//! codes, calendar years) are filtered out by local context, and the
//! survivors are scored against goal-oriented context. The highest-scoring
//! candidate wins; ties fall to discovery order.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::matcher::{PatternTier, TieredMatcher};
use crate::numbers;

/// Result of one amount resolution
#[derive(Debug, Clone, Copy)]
pub struct ResolvedAmount {
    pub amount: Option<f64>,
    pub confidence: f32,
}

#[derive(Debug, Clone)]
struct AmountCandidate {
    value: f64,
    span: (usize, usize),
    tier: &'static str,
    confidence: f32,
}

static PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+?1[-.\s]?)?\(?\d{3}\)?[-.\s]\d{3}[-.\s]\d{4}\b|\b\d{10}\b").unwrap()
});

static AGE_BEFORE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:age|aged|turned|turning|i\s+am|i'm|(?:daughter|son|child|kid|mother|father|mom|dad|wife|husband|brother|sister|grandmother|grandfather|grandma|grandpa|niece|nephew|baby|he|she)\s+(?:is|was|just turned))\s*(?:only\s*)?$",
    )
    .unwrap()
});

static AGE_AFTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(?:years?[- ]old|yrs?[- ]old|year[- ]old)").unwrap());

static YEAR_BEFORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:in|since|back in|until|by|from|of)\s*$").unwrap());

static ZIP_CONTEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bzip|postal").unwrap());

static MEDICAL_CONTEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:hospital|medical|surgery|surgical|treatment|medication|prescription|doctor|clinic|deductible|copay|therapy)\b")
        .unwrap()
});

static DIRECT_GOAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:need|needs|asking for|ask for|raise|raising|requesting|looking for|trying to (?:get|raise)|short)\s*(?:about|around|roughly|at least|maybe|like|another|an additional)?\s*\$?$",
    )
    .unwrap()
});

static GOAL_CONTEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:need|goal|raise|raising|asking|requesting|looking for|help with|cover|catch up|short|fundrais\w*)\b")
        .unwrap()
});

static REMAINING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:remaining|still need|left to (?:pay|cover|raise)|the rest)\b").unwrap()
});

static INSURANCE_COVERED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\binsurance\b[^.]{0,40}\b(?:cover(?:s|ed|ing)?|pays?|paid|will pay|took care of)\b|\bcovered by insurance\b",
    )
    .unwrap()
});

static INCOME_BEFORE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:earn|earning|earns|make|making|makes|salary|income|bring home|take home)\s*(?:about|around|roughly)?\s*\$?$",
    )
    .unwrap()
});

static INCOME_AFTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:a month|per month|monthly|a week|per week|an hour|per hour)").unwrap()
});

/// Tiered amount resolver
pub struct AmountResolver {
    matcher: TieredMatcher,
}

impl Default for AmountResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl AmountResolver {
    pub fn new() -> Self {
        Self {
            matcher: TieredMatcher::new(build_tiers()),
        }
    }

    /// Resolve the goal amount from a transcript.
    pub fn resolve(&self, text: &str) -> ResolvedAmount {
        let text_lower = text.to_lowercase();

        let mut candidates = Vec::new();

        // Source 1: pattern tiers
        for raw in self.matcher.all_candidates(text) {
            let value = match raw.tier {
                "range_midpoint" => parse_range(&raw.text),
                "written_number" => numbers::parse_written_number(&raw.text),
                _ => parse_numeric(&raw.text),
            };
            let Some(value) = value else { continue };
            if !plausible(raw.tier, value) {
                continue;
            }
            candidates.push(AmountCandidate {
                value,
                span: raw.span,
                tier: raw.tier,
                confidence: raw.confidence,
            });
        }

        // Source 2: the vague-quantity lexicon, suppressed entirely when
        // the speaker says they do not know the amount
        if !numbers::has_amount_uncertainty(&text_lower) {
            for (value, span) in numbers::vague_quantity_matches(&text_lower) {
                candidates.push(AmountCandidate {
                    value,
                    span,
                    tier: "vague_quantity",
                    confidence: 0.5,
                });
            }
        }

        let candidates = dedup_overlaps(candidates);
        let survivors: Vec<AmountCandidate> = candidates
            .into_iter()
            .filter(|c| {
                let keep = !is_non_monetary(text, c);
                if !keep {
                    tracing::debug!(value = c.value, tier = c.tier, "Amount candidate filtered");
                }
                keep
            })
            .collect();

        if survivors.is_empty() {
            return ResolvedAmount {
                amount: None,
                confidence: 0.0,
            };
        }

        let mut best: Option<(usize, f32)> = None;
        for (i, candidate) in survivors.iter().enumerate() {
            let score = score_candidate(text, candidate, &survivors);
            tracing::debug!(value = candidate.value, tier = candidate.tier, score, "Amount candidate scored");
            // Strictly-greater keeps the earliest candidate on ties
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((i, score));
            }
        }

        let (index, score) = best.unwrap();
        let winner = &survivors[index];
        let confidence = (winner.confidence + (score * 0.03).clamp(-0.2, 0.25)).clamp(0.1, 0.95);

        ResolvedAmount {
            amount: Some(winner.value),
            confidence,
        }
    }
}

fn build_tiers() -> Vec<PatternTier> {
    let alt = numbers::NUMBER_WORDS_ALT;
    vec![
        PatternTier::new(
            "currency_figure",
            0.9,
            vec![
                Regex::new(r"\$\s*([0-9][0-9,]*(?:\.[0-9]{1,2})?)").unwrap(),
                Regex::new(r"(?i)\b([0-9][0-9,]*(?:\.[0-9]{1,2})?)\s*(?:dollars|bucks|usd)\b")
                    .unwrap(),
            ],
        ),
        PatternTier::new(
            "range_midpoint",
            0.85,
            vec![
                Regex::new(r"(?i)between\s+\$?([0-9][0-9,]*)\s+and\s+\$?([0-9][0-9,]*)").unwrap(),
                Regex::new(r"\$([0-9][0-9,]*)\s*(?:to|-)\s*\$([0-9][0-9,]*)").unwrap(),
            ],
        ),
        PatternTier::new(
            "written_number",
            0.8,
            vec![
                Regex::new(&format!(
                    r"(?i)\b((?:{alt})(?:[\s-]+(?:{alt}))*)\s+(?:dollars|bucks)\b"
                ))
                .unwrap(),
                Regex::new(&format!(
                    r"(?i)\b(?:need|needs|needing|raise|raising|asking for|looking for|requesting|costs?|owe)\s+(?:about|around|roughly|maybe|like|at least|almost)?\s*((?:{alt})(?:[\s-]+(?:{alt}))*)\b"
                ))
                .unwrap(),
            ],
        ),
        PatternTier::new(
            "bare_number",
            0.5,
            vec![Regex::new(r"\b([0-9]{1,3}(?:,[0-9]{3})+|[0-9]{3,7})\b").unwrap()],
        ),
    ]
}

fn parse_numeric(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned.parse::<f64>().ok()
}

/// A range candidate carries both ends as reconstructed fragments
fn parse_range(text: &str) -> Option<f64> {
    let mut ends = text
        .split_whitespace()
        .filter_map(parse_numeric);
    let low = ends.next()?;
    let high = ends.next()?;
    Some((low + high) / 2.0)
}

fn plausible(tier: &str, value: f64) -> bool {
    if value <= 0.0 {
        return false;
    }
    match tier {
        // "need one more chance" should never read as $1
        "written_number" | "bare_number" => value >= 20.0,
        _ => true,
    }
}

/// Collapse overlapping spans, preferring the longer (more specific) match;
/// equal lengths fall to discovery order. Survivors come back in discovery
/// order so the later tie-break stays stable.
fn dedup_overlaps(candidates: Vec<AmountCandidate>) -> Vec<AmountCandidate> {
    let mut indexed: Vec<(usize, AmountCandidate)> = candidates.into_iter().enumerate().collect();
    indexed.sort_by(|(ai, a), (bi, b)| {
        let a_len = a.span.1 - a.span.0;
        let b_len = b.span.1 - b.span.0;
        b_len.cmp(&a_len).then(ai.cmp(bi))
    });

    let mut kept: Vec<(usize, AmountCandidate)> = Vec::new();
    for (index, candidate) in indexed {
        let overlaps = kept
            .iter()
            .any(|(_, k)| k.span.0 < candidate.span.1 && candidate.span.0 < k.span.1);
        if !overlaps {
            kept.push((index, candidate));
        }
    }

    kept.sort_by_key(|(index, _)| *index);
    kept.into_iter().map(|(_, c)| c).collect()
}

/// Context windows around a span, clamped to char boundaries
fn windows(text: &str, span: (usize, usize), before: usize, after: usize) -> (&str, &str) {
    let mut start = span.0.saturating_sub(before);
    while start > 0 && !text.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (span.1 + after).min(text.len());
    while end < text.len() && !text.is_char_boundary(end) {
        end += 1;
    }
    (&text[start..span.0], &text[span.1..end])
}

/// True when the number reads as an age, phone number, postal code or
/// calendar year rather than money. Medical context nearby keeps age/year/
/// zip readings alive; phone numbers are never monetary.
fn is_non_monetary(text: &str, candidate: &AmountCandidate) -> bool {
    // Phone spans poison any overlapping candidate
    for m in PHONE.find_iter(text) {
        if m.start() < candidate.span.1 && candidate.span.0 < m.end() {
            return true;
        }
    }

    // Explicitly monetary tiers are exempt from the remaining readings
    if candidate.tier != "bare_number" {
        return false;
    }

    let (pre_wide, post_wide) = windows(text, candidate.span, 60, 60);
    if MEDICAL_CONTEXT.is_match(pre_wide) || MEDICAL_CONTEXT.is_match(post_wide) {
        return false;
    }

    let (pre, post) = windows(text, candidate.span, 40, 16);
    let digits = &text[candidate.span.0..candidate.span.1];

    // Age reading
    if candidate.value <= 120.0 && (AGE_BEFORE.is_match(pre) || AGE_AFTER.is_match(post)) {
        return true;
    }

    // Calendar year reading
    if digits.len() == 4
        && (1900.0..=2099.0).contains(&candidate.value)
        && YEAR_BEFORE.is_match(pre)
    {
        return true;
    }

    // Postal code reading
    if digits.len() == 5 && (ZIP_CONTEXT.is_match(pre) || ZIP_CONTEXT.is_match(post)) {
        return true;
    }

    false
}

fn score_candidate(text: &str, candidate: &AmountCandidate, survivors: &[AmountCandidate]) -> f32 {
    let mut score = 0.0f32;

    let (pre, post) = windows(text, candidate.span, 30, 30);
    let (pre_wide, post_wide) = windows(text, candidate.span, 80, 80);
    let own = &text[candidate.span.0..candidate.span.1];

    // Goal-context phrases, weighted by specificity: a need-verb directly
    // before the number outweighs goal language somewhere in the window
    if DIRECT_GOAL.is_match(pre) || GOAL_CONTEXT.is_match(own) {
        score += 3.0;
    } else if GOAL_CONTEXT.is_match(pre_wide) || GOAL_CONTEXT.is_match(post_wide) {
        score += 1.5;
    }

    // Later amounts tend to be the actual ask
    if !text.is_empty() {
        score += candidate.span.0 as f32 / text.len() as f32;
    }

    // Uniqueness
    let occurrences = survivors
        .iter()
        .filter(|c| (c.value - candidate.value).abs() < 0.01)
        .count();
    if occurrences == 1 {
        score += 0.5;
    }

    // Round numbers are asked-for numbers
    if (candidate.value % 100.0).abs() < f64::EPSILON {
        score += 0.5;
    } else if (candidate.value % 50.0).abs() < f64::EPSILON {
        score += 0.25;
    }

    // Partial-coverage amounts ("the remaining $X")
    if REMAINING.is_match(pre_wide) || REMAINING.is_match(post_wide) {
        score += 1.0;
    }

    // A figure the insurance already covers is not the ask
    if INSURANCE_COVERED.is_match(pre_wide) || INSURANCE_COVERED.is_match(post_wide) {
        score -= 5.0;
    }

    // Income reads ("I earn $X monthly") are not the ask either
    if INCOME_BEFORE.is_match(pre) || INCOME_AFTER.is_match(post) {
        score -= 2.0;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(text: &str) -> ResolvedAmount {
        AmountResolver::new().resolve(text)
    }

    #[test]
    fn test_explicit_ask_beats_total_and_income() {
        let resolved = resolve(
            "My name is Maria Torres. My medical bills total $47,000 but I'm asking for $5,000 \
             to cover the most critical ones. I earn $2,100 monthly and my daughter is 7.",
        );
        assert_eq!(resolved.amount, Some(5000.0));
    }

    #[test]
    fn test_written_compound_hundreds() {
        let resolved = resolve(
            "My landlord is threatening eviction and I need about eighteen hundred dollars to catch up on rent.",
        );
        assert_eq!(resolved.amount, Some(1800.0));
    }

    #[test]
    fn test_written_with_cost_verb() {
        let resolved = resolve("The certification program costs twenty-eight hundred dollars.");
        assert_eq!(resolved.amount, Some(2800.0));
    }

    #[test]
    fn test_range_resolves_to_midpoint() {
        let resolved = resolve("I need somewhere between $400 and $600 for the repair.");
        assert_eq!(resolved.amount, Some(500.0));
    }

    #[test]
    fn test_vague_quantity() {
        let resolved = resolve("I need a couple thousand to cover the deposit.");
        assert_eq!(resolved.amount, Some(2500.0));
    }

    #[test]
    fn test_uncertainty_suppresses_vague_lexicon() {
        let resolved = resolve("Honestly I'm not sure how much, maybe a couple thousand.");
        assert_eq!(resolved.amount, None);
        assert_eq!(resolved.confidence, 0.0);
    }

    #[test]
    fn test_age_is_not_an_amount() {
        let resolved = resolve("My daughter is 7 and we need help.");
        assert_eq!(resolved.amount, None);
    }

    #[test]
    fn test_phone_number_is_not_an_amount() {
        let resolved = resolve("Call me back at 555-123-4567 about the donation.");
        assert_eq!(resolved.amount, None);
    }

    #[test]
    fn test_calendar_year_is_not_an_amount() {
        let resolved = resolve("I lost my job in 2023 and things got hard.");
        assert_eq!(resolved.amount, None);
    }

    #[test]
    fn test_zip_code_is_not_an_amount() {
        let resolved = resolve("I live in zip 90210 with my family.");
        assert_eq!(resolved.amount, None);
    }

    #[test]
    fn test_bare_number_with_goal_context_survives() {
        let resolved = resolve("I need 1500 to fix the transmission.");
        assert_eq!(resolved.amount, Some(1500.0));
    }

    #[test]
    fn test_insurance_covered_amount_penalized() {
        let resolved = resolve(
            "Insurance covered $30,000 of the surgery. I still need $4,000 for the rest of it.",
        );
        assert_eq!(resolved.amount, Some(4000.0));
    }

    #[test]
    fn test_no_candidates_is_not_an_error() {
        let resolved = resolve("I could really use some support right now.");
        assert_eq!(resolved.amount, None);
        assert_eq!(resolved.confidence, 0.0);
    }

    #[test]
    fn test_amount_positive() {
        let resolved = resolve("I need $250 for groceries this week.");
        assert!(resolved.amount.unwrap() > 0.0);
    }
}
