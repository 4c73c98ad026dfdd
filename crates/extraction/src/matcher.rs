//! Tiered candidate matching
//!
//! A matcher owns an ordered list of pattern tiers. Higher tiers carry
//! higher confidence and pre-empt lower ones: the first candidate the
//! caller accepts stops the search. Resolvers that score candidates instead
//! of short-circuiting (the amount resolver) collect candidates from every
//! tier and decide afterwards.
//!
//! A pattern may express one logical value as several textual fragments
//! (hesitant speech between name parts, the two ends of a "between X and Y"
//! range). When a pattern has multiple capture groups the matcher joins the
//! non-empty group texts into a single candidate before emitting it.

use campaign_intake_core::Candidate;
use regex::Regex;

/// One priority bucket of patterns with a shared base confidence
pub struct PatternTier {
    pub name: &'static str,
    pub confidence: f32,
    pub patterns: Vec<Regex>,
}

impl PatternTier {
    pub fn new(name: &'static str, confidence: f32, patterns: Vec<Regex>) -> Self {
        Self {
            name,
            confidence,
            patterns,
        }
    }
}

/// A rejected candidate together with the rejection reason
#[derive(Debug, Clone)]
pub struct RejectedCandidate {
    pub candidate: Candidate,
    pub reason: String,
}

/// Ordered tier list evaluated in priority order
pub struct TieredMatcher {
    tiers: Vec<PatternTier>,
}

impl TieredMatcher {
    pub fn new(tiers: Vec<PatternTier>) -> Self {
        Self { tiers }
    }

    /// Find the first candidate the acceptance closure validates.
    ///
    /// Tiers are tried in priority order and the search stops at the first
    /// accepted candidate, so higher tiers pre-empt lower ones. Every
    /// rejected attempt is returned for the debug trace. The closure maps a
    /// raw candidate to its cleaned value, or an explanation of why the
    /// candidate was refused.
    pub fn first_accepted<F>(
        &self,
        text: &str,
        mut accept: F,
    ) -> (Option<(Candidate, String)>, Vec<RejectedCandidate>)
    where
        F: FnMut(&Candidate) -> Result<String, String>,
    {
        let mut rejected = Vec::new();

        for tier in &self.tiers {
            for pattern in &tier.patterns {
                for caps in pattern.captures_iter(text) {
                    let candidate = match candidate_from_captures(&caps, tier) {
                        Some(c) => c,
                        None => continue,
                    };
                    match accept(&candidate) {
                        Ok(value) => {
                            tracing::debug!(
                                tier = tier.name,
                                candidate = %candidate.text,
                                "Candidate accepted"
                            );
                            return (Some((candidate, value)), rejected);
                        }
                        Err(reason) => {
                            tracing::debug!(
                                tier = tier.name,
                                candidate = %candidate.text,
                                reason = %reason,
                                "Candidate rejected"
                            );
                            rejected.push(RejectedCandidate { candidate, reason });
                        }
                    }
                }
            }
        }

        (None, rejected)
    }

    /// Collect candidates from every tier, in tier order.
    pub fn all_candidates(&self, text: &str) -> Vec<Candidate> {
        let mut candidates = Vec::new();
        for tier in &self.tiers {
            for pattern in &tier.patterns {
                for caps in pattern.captures_iter(text) {
                    if let Some(candidate) = candidate_from_captures(&caps, tier) {
                        candidates.push(candidate);
                    }
                }
            }
        }
        candidates
    }
}

/// Build one candidate from a capture set, reconstructing a single logical
/// value from multiple sub-captures when the pattern fragments it.
fn candidate_from_captures(caps: &regex::Captures<'_>, tier: &PatternTier) -> Option<Candidate> {
    let full = caps.get(0)?;

    let text = if caps.len() > 1 {
        let fragments: Vec<&str> = (1..caps.len())
            .filter_map(|i| caps.get(i))
            .map(|m| m.as_str())
            .filter(|s| !s.trim().is_empty())
            .collect();
        if fragments.is_empty() {
            full.as_str().to_string()
        } else {
            fragments.join(" ")
        }
    } else {
        full.as_str().to_string()
    };

    Some(Candidate::new(
        text,
        (full.start(), full.end()),
        tier.name,
        tier.confidence,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> TieredMatcher {
        TieredMatcher::new(vec![
            PatternTier::new(
                "high",
                0.9,
                vec![Regex::new(r"alpha (\w+)").unwrap()],
            ),
            PatternTier::new(
                "low",
                0.4,
                vec![Regex::new(r"beta (\w+)").unwrap()],
            ),
        ])
    }

    #[test]
    fn test_higher_tier_preempts() {
        let m = matcher();
        let (hit, _) = m.first_accepted("beta one alpha two", |c| Ok(c.text.clone()));
        let (candidate, value) = hit.unwrap();
        assert_eq!(candidate.tier, "high");
        assert_eq!(value, "two");
    }

    #[test]
    fn test_rejection_falls_through_to_lower_tier() {
        let m = matcher();
        let (hit, rejected) = m.first_accepted("alpha bad beta good", |c| {
            if c.text == "bad" {
                Err("blacklisted".into())
            } else {
                Ok(c.text.clone())
            }
        });
        let (candidate, _) = hit.unwrap();
        assert_eq!(candidate.tier, "low");
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].reason, "blacklisted");
    }

    #[test]
    fn test_no_match_returns_none_with_attempts() {
        let m = matcher();
        let (hit, rejected) = m.first_accepted("alpha nope", |_| Err("refused".into()));
        assert!(hit.is_none());
        assert_eq!(rejected.len(), 1);
    }

    #[test]
    fn test_fragment_reconstruction() {
        let m = TieredMatcher::new(vec![PatternTier::new(
            "range",
            0.8,
            vec![Regex::new(r"between (\d+) and (\d+)").unwrap()],
        )]);
        let candidates = m.all_candidates("somewhere between 400 and 600 dollars");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].text, "400 600");
    }

    #[test]
    fn test_all_candidates_spans_all_tiers() {
        let m = matcher();
        let candidates = m.all_candidates("alpha one beta two alpha three");
        let tiers: Vec<&str> = candidates.iter().map(|c| c.tier).collect();
        assert_eq!(tiers, vec!["high", "high", "low"]);
    }
}
