//! Urgency assessment
//!
//! Four-level classification driven by an ordered rule table; the first
//! matching rule wins. Downplaying language ("not urgent", "others have it
//! worse") is checked first: when objectively severe circumstances are also
//! present - an imminent legal deadline or a life-threatening medical need -
//! the objective signal wins and the downplaying is discarded as subjective
//! noise. The reverse never happens: downplaying cannot suppress an
//! objective signal.
//!
//! Category and resolved amount arrive as context but act only as secondary
//! signals; a SAFETY category never forces CRITICAL by itself.

use campaign_intake_core::{Category, UrgencyContext, UrgencyLevel, UrgencyTrace};
use once_cell::sync::Lazy;
use regex::Regex;

static DOWNPLAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:not urgent|no rush|no hurry|can probably manage|can manage for now|whenever you can|others have it worse|not a big deal|take your time|not an emergency|don'?t want to be dramatic)\b")
        .unwrap()
});

static LIFE_THREATENING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:life-?threatening|dying|could die|without (?:my|her|his) (?:insulin|medication)|dialysis|emergency surgery|icu|intensive care|critical condition)\b")
        .unwrap()
});

static DEADLINE_NOUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:foreclos\w+|evict\w+|shut(?:-| )?off|shut off|disconnect\w*|repossess\w*|court date|hearing|final notice|deadline)\b")
        .unwrap()
});

static IMMINENT_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:today|tonight|tomorrow|within (?:24|48) hours|in (?:a|one|two|1|2) days?|within (?:1|2|one|two) days|by (?:tonight|tomorrow|the end of the day)|this weekend)\b")
        .unwrap()
});

static NEAR_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:this week|within (?:a|the) week|in (?:a few|three|four|five|3|4|5) days|by (?:monday|tuesday|wednesday|thursday|friday|saturday|sunday))\b")
        .unwrap()
});

static DISPLACEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:nowhere to (?:go|stay|sleep)|no place to (?:go|stay|sleep)|homeless|uninhabitable|severely damaged|unsafe to stay|sleeping in (?:my|the|our) car|fire destroyed|flooded|flooding)\b")
        .unwrap()
});

static IMMEDIATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:right now|immediately|can'?t wait|in danger|about to (?:lose|be))\b")
        .unwrap()
});

static HIGH_MARKERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:urgent|as soon as possible|asap|within days|final notice|behind on rent|running out of (?:time|money|medication)|getting desperate)\b")
        .unwrap()
});

static LOW_EXCLUSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:just planning ahead|planning ahead|no deadline|someday|eventually|when(?:ever)? (?:possible|convenient)|down the road|no particular timeline|thinking ahead)\b")
        .unwrap()
});

static MEDIUM_MARKERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:this month|within a few weeks|in the next few weeks|soon|getting worse|struggling|falling behind|tight this month)\b")
        .unwrap()
});

/// Signals extracted once per transcript, consumed by the rule table
#[derive(Debug, Clone, Copy, Default)]
struct Signals {
    downplay: bool,
    life_threatening: bool,
    imminent_deadline: bool,
    near_deadline: bool,
    displacement: bool,
    immediate: bool,
    high_markers: bool,
    medium_markers: bool,
    low_exclusion: bool,
}

struct UrgencyRule {
    name: &'static str,
    level: UrgencyLevel,
    objective_override: bool,
    confidence: f32,
    matches: fn(&Signals) -> bool,
}

/// Ordered cascade; first matching rule wins
static RULES: &[UrgencyRule] = &[
    UrgencyRule {
        name: "downplayed_objective_critical",
        level: UrgencyLevel::Critical,
        objective_override: true,
        confidence: 0.9,
        matches: |s| s.downplay && (s.life_threatening || s.imminent_deadline),
    },
    UrgencyRule {
        name: "downplayed_objective_high",
        level: UrgencyLevel::High,
        objective_override: true,
        confidence: 0.85,
        matches: |s| s.downplay && s.near_deadline,
    },
    UrgencyRule {
        name: "downplayed",
        level: UrgencyLevel::Low,
        objective_override: false,
        confidence: 0.75,
        matches: |s| s.downplay,
    },
    UrgencyRule {
        name: "low_exclusion",
        level: UrgencyLevel::Low,
        objective_override: false,
        confidence: 0.7,
        matches: |s| s.low_exclusion,
    },
    UrgencyRule {
        name: "critical_markers",
        level: UrgencyLevel::Critical,
        objective_override: false,
        confidence: 0.85,
        matches: |s| s.life_threatening || s.imminent_deadline || s.displacement || s.immediate,
    },
    UrgencyRule {
        name: "high_markers",
        level: UrgencyLevel::High,
        objective_override: false,
        confidence: 0.75,
        matches: |s| s.high_markers || s.near_deadline,
    },
    UrgencyRule {
        name: "medium_markers",
        level: UrgencyLevel::Medium,
        objective_override: false,
        confidence: 0.6,
        matches: |s| s.medium_markers,
    },
    UrgencyRule {
        name: "default_medium",
        level: UrgencyLevel::Medium,
        objective_override: false,
        confidence: 0.5,
        matches: |_| true,
    },
];

/// Result of one urgency assessment
#[derive(Debug, Clone)]
pub struct UrgencyDecision {
    pub level: UrgencyLevel,
    pub confidence: f32,
    pub trace: UrgencyTrace,
}

/// Rule-table urgency assessor
#[derive(Default)]
pub struct UrgencyAssessor;

impl UrgencyAssessor {
    pub fn new() -> Self {
        Self
    }

    pub fn assess(&self, text: &str, context: &UrgencyContext) -> UrgencyDecision {
        let signals = collect_signals(text);

        let rule = RULES
            .iter()
            .find(|r| (r.matches)(&signals))
            .unwrap_or(&RULES[RULES.len() - 1]);

        let mut confidence = rule.confidence;
        let mut trace = UrgencyTrace {
            rule: rule.name.to_string(),
            override_reason: None,
            objective_override: rule.objective_override,
        };

        if rule.objective_override {
            trace.override_reason = Some(
                if signals.life_threatening {
                    "life-threatening medical need overrides downplaying language"
                } else {
                    "imminent deadline overrides downplaying language"
                }
                .to_string(),
            );
        }

        // Context only nudges confidence, never the level
        if rule.name == "default_medium"
            && matches!(context.category, Category::Safety | Category::Emergency)
        {
            confidence = 0.55;
        }

        tracing::debug!(rule = rule.name, level = %rule.level, "Urgency resolved");

        UrgencyDecision {
            level: rule.level,
            confidence,
            trace,
        }
    }
}

fn collect_signals(text: &str) -> Signals {
    Signals {
        downplay: DOWNPLAY.is_match(text),
        life_threatening: LIFE_THREATENING.is_match(text),
        imminent_deadline: deadline_with_time(text, &IMMINENT_TIME),
        near_deadline: deadline_with_time(text, &NEAR_TIME),
        displacement: DISPLACEMENT.is_match(text),
        immediate: IMMEDIATE.is_match(text),
        high_markers: HIGH_MARKERS.is_match(text),
        medium_markers: MEDIUM_MARKERS.is_match(text),
        low_exclusion: LOW_EXCLUSION.is_match(text),
    }
}

/// A deadline noun counts only when a matching time expression sits within
/// the same local window - "imminent deadline" is a semantic class, not a
/// phrase list.
fn deadline_with_time(text: &str, time: &Regex) -> bool {
    for m in DEADLINE_NOUN.find_iter(text) {
        let mut start = m.start().saturating_sub(80);
        while start > 0 && !text.is_char_boundary(start) {
            start -= 1;
        }
        let mut end = (m.end() + 80).min(text.len());
        while end < text.len() && !text.is_char_boundary(end) {
            end += 1;
        }
        if time.is_match(&text[start..end]) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> UrgencyContext {
        UrgencyContext {
            category: Category::Other,
            amount: None,
        }
    }

    fn assess(text: &str) -> UrgencyDecision {
        UrgencyAssessor::new().assess(text, &context())
    }

    #[test]
    fn test_flood_displacement_is_critical() {
        let decision = assess(
            "This is Jennifer Martinez. Our apartment was severely damaged by flooding and I \
             have two young children with nowhere to go.",
        );
        assert_eq!(decision.level, UrgencyLevel::Critical);
    }

    #[test]
    fn test_objective_deadline_overrides_downplaying() {
        let decision = assess(
            "The bank says the foreclosure goes through tomorrow. But it's not urgent really, \
             others have it worse.",
        );
        assert_eq!(decision.level, UrgencyLevel::Critical);
        assert!(decision.trace.objective_override);
        assert!(decision.trace.override_reason.is_some());
    }

    #[test]
    fn test_life_threatening_overrides_downplaying() {
        let decision = assess(
            "I don't want to be dramatic, it's not a big deal, but my mother cannot go without \
             her insulin and her condition is life-threatening.",
        );
        assert!(decision.level >= UrgencyLevel::High);
        assert!(decision.trace.objective_override);
    }

    #[test]
    fn test_downplaying_alone_is_low() {
        let decision = assess("It's not urgent at all, whenever you can, others have it worse.");
        assert_eq!(decision.level, UrgencyLevel::Low);
        assert!(!decision.trace.objective_override);
    }

    #[test]
    fn test_low_exclusion() {
        let decision = assess("I'm just planning ahead for next semester, no deadline on this.");
        assert_eq!(decision.level, UrgencyLevel::Low);
    }

    #[test]
    fn test_high_markers() {
        let decision = assess("I got a final notice on the electric bill and I'm behind on rent.");
        assert_eq!(decision.level, UrgencyLevel::High);
    }

    #[test]
    fn test_medium_markers() {
        let decision = assess("Things are getting worse and money is tight this month.");
        assert_eq!(decision.level, UrgencyLevel::Medium);
    }

    #[test]
    fn test_unmatched_defaults_to_medium() {
        let decision = assess("I would appreciate any support with this situation.");
        assert_eq!(decision.level, UrgencyLevel::Medium);
        assert_eq!(decision.trace.rule, "default_medium");
    }

    #[test]
    fn test_safety_category_alone_does_not_force_critical() {
        let assessor = UrgencyAssessor::new();
        let decision = assessor.assess(
            "I would appreciate any support with this situation.",
            &UrgencyContext {
                category: Category::Safety,
                amount: None,
            },
        );
        assert_eq!(decision.level, UrgencyLevel::Medium);
    }

    #[test]
    fn test_deadline_noun_without_time_is_not_imminent() {
        let decision = assess("There was talk of foreclosure at some point.");
        assert_ne!(decision.level, UrgencyLevel::Critical);
    }

    #[test]
    fn test_deterministic() {
        let text = "Final notice came in, shut off is tomorrow, but others have it worse.";
        let a = assess(text);
        let b = assess(text);
        assert_eq!(a.level, b.level);
        assert_eq!(a.trace.rule, b.trace.rule);
    }
}
