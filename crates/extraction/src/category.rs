//! Need category classification
//!
//! Scores the twelve need categories by keyword hits, applies
//! category-specific adjustments, and resolves close calls through a small
//! table of pairwise conflict rules plus a fixed priority order. Conflict
//! resolution follows root-cause-vs-consequence: a direct claim of violence
//! beats an eviction-threat mention, a direct "laid off" claim beats a
//! passing rent mention unless the rent need is recurring.

use std::collections::HashMap;

use campaign_intake_core::Category;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

/// Minimum raw score to stay eligible. TRANSPORTATION is exempt so it can
/// still win its disambiguation against EMPLOYMENT.
const MIN_CATEGORY_SCORE: f32 = 1.0;

/// Scores closer than this fall to the priority order
const CLEAR_LEAD: f32 = 2.0;

const LEXICONS: &[(Category, &[&str])] = &[
    (
        Category::Safety,
        &[
            "abusive", "abuse", "domestic violence", "violence", "violent",
            "threatening me", "threatened me", "stalking", "stalker",
            "restraining order", "afraid for my safety", "afraid for my life",
            "unsafe at home", "hit me", "hurt me", "in danger", "fled", "shelter",
        ],
    ),
    (
        Category::Legal,
        &[
            "lawyer", "attorney", "court", "custody battle", "legal fees",
            "lawsuit", "bail", "court date", "hearing", "immigration case",
            "deportation", "legal aid",
        ],
    ),
    (
        Category::Healthcare,
        &[
            "medical", "hospital", "surgery", "doctor", "medication",
            "prescription", "treatment", "diagnosis", "therapy", "dental",
            "medical bills", "chemo", "dialysis", "insulin", "health",
        ],
    ),
    (
        Category::Emergency,
        &[
            "emergency", "disaster", "fire", "flood", "flooding", "storm",
            "hurricane", "tornado", "accident", "crash", "destroyed", "damaged",
        ],
    ),
    (
        Category::Housing,
        &[
            "rent", "evict", "evicted", "eviction", "landlord", "mortgage",
            "foreclosure", "apartment", "housing", "homeless", "deposit",
            "lease", "behind on rent", "security deposit",
        ],
    ),
    (
        Category::Employment,
        &[
            "lost my job", "laid off", "fired", "unemployed", "unemployment",
            "out of work", "paycheck", "hours were cut", "between jobs",
            "job interview", "work boots", "uniform for work",
        ],
    ),
    (
        Category::Education,
        &[
            "tuition", "school", "college", "university", "certification",
            "training", "course", "program", "textbooks", "semester", "degree",
            "classes", "exam fee", "student",
        ],
    ),
    (
        Category::Family,
        &[
            "my kids", "my children", "childcare", "daycare", "babysitter",
            "caring for my mother", "caring for my father", "caregiver",
            "funeral", "my family", "diapers", "baby formula",
        ],
    ),
    (
        Category::Food,
        &[
            "groceries", "food", "meals", "feed my", "hungry", "food bank",
            "pantry", "formula",
        ],
    ),
    (
        Category::Utilities,
        &[
            "electric bill", "electricity", "power bill", "water bill",
            "gas bill", "utility", "utilities", "shut off", "shutoff",
            "disconnect", "heating", "heat bill", "internet bill",
        ],
    ),
    (
        Category::Transportation,
        &[
            "car", "vehicle", "truck", "transmission", "brakes", "engine",
            "tires", "mechanic", "bus pass", "commute", "gas money",
            "car payment", "car repair",
        ],
    ),
];

/// Known conflict pairs and their dedicated resolvers
struct ConflictRule {
    pair: (Category, Category),
    resolve: fn(&str) -> (Category, &'static str),
}

static CONFLICT_RULES: &[ConflictRule] = &[
    ConflictRule {
        pair: (Category::Housing, Category::Safety),
        resolve: |text| {
            if VIOLENCE.is_match(text) {
                (Category::Safety, "direct violence claim overrides eviction threat")
            } else {
                (Category::Housing, "eviction threat without violence language")
            }
        },
    },
    ConflictRule {
        pair: (Category::Healthcare, Category::Safety),
        resolve: |text| {
            if VIOLENCE.is_match(text) {
                (Category::Safety, "direct violence claim overrides medical mention")
            } else {
                (Category::Healthcare, "medical need without violence language")
            }
        },
    },
    ConflictRule {
        pair: (Category::Employment, Category::Housing),
        resolve: |text| {
            if LOST_JOB.is_match(text) && !RECURRING_RENT.is_match(text) {
                (Category::Employment, "job loss is the root cause of the rent mention")
            } else {
                (Category::Housing, "recurring rent need outweighs the job mention")
            }
        },
    },
    ConflictRule {
        pair: (Category::Employment, Category::Emergency),
        resolve: |text| {
            if SUDDEN_EVENT.is_match(text) {
                (Category::Emergency, "sudden event outweighs the employment mention")
            } else {
                (Category::Employment, "no sudden event behind the emergency wording")
            }
        },
    },
    ConflictRule {
        pair: (Category::Employment, Category::Transportation),
        resolve: |text| {
            if VEHICLE.is_match(text) && COMMUTE.is_match(text) {
                (Category::Transportation, "vehicle repair is what unblocks the job")
            } else {
                (Category::Employment, "employment need without a vehicle blocker")
            }
        },
    },
    ConflictRule {
        pair: (Category::Education, Category::Employment),
        resolve: |text| {
            if EDUCATION_LANGUAGE.find_iter(text).count() >= 2 {
                (Category::Education, "certification/training language dominates the job loss")
            } else {
                (Category::Employment, "job loss dominates the training mention")
            }
        },
    },
];

static VIOLENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:violence|violent|abusive|abuse|hit me|hurt me|threatening me|threatened me|stalking|afraid for my (?:safety|life)|domestic)\b")
        .unwrap()
});

static EVICTION_THREAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:evict(?:ion|ed)?|eviction notice|kicked out|losing (?:the|my|our) (?:apartment|house|home))\b")
        .unwrap()
});

static MEDICAL_EMERGENCY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:life-?threatening|emergency surgery|icu|intensive care|critical condition)\b")
        .unwrap()
});

static LOST_JOB: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:lost my job|laid off|fired|let go from)\b").unwrap()
});

static RECURRING_RENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:every month|each month|months? behind on rent|behind on rent for)\b")
        .unwrap()
});

static SUDDEN_EVENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:accident|fire|flood(?:ing)?|storm|hurricane|tornado|disaster|collapsed)\b")
        .unwrap()
});

static VEHICLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:car|truck|vehicle|transmission|brakes|engine|tires)\b").unwrap()
});

static COMMUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:get(?:ting)? to work|drive to work|commute|to my job|for work)\b")
        .unwrap()
});

static EDUCATION_LANGUAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:certification|training|course|program|tuition|degree|recertif\w*)\b")
        .unwrap()
});

static GOAL_WORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:need|help|raise|asking|requesting|cover|afford)\b").unwrap()
});

/// "This is not medical/housing-related, just personal" forces OTHER
static PERSONAL_DISCLAIMER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:isn't|is not|not|nothing)\s+(?:really\s+)?(?:a\s+)?(?:medical|health|housing)(?:-related| related)?\b[^.]{0,60}\bjust\s+(?:a\s+)?personal\b")
        .unwrap()
});

/// Result of one classification
#[derive(Debug, Clone)]
pub struct CategoryDecision {
    pub category: Category,
    pub confidence: f32,
    pub reasons: Vec<String>,
}

/// Keyword-scoring classifier with data-driven conflict resolution
pub struct CategoryClassifier {
    /// Extra keywords merged into the built-in lexicons at scoring time
    extra_keywords: RwLock<HashMap<Category, Vec<String>>>,
}

impl Default for CategoryClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryClassifier {
    pub fn new() -> Self {
        Self {
            extra_keywords: RwLock::new(HashMap::new()),
        }
    }

    /// Extend one category's lexicon at runtime
    pub fn add_keywords(&self, category: Category, keywords: Vec<String>) {
        self.extra_keywords
            .write()
            .entry(category)
            .or_default()
            .extend(keywords);
    }

    /// Classify the transcript, with the already-resolved amount available
    /// as a secondary signal.
    pub fn classify(&self, text: &str, amount: Option<f64>) -> CategoryDecision {
        let mut reasons = Vec::new();

        if PERSONAL_DISCLAIMER.is_match(text) {
            reasons.push("explicit personal-need disclaimer".to_string());
            return CategoryDecision {
                category: Category::Other,
                confidence: 0.9,
                reasons,
            };
        }

        let text_lower = text.to_lowercase();
        let tokens: Vec<&str> = text_lower.unicode_words().collect();
        let has_goal_language = GOAL_WORDS.is_match(text) || amount.is_some();

        let mut scores: HashMap<Category, f32> = HashMap::new();
        let extra = self.extra_keywords.read();

        for (category, lexicon) in LEXICONS {
            let mut hits = 0usize;
            let mut occurrences = 0usize;
            for phrase in *lexicon {
                let count = phrase_count(&text_lower, &tokens, phrase);
                if count > 0 {
                    hits += 1;
                    occurrences += count;
                }
            }
            if let Some(extras) = extra.get(category) {
                for phrase in extras {
                    let count = phrase_count(&text_lower, &tokens, phrase);
                    if count > 0 {
                        hits += 1;
                        occurrences += count;
                    }
                }
            }
            if hits == 0 {
                continue;
            }
            // Repeated mentions of the same keyword add half weight each
            let mut score = hits as f32 + 0.5 * (occurrences - hits) as f32;
            if has_goal_language {
                score += 0.5;
            }
            scores.insert(*category, score);
        }

        self.apply_adjustments(text, &mut scores, &mut reasons);

        let survivors: Vec<(Category, f32)> = scores
            .iter()
            .filter(|(category, score)| {
                **score >= MIN_CATEGORY_SCORE
                    || (**category == Category::Transportation && **score > 0.0)
            })
            .map(|(c, s)| (*c, *s))
            .collect();

        let decision = self.resolve(text, survivors, &mut reasons);
        tracing::debug!(category = %decision.0, "Category resolved");

        CategoryDecision {
            category: decision.0,
            confidence: decision.1,
            reasons,
        }
    }

    fn apply_adjustments(
        &self,
        text: &str,
        scores: &mut HashMap<Category, f32>,
        reasons: &mut Vec<String>,
    ) {
        if VEHICLE.is_match(text) && COMMUTE.is_match(text) {
            *scores.entry(Category::Transportation).or_insert(0.0) += 2.0;
            if let Some(score) = scores.get_mut(&Category::Employment) {
                *score -= 1.0;
            }
            reasons.push("vehicle-repair and work-commute language co-occur".to_string());
        }

        if LOST_JOB.is_match(text) && EDUCATION_LANGUAGE.find_iter(text).count() >= 2 {
            *scores.entry(Category::Education).or_insert(0.0) += 1.5;
            if let Some(score) = scores.get_mut(&Category::Employment) {
                *score -= 0.5;
            }
            reasons.push("certification/training language dominates the lost-job mention".to_string());
        }
    }

    fn resolve(
        &self,
        text: &str,
        mut survivors: Vec<(Category, f32)>,
        reasons: &mut Vec<String>,
    ) -> (Category, f32) {
        survivors.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.priority_rank().cmp(&b.0.priority_rank()))
        });

        match survivors.len() {
            0 => {
                reasons.push("no category signal; defaulting".to_string());
                (Category::Other, 0.3)
            }
            1 => {
                let (category, score) = survivors[0];
                reasons.push(format!("single surviving category {} ({:.1})", category, score));
                (category, winner_confidence(score))
            }
            2 => {
                let pair = (survivors[0].0, survivors[1].0);
                if let Some(rule) = CONFLICT_RULES.iter().find(|r| {
                    r.pair == pair || r.pair == (pair.1, pair.0)
                }) {
                    let (category, reason) = (rule.resolve)(text);
                    reasons.push(format!("conflict {}/{}: {}", pair.0, pair.1, reason));
                    let score = survivors
                        .iter()
                        .find(|(c, _)| *c == category)
                        .map(|(_, s)| *s)
                        .unwrap_or(MIN_CATEGORY_SCORE);
                    (category, winner_confidence(score))
                } else {
                    self.resolve_by_lead(survivors, reasons)
                }
            }
            _ => self.resolve_by_lead(survivors, reasons),
        }
    }

    fn resolve_by_lead(
        &self,
        survivors: Vec<(Category, f32)>,
        reasons: &mut Vec<String>,
    ) -> (Category, f32) {
        let (top, top_score) = survivors[0];
        let runner_up = survivors[1].1;

        if top_score - runner_up > CLEAR_LEAD {
            reasons.push(format!("{} leads by more than {:.0} points", top, CLEAR_LEAD));
            return (top, winner_confidence(top_score));
        }

        // Close scores fall to the fixed priority order
        let contender = survivors
            .iter()
            .filter(|(_, s)| top_score - *s <= CLEAR_LEAD)
            .min_by_key(|(c, _)| c.priority_rank())
            .map(|(c, s)| (*c, *s))
            .unwrap_or((top, top_score));

        reasons.push(format!(
            "close scores resolved by priority order to {}",
            contender.0
        ));
        (contender.0, winner_confidence(contender.1) * 0.9)
    }
}

/// Final explicit-threat/eviction/medical-emergency check. Applied by the
/// orchestrator after any enhancement strategies; it always takes
/// precedence over their output.
pub fn final_precedence(text: &str) -> Option<(Category, &'static str)> {
    if VIOLENCE.is_match(text) {
        return Some((Category::Safety, "explicit violence language"));
    }
    if EVICTION_THREAT.is_match(text) {
        return Some((Category::Housing, "eviction threat"));
    }
    if MEDICAL_EMERGENCY.is_match(text) {
        return Some((Category::Healthcare, "medical emergency language"));
    }
    None
}

fn winner_confidence(score: f32) -> f32 {
    (0.35 + 0.12 * score).min(0.95)
}

/// Count phrase occurrences; single words match whole tokens only so "car"
/// never counts inside "care".
fn phrase_count(text_lower: &str, tokens: &[&str], phrase: &str) -> usize {
    if phrase.contains(' ') {
        text_lower.match_indices(phrase).count()
    } else {
        tokens.iter().filter(|t| **t == phrase).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> CategoryDecision {
        CategoryClassifier::new().classify(text, None)
    }

    fn classify_with_amount(text: &str, amount: f64) -> CategoryDecision {
        CategoryClassifier::new().classify(text, Some(amount))
    }

    #[test]
    fn test_healthcare() {
        let decision = classify_with_amount(
            "My medical bills total $47,000 but I'm asking for $5,000 to cover the most critical ones.",
            5000.0,
        );
        assert_eq!(decision.category, Category::Healthcare);
    }

    #[test]
    fn test_housing_eviction() {
        let decision = classify_with_amount(
            "My landlord is threatening eviction and I need about eighteen hundred dollars to catch up on rent.",
            1800.0,
        );
        assert_eq!(decision.category, Category::Housing);
    }

    #[test]
    fn test_food() {
        let decision = classify_with_amount("I need $200 for groceries.", 200.0);
        assert_eq!(decision.category, Category::Food);
    }

    #[test]
    fn test_education_beats_employment() {
        let decision = classify(
            "I need help finishing my certification program. I lost my job and need this training \
             to get back on my feet. The program costs twenty-eight hundred dollars.",
        );
        assert_eq!(decision.category, Category::Education);
    }

    #[test]
    fn test_violence_beats_eviction() {
        let decision = classify(
            "My landlord wants to evict us but the real problem is my ex has been violent and \
             abusive and I'm afraid for my safety.",
        );
        assert_eq!(decision.category, Category::Safety);
    }

    #[test]
    fn test_eviction_without_violence_is_housing() {
        let decision = classify("I got an eviction notice and I'm behind on rent.");
        assert_eq!(decision.category, Category::Housing);
    }

    #[test]
    fn test_transportation_for_work() {
        let decision = classify(
            "My car needs a new transmission and without it I can't get to work. I might lose my job over this.",
        );
        assert_eq!(decision.category, Category::Transportation);
    }

    #[test]
    fn test_job_loss_beats_passing_rent_mention() {
        let decision = classify(
            "I was laid off last week. Rent is due soon and I have nothing coming in.",
        );
        assert_eq!(decision.category, Category::Employment);
    }

    #[test]
    fn test_recurring_rent_stays_housing() {
        let decision = classify(
            "I was laid off, and I've been behind on rent for three months now; every month it gets worse.",
        );
        assert_eq!(decision.category, Category::Housing);
    }

    #[test]
    fn test_personal_disclaimer_forces_other() {
        let decision = classify(
            "This is not medical or housing related, it's just a personal setback I need help with.",
        );
        assert_eq!(decision.category, Category::Other);
    }

    #[test]
    fn test_no_signal_defaults_to_other() {
        let decision = classify("I could use a little support right now.");
        assert_eq!(decision.category, Category::Other);
        assert!(decision.confidence < 0.5);
    }

    #[test]
    fn test_final_precedence_order() {
        assert_eq!(
            final_precedence("He has been violent and I got an eviction notice."),
            Some((Category::Safety, "explicit violence language"))
        );
        assert_eq!(
            final_precedence("I got an eviction notice last week."),
            Some((Category::Housing, "eviction threat"))
        );
        assert_eq!(
            final_precedence("Her condition is life-threatening."),
            Some((Category::Healthcare, "medical emergency language"))
        );
        assert_eq!(final_precedence("I need help with groceries."), None);
    }

    #[test]
    fn test_runtime_keywords_extend_lexicon() {
        let classifier = CategoryClassifier::new();
        classifier.add_keywords(Category::Utilities, vec!["hydro bill".to_string()]);
        let decision = classifier.classify("I can't pay my hydro bill this month.", None);
        assert_eq!(decision.category, Category::Utilities);
    }

    #[test]
    fn test_always_resolves_to_a_category() {
        for text in ["", "hello", "asdf qwer zxcv", "help help help"] {
            let decision = classify(text);
            assert!(Category::ALL.contains(&decision.category));
        }
    }
}
