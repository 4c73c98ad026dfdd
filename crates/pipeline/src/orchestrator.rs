//! Pipeline orchestrator
//!
//! Runs the four resolvers over one transcript. Data flows one way:
//! transcript -> {name, amount} (independent) -> category (sees the amount)
//! -> urgency (sees category and amount) -> assembled result. Optional
//! strategies are consulted at each stage; one that reports higher
//! confidence than the heuristic overrides it, one that fails is degraded
//! to baseline and recorded in the debug trace.

use std::sync::Arc;

use campaign_intake_config::PipelineConfig;
use campaign_intake_core::{
    AmountStrategy, CategoryAssessment, CategoryStrategy, DebugTrace, ExtractionResult,
    FieldConfidence, IntakeError, NameStrategy, Result, Transcript, UrgencyContext,
    UrgencyDeescalator, UrgencyStrategy, BENEFICIARY_SELF,
};
use campaign_intake_extraction::category::final_precedence;
use campaign_intake_extraction::name::normalize_name;
use campaign_intake_extraction::{
    AmountResolver, CategoryClassifier, NameResolver, UrgencyAssessor,
};

use crate::strategies::{
    ConservativeDeescalator, DeadlineUrgencyStrategy, DependentCareEnhancer,
    RecurringBillEnhancer,
};

/// The compile-time-known set of strategies one pipeline instance consults.
/// Built once from [`PipelineConfig`] and held read-only afterwards;
/// category enhancers run in the order they appear here.
#[derive(Default, Clone)]
pub struct StrategySet {
    pub name: Option<Arc<dyn NameStrategy>>,
    pub amount: Option<Arc<dyn AmountStrategy>>,
    pub urgency: Option<Arc<dyn UrgencyStrategy>>,
    pub category_enhancers: Vec<Arc<dyn CategoryStrategy>>,
    pub deescalator: Option<Arc<dyn UrgencyDeescalator>>,
}

impl StrategySet {
    /// Assemble the built-in strategies selected by the config switches.
    /// Enhancer order is fixed: dependent-care, then recurring-bill.
    pub fn from_config(config: &PipelineConfig) -> Self {
        let mut set = StrategySet::default();
        if config.alternate_urgency_strategy {
            set.urgency = Some(Arc::new(DeadlineUrgencyStrategy::new()));
        }
        if config.dependent_care_enhancer {
            set.category_enhancers
                .push(Arc::new(DependentCareEnhancer::new()));
        }
        if config.recurring_bill_enhancer {
            set.category_enhancers
                .push(Arc::new(RecurringBillEnhancer::new()));
        }
        if config.urgency_deescalation {
            set.deescalator = Some(Arc::new(ConservativeDeescalator::new()));
        }
        set
    }
}

/// Transcript-to-draft extraction pipeline
pub struct IntakePipeline {
    name_resolver: NameResolver,
    amount_resolver: AmountResolver,
    category_classifier: CategoryClassifier,
    urgency_assessor: UrgencyAssessor,
    strategies: StrategySet,
}

impl IntakePipeline {
    /// Build a pipeline with the built-in strategies the config selects
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_strategies(StrategySet::from_config(&config))
    }

    /// Build a pipeline around an explicit strategy set (tests, embedders)
    pub fn with_strategies(strategies: StrategySet) -> Self {
        Self {
            name_resolver: NameResolver::new(),
            amount_resolver: AmountResolver::new(),
            category_classifier: CategoryClassifier::new(),
            urgency_assessor: UrgencyAssessor::new(),
            strategies,
        }
    }

    /// Access the classifier, e.g. to extend lexicons from config
    pub fn category_classifier(&self) -> &CategoryClassifier {
        &self.category_classifier
    }

    /// Run one extraction. Pure given the transcript and the read-only
    /// strategy set; concurrent calls share no mutable state.
    pub async fn extract(&self, transcript: &Transcript) -> Result<ExtractionResult> {
        if transcript.is_blank() {
            return Err(IntakeError::InvalidInput(
                "transcript is empty".to_string(),
            ));
        }
        let text = transcript.text.as_str();
        let mut debug = DebugTrace::default();

        // Name and amount are independent of each other
        let resolved_name = self.name_resolver.resolve(text);
        debug.name = resolved_name.trace;
        let mut name = resolved_name.name;
        let mut name_confidence = resolved_name.confidence;

        if let Some(strategy) = &self.strategies.name {
            match strategy.extract(transcript).await {
                // A declined name stays declined no matter what the
                // strategy found
                Ok(outcome) if !debug.name.declined && outcome.confidence > name_confidence => {
                    if let Some(normalized) =
                        outcome.primary.as_deref().and_then(normalize_name)
                    {
                        debug.name.attempts.push(campaign_intake_core::NameAttempt {
                            tier: format!("strategy:{}", strategy.id()),
                            candidate: normalized.clone(),
                            outcome: "accepted".to_string(),
                        });
                        name = Some(normalized);
                        name_confidence = outcome.confidence;
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(strategy = strategy.id(), error = %err, "Name strategy failed");
                    debug
                        .strategy_failures
                        .push(format!("{}: {}", strategy.id(), err));
                }
            }
        }

        let resolved_amount = self.amount_resolver.resolve(text);
        let mut amount = resolved_amount.amount;
        let mut amount_confidence = resolved_amount.confidence;

        if let Some(strategy) = &self.strategies.amount {
            match strategy.extract(transcript).await {
                Ok(outcome) if outcome.confidence > amount_confidence => {
                    if let Some(value) = outcome.primary.filter(|v| *v > 0.0) {
                        amount = Some(value);
                        amount_confidence = outcome.confidence;
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(strategy = strategy.id(), error = %err, "Amount strategy failed");
                    debug
                        .strategy_failures
                        .push(format!("{}: {}", strategy.id(), err));
                }
            }
        }

        // Category sees the resolved amount
        let decision = self.category_classifier.classify(text, amount);
        debug.category = decision.reasons;
        let mut category = decision.category;
        let mut category_confidence = decision.confidence;

        for enhancer in &self.strategies.category_enhancers {
            let current = CategoryAssessment {
                category,
                confidence: category_confidence,
            };
            match enhancer.enhance(transcript, &current).await {
                Ok(enhancement) if enhancement.confidence > category_confidence => {
                    debug.category.push(format!(
                        "strategy:{} overrode {} -> {}",
                        enhancer.id(),
                        category,
                        enhancement.category
                    ));
                    debug.category.extend(enhancement.reasons);
                    category = enhancement.category;
                    category_confidence = enhancement.confidence;
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(strategy = enhancer.id(), error = %err, "Category enhancer failed");
                    debug
                        .strategy_failures
                        .push(format!("{}: {}", enhancer.id(), err));
                }
            }
        }

        // The explicit-threat/eviction/medical-emergency check always takes
        // precedence over strategy output
        if let Some((forced, reason)) = final_precedence(text) {
            if forced != category {
                debug
                    .category
                    .push(format!("precedence check forced {}: {}", forced, reason));
                category = forced;
                category_confidence = category_confidence.max(0.85);
            }
        }

        // Urgency sees category and amount
        let context = UrgencyContext { category, amount };
        let assessed = self.urgency_assessor.assess(text, &context);
        let mut urgency = assessed.level;
        let mut urgency_confidence = assessed.confidence;
        debug.urgency = assessed.trace;

        if let Some(strategy) = &self.strategies.urgency {
            match strategy.assess(transcript, &context).await {
                Ok(level) => {
                    // The objective override law binds strategies too: an
                    // alternate assessment never lowers an escalated level
                    if debug.urgency.objective_override && level < urgency {
                        debug.urgency.rule = format!(
                            "{} (kept over strategy:{})",
                            debug.urgency.rule,
                            strategy.id()
                        );
                    } else if level != urgency {
                        debug.urgency.rule = format!("strategy:{}", strategy.id());
                        urgency = level;
                        urgency_confidence = 0.8;
                    }
                }
                Err(err) => {
                    tracing::warn!(strategy = strategy.id(), error = %err, "Urgency strategy failed; using built-in cascade");
                    debug
                        .strategy_failures
                        .push(format!("{}: {}", strategy.id(), err));
                }
            }
        }

        // Post-hoc de-escalation may only lower, and never past an
        // objective override
        if let Some(deescalator) = &self.strategies.deescalator {
            if !debug.urgency.objective_override {
                match deescalator.review(transcript, urgency).await {
                    Ok(level) if level < urgency => {
                        debug.urgency.rule =
                            format!("{} (lowered by {})", debug.urgency.rule, deescalator.id());
                        urgency = level;
                    }
                    Ok(_) => {}
                    Err(err) => {
                        tracing::warn!(strategy = deescalator.id(), error = %err, "De-escalation failed");
                        debug
                            .strategy_failures
                            .push(format!("{}: {}", deescalator.id(), err));
                    }
                }
            }
        }

        let mut confidence = FieldConfidence {
            name: name_confidence,
            category: category_confidence,
            urgency_level: urgency_confidence,
            goal_amount: amount_confidence,
            overall: 0.0,
        };
        confidence.overall = ExtractionResult::compute_overall(&confidence);

        Ok(ExtractionResult {
            name,
            category,
            urgency_level: urgency,
            goal_amount: amount,
            beneficiary_relationship: BENEFICIARY_SELF.to_string(),
            confidence,
            debug,
        })
    }
}
