//! End-to-end extraction scenarios
//!
//! Representative intake narratives run through the full pipeline with the
//! default (heuristics-only) configuration.

use campaign_intake_config::PipelineConfig;
use campaign_intake_core::{Category, Transcript, UrgencyLevel};
use campaign_intake_pipeline::IntakePipeline;

fn pipeline() -> IntakePipeline {
    IntakePipeline::new(PipelineConfig::default())
}

#[tokio::test]
async fn medical_bills_with_partial_ask() {
    let transcript = Transcript::new(
        "My name is Maria Torres. My medical bills total $47,000 but I'm asking for $5,000 to \
         cover the most critical ones. I earn $2,100 monthly and my daughter is 7.",
    );
    let result = pipeline().extract(&transcript).await.unwrap();
    assert_eq!(result.name.as_deref(), Some("Maria Torres"));
    assert_eq!(result.category, Category::Healthcare);
    assert_eq!(result.goal_amount, Some(5000.0));
    assert_eq!(result.beneficiary_relationship, "myself");
}

#[tokio::test]
async fn flood_displacement_is_critical() {
    let transcript = Transcript::new(
        "This is Jennifer Martinez. Our apartment was severely damaged by flooding last night \
         and I have two young children with nowhere to go.",
    );
    let result = pipeline().extract(&transcript).await.unwrap();
    assert_eq!(result.name.as_deref(), Some("Jennifer Martinez"));
    assert_eq!(result.urgency_level, UrgencyLevel::Critical);
}

#[tokio::test]
async fn written_amount_and_eviction() {
    let transcript = Transcript::new(
        "My landlord is threatening eviction and I need about eighteen hundred dollars to catch \
         up on rent.",
    );
    let result = pipeline().extract(&transcript).await.unwrap();
    assert_eq!(result.category, Category::Housing);
    assert_eq!(result.goal_amount, Some(1800.0));
}

#[tokio::test]
async fn certification_over_job_loss() {
    let transcript = Transcript::new(
        "Robert Chen here. I need help finishing my certification program. I lost my job and \
         need this training to get back to work. The program costs twenty-eight hundred dollars.",
    );
    let result = pipeline().extract(&transcript).await.unwrap();
    assert_eq!(result.name.as_deref(), Some("Robert Chen"));
    assert_eq!(result.category, Category::Education);
    assert_eq!(result.goal_amount, Some(2800.0));
}

#[tokio::test]
async fn declined_name_with_grocery_need() {
    let transcript = Transcript::new("I prefer not to give my name. I need $200 for groceries.");
    let result = pipeline().extract(&transcript).await.unwrap();
    assert_eq!(result.name, None);
    assert_eq!(result.confidence.name, 0.0);
    assert_eq!(result.category, Category::Food);
    assert_eq!(result.goal_amount, Some(200.0));
}

#[tokio::test]
async fn determinism_byte_identical_results() {
    let transcript = Transcript::new(
        "My name is Maria Torres. My medical bills total $47,000 but I'm asking for $5,000 to \
         cover the most critical ones. I earn $2,100 monthly and my daughter is 7.",
    );
    let p = pipeline();
    let first = p.extract(&transcript).await.unwrap();
    let second = p.extract(&transcript).await.unwrap();
    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
}

#[tokio::test]
async fn urgency_override_law() {
    // Downplaying language plus an objectively critical circumstance must
    // resolve to CRITICAL or HIGH, never LOW or MEDIUM
    let transcript = Transcript::new(
        "The bank says the foreclosure goes through tomorrow. But honestly it's not urgent, \
         others have it worse than us.",
    );
    let result = pipeline().extract(&transcript).await.unwrap();
    assert!(result.urgency_level >= UrgencyLevel::High);
    assert!(result.debug.urgency.objective_override);
}

#[tokio::test]
async fn category_priority_law() {
    let with_violence = Transcript::new(
        "My landlord sent an eviction notice, and my ex has been violent with me; I'm afraid \
         for my safety staying here.",
    );
    let result = pipeline().extract(&with_violence).await.unwrap();
    assert_eq!(result.category, Category::Safety);

    let without_violence = Transcript::new(
        "My landlord sent an eviction notice and I can't cover this month's rent.",
    );
    let result = pipeline().extract(&without_violence).await.unwrap();
    assert_eq!(result.category, Category::Housing);
}

#[tokio::test]
async fn name_never_contains_digits_or_reserved_tokens() {
    let transcripts = [
        "Urgent! I need $500 today.",
        "Hello, I need help. Emergency situation here.",
        "My name is 4real Smith and I need $100.",
    ];
    for text in transcripts {
        let result = pipeline().extract(&Transcript::new(text)).await.unwrap();
        if let Some(name) = &result.name {
            assert!(!name.chars().any(|c| c.is_ascii_digit()), "{name}");
            for reserved in ["urgent", "emergency", "help", "hello"] {
                assert_ne!(name.to_lowercase(), reserved);
            }
        }
    }
}

#[tokio::test]
async fn amount_positive_when_present() {
    let transcripts = [
        "I need $250 for groceries.",
        "I was born in 1987 and my number is 555-123-4567.",
        "I need a couple thousand for the security deposit.",
    ];
    for text in transcripts {
        let result = pipeline().extract(&Transcript::new(text)).await.unwrap();
        if let Some(amount) = result.goal_amount {
            assert!(amount > 0.0);
        }
    }
}

#[tokio::test]
async fn category_is_always_one_of_the_twelve() {
    let transcripts = ["hi", "help", "I need things", "lorem ipsum dolor"];
    for text in transcripts {
        let result = pipeline().extract(&Transcript::new(text)).await.unwrap();
        assert!(Category::ALL.contains(&result.category));
    }
}

#[tokio::test]
async fn output_contract_shape() {
    let result = pipeline()
        .extract(&Transcript::new("I need $200 for groceries."))
        .await
        .unwrap();
    let json = serde_json::to_value(&result).unwrap();
    for key in [
        "name",
        "category",
        "urgencyLevel",
        "goalAmount",
        "beneficiaryRelationship",
        "confidence",
        "debug",
    ] {
        assert!(json.get(key).is_some(), "missing key {key}");
    }
    let confidence = &json["confidence"];
    for key in ["name", "category", "urgencyLevel", "goalAmount", "overall"] {
        let value = confidence[key].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&value));
    }
}
