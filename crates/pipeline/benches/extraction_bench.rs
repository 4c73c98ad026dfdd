//! Extraction throughput benchmark

use campaign_intake_config::PipelineConfig;
use campaign_intake_core::Transcript;
use campaign_intake_pipeline::IntakePipeline;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const TRANSCRIPTS: &[&str] = &[
    "My name is Maria Torres. My medical bills total $47,000 but I'm asking for $5,000 to \
     cover the most critical ones. I earn $2,100 monthly and my daughter is 7.",
    "My landlord is threatening eviction and I need about eighteen hundred dollars to catch \
     up on rent.",
    "This is Jennifer Martinez. Our apartment was severely damaged by flooding and I have two \
     young children with nowhere to go.",
    "I prefer not to give my name. I need $200 for groceries.",
];

fn bench_extraction(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let pipeline = IntakePipeline::new(PipelineConfig::default());
    let transcripts: Vec<Transcript> = TRANSCRIPTS.iter().map(|t| Transcript::new(*t)).collect();

    c.bench_function("extract_four_narratives", |b| {
        b.iter(|| {
            runtime.block_on(async {
                for transcript in &transcripts {
                    let result = pipeline.extract(black_box(transcript)).await.unwrap();
                    black_box(result);
                }
            })
        })
    });
}

criterion_group!(benches, bench_extraction);
criterion_main!(benches);
