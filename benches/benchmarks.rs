//! Performance benchmarks for shipcheck.
//!
//! This module contains benchmarks for:
//! - Checklist parsing on prompts of increasing size
//! - Verification type detection
//! - Fallback checklist generation
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use shipcheck::checklist::detect_verification_type;
use shipcheck::{BasicChecklistGenerator, ChecklistParser};

// ============================================================================
// Mock Data Fixtures
// ============================================================================

mod fixtures {
    /// Generate a prompt artifact with `n` items in each checklist section.
    pub fn generate_prompt(n: usize) -> String {
        let mut prompt = String::from("# Optimized Prompt\n\nImplement the feature.\n\n");

        prompt.push_str("## Validation Checklist\n\n");
        for i in 0..n {
            if i % 5 == 0 {
                prompt.push_str(&format!("**Group {}:**\n", i / 5));
            }
            let item = match i % 3 {
                0 => "All tests pass after the change",
                1 => "Dashboard renders on small screen sizes",
                _ => "Behaviour matches the product brief",
            };
            prompt.push_str(&format!("☐ {item} ({i})\n"));
        }

        prompt.push_str("\n## Edge Cases to Consider\n\n");
        for i in 0..n {
            prompt.push_str(&format!("• **Edge case {i}**: handled gracefully\n"));
        }

        prompt.push_str("\n## What Could Go Wrong\n\n");
        for i in 0..n {
            prompt.push_str(&format!("- **Risk {i}**: mitigated\n"));
        }

        prompt
    }
}

// ============================================================================
// Parser Benchmarks
// ============================================================================

fn bench_parse(c: &mut Criterion) {
    let parser = ChecklistParser::new();
    let mut group = c.benchmark_group("parse");

    for size in [10, 100, 1000] {
        let prompt = fixtures::generate_prompt(size);
        group.throughput(Throughput::Bytes(prompt.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &prompt, |b, prompt| {
            b.iter(|| parser.parse(black_box(prompt)));
        });
    }

    group.finish();
}

fn bench_detect_verification_type(c: &mut Criterion) {
    let items = [
        "All tests pass with npm test",
        "Component renders correctly",
        "Some generic item description",
    ];

    c.bench_function("detect_verification_type", |b| {
        b.iter(|| {
            for item in &items {
                black_box(detect_verification_type(black_box(item)));
            }
        });
    });
}

// ============================================================================
// Generator Benchmarks
// ============================================================================

fn bench_generate_from_prompt(c: &mut Criterion) {
    let generator = BasicChecklistGenerator::new();
    let prompt = "Create a REST API with auth, a database schema and a fast login page. ".repeat(20);

    c.bench_function("generate_from_prompt", |b| {
        b.iter(|| generator.generate_from_prompt(black_box(&prompt), "code-generation"));
    });
}

criterion_group!(benches, bench_parse, bench_detect_verification_type, bench_generate_from_prompt);
criterion_main!(benches);
