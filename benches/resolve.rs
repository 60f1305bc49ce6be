// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Amphora-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Amphora and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use amphora::config::normalize;
use amphora::model::{Scalar, Value, ValueId, ValueType};
use amphora::resolve::{derive_metadata, value_editability, MetadataCache};

mod fixtures;
mod profiler;

// Benchmark identity (keep stable):
// - Group name in this file: `resolve.metadata`
// - Case IDs (the string after the `/`) must remain stable across refactors
//   so results stay comparable over time (`derive_cold`, `cache_warm`,
//   `editability_chain`).

fn bench_values(count: usize, distinct_contents: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            let id = ValueId::new(format!("bench_v{i:05}")).expect("value id");
            let content = format!("P{:03}", i % distinct_contents);
            Value::new(id, Scalar::from(content.as_str()), ValueType::String)
        })
        .collect()
}

fn bench_resolve(c: &mut Criterion) {
    let constraints = normalize(&fixtures::param_configuration());
    let parameters = fixtures::well_parameters(64);
    let values = bench_values(512, 128);

    let mut group = c.benchmark_group("resolve.metadata");
    group.throughput(Throughput::Elements(values.len() as u64));

    group.bench_function("derive_cold", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for value in &values {
                let metadata = derive_metadata(value.value(), &constraints, &parameters);
                hits += usize::from(metadata.is_from_param);
            }
            black_box(hits)
        })
    });

    group.bench_function("cache_warm", |b| {
        let mut cache = MetadataCache::new();
        // Prime both tiers once; the measured loop hits the id tier.
        for value in &values {
            cache.metadata(value, None, &constraints, &parameters);
        }
        b.iter(|| {
            let mut editable = 0usize;
            for value in &values {
                let metadata = cache.metadata(value, None, &constraints, &parameters);
                editable += usize::from(metadata.is_editable);
            }
            black_box(editable)
        })
    });

    group.bench_function("editability_chain", |b| {
        b.iter(|| {
            let mut editable = 0usize;
            for value in &values {
                editable += usize::from(value_editability(value, None, &constraints, &parameters));
            }
            black_box(editable)
        })
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = bench_resolve
}
criterion_main!(benches);
