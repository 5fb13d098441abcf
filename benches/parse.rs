// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use proteus::format::markup::StreamParser;

mod fixtures;

// Benchmark identity (keep stable):
// - Group names in this file: `markup.finalize`, `markup.feed_stream`
// - Case IDs (the string after the `/`) must remain stable across refactors so
//   results stay comparable over time (e.g. `small`, `medium_mixed`).
fn benches_parse(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("markup.finalize");

        for case in [
            fixtures::Case::Small,
            fixtures::Case::MediumMixed,
            fixtures::Case::LargeLongText,
        ] {
            let doc = fixtures::markup(case);
            group.throughput(Throughput::Bytes(doc.len() as u64));
            group.bench_function(case.id(), |b| {
                b.iter(|| {
                    let slides = StreamParser::new()
                        .finalize(black_box(&doc))
                        .expect("finalize");
                    black_box(fixtures::checksum(black_box(&slides)))
                })
            });
        }

        group.finish();
    }

    {
        // Streaming cost: the cumulative buffer is reparsed after every chunk,
        // so this measures the quadratic path the live UI actually pays.
        let mut group = c.benchmark_group("markup.feed_stream");

        for (case, chunk) in [
            (fixtures::Case::Small, 64usize),
            (fixtures::Case::MediumMixed, 256),
        ] {
            let doc = fixtures::markup(case);
            group.throughput(Throughput::Bytes(doc.len() as u64));
            group.bench_function(case.id(), |b| {
                b.iter(|| {
                    let mut parser = StreamParser::new();
                    let mut fed = 0;
                    let mut closed = 0usize;
                    while fed < doc.len() {
                        let mut end = (fed + chunk).min(doc.len());
                        while !doc.is_char_boundary(end) {
                            end += 1;
                        }
                        fed = end;
                        closed = parser.feed(black_box(&doc[..fed])).slides().len();
                    }
                    black_box(closed)
                })
            });
        }

        group.finish();
    }
}

criterion_group!(benches, benches_parse);
criterion_main!(benches);
