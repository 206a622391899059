use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use wms_warehouse::{CodePrefix, FirstChar, LocationDraft, LocationRegistry, LocationType};

const ZONES: [&str; 6] = ["A", "B", "C", "REC", "SHIP", "STG"];

fn populated(size: usize) -> LocationRegistry {
    let mut registry = LocationRegistry::new(FirstChar);
    for i in 0..size {
        let zone = ZONES[i % ZONES.len()];
        let capacity = 500 + (i as u64 % 7) * 250;
        let draft = LocationDraft::new(
            format!("Location {zone}-{i}"),
            format!("{zone}-{i}"),
            LocationType::Rack,
            capacity,
        )
        .with_occupied(capacity / 2);
        registry.add(draft).unwrap();
    }
    registry
}

fn bench_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("capacity_aggregation");

    for size in [100usize, 1_000, 10_000] {
        let registry = populated(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("capacity_utilization", size), &registry, |b, r| {
            b.iter(|| black_box(r.capacity_utilization()));
        });

        group.bench_with_input(
            BenchmarkId::new("zone_statistics_first_char", size),
            &registry,
            |b, r| b.iter(|| black_box(r.zone_statistics())),
        );

        group.bench_with_input(
            BenchmarkId::new("zone_statistics_code_prefix", size),
            &registry,
            |b, r| b.iter(|| black_box(r.zone_statistics_by(&CodePrefix))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_aggregation);
criterion_main!(benches);
