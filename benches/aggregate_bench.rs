//! Benchmarks for the aggregation layer and the district filter
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use schooldash::aggregate::{self, TOP_ACTIVITIES};
use schooldash::dataset::{
    ActivityRecord, Datasets, DistrictBoundaries, District, SchoolRecord, StudentRecord,
};
use schooldash::view::{reduce, ViewState};

const TYPES: [&str; 4] = ["Grundschule", "Gymnasium", "Integrierte Sekundarschule", "Förderschule"];
const OPERATORS: [&str; 2] = ["öffentlich", "privat"];

fn create_schools(count: usize) -> Vec<SchoolRecord> {
    (0..count)
        .map(|i| {
            let district = District::ALL[i % District::ALL.len()];
            SchoolRecord::new(
                format!("{:05}", i),
                format!("Schule {}", i),
                district.name(),
                TYPES[i % TYPES.len()],
                OPERATORS[i % OPERATORS.len()],
            )
            .located(52.4 + (i % 100) as f64 * 0.003, 13.1 + (i % 97) as f64 * 0.006)
            .postal_code(format!("1{:04}", i % 300))
        })
        .collect()
}

fn create_activities(count: usize) -> Vec<ActivityRecord> {
    (0..count)
        .map(|i| {
            ActivityRecord::new(
                i.to_string(),
                format!("{:05}", i % 800),
                format!("AG {}", i % 150),
                format!("Kategorie {}", i % 12),
            )
        })
        .collect()
}

fn bench_grouping(c: &mut Criterion) {
    let mut group = c.benchmark_group("grouping");

    for size in [1_000, 10_000, 100_000] {
        let activities = create_activities(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("count_by_category_{}", size), |b| {
            b.iter(|| aggregate::activities_per_category(black_box(&activities)))
        });

        group.bench_function(format!("per_entity_count_{}", size), |b| {
            b.iter(|| aggregate::per_entity_activity_count(black_box(&activities)))
        });

        group.bench_function(format!("top_activities_{}", size), |b| {
            b.iter(|| aggregate::top_activities(black_box(&activities), TOP_ACTIVITIES))
        });
    }

    group.finish();
}

fn bench_school_summaries(c: &mut Criterion) {
    let mut group = c.benchmark_group("school_summaries");
    let schools = create_schools(10_000);
    group.throughput(Throughput::Elements(schools.len() as u64));

    group.bench_function("school_type_density", |b| {
        b.iter(|| aggregate::school_type_density(black_box(&schools)))
    });

    group.bench_function("schools_per_postcode", |b| {
        b.iter(|| aggregate::schools_per_postcode(black_box(&schools)))
    });

    group.finish();
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("district_filter");

    let datasets = Datasets::new(
        create_schools(1_000),
        vec![StudentRecord::new("Mitte", "Grundschule", "öffentlich", 1)],
        create_activities(10),
        DistrictBoundaries::default(),
    );

    group.bench_function("select_district", |b| {
        b.iter(|| reduce(&datasets, ViewState::Unfiltered, black_box(Some("Pankow"))))
    });

    group.bench_function("clear_filter", |b| {
        b.iter(|| {
            reduce(
                &datasets,
                ViewState::FilteredBy(District::Pankow),
                black_box(Some("")),
            )
        })
    });

    group.finish();
}

criterion_group!(benches, bench_grouping, bench_school_summaries, bench_filter);
criterion_main!(benches);
