use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use csv_reconcile::{Dataset, KeySelection, MatchingEngine, NoProgress, Settings};
use encoding_rs::UTF_8;
use tempfile::TempDir;

const FIRST_NAMES: [&str; 8] = [
    "Alice", "Bob", "Carol", "David", "Erin", "Frank", "Grace", "Heidi",
];
const LAST_NAMES: [&str; 6] = ["Smith", "Lee", "White", "Garcia", "Nguyen", "Brown"];

fn generate_people(rows: usize, name: &str, typo: bool) -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let csv_path = temp_dir.path().join(format!("{name}.csv"));
    let mut file = File::create(&csv_path).expect("create csv");
    writeln!(file, "id,full_name,city").expect("header");
    for i in 0..rows {
        let first = FIRST_NAMES[i % FIRST_NAMES.len()];
        let last = LAST_NAMES[(i / FIRST_NAMES.len()) % LAST_NAMES.len()];
        let mut full = format!("{first} {last} {i}");
        if typo && i % 4 == 0 {
            // Swap two adjacent characters to force a fuzzy match.
            let mut chars = full.chars().collect::<Vec<_>>();
            chars.swap(1, 2);
            full = chars.into_iter().collect();
        }
        writeln!(file, "{i},{full},City {}", i % 17).expect("row");
    }
    (temp_dir, csv_path)
}

fn load(path: &Path) -> Dataset {
    Dataset::from_csv_path(path, b',', UTF_8).expect("load dataset")
}

fn bench_engine(c: &mut Criterion) {
    let (source_dir, source_path) = generate_people(1_000, "crm", true);
    let (target_dir, target_path) = generate_people(1_000, "billing", false);
    let source = load(&source_path);
    let target = load(&target_path);
    let keys = KeySelection::new("full_name", "full_name");

    let mut group = c.benchmark_group("matching_engine");
    group.sample_size(10);

    for (label, max_matches) in [("one_per_target", 1), ("shared_targets", 3)] {
        let engine = MatchingEngine::new(Settings {
            max_matches_per_record: max_matches,
            ..Settings::default()
        })
        .expect("engine");
        group.bench_function(label, |b| {
            b.iter_batched(
                || (),
                |_| {
                    engine
                        .run(&source, &target, &keys, &mut NoProgress)
                        .expect("run");
                },
                BatchSize::SmallInput,
            );
        });
    }

    drop(source_dir);
    drop(target_dir);
    group.finish();
}

criterion_group!(benches, bench_engine);
criterion_main!(benches);
