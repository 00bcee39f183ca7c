use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pkgdiff_common::{Dialects, Direction};
use pkgdiff_core::{line_differences, MemorySource, PackageDiffChecker};

// Helper to create a file body with a few edits spread across it
fn create_lines(count: usize, edit_every: usize) -> (Vec<String>, Vec<String>) {
    let a: Vec<String> = (0..count).map(|i| format!("    statement_{};", i)).collect();
    let b = a
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if edit_every > 0 && i % edit_every == 0 {
                format!("{} // changed", line)
            } else {
                line.clone()
            }
        })
        .collect();
    (a, b)
}

fn bench_myers_near_identical(c: &mut Criterion) {
    let mut group = c.benchmark_group("myers_near_identical");

    for size in [1_000usize, 10_000, 50_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let (left, right) = create_lines(size, size / 10);
            b.iter(|| {
                let result = line_differences(black_box(&left), black_box(&right));
                black_box(result);
            });
        });
    }

    group.finish();
}

fn bench_myers_identical(c: &mut Criterion) {
    c.bench_function("myers_identical_10000_lines", |b| {
        let (left, _) = create_lines(10_000, 0);
        b.iter(|| {
            let result = line_differences(black_box(&left), black_box(&left));
            black_box(result);
        });
    });
}

fn bench_package_checker(c: &mut Criterion) {
    let mut source = MemorySource::new();
    for i in 0..200 {
        let (left, right) = create_lines(300, 50);
        source.insert(format!("src/file_{}.go", i), left.join("\n"));
        source.insert(format!("dst/file_{}.gno", i), right.join("\n"));
    }

    let mut group = c.benchmark_group("package_checker_200_files");
    for parallel in [false, true] {
        group.bench_with_input(
            BenchmarkId::from_parameter(if parallel { "parallel" } else { "sequential" }),
            &parallel,
            |b, &parallel| {
                b.iter(|| {
                    let checker = PackageDiffChecker::new(
                        &source,
                        "src",
                        "dst",
                        Dialects::default(),
                        Direction::PrimaryToSecondary,
                    )
                    .unwrap()
                    .with_parallelism(parallel);
                    black_box(checker.differences().unwrap());
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_myers_near_identical,
    bench_myers_identical,
    bench_package_checker
);
criterion_main!(benches);
