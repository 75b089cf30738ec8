use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use tree_visit::algs::traversal::VisitBuilder;
use tree_visit::tree::TreeBuilder;

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for &target in &[1u64 << 12, 1 << 16] {
        group.bench_with_input(BenchmarkId::from_parameter(target), &target, |b, &t| {
            b.iter(|| black_box(TreeBuilder::new().generate(t).expect("generate")));
        });
    }
    group.finish();
}

fn bench_traversal(c: &mut Criterion) {
    let mut group = c.benchmark_group("mark_visited");

    for &target in &[1u64 << 12, 1 << 16, 1 << 20] {
        let mut tree = TreeBuilder::new().generate(target).expect("generate");

        for depth in [0u32, 1, 2, 4] {
            group.bench_with_input(
                BenchmarkId::new(format!("fan_out_{depth}"), target),
                &depth,
                |b, &d| {
                    let mut flag = false;
                    b.iter(|| {
                        flag = !flag;
                        black_box(VisitBuilder::new(flag).fan_out_depth(d).run(&mut tree));
                    });
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_generate, bench_traversal);
criterion_main!(benches);
