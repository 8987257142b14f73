//! Benchmarks for parameter recovery over synthetic prologues.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stackray_analysis::{Function, FunctionInfo, MemorySource};

/// Builds a frame setup, `count` argument spills, and one local read.
fn create_spill_listing(count: usize) -> String {
    let mut listing = String::from(
        "  401000: 55         push   rbp\n  401001: 48 89 e5   mov    rbp,rsp\n",
    );
    let mut addr = 0x401004u64;
    for i in 0..count {
        listing.push_str(&format!(
            "  {addr:x}: 89 7d fc   mov    DWORD PTR [rbp-{:#x}],edi\n",
            4 * (i + 1)
        ));
        addr += 3;
    }
    listing.push_str(&format!(
        "  {addr:x}: 8b 45 fc   mov    eax,DWORD PTR [rbp-0x4]\n"
    ));
    listing
}

fn bench_decompile(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompile");
    for count in [8usize, 64, 256] {
        let content = create_spill_listing(count);
        let mut source = MemorySource::new();
        source.insert(
            "f",
            FunctionInfo {
                address: 0x401000,
                size: (count as u64) * 3 + 6,
                content,
            },
        );
        group.bench_with_input(BenchmarkId::from_parameter(count), &source, |b, source| {
            b.iter(|| {
                let mut func = Function::load(black_box(source), "f").unwrap();
                func.decompile().unwrap();
                black_box(func.parameters().len())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decompile);
criterion_main!(benches);
