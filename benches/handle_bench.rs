use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use hybrid_mmap::{create_mmap, MappedFileHandle, OpenMode};
use std::fs;
use std::path::PathBuf;

// Simple helper to build a unique temp path per bench
fn tmp_path(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("hybrid_mmap_bench_{}_{}", name, std::process::id()));
    p
}

fn bench_open_close_cycle(b: &mut Criterion) {
    let mut group = b.benchmark_group("open_close_cycle");
    for &size in &[4_usize * 1024, 64 * 1024, 1024 * 1024] {
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |ben, &sz| {
            ben.iter_batched(
                || {
                    let path = tmp_path(&format!("open_close_{}", sz));
                    let _ = fs::remove_file(&path);
                    (path, sz)
                },
                |(path, sz)| {
                    let handle =
                        MappedFileHandle::open(&path, OpenMode::Create, sz as u64).expect("open");
                    handle.close(None).expect("close");
                    let _ = fs::remove_file(&path);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_write_flush(b: &mut Criterion) {
    let mut group = b.benchmark_group("write_flush");
    for &size in &[4_usize * 1024, 64 * 1024, 1024 * 1024] {
        group.throughput(Throughput::Bytes(size as u64));
        // Variant A: region writes only, durability deferred
        group.bench_with_input(BenchmarkId::new("write_only", size), &size, |ben, &sz| {
            let path = tmp_path(&format!("write_only_{}", sz));
            let _ = fs::remove_file(&path);
            let mut handle = create_mmap(&path, sz as u64).expect("create");

            let payload = vec![0xAB_u8; sz];
            ben.iter(|| {
                handle.update_region(0, &payload).expect("update");
                criterion::black_box(&payload);
            });

            let _ = fs::remove_file(&path);
        });

        // Variant B: writes plus sync to measure msync overhead
        group.bench_with_input(
            BenchmarkId::new("write_plus_flush", size),
            &size,
            |ben, &sz| {
                let path = tmp_path(&format!("write_plus_flush_{}", sz));
                let _ = fs::remove_file(&path);
                let mut handle = create_mmap(&path, sz as u64).expect("create");

                let payload = vec![0xCD_u8; sz];
                ben.iter(|| {
                    handle.update_region(0, &payload).expect("update");
                    handle.flush().expect("flush");
                });

                let _ = fs::remove_file(&path);
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_open_close_cycle, bench_write_flush);
criterion_main!(benches);
