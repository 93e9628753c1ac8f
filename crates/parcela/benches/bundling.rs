#![allow(clippy::disallowed_methods)]

use std::{fs, hint::black_box, path::Path};

use criterion::{Criterion, criterion_group, criterion_main};
use parcela::{BundleOrchestrator, Config};
use tempfile::TempDir;

/// A chain of `depth` modules, each importing the next one
fn write_chain(dir: &Path, depth: usize) {
    for i in 0..depth {
        let source = if i + 1 < depth {
            format!(
                "import {{ value as next }} from './m{}.js';\nexport const value = next + {i};\n",
                i + 1
            )
        } else {
            format!("export const value = {i};\n")
        };
        fs::write(dir.join(format!("m{i}.js")), source).expect("Failed to write module");
    }
}

fn benchmark_bundling(c: &mut Criterion) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write_chain(temp_dir.path(), 50);
    let entry = temp_dir.path().join("m0.js");

    let mut group = c.benchmark_group("bundling");
    for dedupe_modules in [false, true] {
        let orchestrator = BundleOrchestrator::new(Config {
            dedupe_modules,
            ..Config::default()
        });
        group.bench_function(format!("chain_50_dedupe_{dedupe_modules}"), |b| {
            b.iter(|| orchestrator.bundle(black_box(&entry)).expect("Bundling failed"));
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_bundling);
criterion_main!(benches);
