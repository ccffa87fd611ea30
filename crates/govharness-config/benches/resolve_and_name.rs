// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use chrono::DateTime;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use govharness_config::{generate_name_at, HarnessData, Role};
use govharness_core::ports::FixedClock;

fn workspace_data() -> HarnessData {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..");
    HarnessData::load_from_workspace(&root).expect("workspace data")
}

fn bench_resolve(c: &mut Criterion) {
    let data = workspace_data();
    c.bench_function("resolve_storage_prod", |b| {
        b.iter(|| {
            data.resolve(
                black_box("storage"),
                black_box("deny-storage-account-public-access"),
                Some("prod"),
            )
            .expect("resolve")
        })
    });
}

fn bench_generate_name(c: &mut Criterion) {
    let data = workspace_data();
    let config = data
        .resolve("storage", "deny-storage-account-public-access", Some("dev"))
        .expect("resolve");
    let clock = FixedClock(DateTime::UNIX_EPOCH);
    c.bench_function("generate_name_compliant", |b| {
        b.iter(|| generate_name_at(black_box(&config), Role::Compliant, &clock).expect("name"))
    });
}

criterion_group!(benches, bench_resolve, bench_generate_name);
criterion_main!(benches);
