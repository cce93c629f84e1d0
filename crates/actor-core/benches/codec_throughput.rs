use std::collections::BTreeMap;

use actor_core::{decode, to_bytes, CapabilityConfiguration, OperationRegistry};
use criterion::{criterion_group, criterion_main, Criterion};

fn build_configuration() -> CapabilityConfiguration {
    let values: BTreeMap<String, String> = (0..32)
        .map(|idx| (format!("key_{idx:02}"), format!("value number {idx}")))
        .collect();
    CapabilityConfiguration {
        module: "MB2ZQB6ROOMAYBO4ZCTFYWN7YIVBWA3MTKZYAQKJMTIHE2ELLRW2E3ZW".into(),
        values,
    }
}

fn bench_codec(c: &mut Criterion) {
    let config = build_configuration();
    let bytes = to_bytes(&config).unwrap();
    c.bench_function("encode_configuration_32", |b| {
        b.iter(|| {
            let _ = to_bytes(&config).unwrap();
        });
    });
    c.bench_function("decode_configuration_32", |b| {
        b.iter(|| {
            let _: CapabilityConfiguration = decode(&bytes).unwrap();
        });
    });
}

fn bench_dispatch(c: &mut Criterion) {
    let mut registry = OperationRegistry::new();
    registry.register("Echo", |config: CapabilityConfiguration| Ok(config));
    let dispatcher = registry.seal();
    let payload = to_bytes(&build_configuration()).unwrap();
    c.bench_function("dispatch_echo_32", |b| {
        b.iter(|| {
            let _ = dispatcher.invoke("Echo", &payload).unwrap();
        });
    });
}

criterion_group!(benches, bench_codec, bench_dispatch);
criterion_main!(benches);
