//! Lookup cache 性能基准测试

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use geolookup::cache::{CacheResult, LookupCache, MemoryLookupCache, MokaLookupCache};
use geolookup::services::geoip::{GeoRecord, LookupKey};
use std::sync::Arc;
use std::time::Duration;

fn create_test_record(i: u32) -> GeoRecord {
    GeoRecord {
        city: Some(format!("City {}", i)),
        region: Some("California".to_string()),
        country: Some("United States".to_string()),
    }
}

fn key_for(i: u32) -> LookupKey {
    let [a, b, c, d] = i.to_be_bytes();
    LookupKey::parse(&format!("{}.{}.{}.{}", a.max(1), b, c, d)).unwrap()
}

fn backends() -> Vec<Arc<dyn LookupCache>> {
    vec![
        Arc::new(MemoryLookupCache::new(Duration::from_secs(600))),
        Arc::new(MokaLookupCache::new(Duration::from_secs(600), 100_000)),
    ]
}

// ============== get 基准测试 ==============

fn bench_get_hit(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("lookup_cache/get_hit");

    for cache in backends() {
        // 预填充数据
        rt.block_on(async {
            for i in 0..1000 {
                cache.insert(&key_for(i), create_test_record(i)).await.unwrap();
            }
        });

        let hit = key_for(500);
        group.bench_function(cache.name(), |b| {
            b.to_async(&rt).iter(|| {
                let c = Arc::clone(&cache);
                let k = hit.clone();
                async move {
                    let result = c.get(&k).await.unwrap();
                    assert!(matches!(result, CacheResult::Found(_)));
                }
            });
        });
    }

    group.finish();
}

fn bench_get_miss(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("lookup_cache/get_miss");

    for cache in backends() {
        let miss = LookupKey::parse("203.0.113.250").unwrap();
        group.bench_function(cache.name(), |b| {
            b.to_async(&rt).iter(|| {
                let c = Arc::clone(&cache);
                let k = miss.clone();
                async move {
                    let result = c.get(&k).await.unwrap();
                    assert!(matches!(result, CacheResult::NotFound));
                }
            });
        });
    }

    group.finish();
}

// ============== insert 基准测试 ==============

fn bench_insert_batch(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("lookup_cache/insert_batch");

    for size in [100u32, 1000] {
        group.throughput(Throughput::Elements(size as u64));
        for name in ["memory", "moka"] {
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, &size| {
                b.to_async(&rt).iter(|| async move {
                    let cache: Arc<dyn LookupCache> = if name == "memory" {
                        Arc::new(MemoryLookupCache::new(Duration::from_secs(600)))
                    } else {
                        Arc::new(MokaLookupCache::new(Duration::from_secs(600), 100_000))
                    };
                    for i in 0..size {
                        cache.insert(&key_for(i), create_test_record(i)).await.unwrap();
                    }
                });
            });
        }
    }

    group.finish();
}

fn bench_key_parse(c: &mut Criterion) {
    c.bench_function("lookup_key/parse_ipv4", |b| {
        b.iter(|| LookupKey::parse(std::hint::black_box("192.168.100.200")).unwrap())
    });
    c.bench_function("lookup_key/parse_ipv6", |b| {
        b.iter(|| LookupKey::parse(std::hint::black_box("2001:4860:4860::8888")).unwrap())
    });
}

criterion_group!(
    benches,
    bench_get_hit,
    bench_get_miss,
    bench_insert_batch,
    bench_key_parse
);
criterion_main!(benches);
