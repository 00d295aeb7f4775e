//! In-process grouping: emit keys per record, group with hashed maps,
//! reduce by summing. The parallel variant builds one map shard per rayon
//! task and merges, which keeps contention at zero.

use ahash::AHashMap;
use rayon::prelude::*;

/// Sequential count: emit zero or more keys per item, sum per key.
pub fn count_keys<T, I>(items: &[T], emit: impl Fn(&T) -> I) -> AHashMap<String, u64>
where
    I: IntoIterator<Item = String>,
{
    let mut map = AHashMap::with_capacity(1024);
    for item in items {
        for key in emit(item) {
            *map.entry(key).or_insert(0) += 1;
        }
    }
    map
}

/// Parallel count over shards, merged into one map.
pub fn count_keys_parallel<T, I>(items: &[T], emit: impl Fn(&T) -> I + Send + Sync) -> AHashMap<String, u64>
where
    T: Send + Sync,
    I: IntoIterator<Item = String>,
{
    items
        .par_iter()
        .fold(
            || AHashMap::with_capacity(1024),
            |mut map, item| {
                for key in emit(item) {
                    *map.entry(key).or_insert(0) += 1;
                }
                map
            },
        )
        .reduce(AHashMap::new, |mut a, b| {
            for (k, v) in b {
                *a.entry(k).or_insert(0) += v;
            }
            a
        })
}

/// Rank a counted map: count descending, then key ascending so ties at the
/// cut line resolve the same way on every run.
pub fn top_k(map: AHashMap<String, u64>, k: usize) -> Vec<(String, u64)> {
    let mut ranked: Vec<(String, u64)> = map.into_iter().collect();
    ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(k);
    ranked
}
