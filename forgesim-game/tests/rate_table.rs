use std::hash::Hasher;

use forgesim_game::{
    CatalystTier, DESTROY_MIN_LEVEL, ENHANCEMENT_RATES, MAX_ITEM_LEVEL, effective_success_pct,
    rate_for_level,
};
use serde_json::{Map, Value};
use twox_hash::XxHash64;

const RATE_SNAPSHOT_HASH: u64 = 0xe785_5291_680a_0734;

#[test]
fn rate_table_snapshot_stable() {
    let value = canonicalize_value(serde_json::to_value(ENHANCEMENT_RATES).unwrap());
    let canonical = serde_json::to_string_pretty(&value).unwrap();
    let digest = snapshot_hash(canonical.as_bytes());
    assert_eq!(
        digest, RATE_SNAPSHOT_HASH,
        "enhancement rate table changed\n{canonical}"
    );
}

#[test]
fn every_reachable_level_has_a_row() {
    for level in 0..MAX_ITEM_LEVEL {
        let row = rate_for_level(level);
        assert!(row.success_pct > 0.0, "level {level} has no success chance");
        assert!(
            row.destroy_pct + row.degrade_pct <= 100.0,
            "level {level} failure shares exceed the whole"
        );
    }
}

#[test]
fn success_chance_never_rises_with_level() {
    for pair in ENHANCEMENT_RATES.windows(2) {
        assert!(pair[1].success_pct <= pair[0].success_pct);
    }
}

#[test]
fn destruction_starts_at_threshold() {
    for level in 0..DESTROY_MIN_LEVEL {
        assert!(rate_for_level(level).destroy_pct.abs() < f64::EPSILON);
    }
    for level in DESTROY_MIN_LEVEL..MAX_ITEM_LEVEL {
        assert!(rate_for_level(level).destroy_pct > 0.0);
    }
}

#[test]
fn catalyst_bonuses_stack_on_base_rate() {
    for level in 0..MAX_ITEM_LEVEL {
        let base = rate_for_level(level).success_pct;
        let normal = effective_success_pct(level, CatalystTier::Normal);
        let advanced = effective_success_pct(level, CatalystTier::Advanced);
        let supreme = effective_success_pct(level, CatalystTier::Supreme);
        assert!((normal - base).abs() < f64::EPSILON);
        assert!((advanced - base - 5.0).abs() < f64::EPSILON);
        assert!((supreme - base - 10.0).abs() < f64::EPSILON);
    }
}

fn canonicalize_value(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize_value).collect()),
        Value::Object(map) => {
            let mut entries: Vec<_> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut result = Map::with_capacity(entries.len());
            for (key, value) in entries {
                result.insert(key, canonicalize_value(value));
            }
            Value::Object(result)
        }
        other => other,
    }
}

fn snapshot_hash(bytes: &[u8]) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(bytes);
    hasher.finish()
}
