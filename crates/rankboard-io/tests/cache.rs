use std::cell::Cell;
use std::time::Duration;

use rankboard_common::{Dataset, Value};
use rankboard_io::{CacheConfig, DataSource, IoError, ManualClock, SourceCache};

/// Counts loads and can be switched into a failing state.
struct FlakySource {
    id: &'static str,
    loads: Cell<usize>,
    failing: Cell<bool>,
}

impl FlakySource {
    fn new(id: &'static str) -> Self {
        Self {
            id,
            loads: Cell::new(0),
            failing: Cell::new(false),
        }
    }
}

impl DataSource for FlakySource {
    fn id(&self) -> String {
        self.id.to_string()
    }

    fn load(&self) -> Result<Dataset, IoError> {
        self.loads.set(self.loads.get() + 1);
        if self.failing.get() {
            return Err(IoError::Fetch {
                url: self.id.to_string(),
                message: "HTTP 503".into(),
            });
        }
        Ok(Dataset::from_records([[(
            "load",
            Value::Int(self.loads.get() as i64),
        )]]))
    }
}

fn ttl(secs: u64) -> CacheConfig {
    CacheConfig {
        ttl: Duration::from_secs(secs),
    }
}

#[test]
fn fresh_entries_are_served_from_cache() {
    let clock = ManualClock::new();
    let cache = SourceCache::with_clock(ttl(300), &clock);
    let src = FlakySource::new("a");

    let first = cache.get_or_load(&src).unwrap();
    clock.advance(Duration::from_secs(299));
    let second = cache.get_or_load(&src).unwrap();

    assert_eq!(src.loads.get(), 1);
    assert!(first.ptr_eq(&second));
    assert!(cache.is_cached_fresh("a"));
}

#[test]
fn expired_entries_are_reloaded() {
    let clock = ManualClock::new();
    let cache = SourceCache::with_clock(ttl(300), &clock);
    let src = FlakySource::new("a");

    cache.get_or_load(&src).unwrap();
    clock.advance(Duration::from_secs(300));
    assert!(!cache.is_cached_fresh("a"));
    let ds = cache.get_or_load(&src).unwrap();

    assert_eq!(src.loads.get(), 2);
    assert_eq!(ds.get(0, "load"), Some(&Value::Int(2)));
}

#[test]
fn failed_reload_serves_last_good_dataset() {
    let clock = ManualClock::new();
    let cache = SourceCache::with_clock(ttl(60), &clock);
    let src = FlakySource::new("sheet");

    cache.get_or_load(&src).unwrap();
    clock.advance(Duration::from_secs(61));
    src.failing.set(true);

    let ds = cache.get_or_load(&src).unwrap();
    assert_eq!(ds.get(0, "load"), Some(&Value::Int(1)));
    // The stale entry is kept, so the next call tries again.
    cache.get_or_load(&src).unwrap();
    assert_eq!(src.loads.get(), 3);

    src.failing.set(false);
    let ds = cache.get_or_load(&src).unwrap();
    assert_eq!(ds.get(0, "load"), Some(&Value::Int(4)));
}

#[test]
fn failure_without_previous_entry_propagates() {
    let cache = SourceCache::with_clock(ttl(60), ManualClock::new());
    let src = FlakySource::new("down");
    src.failing.set(true);
    assert!(matches!(
        cache.get_or_load(&src),
        Err(IoError::Fetch { .. })
    ));
    assert!(cache.is_empty());
}

#[test]
fn invalidate_and_clear() {
    let cache = SourceCache::with_clock(ttl(60), ManualClock::new());
    let a = FlakySource::new("a");
    let b = FlakySource::new("b");
    cache.get_or_load(&a).unwrap();
    cache.get_or_load(&b).unwrap();
    assert_eq!(cache.len(), 2);

    assert!(cache.invalidate("a"));
    assert!(!cache.invalidate("a"));
    assert!(cache.peek("a").is_none());
    cache.get_or_load(&a).unwrap();
    assert_eq!(a.loads.get(), 2);

    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn expired_entries_of_other_sources_are_dropped() {
    let clock = ManualClock::new();
    let cache = SourceCache::with_clock(ttl(60), &clock);
    let a = FlakySource::new("a");
    let b = FlakySource::new("b");
    let c = FlakySource::new("c");

    cache.get_or_load(&a).unwrap();
    clock.advance(Duration::from_secs(30));
    cache.get_or_load(&b).unwrap();
    clock.advance(Duration::from_secs(45));

    // "a" expired, "b" is still fresh.
    cache.get_or_load(&c).unwrap();
    assert_eq!(cache.len(), 2);
    assert!(cache.peek("a").is_none());
    assert!(cache.is_cached_fresh("b"));

    clock.advance(Duration::from_secs(60));
    assert_eq!(cache.purge_expired(), 2);
    assert!(cache.is_empty());
}

#[test]
fn default_ttl_is_five_minutes() {
    assert_eq!(CacheConfig::default().ttl, Duration::from_secs(300));
    let cache: SourceCache = SourceCache::default();
    assert_eq!(cache.config().ttl, Duration::from_secs(300));
}
