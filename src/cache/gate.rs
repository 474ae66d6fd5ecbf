// Cache gate for the activity snapshot.
// Decides whether a stored snapshot is fresh enough to skip the network.

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostics;
use crate::github::{ActivityEvent, EventFeed};

use super::store::KeyValueStore;

/// How long a snapshot stays fresh: 30 seconds.
pub const SNAPSHOT_TTL: Duration = Duration::from_secs(30);

/// Storage key the snapshot lives under unless configured otherwise.
pub const DEFAULT_CACHE_KEY: &str = "tpieevents";

/// Stored form of the last fetch.
///
/// Both fields are optional on read so a snapshot missing either one is
/// reported as absent rather than as a parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CachedSnapshot {
    #[serde(default)]
    pub input: Option<EventFeed>,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub cachetime: Option<i64>,
}

/// Borrowing twin of [`CachedSnapshot`] used for writes.
#[derive(Serialize)]
struct SnapshotRef<'a> {
    input: FeedRef<'a>,
    cachetime: i64,
}

#[derive(Serialize)]
struct FeedRef<'a> {
    data: &'a [ActivityEvent],
}

/// Snapshot read back from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSnapshot {
    pub events: Vec<ActivityEvent>,
    /// `now - cachetime` in milliseconds; negative under clock skew.
    pub age_ms: i64,
    pub is_fresh: bool,
}

/// Whether a snapshot of this age may be shown without refetching.
/// Negative ages count as stale.
pub fn is_fresh_age(age_ms: i64) -> bool {
    (0..=SNAPSHOT_TTL.as_millis() as i64).contains(&age_ms)
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Reads and writes the snapshot under a single storage key.
///
/// A gate without a store behaves as if storage were permanently empty:
/// every load is a miss and every write is a no-op.
pub struct CacheGate<S, D> {
    store: Option<S>,
    key: String,
    diagnostics: D,
}

impl<S: KeyValueStore, D: Diagnostics> CacheGate<S, D> {
    pub fn new(store: Option<S>, key: impl Into<String>, diagnostics: D) -> Self {
        Self {
            store,
            key: key.into(),
            diagnostics,
        }
    }

    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    /// Load the stored snapshot and judge its freshness against the clock.
    pub fn try_load_fresh(&self) -> Option<LoadedSnapshot> {
        self.try_load_fresh_at(now_millis())
    }

    /// Load the stored snapshot and judge its freshness against `now_ms`.
    ///
    /// Returns `None` when storage is unavailable, the key is unset, the value
    /// does not parse, or `input`/`cachetime` is missing.
    pub fn try_load_fresh_at(&self, now_ms: i64) -> Option<LoadedSnapshot> {
        let store = self.store.as_ref()?;

        let raw = match store.get(&self.key) {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => return None,
            Err(e) => {
                self.diagnostics.log(&format!("Cache read failed: {}", e));
                return None;
            }
        };

        let snapshot: CachedSnapshot = match serde_json::from_str(&raw) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.diagnostics.log(&format!("Cache unreadable: {}", e));
                return None;
            }
        };

        // A zero timestamp counts as missing.
        let (Some(input), Some(cachetime)) = (
            snapshot.input,
            snapshot.cachetime.filter(|t| *t != 0),
        ) else {
            return None;
        };

        let Some(age_ms) = now_ms.checked_sub(cachetime) else {
            self.diagnostics
                .log(&format!("Cache time out of range: {}", cachetime));
            return None;
        };
        self.diagnostics.log(&format!("Age {}", age_ms));

        Some(LoadedSnapshot {
            events: input.data,
            age_ms,
            is_fresh: is_fresh_age(age_ms),
        })
    }

    /// Replace the stored snapshot with `events`, stamped with the clock.
    pub fn store(&mut self, events: &[ActivityEvent]) {
        self.store_at(events, now_millis());
    }

    /// Replace the stored snapshot with `events`, stamped with `now_ms`.
    /// Failures are logged and otherwise ignored.
    pub fn store_at(&mut self, events: &[ActivityEvent], now_ms: i64) {
        let Some(store) = self.store.as_mut() else {
            return;
        };

        let snapshot = SnapshotRef {
            input: FeedRef { data: events },
            cachetime: now_ms,
        };
        let result = serde_json::to_string(&snapshot)
            .map_err(Into::into)
            .and_then(|json| store.set(&self.key, &json));

        if let Err(e) = result {
            self.diagnostics.log(&format!("Cache write failed: {}", e));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use chrono::TimeZone;

    use super::*;
    use crate::github::{Actor, CreatePayload, EventKind};

    #[derive(Default)]
    struct Recorder(RefCell<Vec<String>>);

    impl Diagnostics for Recorder {
        fn log(&self, message: &str) {
            self.0.borrow_mut().push(message.to_string());
        }
    }

    fn sample_events() -> Vec<ActivityEvent> {
        vec![ActivityEvent {
            actor: Actor {
                login: "jakobt".to_string(),
            },
            created_at: Utc.with_ymd_and_hms(2013, 5, 2, 10, 15, 0).unwrap(),
            kind: EventKind::Create(CreatePayload {
                ref_name: Some("pipelining".to_string()),
                ref_type: "branch".to_string(),
            }),
        }]
    }

    fn gate_with(raw: Option<&str>) -> CacheGate<HashMap<String, String>, Recorder> {
        let mut store = HashMap::new();
        if let Some(raw) = raw {
            store.insert(DEFAULT_CACHE_KEY.to_string(), raw.to_string());
        }
        CacheGate::new(Some(store), DEFAULT_CACHE_KEY, Recorder::default())
    }

    #[test]
    fn test_freshness_window() {
        assert!(is_fresh_age(0));
        assert!(is_fresh_age(15_000));
        assert!(is_fresh_age(30_000));
        assert!(!is_fresh_age(-1));
        assert!(!is_fresh_age(30_001));
    }

    #[test]
    fn test_store_then_load_is_fresh() {
        let mut gate = gate_with(None);
        let events = sample_events();

        gate.store_at(&events, 1_000_000);
        let loaded = gate.try_load_fresh_at(1_000_000).unwrap();

        assert!(loaded.is_fresh);
        assert_eq!(loaded.age_ms, 0);
        assert_eq!(loaded.events, events);
    }

    #[test]
    fn test_store_then_load_with_real_clock() {
        let mut gate = gate_with(None);
        gate.store(&sample_events());

        let loaded = gate.try_load_fresh().unwrap();
        assert!(loaded.is_fresh);
    }

    #[test]
    fn test_stale_and_skewed_snapshots_still_load() {
        let mut gate = gate_with(None);
        gate.store_at(&sample_events(), 1_000_000);

        let stale = gate.try_load_fresh_at(1_030_001).unwrap();
        assert!(!stale.is_fresh);
        assert_eq!(stale.events.len(), 1);

        let skewed = gate.try_load_fresh_at(999_999).unwrap();
        assert!(!skewed.is_fresh);
        assert_eq!(skewed.age_ms, -1);

        assert!(gate.try_load_fresh_at(1_030_000).unwrap().is_fresh);
    }

    #[test]
    fn test_age_is_logged() {
        let mut gate = gate_with(None);
        gate.store_at(&sample_events(), 500);
        gate.try_load_fresh_at(1_700);

        assert_eq!(gate.diagnostics().0.borrow().as_slice(), ["Age 1200"]);
    }

    #[test]
    fn test_absent_cases() {
        assert!(gate_with(None).try_load_fresh_at(0).is_none());
        assert!(gate_with(Some("")).try_load_fresh_at(0).is_none());
        assert!(gate_with(Some("not json")).try_load_fresh_at(0).is_none());
        assert!(gate_with(Some("null")).try_load_fresh_at(0).is_none());
        assert!(gate_with(Some(r#"{"cachetime": 5}"#)).try_load_fresh_at(5).is_none());
        assert!(gate_with(Some(r#"{"input": {"data": []}}"#)).try_load_fresh_at(5).is_none());
        assert!(
            gate_with(Some(r#"{"input": null, "cachetime": 5}"#))
                .try_load_fresh_at(5)
                .is_none()
        );
        assert!(
            gate_with(Some(r#"{"input": {"data": []}, "cachetime": 0}"#))
                .try_load_fresh_at(0)
                .is_none()
        );
    }

    #[test]
    fn test_out_of_range_cachetime_is_absent() {
        let gate = gate_with(Some(
            r#"{"input": {"data": []}, "cachetime": -9223372036854775808}"#,
        ));
        assert!(gate.try_load_fresh_at(1_700_000_000_000).is_none());
        assert_eq!(
            gate.diagnostics().0.borrow().as_slice(),
            ["Cache time out of range: -9223372036854775808"]
        );

        let gate = gate_with(Some(
            r#"{"input": {"data": []}, "cachetime": 9223372036854775807}"#,
        ));
        assert!(gate.try_load_fresh_at(-1_700_000_000_000).is_none());
    }

    #[test]
    fn test_empty_event_list_is_valid() {
        let gate = gate_with(Some(r#"{"input": {"data": []}, "cachetime": 10}"#));
        let loaded = gate.try_load_fresh_at(20).unwrap();
        assert!(loaded.events.is_empty());
        assert!(loaded.is_fresh);
    }

    #[test]
    fn test_without_storage() {
        let mut gate: CacheGate<HashMap<String, String>, ()> =
            CacheGate::new(None, DEFAULT_CACHE_KEY, ());

        gate.store_at(&sample_events(), 10);
        assert!(gate.try_load_fresh_at(10).is_none());
    }

    #[test]
    fn test_store_replaces_previous_snapshot() {
        let mut gate = gate_with(None);
        gate.store_at(&sample_events(), 10);
        gate.store_at(&[], 20);

        let loaded = gate.try_load_fresh_at(20).unwrap();
        assert!(loaded.events.is_empty());
        assert_eq!(loaded.age_ms, 0);
    }
}
