use std::sync::atomic::AtomicUsize;

use super::*;

fn counter() -> (Arc<AtomicUsize>, ChangeCallback) {
    let count = Arc::new(AtomicUsize::new(0));
    let sink = Arc::clone(&count);
    let callback: ChangeCallback = Arc::new(move || {
        sink.fetch_add(1, Ordering::SeqCst);
    });
    (count, callback)
}

#[test]
fn get_on_empty_map_is_none() {
    let map = MemoryMap::new();
    assert!(map.get(VIEW_MATRIX_KEY).is_none());
}

#[test]
fn set_then_get_returns_value() {
    let map = MemoryMap::new();
    map.set("k", serde_json::json!({"a": 1})).unwrap();
    assert_eq!(map.get("k"), Some(serde_json::json!({"a": 1})));
}

#[test]
fn observers_fire_only_for_their_key() {
    let map = MemoryMap::new();
    let (views, on_view) = counter();
    let (other, on_other) = counter();
    map.observe(VIEW_MATRIX_KEY, on_view);
    map.observe("selection", on_other);

    map.set(VIEW_MATRIX_KEY, Value::Null).unwrap();
    map.set(VIEW_MATRIX_KEY, Value::Null).unwrap();

    assert_eq!(views.load(Ordering::SeqCst), 2);
    assert_eq!(other.load(Ordering::SeqCst), 0);
}

#[test]
fn callback_can_read_map_during_notification() {
    let map = Arc::new(MemoryMap::new());
    let seen = Arc::new(Mutex::new(None));
    let (reader, sink) = (Arc::clone(&map), Arc::clone(&seen));
    map.observe(
        "k",
        Arc::new(move || {
            *sink.lock().unwrap() = reader.get("k");
        }),
    );

    map.set("k", serde_json::json!(7)).unwrap();
    assert_eq!(*seen.lock().unwrap(), Some(serde_json::json!(7)));
}

#[test]
fn unobserve_stops_notifications() {
    let map = MemoryMap::new();
    let (count, callback) = counter();
    let id = map.observe("k", callback);

    assert!(map.unobserve(id));
    assert!(!map.unobserve(id));
    map.set("k", Value::Null).unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[test]
fn offline_map_rejects_writes_and_keeps_old_value() {
    let map = MemoryMap::new();
    map.set("k", serde_json::json!(1)).unwrap();
    map.set_offline(true);

    let err = map.set("k", serde_json::json!(2)).unwrap_err();
    assert!(matches!(err, SharedStateError::Offline));
    assert_eq!(map.get("k"), Some(serde_json::json!(1)));

    map.set_offline(false);
    map.set("k", serde_json::json!(2)).unwrap();
    assert_eq!(map.get("k"), Some(serde_json::json!(2)));
}

#[test]
fn switchable_subscription_pauses_and_resumes() {
    let map = Arc::new(MemoryMap::new());
    let (count, callback) = counter();
    let sub = SwitchableSubscription::new(map.clone(), "k", callback);
    assert!(sub.is_on());

    map.set("k", Value::Null).unwrap();
    sub.turn_off();
    assert!(!sub.is_on());
    map.set("k", Value::Null).unwrap();
    sub.turn_on();
    sub.turn_on();
    map.set("k", Value::Null).unwrap();

    assert_eq!(count.load(Ordering::SeqCst), 2);
    assert_eq!(map.observer_count("k"), 1);
}

#[test]
fn dropping_switchable_subscription_unobserves() {
    let map = Arc::new(MemoryMap::new());
    let (_count, callback) = counter();
    let sub = SwitchableSubscription::new(map.clone(), "k", callback);
    assert_eq!(map.observer_count("k"), 1);
    drop(sub);
    assert_eq!(map.observer_count("k"), 0);
}
