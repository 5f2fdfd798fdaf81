use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

fn home() -> Transform {
    Transform::IDENTITY.with_translation([0.0, 0.0, 10.0])
}

fn counting_hook(viewport: &SimViewport) -> Arc<AtomicUsize> {
    let count = Arc::new(AtomicUsize::new(0));
    let sink = Arc::clone(&count);
    viewport.on_viewpoint_changed(Arc::new(move || {
        sink.fetch_add(1, Ordering::SeqCst);
    }));
    count
}

#[test]
fn new_viewport_starts_at_identity() {
    let viewport = SimViewport::new(home());
    assert_eq!(viewport.current_view(), Some(Transform::IDENTITY));
    assert!(viewport.applied().is_empty());
}

#[test]
fn detached_viewport_has_no_current_view() {
    let viewport = SimViewport::detached(home());
    assert_eq!(viewport.current_view(), None);
    viewport.set_attached(true);
    assert!(viewport.current_view().is_some());
}

#[test]
fn move_to_fires_viewpoint_changed() {
    let viewport = SimViewport::new(home());
    let count = counting_hook(&viewport);
    let target = Transform::IDENTITY.with_translation([1.0, 2.0, 3.0]);

    viewport.move_to(target);

    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(viewport.current(), target);
    assert!(viewport.applied().is_empty());
}

#[test]
fn apply_view_records_animation_and_fires_change() {
    let viewport = SimViewport::new(home());
    let count = counting_hook(&viewport);
    let target = Transform::IDENTITY.with_translation([5.0, 0.0, 0.0]);

    viewport.apply_view(&target, Duration::from_millis(350));

    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(viewport.current(), target);
    assert_eq!(viewport.applied(), vec![AppliedView { target, duration: Duration::from_millis(350) }]);
}

#[test]
fn show_all_moves_to_home() {
    let viewport = SimViewport::new(home());
    let count = counting_hook(&viewport);
    viewport.show_all();
    assert_eq!(viewport.current(), home());
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn hook_may_read_viewport_reentrantly() {
    let viewport = Arc::new(SimViewport::new(home()));
    let seen = Arc::new(Mutex::new(None));
    let (reader, sink) = (Arc::clone(&viewport), Arc::clone(&seen));
    viewport.on_viewpoint_changed(Arc::new(move || {
        *sink.lock().unwrap() = reader.current_view();
    }));

    viewport.move_to(home());
    assert_eq!(*seen.lock().unwrap(), Some(home()));
}
