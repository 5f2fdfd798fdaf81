//! Multi-peer scenarios over one in-process shared map.

use std::sync::Arc;
use std::time::Duration;

use viewsync::chair::Interaction;
use viewsync::config::SyncConfig;
use viewsync::session::SyncSession;
use viewsync::shared::{MemoryMap, SharedState, VIEW_MATRIX_KEY};
use viewsync::view::{Transform, ViewState};
use viewsync::viewport::SimViewport;

struct Peer {
    session: Arc<SyncSession>,
    viewport: Arc<SimViewport>,
}

fn join(map: &Arc<MemoryMap>) -> Peer {
    let config = SyncConfig { normalize_on_load: false, ..SyncConfig::default() };
    let viewport = Arc::new(SimViewport::new(Transform::IDENTITY));
    let session = SyncSession::new(config, map.clone(), viewport.clone());
    viewport.on_viewpoint_changed(session.viewpoint_hook());
    session.document_ready();
    session.shared_state_ready();
    session.model_loaded();
    Peer { session, viewport }
}

fn at(x: f64) -> Transform {
    Transform::IDENTITY.with_translation([x, 0.0, 0.0])
}

fn shared_author(map: &MemoryMap) -> Option<viewsync::peer::PeerId> {
    let value = map.get(VIEW_MATRIX_KEY)?;
    ViewState::from_shared(&value).unwrap().map(|v| v.peer_id)
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(500)).await;
}

#[tokio::test(start_paused = true)]
async fn three_peers_follow_whoever_last_moved() {
    let map = Arc::new(MemoryMap::new());
    let peers = [join(&map), join(&map), join(&map)];

    for (leader, x) in peers.iter().zip([1.0, 2.0, 3.0]) {
        leader.session.interaction_began(Interaction::DragStart);
        leader.viewport.move_to(at(x));
        settle().await;

        assert_eq!(shared_author(&map), Some(leader.session.local_peer()));
        for follower in &peers {
            assert_eq!(follower.viewport.current(), leader.viewport.current());
            assert_eq!(follower.session.chairman(), leader.session.local_peer());
        }
    }
}

#[tokio::test(start_paused = true)]
async fn followers_never_republish_remote_views() {
    let map = Arc::new(MemoryMap::new());
    let leader = join(&map);
    let followers = [join(&map), join(&map)];

    leader.session.interaction_began(Interaction::DragStart);
    for step in 0..10 {
        leader.viewport.move_to(at(f64::from(step)));
        tokio::time::sleep(Duration::from_millis(70)).await;
    }
    settle().await;

    assert_eq!(shared_author(&map), Some(leader.session.local_peer()));
    for follower in &followers {
        assert_eq!(follower.viewport.current(), at(9.0));
        assert!(!follower.viewport.applied().is_empty());
        // Throttled: far fewer applications than leader moves.
        assert!(follower.viewport.applied().len() < 10);
    }
}

#[tokio::test(start_paused = true)]
async fn simultaneous_drags_settle_on_one_author() {
    let map = Arc::new(MemoryMap::new());
    let a = join(&map);
    let b = join(&map);

    a.session.interaction_began(Interaction::DragStart);
    b.session.interaction_began(Interaction::DragStart);
    a.viewport.move_to(at(1.0));
    b.viewport.move_to(at(2.0));
    settle().await;

    // Both publish in the same instant. The map keeps the last write, its
    // author drops the self echo, and the other peer follows it.
    let author = shared_author(&map).unwrap();
    assert!(author == a.session.local_peer() || author == b.session.local_peer());
    assert_eq!(a.viewport.current(), b.viewport.current());
    assert_eq!(a.session.chairman(), author);
    assert_eq!(b.session.chairman(), author);
}
