use std::sync::Arc;

use rand::Rng;
use tracing::info;
use viewsync::chair::Interaction;
use viewsync::config::SyncConfig;
use viewsync::session::SyncSession;
use viewsync::shared::MemoryMap;
use viewsync::view::Transform;
use viewsync::viewport::SimViewport;

const DRAG_STEPS: usize = 8;

struct DemoPeer {
    name: &'static str,
    session: Arc<SyncSession>,
    viewport: Arc<SimViewport>,
}

fn spawn_peer(name: &'static str, config: SyncConfig, shared: &Arc<MemoryMap>, home: Transform) -> DemoPeer {
    let viewport = Arc::new(SimViewport::new(home));
    let session = SyncSession::new(config, shared.clone(), viewport.clone());
    viewport.on_viewpoint_changed(session.viewpoint_hook());
    info!(name, peer = %session.local_peer(), "demo: peer joined");

    session.document_ready();
    session.shared_state_ready();
    session.model_loaded();
    DemoPeer { name, session, viewport }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = SyncConfig::from_env();
    let shared = Arc::new(MemoryMap::new());

    let alice = spawn_peer("alice", config, &shared, Transform::IDENTITY.with_translation([0.0, 0.0, 10.0]));
    tokio::time::sleep(config.send_interval).await;
    let bob = spawn_peer("bob", config, &shared, Transform::IDENTITY.with_translation([0.0, 0.0, 25.0]));
    tokio::time::sleep(config.receive_interval).await;

    // Alice drags; each step lands faster than the send interval.
    alice.session.interaction_began(Interaction::DragStart);
    for _ in 0..DRAG_STEPS {
        let target = {
            let mut rng = rand::rng();
            let current = alice.viewport.current();
            current.with_translation([
                current.translation[0] + rng.random_range(-1.0..1.0),
                current.translation[1] + rng.random_range(-1.0..1.0),
                current.translation[2],
            ])
        };
        alice.viewport.move_to(target);
        tokio::time::sleep(config.send_interval / 3).await;
    }

    tokio::time::sleep(config.send_interval + config.receive_interval).await;

    for peer in [&alice, &bob] {
        info!(
            name = peer.name,
            chairman = %peer.session.chairman(),
            translation = ?peer.viewport.current().translation,
            "demo: final view"
        );
    }
}
