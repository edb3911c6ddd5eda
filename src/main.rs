use std::sync::Arc;

use chirp::app::{self, AppState};
use chirp::model::MemoryStore;
use chirp::session::SessionStore;
use chirp::{telemetry, Config, Server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init("info");

    let config = Config::load()?;
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(store.clone(), store)?;
    let sessions = Arc::new(SessionStore::new());
    let cleanup = sessions.clone().spawn_cleanup(config.session.cleanup_interval());
    let router = app::router(state, sessions, config.session);

    let served = Server::bind(config.server.socket_addr())
        .max_body_bytes(config.server.max_body_bytes)
        .serve(router)
        .await;
    cleanup.abort();
    served?;
    Ok(())
}
