use std::sync::Arc;

use crate::cache::ContentCache;
use crate::config::Config;
use crate::store::SharedStore;
use crate::sync::gate::ConnectionGate;
use crate::sync::registry::RoomRegistry;

/// Shared application state, constructed once at startup and handed to every
/// component by reference.
pub struct AppState {
    pub config: Config,
    pub registry: RoomRegistry,
    pub cache: Arc<ContentCache>,
    pub store: SharedStore,
    pub gate: ConnectionGate,
}

impl AppState {
    pub fn new(config: Config, store: SharedStore) -> Arc<Self> {
        let gate = ConnectionGate::new(config.jwt_secret.clone(), store.clone());
        Arc::new(Self {
            config,
            registry: RoomRegistry::new(),
            cache: Arc::new(ContentCache::new()),
            store,
            gate,
        })
    }
}
