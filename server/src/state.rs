use std::sync::RwLock;

use covenant_core::Registry;

/// Shared server state. The single `RwLock` serializes mutating calls (one
/// writer at a time) while reads run concurrently against the last committed
/// state, which is what keeps the uniqueness and quorum checks race-free.
pub struct AppState {
    pub registry: RwLock<Registry>,
}

impl AppState {
    pub fn new(registry: Registry) -> Self {
        Self { registry: RwLock::new(registry) }
    }
}
