use std::sync::Arc;

use crate::auth::TokenService;
use crate::config::Compatibility;
use crate::store::{MemoryStore, TaskStore, UserStore};

/// Shared application state, registered once as `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub tasks: Arc<dyn TaskStore>,
    pub tokens: TokenService,
    pub bcrypt_cost: u32,
    pub compat: Compatibility,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        tasks: Arc<dyn TaskStore>,
        tokens: TokenService,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            users,
            tasks,
            tokens,
            bcrypt_cost,
            compat: Compatibility::default(),
        }
    }

    /// State backed by a single [`MemoryStore`] for both users and tasks.
    pub fn in_memory(tokens: TokenService, bcrypt_cost: u32) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(store.clone(), store, tokens, bcrypt_cost)
    }

    pub fn with_compat(mut self, compat: Compatibility) -> Self {
        self.compat = compat;
        self
    }
}
