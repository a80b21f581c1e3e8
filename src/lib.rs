//! Crate entrypoint wiring together the config model, store and API.

pub mod api;
pub mod error;
pub mod model;
pub mod persist;
pub mod store;
pub mod validation;

use store::ConfigStore;

use std::sync::Arc;

/// Complete application dependencies shared across handlers.
pub struct AppState {
    pub store: ConfigStore,
}

/// Arc-wrapped version of `AppState` passed into Axum extensions.
pub type SharedState = Arc<AppState>;
