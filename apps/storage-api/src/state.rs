//! Application state management

use database::postgres::DatabaseConnection;
use domain_products::InMemoryProductRepository;

/// Connected storage backend
#[derive(Clone)]
pub enum Storage {
    Postgres(DatabaseConnection),
    Memory(InMemoryProductRepository),
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub storage: Storage,
}
