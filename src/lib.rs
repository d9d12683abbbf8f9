// Bank Service - Core Library
// Exposes the model, store, and router for use in the server binary and tests

pub mod api;
pub mod bank;
pub mod store;

// Re-export commonly used types
pub use api::app;
pub use bank::Bank;
pub use store::{BankStore, StoreError, StoreResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
