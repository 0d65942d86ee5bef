//! In-memory fallback used when no connection string is configured.

mod engine;
mod store;

pub use engine::MemoryEngine;
pub use store::MemoryStore;
