//! SQLite storage implementation for disposals.

mod model;
mod repository;

pub use model::{AppStateDB, StoredDisposal};
pub use repository::{decode_disposals, encode_disposals, DisposalRepository};

// Re-export trait from core for convenience
pub use formulaire2086_core::disposals::DisposalStoreTrait;
