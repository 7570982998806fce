//! Formulaire 2086 Core - domain models, calculator, services, and traits.
//!
//! This crate contains the capital-gains logic for the French 2086 form.
//! It is storage-agnostic and defines the persistence port implemented
//! by the `storage-sqlite` crate.

pub mod constants;
pub mod disposals;
pub mod errors;
pub mod report;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
