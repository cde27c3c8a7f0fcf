//! Domain layer - entities and repositories
//!
//! This module contains the domain model of the vault client: tokens,
//! networks and operations, plus the collaborator traits it depends on.

pub mod entities;
pub mod repositories;

// Re-export domain components
pub use entities::*;
pub use repositories::*;
