//! Domain entities and value objects
//!
//! This module contains the core domain entities and value objects
//! that represent the business concepts of the vault client.

pub mod token;
pub mod network;
pub mod operation;

// Re-export entities
pub use token::*;
pub use network::*;
pub use operation::*;
