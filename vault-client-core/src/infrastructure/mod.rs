//! Infrastructure layer
//!
//! Environment configuration and the concrete wallet provider and vault
//! gateway implementations.

pub mod config;
pub mod rpc;
pub mod vault;

pub use config::*;
pub use rpc::*;
pub use vault::*;
