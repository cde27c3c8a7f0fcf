//! Domain repositories
//!
//! Traits for the collaborators the vault client talks to: the wallet
//! provider, the vault contract, and the balance and rate-limit sources.

pub mod wallet_provider;
pub mod vault_gateway;
pub mod token_source;
pub mod rate_limit_source;

// Re-export repositories
pub use wallet_provider::*;
pub use vault_gateway::*;
pub use token_source::*;
pub use rate_limit_source::*;
