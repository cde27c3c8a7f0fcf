//! Core vault client functionality
//!
//! Amount arithmetic and display, form validation, the operation registry,
//! the multi-token batch orchestrator, rate-limit gating, and the wallet
//! network connector.

pub mod amount;
pub mod format;
pub mod validation;
pub mod registry;
pub mod batch;
pub mod rate_limit;
pub mod network;
