//! Swapkit Core Library
//!
//! This crate provides the domain models, error types, and configuration
//! shared by the swapkit client and CLI.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{Config, PollingConfig, ProcessorConfig, SignatureSet, TransportConfig, WorkerConfig};
pub use error::{ErrorAdvice, SwapError};
