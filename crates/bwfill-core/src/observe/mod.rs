//! # Observability
//!
//! Structured logging for the bandwidth-fill processing chain, built on the
//! `tracing` ecosystem. Blocks emit events (e.g. on configuration updates)
//! through `tracing` macros; applications pick the output format and level
//! via [`LogConfig`] and [`init_logging`].
//!
//! ```rust,ignore
//! use bwfill_core::observe::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development());
//! tracing::info!(num_copies = 1666, "replication plan derived");
//! ```

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
