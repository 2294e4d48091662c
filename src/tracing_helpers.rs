//! Logging macros that compile away unless the `tracing` feature is enabled.
//!
//! With the feature on they forward to the `tracing` crate, so arena growth, storage forks and
//! stale index resolutions show up under the `sealed_rbtree` target:
//!
//! ```bash
//! RUST_LOG=sealed_rbtree=debug cargo test --features tracing
//! ```
//!
//! Without it the arguments are never evaluated.

#![allow(unused_macros, unused_imports)]

/// Trace-level logging. No-op without the `tracing` feature.
#[cfg(feature = "tracing")]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

/// Debug-level logging. No-op without the `tracing` feature.
#[cfg(feature = "tracing")]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

pub(crate) use debug_log;
pub(crate) use trace_log;
