//! Job board: REST API over a job store, a typed client for it, and the
//! client-side data provider and view-models that drive the UI.

pub mod cli;
pub mod client;
pub mod core;
pub mod environment;
pub mod presentation;
pub mod provider;
pub mod types;
pub mod web;

pub use web::{build_rocket, start_web_server};

/// Log through `tracing` at the given level: `app_log!(info, "...", args)`.
#[macro_export]
macro_rules! app_log {
    ($level:ident, $($arg:tt)+) => {
        ::tracing::$level!($($arg)+)
    };
}
