// src/core/mod.rs
//! Core services: configuration, storage and query building

pub mod config_manager;
pub mod database;
pub mod query;

pub use config_manager::{ClientConfig, ConfigManager};
pub use database::{is_unique_violation, Database, JobRepository};
pub use query::{JobFilter, JobQuery, Pagination};
