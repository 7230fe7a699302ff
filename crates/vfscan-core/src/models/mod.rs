//! Data models for extracted reports and pipeline configuration.

pub mod config;
pub mod record;
