//! Data types for the CMA pipeline.

pub mod comparable;
pub mod config;
pub mod insights;
pub mod property;
pub mod report;
pub mod statistics;
