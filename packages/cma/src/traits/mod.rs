//! Trait abstractions at the pipeline's seams.
//!
//! - [`inventory`] - read-only candidate pool access
//! - [`textgen`] - the external text-generation service
//! - [`renderer`] - fire-and-forget document rendering
//! - [`store`] - report persistence and generation auditing

pub mod inventory;
pub mod renderer;
pub mod store;
pub mod textgen;
