//! skycast library
//!
//! This module exposes the forecast pipeline, icon cache, application state
//! and rendering for use by the binary and integration tests.

pub mod app;
pub mod cache;
pub mod cli;
pub mod data;
pub mod logging;
pub mod pipeline;
pub mod ui;
