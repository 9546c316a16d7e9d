//! Portfolio Data Gateway Library
//!
//! This library exposes the core modules for use in tests.

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ui;
