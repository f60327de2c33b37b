//! Accord Kernel Library
//!
//! The account menu engine: settings, taps, provider adapters, the two menu
//! composers and the endpoint URL resolver. The `accord` binary drives it
//! against a static site fixture.

pub mod catalog;
pub mod config;
pub mod error;
pub mod host;
pub mod menu;
pub mod settings;
pub mod tap;
