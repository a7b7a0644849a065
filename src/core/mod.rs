//! Core infrastructure.
//!
//! - [`config`] - Configuration parsing and validation
//! - [`context`] - Cancellation and deadline context for a dump
//! - [`error`] - Error types

pub mod config;
pub mod context;
pub mod error;
