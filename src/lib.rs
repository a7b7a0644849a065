//! etcd-auth-dump - recreate an etcd cluster's auth configuration.
//!
//! Reads roles, role permissions, users, role grants and the auth enabled
//! flag from a running etcd v3 cluster and renders them as etcdctl commands
//! that set up the same configuration on an empty cluster. Passwords cannot
//! be read back and are never part of the output.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                              CLI                                │
//! │          dump │ status │ config        (stdout = commands)      │
//! └─────────────────────────────────────────────────────────────────┘
//!                                  │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          Dump Engine                            │
//! │  status → roles → perms → users → grants → status (same rev?)   │
//! │        key ranges → exact / --prefix / range │ shell quoting    │
//! └─────────────────────────────────────────────────────────────────┘
//!                                  │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          AuthSource                             │
//! │        etcd v3 gRPC client      │      in-memory auth store     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Module Organization
//!
//! - [`core::config`] - Configuration file, environment and overrides
//! - [`core::context`] - Cancellation and deadline for one dump
//! - [`core::error`] - Error types
//! - [`adapters`] - [`AuthSource`](adapters::AuthSource) and its implementations
//! - [`dump`] - Dump engine, range classification, quoting
//! - [`cli`] - CLI command implementations
//!
//! # Key Invariants
//!
//! - A dump is returned only if the auth revision read first equals the
//!   revision read last.
//! - Command order is fixed: roles and their permissions, then users and
//!   their roles, then `auth enable`/`auth disable`.

// Core infrastructure
pub mod core;

// Auth sources
pub mod adapters;

// Dump engine
pub mod dump;

// CLI
#[cfg(feature = "grpc")]
pub mod cli;

// Re-exports for convenience
pub use self::core::{config, context, error};
pub use dump::{dump, AuthDump, Dumper};
