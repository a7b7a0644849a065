//! Auth sources.
//!
//! The dump engine reads auth state through the [`AuthSource`] trait and
//! never talks to a cluster directly.
//!
//! Currently implemented:
//! - [`etcd`] - etcd v3 gRPC client (`grpc` feature)
//! - [`memory`] - in-memory auth store with server-like revision accounting

use crate::core::error::SourceError;
use async_trait::async_trait;

pub mod etcd;
pub mod memory;

pub use etcd::auth::{AuthStatus, Permission, PermissionType, Role, User};

/// Read access to a cluster's auth configuration.
///
/// Each call is an independent read; implementations make no promise that
/// two calls observe the same revision. Callers detect that through
/// [`AuthSource::auth_status`].
#[async_trait]
pub trait AuthSource: Send + Sync {
    /// Whether auth is enabled, and the current auth revision.
    async fn auth_status(&self) -> Result<AuthStatus, SourceError>;

    /// All role names, in server order.
    async fn role_list(&self) -> Result<Vec<String>, SourceError>;

    /// Permissions of one role, in server order.
    async fn role_get(&self, role: &str) -> Result<Vec<Permission>, SourceError>;

    /// All user names, in server order.
    async fn user_list(&self) -> Result<Vec<String>, SourceError>;

    /// Role names assigned to one user, in server order.
    async fn user_get(&self, user: &str) -> Result<Vec<String>, SourceError>;
}
