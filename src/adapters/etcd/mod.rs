//! etcd v3 auth adapter.
//!
//! # Modules
//!
//! - [`auth`] - auth model: permissions, roles, users, status
//! - [`proto`] - prost wire types for `etcdserverpb.Auth`
//! - [`client`] - tonic client implementing [`AuthSource`](crate::adapters::AuthSource)

pub mod auth;
#[cfg(feature = "grpc")]
pub mod client;
#[cfg(feature = "grpc")]
pub mod proto;

pub use auth::{AuthStatus, Permission, PermissionType, Role, User};
#[cfg(feature = "grpc")]
pub use client::EtcdAuthClient;
