//! In-memory auth store.
//!
//! Holds roles, users and the auth flag the way the etcd auth store does:
//! every successful mutation bumps the auth revision by one, and lists come
//! back sorted by name. Reads go through [`AuthSource`], so the dump engine
//! can run against it exactly as against a live cluster.

use crate::adapters::etcd::auth::{AuthStatus, Permission, Role, User};
use crate::adapters::AuthSource;
use crate::core::error::{GrpcCode, SourceError};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct AuthState {
    roles: BTreeMap<String, Role>,
    users: BTreeMap<String, User>,
    enabled: bool,
    revision: u64,
}

/// Auth store held in process memory.
#[derive(Debug, Default)]
pub struct MemoryAuthSource {
    state: RwLock<AuthState>,
}

impl MemoryAuthSource {
    /// Create an empty store at auth revision 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from prepared roles and users.
    ///
    /// The revision is what the server would report after creating them one
    /// mutation at a time.
    pub fn from_parts(roles: Vec<Role>, users: Vec<User>, enabled: bool) -> Self {
        let mut revision = 0u64;
        for role in &roles {
            revision += 1 + role.permissions.len() as u64;
        }
        for user in &users {
            revision += 1 + user.roles.len() as u64;
        }
        if enabled {
            revision += 1;
        }

        Self {
            state: RwLock::new(AuthState {
                roles: roles.into_iter().map(|r| (r.name.clone(), r)).collect(),
                users: users.into_iter().map(|u| (u.name.clone(), u)).collect(),
                enabled,
                revision,
            }),
        }
    }

    /// Current auth revision.
    pub fn revision(&self) -> u64 {
        self.state.read().revision
    }

    /// Add a role.
    pub fn role_add(&self, name: &str) -> Result<(), SourceError> {
        let mut state = self.state.write();
        if state.roles.contains_key(name) {
            return Err(SourceError::rpc(
                GrpcCode::FailedPrecondition,
                "etcdserver: role name already exists",
            ));
        }
        state.roles.insert(name.to_string(), Role::new(name));
        state.revision += 1;
        Ok(())
    }

    /// Delete a role and revoke it from every user.
    pub fn role_delete(&self, name: &str) -> Result<(), SourceError> {
        let mut state = self.state.write();
        state
            .roles
            .remove(name)
            .ok_or_else(|| SourceError::role_not_found(name))?;
        for user in state.users.values_mut() {
            user.roles.retain(|r| r != name);
        }
        state.revision += 1;
        Ok(())
    }

    /// Grant a permission to a role.
    pub fn role_grant_permission(&self, name: &str, perm: Permission) -> Result<(), SourceError> {
        let mut state = self.state.write();
        let role = state
            .roles
            .get_mut(name)
            .ok_or_else(|| SourceError::role_not_found(name))?;
        role.permissions.push(perm);
        state.revision += 1;
        Ok(())
    }

    /// Add a user.
    pub fn user_add(&self, name: &str) -> Result<(), SourceError> {
        let mut state = self.state.write();
        if state.users.contains_key(name) {
            return Err(SourceError::rpc(
                GrpcCode::FailedPrecondition,
                "etcdserver: user name already exists",
            ));
        }
        state.users.insert(name.to_string(), User::new(name));
        state.revision += 1;
        Ok(())
    }

    /// Grant a role to a user. Granting an already held role is a no-op.
    pub fn user_grant_role(&self, user: &str, role: &str) -> Result<(), SourceError> {
        let mut state = self.state.write();
        if !state.roles.contains_key(role) {
            return Err(SourceError::role_not_found(role));
        }
        let entry = state
            .users
            .get_mut(user)
            .ok_or_else(|| SourceError::user_not_found(user))?;
        if entry.roles.iter().any(|r| r == role) {
            return Ok(());
        }
        entry.roles.push(role.to_string());
        state.revision += 1;
        Ok(())
    }

    /// Enable or disable authentication.
    pub fn set_enabled(&self, enabled: bool) {
        let mut state = self.state.write();
        if state.enabled != enabled {
            state.enabled = enabled;
            state.revision += 1;
        }
    }
}

#[async_trait]
impl AuthSource for MemoryAuthSource {
    async fn auth_status(&self) -> Result<AuthStatus, SourceError> {
        let state = self.state.read();
        Ok(AuthStatus {
            enabled: state.enabled,
            revision: state.revision,
        })
    }

    async fn role_list(&self) -> Result<Vec<String>, SourceError> {
        Ok(self.state.read().roles.keys().cloned().collect())
    }

    async fn role_get(&self, role: &str) -> Result<Vec<Permission>, SourceError> {
        self.state
            .read()
            .roles
            .get(role)
            .map(|r| r.permissions.clone())
            .ok_or_else(|| SourceError::role_not_found(role))
    }

    async fn user_list(&self) -> Result<Vec<String>, SourceError> {
        Ok(self.state.read().users.keys().cloned().collect())
    }

    async fn user_get(&self, user: &str) -> Result<Vec<String>, SourceError> {
        self.state
            .read()
            .users
            .get(user)
            .map(|u| u.roles.clone())
            .ok_or_else(|| SourceError::user_not_found(user))
    }
}
