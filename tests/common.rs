//! Common test utilities.
//!
//! Shared auth sources for integration tests.
//! Import with `mod common;` in test files.

#![allow(dead_code)]

use async_trait::async_trait;
use authdump::adapters::memory::MemoryAuthSource;
use authdump::adapters::{AuthSource, AuthStatus, Permission, PermissionType, Role, User};
use authdump::error::{GrpcCode, SourceError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Roles "a" and "b" with one exact-key read permission each, user "u"
/// holding role "a", auth enabled.
pub fn ordering_fixture() -> MemoryAuthSource {
    MemoryAuthSource::from_parts(
        vec![
            Role::new("a").with_permission(Permission::exact("ka", PermissionType::Read)),
            Role::new("b").with_permission(Permission::exact("kb", PermissionType::Write)),
        ],
        vec![User::new("u").with_role("a")],
        true,
    )
}

/// A store with one of each key expression shape.
pub fn mixed_fixture() -> MemoryAuthSource {
    MemoryAuthSource::from_parts(
        vec![
            Role::new("root").with_permission(Permission::whole_keyspace(PermissionType::ReadWrite)),
            Role::new("app")
                .with_permission(Permission::exact("config", PermissionType::Read))
                .with_permission(Permission::range("app/", "app0", PermissionType::ReadWrite))
                .with_permission(Permission::range("a", "m", PermissionType::Write)),
        ],
        vec![
            User::new("root").with_role("root"),
            User::new("svc").with_role("app").with_role("root"),
        ],
        false,
    )
}

/// Source replaying a fixed set of answers, with a scripted status sequence.
///
/// Each `auth_status` call pops the next revision; the last one repeats.
pub struct ScriptedSource {
    pub enabled: bool,
    revisions: Mutex<Vec<u64>>,
    pub roles: Vec<Role>,
    pub users: Vec<User>,
    pub calls: CallLog,
}

impl ScriptedSource {
    pub fn new(revisions: &[u64], roles: Vec<Role>, users: Vec<User>, enabled: bool) -> Self {
        let mut revisions = revisions.to_vec();
        revisions.reverse();
        Self {
            enabled,
            revisions: Mutex::new(revisions),
            roles,
            users,
            calls: CallLog::default(),
        }
    }
}

#[async_trait]
impl AuthSource for ScriptedSource {
    async fn auth_status(&self) -> Result<AuthStatus, SourceError> {
        self.calls.record("auth_status");
        let mut revisions = self.revisions.lock();
        let revision = if revisions.len() > 1 {
            revisions.pop().unwrap_or_default()
        } else {
            revisions.last().copied().unwrap_or_default()
        };
        Ok(AuthStatus {
            enabled: self.enabled,
            revision,
        })
    }

    async fn role_list(&self) -> Result<Vec<String>, SourceError> {
        self.calls.record("role_list");
        Ok(self.roles.iter().map(|r| r.name.clone()).collect())
    }

    async fn role_get(&self, role: &str) -> Result<Vec<Permission>, SourceError> {
        self.calls.record("role_get");
        self.roles
            .iter()
            .find(|r| r.name == role)
            .map(|r| r.permissions.clone())
            .ok_or_else(|| SourceError::role_not_found(role))
    }

    async fn user_list(&self) -> Result<Vec<String>, SourceError> {
        self.calls.record("user_list");
        Ok(self.users.iter().map(|u| u.name.clone()).collect())
    }

    async fn user_get(&self, user: &str) -> Result<Vec<String>, SourceError> {
        self.calls.record("user_get");
        self.users
            .iter()
            .find(|u| u.name == user)
            .map(|u| u.roles.clone())
            .ok_or_else(|| SourceError::user_not_found(user))
    }
}

/// Names of the source calls made, in order.
#[derive(Default)]
pub struct CallLog {
    calls: Mutex<Vec<&'static str>>,
}

impl CallLog {
    pub fn record(&self, call: &'static str) {
        self.calls.lock().push(call);
    }

    pub fn snapshot(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }
}

/// Wraps a [`MemoryAuthSource`] and adds a role while the first role is
/// being read, the way a concurrent `etcdctl role add` would.
pub struct MutatingSource {
    pub inner: MemoryAuthSource,
    mutated: AtomicUsize,
}

impl MutatingSource {
    pub fn new(inner: MemoryAuthSource) -> Self {
        Self {
            inner,
            mutated: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AuthSource for MutatingSource {
    async fn auth_status(&self) -> Result<AuthStatus, SourceError> {
        self.inner.auth_status().await
    }

    async fn role_list(&self) -> Result<Vec<String>, SourceError> {
        self.inner.role_list().await
    }

    async fn role_get(&self, role: &str) -> Result<Vec<Permission>, SourceError> {
        if self.mutated.fetch_add(1, Ordering::SeqCst) == 0 {
            self.inner.role_add("intruder")?;
        }
        self.inner.role_get(role).await
    }

    async fn user_list(&self) -> Result<Vec<String>, SourceError> {
        self.inner.user_list().await
    }

    async fn user_get(&self, user: &str) -> Result<Vec<String>, SourceError> {
        self.inner.user_get(user).await
    }
}

/// Fails the named call with `Unavailable`, delegating everything else.
pub struct FailingSource {
    pub inner: MemoryAuthSource,
    pub fail_on: &'static str,
}

impl FailingSource {
    fn check(&self, call: &'static str) -> Result<(), SourceError> {
        if self.fail_on == call {
            Err(SourceError::rpc(GrpcCode::Unavailable, "etcdserver: leader changed"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl AuthSource for FailingSource {
    async fn auth_status(&self) -> Result<AuthStatus, SourceError> {
        self.check("auth_status")?;
        self.inner.auth_status().await
    }

    async fn role_list(&self) -> Result<Vec<String>, SourceError> {
        self.check("role_list")?;
        self.inner.role_list().await
    }

    async fn role_get(&self, role: &str) -> Result<Vec<Permission>, SourceError> {
        self.check("role_get")?;
        self.inner.role_get(role).await
    }

    async fn user_list(&self) -> Result<Vec<String>, SourceError> {
        self.check("user_list")?;
        self.inner.user_list().await
    }

    async fn user_get(&self, user: &str) -> Result<Vec<String>, SourceError> {
        self.check("user_get")?;
        self.inner.user_get(user).await
    }
}

/// Answers status immediately and never answers anything else.
pub struct StalledSource {
    pub revision: u64,
}

#[async_trait]
impl AuthSource for StalledSource {
    async fn auth_status(&self) -> Result<AuthStatus, SourceError> {
        Ok(AuthStatus {
            enabled: true,
            revision: self.revision,
        })
    }

    async fn role_list(&self) -> Result<Vec<String>, SourceError> {
        std::future::pending().await
    }

    async fn role_get(&self, _role: &str) -> Result<Vec<Permission>, SourceError> {
        std::future::pending().await
    }

    async fn user_list(&self) -> Result<Vec<String>, SourceError> {
        std::future::pending().await
    }

    async fn user_get(&self, _user: &str) -> Result<Vec<String>, SourceError> {
        std::future::pending().await
    }
}
