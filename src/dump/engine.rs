//! Dump orchestration and the revision consistency check.
//!
//! etcd offers no way to read the whole auth configuration atomically, and
//! the dump issues one request per role and per user. The auth revision is
//! read before and after; if it moved, some of the reads in between may
//! disagree with each other and the dump is thrown away.

use super::command::Command;
use super::quote::{PosixQuoter, ShellQuote};
use crate::adapters::AuthSource;
use crate::core::context::DumpContext;
use crate::core::error::{DumpError, DumpResult, UpstreamCall};
use serde::Serialize;

/// A consistent dump of the auth configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthDump {
    /// Auth revision the dump was taken at.
    pub revision: u64,
    /// Quoted command lines, without the program name.
    pub commands: Vec<String>,
}

/// Reads an [`AuthSource`] and renders it as setup commands.
///
/// Holds no state between calls; one `Dumper` can serve concurrent dumps.
pub struct Dumper<'a, S: ?Sized, Q = PosixQuoter> {
    source: &'a S,
    quoter: Q,
}

impl<'a, S: AuthSource + ?Sized> Dumper<'a, S> {
    /// Create a dumper with POSIX shell quoting.
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            quoter: PosixQuoter,
        }
    }
}

impl<'a, S: AuthSource + ?Sized, Q: ShellQuote> Dumper<'a, S, Q> {
    /// Use a different quoting capability.
    pub fn with_quoter<Q2: ShellQuote>(self, quoter: Q2) -> Dumper<'a, S, Q2> {
        Dumper {
            source: self.source,
            quoter,
        }
    }

    /// Dump the auth configuration as quoted command lines.
    ///
    /// Returns [`DumpError::Unchanged`] without reading anything else when
    /// the live auth revision equals `prior_revision`. Pass 0 to always
    /// dump, with one sharp edge: a cluster that has never had an auth
    /// mutation also reports revision 0, and is reported as unchanged.
    pub async fn dump(&self, ctx: &DumpContext, prior_revision: u64) -> DumpResult<AuthDump> {
        let (revision, commands) = self.commands(ctx, prior_revision).await?;
        Ok(AuthDump {
            revision,
            commands: commands
                .iter()
                .map(|cmd| cmd.render(&self.quoter))
                .collect(),
        })
    }

    /// Like [`dump`](Self::dump), returning unquoted commands.
    pub async fn commands(
        &self,
        ctx: &DumpContext,
        prior_revision: u64,
    ) -> DumpResult<(u64, Vec<Command>)> {
        let start = ctx
            .run(UpstreamCall::AuthStatus, self.source.auth_status())
            .await?;
        tracing::debug!(
            revision = start.revision,
            enabled = start.enabled,
            "auth status read"
        );

        if start.revision == prior_revision {
            tracing::debug!(revision = start.revision, "auth revision unchanged");
            return Err(DumpError::Unchanged {
                revision: start.revision,
            });
        }

        let mut commands = Vec::new();

        let roles = ctx
            .run(UpstreamCall::RoleList, self.source.role_list())
            .await?;
        for role in &roles {
            commands.push(Command::RoleAdd { role: role.clone() });
            let perms = ctx
                .run(
                    UpstreamCall::RoleGet { role: role.clone() },
                    self.source.role_get(role),
                )
                .await?;
            commands.extend(perms.into_iter().map(|perm| Command::RoleGrantPermission {
                role: role.clone(),
                perm,
            }));
        }
        tracing::debug!(roles = roles.len(), "roles read");

        let users = ctx
            .run(UpstreamCall::UserList, self.source.user_list())
            .await?;
        for user in &users {
            commands.push(Command::UserAdd { user: user.clone() });
            let granted = ctx
                .run(
                    UpstreamCall::UserGet { user: user.clone() },
                    self.source.user_get(user),
                )
                .await?;
            commands.extend(granted.into_iter().map(|role| Command::UserGrantRole {
                user: user.clone(),
                role,
            }));
        }
        tracing::debug!(users = users.len(), "users read");

        commands.push(Command::auth(start.enabled));

        let end = ctx
            .run(UpstreamCall::AuthStatus, self.source.auth_status())
            .await?;
        if end.revision != start.revision {
            tracing::warn!(
                start = start.revision,
                end = end.revision,
                "auth revision changed during dump"
            );
            return Err(DumpError::changed_during_dump(start.revision, end.revision));
        }

        tracing::info!(
            revision = start.revision,
            roles = roles.len(),
            users = users.len(),
            commands = commands.len(),
            "auth dump complete"
        );
        Ok((start.revision, commands))
    }
}

/// Dump `source` with POSIX quoting.
pub async fn dump<S: AuthSource + ?Sized>(
    ctx: &DumpContext,
    source: &S,
    prior_revision: u64,
) -> DumpResult<AuthDump> {
    Dumper::new(source).dump(ctx, prior_revision).await
}
