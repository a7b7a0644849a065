//! Setup commands and their text form.

use super::keyrange::{classify, KeyExpr};
use super::quote::{PosixQuoter, ShellQuote};
use crate::adapters::etcd::auth::Permission;
use std::fmt;

/// One etcdctl setup command, before quoting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `role add <role>`
    RoleAdd { role: String },
    /// `role grant-permission <role> <type> <key expr>`
    RoleGrantPermission { role: String, perm: Permission },
    /// `user add <user>`
    UserAdd { user: String },
    /// `user grant-role <user> <role>`
    UserGrantRole { user: String, role: String },
    /// `auth enable`
    AuthEnable,
    /// `auth disable`
    AuthDisable,
}

impl Command {
    /// The toggle matching an auth enabled flag.
    pub fn auth(enabled: bool) -> Self {
        if enabled {
            Self::AuthEnable
        } else {
            Self::AuthDisable
        }
    }

    /// Render as a command line without the program name.
    pub fn render<Q: ShellQuote + ?Sized>(&self, q: &Q) -> String {
        match self {
            Self::RoleAdd { role } => format!("role add {}", q.quote_str(role)),
            Self::RoleGrantPermission { role, perm } => format!(
                "role grant-permission {} {} {}",
                q.quote_str(role),
                q.quote_str(perm.perm_type.as_str()),
                render_key_expr(q, classify(&perm.key, &perm.range_end))
            ),
            Self::UserAdd { user } => format!("user add {}", q.quote_str(user)),
            Self::UserGrantRole { user, role } => format!(
                "user grant-role {} {}",
                q.quote_str(user),
                q.quote_str(role)
            ),
            Self::AuthEnable => "auth enable".to_string(),
            Self::AuthDisable => "auth disable".to_string(),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&PosixQuoter))
    }
}

fn render_key_expr<Q: ShellQuote + ?Sized>(q: &Q, expr: KeyExpr<'_>) -> String {
    match expr {
        KeyExpr::WholeKeyspace => format!("{} --prefix", q.quote(b"")),
        KeyExpr::Exact(key) => q.quote(key),
        KeyExpr::Prefix(key) => format!("{} --prefix", q.quote(key)),
        KeyExpr::Range { key, range_end } => format!("{} {}", q.quote(key), q.quote(range_end)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::etcd::auth::PermissionType;

    fn grant(perm: Permission) -> String {
        Command::RoleGrantPermission {
            role: "r".to_string(),
            perm,
        }
        .to_string()
    }

    #[test]
    fn test_whole_keyspace_for_every_type() {
        for perm_type in PermissionType::ALL {
            assert_eq!(
                grant(Permission::whole_keyspace(perm_type)),
                format!("role grant-permission r {} '' --prefix", perm_type)
            );
        }
    }

    #[test]
    fn test_grant_shapes() {
        assert_eq!(
            grant(Permission::exact("config", PermissionType::Read)),
            "role grant-permission r read config"
        );
        assert_eq!(
            grant(Permission::range("foo/", "foo0", PermissionType::Write)),
            "role grant-permission r write foo/ --prefix"
        );
        assert_eq!(
            grant(Permission::range("a", "d", PermissionType::ReadWrite)),
            "role grant-permission r readwrite a d"
        );
        assert_eq!(
            grant(Permission::range(vec![1u8, 0xFF], vec![2u8, 0], PermissionType::Read)),
            "role grant-permission r read $'\\x01\\xff' --prefix"
        );
    }

    #[test]
    fn test_names_are_quoted() {
        let cmd = Command::UserGrantRole {
            user: "o'brien".to_string(),
            role: "".to_string(),
        };
        assert_eq!(cmd.to_string(), "user grant-role 'o'\"'\"'brien' ''");
        assert_eq!(
            Command::RoleAdd {
                role: "team a".to_string()
            }
            .to_string(),
            "role add 'team a'"
        );
    }

    #[test]
    fn test_auth_toggle() {
        assert_eq!(Command::auth(true).to_string(), "auth enable");
        assert_eq!(Command::auth(false).to_string(), "auth disable");
    }
}
