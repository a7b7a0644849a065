//! etcd auth model as seen by a dump.
//!
//! These are read-only snapshots of what the etcd Auth API reports. They are
//! never sent back to the server; the dump engine only projects them into
//! command text.

use crate::core::error::SourceError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Permission type for key operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermissionType {
    /// Read permission (Range, Watch).
    Read,
    /// Write permission (Put, Delete).
    Write,
    /// Read and write permission.
    ReadWrite,
}

impl PermissionType {
    /// All permission types, in wire order.
    pub const ALL: [PermissionType; 3] = [Self::Read, Self::Write, Self::ReadWrite];

    /// Decode the `authpb.Permission.Type` wire value.
    pub fn from_wire(value: i32) -> Result<Self, SourceError> {
        match value {
            0 => Ok(Self::Read),
            1 => Ok(Self::Write),
            2 => Ok(Self::ReadWrite),
            other => Err(SourceError::UnknownPermissionType { perm_type: other }),
        }
    }

    /// The `authpb.Permission.Type` wire value.
    pub fn to_wire(self) -> i32 {
        match self {
            Self::Read => 0,
            Self::Write => 1,
            Self::ReadWrite => 2,
        }
    }

    /// Lowercase name as etcdctl spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::ReadWrite => "readwrite",
        }
    }
}

impl fmt::Display for PermissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key permission entry, exactly as stored by the server.
///
/// `key == range_end` denotes a single key; otherwise the permission covers
/// the half-open range `[key, range_end)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    /// Permission type.
    pub perm_type: PermissionType,
    /// Start key.
    pub key: Vec<u8>,
    /// Exclusive range end.
    pub range_end: Vec<u8>,
}

impl Permission {
    /// Create a permission on a single key.
    pub fn exact(key: impl Into<Vec<u8>>, perm_type: PermissionType) -> Self {
        let key = key.into();
        Self {
            perm_type,
            range_end: key.clone(),
            key,
        }
    }

    /// Create a permission on an explicit range.
    pub fn range(
        key: impl Into<Vec<u8>>,
        range_end: impl Into<Vec<u8>>,
        perm_type: PermissionType,
    ) -> Self {
        Self {
            perm_type,
            key: key.into(),
            range_end: range_end.into(),
        }
    }

    /// Create a permission on the whole keyspace, as the server stores it.
    pub fn whole_keyspace(perm_type: PermissionType) -> Self {
        Self::range([0u8], [0u8], perm_type)
    }
}

/// Role definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    /// Role name.
    pub name: String,
    /// Key permissions in server order.
    pub permissions: Vec<Permission>,
}

impl Role {
    /// Create a new role.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            permissions: Vec::new(),
        }
    }

    /// Add a permission to the role.
    pub fn with_permission(mut self, perm: Permission) -> Self {
        self.permissions.push(perm);
        self
    }
}

/// User entry. Passwords are not part of the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Username.
    pub name: String,
    /// Assigned roles in server order.
    pub roles: Vec<String>,
}

impl User {
    /// Create a new user entry.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            roles: Vec::new(),
        }
    }

    /// Add a role to the user.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }
}

/// Result of an AuthStatus call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthStatus {
    /// Whether authentication is enabled.
    pub enabled: bool,
    /// Auth revision; bumped on every auth mutation.
    pub revision: u64,
}
