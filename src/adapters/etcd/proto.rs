//! etcd v3 Auth API wire types.
//!
//! Hand-written prost messages for the subset of `etcdserverpb.Auth` and
//! `authpb` a dump needs. Field tags follow `rpc.proto` and `auth.proto`.

/// Method paths on the Auth service.
pub mod paths {
    pub const AUTHENTICATE: &str = "/etcdserverpb.Auth/Authenticate";
    pub const AUTH_STATUS: &str = "/etcdserverpb.Auth/AuthStatus";
    pub const ROLE_LIST: &str = "/etcdserverpb.Auth/RoleList";
    pub const ROLE_GET: &str = "/etcdserverpb.Auth/RoleGet";
    pub const USER_LIST: &str = "/etcdserverpb.Auth/UserList";
    pub const USER_GET: &str = "/etcdserverpb.Auth/UserGet";
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ResponseHeader {
    #[prost(uint64, tag = "1")]
    pub cluster_id: u64,
    #[prost(uint64, tag = "2")]
    pub member_id: u64,
    #[prost(int64, tag = "3")]
    pub revision: i64,
    #[prost(uint64, tag = "4")]
    pub raft_term: u64,
}

/// `authpb.Permission`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Permission {
    #[prost(enumeration = "permission::Type", tag = "1")]
    pub perm_type: i32,
    #[prost(bytes = "vec", tag = "2")]
    pub key: Vec<u8>,
    #[prost(bytes = "vec", tag = "3")]
    pub range_end: Vec<u8>,
}

/// Nested enum of `authpb.Permission`.
pub mod permission {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Type {
        Read = 0,
        Write = 1,
        Readwrite = 2,
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AuthenticateRequest {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub password: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AuthenticateResponse {
    #[prost(message, optional, tag = "1")]
    pub header: Option<ResponseHeader>,
    #[prost(string, tag = "2")]
    pub token: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AuthStatusRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AuthStatusResponse {
    #[prost(message, optional, tag = "1")]
    pub header: Option<ResponseHeader>,
    #[prost(bool, tag = "2")]
    pub enabled: bool,
    #[prost(uint64, tag = "3")]
    pub auth_revision: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AuthRoleListRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AuthRoleListResponse {
    #[prost(message, optional, tag = "1")]
    pub header: Option<ResponseHeader>,
    #[prost(string, repeated, tag = "2")]
    pub roles: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AuthRoleGetRequest {
    #[prost(string, tag = "1")]
    pub role: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AuthRoleGetResponse {
    #[prost(message, optional, tag = "1")]
    pub header: Option<ResponseHeader>,
    #[prost(message, repeated, tag = "2")]
    pub perm: Vec<Permission>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AuthUserListRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AuthUserListResponse {
    #[prost(message, optional, tag = "1")]
    pub header: Option<ResponseHeader>,
    #[prost(string, repeated, tag = "2")]
    pub users: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AuthUserGetRequest {
    #[prost(string, tag = "1")]
    pub name: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AuthUserGetResponse {
    #[prost(message, optional, tag = "1")]
    pub header: Option<ResponseHeader>,
    #[prost(string, repeated, tag = "2")]
    pub roles: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_role_get_response_decodes_permissions() {
        let resp = AuthRoleGetResponse {
            header: Some(ResponseHeader {
                cluster_id: 1,
                member_id: 2,
                revision: 100,
                raft_term: 5,
            }),
            perm: vec![
                Permission {
                    perm_type: permission::Type::Readwrite as i32,
                    key: b"foo/".to_vec(),
                    range_end: b"foo0".to_vec(),
                },
                Permission {
                    perm_type: permission::Type::Read as i32,
                    key: vec![0],
                    range_end: vec![0],
                },
            ],
        };

        let encoded = resp.encode_to_vec();
        let decoded = AuthRoleGetResponse::decode(&encoded[..]).unwrap();

        assert_eq!(decoded.perm.len(), 2);
        assert_eq!(decoded.perm[0].perm_type, 2);
        assert_eq!(decoded.perm[0].range_end, b"foo0");
        assert_eq!(decoded.perm[1].key, vec![0]);
    }

    #[test]
    fn test_auth_status_wire_tags() {
        // enabled=true (tag 2, varint), auth_revision=7 (tag 3, varint)
        let wire = [0x10, 0x01, 0x18, 0x07];
        let decoded = AuthStatusResponse::decode(&wire[..]).unwrap();
        assert!(decoded.enabled);
        assert_eq!(decoded.auth_revision, 7);
        assert!(decoded.header.is_none());
    }
}
