//! gRPC client for the etcd v3 Auth API.
//!
//! Speaks `etcdserverpb.Auth` through tonic with the prost messages in
//! [`proto`](super::proto). When the configuration names a user, the client
//! authenticates once at connect time and sends the returned token as
//! `token` metadata on every request, the way etcdctl does.

use super::auth::{AuthStatus, Permission, PermissionType};
use super::proto;
use crate::adapters::AuthSource;
use crate::core::config::Config;
use crate::core::error::{GrpcCode, SourceError};
use async_trait::async_trait;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::metadata::{Ascii, MetadataValue};
use tonic::transport::{Certificate, Channel, ClientTlsConfig, Endpoint, Identity};
use tonic::Status;

/// Metadata key etcd reads the auth token from.
const TOKEN_METADATA_KEY: &str = "token";

/// etcd Auth API client.
#[derive(Clone)]
pub struct EtcdAuthClient {
    channel: Channel,
    token: Option<MetadataValue<Ascii>>,
}

impl EtcdAuthClient {
    /// Connect to the configured endpoints and authenticate if a user is set.
    pub async fn connect(config: &Config) -> Result<Self, SourceError> {
        let uris = config.endpoint_uris();
        let tls = build_tls(config)?;

        let mut endpoints = uris
            .iter()
            .map(|uri| -> Result<Endpoint, SourceError> {
                let mut endpoint = Endpoint::from_shared(uri.clone())
                    .map_err(|e| SourceError::transport(format!("invalid endpoint {}: {}", uri, e)))?
                    .connect_timeout(config.dial_timeout());
                if let Some(ref tls) = tls {
                    endpoint = endpoint
                        .tls_config(tls.clone())
                        .map_err(|e| SourceError::transport(e.to_string()))?;
                }
                Ok(endpoint)
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(endpoints = ?uris, tls = tls.is_some(), "connecting to etcd");

        let channel = if endpoints.len() == 1 {
            endpoints
                .remove(0)
                .connect()
                .await
                .map_err(|e| SourceError::transport(e.to_string()))?
        } else {
            Channel::balance_list(endpoints.into_iter())
        };

        let mut client = Self {
            channel,
            token: None,
        };

        if let Some(ref user) = config.user {
            client.authenticate(user, config.password.as_deref().unwrap_or("")).await?;
            tracing::debug!(user = %user, "authenticated to etcd");
        }

        Ok(client)
    }

    async fn authenticate(&mut self, name: &str, password: &str) -> Result<(), SourceError> {
        let resp: proto::AuthenticateResponse = self
            .unary(
                proto::paths::AUTHENTICATE,
                proto::AuthenticateRequest {
                    name: name.to_string(),
                    password: password.to_string(),
                },
            )
            .await?;
        let token = MetadataValue::try_from(resp.token)
            .map_err(|_| SourceError::transport("server returned a non-ASCII auth token"))?;
        self.token = Some(token);
        Ok(())
    }

    async fn unary<Req, Resp>(&self, path: &'static str, message: Req) -> Result<Resp, SourceError>
    where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static,
    {
        let mut grpc = tonic::client::Grpc::new(self.channel.clone());
        grpc.ready()
            .await
            .map_err(|e| SourceError::transport(format!("service was not ready: {}", e)))?;

        let mut request = tonic::Request::new(message);
        if let Some(ref token) = self.token {
            request
                .metadata_mut()
                .insert(TOKEN_METADATA_KEY, token.clone());
        }

        let codec: ProstCodec<Req, Resp> = ProstCodec::default();
        let response = grpc
            .unary(request, PathAndQuery::from_static(path), codec)
            .await
            .map_err(status_to_source_error)?;
        Ok(response.into_inner())
    }
}

#[async_trait]
impl AuthSource for EtcdAuthClient {
    async fn auth_status(&self) -> Result<AuthStatus, SourceError> {
        let resp: proto::AuthStatusResponse = self
            .unary(proto::paths::AUTH_STATUS, proto::AuthStatusRequest {})
            .await?;
        Ok(AuthStatus {
            enabled: resp.enabled,
            revision: resp.auth_revision,
        })
    }

    async fn role_list(&self) -> Result<Vec<String>, SourceError> {
        let resp: proto::AuthRoleListResponse = self
            .unary(proto::paths::ROLE_LIST, proto::AuthRoleListRequest {})
            .await?;
        Ok(resp.roles)
    }

    async fn role_get(&self, role: &str) -> Result<Vec<Permission>, SourceError> {
        let resp: proto::AuthRoleGetResponse = self
            .unary(
                proto::paths::ROLE_GET,
                proto::AuthRoleGetRequest {
                    role: role.to_string(),
                },
            )
            .await?;
        resp.perm.into_iter().map(permission_from_proto).collect()
    }

    async fn user_list(&self) -> Result<Vec<String>, SourceError> {
        let resp: proto::AuthUserListResponse = self
            .unary(proto::paths::USER_LIST, proto::AuthUserListRequest {})
            .await?;
        Ok(resp.users)
    }

    async fn user_get(&self, user: &str) -> Result<Vec<String>, SourceError> {
        let resp: proto::AuthUserGetResponse = self
            .unary(
                proto::paths::USER_GET,
                proto::AuthUserGetRequest {
                    name: user.to_string(),
                },
            )
            .await?;
        Ok(resp.roles)
    }
}

/// Convert a wire permission into the model type.
pub fn permission_from_proto(perm: proto::Permission) -> Result<Permission, SourceError> {
    Ok(Permission {
        perm_type: PermissionType::from_wire(perm.perm_type)?,
        key: perm.key,
        range_end: perm.range_end,
    })
}

/// Map a gRPC status to a source error.
pub fn status_to_source_error(status: Status) -> SourceError {
    SourceError::rpc(GrpcCode::from_i32(status.code() as i32), status.message())
}

fn build_tls(config: &Config) -> Result<Option<ClientTlsConfig>, SourceError> {
    if !config.tls.is_enabled() {
        return Ok(None);
    }

    let read = |path: &str| {
        std::fs::read(path)
            .map_err(|e| SourceError::transport(format!("failed to read {}: {}", path, e)))
    };

    let mut tls = ClientTlsConfig::new();
    if let Some(ref ca) = config.tls.ca_path {
        tls = tls.ca_certificate(Certificate::from_pem(read(ca.as_str())?));
    }
    if let (Some(cert), Some(key)) = (&config.tls.cert_path, &config.tls.key_path) {
        tls = tls.identity(Identity::from_pem(read(cert.as_str())?, read(key.as_str())?));
    }
    Ok(Some(tls))
}
