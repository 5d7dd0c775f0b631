use std::time::Duration;

use tonic::transport::Channel;

use cns_proto::etcdserverpb::AuthenticateRequest;
use cns_proto::etcdserverpb::auth_client::AuthClient;

use crate::EtcdStore;
use crate::StoreError;
use crate::StoreResult;
use crate::etcd::AuthToken;

/// Configurable builder for [`EtcdStore`] instances.
///
/// # Typical Usage Flow
/// 1. Create with `EtcdStore::builder(host, port)`
/// 2. Chain credential/timeout methods
/// 3. Finalise with async `.connect()`
pub struct EtcdStoreBuilder {
    host: String,
    port: u16,
    username: String,
    password: String,
    connect_timeout: Duration,
}

impl EtcdStoreBuilder {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            username: String::new(),
            password: String::new(),
            connect_timeout: Duration::from_secs(3),
        }
    }

    /// Store auth username; authentication is skipped when empty.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Set connection timeout (default: 3s).
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Establishes the channel and, when a username is configured, exchanges
    /// the credentials for an auth token attached to every subsequent
    /// request.
    ///
    /// # Errors
    /// - [`StoreError::NotConfigured`] if the host is empty or the port is 0
    /// - [`StoreError::NotConnected`] on transport or authentication failure
    pub async fn connect(self) -> StoreResult<EtcdStore> {
        if self.host.is_empty() {
            return Err(StoreError::NotConfigured("host".into()));
        }
        if self.port == 0 {
            return Err(StoreError::NotConfigured("port".into()));
        }

        let endpoint = format!("http://{}:{}", self.host, self.port);
        let channel = Channel::from_shared(endpoint.clone())
            .map_err(|e| StoreError::NotConnected(format!("{endpoint}: {e}")))?
            .connect_timeout(self.connect_timeout)
            .connect()
            .await
            .map_err(|e| StoreError::NotConnected(format!("{endpoint}: {e}")))?;

        let mut token = AuthToken::default();
        if !self.username.is_empty() {
            let request = AuthenticateRequest {
                name: self.username,
                password: self.password,
            };
            let response = AuthClient::new(channel.clone())
                .authenticate(request)
                .await
                .map_err(|s| StoreError::NotConnected(s.message().to_string()))?;
            token.set(&response.into_inner().token)?;
        }

        Ok(EtcdStore::new(channel, token, endpoint))
    }
}
