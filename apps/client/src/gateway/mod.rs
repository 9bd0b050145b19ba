//! API gateway: the single HTTP boundary between the client and the backend.
//!
//! ARCHITECTURAL RULE: no other module talks to a `Transport` directly.
//! Every backend exchange goes through `ApiClient::send`, which applies two
//! policies uniformly:
//!   - outgoing: a persisted bearer token is attached to every request
//!   - incoming: a 401 from any endpoint evicts the session and forces
//!     navigation to the login route
//!
//! No retries, no backoff, no coalescing. Each call is sent exactly once.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::errors::ClientError;
use crate::navigation::{Navigator, LOGIN_ROUTE};
use crate::storage::{DurableStorage, TOKEN_KEY, USER_KEY};

pub mod transport;

use transport::{ApiRequest, Transport};

/// Counts session evictions performed by the gateway.
/// Holders of in-memory session state compare against it to detect that the
/// persisted session was torn down underneath them.
#[derive(Debug, Default)]
pub struct Evictions(AtomicU64);

impl Evictions {
    pub fn current(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    fn record(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    storage: Arc<dyn DurableStorage>,
    navigator: Arc<dyn Navigator>,
    evictions: Arc<Evictions>,
}

impl ApiClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        storage: Arc<dyn DurableStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            transport,
            storage,
            navigator,
            evictions: Arc::new(Evictions::default()),
        }
    }

    pub fn storage(&self) -> &Arc<dyn DurableStorage> {
        &self.storage
    }

    pub fn evictions(&self) -> &Arc<Evictions> {
        &self.evictions
    }

    /// Sends a request and returns the raw body of a 2xx response.
    pub async fn send(&self, mut request: ApiRequest) -> Result<Bytes, ClientError> {
        if let Some(token) = self.storage.get(TOKEN_KEY).filter(|t| !t.is_empty()) {
            request
                .headers
                .push(("Authorization".to_string(), format!("Bearer {token}")));
        }

        let method = request.method;
        let path = request.path.clone();
        debug!("{} {}", method.as_str(), path);

        let response = match self.transport.execute(request).await {
            Ok(r) => r,
            Err(e) => {
                warn!("{} {} failed: {}", method.as_str(), path, e);
                return Err(ClientError::Network(e));
            }
        };

        if response.status == 401 {
            self.evict_session();
            return Err(ClientError::from_status(response.status, &response.body));
        }

        if !response.is_success() {
            let err = ClientError::from_status(response.status, &response.body);
            warn!("{} {} returned {}: {}", method.as_str(), path, response.status, err);
            return Err(err);
        }

        debug!("{} {} -> {}", method.as_str(), path, response.status);
        Ok(response.body)
    }

    /// Sends a request and deserializes the JSON payload.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ClientError> {
        let body = self.send(request).await?;
        serde_json::from_slice(&body).map_err(ClientError::Decode)
    }

    /// Removes the persisted token and user record, bumps the eviction counter
    /// and navigates to the login route. Storage failures are logged, never
    /// allowed to stop the navigation.
    fn evict_session(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                warn!("Failed to remove '{key}' during session eviction: {e}");
            }
        }
        let epoch = self.evictions.record();
        warn!("Authentication failure from backend, session evicted (eviction #{epoch})");
        self.navigator.navigate(LOGIN_ROUTE);
    }
}
