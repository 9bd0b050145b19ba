//! Session store: the single source of truth for who is signed in.
//!
//! The token itself is never held here. It lives in durable storage, where only
//! the gateway reads it. This store owns the user record and the
//! authenticated/unauthenticated decision.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use crate::api::auth;
use crate::errors::ClientError;
use crate::gateway::{ApiClient, Evictions};
use crate::models::user::{RegisterRequest, User};
use crate::storage::{DurableStorage, StorageError, TOKEN_KEY, USER_KEY};

#[derive(Debug)]
struct SessionState {
    user: Option<User>,
    /// Gateway eviction count observed when `user` was set.
    epoch: u64,
    loading: bool,
}

pub struct SessionStore {
    api: ApiClient,
    storage: Arc<dyn DurableStorage>,
    evictions: Arc<Evictions>,
    state: RwLock<SessionState>,
}

impl SessionStore {
    pub fn new(api: ApiClient) -> Self {
        let storage = api.storage().clone();
        let evictions = api.evictions().clone();
        Self {
            api,
            storage,
            evictions,
            state: RwLock::new(SessionState {
                user: None,
                epoch: 0,
                loading: true,
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(|p| p.into_inner())
    }

    /// Rehydrates a previously persisted session without contacting the server.
    ///
    /// Both the token and a parsable user record must be present. `loading`
    /// is cleared whether or not a session was found. Returns whether the
    /// session is now authenticated.
    pub fn bootstrap(&self) -> bool {
        let token = self.storage.get(TOKEN_KEY).filter(|t| !t.is_empty());
        let stored_user = self.storage.get(USER_KEY).and_then(|raw| {
            serde_json::from_str::<User>(&raw)
                .map_err(|e| warn!("Ignoring unreadable stored user record: {e}"))
                .ok()
        });

        let mut state = self.write();
        if let (Some(_), Some(user)) = (token, stored_user) {
            info!("Rehydrated session for {}", user.email);
            state.user = Some(user);
            state.epoch = self.evictions.current();
        } else {
            debug!("No persisted session found");
        }
        state.loading = false;
        state.user.is_some()
    }

    /// True only until `bootstrap` has run.
    pub fn loading(&self) -> bool {
        self.read().loading
    }

    /// The signed-in user, if any. A gateway eviction since the user was set
    /// hides the record.
    pub fn user(&self) -> Option<User> {
        let state = self.read();
        if state.epoch != self.evictions.current() {
            return None;
        }
        state.user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    /// Exchanges credentials for a token, then loads the full user record.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ClientError> {
        let token = auth::login(&self.api, email, password).await?;
        self.storage.set(TOKEN_KEY, &token.access_token)?;
        debug!("Token stored, fetching user record");

        let user = auth::current_user(&self.api).await?;
        self.remember(user.clone())?;
        info!("Signed in as {}", user.email);
        Ok(user)
    }

    /// Creates an account and treats the returned identity as signed in.
    /// No token round-trip is made.
    pub async fn register(&self, profile: &RegisterRequest) -> Result<User, ClientError> {
        let user = auth::register(&self.api, profile).await?;
        self.remember(user.clone())?;
        info!("Registered and signed in as {}", user.email);
        Ok(user)
    }

    /// Local-only invalidation: forgets the user and removes the persisted
    /// token and user record. The server is not contacted.
    pub fn logout(&self) -> Result<(), StorageError> {
        self.write().user = None;
        self.storage.remove(TOKEN_KEY)?;
        self.storage.remove(USER_KEY)?;
        info!("Signed out");
        Ok(())
    }

    /// Confirms the persisted token with the server and refreshes the stored
    /// user record. On an authentication failure the gateway has already
    /// evicted the persisted session; the in-memory user is dropped as well.
    pub async fn revalidate(&self) -> Result<User, ClientError> {
        match auth::current_user(&self.api).await {
            Ok(user) => {
                self.remember(user.clone())?;
                Ok(user)
            }
            Err(e) => {
                if e.is_authentication() {
                    self.write().user = None;
                }
                Err(e)
            }
        }
    }

    fn remember(&self, user: User) -> Result<(), ClientError> {
        let serialized = serde_json::to_string(&user)?;
        self.storage.set(USER_KEY, &serialized)?;
        let mut state = self.write();
        state.user = Some(user);
        state.epoch = self.evictions.current();
        Ok(())
    }
}
