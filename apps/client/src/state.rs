use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::api::resumes;
use crate::config::Config;
use crate::errors::ClientError;
use crate::gateway::transport::{ReqwestTransport, Transport};
use crate::gateway::ApiClient;
use crate::models::resume::ActiveResume;
use crate::navigation::Navigator;
use crate::resume_cache::{ActiveResumeCache, Selection};
use crate::session::SessionStore;
use crate::storage::{DurableStorage, FileStorage, StorageError};

/// Application-level client state: one gateway, one session store and one
/// active-résumé cache sharing the same storage and navigator.
/// Constructed explicitly and passed to whatever front-end drives it.
pub struct ClientState {
    pub api: ApiClient,
    pub session: SessionStore,
    pub resumes: ActiveResumeCache,
}

/// What `bootstrap` found.
#[derive(Debug, Clone, Serialize)]
pub struct BootstrapReport {
    pub authenticated: bool,
    pub resume: Option<ActiveResume>,
}

impl ClientState {
    pub fn new(
        transport: Arc<dyn Transport>,
        storage: Arc<dyn DurableStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let api = ApiClient::new(transport, storage, navigator);
        Self {
            session: SessionStore::new(api.clone()),
            resumes: ActiveResumeCache::new(api.clone()),
            api,
        }
    }

    /// Wires the production transport and the file-backed state store.
    pub fn from_config(config: &Config, navigator: Arc<dyn Navigator>) -> Result<Self, ClientError> {
        let transport = ReqwestTransport::new(&config.api_base_url, config.request_timeout)?;
        let storage = FileStorage::open(&config.state_file)?;
        info!(
            "Client state wired to {} (state file {})",
            config.api_base_url,
            config.state_file.display()
        );
        Ok(Self::new(Arc::new(transport), Arc::new(storage), navigator))
    }

    /// Session first; the résumé cache is only resolved for an authenticated
    /// session. Never fails.
    pub async fn bootstrap(&self) -> BootstrapReport {
        let authenticated = self.session.bootstrap();
        let resume = if authenticated {
            self.resumes.bootstrap().await
        } else {
            None
        };
        BootstrapReport {
            authenticated,
            resume,
        }
    }

    /// Clears everything the client persisted: token, user record and the
    /// active-résumé pointer, plus the matching in-memory state.
    pub fn reset_client_state(&self) -> Result<(), StorageError> {
        self.session.logout()?;
        self.resumes.clear()?;
        info!("Client state reset");
        Ok(())
    }

    pub fn logout(&self) -> Result<(), StorageError> {
        self.reset_client_state()
    }

    /// Uploads a PDF for extraction and makes the resulting résumé active.
    pub async fn upload_resume(&self, file_name: &str, data: Bytes) -> Result<Selection, ClientError> {
        let uploaded = resumes::upload_pdf(&self.api, file_name, data).await?;
        match uploaded.data {
            Some(resume) if uploaded.success => {
                info!("Uploaded {file_name} as resume {}", resume.resume_id);
                self.resumes.select_resume(Some(resume.resume_id)).await
            }
            _ => Err(ClientError::Rejected(
                uploaded
                    .message
                    .unwrap_or_else(|| format!("upload of {file_name} was not accepted")),
            )),
        }
    }
}
