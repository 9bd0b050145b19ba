//! Active-résumé cache.
//!
//! Holds at most one `ActiveResume` in memory and persists only its identifier,
//! so the selection survives a restart and can be re-derived from the backend.
//!
//! State machine:
//!   EMPTY  --select(id) ok-->   LOADED
//!   EMPTY  --select(id) err-->  EMPTY   (error returned to caller)
//!   LOADED --select(id') ok-->  LOADED  (replaced wholesale, version + 1)
//!   LOADED --select(None)-->    EMPTY
//!
//! Every state change takes a sequence number at issuance. A fetch that
//! resolves after a later-issued change has already been applied is discarded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::api::resumes;
use crate::errors::ClientError;
use crate::gateway::ApiClient;
use crate::models::resume::{ActiveResume, ResumeId};
use crate::storage::{DurableStorage, StorageError, CURRENT_RESUME_KEY};

/// Outcome of `select_resume`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Selection {
    Loaded(ActiveResume),
    Cleared,
    /// A later selection was applied first; this result was dropped.
    Superseded { id: ResumeId },
}

impl Selection {
    pub fn into_loaded(self) -> Option<ActiveResume> {
        match self {
            Selection::Loaded(resume) => Some(resume),
            Selection::Cleared | Selection::Superseded { .. } => None,
        }
    }
}

#[derive(Debug, Default)]
struct Slot {
    current: Option<ActiveResume>,
    applied_seq: u64,
}

pub struct ActiveResumeCache {
    api: ApiClient,
    storage: Arc<dyn DurableStorage>,
    issued: AtomicU64,
    slot: Mutex<Slot>,
}

impl ActiveResumeCache {
    pub fn new(api: ApiClient) -> Self {
        let storage = api.storage().clone();
        Self {
            api,
            storage,
            issued: AtomicU64::new(0),
            slot: Mutex::new(Slot::default()),
        }
    }

    fn lock_slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn next_seq(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current(&self) -> Option<ActiveResume> {
        self.lock_slot().current.clone()
    }

    /// Selects `id` as the active résumé, or clears the selection for `None`.
    ///
    /// On fetch failure the in-memory state is left untouched and the error is
    /// returned. The identifier is persisted only when the result is applied.
    pub async fn select_resume(&self, id: Option<ResumeId>) -> Result<Selection, ClientError> {
        let seq = self.next_seq();
        let Some(id) = id else {
            self.clear_at(seq)?;
            return Ok(Selection::Cleared);
        };

        let record = resumes::get_resume(&self.api, id).await?;

        let mut slot = self.lock_slot();
        if seq < slot.applied_seq {
            debug!(
                "Discarding resume {id} (seq {seq}); seq {} already applied",
                slot.applied_seq
            );
            return Ok(Selection::Superseded { id });
        }

        let version = slot.current.as_ref().map_or(1, |prev| prev.version + 1);
        let resume = ActiveResume::from_record(record, version);
        self.storage.set(CURRENT_RESUME_KEY, &id.to_string())?;
        slot.current = Some(resume.clone());
        slot.applied_seq = seq;

        info!(
            "Active resume {} '{}' (v{})",
            resume.id, resume.display_name, resume.version
        );
        Ok(Selection::Loaded(resume))
    }

    /// Empties the cache and removes the persisted pointer. Idempotent.
    pub fn clear(&self) -> Result<(), StorageError> {
        let seq = self.next_seq();
        self.clear_at(seq)
    }

    fn clear_at(&self, seq: u64) -> Result<(), StorageError> {
        let mut slot = self.lock_slot();
        slot.current = None;
        slot.applied_seq = seq;
        self.storage.remove(CURRENT_RESUME_KEY)?;
        debug!("Active resume cleared (seq {seq})");
        Ok(())
    }

    /// Initial resolution of the active résumé. Never fails.
    ///
    /// Order: persisted pointer, then the most recently listed résumé, then
    /// empty. A pointer that cannot be parsed or fetched is removed.
    pub async fn bootstrap(&self) -> Option<ActiveResume> {
        if let Some(raw) = self.storage.get(CURRENT_RESUME_KEY) {
            match raw.trim().parse::<ResumeId>() {
                Ok(id) => match self.select_resume(Some(id)).await {
                    Ok(Selection::Loaded(resume)) => return Some(resume),
                    Ok(_) => return self.current(),
                    Err(e) => warn!("Stored resume {id} could not be loaded, falling back to latest: {e}"),
                },
                Err(_) => warn!("Ignoring unparsable stored resume id '{raw}'"),
            }
            if let Err(e) = self.storage.remove(CURRENT_RESUME_KEY) {
                warn!("Failed to remove stale resume pointer: {e}");
            }
        }

        let list = match resumes::list_resumes(&self.api).await {
            Ok(list) => list,
            Err(e) => {
                debug!("No resumes available during bootstrap: {e}");
                return None;
            }
        };
        let latest = list.last()?;

        match self.select_resume(Some(latest.resume_id)).await {
            Ok(selection) => selection.into_loaded().or_else(|| self.current()),
            Err(e) => {
                warn!("Latest resume {} could not be loaded: {e}", latest.resume_id);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::errors::ErrorKind;
    use crate::gateway::transport::{Method, TransportError};
    use crate::testing::{resume_json, Harness};

    fn cache(h: &Harness) -> ActiveResumeCache {
        ActiveResumeCache::new(h.api.clone())
    }

    async fn wait_for_requests(h: &Harness, n: usize) {
        while h.transport.request_count() < n {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_select_and_reload_bumps_version() {
        let h = Harness::new();
        for _ in 0..2 {
            h.transport.respond(
                Method::Get,
                "/resumes/42",
                200,
                resume_json(42, Some("cv.txt"), Some("Hello")),
            );
        }
        let cache = cache(&h);

        let first = cache.select_resume(Some(42)).await.unwrap().into_loaded().unwrap();
        assert_eq!(first.id, 42);
        assert_eq!(first.display_name, "cv.txt");
        assert_eq!(first.content, "Hello");
        assert_eq!(first.version, 1);
        assert_eq!(h.storage.get(CURRENT_RESUME_KEY).as_deref(), Some("42"));

        let second = cache.select_resume(Some(42)).await.unwrap().into_loaded().unwrap();
        assert_eq!(second.version, 2);
        assert_eq!(
            (second.id, &second.display_name, &second.content),
            (42, &first.display_name, &first.content)
        );
    }

    #[tokio::test]
    async fn test_failed_select_leaves_previous_state() {
        let h = Harness::new();
        h.transport
            .respond(Method::Get, "/resumes/3", 200, resume_json(3, Some("a.pdf"), Some("A")));
        h.transport
            .fail(Method::Get, "/resumes/7", TransportError::Timeout);
        let cache = cache(&h);

        cache.select_resume(Some(3)).await.unwrap();
        let err = cache.select_resume(Some(7)).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Network);
        assert_eq!(cache.current().unwrap().id, 3);
        assert_eq!(h.storage.get(CURRENT_RESUME_KEY).as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let h = Harness::new();
        h.transport
            .respond(Method::Get, "/resumes/3", 200, resume_json(3, None, None));
        let cache = cache(&h);
        cache.select_resume(Some(3)).await.unwrap();

        assert_eq!(cache.select_resume(None).await.unwrap(), Selection::Cleared);
        assert_eq!(cache.current(), None);
        assert_eq!(h.storage.get(CURRENT_RESUME_KEY), None);

        assert_eq!(cache.select_resume(None).await.unwrap(), Selection::Cleared);
        assert_eq!(cache.current(), None);
        assert_eq!(h.storage.get(CURRENT_RESUME_KEY), None);
        assert_eq!(h.transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_version_restarts_after_clear() {
        let h = Harness::new();
        h.transport
            .respond(Method::Get, "/resumes/3", 200, resume_json(3, None, None));
        h.transport
            .respond(Method::Get, "/resumes/4", 200, resume_json(4, None, None));
        let cache = cache(&h);

        cache.select_resume(Some(3)).await.unwrap();
        cache.clear().unwrap();
        let resume = cache.select_resume(Some(4)).await.unwrap().into_loaded().unwrap();
        assert_eq!(resume.version, 1);
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let h = Harness::new();
        let release_first =
            h.transport
                .gated(Method::Get, "/resumes/1", 200, resume_json(1, Some("old.pdf"), None));
        let release_second =
            h.transport
                .gated(Method::Get, "/resumes/2", 200, resume_json(2, Some("new.pdf"), None));
        let cache = Arc::new(cache(&h));

        let first = tokio::spawn({
            let cache = cache.clone();
            async move { cache.select_resume(Some(1)).await }
        });
        wait_for_requests(&h, 1).await;
        let second = tokio::spawn({
            let cache = cache.clone();
            async move { cache.select_resume(Some(2)).await }
        });
        wait_for_requests(&h, 2).await;

        release_second.send(()).unwrap();
        let applied = second.await.unwrap().unwrap();
        assert_eq!(applied.into_loaded().unwrap().id, 2);

        release_first.send(()).unwrap();
        let dropped = first.await.unwrap().unwrap();
        assert_eq!(dropped, Selection::Superseded { id: 1 });

        let current = cache.current().unwrap();
        assert_eq!(current.id, 2);
        assert_eq!(current.version, 1);
        assert_eq!(h.storage.get(CURRENT_RESUME_KEY).as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_in_order_resolution_applies_both() {
        let h = Harness::new();
        let release_first =
            h.transport
                .gated(Method::Get, "/resumes/1", 200, resume_json(1, None, None));
        let release_second =
            h.transport
                .gated(Method::Get, "/resumes/2", 200, resume_json(2, None, None));
        let cache = Arc::new(cache(&h));

        let first = tokio::spawn({
            let cache = cache.clone();
            async move { cache.select_resume(Some(1)).await }
        });
        wait_for_requests(&h, 1).await;
        let second = tokio::spawn({
            let cache = cache.clone();
            async move { cache.select_resume(Some(2)).await }
        });
        wait_for_requests(&h, 2).await;

        release_first.send(()).unwrap();
        assert!(matches!(first.await.unwrap().unwrap(), Selection::Loaded(_)));
        release_second.send(()).unwrap();
        assert!(matches!(second.await.unwrap().unwrap(), Selection::Loaded(_)));

        let current = cache.current().unwrap();
        assert_eq!((current.id, current.version), (2, 2));
    }

    #[tokio::test]
    async fn test_clear_beats_in_flight_fetch() {
        let h = Harness::new();
        let release =
            h.transport
                .gated(Method::Get, "/resumes/5", 200, resume_json(5, None, None));
        let cache = Arc::new(cache(&h));

        let pending = tokio::spawn({
            let cache = cache.clone();
            async move { cache.select_resume(Some(5)).await }
        });
        wait_for_requests(&h, 1).await;
        cache.clear().unwrap();

        release.send(()).unwrap();
        assert_eq!(
            pending.await.unwrap().unwrap(),
            Selection::Superseded { id: 5 }
        );
        assert_eq!(cache.current(), None);
        assert_eq!(h.storage.get(CURRENT_RESUME_KEY), None);
    }

    #[tokio::test]
    async fn test_bootstrap_uses_persisted_pointer() {
        let h = Harness::new();
        h.storage.set(CURRENT_RESUME_KEY, "42").unwrap();
        h.transport.respond(
            Method::Get,
            "/resumes/42",
            200,
            resume_json(42, Some("cv.txt"), Some("Hello")),
        );
        let cache = cache(&h);

        let resume = cache.bootstrap().await.unwrap();
        assert_eq!((resume.id, resume.version), (42, 1));
        assert_eq!(h.transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_bootstrap_falls_back_to_latest() {
        let h = Harness::new();
        h.transport.respond(
            Method::Get,
            "/resumes",
            200,
            json!([resume_json(10, Some("old.pdf"), None), resume_json(11, Some("new.pdf"), None)]),
        );
        h.transport
            .respond(Method::Get, "/resumes/11", 200, resume_json(11, Some("new.pdf"), None));
        let cache = cache(&h);

        let resume = cache.bootstrap().await.unwrap();
        assert_eq!(resume.id, 11);
        assert_eq!(h.storage.get(CURRENT_RESUME_KEY).as_deref(), Some("11"));
    }

    #[tokio::test]
    async fn test_bootstrap_replaces_stale_pointer() {
        let h = Harness::new();
        h.storage.set(CURRENT_RESUME_KEY, "99").unwrap();
        h.transport.respond(
            Method::Get,
            "/resumes/99",
            404,
            json!({"detail": "Resume not found"}),
        );
        h.transport
            .respond(Method::Get, "/resumes", 200, json!([resume_json(5, None, None)]));
        h.transport
            .respond(Method::Get, "/resumes/5", 200, resume_json(5, None, None));
        let cache = cache(&h);

        let resume = cache.bootstrap().await.unwrap();
        assert_eq!(resume.id, 5);
        assert_eq!(h.storage.get(CURRENT_RESUME_KEY).as_deref(), Some("5"));
    }

    #[tokio::test]
    async fn test_bootstrap_with_no_resumes_stays_empty() {
        let h = Harness::new();
        h.storage.set(CURRENT_RESUME_KEY, "not-a-number").unwrap();
        h.transport
            .respond(Method::Get, "/resumes", 200, json!([]));
        let cache = cache(&h);

        assert_eq!(cache.bootstrap().await, None);
        assert_eq!(cache.current(), None);
        assert_eq!(h.storage.get(CURRENT_RESUME_KEY), None);
    }

    #[tokio::test]
    async fn test_bootstrap_swallows_list_failure() {
        let h = Harness::new();
        h.transport
            .respond(Method::Get, "/resumes", 500, json!({"detail": "db down"}));
        let cache = cache(&h);
        assert_eq!(cache.bootstrap().await, None);
    }
}
