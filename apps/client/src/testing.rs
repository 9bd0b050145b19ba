//! Scripted backend for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::oneshot;

use crate::gateway::transport::{ApiRequest, Method, RawResponse, Transport, TransportError};
use crate::gateway::ApiClient;
use crate::navigation::RecordingNavigator;
use crate::storage::MemoryStorage;

enum Scripted {
    Respond(RawResponse),
    Fail(TransportError),
    Gated(oneshot::Receiver<()>, RawResponse),
}

/// Answers requests from per-route FIFO queues. Unscripted routes get a 404.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<Scripted>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

fn raw(status: u16, body: serde_json::Value) -> RawResponse {
    RawResponse {
        status,
        body: Bytes::from(body.to_string()),
    }
}

impl ScriptedTransport {
    fn push(&self, method: Method, path: &str, scripted: Scripted) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(scripted);
    }

    pub fn respond(&self, method: Method, path: &str, status: u16, body: serde_json::Value) {
        self.push(method, path, Scripted::Respond(raw(status, body)));
    }

    pub fn fail(&self, method: Method, path: &str, error: TransportError) {
        self.push(method, path, Scripted::Fail(error));
    }

    /// Queues a response that is held back until the returned sender fires.
    pub fn gated(
        &self,
        method: Method,
        path: &str,
        status: u16,
        body: serde_json::Value,
    ) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.push(method, path, Scripted::Gated(rx, raw(status, body)));
        tx
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, TransportError> {
        let key = (request.method, request.path.clone());
        self.requests.lock().unwrap().push(request);

        let next = self
            .routes
            .lock()
            .unwrap()
            .get_mut(&key)
            .and_then(|queue| queue.pop_front());

        match next {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Fail(error)) => Err(error),
            Some(Scripted::Gated(gate, response)) => {
                let _ = gate.await;
                Ok(response)
            }
            None => Ok(raw(404, serde_json::json!({"detail": "Not Found"}))),
        }
    }
}

/// Scripted transport, in-memory storage and a recording navigator wired into
/// one `ApiClient`.
pub struct Harness {
    pub transport: Arc<ScriptedTransport>,
    pub storage: Arc<MemoryStorage>,
    pub navigator: Arc<RecordingNavigator>,
    pub api: ApiClient,
}

impl Harness {
    pub fn new() -> Self {
        let transport = Arc::new(ScriptedTransport::default());
        let storage = Arc::new(MemoryStorage::new());
        let navigator = Arc::new(RecordingNavigator::new());
        let api = ApiClient::new(transport.clone(), storage.clone(), navigator.clone());
        Self {
            transport,
            storage,
            navigator,
            api,
        }
    }
}

/// Backend JSON for a résumé row.
pub fn resume_json(id: i64, file_name: Option<&str>, text: Option<&str>) -> serde_json::Value {
    serde_json::json!({
        "resume_id": id,
        "user_id": 1,
        "file_name": file_name,
        "file_path": null,
        "resume_text": text,
        "created_at": "2024-05-01T10:00:00",
        "updated_at": "2024-05-02T11:30:00.250000"
    })
}

/// Backend JSON for the user returned by `/users/me` and `/register`.
pub fn user_json(id: i64, email: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "email": email,
        "first_name": "Ada",
        "last_name": "Lovelace",
        "is_active": true,
        "created_at": "2024-01-01T00:00:00",
        "updated_at": "2024-01-01T00:00:00"
    })
}
