//! Client-side session and active-résumé synchronization for the JobFit
//! career-coaching backend.
//!
//! `ClientState` is the entry point: it owns the API gateway, the session
//! store and the active-résumé cache, all sharing one durable storage.

pub mod api;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod models;
pub mod navigation;
pub mod resume_cache;
pub mod session;
pub mod state;
pub mod storage;

#[cfg(test)]
mod testing;

pub use errors::{ClientError, ErrorKind};
pub use gateway::ApiClient;
pub use resume_cache::{ActiveResumeCache, Selection};
pub use session::SessionStore;
pub use state::{BootstrapReport, ClientState};
