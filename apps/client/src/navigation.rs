use std::sync::Mutex;

use tracing::warn;

/// Entry point users are sent to whenever the session is evicted.
pub const LOGIN_ROUTE: &str = "/login";

/// Receives forced navigations. The gateway calls this after evicting the
/// session on an authentication failure.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

/// Navigator for headless front-ends: records nothing, only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn navigate(&self, route: &str) {
        warn!("Session evicted, navigating to {route}");
    }
}

/// Keeps every requested route so a front-end can poll for pending navigations.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<String> {
        self.routes
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .last()
            .cloned()
    }

    /// Drains all recorded routes.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.routes.lock().unwrap_or_else(|p| p.into_inner()))
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        self.routes
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(route.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_navigator_drains() {
        let nav = RecordingNavigator::new();
        nav.navigate(LOGIN_ROUTE);
        nav.navigate("/dashboard");
        assert_eq!(nav.last().as_deref(), Some("/dashboard"));
        assert_eq!(nav.take(), vec!["/login".to_string(), "/dashboard".to_string()]);
        assert_eq!(nav.last(), None);
    }
}
