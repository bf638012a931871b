//! Server-pushed subscription events.

use serde::{Deserialize, Serialize};

/// Events delivered over the subscription socket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A library scan or clean finished. Arbitrarily many rows may have
    /// changed, so the whole cache is stale.
    ScanComplete,
    /// Background job progress.
    JobUpdate {
        job_id: String,
        status: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        progress: Option<f64>,
    },
    /// A server log line.
    Log { level: String, message: String },
}

impl ServerEvent {
    /// Whether this event invalidates the entire cache.
    pub fn resets_cache(&self) -> bool {
        matches!(self, Self::ScanComplete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_complete_resets() {
        let event: ServerEvent = serde_json::from_str(r#"{"event":"scan_complete"}"#).unwrap();
        assert!(event.resets_cache());

        let job = ServerEvent::JobUpdate {
            job_id: "4".to_string(),
            status: "RUNNING".to_string(),
            progress: Some(0.5),
        };
        assert!(!job.resets_cache());
    }
}
