use analytics::ForecastRecord;
use axum::http::HeaderMap;
use std::collections::{HashMap, VecDeque};
use tokio::sync::RwLock;

/// Request header naming the caller's session.
pub const SESSION_HEADER: &str = "x-session-id";
/// Session used when a request carries no usable session header.
pub const ANONYMOUS_SESSION: &str = "anonymous";

/// Reads the session id from `x-session-id`, falling back to `anonymous`.
pub fn session_id(headers: &HeaderMap) -> String {
    headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(ANONYMOUS_SESSION)
        .to_string()
}

#[derive(Debug, Default)]
struct Sessions {
    runs: HashMap<String, Vec<ForecastRecord>>,
    // Insertion order of sessions, oldest first.
    order: VecDeque<String>,
}

/// The last forecast run of each session.
///
/// Runs never leak across sessions. At most `capacity` sessions are kept; storing
/// a run for a new session beyond that evicts the oldest one.
#[derive(Debug)]
pub struct ForecastCache {
    capacity: usize,
    sessions: RwLock<Sessions>,
}

impl ForecastCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            sessions: RwLock::new(Sessions::default()),
        }
    }

    /// Replaces the session's last run.
    pub async fn store(&self, session: &str, records: Vec<ForecastRecord>) {
        let mut sessions = self.sessions.write().await;

        if !sessions.runs.contains_key(session) {
            while sessions.order.len() >= self.capacity {
                let Some(oldest) = sessions.order.pop_front() else {
                    break;
                };
                sessions.runs.remove(&oldest);
                tracing::debug!(session = %oldest, "Evicted forecast session.");
            }
            sessions.order.push_back(session.to_string());
        }
        sessions.runs.insert(session.to_string(), records);
    }

    /// The session's last run, or an empty list if it never ran a forecast.
    pub async fn last_run(&self, session: &str) -> Vec<ForecastRecord> {
        self.sessions
            .read()
            .await
            .runs
            .get(session)
            .cloned()
            .unwrap_or_default()
    }
}
