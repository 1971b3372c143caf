//! Test doubles for the suggestion controller.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::types::{MediaKind, SourceError, Suggestion, SuggestionSource};

/// Builds `count` numbered movie suggestions titled `Title 0`, `Title 1`, ...
pub fn suggestions(count: usize) -> Vec<Suggestion> {
    (0..count)
        .map(|i| Suggestion {
            id: i as u64,
            display_title: format!("Title {i}"),
            release_year: Some(2000 + i as u16),
            media_kind: MediaKind::Movie,
            poster_ref: Some(format!("/poster-{i}.jpg")),
        })
        .collect()
}

#[derive(Debug, Clone)]
struct ScriptedReply {
    delay: Duration,
    result: Result<Vec<Suggestion>, SourceError>,
}

/// Suggestion source answering from a script and recording every call.
///
/// Unscripted queries answer with an empty list. Delays use `tokio::time`,
/// so tests with a paused clock stay deterministic.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    replies: Mutex<HashMap<String, ScriptedReply>>,
    calls: Mutex<Vec<(String, MediaKind)>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts an immediate reply for `query`.
    pub fn reply(self, query: &str, result: Result<Vec<Suggestion>, SourceError>) -> Self {
        self.reply_after(query, Duration::ZERO, result)
    }

    /// Scripts a reply for `query` that arrives after `delay`.
    pub fn reply_after(
        self,
        query: &str,
        delay: Duration,
        result: Result<Vec<Suggestion>, SourceError>,
    ) -> Self {
        self.replies
            .lock()
            .insert(query.to_string(), ScriptedReply { delay, result });
        self
    }

    /// Queries received so far, in call order.
    pub fn calls(&self) -> Vec<(String, MediaKind)> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl SuggestionSource for ScriptedSource {
    async fn suggest(&self, query: &str, kind: MediaKind) -> Result<Vec<Suggestion>, SourceError> {
        self.calls.lock().push((query.to_string(), kind));

        let reply = self.replies.lock().get(query).cloned();
        match reply {
            Some(reply) => {
                if !reply.delay.is_zero() {
                    tokio::time::sleep(reply.delay).await;
                }
                reply.result
            }
            None => Ok(Vec::new()),
        }
    }
}
