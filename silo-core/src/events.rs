//! EventSink: the one optional capability `Service` pushes lifecycle
//! notifications through. Deliberately minimal — no `before`/`after`/
//! `around` hook pipelines, listener registration, pattern matching, or
//! `once()` semantics. The content service has no need for hook
//! interception; it only needs a sink to push fire-and-forget
//! notifications to, with failures swallowed by the caller. So only the
//! wire format survives: a typed event enum plus a trait object sink.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// A lifecycle notification emitted by `Service`. Carries just enough to let
/// a sink log, publish to a bus, or fan out to webhooks; the service never
/// inspects what a sink does with this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentEvent {
    pub kind: ContentEventKind,
    pub content_id: String,
    pub object_id: Option<String>,
    pub tenant_id: String,
    pub occurred_at: DateTime<Utc>,
    pub detail: serde_json::Value,
}

impl ContentEvent {
    pub fn new(
        kind: ContentEventKind,
        content_id: impl Into<String>,
        tenant_id: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            content_id: content_id.into(),
            object_id: None,
            tenant_id: tenant_id.into(),
            occurred_at: Utc::now(),
            detail: serde_json::Value::Null,
        }
    }

    pub fn with_object_id(mut self, object_id: impl Into<String>) -> Self {
        self.object_id = Some(object_id.into());
        self
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.detail = detail;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentEventKind {
    ContentCreated,
    ContentStatusChanged,
    ContentDeleted,
    ObjectCreated,
    ObjectUploaded,
    DerivedContentCreated,
}

/// Sink that `Service` emits `ContentEvent`s to. Implementations must be
/// thread-safe: the sink is shared across every request `Service` handles.
/// Emission is best-effort: `Service` logs and discards any error a sink
/// returns rather than failing the operation that triggered the event.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: ContentEvent) -> anyhow::Result<()>;
}

/// Default sink: logs at debug level and otherwise does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventSink;

#[async_trait]
impl EventSink for NoopEventSink {
    async fn emit(&self, event: ContentEvent) -> anyhow::Result<()> {
        tracing::debug!(kind = ?event.kind, content_id = %event.content_id, "event emitted");
        Ok(())
    }
}

/// In-memory sink that records every event it receives, for tests that want
/// to assert on emission without standing up a real bus.
#[derive(Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<ContentEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ContentEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventSink for RecordingEventSink {
    async fn emit(&self, event: ContentEvent) -> anyhow::Result<()> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

/// Emit through a sink, swallowing (and logging) any error it returns.
pub async fn emit_best_effort(sink: &dyn EventSink, event: ContentEvent) {
    let kind = event.kind;
    if let Err(err) = sink.emit(event).await {
        tracing::warn!(?kind, error = %err, "event sink failed; continuing");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn recording_sink_collects_events() {
        let sink = RecordingEventSink::new();
        emit_best_effort(
            &sink,
            ContentEvent::new(ContentEventKind::ContentCreated, "c1", "tenant-a"),
        )
        .await;
        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].content_id, "c1");
    }
}
