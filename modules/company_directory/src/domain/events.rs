/// Domain events for the company directory
///
/// Events are published after a write has been committed:
/// - Company page lifecycle: created, updated, deleted
/// - Tab linking: a tab document was attached to or detached from a page
/// - SEO: a record was upserted (server side of the `seo-updated` broadcast)

use crate::contract::model::{SeoKey, TabKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Domain event types for the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum DirectoryEvent {
    /// Company page was created
    CompanyPageCreated(CompanyPageEvent),
    /// Company page was replaced or had its layout changed
    CompanyPageUpdated(CompanyPageEvent),
    /// Company page was deleted (tab documents are kept)
    CompanyPageDeleted(CompanyPageEvent),
    /// Tab reference was set or cleared
    TabLinked(TabLinkedEvent),
    /// SEO record was upserted
    SeoUpdated(SeoUpdatedEvent),
}

/// Event data for company page lifecycle changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyPageEvent {
    pub page_id: Uuid,
    pub slug: String,
    /// Page version after the change
    pub version: i64,
    pub timestamp: DateTime<Utc>,
}

/// Event data for tab link changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabLinkedEvent {
    pub slug: String,
    pub tab: String,
    /// New tab document id, `None` when unlinked
    pub tab_id: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
}

/// Event data for SEO record upserts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoUpdatedEvent {
    pub page_type: String,
    pub identifier: String,
    pub tab: Option<String>,
    pub title: String,
    pub timestamp: DateTime<Utc>,
}

/// Event publisher trait for publishing domain events
#[async_trait::async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish an event; failures are reported but never undo the write
    async fn publish(&self, event: DirectoryEvent) -> anyhow::Result<()>;
}

/// No-op event publisher for testing or when events are disabled
pub struct NoOpEventPublisher;

#[async_trait::async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish(&self, _event: DirectoryEvent) -> anyhow::Result<()> {
        Ok(())
    }
}

/// In-process fan-out of domain events over a tokio broadcast channel
pub struct BroadcastEventPublisher {
    sender: broadcast::Sender<DirectoryEvent>,
}

impl BroadcastEventPublisher {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to events published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<DirectoryEvent> {
        self.sender.subscribe()
    }
}

#[async_trait::async_trait]
impl EventPublisher for BroadcastEventPublisher {
    async fn publish(&self, event: DirectoryEvent) -> anyhow::Result<()> {
        // No subscribers is not an error
        if self.sender.receiver_count() == 0 {
            tracing::trace!(?event, "no event subscribers");
            return Ok(());
        }
        self.sender
            .send(event)
            .map(|_| ())
            .map_err(|e| anyhow::anyhow!("failed to broadcast event: {}", e))
    }
}

impl DirectoryEvent {
    /// Create a new CompanyPageCreated event
    pub fn page_created(page_id: Uuid, slug: &str, version: i64) -> Self {
        DirectoryEvent::CompanyPageCreated(CompanyPageEvent::new(page_id, slug, version))
    }

    /// Create a new CompanyPageUpdated event
    pub fn page_updated(page_id: Uuid, slug: &str, version: i64) -> Self {
        DirectoryEvent::CompanyPageUpdated(CompanyPageEvent::new(page_id, slug, version))
    }

    /// Create a new CompanyPageDeleted event
    pub fn page_deleted(page_id: Uuid, slug: &str, version: i64) -> Self {
        DirectoryEvent::CompanyPageDeleted(CompanyPageEvent::new(page_id, slug, version))
    }

    /// Create a new TabLinked event
    pub fn tab_linked(slug: &str, tab: TabKind, tab_id: Option<Uuid>) -> Self {
        DirectoryEvent::TabLinked(TabLinkedEvent {
            slug: slug.to_string(),
            tab: tab.as_str().to_string(),
            tab_id,
            timestamp: Utc::now(),
        })
    }

    /// Create a new SeoUpdated event
    pub fn seo_updated(key: &SeoKey, title: &str) -> Self {
        DirectoryEvent::SeoUpdated(SeoUpdatedEvent {
            page_type: key.page_type.as_str().to_string(),
            identifier: key.identifier.clone(),
            tab: key.tab.map(|t| t.as_str().to_string()),
            title: title.to_string(),
            timestamp: Utc::now(),
        })
    }
}

impl CompanyPageEvent {
    fn new(page_id: Uuid, slug: &str, version: i64) -> Self {
        Self {
            page_id,
            slug: slug.to_string(),
            version,
            timestamp: Utc::now(),
        }
    }
}
