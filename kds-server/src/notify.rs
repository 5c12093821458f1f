//! Notification relay
//!
//! Delivers kitchen status-change events to a live subscriber channel
//! scoped by branch (`kitchen_{branch_id}`). When the transport fails the
//! event is persisted as a fallback [`Notification`] row; the failure is
//! never propagated to the caller. The read side (`list_unread`,
//! `mark_read`, `clear_all`) works purely against the persisted rows.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use shared::models::Notification;
use shared::{KitchenEvent, KitchenEventKind};

use crate::core::{KitchenError, KitchenResult};
use crate::storage::KitchenStorage;
use crate::utils::now_millis;

/// Live channel transport, pluggable and fire-and-forget
///
/// Implementations may fail; the relay treats any error as "channel
/// unavailable" and falls back to persistence.
pub trait ChannelTransport: Send + Sync {
    fn publish(&self, channel_key: &str, event: &KitchenEvent) -> anyhow::Result<()>;
}

/// In-process transport that records published events
///
/// Used by embedded deployments that drain events from memory, and by
/// tests. Can be switched into a failing mode to exercise the fallback
/// path.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    published: Mutex<Vec<(String, KitchenEvent)>>,
    fail: AtomicBool,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent publishes fail (or succeed again)
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Drain all recorded events
    pub fn drain(&self) -> Vec<(String, KitchenEvent)> {
        std::mem::take(&mut *self.published.lock())
    }

    pub fn published_count(&self) -> usize {
        self.published.lock().len()
    }
}

impl ChannelTransport for MemoryTransport {
    fn publish(&self, channel_key: &str, event: &KitchenEvent) -> anyhow::Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("channel unavailable");
        }
        self.published
            .lock()
            .push((channel_key.to_string(), event.clone()));
        Ok(())
    }
}

/// Branch-scoped notification relay with persisted fallback
#[derive(Clone)]
pub struct NotificationRelay {
    storage: KitchenStorage,
    transport: Arc<dyn ChannelTransport>,
}

impl NotificationRelay {
    pub fn new(storage: KitchenStorage, transport: Arc<dyn ChannelTransport>) -> Self {
        Self { storage, transport }
    }

    /// Publish a status-change event; returns whether the event reached
    /// the channel or the fallback log. Never propagates transport errors.
    pub fn notify(&self, branch_id: i64, order_id: &str, status: &str) -> bool {
        let event = KitchenEvent::order_update(branch_id, order_id, status);
        self.dispatch(event, format!("Order {} changed to {}", order_id, status))
    }

    /// Publish an SLA delay alert with the same delivery contract
    pub fn notify_delay(&self, branch_id: i64, order_id: &str, delay_minutes: i64) -> bool {
        let event = KitchenEvent::delay_alert(branch_id, order_id, delay_minutes);
        self.dispatch(
            event,
            format!(
                "Order {} has been preparing for {} minutes",
                order_id, delay_minutes
            ),
        )
    }

    fn dispatch(&self, event: KitchenEvent, message: String) -> bool {
        match self.transport.publish(&event.channel_key(), &event) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    branch_id = event.branch_id,
                    order_id = %event.order_id,
                    error = %e,
                    "Channel publish failed, persisting fallback notification"
                );
                self.persist_fallback(&event, message)
            }
        }
    }

    /// Persisted fallback still counts as delivered; only a storage
    /// failure on top of the transport failure reports false.
    fn persist_fallback(&self, event: &KitchenEvent, message: String) -> bool {
        let notification = Notification {
            id: 0,
            branch_id: event.branch_id,
            order_id: event.order_id.clone(),
            status: event.status.clone(),
            message,
            notification_type: event.kind,
            is_read: false,
            created_at: now_millis(),
        };
        match self.storage.insert_notification(notification) {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(
                    branch_id = event.branch_id,
                    order_id = %event.order_id,
                    error = %e,
                    "Failed to persist fallback notification"
                );
                false
            }
        }
    }

    // ========== Read side (persisted rows only) ==========

    /// Unread notifications of a branch, newest first
    pub fn list_unread(&self, branch_id: i64, limit: usize) -> KitchenResult<Vec<Notification>> {
        let rows = self.storage.notifications_for_branch(branch_id)?;
        Ok(rows.into_iter().filter(|n| !n.is_read).take(limit).collect())
    }

    /// Mark one notification as read
    pub fn mark_read(&self, id: u64) -> KitchenResult<()> {
        let txn = self.storage.begin_write()?;
        let mut notification = self
            .storage
            .get_notification(id)?
            .ok_or(KitchenError::NotificationNotFound(id))?;
        notification.is_read = true;
        self.storage.put_notification(&txn, &notification)?;
        txn.commit().map_err(crate::storage::StorageError::from)?;
        Ok(())
    }

    /// Delete all notifications of a branch, returning the removed count
    pub fn clear_all(&self, branch_id: i64) -> KitchenResult<usize> {
        Ok(self.storage.clear_notifications(branch_id)?)
    }
}
