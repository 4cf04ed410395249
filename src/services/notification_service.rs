use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use crate::{
    constants::NOTIFICATION_CHANNEL_CAPACITY,
    models::{Notification, NotificationType},
    services::clock::Clock,
};

/// Where simulators report user-facing events. The sink assigns the id and
/// timestamp and returns the stored notification.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(
        &self,
        notif_type: NotificationType,
        title: String,
        message: String,
        tx_hash: Option<String>,
    ) -> Notification;
}

/// In-memory notification log, newest first. Also fans out to websocket subscribers.
pub struct NotificationService {
    items: RwLock<Vec<Notification>>,
    sender: broadcast::Sender<Notification>,
    clock: Arc<dyn Clock>,
    seq: AtomicU64,
}

impl NotificationService {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let (sender, _) = broadcast::channel(NOTIFICATION_CHANNEL_CAPACITY);
        Self {
            items: RwLock::new(Vec::new()),
            sender,
            clock,
            seq: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    pub async fn list(&self) -> Vec<Notification> {
        self.items.read().await.clone()
    }

    pub async fn unread_count(&self) -> usize {
        self.items.read().await.iter().filter(|n| !n.read).count()
    }

    pub async fn mark_as_read(&self, id: &str) -> bool {
        let mut items = self.items.write().await;
        match items.iter_mut().find(|n| n.id == id) {
            Some(notification) => {
                notification.read = true;
                true
            }
            None => false,
        }
    }

    pub async fn mark_all_as_read(&self) -> usize {
        let mut items = self.items.write().await;
        let mut changed = 0;
        for notification in items.iter_mut().filter(|n| !n.read) {
            notification.read = true;
            changed += 1;
        }
        changed
    }

    pub async fn clear(&self, id: &str) -> bool {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|n| n.id != id);
        items.len() != before
    }

    pub async fn clear_all(&self) -> usize {
        let mut items = self.items.write().await;
        let removed = items.len();
        items.clear();
        removed
    }
}

#[async_trait]
impl NotificationSink for NotificationService {
    async fn notify(
        &self,
        notif_type: NotificationType,
        title: String,
        message: String,
        tx_hash: Option<String>,
    ) -> Notification {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed) + 1;
        let notification = Notification {
            id: format!("NTF_{:06}", seq),
            notif_type,
            title,
            message,
            tx_hash,
            read: false,
            created_at: self.clock.now(),
        };
        tracing::info!(
            "Notification [{:?}] {} - {}",
            notification.notif_type,
            notification.title,
            notification.message
        );
        self.items.write().await.insert(0, notification.clone());
        // No subscribers is fine; the log still has it.
        let _ = self.sender.send(notification.clone());
        notification
    }
}
