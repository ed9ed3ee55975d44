use std::sync::Arc;

use async_trait::async_trait;

pub const ALARM_TITLE: &str = "⏰ Alarm";
pub const DEFAULT_ALARM_TEXT: &str = "Time is up!";

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum NotificationPermission {
    NotRequested,
    Granted,
    Denied,
}

/// A native notification mechanism gated behind a permission.
#[async_trait]
pub trait NotificationChannel: Send + Sync + 'static {
    async fn request_permission(&self) -> NotificationPermission;

    async fn show(&self, title: &str, body: &str) -> anyhow::Result<()>;
}

/// Blocking display used whenever the notification channel cannot be used.
pub trait FallbackAlert: Send + Sync + 'static {
    fn alert(&self, text: &str);
}

/// Receives the reason of every firing alarm.
#[async_trait]
pub trait AlarmNotifier: Send + Sync + 'static {
    async fn notify(&self, reason: &str);
}

/// Channel used when nothing is configured; every alarm goes to the fallback.
pub struct NoNotificationChannel;

#[async_trait]
impl NotificationChannel for NoNotificationChannel {
    async fn request_permission(&self) -> NotificationPermission {
        NotificationPermission::Denied
    }

    async fn show(&self, _title: &str, _body: &str) -> anyhow::Result<()> {
        anyhow::bail!("No notification channel configured")
    }
}

pub struct NotificationDispatcher {
    channel: Arc<dyn NotificationChannel>,
    fallback: Arc<dyn FallbackAlert>,
    permission: NotificationPermission,
}

impl NotificationDispatcher {
    /// Asks the channel for permission once; the answer is kept for the dispatcher's lifetime.
    pub async fn start(
        channel: Arc<dyn NotificationChannel>,
        fallback: Arc<dyn FallbackAlert>,
    ) -> Self {
        let permission = channel.request_permission().await;
        log::info!("Notification permission resolved. [permission = {permission:?}]");

        Self::with_permission(channel, fallback, permission)
    }

    pub fn with_permission(
        channel: Arc<dyn NotificationChannel>,
        fallback: Arc<dyn FallbackAlert>,
        permission: NotificationPermission,
    ) -> Self {
        Self {
            channel,
            fallback,
            permission,
        }
    }

    pub fn permission(&self) -> NotificationPermission {
        self.permission
    }
}

#[async_trait]
impl AlarmNotifier for NotificationDispatcher {
    async fn notify(&self, reason: &str) {
        let text = if reason.is_empty() {
            DEFAULT_ALARM_TEXT
        } else {
            reason
        };

        if self.permission == NotificationPermission::Granted {
            match self.channel.show(ALARM_TITLE, text).await {
                Ok(()) => return,
                Err(error) => log::warn!(
                    "Notification delivery failed, falling back to alert. [error = {error}]"
                ),
            }
        }

        self.fallback.alert(text);
    }
}
