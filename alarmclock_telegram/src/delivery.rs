use alarmclock_scheduler::delivery::{NotificationChannel, NotificationPermission};
use async_trait::async_trait;
use teloxide::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelegramChannelError {
    #[error(transparent)]
    Telegram(#[from] teloxide::RequestError),
}

/// Delivers alarms as messages to a single Telegram chat.
pub struct TelegramNotificationChannel {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramNotificationChannel {
    pub fn new(bot: Bot, chat_id: i64) -> Self {
        Self {
            bot,
            chat_id: ChatId(chat_id),
        }
    }

    async fn send(&self, title: &str, body: &str) -> Result<(), TelegramChannelError> {
        self.bot
            .send_message(self.chat_id, message_text(title, body))
            .await?;

        Ok(())
    }
}

#[async_trait]
impl NotificationChannel for TelegramNotificationChannel {
    async fn request_permission(&self) -> NotificationPermission {
        match self.bot.get_me().await {
            Ok(me) => {
                log::info!(
                    "Telegram bot is reachable. [bot = {}, chat_id = {}]",
                    me.username(),
                    self.chat_id.0
                );
                NotificationPermission::Granted
            }
            Err(error) => {
                log::warn!("Telegram bot is not usable, alarms will use the fallback. [error = {error}]");
                NotificationPermission::Denied
            }
        }
    }

    async fn show(&self, title: &str, body: &str) -> anyhow::Result<()> {
        self.send(title, body).await?;
        Ok(())
    }
}

fn message_text(title: &str, body: &str) -> String {
    format!("{title}\n{body}")
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_partial_json, method, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const TOKEN: &str = "123:test-token";

    fn channel(server: &MockServer) -> TelegramNotificationChannel {
        let api_url = server.uri().parse::<url::Url>().unwrap();
        let bot = Bot::new(TOKEN).set_api_url(api_url);

        TelegramNotificationChannel::new(bot, 42)
    }

    fn unauthorized() -> ResponseTemplate {
        ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "ok": false,
            "error_code": 401,
            "description": "Unauthorized"
        }))
    }

    fn bot_user() -> serde_json::Value {
        serde_json::json!({
            "id": 123,
            "is_bot": true,
            "first_name": "Alarm",
            "username": "alarm_bot"
        })
    }

    fn get_me_ok() -> ResponseTemplate {
        let mut me = bot_user();
        me["can_join_groups"] = serde_json::json!(false);
        me["can_read_all_group_messages"] = serde_json::json!(false);
        me["supports_inline_queries"] = serde_json::json!(false);
        me["can_connect_to_business"] = serde_json::json!(false);
        me["has_main_web_app"] = serde_json::json!(false);

        ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": true, "result": me }))
    }

    fn sent_message_ok(text: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": true,
            "result": {
                "message_id": 1,
                "date": 1_700_000_000,
                "chat": { "id": 42, "type": "private", "first_name": "Test" },
                "from": bot_user(),
                "text": text
            }
        }))
    }

    #[test]
    fn message_puts_title_above_body() {
        assert_eq!(
            message_text("⏰ Alarm", "drink water"),
            "⏰ Alarm\ndrink water"
        );
    }

    #[tokio::test]
    async fn reachable_bot_grants_permission() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path_regex(r"(?i)/getme$"))
            .respond_with(get_me_ok())
            .expect(1)
            .mount(&server)
            .await;

        let permission = channel(&server).request_permission().await;

        assert_eq!(permission, NotificationPermission::Granted);
    }

    #[tokio::test]
    async fn alarm_is_sent_to_configured_chat() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path_regex(r"(?i)/sendmessage$"))
            .and(body_partial_json(serde_json::json!({
                "chat_id": 42,
                "text": "⏰ Alarm\ndrink water"
            })))
            .respond_with(sent_message_ok("⏰ Alarm\ndrink water"))
            .expect(1)
            .mount(&server)
            .await;

        let result = channel(&server).show("⏰ Alarm", "drink water").await;

        assert!(result.is_ok(), "Unexpected error {result:?}");
    }

    #[tokio::test]
    async fn rejected_token_denies_permission() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(unauthorized())
            .expect(1)
            .mount(&server)
            .await;

        let permission = channel(&server).request_permission().await;

        assert_eq!(permission, NotificationPermission::Denied);
    }

    #[tokio::test]
    async fn unreachable_api_denies_permission() {
        let server = MockServer::start().await;
        let channel = channel(&server);
        drop(server);

        assert_eq!(
            channel.request_permission().await,
            NotificationPermission::Denied
        );
    }

    #[tokio::test]
    async fn failed_send_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(unauthorized())
            .mount(&server)
            .await;

        let result = channel(&server).show("⏰ Alarm", "drink water").await;

        assert!(result.is_err());
    }
}
