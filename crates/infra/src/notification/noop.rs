//! Noop 通知送信実装
//!
//! メールを実際に送信せず、ログ出力のみ行う。
//! ローカル環境や通知無効化時に使用する。

use async_trait::async_trait;
use caregiver_domain::notification::{EmailMessage, NotificationError};

use super::NotificationSender;

/// Noop 通知送信（ログ出力のみ）
#[derive(Debug, Clone)]
pub struct NoopNotificationSender;

#[async_trait]
impl NotificationSender for NoopNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<String, NotificationError> {
        let message_id = format!("noop-{}", uuid::Uuid::now_v7());

        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            %message_id,
            "Noop: メール送信をスキップ"
        );

        Ok(message_id)
    }
}
