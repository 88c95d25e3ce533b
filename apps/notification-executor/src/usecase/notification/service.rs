//! # メール通知サービス
//!
//! テンプレートレンダリング → メール送信 → ログ記録を統合するサービス。
//!
//! ## 設計方針
//!
//! - **エラーは呼び出し元へ**: 送信失敗はログ出力した上でハンドラに返す
//! - **依存性注入**: `NotificationSender` は trait で抽象化

use std::sync::Arc;

use caregiver_domain::notification::{EmailNotification, NotificationError};
use caregiver_infra::notification::NotificationSender;
use caregiver_shared::{event_log::event, log_business_event};

use super::TemplateRenderer;

/// メール通知サービス
pub struct EmailService {
    sender:            Arc<dyn NotificationSender>,
    template_renderer: TemplateRenderer,
}

impl EmailService {
    pub fn new(sender: Arc<dyn NotificationSender>, template_renderer: TemplateRenderer) -> Self {
        Self {
            sender,
            template_renderer,
        }
    }

    /// メール通知をレンダリングして送信し、メッセージ ID を返す
    pub async fn send(&self, notification: &EmailNotification) -> Result<String, NotificationError> {
        let notification_type: &str = notification.notification_type().into();
        let recipient_email = notification.recipient_email();

        let email = self.template_renderer.render(notification).map_err(|e| {
            tracing::error!(
                error = %e,
                notification.notification_type = notification_type,
                "通知テンプレートのレンダリングに失敗"
            );
            e
        })?;

        match self.sender.send_email(&email).await {
            Ok(message_id) => {
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_SENT,
                    event.result = event::result::SUCCESS,
                    notification.notification_type = notification_type,
                    notification.recipient = %recipient_email,
                    notification.message_id = %message_id,
                    "通知メール送信成功"
                );
                Ok(message_id)
            }
            Err(e) => {
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_FAILED,
                    event.result = event::result::FAILURE,
                    notification.notification_type = notification_type,
                    notification.recipient = %recipient_email,
                    error = %e,
                    "通知メール送信失敗"
                );
                Err(e)
            }
        }
    }
}
