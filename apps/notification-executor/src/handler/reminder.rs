//! # リマインダーハンドラ
//!
//! ケア関係（ユーザー × 受給者）を解決し、メール通知が有効な場合に
//! ユーザーへリマインダーメールを送る。
//!
//! ユーザーまたは受給者が存在しない場合は [`HandlerError::EntityNotFound`]。

use std::sync::Arc;

use async_trait::async_trait;
use caregiver_domain::notification::{EmailNotification, NotificationEnvelope};
use caregiver_infra::repository::{ReceiverRepository, UserRepository};

use super::{Dispatch, NotificationHandler};
use crate::{error::HandlerError, usecase::notification::EmailService};

/// リマインダーハンドラ
pub struct ReminderHandler {
    users:     Arc<dyn UserRepository>,
    receivers: Arc<dyn ReceiverRepository>,
    email:     Arc<EmailService>,
}

impl ReminderHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        receivers: Arc<dyn ReceiverRepository>,
        email: Arc<EmailService>,
    ) -> Self {
        Self {
            users,
            receivers,
            email,
        }
    }
}

#[async_trait]
impl NotificationHandler for ReminderHandler {
    async fn handle(&self, envelope: &NotificationEnvelope) -> Result<Dispatch, HandlerError> {
        let relationship = envelope.reminder_payload()?.relationship;

        let user = self
            .users
            .find_by_id(&relationship.user_id)
            .await?
            .ok_or_else(|| HandlerError::EntityNotFound {
                entity: "User",
                id:     relationship.user_id.to_string(),
            })?;

        let receiver = self
            .receivers
            .find_by_id(&relationship.receiver_id)
            .await?
            .ok_or_else(|| HandlerError::EntityNotFound {
                entity: "Receiver",
                id:     relationship.receiver_id.to_string(),
            })?;

        if !relationship.email_notifications {
            tracing::info!(
                user_id = %user.id(),
                receiver_id = %receiver.id(),
                "メール通知が無効のためリマインダーを送信しません"
            );
            return Ok(Dispatch::Suppressed);
        }

        let notification = EmailNotification::Reminder {
            user_first_name:     user.first_name().to_string(),
            receiver_first_name: receiver.first_name().to_string(),
            recipient_email:     user.email().to_string(),
        };
        let message_id = self.email.send(&notification).await?;

        Ok(Dispatch::Sent { message_id })
    }
}

#[cfg(test)]
mod tests {
    use caregiver_domain::{
        receiver::{Receiver, ReceiverId},
        user::{User, UserId},
    };
    use caregiver_infra::{
        mock::{MockKeyValueStore, MockNotificationSender},
        notification::NotificationSender,
        repository::{DynamoDbReceiverRepository, DynamoDbUserRepository},
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::usecase::notification::TemplateRenderer;

    struct Fixture {
        handler:  ReminderHandler,
        sender:   Arc<MockNotificationSender>,
        user:     User,
        receiver: Receiver,
    }

    async fn setup_with(sender: Arc<MockNotificationSender>) -> Fixture {
        let store = Arc::new(
            MockKeyValueStore::new()
                .with_key_schema("users", &["user_id"])
                .with_key_schema("receivers", &["receiver_id"]),
        );
        let users = Arc::new(DynamoDbUserRepository::new(store.clone(), "users"));
        let receivers = Arc::new(DynamoDbReceiverRepository::new(store, "receivers"));

        let user = User::new("jane@example.com", "Jane", "Doe");
        let receiver = Receiver::new("John", "Doe");
        users.create(&user).await.unwrap();
        receivers.create(&receiver).await.unwrap();

        let email = Arc::new(EmailService::new(
            sender.clone() as Arc<dyn NotificationSender>,
            TemplateRenderer::new().unwrap(),
        ));

        Fixture {
            handler: ReminderHandler::new(users, receivers, email),
            sender,
            user,
            receiver,
        }
    }

    async fn setup() -> Fixture {
        setup_with(Arc::new(MockNotificationSender::new())).await
    }

    fn envelope(user_id: &UserId, receiver_id: &ReceiverId, enabled: bool) -> NotificationEnvelope {
        serde_json::from_value(json!({
            "notification_type": "reminder",
            "channel": ["email"],
            "relationship": {
                "userId": user_id.as_str(),
                "receiverId": receiver_id.as_str(),
                "emailNotifications": enabled
            }
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn メール通知が有効ならユーザーに送信する() {
        let fx = setup().await;

        let result = fx
            .handler
            .handle(&envelope(fx.user.id(), fx.receiver.id(), true))
            .await
            .unwrap();

        assert_eq!(
            result,
            Dispatch::Sent {
                message_id: "mock-1".to_string(),
            }
        );
        let sent = fx.sender.sent_emails();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "jane@example.com");
        assert_eq!(sent[0].subject, "CareToSher Notification: Reminder - John");
        assert!(sent[0].html_body.contains("John"));
    }

    #[tokio::test]
    async fn メール通知が無効なら送信しない() {
        let fx = setup().await;

        let result = fx
            .handler
            .handle(&envelope(fx.user.id(), fx.receiver.id(), false))
            .await
            .unwrap();

        assert_eq!(result, Dispatch::Suppressed);
        assert!(fx.sender.sent_emails().is_empty());
    }

    #[tokio::test]
    async fn execution_data内のrelationshipも受け付ける() {
        let fx = setup().await;
        let envelope: NotificationEnvelope = serde_json::from_value(json!({
            "notification_type": "reminder",
            "channel": ["email"],
            "execution_data": {
                "relationship": {
                    "userId": fx.user.id().as_str(),
                    "receiverId": fx.receiver.id().as_str(),
                    "emailNotifications": true
                }
            }
        }))
        .unwrap();

        let result = fx.handler.handle(&envelope).await.unwrap();

        assert!(matches!(result, Dispatch::Sent { .. }));
    }

    #[tokio::test]
    async fn 存在しないユーザーはentity_not_found() {
        let fx = setup().await;

        let err = fx
            .handler
            .handle(&envelope(&UserId::new(), fx.receiver.id(), true))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            HandlerError::EntityNotFound { entity: "User", .. }
        ));
        assert!(fx.sender.sent_emails().is_empty());
    }

    #[tokio::test]
    async fn 存在しない受給者はentity_not_found() {
        let fx = setup().await;

        let err = fx
            .handler
            .handle(&envelope(fx.user.id(), &ReceiverId::new(), true))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            HandlerError::EntityNotFound {
                entity: "Receiver",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn relationshipがない場合はデコードエラー() {
        let fx = setup().await;
        let envelope: NotificationEnvelope = serde_json::from_value(json!({
            "notification_type": "reminder",
            "channel": ["email"]
        }))
        .unwrap();

        let err = fx.handler.handle(&envelope).await.unwrap_err();

        assert!(matches!(err, HandlerError::Decode(_)));
    }

    #[tokio::test]
    async fn 送信失敗はnotificationエラーとして返す() {
        let fx = setup_with(Arc::new(MockNotificationSender::failing("SES 障害"))).await;

        let err = fx
            .handler
            .handle(&envelope(fx.user.id(), fx.receiver.id(), true))
            .await
            .unwrap_err();

        assert!(matches!(err, HandlerError::Notification(_)));
    }
}
