//! # フィードバックハンドラ
//!
//! `execution_data` の `{email, message}` を受け取り、指定アドレスへ
//! フィードバックメールを転送する。チャネル指定や受信設定には依存しない。

use std::sync::Arc;

use async_trait::async_trait;
use caregiver_domain::notification::{EmailNotification, NotificationEnvelope};

use super::{Dispatch, NotificationHandler};
use crate::{error::HandlerError, usecase::notification::EmailService};

/// フィードバックハンドラ
pub struct FeedbackHandler {
    email: Arc<EmailService>,
}

impl FeedbackHandler {
    pub fn new(email: Arc<EmailService>) -> Self {
        Self { email }
    }
}

#[async_trait]
impl NotificationHandler for FeedbackHandler {
    async fn handle(&self, envelope: &NotificationEnvelope) -> Result<Dispatch, HandlerError> {
        let feedback = envelope.feedback_payload()?;

        let notification = EmailNotification::Feedback {
            recipient_email: feedback.email,
            message:         feedback.message,
        };
        let message_id = self.email.send(&notification).await?;

        Ok(Dispatch::Sent { message_id })
    }
}
