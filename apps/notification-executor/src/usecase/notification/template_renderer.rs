//! # テンプレートレンダラー
//!
//! tera テンプレートエンジンで通知メールを HTML/plaintext 両形式で生成する。
//!
//! ## 設計方針
//!
//! - **`include_str!` によるコンパイル時埋め込み**: テンプレートはバイナリに埋め込まれる
//! - **件名パターン**: リマインダーは `CareToSher Notification: Reminder - {受給者名}`、
//!   フィードバックは固定の `You received feedback`
//! - **HTML エスケープ**: `.html` テンプレートは tera の自動エスケープ対象

use caregiver_domain::notification::{EmailMessage, EmailNotification, NotificationError};
use tera::{Context, Tera};

/// フィードバックメールの件名
pub const FEEDBACK_SUBJECT: &str = "You received feedback";

/// テンプレートレンダラー
///
/// tera テンプレートエンジンをラップし、`EmailNotification` から
/// `EmailMessage` を生成する。
pub struct TemplateRenderer {
    engine: Tera,
}

impl TemplateRenderer {
    /// 新しいレンダラーインスタンスを作成
    ///
    /// `include_str!` で埋め込んだテンプレートを tera に登録する。
    pub fn new() -> Result<Self, NotificationError> {
        let mut engine = Tera::default();

        engine
            .add_raw_templates(vec![
                (
                    "reminder.html",
                    include_str!("../../../templates/notifications/reminder.html"),
                ),
                (
                    "reminder.txt",
                    include_str!("../../../templates/notifications/reminder.txt"),
                ),
                (
                    "feedback.html",
                    include_str!("../../../templates/notifications/feedback.html"),
                ),
                (
                    "feedback.txt",
                    include_str!("../../../templates/notifications/feedback.txt"),
                ),
            ])
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(Self { engine })
    }

    /// メール通知からメールメッセージを生成する
    pub fn render(&self, notification: &EmailNotification) -> Result<EmailMessage, NotificationError> {
        let (template_name, subject, context) = build_template_params(notification);

        let html_body = self.render_template(&format!("{template_name}.html"), &context)?;
        let text_body = self.render_template(&format!("{template_name}.txt"), &context)?;

        Ok(EmailMessage {
            to: notification.recipient_email().to_string(),
            subject,
            html_body,
            text_body,
        })
    }

    /// 名前を指定してテンプレートをレンダリングする
    ///
    /// 未登録のテンプレート名は `NotificationError::TemplateFailed`。
    pub fn render_template(&self, name: &str, context: &Context) -> Result<String, NotificationError> {
        self.engine
            .render(name, context)
            .map_err(|e| NotificationError::TemplateFailed(format!("{name}: {e}")))
    }
}

/// テンプレート名、件名、コンテキストを構築する
fn build_template_params(notification: &EmailNotification) -> (&'static str, String, Context) {
    let mut context = Context::new();
    let template_name: &'static str = notification.notification_type().into();

    let subject = match notification {
        EmailNotification::Reminder {
            user_first_name,
            receiver_first_name,
            ..
        } => {
            context.insert("user_name", user_first_name);
            context.insert("receiver_name", receiver_first_name);
            format!("CareToSher Notification: Reminder - {receiver_first_name}")
        }
        EmailNotification::Feedback { message, .. } => {
            context.insert("feedback_message", message);
            FEEDBACK_SUBJECT.to_string()
        }
    };

    (template_name, subject, context)
}
