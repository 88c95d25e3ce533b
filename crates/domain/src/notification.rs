//! # 通知
//!
//! キューから受け取る通知エンベロープと、メール通知に関するドメインモデルを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 内容 |
//! |---|------------|------|
//! | [`NotificationEnvelope`] | 通知エンベロープ | キューレコードの本文（種別、チャネル、ペイロード） |
//! | [`NotificationType`] | 通知種別 | `reminder`（リマインダー）、`feedback`（フィードバック） |
//! | [`EmailNotification`] | メール通知 | テンプレートに渡す解決済みデータ |
//! | [`EmailMessage`] | メールメッセージ | レンダリング済みの件名・本文 |
//!
//! ## 設計方針
//!
//! - **種別は文字列のまま受け取る**: 未知の種別でもエンベロープのデコードは成功させ、
//!   振り分け時に警告してスキップする
//! - **ペイロードの遅延デコード**: `execution_data` はハンドラが種別ごとの型にデコードする
//! - **テンプレート分離**: 通知データとメール生成は分離（TemplateRenderer はエグゼキュータ側）

use serde::{Deserialize, Deserializer, Serialize};
use strum::IntoStaticStr;
use thiserror::Error;

use crate::relationship::Relationship;

/// メールチャネルを表すチャネル名
pub const EMAIL_CHANNEL: &str = "email";

/// 通知送信エラー
#[derive(Debug, Error)]
pub enum NotificationError {
    /// メール送信に失敗
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),

    /// テンプレートレンダリングに失敗
    #[error("テンプレートレンダリングに失敗: {0}")]
    TemplateFailed(String),
}

/// 通知種別
///
/// エンベロープの `notification_type` と完全一致で照合する（snake_case）。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    IntoStaticStr,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NotificationType {
    /// リマインダー: メールチャネル指定時のみユーザーへ送信
    Reminder,
    /// フィードバック: チャネルに関係なく指定アドレスへ送信
    Feedback,
}

/// 通知エンベロープ（キューレコードの本文）
///
/// ```json
/// {
///   "notification_type": "reminder",
///   "channel": ["email"],
///   "relationship": { "userId": "...", "receiverId": "...", "emailNotifications": true },
///   "execution_data": { ... }
/// }
/// ```
///
/// `notification_type` と `channel` は省略・`null` のどちらも既定値（空）として扱う。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEnvelope {
    #[serde(default, deserialize_with = "null_as_default")]
    pub notification_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub channel:           Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship:      Option<Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_data:    Option<serde_json::Value>,
}

/// `null` を型の既定値としてデコードする
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl NotificationEnvelope {
    /// 通知種別を返す（未知の種別は `None`）
    pub fn kind(&self) -> Option<NotificationType> {
        self.notification_type.parse().ok()
    }

    /// 指定チャネルが含まれるか
    pub fn has_channel(&self, channel: &str) -> bool {
        self.channel.iter().any(|c| c == channel)
    }

    /// リマインダーのペイロードを取り出す
    ///
    /// トップレベルの `relationship` を優先し、なければ
    /// `execution_data.relationship` をデコードする。
    pub fn reminder_payload(&self) -> Result<ReminderNotification, serde_json::Error> {
        if let Some(relationship) = &self.relationship {
            return Ok(ReminderNotification {
                relationship: relationship.clone(),
            });
        }
        serde_json::from_value(self.execution_data_or_null())
    }

    /// フィードバックのペイロードを `execution_data` から取り出す
    pub fn feedback_payload(&self) -> Result<FeedbackNotification, serde_json::Error> {
        serde_json::from_value(self.execution_data_or_null())
    }

    fn execution_data_or_null(&self) -> serde_json::Value {
        self.execution_data
            .clone()
            .unwrap_or(serde_json::Value::Null)
    }
}

/// リマインダーのペイロード
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderNotification {
    pub relationship: Relationship,
}

/// フィードバックのペイロード
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackNotification {
    pub email:   String,
    pub message: String,
}

/// メールメッセージ
///
/// テンプレートレンダリングの出力。NotificationSender に渡される。
/// 送信元アドレスは送信側（transport）の設定で決まる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// 送信先メールアドレス
    pub to:        String,
    /// 件名
    pub subject:   String,
    /// HTML 本文
    pub html_body: String,
    /// プレーンテキスト本文
    pub text_body: String,
}

/// メール通知（テンプレートに渡す解決済みデータ）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailNotification {
    /// リマインダー: ユーザーに受給者のケア記録を促す
    Reminder {
        user_first_name:     String,
        receiver_first_name: String,
        recipient_email:     String,
    },
    /// フィードバック: 受け取ったメッセージを転送する
    Feedback {
        recipient_email: String,
        message:         String,
    },
}

impl EmailNotification {
    /// 通知種別を返す
    pub fn notification_type(&self) -> NotificationType {
        match self {
            Self::Reminder { .. } => NotificationType::Reminder,
            Self::Feedback { .. } => NotificationType::Feedback,
        }
    }

    /// 受信者のメールアドレスを返す
    pub fn recipient_email(&self) -> &str {
        match self {
            Self::Reminder {
                recipient_email, ..
            }
            | Self::Feedback {
                recipient_email, ..
            } => recipient_email,
        }
    }
}
