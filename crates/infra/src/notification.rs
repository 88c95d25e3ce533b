//! # 通知送信
//!
//! メール通知の送信を担当するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `NotificationSender` trait でメール送信を抽象化
//! - **3 つの実装**: SES（本番用）、SMTP（Mailpit 開発用）、Noop（ログのみ）
//! - **環境変数切替**: `NOTIFICATION_BACKEND` でランタイム選択
//! - **メッセージ ID**: 送信に成功したら transport が割り当てた ID を返す

mod noop;
mod ses;
mod smtp;

use async_trait::async_trait;
use caregiver_domain::notification::{EmailMessage, NotificationError};
pub use noop::NoopNotificationSender;
pub use ses::SesNotificationSender;
pub use smtp::SmtpNotificationSender;

/// メール送信トレイト
///
/// 1 通のメールを 1 人の宛先に送信する。リトライは行わない。
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// メールを送信し、transport が割り当てたメッセージ ID を返す
    async fn send_email(&self, email: &EmailMessage) -> Result<String, NotificationError>;
}
