//! # 通知ハンドラ
//!
//! 通知種別ごとにエンベロープを解釈し、エンティティを解決してメールを送る。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: ルーターは [`NotificationHandler`] 経由で呼び出す
//! - **送信しない結果も成功**: 受信設定で抑止された場合は [`Dispatch::Suppressed`]
//!
//! ## モジュール構成
//!
//! - [`reminder`] - ケア記録リマインダー
//! - [`feedback`] - フィードバック転送

pub mod feedback;
pub mod reminder;

use async_trait::async_trait;
use caregiver_domain::notification::NotificationEnvelope;
pub use feedback::FeedbackHandler;
pub use reminder::ReminderHandler;

use crate::error::HandlerError;

/// ハンドラの処理結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// メールを送信した
    Sent { message_id: String },
    /// 受信設定によりメールを送信しなかった
    Suppressed,
}

/// 通知ハンドラトレイト
#[async_trait]
pub trait NotificationHandler: Send + Sync {
    /// エンベロープを処理する
    async fn handle(&self, envelope: &NotificationEnvelope) -> Result<Dispatch, HandlerError>;
}
