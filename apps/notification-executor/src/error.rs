//! # ハンドラエラー
//!
//! 通知ハンドラが返すエラーを定義する。
//!
//! リポジトリやレンダラーのエラーはそのまま包み、ルーターがレコード単位で
//! ログ出力してスキップする。ログの `error.category` / `error.kind` は
//! [`HandlerError::log_category`] と [`HandlerError::log_kind`] で決まる。
//! リポジトリ起因のエラーは [`HandlerError::span_trace`] で発生箇所のスパンも出力する。

use caregiver_domain::notification::NotificationError;
use caregiver_infra::InfraError;
use caregiver_shared::event_log::error::{category, kind};
use thiserror::Error;

/// 通知ハンドラのエラー
#[derive(Debug, Error)]
pub enum HandlerError {
    /// ペイロードのデコードに失敗
    #[error("ペイロードのデコードに失敗: {0}")]
    Decode(#[from] serde_json::Error),

    /// エンティティストアの操作に失敗
    #[error("リポジトリ操作に失敗: {0}")]
    Repository(#[from] InfraError),

    /// 参照先のエンティティが存在しない
    #[error("{entity} が見つかりません: {id}")]
    EntityNotFound { entity: &'static str, id: String },

    /// メールのレンダリングまたは送信に失敗
    #[error(transparent)]
    Notification(#[from] NotificationError),
}

impl HandlerError {
    /// ログ出力用のエラーカテゴリ
    pub fn log_category(&self) -> &'static str {
        match self {
            Self::Decode(_) => category::INPUT,
            Self::Repository(_) | Self::EntityNotFound { .. } => category::INFRASTRUCTURE,
            Self::Notification(_) => category::EXTERNAL_SERVICE,
        }
    }

    /// ログ出力用のエラー種別
    pub fn log_kind(&self) -> &'static str {
        match self {
            Self::Decode(_) => kind::DECODE,
            Self::Repository(e) if e.is_not_found() => kind::ENTITY_NOT_FOUND,
            Self::Repository(_) => kind::STORE,
            Self::EntityNotFound { .. } => kind::ENTITY_NOT_FOUND,
            Self::Notification(NotificationError::TemplateFailed(_)) => kind::TEMPLATE,
            Self::Notification(NotificationError::SendFailed(_)) => kind::DELIVERY,
        }
    }

    /// リポジトリエラーが捕捉した SpanTrace（その他のエラーは `None`）
    pub fn span_trace(&self) -> Option<String> {
        match self {
            Self::Repository(e) => Some(e.span_trace().to_string()),
            _ => None,
        }
    }
}
