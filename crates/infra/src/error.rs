//! # インフラ層エラー定義
//!
//! エンティティストアや外部サービスとの通信で発生するエラーを表現する。
//!
//! ## 設計方針
//!
//! - **エラーの分類**: 書き込み前の変換失敗、読み込み後の変換失敗、ストア通信失敗、
//!   該当なしを区別する
//! - **ドメインエラーとの分離**: インフラ固有のエラーを明示
//! - **SpanTrace 自動捕捉**: convenience constructor でエラー生成時の呼び出し経路を
//!   自動記録する
//!
//! ## 構造
//!
//! `std::io::Error` と同じ struct + enum パターンを採用:
//! - [`InfraError`]: エラー種別（[`InfraErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`InfraErrorKind`]: エラーの具体的な種別（DynamoDb, NotFound 等）

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
///
/// エラー種別（[`InfraErrorKind`]）と [`SpanTrace`]（呼び出し経路）を保持する。
///
/// ## パターンマッチ
///
/// エラー種別に応じた処理には [`kind()`](InfraError::kind) を使用する:
///
/// ```ignore
/// match error.kind() {
///     InfraErrorKind::NotFound { entity, key } => { /* 該当なし */ }
///     _ => { /* その他 */ }
/// }
/// ```
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
    /// シリアライズエラー
    ///
    /// エンティティをストアの属性マップに変換できない場合（非有限の数値など）。
    #[error("シリアライズエラー: {0}")]
    Serialization(String),

    /// デシリアライズエラー
    ///
    /// ストアから取得した属性の型が想定と異なる場合。
    #[error("デシリアライズエラー: {entity}: {reason}")]
    Deserialization {
        /// エンティティ名（例: "User"）
        entity: String,
        /// 失敗理由
        reason: String,
    },

    /// DynamoDB エラー
    ///
    /// DynamoDB への操作で発生するエラー。
    /// AWS SDK のエラー型はジェネリクスが深く `#[from]` が困難なため、
    /// 手動で String にマップする。
    #[error("DynamoDB エラー: {0}")]
    DynamoDb(String),

    /// 該当なし
    ///
    /// セカンダリインデックス検索で一意の結果が得られなかった場合。
    #[error("見つかりません: {entity}(key={key})")]
    NotFound {
        /// エンティティ名（例: "User"）
        entity: String,
        /// 検索キー
        key:    String,
    },
}

// ===== InfraError のメソッド =====

impl InfraError {
    /// エラー種別を取得する
    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    /// SpanTrace を取得する
    ///
    /// ハンドラエラーのログ出力で `span_trace` フィールドとして使われる。
    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    /// NotFound バリアントかどうか
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, InfraErrorKind::NotFound { .. })
    }

    // ===== Convenience constructors =====

    fn new(kind: InfraErrorKind) -> Self {
        Self {
            kind,
            span_trace: SpanTrace::capture(),
        }
    }

    /// シリアライズエラーを生成する
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::new(InfraErrorKind::Serialization(msg.into()))
    }

    /// デシリアライズエラーを生成する
    pub fn deserialization(entity: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(InfraErrorKind::Deserialization {
            entity: entity.into(),
            reason: reason.into(),
        })
    }

    /// DynamoDB エラーを生成する
    pub fn dynamo_db(msg: impl Into<String>) -> Self {
        Self::new(InfraErrorKind::DynamoDb(msg.into()))
    }

    /// 該当なしエラーを生成する
    pub fn not_found(entity: impl Into<String>, key: impl Into<String>) -> Self {
        Self::new(InfraErrorKind::NotFound {
            entity: entity.into(),
            key:    key.into(),
        })
    }
}

// ===== トレイト実装 =====

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfraError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.kind)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tracing_subscriber::layer::SubscriberExt as _;

    use super::*;

    /// テスト用に ErrorLayer 付き subscriber を設定する
    fn with_error_layer(f: impl FnOnce()) {
        let subscriber = tracing_subscriber::registry().with(tracing_error::ErrorLayer::default());
        let _guard = tracing::subscriber::set_default(subscriber);
        f();
    }

    #[test]
    fn test_dynamo_dbでspan_traceがキャプチャされる() {
        with_error_layer(|| {
            let span = tracing::info_span!("test_dynamo");
            let _enter = span.enter();

            let err = InfraError::dynamo_db("接続失敗");

            assert!(matches!(err.kind(), InfraErrorKind::DynamoDb(msg) if msg == "接続失敗"));
            let trace_str = format!("{}", err.span_trace());
            assert!(
                trace_str.contains("test_dynamo"),
                "SpanTrace がスパン名を含むこと: {trace_str}",
            );
        });
    }

    #[test]
    fn test_deserializationでspan_traceがキャプチャされる() {
        with_error_layer(|| {
            let span = tracing::info_span!("test_decode", entity = "User");
            let _enter = span.enter();

            let err = InfraError::deserialization("User", "属性 'email' の型が不正");

            assert!(matches!(
                err.kind(),
                InfraErrorKind::Deserialization { entity, .. } if entity == "User"
            ));
            assert!(format!("{}", err.span_trace()).contains("test_decode"));
        });
    }

    #[test]
    fn test_serializationの種別が正しい() {
        let err = InfraError::serialization("非有限の数値");
        assert!(matches!(
            err.kind(),
            InfraErrorKind::Serialization(msg) if msg == "非有限の数値"
        ));
    }

    #[test]
    fn test_displayがinfra_error_kindのメッセージを出力する() {
        let err = InfraError::not_found("User", "a@b.com");
        assert_eq!(format!("{err}"), "見つかりません: User(key=a@b.com)");
    }

    #[test]
    fn test_is_not_foundでnot_foundを判定できる() {
        assert!(InfraError::not_found("User", "x").is_not_found());
        assert!(!InfraError::dynamo_db("x").is_not_found());
    }
}
