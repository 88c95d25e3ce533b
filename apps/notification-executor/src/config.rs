//! # Notification Executor 設定
//!
//! 環境変数から通知エグゼキュータの設定を読み込む。
//!
//! テーブル名は `ENV` から導出したデフォルト（`user-table-<ENV>` など）を持ち、
//! 個別の環境変数で上書きできる。

use std::env;

use thiserror::Error;

/// ローカル開発環境を表す `ENV` の値
pub const LOCAL_ENV: &str = "local";

/// 送信元メールアドレスのデフォルト
pub const DEFAULT_SENDER_EMAIL_ADDRESS: &str = "support@caretosher.com";

/// DynamoDB Local のデフォルトエンドポイント
pub const DEFAULT_LOCAL_DYNAMODB_ENDPOINT: &str = "http://localhost:8000";

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 不正なポート番号
    #[error("{name} は有効なポート番号である必要があります: {value}")]
    InvalidPort { name: &'static str, value: String },

    /// 未知の送信バックエンド
    #[error("NOTIFICATION_BACKEND が不正です（smtp | ses | noop）: {0}")]
    UnknownBackend(String),
}

/// 通知エグゼキュータの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// 実行環境（`local`, `dev`, `prod` など）
    pub env:                  String,
    /// ユーザーテーブル名
    pub user_table_name:      String,
    /// ケア受給者テーブル名
    pub receiver_table_name:  String,
    /// イベントテーブル名
    ///
    /// 現在のハンドラはイベントを参照しない。上流の書き込み経路と同じ
    /// 変数名・既定値で読み込み、起動ログに出力するためだけに保持する。
    pub event_table_name:     String,
    /// 送信元メールアドレス
    pub sender_email_address: String,
    /// DynamoDB エンドポイント（DynamoDB Local 使用時に設定）
    pub dynamodb_endpoint:    Option<String>,
    /// 通知設定
    pub notification:         NotificationConfig,
}

/// 送信バックエンド
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum NotificationBackend {
    /// Amazon SES v2 経由で送信（本番）
    Ses,
    /// SMTP 経由で送信（Mailpit）
    Smtp,
    /// 送信しない（ログ出力のみ）
    Noop,
}

/// 通知機能の設定
///
/// `NOTIFICATION_BACKEND` 環境変数で送信バックエンドを切り替える。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationConfig {
    /// 送信バックエンド
    pub backend:   NotificationBackend,
    /// SMTP ホスト（backend=smtp の場合に使用）
    pub smtp_host: String,
    /// SMTP ポート（backend=smtp の場合に使用）
    pub smtp_port: u16,
}

impl ExecutorConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の変数ソースから設定を読み込む
    ///
    /// 空文字列の変数は未設定として扱う。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let env = var("ENV").unwrap_or_else(|| LOCAL_ENV.to_string());
        let is_local = env == LOCAL_ENV;
        let table_name = |name: &str, entity: &str| {
            var(name).unwrap_or_else(|| format!("{entity}-table-{env}"))
        };

        let dynamodb_endpoint = var("DYNAMODB_ENDPOINT")
            .or_else(|| is_local.then(|| DEFAULT_LOCAL_DYNAMODB_ENDPOINT.to_string()));

        let backend = match var("NOTIFICATION_BACKEND") {
            Some(raw) => raw
                .parse::<NotificationBackend>()
                .map_err(|_| ConfigError::UnknownBackend(raw))?,
            None if is_local => NotificationBackend::Noop,
            None => NotificationBackend::Ses,
        };

        let smtp_port = match var("SMTP_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidPort {
                name:  "SMTP_PORT",
                value: raw,
            })?,
            None => 1025,
        };

        Ok(Self {
            user_table_name: table_name("USER_TABLE_NAME", "user"),
            receiver_table_name: table_name("RECEIVER_TABLE_NAME", "receiver"),
            event_table_name: table_name("EVENT_TABLE_NAME", "event"),
            sender_email_address: var("SENDER_EMAIL_ADDRESS")
                .unwrap_or_else(|| DEFAULT_SENDER_EMAIL_ADDRESS.to_string()),
            dynamodb_endpoint,
            notification: NotificationConfig {
                backend,
                smtp_host: var("SMTP_HOST").unwrap_or_else(|| "localhost".to_string()),
                smtp_port,
            },
            env,
        })
    }

    /// ローカル開発環境かどうか
    pub fn is_local(&self) -> bool {
        self.env == LOCAL_ENV
    }
}
