//! # Observability 基盤
//!
//! Notification Executor のトレーシング初期化を提供する。
//!
//! ## 出力形式の決定
//!
//! | `LOG_FORMAT` | Lambda 上（`AWS_LAMBDA_FUNCTION_NAME` あり） | それ以外 |
//! |---|---|---|
//! | `json` | JSON | JSON |
//! | `pretty` | Pretty | Pretty |
//! | 未設定・不正 | JSON | Pretty |
//!
//! CloudWatch Logs Insights で検索できるよう、Lambda 上では明示しない限り JSON を使う。
//!
//! ## JSON ログのフィールド
//!
//! | フィールド | 出力元 |
//! |---|---|
//! | `timestamp`, `level`, `target`, `message` | 全イベント |
//! | `span.name`, `span.service`, `span.function` | [`service_span`] |
//! | `span.message_id` | ルーターのレコード単位スパン |
//! | `event.kind`, `event.category`, `event.action`, `event.result` | `log_business_event!` |
//! | `notification.notification_type`, `notification.recipient`, `notification.message_id` | 送信結果イベント |
//! | `batch.total`, `batch.dispatched`, `batch.skipped`, `batch.failed` | バッチ完了イベント |
//! | `error.category`, `error.kind`, `error`, `span_trace` | レコード処理の失敗 |

/// Lambda 上で実行中かを判定する環境変数
pub const LAMBDA_FUNCTION_ENV: &str = "AWS_LAMBDA_FUNCTION_NAME";

/// `RUST_LOG` 未設定時のフィルタ
pub const DEFAULT_FILTER: &str = "info,caregiver=debug";

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON 形式（CloudWatch Logs 向け）
    Json,
    /// 人間が読みやすい形式（ローカル開発向け）
    Pretty,
}

impl LogFormat {
    /// 文字列からログ形式をパースする（`json` / `pretty` のみ）
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "json" => Some(Self::Json),
            "pretty" => Some(Self::Pretty),
            _ => None,
        }
    }

    /// 実行環境の既定形式
    pub fn platform_default(in_lambda: bool) -> Self {
        if in_lambda { Self::Json } else { Self::Pretty }
    }

    /// `LOG_FORMAT` の値と実行環境から出力形式を決める
    ///
    /// 不正な値は stderr に警告し、実行環境の既定形式にフォールバックする。
    /// subscriber 初期化前に呼ばれるため警告は `eprintln!` で出す。
    pub fn resolve(raw: Option<&str>, in_lambda: bool) -> Self {
        let fallback = Self::platform_default(in_lambda);
        match raw {
            Some(value) => Self::parse(value).unwrap_or_else(|| {
                eprintln!("WARNING: unknown LOG_FORMAT={value:?}, falling back to {fallback:?}");
                fallback
            }),
            None => fallback,
        }
    }
}

/// トレーシング初期化設定
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// サービス名（JSON ログの `span.service`）
    pub service_name:    String,
    /// Lambda 関数名（JSON ログの `span.function`、Lambda 外では `None`）
    pub lambda_function: Option<String>,
    /// ログ出力形式
    pub log_format:      LogFormat,
}

impl TracingConfig {
    pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            service_name: service_name.into(),
            lambda_function: None,
            log_format,
        }
    }

    /// 環境変数（`LOG_FORMAT`, `AWS_LAMBDA_FUNCTION_NAME`）から設定を読み取る
    pub fn from_env(service_name: impl Into<String>) -> Self {
        Self::from_lookup(service_name, |name| std::env::var(name).ok())
    }

    /// 任意の変数ソースから設定を読み取る
    pub fn from_lookup(
        service_name: impl Into<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let lambda_function = lookup(LAMBDA_FUNCTION_ENV).filter(|name| !name.is_empty());
        let log_format = LogFormat::resolve(
            lookup("LOG_FORMAT").as_deref(),
            lambda_function.is_some(),
        );

        Self {
            service_name: service_name.into(),
            lambda_function,
            log_format,
        }
    }
}

/// トレーシングを初期化する
///
/// `RUST_LOG` でフィルタを上書きできる（未設定時は [`DEFAULT_FILTER`]）。
/// `tracing_error::ErrorLayer` を登録し、`InfraError` の SpanTrace に
/// リポジトリ呼び出しのスパンが残るようにする。
#[cfg(feature = "observability")]
pub fn init_tracing(config: TracingConfig) {
    use tracing_subscriber::{Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_FILTER.into());

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_target(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        // CloudWatch はエスケープシーケンスを解釈しない
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .with_ansi(config.lambda_function.is_none())
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(tracing_error::ErrorLayer::default())
        .init();
}

/// サービス名と Lambda 関数名を持つルートスパンを作成する
pub fn service_span(config: &TracingConfig) -> tracing::Span {
    tracing::info_span!(
        "app",
        service = %config.service_name,
        function = config.lambda_function.as_deref(),
    )
}
