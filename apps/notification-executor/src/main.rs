//! # Notification Executor
//!
//! 標準入力から SQS イベント形式の通知バッチを 1 つ読み込み、処理して終了する。
//! 設定エラー以外は終了コード 0 で終わる。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `ENV` | No | 実行環境（デフォルト: `local`） |
//! | `USER_TABLE_NAME` | No | ユーザーテーブル名（デフォルト: `user-table-<ENV>`） |
//! | `RECEIVER_TABLE_NAME` | No | 受給者テーブル名（デフォルト: `receiver-table-<ENV>`） |
//! | `EVENT_TABLE_NAME` | No | イベントテーブル名（デフォルト: `event-table-<ENV>`） |
//! | `SENDER_EMAIL_ADDRESS` | No | 送信元アドレス（デフォルト: `support@caretosher.com`） |
//! | `DYNAMODB_ENDPOINT` | No | DynamoDB エンドポイント（`ENV=local` では `http://localhost:8000`） |
//! | `NOTIFICATION_BACKEND` | No | `ses` / `smtp` / `noop` |
//! | `SMTP_HOST` / `SMTP_PORT` | No | SMTP 接続先（デフォルト: `localhost:1025`） |
//! | `LOG_FORMAT` | No | `json` / `pretty` |
//!
//! ## 起動方法
//!
//! ```bash
//! cat batch.json | cargo run -p caregiver-notification-executor
//! ```

use std::sync::Arc;

use anyhow::Context as _;
use caregiver_infra::{
    dynamodb::{self, DynamoDbStore},
    notification::{
        NoopNotificationSender,
        NotificationSender,
        SesNotificationSender,
        SmtpNotificationSender,
    },
    repository::{DynamoDbReceiverRepository, DynamoDbUserRepository},
    store::KeyValueStore,
};
use caregiver_notification_executor::{
    config::{ExecutorConfig, NotificationBackend},
    handler::{FeedbackHandler, ReminderHandler},
    router::NotificationRouter,
    usecase::notification::{EmailService, TemplateRenderer},
};
use caregiver_shared::observability::{TracingConfig, init_tracing, service_span};
use tokio::io::AsyncReadExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在しなくてもエラーにしない）
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env("notification-executor");
    init_tracing(tracing_config.clone());
    let _tracing_guard = service_span(&tracing_config).entered();

    let config = ExecutorConfig::from_env().context("設定の読み込みに失敗しました")?;
    tracing::info!(
        env = %config.env,
        backend = %config.notification.backend,
        user_table = %config.user_table_name,
        receiver_table = %config.receiver_table_name,
        event_table = %config.event_table_name,
        "Notification Executor を初期化します"
    );

    let client = dynamodb::create_client(config.dynamodb_endpoint.as_deref()).await;
    let store: Arc<dyn KeyValueStore> = Arc::new(DynamoDbStore::new(client));

    let users = Arc::new(DynamoDbUserRepository::new(
        store.clone(),
        &config.user_table_name,
    ));
    let receivers = Arc::new(DynamoDbReceiverRepository::new(
        store,
        &config.receiver_table_name,
    ));

    let sender = build_sender(&config).await;
    let renderer = TemplateRenderer::new().context("テンプレートの初期化に失敗しました")?;
    let email = Arc::new(EmailService::new(sender, renderer));

    let router = NotificationRouter::new(
        Arc::new(ReminderHandler::new(users, receivers, email.clone())),
        Arc::new(FeedbackHandler::new(email)),
    );

    // 入力の不備で呼び出し元にエラーを返さない（再配信はキュー側の責務）
    let mut input = String::new();
    if let Err(e) = tokio::io::stdin().read_to_string(&mut input).await {
        tracing::error!(error = %e, "標準入力の読み込みに失敗");
    }

    let summary = router.handle_input(&input).await;
    tracing::info!(?summary, "Notification Executor を終了します");

    Ok(())
}

/// 設定に応じた送信バックエンドを構築する
async fn build_sender(config: &ExecutorConfig) -> Arc<dyn NotificationSender> {
    let from_address = config.sender_email_address.clone();

    match config.notification.backend {
        NotificationBackend::Ses => {
            let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
            let client = aws_sdk_sesv2::Client::new(&aws_config);
            Arc::new(SesNotificationSender::new(client, from_address))
        }
        NotificationBackend::Smtp => Arc::new(SmtpNotificationSender::new(
            &config.notification.smtp_host,
            config.notification.smtp_port,
            from_address,
        )),
        NotificationBackend::Noop => Arc::new(NoopNotificationSender),
    }
}
