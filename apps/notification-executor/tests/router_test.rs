//! 通知バッチのエンドツーエンドテスト
//!
//! インメモリのストアと送信モックを使い、ルーター → ハンドラ → リポジトリ →
//! テンプレート → 送信までを通しで検証する。

use std::sync::Arc;

use caregiver_domain::{receiver::Receiver, user::User};
use caregiver_infra::{
    mock::{MockKeyValueStore, MockNotificationSender},
    repository::{
        DynamoDbReceiverRepository,
        DynamoDbUserRepository,
        ReceiverRepository,
        UserRepository,
    },
};
use caregiver_notification_executor::{
    handler::{FeedbackHandler, ReminderHandler},
    router::{BatchSummary, NotificationRouter, QueueBatch, QueueRecord},
    usecase::notification::{EmailService, TemplateRenderer},
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

const USER_TABLE: &str = "user-table-test";
const RECEIVER_TABLE: &str = "receiver-table-test";

struct TestApp {
    router:   NotificationRouter,
    sender:   Arc<MockNotificationSender>,
    user:     User,
    receiver: Receiver,
}

async fn setup() -> TestApp {
    let store = Arc::new(
        MockKeyValueStore::new()
            .with_key_schema(USER_TABLE, &["user_id"])
            .with_key_schema(RECEIVER_TABLE, &["receiver_id"]),
    );
    let users = Arc::new(DynamoDbUserRepository::new(store.clone(), USER_TABLE));
    let receivers = Arc::new(DynamoDbReceiverRepository::new(store, RECEIVER_TABLE));

    let user = User::new("jane@example.com", "Jane", "Doe");
    let receiver = Receiver::new("John", "Smith");
    users.create(&user).await.unwrap();
    receivers.create(&receiver).await.unwrap();

    let sender = Arc::new(MockNotificationSender::new());
    let email = Arc::new(EmailService::new(
        sender.clone(),
        TemplateRenderer::new().unwrap(),
    ));
    let router = NotificationRouter::new(
        Arc::new(ReminderHandler::new(users, receivers, email.clone())),
        Arc::new(FeedbackHandler::new(email)),
    );

    TestApp {
        router,
        sender,
        user,
        receiver,
    }
}

fn batch(bodies: Vec<String>) -> QueueBatch {
    QueueBatch {
        records: bodies
            .into_iter()
            .enumerate()
            .map(|(i, body)| QueueRecord {
                message_id: format!("message-{}", i + 1),
                body,
            })
            .collect(),
    }
}

fn reminder_body(app: &TestApp, channel: &[&str], enabled: bool) -> String {
    json!({
        "notification_type": "reminder",
        "channel": channel,
        "relationship": {
            "userId": app.user.id().as_str(),
            "receiverId": app.receiver.id().as_str(),
            "emailNotifications": enabled
        }
    })
    .to_string()
}

fn feedback_body(email: &str, message: &str) -> String {
    json!({
        "notification_type": "feedback",
        "channel": [],
        "execution_data": { "email": email, "message": message }
    })
    .to_string()
}

#[tokio::test]
async fn emailチャネルのリマインダーはユーザーに1通送信される() {
    let app = setup().await;

    let summary = app
        .router
        .handle_batch(&batch(vec![reminder_body(&app, &["email"], true)]))
        .await;

    let sent = app.sender.sent_emails();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "jane@example.com");
    assert_eq!(sent[0].subject, "CareToSher Notification: Reminder - John");
    assert!(sent[0].html_body.contains("John"));
    assert!(sent[0].text_body.contains("John"));
    assert_eq!(summary.dispatched, 1);
}

#[rstest]
#[case(&["sms"], true)]
#[case(&[], true)]
#[case(&["email"], false)]
#[tokio::test]
async fn 送信条件を満たさないリマインダーは送信されない(
    #[case] channel: &[&str],
    #[case] enabled: bool,
) {
    let app = setup().await;

    let summary = app
        .router
        .handle_batch(&batch(vec![reminder_body(&app, channel, enabled)]))
        .await;

    assert!(app.sender.sent_emails().is_empty());
    assert_eq!(
        summary,
        BatchSummary {
            total:      1,
            dispatched: 0,
            skipped:    1,
            failed:     0,
        }
    );
}

#[tokio::test]
async fn 不正なレコードを挟んでも前後のレコードは処理される() {
    let app = setup().await;
    let bodies = vec![
        reminder_body(&app, &["email"], true),
        "this is not json".to_string(),
        feedback_body("a@b.com", "hi"),
    ];

    let summary = app.router.handle_batch(&batch(bodies)).await;

    let recipients: Vec<String> = app
        .sender
        .sent_emails()
        .into_iter()
        .map(|email| email.to)
        .collect();
    assert_eq!(recipients, vec!["jane@example.com", "a@b.com"]);
    assert_eq!(
        summary,
        BatchSummary {
            total:      3,
            dispatched: 2,
            skipped:    0,
            failed:     1,
        }
    );
}

#[tokio::test]
async fn フィードバックは指定アドレスに送信される() {
    let app = setup().await;

    app.router
        .handle_batch(&batch(vec![feedback_body("a@b.com", "hi")]))
        .await;

    let sent = app.sender.sent_emails();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "a@b.com");
    assert_eq!(sent[0].subject, "You received feedback");
    assert!(sent[0].html_body.contains("hi"));
}

#[tokio::test]
async fn channelがnullのフィードバックも送信される() {
    let app = setup().await;
    let body = json!({
        "notification_type": "feedback",
        "channel": null,
        "execution_data": { "email": "a@b.com", "message": "hi" }
    })
    .to_string();

    let summary = app.router.handle_batch(&batch(vec![body])).await;

    let sent = app.sender.sent_emails();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "a@b.com");
    assert_eq!(summary.dispatched, 1);
    assert_eq!(summary.failed, 0);
}

#[tokio::test]
async fn notification_typeがnullのレコードはスキップされる() {
    let app = setup().await;
    let body = json!({ "notification_type": null, "channel": ["email"] }).to_string();

    let summary = app.router.handle_batch(&batch(vec![body])).await;

    assert!(app.sender.sent_emails().is_empty());
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.failed, 0);
}

#[tokio::test]
async fn 存在しないユーザーへのリマインダーは失敗として集計される() {
    let app = setup().await;
    let body = json!({
        "notification_type": "reminder",
        "channel": ["email"],
        "relationship": {
            "userId": "User#missing",
            "receiverId": app.receiver.id().as_str(),
            "emailNotifications": true
        }
    })
    .to_string();

    let summary = app.router.handle_batch(&batch(vec![body])).await;

    assert!(app.sender.sent_emails().is_empty());
    assert_eq!(summary.failed, 1);
}

#[tokio::test]
async fn sqsイベントのjsonからバッチを処理できる() {
    let app = setup().await;
    let event = json!({
        "Records": [
            { "messageId": "m-1", "body": feedback_body("a@b.com", "hello there") },
            { "messageId": "m-2", "body": json!({ "notification_type": "digest" }).to_string() }
        ]
    });
    let batch: QueueBatch = serde_json::from_value(event).unwrap();

    let summary = app.router.handle_batch(&batch).await;

    assert_eq!(
        summary,
        BatchSummary {
            total:      2,
            dispatched: 1,
            skipped:    1,
            failed:     0,
        }
    );
}
