//! # 通知ルーター
//!
//! キューのバッチを 1 レコードずつ処理し、通知種別に応じたハンドラへ振り分ける。
//!
//! ## 設計方針
//!
//! - **バッチは失敗させない**: デコード失敗やハンドラエラーはレコード単位でログ出力して続行する
//! - **逐次処理**: 前のレコードの処理を待ってから次のレコードに進む
//! - **チャネルゲート**: `reminder` は `email` チャネル指定時のみ、`feedback` は常に処理する
//!
//! ## 集計
//!
//! | 区分 | 内容 |
//! |------|------|
//! | `dispatched` | メールを送信した |
//! | `skipped` | 未知の種別、チャネル不一致、受信設定による抑止 |
//! | `failed` | エンベロープのデコード失敗、ハンドラエラー |

use std::sync::Arc;

use caregiver_domain::notification::{EMAIL_CHANNEL, NotificationEnvelope, NotificationType};
use caregiver_shared::{
    event_log::{self, event},
    log_business_event,
};
use serde::{Deserialize, Serialize};

use crate::handler::{Dispatch, NotificationHandler};

/// キューのバッチ（SQS イベント形式）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueBatch {
    #[serde(rename = "Records", default)]
    pub records: Vec<QueueRecord>,
}

/// キューのレコード
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueRecord {
    #[serde(rename = "messageId", default)]
    pub message_id: String,
    #[serde(default)]
    pub body:       String,
}

/// バッチの処理結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total:      usize,
    pub dispatched: usize,
    pub skipped:    usize,
    pub failed:     usize,
}

/// レコード単位の処理結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordOutcome {
    Dispatched,
    Skipped,
    Failed,
}

impl BatchSummary {
    fn record(&mut self, outcome: RecordOutcome) {
        self.total += 1;
        match outcome {
            RecordOutcome::Dispatched => self.dispatched += 1,
            RecordOutcome::Skipped => self.skipped += 1,
            RecordOutcome::Failed => self.failed += 1,
        }
    }
}

/// 通知ルーター
pub struct NotificationRouter {
    reminder: Arc<dyn NotificationHandler>,
    feedback: Arc<dyn NotificationHandler>,
}

impl NotificationRouter {
    pub fn new(
        reminder: Arc<dyn NotificationHandler>,
        feedback: Arc<dyn NotificationHandler>,
    ) -> Self {
        Self { reminder, feedback }
    }

    /// JSON 文字列のバッチを処理する
    ///
    /// バッチ自体をデコードできない場合もエラーにせず、ログ出力して空の集計を返す。
    pub async fn handle_input(&self, input: &str) -> BatchSummary {
        match serde_json::from_str::<QueueBatch>(input) {
            Ok(batch) => self.handle_batch(&batch).await,
            Err(e) => {
                tracing::error!(
                    error.category = event_log::error::category::INPUT,
                    error.kind = event_log::error::kind::DECODE,
                    event.entity_type = event::entity_type::QUEUE_BATCH,
                    error = %e,
                    "通知バッチのデコードに失敗"
                );
                BatchSummary::default()
            }
        }
    }

    /// バッチを処理する
    ///
    /// 個々のレコードの失敗はバッチの結果に影響しない。
    pub async fn handle_batch(&self, batch: &QueueBatch) -> BatchSummary {
        let mut summary = BatchSummary::default();

        for record in &batch.records {
            summary.record(self.handle_record(record).await);
        }

        log_business_event!(
            event.category = event::category::NOTIFICATION,
            event.action = event::action::BATCH_COMPLETED,
            event.entity_type = event::entity_type::QUEUE_BATCH,
            event.result = event::result::SUCCESS,
            batch.total = summary.total,
            batch.dispatched = summary.dispatched,
            batch.skipped = summary.skipped,
            batch.failed = summary.failed,
            "バッチ処理完了"
        );

        summary
    }

    #[tracing::instrument(skip_all, fields(message_id = %record.message_id))]
    async fn handle_record(&self, record: &QueueRecord) -> RecordOutcome {
        let envelope: NotificationEnvelope = match serde_json::from_str(&record.body) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::error!(
                    error.category = event_log::error::category::INPUT,
                    error.kind = event_log::error::kind::DECODE,
                    event.entity_type = event::entity_type::QUEUE_RECORD,
                    error = %e,
                    "通知エンベロープのデコードに失敗"
                );
                return RecordOutcome::Failed;
            }
        };

        let Some(notification_type) = envelope.kind() else {
            tracing::warn!(
                notification_type = %envelope.notification_type,
                "未知の通知種別のためスキップします"
            );
            return RecordOutcome::Skipped;
        };

        let handler = match notification_type {
            NotificationType::Reminder if !envelope.has_channel(EMAIL_CHANNEL) => {
                tracing::info!(
                    notification_type = %notification_type,
                    channel = ?envelope.channel,
                    "メールチャネルが指定されていないためスキップします"
                );
                return RecordOutcome::Skipped;
            }
            NotificationType::Reminder => &self.reminder,
            NotificationType::Feedback => &self.feedback,
        };

        match handler.handle(&envelope).await {
            Ok(Dispatch::Sent { .. }) => RecordOutcome::Dispatched,
            Ok(Dispatch::Suppressed) => RecordOutcome::Skipped,
            Err(e) => {
                let span_trace = e.span_trace();
                tracing::error!(
                    error.category = e.log_category(),
                    error.kind = e.log_kind(),
                    notification_type = %notification_type,
                    error = %e,
                    span_trace = span_trace.as_deref(),
                    "通知の処理に失敗"
                );
                RecordOutcome::Failed
            }
        }
    }
}
