//! # CareToSher Notification Executor
//!
//! キューから受け取った通知バッチを処理し、ケア関係者へメールを送信する。
//!
//! ## 処理の流れ
//!
//! ```text
//! QueueBatch → NotificationRouter → ReminderHandler / FeedbackHandler
//!                                       ↓
//!                          UserRepository / ReceiverRepository
//!                                       ↓
//!                     EmailService（TemplateRenderer → NotificationSender）
//! ```
//!
//! ## モジュール構成
//!
//! - [`config`] - 環境変数からの設定読み込み
//! - [`error`] - ハンドラエラー定義
//! - [`handler`] - 通知種別ごとのハンドラ
//! - [`router`] - バッチの振り分けと集計
//! - [`usecase`] - メールのレンダリングと送信

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod usecase;
