//! # CareToSher インフラ層
//!
//! 外部システムとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 設計方針
//!
//! このクレートはエンティティストアとメール送信の具体的な実装を提供する。
//! 外部システムの詳細をカプセル化し、ドメイン層をインフラの変更から保護する。
//!
//! ## 責務
//!
//! - **エンティティストア**: DynamoDB への接続と [`store::KeyValueStore`] 実装
//! - **リポジトリ実装**: User / Receiver / Event の永続化
//! - **メール送信**: SES / SMTP / Noop の [`notification::NotificationSender`] 実装
//!
//! ## 依存関係
//!
//! ```text
//! notification-executor → infra → domain
//!                  ↘
//!                   shared
//! ```
//!
//! ## モジュール構成
//!
//! - [`dynamodb`] - DynamoDB 接続管理とストア実装
//! - [`error`] - インフラ層エラー定義
//! - [`notification`] - メール送信
//! - [`repository`] - リポジトリ実装
//! - [`store`] - キーバリューストア抽象
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use caregiver_infra::{
//!     dynamodb::{self, DynamoDbStore},
//!     repository::{DynamoDbUserRepository, UserRepository},
//! };
//!
//! async fn setup() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = dynamodb::create_client(Some("http://localhost:8000")).await;
//!     let store = Arc::new(DynamoDbStore::new(client));
//!     let users = DynamoDbUserRepository::new(store, "user-table-local");
//!
//!     let user = users.find_by_email("jane@example.com").await?;
//!     Ok(())
//! }
//! ```

pub mod dynamodb;
pub mod error;
mod item;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod notification;
pub mod repository;
pub mod store;

pub use error::{InfraError, InfraErrorKind};
