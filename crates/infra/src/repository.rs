//! # リポジトリ実装
//!
//! エンティティを不透明な文字列 ID から型付きのドメインモデルに変換する
//! リポジトリを提供する。
//!
//! ## 設計方針
//!
//! - **ストア抽象化**: [`KeyValueStore`](crate::store::KeyValueStore) 経由でアクセスし、
//!   DynamoDB 固有の通信はストア実装に閉じ込める
//! - **テーブル単位の独立性**: 参照整合性やカスケード削除は行わない
//! - **テスタビリティ**: トレイト経由でモック可能な設計

pub mod event_repository;
pub mod receiver_repository;
pub mod user_repository;

pub use event_repository::{DynamoDbEventRepository, EventRepository};
pub use receiver_repository::{DynamoDbReceiverRepository, ReceiverRepository};
pub use user_repository::{DynamoDbUserRepository, UserRepository};
