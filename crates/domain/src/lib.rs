//! # CareToSher ドメイン層
//!
//! 通知エグゼキュータが扱うドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **エンティティ**: プレフィックス付き ID を持つオブジェクト（User, Receiver, Event）
//! - **値オブジェクト**: 識別子を持たない不変オブジェクト（EventType, DataValue,
//!   Relationship）
//! - **ドメインエラー**: ビジネスルール違反を表現するエラー型
//!
//! ## 依存関係の方向
//!
//! ```text
//! notification-executor → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（DynamoDB、SES）には一切依存しない。
//!
//! ## モジュール構成
//!
//! - [`error`] - ドメイン層で発生するエラーの定義
//! - [`user`] - ケアを提供するユーザー
//! - [`receiver`] - ケアを受ける人（ケア受給者）
//! - [`event`] - ケア記録（排便、服薬、入浴など）
//! - [`relationship`] - ユーザーと受給者の関係（上流システムが解決済み）
//! - [`notification`] - 通知エンベロープとメールメッセージ
//!
//! ## 使用例
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use caregiver_domain::{event::Event, receiver::Receiver, user::User};
//!
//! let user = User::new("jane@example.com", "Jane", "Doe");
//! let receiver = Receiver::new("John", "Doe");
//!
//! let event = Event::builder(receiver.id().clone(), user.id().clone(), "Shower")
//!     .note("午前中に実施")
//!     .build()?;
//!
//! assert!(event.id().as_str().starts_with("Event#"));
//! # Ok(())
//! # }
//! ```

#[macro_use]
mod macros;

pub mod error;
pub mod event;
pub mod notification;
pub mod receiver;
pub mod relationship;
pub mod user;

pub use error::DomainError;
