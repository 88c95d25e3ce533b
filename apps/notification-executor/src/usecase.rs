//! # ユースケース層
//!
//! 通知エグゼキュータのビジネスロジックを実装する。
//!
//! ## モジュール構成
//!
//! - `notification`: メール通知のレンダリングと送信

pub mod notification;
