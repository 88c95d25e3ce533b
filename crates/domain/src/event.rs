//! # ケア記録イベント
//!
//! ケア受給者に対して記録されるイベント（排便、服薬、入浴、排尿、体重）を定義する。
//!
//! ## 設計方針
//!
//! - **固定の種別**: [`EventType`] は 5 種類に限定し、範囲外の種別では生成に失敗する
//! - **ビルダー**: 任意項目（タイムスタンプ、データポイント、メモ）は [`EventBuilder`] で指定
//! - **閉じた値型**: データポイントの値は [`DataValue`]（文字列 / 数値 / 真偽値）に限定
//!
//! ## 使用例
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use caregiver_domain::{
//!     event::{DataPoint, Event, EventType},
//!     receiver::ReceiverId,
//!     user::UserId,
//! };
//!
//! let event = Event::builder(ReceiverId::new(), UserId::new(), "Weight")
//!     .data_point(DataPoint::new("Weight", 120.3))
//!     .build()?;
//!
//! assert_eq!(event.event_type(), EventType::Weight);
//! assert_eq!(event.data().len(), 1);
//!
//! // 範囲外の種別はエラー
//! assert!(Event::builder(ReceiverId::new(), UserId::new(), "Nap").build().is_err());
//! # Ok(())
//! # }
//! ```

use std::str::FromStr;

use chrono::{SecondsFormat, Utc};
use strum::IntoStaticStr;

use crate::{DomainError, receiver::ReceiverId, user::UserId};

define_prefixed_id! {
    /// イベント ID（一意識別子）
    ///
    /// event テーブルのソートキー（`event_id`）。
    pub struct EventId {
        prefix: "Event",
    }
}

/// イベント種別
///
/// 文字列表現は上流システムと共有する表示名（`"Bowel Movement"` など）。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    IntoStaticStr,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum EventType {
    /// 排便
    #[strum(serialize = "Bowel Movement")]
    BowelMovement,
    /// 服薬
    Medication,
    /// 入浴
    Shower,
    /// 排尿
    Urination,
    /// 体重
    Weight,
}

impl EventType {
    /// 文字列からイベント種別をパースする
    ///
    /// # エラー
    ///
    /// サポート外の種別の場合は `DomainError::Validation` を返す。
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        Self::from_str(value).map_err(|_| {
            DomainError::Validation(format!("サポートされていないイベント種別: {value}"))
        })
    }

    /// 文字列表現を返す
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// データポイントの値
///
/// 文字列 / 数値 / 真偽値の閉じた集合。比較とシリアライズを明確にするため、
/// 任意の動的型は受け付けない。
#[derive(Debug, Clone, PartialEq, derive_more::From)]
pub enum DataValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// データポイント（名前付きの計測値）
#[derive(Debug, Clone, PartialEq)]
pub struct DataPoint {
    pub name:  String,
    pub value: DataValue,
}

impl DataPoint {
    pub fn new(name: impl Into<String>, value: impl Into<DataValue>) -> Self {
        Self {
            name:  name.into(),
            value: value.into(),
        }
    }
}

/// ケア記録イベントエンティティ
///
/// # 不変条件
///
/// - `event_type` は [`EventType`] のいずれか（範囲外の種別を持つインスタンスは存在しない）
/// - `receiver_id` / `user_id` は論理的な外部キーであり、参照整合性は検証しない
/// - `data` は挿入順を保持する
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    id:          EventId,
    receiver_id: ReceiverId,
    user_id:     UserId,
    timestamp:   String,
    event_type:  EventType,
    data:        Vec<DataPoint>,
    note:        Option<String>,
}

impl Event {
    /// イベントのビルダーを作成する
    ///
    /// 種別の検証は [`EventBuilder::build`] で行う。
    pub fn builder(
        receiver_id: ReceiverId,
        user_id: UserId,
        event_type: impl Into<String>,
    ) -> EventBuilder {
        EventBuilder {
            receiver_id,
            user_id,
            event_type: event_type.into(),
            timestamp: None,
            data: Vec::new(),
            note: None,
        }
    }

    /// 既存のデータからイベントを復元する（ストアから取得時）
    pub fn from_stored(
        id: EventId,
        receiver_id: ReceiverId,
        user_id: UserId,
        timestamp: String,
        event_type: EventType,
        data: Vec<DataPoint>,
        note: Option<String>,
    ) -> Self {
        Self {
            id,
            receiver_id,
            user_id,
            timestamp,
            event_type,
            data,
            note,
        }
    }

    // Getter メソッド

    pub fn id(&self) -> &EventId {
        &self.id
    }

    pub fn receiver_id(&self) -> &ReceiverId {
        &self.receiver_id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// RFC 3339 形式のタイムスタンプ
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn data(&self) -> &[DataPoint] {
        &self.data
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }
}

/// [`Event`] のビルダー
#[derive(Debug, Clone)]
pub struct EventBuilder {
    receiver_id: ReceiverId,
    user_id:     UserId,
    event_type:  String,
    timestamp:   Option<String>,
    data:        Vec<DataPoint>,
    note:        Option<String>,
}

impl EventBuilder {
    /// タイムスタンプを上書きする（未指定時は現在時刻）
    pub fn timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// データポイントを丸ごと設定する
    pub fn data(mut self, data: Vec<DataPoint>) -> Self {
        self.data = data;
        self
    }

    /// データポイントを 1 件追加する
    pub fn data_point(mut self, point: DataPoint) -> Self {
        self.data.push(point);
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// イベントを生成する
    ///
    /// # エラー
    ///
    /// 種別が [`EventType`] に含まれない場合は `DomainError::Validation` を返す。
    /// その場合エンティティは生成されない。
    pub fn build(self) -> Result<Event, DomainError> {
        let event_type = EventType::parse(&self.event_type)?;

        Ok(Event {
            id: EventId::new(),
            receiver_id: self.receiver_id,
            user_id: self.user_id,
            timestamp: self
                .timestamp
                .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
            event_type,
            data: self.data,
            note: self.note,
        })
    }
}
