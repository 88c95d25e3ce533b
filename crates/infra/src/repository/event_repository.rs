//! # EventRepository
//!
//! ケア記録イベントの永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **PK = `receiver_id`, SK = `event_id`**: 受給者単位でイベントをまとめて取得する
//! - **データポイント**: `data` は `{name: S, value: S | N | BOOL}` の Map のリスト
//! - **メモ**: `note` は値がある場合のみ書き込む

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use caregiver_domain::{
    event::{DataPoint, DataValue, Event, EventId, EventType},
    receiver::ReceiverId,
    user::UserId,
};

use crate::{
    InfraError,
    item::{get_list, get_opt_s, get_s, put_s, type_mismatch},
    store::{Item, KeyValueStore, string_key},
};

const ENTITY: &str = "Event";

/// イベントリポジトリトレイト
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// イベントを作成する（同じキーが存在する場合は上書き）
    ///
    /// # エラー
    ///
    /// データポイントに非有限の数値が含まれる場合は `InfraErrorKind::Serialization`。
    async fn create(&self, event: &Event) -> Result<(), InfraError>;

    /// 受給者の全イベントを取得する（ストアの返却順）
    async fn find_by_receiver(&self, receiver_id: &ReceiverId) -> Result<Vec<Event>, InfraError>;

    /// イベントを削除する（存在しなくても成功）
    async fn delete(&self, receiver_id: &ReceiverId, event_id: &EventId) -> Result<(), InfraError>;
}

/// DynamoDB 形式のアイテムで格納する EventRepository
pub struct DynamoDbEventRepository {
    store:      Arc<dyn KeyValueStore>,
    table_name: String,
}

impl DynamoDbEventRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, table_name: impl Into<String>) -> Self {
        Self {
            store,
            table_name: table_name.into(),
        }
    }
}

#[async_trait]
impl EventRepository for DynamoDbEventRepository {
    #[tracing::instrument(
        skip_all,
        level = "debug",
        fields(event_id = %event.id(), receiver_id = %event.receiver_id())
    )]
    async fn create(&self, event: &Event) -> Result<(), InfraError> {
        let item = event_to_item(event)?;

        tracing::info!(table = %self.table_name, "イベントを登録します");

        self.store.put_item(&self.table_name, item).await?;

        tracing::info!(table = %self.table_name, "イベントを登録しました");
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%receiver_id))]
    async fn find_by_receiver(&self, receiver_id: &ReceiverId) -> Result<Vec<Event>, InfraError> {
        tracing::info!(table = %self.table_name, "受給者のイベントを取得します");

        let items = self
            .store
            .query_partition(&self.table_name, "receiver_id", receiver_id.as_str())
            .await?;

        tracing::info!(
            table = %self.table_name,
            count = items.len(),
            "受給者のイベントを取得しました"
        );

        items.iter().map(item_to_event).collect()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%receiver_id, %event_id))]
    async fn delete(&self, receiver_id: &ReceiverId, event_id: &EventId) -> Result<(), InfraError> {
        tracing::info!(table = %self.table_name, "イベントを削除します");

        self.store
            .delete_item(
                &self.table_name,
                string_key([
                    ("receiver_id", receiver_id.as_str()),
                    ("event_id", event_id.as_str()),
                ]),
            )
            .await?;

        tracing::info!(table = %self.table_name, "イベントを削除しました");
        Ok(())
    }
}

fn event_to_item(event: &Event) -> Result<Item, InfraError> {
    let mut item = Item::new();
    put_s(&mut item, "receiver_id", event.receiver_id().as_str());
    put_s(&mut item, "event_id", event.id().as_str());
    put_s(&mut item, "user_id", event.user_id().as_str());
    put_s(&mut item, "timestamp", event.timestamp());
    put_s(&mut item, "type", event.event_type().as_str());

    let data = event
        .data()
        .iter()
        .map(data_point_to_attribute)
        .collect::<Result<Vec<_>, _>>()?;
    item.insert("data".to_string(), AttributeValue::L(data));

    if let Some(note) = event.note() {
        put_s(&mut item, "note", note);
    }

    Ok(item)
}

fn data_point_to_attribute(point: &DataPoint) -> Result<AttributeValue, InfraError> {
    let value = match &point.value {
        DataValue::Text(text) => AttributeValue::S(text.clone()),
        DataValue::Number(number) if number.is_finite() => AttributeValue::N(number.to_string()),
        DataValue::Number(number) => {
            return Err(InfraError::serialization(format!(
                "データポイント '{}' の数値を格納できません: {number}",
                point.name
            )));
        }
        DataValue::Bool(flag) => AttributeValue::Bool(*flag),
    };

    Ok(AttributeValue::M(HashMap::from([
        ("name".to_string(), AttributeValue::S(point.name.clone())),
        ("value".to_string(), value),
    ])))
}

fn item_to_event(item: &Item) -> Result<Event, InfraError> {
    let raw_type = get_s(item, ENTITY, "type")?;
    let event_type = EventType::parse(&raw_type)
        .map_err(|e| InfraError::deserialization(ENTITY, e.to_string()))?;

    let data = get_list(item, ENTITY, "data")?
        .iter()
        .map(attribute_to_data_point)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Event::from_stored(
        EventId::from_string(get_s(item, ENTITY, "event_id")?),
        ReceiverId::from_string(get_s(item, ENTITY, "receiver_id")?),
        UserId::from_string(get_s(item, ENTITY, "user_id")?),
        get_s(item, ENTITY, "timestamp")?,
        event_type,
        data,
        get_opt_s(item, ENTITY, "note")?,
    ))
}

fn attribute_to_data_point(attribute: &AttributeValue) -> Result<DataPoint, InfraError> {
    let AttributeValue::M(map) = attribute else {
        return Err(type_mismatch(ENTITY, "data[]", "M", attribute));
    };

    let name = get_s(map, ENTITY, "name")?;
    let value = match map.get("value") {
        Some(AttributeValue::S(text)) => DataValue::Text(text.clone()),
        Some(AttributeValue::N(raw)) => DataValue::Number(raw.parse().map_err(|_| {
            InfraError::deserialization(
                ENTITY,
                format!("データポイント '{name}' の数値が不正です: {raw}"),
            )
        })?),
        Some(AttributeValue::Bool(flag)) => DataValue::Bool(*flag),
        Some(other) => return Err(type_mismatch(ENTITY, "data[].value", "S | N | BOOL", other)),
        None => {
            return Err(InfraError::deserialization(
                ENTITY,
                format!("データポイント '{name}' に値がありません"),
            ));
        }
    };

    Ok(DataPoint { name, value })
}
