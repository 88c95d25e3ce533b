//! # テスト用モック
//!
//! リポジトリ・ハンドラのテストで使用するインメモリのストアとメール送信。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! caregiver-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use caregiver_domain::notification::{EmailMessage, NotificationError};

use crate::{
    InfraError,
    notification::NotificationSender,
    store::{Item, KeyValueStore},
};

// ===== MockKeyValueStore =====

/// インメモリの KeyValueStore
///
/// テーブルごとにアイテムを挿入順で保持する。`with_key_schema` で主キーを
/// 登録したテーブルでは、同じキーの `put_item` が既存アイテムを置き換える。
/// インデックス検索・パーティション検索はいずれも属性の等価比較で行う。
#[derive(Clone, Default)]
pub struct MockKeyValueStore {
    tables:      Arc<Mutex<HashMap<String, Vec<Item>>>>,
    key_schemas: Arc<Mutex<HashMap<String, Vec<String>>>>,
    failure:     Option<String>,
}

impl MockKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// すべての操作が DynamoDB エラーを返すストアを作成する
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// テーブルの主キー属性を登録する
    pub fn with_key_schema(self, table: &str, key_attributes: &[&str]) -> Self {
        self.key_schemas.lock().unwrap().insert(
            table.to_string(),
            key_attributes.iter().map(|a| a.to_string()).collect(),
        );
        self
    }

    /// 変換を経由せずにアイテムを直接格納する（不正データのテスト用）
    pub fn insert_raw(&self, table: &str, item: Item) {
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(item);
    }

    /// テーブルの全アイテムを取得する
    pub fn items(&self, table: &str) -> Vec<Item> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    fn check_failure(&self) -> Result<(), InfraError> {
        match &self.failure {
            Some(message) => Err(InfraError::dynamo_db(message.clone())),
            None => Ok(()),
        }
    }

    fn find_all(&self, table: &str, attribute: &str, value: &str) -> Vec<Item> {
        let expected = AttributeValue::S(value.to_string());
        self.items(table)
            .into_iter()
            .filter(|item| item.get(attribute) == Some(&expected))
            .collect()
    }
}

fn matches_key(item: &Item, key: &Item) -> bool {
    key.iter().all(|(name, value)| item.get(name) == Some(value))
}

#[async_trait]
impl KeyValueStore for MockKeyValueStore {
    async fn put_item(&self, table: &str, item: Item) -> Result<(), InfraError> {
        self.check_failure()?;

        let key_attributes = self
            .key_schemas
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default();
        let key: Item = key_attributes
            .iter()
            .filter_map(|name| item.get(name).map(|v| (name.clone(), v.clone())))
            .collect();

        let mut tables = self.tables.lock().unwrap();
        let items = tables.entry(table.to_string()).or_default();
        if !key.is_empty() {
            items.retain(|existing| !matches_key(existing, &key));
        }
        items.push(item);
        Ok(())
    }

    async fn get_item(&self, table: &str, key: Item) -> Result<Option<Item>, InfraError> {
        self.check_failure()?;
        Ok(self
            .items(table)
            .into_iter()
            .find(|item| matches_key(item, &key)))
    }

    async fn query_index(
        &self,
        table: &str,
        _index: &str,
        attribute: &str,
        value: &str,
    ) -> Result<Vec<Item>, InfraError> {
        self.check_failure()?;
        Ok(self.find_all(table, attribute, value))
    }

    async fn query_partition(
        &self,
        table: &str,
        attribute: &str,
        value: &str,
    ) -> Result<Vec<Item>, InfraError> {
        self.check_failure()?;
        Ok(self.find_all(table, attribute, value))
    }

    async fn delete_item(&self, table: &str, key: Item) -> Result<(), InfraError> {
        self.check_failure()?;
        if let Some(items) = self.tables.lock().unwrap().get_mut(table) {
            items.retain(|item| !matches_key(item, &key));
        }
        Ok(())
    }
}

// ===== MockNotificationSender =====

/// 送信したメールを記録するモック
#[derive(Clone, Default)]
pub struct MockNotificationSender {
    sent:    Arc<Mutex<Vec<EmailMessage>>>,
    failure: Option<String>,
}

impl MockNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// 常に送信失敗するモックを作成する
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// 送信済みメールを取得する
    pub fn sent_emails(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSender for MockNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<String, NotificationError> {
        if let Some(message) = &self.failure {
            return Err(NotificationError::SendFailed(message.clone()));
        }

        let mut sent = self.sent.lock().unwrap();
        sent.push(email.clone());
        Ok(format!("mock-{}", sent.len()))
    }
}
