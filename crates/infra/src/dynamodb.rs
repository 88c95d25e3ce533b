//! # DynamoDB 接続管理
//!
//! Amazon DynamoDB への接続と [`KeyValueStore`] 実装を提供する。
//!
//! ## 設計方針
//!
//! - **ローカル開発**: DynamoDB Local を使用（エンドポイント指定時はダミー認証情報）
//! - **本番環境**: デフォルトの認証情報プロバイダ（IAM ロール）で Amazon DynamoDB に接続
//! - **ページング**: Query は `LastEvaluatedKey` がなくなるまで続けて取得する
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use caregiver_infra::dynamodb::{self, DynamoDbStore};
//!
//! async fn setup() {
//!     let client = dynamodb::create_client(Some("http://localhost:8000")).await;
//!     let store = Arc::new(DynamoDbStore::new(client));
//! }
//! ```

use async_trait::async_trait;
use aws_sdk_dynamodb::{Client, types::AttributeValue};

use crate::{
    InfraError,
    store::{Item, KeyValueStore},
};

/// DynamoDB Local 接続時のリージョン
const LOCAL_REGION: &str = "us-east-1";

/// DynamoDB クライアントを作成する
///
/// # 引数
///
/// * `endpoint` - DynamoDB Local のエンドポイント URL（例: `http://localhost:8000`）。
///   `None` の場合は環境のデフォルト設定（リージョン・認証情報）を使用する。
pub async fn create_client(endpoint: Option<&str>) -> Client {
    let config = match endpoint {
        Some(endpoint) => {
            aws_config::defaults(aws_config::BehaviorVersion::latest())
                .endpoint_url(endpoint)
                .region(aws_config::Region::new(LOCAL_REGION))
                // DynamoDB Local はクレデンシャルを検証しないが、SDK はプロバイダが必要
                .credentials_provider(aws_sdk_dynamodb::config::Credentials::new(
                    "local", "local", None, None, "local",
                ))
                .load()
                .await
        }
        None => aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await,
    };

    Client::new(&config)
}

/// DynamoDB 実装の KeyValueStore
#[derive(Clone)]
pub struct DynamoDbStore {
    client: Client,
}

impl DynamoDbStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// 等価条件の Query をページングしながら全件取得する
    async fn query_all(
        &self,
        table: &str,
        index: Option<&str>,
        attribute: &str,
        value: &str,
    ) -> Result<Vec<Item>, InfraError> {
        let mut items = Vec::new();
        let mut exclusive_start_key: Option<Item> = None;

        loop {
            let output = self
                .client
                .query()
                .table_name(table)
                .set_index_name(index.map(str::to_string))
                .key_condition_expression("#k = :v")
                .expression_attribute_names("#k", attribute)
                .expression_attribute_values(":v", AttributeValue::S(value.to_string()))
                .set_exclusive_start_key(exclusive_start_key.take())
                .send()
                .await
                .map_err(|e| {
                    InfraError::dynamo_db(format!("テーブル '{table}' の検索に失敗: {e}"))
                })?;

            items.extend(output.items().iter().cloned());

            match output.last_evaluated_key() {
                Some(key) if !key.is_empty() => exclusive_start_key = Some(key.clone()),
                _ => break,
            }
        }

        Ok(items)
    }
}

#[async_trait]
impl KeyValueStore for DynamoDbStore {
    #[tracing::instrument(skip_all, level = "debug", fields(%table))]
    async fn put_item(&self, table: &str, item: Item) -> Result<(), InfraError> {
        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| InfraError::dynamo_db(format!("テーブル '{table}' への書き込みに失敗: {e}")))?;

        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%table))]
    async fn get_item(&self, table: &str, key: Item) -> Result<Option<Item>, InfraError> {
        let output = self
            .client
            .get_item()
            .table_name(table)
            .set_key(Some(key))
            .send()
            .await
            .map_err(|e| InfraError::dynamo_db(format!("テーブル '{table}' の取得に失敗: {e}")))?;

        Ok(output.item().cloned())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%table, %index))]
    async fn query_index(
        &self,
        table: &str,
        index: &str,
        attribute: &str,
        value: &str,
    ) -> Result<Vec<Item>, InfraError> {
        self.query_all(table, Some(index), attribute, value).await
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%table))]
    async fn query_partition(
        &self,
        table: &str,
        attribute: &str,
        value: &str,
    ) -> Result<Vec<Item>, InfraError> {
        self.query_all(table, None, attribute, value).await
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%table))]
    async fn delete_item(&self, table: &str, key: Item) -> Result<(), InfraError> {
        self.client
            .delete_item()
            .table_name(table)
            .set_key(Some(key))
            .send()
            .await
            .map_err(|e| InfraError::dynamo_db(format!("テーブル '{table}' からの削除に失敗: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ストアはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DynamoDbStore>();
    }
}
