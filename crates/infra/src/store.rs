//! # エンティティストア抽象
//!
//! リポジトリが依存するキーバリューストアの操作を trait で抽象化する。
//! 属性マップは DynamoDB の `AttributeValue` をそのまま使用する。
//!
//! 本番では [`DynamoDbStore`](crate::dynamodb::DynamoDbStore)、
//! テストでは `MockKeyValueStore`（`test-utils` feature）を使用する。

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;

use crate::InfraError;

/// ストアに格納される 1 アイテム（属性名 → 属性値）
pub type Item = HashMap<String, AttributeValue>;

/// キーバリューストアトレイト
///
/// 1 回の呼び出しが 1 回のストア操作（またはページング済みの一連の Query）に
/// 対応する。リトライは行わない。
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// アイテムを書き込む
    ///
    /// 同じ主キーのアイテムが既に存在する場合は置き換える（DynamoDB `PutItem` と同じ）。
    async fn put_item(&self, table: &str, item: Item) -> Result<(), InfraError>;

    /// 主キーでアイテムを取得する（存在しない場合は `None`）
    async fn get_item(&self, table: &str, key: Item) -> Result<Option<Item>, InfraError>;

    /// セカンダリインデックスを文字列属性の等価条件で検索する
    async fn query_index(
        &self,
        table: &str,
        index: &str,
        attribute: &str,
        value: &str,
    ) -> Result<Vec<Item>, InfraError>;

    /// パーティションキーに一致する全アイテムを取得する（ストアの返却順）
    async fn query_partition(
        &self,
        table: &str,
        attribute: &str,
        value: &str,
    ) -> Result<Vec<Item>, InfraError>;

    /// 主キーでアイテムを削除する（存在しなくても成功）
    async fn delete_item(&self, table: &str, key: Item) -> Result<(), InfraError>;
}

/// 文字列属性のみで構成されたキーを作成する
pub fn string_key<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Item {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), AttributeValue::S(value.to_string())))
        .collect()
}
