//! # ReceiverRepository
//!
//! ケア受給者の永続化を担当するリポジトリ。PK = `receiver_id`。

use std::sync::Arc;

use async_trait::async_trait;
use caregiver_domain::receiver::{Receiver, ReceiverId};

use crate::{
    InfraError,
    item::{get_s, put_s},
    store::{Item, KeyValueStore, string_key},
};

const ENTITY: &str = "Receiver";

/// ケア受給者リポジトリトレイト
#[async_trait]
pub trait ReceiverRepository: Send + Sync {
    /// ケア受給者を作成する（同じ ID が存在する場合は上書き）
    async fn create(&self, receiver: &Receiver) -> Result<(), InfraError>;

    /// ID でケア受給者を検索する
    async fn find_by_id(&self, id: &ReceiverId) -> Result<Option<Receiver>, InfraError>;
}

/// DynamoDB 形式のアイテムで格納する ReceiverRepository
pub struct DynamoDbReceiverRepository {
    store:      Arc<dyn KeyValueStore>,
    table_name: String,
}

impl DynamoDbReceiverRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, table_name: impl Into<String>) -> Self {
        Self {
            store,
            table_name: table_name.into(),
        }
    }
}

#[async_trait]
impl ReceiverRepository for DynamoDbReceiverRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(receiver_id = %receiver.id()))]
    async fn create(&self, receiver: &Receiver) -> Result<(), InfraError> {
        tracing::info!(table = %self.table_name, "ケア受給者を登録します");

        let mut item = Item::new();
        put_s(&mut item, "receiver_id", receiver.id().as_str());
        put_s(&mut item, "first_name", receiver.first_name());
        put_s(&mut item, "last_name", receiver.last_name());

        self.store.put_item(&self.table_name, item).await?;

        tracing::info!(table = %self.table_name, "ケア受給者を登録しました");
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(receiver_id = %id))]
    async fn find_by_id(&self, id: &ReceiverId) -> Result<Option<Receiver>, InfraError> {
        tracing::info!(table = %self.table_name, "ケア受給者を取得します");

        let item = self
            .store
            .get_item(&self.table_name, string_key([("receiver_id", id.as_str())]))
            .await?;

        tracing::info!(
            table = %self.table_name,
            found = item.is_some(),
            "ケア受給者を取得しました"
        );

        item.as_ref().map(item_to_receiver).transpose()
    }
}

fn item_to_receiver(item: &Item) -> Result<Receiver, InfraError> {
    Ok(Receiver::from_stored(
        ReceiverId::from_string(get_s(item, ENTITY, "receiver_id")?),
        get_s(item, ENTITY, "first_name")?,
        get_s(item, ENTITY, "last_name")?,
    ))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::mock::MockKeyValueStore;

    const TABLE: &str = "receiver-table-test";

    #[tokio::test]
    async fn createした受給者をidで取得できる() {
        let store = MockKeyValueStore::new().with_key_schema(TABLE, &["receiver_id"]);
        let repo = DynamoDbReceiverRepository::new(Arc::new(store), TABLE);
        let receiver = Receiver::new("John", "Doe");

        repo.create(&receiver).await.unwrap();
        let found = repo.find_by_id(receiver.id()).await.unwrap();

        assert_eq!(found, Some(receiver));
    }

    #[tokio::test]
    async fn 存在しないidはnoneを返す() {
        let repo = DynamoDbReceiverRepository::new(Arc::new(MockKeyValueStore::new()), TABLE);

        let found = repo
            .find_by_id(&ReceiverId::from_string("Receiver#404"))
            .await
            .unwrap();

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn 名前が欠けたアイテムは空文字列で復元する() {
        let store = MockKeyValueStore::new();
        store.insert_raw(TABLE, string_key([("receiver_id", "Receiver#123")]));
        let repo = DynamoDbReceiverRepository::new(Arc::new(store), TABLE);

        let found = repo
            .find_by_id(&ReceiverId::from_string("Receiver#123"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found.first_name(), "");
        assert_eq!(found.last_name(), "");
    }
}
