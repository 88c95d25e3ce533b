//! # UserRepository
//!
//! ユーザーの永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **PK = `user_id`**: `User#<uuid>` 形式の文字列
//! - **メールアドレス検索**: セカンダリインデックス `email` で検索し、
//!   ちょうど 1 件ヒットした場合のみ成功とする

use std::sync::Arc;

use async_trait::async_trait;
use caregiver_domain::user::{User, UserId};

use crate::{
    InfraError,
    item::{get_s, put_s},
    store::{Item, KeyValueStore, string_key},
};

const ENTITY: &str = "User";

/// メールアドレスのセカンダリインデックス名
pub const EMAIL_INDEX: &str = "email";

/// ユーザーリポジトリトレイト
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// ユーザーを作成する（同じ ID が存在する場合は上書き）
    async fn create(&self, user: &User) -> Result<(), InfraError>;

    /// ID でユーザーを検索する
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, InfraError>;

    /// メールアドレスでユーザーを検索する
    ///
    /// # エラー
    ///
    /// 該当が 0 件または複数件、あるいは該当アイテムを変換できない場合は
    /// `InfraErrorKind::NotFound` を返す。
    async fn find_by_email(&self, email: &str) -> Result<User, InfraError>;
}

/// DynamoDB 形式のアイテムで格納する UserRepository
pub struct DynamoDbUserRepository {
    store:      Arc<dyn KeyValueStore>,
    table_name: String,
}

impl DynamoDbUserRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, table_name: impl Into<String>) -> Self {
        Self {
            store,
            table_name: table_name.into(),
        }
    }
}

#[async_trait]
impl UserRepository for DynamoDbUserRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(user_id = %user.id()))]
    async fn create(&self, user: &User) -> Result<(), InfraError> {
        tracing::info!(table = %self.table_name, "ユーザーを登録します");

        self.store
            .put_item(&self.table_name, user_to_item(user))
            .await?;

        tracing::info!(table = %self.table_name, "ユーザーを登録しました");
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(user_id = %id))]
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, InfraError> {
        tracing::info!(table = %self.table_name, "ユーザーを取得します");

        let item = self
            .store
            .get_item(&self.table_name, string_key([("user_id", id.as_str())]))
            .await?;

        tracing::info!(
            table = %self.table_name,
            found = item.is_some(),
            "ユーザーを取得しました"
        );

        item.as_ref().map(item_to_user).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_by_email(&self, email: &str) -> Result<User, InfraError> {
        tracing::info!(table = %self.table_name, index = EMAIL_INDEX, "ユーザーをメールアドレスで検索します");

        let items = self
            .store
            .query_index(&self.table_name, EMAIL_INDEX, "email", email)
            .await?;

        tracing::info!(
            table = %self.table_name,
            count = items.len(),
            "ユーザーをメールアドレスで検索しました"
        );

        let [item] = items.as_slice() else {
            return Err(InfraError::not_found(ENTITY, email));
        };

        item_to_user(item).map_err(|e| {
            tracing::warn!(error = %e, "検索結果のユーザーを変換できません");
            InfraError::not_found(ENTITY, email)
        })
    }
}

fn user_to_item(user: &User) -> Item {
    let mut item = Item::new();
    put_s(&mut item, "user_id", user.id().as_str());
    put_s(&mut item, "email", user.email());
    put_s(&mut item, "first_name", user.first_name());
    put_s(&mut item, "last_name", user.last_name());
    item
}

fn item_to_user(item: &Item) -> Result<User, InfraError> {
    Ok(User::from_stored(
        UserId::from_string(get_s(item, ENTITY, "user_id")?),
        get_s(item, ENTITY, "email")?,
        get_s(item, ENTITY, "first_name")?,
        get_s(item, ENTITY, "last_name")?,
    ))
}

#[cfg(test)]
mod tests {
    use aws_sdk_dynamodb::types::AttributeValue;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{InfraErrorKind, mock::MockKeyValueStore};

    #[test]
    fn アイテムとの相互変換で値が保持される() {
        let user = User::new("jane@example.com", "Jane", "Doe");

        let item = user_to_item(&user);
        let restored = item_to_user(&item).unwrap();

        assert_eq!(restored, user);
        assert_eq!(
            item.get("user_id"),
            Some(&AttributeValue::S(user.id().as_str().to_string()))
        );
    }

    #[test]
    fn 属性が欠けたアイテムは空文字列で補完される() {
        let item = string_key([("user_id", "User#123")]);

        let user = item_to_user(&item).unwrap();

        assert_eq!(user.id().as_str(), "User#123");
        assert_eq!(user.email(), "");
        assert_eq!(user.first_name(), "");
    }

    const TABLE: &str = "user-table-test";

    fn setup() -> (MockKeyValueStore, DynamoDbUserRepository) {
        let store = MockKeyValueStore::new().with_key_schema(TABLE, &["user_id"]);
        let repo = DynamoDbUserRepository::new(Arc::new(store.clone()), TABLE);
        (store, repo)
    }

    #[tokio::test]
    async fn createしたユーザーをidで取得できる() {
        let (_store, repo) = setup();
        let user = User::new("jane@example.com", "Jane", "Doe");

        repo.create(&user).await.unwrap();
        let found = repo.find_by_id(user.id()).await.unwrap();

        assert_eq!(found, Some(user));
    }

    #[tokio::test]
    async fn 存在しないidはnoneを返す() {
        let (_store, repo) = setup();

        let found = repo
            .find_by_id(&UserId::from_string("User#404"))
            .await
            .unwrap();

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn 同じidでcreateすると上書きされる() {
        let (store, repo) = setup();
        let user = User::new("jane@example.com", "Jane", "Doe");
        let renamed = User::from_stored(
            user.id().clone(),
            user.email().to_string(),
            "Janet".to_string(),
            user.last_name().to_string(),
        );

        repo.create(&user).await.unwrap();
        repo.create(&renamed).await.unwrap();

        assert_eq!(store.items(TABLE).len(), 1);
        assert_eq!(repo.find_by_id(user.id()).await.unwrap(), Some(renamed));
    }

    #[tokio::test]
    async fn メールアドレスで一意のユーザーを取得できる() {
        let (_store, repo) = setup();
        let user = User::new("jane@example.com", "Jane", "Doe");
        repo.create(&user).await.unwrap();
        repo.create(&User::new("john@example.com", "John", "Doe"))
            .await
            .unwrap();

        let found = repo.find_by_email("jane@example.com").await.unwrap();

        assert_eq!(found, user);
    }

    #[tokio::test]
    async fn メールアドレスが0件の場合はnot_found() {
        let (_store, repo) = setup();

        let err = repo.find_by_email("nobody@example.com").await.unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn メールアドレスが複数件の場合はnot_found() {
        let (_store, repo) = setup();
        repo.create(&User::new("dup@example.com", "A", "A"))
            .await
            .unwrap();
        repo.create(&User::new("dup@example.com", "B", "B"))
            .await
            .unwrap();

        let err = repo.find_by_email("dup@example.com").await.unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn 該当アイテムを変換できない場合はnot_found() {
        let (store, repo) = setup();
        let mut item = string_key([("user_id", "User#bad"), ("email", "bad@example.com")]);
        item.insert("first_name".to_string(), AttributeValue::N("1".to_string()));
        store.insert_raw(TABLE, item);

        let err = repo.find_by_email("bad@example.com").await.unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn id検索で型が異なる属性はデシリアライズエラー() {
        let (store, repo) = setup();
        let mut item = string_key([("user_id", "User#bad")]);
        item.insert("email".to_string(), AttributeValue::Bool(true));
        store.insert_raw(TABLE, item);

        let err = repo
            .find_by_id(&UserId::from_string("User#bad"))
            .await
            .unwrap_err();

        assert!(matches!(
            err.kind(),
            InfraErrorKind::Deserialization { .. }
        ));
    }

    #[tokio::test]
    async fn ストア障害はdynamo_dbエラーとして返す() {
        let repo = DynamoDbUserRepository::new(
            Arc::new(MockKeyValueStore::failing("接続失敗")),
            TABLE,
        );

        let err = repo
            .create(&User::new("jane@example.com", "Jane", "Doe"))
            .await
            .unwrap_err();

        assert!(matches!(err.kind(), InfraErrorKind::DynamoDb(_)));
    }

    #[test]
    fn 型が異なる属性はエラーになる() {
        let mut item = string_key([("user_id", "User#123")]);
        item.insert("first_name".to_string(), AttributeValue::Bool(true));

        assert!(item_to_user(&item).is_err());
    }
}
