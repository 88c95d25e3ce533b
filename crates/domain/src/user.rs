//! # ユーザー
//!
//! ケアを提供するユーザー（介護者）を定義する。
//!
//! ## 設計方針
//!
//! - **Newtype パターン**: UserId は `User#<uuid>` 形式の文字列をラップし、型安全性を確保
//! - **不変性**: 生成後のフィールドは変更しない（更新はリポジトリでの全体上書きのみ）
//! - **ストア復元**: [`User::from_stored`] でストアから取得した値を検証なしに復元する
//!
//! ## 使用例
//!
//! ```rust
//! use caregiver_domain::user::User;
//!
//! let user = User::new("jane@example.com", "Jane", "Doe");
//!
//! assert!(user.id().as_str().starts_with("User#"));
//! assert_eq!(user.email(), "jane@example.com");
//! ```

define_prefixed_id! {
    /// ユーザー ID（一意識別子）
    ///
    /// user テーブルのパーティションキー（`user_id`）。
    pub struct UserId {
        prefix: "User",
    }
}

/// ユーザーエンティティ
///
/// # 不変条件
///
/// - `id` は生成後に変更されない
/// - `email` はシステム全体で一意（セカンダリインデックス `email` で検索される）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id:         UserId,
    email:      String,
    first_name: String,
    last_name:  String,
}

impl User {
    /// 新しいユーザーを作成する
    ///
    /// ID は毎回新しく生成される。同じ入力でも異なる ID を持つ。
    pub fn new(
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id:         UserId::new(),
            email:      email.into(),
            first_name: first_name.into(),
            last_name:  last_name.into(),
        }
    }

    /// 既存のデータからユーザーを復元する（ストアから取得時）
    pub fn from_stored(id: UserId, email: String, first_name: String, last_name: String) -> Self {
        Self {
            id,
            email,
            first_name,
            last_name,
        }
    }

    // Getter メソッド

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn newでプレフィックス付きのidが生成される() {
        let user = User::new("jane@example.com", "Jane", "Doe");

        assert!(user.id().as_str().starts_with("User#"));
        assert!(user.id().uuid().is_some());
        assert_eq!(user.email(), "jane@example.com");
        assert_eq!(user.first_name(), "Jane");
        assert_eq!(user.last_name(), "Doe");
    }

    #[test]
    fn 同じ入力でもidは毎回異なる() {
        let a = User::new("jane@example.com", "Jane", "Doe");
        let b = User::new("jane@example.com", "Jane", "Doe");

        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn from_storedで格納済みの値を検証なしに復元する() {
        let user = User::from_stored(
            UserId::from_string("User#123"),
            String::new(),
            "testFirstName".to_string(),
            "testLastName".to_string(),
        );

        assert_eq!(user.id().as_str(), "User#123");
        assert_eq!(user.email(), "");
        // UUID 部分がない ID は uuid() が None
        assert!(user.id().uuid().is_none());
    }

    #[test]
    fn 別プレフィックスのidはuuidとして解釈しない() {
        let id = UserId::from_string(format!("Receiver#{}", uuid::Uuid::now_v7()));
        assert!(id.uuid().is_none());
    }
}
