//! # ユーザーと受給者の関係
//!
//! 上流システムが解決済みの関係を通知エンベロープ経由で受け取る。
//! このクレートでは永続化しない（読み取り専用の値オブジェクト）。

use serde::{Deserialize, Serialize};

use crate::{receiver::ReceiverId, user::UserId};

/// ユーザーとケア受給者の関係
///
/// JSON 表現は camelCase（`userId`, `receiverId`, `emailNotifications`）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub user_id:             UserId,
    pub receiver_id:         ReceiverId,
    /// メール通知を受け取るか（未指定時は `false`）
    #[serde(default)]
    pub email_notifications: bool,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn camel_caseのjsonからデシリアライズできる() {
        let value = json!({
            "userId": "User#123",
            "receiverId": "Receiver#123",
            "emailNotifications": true,
        });

        let relationship: Relationship = serde_json::from_value(value).unwrap();

        assert_eq!(
            relationship,
            Relationship {
                user_id:             UserId::from_string("User#123"),
                receiver_id:         ReceiverId::from_string("Receiver#123"),
                email_notifications: true,
            }
        );
    }

    #[test]
    fn email_notifications未指定時はfalseになる() {
        let value = json!({ "userId": "User#1", "receiverId": "Receiver#1" });

        let relationship: Relationship = serde_json::from_value(value).unwrap();

        assert!(!relationship.email_notifications);
    }
}
