//! # ケア受給者
//!
//! ケアを受ける人（Receiver）を定義する。ID 体系はユーザーと同じ
//! （`Receiver#<uuid>`）。

define_prefixed_id! {
    /// ケア受給者 ID（一意識別子）
    ///
    /// receiver テーブルのパーティションキー（`receiver_id`）。
    /// イベントテーブルではパーティションキーとしても使われる。
    pub struct ReceiverId {
        prefix: "Receiver",
    }
}

/// ケア受給者エンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receiver {
    id:         ReceiverId,
    first_name: String,
    last_name:  String,
}

impl Receiver {
    /// 新しいケア受給者を作成する
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id:         ReceiverId::new(),
            first_name: first_name.into(),
            last_name:  last_name.into(),
        }
    }

    /// 既存のデータから復元する（ストアから取得時）
    pub fn from_stored(id: ReceiverId, first_name: String, last_name: String) -> Self {
        Self {
            id,
            first_name,
            last_name,
        }
    }

    pub fn id(&self) -> &ReceiverId {
        &self.id
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
    use super::*;

    #[test]
    fn newでプレフィックス付きのidが生成される() {
        let receiver = Receiver::new("John", "Doe");

        assert!(receiver.id().as_str().starts_with("Receiver#"));
        assert!(receiver.id().uuid().is_some());
        assert_eq!(receiver.first_name(), "John");
        assert_eq!(receiver.last_name(), "Doe");
    }

    #[test]
    fn 同じ入力でもidは毎回異なる() {
        let a = Receiver::new("John", "Doe");
        let b = Receiver::new("John", "Doe");

        assert_ne!(a.id(), b.id());
    }
}
