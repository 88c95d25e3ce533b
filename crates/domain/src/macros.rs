/// プレフィックス付き UUID ベースの ID 型を定義する宣言型マクロ
///
/// 生成される ID は `{prefix}#{uuid}` 形式の文字列（例: `User#0192...`）。
/// DynamoDB のキーとしてそのまま格納されるため、内部表現は `String` とする。
///
/// 以下のボイラープレートを一括生成する:
/// - Newtype 構造体（`String` をラップ）
/// - `derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)`
/// - `PREFIX`: ドメインタグ
/// - `new()`: UUID v7 を生成してプレフィックスを付与
/// - `from_string()`: 格納済みの文字列から復元（検証しない）
/// - `as_str()` / `into_string()`: 文字列アクセス
/// - `uuid()`: プレフィックス以降を UUID としてパース
/// - `Default` impl（`new()` に委譲）
///
/// # 使用例
///
/// ```rust
/// use caregiver_domain::user::UserId;
///
/// let id = UserId::new();
/// assert!(id.as_str().starts_with("User#"));
/// assert!(id.uuid().is_some());
///
/// let restored = UserId::from_string(id.as_str());
/// assert_eq!(id, restored);
/// ```
macro_rules! define_prefixed_id {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident {
            prefix: $prefix:literal $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash,
            serde::Serialize, serde::Deserialize,
            derive_more::Display,
        )]
        #[display("{_0}")]
        $vis struct $Name(String);

        impl $Name {
            /// ID のドメインタグ
            pub const PREFIX: &'static str = $prefix;

            /// 新しい ID を生成する（`{PREFIX}#{UUID v7}`）
            pub fn new() -> Self {
                Self(format!("{}#{}", Self::PREFIX, uuid::Uuid::now_v7()))
            }

            /// 既存の文字列から ID を作成する
            ///
            /// 上流システムやストアから受け取った値は不透明な識別子として扱い、
            /// 形式を検証しない。
            pub fn from_string(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// 文字列参照を取得する
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// 所有権を持つ文字列に変換する
            pub fn into_string(self) -> String {
                self.0
            }

            /// プレフィックス以降の UUID を取得する
            ///
            /// `{PREFIX}#` で始まらない、または UUID としてパースできない場合は `None`。
            pub fn uuid(&self) -> Option<uuid::Uuid> {
                self.0
                    .strip_prefix(Self::PREFIX)
                    .and_then(|rest| rest.strip_prefix('#'))
                    .and_then(|raw| uuid::Uuid::parse_str(raw).ok())
            }
        }

        impl Default for $Name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}
