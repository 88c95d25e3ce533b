//! # 属性マップ変換ヘルパー
//!
//! DynamoDB アイテムとエンティティの相互変換で使う小さな関数群。
//!
//! 上流の書き込み側は空文字列の属性を省略するため、文字列属性が存在しない場合は
//! 空文字列として扱う。属性が存在して型が異なる場合はデシリアライズエラーとする。

use aws_sdk_dynamodb::types::AttributeValue;

use crate::{InfraError, store::Item};

/// 文字列属性を取得する（存在しない場合は空文字列）
pub(crate) fn get_s(item: &Item, entity: &str, key: &str) -> Result<String, InfraError> {
    Ok(get_opt_s(item, entity, key)?.unwrap_or_default())
}

/// 省略可能な文字列属性を取得する
pub(crate) fn get_opt_s(item: &Item, entity: &str, key: &str) -> Result<Option<String>, InfraError> {
    match item.get(key) {
        None | Some(AttributeValue::Null(_)) => Ok(None),
        Some(AttributeValue::S(value)) => Ok(Some(value.clone())),
        Some(other) => Err(type_mismatch(entity, key, "S", other)),
    }
}

/// リスト属性を取得する（存在しない場合は空）
pub(crate) fn get_list<'a>(
    item: &'a Item,
    entity: &str,
    key: &str,
) -> Result<&'a [AttributeValue], InfraError> {
    match item.get(key) {
        None | Some(AttributeValue::Null(_)) => Ok(&[]),
        Some(AttributeValue::L(values)) => Ok(values),
        Some(other) => Err(type_mismatch(entity, key, "L", other)),
    }
}

/// 文字列属性を設定する
pub(crate) fn put_s(item: &mut Item, key: &str, value: impl Into<String>) {
    item.insert(key.to_string(), AttributeValue::S(value.into()));
}

/// 属性の型不一致エラーを生成する
pub(crate) fn type_mismatch(
    entity: &str,
    key: &str,
    expected: &str,
    actual: &AttributeValue,
) -> InfraError {
    InfraError::deserialization(
        entity,
        format!(
            "属性 '{key}' の型が不正です（期待: {expected}, 実際: {}）",
            type_name(actual)
        ),
    )
}

fn type_name(value: &AttributeValue) -> &'static str {
    match value {
        AttributeValue::B(_) => "B",
        AttributeValue::Bool(_) => "BOOL",
        AttributeValue::Bs(_) => "BS",
        AttributeValue::L(_) => "L",
        AttributeValue::M(_) => "M",
        AttributeValue::N(_) => "N",
        AttributeValue::Ns(_) => "NS",
        AttributeValue::Null(_) => "NULL",
        AttributeValue::S(_) => "S",
        AttributeValue::Ss(_) => "SS",
        _ => "UNKNOWN",
    }
}
