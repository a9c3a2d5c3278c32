//! 宽松字段解析
//!
//! 后端各接口的字段类型并不统一：id 有时是数字，评分有时是字符串。
//! 这些辅助函数配合 `#[serde(deserialize_with = ...)]` 使用，
//! 单个字段类型不符时退化为缺失，而不是让整条记录解析失败。

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// 字符串或数字形式的 id
pub(crate) fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// 标量转文本，对象与数组视为缺失
pub(crate) fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(id_text))
}

/// 引用中的裸 id，必须是字符串或数字
pub(crate) fn ref_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    id_text(&value).ok_or_else(|| D::Error::custom(format!("expected an id, got {}", value)))
}

/// null 或非标量时为空字符串
pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .and_then(scalar_text)
        .unwrap_or_default())
}

/// 数字或数字字符串
pub(crate) fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
