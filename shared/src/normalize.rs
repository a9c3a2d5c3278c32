//! 报告列表响应归一化
//!
//! `/api/reports` 有时直接返回数组，有时包在 `{ "reports": [...] }` 里。
//! 这里先判断外层形状，再逐个解析元素：
//! - 不是 JSON：返回 [`DecodeError::NotJson`]，由调用方展示错误
//! - 是 JSON 但形状不对：记录一条警告，返回空列表
//! - 单个元素无法解析：记录警告并跳过，其余元素照常返回

use crate::Report;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// 响应体解码错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// 响应体不是合法 JSON
    #[error("response is not valid JSON: {0}")]
    NotJson(String),
    /// JSON 合法但结构不符合预期
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),
}

impl From<serde_json::Error> for DecodeError {
    fn from(e: serde_json::Error) -> Self {
        match e.classify() {
            serde_json::error::Category::Syntax | serde_json::error::Category::Eof => {
                DecodeError::NotJson(e.to_string())
            }
            _ => DecodeError::UnexpectedShape(e.to_string()),
        }
    }
}

/// 报告列表的两种合法形状，元素尚未解析
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ReportsPayload {
    List(Vec<Value>),
    Wrapped { reports: Vec<Value> },
}

impl ReportsPayload {
    /// 严格解析外层形状，形状不符返回错误
    pub fn parse(body: &str) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(body)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        let shape = describe(&value);
        serde_json::from_value(value)
            .map_err(|_| DecodeError::UnexpectedShape(format!("got {}", shape)))
    }

    pub fn into_reports(self) -> Vec<Report> {
        let items = match self {
            ReportsPayload::List(items) | ReportsPayload::Wrapped { reports: items } => items,
        };
        decode_items(items, "report")
    }
}

/// 逐个解析列表元素，无法解析的元素记录警告后跳过
pub fn decode_items<T: DeserializeOwned>(items: Vec<Value>, kind: &str) -> Vec<T> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                log::warn!("[Decode] Skipping malformed {} at index {}: {}", kind, index, e);
                None
            }
        })
        .collect()
}

/// 数组响应：外层不是数组时返回错误，损坏的元素只跳过自身
pub fn decode_list<T: DeserializeOwned>(body: &str, kind: &str) -> Result<Vec<T>, DecodeError> {
    let items: Vec<Value> = serde_json::from_str(body)?;
    Ok(decode_items(items, kind))
}

/// 宽松解析：形状不符时退化为空列表
pub fn normalize_reports(body: &str) -> Result<Vec<Report>, DecodeError> {
    match ReportsPayload::parse(body) {
        Ok(payload) => Ok(payload.into_reports()),
        Err(DecodeError::UnexpectedShape(detail)) => {
            log::warn!("[Reports] Unexpected API response format ({}), showing no reports", detail);
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(map) if map.contains_key("reports") => "an object with malformed `reports`",
        Value::Object(_) => "an object without `reports`",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_array_is_kept_in_order() {
        let reports = normalize_reports(r#"[{"id":"a"},{"id":"b"}]"#).unwrap();
        let keys: Vec<_> = reports.iter().map(Report::key).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_wrapped_object_is_unwrapped() {
        let reports = normalize_reports(r#"{"reports":[{"_id":"x","name":"Leaf"}]}"#).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].display_name(), "Leaf");
    }

    #[test]
    fn test_unexpected_shapes_degrade_to_empty() {
        for body in ["{}", "null", "42", r#""text""#, r#"{"reports":"nope"}"#] {
            assert_eq!(normalize_reports(body).unwrap(), Vec::<Report>::new(), "{}", body);
        }
    }

    #[test]
    fn test_strict_parse_reports_the_shape() {
        let err = ReportsPayload::parse("{}").unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnexpectedShape("got an object without `reports`".to_string())
        );
    }

    #[test]
    fn test_one_bad_record_keeps_the_rest() {
        let body = r#"[{"_id":"a","name":"Leaf"},"oops",{"id":7,"name":"Corn"},{"_id":"c","name":{"x":1}}]"#;
        let reports = normalize_reports(body).unwrap();
        let keys: Vec<_> = reports.iter().map(Report::key).collect();
        assert_eq!(keys, vec!["a", "7"]);
        assert_eq!(reports[1].display_name(), "Corn");
    }

    #[test]
    fn test_wrapped_records_with_loose_status() {
        let reports =
            normalize_reports(r#"{"reports":[{"_id":"a"},{"_id":"b","status":1}]}"#).unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[1].status.label(), "1");
    }

    #[test]
    fn test_decode_list_skips_bad_experts() {
        let body = r#"[{"_id":"e1","name":null,"rating":"4.5"},42,{"id":3,"name":"Dr. B"}]"#;
        let experts: Vec<crate::Expert> = decode_list(body, "expert").unwrap();
        assert_eq!(experts.len(), 2);
        assert_eq!(experts[0].rating, Some(4.5));
        assert_eq!(experts[1].key(), "3");

        let err = decode_list::<crate::Expert>(r#"{"experts":[]}"#, "expert").unwrap_err();
        assert!(matches!(err, DecodeError::UnexpectedShape(_)));
    }

    #[test]
    fn test_non_json_body_is_an_error() {
        let err = normalize_reports("<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, DecodeError::NotJson(_)));
    }
}
