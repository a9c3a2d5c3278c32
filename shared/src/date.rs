//! 日期展示
//!
//! 后端的时间字段是字符串：报告使用 RFC 3339（`2025-03-28T10:30:00Z`），
//! `/reports/user` 中的 `date` 只有日期部分。统一格式化为 `M/D/YYYY`。

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const UNKNOWN_DATE: &str = "Unknown date";

/// 解析时间字符串，得到日历日期
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// 格式化为 `M/D/YYYY`，无法解析时返回 "Unknown date"
pub fn display_date(raw: Option<&str>) -> String {
    raw.and_then(parse_date)
        .map(|d| d.format("%-m/%-d/%Y").to_string())
        .unwrap_or_else(|| UNKNOWN_DATE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_date() {
        assert_eq!(display_date(Some("2025-03-28T10:30:00Z")), "3/28/2025");
        assert_eq!(display_date(Some("2025-03-25T14:45:00.000+00:00")), "3/25/2025");
        assert_eq!(display_date(Some("2025-03-20T08:00:00.123")), "3/20/2025");
        assert_eq!(display_date(Some("2025-03-15")), "3/15/2025");
        assert_eq!(display_date(Some("yesterday")), "Unknown date");
        assert_eq!(display_date(None), "Unknown date");
    }
}
