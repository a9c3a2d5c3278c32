//! PlantDoc 前后端共享的领域模型
//!
//! - `protocol`: 接口描述（路径、方法、鉴权要求、响应类型）
//! - `normalize`: 报告列表响应的形状归一化
//! - `date`: 日期展示

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

pub mod date;
mod lenient;
pub mod normalize;
pub mod protocol;

pub use normalize::{DecodeError, ReportsPayload, decode_list, normalize_reports};
pub use protocol::{ApiRequest, AuthRequirement, HttpMethod};

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const STORAGE_TOKEN_KEY: &str = "token";
pub const STORAGE_USER_KEY: &str = "user";
pub const HEADER_AUTHORIZATION: &str = "Authorization";

/// 历史版本会把 JS 的 `undefined` / `null` 原样写进存储
const TOKEN_PLACEHOLDERS: [&str; 2] = ["undefined", "null"];

// =========================================================
// 凭据与用户 (Credential & User)
// =========================================================

/// Bearer 凭据
///
/// 只能通过 [`Token::parse`] 构造，保证非空且不是占位字符串。
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn parse(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() || TOKEN_PLACEHOLDERS.contains(&trimmed) {
            return None;
        }
        Some(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `Authorization` 头的值
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

// 凭据不进日志
impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

/// 不透明的用户记录
///
/// 后端返回什么就保存什么，持久化后可以原样还原。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct User(Map<String, Value>);

impl User {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn id(&self) -> Option<String> {
        ["id", "_id"]
            .iter()
            .filter_map(|key| self.0.get(*key))
            .find_map(lenient::id_text)
    }

    pub fn name(&self) -> Option<&str> {
        self.text("name")
    }

    pub fn email(&self) -> Option<&str> {
        self.text("email")
    }

    /// 侧边栏等处展示的名字
    pub fn display_name(&self) -> &str {
        self.name().or_else(|| self.email()).unwrap_or("User")
    }
}

// =========================================================
// 报告 (Report)
// =========================================================

/// 报告处理状态
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<Value>", into = "Option<String>")]
pub enum ReportStatus {
    Unprocessed,
    Processed,
    Other(String),
    #[default]
    Unknown,
}

impl ReportStatus {
    pub fn label(&self) -> &str {
        match self {
            ReportStatus::Unprocessed => "Unprocessed",
            ReportStatus::Processed => "Processed",
            ReportStatus::Other(raw) => raw,
            ReportStatus::Unknown => "Unknown",
        }
    }

    pub fn is_processed(&self) -> bool {
        matches!(self, ReportStatus::Processed)
    }
}

impl From<Option<String>> for ReportStatus {
    fn from(raw: Option<String>) -> Self {
        match raw {
            None => ReportStatus::Unknown,
            Some(s) if s.trim().is_empty() => ReportStatus::Unknown,
            Some(s) if s.eq_ignore_ascii_case("processed") => ReportStatus::Processed,
            Some(s) if s.eq_ignore_ascii_case("unprocessed") => ReportStatus::Unprocessed,
            Some(s) => ReportStatus::Other(s),
        }
    }
}

// 数字或布尔状态按文本处理
impl From<Option<Value>> for ReportStatus {
    fn from(raw: Option<Value>) -> Self {
        raw.and_then(lenient::scalar_text).into()
    }
}

impl From<ReportStatus> for Option<String> {
    fn from(status: ReportStatus) -> Self {
        match status {
            ReportStatus::Unknown => None,
            other => Some(other.label().to_string()),
        }
    }
}

/// 诊断报告（只读快照）
///
/// `/api/reports` 使用 `name` / `createdAt`，`/reports/user` 使用
/// `title` / `date`，两种写法都接受。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(
        default,
        deserialize_with = "lenient::id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(
        rename = "_id",
        default,
        deserialize_with = "lenient::id",
        skip_serializing_if = "Option::is_none"
    )]
    pub object_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub status: ReportStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl Report {
    /// 列表渲染与提交请求时使用的唯一键
    pub fn key(&self) -> &str {
        entity_key(&self.object_id, &self.id)
    }

    pub fn display_name(&self) -> &str {
        non_empty(&self.name)
            .or_else(|| non_empty(&self.title))
            .unwrap_or("Unnamed Report")
    }

    pub fn created(&self) -> Option<&str> {
        non_empty(&self.created_at).or_else(|| non_empty(&self.date))
    }

    /// 已处理且带有结果字符串时才返回
    pub fn analysis(&self) -> Option<&str> {
        if self.status.is_processed() {
            non_empty(&self.analysis_result)
        } else {
            None
        }
    }
}

// =========================================================
// 专家与咨询请求 (Expert & Advice Request)
// =========================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Expert {
    #[serde(
        default,
        deserialize_with = "lenient::id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(
        rename = "_id",
        default,
        deserialize_with = "lenient::id",
        skip_serializing_if = "Option::is_none"
    )]
    pub object_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Expert {
    pub fn key(&self) -> &str {
        entity_key(&self.object_id, &self.id)
    }
}

/// 咨询请求状态，由后端推进 pending -> completed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<Value>", into = "Option<String>")]
pub enum AdviceStatus {
    #[default]
    Pending,
    Completed,
    Other(String),
}

impl AdviceStatus {
    /// 首字母大写的徽章文字
    pub fn label(&self) -> String {
        let raw = match self {
            AdviceStatus::Pending => "pending",
            AdviceStatus::Completed => "completed",
            AdviceStatus::Other(raw) => raw.as_str(),
        };
        let mut chars = raw.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// 历史列表中的分组顺序
    pub fn rank(&self) -> u8 {
        match self {
            AdviceStatus::Pending => 0,
            AdviceStatus::Completed => 1,
            AdviceStatus::Other(_) => 2,
        }
    }
}

impl From<Option<String>> for AdviceStatus {
    fn from(raw: Option<String>) -> Self {
        match raw {
            None => AdviceStatus::Pending,
            Some(s) if s.eq_ignore_ascii_case("pending") => AdviceStatus::Pending,
            Some(s) if s.eq_ignore_ascii_case("completed") => AdviceStatus::Completed,
            Some(s) => AdviceStatus::Other(s),
        }
    }
}

impl From<Option<Value>> for AdviceStatus {
    fn from(raw: Option<Value>) -> Self {
        raw.and_then(lenient::scalar_text).into()
    }
}

impl From<AdviceStatus> for Option<String> {
    fn from(status: AdviceStatus) -> Self {
        Some(match status {
            AdviceStatus::Pending => "pending".to_string(),
            AdviceStatus::Completed => "completed".to_string(),
            AdviceStatus::Other(raw) => raw,
        })
    }
}

/// 引用：后端可能已展开为对象，也可能只给一个 id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityRef<T> {
    Populated(T),
    #[serde(deserialize_with = "lenient::ref_id")]
    Id(String),
}

impl<T> EntityRef<T> {
    pub fn populated(&self) -> Option<&T> {
        match self {
            EntityRef::Populated(value) => Some(value),
            EntityRef::Id(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviceRequest {
    #[serde(
        default,
        deserialize_with = "lenient::id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(
        rename = "_id",
        default,
        deserialize_with = "lenient::id",
        skip_serializing_if = "Option::is_none"
    )]
    pub object_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expert: Option<EntityRef<Expert>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<EntityRef<Report>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub status: AdviceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl AdviceRequest {
    pub fn key(&self) -> &str {
        entity_key(&self.object_id, &self.id)
    }

    pub fn report_title(&self) -> String {
        match &self.report {
            Some(EntityRef::Populated(report)) => report.display_name().to_string(),
            Some(EntityRef::Id(id)) => format!("Report {}", id),
            None => "Unnamed Report".to_string(),
        }
    }

    /// "Dr. Sarah Johnson (Plant Pathology)" 形式
    pub fn expert_label(&self) -> String {
        match &self.expert {
            Some(EntityRef::Populated(expert)) => match &expert.specialty {
                Some(specialty) => format!("{} ({})", expert.name, specialty),
                None => expert.name.clone(),
            },
            Some(EntityRef::Id(id)) => format!("Expert {}", id),
            None => "Unassigned".to_string(),
        }
    }

    /// 只有已完成且有回复时才展示专家回复
    pub fn expert_response(&self) -> Option<&str> {
        match self.status {
            AdviceStatus::Completed => non_empty(&self.response),
            _ => None,
        }
    }
}

// =========================================================
// 请求与响应体 (Wire Bodies)
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// 登录/注册响应，两个字段都可能缺失
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub token: Option<String>,
}

/// 后端错误负载：`{"error": "..."}`，部分接口使用 `message`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerError {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ServerError {
    pub fn into_message(self) -> Option<String> {
        self.error
            .or(self.message)
            .filter(|m| !m.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainRequest {
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainResponse {
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdviceRequest {
    pub expert_id: String,
    pub report_id: String,
    pub message: String,
}

// =========================================================
// 内部工具
// =========================================================

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

fn entity_key<'a>(object_id: &'a Option<String>, id: &'a Option<String>) -> &'a str {
    non_empty(object_id).or_else(|| non_empty(id)).unwrap_or("")
}

// =========================================================
// 列表行键
// =========================================================

/// `For` 使用的行键：实体键加上该键此前出现的次数
pub type RowKey = (String, usize);

/// 为列表生成互不重复的行键
///
/// 缺少 id 的记录键为空串，重复的键按出现顺序编号，id 唯一时编号恒为 0。
pub fn keyed_rows<T>(items: Vec<T>, key: impl Fn(&T) -> &str) -> Vec<(RowKey, T)> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    items
        .into_iter()
        .map(|item| {
            let entity = key(&item).to_string();
            let count = seen.entry(entity.clone()).or_default();
            let row = (entity, *count);
            *count += 1;
            (row, item)
        })
        .collect()
}
