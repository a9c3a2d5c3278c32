//! 前端统一错误类型

use crate::web::http::HttpError;
use plantdoc_shared::DecodeError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 需要凭据的接口在本地即被拒绝，不发出请求
    #[error("No authentication token found.")]
    MissingCredential,

    #[error("Network error: {0}")]
    Network(String),

    /// 非 2xx 响应，`message` 为后端错误负载中的消息
    #[error("Request failed with status {status}")]
    Status { status: u16, message: Option<String> },

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    /// 后端给出的错误消息（仅 `Status` 变体）
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// 面向用户的文字
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<HttpError> for ApiError {
    fn from(e: HttpError) -> Self {
        ApiError::Network(e.to_string())
    }
}

impl From<DecodeError> for ApiError {
    fn from(e: DecodeError) -> Self {
        ApiError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message() {
        assert_eq!(
            ApiError::MissingCredential.user_message(),
            "No authentication token found."
        );
        let err = ApiError::Status {
            status: 409,
            message: Some("Email already registered".into()),
        };
        assert_eq!(err.user_message(), "Email already registered");
        assert_eq!(err.server_message(), Some("Email already registered"));

        let err = ApiError::Status {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message(), "Request failed with status 500");
        assert_eq!(err.server_message(), None);
    }

    #[test]
    fn test_conversions() {
        let err: ApiError = HttpError::NetworkError("offline".into()).into();
        assert_eq!(err, ApiError::Network("network error: offline".into()));
        let err: ApiError = DecodeError::NotJson("eof".into()).into();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
