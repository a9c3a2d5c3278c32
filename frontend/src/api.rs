//! PlantDoc 后端客户端
//!
//! 每个接口由 `plantdoc_shared::protocol` 中的 [`ApiRequest`] 描述，
//! 这里只有一个通用的 [`PlantApi::send`]，凭据按请求显式传入。

use crate::config::CONFIG;
use crate::error::ApiError;
use crate::web::http::{FetchClient, HttpClient, HttpRequest};
use plantdoc_shared::protocol::{
    ListAdviceRequestsRequest, ListExpertsRequest, ListReportsRequest, ListUserReportsRequest,
};
use plantdoc_shared::{
    AdviceRequest, ApiRequest, AuthRequirement, AuthResponse, CreateAdviceRequest,
    ExplainRequest, Expert, HEADER_AUTHORIZATION, LoginRequest, Report, ServerError,
    SignupRequest, Token,
};


#[derive(Clone, Debug, PartialEq)]
pub struct PlantApi<C: HttpClient> {
    base_url: String,
    client: C,
}

impl PlantApi<FetchClient> {
    /// 使用编译期配置的后端地址
    pub fn from_config() -> Self {
        Self::new(&CONFIG.api_base_url, FetchClient)
    }
}

impl<C: HttpClient> PlantApi<C> {
    pub fn new(base_url: &str, client: C) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    #[cfg(test)]
    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 发送一个接口请求
    ///
    /// - `Bearer` 接口缺少凭据时直接返回 [`ApiError::MissingCredential`]
    /// - 非 2xx 响应转换为 [`ApiError::Status`]，并尽量带上后端的错误消息
    pub async fn send<R: ApiRequest>(
        &self,
        request: &R,
        token: Option<&Token>,
    ) -> Result<R::Response, ApiError> {
        let token = match R::AUTH {
            AuthRequirement::None => None,
            AuthRequirement::Optional => token,
            AuthRequirement::Bearer => Some(token.ok_or(ApiError::MissingCredential)?),
        };

        let mut req = HttpRequest::new(&self.url(R::PATH), R::METHOD)
            .with_header("Content-Type", "application/json");
        if let Some(token) = token {
            req = req.with_header(HEADER_AUTHORIZATION, &token.bearer());
        }
        if R::METHOD.has_body() {
            let body = serde_json::to_string(request)
                .map_err(|e| ApiError::Validation(e.to_string()))?;
            req = req.with_body(body);
        }

        log::debug!("[Api] {} {}", R::METHOD.as_str(), R::PATH);
        let res = self.client.send(req).await?;

        if !res.ok() {
            let message = serde_json::from_str::<ServerError>(&res.body)
                .ok()
                .and_then(ServerError::into_message);
            log::warn!("[Api] {} {} -> {}", R::METHOD.as_str(), R::PATH, res.status);
            return Err(ApiError::Status {
                status: res.status,
                message,
            });
        }

        Ok(R::decode(&res.body)?)
    }

    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, ApiError> {
        self.send(request, None).await
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.send(request, None).await
    }

    /// 当前用户的诊断报告
    pub async fn list_reports(&self, token: Option<&Token>) -> Result<Vec<Report>, ApiError> {
        self.send(&ListReportsRequest, token).await
    }

    /// 请求 AI 解读诊断结果
    pub async fn explain(&self, query: &str, token: Option<&Token>) -> Result<String, ApiError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ApiError::Validation(
                "There is nothing to explain yet.".to_string(),
            ));
        }
        let request = ExplainRequest {
            query: query.to_string(),
        };
        Ok(self.send(&request, token).await?.result)
    }

    pub async fn list_experts(&self, token: Option<&Token>) -> Result<Vec<Expert>, ApiError> {
        self.send(&ListExpertsRequest, token).await
    }

    pub async fn list_user_reports(&self, token: Option<&Token>) -> Result<Vec<Report>, ApiError> {
        self.send(&ListUserReportsRequest, token).await
    }

    pub async fn list_advice_requests(
        &self,
        token: Option<&Token>,
    ) -> Result<Vec<AdviceRequest>, ApiError> {
        self.send(&ListAdviceRequestsRequest, token).await
    }

    pub async fn create_advice_request(
        &self,
        request: &CreateAdviceRequest,
        token: Option<&Token>,
    ) -> Result<AdviceRequest, ApiError> {
        self.send(request, token).await
    }
}
