use crate::normalize::{DecodeError, decode_list, normalize_reports};
use crate::{
    AdviceRequest, AuthResponse, CreateAdviceRequest, ExplainRequest, ExplainResponse, Expert,
    LoginRequest, Report, SignupRequest,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }

    /// Only POST endpoints carry a JSON body.
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post)
    }
}

/// Whether an endpoint needs the bearer credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRequirement {
    /// Public endpoint, no credential is sent.
    None,
    /// Credential is attached when available.
    Optional,
    /// Refused locally when no credential is present.
    Bearer,
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The URL path (or suffix).
    const PATH: &'static str;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Credential policy.
    const AUTH: AuthRequirement;

    /// Decode a successful response body.
    fn decode(body: &str) -> Result<Self::Response, DecodeError> {
        serde_json::from_str(body).map_err(DecodeError::from)
    }
}

// =========================================================
// Request Definitions
// =========================================================

impl ApiRequest for SignupRequest {
    type Response = AuthResponse;
    const PATH: &'static str = "/auth/signup";
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTH: AuthRequirement = AuthRequirement::None;
}

impl ApiRequest for LoginRequest {
    type Response = AuthResponse;
    const PATH: &'static str = "/auth/login";
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTH: AuthRequirement = AuthRequirement::None;
}

/// List the current user's reports (dashboard)
#[derive(Debug, Serialize, Deserialize)]
pub struct ListReportsRequest;

impl ApiRequest for ListReportsRequest {
    type Response = Vec<Report>;
    const PATH: &'static str = "/api/reports";
    const METHOD: HttpMethod = HttpMethod::Get;
    const AUTH: AuthRequirement = AuthRequirement::Bearer;

    // Bare array or `{reports: [...]}`; anything else degrades to an empty list.
    fn decode(body: &str) -> Result<Self::Response, DecodeError> {
        normalize_reports(body)
    }
}

/// Ask the AI proxy to explain an analysis result
impl ApiRequest for ExplainRequest {
    type Response = ExplainResponse;
    const PATH: &'static str = "/api/gemini";
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTH: AuthRequirement = AuthRequirement::Optional;
}

/// List available experts
#[derive(Debug, Serialize, Deserialize)]
pub struct ListExpertsRequest;

impl ApiRequest for ListExpertsRequest {
    type Response = Vec<Expert>;
    const PATH: &'static str = "/experts";
    const METHOD: HttpMethod = HttpMethod::Get;
    const AUTH: AuthRequirement = AuthRequirement::Bearer;

    fn decode(body: &str) -> Result<Self::Response, DecodeError> {
        decode_list(body, "expert")
    }
}

/// List reports selectable in an advice request
#[derive(Debug, Serialize, Deserialize)]
pub struct ListUserReportsRequest;

impl ApiRequest for ListUserReportsRequest {
    type Response = Vec<Report>;
    const PATH: &'static str = "/reports/user";
    const METHOD: HttpMethod = HttpMethod::Get;
    const AUTH: AuthRequirement = AuthRequirement::Bearer;

    fn decode(body: &str) -> Result<Self::Response, DecodeError> {
        decode_list(body, "report")
    }
}

/// List the user's advice requests
#[derive(Debug, Serialize, Deserialize)]
pub struct ListAdviceRequestsRequest;

impl ApiRequest for ListAdviceRequestsRequest {
    type Response = Vec<AdviceRequest>;
    const PATH: &'static str = "/expert-requests";
    const METHOD: HttpMethod = HttpMethod::Get;
    const AUTH: AuthRequirement = AuthRequirement::Bearer;

    fn decode(body: &str) -> Result<Self::Response, DecodeError> {
        decode_list(body, "advice request")
    }
}

impl ApiRequest for CreateAdviceRequest {
    type Response = AdviceRequest;
    const PATH: &'static str = "/expert-requests";
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTH: AuthRequirement = AuthRequirement::Bearer;
}
