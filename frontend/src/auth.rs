//! 认证模块
//!
//! 管理用户认证状态，与路由系统解耦。
//! 路由服务通过注入的 `Signal<AuthStatus>` 检查认证状态，
//! 登录/登出后的跳转由路由守卫自动完成。

use crate::api::PlantApi;
use crate::error::ApiError;
use crate::web::http::HttpClient;
use crate::web::route::AppRoute;
use crate::web::storage::{KeyValueStore, LocalStorage};
use leptos::prelude::*;
use plantdoc_shared::{
    LoginRequest, STORAGE_TOKEN_KEY, STORAGE_USER_KEY, SignupRequest, Token, User,
};
use thiserror::Error;

#[cfg(test)]
mod tests;

// =========================================================
// 会话模型
// =========================================================

/// 三态认证状态，`Unknown` 只存在于初始化完成之前
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthStatus {
    #[default]
    Unknown,
    Authenticated,
    Anonymous,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: User,
    pub token: Token,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// 后端返回的错误消息，原样展示
    #[error("{0}")]
    Server(String),
    /// 没有可用的后端消息时的通用提示
    #[error("{0}")]
    Connection(&'static str),
    #[error("Invalid login credentials.")]
    IncompleteResponse,
    #[error("Could not save your session. Please try again.")]
    Storage,
}

// =========================================================
// 持久化 (token + user 两个键，要么都在，要么都不在)
// =========================================================

pub struct SessionStore<S: KeyValueStore> {
    storage: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    #[cfg(test)]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// 读取持久化的会话，任一部分缺失或损坏都返回 `None`
    pub fn load(&self) -> Option<Session> {
        let token = self.storage.get(STORAGE_TOKEN_KEY).and_then(Token::parse)?;
        let raw_user = self.storage.get(STORAGE_USER_KEY)?;
        match serde_json::from_str::<User>(&raw_user) {
            Ok(user) => Some(Session { user, token }),
            Err(e) => {
                log::warn!("[Auth] Stored user record is unreadable: {}", e);
                None
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<(), AuthError> {
        let user = serde_json::to_string(&session.user).map_err(|_| AuthError::Storage)?;

        if !self.storage.set(STORAGE_TOKEN_KEY, session.token.as_str()) {
            return Err(AuthError::Storage);
        }
        if !self.storage.set(STORAGE_USER_KEY, &user) {
            self.storage.delete(STORAGE_TOKEN_KEY);
            return Err(AuthError::Storage);
        }
        Ok(())
    }

    pub fn clear(&self) {
        self.storage.delete(STORAGE_TOKEN_KEY);
        self.storage.delete(STORAGE_USER_KEY);
    }
}

/// 初始化结果
#[derive(Debug, Clone, PartialEq)]
pub enum InitOutcome {
    Restored(Session),
    /// 没有有效会话；`redirect` 为守卫将要执行的跳转
    Cleared { redirect: Option<AppRoute> },
}

/// 从持久化存储恢复会话，无效时清理残留的键
pub fn restore_session<S: KeyValueStore>(store: &SessionStore<S>, route: AppRoute) -> InitOutcome {
    if let Some(session) = store.load() {
        return InitOutcome::Restored(session);
    }

    store.clear();
    let redirect = (!route.is_auth_page()).then(AppRoute::auth_failure_redirect);
    InitOutcome::Cleared { redirect }
}

/// 登录或注册的表单数据
#[derive(Debug, Clone)]
pub enum Credentials {
    Signup(SignupRequest),
    Login(LoginRequest),
}

impl Credentials {
    fn fallback_message(&self) -> &'static str {
        match self {
            Credentials::Signup(_) => "Connection error. Please try again.",
            Credentials::Login(_) => "Login failed. Please try again.",
        }
    }
}

/// 调用登录/注册接口并持久化会话
///
/// 失败时不修改存储中已有的内容。
pub async fn authenticate<C, S>(
    api: &PlantApi<C>,
    store: &SessionStore<S>,
    credentials: &Credentials,
) -> Result<Session, AuthError>
where
    C: HttpClient,
    S: KeyValueStore,
{
    let result = match credentials {
        Credentials::Signup(request) => api.signup(request).await,
        Credentials::Login(request) => api.login(request).await,
    };

    let response = result.map_err(|e: ApiError| {
        log::warn!("[Auth] Request failed: {}", e);
        match e.server_message() {
            Some(message) => AuthError::Server(message.to_string()),
            None => AuthError::Connection(credentials.fallback_message()),
        }
    })?;

    let session = match (response.user, response.token.and_then(Token::parse)) {
        (Some(user), Some(token)) => Session { user, token },
        _ => return Err(AuthError::IncompleteResponse),
    };

    store.save(&session)?;
    Ok(session)
}

// =========================================================
// 响应式上下文
// =========================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuthState {
    pub status: AuthStatus,
    pub session: Option<Session>,
}

impl AuthState {
    fn authenticated(session: Session) -> Self {
        Self {
            status: AuthStatus::Authenticated,
            session: Some(session),
        }
    }

    fn anonymous() -> Self {
        Self {
            status: AuthStatus::Anonymous,
            session: None,
        }
    }
}

/// 认证上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    pub state: ReadSignal<AuthState>,
    pub set_state: WriteSignal<AuthState>,
}

impl AuthContext {
    pub fn new() -> Self {
        let (state, set_state) = signal(AuthState::default());
        Self { state, set_state }
    }

    /// 认证状态信号（用于路由服务注入）
    pub fn status_signal(&self) -> Signal<AuthStatus> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.status))
    }

    pub fn user(&self) -> Signal<Option<User>> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.session.as_ref().map(|s| s.user.clone())))
    }

    /// 当前凭据（不追踪），在请求发出时读取
    pub fn token_untracked(&self) -> Option<Token> {
        self.state
            .with_untracked(|s| s.session.as_ref().map(|s| s.token.clone()))
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

fn session_store() -> SessionStore<LocalStorage> {
    SessionStore::new(LocalStorage)
}

/// 初始化认证状态
///
/// 每次导航都会重新执行；状态没有变化时不写信号。
pub fn init_auth(ctx: &AuthContext, route: AppRoute) {
    let next = match restore_session(&session_store(), route) {
        InitOutcome::Restored(session) => AuthState::authenticated(session),
        InitOutcome::Cleared { redirect } => {
            if let Some(target) = redirect {
                log::debug!("[Auth] No valid session on {}, guard will send to {}", route, target);
            }
            AuthState::anonymous()
        }
    };

    if ctx.state.with_untracked(|current| *current != next) {
        ctx.set_state.set(next);
    }
}

async fn sign_in(ctx: &AuthContext, credentials: Credentials) -> Result<(), AuthError> {
    let api = PlantApi::from_config();
    let session = authenticate(&api, &session_store(), &credentials).await?;
    log::info!("[Auth] Signed in as {}", session.user.display_name());
    ctx.set_state.set(AuthState::authenticated(session));
    Ok(())
}

/// 注册新账户，成功后守卫会跳转到面板
pub async fn signup(
    ctx: &AuthContext,
    name: String,
    email: String,
    password: String,
) -> Result<(), AuthError> {
    sign_in(
        ctx,
        Credentials::Signup(SignupRequest {
            name,
            email,
            password,
        }),
    )
    .await
}

/// 登录，成功后守卫会跳转到面板
pub async fn login(ctx: &AuthContext, email: String, password: String) -> Result<(), AuthError> {
    sign_in(ctx, Credentials::Login(LoginRequest { email, password })).await
}

/// 注销并清除状态
///
/// 不需要手动导航，路由服务会监听认证状态变化并重定向到登录页。
pub fn logout(ctx: &AuthContext) {
    session_store().clear();
    ctx.set_state.set(AuthState::anonymous());
    log::info!("[Auth] Signed out");
}
