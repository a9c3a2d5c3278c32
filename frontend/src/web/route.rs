//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由、页面标题以及守卫决策。

use std::fmt::Display;

use crate::auth::AuthStatus;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppRoute {
    /// 根路径，根据认证状态重定向
    #[default]
    Root,
    /// 登录页面
    Login,
    /// 注册页面
    Signup,
    /// 历史报告 (需要认证)
    Dashboard,
    /// AI 解读 (需要认证)
    Analyze,
    /// 专家咨询 (需要认证)
    Experts,
    /// 未知路径，与根路径同样处理
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        let path = path.trim_end_matches('/');
        match path {
            "" => Self::Root,
            "/login" => Self::Login,
            "/signup" => Self::Signup,
            "/dashboard" => Self::Dashboard,
            "/analyze" => Self::Analyze,
            "/experts" => Self::Experts,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Root => "/",
            Self::Login => "/login",
            Self::Signup => "/signup",
            Self::Dashboard => "/dashboard",
            Self::Analyze => "/analyze",
            Self::Experts => "/experts",
            Self::NotFound => "/404",
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::Dashboard | Self::Analyze | Self::Experts)
    }

    /// 登录/注册页：已认证用户应离开，未认证时初始化不重定向
    pub fn is_auth_page(&self) -> bool {
        matches!(self, Self::Login | Self::Signup)
    }

    /// 侧边栏与页头只在非认证页显示
    pub fn shows_shell(&self) -> bool {
        !self.is_auth_page()
    }

    /// 页头标题
    pub fn title(&self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Analyze => "Analyze",
            Self::Experts => "Expert Advice",
            Self::Login => "Login",
            Self::Signup => "Sign Up",
            Self::Root | Self::NotFound => "Plant Health App",
        }
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取认证成功时的重定向目标
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

/// 守卫决策
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// 渲染该路由
    Render(AppRoute),
    /// 认证状态未确定，渲染中性的加载占位
    Loading,
    /// 以 replace 语义跳转
    Redirect(AppRoute),
}

/// 路由守卫：当前路由与认证状态的纯函数
///
/// 认证状态未知时绝不重定向，避免有效会话在初始化完成前被闪到登录页。
pub fn guard(route: AppRoute, status: AuthStatus) -> GuardDecision {
    let landing = || match status {
        AuthStatus::Authenticated => AppRoute::auth_success_redirect(),
        _ => AppRoute::auth_failure_redirect(),
    };

    match (route, status) {
        (AppRoute::Root | AppRoute::NotFound, AuthStatus::Unknown) => GuardDecision::Loading,
        (AppRoute::Root | AppRoute::NotFound, _) => GuardDecision::Redirect(landing()),
        (r, AuthStatus::Unknown) if r.requires_auth() => GuardDecision::Loading,
        (r, AuthStatus::Anonymous) if r.requires_auth() => {
            GuardDecision::Redirect(AppRoute::auth_failure_redirect())
        }
        (r, AuthStatus::Authenticated) if r.is_auth_page() => {
            GuardDecision::Redirect(AppRoute::auth_success_redirect())
        }
        (r, _) => GuardDecision::Render(r),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [AppRoute; 7] = [
        AppRoute::Root,
        AppRoute::Login,
        AppRoute::Signup,
        AppRoute::Dashboard,
        AppRoute::Analyze,
        AppRoute::Experts,
        AppRoute::NotFound,
    ];

    #[test]
    fn test_path_round_trip() {
        for route in ALL.into_iter().filter(|r| *r != AppRoute::NotFound) {
            assert_eq!(AppRoute::from_path(route.to_path()), route);
        }
        assert_eq!(AppRoute::from_path("/dashboard/"), AppRoute::Dashboard);
        assert_eq!(AppRoute::from_path("/nope"), AppRoute::NotFound);
    }

    #[test]
    fn test_never_renders_protected_when_anonymous() {
        for route in ALL {
            let decision = guard(route, AuthStatus::Anonymous);
            if let GuardDecision::Render(r) = decision {
                assert!(!r.requires_auth(), "{:?} rendered while anonymous", r);
            }
        }
        assert_eq!(
            guard(AppRoute::Experts, AuthStatus::Anonymous),
            GuardDecision::Redirect(AppRoute::Login)
        );
    }

    #[test]
    fn test_never_redirects_while_unknown() {
        for route in ALL {
            assert!(
                !matches!(guard(route, AuthStatus::Unknown), GuardDecision::Redirect(_)),
                "{:?} redirected before auth was known",
                route
            );
        }
        assert_eq!(guard(AppRoute::Dashboard, AuthStatus::Unknown), GuardDecision::Loading);
        assert_eq!(
            guard(AppRoute::Login, AuthStatus::Unknown),
            GuardDecision::Render(AppRoute::Login)
        );
    }

    #[test]
    fn test_authenticated_routes() {
        assert_eq!(
            guard(AppRoute::Analyze, AuthStatus::Authenticated),
            GuardDecision::Render(AppRoute::Analyze)
        );
        assert_eq!(
            guard(AppRoute::Signup, AuthStatus::Authenticated),
            GuardDecision::Redirect(AppRoute::Dashboard)
        );
        assert_eq!(
            guard(AppRoute::NotFound, AuthStatus::Authenticated),
            GuardDecision::Redirect(AppRoute::Dashboard)
        );
        assert_eq!(
            guard(AppRoute::Root, AuthStatus::Anonymous),
            GuardDecision::Redirect(AppRoute::Login)
        );
    }

    #[test]
    fn test_redirect_targets_are_stable() {
        // 重定向目标必须直接可渲染，否则 Effect 会循环跳转
        for status in [AuthStatus::Authenticated, AuthStatus::Anonymous] {
            for route in ALL {
                if let GuardDecision::Redirect(target) = guard(route, status) {
                    assert_eq!(guard(target, status), GuardDecision::Render(target));
                }
            }
        }
    }

    #[test]
    fn test_titles_and_shell() {
        assert_eq!(AppRoute::Experts.title(), "Expert Advice");
        assert_eq!(AppRoute::Signup.title(), "Sign Up");
        assert_eq!(AppRoute::NotFound.title(), "Plant Health App");
        assert!(!AppRoute::Login.shows_shell());
        assert!(AppRoute::Dashboard.shows_shell());
    }
}
