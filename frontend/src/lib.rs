//! PlantDoc 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义与守卫（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 认证状态管理
//! - `api`: 后端客户端
//! - `components`: UI 组件层

mod api;
mod auth;
mod components {
    pub mod analyze;
    pub mod dashboard;
    pub mod experts;
    mod explanation;
    mod icons;
    pub mod login;
    pub mod shell;
    pub mod signup;
}
mod config;
mod error;

use crate::auth::{AuthContext, init_auth};
use crate::components::analyze::AnalyzePage;
use crate::components::dashboard::DashboardPage;
use crate::components::experts::ExpertsPage;
use crate::components::login::LoginPage;
use crate::components::shell::Shell;
use crate::components::signup::SignupPage;

use leptos::prelude::*;

// 浏览器 API 封装模块（fetch、LocalStorage、History）
pub(crate) mod web {
    pub mod http;
    pub mod route;
    pub mod router;
    pub mod storage;
    pub mod task;
}

use web::route::AppRoute;
use web::router::{Router, RouterOutlet, current_path, use_router};

/// 路由匹配函数
///
/// 只会收到守卫放行的路由；根路径和未知路径总是被重定向。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Signup => view! { <SignupPage /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::Analyze => view! { <AnalyzePage /> }.into_any(),
        AppRoute::Experts => view! { <ExpertsPage /> }.into_any(),
        AppRoute::Root | AppRoute::NotFound => ().into_any(),
    }
}

/// 每次导航后重新校验持久化的会话
#[component]
fn SessionSync(auth: AuthContext) -> impl IntoView {
    let router = use_router();

    Effect::new(move |_| {
        let route = router.current_route().get();
        init_auth(&auth, route);
    });
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建认证上下文
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);

    // 2. 同步读取 LocalStorage，在路由首次判定前确定认证状态
    init_auth(&auth_ctx, AppRoute::from_path(&current_path()));

    // 3. 认证状态信号注入路由服务
    let auth_status = auth_ctx.status_signal();

    view! {
        <Router auth_status=auth_status>
            <SessionSync auth=auth_ctx />
            <Shell>
                <RouterOutlet matcher=route_matcher />
            </Shell>
        </Router>
    }
}
