//! 页面外壳：侧边栏导航 + 页头
//!
//! 登录和注册页不显示外壳。

use crate::auth::{logout, use_auth};
use crate::components::icons::*;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};
use leptos::prelude::*;

/// 侧边栏导航项
const NAV_ITEMS: [(AppRoute, &str); 3] = [
    (AppRoute::Dashboard, "Dashboard"),
    (AppRoute::Analyze, "Analyze"),
    (AppRoute::Experts, "Advice"),
];

fn nav_icon(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Analyze => view! { <Search attr:class="h-5 w-5 shrink-0" /> }.into_any(),
        AppRoute::Experts => view! { <Users attr:class="h-5 w-5 shrink-0" /> }.into_any(),
        _ => view! { <LayoutDashboard attr:class="h-5 w-5 shrink-0" /> }.into_any(),
    }
}

#[component]
pub fn Shell(children: Children) -> impl IntoView {
    let router = use_router();
    let shows_shell = move || router.current_route().get().shows_shell();

    view! {
        <div class="flex min-h-screen bg-base-200 font-sans">
            <Show when=shows_shell>
                <Sidebar />
            </Show>
            <div class="flex-1 flex flex-col min-w-0">
                <Show when=shows_shell>
                    <Header />
                </Show>
                <main class="flex-1">{children()}</main>
            </div>
        </div>
    }
}

#[component]
fn Sidebar() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let expanded = RwSignal::new(true);
    let user = auth.user();

    let on_logout = move |_| logout(&auth);

    view! {
        <aside class=move || {
            if expanded.get() {
                "w-60 bg-base-100 shadow-lg flex flex-col transition-all"
            } else {
                "w-16 bg-base-100 shadow-lg flex flex-col transition-all"
            }
        }>
            <div class="flex items-center gap-2 p-4 border-b border-base-200">
                <button
                    class="btn btn-ghost btn-sm btn-square"
                    aria-label="Toggle sidebar"
                    on:click=move |_| expanded.update(|open| *open = !*open)
                >
                    <Menu attr:class="h-5 w-5" />
                </button>
                <Show when=move || expanded.get()>
                    <Leaf attr:class="h-6 w-6 text-success" />
                    <span class="font-bold text-lg">"PlantDoc"</span>
                </Show>
            </div>

            <ul class="menu flex-1 gap-1 p-2">
                {NAV_ITEMS
                    .into_iter()
                    .map(move |(route, label)| {
                        let class = Signal::derive(move || {
                            if router.current_route().get() == route {
                                "active flex items-center gap-3".to_string()
                            } else {
                                "flex items-center gap-3".to_string()
                            }
                        });
                        view! {
                            <li>
                                <Link route=route class=class>
                                    {nav_icon(route)}
                                    <Show when=move || expanded.get()>
                                        <span>{label}</span>
                                    </Show>
                                </Link>
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>

            <div class="p-2 border-t border-base-200">
                <Show when=move || expanded.get()>
                    <p class="px-4 py-2 text-sm text-base-content/60 truncate">
                        {move || user.get().map(|u| u.display_name().to_string()).unwrap_or_default()}
                    </p>
                </Show>
                <button on:click=on_logout class="btn btn-ghost w-full justify-start gap-3 text-error">
                    <LogOut attr:class="h-5 w-5 shrink-0" />
                    <Show when=move || expanded.get()>
                        <span>"Logout"</span>
                    </Show>
                </button>
            </div>
        </aside>
    }
}

#[component]
fn Header() -> impl IntoView {
    let router = use_router();
    let title = move || router.current_route().get().title();

    view! {
        <header class="navbar bg-base-100 shadow px-6">
            <h1 class="text-2xl font-bold">{title}</h1>
        </header>
    }
}
