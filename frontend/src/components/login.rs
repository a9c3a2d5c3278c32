use crate::auth::{login, use_auth};
use crate::components::icons::{AlertCircle, Leaf};
use crate::web::route::AppRoute;
use crate::web::router::Link;
use crate::web::task::TaskScope;
use leptos::prelude::*;

/// 错误提示条，登录与注册页共用
#[component]
pub fn FormError(message: ReadSignal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || message.with(Option::is_some)>
            <div role="alert" class="alert alert-error text-sm py-2">
                <AlertCircle attr:class="shrink-0 h-5 w-5" />
                <span>{move || message.get().unwrap_or_default()}</span>
            </div>
        </Show>
    }
}

/// 登录/注册页的品牌标题
#[component]
pub fn AuthHeading(title: &'static str, subtitle: &'static str) -> impl IntoView {
    view! {
        <div class="text-center mb-4">
            <div class="flex flex-col items-center gap-2">
                <div class="p-3 bg-success/10 rounded-2xl text-success">
                    <Leaf attr:class="h-8 w-8" />
                </div>
                <h1 class="text-3xl font-bold">{title}</h1>
                <p class="text-base-content/70">{subtitle}</p>
            </div>
        </div>
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let tasks = TaskScope::new();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if email.get().trim().is_empty() || password.get().is_empty() {
            set_error_msg.set(Some("Please fill in all fields".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        tasks.spawn(async move {
            // 成功后由路由守卫跳转到面板
            if let Err(e) = login(&auth, email.get_untracked().trim().to_string(), password.get_untracked()).await {
                set_error_msg.set(Some(e.to_string()));
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <AuthHeading title="Welcome back" subtitle="Log in to see your plant health reports" />

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <FormError message=error_msg />

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                placeholder="you@example.com"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-success" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Logging in..." }.into_any()
                                } else {
                                    "Login".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-center text-sm mt-2">
                            "Don't have an account? "
                            <Link route=AppRoute::Signup class="link link-success">"Sign up"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
