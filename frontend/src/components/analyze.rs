//! Analyze 页面：输入诊断名称，请求 AI 解读

use crate::api::PlantApi;
use crate::auth::use_auth;
use crate::components::explanation::{Explanation, ExplanationBody, explain, settle_signal};
use crate::components::icons::Sparkles;
use crate::web::task::TaskScope;
use leptos::prelude::*;

#[component]
pub fn AnalyzePage() -> impl IntoView {
    let auth = use_auth();
    let tasks = TaskScope::new();

    let query = RwSignal::new(String::new());
    let explanation = RwSignal::new(Explanation::Idle);
    let (hint, set_hint) = signal(Option::<&'static str>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = query.get().trim().to_string();
        if text.is_empty() {
            set_hint.set(Some("Enter a diagnosis to explain."));
            return;
        }

        set_hint.set(None);
        explanation.set(Explanation::Loading { query: text.clone() });
        let token = auth.token_untracked();
        tasks.spawn(async move {
            let api = PlantApi::from_config();
            settle_signal(explanation, explain(&api, text, token.as_ref()).await);
        });
    };

    view! {
        <div class="p-4 md:p-8">
            <div class="max-w-3xl mx-auto space-y-6">
                <div class="card bg-base-100 shadow-md">
                    <form class="card-body" on:submit=on_submit>
                        <h2 class="card-title">"Explain a diagnosis"</h2>
                        <p class="text-base-content/60 text-sm">
                            "Type a disease or analysis result, e.g. \"Tomato early blight\"."
                        </p>
                        <div class="join w-full mt-2">
                            <input
                                type="text"
                                class="input input-bordered join-item flex-1"
                                placeholder="Analysis result"
                                bind:value=query
                            />
                            <button
                                type="submit"
                                class="btn btn-success join-item gap-1"
                                disabled=move || explanation.with(Explanation::is_loading)
                            >
                                <Sparkles attr:class="h-4 w-4" />
                                "Explain"
                            </button>
                        </div>
                        {move || hint.get().map(|h| view! { <p class="text-error text-sm">{h}</p> })}
                    </form>
                </div>

                <Show when=move || explanation.with(|e| *e != Explanation::Idle)>
                    <div class="card bg-base-100 shadow-md">
                        <div class="card-body">
                            <ExplanationBody state=explanation />
                        </div>
                    </div>
                </Show>
            </div>
        </div>
    }
}
