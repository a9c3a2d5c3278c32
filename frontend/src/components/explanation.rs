//! AI 解读：状态机与展示面板
//!
//! "Know more" 弹层与 Analyze 页面共用，加载状态独立于报告列表。

use crate::api::PlantApi;
use crate::components::icons::{AlertCircle, Close, Sparkles};
use crate::web::http::HttpClient;
use leptos::prelude::*;
use plantdoc_shared::Token;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Explanation {
    #[default]
    Idle,
    Loading { query: String },
    Ready { query: String, text: String },
    Failed { query: String, message: String },
}

impl Explanation {
    pub fn is_loading(&self) -> bool {
        matches!(self, Explanation::Loading { .. })
    }

    pub fn query(&self) -> Option<&str> {
        match self {
            Explanation::Idle => None,
            Explanation::Loading { query }
            | Explanation::Ready { query, .. }
            | Explanation::Failed { query, .. } => Some(query),
        }
    }

    /// 用请求结果替换加载状态
    ///
    /// 只有仍在等待同一个问题时才写入；弹层已关闭或已切换到其他问题时丢弃结果。
    pub fn settle(&mut self, outcome: Explanation) -> bool {
        let waiting = matches!(
            self,
            Explanation::Loading { query } if outcome.query() == Some(query.as_str())
        );
        if waiting {
            *self = outcome;
        }
        waiting
    }
}

/// 在信号上结束一次请求，迟到的结果只记录日志
pub fn settle_signal(state: RwSignal<Explanation>, outcome: Explanation) {
    let applied = state
        .try_update(|current| current.settle(outcome))
        .unwrap_or(false);
    if !applied {
        log::debug!("[Explain] Dropped a stale explanation");
    }
}

/// 请求解读并转换为最终状态
pub async fn explain<C: HttpClient>(
    api: &PlantApi<C>,
    query: String,
    token: Option<&Token>,
) -> Explanation {
    match api.explain(&query, token).await {
        Ok(text) => Explanation::Ready { query, text },
        Err(e) => {
            log::warn!("[Explain] {}", e);
            Explanation::Failed {
                query,
                message: format!("Could not get an explanation: {}", e.user_message()),
            }
        }
    }
}

/// 解读内容（不含外框）
#[component]
pub fn ExplanationBody(state: RwSignal<Explanation>) -> impl IntoView {
    move || match state.get() {
        Explanation::Idle => ().into_any(),
        Explanation::Loading { .. } => view! {
            <div class="flex items-center gap-3 py-6 text-base-content/70">
                <span class="loading loading-dots loading-md"></span>
                "Asking the AI assistant..."
            </div>
        }
        .into_any(),
        Explanation::Ready { text, .. } => view! {
            <p class="whitespace-pre-line leading-relaxed">{text}</p>
        }
        .into_any(),
        Explanation::Failed { message, .. } => view! {
            <div role="alert" class="alert alert-error text-sm">
                <AlertCircle attr:class="h-5 w-5 shrink-0" />
                <span>{message}</span>
            </div>
        }
        .into_any(),
    }
}

/// 解读弹层，状态为 `Idle` 时关闭
#[component]
pub fn ExplanationOverlay(state: RwSignal<Explanation>) -> impl IntoView {
    let query = move || state.with(|s| s.query().unwrap_or_default().to_string());

    view! {
        <Show when=move || state.with(|s| *s != Explanation::Idle)>
            <div class="modal modal-open">
                <div class="modal-box max-w-2xl">
                    <button
                        class="btn btn-sm btn-circle btn-ghost absolute right-2 top-2"
                        on:click=move |_| state.set(Explanation::Idle)
                    >
                        <Close attr:class="h-4 w-4" />
                    </button>
                    <h3 class="font-bold text-lg flex items-center gap-2">
                        <Sparkles attr:class="h-5 w-5 text-success" />
                        {query}
                    </h3>
                    <div class="py-4">
                        <ExplanationBody state=state />
                    </div>
                </div>
                <div class="modal-backdrop" on:click=move |_| state.set(Explanation::Idle)></div>
            </div>
        </Show>
    }
}
