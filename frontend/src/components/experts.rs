//! 专家咨询页面
//!
//! - New Request：选择专家与报告并提交
//! - Request History：按状态分组展示历史请求

use crate::api::PlantApi;
use crate::auth::use_auth;
use crate::components::icons::{AlertCircle, CheckCircle, Clock, Send, Star};
use crate::config::CONFIG;
use crate::error::ApiError;
use crate::web::http::HttpClient;
use crate::web::task::TaskScope;
use leptos::prelude::*;
use plantdoc_shared::date::display_date;
use plantdoc_shared::{AdviceRequest, AdviceStatus, Expert, Report, Token, keyed_rows};

mod form_state;

#[cfg(test)]
mod tests;

pub use form_state::{AdviceForm, MISSING_SELECTION};

const LOAD_FAILED: &str = "Failed to load data. Please try again.";
const SEND_OK: &str = "Your request has been sent successfully!";
const SEND_FAILED: &str = "Failed to send request. Please try again.";

// =========================================================
// 数据加载与提交
// =========================================================

/// 页面所需的三份数据
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpertBoard {
    pub experts: Vec<Expert>,
    pub reports: Vec<Report>,
    pub requests: Vec<AdviceRequest>,
}

/// 并发加载专家、报告和历史请求，任一失败则整体失败
pub async fn load_expert_board<C: HttpClient>(
    api: &PlantApi<C>,
    token: Option<&Token>,
) -> Result<ExpertBoard, ApiError> {
    let (experts, reports, requests) = futures::try_join!(
        api.list_experts(token),
        api.list_user_reports(token),
        api.list_advice_requests(token),
    )?;

    Ok(ExpertBoard {
        experts,
        reports,
        requests,
    })
}

/// 提交结果：成功后附带刷新过的请求列表
#[derive(Debug, Clone, PartialEq)]
pub struct Submitted {
    pub requests: Vec<AdviceRequest>,
}

/// 校验并提交咨询请求
///
/// 缺少选择时不发出任何请求。刷新列表失败时把新建的请求追加到现有列表。
pub async fn submit_advice<C: HttpClient>(
    api: &PlantApi<C>,
    form: &AdviceForm,
    token: Option<&Token>,
    current: Vec<AdviceRequest>,
) -> Result<Submitted, ApiError> {
    let body = form.to_request()?;
    let created = api.create_advice_request(&body, token).await?;

    let requests = match api.list_advice_requests(token).await {
        Ok(requests) => requests,
        Err(e) => {
            log::warn!("[Experts] Could not refresh requests: {}", e);
            let mut requests = current;
            requests.push(created);
            requests
        }
    };
    Ok(Submitted { requests })
}

/// 按状态分组：pending -> completed -> 其他，组内保持原顺序
pub fn group_by_status(requests: &[AdviceRequest]) -> Vec<AdviceRequest> {
    let mut grouped = requests.to_vec();
    grouped.sort_by_key(|r| r.status.rank());
    grouped
}

// =========================================================
// UI
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    New,
    History,
}

/// 提示条：(消息, 是否成功)
type Feedback = Option<(String, bool)>;

#[component]
pub fn ExpertsPage() -> impl IntoView {
    let auth = use_auth();
    let tasks = TaskScope::new();

    let board = RwSignal::new(ExpertBoard::default());
    let form = RwSignal::new(AdviceForm::default());
    let (loading, set_loading) = signal(true);
    let (sending, set_sending) = signal(false);
    let (feedback, set_feedback) = signal(Feedback::None);
    let (tab, set_tab) = signal(Tab::New);

    let token = auth.token_untracked();
    tasks.spawn(async move {
        let api = PlantApi::from_config();
        match load_expert_board(&api, token.as_ref()).await {
            Ok(data) => board.set(data),
            Err(e) => {
                log::error!("[Experts] Error fetching data: {}", e);
                set_feedback.set(Some((LOAD_FAILED.to_string(), false)));
            }
        }
        set_loading.set(false);
    });

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let draft = form.get_untracked();
        if !draft.is_complete() {
            set_feedback.set(Some((MISSING_SELECTION.to_string(), false)));
            return;
        }

        set_sending.set(true);
        let token = auth.token_untracked();
        let current = board.with_untracked(|b| b.requests.clone());
        tasks.spawn(async move {
            let api = PlantApi::from_config();
            match submit_advice(&api, &draft, token.as_ref(), current).await {
                Ok(Submitted { requests }) => {
                    set_feedback.set(Some((SEND_OK.to_string(), true)));
                    form.update(AdviceForm::reset);
                    board.update(|b| b.requests = requests);
                    set_tab.set(Tab::History);
                }
                Err(ApiError::Validation(message)) => set_feedback.set(Some((message, false))),
                Err(e) => {
                    log::error!("[Experts] Error submitting request: {}", e);
                    set_feedback.set(Some((SEND_FAILED.to_string(), false)));
                }
            }
            set_sending.set(false);
        });
    };

    let tab_class = move |t: Tab| {
        if tab.get() == t {
            "tab tab-active"
        } else {
            "tab"
        }
    };

    view! {
        <div class="p-4 md:p-8">
            <div class="max-w-5xl mx-auto">
                <div role="tablist" class="tabs tabs-bordered mb-6">
                    <a role="tab" class=move || tab_class(Tab::New) on:click=move |_| set_tab.set(Tab::New)>
                        "New Request"
                    </a>
                    <a role="tab" class=move || tab_class(Tab::History) on:click=move |_| set_tab.set(Tab::History)>
                        "Request History"
                    </a>
                </div>

                <Show when=move || loading.get()>
                    <div class="flex justify-center py-12">
                        <span class="loading loading-spinner loading-lg text-success"></span>
                    </div>
                </Show>

                <Show when=move || !loading.get() && tab.get() == Tab::New>
                    <div class="card bg-base-100 shadow-md">
                        <form class="card-body gap-6" on:submit=on_submit>
                            {move || feedback.get().map(|(message, ok)| {
                                let class = if ok { "alert alert-success" } else { "alert alert-error" };
                                view! {
                                    <div role="alert" class=class>
                                        <span>{message}</span>
                                    </div>
                                }
                            })}

                            <ExpertPicker board=board form=form />
                            <ReportPicker board=board form=form />

                            <section>
                                <h2 class="text-lg font-medium mb-4">"Message (Optional)"</h2>
                                <textarea
                                    class="textarea textarea-bordered w-full min-h-32"
                                    placeholder="Describe what specific advice you're looking for..."
                                    prop:value=move || form.with(|f| f.message.clone())
                                    on:input=move |ev| {
                                        let value = event_target_value(&ev);
                                        form.update(|f| f.message = value);
                                    }
                                ></textarea>
                            </section>

                            <div class="flex justify-end">
                                <button
                                    type="submit"
                                    class="btn btn-success gap-2"
                                    disabled=move || sending.get() || !form.with(AdviceForm::is_complete)
                                >
                                    {move || if sending.get() {
                                        "Sending...".into_any()
                                    } else {
                                        view! { <Send attr:class="h-4 w-4" /> "Send Request" }.into_any()
                                    }}
                                </button>
                            </div>
                        </form>
                    </div>
                </Show>

                <Show when=move || !loading.get() && tab.get() == Tab::History>
                    <RequestHistory board=board on_new=move |_: ()| set_tab.set(Tab::New) />
                </Show>
            </div>
        </div>
    }
}

#[component]
fn ExpertPicker(board: RwSignal<ExpertBoard>, form: RwSignal<AdviceForm>) -> impl IntoView {
    view! {
        <section>
            <h2 class="text-lg font-medium mb-4">"Select an Expert"</h2>
            <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-4">
                <For
                    each=move || board.with(|b| keyed_rows(b.experts.clone(), Expert::key))
                    key=|(row, _)| row.clone()
                    children=move |(_, expert)| {
                        let id = expert.key().to_string();
                        let is_selected = {
                            let id = id.clone();
                            move || form.with(|f| f.expert.as_deref() == Some(id.as_str()))
                        };
                        let image = expert
                            .image
                            .clone()
                            .unwrap_or_else(|| CONFIG.placeholder_image.clone());
                        view! {
                            <div
                                class=move || if is_selected() {
                                    "card card-compact border-2 border-success bg-success/5 cursor-pointer"
                                } else {
                                    "card card-compact border border-base-300 hover:border-base-content/40 cursor-pointer"
                                }
                                on:click=move |_| form.update(|f| f.select_expert(&id))
                            >
                                <div class="card-body flex-row items-center gap-4">
                                    <img src=image alt=expert.name.clone() class="w-12 h-12 rounded-full" />
                                    <div>
                                        <h3 class="font-medium">{expert.name.clone()}</h3>
                                        <p class="text-sm text-base-content/60">{expert.specialty.clone()}</p>
                                        {expert.rating.map(|rating| view! {
                                            <div class="flex items-center gap-1 mt-1 text-sm">
                                                <Star attr:class="h-4 w-4 text-warning" />
                                                {format!("{:.1}", rating)}
                                            </div>
                                        })}
                                    </div>
                                </div>
                            </div>
                        }
                    }
                />
            </div>
        </section>
    }
}

#[component]
fn ReportPicker(board: RwSignal<ExpertBoard>, form: RwSignal<AdviceForm>) -> impl IntoView {
    let selected_title = move || {
        form.with(|f| f.report.clone())
            .and_then(|id| {
                board.with(|b| {
                    b.reports
                        .iter()
                        .find(|r| r.key() == id)
                        .map(|r| r.display_name().to_string())
                })
            })
            .unwrap_or_else(|| "Select a report...".to_string())
    };

    view! {
        <section>
            <h2 class="text-lg font-medium mb-4">"Select a Report"</h2>
            <div class="border border-base-300 rounded-lg">
                <div class="p-4 font-medium border-b border-base-300">{selected_title}</div>
                <ul class="menu max-h-64 overflow-y-auto flex-nowrap">
                    <For
                        each=move || board.with(|b| keyed_rows(b.reports.clone(), Report::key))
                        key=|(row, _)| row.clone()
                        children=move |(_, report)| {
                            let id = report.key().to_string();
                            let is_selected = {
                                let id = id.clone();
                                move || form.with(|f| f.report.as_deref() == Some(id.as_str()))
                            };
                            view! {
                                <li>
                                    <a
                                        class=move || if is_selected() { "active flex justify-between" } else { "flex justify-between" }
                                        on:click=move |_| form.update(|f| f.select_report(&id))
                                    >
                                        <span class="font-medium">{report.display_name().to_string()}</span>
                                        <span class="text-sm opacity-60">{display_date(report.created())}</span>
                                    </a>
                                </li>
                            }
                        }
                    />
                </ul>
            </div>
        </section>
    }
}

#[component]
fn RequestHistory(
    board: RwSignal<ExpertBoard>,
    #[prop(into)] on_new: Callback<()>,
) -> impl IntoView {
    let grouped = Memo::new(move |_| board.with(|b| group_by_status(&b.requests)));

    view! {
        <div class="card bg-base-100 shadow-md">
            <Show
                when=move || grouped.with(|r| !r.is_empty())
                fallback=move || view! {
                    <div class="p-8 text-center">
                        <AlertCircle attr:class="h-10 w-10 mx-auto mb-4 text-base-content/40" />
                        <h3 class="text-lg font-medium">"No Requests Yet"</h3>
                        <p class="text-base-content/60 mt-2">"You haven't sent any requests to experts yet."</p>
                        <button class="btn btn-success mt-4" on:click=move |_| on_new.run(())>
                            "Create Your First Request"
                        </button>
                    </div>
                }
            >
                <div class="divide-y divide-base-200">
                    <For
                        each=move || keyed_rows(grouped.get(), AdviceRequest::key)
                        key=|(row, _)| row.clone()
                        children=|(_, request)| view! { <RequestItem request=request /> }
                    />
                </div>
            </Show>
        </div>
    }
}

#[component]
fn RequestItem(request: AdviceRequest) -> impl IntoView {
    let badge = match request.status {
        AdviceStatus::Pending => "badge badge-warning gap-1",
        AdviceStatus::Completed => "badge badge-success gap-1",
        AdviceStatus::Other(_) => "badge badge-ghost gap-1",
    };
    let pending = request.status == AdviceStatus::Pending;
    let response = request.expert_response().map(str::to_string);

    view! {
        <div class="p-6">
            <div class="flex justify-between items-start mb-4">
                <div>
                    <h3 class="font-medium text-lg">{request.report_title()}</h3>
                    <p class="text-base-content/70">"Expert: " {request.expert_label()}</p>
                    <p class="text-sm text-base-content/50 mt-1">
                        "Requested: " {display_date(request.created_at.as_deref())}
                    </p>
                </div>
                <div class=badge>
                    {if pending {
                        view! { <Clock attr:class="h-3 w-3" /> }.into_any()
                    } else {
                        view! { <CheckCircle attr:class="h-3 w-3" /> }.into_any()
                    }}
                    {request.status.label()}
                </div>
            </div>

            {response.map(|text| view! {
                <div class="mt-4 bg-base-200 p-4 rounded-lg">
                    <h4 class="text-sm font-medium mb-2">"Expert Response:"</h4>
                    <p>{text}</p>
                </div>
            })}

            {pending.then(|| view! {
                <div class="mt-4 flex items-center gap-1 text-base-content/50 text-sm">
                    <Clock attr:class="h-3 w-3" />
                    <span>"Waiting for expert response"</span>
                </div>
            })}
        </div>
    }
}
