//! 历史报告面板
//!
//! 加载当前用户的诊断报告，点击卡片查看详情，"Know more" 请求 AI 解读。

use crate::api::PlantApi;
use crate::auth::use_auth;
use crate::components::explanation::{Explanation, ExplanationOverlay, explain, settle_signal};
use crate::components::icons::{Close, Sparkles};
use crate::config::CONFIG;
use crate::error::ApiError;
use crate::web::http::HttpClient;
use crate::web::task::TaskScope;
use leptos::prelude::*;
use plantdoc_shared::date::display_date;
use plantdoc_shared::{Report, Token, keyed_rows};

const NO_RESULT: &str = "No results available";

/// 报告列表的加载结果
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportFeed {
    pub reports: Vec<Report>,
    pub error: Option<String>,
}

impl ReportFeed {
    pub fn from_result(result: Result<Vec<Report>, ApiError>) -> Self {
        match result {
            Ok(reports) => Self {
                reports,
                error: None,
            },
            Err(e) => Self {
                reports: Vec::new(),
                error: Some(fetch_error_message(&e)),
            },
        }
    }
}

fn fetch_error_message(err: &ApiError) -> String {
    match err {
        ApiError::MissingCredential => err.to_string(),
        ApiError::Status { status, .. } => {
            format!("Error fetching reports: Failed to fetch reports: {}", status)
        }
        other => format!("Error fetching reports: {}", other.user_message()),
    }
}

pub async fn load_report_feed<C: HttpClient>(
    api: &PlantApi<C>,
    token: Option<&Token>,
) -> ReportFeed {
    let feed = ReportFeed::from_result(api.list_reports(token).await);
    if let Some(error) = &feed.error {
        log::error!("[Dashboard] {}", error);
    }
    feed
}

fn image_src(report: &Report) -> String {
    report
        .image_url
        .clone()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| CONFIG.placeholder_image.clone())
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();
    let tasks = TaskScope::new();

    let (feed, set_feed) = signal(ReportFeed::default());
    let (loading, set_loading) = signal(true);
    let selected = RwSignal::new(Option::<Report>::None);
    let explanation = RwSignal::new(Explanation::Idle);

    let token = auth.token_untracked();
    tasks.spawn(async move {
        let api = PlantApi::from_config();
        set_feed.set(load_report_feed(&api, token.as_ref()).await);
        set_loading.set(false);
    });

    let know_more = Callback::new(move |query: String| {
        explanation.set(Explanation::Loading {
            query: query.clone(),
        });
        let token = auth.token_untracked();
        tasks.spawn(async move {
            let api = PlantApi::from_config();
            settle_signal(explanation, explain(&api, query, token.as_ref()).await);
        });
    });

    view! {
        <div class="p-4 md:p-8">
            <div class="max-w-7xl mx-auto space-y-6">
                <h2 class="text-xl font-semibold">"Previous Reports"</h2>

                {move || {
                    if loading.get() {
                        return view! {
                            <div class="flex items-center gap-2 text-base-content/60">
                                <span class="loading loading-spinner loading-md"></span>
                                " Loading..."
                            </div>
                        }
                        .into_any();
                    }
                    if let Some(error) = feed.with(|f| f.error.clone()) {
                        return view! { <p class="text-error">{error}</p> }.into_any();
                    }
                    if feed.with(|f| f.reports.is_empty()) {
                        return view! {
                            <p class="text-base-content/60">"No reports found."</p>
                        }
                        .into_any();
                    }
                    view! {
                        <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6">
                            <For
                                each=move || keyed_rows(feed.get().reports, Report::key)
                                key=|(row, _)| row.clone()
                                children=move |(_, report)| {
                                    view! { <ReportCard report=report selected=selected know_more=know_more /> }
                                }
                            />
                        </div>
                    }
                    .into_any()
                }}
            </div>

            <ReportDetail selected=selected know_more=know_more />
            <ExplanationOverlay state=explanation />
        </div>
    }
}

#[component]
fn ReportCard(
    report: Report,
    selected: RwSignal<Option<Report>>,
    know_more: Callback<String>,
) -> impl IntoView {
    let src = image_src(&report);
    let name = report.display_name().to_string();
    let badge = if report.status.is_processed() {
        "badge badge-success"
    } else {
        "badge badge-ghost"
    };
    let status = report.status.label().to_string();
    let result = report
        .status
        .is_processed()
        .then(|| report.analysis().unwrap_or(NO_RESULT).to_string());
    let query = report.analysis().map(str::to_string);
    let date = display_date(report.created());

    view! {
        <div
            class="card bg-base-100 shadow-md hover:shadow-xl transition cursor-pointer"
            on:click=move |_| selected.set(Some(report.clone()))
        >
            <figure>
                <img src=src alt="Report" class="w-full h-40 object-cover" />
            </figure>
            <div class="card-body p-4 gap-1 text-sm">
                <p><strong>"Name: "</strong>{name}</p>
                <p>
                    <strong>"Status: "</strong>
                    <span class=badge>{status}</span>
                </p>
                {result.map(|r| view! { <p><strong>"Result: "</strong>{r}</p> })}
                <p class="text-base-content/60 mt-2"><strong>"Date: "</strong>{date}</p>
                {query.map(|q| view! {
                    <div class="card-actions justify-end">
                        <button
                            class="btn btn-sm btn-outline btn-success gap-1"
                            on:click=move |ev| {
                                ev.stop_propagation();
                                know_more.run(q.clone());
                            }
                        >
                            <Sparkles attr:class="h-4 w-4" />
                            "Know more"
                        </button>
                    </div>
                })}
            </div>
        </div>
    }
}

/// 报告详情弹层
#[component]
fn ReportDetail(selected: RwSignal<Option<Report>>, know_more: Callback<String>) -> impl IntoView {
    move || {
        selected.get().map(|report| {
            let query = report.analysis().map(str::to_string);
            view! {
                <div class="modal modal-open">
                    <div class="modal-box max-w-3xl">
                        <button
                            class="btn btn-sm btn-circle btn-ghost absolute right-2 top-2"
                            on:click=move |_| selected.set(None)
                        >
                            <Close attr:class="h-4 w-4" />
                        </button>
                        <h3 class="font-bold text-lg mb-4">{report.display_name().to_string()}</h3>
                        <img src=image_src(&report) alt="Report" class="w-full max-h-96 object-contain rounded-lg bg-base-200" />
                        <div class="grid grid-cols-2 gap-2 mt-4 text-sm">
                            <span class="font-semibold">"Status"</span>
                            <span>{report.status.label().to_string()}</span>
                            <span class="font-semibold">"Date"</span>
                            <span>{display_date(report.created())}</span>
                        </div>
                        {report.status.is_processed().then(|| view! {
                            <div class="mt-4">
                                <h4 class="font-semibold">"Analysis Result"</h4>
                                <p>{report.analysis().unwrap_or(NO_RESULT).to_string()}</p>
                            </div>
                        })}
                        <div class="modal-action">
                            {query.map(|q| view! {
                                <button class="btn btn-success gap-1" on:click=move |_| know_more.run(q.clone())>
                                    <Sparkles attr:class="h-4 w-4" />
                                    "Know more"
                                </button>
                            })}
                            <button class="btn" on:click=move |_| selected.set(None)>"Close"</button>
                        </div>
                    </div>
                    <div class="modal-backdrop" on:click=move |_| selected.set(None)></div>
                </div>
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::http::MockHttpClient;
    use plantdoc_shared::HttpMethod;
    use serde_json::json;

    const URL: &str = "http://api.test/api/reports";

    fn setup() -> PlantApi<MockHttpClient> {
        PlantApi::new("http://api.test", MockHttpClient::new())
    }

    #[tokio::test]
    async fn test_missing_credential_stops_before_fetch() {
        let api = setup();
        let feed = load_report_feed(&api, None).await;
        assert_eq!(feed.error.as_deref(), Some("No authentication token found."));
        assert!(feed.reports.is_empty());
        assert_eq!(api.client().request_count(), 0);
    }

    #[tokio::test]
    async fn test_status_error_message() {
        let api = setup();
        api.client()
            .mock_response(HttpMethod::Get, URL, 500, json!({"error": "boom"}));
        let token = Token::parse("tok").unwrap();

        let feed = load_report_feed(&api, Some(&token)).await;
        assert_eq!(
            feed.error.as_deref(),
            Some("Error fetching reports: Failed to fetch reports: 500")
        );
        assert!(feed.reports.is_empty());
    }

    #[tokio::test]
    async fn test_feed_from_wrapped_payload() {
        let api = setup();
        api.client().mock_response(
            HttpMethod::Get,
            URL,
            200,
            json!({"reports": [{"_id": "r1", "status": "Processed"}, {"_id": "r2"}]}),
        );
        let token = Token::parse("tok").unwrap();

        let feed = load_report_feed(&api, Some(&token)).await;
        assert_eq!(feed.error, None);
        assert_eq!(feed.reports.len(), 2);
    }

    #[test]
    fn test_image_falls_back_to_placeholder() {
        let report = Report {
            image_url: Some(" ".into()),
            ..Report::default()
        };
        assert_eq!(image_src(&report), CONFIG.placeholder_image);
    }
}
