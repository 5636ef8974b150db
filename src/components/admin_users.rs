//! 用户管理页面（仅管理员）
//!
//! 活跃度统计（7/30/90 天回看）、新用户报表导出与用户目录。
//! 角色调整采用"先应用暂定值，等待确认，失败恢复快照"的
//! 乐观更新模式；调整的是自己时随即刷新会话以同步新角色。

use crate::auth::use_session;
use crate::components::icons::Download;
use crate::components::layout::AppLayout;
use crate::fmt;
use crate::web::download;
use leptos::prelude::*;
use leptos::task::spawn_local;
use puma_portal_shared::{ManagedUser, UpdateRoleRequest, UserMetrics, UserRole};
use std::time::Duration;
use uuid::Uuid;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
/// 可选的统计回看窗口（天）
const METRIC_WINDOWS: [u32; 3] = [7, 30, 90];
/// 导出回看天数的允许区间
const EXPORT_DAYS_RANGE: (u32, u32) = (1, 180);
/// 反馈横幅展示时长
const FEEDBACK_BANNER: Duration = Duration::from_millis(3200);

#[component]
pub fn AdminUsersPage() -> impl IntoView {
    let session = use_session();
    let role = session.role_signal();
    let current_user = session.user_signal();
    let is_admin = move || role.get().is_some_and(|r| r.is_admin());

    let metrics = RwSignal::new(Option::<UserMetrics>::None);
    let metrics_days = RwSignal::new(30u32);
    let metrics_loading = RwSignal::new(true);
    let metrics_error = RwSignal::new(Option::<String>::None);

    let users = RwSignal::new(Vec::<ManagedUser>::new());
    let users_loading = RwSignal::new(true);
    let users_error = RwSignal::new(Option::<String>::None);
    let updating_user = RwSignal::new(Option::<Uuid>::None);
    let feedback = RwSignal::new(Option::<String>::None);

    let download_days = RwSignal::new(30u32);
    let download_pending = RwSignal::new(false);

    let fetch_metrics = move || {
        let days = metrics_days.get_untracked();
        metrics_loading.set(true);
        metrics_error.set(None);
        spawn_local(async move {
            let api = session.api();
            match api.user_metrics(days).await {
                Ok(data) => metrics.set(Some(data)),
                Err(err) if err.is_abort() => {}
                Err(err) => metrics_error.set(Some(err.to_string())),
            }
            metrics_loading.set(false);
        });
    };

    let fetch_users = move || {
        users_loading.set(true);
        users_error.set(None);
        spawn_local(async move {
            let api = session.api();
            match api.managed_users().await {
                Ok(data) => users.set(data),
                Err(err) if err.is_abort() => {}
                Err(err) => users_error.set(Some(err.to_string())),
            }
            users_loading.set(false);
        });
    };

    // 回看窗口变化时重取统计
    Effect::new(move |_| {
        metrics_days.track();
        if is_admin() {
            fetch_metrics();
        }
    });
    if role.get_untracked().is_some_and(|r| r.is_admin()) {
        fetch_users();
    }

    // 反馈横幅自动消失
    Effect::new(move |_| {
        if feedback.get().is_some() {
            set_timeout(move || feedback.set(None), FEEDBACK_BANNER);
        }
    });

    let on_download = move |_| {
        if download_pending.get() {
            return;
        }
        download_pending.set(true);
        let days = download_days.get_untracked();
        spawn_local(async move {
            let api = session.api();
            match api.onboarding_export(days).await {
                Ok(bytes) => {
                    let filename = format!("onboarding-last-{days}-days.xlsx");
                    if !download::save_bytes(&filename, XLSX_MIME, &bytes) {
                        feedback.set(Some("Unable to download onboarding report".to_string()));
                    }
                }
                Err(err) if err.is_abort() => {}
                Err(err) => feedback.set(Some(err.to_string())),
            }
            download_pending.set(false);
        });
    };

    // 乐观更新：先改表格，后端确认后以响应为准；
    // 失败则恢复调用前的快照并转述错误
    let on_role_change = move |user_id: Uuid, next_role: UserRole| {
        let previous_role = users.with_untracked(|list| {
            list.iter()
                .find(|entry| entry.id == user_id)
                .map(|entry| entry.role)
        });
        let Some(previous_role) = previous_role else {
            return;
        };
        if previous_role == next_role {
            return;
        }

        feedback.set(None);
        users.update(|list| {
            if let Some(entry) = list.iter_mut().find(|entry| entry.id == user_id) {
                entry.role = next_role;
            }
        });
        updating_user.set(Some(user_id));

        spawn_local(async move {
            let api = session.api();
            match api
                .update_user_role(user_id, &UpdateRoleRequest { role: next_role })
                .await
            {
                Ok(updated) => {
                    let is_self_update = current_user
                        .get_untracked()
                        .is_some_and(|me| me.username == updated.username);
                    users.update(|list| {
                        if let Some(entry) = list.iter_mut().find(|entry| entry.id == user_id) {
                            *entry = updated;
                        }
                    });

                    // 改了自己的角色，立即向服务端同步会话
                    if is_self_update {
                        session.refresh().await;
                    }

                    fetch_metrics();
                    feedback.set(Some(format!("Role updated to {}", next_role.label())));
                }
                Err(err) => {
                    users.update(|list| {
                        if let Some(entry) = list.iter_mut().find(|entry| entry.id == user_id) {
                            entry.role = previous_role;
                        }
                    });
                    feedback.set(Some(err.to_string()));
                }
            }
            updating_user.set(None);
        });
    };

    view! {
        <AppLayout title="User management">
            <Show
                when=is_admin
                fallback=|| view! {
                    <div class="alert alert-error">
                        <span>"You do not have permission to view this page."</span>
                    </div>
                }
            >
                <div class="flex items-start justify-between flex-wrap gap-4 mb-4">
                    <div>
                        <h2 class="text-2xl font-bold">"Access overview"</h2>
                        <p class="text-sm text-base-content/60">
                            "Track onboarding progress and adjust collaborator permissions in real time."
                        </p>
                    </div>
                    <label class="form-control" for="metrics-window">
                        <span class="label-text text-xs">"Activity window"</span>
                        <select
                            id="metrics-window"
                            class="select select-bordered select-sm"
                            on:change=move |ev| {
                                if let Ok(value) = event_target_value(&ev).parse::<u32>() {
                                    metrics_days.set(value);
                                }
                            }
                        >
                            {METRIC_WINDOWS.into_iter().map(|days| view! {
                                <option value=days.to_string() selected=move || metrics_days.get() == days>
                                    {format!("Last {days} days")}
                                </option>
                            }).collect_view()}
                        </select>
                    </label>
                </div>

                <Show when=move || feedback.get().is_some()>
                    <div class="alert alert-info mb-4" role="status">
                        <span>{move || feedback.get().unwrap_or_default()}</span>
                    </div>
                </Show>

                // 活跃度统计
                {move || if metrics_loading.get() {
                    view! { <div class="skeleton h-24 w-full mb-6"></div> }.into_any()
                } else if let Some(message) = metrics_error.get() {
                    view! { <div class="alert alert-error mb-6">{message}</div> }.into_any()
                } else if let Some(summary) = metrics.get() {
                    view! {
                        <section class="grid grid-cols-2 md:grid-cols-3 xl:grid-cols-6 gap-3 mb-6">
                            {[
                                ("Total users".to_string(), summary.total_users),
                                (format!("Active (last {} days)", summary.lookback_days), summary.active_users),
                                ("Store roles".to_string(), summary.store_users),
                                ("Approvers".to_string(), summary.approvers),
                                ("Fulfilment".to_string(), summary.fulfillment_agents),
                                ("Admins".to_string(), summary.admins),
                            ].into_iter().map(|(label, value)| view! {
                                <article class="card bg-base-100 shadow-sm p-4">
                                    <span class="text-xs uppercase text-base-content/50">{label}</span>
                                    <strong class="text-2xl">{fmt::count(value)}</strong>
                                </article>
                            }).collect_view()}
                        </section>
                    }.into_any()
                } else {
                    ().into_any()
                }}

                // 报表导出
                <section class="card bg-base-100 shadow-md mb-6">
                    <div class="card-body p-5 flex-row flex-wrap items-end justify-between gap-4">
                        <div>
                            <h3 class="card-title text-base">"Download onboarding report"</h3>
                            <p class="text-sm text-base-content/60">
                                "Export the latest store onboarding activity for audit or review."
                            </p>
                        </div>
                        <div class="flex items-end gap-2">
                            <label class="form-control" for="download-window">
                                <span class="label-text text-xs">"Look-back days"</span>
                                <input
                                    id="download-window"
                                    type="number"
                                    min=EXPORT_DAYS_RANGE.0.to_string()
                                    max=EXPORT_DAYS_RANGE.1.to_string()
                                    class="input input-bordered input-sm w-28"
                                    prop:value=move || download_days.get().to_string()
                                    on:change=move |ev| {
                                        let next = event_target_value(&ev)
                                            .parse::<u32>()
                                            .unwrap_or(EXPORT_DAYS_RANGE.0)
                                            .clamp(EXPORT_DAYS_RANGE.0, EXPORT_DAYS_RANGE.1);
                                        download_days.set(next);
                                    }
                                />
                            </label>
                            <button
                                class="btn btn-outline btn-sm gap-2"
                                on:click=on_download
                                disabled=move || download_pending.get()
                            >
                                <Download attr:class="h-4 w-4" />
                                {move || if download_pending.get() { "Preparing..." } else { "Download" }}
                            </button>
                        </div>
                    </div>
                </section>

                // 用户目录
                <section class="card bg-base-100 shadow-md">
                    <div class="card-body p-5">
                        <header class="mb-2">
                            <h3 class="card-title text-base">"User directory"</h3>
                            <p class="text-sm text-base-content/60">
                                "Promote or demote collaborators as their responsibilities evolve."
                            </p>
                        </header>

                        <Show when=move || users_error.get().is_some()>
                            <div class="alert alert-error mb-2">
                                <span>{move || users_error.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <Show
                            when=move || !users_loading.get()
                            fallback=|| view! {
                                <div class="flex justify-center py-8">
                                    <span class="loading loading-spinner loading-md" aria-label="Loading users"></span>
                                </div>
                            }
                        >
                            {move || if users.with(|list| list.is_empty()) {
                                view! { <p class="text-sm text-base-content/60">"No users found."</p> }.into_any()
                            } else {
                                view! {
                                    <div class="overflow-x-auto">
                                        <table class="table table-zebra w-full">
                                            <thead>
                                                <tr>
                                                    <th>"Username"</th>
                                                    <th>"Email"</th>
                                                    <th>"Role"</th>
                                                    <th>"Provider"</th>
                                                    <th>"First login"</th>
                                                    <th>"Last login"</th>
                                                    <th>"Logins"</th>
                                                </tr>
                                            </thead>
                                            <tbody>
                                                <For
                                                    each=move || users.get()
                                                    key=|entry| (entry.id, entry.role)
                                                    children=move |entry| {
                                                        let user_id = entry.id;
                                                        let entry_role = entry.role;
                                                        view! {
                                                            <tr>
                                                                <td>{entry.username.clone()}</td>
                                                                <td>{entry.email.clone().unwrap_or_else(|| "—".to_string())}</td>
                                                                <td>
                                                                    <select
                                                                        class="select select-bordered select-sm"
                                                                        disabled=move || updating_user.get() == Some(user_id)
                                                                        on:change=move |ev| {
                                                                            let value = event_target_value(&ev);
                                                                            if let Some(next) = UserRole::ALL.into_iter().find(|r| r.as_str() == value) {
                                                                                on_role_change(user_id, next);
                                                                            }
                                                                        }
                                                                    >
                                                                        {UserRole::ALL.into_iter().map(|option| view! {
                                                                            <option value=option.as_str() selected=entry_role == option>
                                                                                {option.label()}
                                                                            </option>
                                                                        }).collect_view()}
                                                                    </select>
                                                                </td>
                                                                <td>{entry.auth_provider.label()}</td>
                                                                <td>
                                                                    {entry.first_login_at
                                                                        .map(|at| fmt::date_time_medium(&at))
                                                                        .unwrap_or_else(|| "—".to_string())}
                                                                </td>
                                                                <td>
                                                                    {entry.last_login_at
                                                                        .map(|at| fmt::date_time_medium(&at))
                                                                        .unwrap_or_else(|| "—".to_string())}
                                                                </td>
                                                                <td>{entry.login_count.unwrap_or(0)}</td>
                                                            </tr>
                                                        }
                                                    }
                                                />
                                            </tbody>
                                        </table>
                                    </div>
                                }.into_any()
                            }}
                        </Show>
                    </div>
                </section>
            </Show>
        </AppLayout>
    }
}
