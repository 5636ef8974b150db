//! 通知日志页面
//!
//! 订单生命周期产生的事务邮件记录，带条数选择与手动刷新。
//! 改变条数会中止被取代的在途请求。

use crate::auth::use_session;
use crate::components::icons::RefreshCw;
use crate::components::layout::AppLayout;
use crate::fmt;
use crate::web::abort::AbortGuard;
use leptos::prelude::*;
use leptos::task::spawn_local;
use puma_portal_shared::NotificationEntry;
use std::rc::Rc;

/// 可选的拉取条数
const LIMIT_OPTIONS: [u32; 5] = [20, 30, 40, 50, 100];
/// 默认条数
const DEFAULT_LIMIT: u32 = 30;

#[component]
pub fn NotificationsPage() -> impl IntoView {
    let session = use_session();

    let limit = RwSignal::new(DEFAULT_LIMIT);
    let notifications = RwSignal::new(Vec::<NotificationEntry>::new());
    let loading = RwSignal::new(true);
    let error = RwSignal::new(Option::<String>::None);
    let refresh_count = RwSignal::new(0u32);

    Effect::new(move |prev: Option<Rc<AbortGuard>>| {
        if let Some(prev) = &prev {
            prev.abort();
        }
        let current_limit = limit.get();
        refresh_count.track();

        loading.set(true);
        error.set(None);

        let guard = Rc::new(AbortGuard::new());
        let in_flight = Rc::clone(&guard);
        spawn_local(async move {
            let api = session.api();
            match api
                .notifications(current_limit, in_flight.signal().as_ref())
                .await
            {
                Ok(data) => {
                    notifications.set(data);
                    loading.set(false);
                }
                Err(err) if err.is_abort() => {}
                Err(err) => {
                    error.set(Some(err.to_string()));
                    loading.set(false);
                }
            }
        });
        guard
    });

    let latest = move || {
        notifications.with(|list| {
            list.first()
                .map(|entry| fmt::date_time_medium(&entry.created_at))
        })
    };
    let entry_count = move || notifications.with(|list| list.len());

    let refresh_label = move || {
        if loading.get() {
            if entry_count() > 0 { "Refreshing..." } else { "Loading..." }
        } else {
            "Refresh"
        }
    };

    view! {
        <AppLayout title="Puma Printables Portal">
            <div class="flex items-start justify-between flex-wrap gap-4 mb-4">
                <div>
                    <h2 class="text-2xl font-bold">"Email notifications"</h2>
                    <p class="text-sm text-base-content/60">
                        "Review the transactional emails generated as orders flow through the lifecycle."
                    </p>
                </div>
                <div class="flex items-end gap-2">
                    <label class="form-control" for="notification-limit">
                        <span class="label-text text-xs">"Entries"</span>
                        <select
                            id="notification-limit"
                            class="select select-bordered select-sm"
                            on:change=move |ev| {
                                if let Ok(value) = event_target_value(&ev).parse::<u32>() {
                                    limit.set(value);
                                }
                            }
                        >
                            {LIMIT_OPTIONS.into_iter().map(|option| view! {
                                <option value=option.to_string() selected=move || limit.get() == option>
                                    {option}
                                </option>
                            }).collect_view()}
                        </select>
                    </label>
                    <button
                        class="btn btn-ghost btn-sm gap-2"
                        on:click=move |_| {
                            if !loading.get() {
                                refresh_count.update(|count| *count += 1);
                            }
                        }
                        disabled=move || loading.get()
                    >
                        <RefreshCw attr:class="h-4 w-4" />
                        {refresh_label}
                    </button>
                </div>
            </div>

            <Show when=move || latest().is_some()>
                <div class="mb-4 text-sm">
                    <span class="text-xs uppercase text-base-content/50 block">"Most recent"</span>
                    <span>{move || latest().unwrap_or_default()}</span>
                </div>
            </Show>

            <Show
                when=move || !loading.get()
                fallback=|| view! {
                    <div class="flex justify-center py-12">
                        <span class="loading loading-spinner loading-lg text-primary" aria-label="Loading notifications"></span>
                    </div>
                }
            >
                {move || if let Some(message) = error.get() {
                    view! { <div class="alert alert-error">{message}</div> }.into_any()
                } else if entry_count() == 0 {
                    view! {
                        <div class="card bg-base-100 shadow-md p-10 text-center">
                            <h3 class="text-lg font-bold">"No notifications captured yet"</h3>
                            <p class="text-sm text-base-content/60">
                                "Approvals, rejections, and courier updates will appear here."
                            </p>
                        </div>
                    }.into_any()
                } else {
                    view! {
                        <div class="grid gap-4 md:grid-cols-2">
                            <For
                                each=move || notifications.get()
                                key=|entry| entry.id
                                children=move |entry| {
                                    let created = fmt::date_time_medium(&entry.created_at);
                                    view! {
                                        <article class="card bg-base-100 shadow-md">
                                            <div class="card-body p-5 gap-2">
                                                <header class="flex items-start justify-between gap-2">
                                                    <div>
                                                        <div class="text-xs uppercase text-base-content/50">"Subject"</div>
                                                        <strong>{entry.subject.clone()}</strong>
                                                    </div>
                                                    <time class="text-xs text-base-content/60">{created}</time>
                                                </header>
                                                <div class="text-sm">
                                                    <span class="text-xs uppercase text-base-content/50 block">"Recipients"</span>
                                                    <span>{entry.recipients.clone()}</span>
                                                </div>
                                                <pre class="bg-base-200 rounded-lg p-3 text-xs whitespace-pre-wrap">{entry.body.clone()}</pre>
                                            </div>
                                        </article>
                                    }
                                }
                            />
                        </div>
                    }.into_any()
                }}
            </Show>
        </AppLayout>
    }
}
