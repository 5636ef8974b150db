//! 运营报表页面
//!
//! 由订单与目录两份快照在客户端汇总：状态分布、营收口径、
//! 库存价值与热销排行。管理员可在此导出新用户报表。

use crate::auth::use_session;
use crate::components::icons::Download;
use crate::components::layout::AppLayout;
use crate::fmt;
use crate::web::abort::AbortGuard;
use crate::web::download;
use crate::web::time;
use leptos::prelude::*;
use leptos::task::spawn_local;
use puma_portal_shared::{Order, OrderStatus, Product};
use std::collections::HashMap;
use std::rc::Rc;
use uuid::Uuid;

/// xlsx 的 MIME 类型
const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
/// 导出默认回看天数
const EXPORT_LOOKBACK_DAYS: u32 = 30;
/// 热销排行长度
const TOP_ITEMS: usize = 3;

#[derive(Clone, PartialEq)]
struct TopItem {
    name: String,
    quantity: u32,
    revenue: f64,
}

#[component]
pub fn ReportsPage() -> impl IntoView {
    let session = use_session();
    let role = session.role_signal();
    let is_admin = move || role.get().is_some_and(|r| r.is_admin());

    let orders = RwSignal::new(Vec::<Order>::new());
    let products = RwSignal::new(Vec::<Product>::new());
    let loading = RwSignal::new(true);
    let error = RwSignal::new(Option::<String>::None);
    let export_error = RwSignal::new(Option::<String>::None);
    let exporting = RwSignal::new(false);

    // 两份快照都齐了才渲染；页面卸载时中止在途请求
    Effect::new(move |prev: Option<Rc<AbortGuard>>| {
        if let Some(prev) = &prev {
            prev.abort();
        }

        loading.set(true);
        error.set(None);

        let guard = Rc::new(AbortGuard::new());
        let in_flight = Rc::clone(&guard);
        spawn_local(async move {
            let api = session.api();
            let result = async {
                let order_data = api.orders(None, in_flight.signal().as_ref()).await?;
                let product_data = api.products(in_flight.signal().as_ref()).await?;
                Ok::<_, crate::api::ApiError>((order_data, product_data))
            }
            .await;

            match result {
                Ok((order_data, product_data)) => {
                    orders.set(order_data);
                    products.set(product_data);
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

    let status_counts = Memo::new(move |_| {
        orders.with(|list| {
            let mut counts: HashMap<OrderStatus, u32> = HashMap::new();
            for order in list {
                *counts.entry(order.status).or_insert(0) += 1;
            }
            counts
        })
    });
    let revenue = Memo::new(move |_| {
        orders.with(|list| {
            list.iter()
                .filter(|order| order.status.counts_as_revenue())
                .map(|order| order.total_amount)
                .sum::<f64>()
        })
    });
    let average_items = Memo::new(move |_| {
        orders.with(|list| {
            if list.is_empty() {
                0.0
            } else {
                let total: u32 = list.iter().map(|order| order.total_quantity()).sum();
                f64::from(total) / list.len() as f64
            }
        })
    });
    let inventory_value = Memo::new(move |_| {
        products.with(|list| {
            list.iter()
                .map(|product| product.price * f64::from(product.stock_quantity))
                .sum::<f64>()
        })
    });
    let top_items = Memo::new(move |_| {
        orders.with(|list| {
            let mut by_product: HashMap<Uuid, TopItem> = HashMap::new();
            for order in list {
                for item in &order.items {
                    let entry = by_product.entry(item.product_id).or_insert_with(|| TopItem {
                        name: item.product_name.clone(),
                        quantity: 0,
                        revenue: 0.0,
                    });
                    entry.quantity += item.quantity;
                    entry.revenue += item.line_total;
                }
            }
            let mut ranked: Vec<TopItem> = by_product.into_values().collect();
            ranked.sort_by(|a, b| b.quantity.cmp(&a.quantity));
            ranked.truncate(TOP_ITEMS);
            ranked
        })
    });
    let active_skus = move || products.with(|list| list.iter().filter(|p| p.active).count());

    let on_export = move |_| {
        if exporting.get() {
            return;
        }
        export_error.set(None);
        exporting.set(true);

        spawn_local(async move {
            let api = session.api();
            match api.onboarding_export(EXPORT_LOOKBACK_DAYS).await {
                Ok(bytes) => {
                    let filename = format!("new-users-{}.xlsx", time::iso_date_stamp());
                    if !download::save_bytes(&filename, XLSX_MIME, &bytes) {
                        export_error.set(Some(
                            "Unable to export onboarding snapshot".to_string(),
                        ));
                    }
                }
                Err(err) if err.is_abort() => {}
                Err(err) => export_error.set(Some(err.to_string())),
            }
            exporting.set(false);
        });
    };

    view! {
        <AppLayout title="Puma Printables Portal">
            <div class="flex items-start justify-between flex-wrap gap-4 mb-4">
                <div>
                    <h2 class="text-2xl font-bold">"Operations snapshot"</h2>
                    <p class="text-sm text-base-content/60">
                        "Live summary of orders, fulfillment progress, and catalog health."
                    </p>
                </div>
                <Show when=is_admin>
                    <button
                        class="btn btn-ghost btn-sm gap-2"
                        on:click=on_export
                        disabled=move || exporting.get()
                    >
                        <Download attr:class="h-4 w-4" />
                        {move || if exporting.get() {
                            "Preparing onboarding export..."
                        } else {
                            "Download new user report"
                        }}
                    </button>
                </Show>
            </div>

            <Show when=move || export_error.get().is_some()>
                <div class="alert alert-error mb-4">
                    <span>{move || export_error.get().unwrap_or_default()}</span>
                </div>
            </Show>

            <Show
                when=move || !loading.get()
                fallback=|| view! {
                    <div class="flex justify-center py-12">
                        <span class="loading loading-spinner loading-lg text-primary" aria-label="Loading reports"></span>
                    </div>
                }
            >
                {move || if let Some(message) = error.get() {
                    view! { <div class="alert alert-error">{message}</div> }.into_any()
                } else {
                    view! {
                        // 核心指标
                        <section class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100 mb-6" aria-label="Key metrics">
                            <div class="stat">
                                <div class="stat-title">"Total orders"</div>
                                <div class="stat-value text-primary">{move || orders.with(|list| list.len())}</div>
                                <div class="stat-desc">"Includes every status"</div>
                            </div>
                            <div class="stat">
                                <div class="stat-title">"Pending approvals"</div>
                                <div class="stat-value text-warning">
                                    {move || status_counts.with(|counts| counts.get(&OrderStatus::PendingApproval).copied().unwrap_or(0))}
                                </div>
                                <div class="stat-desc">"Awaiting approver action"</div>
                            </div>
                            <div class="stat">
                                <div class="stat-title">"Revenue pipeline"</div>
                                <div class="stat-value text-success text-2xl">{move || fmt::inr(revenue.get())}</div>
                                <div class="stat-desc">"Approved + in transit + fulfilled"</div>
                            </div>
                            <div class="stat">
                                <div class="stat-title">"Inventory value"</div>
                                <div class="stat-value text-2xl">{move || fmt::inr(inventory_value.get())}</div>
                                <div class="stat-desc">"Price × stock across SKUs"</div>
                            </div>
                        </section>

                        // 状态分布
                        <section class="grid grid-cols-2 md:grid-cols-3 xl:grid-cols-6 gap-3 mb-6" aria-label="Order status breakdown">
                            {OrderStatus::ALL.into_iter().map(|status| view! {
                                <article class="card bg-base-100 shadow-sm p-4 text-center">
                                    <h4 class="text-xs uppercase text-base-content/50">{status.label()}</h4>
                                    <p class="text-2xl font-bold">
                                        {move || status_counts.with(|counts| counts.get(&status).copied().unwrap_or(0))}
                                    </p>
                                </article>
                            }).collect_view()}
                        </section>

                        <section class="grid gap-4 md:grid-cols-2">
                            <article class="card bg-base-100 shadow-md">
                                <div class="card-body p-5">
                                    <header class="mb-2">
                                        <h3 class="card-title text-base">"Top ordered items"</h3>
                                        <span class="text-xs text-base-content/60">"Quantity ordered across all time"</span>
                                    </header>
                                    <Show
                                        when=move || !top_items.with(|items| items.is_empty())
                                        fallback=|| view! {
                                            <p class="text-sm text-base-content/60">
                                                "Place a few orders to populate this ranking."
                                            </p>
                                        }
                                    >
                                        <ol class="space-y-2">
                                            <For
                                                each=move || top_items.get()
                                                key=|item| item.name.clone()
                                                children=move |item| {
                                                    view! {
                                                        <li class="flex items-center justify-between text-sm">
                                                            <div>
                                                                <strong>{item.name.clone()}</strong>
                                                                <span class="text-xs text-base-content/60 block">
                                                                    {format!("{} units", fmt::count(item.quantity))}
                                                                </span>
                                                            </div>
                                                            <span>{fmt::inr(item.revenue)}</span>
                                                        </li>
                                                    }
                                                }
                                            />
                                        </ol>
                                    </Show>
                                </div>
                            </article>

                            <article class="card bg-base-100 shadow-md">
                                <div class="card-body p-5">
                                    <header class="mb-2">
                                        <h3 class="card-title text-base">"Order insights"</h3>
                                        <span class="text-xs text-base-content/60">"Quick pulse on throughput"</span>
                                    </header>
                                    <ul class="space-y-2 text-sm">
                                        <li class="flex justify-between">
                                            <span>"Average line items per order"</span>
                                            <strong>{move || format!("{:.1}", average_items.get())}</strong>
                                        </li>
                                        <li class="flex justify-between">
                                            <span>"Active SKUs"</span>
                                            <strong>{active_skus}</strong>
                                        </li>
                                        <li class="flex justify-between">
                                            <span>"Total catalog size"</span>
                                            <strong>{move || products.with(|list| list.len())}</strong>
                                        </li>
                                    </ul>
                                </div>
                            </article>
                        </section>
                    }.into_any()
                }}
            </Show>
        </AppLayout>
    }
}
