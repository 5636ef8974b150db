//! 订单工作台页面
//!
//! 状态筛选 + 60 秒自动刷新 + 手动刷新；切换筛选会中止被取代的
//! 在途请求，只有最近一次请求的结果会落到界面状态。
//! 下单、审批、接单与物流登记分别由子对话框承担。

use crate::auth::use_session;
use crate::components::icons::*;
use crate::components::layout::AppLayout;
use crate::fmt;
use crate::web::abort::AbortGuard;
use chrono::Utc;
use leptos::prelude::*;
use leptos::task::spawn_local;
use puma_portal_shared::{Order, OrderStatus, Product};
use std::rc::Rc;
use std::time::Duration;

mod action_dialog;
mod create_order_dialog;
mod order_card;

use action_dialog::ActionDialog;
use create_order_dialog::CreateOrderDialog;
use order_card::OrderCard;

/// 自动刷新间隔
const AUTO_REFRESH_INTERVAL: Duration = Duration::from_secs(60);
/// 成功横幅展示时长
const SUCCESS_BANNER: Duration = Duration::from_secs(4);
/// 加载骨架卡片数量
const SKELETON_PLACEHOLDERS: usize = 3;

/// 订单卡片上可触发的动作
#[derive(Clone, PartialEq)]
pub enum OrderAction {
    Approve(Order),
    Reject(Order),
    Accept(Order),
    Courier(Order),
}

impl OrderAction {
    pub fn order(&self) -> &Order {
        match self {
            OrderAction::Approve(order)
            | OrderAction::Reject(order)
            | OrderAction::Accept(order)
            | OrderAction::Courier(order) => order,
        }
    }
}

#[component]
pub fn OrdersPage() -> impl IntoView {
    let session = use_session();
    let role = session.role_signal();

    let can_create = move || role.get().is_some_and(|r| r.can_create_orders());

    let filter = RwSignal::new(Option::<OrderStatus>::None);
    let orders = RwSignal::new(Vec::<Order>::new());
    let loading = RwSignal::new(true);
    let error = RwSignal::new(Option::<String>::None);
    let success = RwSignal::new(Option::<String>::None);
    let last_synced = RwSignal::new(Option::<String>::None);
    let refreshing = RwSignal::new(false);

    let products = RwSignal::new(Vec::<Product>::new());
    let products_loading = RwSignal::new(false);
    let products_error = RwSignal::new(Option::<String>::None);

    let show_create = RwSignal::new(false);
    let action = RwSignal::new(Option::<OrderAction>::None);

    // 首次与筛选变化时拉取；新的筛选请求直接取代在途请求，
    // 被取代的请求以 Aborted 浮出并被静默忽略
    Effect::new(move |prev: Option<Rc<AbortGuard>>| {
        if let Some(prev) = &prev {
            prev.abort();
        }

        let status = filter.get();
        loading.set(true);
        error.set(None);

        let guard = Rc::new(AbortGuard::new());
        let in_flight = Rc::clone(&guard);
        spawn_local(async move {
            let api = session.api();
            match api.orders(status, in_flight.signal().as_ref()).await {
                Ok(data) => {
                    orders.set(data);
                    last_synced.set(Some(fmt::date_time_medium(&Utc::now())));
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

    // 手动/定时/动作后的刷新，尽力而为：失败只显示横幅，
    // 不中断后续调度
    let refresh_orders = move |track_refreshing: bool| {
        if track_refreshing {
            refreshing.set(true);
        }
        spawn_local(async move {
            let api = session.api();
            match api.orders(filter.get_untracked(), None).await {
                Ok(data) => {
                    orders.set(data);
                    last_synced.set(Some(fmt::date_time_medium(&Utc::now())));
                }
                Err(err) if err.is_abort() => {}
                Err(err) => error.set(Some(err.to_string())),
            }
            if track_refreshing {
                refreshing.set(false);
            }
        });
    };

    if let Ok(poll) = set_interval_with_handle(move || refresh_orders(false), AUTO_REFRESH_INTERVAL)
    {
        on_cleanup(move || poll.clear());
    }

    // 商品快照：行项目图片兜底 + 下单对话框的目录来源
    let load_products = move || {
        products_loading.set(true);
        products_error.set(None);
        spawn_local(async move {
            let api = session.api();
            match api.products(None).await {
                Ok(data) => products.set(data),
                Err(err) if err.is_abort() => {}
                Err(err) => products_error.set(Some(err.to_string())),
            }
            products_loading.set(false);
        });
    };
    load_products();

    // 打开下单对话框时重新拉一次最新目录
    Effect::new(move |_| {
        if show_create.get() {
            load_products();
        }
    });

    // 成功横幅自动消失
    Effect::new(move |_| {
        if success.get().is_some() {
            set_timeout(move || success.set(None), SUCCESS_BANNER);
        }
    });

    let page_title = move || match filter.get() {
        Some(status) => format!("{} orders", status.label()),
        None => "All orders".to_string(),
    };
    let hero_copy = move || {
        if can_create() {
            "Create requests, track fulfilment, and dispatch faster."
        } else {
            "Stay ahead of approvals and watch fulfilment at a glance."
        }
    };

    let filter_options: Vec<(Option<OrderStatus>, &'static str)> =
        std::iter::once((None, "All statuses"))
            .chain(OrderStatus::ALL.iter().map(|s| (Some(*s), s.label())))
            .collect();

    let order_count = move || orders.with(|list| list.len());

    let on_action = Callback::new(move |order_action: OrderAction| {
        action.set(Some(order_action));
    });
    let on_action_done = Callback::new(move |message: String| {
        success.set(Some(message));
        refresh_orders(false);
    });
    let on_created = Callback::new(move |_: ()| {
        success.set(Some("Order created successfully".to_string()));
        refresh_orders(false);
    });

    view! {
        <AppLayout title="Puma Printables Portal">
            <div class="flex items-start justify-between flex-wrap gap-4 mb-4">
                <div>
                    <h2 class="text-2xl font-bold">{page_title}</h2>
                    <p class="text-sm text-base-content/60">{hero_copy}</p>
                </div>
                <div class="flex gap-2">
                    <button
                        class="btn btn-ghost btn-sm gap-2"
                        on:click=move |_| {
                            if !refreshing.get() && !loading.get() {
                                refresh_orders(true);
                            }
                        }
                        disabled=move || refreshing.get() || loading.get()
                    >
                        <RefreshCw attr:class=move || if refreshing.get() { "h-4 w-4 animate-spin" } else { "h-4 w-4" } />
                        {move || if refreshing.get() { "Refreshing..." } else { "Refresh" }}
                    </button>
                    <Show when=can_create>
                        <button class="btn btn-primary btn-sm gap-2" on:click=move |_| show_create.set(true)>
                            <Plus attr:class="h-4 w-4" /> "New order"
                        </button>
                    </Show>
                </div>
            </div>

            // 状态筛选
            <div class="flex flex-wrap gap-2 mb-4" role="group" aria-label="Filter by order status">
                <For
                    each=move || filter_options.clone()
                    key=|(_, label)| *label
                    children=move |(value, label)| {
                        view! {
                            <button
                                class=move || if filter.get() == value {
                                    "btn btn-sm btn-primary"
                                } else {
                                    "btn btn-sm btn-ghost"
                                }
                                on:click=move |_| filter.set(value)
                            >
                                {label}
                            </button>
                        }
                    }
                />
            </div>

            <Show when=move || (!loading.get() && error.get().is_none() && order_count() > 0)>
                <p class="text-sm text-base-content/60 mb-2">
                    "Showing " {order_count}
                    {move || if order_count() == 1 { " order" } else { " orders" }}
                    " in this view"
                    {move || last_synced.get().map(|at| format!(" • Updated {at}")).unwrap_or_default()}
                </p>
            </Show>

            <Show when=move || success.get().is_some()>
                <div class="alert alert-success mb-4" role="status">
                    <CheckCircle attr:class="h-5 w-5" />
                    <span>{move || success.get().unwrap_or_default()}</span>
                </div>
            </Show>

            <Show
                when=move || !loading.get()
                fallback=|| view! {
                    <div class="grid gap-4 md:grid-cols-2 xl:grid-cols-3" aria-hidden="true">
                        {(0..SKELETON_PLACEHOLDERS).map(|_| view! {
                            <div class="card bg-base-100 shadow-md p-6 space-y-3">
                                <div class="skeleton h-6 w-2/3"></div>
                                <div class="skeleton h-4 w-1/3"></div>
                                <div class="skeleton h-16 w-full"></div>
                                <div class="skeleton h-4 w-1/2"></div>
                            </div>
                        }).collect_view()}
                    </div>
                }
            >
                {move || if let Some(message) = error.get() {
                    view! { <div class="alert alert-error">{message}</div> }.into_any()
                } else if order_count() == 0 {
                    view! {
                        <div class="card bg-base-100 shadow-md p-10 text-center">
                            <h3 class="text-lg font-bold">"No orders found"</h3>
                            <p class="text-sm text-base-content/60">
                                {move || if can_create() {
                                    "Use the New order button to raise a request."
                                } else {
                                    "Try switching filters or ask the store team to raise an order."
                                }}
                            </p>
                        </div>
                    }.into_any()
                } else {
                    view! {
                        <div class="grid gap-4 md:grid-cols-2 xl:grid-cols-3">
                            <For
                                each=move || orders.get()
                                key=|order| (order.id, order.status, order.courier_info.is_some())
                                children=move |order| {
                                    view! {
                                        <OrderCard order=order role=role products=products on_action=on_action />
                                    }
                                }
                            />
                        </div>
                    }.into_any()
                }}
            </Show>

            <CreateOrderDialog
                open=show_create
                products=products
                products_loading=products_loading
                products_error=products_error
                on_created=on_created
            />
            <ActionDialog action=action on_done=on_action_done />
        </AppLayout>
    }
}
