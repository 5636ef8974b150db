//! 订单卡片组件
//!
//! 展示单个订单快照：状态徽章、行项目、物流信息与合计。
//! 依据当前角色与订单状态渲染可用动作。

use super::OrderAction;
use crate::components::icons::Truck;
use crate::fmt;
use leptos::prelude::*;
use puma_portal_shared::{Order, OrderStatus, Product, UserRole};

fn status_badge_class(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::PendingApproval => "badge badge-warning",
        OrderStatus::Approved => "badge badge-info",
        OrderStatus::Accepted => "badge badge-accent",
        OrderStatus::Rejected => "badge badge-error",
        OrderStatus::InTransit => "badge badge-secondary",
        OrderStatus::Fulfilled => "badge badge-success",
    }
}

#[component]
pub fn OrderCard(
    order: Order,
    role: Signal<Option<UserRole>>,
    /// 商品快照，行项目缺图时兜底
    products: RwSignal<Vec<Product>>,
    on_action: Callback<OrderAction>,
) -> impl IntoView {
    let status = order.status;
    let has_courier = order.courier_info.is_some();

    let show_approval = move || {
        status == OrderStatus::PendingApproval
            && role.get().is_some_and(|r| r.can_manage_approvals())
    };
    let show_accept = move || {
        status == OrderStatus::Approved && role.get().is_some_and(|r| r.can_accept_orders())
    };
    let show_courier = move || {
        matches!(status, OrderStatus::Approved | OrderStatus::Accepted)
            && !has_courier
            && role.get().is_some_and(|r| r.can_add_courier())
    };

    let approve_order = order.clone();
    let reject_order = order.clone();
    let accept_order = order.clone();
    let courier_order = order.clone();

    let placed_by = order
        .customer_gst
        .clone()
        .unwrap_or_else(|| "Store user".to_string());
    let created = fmt::date_time_medium(&order.created_at);
    let total = fmt::inr(order.total_amount);
    let courier_info = order.courier_info.clone();

    view! {
        <article class="card bg-base-100 shadow-md">
            <div class="card-body p-5 gap-3">
                <div class="flex items-start justify-between gap-2">
                    <div>
                        <div class="text-xs uppercase text-base-content/50">"Order ID"</div>
                        <strong class="font-mono text-sm">{order.id.to_string()}</strong>
                    </div>
                    <span class=status_badge_class(status)>{status.label()}</span>
                </div>

                <div class="grid grid-cols-2 gap-2 text-sm">
                    <div>
                        <div class="text-xs uppercase text-base-content/50">"Placed by"</div>
                        <span>{placed_by}</span>
                    </div>
                    <div>
                        <div class="text-xs uppercase text-base-content/50">"Created"</div>
                        <span>{created}</span>
                    </div>
                    <div class="col-span-2">
                        <div class="text-xs uppercase text-base-content/50">"Ship to"</div>
                        <span>{order.shipping_address.clone()}</span>
                    </div>
                </div>

                <div class="space-y-2" aria-label="Line items">
                    {order.items.iter().map(|item| {
                        let image = item.image_url.clone().or_else(|| {
                            products.with_untracked(|list| {
                                list.iter()
                                    .find(|p| p.id == item.product_id)
                                    .and_then(|p| p.image_url.clone())
                            })
                        });
                        let initial = item
                            .product_name
                            .trim()
                            .chars()
                            .next()
                            .unwrap_or('P')
                            .to_string();
                        view! {
                            <div class="flex items-center gap-3 bg-base-200 rounded-lg p-2">
                                <div class="avatar placeholder">
                                    <div class="w-10 rounded bg-base-300 text-base-content/70">
                                        {match image {
                                            Some(src) => view! {
                                                <img src=src alt=item.product_name.clone() loading="lazy" />
                                            }.into_any(),
                                            None => view! { <span>{initial}</span> }.into_any(),
                                        }}
                                    </div>
                                </div>
                                <div class="flex-1 text-sm">
                                    <div class="flex justify-between">
                                        <span class="font-medium">{item.product_name.clone()}</span>
                                        <span class="text-base-content/60">{format!("×{}", item.quantity)}</span>
                                    </div>
                                    <div class="flex justify-between text-xs text-base-content/60">
                                        <span>{format!("{} each", fmt::inr(item.unit_price))}</span>
                                        <span>{fmt::inr(item.line_total)}</span>
                                    </div>
                                </div>
                            </div>
                        }
                    }).collect_view()}
                </div>

                <div class="flex flex-wrap gap-2">
                    <Show when=show_approval>
                        <button
                            class="btn btn-primary btn-sm"
                            on:click={
                                let order = approve_order.clone();
                                move |_| on_action.run(OrderAction::Approve(order.clone()))
                            }
                        >
                            "Approve"
                        </button>
                        <button
                            class="btn btn-outline btn-error btn-sm"
                            on:click={
                                let order = reject_order.clone();
                                move |_| on_action.run(OrderAction::Reject(order.clone()))
                            }
                        >
                            "Reject"
                        </button>
                    </Show>
                    <Show when=show_accept>
                        <button
                            class="btn btn-accent btn-sm"
                            on:click={
                                let order = accept_order.clone();
                                move |_| on_action.run(OrderAction::Accept(order.clone()))
                            }
                        >
                            "Accept"
                        </button>
                    </Show>
                    <Show when=show_courier>
                        <button
                            class="btn btn-outline btn-sm"
                            on:click={
                                let order = courier_order.clone();
                                move |_| on_action.run(OrderAction::Courier(order.clone()))
                            }
                        >
                            "Add courier"
                        </button>
                    </Show>
                </div>

                <div class="flex items-end justify-between border-t border-base-300 pt-3">
                    <div>
                        <div class="text-xs uppercase text-base-content/50">"Total amount"</div>
                        <div class="text-lg font-bold">{total}</div>
                    </div>
                    {match courier_info {
                        Some(courier) => view! {
                            <div class="text-xs text-right space-y-0.5">
                                <strong class="inline-flex items-center gap-1">
                                    <Truck attr:class="h-3 w-3" /> "Courier dispatched"
                                </strong>
                                <div>{format!("Provider: {}", courier.courier_name)}</div>
                                <div>{format!("Tracking #: {}", courier.tracking_number)}</div>
                                {courier.dispatch_date.map(|date| view! {
                                    <div>{format!("Dispatched: {}", fmt::date_time_medium(&date))}</div>
                                })}
                            </div>
                        }.into_any(),
                        None => view! {
                            <span class="text-xs text-base-content/50">"Courier details pending"</span>
                        }.into_any(),
                    }}
                </div>
            </div>
        </article>
    }
}
