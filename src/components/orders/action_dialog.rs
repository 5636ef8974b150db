//! 订单动作对话框
//!
//! 批准/驳回（必填审批意见）、接单（登记收货地址）与物流登记
//! （承运商、运单号、发货时间）共用一个模态框，按动作类型切换
//! 字段。提交成功后由父组件展示横幅并刷新列表。

use super::OrderAction;
use crate::auth::use_session;
use crate::fmt;
use crate::web::time;
use chrono::Utc;
use leptos::prelude::*;
use leptos::task::spawn_local;
use puma_portal_shared::{AcceptOrderRequest, ApprovalActionRequest, CourierInfoRequest};

/// 预置承运商
const COURIER_OPTIONS: [&str; 5] = [
    "Delhivery",
    "Blue Dart",
    "Ecom Express",
    "Shadowfax",
    "DTDC",
];

/// 生成一个 8 位字母数字 + 4 位时钟尾缀的运单号
fn generate_tracking_number() -> String {
    const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let mut out = String::with_capacity(12);
    for _ in 0..8 {
        let index = (js_sys::Math::random() * ALPHABET.len() as f64) as usize % ALPHABET.len();
        out.push(ALPHABET[index] as char);
    }
    let suffix = time::now().as_millis().rem_euclid(10_000);
    out.push_str(&format!("{suffix:04}"));
    out
}

#[component]
pub fn ActionDialog(
    action: RwSignal<Option<OrderAction>>,
    on_done: Callback<String>,
) -> impl IntoView {
    let session = use_session();

    let (comments, set_comments) = signal(String::new());
    let (delivery_address, set_delivery_address) = signal(String::new());
    let (courier_name, set_courier_name) = signal(COURIER_OPTIONS[0].to_string());
    let (tracking_number, set_tracking_number) = signal(String::new());
    let (dispatch_date, set_dispatch_date) = signal(String::new());
    let (submitting, set_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    // 打开时按动作类型初始化字段并同步模态框
    Effect::new(move |_| {
        let current = action.get();
        match &current {
            Some(OrderAction::Courier(order)) => {
                let existing = order.courier_info.as_ref();
                set_courier_name.set(
                    existing
                        .map(|c| c.courier_name.clone())
                        .unwrap_or_else(|| COURIER_OPTIONS[0].to_string()),
                );
                set_tracking_number.set(
                    existing
                        .map(|c| c.tracking_number.clone())
                        .unwrap_or_else(generate_tracking_number),
                );
                let date = existing.and_then(|c| c.dispatch_date).unwrap_or_else(Utc::now);
                set_dispatch_date.set(fmt::to_datetime_local(&date));
            }
            Some(_) => {
                set_comments.set(String::new());
                set_delivery_address.set(String::new());
            }
            None => {}
        }
        set_error_msg.set(None);

        if let Some(dialog) = dialog_ref.get() {
            if current.is_some() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    let close_dialog = move || {
        action.set(None);
        set_error_msg.set(None);
        set_submitting.set(false);
    };

    let finish = move |result: Result<puma_portal_shared::Order, crate::api::ApiError>,
                       message: &'static str| {
        match result {
            Ok(_) => {
                close_dialog();
                on_done.run(message.to_string());
            }
            Err(err) => set_error_msg.set(Some(err.to_string())),
        }
        set_submitting.set(false);
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(current) = action.get_untracked() else {
            return;
        };

        set_error_msg.set(None);
        let approve = matches!(current, OrderAction::Approve(_));
        match current {
            OrderAction::Approve(order) | OrderAction::Reject(order) => {
                let trimmed = comments.get_untracked().trim().to_string();
                if trimmed.is_empty() {
                    set_error_msg.set(Some("Comments are required".to_string()));
                    return;
                }

                set_submitting.set(true);
                spawn_local(async move {
                    let api = session.api();
                    let request = ApprovalActionRequest { comments: trimmed };
                    if approve {
                        finish(api.approve_order(order.id, &request).await, "Order approved");
                    } else {
                        finish(api.reject_order(order.id, &request).await, "Order rejected");
                    }
                });
            }
            OrderAction::Accept(order) => {
                let trimmed = delivery_address.get_untracked().trim().to_string();
                if trimmed.is_empty() {
                    set_error_msg.set(Some("Delivery address is required".to_string()));
                    return;
                }

                set_submitting.set(true);
                spawn_local(async move {
                    let api = session.api();
                    let request = AcceptOrderRequest {
                        delivery_address: trimmed,
                    };
                    finish(api.accept_order(order.id, &request).await, "Order accepted");
                });
            }
            OrderAction::Courier(order) => {
                let name = courier_name.get_untracked().trim().to_string();
                let tracking = tracking_number.get_untracked().trim().to_string();
                let date_input = dispatch_date.get_untracked();
                if name.is_empty() || tracking.is_empty() || date_input.is_empty() {
                    set_error_msg.set(Some("All courier fields are required".to_string()));
                    return;
                }
                let Some(date) = fmt::parse_datetime_local(&date_input) else {
                    set_error_msg.set(Some("Enter a valid dispatch date".to_string()));
                    return;
                };

                set_submitting.set(true);
                spawn_local(async move {
                    let api = session.api();
                    let request = CourierInfoRequest {
                        courier_name: name,
                        tracking_number: tracking,
                        dispatch_date: date,
                    };
                    finish(
                        api.add_courier_info(order.id, &request).await,
                        "Courier details captured",
                    );
                });
            }
        }
    };

    let title = move || match action.get() {
        Some(OrderAction::Approve(_)) => "Approve order",
        Some(OrderAction::Reject(_)) => "Reject order",
        Some(OrderAction::Accept(_)) => "Accept order",
        Some(OrderAction::Courier(order)) => {
            if order.courier_info.is_some() {
                "Update courier details"
            } else {
                "Add courier details"
            }
        }
        None => "",
    };
    let order_id = move || {
        action
            .get()
            .map(|a| format!("Order ID: {}", a.order().id))
            .unwrap_or_default()
    };

    let is_comment_action = move || {
        matches!(
            action.get(),
            Some(OrderAction::Approve(_) | OrderAction::Reject(_))
        )
    };
    let is_accept = move || matches!(action.get(), Some(OrderAction::Accept(_)));
    let is_courier = move || matches!(action.get(), Some(OrderAction::Courier(_)));

    view! {
        <dialog class="modal" node_ref=dialog_ref on:close=move |_| action.set(None)>
            <div class="modal-box">
                <h3 class="font-bold text-lg">{title}</h3>
                <p class="py-2 text-sm text-base-content/70 font-mono">{order_id}</p>

                <Show when=move || error_msg.get().is_some()>
                    <div role="alert" class="alert alert-error text-sm py-2">
                        <span>{move || error_msg.get().unwrap_or_default()}</span>
                    </div>
                </Show>

                <form on:submit=on_submit class="space-y-4 mt-2">
                    <Show when=is_comment_action>
                        <div class="form-control">
                            <label for="action-comments" class="label">
                                <span class="label-text">"Comments"</span>
                            </label>
                            <textarea
                                id="action-comments"
                                required
                                rows="3"
                                class="textarea textarea-bordered w-full"
                                on:input=move |ev| set_comments.set(event_target_value(&ev))
                                prop:value=comments
                            ></textarea>
                        </div>
                    </Show>

                    <Show when=is_accept>
                        <div class="form-control">
                            <label for="accept-delivery" class="label">
                                <span class="label-text">"Delivery address"</span>
                            </label>
                            <textarea
                                id="accept-delivery"
                                required
                                rows="3"
                                class="textarea textarea-bordered w-full"
                                on:input=move |ev| set_delivery_address.set(event_target_value(&ev))
                                prop:value=delivery_address
                            ></textarea>
                        </div>
                    </Show>

                    <Show when=is_courier>
                        <div class="form-control">
                            <label for="courier-name" class="label">
                                <span class="label-text">"Courier"</span>
                            </label>
                            <select
                                id="courier-name"
                                required
                                class="select select-bordered w-full"
                                on:change=move |ev| set_courier_name.set(event_target_value(&ev))
                            >
                                {COURIER_OPTIONS.iter().map(|option| {
                                    let value = *option;
                                    view! {
                                        <option
                                            value=value
                                            selected=move || courier_name.get() == value
                                        >
                                            {value}
                                        </option>
                                    }
                                }).collect_view()}
                            </select>
                        </div>

                        <div class="form-control">
                            <label for="courier-tracking" class="label">
                                <span class="label-text">"Tracking number"</span>
                            </label>
                            <div class="join w-full">
                                <input
                                    id="courier-tracking"
                                    type="text"
                                    required
                                    class="input input-bordered join-item w-full font-mono"
                                    on:input=move |ev| set_tracking_number.set(event_target_value(&ev))
                                    prop:value=tracking_number
                                />
                                <button
                                    type="button"
                                    class="btn join-item"
                                    on:click=move |_| set_tracking_number.set(generate_tracking_number())
                                >
                                    "Generate"
                                </button>
                            </div>
                        </div>

                        <div class="form-control">
                            <label for="courier-dispatch" class="label">
                                <span class="label-text">"Dispatch date"</span>
                            </label>
                            <input
                                id="courier-dispatch"
                                type="datetime-local"
                                required
                                class="input input-bordered w-full"
                                on:input=move |ev| set_dispatch_date.set(event_target_value(&ev))
                                prop:value=dispatch_date
                            />
                        </div>
                    </Show>

                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| close_dialog()>
                            "Close"
                        </button>
                        <button type="submit" class="btn btn-primary" disabled=move || submitting.get()>
                            {move || if submitting.get() {
                                view! { <span class="loading loading-spinner"></span> "Submitting..." }.into_any()
                            } else {
                                "Submit".into_any()
                            }}
                        </button>
                    </div>
                </form>
            </div>
            <form method="dialog" class="modal-backdrop">
                <button>"close"</button>
            </form>
        </dialog>
    }
}
