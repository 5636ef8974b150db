//! 下单对话框
//!
//! 从在售目录挑选 SKU 组装行项目，最多 5 行；提交前在客户端完成
//! 必填校验，后端确认创建后由父组件刷新列表。

use crate::auth::use_session;
use crate::components::icons::XMark;
use crate::fmt;
use leptos::prelude::*;
use leptos::task::spawn_local;
use puma_portal_shared::{CreateOrderRequest, OrderItemRequest, Product};
use uuid::Uuid;

/// 单笔订单允许的最大行数
const MAX_ORDER_ITEMS: usize = 5;

/// 行项目草稿
#[derive(Clone, PartialEq)]
struct DraftItem {
    key: usize,
    product_id: Option<Uuid>,
    quantity: u32,
}

/// 表单状态结构体
///
/// 使用 `RwSignal` 因为它实现了 `Copy` trait，适合在回调间传递。
#[derive(Clone, Copy)]
struct OrderForm {
    shipping_address: RwSignal<String>,
    customer_gst: RwSignal<String>,
    items: RwSignal<Vec<DraftItem>>,
    next_key: RwSignal<usize>,
}

impl OrderForm {
    fn new() -> Self {
        Self {
            shipping_address: RwSignal::new(String::new()),
            customer_gst: RwSignal::new(String::new()),
            items: RwSignal::new(vec![DraftItem {
                key: 0,
                product_id: None,
                quantity: 1,
            }]),
            next_key: RwSignal::new(1),
        }
    }

    /// 重置表单到初始状态
    fn reset(&self) {
        self.shipping_address.set(String::new());
        self.customer_gst.set(String::new());
        self.items.set(vec![DraftItem {
            key: 0,
            product_id: None,
            quantity: 1,
        }]);
        self.next_key.set(1);
    }

    fn add_row(&self) {
        if self.items.with_untracked(|items| items.len()) >= MAX_ORDER_ITEMS {
            return;
        }
        let key = self.next_key.get_untracked();
        self.next_key.set(key + 1);
        self.items.update(|items| {
            items.push(DraftItem {
                key,
                product_id: None,
                quantity: 1,
            })
        });
    }

    fn remove_row(&self, key: usize) {
        self.items.update(|items| {
            if items.len() > 1 {
                items.retain(|item| item.key != key);
            }
        });
    }

    fn set_product(&self, key: usize, product_id: Option<Uuid>) {
        self.items.update(|items| {
            if let Some(item) = items.iter_mut().find(|item| item.key == key) {
                item.product_id = product_id;
            }
        });
    }

    fn set_quantity(&self, key: usize, quantity: u32) {
        self.items.update(|items| {
            if let Some(item) = items.iter_mut().find(|item| item.key == key) {
                item.quantity = quantity.max(1);
            }
        });
    }

    /// 校验并转换为下单请求
    fn to_request(&self) -> Result<CreateOrderRequest, String> {
        let shipping_address = self.shipping_address.get_untracked().trim().to_string();
        if shipping_address.is_empty() {
            return Err("Shipping address is required".to_string());
        }

        let items: Vec<OrderItemRequest> = self.items.with_untracked(|items| {
            items
                .iter()
                .filter_map(|item| {
                    item.product_id.map(|product_id| OrderItemRequest {
                        product_id,
                        quantity: item.quantity.max(1),
                    })
                })
                .collect()
        });
        if items.is_empty() {
            return Err("Choose at least one product".to_string());
        }

        let customer_gst = self.customer_gst.get_untracked().trim().to_string();
        Ok(CreateOrderRequest {
            shipping_address,
            customer_gst: (!customer_gst.is_empty()).then_some(customer_gst),
            items,
        })
    }
}

#[component]
pub fn CreateOrderDialog(
    open: RwSignal<bool>,
    products: RwSignal<Vec<Product>>,
    products_loading: RwSignal<bool>,
    products_error: RwSignal<Option<String>>,
    on_created: Callback<()>,
) -> impl IntoView {
    let session = use_session();
    let form = OrderForm::new();
    let (submitting, set_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if open.get() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    // 下架商品不可选
    let active_products = Memo::new(move |_| {
        products
            .get()
            .into_iter()
            .filter(|product| product.active)
            .collect::<Vec<_>>()
    });
    let has_products = move || !active_products.with(|list| list.is_empty());

    let close_dialog = move || {
        open.set(false);
        set_error_msg.set(None);
        set_submitting.set(false);
        form.reset();
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        match form.to_request() {
            Err(message) => set_error_msg.set(Some(message)),
            Ok(request) => {
                set_submitting.set(true);
                set_error_msg.set(None);
                spawn_local(async move {
                    let api = session.api();
                    match api.create_order(&request).await {
                        Ok(_) => {
                            close_dialog();
                            on_created.run(());
                        }
                        Err(err) => set_error_msg.set(Some(err.to_string())),
                    }
                    set_submitting.set(false);
                });
            }
        }
    };

    view! {
        <dialog class="modal" node_ref=dialog_ref on:close=move |_| open.set(false)>
            <div class="modal-box max-w-2xl">
                <h3 class="font-bold text-lg">"Raise a new order"</h3>
                <p class="py-2 text-base-content/70">
                    "Pick products from the live catalog and capture fulfilment details."
                </p>

                <Show when=move || products_error.get().is_some()>
                    <div role="alert" class="alert alert-error text-sm py-2">
                        <span>{move || products_error.get().unwrap_or_default()}</span>
                    </div>
                </Show>
                <Show when=move || error_msg.get().is_some()>
                    <div role="alert" class="alert alert-error text-sm py-2">
                        <span>{move || error_msg.get().unwrap_or_default()}</span>
                    </div>
                </Show>

                <form on:submit=on_submit class="space-y-4 mt-2">
                    <div class="form-control">
                        <label for="order-shipping" class="label">
                            <span class="label-text">"Shipping address"</span>
                        </label>
                        <textarea
                            id="order-shipping"
                            required
                            rows="3"
                            class="textarea textarea-bordered w-full"
                            on:input=move |ev| form.shipping_address.set(event_target_value(&ev))
                            prop:value=move || form.shipping_address.get()
                        ></textarea>
                    </div>

                    <div class="form-control">
                        <label for="order-gst" class="label">
                            <span class="label-text">"Customer GST (optional)"</span>
                        </label>
                        <input
                            id="order-gst"
                            type="text"
                            placeholder="GSTIN12345"
                            class="input input-bordered w-full"
                            on:input=move |ev| form.customer_gst.set(event_target_value(&ev))
                            prop:value=move || form.customer_gst.get()
                        />
                    </div>

                    <fieldset class="border border-base-300 rounded-lg p-4 space-y-3">
                        <legend class="px-2 text-sm font-bold">"Line items"</legend>
                        <p class="text-xs text-base-content/60">
                            {format!("Select up to {MAX_ORDER_ITEMS} SKUs. Quantities default to 1.")}
                        </p>

                        <Show
                            when=move || !products_loading.get()
                            fallback=|| view! {
                                <div class="flex justify-center py-4">
                                    <span class="loading loading-spinner loading-md" aria-label="Loading products"></span>
                                </div>
                            }
                        >
                            <Show
                                when=has_products
                                fallback=|| view! {
                                    <p class="text-sm text-base-content/60">
                                        "No active products available. Add catalog entries first."
                                    </p>
                                }
                            >
                                <For
                                    each=move || form.items.get()
                                    key=|item| item.key
                                    children=move |item| {
                                        let key = item.key;
                                        let selected_product = item.product_id;
                                        let quantity = item.quantity;
                                        view! {
                                            <div class="flex items-end gap-2">
                                                <div class="form-control flex-1">
                                                    <label class="label">
                                                        <span class="label-text">"Product"</span>
                                                    </label>
                                                    <select
                                                        required
                                                        class="select select-bordered w-full"
                                                        on:change=move |ev| {
                                                            let value = event_target_value(&ev);
                                                            form.set_product(key, Uuid::parse_str(&value).ok());
                                                        }
                                                    >
                                                        <option value="" selected=selected_product.is_none()>
                                                            "Select a SKU"
                                                        </option>
                                                        <For
                                                            each=move || active_products.get()
                                                            key=|product| product.id
                                                            children=move |product| {
                                                                let label = format!("{} · {}", product.name, fmt::inr(product.price));
                                                                view! {
                                                                    <option
                                                                        value=product.id.to_string()
                                                                        selected=selected_product == Some(product.id)
                                                                    >
                                                                        {label}
                                                                    </option>
                                                                }
                                                            }
                                                        />
                                                    </select>
                                                </div>
                                                <div class="form-control w-28">
                                                    <label class="label">
                                                        <span class="label-text">"Quantity"</span>
                                                    </label>
                                                    <input
                                                        type="number"
                                                        min="1"
                                                        class="input input-bordered w-full"
                                                        prop:value=quantity.to_string()
                                                        on:input=move |ev| {
                                                            if let Ok(value) = event_target_value(&ev).parse::<u32>() {
                                                                form.set_quantity(key, value);
                                                            }
                                                        }
                                                    />
                                                </div>
                                                <button
                                                    type="button"
                                                    class="btn btn-ghost btn-square btn-sm mb-1"
                                                    aria-label="Remove line item"
                                                    disabled=move || form.items.with(|items| items.len() == 1)
                                                    on:click=move |_| form.remove_row(key)
                                                >
                                                    <XMark attr:class="h-4 w-4" />
                                                </button>
                                            </div>
                                        }
                                    }
                                />
                            </Show>
                        </Show>

                        <button
                            type="button"
                            class="btn btn-ghost btn-sm"
                            disabled=move || {
                                form.items.with(|items| items.len() >= MAX_ORDER_ITEMS) || !has_products()
                            }
                            on:click=move |_| form.add_row()
                        >
                            "Add another item"
                        </button>
                    </fieldset>

                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| close_dialog()>
                            "Close"
                        </button>
                        <button
                            type="submit"
                            class="btn btn-primary"
                            disabled=move || submitting.get() || !has_products()
                        >
                            {move || if submitting.get() {
                                view! { <span class="loading loading-spinner"></span> "Creating..." }.into_any()
                            } else {
                                "Create order".into_any()
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
