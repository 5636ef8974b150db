//! 购物车抽屉组件
//!
//! 覆盖层抽屉：数量步进（以库存为上限）、可购性警示与下单表单。
//! 下单需要非空购物车、非空收货地址且没有不可购条目；只有后端
//! 确认创建后才清空购物车。

use crate::auth::use_session;
use crate::cart::use_cart;
use crate::components::icons::{Minus, Plus, Trash2, XMark};
use crate::web::events;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use leptos::prelude::*;
use leptos::task::spawn_local;
use uuid::Uuid;

#[component]
pub fn CartDrawer() -> impl IntoView {
    let session = use_session();
    let cart = use_cart();
    let router = use_router();

    let (shipping_address, set_shipping_address) = signal(String::new());
    let (customer_gst, set_customer_gst) = signal(String::new());
    let (placing, set_placing) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (success_msg, set_success_msg) = signal(Option::<String>::None);

    // 开合时清掉上次的提示
    Effect::new(move |_| {
        cart.open.track();
        set_error_msg.set(None);
        set_success_msg.set(None);
    });

    // 购物车清空后重置表单
    Effect::new(move |_| {
        if cart.state.with(|c| c.is_empty()) {
            set_shipping_address.set(String::new());
            set_customer_gst.set(String::new());
        }
    });

    // Escape 关闭抽屉
    events::on_document_escape(move || {
        if cart.open.get_untracked() {
            cart.close_cart();
        }
    });

    let has_unavailable = move || cart.state.with(|c| c.has_unavailable());
    let warnings = move || cart.state.with(|c| c.unavailable_messages());
    let item_count = move || cart.state.with(|c| c.items().len());

    let on_quantity_input = move |product_id: Uuid, value: String| {
        if let Ok(parsed) = value.parse::<u32>() {
            cart.set_item_quantity(product_id, parsed);
        }
    };

    let on_checkout = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();

        let Ok(_) = session.require_auth() else {
            set_error_msg.set(Some(
                "Your session has expired. Please sign in again.".to_string(),
            ));
            return;
        };
        if cart.state.with_untracked(|c| c.is_empty()) {
            set_error_msg.set(Some(
                "Add items to your cart before placing an order.".to_string(),
            ));
            return;
        }
        let address = shipping_address.get_untracked().trim().to_string();
        if address.is_empty() {
            set_error_msg.set(Some("Shipping address is required.".to_string()));
            return;
        }
        if cart.state.with_untracked(|c| c.has_unavailable()) {
            set_error_msg.set(Some(
                "Remove unavailable items before placing the order.".to_string(),
            ));
            return;
        }

        let gst = customer_gst.get_untracked().trim().to_string();
        let request = cart
            .state
            .with_untracked(|c| c.to_order_request(address, (!gst.is_empty()).then_some(gst)));

        set_placing.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            let api = session.api();
            match api.create_order(&request).await {
                Ok(_) => {
                    set_success_msg.set(Some("Order placed successfully.".to_string()));
                    cart.clear();
                    cart.close_cart();
                    router.navigate_route(AppRoute::Orders);
                }
                Err(err) => set_error_msg.set(Some(err.to_string())),
            }
            set_placing.set(false);
        });
    };

    view! {
        <Show when=move || cart.open.get()>
            <div class="fixed inset-0 z-40 bg-base-300/60" role="presentation" on:click=move |_| cart.close_cart()>
                <aside
                    class="fixed right-0 top-0 h-full w-full max-w-md bg-base-100 shadow-2xl flex flex-col"
                    role="dialog"
                    aria-modal="true"
                    aria-label="Cart"
                    on:click=move |ev| ev.stop_propagation()
                >
                    <header class="flex items-start justify-between p-4 border-b border-base-300">
                        <div>
                            <h2 class="text-xl font-bold">"Cart"</h2>
                            <p class="text-sm text-base-content/60">"Review your picks and place an order."</p>
                        </div>
                        <button
                            class="btn btn-ghost btn-square btn-sm"
                            aria-label="Close cart"
                            on:click=move |_| cart.close_cart()
                        >
                            <XMark attr:class="h-4 w-4" />
                        </button>
                    </header>

                    <div class="flex-1 overflow-y-auto p-4">
                        <Show
                            when=move || (item_count() > 0)
                            fallback=|| view! {
                                <div class="text-center py-10">
                                    <p class="font-medium">"Your cart is currently empty."</p>
                                    <span class="text-sm text-base-content/60">"Browse products to add items."</span>
                                </div>
                            }
                        >
                            <ul class="space-y-3">
                                <For
                                    each=move || cart.state.get().items().to_vec()
                                    key=|item| (item.product.id, item.quantity, item.product.stock_quantity)
                                    children=move |item| {
                                        let product = item.product.clone();
                                        let product_id = product.id;
                                        let quantity = item.quantity;
                                        let stock = product.stock_quantity;
                                        let is_low_stock = product.active && stock > 0 && stock <= 3;
                                        let initial = product.name.chars().next().unwrap_or('P').to_string();
                                        view! {
                                            <li class="flex items-center justify-between gap-3 bg-base-200 rounded-lg p-3">
                                                <div class="flex items-center gap-3">
                                                    <div class="avatar placeholder">
                                                        <div class="w-12 rounded bg-base-300 text-base-content/70">
                                                            {match product.image_url.clone() {
                                                                Some(src) => view! { <img src=src alt="" /> }.into_any(),
                                                                None => view! { <span>{initial}</span> }.into_any(),
                                                            }}
                                                        </div>
                                                    </div>
                                                    <div class="text-sm">
                                                        <h3 class="font-medium">{product.name.clone()}</h3>
                                                        <p class="text-xs text-base-content/60 font-mono">{product.sku.clone()}</p>
                                                        <Show when=move || !product.active>
                                                            <span class="text-xs text-error">"Inactive SKU"</span>
                                                        </Show>
                                                        <Show when=move || stock == 0>
                                                            <span class="text-xs text-error">"Out of stock"</span>
                                                        </Show>
                                                        <Show when=move || is_low_stock>
                                                            <span class="text-xs text-warning">{format!("Only {stock} left")}</span>
                                                        </Show>
                                                    </div>
                                                </div>

                                                <div class="flex flex-col items-end gap-2">
                                                    <div class="join">
                                                        <button
                                                            type="button"
                                                            class="btn btn-sm join-item"
                                                            aria-label="Decrease quantity"
                                                            disabled=move || quantity <= 1 || placing.get()
                                                            on:click=move |_| cart.decrement_item(product_id)
                                                        >
                                                            <Minus attr:class="h-3 w-3" />
                                                        </button>
                                                        <input
                                                            type="number"
                                                            min="1"
                                                            max=stock.to_string()
                                                            class="input input-sm input-bordered join-item w-14 text-center"
                                                            prop:value=quantity.to_string()
                                                            disabled=move || placing.get()
                                                            on:change=move |ev| on_quantity_input(product_id, event_target_value(&ev))
                                                        />
                                                        <button
                                                            type="button"
                                                            class="btn btn-sm join-item"
                                                            aria-label="Increase quantity"
                                                            disabled=move || quantity >= stock || placing.get()
                                                            on:click=move |_| cart.increment_item(product_id)
                                                        >
                                                            <Plus attr:class="h-3 w-3" />
                                                        </button>
                                                    </div>
                                                    <button
                                                        type="button"
                                                        class="btn btn-ghost btn-xs text-error gap-1"
                                                        disabled=move || placing.get()
                                                        on:click=move |_| cart.remove_item(product_id)
                                                    >
                                                        <Trash2 attr:class="h-3 w-3" /> "Remove"
                                                    </button>
                                                </div>
                                            </li>
                                        }
                                    }
                                />
                            </ul>
                        </Show>
                    </div>

                    <form class="border-t border-base-300 p-4 space-y-3" on:submit=on_checkout>
                        <div class="flex items-center justify-between">
                            <div>
                                <div class="text-xs uppercase text-base-content/50">"Items in cart"</div>
                                <strong class="text-lg">{move || cart.total_quantity().get()}</strong>
                            </div>
                            <span class="text-xs text-base-content/60">"Pricing is managed outside this workflow."</span>
                        </div>

                        <div class="form-control">
                            <label for="cart-shipping-address" class="label">
                                <span class="label-text">"Shipping address"</span>
                            </label>
                            <textarea
                                id="cart-shipping-address"
                                rows="2"
                                required
                                class="textarea textarea-bordered w-full"
                                on:input=move |ev| set_shipping_address.set(event_target_value(&ev))
                                prop:value=shipping_address
                                disabled=move || placing.get() || item_count() == 0
                            ></textarea>
                        </div>

                        <div class="form-control">
                            <label for="cart-customer-gst" class="label">
                                <span class="label-text">"Customer GST (optional)"</span>
                            </label>
                            <input
                                id="cart-customer-gst"
                                type="text"
                                class="input input-bordered w-full"
                                on:input=move |ev| set_customer_gst.set(event_target_value(&ev))
                                prop:value=customer_gst
                                disabled=move || placing.get() || item_count() == 0
                            />
                        </div>

                        <Show when=move || !warnings().is_empty()>
                            <div class="alert alert-warning text-sm py-2" role="alert">
                                <div>
                                    {move || warnings().into_iter().map(|message| view! {
                                        <p>{message}</p>
                                    }).collect_view()}
                                </div>
                            </div>
                        </Show>

                        <Show when=move || error_msg.get().is_some()>
                            <div class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>
                        <Show when=move || success_msg.get().is_some()>
                            <div class="alert alert-success text-sm py-2">
                                <span>{move || success_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="flex justify-between gap-2">
                            <button
                                type="button"
                                class="btn btn-ghost"
                                disabled=move || placing.get()
                                on:click=move |_| cart.close_cart()
                            >
                                "Continue browsing"
                            </button>
                            <button
                                type="submit"
                                class="btn btn-primary"
                                disabled=move || {
                                    placing.get()
                                        || item_count() == 0
                                        || shipping_address.get().trim().is_empty()
                                        || has_unavailable()
                                }
                            >
                                {move || if placing.get() {
                                    view! { <span class="loading loading-spinner"></span> "Placing order..." }.into_any()
                                } else {
                                    "Place order".into_any()
                                }}
                            </button>
                        </div>
                    </form>
                </aside>
            </div>
        </Show>
    }
}
