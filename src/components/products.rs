//! 商品目录页面
//!
//! 目录网格 + 在售/下架筛选（客户端过滤）。每次成功拉取都把最新
//! 目录喂给购物车做对账；可购商品提供加入购物车入口，管理员可以
//! 直接创建新 SKU。

use crate::auth::use_session;
use crate::cart::use_cart;
use crate::components::icons::*;
use crate::components::layout::AppLayout;
use crate::fmt;
use crate::web::abort::AbortGuard;
use leptos::prelude::*;
use leptos::task::spawn_local;
use puma_portal_shared::Product;
use std::rc::Rc;

mod create_product_dialog;

use create_product_dialog::CreateProductDialog;

/// 目录筛选
#[derive(Clone, Copy, PartialEq, Eq, Default)]
enum CatalogFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl CatalogFilter {
    const ALL: [CatalogFilter; 3] = [
        CatalogFilter::All,
        CatalogFilter::Active,
        CatalogFilter::Inactive,
    ];

    fn label(&self) -> &'static str {
        match self {
            CatalogFilter::All => "All products",
            CatalogFilter::Active => "Active only",
            CatalogFilter::Inactive => "Inactive only",
        }
    }

    fn matches(&self, product: &Product) -> bool {
        match self {
            CatalogFilter::All => true,
            CatalogFilter::Active => product.active,
            CatalogFilter::Inactive => !product.active,
        }
    }
}

#[component]
pub fn ProductsPage() -> impl IntoView {
    let session = use_session();
    let cart = use_cart();
    let role = session.role_signal();

    let is_admin = move || role.get().is_some_and(|r| r.is_admin());
    let can_order = move || role.get().is_some_and(|r| r.can_create_orders());

    let products = RwSignal::new(Vec::<Product>::new());
    let filter = RwSignal::new(CatalogFilter::All);
    let loading = RwSignal::new(true);
    let error = RwSignal::new(Option::<String>::None);
    let show_create = RwSignal::new(false);
    let reload_count = RwSignal::new(0u32);

    // 拉取目录；成功后让购物车按最新库存对账。
    // 重新加载会取代在途请求。
    Effect::new(move |prev: Option<Rc<AbortGuard>>| {
        if let Some(prev) = &prev {
            prev.abort();
        }
        reload_count.track();

        loading.set(true);
        error.set(None);

        let guard = Rc::new(AbortGuard::new());
        let in_flight = Rc::clone(&guard);
        spawn_local(async move {
            let api = session.api();
            match api.products(in_flight.signal().as_ref()).await {
                Ok(data) => {
                    cart.sync_product_details(&data);
                    products.set(data);
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

    let active_count = move || products.with(|list| list.iter().filter(|p| p.active).count());
    let total_count = move || products.with(|list| list.len());
    let filtered = move || {
        let current = filter.get();
        products.with(|list| {
            list.iter()
                .filter(|p| current.matches(p))
                .cloned()
                .collect::<Vec<_>>()
        })
    };

    let on_created = Callback::new(move |_: ()| {
        reload_count.update(|count| *count += 1);
    });

    view! {
        <AppLayout title="Puma Printables Portal">
            <div class="flex items-start justify-between flex-wrap gap-4 mb-4">
                <h2 class="text-2xl font-bold">"Product catalog"</h2>
                <div class="flex items-end gap-2">
                    <label class="form-control" for="product-filter">
                        <span class="label-text text-xs">"Show"</span>
                        <select
                            id="product-filter"
                            class="select select-bordered select-sm"
                            on:change=move |ev| {
                                let value = event_target_value(&ev);
                                let next = CatalogFilter::ALL
                                    .into_iter()
                                    .find(|option| option.label() == value)
                                    .unwrap_or_default();
                                filter.set(next);
                            }
                        >
                            {CatalogFilter::ALL.into_iter().map(|option| view! {
                                <option selected=move || filter.get() == option>
                                    {option.label()}
                                </option>
                            }).collect_view()}
                        </select>
                    </label>
                    <Show when=is_admin>
                        <button class="btn btn-primary btn-sm gap-2" on:click=move |_| show_create.set(true)>
                            <Plus attr:class="h-4 w-4" /> "New SKU"
                        </button>
                    </Show>
                </div>
            </div>

            // 目录概览
            <section class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100 mb-6" aria-label="Catalog overview">
                <div class="stat">
                    <div class="stat-title">"Total SKUs"</div>
                    <div class="stat-value text-primary">{total_count}</div>
                    <div class="stat-desc">"Across all categories"</div>
                </div>
                <div class="stat">
                    <div class="stat-title">"Active inventory"</div>
                    <div class="stat-value text-success">{active_count}</div>
                    <div class="stat-desc">"Ready to be ordered"</div>
                </div>
                <div class="stat">
                    <div class="stat-title">"Inactive slots"</div>
                    <div class="stat-value">{move || total_count() - active_count()}</div>
                    <div class="stat-desc">"Parked for revisions"</div>
                </div>
            </section>

            <Show
                when=move || !loading.get()
                fallback=|| view! {
                    <div class="flex justify-center py-12">
                        <span class="loading loading-spinner loading-lg text-primary" aria-label="Loading products"></span>
                    </div>
                }
            >
                {move || if let Some(message) = error.get() {
                    view! { <div class="alert alert-error">{message}</div> }.into_any()
                } else if filtered().is_empty() {
                    view! {
                        <div class="card bg-base-100 shadow-md p-10 text-center">
                            <h3 class="text-lg font-bold">"No products available"</h3>
                            <p class="text-sm text-base-content/60">
                                "Try changing the filter or add a new SKU."
                            </p>
                        </div>
                    }.into_any()
                } else {
                    view! {
                        <div class="grid gap-4 md:grid-cols-2 xl:grid-cols-3">
                            <For
                                each=filtered
                                key=|product| (product.id, product.active, product.stock_quantity)
                                children=move |product| {
                                    view! { <ProductCard product=product can_order=Signal::derive(can_order) /> }
                                }
                            />
                        </div>
                    }.into_any()
                }}
            </Show>

            <CreateProductDialog open=show_create on_created=on_created />
        </AppLayout>
    }
}

/// 商品卡片
#[component]
fn ProductCard(product: Product, can_order: Signal<bool>) -> impl IntoView {
    let cart = use_cart();

    let orderable = product.orderable();
    let is_low_stock = product.active && product.stock_quantity > 0 && product.stock_quantity <= 3;
    let spec_entries: Vec<(String, String)> = product
        .specifications
        .iter()
        .map(|(key, value)| {
            let rendered = match value {
                serde_json::Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            (key.clone(), rendered)
        })
        .collect();

    let add_product = product.clone();
    let on_add = move |_| {
        cart.add_item(add_product.clone(), 1);
        cart.open_cart();
    };

    view! {
        <article class="card bg-base-100 shadow-md">
            <div class="card-body p-5 gap-3">
                <header class="flex items-start justify-between gap-2">
                    <div>
                        <div class="text-xs uppercase text-base-content/50">"SKU"</div>
                        <strong class="font-mono">{product.sku.clone()}</strong>
                        <div class="font-medium">{product.name.clone()}</div>
                    </div>
                    <span class=if product.active { "badge badge-success" } else { "badge badge-ghost" }>
                        {if product.active { "Active" } else { "Inactive" }}
                    </span>
                </header>

                <p class="text-sm text-base-content/70">{product.description.clone()}</p>

                <dl class="grid grid-cols-3 gap-2 text-sm">
                    <div>
                        <dt class="text-xs uppercase text-base-content/50">"Price"</dt>
                        <dd class="font-bold">{fmt::inr(product.price)}</dd>
                    </div>
                    <div>
                        <dt class="text-xs uppercase text-base-content/50">"In stock"</dt>
                        <dd>{product.stock_quantity}</dd>
                    </div>
                    <div>
                        <dt class="text-xs uppercase text-base-content/50">"Created"</dt>
                        <dd>{fmt::date_medium(&product.created_at)}</dd>
                    </div>
                </dl>

                <Show when=move || is_low_stock>
                    <span class="text-xs text-warning">
                        {format!("Only {} left", product.stock_quantity)}
                    </span>
                </Show>

                {if spec_entries.is_empty() {
                    view! {
                        <span class="text-xs text-base-content/50">"No specifications captured."</span>
                    }.into_any()
                } else {
                    view! {
                        <div>
                            <h4 class="text-xs uppercase text-base-content/50 mb-1">"Specifications"</h4>
                            <ul class="text-xs space-y-0.5">
                                {spec_entries.into_iter().map(|(key, value)| view! {
                                    <li class="flex justify-between gap-2">
                                        <span class="text-base-content/60">{key}</span>
                                        <span>{value}</span>
                                    </li>
                                }).collect_view()}
                            </ul>
                        </div>
                    }.into_any()
                }}

                <Show when=move || can_order.get() && orderable>
                    <div class="card-actions justify-end">
                        <button class="btn btn-primary btn-sm gap-2" on:click=on_add.clone()>
                            <ShoppingCart attr:class="h-4 w-4" /> "Add to cart"
                        </button>
                    </div>
                </Show>
            </div>
        </article>
    }
}
