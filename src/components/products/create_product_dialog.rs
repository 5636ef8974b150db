//! 新建商品对话框（管理员）
//!
//! SKU、名称、描述、价格、库存与自由键值规格；创建成功后由
//! 父组件重新拉取目录。

use crate::auth::use_session;
use crate::components::icons::XMark;
use leptos::prelude::*;
use leptos::task::spawn_local;
use puma_portal_shared::ProductRequest;

/// 规格行草稿
#[derive(Clone, PartialEq)]
struct SpecRow {
    key: usize,
    name: String,
    value: String,
}

/// 表单状态结构体
#[derive(Clone, Copy)]
struct ProductForm {
    sku: RwSignal<String>,
    name: RwSignal<String>,
    description: RwSignal<String>,
    image_url: RwSignal<String>,
    price: RwSignal<String>,
    stock_quantity: RwSignal<String>,
    active: RwSignal<bool>,
    specs: RwSignal<Vec<SpecRow>>,
    next_key: RwSignal<usize>,
}

impl ProductForm {
    fn new() -> Self {
        Self {
            sku: RwSignal::new(String::new()),
            name: RwSignal::new(String::new()),
            description: RwSignal::new(String::new()),
            image_url: RwSignal::new(String::new()),
            price: RwSignal::new(String::new()),
            stock_quantity: RwSignal::new(String::new()),
            active: RwSignal::new(true),
            specs: RwSignal::new(Vec::new()),
            next_key: RwSignal::new(0),
        }
    }

    fn reset(&self) {
        self.sku.set(String::new());
        self.name.set(String::new());
        self.description.set(String::new());
        self.image_url.set(String::new());
        self.price.set(String::new());
        self.stock_quantity.set(String::new());
        self.active.set(true);
        self.specs.set(Vec::new());
        self.next_key.set(0);
    }

    fn add_spec(&self) {
        let key = self.next_key.get_untracked();
        self.next_key.set(key + 1);
        self.specs.update(|rows| {
            rows.push(SpecRow {
                key,
                name: String::new(),
                value: String::new(),
            })
        });
    }

    fn remove_spec(&self, key: usize) {
        self.specs.update(|rows| rows.retain(|row| row.key != key));
    }

    fn set_spec_name(&self, key: usize, name: String) {
        self.specs.update(|rows| {
            if let Some(row) = rows.iter_mut().find(|row| row.key == key) {
                row.name = name;
            }
        });
    }

    fn set_spec_value(&self, key: usize, value: String) {
        self.specs.update(|rows| {
            if let Some(row) = rows.iter_mut().find(|row| row.key == key) {
                row.value = value;
            }
        });
    }

    /// 校验并转换为创建请求
    fn to_request(&self) -> Result<ProductRequest, String> {
        let sku = self.sku.get_untracked().trim().to_string();
        if sku.is_empty() {
            return Err("SKU is required".to_string());
        }
        let name = self.name.get_untracked().trim().to_string();
        if name.is_empty() {
            return Err("Name is required".to_string());
        }
        let description = self.description.get_untracked().trim().to_string();
        if description.is_empty() {
            return Err("Description is required".to_string());
        }

        let price: f64 = self
            .price
            .get_untracked()
            .trim()
            .parse()
            .map_err(|_| "Enter a valid price".to_string())?;
        if price <= 0.0 {
            return Err("Price must be positive".to_string());
        }

        let stock_quantity: u32 = self
            .stock_quantity
            .get_untracked()
            .trim()
            .parse()
            .map_err(|_| "Enter a valid stock quantity".to_string())?;

        let mut specifications = serde_json::Map::new();
        self.specs.with_untracked(|rows| {
            for row in rows {
                let key = row.name.trim();
                if !key.is_empty() {
                    specifications.insert(
                        key.to_string(),
                        serde_json::Value::String(row.value.trim().to_string()),
                    );
                }
            }
        });

        let image_url = self.image_url.get_untracked().trim().to_string();
        Ok(ProductRequest {
            sku,
            name,
            description,
            image_url: (!image_url.is_empty()).then_some(image_url),
            price,
            specifications,
            stock_quantity,
            active: Some(self.active.get_untracked()),
        })
    }
}

#[component]
pub fn CreateProductDialog(open: RwSignal<bool>, on_created: Callback<()>) -> impl IntoView {
    let session = use_session();
    let form = ProductForm::new();
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
                    match api.create_product(&request).await {
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
                <h3 class="font-bold text-lg">"Add a new SKU"</h3>
                <p class="py-2 text-base-content/70">"Catalog entries go live immediately unless parked."</p>

                <Show when=move || error_msg.get().is_some()>
                    <div role="alert" class="alert alert-error text-sm py-2">
                        <span>{move || error_msg.get().unwrap_or_default()}</span>
                    </div>
                </Show>

                <form on:submit=on_submit class="space-y-4 mt-2">
                    <div class="grid grid-cols-2 gap-4">
                        <div class="form-control">
                            <label for="sku" class="label">
                                <span class="label-text">"SKU"</span>
                            </label>
                            <input id="sku" required
                                type="text"
                                placeholder="PUMA-TEE-001"
                                on:input=move |ev| form.sku.set(event_target_value(&ev))
                                prop:value=move || form.sku.get()
                                class="input input-bordered w-full font-mono"
                            />
                        </div>
                        <div class="form-control">
                            <label for="product-name" class="label">
                                <span class="label-text">"Name"</span>
                            </label>
                            <input id="product-name" required
                                type="text"
                                placeholder="Crew neck tee"
                                on:input=move |ev| form.name.set(event_target_value(&ev))
                                prop:value=move || form.name.get()
                                class="input input-bordered w-full"
                            />
                        </div>
                    </div>

                    <div class="form-control">
                        <label for="product-description" class="label">
                            <span class="label-text">"Description"</span>
                        </label>
                        <textarea id="product-description" required rows="2"
                            class="textarea textarea-bordered w-full"
                            on:input=move |ev| form.description.set(event_target_value(&ev))
                            prop:value=move || form.description.get()
                        ></textarea>
                    </div>

                    <div class="form-control">
                        <label for="product-image" class="label">
                            <span class="label-text">"Image URL (optional)"</span>
                        </label>
                        <input id="product-image"
                            type="url"
                            on:input=move |ev| form.image_url.set(event_target_value(&ev))
                            prop:value=move || form.image_url.get()
                            class="input input-bordered w-full"
                        />
                    </div>

                    <div class="grid grid-cols-2 gap-4">
                        <div class="form-control">
                            <label for="product-price" class="label">
                                <span class="label-text">"Price (INR)"</span>
                            </label>
                            <input id="product-price" required
                                type="number" min="0.01" step="0.01"
                                on:input=move |ev| form.price.set(event_target_value(&ev))
                                prop:value=move || form.price.get()
                                class="input input-bordered w-full"
                            />
                        </div>
                        <div class="form-control">
                            <label for="product-stock" class="label">
                                <span class="label-text">"Stock quantity"</span>
                            </label>
                            <input id="product-stock" required
                                type="number" min="0"
                                on:input=move |ev| form.stock_quantity.set(event_target_value(&ev))
                                prop:value=move || form.stock_quantity.get()
                                class="input input-bordered w-full"
                            />
                        </div>
                    </div>

                    <div class="form-control">
                        <label class="label cursor-pointer">
                            <span class="label-text font-bold">"Active"</span>
                            <input type="checkbox" class="toggle toggle-primary"
                                prop:checked=move || form.active.get()
                                on:change=move |ev| form.active.set(event_target_checked(&ev))
                            />
                        </label>
                    </div>

                    // 自由键值规格
                    <fieldset class="border border-base-300 rounded-lg p-4 space-y-2">
                        <legend class="px-2 text-sm font-bold">"Specifications"</legend>
                        <For
                            each=move || form.specs.get()
                            key=|row| row.key
                            children=move |row| {
                                let key = row.key;
                                let name = row.name.clone();
                                let value = row.value.clone();
                                view! {
                                    <div class="flex gap-2">
                                        <input
                                            type="text"
                                            placeholder="Fabric"
                                            class="input input-bordered input-sm flex-1"
                                            prop:value=name
                                            on:input=move |ev| form.set_spec_name(key, event_target_value(&ev))
                                        />
                                        <input
                                            type="text"
                                            placeholder="100% cotton"
                                            class="input input-bordered input-sm flex-1"
                                            prop:value=value
                                            on:input=move |ev| form.set_spec_value(key, event_target_value(&ev))
                                        />
                                        <button
                                            type="button"
                                            class="btn btn-ghost btn-square btn-sm"
                                            aria-label="Remove specification"
                                            on:click=move |_| form.remove_spec(key)
                                        >
                                            <XMark attr:class="h-4 w-4" />
                                        </button>
                                    </div>
                                }
                            }
                        />
                        <button type="button" class="btn btn-ghost btn-sm" on:click=move |_| form.add_spec()>
                            "Add specification"
                        </button>
                    </fieldset>

                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| close_dialog()>
                            "Cancel"
                        </button>
                        <button type="submit" disabled=move || submitting.get() class="btn btn-primary">
                            {move || if submitting.get() {
                                view! { <span class="loading loading-spinner"></span> "Creating..." }.into_any()
                            } else {
                                "Create SKU".into_any()
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
