//! 购物车模块
//!
//! `Cart` 是纯逻辑层：同步操作、不触碰 DOM，所有不变式由自身
//! 的操作维护（页面不得直接改写条目）。不变式：每个条目满足
//! `0 < quantity <= stock_quantity` 且商品处于上架状态，目录刷新
//! 后违反不变式的条目被整体移除而不是清零保留。
//! `CartContext` 是响应式外壳，并把购物车生命周期绑定到会话上：
//! 凭据一旦置空，购物车立即清空并收起。

use leptos::prelude::*;
use puma_portal_shared::{CreateOrderRequest, OrderItemRequest, Product};
use uuid::Uuid;

#[cfg(test)]
mod tests;

/// 购物车条目：商品快照 + 数量
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

/// 购物车状态
///
/// 条目按加入顺序排列，按商品 ID 唯一。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 全部条目的数量之和
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    fn position(&self, product_id: Uuid) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.product.id == product_id)
    }

    /// 加入商品
    ///
    /// 下架或零库存的商品直接忽略；已存在的条目累加数量，
    /// 数量始终封顶到当前库存。
    pub fn add_item(&mut self, product: Product, quantity: u32) {
        if !product.orderable() {
            return;
        }

        let requested = quantity.max(1);
        match self.position(product.id) {
            Some(index) => {
                let item = &mut self.items[index];
                let next = item.quantity.saturating_add(requested);
                item.quantity = next.min(product.stock_quantity);
                item.product = product;
            }
            None => {
                let quantity = requested.min(product.stock_quantity);
                self.items.push(CartItem { product, quantity });
            }
        }
    }

    /// 直接设置条目数量
    ///
    /// 数量被钳制到 `[0, stock_quantity]`；设为 0 即移除条目。
    /// 商品不在购物车中时是空操作。
    pub fn set_item_quantity(&mut self, product_id: Uuid, quantity: u32) {
        if quantity == 0 {
            self.remove_item(product_id);
            return;
        }

        if let Some(index) = self.position(product_id) {
            let item = &mut self.items[index];
            item.quantity = quantity.min(item.product.stock_quantity);
        }
    }

    /// 数量加一，封顶到库存
    pub fn increment_item(&mut self, product_id: Uuid) {
        if let Some(index) = self.position(product_id) {
            let item = &mut self.items[index];
            item.quantity = (item.quantity + 1).min(item.product.stock_quantity);
        }
    }

    /// 数量减一，减到 0 时移除条目
    pub fn decrement_item(&mut self, product_id: Uuid) {
        if let Some(index) = self.position(product_id) {
            let item = &mut self.items[index];
            if item.quantity <= 1 {
                self.items.remove(index);
            } else {
                item.quantity -= 1;
            }
        }
    }

    /// 无条件移除条目
    pub fn remove_item(&mut self, product_id: Uuid) {
        self.items.retain(|item| item.product.id != product_id);
    }

    /// 清空购物车
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// 用最新目录数据对账
    ///
    /// 出现在 `fresh` 中的条目替换商品快照并重新钳制数量；
    /// 刷新后下架、无库存或数量钳到 0 的条目被整体移除。
    /// 未出现在 `fresh` 中的条目保持不动（目录可能是分页拉取）。
    pub fn sync_product_details(&mut self, fresh: &[Product]) {
        if fresh.is_empty() {
            return;
        }

        self.items.retain_mut(|item| {
            let Some(updated) = fresh.iter().find(|p| p.id == item.product.id) else {
                return true;
            };

            let capped = item.quantity.min(updated.stock_quantity);
            if !updated.orderable() || capped == 0 {
                return false;
            }

            item.product = updated.clone();
            item.quantity = capped;
            true
        });
    }

    /// 是否存在当前不可购的条目（下架或零库存）
    pub fn has_unavailable(&self) -> bool {
        self.items.iter().any(|item| !item.product.orderable())
    }

    /// 不可购条目的提示文案，购物车抽屉中展示
    pub fn unavailable_messages(&self) -> Vec<String> {
        self.items
            .iter()
            .filter_map(|item| {
                if !item.product.active {
                    Some(format!("{} is currently inactive.", item.product.name))
                } else if item.product.stock_quantity == 0 {
                    Some(format!("{} is out of stock.", item.product.name))
                } else {
                    None
                }
            })
            .collect()
    }

    /// 组装下单请求
    pub fn to_order_request(&self, shipping_address: String, customer_gst: Option<String>) -> CreateOrderRequest {
        CreateOrderRequest {
            shipping_address,
            customer_gst,
            items: self
                .items
                .iter()
                .map(|item| OrderItemRequest {
                    product_id: item.product.id,
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}

// ============================================================================
// 响应式外壳
// ============================================================================

/// 购物车上下文
///
/// 条目信号与抽屉开合信号，通过 Context 在组件间共享。
/// 抽屉可见性是独立的界面状态，不属于购物车不变式。
#[derive(Clone, Copy)]
pub struct CartContext {
    pub state: RwSignal<Cart>,
    pub open: RwSignal<bool>,
}

impl CartContext {
    pub fn new() -> Self {
        Self {
            state: RwSignal::new(Cart::default()),
            open: RwSignal::new(false),
        }
    }

    /// 数量合计的派生信号（只读）
    pub fn total_quantity(&self) -> Signal<u32> {
        let state = self.state;
        Signal::derive(move || state.with(|cart| cart.total_quantity()))
    }

    pub fn add_item(&self, product: Product, quantity: u32) {
        self.state.update(|cart| cart.add_item(product, quantity));
    }

    pub fn set_item_quantity(&self, product_id: Uuid, quantity: u32) {
        self.state
            .update(|cart| cart.set_item_quantity(product_id, quantity));
    }

    pub fn increment_item(&self, product_id: Uuid) {
        self.state.update(|cart| cart.increment_item(product_id));
    }

    pub fn decrement_item(&self, product_id: Uuid) {
        self.state.update(|cart| cart.decrement_item(product_id));
    }

    pub fn remove_item(&self, product_id: Uuid) {
        self.state.update(|cart| cart.remove_item(product_id));
    }

    pub fn clear(&self) {
        self.state.update(|cart| cart.clear());
    }

    pub fn sync_product_details(&self, fresh: &[Product]) {
        self.state.update(|cart| cart.sync_product_details(fresh));
    }

    pub fn open_cart(&self) {
        self.open.set(true);
    }

    pub fn close_cart(&self) {
        self.open.set(false);
    }

    pub fn toggle_cart(&self) {
        self.open.update(|open| *open = !*open);
    }
}

impl Default for CartContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取购物车上下文
pub fn use_cart() -> CartContext {
    use_context::<CartContext>().expect("CartContext should be provided")
}

/// 把购物车生命周期绑定到会话
///
/// 凭据变为 None 时清空并收起购物车 —— 购物车绝不跨越会话存活。
pub fn bind_cart_to_session(cart: &CartContext, token: Signal<Option<String>>) {
    let cart = *cart;
    Effect::new(move |_| {
        if token.get().is_none() {
            cart.state.set(Cart::default());
            cart.open.set(false);
        }
    });
}
