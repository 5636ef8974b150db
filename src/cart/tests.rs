use super::*;
use chrono::{TimeZone, Utc};

// =========================================================
// 辅助函数
// =========================================================

fn product(id: u128, stock: u32, active: bool) -> Product {
    Product {
        id: Uuid::from_u128(id),
        sku: format!("SKU-{id:03}"),
        name: format!("Tee {id}"),
        description: "Cotton crew neck".to_string(),
        image_url: None,
        specifications: serde_json::Map::new(),
        price: 499.0,
        stock_quantity: stock,
        active,
        created_at: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
    }
}

fn quantity_of(cart: &Cart, id: u128) -> Option<u32> {
    cart.items()
        .iter()
        .find(|item| item.product.id == Uuid::from_u128(id))
        .map(|item| item.quantity)
}

// =========================================================
// add_item 测试
// =========================================================

#[test]
fn test_add_item_ignores_inactive_product() {
    let mut cart = Cart::default();
    cart.add_item(product(1, 10, false), 2);

    assert!(cart.is_empty());
}

#[test]
fn test_add_item_ignores_out_of_stock_product() {
    let mut cart = Cart::default();
    cart.add_item(product(1, 0, true), 2);

    assert!(cart.is_empty());
}

#[test]
fn test_add_item_caps_at_stock() {
    let mut cart = Cart::default();
    cart.add_item(product(1, 5, true), 9);

    assert_eq!(quantity_of(&cart, 1), Some(5));
}

#[test]
fn test_add_item_accumulates_existing_entry() {
    let mut cart = Cart::default();
    cart.add_item(product(1, 5, true), 2);
    cart.add_item(product(1, 5, true), 2);

    assert_eq!(quantity_of(&cart, 1), Some(4));
    assert_eq!(cart.items().len(), 1);
}

#[test]
fn test_add_item_accumulation_caps_at_stock() {
    let mut cart = Cart::default();
    cart.add_item(product(1, 5, true), 4);
    cart.add_item(product(1, 5, true), 4);

    assert_eq!(quantity_of(&cart, 1), Some(5));
}

#[test]
fn test_add_item_zero_quantity_means_one() {
    let mut cart = Cart::default();
    cart.add_item(product(1, 5, true), 0);

    assert_eq!(quantity_of(&cart, 1), Some(1));
}

#[test]
fn test_add_item_keeps_insertion_order() {
    let mut cart = Cart::default();
    cart.add_item(product(2, 5, true), 1);
    cart.add_item(product(1, 5, true), 1);

    let ids: Vec<_> = cart.items().iter().map(|i| i.product.id).collect();
    assert_eq!(ids, vec![Uuid::from_u128(2), Uuid::from_u128(1)]);
}

// =========================================================
// 数量调整测试
// =========================================================

#[test]
fn test_set_quantity_clamps_to_stock() {
    let mut cart = Cart::default();
    cart.add_item(product(1, 5, true), 1);

    cart.set_item_quantity(Uuid::from_u128(1), 99);
    assert_eq!(quantity_of(&cart, 1), Some(5));
}

#[test]
fn test_set_quantity_zero_removes_entry() {
    let mut cart = Cart::default();
    cart.add_item(product(1, 5, true), 3);

    cart.set_item_quantity(Uuid::from_u128(1), 0);
    assert!(cart.is_empty());
}

#[test]
fn test_set_quantity_on_absent_product_is_noop() {
    let mut cart = Cart::default();
    cart.add_item(product(1, 5, true), 3);

    cart.set_item_quantity(Uuid::from_u128(9), 2);
    assert_eq!(quantity_of(&cart, 1), Some(3));
    assert_eq!(cart.items().len(), 1);
}

#[test]
fn test_increment_caps_at_stock() {
    let mut cart = Cart::default();
    cart.add_item(product(1, 2, true), 2);

    cart.increment_item(Uuid::from_u128(1));
    assert_eq!(quantity_of(&cart, 1), Some(2));
}

#[test]
fn test_decrement_to_zero_removes_entry() {
    let mut cart = Cart::default();
    cart.add_item(product(1, 5, true), 1);

    cart.decrement_item(Uuid::from_u128(1));
    assert!(cart.is_empty());
}

#[test]
fn test_decrement_absent_product_is_noop() {
    let mut cart = Cart::default();
    cart.add_item(product(1, 5, true), 2);

    cart.decrement_item(Uuid::from_u128(9));
    assert_eq!(quantity_of(&cart, 1), Some(2));
}

#[test]
fn test_remove_and_clear() {
    let mut cart = Cart::default();
    cart.add_item(product(1, 5, true), 2);
    cart.add_item(product(2, 5, true), 2);

    cart.remove_item(Uuid::from_u128(1));
    assert_eq!(cart.items().len(), 1);

    cart.clear();
    assert!(cart.is_empty());
}

#[test]
fn test_total_quantity() {
    let mut cart = Cart::default();
    cart.add_item(product(1, 5, true), 3);
    cart.add_item(product(2, 5, true), 2);

    assert_eq!(cart.total_quantity(), 5);
}

// =========================================================
// 不变式：任何操作后 0 < quantity <= stock
// =========================================================

#[test]
fn test_invariant_holds_after_mutations() {
    let mut cart = Cart::default();
    cart.add_item(product(1, 3, true), 7);
    cart.add_item(product(2, 1, true), 1);
    cart.increment_item(Uuid::from_u128(1));
    cart.set_item_quantity(Uuid::from_u128(2), 42);
    cart.decrement_item(Uuid::from_u128(1));

    for item in cart.items() {
        assert!(item.quantity > 0);
        assert!(item.quantity <= item.product.stock_quantity);
    }
}

// =========================================================
// sync_product_details 测试
// =========================================================

#[test]
fn test_sync_clamps_quantity_to_new_stock() {
    // 购物车里 3 件，目录刷新后库存只剩 2
    let mut cart = Cart::default();
    cart.add_item(product(1, 5, true), 3);

    cart.sync_product_details(&[product(1, 2, true)]);
    assert_eq!(quantity_of(&cart, 1), Some(2));
}

#[test]
fn test_sync_drops_inactive_entry() {
    let mut cart = Cart::default();
    cart.add_item(product(1, 5, true), 3);

    cart.sync_product_details(&[product(1, 5, false)]);
    assert!(cart.is_empty());
}

#[test]
fn test_sync_drops_out_of_stock_entry() {
    let mut cart = Cart::default();
    cart.add_item(product(1, 5, true), 3);

    cart.sync_product_details(&[product(1, 0, true)]);
    assert!(cart.is_empty());
}

#[test]
fn test_sync_leaves_absent_entries_untouched() {
    // 目录是分页拉取的，缺席不代表删除
    let mut cart = Cart::default();
    cart.add_item(product(1, 5, true), 3);

    cart.sync_product_details(&[product(2, 9, true)]);
    assert_eq!(quantity_of(&cart, 1), Some(3));
}

#[test]
fn test_sync_replaces_product_snapshot() {
    let mut cart = Cart::default();
    cart.add_item(product(1, 5, true), 3);

    let mut refreshed = product(1, 8, true);
    refreshed.price = 599.0;
    cart.sync_product_details(std::slice::from_ref(&refreshed));

    let item = &cart.items()[0];
    assert_eq!(item.product.price, 599.0);
    assert_eq!(item.product.stock_quantity, 8);
    assert_eq!(item.quantity, 3);
}

#[test]
fn test_sync_with_empty_catalog_is_noop() {
    let mut cart = Cart::default();
    cart.add_item(product(1, 5, true), 3);

    cart.sync_product_details(&[]);
    assert_eq!(quantity_of(&cart, 1), Some(3));
}

// =========================================================
// 可购性与下单请求测试
// =========================================================

#[test]
fn test_unavailable_detection_after_sync() {
    let mut cart = Cart::default();
    cart.add_item(product(1, 5, true), 2);
    assert!(!cart.has_unavailable());

    // 刷新后其他商品仍在目录缺席，但自身快照还可用
    cart.sync_product_details(&[product(2, 9, true)]);
    assert!(!cart.has_unavailable());
    assert!(cart.unavailable_messages().is_empty());
}

#[test]
fn test_to_order_request_captures_all_lines() {
    let mut cart = Cart::default();
    cart.add_item(product(1, 5, true), 2);
    cart.add_item(product(2, 5, true), 1);

    let request = cart.to_order_request("12 MG Road, Bengaluru".to_string(), None);

    assert_eq!(request.shipping_address, "12 MG Road, Bengaluru");
    assert_eq!(request.items.len(), 2);
    assert_eq!(request.items[0].product_id, Uuid::from_u128(1));
    assert_eq!(request.items[0].quantity, 2);
}
