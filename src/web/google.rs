//! Google 登录桥接模块
//!
//! 通过 inline JS 调用 Google Identity Services（index.html 中
//! 引入的 gsi/client 脚本）。拿到的 credential 原样提交给后端，
//! 客户端不做任何校验。

use wasm_bindgen::prelude::*;

#[wasm_bindgen(
    inline_js = "export function google_id_prompt(client_id, callback) { \
        const g = window.google; \
        if (!g || !g.accounts || !g.accounts.id) { return false; } \
        g.accounts.id.initialize({ client_id: client_id, callback: (resp) => callback(resp.credential || '') }); \
        g.accounts.id.prompt(); \
        return true; }"
)]
extern "C" {
    fn google_id_prompt(client_id: &str, callback: &js_sys::Function) -> bool;
}

/// 弹出 Google 登录提示
///
/// # 参数
/// - `client_id`: OAuth 客户端 ID（来自页面配置）
/// - `on_credential`: 拿到 credential 后的回调
///
/// # 返回
/// - `false` 如果 GIS 脚本尚未加载，调用方应提示用户稍后重试
pub fn prompt_sign_in<F>(client_id: &str, on_credential: F) -> bool
where
    F: Fn(String) + 'static,
{
    let closure = Closure::<dyn Fn(String)>::new(on_credential);
    let started = google_id_prompt(client_id, closure.as_ref().unchecked_ref());

    // 泄漏闭包以保持回调存活（提示框由 GIS 异步触发）
    closure.forget();
    started
}
