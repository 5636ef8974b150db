//! 全局事件监听模块
//!
//! 封装 document/window 级别的事件注册。这里注册的监听器与应用
//! 同生命周期，闭包通过 `forget` 泄漏以保持存活（与路由服务的
//! popstate 监听同一做法）。

use wasm_bindgen::prelude::*;
use web_sys::VisibilityState;

/// 页面重新可见时触发回调
///
/// 监听 `visibilitychange`，仅在状态变为 visible 时调用。
pub fn on_document_visible<F>(callback: F)
where
    F: Fn() + 'static,
{
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    let doc = document.clone();
    let closure = Closure::<dyn Fn()>::new(move || {
        if doc.visibility_state() == VisibilityState::Visible {
            callback();
        }
    });

    let _ = document
        .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());

    // 泄漏闭包以保持监听器存活
    closure.forget();
}

/// 窗口重新获得焦点时触发回调
pub fn on_window_focus<F>(callback: F)
where
    F: Fn() + 'static,
{
    let Some(window) = web_sys::window() else {
        return;
    };

    let closure = Closure::<dyn Fn()>::new(callback);
    let _ = window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());

    // 泄漏闭包以保持监听器存活
    closure.forget();
}

/// 按下 Escape 键时触发回调
pub fn on_document_escape<F>(callback: F)
where
    F: Fn() + 'static,
{
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };

    let closure = Closure::<dyn Fn(web_sys::KeyboardEvent)>::new(move |ev: web_sys::KeyboardEvent| {
        if ev.key() == "Escape" {
            callback();
        }
    });

    let _ = document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());

    // 泄漏闭包以保持监听器存活
    closure.forget();
}
