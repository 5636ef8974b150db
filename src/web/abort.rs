//! 请求取消模块
//!
//! 封装 `AbortController`。视图在筛选条件变化或卸载时中止
//! 尚未完成的请求，保证只有最近一次请求的结果被应用到界面状态。

use web_sys::{AbortController, AbortSignal};

/// 中止守卫
///
/// drop 时自动中止关联的请求；显式调用 `abort` 用于"被更新的
/// 请求取代"的场景。
pub struct AbortGuard {
    controller: Option<AbortController>,
}

impl AbortGuard {
    pub fn new() -> Self {
        Self {
            controller: AbortController::new().ok(),
        }
    }

    /// 获取传递给 fetch 的信号
    pub fn signal(&self) -> Option<AbortSignal> {
        self.controller.as_ref().map(|c| c.signal())
    }

    /// 立即中止关联请求
    pub fn abort(&self) {
        if let Some(controller) = &self.controller {
            controller.abort();
        }
    }
}

impl Default for AbortGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AbortGuard {
    fn drop(&mut self) {
        self.abort();
    }
}
