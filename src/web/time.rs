//! 浏览器时间源模块
//!
//! 全应用唯一的挂钟入口。纯逻辑层（会话、购物车）一律通过参数
//! 接收 `Timestamp`，不直接读取时钟，保证宿主端可测试。

use puma_portal_shared::Timestamp;

/// 获取当前毫秒时间戳
#[inline]
pub fn now() -> Timestamp {
    Timestamp::new(js_sys::Date::now() as i64)
}

/// 获取当前日期的 `YYYY-MM-DD` 形式，用于导出文件命名
pub fn iso_date_stamp() -> String {
    let iso = String::from(js_sys::Date::new_0().to_iso_string());
    iso.get(..10).unwrap_or(&iso).to_string()
}
