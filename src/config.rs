//! 运行环境配置模块
//!
//! 后端地址解析顺序：LocalStorage 覆盖值 -> 页面 meta 标签 ->
//! 开发默认值。Google 登录仅在页面配置了客户端 ID 时启用。

use crate::web::LocalStorage;

/// 后端地址的 LocalStorage 覆盖键（运维调试用）
const STORAGE_KEY_API_BASE: &str = "puma.printables.api_base";
/// 后端地址的 meta 标签名
const META_API_BASE: &str = "api-base-url";
/// Google OAuth 客户端 ID 的 meta 标签名
const META_GOOGLE_CLIENT_ID: &str = "google-signin-client_id";
/// 本地开发默认后端
const DEFAULT_API_BASE: &str = "http://localhost:8080";

/// 读取页面 meta 标签内容
fn meta_content(name: &str) -> Option<String> {
    let document = web_sys::window()?.document()?;
    let element = document
        .query_selector(&format!("meta[name='{name}']"))
        .ok()??;
    element
        .get_attribute("content")
        .filter(|value| !value.trim().is_empty())
}

/// 解析后端基础地址（无尾部斜杠）
pub fn api_base_url() -> String {
    if let Some(url) = LocalStorage::get(STORAGE_KEY_API_BASE) {
        if !url.trim().is_empty() {
            return url.trim().trim_end_matches('/').to_string();
        }
    }

    if let Some(url) = meta_content(META_API_BASE) {
        return url.trim().trim_end_matches('/').to_string();
    }

    DEFAULT_API_BASE.to_string()
}

/// Google OAuth 客户端 ID；未配置时 Google 登录入口不渲染
pub fn google_client_id() -> Option<String> {
    meta_content(META_GOOGLE_CLIENT_ID)
}
