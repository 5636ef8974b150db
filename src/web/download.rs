//! 文件下载模块
//!
//! 把后端返回的二进制内容包装为 Blob，通过临时对象 URL 与
//! 合成的 `<a>` 点击触发浏览器下载（报表导出使用）。

use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

/// 以给定文件名保存字节内容
///
/// # 返回
/// - `true` 如果下载已成功触发
pub fn save_bytes(filename: &str, mime: &str, bytes: &[u8]) -> bool {
    save_bytes_inner(filename, mime, bytes).is_some()
}

fn save_bytes_inner(filename: &str, mime: &str, bytes: &[u8]) -> Option<()> {
    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(bytes));

    let options = BlobPropertyBag::new();
    options.set_type(mime);

    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options).ok()?;
    let url = Url::create_object_url_with_blob(&blob).ok()?;

    let document = web_sys::window()?.document()?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .ok()?
        .dyn_into::<HtmlAnchorElement>()
        .ok()?;
    anchor.set_href(&url);
    anchor.set_download(filename);

    let body = document.body()?;
    body.append_child(&anchor).ok()?;
    anchor.click();
    anchor.remove();

    let _ = Url::revoke_object_url(&url);
    Some(())
}
