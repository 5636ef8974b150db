//! 门户 API 客户端
//!
//! 基于 `gloo-net` 封装全部 REST 端点：拼接基础地址、附加 Bearer
//! 凭据、把非 2xx 响应体里的 `message`/`detail` 归一化为 `ApiError`。
//! 中止的请求以 `ApiError::Aborted` 浮出，调用方一律静默忽略。

use gloo_net::http::{Request, RequestBuilder, Response};
use puma_portal_shared::{
    AcceptOrderRequest, ApprovalActionRequest, AuthResponse, CourierInfoRequest,
    CreateOrderRequest, CurrentUser, GoogleLoginRequest, HEADER_AUTH, LoginRequest, ManagedUser,
    NotificationEntry, Order, OrderStatus, Product, ProductRequest, RegisterRequest,
    UpdateRoleRequest, UserAccount, UserMetrics,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Display;
use uuid::Uuid;
use web_sys::AbortSignal;

/// API 错误类型
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// 网络层失败（连不上、DNS、跨域等）
    Network(String),
    /// 401：凭据不再被服务端接受
    Unauthorized(String),
    /// 服务端报告的业务错误，消息原样转述给用户
    Status { status: u16, message: String },
    /// 响应体无法按预期解析
    Decode(String),
    /// 请求被调用方中止（导航离开或被新请求取代）
    Aborted,
}

impl ApiError {
    /// 中止不是错误，调用方据此静默忽略
    pub fn is_abort(&self) -> bool {
        matches!(self, ApiError::Aborted)
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Network(message) => write!(f, "Network error: {message}"),
            ApiError::Unauthorized(message) | ApiError::Status { message, .. } => {
                write!(f, "{message}")
            }
            ApiError::Decode(message) => write!(f, "Unexpected response: {message}"),
            ApiError::Aborted => write!(f, "Request aborted"),
        }
    }
}

/// 非 2xx 响应体的约定形状
#[derive(serde::Deserialize)]
struct ErrorBody {
    message: Option<String>,
    detail: Option<String>,
}

fn from_gloo(err: gloo_net::Error) -> ApiError {
    match err {
        gloo_net::Error::JsError(js) if js.name == "AbortError" => ApiError::Aborted,
        gloo_net::Error::JsError(js) => ApiError::Network(js.message),
        gloo_net::Error::SerdeError(err) => ApiError::Decode(err.to_string()),
        gloo_net::Error::GlooError(message) => ApiError::Network(message),
    }
}

/// 把非 2xx 响应归一化为错误
async fn error_from(response: Response) -> ApiError {
    let status = response.status();
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message.or(body.detail))
        .unwrap_or_else(|| format!("Request failed with status {status}"));

    if status == 401 {
        ApiError::Unauthorized(message)
    } else {
        ApiError::Status { status, message }
    }
}

/// 读取成功响应的 JSON 体
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    if !response.ok() {
        return Err(error_from(response).await);
    }
    response.json::<T>().await.map_err(from_gloo)
}

/// 门户 API 客户端
///
/// 持有基础地址与当前凭据；按页面生命周期临时构造，本身无状态。
#[derive(Clone, Debug, PartialEq)]
pub struct PortalApi {
    base_url: String,
    token: Option<String>,
}

impl PortalApi {
    /// 未认证客户端（登录/注册页使用）
    pub fn new(base_url: String) -> Self {
        Self::with_token(base_url, None)
    }

    pub fn with_token(base_url: String, token: Option<String>) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self { base_url, token }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    // 认证头
    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.header(HEADER_AUTH, &format!("Bearer {token}")),
            None => builder,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        signal: Option<&AbortSignal>,
    ) -> Result<T, ApiError> {
        let response = self
            .authorize(Request::get(&self.url(path)))
            .abort_signal(signal)
            .send()
            .await
            .map_err(from_gloo)?;
        read_json(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .authorize(Request::post(&self.url(path)))
            .json(body)
            .map_err(from_gloo)?
            .send()
            .await
            .map_err(from_gloo)?;
        read_json(response).await
    }

    async fn patch_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .authorize(Request::patch(&self.url(path)))
            .json(body)
            .map_err(from_gloo)?
            .send()
            .await
            .map_err(from_gloo)?;
        read_json(response).await
    }

    // =========================================================
    // 认证
    // =========================================================

    /// 用户名密码登录
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.post_json("/api/v1/auth/login", request).await
    }

    /// Google credential 登录
    pub async fn login_with_google(
        &self,
        request: &GoogleLoginRequest,
    ) -> Result<AuthResponse, ApiError> {
        self.post_json("/api/v1/auth/login/google", request).await
    }

    /// 注册新账号
    pub async fn register(&self, request: &RegisterRequest) -> Result<UserAccount, ApiError> {
        self.post_json("/api/v1/auth/register", request).await
    }

    /// 拉取当前会话的权威用户档案
    pub async fn current_session(&self) -> Result<CurrentUser, ApiError> {
        self.get_json("/api/v1/auth/session", None).await
    }

    // =========================================================
    // 订单
    // =========================================================

    /// 查询订单，可按状态过滤
    pub async fn orders(
        &self,
        status: Option<OrderStatus>,
        signal: Option<&AbortSignal>,
    ) -> Result<Vec<Order>, ApiError> {
        let path = match status {
            Some(status) => format!("/api/v1/orders?status={}", status.as_str()),
            None => "/api/v1/orders".to_string(),
        };
        self.get_json(&path, signal).await
    }

    /// 提交新订单
    pub async fn create_order(&self, request: &CreateOrderRequest) -> Result<Order, ApiError> {
        self.post_json("/api/v1/orders", request).await
    }

    /// 批准订单
    pub async fn approve_order(
        &self,
        order_id: Uuid,
        request: &ApprovalActionRequest,
    ) -> Result<Order, ApiError> {
        self.post_json(&format!("/api/v1/orders/{order_id}/approve"), request)
            .await
    }

    /// 驳回订单
    pub async fn reject_order(
        &self,
        order_id: Uuid,
        request: &ApprovalActionRequest,
    ) -> Result<Order, ApiError> {
        self.post_json(&format!("/api/v1/orders/{order_id}/reject"), request)
            .await
    }

    /// 履约方接单并登记收货地址
    pub async fn accept_order(
        &self,
        order_id: Uuid,
        request: &AcceptOrderRequest,
    ) -> Result<Order, ApiError> {
        self.post_json(&format!("/api/v1/orders/{order_id}/accept"), request)
            .await
    }

    /// 登记物流信息
    pub async fn add_courier_info(
        &self,
        order_id: Uuid,
        request: &CourierInfoRequest,
    ) -> Result<Order, ApiError> {
        self.post_json(&format!("/api/v1/orders/{order_id}/courier"), request)
            .await
    }

    // =========================================================
    // 商品
    // =========================================================

    /// 拉取商品目录
    pub async fn products(&self, signal: Option<&AbortSignal>) -> Result<Vec<Product>, ApiError> {
        self.get_json("/api/v1/products", signal).await
    }

    /// 创建商品（管理员）
    pub async fn create_product(&self, request: &ProductRequest) -> Result<Product, ApiError> {
        self.post_json("/api/v1/products", request).await
    }

    // =========================================================
    // 通知
    // =========================================================

    /// 拉取最近的通知日志
    pub async fn notifications(
        &self,
        limit: u32,
        signal: Option<&AbortSignal>,
    ) -> Result<Vec<NotificationEntry>, ApiError> {
        self.get_json(&format!("/api/v1/notifications?limit={limit}"), signal)
            .await
    }

    // =========================================================
    // 用户管理（管理员）
    // =========================================================

    /// 拉取用户目录
    pub async fn managed_users(&self) -> Result<Vec<ManagedUser>, ApiError> {
        self.get_json("/api/v1/admin/users", None).await
    }

    /// 调整用户角色
    pub async fn update_user_role(
        &self,
        user_id: Uuid,
        request: &UpdateRoleRequest,
    ) -> Result<ManagedUser, ApiError> {
        self.patch_json(&format!("/api/v1/admin/users/{user_id}/role"), request)
            .await
    }

    /// 拉取用户活跃度统计
    pub async fn user_metrics(&self, days: u32) -> Result<UserMetrics, ApiError> {
        self.get_json(&format!("/api/v1/admin/users/metrics?days={days}"), None)
            .await
    }

    /// 下载新用户报表（xlsx 字节流）
    pub async fn onboarding_export(&self, days: u32) -> Result<Vec<u8>, ApiError> {
        let response = self
            .authorize(Request::get(&self.url(&format!(
                "/api/v1/admin/users/onboarding/export?days={days}"
            ))))
            .send()
            .await
            .map_err(from_gloo)?;

        if !response.ok() {
            return Err(error_from(response).await);
        }
        response.binary().await.map_err(from_gloo)
    }
}
