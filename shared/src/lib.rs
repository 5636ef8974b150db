use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod time;

pub use time::Timestamp;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 会话持久化使用的 LocalStorage 键
pub const STORAGE_KEY_SESSION: &str = "puma.printables.auth";
/// Bearer 凭据所在的请求头
pub const HEADER_AUTH: &str = "Authorization";

// =========================================================
// 用户与角色 (Users & Roles)
// =========================================================

/// 用户角色枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    StoreUser,
    Approver,
    FulfillmentAgent,
    Admin,
}

impl UserRole {
    /// 全部角色，用于下拉选项渲染
    pub const ALL: [UserRole; 4] = [
        UserRole::StoreUser,
        UserRole::Approver,
        UserRole::FulfillmentAgent,
        UserRole::Admin,
    ];

    /// 界面显示标签
    pub fn label(&self) -> &'static str {
        match self {
            UserRole::StoreUser => "Store",
            UserRole::Approver => "Approver",
            UserRole::FulfillmentAgent => "Fulfillment",
            UserRole::Admin => "Admin",
        }
    }

    /// 线上传输值（序列化之外的拼接场景）
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::StoreUser => "STORE_USER",
            UserRole::Approver => "APPROVER",
            UserRole::FulfillmentAgent => "FULFILLMENT_AGENT",
            UserRole::Admin => "ADMIN",
        }
    }

    // 权限判断集中在角色上，页面不自行比对字符串

    pub fn can_create_orders(&self) -> bool {
        matches!(self, UserRole::StoreUser | UserRole::Admin)
    }

    pub fn can_manage_approvals(&self) -> bool {
        matches!(self, UserRole::Approver | UserRole::Admin)
    }

    pub fn can_accept_orders(&self) -> bool {
        matches!(self, UserRole::FulfillmentAgent | UserRole::Admin)
    }

    pub fn can_add_courier(&self) -> bool {
        matches!(
            self,
            UserRole::Approver | UserRole::FulfillmentAgent | UserRole::Admin
        )
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

/// 登录方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthProvider {
    Local,
    Google,
}

impl AuthProvider {
    pub fn label(&self) -> &'static str {
        match self {
            AuthProvider::Local => "Local",
            AuthProvider::Google => "Google",
        }
    }
}

/// JWT 负载声明
///
/// 仅用于客户端展示；授权判断始终以服务端为准。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub role: UserRole,
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub provider: Option<AuthProvider>,
}

/// 管理台用户目录条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedUser {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub role: UserRole,
    pub auth_provider: AuthProvider,
    pub full_name: Option<String>,
    pub first_login_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub login_count: Option<u32>,
}

/// 用户活跃度统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMetrics {
    pub total_users: u32,
    pub active_users: u32,
    pub store_users: u32,
    pub approvers: u32,
    pub fulfillment_agents: u32,
    pub admins: u32,
    pub lookback_days: u32,
}

/// `GET /api/v1/auth/session` 返回的权威用户档案
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub role: UserRole,
    pub auth_provider: AuthProvider,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// 注册成功后的账号摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub role: UserRole,
}

// =========================================================
// 商品目录 (Products)
// =========================================================

/// 商品条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub specifications: serde_json::Map<String, serde_json::Value>,
    pub price: f64,
    pub stock_quantity: u32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// 是否可加入购物车：上架且有库存
    pub fn orderable(&self) -> bool {
        self.active && self.stock_quantity > 0
    }
}

// =========================================================
// 订单 (Orders)
// =========================================================

/// 订单状态枚举
///
/// 生命周期：PendingApproval -> Approved/Rejected -> Accepted -> InTransit -> Fulfilled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    PendingApproval,
    Approved,
    Accepted,
    Rejected,
    InTransit,
    Fulfilled,
}

impl OrderStatus {
    /// 全部状态，按生命周期顺序，用于筛选与统计
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::PendingApproval,
        OrderStatus::Approved,
        OrderStatus::Accepted,
        OrderStatus::Rejected,
        OrderStatus::InTransit,
        OrderStatus::Fulfilled,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::PendingApproval => "Pending approval",
            OrderStatus::Approved => "Approved",
            OrderStatus::Accepted => "Accepted",
            OrderStatus::Rejected => "Rejected",
            OrderStatus::InTransit => "In transit",
            OrderStatus::Fulfilled => "Fulfilled",
        }
    }

    /// 查询参数值
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::PendingApproval => "PENDING_APPROVAL",
            OrderStatus::Approved => "APPROVED",
            OrderStatus::Accepted => "ACCEPTED",
            OrderStatus::Rejected => "REJECTED",
            OrderStatus::InTransit => "IN_TRANSIT",
            OrderStatus::Fulfilled => "FULFILLED",
        }
    }

    /// 是否计入营收口径（已批准及其后的在途/完成状态）
    pub fn counts_as_revenue(&self) -> bool {
        matches!(
            self,
            OrderStatus::Approved | OrderStatus::InTransit | OrderStatus::Fulfilled
        )
    }
}

/// 订单行项目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: Uuid,
    pub product_name: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub quantity: u32,
    pub unit_price: f64,
    pub line_total: f64,
}

/// 物流信息，发货后由后端附加到订单
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourierInfo {
    pub courier_name: String,
    pub tracking_number: String,
    pub dispatch_date: Option<DateTime<Utc>>,
}

/// 订单快照（后端拥有；客户端只读，通过轮询刷新）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub status: OrderStatus,
    pub shipping_address: String,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub customer_gst: Option<String>,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub courier_info: Option<CourierInfo>,
}

impl Order {
    /// 订单包含的商品件数总和
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

// =========================================================
// 通知 (Notifications)
// =========================================================

/// 邮件通知日志条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEntry {
    pub id: Uuid,
    pub subject: String,
    pub recipients: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

// =========================================================
// 请求负载 (Request Payloads)
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleLoginRequest {
    pub credential: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub full_name: Option<String>,
}

/// 登录接口返回的凭据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: Uuid,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub shipping_address: String,
    pub customer_gst: Option<String>,
    pub items: Vec<OrderItemRequest>,
}

/// 审批动作（批准/驳回）共用的负载
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalActionRequest {
    pub comments: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptOrderRequest {
    pub delivery_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourierInfoRequest {
    pub courier_name: String,
    pub tracking_number: String,
    pub dispatch_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: UserRole,
}

/// 管理员创建商品的负载
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub sku: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub price: f64,
    pub specifications: serde_json::Map<String, serde_json::Value>,
    pub stock_quantity: u32,
    pub active: Option<bool>,
}
