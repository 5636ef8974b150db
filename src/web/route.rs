//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其访问属性。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面 (默认路由)
    #[default]
    Login,
    /// 注册页面
    Register,
    /// 订单工作台 (需要认证)
    Orders,
    /// 商品目录 (需要认证)
    Products,
    /// 运营报表 (需要认证)
    Reports,
    /// 通知日志 (需要认证)
    Notifications,
    /// 用户管理 (需要管理员)
    AdminUsers,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        match path {
            "/" | "/login" => Self::Login,
            "/register" => Self::Register,
            "/orders" => Self::Orders,
            "/products" => Self::Products,
            "/reports" => Self::Reports,
            "/notifications" => Self::Notifications,
            "/admin/users" => Self::AdminUsers,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Orders => "/orders",
            Self::Products => "/products",
            Self::Reports => "/reports",
            Self::Notifications => "/notifications",
            Self::AdminUsers => "/admin/users",
            Self::NotFound => "/404",
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Self::Orders | Self::Products | Self::Reports | Self::Notifications | Self::AdminUsers
        )
    }

    /// 定义该路由是否仅限管理员访问
    pub fn requires_admin(&self) -> bool {
        matches!(self, Self::AdminUsers)
    }

    /// 定义已认证用户是否应该离开此路由（如登录/注册页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取认证成功时的重定向目标（从登录/注册页）
    pub fn auth_success_redirect() -> Self {
        Self::Orders
    }

    /// 获取权限不足时的重定向目标（已认证但非管理员）
    pub fn admin_failure_redirect() -> Self {
        Self::Orders
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}
