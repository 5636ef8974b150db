//! Puma Printables 门户前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `session` / `auth`: 会话状态管理（纯逻辑层 / 响应式外壳）
//! - `cart`: 购物车状态管理
//! - `api`: REST 客户端
//! - `components`: UI 组件层

mod api;
mod auth;
mod cart;
mod components {
    mod admin_users;
    mod cart_drawer;
    pub mod icons;
    pub mod layout;
    mod login;
    mod notifications;
    mod orders;
    mod products;
    mod register;
    mod reports;

    pub use admin_users::AdminUsersPage;
    pub use cart_drawer::CartDrawer;
    pub use login::LoginPage;
    pub use notifications::NotificationsPage;
    pub use orders::OrdersPage;
    pub use products::ProductsPage;
    pub use register::RegisterPage;
    pub use reports::ReportsPage;
}
mod config;
mod fmt;
mod session;

use crate::auth::{SessionContext, init_session};
use crate::cart::{CartContext, bind_cart_to_session};
use crate::components::{
    AdminUsersPage, CartDrawer, LoginPage, NotificationsPage, OrdersPage, ProductsPage,
    RegisterPage, ReportsPage,
};

use leptos::prelude::*;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积（fetch 仍走 gloo-net）。
pub(crate) mod web {
    pub mod abort;
    pub mod download;
    pub mod events;
    pub mod google;
    pub mod route;
    pub mod router;
    mod storage;
    pub mod time;
    mod timer;

    pub use storage::LocalStorage;
    pub use timer::{Interval, Timeout};
}

use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Orders => view! { <OrdersPage /> }.into_any(),
        AppRoute::Products => view! { <ProductsPage /> }.into_any(),
        AppRoute::Reports => view! { <ReportsPage /> }.into_any(),
        AppRoute::Notifications => view! { <NotificationsPage /> }.into_any(),
        AppRoute::AdminUsers => view! { <AdminUsersPage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建会话上下文并初始化（恢复、持久化、过期登出、后台刷新）
    let session_ctx = SessionContext::new();
    provide_context(session_ctx);
    init_session(&session_ctx);

    // 2. 购物车上下文，生命周期绑定到会话凭据
    let cart_ctx = CartContext::new();
    provide_context(cart_ctx);
    bind_cart_to_session(&cart_ctx, session_ctx.token_signal());

    // 3. 获取守卫信号，注入路由服务（解耦！）
    let is_authenticated = session_ctx.is_authenticated_signal();
    let is_admin = session_ctx.is_admin_signal();

    view! {
        // 4. 路由器组件：注入会话信号实现守卫；购物车抽屉挂在
        //    路由之外，跨页面常驻
        <Router is_authenticated=is_authenticated is_admin=is_admin>
            <RouterOutlet matcher=route_matcher />
            <CartDrawer />
        </Router>
    }
}
